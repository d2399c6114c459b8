use std::fmt::Write;

use matsearch_client::infrastructure::api_types::ModelCatalog;
use matsearch_model::{SearchOutcome, StatusSnapshot};

pub fn status(snapshot: &StatusSnapshot) -> String {
    let mut out = String::new();
    if snapshot.is_scanning {
        let _ = writeln!(
            out,
            "Scanning: {:.1}% ({}/{} files, {} remaining, ETA {})",
            snapshot.progress,
            snapshot.scanned_files(),
            snapshot.scanning_files,
            snapshot.remain_files,
            snapshot.remain_time
        );
    } else {
        let _ = writeln!(out, "Idle");
    }
    let _ = writeln!(
        out,
        "Images: {}  Videos: {}  Video frames: {}  Pexels videos: {}",
        snapshot.total_images,
        snapshot.total_videos,
        snapshot.total_video_frames,
        snapshot.total_pexels_videos
    );
    if let Some(model) = &snapshot.current_model {
        let _ = writeln!(out, "Model: {model}");
    }
    out
}

pub fn outcome(outcome: &SearchOutcome) -> String {
    let mut out = String::new();
    if let Some(score) = outcome.score() {
        let _ = writeln!(out, "Similarity score: {}%", score.score);
        return out;
    }
    for (rank, item) in outcome.items().iter().enumerate() {
        let _ = write!(out, "{:>3}. {:.4}  {}", rank + 1, item.score, item.path);
        if item.has_segment() {
            let _ = write!(out, "  [{}s - {}s]", item.start_time, item.end_time);
        }
        let _ = writeln!(out, "\n     {}", item.url);
    }
    out
}

pub fn models(catalog: &ModelCatalog) -> String {
    let mut out = String::new();
    for info in catalog.values() {
        let marker = if info.current { '*' } else { ' ' };
        let _ = writeln!(out, "{marker} {}  ({})", info.name, info.path);
    }
    out
}
