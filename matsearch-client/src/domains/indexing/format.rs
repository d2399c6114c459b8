use matsearch_model::StatusSnapshot;

use crate::infrastructure::api_types::RawStatus;

/// Renders whole seconds as zero-padded `HH:MM:SS`. Hours keep growing past
/// 24 and widen beyond two digits when needed.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Backend progress fraction to a percentage in `[0, 100]`.
fn progress_percent(fraction: f64) -> f64 {
    if fraction.is_finite() {
        (fraction * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

impl From<RawStatus> for StatusSnapshot {
    fn from(raw: RawStatus) -> Self {
        StatusSnapshot {
            total_images: raw.total_images,
            total_videos: raw.total_videos,
            total_video_frames: raw.total_video_frames,
            total_pexels_videos: raw.total_pexels_videos,
            scanning_files: raw.scanning_files,
            remain_files: raw.remain_files,
            remain_time: format_duration(raw.remain_time.unwrap_or(0)),
            progress: progress_percent(raw.progress),
            is_scanning: raw.status,
            current_model: raw.current_model.filter(|m| !m.is_empty()),
        }
    }
}
