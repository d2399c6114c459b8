/// Point-in-time report of background indexing progress.
///
/// Replaced wholesale on every poll; never merged field by field.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusSnapshot {
    pub total_images: u64,
    pub total_videos: u64,
    pub total_video_frames: u64,
    pub total_pexels_videos: u64,
    pub scanning_files: u64,
    pub remain_files: u64,
    /// `HH:MM:SS`
    pub remain_time: String,
    /// Percentage in `[0, 100]`
    pub progress: f64,
    pub is_scanning: bool,
    pub current_model: Option<String>,
}

impl StatusSnapshot {
    /// Files already processed in the running pass.
    pub fn scanned_files(&self) -> u64 {
        self.scanning_files.saturating_sub(self.remain_files)
    }
}
