// src/segment.rs
// Backend result types, already mapped out of the wire format

use serde::Serialize;

/// One time-bounded slice of the processed video.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentResult {
    /// 1-based ordinal assigned by the backend, if it sent one
    pub number: Option<u32>,
    /// Start of the segment in seconds
    pub start: f64,
    /// End of the segment in seconds, never before `start`
    pub end: f64,
    pub preview_frames: Vec<String>,
    /// Display order is the order given by the backend
    pub labels: Vec<String>,
    pub ads: Vec<AdResult>,
}

impl SegmentResult {
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            number: None,
            start,
            end,
            preview_frames: Vec::new(),
            labels: Vec::new(),
            ads: Vec::new(),
        }
    }
}

/// A suggested advertisement attached to a segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdResult {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    /// Where the ad card navigates to. `None` means the card is informational only.
    pub target_url: Option<String>,
}
