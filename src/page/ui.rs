// src/page/ui.rs
// Collaborators the page drives. Each front end supplies its own.

use super::status::Status;
use crate::render::SegmentList;

pub trait ProgressIndicator {
    fn show(&mut self);

    fn hide(&mut self);

    /// `percent` is always within `[0, 100]`
    fn set_percent(&mut self, percent: f64);
}

pub trait StatusRegion {
    fn set_status(&mut self, status: &Status);

    /// Blocking prompt the user has to acknowledge
    fn prompt(&mut self, message: &str);
}

pub trait SubmitControl {
    fn set_enabled(&mut self, enabled: bool, label: &str);
}

pub trait SegmentContainer {
    /// Replace whatever was displayed with `segments`
    fn display(&mut self, segments: &SegmentList);
}

/// Everything a page needs from its front end
pub trait PageUi: ProgressIndicator + StatusRegion + SubmitControl + SegmentContainer {}

impl<T> PageUi for T where T: ProgressIndicator + StatusRegion + SubmitControl + SegmentContainer {}
