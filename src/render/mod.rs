// src/render/mod.rs
// Render Module - segment list view model with seek/activation

mod ad_card;
mod view;

pub use ad_card::{AdCard, ClickOrigin, NavigationRequest, Navigator, GO_TO_AD_TEXT};
pub use view::{
    AdStrip, ImageSlot, LabelStrip, SegmentView, TimeRange, ADS_HEADING, NO_ADS_TEXT,
    NO_LABELS_TEXT, PREVIEW_ALT,
};

#[cfg(test)]
pub(crate) use ad_card::testing::RecordingNavigator;

use crate::config::ClientConfig;
use crate::segment::SegmentResult;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("Playback not allowed: {0}")]
    NotAllowed(String),

    #[error("Playback failed: {0}")]
    Failed(String),
}

/// The external video player. Positions are written, never read back.
pub trait Playback {
    fn set_position(&mut self, seconds: f64);

    fn play(&mut self) -> Result<(), PlaybackError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
}

/// Vertical alignment after scrolling; `Nearest` moves as little as possible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBlock {
    Nearest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOptions {
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

impl ScrollOptions {
    /// Smooth, minimal-movement scrolling
    pub const NEAREST_SMOOTH: ScrollOptions = ScrollOptions {
        behavior: ScrollBehavior::Smooth,
        block: ScrollBlock::Nearest,
    };
}

/// The scrollable area hosting the segment list
pub trait Viewport {
    fn scroll_into_view(&mut self, segment_index: usize, options: ScrollOptions);
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("No segment at index {0}")]
    UnknownSegment(usize),

    #[error("No ad {ad} in segment {segment}")]
    UnknownAd { segment: usize, ad: usize },

    #[error("No image {image} in segment {segment}")]
    UnknownImage { segment: usize, image: usize },
}

/// Turns backend segments into views. Pure apart from the placeholder image it is configured with.
pub struct SegmentRenderer {
    placeholder_image: String,
}

impl SegmentRenderer {
    pub fn new(placeholder_image: impl Into<String>) -> Self {
        Self {
            placeholder_image: placeholder_image.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.placeholder_image_url.clone())
    }

    pub fn render(&self, segments: &[SegmentResult]) -> SegmentList {
        let views = segments
            .iter()
            .enumerate()
            .map(|(index, segment)| SegmentView::build(index, segment, &self.placeholder_image))
            .collect::<Vec<_>>();

        tracing::debug!("Rendered {} segment views", views.len());

        SegmentList { views }
    }
}

/// Ordered views from one render pass. At most one view is active.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentList {
    views: Vec<SegmentView>,
}

impl SegmentList {
    pub fn views(&self) -> &[SegmentView] {
        &self.views
    }

    pub fn get(&self, index: usize) -> Option<&SegmentView> {
        self.views.get(index)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.views.iter().position(|v| v.is_active())
    }

    /// Seek playback to the segment start, mark it as the only active view and
    /// bring it into view. A refused `play()` is logged, not returned.
    pub fn activate(
        &mut self,
        index: usize,
        playback: &mut dyn Playback,
        viewport: &mut dyn Viewport,
    ) -> Result<(), ViewError> {
        let start = self
            .views
            .get(index)
            .map(|v| v.time_range().start)
            .ok_or(ViewError::UnknownSegment(index))?;

        playback.set_position(start);
        if let Err(e) = playback.play() {
            tracing::error!("Error playing video: {}", e);
        }

        for view in &mut self.views {
            view.set_active(view.index() == index);
        }

        viewport.scroll_into_view(index, ScrollOptions::NEAREST_SMOOTH);

        tracing::info!("Seeked to segment {} at {:.2}s", index + 1, start);
        Ok(())
    }

    pub fn click_ad(
        &self,
        segment: usize,
        ad: usize,
        origin: ClickOrigin,
        navigator: &mut dyn Navigator,
    ) -> Result<bool, ViewError> {
        let card = self
            .views
            .get(segment)
            .ok_or(ViewError::UnknownSegment(segment))?
            .ads()
            .cards()
            .get(ad)
            .ok_or(ViewError::UnknownAd { segment, ad })?;
        Ok(card.click(origin, navigator))
    }

    pub fn preview_load_failed(&mut self, segment: usize, image: usize) -> Result<(), ViewError> {
        self.views
            .get_mut(segment)
            .ok_or(ViewError::UnknownSegment(segment))?
            .previews_mut()
            .and_then(|frames| frames.get_mut(image))
            .ok_or(ViewError::UnknownImage { segment, image })?
            .on_load_error();
        Ok(())
    }

    pub fn ad_image_load_failed(&mut self, segment: usize, ad: usize) -> Result<(), ViewError> {
        self.views
            .get_mut(segment)
            .ok_or(ViewError::UnknownSegment(segment))?
            .ads_mut()
            .cards_mut()
            .get_mut(ad)
            .ok_or(ViewError::UnknownAd { segment, ad })?
            .image_mut()
            .ok_or(ViewError::UnknownImage { segment, image: ad })?
            .on_load_error();
        Ok(())
    }
}

impl fmt::Display for SegmentList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for view in &self.views {
            write!(f, "{}", view)?;
        }
        Ok(())
    }
}
