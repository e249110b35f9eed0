// src/render/view.rs
// Components making up one rendered segment

use super::ad_card::AdCard;
use crate::format::format_time_range;
use crate::segment::SegmentResult;
use serde::Serialize;
use std::fmt;

pub const NO_LABELS_TEXT: &str = "No labels available";
pub const NO_ADS_TEXT: &str = "No ads available for this segment";
pub const ADS_HEADING: &str = "Suggested Ads";
pub const PREVIEW_ALT: &str = "Segment preview";

/// An image that swaps to a placeholder the first time it fails to load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageSlot {
    src: String,
    alt: String,
    fallback: String,
    failed: bool,
}

impl ImageSlot {
    pub fn new(src: impl Into<String>, alt: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
            fallback: fallback.into(),
            failed: false,
        }
    }

    /// What should currently be displayed
    pub fn current_src(&self) -> &str {
        if self.failed {
            &self.fallback
        } else {
            &self.src
        }
    }

    pub fn alt(&self) -> &str {
        &self.alt
    }

    pub fn is_fallback(&self) -> bool {
        self.failed
    }

    /// Switch to the placeholder. Only the first error counts, so a broken
    /// placeholder cannot loop.
    pub fn on_load_error(&mut self) {
        if self.failed {
            return;
        }
        tracing::warn!("Image failed to load, using placeholder: {}", self.src);
        self.failed = true;
    }
}

/// The clickable `MM:SS → MM:SS` label that seeks playback
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeRange {
    pub label: String,
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LabelStrip {
    Tags(Vec<String>),
    Placeholder,
}

impl LabelStrip {
    fn from_labels(labels: &[String]) -> Self {
        if labels.is_empty() {
            LabelStrip::Placeholder
        } else {
            LabelStrip::Tags(labels.to_vec())
        }
    }

    pub fn tags(&self) -> &[String] {
        match self {
            LabelStrip::Tags(tags) => tags,
            LabelStrip::Placeholder => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AdStrip {
    Cards(Vec<AdCard>),
    Placeholder,
}

impl AdStrip {
    pub fn cards(&self) -> &[AdCard] {
        match self {
            AdStrip::Cards(cards) => cards,
            AdStrip::Placeholder => &[],
        }
    }

    pub(crate) fn cards_mut(&mut self) -> &mut [AdCard] {
        match self {
            AdStrip::Cards(cards) => cards,
            AdStrip::Placeholder => &mut [],
        }
    }
}

/// One rendered segment. Owns its subtree; activation goes through `SegmentList`
/// so the single-active rule can be enforced across siblings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentView {
    index: usize,
    time_range: TimeRange,
    /// `None` when the segment has no preview frames at all
    previews: Option<Vec<ImageSlot>>,
    labels: LabelStrip,
    ads: AdStrip,
    active: bool,
}

impl SegmentView {
    pub(crate) fn build(index: usize, segment: &SegmentResult, placeholder_image: &str) -> Self {
        let previews = if segment.preview_frames.is_empty() {
            None
        } else {
            Some(
                segment
                    .preview_frames
                    .iter()
                    .map(|frame| ImageSlot::new(frame.clone(), PREVIEW_ALT, placeholder_image))
                    .collect(),
            )
        };

        let ads = if segment.ads.is_empty() {
            AdStrip::Placeholder
        } else {
            AdStrip::Cards(
                segment
                    .ads
                    .iter()
                    .map(|ad| AdCard::build(ad, placeholder_image))
                    .collect(),
            )
        };

        Self {
            index,
            time_range: TimeRange {
                label: format_time_range(segment.start, segment.end),
                start: segment.start,
                end: segment.end,
            },
            previews,
            labels: LabelStrip::from_labels(&segment.labels),
            ads,
            active: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn time_range(&self) -> &TimeRange {
        &self.time_range
    }

    pub fn previews(&self) -> Option<&[ImageSlot]> {
        self.previews.as_deref()
    }

    pub(crate) fn previews_mut(&mut self) -> Option<&mut [ImageSlot]> {
        self.previews.as_deref_mut()
    }

    pub fn labels(&self) -> &LabelStrip {
        &self.labels
    }

    pub fn ads(&self) -> &AdStrip {
        &self.ads
    }

    pub(crate) fn ads_mut(&mut self) -> &mut AdStrip {
        &mut self.ads
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl fmt::Display for SegmentView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.active { '>' } else { ' ' };
        writeln!(f, "{} [{}] {}", marker, self.index + 1, self.time_range.label)?;

        if let Some(previews) = &self.previews {
            let sources: Vec<&str> = previews.iter().map(|p| p.current_src()).collect();
            writeln!(f, "    previews: {}", sources.join(", "))?;
        }

        match &self.labels {
            LabelStrip::Tags(tags) => {
                let tags: Vec<String> = tags.iter().map(|t| format!("#{}", t)).collect();
                writeln!(f, "    labels: {}", tags.join(" "))?;
            }
            LabelStrip::Placeholder => writeln!(f, "    labels: {}", NO_LABELS_TEXT)?,
        }

        writeln!(f, "    {}:", ADS_HEADING)?;
        match &self.ads {
            AdStrip::Cards(cards) => {
                for card in cards {
                    writeln!(f, "      - {}", card)?;
                }
            }
            AdStrip::Placeholder => writeln!(f, "      {}", NO_ADS_TEXT)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::AdResult;

    const PLACEHOLDER: &str = "https://placeholder.example/ad.png";

    #[test]
    fn test_empty_labels_render_single_placeholder() {
        let view = SegmentView::build(0, &SegmentResult::new(0.0, 30.0), PLACEHOLDER);
        assert_eq!(view.labels(), &LabelStrip::Placeholder);
        assert!(view.labels().tags().is_empty(), "no tags next to the placeholder");
    }

    #[test]
    fn test_labels_keep_input_order() {
        let mut segment = SegmentResult::new(0.0, 30.0);
        segment.labels = vec!["sunset".into(), "beach".into(), "dog".into()];
        let view = SegmentView::build(0, &segment, PLACEHOLDER);
        assert_eq!(view.labels().tags(), ["sunset", "beach", "dog"]);
    }

    #[test]
    fn test_empty_ads_render_single_placeholder() {
        let view = SegmentView::build(0, &SegmentResult::new(0.0, 30.0), PLACEHOLDER);
        assert_eq!(view.ads(), &AdStrip::Placeholder);
        assert!(view.ads().cards().is_empty());
    }

    #[test]
    fn test_preview_strip_omitted_when_no_frames() {
        let view = SegmentView::build(0, &SegmentResult::new(0.0, 30.0), PLACEHOLDER);
        assert!(view.previews().is_none());

        let mut segment = SegmentResult::new(0.0, 30.0);
        segment.preview_frames = vec!["/f/1.jpg".into(), "/f/2.jpg".into()];
        let view = SegmentView::build(0, &segment, PLACEHOLDER);
        let frames: Vec<&str> = view
            .previews()
            .unwrap()
            .iter()
            .map(|p| p.current_src())
            .collect();
        assert_eq!(frames, vec!["/f/1.jpg", "/f/2.jpg"]);
    }

    #[test]
    fn test_time_label_uses_mm_ss() {
        let view = SegmentView::build(0, &SegmentResult::new(65.0, 125.0), PLACEHOLDER);
        assert_eq!(view.time_range().label, "01:05 → 02:05");
        assert_eq!(view.time_range().start, 65.0);
    }

    #[test]
    fn test_image_slot_falls_back_once() {
        let mut slot = ImageSlot::new("/broken.jpg", PREVIEW_ALT, PLACEHOLDER);
        assert_eq!(slot.current_src(), "/broken.jpg");
        slot.on_load_error();
        assert_eq!(slot.current_src(), PLACEHOLDER);
        slot.on_load_error();
        assert_eq!(slot.current_src(), PLACEHOLDER, "second error is ignored");
        assert!(slot.is_fallback());
    }

    #[test]
    fn test_display_lists_placeholders() {
        let mut segment = SegmentResult::new(0.0, 30.0);
        segment.ads.push(AdResult {
            title: "Cozy Home Decor".into(),
            description: "Warm and inviting".into(),
            image_url: None,
            target_url: None,
        });
        let text = SegmentView::build(0, &segment, PLACEHOLDER).to_string();
        assert!(text.contains("00:00 → 00:30"));
        assert!(text.contains(NO_LABELS_TEXT));
        assert!(text.contains("Cozy Home Decor"));
        assert!(!text.contains(NO_ADS_TEXT));
    }
}
