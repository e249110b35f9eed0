// src/render/ad_card.rs
// Ad cards and the one navigation path they share

use super::view::ImageSlot;
use crate::segment::AdResult;
use serde::Serialize;
use std::fmt;

pub const GO_TO_AD_TEXT: &str = "Go to Ad";

/// A request to open a URL in a new browsing context with no opener and no referrer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationRequest {
    pub url: String,
    pub no_opener: bool,
    pub no_referrer: bool,
}

impl NavigationRequest {
    pub fn isolated(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            no_opener: true,
            no_referrer: true,
        }
    }
}

/// Opens URLs outside the current view
pub trait Navigator {
    fn open(&mut self, request: &NavigationRequest);
}

/// Where a click on an ad card landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOrigin {
    /// Anywhere on the card body
    Card,
    /// The inner "Go to Ad" affordance
    GoToButton,
}

/// Handlers a click on `origin` bubbles through, innermost first
fn propagation_path(origin: ClickOrigin) -> &'static [ClickOrigin] {
    match origin {
        ClickOrigin::GoToButton => &[ClickOrigin::GoToButton, ClickOrigin::Card],
        ClickOrigin::Card => &[ClickOrigin::Card],
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdCard {
    title: String,
    description: String,
    image: Option<ImageSlot>,
    target_url: Option<String>,
}

impl AdCard {
    pub(crate) fn build(ad: &AdResult, placeholder_image: &str) -> Self {
        Self {
            title: ad.title.clone(),
            description: ad.description.clone(),
            image: ad
                .image_url
                .as_ref()
                .map(|src| ImageSlot::new(src.clone(), ad.title.clone(), placeholder_image)),
            target_url: ad.target_url.clone(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn image(&self) -> Option<&ImageSlot> {
        self.image.as_ref()
    }

    pub(crate) fn image_mut(&mut self) -> Option<&mut ImageSlot> {
        self.image.as_mut()
    }

    pub fn target_url(&self) -> Option<&str> {
        self.target_url.as_deref()
    }

    /// Cards without a target have no button and ignore clicks
    pub fn is_clickable(&self) -> bool {
        self.target_url.is_some()
    }

    /// Dispatch a click the way a bubbling event reaches the card: handlers run
    /// innermost first, and the "Go to Ad" button stops propagation so the card
    /// handler is skipped. Returns whether a navigation happened.
    pub fn click(&self, origin: ClickOrigin, navigator: &mut dyn Navigator) -> bool {
        let Some(url) = self.target_url.as_deref() else {
            return false;
        };

        for &handler in propagation_path(origin) {
            self.navigate(url, navigator);
            if handler == ClickOrigin::GoToButton {
                tracing::debug!("'{}' handled the click, propagation stopped", GO_TO_AD_TEXT);
                break;
            }
        }
        true
    }

    fn navigate(&self, url: &str, navigator: &mut dyn Navigator) {
        tracing::info!("Opening ad '{}': {}", self.title, url);
        navigator.open(&NavigationRequest::isolated(url));
    }
}

impl fmt::Display for AdCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)?;
        if let Some(url) = &self.target_url {
            write!(f, " [{} -> {}]", GO_TO_AD_TEXT, url)?;
        }
        Ok(())
    }
}
