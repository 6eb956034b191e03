#![forbid(unsafe_code)]

//! Layout measurements supplied by the host.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Document-relative vertical bounds of a `section[id]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionBounds {
    pub id: String,
    /// `offsetTop` in pixels.
    pub top: f64,
    /// `offsetHeight` in pixels.
    pub height: f64,
}

impl SectionBounds {
    #[must_use]
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Half-open containment: `[top, top + height)`.
    #[must_use]
    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.bottom()
    }

    /// Closed containment: `[top, top + height]`.
    #[must_use]
    pub fn spans(&self, y: f64) -> bool {
        y >= self.top && y <= self.bottom()
    }
}

/// Read-only view of the live layout.
///
/// Measurements are taken at call time, so the controllers always see the
/// geometry of the current frame.
pub trait LayoutProbe {
    /// Current vertical scroll offset.
    fn scroll_y(&self) -> f64;

    /// Rendered height of the navigation bar.
    fn nav_height(&self) -> f64;

    /// Document-relative top of the element named by `fragment` (without the
    /// leading `#`), or `None` when no such element exists.
    fn anchor_top(&self, fragment: &str) -> Option<f64>;

    /// Every `section[id]` in document order.
    fn sections(&self) -> Vec<SectionBounds>;
}

/// Fixed layout for tests and replay.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticLayout {
    pub scroll_y: f64,
    pub nav_height: f64,
    pub sections: Vec<SectionBounds>,
    /// Anchor targets that are not sections.
    pub anchors: HashMap<String, f64>,
}

impl StaticLayout {
    #[must_use]
    pub fn new(nav_height: f64, sections: Vec<SectionBounds>) -> Self {
        Self {
            scroll_y: 0.0,
            nav_height,
            sections,
            anchors: HashMap::new(),
        }
    }

    /// Stack sections back to back starting at `start`.
    #[must_use]
    pub fn stacked(nav_height: f64, start: f64, sections: &[(&str, f64)]) -> Self {
        let mut top = start;
        let bounds = sections
            .iter()
            .map(|(id, height)| {
                let b = SectionBounds::new(*id, top, *height);
                top += height;
                b
            })
            .collect();
        Self::new(nav_height, bounds)
    }

    #[must_use]
    pub fn with_scroll(mut self, scroll_y: f64) -> Self {
        self.scroll_y = scroll_y;
        self
    }

    #[must_use]
    pub fn with_anchor(mut self, id: impl Into<String>, top: f64) -> Self {
        self.anchors.insert(id.into(), top);
        self
    }
}

impl LayoutProbe for StaticLayout {
    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn nav_height(&self) -> f64 {
        self.nav_height
    }

    fn anchor_top(&self, fragment: &str) -> Option<f64> {
        self.sections
            .iter()
            .find(|s| s.id == fragment)
            .map(|s| s.top)
            .or_else(|| self.anchors.get(fragment).copied())
    }

    fn sections(&self) -> Vec<SectionBounds> {
        self.sections.clone()
    }
}
