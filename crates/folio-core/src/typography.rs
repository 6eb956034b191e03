#![forbid(unsafe_code)]

//! Responsive base font size.
//!
//! Applied once on load and then on resize through a latest-wins debouncer:
//! a burst of resize events produces a single update after the quiet window,
//! computed from the last reported width.

use core::time::Duration;

use crate::config::TypographyConfig;
use crate::effect::{Effect, Target};
use crate::timer::Debouncer;

/// Base font size in pixels for a viewport `width`.
#[must_use]
pub fn font_size_for(width: f64, config: &TypographyConfig) -> u32 {
    if width < config.small_breakpoint {
        config.small_px
    } else if width < config.medium_breakpoint {
        config.medium_px
    } else {
        config.default_px
    }
}

#[derive(Debug, Clone)]
pub struct FontSizer {
    config: TypographyConfig,
    resize: Debouncer<f64>,
    applied: Option<u32>,
    updates: u64,
}

impl FontSizer {
    #[must_use]
    pub fn new(config: TypographyConfig) -> Self {
        let resize = Debouncer::new(config.debounce());
        Self {
            config,
            resize,
            applied: None,
            updates: 0,
        }
    }

    /// Size currently applied to the root element.
    #[must_use]
    pub fn applied(&self) -> Option<u32> {
        self.applied
    }

    /// Number of font-size writes so far.
    #[must_use]
    pub fn updates(&self) -> u64 {
        self.updates
    }

    /// Immediate application (page load).
    pub fn apply(&mut self, width: f64) -> Effect {
        let px = font_size_for(width, &self.config);
        self.applied = Some(px);
        self.updates += 1;
        tracing::debug!(target: "folio.typography", width, px, "base font size applied");
        Effect::style(Target::Root, "font-size", format!("{px}px"))
    }

    /// Resize event: defer until the quiet window elapses.
    pub fn on_resize(&mut self, width: f64, now: Duration) {
        self.resize.call(width, now);
    }

    /// Fire the debounced update if due.
    pub fn poll(&mut self, now: Duration) -> Option<Effect> {
        self.resize.poll(now).map(|width| self.apply(width))
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.resize.deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoint_boundaries() {
        let cfg = TypographyConfig::default();
        assert_eq!(font_size_for(479.0, &cfg), 14);
        assert_eq!(font_size_for(480.0, &cfg), 15);
        assert_eq!(font_size_for(767.0, &cfg), 15);
        assert_eq!(font_size_for(768.0, &cfg), 16);
        assert_eq!(font_size_for(1920.0, &cfg), 16);
    }

    #[test]
    fn resize_burst_yields_one_update() {
        let mut sizer = FontSizer::new(TypographyConfig::default());
        sizer.apply(1024.0);
        for (i, w) in [900.0, 700.0, 500.0, 470.0].into_iter().enumerate() {
            sizer.on_resize(w, Duration::from_millis(i as u64 * 50));
        }
        assert_eq!(sizer.deadline(), Some(Duration::from_millis(400)));
        assert_eq!(sizer.poll(Duration::from_millis(399)), None);
        assert_eq!(
            sizer.poll(Duration::from_millis(400)),
            Some(Effect::style(Target::Root, "font-size", "14px"))
        );
        assert_eq!(sizer.poll(Duration::from_millis(2000)), None);
        assert_eq!(sizer.updates(), 2);
        assert_eq!(sizer.applied(), Some(14));
    }
}
