#![forbid(unsafe_code)]

//! Page configuration.
//!
//! Every section is `#[serde(default)]`, so a host may pass any subset of the
//! JSON shape and inherit the page defaults for the rest.

use core::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration validation failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A visibility threshold outside `[0, 1]`.
    ThresholdOutOfRange { field: &'static str, value: f64 },
    /// Font breakpoints must be strictly ascending.
    BreakpointsNotAscending { small: f64, medium: f64 },
    /// A wait or delay that must be positive is zero.
    ZeroDuration(&'static str),
    /// A log level string `tracing` does not understand.
    UnknownLogLevel(String),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ThresholdOutOfRange { field, value } => {
                write!(f, "{field} must be within [0, 1], got {value}")
            }
            Self::BreakpointsNotAscending { small, medium } => write!(
                f,
                "font breakpoints must ascend: small ({small}) < medium ({medium})"
            ),
            Self::ZeroDuration(field) => write!(f, "{field} must be greater than zero"),
            Self::UnknownLogLevel(level) => write!(f, "unknown log level: {level}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Navigation and scroll thresholds (pixels).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Reference line below the viewport top used for active-link tracking.
    pub active_offset: f64,
    /// Scroll offset past which the navbar gets its shadow marker.
    pub scrolled_threshold: f64,
    /// Scroll offset past which the back-to-top control is shown.
    pub back_to_top_threshold: f64,
    /// Reference line used by the keyboard section navigator.
    pub keynav_offset: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            active_offset: 100.0,
            scrolled_threshold: 50.0,
            back_to_top_threshold: 300.0,
            keynav_offset: 100.0,
        }
    }
}

/// Scroll-triggered fade-in parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Fraction of the element that must be visible.
    pub threshold: f64,
    pub root_margin: String,
    /// Initial downward offset in pixels.
    pub offset_px: f64,
    pub duration_secs: f64,
    /// Per-card `transition-delay` step for project cards.
    pub card_stagger_secs: f64,
    /// Per-item `animation-delay` step for skill items.
    pub skill_stagger_secs: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.15,
            root_margin: "0px 0px -100px 0px".to_string(),
            offset_px: 40.0,
            duration_secs: 0.8,
            card_stagger_secs: 0.1,
            skill_stagger_secs: 0.05,
        }
    }
}

/// Contact form timings and field colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub success_hide_ms: u64,
    pub error_hide_ms: u64,
    pub success_message: String,
    pub error_color: String,
    pub neutral_color: String,
    pub focus_color: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            success_hide_ms: 5000,
            error_hide_ms: 4000,
            success_message: "Message sent successfully!".to_string(),
            error_color: "#ef4444".to_string(),
            neutral_color: "#e0e0e0".to_string(),
            focus_color: "#667eea".to_string(),
        }
    }
}

impl ContactConfig {
    #[must_use]
    pub fn success_hide(&self) -> Duration {
        Duration::from_millis(self.success_hide_ms)
    }

    #[must_use]
    pub fn error_hide(&self) -> Duration {
        Duration::from_millis(self.error_hide_ms)
    }
}

/// Transient overlay timings (milliseconds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub tooltip_fade_in_ms: u64,
    pub tooltip_fade_out_ms: u64,
    pub touch_tooltip_ms: u64,
    pub notification_ms: u64,
    pub skill_pop_ms: u64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            tooltip_fade_in_ms: 10,
            tooltip_fade_out_ms: 300,
            touch_tooltip_ms: 2000,
            notification_ms: 3000,
            skill_pop_ms: 200,
        }
    }
}

/// Responsive base font sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypographyConfig {
    /// Widths strictly below this get `small_px`.
    pub small_breakpoint: f64,
    /// Widths strictly below this (and not small) get `medium_px`.
    pub medium_breakpoint: f64,
    pub small_px: u32,
    pub medium_px: u32,
    pub default_px: u32,
    pub debounce_ms: u64,
}

impl Default for TypographyConfig {
    fn default() -> Self {
        Self {
            small_breakpoint: 480.0,
            medium_breakpoint: 768.0,
            small_px: 14,
            medium_px: 15,
            default_px: 16,
            debounce_ms: 250,
        }
    }
}

impl TypographyConfig {
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Top-level page configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub nav: NavConfig,
    pub reveal: RevealConfig,
    pub contact: ContactConfig,
    pub overlay: OverlayConfig,
    pub typography: TypographyConfig,
    /// File-sharing link of the resume.
    pub resume_link: String,
    /// Performance entries longer than this are reported.
    pub long_task_ms: f64,
    /// Delay before the body is faded in after load.
    pub body_reveal_ms: u64,
    /// `tracing` level filter for the host's subscriber.
    pub log_level: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            nav: NavConfig::default(),
            reveal: RevealConfig::default(),
            contact: ContactConfig::default(),
            overlay: OverlayConfig::default(),
            typography: TypographyConfig::default(),
            resume_link:
                "https://drive.google.com/file/d/1mQsFi6SLc5CcW5IIb5jMJ9AoDXR1DCzs/view?usp=sharing"
                    .to_string(),
            long_task_ms: 100.0,
            body_reveal_ms: 100,
            log_level: "info".to_string(),
        }
    }
}

impl PageConfig {
    /// Parse a JSON document, falling back to defaults for missing keys.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.reveal.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::ThresholdOutOfRange {
                field: "reveal.threshold",
                value: threshold,
            });
        }
        let t = &self.typography;
        if t.small_breakpoint >= t.medium_breakpoint {
            return Err(ConfigError::BreakpointsNotAscending {
                small: t.small_breakpoint,
                medium: t.medium_breakpoint,
            });
        }
        if t.debounce_ms == 0 {
            return Err(ConfigError::ZeroDuration("typography.debounce_ms"));
        }
        if self.contact.success_hide_ms == 0 {
            return Err(ConfigError::ZeroDuration("contact.success_hide_ms"));
        }
        self.log_level
            .parse::<tracing::Level>()
            .map_err(|_| ConfigError::UnknownLogLevel(self.log_level.clone()))?;
        Ok(())
    }

    #[must_use]
    pub fn body_reveal(&self) -> Duration {
        Duration::from_millis(self.body_reveal_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(PageConfig::default().validate(), Ok(()));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = PageConfig::from_json_str(r#"{"nav":{"active_offset":80},"log_level":"debug"}"#)
            .expect("parse");
        assert_eq!(cfg.nav.active_offset, 80.0);
        assert_eq!(cfg.nav.scrolled_threshold, 50.0);
        assert_eq!(cfg.typography.small_px, 14);
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn rejects_threshold_out_of_range() {
        let mut cfg = PageConfig::default();
        cfg.reveal.threshold = 1.5;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::ThresholdOutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_descending_breakpoints() {
        let mut cfg = PageConfig::default();
        cfg.typography.small_breakpoint = 900.0;
        let err = cfg.validate().expect_err("must fail");
        assert_eq!(
            err.to_string(),
            "font breakpoints must ascend: small (900) < medium (768)"
        );
    }

    #[test]
    fn rejects_zero_debounce() {
        let mut cfg = PageConfig::default();
        cfg.typography.debounce_ms = 0;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ZeroDuration("typography.debounce_ms"))
        );
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut cfg = PageConfig::default();
        cfg.log_level = "loud".to_string();
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::UnknownLogLevel("loud".to_string()))
        );
    }
}
