#![forbid(unsafe_code)]

//! Contact form validation.
//!
//! Submission runs a synchronous pipeline: collect fields, require `name`,
//! `email` and `message`, check the email shape, then simulate delivery (log
//! only), show the success panel, and reset the form.
//!
//! Two emptiness rules coexist on purpose:
//!
//! - **Submit** treats a field as filled when its value is non-empty, so a
//!   whitespace-only value passes.
//! - **Blur** trims before judging, so the same value gets the error border.
//!
//! The divergence is surfaced through [`whitespace_only_fields`] and a debug
//! log on submission rather than resolved either way.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde::Serializer;

use crate::config::ContactConfig;
use crate::effect::{Effect, NodeId, Target};

/// Fields that must be non-empty on submit.
pub const REQUIRED_FIELDS: [&str; 3] = ["name", "email", "message"];

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s\x{FEFF}@]+@[^\s\x{FEFF}@]+\.[^\s\x{FEFF}@]+$")
        .expect("email pattern is a valid regex")
});

/// Trim as browsers do: Unicode whitespace plus the byte-order mark.
fn trim_blank(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// `local@domain.tld` shape with no embedded whitespace.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Submit-time rejection. `Display` is the user-visible message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    MissingFields,
    InvalidEmail,
}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingFields => f.write_str("Please fill in all required fields"),
            Self::InvalidEmail => f.write_str("Please enter a valid email address"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Collected form data, in form order. Later duplicates overwrite earlier
/// values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, String)>,
}

impl FormData {
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut data = Self::default();
        for (k, v) in pairs {
            data.insert(k.into(), v.into());
        }
        data
    }

    pub fn insert(&mut self, key: String, value: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value of `key`, empty when absent.
    #[must_use]
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for FormData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Required fields that pass the submit check but fail the blur check.
#[must_use]
pub fn whitespace_only_fields(data: &FormData) -> Vec<&'static str> {
    REQUIRED_FIELDS
        .into_iter()
        .filter(|f| {
            let v = data.value(f);
            !v.is_empty() && trim_blank(v).is_empty()
        })
        .collect()
}

/// Run the submit pipeline's checks.
pub fn validate(data: &FormData) -> Result<(), ValidationError> {
    if REQUIRED_FIELDS.iter().any(|f| data.value(f).is_empty()) {
        return Err(ValidationError::MissingFields);
    }
    if !is_valid_email(data.value("email")) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Border state of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldIndicator {
    Error,
    Neutral,
    Focused,
}

/// Blur-time check: required and empty after trimming.
#[must_use]
pub fn blur_indicator(value: &str, required: bool) -> FieldIndicator {
    if required && trim_blank(value).is_empty() {
        FieldIndicator::Error
    } else {
        FieldIndicator::Neutral
    }
}

/// What a submission did.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Accepted,
    Rejected(ValidationError),
}

/// The message panel is shared by success and error messages; each showing
/// bumps the generation so older hide timers become no-ops.
#[derive(Debug, Clone)]
pub struct ContactForm {
    config: ContactConfig,
    panel_generation: u64,
    panel_visible: bool,
    submissions: u64,
}

impl ContactForm {
    #[must_use]
    pub fn new(config: ContactConfig) -> Self {
        Self {
            config,
            panel_generation: 0,
            panel_visible: false,
            submissions: 0,
        }
    }

    #[must_use]
    pub fn panel_visible(&self) -> bool {
        self.panel_visible
    }

    #[must_use]
    pub fn panel_generation(&self) -> u64 {
        self.panel_generation
    }

    /// Accepted submissions so far.
    #[must_use]
    pub fn submissions(&self) -> u64 {
        self.submissions
    }

    #[must_use]
    pub fn config(&self) -> &ContactConfig {
        &self.config
    }

    /// Run the submit pipeline. Returns the outcome, its effects, and the
    /// panel generation the caller must schedule a hide for.
    pub fn submit(&mut self, data: &FormData) -> (SubmitOutcome, Vec<Effect>, u64) {
        match validate(data) {
            Err(err) => {
                tracing::debug!(target: "folio.contact", error = %err, "submission rejected");
                let effects = self.show_message(&format!("❌ {err}"), "error");
                (SubmitOutcome::Rejected(err), effects, self.panel_generation)
            }
            Ok(()) => {
                let loose = whitespace_only_fields(data);
                if !loose.is_empty() {
                    tracing::debug!(
                        target: "folio.contact",
                        fields = ?loose,
                        "whitespace-only fields accepted on submit"
                    );
                }
                let payload = serde_json::to_string(data).unwrap_or_default();
                tracing::info!(target: "folio.contact", data = %payload, "form submitted");
                self.submissions += 1;

                let text = format!("✅ {}", self.config.success_message);
                let mut effects = self.show_message(&text, "success");
                effects.push(Effect::ResetForm);
                (SubmitOutcome::Accepted, effects, self.panel_generation)
            }
        }
    }

    fn show_message(&mut self, text: &str, kind: &str) -> Vec<Effect> {
        self.panel_generation += 1;
        self.panel_visible = true;
        vec![
            Effect::SetText {
                target: Target::FormMessage,
                text: text.to_string(),
            },
            Effect::ReplaceClassName {
                target: Target::FormMessage,
                class_name: format!("form-message {kind}"),
            },
            Effect::style(Target::FormMessage, "display", "block"),
        ]
    }

    /// Hide timer for `generation`. Stale generations do nothing.
    pub fn hide_panel(&mut self, generation: u64) -> Vec<Effect> {
        if generation != self.panel_generation || !self.panel_visible {
            return Vec::new();
        }
        self.panel_visible = false;
        vec![Effect::style(Target::FormMessage, "display", "none")]
    }

    fn indicator_color(&self, indicator: FieldIndicator) -> &str {
        match indicator {
            FieldIndicator::Error => &self.config.error_color,
            FieldIndicator::Neutral => &self.config.neutral_color,
            FieldIndicator::Focused => &self.config.focus_color,
        }
    }

    pub fn blur(&self, field: NodeId, value: &str, required: bool) -> Effect {
        let color = self.indicator_color(blur_indicator(value, required));
        Effect::style(Target::Node(field), "border-color", color)
    }

    pub fn focus(&self, field: NodeId) -> Effect {
        let color = self.indicator_color(FieldIndicator::Focused);
        Effect::style(Target::Node(field), "border-color", color)
    }
}
