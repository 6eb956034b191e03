#![forbid(unsafe_code)]

//! `init(options)` payload: page configuration plus the DOM hooks.
//!
//! The JS object is round-tripped through `JSON.stringify`, so everything
//! here is plain serde and tested natively.

use folio_core::reveal::RevealKind;
use folio_core::{ConfigError, PageConfig};
use serde::{Deserialize, Serialize};

/// CSS selectors naming the markup the page binds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub navbar: String,
    pub hamburger: String,
    pub nav_menu: String,
    pub back_to_top: String,
    pub sections: String,
    pub nav_links: String,
    /// Every in-page anchor, nav links included.
    pub anchors: String,
    pub contact_form: String,
    pub form_message: String,
    pub tech_icons: String,
    pub skill_items: String,
    pub project_cards: String,
    pub skill_categories: String,
    pub detail_sections: String,
    pub about_cards: String,
    pub contact_info: String,
    pub contact_form_card: String,
    pub lazy_images: String,
    pub resume_buttons: Vec<String>,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            navbar: ".navbar".into(),
            hamburger: "#hamburger".into(),
            nav_menu: "#navMenu".into(),
            back_to_top: "#backToTop".into(),
            sections: "section[id]".into(),
            nav_links: ".nav-link".into(),
            anchors: "a[href^=\"#\"]".into(),
            contact_form: "#contactForm".into(),
            form_message: "#formSuccess".into(),
            tech_icons: ".tech-icon[data-tech]".into(),
            skill_items: ".skill-item".into(),
            project_cards: ".project-card".into(),
            skill_categories: ".skill-category".into(),
            detail_sections: ".detail-section".into(),
            about_cards: ".about-card-modern".into(),
            contact_info: ".contact-info-card".into(),
            contact_form_card: ".contact-form-card".into(),
            lazy_images: "img[data-src]".into(),
            resume_buttons: vec!["#downloadResumeBtn".into(), "#downloadResumeHero".into()],
        }
    }
}

impl Selectors {
    /// Reveal candidate selectors paired with their kind, in scan order.
    #[must_use]
    pub fn reveal_groups(&self) -> [(RevealKind, &str); 6] {
        [
            (RevealKind::ProjectCard, self.project_cards.as_str()),
            (RevealKind::SkillCategory, self.skill_categories.as_str()),
            (RevealKind::DetailSection, self.detail_sections.as_str()),
            (RevealKind::AboutCard, self.about_cards.as_str()),
            (RevealKind::ContactInfo, self.contact_info.as_str()),
            (RevealKind::ContactForm, self.contact_form_card.as_str()),
        ]
    }

    fn first_empty(&self) -> Option<&'static str> {
        let named = [
            ("navbar", &self.navbar),
            ("hamburger", &self.hamburger),
            ("nav_menu", &self.nav_menu),
            ("back_to_top", &self.back_to_top),
            ("sections", &self.sections),
            ("nav_links", &self.nav_links),
            ("anchors", &self.anchors),
            ("contact_form", &self.contact_form),
            ("form_message", &self.form_message),
        ];
        named
            .into_iter()
            .find(|(_, sel)| sel.trim().is_empty())
            .map(|(name, _)| name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebOptions {
    #[serde(flatten)]
    pub page: PageConfig,
    pub selectors: Selectors,
}

#[derive(Debug)]
pub enum OptionsError {
    Json(serde_json::Error),
    Config(ConfigError),
    EmptySelector(&'static str),
}

impl core::fmt::Display for OptionsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid options: {err}"),
            Self::Config(err) => write!(f, "invalid page config: {err}"),
            Self::EmptySelector(name) => write!(f, "selector `{name}` is empty"),
        }
    }
}

impl std::error::Error for OptionsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::EmptySelector(_) => None,
        }
    }
}

impl From<serde_json::Error> for OptionsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<ConfigError> for OptionsError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl WebOptions {
    /// Parse and validate. An empty document yields the defaults.
    pub fn from_json_str(s: &str) -> Result<Self, OptionsError> {
        let options: Self = if s.trim().is_empty() {
            Self::default()
        } else {
            serde_json::from_str(s)?
        };
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        self.page.validate()?;
        if let Some(name) = self.selectors.first_empty() {
            return Err(OptionsError::EmptySelector(name));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(WebOptions::from_json_str("{}").unwrap(), WebOptions::default());
        assert_eq!(WebOptions::from_json_str("").unwrap(), WebOptions::default());
    }

    #[test]
    fn page_keys_sit_at_top_level() {
        let opts = WebOptions::from_json_str(
            r##"{"log_level":"debug","nav":{"active_offset":80},"selectors":{"hamburger":"#burger"}}"##,
        )
        .unwrap();
        assert_eq!(opts.page.log_level, "debug");
        assert_eq!(opts.page.nav.active_offset, 80.0);
        assert_eq!(opts.page.nav.scrolled_threshold, 50.0);
        assert_eq!(opts.selectors.hamburger, "#burger");
        assert_eq!(opts.selectors.nav_menu, "#navMenu");
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = WebOptions::from_json_str(r#"{"log_level":"loud"}"#).unwrap_err();
        assert!(matches!(err, OptionsError::Config(ConfigError::UnknownLogLevel(_))));
    }

    #[test]
    fn empty_selector_is_rejected() {
        let err = WebOptions::from_json_str(r#"{"selectors":{"navbar":" "}}"#).unwrap_err();
        assert_eq!(err.to_string(), "selector `navbar` is empty");
    }

    #[test]
    fn malformed_json_reports_source() {
        let err = WebOptions::from_json_str("{nope").unwrap_err();
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn reveal_groups_cover_every_kind() {
        let sel = Selectors::default();
        let kinds: Vec<RevealKind> = sel.reveal_groups().iter().map(|(k, _)| *k).collect();
        assert_eq!(kinds.len(), 6);
        assert_eq!(sel.reveal_groups()[0], (RevealKind::ProjectCard, ".project-card"));
    }
}
