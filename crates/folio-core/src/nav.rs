#![forbid(unsafe_code)]

//! Navigation and scroll controller.
//!
//! - Smooth scrolling to in-page anchors, offset by the navbar height.
//! - Active-link tracking: the first section (document order) whose
//!   half-open bounds `[top, top + height)` contain `scroll_y + offset` marks
//!   every link pointing at it; all other links are cleared. No match clears
//!   every link.
//! - Navbar `scrolled` marker and back-to-top visibility thresholds.
//!
//! Marker updates are diffed against the last applied state, so a steady
//! scroll position produces no effects.

use crate::config::NavConfig;
use crate::effect::{Effect, ScrollBehavior, Target};
use crate::layout::{LayoutProbe, SectionBounds};

const ACTIVE: &str = "active";
const SCROLLED: &str = "scrolled";
const SHOW: &str = "show";

/// Fragment named by an in-page `href`, without the leading `#`.
///
/// Returns `None` for the bare `#` marker and for hrefs that are not
/// fragments.
#[must_use]
pub fn fragment_of(href: &str) -> Option<&str> {
    let fragment = href.strip_prefix('#')?;
    if fragment.is_empty() {
        None
    } else {
        Some(fragment)
    }
}

/// Index of the first section whose bounds contain `line`.
#[must_use]
pub fn section_containing(sections: &[SectionBounds], line: f64) -> Option<usize> {
    sections.iter().position(|s| s.contains(line))
}

/// Scroll offset that brings `fragment` just below the navbar.
#[must_use]
pub fn anchor_offset(fragment: &str, probe: &impl LayoutProbe) -> Option<f64> {
    probe
        .anchor_top(fragment)
        .map(|top| top - probe.nav_height())
}

#[derive(Debug, Clone)]
pub struct NavController {
    config: NavConfig,
    /// `href` of every navigation link, document order.
    links: Vec<String>,
    active_section: Option<usize>,
    active_links: Vec<usize>,
    scrolled: bool,
    back_to_top_visible: bool,
}

impl NavController {
    #[must_use]
    pub fn new(config: NavConfig, links: Vec<String>) -> Self {
        Self {
            config,
            links,
            active_section: None,
            active_links: Vec::new(),
            scrolled: false,
            back_to_top_visible: false,
        }
    }

    #[must_use]
    pub fn active_section(&self) -> Option<usize> {
        self.active_section
    }

    /// Link indices currently carrying the active marker.
    #[must_use]
    pub fn active_links(&self) -> &[usize] {
        &self.active_links
    }

    #[must_use]
    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    #[must_use]
    pub fn back_to_top_visible(&self) -> bool {
        self.back_to_top_visible
    }

    /// Clear every link marker and apply the scroll thresholds from scratch.
    pub fn reset(&mut self, scroll_y: f64) -> Vec<Effect> {
        let mut effects: Vec<Effect> = (0..self.links.len())
            .map(|i| Effect::class(Target::NavLink(i), ACTIVE, false))
            .collect();
        self.active_section = None;
        self.active_links.clear();
        self.scrolled = scroll_y > self.config.scrolled_threshold;
        self.back_to_top_visible = scroll_y > self.config.back_to_top_threshold;
        effects.push(Effect::class(Target::Navbar, SCROLLED, self.scrolled));
        effects.push(Effect::class(
            Target::BackToTop,
            SHOW,
            self.back_to_top_visible,
        ));
        effects
    }

    /// Per-scroll threshold markers.
    pub fn on_scroll(&mut self, scroll_y: f64) -> Vec<Effect> {
        let mut effects = Vec::new();
        let scrolled = scroll_y > self.config.scrolled_threshold;
        if scrolled != self.scrolled {
            self.scrolled = scrolled;
            effects.push(Effect::class(Target::Navbar, SCROLLED, scrolled));
        }
        let visible = scroll_y > self.config.back_to_top_threshold;
        if visible != self.back_to_top_visible {
            self.back_to_top_visible = visible;
            effects.push(Effect::class(Target::BackToTop, SHOW, visible));
        }
        effects
    }

    /// Recompute the active link for the current frame.
    pub fn update_active(&mut self, scroll_y: f64, sections: &[SectionBounds]) -> Vec<Effect> {
        let line = scroll_y + self.config.active_offset;
        let section = section_containing(sections, line);
        let next_links: Vec<usize> = match section {
            Some(idx) => {
                let href = format!("#{}", sections[idx].id);
                self.links
                    .iter()
                    .enumerate()
                    .filter(|(_, link)| **link == href)
                    .map(|(i, _)| i)
                    .collect()
            }
            None => Vec::new(),
        };

        if section != self.active_section {
            tracing::trace!(
                target: "folio.nav",
                line,
                section = ?section.map(|i| sections[i].id.as_str()),
                "active section changed"
            );
        }
        self.active_section = section;

        if next_links == self.active_links {
            return Vec::new();
        }
        let mut effects: Vec<Effect> = self
            .active_links
            .iter()
            .filter(|i| !next_links.contains(i))
            .map(|&i| Effect::class(Target::NavLink(i), ACTIVE, false))
            .collect();
        effects.extend(
            next_links
                .iter()
                .filter(|i| !self.active_links.contains(i))
                .map(|&i| Effect::class(Target::NavLink(i), ACTIVE, true)),
        );
        self.active_links = next_links;
        effects
    }

    /// Smooth scroll for an in-page link. `None` when the click is a no-op
    /// (bare `#` or missing target).
    #[must_use]
    pub fn scroll_to_anchor(&self, href: &str, probe: &impl LayoutProbe) -> Option<Effect> {
        let fragment = fragment_of(href)?;
        let Some(top) = anchor_offset(fragment, probe) else {
            tracing::debug!(target: "folio.nav", fragment, "anchor target missing");
            return None;
        };
        Some(Effect::ScrollTo {
            top,
            behavior: ScrollBehavior::Smooth,
        })
    }

    #[must_use]
    pub fn scroll_to_top() -> Effect {
        Effect::ScrollTo {
            top: 0.0,
            behavior: ScrollBehavior::Smooth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::StaticLayout;

    fn links() -> Vec<String> {
        ["#home", "#about", "#projects", "#contact"]
            .iter()
            .map(|s| (*s).to_string())
            .collect()
    }

    fn layout() -> StaticLayout {
        StaticLayout::stacked(
            70.0,
            0.0,
            &[
                ("home", 600.0),
                ("about", 500.0),
                ("projects", 900.0),
                ("contact", 700.0),
            ],
        )
    }

    #[test]
    fn fragment_parsing() {
        assert_eq!(fragment_of("#about"), Some("about"));
        assert_eq!(fragment_of("#"), None);
        assert_eq!(fragment_of("https://example.com"), None);
    }

    #[test]
    fn anchor_scroll_subtracts_nav_height() {
        let nav = NavController::new(NavConfig::default(), links());
        let effect = nav.scroll_to_anchor("#projects", &layout());
        assert_eq!(
            effect,
            Some(Effect::ScrollTo {
                top: 1030.0,
                behavior: ScrollBehavior::Smooth
            })
        );
    }

    #[test]
    fn anchor_scroll_noops() {
        let nav = NavController::new(NavConfig::default(), links());
        assert_eq!(nav.scroll_to_anchor("#", &layout()), None);
        assert_eq!(nav.scroll_to_anchor("#nowhere", &layout()), None);
    }

    #[test]
    fn active_link_uses_reference_line() {
        let mut nav = NavController::new(NavConfig::default(), links());
        let sections = layout().sections;
        // 500 + 100 = 600 is the first pixel of `about`.
        let effects = nav.update_active(500.0, &sections);
        assert_eq!(effects, vec![Effect::class(Target::NavLink(1), ACTIVE, true)]);
        assert_eq!(nav.active_section(), Some(1));

        // Steady position: nothing to do.
        assert!(nav.update_active(510.0, &sections).is_empty());

        let effects = nav.update_active(1000.0, &sections);
        assert_eq!(
            effects,
            vec![
                Effect::class(Target::NavLink(1), ACTIVE, false),
                Effect::class(Target::NavLink(2), ACTIVE, true),
            ]
        );
    }

    #[test]
    fn gap_above_first_section_clears_links() {
        let mut nav = NavController::new(NavConfig::default(), links());
        let layout = StaticLayout::stacked(70.0, 400.0, &[("home", 600.0), ("about", 500.0)]);
        nav.update_active(400.0, &layout.sections);
        assert_eq!(nav.active_links(), &[0]);
        let effects = nav.update_active(0.0, &layout.sections);
        assert_eq!(effects, vec![Effect::class(Target::NavLink(0), ACTIVE, false)]);
        assert_eq!(nav.active_section(), None);
        assert!(nav.active_links().is_empty());
    }

    #[test]
    fn duplicate_links_all_marked() {
        let mut hrefs = links();
        hrefs.push("#contact".to_string());
        let mut nav = NavController::new(NavConfig::default(), hrefs);
        nav.update_active(2000.0, &layout().sections);
        assert_eq!(nav.active_links(), &[3, 4]);
    }

    #[test]
    fn scroll_thresholds_are_strict() {
        let mut nav = NavController::new(NavConfig::default(), links());
        assert!(nav.on_scroll(50.0).is_empty());
        assert_eq!(
            nav.on_scroll(51.0),
            vec![Effect::class(Target::Navbar, SCROLLED, true)]
        );
        assert!(nav.on_scroll(300.0).is_empty());
        assert_eq!(
            nav.on_scroll(301.0),
            vec![Effect::class(Target::BackToTop, SHOW, true)]
        );
        assert_eq!(
            nav.on_scroll(0.0),
            vec![
                Effect::class(Target::Navbar, SCROLLED, false),
                Effect::class(Target::BackToTop, SHOW, false),
            ]
        );
    }

    #[test]
    fn reset_emits_full_state() {
        let mut nav = NavController::new(NavConfig::default(), links());
        let effects = nav.reset(400.0);
        assert_eq!(effects.len(), links().len() + 2);
        assert!(nav.is_scrolled());
        assert!(nav.back_to_top_visible());
    }
}
