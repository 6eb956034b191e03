#![forbid(unsafe_code)]

//! Mobile menu state machine.
//!
//! Two states, `Closed` (initial) and `Open`. The menu panel and the
//! hamburger icon always carry the same `active` marker because both are
//! derived from the single [`MenuState`] on every transition. Entering `Open`
//! locks body scrolling; entering `Closed` releases it.

use serde::{Deserialize, Serialize};

use crate::effect::{Effect, Target};

const ACTIVE: &str = "active";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

impl MenuState {
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Closed => Self::Open,
            Self::Open => Self::Closed,
        }
    }

    /// Body `overflow` value for this state.
    #[must_use]
    pub const fn body_overflow(self) -> &'static str {
        match self {
            Self::Closed => "auto",
            Self::Open => "hidden",
        }
    }
}

/// Why the menu was closed; kept for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    OutsideClick,
    Escape,
    Navigation,
}

impl CloseReason {
    fn as_str(self) -> &'static str {
        match self {
            Self::OutsideClick => "outside_click",
            Self::Escape => "escape",
            Self::Navigation => "navigation",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MenuController {
    state: MenuState,
    transitions: u64,
}

impl MenuController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> MenuState {
        self.state
    }

    /// Number of state changes since creation.
    #[must_use]
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Hamburger click.
    pub fn toggle(&mut self) -> Vec<Effect> {
        let next = self.state.toggled();
        self.enter(next)
    }

    /// Force `Closed`. No effects when already closed.
    pub fn close(&mut self, reason: CloseReason) -> Vec<Effect> {
        if !self.state.is_open() {
            return Vec::new();
        }
        tracing::debug!(target: "folio.menu", reason = reason.as_str(), "menu closed");
        self.enter(MenuState::Closed)
    }

    fn enter(&mut self, next: MenuState) -> Vec<Effect> {
        self.state = next;
        self.transitions += 1;
        Self::render(next)
    }

    /// Full marker state for `state`.
    #[must_use]
    pub fn render(state: MenuState) -> Vec<Effect> {
        let open = state.is_open();
        vec![
            Effect::class(Target::Hamburger, ACTIVE, open),
            Effect::class(Target::NavMenu, ACTIVE, open),
            Effect::style(Target::Body, "overflow", state.body_overflow()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers(effects: &[Effect]) -> (Option<bool>, Option<bool>) {
        let mut hamburger = None;
        let mut menu = None;
        for e in effects {
            if let Effect::SetClass { target, enabled, .. } = e {
                match target {
                    Target::Hamburger => hamburger = Some(*enabled),
                    Target::NavMenu => menu = Some(*enabled),
                    _ => {}
                }
            }
        }
        (hamburger, menu)
    }

    #[test]
    fn starts_closed() {
        assert_eq!(MenuController::new().state(), MenuState::Closed);
    }

    #[test]
    fn toggle_twice_restores_closed_and_scrolling() {
        let mut menu = MenuController::new();
        let open = menu.toggle();
        assert_eq!(menu.state(), MenuState::Open);
        assert_eq!(markers(&open), (Some(true), Some(true)));
        assert!(open.contains(&Effect::style(Target::Body, "overflow", "hidden")));

        let closed = menu.toggle();
        assert_eq!(menu.state(), MenuState::Closed);
        assert_eq!(markers(&closed), (Some(false), Some(false)));
        assert!(closed.contains(&Effect::style(Target::Body, "overflow", "auto")));
        assert_eq!(menu.transitions(), 2);
    }

    #[test]
    fn close_when_closed_is_noop() {
        let mut menu = MenuController::new();
        assert!(menu.close(CloseReason::Escape).is_empty());
        assert_eq!(menu.transitions(), 0);
    }

    #[test]
    fn close_from_open() {
        let mut menu = MenuController::new();
        menu.toggle();
        let effects = menu.close(CloseReason::OutsideClick);
        assert_eq!(markers(&effects), (Some(false), Some(false)));
        assert_eq!(menu.state(), MenuState::Closed);
    }
}
