#![forbid(unsafe_code)]

//! Alt+Arrow section navigation.

use crate::effect::{Effect, ScrollBehavior, Target};
use crate::event::{KeyCode, KeyInput, Modifiers};
use crate::layout::SectionBounds;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

impl Direction {
    /// Direction bound to `key`, if any. Requires Alt.
    #[must_use]
    pub fn from_key(key: &KeyInput) -> Option<Self> {
        if !key.mods.contains(Modifiers::ALT) {
            return None;
        }
        match key.code {
            KeyCode::Down => Some(Self::Next),
            KeyCode::Up => Some(Self::Previous),
            _ => None,
        }
    }
}

/// Section whose viewport-relative bounds span the reference line
/// (inclusive at both edges).
#[must_use]
pub fn current_section(sections: &[SectionBounds], scroll_y: f64, line: f64) -> Option<usize> {
    sections.iter().position(|s| s.spans(scroll_y + line))
}

/// Neighbor of the current section in `direction`.
#[must_use]
pub fn neighbor(
    sections: &[SectionBounds],
    scroll_y: f64,
    line: f64,
    direction: Direction,
) -> Option<usize> {
    let current = current_section(sections, scroll_y, line)?;
    match direction {
        Direction::Next => Some(current + 1).filter(|&i| i < sections.len()),
        Direction::Previous => current.checked_sub(1),
    }
}

/// Scroll effect for a keydown, or `None` when the key does nothing.
#[must_use]
pub fn navigate(
    key: &KeyInput,
    sections: &[SectionBounds],
    scroll_y: f64,
    line: f64,
) -> Option<Effect> {
    let direction = Direction::from_key(key)?;
    let target = neighbor(sections, scroll_y, line, direction)?;
    tracing::debug!(target: "folio.keynav", ?direction, section = %sections[target].id, "section jump");
    Some(Effect::ScrollIntoView {
        target: Target::Section(target),
        behavior: ScrollBehavior::Smooth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::StaticLayout;

    fn sections() -> Vec<SectionBounds> {
        StaticLayout::stacked(70.0, 0.0, &[("home", 600.0), ("about", 500.0), ("contact", 400.0)])
            .sections
    }

    fn alt(code: KeyCode) -> KeyInput {
        KeyInput::new(code, Modifiers::ALT)
    }

    #[test]
    fn alt_down_moves_to_next() {
        let effect = navigate(&alt(KeyCode::Down), &sections(), 0.0, 100.0);
        assert_eq!(
            effect,
            Some(Effect::ScrollIntoView {
                target: Target::Section(1),
                behavior: ScrollBehavior::Smooth
            })
        );
    }

    #[test]
    fn alt_up_at_first_section_does_nothing() {
        assert_eq!(navigate(&alt(KeyCode::Up), &sections(), 0.0, 100.0), None);
    }

    #[test]
    fn alt_down_at_last_section_does_nothing() {
        assert_eq!(navigate(&alt(KeyCode::Down), &sections(), 1300.0, 100.0), None);
    }

    #[test]
    fn requires_alt() {
        let key = KeyInput::new(KeyCode::Down, Modifiers::empty());
        assert_eq!(navigate(&key, &sections(), 0.0, 100.0), None);
    }

    #[test]
    fn boundary_is_inclusive() {
        // Line at 600 is both the bottom of `home` and the top of `about`;
        // the first match in document order wins.
        assert_eq!(current_section(&sections(), 500.0, 100.0), Some(0));
    }

    #[test]
    fn no_current_section_below_content() {
        assert_eq!(
            navigate(&alt(KeyCode::Up), &sections(), 5000.0, 100.0),
            None
        );
    }
}
