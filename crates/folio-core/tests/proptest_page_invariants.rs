//! Property-based invariant tests for the page reaction layer.
//!
//! Verifies:
//! 1.  Active link: after a frame, the active section is exactly the one
//!     containing scroll + offset (or none below the content)
//! 2.  Active link: at most one section is active and its links carry it
//! 3.  Menu: hamburger and menu markers always agree with the state
//! 4.  Menu: an even number of toggles leaves the menu closed
//! 5.  Debouncer: a burst fires once, with the last argument
//! 6.  Debouncer: nothing fires before the quiet window after the last call
//! 7.  Contact: missing required fields never produce success or a reset
//! 8.  Contact: the panel always hides once its own timer elapses
//! 9.  Keynav: never targets a section outside the page
//! 10. Font size: always one of the three configured sizes
//! 11. Timer queue: pops come out in non-decreasing deadline order

use std::time::Duration;

use folio_core::config::TypographyConfig;
use folio_core::keynav::{self, Direction};
use folio_core::layout::SectionBounds;
use folio_core::menu::MenuState;
use folio_core::nav::section_containing;
use folio_core::timer::{Debouncer, TimerQueue};
use folio_core::typography::font_size_for;
use folio_core::{
    Effect, KeyCode, KeyInput, Modifiers, Page, PageConfig, PageEvent, PageInventory,
    StaticLayout, Target,
};
use proptest::prelude::*;

// ── Strategy helpers ──────────────────────────────────────────────────

fn arb_section_heights() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(100.0f64..1500.0, 1..8)
}

fn arb_field() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-zA-Z ]{1,12}",
        "[a-z]{1,8}@[a-z]{1,8}\\.[a-z]{2,4}",
    ]
}

fn layout_for(heights: &[f64]) -> StaticLayout {
    let names: Vec<String> = (0..heights.len()).map(|i| format!("s{i}")).collect();
    let pairs: Vec<(&str, f64)> = names
        .iter()
        .map(String::as_str)
        .zip(heights.iter().copied())
        .collect();
    StaticLayout::stacked(72.0, 0.0, &pairs)
}

fn page_for(layout: &StaticLayout) -> Page {
    let mut page = Page::new(PageConfig::default());
    let inventory = PageInventory {
        nav_links: layout
            .sections
            .iter()
            .map(|s| format!("#{}", s.id))
            .collect(),
        viewport_width: 1280.0,
        ..PageInventory::default()
    };
    page.init(inventory, layout);
    page
}

fn marker(effects: &[Effect], which: &Target) -> Option<bool> {
    effects.iter().rev().find_map(|e| match e {
        Effect::SetClass {
            target, enabled, ..
        } if target == which => Some(*enabled),
        _ => None,
    })
}

fn total_height(sections: &[SectionBounds]) -> f64 {
    sections.last().map_or(0.0, SectionBounds::bottom)
}

// ── Properties ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn active_section_matches_reference_line(
        heights in arb_section_heights(),
        fraction in 0.0f64..1.2,
    ) {
        let base = layout_for(&heights);
        let scroll_y = total_height(&base.sections) * fraction;
        let layout = base.with_scroll(scroll_y);
        let mut page = page_for(&layout);

        page.dispatch(PageEvent::Scroll { scroll_y }, &layout);
        page.dispatch(PageEvent::AnimationFrame, &layout);

        let expected = section_containing(&layout.sections, scroll_y + 100.0);
        prop_assert_eq!(page.active_section(), expected);
        match expected {
            Some(idx) => prop_assert_eq!(page.active_links(), &[idx][..]),
            None => prop_assert!(page.active_links().is_empty()),
        }
    }

    #[test]
    fn menu_markers_follow_state(clicks in prop::collection::vec(0u8..3, 0..24)) {
        let layout = layout_for(&[800.0, 600.0]);
        let mut page = page_for(&layout);
        let mut toggles = 0usize;
        for click in clicks {
            let event = match click {
                0 => {
                    toggles += 1;
                    PageEvent::HamburgerClick
                }
                1 => PageEvent::DocumentClick { inside_hamburger: false, inside_menu: true },
                _ => PageEvent::DocumentClick { inside_hamburger: false, inside_menu: false },
            };
            let before = page.menu_state();
            let reaction = page.dispatch(event, &layout);
            let open = page.menu_state().is_open();
            if page.menu_state() != before {
                prop_assert_eq!(marker(&reaction.effects, &Target::Hamburger), Some(open));
                prop_assert_eq!(marker(&reaction.effects, &Target::NavMenu), Some(open));
            } else {
                prop_assert!(reaction.effects.is_empty());
            }
        }
        if toggles == 0 {
            prop_assert_eq!(page.menu_state(), MenuState::Closed);
        }
    }

    #[test]
    fn even_toggles_close_menu(pairs in 0usize..10) {
        let layout = layout_for(&[800.0]);
        let mut page = page_for(&layout);
        for _ in 0..pairs * 2 {
            page.dispatch(PageEvent::HamburgerClick, &layout);
        }
        prop_assert_eq!(page.menu_state(), MenuState::Closed);
    }

    #[test]
    fn debouncer_burst_fires_once_with_last_value(
        gaps in prop::collection::vec(0u64..250, 1..20),
    ) {
        let wait = Duration::from_millis(250);
        let mut debouncer = Debouncer::new(wait);
        let mut now = Duration::ZERO;
        let mut fired = Vec::new();
        for (i, gap) in gaps.iter().enumerate() {
            now += Duration::from_millis(*gap);
            if let Some(v) = debouncer.poll(now) {
                fired.push(v);
            }
            debouncer.call(i, now);
        }
        let last_call = now;
        prop_assert!(debouncer.poll(last_call + wait - Duration::from_millis(1)).is_none());
        if let Some(v) = debouncer.poll(last_call + wait) {
            fired.push(v);
        }
        prop_assert_eq!(fired, vec![gaps.len() - 1]);
        prop_assert!(!debouncer.is_pending());
    }

    #[test]
    fn incomplete_form_never_succeeds(
        name in arb_field(),
        email in arb_field(),
        message in arb_field(),
    ) {
        prop_assume!(name.is_empty() || email.is_empty() || message.is_empty());
        let layout = layout_for(&[800.0]);
        let mut page = page_for(&layout);
        let reaction = page.dispatch(
            PageEvent::Submit {
                fields: vec![
                    ("name".into(), name),
                    ("email".into(), email),
                    ("message".into(), message),
                ],
            },
            &layout,
        );
        prop_assert!(!reaction.effects.contains(&Effect::ResetForm));
        let succeeded = reaction.effects.iter().any(|e| matches!(
            e,
            Effect::SetText { text, .. } if text.starts_with('✅')
        ));
        prop_assert!(!succeeded);
    }

    #[test]
    fn panel_hides_after_latest_timer(
        submissions in prop::collection::vec((any::<bool>(), 0u64..6000), 1..6),
    ) {
        let layout = layout_for(&[800.0]);
        let mut page = page_for(&layout);
        let mut hide_at = Duration::ZERO;
        for (valid, gap) in submissions {
            page.advance_time(Duration::from_millis(gap));
            let email = if valid { "ada@example.com" } else { "nope" };
            page.dispatch(
                PageEvent::Submit {
                    fields: vec![
                        ("name".into(), "Ada".into()),
                        ("email".into(), email.into()),
                        ("message".into(), "hi".into()),
                    ],
                },
                &layout,
            );
            let delay = if valid { 5000 } else { 4000 };
            hide_at = page.now() + Duration::from_millis(delay);
        }
        prop_assert!(page.form_message_visible());
        page.set_time(hide_at - Duration::from_millis(1));
        page.tick();
        prop_assert!(page.form_message_visible());
        page.set_time(hide_at);
        page.tick();
        prop_assert!(!page.form_message_visible());
    }

    #[test]
    fn keynav_stays_in_bounds(
        heights in arb_section_heights(),
        fraction in 0.0f64..1.2,
        down in any::<bool>(),
    ) {
        let layout = layout_for(&heights);
        let scroll_y = total_height(&layout.sections) * fraction;
        let code = if down { KeyCode::Down } else { KeyCode::Up };
        let key = KeyInput::new(code, Modifiers::ALT);
        prop_assert!(Direction::from_key(&key).is_some());
        if let Some(Effect::ScrollIntoView { target: Target::Section(i), .. }) =
            keynav::navigate(&key, &layout.sections, scroll_y, 100.0)
        {
            prop_assert!(i < layout.sections.len());
            let current = keynav::current_section(&layout.sections, scroll_y, 100.0);
            prop_assert!(current.is_some());
            prop_assert_ne!(Some(i), current);
        }
    }

    #[test]
    fn font_size_is_configured_value(width in 0.0f64..4000.0) {
        let cfg = TypographyConfig::default();
        let px = font_size_for(width, &cfg);
        prop_assert!([cfg.small_px, cfg.medium_px, cfg.default_px].contains(&px));
    }

    #[test]
    fn timer_queue_pops_in_deadline_order(
        delays in prop::collection::vec(0u64..1000, 0..32),
    ) {
        let mut queue = TimerQueue::new();
        for (i, d) in delays.iter().enumerate() {
            queue.schedule(Duration::ZERO, Duration::from_millis(*d), (i, *d));
        }
        let popped = queue.pop_due(Duration::from_secs(2));
        prop_assert_eq!(popped.len(), delays.len());
        for pair in popped.windows(2) {
            let (ia, da) = pair[0];
            let (ib, db) = pair[1];
            prop_assert!(da < db || (da == db && ia < ib));
        }
        prop_assert!(queue.is_empty());
    }
}
