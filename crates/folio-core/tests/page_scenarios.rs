//! End-to-end scenarios driven through `Page::dispatch` with a static layout.

use std::time::Duration;

use folio_core::effect::{ObserverKind, ScrollBehavior};
use folio_core::event::IntersectionEntry;
use folio_core::lazy_image::LazyImage;
use folio_core::menu::MenuState;
use folio_core::page::{Capabilities, SkillItem, TechIcon};
use folio_core::reveal::{RevealCandidate, RevealKind};
use folio_core::{
    Effect, KeyCode, KeyInput, Modifiers, NodeId, Page, PageConfig, PageEvent, PageInventory,
    StaticLayout, Target,
};
use pretty_assertions::assert_eq;

fn layout() -> StaticLayout {
    StaticLayout::stacked(
        72.0,
        0.0,
        &[
            ("home", 800.0),
            ("about", 600.0),
            ("skills", 700.0),
            ("projects", 900.0),
            ("contact", 600.0),
        ],
    )
}

fn inventory() -> PageInventory {
    PageInventory {
        nav_links: ["#home", "#about", "#skills", "#projects", "#contact"]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
        reveal: vec![
            RevealCandidate {
                node: NodeId(1),
                kind: RevealKind::ProjectCard,
            },
            RevealCandidate {
                node: NodeId(2),
                kind: RevealKind::ProjectCard,
            },
            RevealCandidate {
                node: NodeId(3),
                kind: RevealKind::ContactForm,
            },
        ],
        skill_items: vec![
            SkillItem {
                node: NodeId(10),
                label: Some("Rust".into()),
            },
            SkillItem {
                node: NodeId(11),
                label: Some("React".into()),
            },
        ],
        tech_icons: vec![
            TechIcon {
                node: NodeId(20),
                label: Some("Node.js".into()),
            },
            TechIcon {
                node: NodeId(21),
                label: None,
            },
        ],
        lazy_images: vec![LazyImage {
            node: NodeId(30),
            deferred_src: "img/profile.webp".into(),
        }],
        capabilities: Capabilities::default(),
        viewport_width: 1280.0,
    }
}

fn ready_page() -> Page {
    let mut page = Page::new(PageConfig::default());
    page.init(inventory(), &layout());
    page
}

fn fields(name: &str, email: &str, message: &str) -> Vec<(String, String)> {
    vec![
        ("name".into(), name.into()),
        ("email".into(), email.into()),
        ("message".into(), message.into()),
    ]
}

fn submit(page: &mut Page, name: &str, email: &str, message: &str) -> Vec<Effect> {
    let reaction = page.dispatch(
        PageEvent::Submit {
            fields: fields(name, email, message),
        },
        &layout(),
    );
    assert!(reaction.prevent_default);
    reaction.effects
}

fn panel_text(effects: &[Effect]) -> Option<&str> {
    effects.iter().find_map(|e| match e {
        Effect::SetText {
            target: Target::FormMessage,
            text,
        } => Some(text.as_str()),
        _ => None,
    })
}

fn hides_panel(effects: &[Effect]) -> bool {
    effects.contains(&Effect::SetStyle {
        target: Target::FormMessage,
        property: "display".into(),
        value: "none".into(),
    })
}

#[test]
fn anchor_click_scrolls_below_navbar_and_closes_menu() {
    let mut page = ready_page();
    page.dispatch(PageEvent::HamburgerClick, &layout());
    assert_eq!(page.menu_state(), MenuState::Open);

    let reaction = page.dispatch(
        PageEvent::AnchorClick {
            href: "#projects".into(),
        },
        &layout(),
    );
    assert!(reaction.prevent_default);
    assert_eq!(
        reaction.effects[0],
        Effect::ScrollTo {
            top: 2100.0 - 72.0,
            behavior: ScrollBehavior::Smooth
        }
    );
    assert_eq!(page.menu_state(), MenuState::Closed);
    assert!(reaction.effects.contains(&Effect::SetStyle {
        target: Target::Body,
        property: "overflow".into(),
        value: "auto".into(),
    }));
}

#[test]
fn bare_hash_and_missing_target_are_silent() {
    let mut page = ready_page();
    page.dispatch(PageEvent::HamburgerClick, &layout());
    for href in ["#", "#missing"] {
        let reaction = page.dispatch(PageEvent::AnchorClick { href: href.into() }, &layout());
        assert!(reaction.prevent_default);
        assert!(reaction.effects.is_empty(), "{href} produced effects");
    }
    assert_eq!(page.menu_state(), MenuState::Open);
}

#[test]
fn outside_click_closes_but_inside_clicks_do_not() {
    let mut page = ready_page();
    let open = page.dispatch(PageEvent::HamburgerClick, &layout());
    assert!(open.stop_propagation);

    page.dispatch(
        PageEvent::DocumentClick {
            inside_hamburger: false,
            inside_menu: true,
        },
        &layout(),
    );
    assert_eq!(page.menu_state(), MenuState::Open);

    page.dispatch(
        PageEvent::DocumentClick {
            inside_hamburger: false,
            inside_menu: false,
        },
        &layout(),
    );
    assert_eq!(page.menu_state(), MenuState::Closed);
}

#[test]
fn toggling_twice_restores_closed_state() {
    let mut page = ready_page();
    page.dispatch(PageEvent::HamburgerClick, &layout());
    let reaction = page.dispatch(PageEvent::HamburgerClick, &layout());
    assert_eq!(page.menu_state(), MenuState::Closed);
    assert_eq!(
        reaction.effects,
        vec![
            Effect::SetClass {
                target: Target::Hamburger,
                class: "active".into(),
                enabled: false
            },
            Effect::SetClass {
                target: Target::NavMenu,
                class: "active".into(),
                enabled: false
            },
            Effect::SetStyle {
                target: Target::Body,
                property: "overflow".into(),
                value: "auto".into()
            },
        ]
    );
}

#[test]
fn scroll_frame_tracks_active_section() {
    let mut page = ready_page();
    let scrolled = layout().with_scroll(1350.0);
    let reaction = page.dispatch(PageEvent::Scroll { scroll_y: 1350.0 }, &scrolled);
    assert!(reaction.request_frame);
    assert!(reaction.effects.contains(&Effect::SetClass {
        target: Target::Navbar,
        class: "scrolled".into(),
        enabled: true
    }));
    assert!(reaction.effects.contains(&Effect::SetClass {
        target: Target::BackToTop,
        class: "show".into(),
        enabled: true
    }));

    let frame = page.dispatch(PageEvent::AnimationFrame, &scrolled);
    assert_eq!(page.active_section(), Some(2));
    assert_eq!(
        frame.effects,
        vec![
            Effect::SetClass {
                target: Target::NavLink(0),
                class: "active".into(),
                enabled: false
            },
            Effect::SetClass {
                target: Target::NavLink(2),
                class: "active".into(),
                enabled: true
            },
        ]
    );
}

#[test]
fn back_to_top_scrolls_to_zero() {
    let mut page = ready_page();
    let reaction = page.dispatch(PageEvent::BackToTopClick, &layout());
    assert_eq!(
        reaction.effects,
        vec![Effect::ScrollTo {
            top: 0.0,
            behavior: ScrollBehavior::Smooth
        }]
    );
}

#[test]
fn missing_fields_never_show_success() {
    let mut page = ready_page();
    let effects = submit(&mut page, "Ada", "", "hello");
    assert_eq!(
        panel_text(&effects),
        Some("❌ Please fill in all required fields")
    );
    assert!(!effects.contains(&Effect::ResetForm));
}

#[test]
fn invalid_email_keeps_form() {
    let mut page = ready_page();
    for email in ["foo@bar", "foo.com"] {
        let effects = submit(&mut page, "Ada", email, "hello");
        assert_eq!(
            panel_text(&effects),
            Some("❌ Please enter a valid email address")
        );
        assert!(!effects.contains(&Effect::ResetForm));
    }
}

#[test]
fn success_panel_hides_after_exactly_five_seconds() {
    let mut page = ready_page();
    page.set_time(Duration::from_secs(10));
    let effects = submit(&mut page, "Ada", "a@b.co", "hello");
    assert!(effects.contains(&Effect::ResetForm));
    assert!(page.form_message_visible());

    page.set_time(Duration::from_millis(14_999));
    assert!(!hides_panel(&page.tick()));
    assert!(page.form_message_visible());

    page.set_time(Duration::from_millis(15_000));
    assert!(hides_panel(&page.tick()));
    assert!(!page.form_message_visible());
}

#[test]
fn earlier_error_timer_does_not_cut_success_short() {
    let mut page = ready_page();
    page.set_time(Duration::from_secs(1));
    submit(&mut page, "", "", "");
    page.set_time(Duration::from_secs(3));
    submit(&mut page, "Ada", "a@b.co", "hello");

    // Error hide would land at 5s; success must survive until 8s.
    page.set_time(Duration::from_secs(5));
    assert!(!hides_panel(&page.tick()));
    assert!(page.form_message_visible());
    page.set_time(Duration::from_secs(8));
    assert!(hides_panel(&page.tick()));
}

fn border(field: NodeId, color: &str) -> Effect {
    Effect::SetStyle {
        target: Target::Node(field),
        property: "border-color".into(),
        value: color.into(),
    }
}

#[test]
fn field_borders_follow_the_field_node() {
    let mut page = ready_page();
    let subject = NodeId(40);

    let focus = page.dispatch(PageEvent::FieldFocus { field: subject }, &layout());
    assert_eq!(
        focus.effects,
        vec![border(subject, "#667eea")]
    );

    let blank = page.dispatch(
        PageEvent::FieldBlur {
            field: subject,
            value: "  ".into(),
            required: true,
        },
        &layout(),
    );
    assert_eq!(
        blank.effects,
        vec![border(subject, "#ef4444")]
    );

    let filled = page.dispatch(
        PageEvent::FieldBlur {
            field: subject,
            value: "Hello".into(),
            required: true,
        },
        &layout(),
    );
    assert_eq!(
        filled.effects,
        vec![border(subject, "#e0e0e0")]
    );
}

#[test]
fn font_size_tracks_breakpoints_after_quiet_window() {
    let mut page = ready_page();
    assert_eq!(page.applied_font_size(), Some(16));

    for (width, expected) in [(479.0, 14), (480.0, 15), (767.0, 15), (768.0, 16)] {
        let start = page.now();
        page.dispatch(PageEvent::Resize { width: 1000.0 }, &layout());
        page.advance_time(Duration::from_millis(100));
        page.dispatch(PageEvent::Resize { width }, &layout());
        assert_eq!(
            page.next_deadline(),
            Some(start + Duration::from_millis(350))
        );
        page.advance_time(Duration::from_millis(249));
        assert!(page.tick().is_empty());
        page.advance_time(Duration::from_millis(1));
        let effects = page.tick();
        assert_eq!(
            effects,
            vec![Effect::SetStyle {
                target: Target::Root,
                property: "font-size".into(),
                value: format!("{expected}px"),
            }]
        );
        assert_eq!(page.applied_font_size(), Some(expected));
    }
}

#[test]
fn resume_click_opens_direct_download_and_notifies() {
    let mut page = ready_page();
    let reaction = page.dispatch(PageEvent::ResumeClick, &layout());
    assert!(reaction.prevent_default);
    assert_eq!(
        reaction.effects[0],
        Effect::OpenUrl {
            url: "https://drive.google.com/uc?export=download&id=1mQsFi6SLc5CcW5IIb5jMJ9AoDXR1DCzs"
                .into(),
            target: "_blank".into(),
        }
    );
    assert_eq!(page.live_overlays(), 1);
    page.advance_time(Duration::from_millis(3000));
    let effects = page.tick();
    assert!(effects.iter().any(|e| matches!(e, Effect::RemoveOverlay { .. })));
    assert_eq!(page.live_overlays(), 0);
}

#[test]
fn tech_icon_tooltip_lifecycle() {
    let mut page = ready_page();
    assert!(page
        .dispatch(PageEvent::PointerEnter { node: NodeId(21) }, &layout())
        .effects
        .is_empty());

    let enter = page.dispatch(PageEvent::PointerEnter { node: NodeId(20) }, &layout());
    assert!(enter.effects.iter().any(|e| matches!(
        e,
        Effect::CreateOverlay(spec) if spec.text == "Node.js"
    )));
    page.advance_time(Duration::from_millis(10));
    let fade_in = page.tick();
    assert!(fade_in.iter().any(|e| matches!(
        e,
        Effect::SetStyle { property, value, .. } if property == "opacity" && value == "1"
    )));

    page.dispatch(PageEvent::PointerLeave { node: NodeId(20) }, &layout());
    page.advance_time(Duration::from_millis(300));
    assert!(page
        .tick()
        .iter()
        .any(|e| matches!(e, Effect::RemoveOverlay { .. })));
    assert_eq!(page.live_overlays(), 0);
}

#[test]
fn touch_tooltip_removed_after_two_seconds() {
    let mut page = ready_page();
    page.dispatch(PageEvent::TouchStart { node: NodeId(10) }, &layout());
    let again = page.dispatch(PageEvent::TouchStart { node: NodeId(10) }, &layout());
    assert!(again.effects.is_empty());
    assert_eq!(page.live_overlays(), 1);
    page.advance_time(Duration::from_millis(1999));
    page.tick();
    assert_eq!(page.live_overlays(), 1);
    page.advance_time(Duration::from_millis(1));
    page.tick();
    assert_eq!(page.live_overlays(), 0);
}

#[test]
fn unlabeled_skill_pops_without_tooltip() {
    let mut inventory = inventory();
    inventory.skill_items.push(SkillItem {
        node: NodeId(12),
        label: None,
    });
    let mut page = Page::new(PageConfig::default());
    page.init(inventory, &layout());

    let touch = page.dispatch(PageEvent::TouchStart { node: NodeId(12) }, &layout());
    assert!(touch.effects.is_empty());
    assert_eq!(page.live_overlays(), 0);

    let click = page.dispatch(PageEvent::NodeClick { node: NodeId(12) }, &layout());
    assert_eq!(click.effects.len(), 1);
}

#[test]
fn skill_click_pops_then_restores() {
    let mut page = ready_page();
    let reaction = page.dispatch(PageEvent::NodeClick { node: NodeId(11) }, &layout());
    assert_eq!(
        reaction.effects,
        vec![Effect::SetStyle {
            target: Target::Node(NodeId(11)),
            property: "transform".into(),
            value: "scale(1.1)".into()
        }]
    );
    page.advance_time(Duration::from_millis(200));
    assert!(page.tick().contains(&Effect::SetStyle {
        target: Target::Node(NodeId(11)),
        property: "transform".into(),
        value: String::new()
    }));
}

#[test]
fn reveal_and_lazy_images_fire_once() {
    let mut page = ready_page();
    let seen = |node| IntersectionEntry {
        node: NodeId(node),
        is_intersecting: true,
        ratio: 0.3,
    };
    let reveal = page.dispatch(
        PageEvent::Intersection {
            observer: ObserverKind::Reveal,
            entries: vec![seen(1), seen(3)],
        },
        &layout(),
    );
    assert_eq!(reveal.effects.len(), 6);
    let again = page.dispatch(
        PageEvent::Intersection {
            observer: ObserverKind::Reveal,
            entries: vec![seen(1)],
        },
        &layout(),
    );
    assert!(again.effects.is_empty());

    let image = page.dispatch(
        PageEvent::Intersection {
            observer: ObserverKind::LazyImage,
            entries: vec![seen(30)],
        },
        &layout(),
    );
    assert!(image.effects.contains(&Effect::Unobserve {
        target: Target::Node(NodeId(30)),
        observer: ObserverKind::LazyImage
    }));
}

#[test]
fn alt_arrows_jump_between_sections() {
    let mut page = ready_page();
    let at_about = layout().with_scroll(800.0);
    let down = page.dispatch(
        PageEvent::KeyDown(KeyInput::new(KeyCode::Down, Modifiers::ALT)),
        &at_about,
    );
    assert!(down.prevent_default);
    assert_eq!(
        down.effects,
        vec![Effect::ScrollIntoView {
            target: Target::Section(2),
            behavior: ScrollBehavior::Smooth
        }]
    );

    let plain = page.dispatch(
        PageEvent::KeyDown(KeyInput::new(KeyCode::Down, Modifiers::empty())),
        &at_about,
    );
    assert!(!plain.prevent_default);
    assert!(plain.effects.is_empty());
}

#[test]
fn without_intersection_observer_nothing_is_hidden() {
    let mut page = Page::new(PageConfig::default());
    let mut inv = inventory();
    inv.capabilities.intersection_observer = false;
    let reaction = page.init(inv, &layout());
    assert!(!reaction
        .effects
        .iter()
        .any(|e| matches!(e, Effect::Observe { .. })));
    assert!(!reaction.effects.iter().any(|e| matches!(
        e,
        Effect::SetStyle { property, value, .. } if property == "opacity" && value == "0"
    )));
}

#[test]
fn reduced_motion_suppresses_animation() {
    let mut page = Page::new(PageConfig::default());
    let mut inv = inventory();
    inv.capabilities.reduced_motion = true;
    let reaction = page.init(inv, &layout());
    assert!(reaction.effects.contains(&Effect::SuppressMotion));
}
