#![forbid(unsafe_code)]

//! Page orchestrator.
//!
//! [`Page`] owns every controller and routes [`PageEvent`]s to them. It is
//! the only stateful object a host needs:
//!
//! ```
//! use folio_core::{Page, PageConfig, PageEvent, PageInventory, StaticLayout};
//!
//! let layout = StaticLayout::stacked(70.0, 0.0, &[("home", 800.0), ("about", 600.0)]);
//! let mut page = Page::new(PageConfig::default());
//! let inventory = PageInventory {
//!     nav_links: vec!["#home".into(), "#about".into()],
//!     viewport_width: 1280.0,
//!     ..PageInventory::default()
//! };
//! let _ = page.init(inventory, &layout);
//!
//! let reaction = page.dispatch(PageEvent::HamburgerClick, &layout);
//! assert!(reaction.stop_propagation);
//! assert!(page.menu_state().is_open());
//! ```
//!
//! # Time
//!
//! The host sets the clock before dispatching ([`Page::set_time`]) and calls
//! [`Page::tick`] at [`Page::next_deadline`]. `dispatch` drains due timers
//! first, so effects always come out in deadline order.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clock::DeterministicClock;
use crate::config::PageConfig;
use crate::contact::{ContactForm, FormData, SubmitOutcome};
use crate::effect::{Effect, NodeId, ObserverKind, Reaction, Target};
use crate::event::{KeyCode, PageEvent};
use crate::keynav;
use crate::layout::LayoutProbe;
use crate::lazy_image::{LazyImage, LazyImageLoader};
use crate::menu::{CloseReason, MenuController, MenuState};
use crate::nav::NavController;
use crate::overlay::{NotificationKind, OverlayPresenter, OverlayStep, OverlayTimer};
use crate::perf::LongTaskMonitor;
use crate::resume;
use crate::reveal::{RevealCandidate, RevealController, RevealKind};
use crate::timer::{FrameGate, TimerQueue};
use crate::typography::FontSizer;

const RESUME_NOTICE: &str = "✅ Opening resume!";
const CARD_LIFT: &str = "translateY(-12px) scale(1.02)";
const SKILL_POP: &str = "scale(1.1)";

/// Browser capabilities reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub intersection_observer: bool,
    pub performance_observer: bool,
    /// `prefers-reduced-motion: reduce` matched.
    pub reduced_motion: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            intersection_observer: true,
            performance_observer: true,
            reduced_motion: false,
        }
    }
}

/// Skill item with the text of its `<p>` label, if it has one. Items
/// without a label still pop on click but get no touch tooltip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillItem {
    pub node: NodeId,
    pub label: Option<String>,
}

/// Tech icon with its `data-tech` label, if present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechIcon {
    pub node: NodeId,
    pub label: Option<String>,
}

/// Everything the host found in the markup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageInventory {
    /// `href` of each `.nav-link`, document order.
    pub nav_links: Vec<String>,
    pub reveal: Vec<RevealCandidate>,
    pub skill_items: Vec<SkillItem>,
    pub tech_icons: Vec<TechIcon>,
    pub lazy_images: Vec<LazyImage>,
    pub capabilities: Capabilities,
    pub viewport_width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageTimer {
    Overlay(OverlayTimer),
    HidePanel(u64),
    SkillPopReset(NodeId),
    BodyReveal,
}

#[derive(Debug)]
pub struct Page {
    config: PageConfig,
    clock: DeterministicClock,
    timers: TimerQueue<PageTimer>,
    frame: FrameGate,
    capabilities: Capabilities,
    menu: MenuController,
    nav: NavController,
    reveal: RevealController,
    contact: ContactForm,
    overlays: OverlayPresenter,
    fonts: FontSizer,
    images: LazyImageLoader,
    perf: LongTaskMonitor,
    skill_labels: HashMap<NodeId, Option<String>>,
    tech_labels: HashMap<NodeId, Option<String>>,
    project_cards: HashSet<NodeId>,
    initialized: bool,
    dispatched: u64,
}

impl Page {
    #[must_use]
    pub fn new(config: PageConfig) -> Self {
        Self {
            clock: DeterministicClock::new(),
            timers: TimerQueue::new(),
            frame: FrameGate::new(),
            capabilities: Capabilities::default(),
            menu: MenuController::new(),
            nav: NavController::new(config.nav.clone(), Vec::new()),
            reveal: RevealController::new(config.reveal.clone(), Vec::new()),
            contact: ContactForm::new(config.contact.clone()),
            overlays: OverlayPresenter::new(config.overlay.clone()),
            fonts: FontSizer::new(config.typography.clone()),
            images: LazyImageLoader::default(),
            perf: LongTaskMonitor::new(config.long_task_ms),
            skill_labels: HashMap::new(),
            tech_labels: HashMap::new(),
            project_cards: HashSet::new(),
            initialized: false,
            dispatched: 0,
            config,
        }
    }

    /// Bind the inventory and emit the load-time effects.
    pub fn init(&mut self, inventory: PageInventory, probe: &impl LayoutProbe) -> Reaction {
        let PageInventory {
            nav_links,
            reveal,
            skill_items,
            tech_icons,
            lazy_images,
            capabilities,
            viewport_width,
        } = inventory;

        self.capabilities = capabilities;
        self.project_cards = reveal
            .iter()
            .filter(|c| c.kind == RevealKind::ProjectCard)
            .map(|c| c.node)
            .collect();
        // Without visibility observation nothing would ever fade back in, so
        // candidates are left untouched.
        let reveal = if capabilities.intersection_observer {
            reveal
        } else {
            Vec::new()
        };
        let link_count = nav_links.len();
        self.nav = NavController::new(self.config.nav.clone(), nav_links);
        self.reveal = RevealController::new(self.config.reveal.clone(), reveal);
        self.images = if capabilities.intersection_observer {
            LazyImageLoader::new(lazy_images)
        } else {
            LazyImageLoader::default()
        };
        let skill_nodes: Vec<NodeId> = skill_items.iter().map(|s| s.node).collect();
        self.skill_labels = skill_items.into_iter().map(|s| (s.node, s.label)).collect();
        self.tech_labels = tech_icons.into_iter().map(|t| (t.node, t.label)).collect();

        let mut effects = self.reveal.prepare(capabilities.reduced_motion);
        effects.extend(self.reveal.stagger_skill_items(&skill_nodes));
        if capabilities.reduced_motion {
            effects.push(Effect::SuppressMotion);
        }
        effects.push(self.fonts.apply(viewport_width));
        effects.extend(self.images.observe_all());

        let scroll_y = probe.scroll_y();
        effects.extend(self.nav.reset(scroll_y));
        effects.extend(self.nav.update_active(scroll_y, &probe.sections()));
        effects.extend(MenuController::render(self.menu.state()));

        effects.push(Effect::class(Target::Body, "loaded", true));
        let now = self.clock.now();
        self.timers
            .schedule(now, self.config.body_reveal(), PageTimer::BodyReveal);

        self.initialized = true;
        tracing::info!(
            target: "folio.page",
            links = link_count,
            images = self.images.pending(),
            skills = skill_nodes.len(),
            reduced_motion = capabilities.reduced_motion,
            "page initialized"
        );
        Reaction::with_effects(effects)
    }

    /// React to one event.
    pub fn dispatch(&mut self, event: PageEvent, probe: &impl LayoutProbe) -> Reaction {
        let mut reaction = Reaction::with_effects(self.tick());
        self.dispatched += 1;
        tracing::trace!(target: "folio.page", event = event.name(), "dispatch");

        match event {
            PageEvent::AnchorClick { href } => {
                reaction.prevent_default = true;
                if let Some(scroll) = self.nav.scroll_to_anchor(&href, probe) {
                    reaction.effects.push(scroll);
                    reaction
                        .effects
                        .extend(self.menu.close(CloseReason::Navigation));
                }
            }
            PageEvent::HamburgerClick => {
                reaction.stop_propagation = true;
                reaction.effects.extend(self.menu.toggle());
            }
            PageEvent::DocumentClick {
                inside_hamburger,
                inside_menu,
            } => {
                if !inside_hamburger && !inside_menu {
                    reaction
                        .effects
                        .extend(self.menu.close(CloseReason::OutsideClick));
                }
            }
            PageEvent::BackToTopClick => {
                reaction.effects.push(NavController::scroll_to_top());
            }
            PageEvent::ResumeClick => {
                reaction.prevent_default = true;
                reaction.effects.extend(self.download_resume());
            }
            PageEvent::NodeClick { node } => {
                if self.skill_labels.contains_key(&node) {
                    reaction
                        .effects
                        .push(Effect::style(Target::Node(node), "transform", SKILL_POP));
                    self.schedule(
                        Duration::from_millis(self.config.overlay.skill_pop_ms),
                        PageTimer::SkillPopReset(node),
                    );
                }
            }
            PageEvent::PointerEnter { node } => {
                if let Some(label) = self.tech_labels.get(&node) {
                    let step = self.overlays.hover_enter(node, label.as_deref());
                    self.absorb(step, &mut reaction.effects);
                }
                if self.project_cards.contains(&node) {
                    reaction
                        .effects
                        .push(Effect::style(Target::Node(node), "transform", CARD_LIFT));
                }
            }
            PageEvent::PointerLeave { node } => {
                if self.tech_labels.contains_key(&node) {
                    let step = self.overlays.hover_leave(node);
                    self.absorb(step, &mut reaction.effects);
                }
                if self.project_cards.contains(&node) {
                    reaction
                        .effects
                        .push(Effect::style(Target::Node(node), "transform", ""));
                }
            }
            PageEvent::TouchStart { node } => {
                if let Some(Some(label)) = self.skill_labels.get(&node).cloned() {
                    let step = self.overlays.touch(node, &label);
                    self.absorb(step, &mut reaction.effects);
                }
            }
            PageEvent::Scroll { scroll_y } => {
                reaction.effects.extend(self.nav.on_scroll(scroll_y));
                reaction.request_frame = self.frame.request();
            }
            PageEvent::AnimationFrame => {
                if self.frame.take() {
                    let effects = self.nav.update_active(probe.scroll_y(), &probe.sections());
                    reaction.effects.extend(effects);
                }
            }
            PageEvent::Resize { width } => {
                let now = self.clock.now();
                self.fonts.on_resize(width, now);
            }
            PageEvent::KeyDown(key) => {
                if key.code == KeyCode::Escape {
                    reaction.effects.extend(self.menu.close(CloseReason::Escape));
                }
                let sections = probe.sections();
                if let Some(effect) = keynav::navigate(
                    &key,
                    &sections,
                    probe.scroll_y(),
                    self.config.nav.keynav_offset,
                ) {
                    reaction.prevent_default = true;
                    reaction.effects.push(effect);
                }
            }
            PageEvent::Intersection { observer, entries } => {
                let effects = match observer {
                    ObserverKind::Reveal => self.reveal.on_intersection(&entries),
                    ObserverKind::LazyImage => self.images.on_intersection(&entries),
                };
                reaction.effects.extend(effects);
            }
            PageEvent::FieldFocus { field } => {
                reaction.effects.push(self.contact.focus(field));
            }
            PageEvent::FieldBlur {
                field,
                value,
                required,
            } => {
                reaction
                    .effects
                    .push(self.contact.blur(field, &value, required));
            }
            PageEvent::Submit { fields } => {
                reaction.prevent_default = true;
                let data = FormData::from_pairs(fields);
                let (outcome, effects, generation) = self.contact.submit(&data);
                reaction.effects.extend(effects);
                let delay = match outcome {
                    SubmitOutcome::Accepted => self.contact.config().success_hide(),
                    SubmitOutcome::Rejected(_) => self.contact.config().error_hide(),
                };
                self.schedule(delay, PageTimer::HidePanel(generation));
            }
            PageEvent::LongTask { name, duration_ms } => {
                if self.capabilities.performance_observer {
                    self.perf.record(&name, duration_ms);
                }
            }
        }
        reaction
    }

    /// Open the resume and confirm with a notification.
    pub fn download_resume(&mut self) -> Vec<Effect> {
        let url = resume::resolve_download_url(&self.config.resume_link);
        tracing::info!(target: "folio.resume", %url, "opening resume");
        let mut effects = vec![Effect::OpenUrl {
            url,
            target: "_blank".to_string(),
        }];
        let step = self
            .overlays
            .notify(RESUME_NOTICE, NotificationKind::Success);
        self.absorb(step, &mut effects);
        effects
    }

    /// Fire every timer due at the current clock reading.
    pub fn tick(&mut self) -> Vec<Effect> {
        let now = self.clock.now();
        let mut effects = Vec::new();
        for timer in self.timers.pop_due(now) {
            match timer {
                PageTimer::Overlay(t) => effects.extend(self.overlays.fire(t)),
                PageTimer::HidePanel(generation) => {
                    effects.extend(self.contact.hide_panel(generation));
                }
                PageTimer::SkillPopReset(node) => {
                    effects.push(Effect::style(Target::Node(node), "transform", ""));
                }
                PageTimer::BodyReveal => {
                    effects.push(Effect::style(Target::Body, "opacity", "1"));
                }
            }
        }
        if let Some(effect) = self.fonts.poll(now) {
            effects.push(effect);
        }
        effects
    }

    /// Earliest time at which [`tick`](Self::tick) has work.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.timers.next_deadline(), self.fonts.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn set_time(&mut self, now: Duration) {
        self.clock.set(now);
    }

    pub fn advance_time(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    #[must_use]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    #[must_use]
    pub fn menu_state(&self) -> MenuState {
        self.menu.state()
    }

    /// Section index currently driving the active link.
    #[must_use]
    pub fn active_section(&self) -> Option<usize> {
        self.nav.active_section()
    }

    #[must_use]
    pub fn active_links(&self) -> &[usize] {
        self.nav.active_links()
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[must_use]
    pub fn form_message_visible(&self) -> bool {
        self.contact.panel_visible()
    }

    #[must_use]
    pub fn applied_font_size(&self) -> Option<u32> {
        self.fonts.applied()
    }

    #[must_use]
    pub fn live_overlays(&self) -> usize {
        self.overlays.live_count()
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Events dispatched since creation.
    #[must_use]
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    #[must_use]
    pub fn long_tasks_reported(&self) -> u64 {
        self.perf.reported()
    }

    fn schedule(&mut self, delay: Duration, timer: PageTimer) {
        let now = self.clock.now();
        self.timers.schedule(now, delay, timer);
    }

    fn absorb(&mut self, step: OverlayStep, effects: &mut Vec<Effect>) {
        effects.extend(step.effects);
        for (delay, timer) in step.timers {
            self.schedule(delay, PageTimer::Overlay(timer));
        }
    }
}
