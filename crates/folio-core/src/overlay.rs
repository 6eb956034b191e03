#![forbid(unsafe_code)]

//! Transient overlays: hover tooltips, touch tooltips, and notifications.
//!
//! Every overlay is created and destroyed by the same invocation chain: the
//! creating call schedules its own removal, and nothing else holds its id
//! afterwards. Removal is fixed-delay and not cancelable.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::OverlayConfig;
use crate::effect::{Effect, NodeId, OverlayId, OverlayKind, OverlaySpec, Target};

const HOVER_TOOLTIP_STYLE: &str = "position: absolute; bottom: -35px; left: 50%; \
transform: translateX(-50%) scale(0.8); \
background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; \
padding: 6px 12px; border-radius: 8px; font-size: 0.85rem; font-weight: 600; \
white-space: nowrap; pointer-events: none; opacity: 0; transition: all 0.3s ease; \
box-shadow: 0 4px 12px rgba(0,0,0,0.15);";

const TOUCH_TOOLTIP_STYLE: &str = "position: absolute; top: -40px; left: 50%; \
transform: translateX(-50%); background: #1e293b; color: white; padding: 8px 12px; \
border-radius: 6px; font-size: 0.875rem; white-space: nowrap; z-index: 1000;";

const NOTIFICATION_STYLE: &str = "position: fixed; top: 100px; right: 20px; color: white; \
padding: 15px 25px; border-radius: 10px; box-shadow: 0 10px 30px rgba(102, 126, 234, 0.4); \
z-index: 10000; font-weight: 600; \
animation: slideInRight 0.4s ease, fadeOut 0.4s ease 2.6s; max-width: 350px; line-height: 1.5;";

/// Notification color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    #[default]
    Success,
    Warning,
}

impl NotificationKind {
    #[must_use]
    pub const fn background(self) -> &'static str {
        match self {
            Self::Success => "linear-gradient(135deg, #667eea, #764ba2)",
            Self::Warning => "linear-gradient(135deg, #f59e0b, #ef4444)",
        }
    }
}

/// Deferred overlay work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayTimer {
    FadeIn(OverlayId),
    Remove(OverlayId),
}

/// Effects to apply now plus timers to schedule relative to now.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayStep {
    pub effects: Vec<Effect>,
    pub timers: Vec<(Duration, OverlayTimer)>,
}

#[derive(Debug, Clone)]
pub struct OverlayPresenter {
    config: OverlayConfig,
    next_id: u64,
    live: HashSet<OverlayId>,
    /// Hover tooltips not yet fading out, oldest first.
    hover: HashMap<NodeId, Vec<OverlayId>>,
    fading: HashSet<OverlayId>,
    touch: HashMap<NodeId, OverlayId>,
}

impl OverlayPresenter {
    #[must_use]
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            config,
            next_id: 0,
            live: HashSet::new(),
            hover: HashMap::new(),
            fading: HashSet::new(),
            touch: HashMap::new(),
        }
    }

    /// Overlays currently in the DOM.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn has_touch_tooltip(&self, item: NodeId) -> bool {
        self.touch.contains_key(&item)
    }

    fn allocate(&mut self) -> OverlayId {
        let id = OverlayId(self.next_id);
        self.next_id += 1;
        self.live.insert(id);
        id
    }

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    /// Pointer entered a tech icon.
    pub fn hover_enter(&mut self, icon: NodeId, label: Option<&str>) -> OverlayStep {
        let Some(label) = label.filter(|l| !l.is_empty()) else {
            return OverlayStep::default();
        };
        let id = self.allocate();
        self.hover.entry(icon).or_default().push(id);
        OverlayStep {
            effects: vec![
                Effect::style(Target::Node(icon), "position", "relative"),
                Effect::CreateOverlay(OverlaySpec {
                    id,
                    kind: OverlayKind::HoverTooltip,
                    parent: Some(Target::Node(icon)),
                    text: label.to_string(),
                    style: HOVER_TOOLTIP_STYLE.to_string(),
                }),
            ],
            timers: vec![(
                Self::ms(self.config.tooltip_fade_in_ms),
                OverlayTimer::FadeIn(id),
            )],
        }
    }

    /// Pointer left a tech icon: fade out its oldest tooltip.
    pub fn hover_leave(&mut self, icon: NodeId) -> OverlayStep {
        let Some(id) = self.hover.get_mut(&icon).and_then(|ids| {
            if ids.is_empty() {
                None
            } else {
                Some(ids.remove(0))
            }
        }) else {
            return OverlayStep::default();
        };
        self.fading.insert(id);
        OverlayStep {
            effects: vec![
                Effect::style(Target::Overlay(id), "opacity", "0"),
                Effect::style(Target::Overlay(id), "transform", "translateX(-50%) scale(0.8)"),
            ],
            timers: vec![(
                Self::ms(self.config.tooltip_fade_out_ms),
                OverlayTimer::Remove(id),
            )],
        }
    }

    /// Touch on a skill item. At most one touch tooltip per item.
    pub fn touch(&mut self, item: NodeId, label: &str) -> OverlayStep {
        if self.touch.contains_key(&item) {
            return OverlayStep::default();
        }
        let id = self.allocate();
        self.touch.insert(item, id);
        OverlayStep {
            effects: vec![
                Effect::style(Target::Node(item), "position", "relative"),
                Effect::CreateOverlay(OverlaySpec {
                    id,
                    kind: OverlayKind::TouchTooltip,
                    parent: Some(Target::Node(item)),
                    text: label.to_string(),
                    style: TOUCH_TOOLTIP_STYLE.to_string(),
                }),
            ],
            timers: vec![(
                Self::ms(self.config.touch_tooltip_ms),
                OverlayTimer::Remove(id),
            )],
        }
    }

    /// Fixed-position banner appended to the body.
    pub fn notify(&mut self, message: &str, kind: NotificationKind) -> OverlayStep {
        let id = self.allocate();
        OverlayStep {
            effects: vec![Effect::CreateOverlay(OverlaySpec {
                id,
                kind: OverlayKind::Notification,
                parent: None,
                text: message.to_string(),
                style: format!("{NOTIFICATION_STYLE} background: {};", kind.background()),
            })],
            timers: vec![(
                Self::ms(self.config.notification_ms),
                OverlayTimer::Remove(id),
            )],
        }
    }

    pub fn fire(&mut self, timer: OverlayTimer) -> Vec<Effect> {
        match timer {
            OverlayTimer::FadeIn(id) => {
                if !self.live.contains(&id) || self.fading.contains(&id) {
                    return Vec::new();
                }
                vec![
                    Effect::style(Target::Overlay(id), "opacity", "1"),
                    Effect::style(Target::Overlay(id), "transform", "translateX(-50%) scale(1)"),
                ]
            }
            OverlayTimer::Remove(id) => {
                if !self.live.remove(&id) {
                    return Vec::new();
                }
                self.fading.remove(&id);
                self.touch.retain(|_, v| *v != id);
                for ids in self.hover.values_mut() {
                    ids.retain(|v| *v != id);
                }
                vec![Effect::RemoveOverlay { id }]
            }
        }
    }
}
