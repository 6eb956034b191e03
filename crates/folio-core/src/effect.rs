#![forbid(unsafe_code)]

//! DOM commands emitted by the reaction layer.
//!
//! The host applies effects in order. Effects reference elements through
//! [`Target`], never through live DOM handles, and serialize to stable JSON so
//! a session can be recorded and diffed.

use serde::{Deserialize, Serialize};

/// Host-assigned handle of a scanned element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Core-assigned handle of a transient overlay element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OverlayId(pub u64);

/// Element an effect applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "ref", rename_all = "snake_case")]
pub enum Target {
    Body,
    /// The document element (`<html>`).
    Root,
    Navbar,
    NavMenu,
    Hamburger,
    BackToTop,
    /// Navigation link by document order.
    NavLink(usize),
    /// Section by document order.
    Section(usize),
    Node(NodeId),
    /// The contact form's success/error message panel.
    FormMessage,
    Overlay(OverlayId),
}

/// Which visibility observer an element is registered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObserverKind {
    /// Scroll-triggered fade-in.
    Reveal,
    /// Deferred image loading.
    LazyImage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// Transient overlay flavors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayKind {
    /// Hover label over a tech icon.
    HoverTooltip,
    /// Touch label over a skill item.
    TouchTooltip,
    /// Fixed-position banner.
    Notification,
}

impl OverlayKind {
    /// CSS class carried by the created element.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::HoverTooltip => "tech-tooltip",
            Self::TouchTooltip => "mobile-tooltip",
            Self::Notification => "notification",
        }
    }
}

/// Everything the host needs to create an overlay element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlaySpec {
    pub id: OverlayId,
    pub kind: OverlayKind,
    /// Element to append to; `None` appends to `<body>`.
    pub parent: Option<Target>,
    pub text: String,
    /// Inline `cssText`.
    pub style: String,
}

/// One DOM command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Effect {
    /// Add (`enabled`) or remove a class marker.
    SetClass {
        target: Target,
        class: String,
        enabled: bool,
    },
    /// Overwrite the full `className`.
    ReplaceClassName { target: Target, class_name: String },
    /// Set one inline style property. An empty value clears it.
    SetStyle {
        target: Target,
        property: String,
        value: String,
    },
    SetText { target: Target, text: String },
    SetAttribute {
        target: Target,
        name: String,
        value: String,
    },
    /// Scroll the viewport to a document offset.
    ScrollTo { top: f64, behavior: ScrollBehavior },
    /// Scroll so the target's top edge aligns with the viewport's.
    ScrollIntoView {
        target: Target,
        behavior: ScrollBehavior,
    },
    Observe {
        target: Target,
        observer: ObserverKind,
    },
    Unobserve {
        target: Target,
        observer: ObserverKind,
    },
    CreateOverlay(OverlaySpec),
    RemoveOverlay { id: OverlayId },
    /// Reset every contact form field to its initial value.
    ResetForm,
    /// Open a URL in a browsing context (`_blank` for a new one).
    OpenUrl { url: String, target: String },
    /// Clear animations and transitions on every element.
    SuppressMotion,
}

impl Effect {
    pub(crate) fn class(target: Target, class: &str, enabled: bool) -> Self {
        Self::SetClass {
            target,
            class: class.to_string(),
            enabled,
        }
    }

    pub(crate) fn style(target: Target, property: &str, value: impl Into<String>) -> Self {
        Self::SetStyle {
            target,
            property: property.to_string(),
            value: value.into(),
        }
    }

    /// Encode this effect as a stable JSON string.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a previously encoded effect.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Result of dispatching one event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reaction {
    pub effects: Vec<Effect>,
    /// Suppress the browser's default action for the event.
    pub prevent_default: bool,
    /// Stop the event from reaching document-level listeners.
    pub stop_propagation: bool,
    /// The host must schedule an animation frame and dispatch
    /// [`PageEvent::AnimationFrame`](crate::event::PageEvent::AnimationFrame).
    pub request_frame: bool,
}

impl Reaction {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_effects(effects: Vec<Effect>) -> Self {
        Self {
            effects,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
            && !self.prevent_default
            && !self.stop_propagation
            && !self.request_frame
    }
}
