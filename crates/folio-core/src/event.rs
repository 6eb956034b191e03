#![forbid(unsafe_code)]

//! Input schema pushed by the host.
//!
//! The host translates DOM events into [`PageEvent`] values. Key events are
//! normalized (`key` string → [`KeyCode`]) and carry a compact modifier
//! bitset so recorded sessions stay small and stable.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::effect::{NodeId, ObserverKind};

bitflags! {
    /// Modifier keys held during a key event.
    ///
    /// Encoded as a compact `u8` bitset in JSON (`mods`).
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const SUPER = 0b1000;
    }
}

impl Modifiers {
    #[must_use]
    pub const fn from_bits_truncate_u8(bits: u8) -> Self {
        Self::from_bits_truncate(bits)
    }
}

impl Serialize for Modifiers {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for Modifiers {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u8::deserialize(deserializer).map(Self::from_bits_truncate_u8)
    }
}

/// Normalized key code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// Anything the page does not react to, kept for logs.
    Other(Box<str>),
}

/// Deterministic normalization of a DOM `KeyboardEvent.key` string.
#[must_use]
pub fn normalize_dom_key(dom_key: &str) -> KeyCode {
    let mut chars = dom_key.chars();
    if let Some(first) = chars.next()
        && chars.next().is_none()
    {
        return KeyCode::Char(first);
    }

    match dom_key {
        "Enter" => KeyCode::Enter,
        "Escape" | "Esc" => KeyCode::Escape,
        "Tab" => KeyCode::Tab,
        "ArrowUp" | "Up" => KeyCode::Up,
        "ArrowDown" | "Down" => KeyCode::Down,
        "ArrowLeft" | "Left" => KeyCode::Left,
        "ArrowRight" | "Right" => KeyCode::Right,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        other => KeyCode::Other(other.into()),
    }
}

/// A keydown event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInput {
    pub code: KeyCode,
    pub mods: Modifiers,
}

impl KeyInput {
    #[must_use]
    pub fn new(code: KeyCode, mods: Modifiers) -> Self {
        Self { code, mods }
    }

    /// Build from raw DOM fields.
    #[must_use]
    pub fn from_dom(key: &str, alt: bool, ctrl: bool, shift: bool, meta: bool) -> Self {
        let mut mods = Modifiers::empty();
        mods.set(Modifiers::ALT, alt);
        mods.set(Modifiers::CTRL, ctrl);
        mods.set(Modifiers::SHIFT, shift);
        mods.set(Modifiers::SUPER, meta);
        Self {
            code: normalize_dom_key(key),
            mods,
        }
    }
}

/// One visibility-change record from an observer callback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntersectionEntry {
    pub node: NodeId,
    pub is_intersecting: bool,
    pub ratio: f64,
}

/// Events the page reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageEvent {
    /// Click on an in-page link (`href` starts with `#`).
    AnchorClick { href: String },
    HamburgerClick,
    /// Document-level click that was not stopped by an element handler.
    DocumentClick {
        inside_hamburger: bool,
        inside_menu: bool,
    },
    BackToTopClick,
    ResumeClick,
    /// Click on a scanned element (skill items react).
    NodeClick { node: NodeId },
    PointerEnter { node: NodeId },
    PointerLeave { node: NodeId },
    TouchStart { node: NodeId },
    Scroll { scroll_y: f64 },
    /// Delivery of a frame requested through
    /// [`Reaction::request_frame`](crate::effect::Reaction::request_frame).
    AnimationFrame,
    Resize { width: f64 },
    KeyDown(KeyInput),
    Intersection {
        observer: ObserverKind,
        entries: Vec<IntersectionEntry>,
    },
    /// Focus on a contact form field, addressed by its scanned node.
    FieldFocus { field: NodeId },
    FieldBlur {
        field: NodeId,
        value: String,
        required: bool,
    },
    /// Contact form submission with its fields in form order.
    Submit { fields: Vec<(String, String)> },
    /// A performance entry reported by the host.
    LongTask { name: String, duration_ms: f64 },
}

impl PageEvent {
    /// Encode this event as a stable JSON string.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a previously encoded event.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AnchorClick { .. } => "anchor_click",
            Self::HamburgerClick => "hamburger_click",
            Self::DocumentClick { .. } => "document_click",
            Self::BackToTopClick => "back_to_top_click",
            Self::ResumeClick => "resume_click",
            Self::NodeClick { .. } => "node_click",
            Self::PointerEnter { .. } => "pointer_enter",
            Self::PointerLeave { .. } => "pointer_leave",
            Self::TouchStart { .. } => "touch_start",
            Self::Scroll { .. } => "scroll",
            Self::AnimationFrame => "animation_frame",
            Self::Resize { .. } => "resize",
            Self::KeyDown(_) => "key_down",
            Self::Intersection { .. } => "intersection",
            Self::FieldFocus { .. } => "field_focus",
            Self::FieldBlur { .. } => "field_blur",
            Self::Submit { .. } => "submit",
            Self::LongTask { .. } => "long_task",
        }
    }
}
