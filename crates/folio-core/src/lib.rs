#![forbid(unsafe_code)]

//! Host-agnostic UI event-reaction layer for the portfolio page.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment (JS/WASM) pushes
//!   [`PageEvent`](event::PageEvent) values and applies the returned
//!   [`Effect`](effect::Effect) lists to the DOM.
//! - **Deterministic time**: the host advances a monotonic clock explicitly;
//!   every deferred reaction (debounce, auto-dismiss) goes through a timer
//!   queue that fires on [`Page::tick`](page::Page::tick).
//! - **No DOM access**: layout measurements come in through the
//!   [`LayoutProbe`](layout::LayoutProbe) trait, so the whole layer runs and
//!   tests natively.

pub mod clock;
pub mod config;
pub mod contact;
pub mod effect;
pub mod event;
pub mod keynav;
pub mod layout;
pub mod lazy_image;
pub mod menu;
pub mod nav;
pub mod overlay;
pub mod page;
pub mod perf;
pub mod resume;
pub mod reveal;
pub mod timer;
pub mod typography;

pub use config::{ConfigError, PageConfig};
pub use effect::{Effect, NodeId, OverlayId, Reaction, Target};
pub use event::{KeyCode, KeyInput, Modifiers, PageEvent};
pub use layout::{LayoutProbe, SectionBounds, StaticLayout};
pub use page::{Page, PageInventory};
