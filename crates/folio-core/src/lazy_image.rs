#![forbid(unsafe_code)]

//! One-shot deferred image loading.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::effect::{Effect, NodeId, ObserverKind, Target};
use crate::event::IntersectionEntry;

const LOADED: &str = "loaded";

/// An `<img>` carrying a deferred source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LazyImage {
    pub node: NodeId,
    pub deferred_src: String,
}

#[derive(Debug, Clone, Default)]
pub struct LazyImageLoader {
    /// Images still waiting for their first intersection.
    pending: HashMap<NodeId, String>,
    loaded: usize,
}

impl LazyImageLoader {
    #[must_use]
    pub fn new(images: Vec<LazyImage>) -> Self {
        Self {
            pending: images
                .into_iter()
                .filter(|img| !img.deferred_src.is_empty())
                .map(|img| (img.node, img.deferred_src))
                .collect(),
            loaded: 0,
        }
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn loaded(&self) -> usize {
        self.loaded
    }

    /// Register every pending image with the observer.
    #[must_use]
    pub fn observe_all(&self) -> Vec<Effect> {
        let mut nodes: Vec<NodeId> = self.pending.keys().copied().collect();
        nodes.sort_unstable();
        nodes
            .into_iter()
            .map(|node| Effect::Observe {
                target: Target::Node(node),
                observer: ObserverKind::LazyImage,
            })
            .collect()
    }

    pub fn on_intersection(&mut self, entries: &[IntersectionEntry]) -> Vec<Effect> {
        let mut effects = Vec::new();
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            let Some(src) = self.pending.remove(&entry.node) else {
                continue;
            };
            let target = Target::Node(entry.node);
            effects.push(Effect::SetAttribute {
                target: target.clone(),
                name: "src".to_string(),
                value: src,
            });
            effects.push(Effect::class(target.clone(), LOADED, true));
            effects.push(Effect::Unobserve {
                target,
                observer: ObserverKind::LazyImage,
            });
            self.loaded += 1;
        }
        effects
    }
}
