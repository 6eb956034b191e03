#![forbid(unsafe_code)]

//! Scroll-triggered fade-in.
//!
//! Candidates are reset synchronously (zero opacity, downward offset,
//! transition) before any of them is handed to the observer; the reset
//! effects always precede the `Observe` effects in the returned list. On first
//! visibility each candidate is moved to full opacity and zero offset and
//! marked `animated`. Later visibility changes emit nothing.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::RevealConfig;
use crate::effect::{Effect, NodeId, ObserverKind, Target};
use crate::event::IntersectionEntry;

const ANIMATED: &str = "animated";

/// Which kind of block a candidate is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealKind {
    ProjectCard,
    SkillCategory,
    DetailSection,
    AboutCard,
    ContactInfo,
    ContactForm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealCandidate {
    pub node: NodeId,
    pub kind: RevealKind,
}

/// Format seconds for CSS without float noise (`0.30000000000000004s`).
#[must_use]
pub fn css_secs(secs: f64) -> String {
    let rounded = (secs * 1000.0).round() / 1000.0;
    format!("{rounded}s")
}

#[derive(Debug, Clone)]
pub struct RevealController {
    config: RevealConfig,
    candidates: Vec<RevealCandidate>,
    animated: HashSet<NodeId>,
}

impl RevealController {
    #[must_use]
    pub fn new(config: RevealConfig, candidates: Vec<RevealCandidate>) -> Self {
        Self {
            config,
            candidates,
            animated: HashSet::new(),
        }
    }

    #[must_use]
    pub fn is_candidate(&self, node: NodeId) -> bool {
        self.candidates.iter().any(|c| c.node == node)
    }

    #[must_use]
    pub fn is_animated(&self, node: NodeId) -> bool {
        self.animated.contains(&node)
    }

    #[must_use]
    pub fn animated_count(&self) -> usize {
        self.animated.len()
    }

    /// Initial style reset followed by observer registration.
    #[must_use]
    pub fn prepare(&self, reduced_motion: bool) -> Vec<Effect> {
        let transition = if reduced_motion {
            "none".to_string()
        } else {
            let d = css_secs(self.config.duration_secs);
            format!("opacity {d} ease, transform {d} ease")
        };
        let offset = format!("translateY({}px)", self.config.offset_px);

        let mut effects = Vec::with_capacity(self.candidates.len() * 4);
        for c in &self.candidates {
            let target = Target::Node(c.node);
            effects.push(Effect::style(target.clone(), "opacity", "0"));
            effects.push(Effect::style(target.clone(), "transform", offset.clone()));
            effects.push(Effect::style(target, "transition", transition.clone()));
        }

        // Cards cascade in document order.
        if !reduced_motion {
            let cards = self
                .candidates
                .iter()
                .filter(|c| c.kind == RevealKind::ProjectCard);
            for (i, c) in cards.enumerate() {
                effects.push(Effect::style(
                    Target::Node(c.node),
                    "transition-delay",
                    css_secs(i as f64 * self.config.card_stagger_secs),
                ));
            }
        }

        effects.extend(self.candidates.iter().map(|c| Effect::Observe {
            target: Target::Node(c.node),
            observer: ObserverKind::Reveal,
        }));
        effects
    }

    /// Staggered entrance delays for skill items.
    #[must_use]
    pub fn stagger_skill_items(&self, items: &[NodeId]) -> Vec<Effect> {
        items
            .iter()
            .enumerate()
            .map(|(i, node)| {
                Effect::style(
                    Target::Node(*node),
                    "animation-delay",
                    css_secs(i as f64 * self.config.skill_stagger_secs),
                )
            })
            .collect()
    }

    pub fn on_intersection(&mut self, entries: &[IntersectionEntry]) -> Vec<Effect> {
        let mut effects = Vec::new();
        for entry in entries {
            if !entry.is_intersecting || !self.is_candidate(entry.node) {
                continue;
            }
            if !self.animated.insert(entry.node) {
                continue;
            }
            let target = Target::Node(entry.node);
            effects.push(Effect::style(target.clone(), "opacity", "1"));
            effects.push(Effect::style(target.clone(), "transform", "translateY(0)"));
            effects.push(Effect::class(target, ANIMATED, true));
        }
        effects
    }
}
