#![forbid(unsafe_code)]

//! DOM side of the page: element lookup, layout measurement and effect
//! application.

use std::collections::HashMap;

use folio_core::effect::{ObserverKind, OverlaySpec, ScrollBehavior};
use folio_core::layout::{LayoutProbe, SectionBounds};
use folio_core::{Effect, NodeId, OverlayId, Target};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, HtmlFormElement, IntersectionObserver, ScrollIntoViewOptions,
    ScrollLogicalPosition, ScrollToOptions, Window,
};

use crate::options::Selectors;

const NODE_ATTR: &str = "data-folio-node";

/// Every element matching `selector`. An invalid selector matches nothing.
pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = document.query_selector_all(selector) else {
        tracing::warn!(target: "folio.web", selector, "invalid selector");
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn query_one(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

/// Scanned elements addressed by [`NodeId`]. The id is mirrored into a data
/// attribute so event targets map back without a search.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: Vec<Element>,
}

impl NodeRegistry {
    /// Id of `el`, assigning one on first sight.
    pub fn register(&mut self, el: &Element) -> NodeId {
        if let Some(id) = self.id_of(el) {
            return id;
        }
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        let _ = el.set_attribute(NODE_ATTR, &id.0.to_string());
        self.nodes.push(el.clone());
        id
    }

    pub fn id_of(&self, el: &Element) -> Option<NodeId> {
        let id = NodeId(el.get_attribute(NODE_ATTR)?.parse().ok()?);
        self.get(id).filter(|known| *known == el).map(|_| id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id.0 as usize)
    }

    pub fn clear(&mut self) {
        for el in self.nodes.drain(..) {
            let _ = el.remove_attribute(NODE_ATTR);
        }
    }
}

pub struct Dom {
    pub window: Window,
    pub document: Document,
    pub navbar: Option<HtmlElement>,
    pub hamburger: Option<Element>,
    pub nav_menu: Option<Element>,
    pub back_to_top: Option<Element>,
    pub form: Option<HtmlFormElement>,
    pub form_message: Option<Element>,
    pub nav_links: Vec<Element>,
    pub sections: Vec<HtmlElement>,
    pub nodes: NodeRegistry,
    overlays: HashMap<OverlayId, Element>,
    observers: HashMap<ObserverKind, IntersectionObserver>,
}

impl Dom {
    /// Resolve the fixed hooks. Missing ones stay `None`; the matching
    /// behaviors are simply never wired.
    pub fn bind(window: Window, document: Document, selectors: &Selectors) -> Self {
        let navbar = query_one(&document, &selectors.navbar).and_then(|e| e.dyn_into().ok());
        let form = query_one(&document, &selectors.contact_form).and_then(|e| e.dyn_into().ok());
        let sections = query_all(&document, &selectors.sections)
            .into_iter()
            .filter_map(|e| e.dyn_into::<HtmlElement>().ok())
            .collect();
        Self {
            hamburger: query_one(&document, &selectors.hamburger),
            nav_menu: query_one(&document, &selectors.nav_menu),
            back_to_top: query_one(&document, &selectors.back_to_top),
            form_message: query_one(&document, &selectors.form_message),
            nav_links: query_all(&document, &selectors.nav_links),
            navbar,
            form,
            sections,
            nodes: NodeRegistry::default(),
            overlays: HashMap::new(),
            observers: HashMap::new(),
            window,
            document,
        }
    }

    pub fn set_observer(&mut self, kind: ObserverKind, observer: IntersectionObserver) {
        if let Some(old) = self.observers.insert(kind, observer) {
            old.disconnect();
        }
    }

    /// Disconnect observers, drop overlays and forget scanned nodes.
    pub fn teardown(&mut self) {
        for (_, observer) in self.observers.drain() {
            observer.disconnect();
        }
        for (_, overlay) in self.overlays.drain() {
            overlay.remove();
        }
        self.nodes.clear();
    }

    /// Registered node for an event target, looking through descendants
    /// (an event on a label inside a skill item counts for the item).
    pub fn node_for(&self, target: &Element) -> Option<NodeId> {
        let owner = target
            .closest(&format!("[{NODE_ATTR}]"))
            .ok()
            .flatten()?;
        self.nodes.id_of(&owner)
    }

    pub fn contains(&self, container: Option<&Element>, target: Option<&Element>) -> bool {
        match (container, target) {
            (Some(c), Some(t)) => c.contains(Some(&**t)),
            _ => false,
        }
    }

    pub fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0)
    }

    fn resolve(&self, target: &Target) -> Option<Element> {
        match target {
            Target::Body => self.document.body().map(Element::from),
            Target::Root => self.document.document_element(),
            Target::Navbar => self.navbar.clone().map(Element::from),
            Target::NavMenu => self.nav_menu.clone(),
            Target::Hamburger => self.hamburger.clone(),
            Target::BackToTop => self.back_to_top.clone(),
            Target::NavLink(i) => self.nav_links.get(*i).cloned(),
            Target::Section(i) => self.sections.get(*i).cloned().map(Element::from),
            Target::Node(id) => self.nodes.get(*id).cloned(),
            Target::FormMessage => self.form_message.clone(),
            Target::Overlay(id) => self.overlays.get(id).cloned(),
        }
    }

    fn resolve_html(&self, target: &Target) -> Option<HtmlElement> {
        self.resolve(target)?.dyn_into().ok()
    }

    /// Apply effects in order. A failing effect is logged and skipped.
    pub fn apply(&mut self, effects: &[Effect]) {
        for effect in effects {
            if let Err(err) = self.apply_one(effect) {
                tracing::warn!(target: "folio.web", ?effect, ?err, "effect failed");
            }
        }
    }

    fn apply_one(&mut self, effect: &Effect) -> Result<(), JsValue> {
        match effect {
            Effect::SetClass {
                target,
                class,
                enabled,
            } => {
                if let Some(el) = self.resolve(target) {
                    el.class_list().toggle_with_force(class, *enabled)?;
                }
            }
            Effect::ReplaceClassName { target, class_name } => {
                if let Some(el) = self.resolve(target) {
                    el.set_class_name(class_name);
                }
            }
            Effect::SetStyle {
                target,
                property,
                value,
            } => {
                if let Some(el) = self.resolve_html(target) {
                    el.style().set_property(property, value)?;
                }
            }
            Effect::SetText { target, text } => {
                if let Some(el) = self.resolve(target) {
                    el.set_text_content(Some(text));
                }
            }
            Effect::SetAttribute {
                target,
                name,
                value,
            } => {
                if let Some(el) = self.resolve(target) {
                    el.set_attribute(name, value)?;
                }
            }
            Effect::ScrollTo { top, behavior } => {
                let options = ScrollToOptions::new();
                options.set_top(*top);
                options.set_behavior(web_behavior(*behavior));
                self.window.scroll_to_with_scroll_to_options(&options);
            }
            Effect::ScrollIntoView { target, behavior } => {
                if let Some(el) = self.resolve(target) {
                    let options = ScrollIntoViewOptions::new();
                    options.set_behavior(web_behavior(*behavior));
                    options.set_block(ScrollLogicalPosition::Start);
                    el.scroll_into_view_with_scroll_into_view_options(&options);
                }
            }
            Effect::Observe { target, observer } => {
                if let (Some(el), Some(obs)) = (self.resolve(target), self.observers.get(observer))
                {
                    obs.observe(&el);
                }
            }
            Effect::Unobserve { target, observer } => {
                if let (Some(el), Some(obs)) = (self.resolve(target), self.observers.get(observer))
                {
                    obs.unobserve(&el);
                }
            }
            Effect::CreateOverlay(spec) => self.create_overlay(spec)?,
            Effect::RemoveOverlay { id } => {
                if let Some(el) = self.overlays.remove(id) {
                    el.remove();
                }
            }
            Effect::ResetForm => {
                if let Some(form) = &self.form {
                    form.reset();
                }
            }
            Effect::OpenUrl { url, target } => {
                self.window.open_with_url_and_target(url, target)?;
            }
            Effect::SuppressMotion => self.suppress_motion(),
        }
        Ok(())
    }

    fn create_overlay(&mut self, spec: &OverlaySpec) -> Result<(), JsValue> {
        let parent = match &spec.parent {
            Some(target) => self.resolve(target),
            None => self.document.body().map(Element::from),
        };
        let Some(parent) = parent else {
            return Ok(());
        };
        let el = self.document.create_element("div")?;
        el.set_class_name(spec.kind.class_name());
        el.set_text_content(Some(&spec.text));
        el.set_attribute("style", &spec.style)?;
        parent.append_child(&el)?;
        self.overlays.insert(spec.id, el);
        Ok(())
    }

    fn suppress_motion(&self) {
        for el in query_all(&self.document, "*") {
            if let Ok(el) = el.dyn_into::<HtmlElement>() {
                let style = el.style();
                let _ = style.set_property("animation", "none");
                let _ = style.set_property("transition", "none");
            }
        }
    }
}

fn web_behavior(behavior: ScrollBehavior) -> web_sys::ScrollBehavior {
    match behavior {
        ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
        ScrollBehavior::Instant => web_sys::ScrollBehavior::Auto,
    }
}

impl LayoutProbe for Dom {
    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn nav_height(&self) -> f64 {
        self.navbar
            .as_ref()
            .map_or(0.0, |n| f64::from(n.offset_height()))
    }

    fn anchor_top(&self, fragment: &str) -> Option<f64> {
        let el: HtmlElement = self.document.get_element_by_id(fragment)?.dyn_into().ok()?;
        Some(f64::from(el.offset_top()))
    }

    fn sections(&self) -> Vec<SectionBounds> {
        self.sections
            .iter()
            .map(|s| {
                SectionBounds::new(
                    s.id(),
                    f64::from(s.offset_top()),
                    f64::from(s.offset_height()),
                )
            })
            .collect()
    }
}
