#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use folio_core::effect::ObserverKind;
use folio_core::event::IntersectionEntry;
use folio_core::layout::LayoutProbe;
use folio_core::lazy_image::LazyImage;
use folio_core::page::{Capabilities, SkillItem, TechIcon};
use folio_core::reveal::RevealCandidate;
use folio_core::{KeyInput, NodeId, Page, PageEvent, PageInventory, Reaction};
use js_sys::{Array, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    Element, Event, EventTarget, HtmlFormElement, HtmlInputElement, HtmlTextAreaElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, KeyboardEvent,
    PerformanceEntry, PerformanceObserver, PerformanceObserverEntryList, Window,
};
use web_time::Instant;

use crate::dom::{Dom, query_all};
use crate::logging;
use crate::options::{Selectors, WebOptions};

type Shared = Rc<RefCell<Runtime>>;

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// Everything alive between `init` and `destroy`.
struct Runtime {
    page: Page,
    dom: Dom,
    origin: Instant,
    timeout: Option<i32>,
    frame: Option<i32>,
    listeners: Vec<Listener>,
    tick_cb: Option<Closure<dyn FnMut()>>,
    frame_cb: Option<Closure<dyn FnMut()>>,
    observer_cbs: Vec<Closure<dyn FnMut(Array)>>,
    long_tasks: Option<(
        PerformanceObserver,
        Closure<dyn FnMut(PerformanceObserverEntryList)>,
    )>,
}

impl Runtime {
    fn new(page: Page, dom: Dom) -> Self {
        Self {
            page,
            dom,
            origin: Instant::now(),
            timeout: None,
            frame: None,
            listeners: Vec::new(),
            tick_cb: None,
            frame_cb: None,
            observer_cbs: Vec::new(),
            long_tasks: None,
        }
    }

    fn sync_clock(&mut self) {
        self.page.set_time(self.origin.elapsed());
    }

    fn react(&mut self, event: PageEvent) -> Reaction {
        self.sync_clock();
        let reaction = self.page.dispatch(event, &self.dom);
        self.dom.apply(&reaction.effects);
        if reaction.request_frame {
            self.request_frame();
        }
        self.rearm();
        reaction
    }

    fn tick(&mut self) {
        self.timeout = None;
        self.sync_clock();
        let effects = self.page.tick();
        self.dom.apply(&effects);
        self.rearm();
    }

    /// Keep exactly one `setTimeout` pending, aimed at the next deadline.
    fn rearm(&mut self) {
        if let Some(handle) = self.timeout.take() {
            self.dom.window.clear_timeout_with_handle(handle);
        }
        let (Some(deadline), Some(cb)) = (self.page.next_deadline(), self.tick_cb.as_ref()) else {
            return;
        };
        let delay = deadline.saturating_sub(self.page.now());
        let ms = i32::try_from(delay.as_micros().div_ceil(1000)).unwrap_or(i32::MAX);
        match self
            .dom
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), ms)
        {
            Ok(handle) => self.timeout = Some(handle),
            Err(err) => tracing::warn!(target: "folio.web", ?err, "setTimeout failed"),
        }
    }

    fn request_frame(&mut self) {
        if self.frame.is_some() {
            return;
        }
        let Some(cb) = self.frame_cb.as_ref() else {
            return;
        };
        match self
            .dom
            .window
            .request_animation_frame(cb.as_ref().unchecked_ref())
        {
            Ok(handle) => self.frame = Some(handle),
            Err(err) => tracing::warn!(target: "folio.web", ?err, "requestAnimationFrame failed"),
        }
    }

    fn teardown(&mut self) {
        for listener in self.listeners.drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.kind,
                listener.callback.as_ref().unchecked_ref(),
            );
        }
        if let Some(handle) = self.timeout.take() {
            self.dom.window.clear_timeout_with_handle(handle);
        }
        if let Some(handle) = self.frame.take() {
            let _ = self.dom.window.cancel_animation_frame(handle);
        }
        if let Some((observer, _)) = self.long_tasks.take() {
            observer.disconnect();
        }
        self.dom.teardown();
        self.observer_cbs.clear();
        self.tick_cb = None;
        self.frame_cb = None;
    }
}

/// Portfolio page binding.
///
/// ```js
/// const page = new PortfolioWeb();
/// page.init({ log_level: "debug", selectors: { hamburger: "#burger" } });
/// ```
#[wasm_bindgen]
pub struct PortfolioWeb {
    runtime: Option<Shared>,
}

#[wasm_bindgen]
impl PortfolioWeb {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { runtime: None }
    }

    /// Scan the document, attach listeners and run the load-time reactions.
    ///
    /// `options` is an optional plain object: page configuration keys at the
    /// top level plus a `selectors` object. Calling `init` twice rebinds.
    pub fn init(&mut self, options: Option<JsValue>) -> Result<(), JsValue> {
        let options = parse_options(options)?;
        self.destroy();
        logging::init(&options.page.log_level);

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let mut dom = Dom::bind(window.clone(), document, &options.selectors);
        let capabilities = detect_capabilities(&window);
        let inventory = scan(&mut dom, &options.selectors, capabilities);

        let shared: Shared = Rc::new(RefCell::new(Runtime::new(
            Page::new(options.page.clone()),
            dom,
        )));
        install_timers(&shared)?;
        if capabilities.intersection_observer {
            let reveal = IntersectionObserverInit::new();
            reveal.set_threshold(&JsValue::from_f64(options.page.reveal.threshold));
            reveal.set_root_margin(&options.page.reveal.root_margin);
            install_observer(&shared, ObserverKind::Reveal, Some(&reveal))?;
            install_observer(&shared, ObserverKind::LazyImage, None)?;
        }
        if capabilities.performance_observer {
            install_long_tasks(&shared);
        }
        wire(&shared, &options.selectors, &window);

        {
            let mut rt = busy(shared.try_borrow_mut())?;
            rt.sync_clock();
            let Runtime { page, dom, .. } = &mut *rt;
            let reaction = page.init(inventory, &*dom);
            dom.apply(&reaction.effects);
            rt.rearm();
        }
        self.runtime = Some(shared);
        Ok(())
    }

    /// Open the resume the same way the page buttons do.
    #[wasm_bindgen(js_name = downloadResume)]
    pub fn download_resume(&self) {
        let Some(shared) = &self.runtime else {
            return;
        };
        let Ok(mut rt) = shared.try_borrow_mut() else {
            return;
        };
        rt.sync_clock();
        let effects = rt.page.download_resume();
        rt.dom.apply(&effects);
        rt.rearm();
    }

    #[wasm_bindgen(js_name = isInitialized)]
    pub fn is_initialized(&self) -> bool {
        self.runtime.is_some()
    }

    /// Remove every listener, observer and pending callback.
    pub fn destroy(&mut self) {
        if let Some(shared) = self.runtime.take()
            && let Ok(mut rt) = shared.try_borrow_mut()
        {
            rt.teardown();
        }
    }
}

impl Drop for PortfolioWeb {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn busy<T, E>(borrow: Result<T, E>) -> Result<T, JsValue> {
    borrow.map_err(|_| JsValue::from_str("page runtime is busy"))
}

fn parse_options(options: Option<JsValue>) -> Result<WebOptions, JsValue> {
    let json = match options {
        Some(value) if !value.is_undefined() && !value.is_null() => {
            String::from(js_sys::JSON::stringify(&value)?)
        }
        _ => String::new(),
    };
    WebOptions::from_json_str(&json).map_err(|err| JsValue::from_str(&err.to_string()))
}

fn detect_capabilities(window: &Window) -> Capabilities {
    let has = |name: &str| Reflect::has(window, &JsValue::from_str(name)).unwrap_or(false);
    let reduced_motion = window
        .match_media("(prefers-reduced-motion: reduce)")
        .ok()
        .flatten()
        .is_some_and(|query| query.matches());
    Capabilities {
        intersection_observer: has("IntersectionObserver"),
        performance_observer: has("PerformanceObserver"),
        reduced_motion,
    }
}

fn scan(dom: &mut Dom, selectors: &Selectors, capabilities: Capabilities) -> PageInventory {
    let document = dom.document.clone();
    let nav_links = dom
        .nav_links
        .iter()
        .map(|a| a.get_attribute("href").unwrap_or_default())
        .collect();

    let mut reveal = Vec::new();
    for (kind, selector) in selectors.reveal_groups() {
        for el in query_all(&document, selector) {
            reveal.push(RevealCandidate {
                node: dom.nodes.register(&el),
                kind,
            });
        }
    }
    let skill_items = query_all(&document, &selectors.skill_items)
        .iter()
        .map(|el| SkillItem {
            node: dom.nodes.register(el),
            label: el
                .query_selector("p")
                .ok()
                .flatten()
                .and_then(|p| p.text_content()),
        })
        .collect();
    let tech_icons = query_all(&document, &selectors.tech_icons)
        .iter()
        .map(|el| TechIcon {
            node: dom.nodes.register(el),
            label: el.get_attribute("data-tech"),
        })
        .collect();
    let lazy_images = query_all(&document, &selectors.lazy_images)
        .iter()
        .map(|el| LazyImage {
            node: dom.nodes.register(el),
            deferred_src: el.get_attribute("data-src").unwrap_or_default(),
        })
        .collect();
    if let Some(form) = dom.form.clone() {
        for field in form_controls(&form) {
            dom.nodes.register(&field);
        }
    }

    PageInventory {
        nav_links,
        reveal,
        skill_items,
        tech_icons,
        lazy_images,
        capabilities,
        viewport_width: dom.viewport_width(),
    }
}

fn install_timers(shared: &Shared) -> Result<(), JsValue> {
    let weak = Rc::downgrade(shared);
    let tick = Closure::wrap(Box::new(move || {
        if let Some(shared) = weak.upgrade()
            && let Ok(mut rt) = shared.try_borrow_mut()
        {
            rt.tick();
        }
    }) as Box<dyn FnMut()>);

    let weak = Rc::downgrade(shared);
    let frame = Closure::wrap(Box::new(move || {
        if let Some(shared) = weak.upgrade()
            && let Ok(mut rt) = shared.try_borrow_mut()
        {
            rt.frame = None;
            let _ = rt.react(PageEvent::AnimationFrame);
        }
    }) as Box<dyn FnMut()>);

    let mut rt = busy(shared.try_borrow_mut())?;
    rt.tick_cb = Some(tick);
    rt.frame_cb = Some(frame);
    Ok(())
}

fn install_observer(
    shared: &Shared,
    kind: ObserverKind,
    init: Option<&IntersectionObserverInit>,
) -> Result<(), JsValue> {
    let weak = Rc::downgrade(shared);
    let callback = Closure::wrap(Box::new(move |entries: Array| {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let Ok(mut rt) = shared.try_borrow_mut() else {
            return;
        };
        let entries = entries
            .iter()
            .filter_map(|e| e.dyn_into::<IntersectionObserverEntry>().ok())
            .filter_map(|e| {
                Some(IntersectionEntry {
                    node: rt.dom.node_for(&e.target())?,
                    is_intersecting: e.is_intersecting(),
                    ratio: e.intersection_ratio(),
                })
            })
            .collect();
        let _ = rt.react(PageEvent::Intersection {
            observer: kind,
            entries,
        });
    }) as Box<dyn FnMut(Array)>);

    let observer = match init {
        Some(init) => IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), init)?,
        None => IntersectionObserver::new(callback.as_ref().unchecked_ref())?,
    };
    let mut rt = busy(shared.try_borrow_mut())?;
    rt.dom.set_observer(kind, observer);
    rt.observer_cbs.push(callback);
    Ok(())
}

fn install_long_tasks(shared: &Shared) {
    let weak = Rc::downgrade(shared);
    let callback = Closure::wrap(Box::new(move |list: PerformanceObserverEntryList| {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        for entry in list
            .get_entries()
            .iter()
            .filter_map(|e| e.dyn_into::<PerformanceEntry>().ok())
        {
            let _ = dispatch(
                &shared,
                PageEvent::LongTask {
                    name: entry.name(),
                    duration_ms: entry.duration(),
                },
            );
        }
    }) as Box<dyn FnMut(PerformanceObserverEntryList)>);

    let Ok(observer) = PerformanceObserver::new(callback.as_ref().unchecked_ref()) else {
        return;
    };
    let init = js_sys::Object::new();
    let types = Array::of2(&JsValue::from_str("measure"), &JsValue::from_str("longtask"));
    let observed = Reflect::set(&init, &JsValue::from_str("entryTypes"), &types)
        .and_then(|_| Reflect::get(&observer, &JsValue::from_str("observe")))
        .and_then(|f| f.dyn_into::<js_sys::Function>())
        .and_then(|f| f.call1(&observer, &init));
    // Browsers without `longtask` entries reject the call.
    if let Err(err) = observed {
        tracing::debug!(target: "folio.perf", ?err, "long-task observation unavailable");
        return;
    }
    if let Ok(mut rt) = shared.try_borrow_mut() {
        rt.long_tasks = Some((observer, callback));
    }
}

fn dispatch(shared: &Shared, event: PageEvent) -> Option<Reaction> {
    let Ok(mut rt) = shared.try_borrow_mut() else {
        tracing::warn!(target: "folio.web", event = event.name(), "re-entrant dispatch dropped");
        return None;
    };
    Some(rt.react(event))
}

/// Attach `kind` on `target`; `translate` maps the DOM event to a page event
/// (or `None` to ignore it).
fn listen(
    shared: &Shared,
    target: &EventTarget,
    kind: &'static str,
    translate: impl Fn(&Dom, &Event) -> Option<PageEvent> + 'static,
) {
    let weak: Weak<RefCell<Runtime>> = Rc::downgrade(shared);
    let callback = Closure::wrap(Box::new(move |event: Event| {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let Ok(mut rt) = shared.try_borrow_mut() else {
            return;
        };
        let Some(page_event) = translate(&rt.dom, &event) else {
            return;
        };
        let reaction = rt.react(page_event);
        drop(rt);
        if reaction.prevent_default {
            event.prevent_default();
        }
        if reaction.stop_propagation {
            event.stop_propagation();
        }
    }) as Box<dyn FnMut(Event)>);

    if let Err(err) =
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
    {
        tracing::warn!(target: "folio.web", kind, ?err, "listener not attached");
        return;
    }
    if let Ok(mut rt) = shared.try_borrow_mut() {
        rt.listeners.push(Listener {
            target: target.clone(),
            kind,
            callback,
        });
    }
}

/// Registered nodes matching `selector`.
fn registered(shared: &Shared, selector: &str) -> Vec<(Element, NodeId)> {
    let Ok(rt) = shared.try_borrow() else {
        return Vec::new();
    };
    query_all(&rt.dom.document, selector)
        .into_iter()
        .filter_map(|el| {
            let id = rt.dom.nodes.id_of(&el)?;
            Some((el, id))
        })
        .collect()
}

fn event_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into().ok()
}

fn form_controls(form: &HtmlFormElement) -> Vec<Element> {
    let Ok(list) = form.query_selector_all("input, textarea") else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
        .collect()
}

fn field_value(el: &Element) -> String {
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else {
        String::new()
    }
}

fn form_fields(form: &HtmlFormElement) -> Vec<(String, String)> {
    let Ok(data) = web_sys::FormData::new_with_form(form) else {
        return Vec::new();
    };
    let Ok(Some(entries)) = js_sys::try_iter(&data) else {
        return Vec::new();
    };
    entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let pair = Array::from(&entry);
            Some((pair.get(0).as_string()?, pair.get(1).as_string()?))
        })
        .collect()
}

fn wire(shared: &Shared, selectors: &Selectors, window: &Window) {
    let (document, hamburger, back_to_top, form) = {
        let Ok(rt) = shared.try_borrow() else {
            return;
        };
        (
            rt.dom.document.clone(),
            rt.dom.hamburger.clone(),
            rt.dom.back_to_top.clone(),
            rt.dom.form.clone(),
        )
    };

    for anchor in query_all(&document, &selectors.anchors) {
        let el = anchor.clone();
        listen(shared, &anchor, "click", move |_, _| {
            let href = el.get_attribute("href")?;
            Some(PageEvent::AnchorClick { href })
        });
    }
    if let Some(hamburger) = &hamburger {
        listen(shared, hamburger, "click", |_, _| Some(PageEvent::HamburgerClick));
    }
    listen(shared, &document, "click", |dom, event| {
        let target = event_element(event);
        Some(PageEvent::DocumentClick {
            inside_hamburger: dom.contains(dom.hamburger.as_ref(), target.as_ref()),
            inside_menu: dom.contains(dom.nav_menu.as_ref(), target.as_ref()),
        })
    });
    if let Some(button) = &back_to_top {
        listen(shared, button, "click", |_, _| Some(PageEvent::BackToTopClick));
    }
    for selector in &selectors.resume_buttons {
        if let Some(button) = crate::dom::query_one(&document, selector) {
            listen(shared, &button, "click", |_, _| Some(PageEvent::ResumeClick));
        }
    }

    listen(shared, window, "scroll", |dom, _| {
        Some(PageEvent::Scroll {
            scroll_y: dom.scroll_y(),
        })
    });
    listen(shared, window, "resize", |dom, _| {
        Some(PageEvent::Resize {
            width: dom.viewport_width(),
        })
    });
    listen(shared, &document, "keydown", |_, event| {
        let key = event.dyn_ref::<KeyboardEvent>()?;
        Some(PageEvent::KeyDown(KeyInput::from_dom(
            &key.key(),
            key.alt_key(),
            key.ctrl_key(),
            key.shift_key(),
            key.meta_key(),
        )))
    });

    for (el, node) in registered(shared, &selectors.skill_items) {
        listen(shared, &el, "click", move |_, _| Some(PageEvent::NodeClick { node }));
        listen(shared, &el, "touchstart", move |_, _| {
            Some(PageEvent::TouchStart { node })
        });
    }
    for selector in [&selectors.tech_icons, &selectors.project_cards] {
        for (el, node) in registered(shared, selector) {
            listen(shared, &el, "mouseenter", move |_, _| {
                Some(PageEvent::PointerEnter { node })
            });
            listen(shared, &el, "mouseleave", move |_, _| {
                Some(PageEvent::PointerLeave { node })
            });
        }
    }

    let Some(form) = form else {
        return;
    };
    listen(shared, &form, "submit", |dom, _| {
        let form = dom.form.as_ref()?;
        Some(PageEvent::Submit {
            fields: form_fields(form),
        })
    });
    let fields: Vec<(Element, NodeId)> = {
        let Ok(rt) = shared.try_borrow() else {
            return;
        };
        form_controls(&form)
            .into_iter()
            .filter_map(|el| {
                let id = rt.dom.nodes.id_of(&el)?;
                Some((el, id))
            })
            .collect()
    };
    for (field, node) in fields {
        listen(shared, &field, "focus", move |_, _| {
            Some(PageEvent::FieldFocus { field: node })
        });
        let el = field.clone();
        listen(shared, &field, "blur", move |_, _| {
            Some(PageEvent::FieldBlur {
                field: node,
                value: field_value(&el),
                required: el.has_attribute("required"),
            })
        });
    }
}
