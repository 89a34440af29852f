//! Browser binding: [`WebDom`] over `web-sys` and the wasm entrypoint.
//!
//! ARCHITECTURE
//! ============
//! Listeners are installed once by delegation: click and change on the
//! document, submit on the form, `pageshow` on the window, and
//! `DOMContentLoaded` while the document is still loading. Each listener
//! translates the raw event into a [`PageEvent`] and hands it to the shared
//! controller, so rows added later need no listeners of their own.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Element, Event, EventTarget, HtmlElement, HtmlFormElement, HtmlInputElement,
    HtmlSelectElement, HtmlTextAreaElement, PageTransitionEvent,
};

use crate::config::{ConfigError, FormSelectors};
use crate::controller::{FormController, FormElements, MountError, PageEvent};
use crate::dom::{Document, FieldKind};
use crate::selector::Selector;

#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("no browser document available")]
    NoDocument,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Mount(#[from] MountError),
    #[error("failed to install {kind} listener: {message}")]
    Listener { kind: &'static str, message: String },
}

fn log_js_err<T>(what: &str, result: Result<T, JsValue>) {
    if let Err(err) = result {
        log::warn!("{what} failed: {err:?}");
    }
}

fn as_element(node: web_sys::Node, what: &str) -> Option<Element> {
    match node.dyn_into::<Element>() {
        Ok(el) => Some(el),
        Err(node) => {
            log::warn!("{what} returned non-element node {}", node.node_name());
            None
        }
    }
}

// =============================================================================
// DOCUMENT
// =============================================================================

/// [`Document`] backed by the live browser DOM.
pub struct WebDom {
    document: web_sys::Document,
}

impl WebDom {
    #[must_use]
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }
}

impl Document for WebDom {
    type Node = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query_selector_all(&self, scope: &Element, selector: &Selector) -> Vec<Element> {
        let list = match scope.query_selector_all(selector.as_str()) {
            Ok(list) => list,
            Err(err) => {
                log::warn!("querySelectorAll({selector}) failed: {err:?}");
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| as_element(node, "querySelectorAll"))
            .collect()
    }

    fn query_selector(&self, scope: &Element, selector: &Selector) -> Option<Element> {
        match scope.query_selector(selector.as_str()) {
            Ok(found) => found,
            Err(err) => {
                log::warn!("querySelector({selector}) failed: {err:?}");
                None
            }
        }
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        log_js_err("setAttribute", node.set_attribute(name, value));
    }

    fn field_kind(&self, node: &Element) -> FieldKind {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            return match input.type_().to_ascii_lowercase().as_str() {
                "checkbox" => FieldKind::Checkbox,
                "radio" => FieldKind::Radio,
                "submit" | "reset" | "button" | "image" | "file" => FieldKind::Button,
                _ => FieldKind::TextLike,
            };
        }
        if node.dyn_ref::<HtmlTextAreaElement>().is_some() {
            FieldKind::TextArea
        } else if node.dyn_ref::<HtmlSelectElement>().is_some() {
            FieldKind::Select
        } else {
            FieldKind::Other
        }
    }

    fn value(&self, node: &Element) -> String {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(area) = node.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else {
            String::new()
        }
    }

    fn set_value(&mut self, node: &Element, value: &str) {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(area) = node.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        } else if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        }
    }

    fn checked(&self, node: &Element) -> bool {
        node.dyn_ref::<HtmlInputElement>().is_some_and(HtmlInputElement::checked)
    }

    fn set_checked(&mut self, node: &Element, checked: bool) {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.set_checked(checked);
        }
    }

    fn set_selected_index(&mut self, node: &Element, index: usize) {
        let Some(select) = node.dyn_ref::<HtmlSelectElement>() else {
            return;
        };
        match i32::try_from(index) {
            Ok(index) => select.set_selected_index(index),
            Err(err) => log::warn!("option index out of range: {err}"),
        }
    }

    fn set_required(&mut self, node: &Element, required: bool) {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.set_required(required);
        } else if required {
            log_js_err("setAttribute(required)", node.set_attribute("required", ""));
        } else {
            log_js_err("removeAttribute(required)", node.remove_attribute("required"));
        }
    }

    fn reset_form(&mut self, form: &Element) {
        if let Some(form) = form.dyn_ref::<HtmlFormElement>() {
            form.reset();
        }
    }

    fn display(&self, node: &Element) -> String {
        let Some(el) = node.dyn_ref::<HtmlElement>() else {
            return String::new();
        };
        match el.style().get_property_value("display") {
            Ok(display) => display,
            Err(err) => {
                log::warn!("reading display failed: {err:?}");
                String::new()
            }
        }
    }

    fn set_display(&mut self, node: &Element, display: &str) {
        let Some(el) = node.dyn_ref::<HtmlElement>() else {
            return;
        };
        let style = el.style();
        if display.is_empty() {
            log_js_err("style.removeProperty(display)", style.remove_property("display"));
        } else {
            log_js_err("style.setProperty(display)", style.set_property("display", display));
        }
    }

    fn text(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text(&mut self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn clone_deep(&mut self, node: &Element) -> Option<Element> {
        match node.clone_node_with_deep(true) {
            Ok(copy) => as_element(copy, "cloneNode"),
            Err(err) => {
                log::warn!("cloneNode failed: {err:?}");
                None
            }
        }
    }

    fn append_child(&mut self, parent: &Element, child: &Element) {
        log_js_err("appendChild", parent.append_child(child));
    }

    fn remove(&mut self, node: &Element) {
        node.remove();
    }

    fn create_hidden_input(&mut self, name: &str, value: &str) -> Option<Element> {
        let el = match self.document.create_element("input") {
            Ok(el) => el,
            Err(err) => {
                log::warn!("createElement(input) failed: {err:?}");
                return None;
            }
        };
        let input = el.dyn_ref::<HtmlInputElement>()?;
        input.set_type("hidden");
        input.set_name(name);
        input.set_value(value);
        Some(el)
    }
}

// =============================================================================
// MOUNT
// =============================================================================

struct Mounted {
    dom: WebDom,
    controller: FormController<WebDom>,
}

type Shared = Rc<RefCell<Mounted>>;

/// Wasm entrypoint. `config` is an optional JSON object overriding element
/// ids and selectors.
///
/// # Errors
///
/// Returns the mount failure as a JS string after logging it.
#[wasm_bindgen(js_name = mountPlannerForm)]
pub fn mount_planner_form(config: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("console logger already installed");
    }
    mount(config.as_deref()).map_err(|err| {
        log::warn!("planner form not mounted: {err}");
        JsValue::from_str(&err.to_string())
    })
}

/// Locate the form, build the controller, and install listeners.
///
/// # Errors
///
/// Returns [`WebError`] if there is no document, a selector is invalid,
/// the form or row container is missing, or a listener cannot be added.
pub fn mount(config: Option<&str>) -> Result<(), WebError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or(WebError::NoDocument)?;

    let selectors = match config.map(FormSelectors::from_json) {
        Some(Ok(parsed)) => parsed,
        Some(Err(err)) => {
            log::warn!("ignoring form config: {err}");
            FormSelectors::default()
        }
        None => FormSelectors::default(),
    }
    .compile()?;

    let mut dom = WebDom::new(document.clone());
    let elements = FormElements::locate(&dom, &selectors.ids)?;
    let controller = FormController::initialize(&mut dom, selectors, elements);
    let form = controller.elements().form.clone();
    let shared: Shared = Rc::new(RefCell::new(Mounted { dom, controller }));

    listen(&document, "click", &shared, |event| target_element(event).map(PageEvent::Click))?;
    listen(&document, "change", &shared, |event| target_element(event).map(PageEvent::Change))?;
    listen(&form, "submit", &shared, |_| Some(PageEvent::Submit))?;
    if let Some(window) = web_sys::window() {
        listen(&window, "pageshow", &shared, |event| {
            event
                .dyn_ref::<PageTransitionEvent>()
                .map(|e| PageEvent::PageShow { persisted: e.persisted() })
        })?;
    }

    if document.ready_state() == "loading" {
        listen(&document, "DOMContentLoaded", &shared, |_| Some(PageEvent::ContentLoaded))?;
    } else {
        dispatch(&shared, &PageEvent::ContentLoaded);
    }

    log::info!("planner form mounted");
    Ok(())
}

fn target_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_ref::<Element>().cloned()
}

fn dispatch(shared: &Shared, event: &PageEvent<Element>) {
    let Ok(mut state) = shared.try_borrow_mut() else {
        log::warn!("re-entrant planner form event dropped: {event:?}");
        return;
    };
    let Mounted { dom, controller } = &mut *state;
    controller.handle(dom, event);
}

fn listen(
    target: &EventTarget,
    kind: &'static str,
    shared: &Shared,
    translate: fn(&Event) -> Option<PageEvent<Element>>,
) -> Result<(), WebError> {
    let shared = Rc::clone(shared);
    let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        if let Some(page_event) = translate(&event) {
            dispatch(&shared, &page_event);
        }
    });
    target
        .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
        .map_err(|err| WebError::Listener { kind, message: format!("{err:?}") })?;
    callback.forget();
    Ok(())
}
