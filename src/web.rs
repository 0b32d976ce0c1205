//! Browser backend: `web-sys` DOM access and `matchMedia` watchers.
//!
//! [`Engine`] shares one [`EngineCore`] between the change listeners of all
//! breakpoint groups through `Rc<RefCell<_>>`. Listeners are removed when the
//! engine is dropped; [`Engine::leak`] keeps them for the page lifetime.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::{Document, Element, Event, MediaQueryList};

use crate::config::{AdaptConfig, Mode};
use crate::dom::Dom;
use crate::engine::EngineCore;
use crate::error::{AdaptError, DomError};

const CHANGE_EVENT: &str = "change";

fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn browser_error(value: JsValue) -> DomError {
    DomError::Browser(js_message(&value))
}

/// [`Dom`] over the live browser document.
pub struct WebDom {
    document: Document,
}

impl WebDom {
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn elements_with_attribute(&self, name: &str) -> Vec<Element> {
        let list = match self.document.query_selector_all(&format!("[{name}]")) {
            Ok(list) => list,
            Err(err) => {
                tracing::warn!(attribute = name, error = %js_message(&err), "attribute scan failed");
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_ref::<Element>().cloned())
            .collect()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn query_selector(&self, selector: &str) -> Option<Element> {
        match self.document.query_selector(selector) {
            Ok(found) => found,
            Err(err) => {
                tracing::debug!(selector, error = %js_message(&err), "invalid selector");
                None
            }
        }
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn children(&self, node: &Element) -> Vec<Element> {
        let collection = node.children();
        (0..collection.length())
            .filter_map(|i| collection.item(i))
            .collect()
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&mut self, node: &Element, class: &str) -> Result<(), DomError> {
        node.class_list().add_1(class).map_err(browser_error)
    }

    fn remove_class(&mut self, node: &Element, class: &str) -> Result<(), DomError> {
        node.class_list().remove_1(class).map_err(browser_error)
    }

    fn append(&mut self, parent: &Element, node: &Element) -> Result<(), DomError> {
        parent.append_with_node_1(node).map_err(browser_error)
    }

    fn prepend(&mut self, parent: &Element, node: &Element) -> Result<(), DomError> {
        parent.prepend_with_node_1(node).map_err(browser_error)
    }

    fn insert_before(&mut self, reference: &Element, node: &Element) -> Result<(), DomError> {
        reference.before_with_node_1(node).map_err(browser_error)
    }
}

struct Watcher {
    list: MediaQueryList,
    listener: Closure<dyn FnMut(Event)>,
}

/// Live reflow engine bound to `window.matchMedia`.
pub struct Engine {
    core: Rc<RefCell<EngineCore<WebDom>>>,
    watchers: Vec<Watcher>,
}

impl Engine {
    /// Scan the current document, register one watcher per breakpoint and run
    /// each handler once so the page matches the current viewport.
    ///
    /// # Errors
    ///
    /// Returns [`AdaptError`] when there is no window/document or a query
    /// cannot be watched.
    pub fn new(config: AdaptConfig) -> Result<Self, AdaptError> {
        let window = web_sys::window().ok_or(AdaptError::NoWindow)?;
        let document = window.document().ok_or(AdaptError::NoDocument)?;
        let core = Rc::new(RefCell::new(EngineCore::new(WebDom::new(document), config)));

        let queries: Vec<String> = core
            .borrow()
            .groups()
            .iter()
            .map(|group| group.query().to_string())
            .collect();

        // On failure, dropping `engine` detaches the listeners attached so far.
        let mut engine = Self { core, watchers: Vec::with_capacity(queries.len()) };
        for (group, query) in queries.into_iter().enumerate() {
            if let Err(err) = engine.watch(&window, group, query) {
                engine.core.borrow_mut().restore();
                return Err(err);
            }
        }
        Ok(engine)
    }

    fn watch(&mut self, window: &web_sys::Window, group: usize, query: String) -> Result<(), AdaptError> {
        let list = window
            .match_media(&query)
            .map_err(|err| AdaptError::MediaQuery { query: query.clone(), message: js_message(&err) })?
            .ok_or_else(|| AdaptError::MediaQuery {
                query: query.clone(),
                message: "no MediaQueryList returned".into(),
            })?;

        let core_for_cb = Rc::clone(&self.core);
        let list_for_cb = list.clone();
        let listener = Closure::wrap(Box::new(move |_event: Event| {
            let matches = list_for_cb.matches();
            core_for_cb.borrow_mut().handle(group, matches);
        }) as Box<dyn FnMut(Event)>);

        list.add_event_listener_with_callback(CHANGE_EVENT, listener.as_ref().unchecked_ref())
            .map_err(|err| AdaptError::Listener { query, message: js_message(&err) })?;

        let matches = list.matches();
        self.watchers.push(Watcher { list, listener });
        self.core.borrow_mut().handle(group, matches);
        Ok(())
    }

    /// Shared engine state.
    #[must_use]
    pub fn core(&self) -> Rc<RefCell<EngineCore<WebDom>>> {
        Rc::clone(&self.core)
    }

    /// Keep every listener registered for the rest of the page session.
    pub fn leak(self) {
        std::mem::forget(self);
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        for watcher in &self.watchers {
            if let Err(err) = watcher
                .list
                .remove_event_listener_with_callback(CHANGE_EVENT, watcher.listener.as_ref().unchecked_ref())
            {
                tracing::debug!(error = %js_message(&err), "failed to detach media listener");
            }
        }
    }
}

/// Page entry point: start dynamic adapt with `mode` (`"min"` or `"max"`,
/// default `"max"`) and keep it running for the page lifetime.
///
/// # Errors
///
/// Returns the error message as a `JsValue` when the mode is invalid or the
/// engine cannot be set up.
#[wasm_bindgen(js_name = useDynamicAdapt)]
pub fn start(mode: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        tracing::debug!(error = %err, "console logger already installed");
    }

    let mode = match mode {
        Some(mode) => mode.parse::<Mode>().map_err(|err| JsValue::from_str(&err.to_string()))?,
        None => Mode::default(),
    };
    Engine::new(AdaptConfig::with_mode(mode))
        .map_err(|err| JsValue::from_str(&err.to_string()))?
        .leak();
    Ok(())
}
