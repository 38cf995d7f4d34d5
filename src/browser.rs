//! Browser bindings: `localStorage`, card controls, and the start-up entry.
//!
//! SYSTEM CONTEXT
//! ==============
//! Everything here requires a browser environment and is compiled only with
//! the `hydrate` feature. The logic lives in [`crate::sync`]; this module
//! adapts web-sys types to [`KeyValueStore`] and [`Control`] and wires click
//! listeners.

use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, HtmlElement, Storage};

use crate::config::{Config, GroupConfig};
use crate::consts::CONFIG_ELEMENT_ID;
use crate::error::StoreError;
use crate::store::KeyValueStore;
use crate::sync::{Bound, CardDisplay, Control, GroupSync, Visual};

fn js_reason(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

// =============================================================
// Storage
// =============================================================

/// Origin-scoped `localStorage`. Missing or disabled storage is kept as
/// `None` and reported on every access.
#[derive(Clone, Debug)]
pub struct BrowserStore {
    storage: Option<Storage>,
}

impl BrowserStore {
    #[must_use]
    pub fn local() -> Self {
        let storage = match web_sys::window().map(|w| w.local_storage()) {
            Some(Ok(storage)) => storage,
            Some(Err(e)) => {
                log::warn!("localStorage refused: {}", js_reason(&e));
                None
            }
            None => None,
        };
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, StoreError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("localStorage is not available".into()))
    }
}

impl KeyValueStore for BrowserStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StoreError::Unavailable(js_reason(&e)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| StoreError::Unavailable(js_reason(&e)))
    }
}

// =============================================================
// Controls
// =============================================================

/// A favorite or hide button and the card it sits in.
pub struct DomControl {
    button: Element,
    card: Option<HtmlElement>,
    id: Option<String>,
    active_class: Rc<str>,
}

impl DomControl {
    /// Resolve the nearest enclosing card of `button` and read its identifier.
    pub fn locate(button: Element, config: &Config, active_class: Rc<str>) -> Self {
        let card = match button.closest(&config.card_selector) {
            Ok(card) => card,
            Err(e) => {
                log::warn!("bad card selector {:?}: {}", config.card_selector, js_reason(&e));
                None
            }
        };
        let id = card.as_ref().and_then(|c| c.get_attribute(&config.id_attribute));
        let card = card.and_then(|c| c.dyn_ref::<HtmlElement>().cloned());
        Self { button, card, id, active_class }
    }
}

impl Control for DomControl {
    fn card_id(&self) -> Option<String> {
        self.id.clone()
    }

    fn is_active(&self) -> bool {
        self.button.class_list().contains(&self.active_class)
    }

    fn apply(&self, visual: Visual) {
        let classes = self.button.class_list();
        let marked = if visual.control_active {
            classes.add_1(&self.active_class)
        } else {
            classes.remove_1(&self.active_class)
        };
        if let Err(e) = marked {
            log::warn!("class update failed: {}", js_reason(&e));
        }

        let Some(card) = &self.card else {
            return;
        };
        let styled = match visual.card {
            CardDisplay::Unchanged => Ok(()),
            CardDisplay::Collapsed => card.style().set_property("display", "none"),
            CardDisplay::Restored => card.style().remove_property("display").map(|_| ()),
        };
        if let Err(e) = styled {
            log::warn!("card style update failed: {}", js_reason(&e));
        }
    }
}

// =============================================================
// Mounting
// =============================================================

fn query_elements(document: &Document, selector: &str) -> Result<Vec<Element>, JsValue> {
    let nodes = document.query_selector_all(selector)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_ref::<Element>().cloned())
        .collect())
}

fn bind_click(sync: &Rc<GroupSync<BrowserStore>>, binding: Bound<DomControl>) {
    let target = binding.control.button.clone();
    let sync = Rc::clone(sync);
    let cb = Closure::wrap(Box::new(move |event: Event| {
        event.prevent_default();
        event.stop_propagation();
        log::debug!("{}: clicked {}", sync.name(), binding.id);
        sync.toggle(&binding.control, &binding.id);
    }) as Box<dyn FnMut(Event)>);

    match target.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref::<js_sys::Function>()) {
        // Listeners live as long as the page.
        Ok(()) => cb.forget(),
        Err(e) => log::warn!("click listener not attached: {}", js_reason(&e)),
    }
}

fn mount_group(document: &Document, config: &Config, group: &GroupConfig, store: &BrowserStore) {
    let buttons = match query_elements(document, &group.control_selector) {
        Ok(buttons) => buttons,
        Err(e) => {
            log::warn!("{}: bad control selector: {}", group.name, js_reason(&e));
            return;
        }
    };
    let active_class: Rc<str> = Rc::from(config.active_class.as_str());
    let controls = buttons
        .into_iter()
        .map(|button| DomControl::locate(button, config, Rc::clone(&active_class)));

    let sync = Rc::new(GroupSync::new(store.clone(), group));
    for binding in sync.initialize(controls) {
        bind_click(&sync, binding);
    }
}

/// Bind both groups in `document`.
pub fn mount(document: &Document, config: &Config, store: &BrowserStore) {
    for group in config.groups() {
        mount_group(document, config, group, store);
    }
    log::info!("button handlers initialized");
}

/// Defaults, overridden by the page's inline JSON block when present.
fn read_config(document: &Document) -> Config {
    let Some(el) = document.get_element_by_id(CONFIG_ELEMENT_ID) else {
        return Config::default();
    };
    let raw = el.text_content().unwrap_or_default();
    match Config::from_json(&raw) {
        Ok(config) => config,
        Err(e) => {
            log::error!("ignoring #{CONFIG_ELEMENT_ID}: {e}");
            Config::default()
        }
    }
}

fn mount_document(document: &Document) {
    let config = read_config(document);
    mount(document, &config, &BrowserStore::local());
}

/// Module entry: mount once the document has been parsed.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        log::debug!("console logger already installed: {e}");
    }

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::warn!("no document; nothing to mount");
        return;
    };

    if document.ready_state() == "loading" {
        let doc = document.clone();
        let on_ready = Closure::once_into_js(move || mount_document(&doc));
        if let Err(e) = document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref::<js_sys::Function>()) {
            log::warn!("DOMContentLoaded listener not attached: {}", js_reason(&e));
        }
    } else {
        mount_document(&document);
    }
    log::debug!("card-marks loaded");
}
