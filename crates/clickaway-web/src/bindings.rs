//! JavaScript-facing API.
//!
//! Options objects use the same shape as the Rust options, with camelCase keys
//! accepted: `{ eventConfig: { mouseEvents: ["mousedown"] }, debounceTimeout: 200 }`.

use crate::dom::{DomEvent, DomPlatform};
use crate::error::{describe_js, WebError, WebResult};
use clickaway_core::{
    use_click_away, ClickAwayConfig, ClickAwayGuard, InputEvent, ListenerOptions, RegionRef,
    Verdict,
};
use js_sys::{Array, Function};
use std::rc::Rc;
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, Node};

fn parse_options(options: &JsValue) -> WebResult<ListenerOptions> {
    if options.is_undefined() || options.is_null() {
        return Ok(ListenerOptions::default());
    }
    let json = js_sys::JSON::stringify(options).map_err(|e| WebError::Js(describe_js(&e)))?;
    Ok(ListenerOptions::from_json(&String::from(json))?)
}

fn region_list(nodes: &Array) -> Vec<RegionRef<Node>> {
    nodes
        .iter()
        .filter_map(|value| value.dyn_into::<Node>().ok())
        .map(RegionRef::with_node)
        .collect()
}

fn js_callback(callback: Function) -> impl Fn(&InputEvent<DomEvent>) + 'static {
    move |input: &InputEvent<DomEvent>| {
        if let Err(e) = callback.call1(&JsValue::NULL, input.event().as_event()) {
            warn!(error = %describe_js(&e), "onClickAway threw");
        }
    }
}

/// Live registration returned by `attachClickAway`. Call `detach()` (or
/// `free()`) to remove its listeners.
#[wasm_bindgen]
pub struct ClickAwayHandle {
    region: RegionRef<Node>,
    guard: ClickAwayGuard<DomPlatform>,
}

#[wasm_bindgen]
impl ClickAwayHandle {
    /// Replace the options object.
    pub fn update(&self, options: JsValue) -> Result<(), JsValue> {
        self.guard.reconfigure(parse_options(&options)?);
        Ok(())
    }

    #[wasm_bindgen(js_name = setExclusions)]
    pub fn set_exclusions(&self, exclude: Array) {
        self.guard.set_exclusions(region_list(&exclude));
    }

    /// Point the watched region at another element, or at nothing.
    #[wasm_bindgen(js_name = setElement)]
    pub fn set_element(&self, element: Option<Node>) {
        match element {
            Some(node) => self.region.set(node),
            None => self.region.clear(),
        }
    }

    /// Feed an event by hand (test mode). Returns whether it was accepted.
    #[wasm_bindgen(js_name = handleEvent)]
    pub fn handle_event(&self, event: Event) -> bool {
        matches!(
            self.guard.handle_event(DomEvent::new(event)),
            Verdict::Dispatched | Verdict::Scheduled
        )
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.guard.is_mounted()
    }

    pub fn detach(self) {
        self.guard.detach();
    }
}

/// Watch `element` and call `onClickAway(event)` for interactions outside it
/// and outside every node in `exclude`.
#[wasm_bindgen(js_name = attachClickAway)]
pub fn attach_click_away(
    element: Node,
    on_click_away: Function,
    options: JsValue,
    exclude: Option<Array>,
) -> Result<ClickAwayHandle, JsValue> {
    let platform = Rc::new(DomPlatform::new()?);
    let options = parse_options(&options)?;
    let exclude = exclude.map(|nodes| region_list(&nodes)).unwrap_or_default();

    let region = RegionRef::with_node(element);
    let guard = use_click_away(
        platform,
        &region,
        js_callback(on_click_away),
        ClickAwayConfig::new(options).with_exclusions(exclude),
    );
    Ok(ClickAwayHandle { region, guard })
}

#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging_js(directives: Option<String>) {
    crate::logging::init_logging(directives.as_deref());
}
