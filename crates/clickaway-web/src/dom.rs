//! DOM implementation of the core `Platform`.
//!
//! Listeners go on the document in the capture phase so the check runs before
//! any bubbling handler can stop propagation. Timers use `window.setTimeout`.

use crate::error::{describe_js, WebError, WebResult};
use clickaway_core::{DocumentTree, EventHandler, Platform, Point, RawEvent, Task};
use std::time::Duration;
use tracing::{trace, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Document, Event, MouseEvent, Node, Window};

/// A DOM event with its type name read once.
#[derive(Debug, Clone)]
pub struct DomEvent {
    kind: String,
    event: Event,
}

impl DomEvent {
    pub fn new(event: Event) -> Self {
        Self {
            kind: event.type_(),
            event,
        }
    }

    pub fn as_event(&self) -> &Event {
        &self.event
    }
}

impl RawEvent for DomEvent {
    type Node = Node;

    fn kind(&self) -> &str {
        &self.kind
    }

    fn target(&self) -> Option<Node> {
        self.event
            .target()
            .and_then(|target| target.dyn_into::<Node>().ok())
    }

    fn client_position(&self) -> Option<Point> {
        self.event
            .dyn_ref::<MouseEvent>()
            .map(|mouse| Point::new(f64::from(mouse.client_x()), f64::from(mouse.client_y())))
    }
}

/// A registered capture listener. The closure must outlive the registration.
pub struct DomListener {
    name: String,
    closure: Closure<dyn FnMut(Event)>,
}

/// A pending `setTimeout`.
pub struct DomTimer {
    handle: i32,
    _closure: Closure<dyn FnMut()>,
}

/// Browser document and window.
#[derive(Debug, Clone)]
pub struct DomPlatform {
    window: Window,
    document: Document,
}

impl DomPlatform {
    /// Bind to the global window and its document.
    pub fn new() -> WebResult<Self> {
        let window = web_sys::window().ok_or(WebError::NoWindow)?;
        let document = window.document().ok_or(WebError::NoDocument)?;
        Ok(Self { window, document })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl DocumentTree for DomPlatform {
    type Node = Node;

    fn is_attached(&self, node: &Node) -> bool {
        self.document.contains(Some(node))
    }

    fn contains(&self, ancestor: &Node, node: &Node) -> bool {
        ancestor.contains(Some(node))
    }
}

impl Platform for DomPlatform {
    type Event = DomEvent;
    type Listener = DomListener;
    type Timer = DomTimer;

    fn add_capture_listener(
        &self,
        event_name: &str,
        handler: EventHandler<DomEvent>,
    ) -> Result<DomListener, String> {
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            handler(DomEvent::new(event));
        });

        let options = AddEventListenerOptions::new();
        options.set_capture(true);
        self.document
            .add_event_listener_with_callback_and_add_event_listener_options(
                event_name,
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|e| describe_js(&e))?;

        trace!(event_name, "capture listener added");
        Ok(DomListener {
            name: event_name.to_string(),
            closure,
        })
    }

    fn remove_capture_listener(&self, listener: DomListener) {
        if let Err(e) = self.document.remove_event_listener_with_callback_and_bool(
            &listener.name,
            listener.closure.as_ref().unchecked_ref(),
            true,
        ) {
            warn!(name = %listener.name, error = %describe_js(&e), "failed to remove listener");
        }
    }

    fn schedule(&self, delay: Duration, task: Task) -> Result<DomTimer, String> {
        let closure: Closure<dyn FnMut()> = Closure::once(move || task());
        let handle = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                timeout_millis(delay),
            )
            .map_err(|e| describe_js(&e))?;

        Ok(DomTimer {
            handle,
            _closure: closure,
        })
    }

    fn cancel(&self, timer: DomTimer) {
        self.window.clear_timeout_with_handle(timer.handle);
    }
}

/// `setTimeout` takes a signed 32-bit millisecond count.
fn timeout_millis(delay: Duration) -> i32 {
    i32::try_from(delay.as_millis()).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_millis() {
        assert_eq!(timeout_millis(Duration::ZERO), 0);
        assert_eq!(timeout_millis(Duration::from_millis(200)), 200);
        assert_eq!(timeout_millis(Duration::from_secs(u64::MAX / 1_000)), i32::MAX);
    }
}
