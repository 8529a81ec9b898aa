//! Event classification: raw platform events into semantic groups.

use serde::{Deserialize, Serialize};

/// Client coordinates of a pointer event, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Semantic group an event kind belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventGroup {
    /// Mouse and pointer events (carry coordinates).
    Pointer,
    /// Touch events.
    Touch,
    /// Focus transitions.
    Focus,
    /// Key presses.
    Keyboard,
}

impl EventGroup {
    pub const ALL: [EventGroup; 4] = [
        EventGroup::Pointer,
        EventGroup::Touch,
        EventGroup::Focus,
        EventGroup::Keyboard,
    ];

    /// Classify a DOM event type name.
    ///
    /// Total: kinds that fit no group yield `None`.
    pub fn classify(kind: &str) -> Option<Self> {
        if kind.contains("mouse")
            || kind.starts_with("pointer")
            || matches!(kind, "click" | "dblclick" | "auxclick" | "contextmenu")
        {
            Some(EventGroup::Pointer)
        } else if kind.contains("touch") {
            Some(EventGroup::Touch)
        } else if kind.contains("focus") {
            Some(EventGroup::Focus)
        } else if matches!(kind, "keydown" | "keyup") {
            Some(EventGroup::Keyboard)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventGroup::Pointer => "pointer",
            EventGroup::Touch => "touch",
            EventGroup::Focus => "focus",
            EventGroup::Keyboard => "keyboard",
        }
    }
}

/// What the engine reads from a platform event.
pub trait RawEvent: Clone {
    /// Handle to a node in the host document.
    type Node: Clone;

    /// Event type name, e.g. `mousedown`.
    fn kind(&self) -> &str;

    /// Node the event was dispatched to, if any.
    fn target(&self) -> Option<Self::Node>;

    /// Client coordinates, for events that carry them.
    fn client_position(&self) -> Option<Point>;
}

/// A platform event tagged with its group. Built once at ingress.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent<E> {
    Pointer { event: E, position: Option<Point> },
    Touch { event: E },
    Focus { event: E },
    Keyboard { event: E },
    Unknown { event: E },
}

impl<E: RawEvent> InputEvent<E> {
    pub fn classify(event: E) -> Self {
        match EventGroup::classify(event.kind()) {
            Some(EventGroup::Pointer) => {
                let position = event.client_position();
                InputEvent::Pointer { event, position }
            }
            Some(EventGroup::Touch) => InputEvent::Touch { event },
            Some(EventGroup::Focus) => InputEvent::Focus { event },
            Some(EventGroup::Keyboard) => InputEvent::Keyboard { event },
            None => InputEvent::Unknown { event },
        }
    }
}

impl<E> InputEvent<E> {
    pub fn group(&self) -> Option<EventGroup> {
        match self {
            InputEvent::Pointer { .. } => Some(EventGroup::Pointer),
            InputEvent::Touch { .. } => Some(EventGroup::Touch),
            InputEvent::Focus { .. } => Some(EventGroup::Focus),
            InputEvent::Keyboard { .. } => Some(EventGroup::Keyboard),
            InputEvent::Unknown { .. } => None,
        }
    }

    /// The originating platform event.
    pub fn event(&self) -> &E {
        match self {
            InputEvent::Pointer { event, .. }
            | InputEvent::Touch { event }
            | InputEvent::Focus { event }
            | InputEvent::Keyboard { event }
            | InputEvent::Unknown { event } => event,
        }
    }

    pub fn into_event(self) -> E {
        match self {
            InputEvent::Pointer { event, .. }
            | InputEvent::Touch { event }
            | InputEvent::Focus { event }
            | InputEvent::Keyboard { event }
            | InputEvent::Unknown { event } => event,
        }
    }

    /// Pointer coordinates; `None` for every other group.
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::Pointer { position, .. } => *position,
            _ => None,
        }
    }
}
