//! In-memory platform for deterministic tests.
//!
//! Provides a node tree with attach/detach, a capture-listener table keyed by
//! event name, and a manual clock. Nothing runs until the test calls
//! [`SimPlatform::dispatch`] or [`SimPlatform::advance`].

use crate::event::{Point, RawEvent};
use crate::platform::{DocumentTree, EventHandler, Platform, Task};
use std::cell::{Cell, RefCell};
use std::time::Duration;
use tracing::trace;

/// Node handle in a [`SimPlatform`] tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimNode(usize);

/// Event delivered by [`SimPlatform::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimEvent {
    pub kind: String,
    pub target: Option<SimNode>,
    pub position: Option<Point>,
}

impl SimEvent {
    pub fn new(kind: impl Into<String>, target: SimNode) -> Self {
        Self {
            kind: kind.into(),
            target: Some(target),
            position: None,
        }
    }

    /// An event whose target is null.
    pub fn untargeted(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            target: None,
            position: None,
        }
    }

    /// Set client coordinates.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Point::new(x, y));
        self
    }
}

impl RawEvent for SimEvent {
    type Node = SimNode;

    fn kind(&self) -> &str {
        &self.kind
    }

    fn target(&self) -> Option<SimNode> {
        self.target
    }

    fn client_position(&self) -> Option<Point> {
        self.position
    }
}

/// Registration handle returned by [`SimPlatform`].
#[derive(Debug)]
pub struct SimListener(u64);

/// Timer handle returned by [`SimPlatform`].
#[derive(Debug)]
pub struct SimTimer(u64);

struct NodeEntry {
    parent: Option<SimNode>,
    /// Still linked under `parent`.
    linked: bool,
}

struct ListenerEntry {
    id: u64,
    name: String,
    handler: EventHandler<SimEvent>,
}

struct TimerEntry {
    id: u64,
    due_ms: u64,
    task: Task,
}

pub struct SimPlatform {
    nodes: RefCell<Vec<NodeEntry>>,
    listeners: RefCell<Vec<ListenerEntry>>,
    timers: RefCell<Vec<TimerEntry>>,
    now_ms: Cell<u64>,
    next_id: Cell<u64>,
}

impl SimPlatform {
    /// A document containing only its root node.
    pub fn new() -> Self {
        Self {
            nodes: RefCell::new(vec![NodeEntry {
                parent: None,
                linked: true,
            }]),
            listeners: RefCell::new(Vec::new()),
            timers: RefCell::new(Vec::new()),
            now_ms: Cell::new(0),
            next_id: Cell::new(0),
        }
    }

    pub fn root(&self) -> SimNode {
        SimNode(0)
    }

    /// Append a new node under `parent`.
    pub fn create_node(&self, parent: SimNode) -> SimNode {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(NodeEntry {
            parent: Some(parent),
            linked: true,
        });
        SimNode(nodes.len() - 1)
    }

    /// Unlink `node` (and with it its subtree) from its parent.
    pub fn detach(&self, node: SimNode) {
        if let Some(entry) = self.nodes.borrow_mut().get_mut(node.0) {
            entry.linked = false;
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }

    /// Deliver an event to every listener registered for its kind, in
    /// registration order. Returns how many listeners ran.
    pub fn dispatch(&self, event: SimEvent) -> usize {
        let handlers: Vec<EventHandler<SimEvent>> = self
            .listeners
            .borrow()
            .iter()
            .filter(|entry| entry.name == event.kind)
            .map(|entry| entry.handler.clone())
            .collect();

        trace!(kind = %event.kind, listeners = handlers.len(), "sim dispatch");
        for handler in &handlers {
            handler(event.clone());
        }
        handlers.len()
    }

    /// Move the clock forward by `ms`, running due timers in order.
    /// Timers scheduled while advancing run too if they fall due in the window.
    pub fn advance(&self, ms: u64) {
        let until = self.now_ms.get() + ms;
        while let Some(entry) = self.take_next_due(until) {
            self.now_ms.set(entry.due_ms);
            trace!(id = entry.id, at = entry.due_ms, "sim timer fired");
            (entry.task)();
        }
        self.now_ms.set(until);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Registered event names, in registration order.
    pub fn listened_names(&self) -> Vec<String> {
        self.listeners
            .borrow()
            .iter()
            .map(|entry| entry.name.clone())
            .collect()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    fn take_next_due(&self, until: u64) -> Option<TimerEntry> {
        let mut timers = self.timers.borrow_mut();
        let index = timers
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due_ms <= until)
            .min_by_key(|(_, entry)| (entry.due_ms, entry.id))
            .map(|(index, _)| index)?;
        Some(timers.remove(index))
    }

    fn next_id(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }
}

impl Default for SimPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentTree for SimPlatform {
    type Node = SimNode;

    fn is_attached(&self, node: &SimNode) -> bool {
        let nodes = self.nodes.borrow();
        let mut current = *node;
        loop {
            let Some(entry) = nodes.get(current.0) else {
                return false;
            };
            match entry.parent {
                None => return current == self.root(),
                Some(parent) if entry.linked => current = parent,
                Some(_) => return false,
            }
        }
    }

    fn contains(&self, ancestor: &SimNode, node: &SimNode) -> bool {
        let nodes = self.nodes.borrow();
        let mut current = Some(*node);
        while let Some(candidate) = current {
            if candidate == *ancestor {
                return true;
            }
            current = nodes.get(candidate.0).and_then(|entry| entry.parent);
        }
        false
    }
}

impl Platform for SimPlatform {
    type Event = SimEvent;
    type Listener = SimListener;
    type Timer = SimTimer;

    fn add_capture_listener(
        &self,
        event_name: &str,
        handler: EventHandler<SimEvent>,
    ) -> Result<SimListener, String> {
        if event_name.is_empty() {
            return Err("empty event name".into());
        }
        let id = self.next_id();
        self.listeners.borrow_mut().push(ListenerEntry {
            id,
            name: event_name.to_string(),
            handler,
        });
        Ok(SimListener(id))
    }

    fn remove_capture_listener(&self, listener: SimListener) {
        self.listeners
            .borrow_mut()
            .retain(|entry| entry.id != listener.0);
    }

    fn schedule(&self, delay: Duration, task: Task) -> Result<SimTimer, String> {
        let id = self.next_id();
        let due_ms = self.now_ms.get() + delay.as_millis() as u64;
        self.timers.borrow_mut().push(TimerEntry { id, due_ms, task });
        Ok(SimTimer(id))
    }

    fn cancel(&self, timer: SimTimer) {
        self.timers.borrow_mut().retain(|entry| entry.id != timer.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_tree_queries() {
        let sim = SimPlatform::new();
        let panel = sim.create_node(sim.root());
        let button = sim.create_node(panel);
        let other = sim.create_node(sim.root());

        assert!(sim.contains(&panel, &button));
        assert!(sim.contains(&panel, &panel));
        assert!(!sim.contains(&button, &panel));
        assert!(!sim.contains(&other, &button));
        assert!(sim.is_attached(&button));

        sim.detach(panel);
        assert!(!sim.is_attached(&panel));
        assert!(!sim.is_attached(&button));
        assert!(sim.is_attached(&other));
        assert!(!sim.is_attached(&SimNode(99)));
    }

    #[test]
    fn test_timers_fire_in_order() {
        let sim = SimPlatform::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for (label, delay) in [("b", 20), ("a", 10), ("c", 30)] {
            let log = log.clone();
            sim.schedule(
                Duration::from_millis(delay),
                Box::new(move || log.borrow_mut().push(label)),
            )
            .unwrap();
        }
        let cancelled = sim
            .schedule(Duration::from_millis(5), Box::new(|| panic!("cancelled")))
            .unwrap();
        sim.cancel(cancelled);

        sim.advance(20);
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        assert_eq!(sim.now_ms(), 20);
        sim.advance(10);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(sim.pending_timers(), 0);
    }

    #[test]
    fn test_listeners_by_name() {
        let sim = SimPlatform::new();
        let target = sim.create_node(sim.root());
        let hits = Rc::new(Cell::new(0));

        let counter = hits.clone();
        let listener = sim
            .add_capture_listener("mousedown", Rc::new(move |_: SimEvent| counter.set(counter.get() + 1)))
            .unwrap();
        assert!(sim
            .add_capture_listener("", Rc::new(|_: SimEvent| {}))
            .is_err());

        assert_eq!(sim.dispatch(SimEvent::new("mousedown", target)), 1);
        assert_eq!(sim.dispatch(SimEvent::new("mouseup", target)), 0);
        assert_eq!(hits.get(), 1);

        sim.remove_capture_listener(listener);
        assert_eq!(sim.dispatch(SimEvent::new("mousedown", target)), 0);
        assert_eq!(sim.listener_count(), 0);
    }
}
