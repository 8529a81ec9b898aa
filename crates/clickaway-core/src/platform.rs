//! Host abstraction: what a session needs from the environment it runs in.
//!
//! The DOM binding lives in `clickaway-web`; [`crate::sim::SimPlatform`] is an
//! in-memory implementation for deterministic tests.

use crate::event::RawEvent;
use std::rc::Rc;
use std::time::Duration;

/// Callback a platform invokes for every delivered event.
pub type EventHandler<E> = Rc<dyn Fn(E)>;

/// Deferred work handed to [`Platform::schedule`].
pub type Task = Box<dyn FnOnce()>;

/// Tree queries over the host document.
pub trait DocumentTree {
    type Node: Clone;

    /// Whether `node` is currently attached to the live document.
    fn is_attached(&self, node: &Self::Node) -> bool;

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;
}

/// Event delivery and timers, on a single cooperative thread.
///
/// Contract:
/// - `add_capture_listener` registers on the document in the capture phase and
///   must not deliver events synchronously from inside the call.
/// - `schedule` must never run `task` synchronously; it runs later on the same
///   thread, and not at all once `cancel` was called with its handle.
pub trait Platform: DocumentTree + 'static {
    type Event: RawEvent<Node = Self::Node> + 'static;
    /// Registration handle, consumed on removal.
    type Listener;
    /// Pending timer handle, consumed on cancellation.
    type Timer;

    fn add_capture_listener(
        &self,
        event_name: &str,
        handler: EventHandler<Self::Event>,
    ) -> Result<Self::Listener, String>;

    fn remove_capture_listener(&self, listener: Self::Listener);

    fn schedule(&self, delay: Duration, task: Task) -> Result<Self::Timer, String>;

    fn cancel(&self, timer: Self::Timer);
}
