//! Per-registration session: lifecycle state machine and the decision engine.
//!
//! Event path: lifecycle guard → classifier → group filter → containment →
//! tolerance (pointer only) → debounce gate → callback.
//!
//! The session state lives in an `Rc<RefCell<_>>` shared with the platform
//! listeners and the debounce timer, which only hold `Weak` references. No
//! borrow is held while the callback runs, so a callback may reconfigure or
//! tear down its own session.

use crate::debounce::{DebounceGate, Ticket};
use crate::event::{EventGroup, InputEvent, Point, RawEvent};
use crate::options::{ClickAwayConfig, ListenerOptions};
use crate::platform::{EventHandler, Platform};
use crate::region::{self, Containment, RegionRef};
use crate::tolerance::ToleranceFilter;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::mem;
use std::rc::{Rc, Weak};
use tracing::{debug, info, trace, warn};

/// Away-callback. Receives the classified originating event.
pub type AwayCallback<E> = Rc<dyn Fn(&InputEvent<E>)>;

/// Lifecycle state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleState {
    /// Created, never activated.
    #[default]
    Uninitialized,
    /// Active: events are evaluated.
    Mounted,
    /// Torn down: events are dropped, nothing pending.
    Unmounted,
}

/// Why an event did not reach the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Suppression {
    NotMounted,
    Disabled,
    Unclassified,
    InactiveGroup,
    DetachedTarget,
    InsideWatched,
    InsideExcluded,
    BeyondTolerance,
    /// The platform refused to schedule the debounce timer.
    ScheduleFailed,
}

/// Outcome of feeding one event through the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Callback invoked synchronously.
    Dispatched,
    /// Debounced dispatch (re)scheduled.
    Scheduled,
    Suppressed(Suppression),
}

struct SessionState<P: Platform> {
    lifecycle: LifecycleState,
    options: ListenerOptions,
    watched: RegionRef<P::Node>,
    excluded: Vec<RegionRef<P::Node>>,
    callback: AwayCallback<P::Event>,
    tolerance: ToleranceFilter,
    debounce: DebounceGate<P::Timer>,
    listeners: Vec<P::Listener>,
}

impl<P: Platform> SessionState<P> {
    /// Run every suppression rule. On success the event is ready to dispatch
    /// and the pointer baseline has been updated.
    fn admit(
        &mut self,
        platform: &P,
        event: P::Event,
    ) -> Result<InputEvent<P::Event>, Suppression> {
        if self.lifecycle != LifecycleState::Mounted {
            return Err(Suppression::NotMounted);
        }
        if self.options.disabled {
            return Err(Suppression::Disabled);
        }

        let input = InputEvent::classify(event);
        let group = input.group().ok_or(Suppression::Unclassified)?;
        if !self.options.event_config.is_active(group) {
            return Err(Suppression::InactiveGroup);
        }

        let target = input.event().target();
        match region::locate(platform, target.as_ref(), &self.watched, &self.excluded) {
            Containment::Detached => return Err(Suppression::DetachedTarget),
            Containment::Watched => return Err(Suppression::InsideWatched),
            Containment::Excluded(_) => return Err(Suppression::InsideExcluded),
            Containment::Outside => {}
        }

        if group == EventGroup::Pointer {
            if let Some(position) = input.position() {
                if !self.tolerance.admit(position) {
                    return Err(Suppression::BeyondTolerance);
                }
            }
        }

        Ok(input)
    }
}

struct Inner<P: Platform> {
    platform: Rc<P>,
    state: RefCell<SessionState<P>>,
}

impl<P: Platform> Inner<P> {
    fn handle(self: &Rc<Self>, event: P::Event) -> Verdict {
        let admitted = {
            let mut state = self.state.borrow_mut();
            state.admit(&self.platform, event)
        };
        let input = match admitted {
            Ok(input) => input,
            Err(reason) => {
                trace!(?reason, "event suppressed");
                return Verdict::Suppressed(reason);
            }
        };

        let immediate = self.state.borrow().debounce.is_immediate();
        if immediate {
            // A timer left over from a longer delay must not fire as well.
            self.cancel_pending();
            let callback = Rc::clone(&self.state.borrow().callback);
            debug!(kind = input.event().kind(), "dispatching click-away");
            callback(&input);
            return Verdict::Dispatched;
        }

        self.schedule(input)
    }

    fn schedule(self: &Rc<Self>, input: InputEvent<P::Event>) -> Verdict {
        let weak = Rc::downgrade(self);
        let platform = &self.platform;
        let mut state = self.state.borrow_mut();

        let scheduled = state.debounce.rearm(
            |timer| platform.cancel(timer),
            |delay, ticket| {
                debug!(?delay, kind = input.event().kind(), "debouncing click-away");
                platform.schedule(delay, Box::new(move || Self::fire(&weak, ticket, input)))
            },
        );

        match scheduled {
            Ok(_) => Verdict::Scheduled,
            Err(error) => {
                warn!(%error, "failed to schedule debounced click-away");
                Verdict::Suppressed(Suppression::ScheduleFailed)
            }
        }
    }

    fn fire(weak: &Weak<Self>, ticket: Ticket, input: InputEvent<P::Event>) {
        let Some(inner) = weak.upgrade() else {
            return;
        };

        let callback = {
            let mut state = inner.state.borrow_mut();
            if state.lifecycle != LifecycleState::Mounted || !state.debounce.complete(ticket) {
                trace!("stale debounce timer ignored");
                return;
            }
            Rc::clone(&state.callback)
        };

        debug!(kind = input.event().kind(), "dispatching debounced click-away");
        callback(&input);
    }

    fn register_listeners(self: &Rc<Self>) {
        let names: Vec<String> = {
            let state = self.state.borrow();
            if !state.options.registers_listeners() {
                debug!(
                    disabled = state.options.disabled,
                    test_mode = state.options.test_mode,
                    "listener registration suppressed"
                );
                return;
            }
            let config = &state.options.event_config;
            for name in config.unrecognized_names() {
                warn!(name, "event name does not match its configured group");
            }
            config.listener_names().into_iter().map(String::from).collect()
        };

        let mut registered = Vec::with_capacity(names.len());
        for name in &names {
            let weak = Rc::downgrade(self);
            let handler: EventHandler<P::Event> = Rc::new(move |event: P::Event| {
                if let Some(inner) = weak.upgrade() {
                    inner.handle(event);
                }
            });
            match self.platform.add_capture_listener(name, handler) {
                Ok(listener) => registered.push(listener),
                Err(error) => warn!(name = name.as_str(), %error, "failed to add listener"),
            }
        }

        info!(count = registered.len(), events = ?names, "click-away listeners registered");
        self.state.borrow_mut().listeners.extend(registered);
    }

    fn unregister_listeners(&self) {
        let listeners = mem::take(&mut self.state.borrow_mut().listeners);
        if listeners.is_empty() {
            return;
        }
        let count = listeners.len();
        for listener in listeners {
            self.platform.remove_capture_listener(listener);
        }
        debug!(count, "click-away listeners removed");
    }

    fn cancel_pending(&self) {
        let pending = self.state.borrow_mut().debounce.take_pending();
        if let Some(timer) = pending {
            self.platform.cancel(timer);
            debug!("pending click-away cancelled");
        }
    }
}

/// One registration of an away-callback against a watched region.
///
/// Dropping the session tears it down: listeners are removed and any pending
/// debounced dispatch is cancelled.
pub struct ClickAway<P: Platform> {
    inner: Rc<Inner<P>>,
}

impl<P: Platform> ClickAway<P> {
    /// Create an inactive session. Call [`ClickAway::activate`] to start it.
    pub fn new<F>(
        platform: Rc<P>,
        watched: RegionRef<P::Node>,
        callback: F,
        config: impl Into<ClickAwayConfig<P::Node>>,
    ) -> Self
    where
        F: Fn(&InputEvent<P::Event>) + 'static,
    {
        let ClickAwayConfig { options, exclude } = config.into();
        let state = SessionState {
            lifecycle: LifecycleState::Uninitialized,
            tolerance: ToleranceFilter::new(options.click_tolerance),
            debounce: DebounceGate::new(options.debounce_timeout()),
            options,
            watched,
            excluded: exclude,
            callback: Rc::new(callback),
            listeners: Vec::new(),
        };

        Self {
            inner: Rc::new(Inner {
                platform,
                state: RefCell::new(state),
            }),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.inner.state.borrow().lifecycle
    }

    pub fn is_mounted(&self) -> bool {
        self.state() == LifecycleState::Mounted
    }

    pub fn options(&self) -> ListenerOptions {
        self.inner.state.borrow().options.clone()
    }

    pub fn watched(&self) -> RegionRef<P::Node> {
        self.inner.state.borrow().watched.clone()
    }

    /// Number of platform listeners currently registered.
    pub fn listener_count(&self) -> usize {
        self.inner.state.borrow().listeners.len()
    }

    pub fn has_pending_dispatch(&self) -> bool {
        self.inner.state.borrow().debounce.has_pending()
    }

    /// Last accepted pointer position.
    pub fn pointer_baseline(&self) -> Option<Point> {
        self.inner.state.borrow().tolerance.baseline()
    }

    /// Uninitialized/Unmounted → Mounted. No-op when already mounted.
    pub fn activate(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.lifecycle == LifecycleState::Mounted {
                return;
            }
            state.lifecycle = LifecycleState::Mounted;
        }
        info!("click-away session mounted");
        self.inner.register_listeners();
    }

    /// Mounted → Unmounted: remove listeners, cancel the pending dispatch and
    /// forget the pointer baseline. No-op unless mounted.
    pub fn deactivate(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.lifecycle != LifecycleState::Mounted {
                return;
            }
            state.lifecycle = LifecycleState::Unmounted;
            state.tolerance.reset();
        }
        self.inner.cancel_pending();
        self.inner.unregister_listeners();
        info!("click-away session unmounted");
    }

    /// Replace the options.
    ///
    /// When the listener set changes while mounted, every old listener is
    /// removed before the new ones are added. Disabling cancels a pending
    /// dispatch.
    pub fn reconfigure(&self, options: ListenerOptions) {
        let rebuild = {
            let mut state = self.inner.state.borrow_mut();
            let old = &state.options;
            let rebuild = state.lifecycle == LifecycleState::Mounted
                && (old.event_config != options.event_config
                    || old.registers_listeners() != options.registers_listeners());

            state.tolerance.set_tolerance(options.click_tolerance);
            state.debounce.set_delay(options.debounce_timeout());
            state.options = options;
            rebuild
        };

        if self.inner.state.borrow().options.disabled {
            self.inner.cancel_pending();
        }

        if rebuild {
            info!("click-away listener set changed, re-registering");
            self.inner.unregister_listeners();
            self.inner.register_listeners();
        }
    }

    pub fn set_callback<F>(&self, callback: F)
    where
        F: Fn(&InputEvent<P::Event>) + 'static,
    {
        self.inner.state.borrow_mut().callback = Rc::new(callback);
    }

    pub fn set_exclusions(&self, exclude: Vec<RegionRef<P::Node>>) {
        self.inner.state.borrow_mut().excluded = exclude;
    }

    /// Feed one event through the engine. Platform listeners call this; in
    /// test mode callers do it by hand.
    pub fn handle_event(&self, event: P::Event) -> Verdict {
        self.inner.handle(event)
    }
}

impl<P: Platform> Drop for ClickAway<P> {
    fn drop(&mut self) {
        self.deactivate();
    }
}
