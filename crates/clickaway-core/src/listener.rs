//! The two entry points: a wrapping container and an attachment function.
//! Both are thin shells over [`ClickAway`].

use crate::event::InputEvent;
use crate::options::{ClickAwayConfig, ListenerOptions};
use crate::platform::Platform;
use crate::region::RegionRef;
use crate::session::{ClickAway, Verdict};
use std::ops::Deref;
use std::rc::Rc;

/// Container that watches the single child it wraps.
///
/// The host renders the child and stores its node through
/// [`ClickAwayListener::child_ref`]; mounting and unmounting follow the
/// container's own lifecycle.
pub struct ClickAwayListener<P: Platform> {
    child: RegionRef<P::Node>,
    session: ClickAway<P>,
}

impl<P: Platform> ClickAwayListener<P> {
    pub fn new<F>(
        platform: Rc<P>,
        on_click_away: F,
        config: impl Into<ClickAwayConfig<P::Node>>,
    ) -> Self
    where
        F: Fn(&InputEvent<P::Event>) + 'static,
    {
        let child = RegionRef::new();
        let session = ClickAway::new(platform, child.clone(), on_click_away, config);
        Self { child, session }
    }

    /// Handle the host fills with the wrapped child's node.
    pub fn child_ref(&self) -> RegionRef<P::Node> {
        self.child.clone()
    }

    pub fn mount(&self) {
        self.session.activate();
    }

    pub fn unmount(&self) {
        self.session.deactivate();
    }

    /// New props from the host.
    pub fn update(&self, options: ListenerOptions) {
        self.session.reconfigure(options);
    }

    pub fn set_on_click_away<F>(&self, on_click_away: F)
    where
        F: Fn(&InputEvent<P::Event>) + 'static,
    {
        self.session.set_callback(on_click_away);
    }

    pub fn set_exclusions(&self, exclude: Vec<RegionRef<P::Node>>) {
        self.session.set_exclusions(exclude);
    }

    pub fn handle_event(&self, event: P::Event) -> Verdict {
        self.session.handle_event(event)
    }

    pub fn session(&self) -> &ClickAway<P> {
        &self.session
    }
}

/// Keeps an attached registration alive; dropping it detaches.
pub struct ClickAwayGuard<P: Platform> {
    session: ClickAway<P>,
}

impl<P: Platform> ClickAwayGuard<P> {
    /// Tear down now instead of at scope exit.
    pub fn detach(self) {
        drop(self);
    }
}

impl<P: Platform> Deref for ClickAwayGuard<P> {
    type Target = ClickAway<P>;

    fn deref(&self) -> &ClickAway<P> {
        &self.session
    }
}

/// Attach click-away detection to a host-supplied region.
///
/// The registration is active immediately and lives until the returned guard
/// is dropped.
pub fn use_click_away<P, F>(
    platform: Rc<P>,
    region: &RegionRef<P::Node>,
    on_click_away: F,
    config: impl Into<ClickAwayConfig<P::Node>>,
) -> ClickAwayGuard<P>
where
    P: Platform,
    F: Fn(&InputEvent<P::Event>) + 'static,
{
    let session = ClickAway::new(platform, region.clone(), on_click_away, config);
    session.activate();
    ClickAwayGuard { session }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{LifecycleState, Suppression};
    use crate::sim::{SimEvent, SimPlatform};
    use std::cell::Cell;

    #[test]
    fn test_container_watches_child() {
        let sim = Rc::new(SimPlatform::new());
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        let listener = ClickAwayListener::new(
            sim.clone(),
            move |_: &InputEvent<SimEvent>| counter.set(counter.get() + 1),
            ListenerOptions::default(),
        );

        let child = sim.create_node(sim.root());
        let button = sim.create_node(child);
        let outside = sim.create_node(sim.root());
        listener.child_ref().set(child);
        listener.mount();

        sim.dispatch(SimEvent::new("mousedown", button).at(10.0, 10.0));
        assert_eq!(fired.get(), 0);
        sim.dispatch(SimEvent::new("mousedown", outside).at(10.0, 10.0));
        assert_eq!(fired.get(), 1);

        listener.unmount();
        assert_eq!(listener.session().state(), LifecycleState::Unmounted);
        sim.dispatch(SimEvent::new("mousedown", outside).at(10.0, 10.0));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_container_before_child_rendered() {
        // With no child node every attached target is outside.
        let sim = Rc::new(SimPlatform::new());
        let listener = ClickAwayListener::new(
            sim.clone(),
            |_: &InputEvent<SimEvent>| {},
            ListenerOptions::default().with_test_mode(true),
        );
        listener.mount();
        let node = sim.create_node(sim.root());
        assert_eq!(
            listener.handle_event(SimEvent::new("touchstart", node)),
            Verdict::Dispatched
        );

        listener.update(ListenerOptions::default().with_disabled(true));
        assert_eq!(
            listener.handle_event(SimEvent::new("touchstart", node)),
            Verdict::Suppressed(Suppression::Disabled)
        );
    }

    #[test]
    fn test_guard_detaches_on_drop() {
        let sim = Rc::new(SimPlatform::new());
        let region = RegionRef::with_node(sim.create_node(sim.root()));
        let outside = sim.create_node(sim.root());
        let fired = Rc::new(Cell::new(0));

        {
            let counter = fired.clone();
            let guard = use_click_away(
                sim.clone(),
                &region,
                move |_: &InputEvent<SimEvent>| counter.set(counter.get() + 1),
                ListenerOptions::default(),
            );
            assert!(guard.is_mounted());
            assert_eq!(sim.listener_count(), 2);
            sim.dispatch(SimEvent::new("touchstart", outside));
        }

        assert_eq!(fired.get(), 1);
        assert_eq!(sim.listener_count(), 0);
        sim.dispatch(SimEvent::new("touchstart", outside));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_entry_points_agree() {
        let sim = Rc::new(SimPlatform::new());
        let watched = sim.create_node(sim.root());
        let outside = sim.create_node(sim.root());
        let options = ListenerOptions::default().with_test_mode(true);

        let container = ClickAwayListener::new(sim.clone(), |_: &InputEvent<SimEvent>| {}, options.clone());
        container.child_ref().set(watched);
        container.mount();
        let guard = use_click_away(
            sim.clone(),
            &RegionRef::with_node(watched),
            |_: &InputEvent<SimEvent>| {},
            options,
        );

        let events = [
            SimEvent::new("mousedown", outside).at(0.0, 0.0),
            SimEvent::new("mousedown", watched).at(0.0, 0.0),
            SimEvent::new("mouseup", outside).at(40.0, 0.0),
            SimEvent::new("keydown", outside),
            SimEvent::untargeted("touchstart"),
        ];
        for event in events {
            assert_eq!(
                container.handle_event(event.clone()),
                guard.handle_event(event)
            );
        }

        guard.detach();
        assert_eq!(sim.listener_count(), 0);
    }
}
