//! Watched and excluded regions, and the containment check.

use crate::platform::DocumentTree;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared handle to a host-owned node slot.
///
/// The host fills the slot when the element is rendered and clears it when the
/// element goes away. Clones share the slot.
pub struct RegionRef<N> {
    slot: Rc<RefCell<Option<N>>>,
}

impl<N> RegionRef<N> {
    /// An empty handle; nothing is contained in it until a node is set.
    pub fn new() -> Self {
        Self {
            slot: Rc::new(RefCell::new(None)),
        }
    }

    pub fn with_node(node: N) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(node))),
        }
    }

    pub fn set(&self, node: N) {
        *self.slot.borrow_mut() = Some(node);
    }

    pub fn clear(&self) {
        self.slot.borrow_mut().take();
    }

    pub fn is_set(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Whether both handles share the same slot.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }
}

impl<N: Clone> RegionRef<N> {
    pub fn get(&self) -> Option<N> {
        self.slot.borrow().clone()
    }
}

impl<N> Clone for RegionRef<N> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<N> Default for RegionRef<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> fmt::Debug for RegionRef<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionRef")
            .field("set", &self.is_set())
            .finish()
    }
}

/// Where an event target sits relative to the watched and excluded regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    /// No target, or the target left the document.
    Detached,
    /// Inside the watched region.
    Watched,
    /// Inside the exclusion region at this index.
    Excluded(usize),
    /// Outside everything: an away interaction.
    Outside,
}

impl Containment {
    pub fn is_contained(&self) -> bool {
        !matches!(self, Containment::Outside)
    }
}

/// Locate `target` against the watched region, then the exclusions in order.
/// Stops at the first region that contains it.
pub fn locate<T: DocumentTree>(
    tree: &T,
    target: Option<&T::Node>,
    watched: &RegionRef<T::Node>,
    excluded: &[RegionRef<T::Node>],
) -> Containment {
    let Some(target) = target else {
        return Containment::Detached;
    };
    if !tree.is_attached(target) {
        return Containment::Detached;
    }

    if region_contains(tree, watched, target) {
        return Containment::Watched;
    }

    excluded
        .iter()
        .position(|region| region_contains(tree, region, target))
        .map_or(Containment::Outside, Containment::Excluded)
}

/// True when the target must not trigger the callback: missing, detached,
/// inside the watched region or inside any exclusion.
pub fn is_contained<T: DocumentTree>(
    tree: &T,
    target: Option<&T::Node>,
    watched: &RegionRef<T::Node>,
    excluded: &[RegionRef<T::Node>],
) -> bool {
    locate(tree, target, watched, excluded).is_contained()
}

fn region_contains<T: DocumentTree>(tree: &T, region: &RegionRef<T::Node>, target: &T::Node) -> bool {
    region
        .get()
        .is_some_and(|node| tree.contains(&node, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimPlatform;

    #[test]
    fn test_locate() {
        let sim = SimPlatform::new();
        let watched_node = sim.create_node(sim.root());
        let inner = sim.create_node(watched_node);
        let menu = sim.create_node(sim.root());
        let outside = sim.create_node(sim.root());

        let watched = RegionRef::with_node(watched_node);
        let excluded = vec![RegionRef::new(), RegionRef::with_node(menu)];

        assert_eq!(locate(&sim, Some(&inner), &watched, &excluded), Containment::Watched);
        assert_eq!(
            locate(&sim, Some(&watched_node), &watched, &excluded),
            Containment::Watched
        );
        assert_eq!(locate(&sim, Some(&menu), &watched, &excluded), Containment::Excluded(1));
        assert_eq!(locate(&sim, Some(&outside), &watched, &excluded), Containment::Outside);
        assert_eq!(locate(&sim, None, &watched, &excluded), Containment::Detached);
    }

    #[test]
    fn test_detached_target_is_contained() {
        let sim = SimPlatform::new();
        let watched = RegionRef::with_node(sim.create_node(sim.root()));
        let stale = sim.create_node(sim.root());
        sim.detach(stale);

        assert!(is_contained(&sim, Some(&stale), &watched, &[]));
        assert_eq!(locate(&sim, Some(&stale), &watched, &[]), Containment::Detached);
    }

    #[test]
    fn test_unset_region_contains_nothing() {
        let sim = SimPlatform::new();
        let watched = RegionRef::new();
        let target = sim.create_node(sim.root());
        assert!(!is_contained(&sim, Some(&target), &watched, &[]));

        watched.set(target);
        assert!(is_contained(&sim, Some(&target), &watched, &[]));

        watched.clear();
        assert!(!is_contained(&sim, Some(&target), &watched, &[]));
    }

    #[test]
    fn test_clones_share_slot() {
        let a: RegionRef<u32> = RegionRef::new();
        let b = a.clone();
        b.set(7);
        assert_eq!(a.get(), Some(7));
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&RegionRef::new()));
    }
}
