//! Pointer-mode page key monitor
//!
//! Page up/down normally reaches a scroller through the focused item. In
//! pointer mode nothing may be focused, so the application forwards page
//! keys here instead: the monitor hit-tests the last pointer position and
//! returns the registered scrollers containing that element, innermost
//! first. The application offers the key to each until one consumes it.
//!
//! Nesting is recorded explicitly. When a scroller registers, the monitor
//! asks the layout which existing registrants contain it (and which it
//! contains), so routing order does not depend on mount order.
//!
//! # Example
//!
//! ```rust
//! use spotscroll::monitor::{route_page_key, PageKeyMonitor};
//! use spotscroll::headless::HeadlessHost;
//! use spotscroll_core::{KeyCode, KeyEvent, Point, Rect, Size};
//!
//! let mut host = HeadlessHost::new();
//! let (container, _content) = host.viewport(Rect::new(0.0, 0.0, 400.0, 400.0), Size::new(400.0, 900.0));
//! host.set_pointer_mode(true);
//!
//! let monitor = PageKeyMonitor::shared();
//! let id = monitor.lock().register(container, &host);
//! monitor.lock().track_pointer(Point::new(10.0, 10.0));
//!
//! let hits = route_page_key(&monitor, &host, &KeyEvent::new(KeyCode::PAGE_DOWN));
//! assert_eq!(hits.as_slice(), &[id]);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use spotscroll_core::{KeyEvent, NodeId, Point};

use crate::host::{Layout, ScrollHost};

new_key_type! {
    /// Identity of a registered scroller
    pub struct ScrollerId;
}

/// Monitor shared by every scroller of an application
pub type SharedPageKeyMonitor = Arc<Mutex<PageKeyMonitor>>;

/// Scrollers that may receive a routed page key, innermost first
pub type PageKeyTargets = SmallVec<[ScrollerId; 4]>;

#[derive(Debug, Clone)]
struct Registrant {
    container: NodeId,
    /// Registered scrollers that contain this one
    ancestors: SmallVec<[ScrollerId; 4]>,
}

/// Registry of mounted scrollers plus the last pointer position
#[derive(Default)]
pub struct PageKeyMonitor {
    registrants: SlotMap<ScrollerId, Registrant>,
    /// Registration order, for tie-breaking
    order: Vec<ScrollerId>,
    last_pointer: Point,
}

impl PageKeyMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedPageKeyMonitor {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Register a scroller's container element
    pub fn register<L: Layout + ?Sized>(&mut self, container: NodeId, layout: &L) -> ScrollerId {
        let id = self.registrants.insert(Registrant {
            container,
            ancestors: SmallVec::new(),
        });
        let mut ancestors = SmallVec::new();

        for (other_id, other) in self.registrants.iter_mut() {
            if other_id == id {
                continue;
            }
            match nesting(layout, other.container, container) {
                Nesting::Outer => ancestors.push(other_id),
                Nesting::Inner => other.ancestors.push(id),
                Nesting::Unrelated => {}
            }
        }

        tracing::debug!(
            "registered scroller {:?} for {:?} at depth {}",
            id,
            container,
            ancestors.len()
        );
        self.registrants[id].ancestors = ancestors;
        self.order.push(id);
        id
    }

    /// Remove a scroller; returns whether it was registered
    pub fn unregister(&mut self, id: ScrollerId) -> bool {
        if self.registrants.remove(id).is_none() {
            return false;
        }
        self.order.retain(|o| *o != id);
        for other in self.registrants.values_mut() {
            other.ancestors.retain(|a| *a != id);
        }
        tracing::debug!("unregistered scroller {:?}", id);
        true
    }

    pub fn contains(&self, id: ScrollerId) -> bool {
        self.registrants.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.registrants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrants.is_empty()
    }

    /// Containment depth of a registrant (0 for outermost)
    pub fn depth(&self, id: ScrollerId) -> Option<usize> {
        self.registrants.get(id).map(|r| r.ancestors.len())
    }

    pub fn track_pointer(&mut self, position: Point) {
        self.last_pointer = position;
    }

    pub fn last_pointer(&self) -> Point {
        self.last_pointer
    }

    /// Registered scrollers whose container holds `element`, innermost first
    pub fn candidates<L: Layout + ?Sized>(&self, layout: &L, element: NodeId) -> PageKeyTargets {
        let mut hits: SmallVec<[(usize, usize, ScrollerId); 4]> = self
            .order
            .iter()
            .enumerate()
            .filter_map(|(order, &id)| {
                let r = self.registrants.get(id)?;
                layout
                    .contains(r.container, element)
                    .then(|| (r.ancestors.len(), order, id))
            })
            .collect();

        hits.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        hits.into_iter().map(|(_, _, id)| id).collect()
    }
}

enum Nesting {
    /// The existing registrant contains the new one
    Outer,
    /// The new registrant contains the existing one
    Inner,
    Unrelated,
}

fn nesting<L: Layout + ?Sized>(layout: &L, existing: NodeId, new: NodeId) -> Nesting {
    if existing == new {
        return Nesting::Unrelated;
    }
    if layout.contains(existing, new) {
        return Nesting::Outer;
    }
    if layout.contains(new, existing) {
        return Nesting::Inner;
    }

    // Hosts that cannot answer node containment still report geometry
    match (layout.rect(existing), layout.rect(new)) {
        (Some(a), Some(b)) if a != b && a.contains_rect(&b) => Nesting::Outer,
        (Some(a), Some(b)) if a != b && b.contains_rect(&a) => Nesting::Inner,
        _ => Nesting::Unrelated,
    }
}

/// Scrollers that should be offered a page key received without focus
///
/// Empty unless the host is in pointer mode, nothing is focused, and the key
/// is page up or page down.
pub fn route_page_key<H: ScrollHost + ?Sized>(
    monitor: &SharedPageKeyMonitor,
    host: &H,
    event: &KeyEvent,
) -> PageKeyTargets {
    if !(host.pointer_mode() && host.current().is_none() && event.key.is_page_key()) {
        return PageKeyTargets::new();
    }

    let monitor = monitor.lock();
    let pointer = monitor.last_pointer();
    match host.element_from_point(pointer) {
        Some(element) => monitor.candidates(host, element),
        None => PageKeyTargets::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Spotlight;
    use crate::state::ScrollPosition;
    use spotscroll_core::{Direction, KeyCode, Rect, Size};

    /// Nodes are rects; containment is geometric only
    struct Boxes {
        rects: Vec<Rect>,
        pointer_mode: bool,
    }

    impl Layout for Boxes {
        fn rect(&self, node: NodeId) -> Option<Rect> {
            self.rects.get(node.0 as usize).copied()
        }

        fn scroll_size(&self, _content: NodeId) -> Option<Size> {
            None
        }

        fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
            match (self.rect(ancestor), self.rect(node)) {
                (Some(a), Some(n)) => a.contains_rect(&n),
                _ => false,
            }
        }

        fn element_from_point(&self, point: Point) -> Option<NodeId> {
            // Smallest box under the point
            self.rects
                .iter()
                .enumerate()
                .filter(|(_, r)| r.contains_point(point))
                .min_by(|a, b| (a.1.width * a.1.height).total_cmp(&(b.1.width * b.1.height)))
                .map(|(i, _)| NodeId(i as u64))
        }

        fn closest_spottable(&self, _node: NodeId) -> Option<NodeId> {
            None
        }

        fn set_scroll_position(&mut self, _content: NodeId, _position: ScrollPosition) {}
    }

    impl Spotlight for Boxes {
        fn current(&self) -> Option<NodeId> {
            None
        }

        fn pointer_mode(&self) -> bool {
            self.pointer_mode
        }

        fn focus(&mut self, _node: NodeId) -> bool {
            false
        }

        fn focus_container(&mut self, _container: NodeId) -> bool {
            false
        }

        fn blur(&mut self) {}

        fn target_by_direction(&self, _direction: Direction, _from: NodeId) -> Option<NodeId> {
            None
        }

        fn target_by_direction_from_point(&self, _direction: Direction, _point: Point) -> Option<NodeId> {
            None
        }

        fn spottable_descendants(&self, _container: NodeId) -> Vec<NodeId> {
            Vec::new()
        }
    }

    fn nested() -> Boxes {
        Boxes {
            rects: vec![
                Rect::new(0.0, 0.0, 1000.0, 1000.0), // outer
                Rect::new(100.0, 100.0, 300.0, 300.0), // inner
                Rect::new(150.0, 150.0, 10.0, 10.0), // item inside inner
            ],
            pointer_mode: true,
        }
    }

    #[test]
    fn test_innermost_first_regardless_of_mount_order() {
        let layout = nested();
        let mut monitor = PageKeyMonitor::new();

        // Outer mounts first, the order a naive registry gets wrong
        let outer = monitor.register(NodeId(0), &layout);
        let inner = monitor.register(NodeId(1), &layout);

        assert_eq!(monitor.depth(outer), Some(0));
        assert_eq!(monitor.depth(inner), Some(1));
        assert_eq!(monitor.candidates(&layout, NodeId(2)).as_slice(), &[inner, outer]);
    }

    #[test]
    fn test_unregister_updates_depths() {
        let layout = nested();
        let mut monitor = PageKeyMonitor::new();
        let outer = monitor.register(NodeId(0), &layout);
        let inner = monitor.register(NodeId(1), &layout);

        assert!(monitor.unregister(outer));
        assert!(!monitor.unregister(outer));
        assert_eq!(monitor.depth(inner), Some(0));
        assert_eq!(monitor.candidates(&layout, NodeId(2)).as_slice(), &[inner]);
    }

    #[test]
    fn test_equal_depth_follows_registration_order() {
        let layout = Boxes {
            rects: vec![
                Rect::new(0.0, 0.0, 500.0, 500.0),
                Rect::new(0.0, 0.0, 500.0, 500.0),
                Rect::new(10.0, 10.0, 5.0, 5.0),
            ],
            pointer_mode: true,
        };
        let mut monitor = PageKeyMonitor::new();
        let first = monitor.register(NodeId(0), &layout);
        let second = monitor.register(NodeId(1), &layout);
        assert_eq!(monitor.candidates(&layout, NodeId(2)).as_slice(), &[first, second]);

        // The freed slot is reused, but the newcomer still goes last
        monitor.unregister(first);
        let again = monitor.register(NodeId(0), &layout);
        assert_eq!(monitor.candidates(&layout, NodeId(2)).as_slice(), &[second, again]);
        assert_eq!(monitor.len(), 2);
    }

    #[test]
    fn test_route_requires_pointer_mode_and_page_key() {
        let mut layout = nested();
        let monitor = PageKeyMonitor::shared();
        let outer = monitor.lock().register(NodeId(0), &layout);
        monitor.lock().track_pointer(Point::new(500.0, 500.0));

        let page = KeyEvent::new(KeyCode::PAGE_UP);
        assert_eq!(route_page_key(&monitor, &layout, &page).as_slice(), &[outer]);
        assert!(route_page_key(&monitor, &layout, &KeyEvent::new(KeyCode::DOWN)).is_empty());

        layout.pointer_mode = false;
        assert!(route_page_key(&monitor, &layout, &page).is_empty());
    }
}
