//! Headless host
//!
//! An in-memory node tree implementing [`Spotlight`] and [`Layout`], plus a
//! [`HeadlessContent`] adapter that reveals focused items with
//! [`minimal_reveal_position`]. Used by the test suites and the scenario
//! runner; a real application implements the collaborator traits over its
//! own UI toolkit instead.
//!
//! Frames are relative to the parent node. A viewport is a clipping
//! container node with a single content child; scrolling translates the
//! content node by the negative scroll position.
//!
//! ```rust
//! use spotscroll::headless::HeadlessHost;
//! use spotscroll::{Layout, ScrollPosition};
//! use spotscroll_core::{Point, Rect, Size};
//!
//! let mut host = HeadlessHost::new();
//! let (container, content) = host.viewport(Rect::new(0.0, 0.0, 400.0, 500.0), Size::new(400.0, 1500.0));
//! let item = host.add_item(content, Rect::new(0.0, 600.0, 400.0, 100.0));
//!
//! host.set_scroll_position(content, ScrollPosition::new(0.0, 500.0));
//! assert_eq!(host.rect(item).map(|r| r.y), Some(100.0));
//! assert_eq!(host.element_from_point(Point::new(10.0, 150.0)), Some(item));
//! assert!(host.contains(container, item));
//! ```

use spotscroll_core::{Direction, NodeId, Point, Rect, Size};

use crate::focus::minimal_reveal_position;
use crate::host::{FocusQuery, Layout, ScrollContent, ScrollHost, Spotlight, VoiceReporter};
use crate::state::ScrollPosition;

#[derive(Clone, Debug)]
struct HeadlessNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Relative to the parent's origin
    frame: Rect,
    spottable: bool,
    /// Viewport container; clips hit testing and owns focus as a container
    clips: bool,
    /// Translation applied by scrolling
    scroll: ScrollPosition,
}

/// In-memory focus navigation and layout
#[derive(Clone, Debug, Default)]
pub struct HeadlessHost {
    nodes: Vec<HeadlessNode>,
    current: Option<NodeId>,
    active_container: Option<NodeId>,
    pointer_mode: bool,
    paused: bool,
    focus_history: Vec<NodeId>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&self, id: NodeId) -> Option<&HeadlessNode> {
        self.nodes.get(id.0 as usize)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut HeadlessNode> {
        self.nodes.get_mut(id.0 as usize)
    }

    fn insert(&mut self, parent: Option<NodeId>, frame: Rect, spottable: bool, clips: bool) -> NodeId {
        let id = NodeId(self.nodes.len() as u64);
        self.nodes.push(HeadlessNode {
            parent,
            children: Vec::new(),
            frame,
            spottable,
            clips,
            scroll: ScrollPosition::ZERO,
        });
        if let Some(parent) = parent.and_then(|p| self.node_mut(p)) {
            parent.children.push(id);
        }
        id
    }

    /// Top-level viewport; returns `(container, content)`
    pub fn viewport(&mut self, frame: Rect, content_size: Size) -> (NodeId, NodeId) {
        self.viewport_node(None, frame, content_size)
    }

    /// Viewport nested inside `parent`
    pub fn viewport_in(&mut self, parent: NodeId, frame: Rect, content_size: Size) -> (NodeId, NodeId) {
        self.viewport_node(Some(parent), frame, content_size)
    }

    fn viewport_node(&mut self, parent: Option<NodeId>, frame: Rect, content_size: Size) -> (NodeId, NodeId) {
        let container = self.insert(parent, frame, false, true);
        let content = self.insert(
            Some(container),
            Rect::new(0.0, 0.0, content_size.width, content_size.height),
            false,
            false,
        );
        (container, content)
    }

    /// Focusable item inside `parent`
    pub fn add_item(&mut self, parent: NodeId, frame: Rect) -> NodeId {
        self.insert(Some(parent), frame, true, false)
    }

    /// Non-focusable element inside `parent`
    pub fn add_node(&mut self, parent: NodeId, frame: Rect) -> NodeId {
        self.insert(Some(parent), frame, false, false)
    }

    /// Resize a content node, as when a list grows
    pub fn set_content_size(&mut self, content: NodeId, size: Size) {
        if let Some(node) = self.node_mut(content) {
            node.frame.width = size.width;
            node.frame.height = size.height;
        }
    }

    pub fn set_pointer_mode(&mut self, pointer_mode: bool) {
        self.pointer_mode = pointer_mode;
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn scroll_position(&self, content: NodeId) -> ScrollPosition {
        self.node(content).map_or(ScrollPosition::ZERO, |n| n.scroll)
    }

    /// Every successful focus call, oldest first
    pub fn focus_history(&self) -> &[NodeId] {
        &self.focus_history
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn origin(&self, id: NodeId) -> Option<Point> {
        let node = self.node(id)?;
        let parent = match node.parent {
            Some(parent) => self.origin(parent)?,
            None => Point::ZERO,
        };
        Some(Point::new(
            parent.x + node.frame.x - node.scroll.left,
            parent.y + node.frame.y - node.scroll.top,
        ))
    }

    fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |&n| self.node(n).and_then(|node| node.parent))
    }

    fn container_of(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id)
            .find(|&n| self.node(n).map_or(false, |node| node.clips))
    }

    /// Depth-first node order below `root`
    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.node(id) {
                if id != root {
                    out.push(id);
                }
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    fn spottables(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len())
            .map(|i| NodeId(i as u64))
            .filter(|&id| self.node(id).map_or(false, |n| n.spottable))
    }

    fn hit(&self, id: NodeId, point: Point) -> Option<NodeId> {
        let node = self.node(id)?;
        if !self.rect(id)?.contains_point(point) {
            return None;
        }
        node.children
            .iter()
            .rev()
            .find_map(|&child| self.hit(child, point))
            .or(Some(id))
    }

    /// Nearest spottable from `origin` toward `direction`
    ///
    /// Candidates must lie entirely beyond `origin` along the direction;
    /// distance along the axis counts, sideways offset counts double.
    fn nearest(&self, direction: Direction, origin: Rect, exclude: Option<NodeId>) -> Option<NodeId> {
        let from = origin.center();
        let mut best: Option<(f32, NodeId)> = None;

        for id in self.spottables() {
            if Some(id) == exclude {
                continue;
            }
            let Some(rect) = self.rect(id) else {
                continue;
            };
            let to = rect.center();
            let (ahead, along, across) = match direction {
                Direction::Up => (rect.bottom() <= origin.top(), from.y - to.y, (to.x - from.x).abs()),
                Direction::Down => (rect.top() >= origin.bottom(), to.y - from.y, (to.x - from.x).abs()),
                Direction::Left => (rect.right() <= origin.left(), from.x - to.x, (to.y - from.y).abs()),
                Direction::Right => (rect.left() >= origin.right(), to.x - from.x, (to.y - from.y).abs()),
            };
            if !ahead {
                continue;
            }
            let score = along + across * 2.0;
            if best.map_or(true, |(s, _)| score < s) {
                best = Some((score, id));
            }
        }
        best.map(|(_, id)| id)
    }
}

impl Spotlight for HeadlessHost {
    fn current(&self) -> Option<NodeId> {
        self.current
    }

    fn active_container(&self) -> Option<NodeId> {
        self.active_container
    }

    fn pointer_mode(&self) -> bool {
        self.pointer_mode
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn focus(&mut self, node: NodeId) -> bool {
        if !self.node(node).map_or(false, |n| n.spottable) {
            return false;
        }
        self.current = Some(node);
        self.active_container = self.container_of(node);
        self.focus_history.push(node);
        tracing::trace!("headless focus {:?}", node);
        true
    }

    /// Enter the container at its topmost visible item
    fn focus_container(&mut self, container: NodeId) -> bool {
        let Some(view) = self.rect(container) else {
            return false;
        };
        let topmost = self
            .spottable_descendants(container)
            .into_iter()
            .filter_map(|id| self.rect(id).map(|r| (id, r)))
            .filter(|(_, r)| r.intersects(&view))
            .min_by(|(_, a), (_, b)| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)))
            .map(|(id, _)| id);

        match topmost {
            Some(id) => self.focus(id),
            None => false,
        }
    }

    fn blur(&mut self) {
        self.current = None;
    }

    fn target_by_direction(&self, direction: Direction, from: NodeId) -> Option<NodeId> {
        let origin = self.rect(from)?;
        self.nearest(direction, origin, Some(from))
    }

    fn target_by_direction_from_point(&self, direction: Direction, point: Point) -> Option<NodeId> {
        self.nearest(direction, Rect::new(point.x, point.y, 0.0, 0.0), None)
    }

    fn spottable_descendants(&self, container: NodeId) -> Vec<NodeId> {
        self.descendants(container)
            .into_iter()
            .filter(|&id| self.node(id).map_or(false, |n| n.spottable))
            .collect()
    }
}

impl Layout for HeadlessHost {
    fn rect(&self, node: NodeId) -> Option<Rect> {
        let origin = self.origin(node)?;
        let frame = self.node(node)?.frame;
        Some(Rect::new(origin.x, origin.y, frame.width, frame.height))
    }

    fn scroll_size(&self, content: NodeId) -> Option<Size> {
        self.node(content).map(|n| n.frame.size())
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|n| n == ancestor)
    }

    /// Deepest node under `point`, honouring viewport clipping
    fn element_from_point(&self, point: Point) -> Option<NodeId> {
        let roots: Vec<NodeId> = (0..self.nodes.len())
            .map(|i| NodeId(i as u64))
            .filter(|&id| self.node(id).map_or(false, |n| n.parent.is_none()))
            .collect();
        roots.into_iter().rev().find_map(|root| self.hit(root, point))
    }

    fn closest_spottable(&self, node: NodeId) -> Option<NodeId> {
        self.ancestors(node)
            .find(|&n| self.node(n).map_or(false, |node| node.spottable))
    }

    fn set_scroll_position(&mut self, content: NodeId, position: ScrollPosition) {
        if let Some(node) = self.node_mut(content) {
            node.scroll = position;
        }
    }
}

/// Scroll content adapter for a list of items laid out in content space
#[derive(Clone, Debug, Default)]
pub struct HeadlessContent {
    items: Vec<(NodeId, Rect)>,
    container_disabled: bool,
    spotlight_paused: bool,
    last_focused: Option<NodeId>,
    prevent_scroll_by_focus: bool,
    prevent_overscroll_effect: bool,
}

impl HeadlessContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item with its frame in content coordinates
    pub fn push_item(&mut self, node: NodeId, frame: Rect) {
        self.items.push((node, frame));
    }

    pub fn items(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.items.iter().map(|(node, _)| *node)
    }

    pub fn is_container_disabled(&self) -> bool {
        self.container_disabled
    }

    pub fn is_spotlight_paused(&self) -> bool {
        self.spotlight_paused
    }

    pub fn last_focused(&self) -> Option<NodeId> {
        self.last_focused
    }

    pub fn set_prevent_scroll_by_focus(&mut self, prevent: bool) {
        self.prevent_scroll_by_focus = prevent;
    }

    pub fn set_prevent_overscroll_effect(&mut self, prevent: bool) {
        self.prevent_overscroll_effect = prevent;
    }
}

impl ScrollContent for HeadlessContent {
    fn calculate_position_on_focus(&self, query: &FocusQuery) -> Option<ScrollPosition> {
        Some(minimal_reveal_position(query))
    }

    fn should_prevent_scroll_by_focus(&self) -> bool {
        self.prevent_scroll_by_focus
    }

    fn should_prevent_overscroll_effect(&self) -> bool {
        self.prevent_overscroll_effect
    }

    fn set_last_focused_node(&mut self, node: NodeId) {
        self.last_focused = Some(node);
    }

    fn set_container_disabled(&mut self, disabled: bool) {
        if self.container_disabled != disabled {
            tracing::trace!("headless container disabled: {}", disabled);
        }
        self.container_disabled = disabled;
    }

    fn pause_spotlight(&mut self, paused: bool) {
        self.spotlight_paused = paused;
    }

    fn focus_by_index(&mut self, host: &mut dyn ScrollHost, index: usize) -> bool {
        match self.items.get(index) {
            Some(&(node, _)) => host.focus(node),
            None => false,
        }
    }

    fn item_position(&self, index: usize) -> Option<ScrollPosition> {
        self.items
            .get(index)
            .map(|(_, frame)| ScrollPosition::new(frame.x, frame.y))
    }
}

/// Voice reporter that counts reports
#[derive(Clone, Debug, Default)]
pub struct RecordingVoice {
    pub already_completed: usize,
}

impl VoiceReporter for RecordingVoice {
    fn report_already_completed(&mut self) {
        self.already_completed += 1;
    }
}

/// A ready-made viewport with items
#[derive(Clone, Debug)]
pub struct HeadlessFixture {
    pub host: HeadlessHost,
    pub content: HeadlessContent,
    pub container: NodeId,
    pub content_node: NodeId,
    pub items: Vec<NodeId>,
}

/// `count` full-width rows of `item_height` in a 400px wide viewport
pub fn vertical_list(viewport_height: f32, item_height: f32, count: usize) -> HeadlessFixture {
    let mut host = HeadlessHost::new();
    let (container, content_node) = host.viewport(
        Rect::new(0.0, 0.0, 400.0, viewport_height),
        Size::new(400.0, item_height * count as f32),
    );
    let mut content = HeadlessContent::new();
    let items = (0..count)
        .map(|i| {
            let frame = Rect::new(0.0, item_height * i as f32, 400.0, item_height);
            let item = host.add_item(content_node, frame);
            content.push_item(item, frame);
            item
        })
        .collect();

    HeadlessFixture {
        host,
        content,
        container,
        content_node,
        items,
    }
}

/// `count` full-height columns of `item_width` in a 300px tall viewport
pub fn horizontal_list(viewport_width: f32, item_width: f32, count: usize) -> HeadlessFixture {
    let mut host = HeadlessHost::new();
    let (container, content_node) = host.viewport(
        Rect::new(0.0, 0.0, viewport_width, 300.0),
        Size::new(item_width * count as f32, 300.0),
    );
    let mut content = HeadlessContent::new();
    let items = (0..count)
        .map(|i| {
            let frame = Rect::new(item_width * i as f32, 0.0, item_width, 300.0);
            let item = host.add_item(content_node, frame);
            content.push_item(item, frame);
            item
        })
        .collect();

    HeadlessFixture {
        host,
        content,
        container,
        content_node,
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_search() {
        let fx = vertical_list(500.0, 100.0, 5);
        let host = &fx.host;

        assert_eq!(host.target_by_direction(Direction::Down, fx.items[0]), Some(fx.items[1]));
        assert_eq!(host.target_by_direction(Direction::Up, fx.items[0]), None);
        assert_eq!(
            host.target_by_direction_from_point(Direction::Up, Point::new(200.0, 350.0)),
            Some(fx.items[2])
        );
    }

    #[test]
    fn test_clipped_hit_testing() {
        let fx = vertical_list(500.0, 100.0, 15);

        assert_eq!(fx.host.element_from_point(Point::new(10.0, 250.0)), Some(fx.items[2]));
        // Item 7 exists at y=700 but the viewport clips it
        assert_eq!(fx.host.element_from_point(Point::new(10.0, 750.0)), None);
    }

    #[test]
    fn test_focus_tracks_active_container() {
        let mut fx = vertical_list(500.0, 100.0, 15);

        assert!(fx.host.focus(fx.items[3]));
        assert!(!fx.host.focus(fx.content_node));
        fx.host.blur();

        assert_eq!(fx.host.current(), None);
        assert_eq!(fx.host.active_container(), Some(fx.container));
        assert_eq!(fx.host.focus_history(), &[fx.items[3]]);
    }

    #[test]
    fn test_focus_container_enters_topmost_visible() {
        let mut fx = vertical_list(500.0, 100.0, 15);
        fx.host
            .set_scroll_position(fx.content_node, ScrollPosition::new(0.0, 350.0));

        assert!(fx.host.focus_container(fx.container));
        // Item 3 (300..400) is partially visible at the top
        assert_eq!(fx.host.current(), Some(fx.items[3]));
    }
}
