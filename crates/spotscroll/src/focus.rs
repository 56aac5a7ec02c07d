//! Focus-scroll coordinator
//!
//! Keeps the focused item inside the viewport. When focus lands on an item,
//! the content's position calculator proposes a scroll offset; the
//! coordinator starts a scroll toward it if the move is significant for the
//! active strategy. While an earlier focus scroll is still in flight, the
//! calculation is measured against that scroll's destination rather than
//! the stale intermediate position.
//!
//! Scroll-then-focus requests are recorded as a [`FocusIntent`] and consumed
//! by [`Scroller::stop`] once the scroll settles.

use spotscroll_core::{Axis, Direction, EventResponse, FocusEvent, NodeId, Point, Rect};

use crate::bridge::StartRequest;
use crate::config::ScrollDirection;
use crate::host::{FocusQuery, Layout, ScrollEnv, ScrollHost, ScrollInfo, Spotlight};
use crate::scroller::Scroller;
use crate::state::{ScrollBounds, ScrollPosition};
use crate::strategy::ScrollStrategy;

/// Item to focus after the current scroll settles
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FocusIntent {
    /// Item index, resolved by the content
    Index(usize),
    Node(NodeId),
    /// Whatever is at `point`, else the nearest item from it in `direction`
    Point { direction: Direction, point: Point },
}

/// Focus bookkeeping carried between events
#[derive(Clone, Debug)]
pub(crate) struct FocusState {
    /// Focus-driven scrolls animate (cleared when focus interrupts a wheel)
    pub(crate) animate_on_focus: bool,
    /// Target of the last focus-driven scroll in this settle cycle
    pub(crate) last_scroll_position_on_focus: Option<ScrollPosition>,
}

impl Default for FocusState {
    fn default() -> Self {
        Self {
            animate_on_focus: true,
            last_scroll_position_on_focus: None,
        }
    }
}

/// Smallest scroll that shows the whole item along the enabled axes
///
/// Items larger than the viewport are aligned to their start edge. The
/// result is clamped to the scroll bounds.
pub fn minimal_reveal_position(query: &FocusQuery) -> ScrollPosition {
    let base = query.scroll_position.unwrap_or(query.current);
    let mut target = base;

    // Item offset within the content
    let item_left = query.item_rect.x - query.container_rect.x + query.current.left;
    let item_top = query.item_rect.y - query.container_rect.y + query.current.top;

    if query.direction.allows(Axis::Horizontal) {
        target.left = reveal(
            item_left,
            query.item_rect.width,
            base.left,
            query.bounds.client_width,
        );
    }
    if query.direction.allows(Axis::Vertical) {
        target.top = reveal(
            item_top,
            query.item_rect.height,
            base.top,
            query.bounds.client_height,
        );
    }

    query.bounds.clamp(target)
}

fn reveal(start: f32, size: f32, offset: f32, client: f32) -> f32 {
    let end = start + size;
    if start < offset || size > client {
        start
    } else if end > offset + client {
        end - client
    } else {
        offset
    }
}

fn rect_in_view<L: Layout + ?Sized>(layout: &L, node: NodeId, view: Option<Rect>) -> bool {
    match (layout.rect(node), view) {
        (Some(rect), Some(view)) => rect.intersects(&view),
        _ => false,
    }
}

/// Which axis an in-flight destination should replace for `item_rect`
fn in_flight_axis(direction: ScrollDirection, item_rect: &Rect, container_rect: &Rect) -> Option<Axis> {
    let outside_horizontally =
        !(item_rect.left() >= container_rect.left() && item_rect.right() <= container_rect.right());
    let outside_vertically =
        !(item_rect.top() >= container_rect.top() && item_rect.bottom() <= container_rect.bottom());

    match direction {
        ScrollDirection::Horizontal => Some(Axis::Horizontal),
        ScrollDirection::Both if outside_horizontally => Some(Axis::Horizontal),
        ScrollDirection::Vertical => Some(Axis::Vertical),
        ScrollDirection::Both if outside_vertically => Some(Axis::Vertical),
        ScrollDirection::Both => None,
    }
}

impl Scroller {
    /// Scroll so the focused item is fully visible
    pub fn calculate_and_scroll_to(&mut self, env: &mut ScrollEnv<'_>) {
        let (Some(container), Some(content)) = (self.bridge.container(), self.bridge.content())
        else {
            return;
        };
        let Some(item) = env.host.current() else {
            return;
        };
        if !env.host.contains(content, item) {
            return;
        }
        let (Some(item_rect), Some(container_rect)) = (env.host.rect(item), env.host.rect(container))
        else {
            return;
        };
        let Some(bounds) = self.bounds(env) else {
            return;
        };

        let current = self.bridge.position();
        let in_flight = self.strategy.is_in_flight(self.bridge.state());

        let (scroll_position, scroll_info) = match self.focus.last_scroll_position_on_focus {
            Some(last) if in_flight => {
                let base = in_flight_axis(self.config.direction, &item_rect, &container_rect).map(
                    |axis| {
                        let mut base = current;
                        base.set(axis, last.get(axis));
                        base
                    },
                );
                (base, None)
            }
            _ => (
                None,
                Some(ScrollInfo {
                    previous_scroll_height: self.bridge.last_scroll_height(),
                    scroll_top: current.top,
                }),
            ),
        };

        let query = FocusQuery {
            item,
            item_rect,
            container_rect,
            current,
            bounds,
            direction: self.config.direction,
            scroll_position,
            scroll_info,
        };

        match env.content.calculate_position_on_focus(&query) {
            Some(position) if position != current => {
                tracing::debug!(
                    "focus on {:?} wants ({:.1}, {:.1})",
                    item,
                    position.left,
                    position.top
                );
                self.start_scroll_on_focus(env, position, &bounds);
            }
            Some(_) => {}
            None => tracing::trace!("content has no focus position for {:?}", item),
        }

        if let Some(bounds) = self.bounds(env) {
            self.bridge.set_last_scroll_height(bounds.scroll_height);
        }
    }

    fn start_scroll_on_focus(
        &mut self,
        env: &mut ScrollEnv<'_>,
        position: ScrollPosition,
        bounds: &ScrollBounds,
    ) {
        let current = self.bridge.position();
        let strategy: &dyn ScrollStrategy = self.strategy.as_ref();
        let horizontally = bounds.max_left > 0.0 && strategy.is_significant(current.left, position.left);
        let vertically = bounds.max_top > 0.0 && strategy.is_significant(current.top, position.top);

        if !(horizontally || vertically) {
            return;
        }

        let animate = strategy.animate_on_focus(
            self.focus.animate_on_focus,
            self.config.animation_duration_ms,
        );
        let overscroll_effect = self.overscroll_enabled(self.bridge.state().last_input_type)
            && !env.content.should_prevent_overscroll_effect();

        self.start(
            env,
            StartRequest {
                target: position,
                animate,
                overscroll_effect,
            },
        );
        self.focus.last_scroll_position_on_focus = Some(position);
    }

    /// Focus entered an element inside the scroll region
    pub fn on_focus(&mut self, env: &mut ScrollEnv<'_>, event: &FocusEvent) -> EventResponse {
        let prevent_scroll = env.content.should_prevent_scroll_by_focus();
        let is_dragging = self.bridge.state().is_dragging;

        if self.strategy.settles_on_animation_end() && self.bridge.state().is_wheeling {
            // Focus arriving mid-wheel ends the wheel scroll where it is
            self.stop(env);
            self.focus.animate_on_focus = false;
        }

        let pointer_mode = env.host.pointer_mode();
        if !pointer_mode {
            self.alert_thumbs(env);
        }

        if !(prevent_scroll || pointer_mode || is_dragging) {
            if env.host.current() == Some(event.target) {
                self.calculate_and_scroll_to(env);
            }
        } else {
            env.content.set_last_focused_node(event.target);
        }

        EventResponse::IGNORED
    }

    /// Focus (or the active container) is inside this viewport
    pub fn has_focus<H: ScrollHost + ?Sized>(&self, host: &H) -> bool {
        let Some(container) = self.bridge.container() else {
            return false;
        };
        host.current()
            .or_else(|| host.active_container())
            .map_or(false, |node| host.contains(container, node))
    }

    /// Consume the pending focus intent
    ///
    /// In pointer mode, when nothing was focused, focus moves to the
    /// topmost item of the viewport.
    pub(crate) fn focus_on_item(&mut self, env: &mut ScrollEnv<'_>) {
        let intent = self.intent.take();
        let Some(container) = self.bridge.container() else {
            return;
        };

        let mut focused = false;
        match intent {
            Some(FocusIntent::Index(index)) => {
                focused = env.content.focus_by_index(&mut *env.host, index);
            }
            Some(FocusIntent::Node(node)) => {
                focused = env.content.focus_on_node(&mut *env.host, node);
            }
            Some(FocusIntent::Point { direction, point }) => {
                if !env.host.pointer_mode() {
                    if let Some(target) = self.target_near_point(&*env.host, container, direction, point) {
                        focused = env.host.focus(target);
                    }
                }
            }
            None => {}
        }

        if focused {
            tracing::debug!("focused item for {:?}", intent);
        }

        if env.host.pointer_mode() && !focused {
            env.host.focus_container(container);
        }
    }

    fn target_near_point<H: ScrollHost + ?Sized>(
        &self,
        host: &H,
        container: NodeId,
        direction: Direction,
        point: Point,
    ) -> Option<NodeId> {
        let view = host.rect(container);

        host.element_from_point(point)
            .and_then(|element| host.closest_spottable(element))
            .filter(|&node| rect_in_view(host, node, view))
            .or_else(|| {
                host.target_by_direction_from_point(direction, point)
                    .filter(|&node| rect_in_view(host, node, view))
            })
            .or_else(|| {
                host.target_by_direction_from_point(direction.reverse(), point)
                    .filter(|&node| rect_in_view(host, node, view))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spotscroll_core::Size;

    fn query(item_rect: Rect, current: ScrollPosition) -> FocusQuery {
        FocusQuery {
            item: NodeId(7),
            item_rect,
            container_rect: Rect::new(0.0, 0.0, 400.0, 500.0),
            current,
            bounds: ScrollBounds::from_sizes(Size::new(400.0, 500.0), Size::new(400.0, 1500.0)),
            direction: ScrollDirection::Vertical,
            scroll_position: None,
            scroll_info: None,
        }
    }

    #[test]
    fn test_item_above_viewport_aligns_top() {
        // Item sits 300px above the visible area
        let q = query(Rect::new(0.0, -300.0, 400.0, 100.0), ScrollPosition::new(0.0, 600.0));
        let pos = minimal_reveal_position(&q);
        assert_eq!(pos.top, 300.0);

        // Reveal: item top >= viewport top and bottom <= viewport bottom
        let item_top = 600.0 - 300.0;
        assert!(item_top >= pos.top);
        assert!(item_top + 100.0 <= pos.top + 500.0);
    }

    #[test]
    fn test_item_below_viewport_aligns_bottom() {
        let q = query(Rect::new(0.0, 450.0, 400.0, 100.0), ScrollPosition::ZERO);
        assert_eq!(minimal_reveal_position(&q).top, 50.0);
    }

    #[test]
    fn test_visible_item_keeps_position() {
        let q = query(Rect::new(0.0, 100.0, 400.0, 100.0), ScrollPosition::new(0.0, 200.0));
        assert_eq!(minimal_reveal_position(&q), ScrollPosition::new(0.0, 200.0));
    }

    #[test]
    fn test_measured_against_in_flight_destination() {
        // Viewport at 0 animating to 400; item at content 850..950
        let mut q = query(Rect::new(0.0, 850.0, 400.0, 100.0), ScrollPosition::ZERO);
        q.scroll_position = Some(ScrollPosition::new(0.0, 400.0));
        assert_eq!(minimal_reveal_position(&q).top, 450.0);

        // Item already visible at the destination
        q.item_rect = Rect::new(0.0, 500.0, 400.0, 100.0);
        assert_eq!(minimal_reveal_position(&q).top, 400.0);
    }

    #[test]
    fn test_oversized_item_aligns_start() {
        let q = query(Rect::new(0.0, 100.0, 400.0, 800.0), ScrollPosition::ZERO);
        assert_eq!(minimal_reveal_position(&q).top, 100.0);
    }

    #[test]
    fn test_result_is_clamped() {
        let q = query(Rect::new(0.0, 1400.0, 400.0, 200.0), ScrollPosition::new(0.0, 900.0));
        assert_eq!(minimal_reveal_position(&q).top, 1000.0);
    }

    #[test]
    fn test_in_flight_axis_selection() {
        let container = Rect::new(0.0, 0.0, 400.0, 500.0);
        let inside = Rect::new(10.0, 10.0, 50.0, 50.0);
        let below = Rect::new(10.0, 600.0, 50.0, 50.0);

        assert_eq!(
            in_flight_axis(ScrollDirection::Vertical, &inside, &container),
            Some(Axis::Vertical)
        );
        assert_eq!(
            in_flight_axis(ScrollDirection::Both, &below, &container),
            Some(Axis::Vertical)
        );
        assert_eq!(in_flight_axis(ScrollDirection::Both, &inside, &container), None);
    }
}
