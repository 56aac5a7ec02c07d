//! Viewport state shared by the scroll components
//!
//! `ViewportState` is owned by the animator bridge. Everything else reads it
//! through `ScrollAnimatorBridge::state()` and changes it only through the
//! bridge's operations.

use serde::{Deserialize, Serialize};
use spotscroll_core::{Axis, EventId, Point, Size, StateTransitions};

/// Kind of input that caused the most recent scroll
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    Pointer,
    Wheel,
    ArrowKey,
    PageKey,
    Voice,
    Drag,
}

/// Logical scroll offset
///
/// `left` is measured from the start edge, so in right-to-left layouts
/// `left == 0` is the rightmost position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollPosition {
    pub left: f32,
    pub top: f32,
}

impl ScrollPosition {
    pub const ZERO: ScrollPosition = ScrollPosition { left: 0.0, top: 0.0 };

    pub const fn new(left: f32, top: f32) -> Self {
        Self { left, top }
    }

    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.left,
            Axis::Vertical => self.top,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::Horizontal => self.left = value,
            Axis::Vertical => self.top = value,
        }
    }

    pub fn to_point(self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn from_point(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

/// Scrollable extents of the viewport, recomputed on every query
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollBounds {
    pub client_width: f32,
    pub client_height: f32,
    pub scroll_width: f32,
    pub scroll_height: f32,
    pub max_left: f32,
    pub max_top: f32,
}

impl ScrollBounds {
    /// Bounds for a viewport of `client` size showing content of `scroll` size
    pub fn from_sizes(client: Size, scroll: Size) -> Self {
        Self {
            client_width: client.width,
            client_height: client.height,
            scroll_width: scroll.width,
            scroll_height: scroll.height,
            max_left: (scroll.width - client.width).max(0.0),
            max_top: (scroll.height - client.height).max(0.0),
        }
    }

    pub fn max(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.max_left,
            Axis::Vertical => self.max_top,
        }
    }

    pub fn client(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.client_width,
            Axis::Vertical => self.client_height,
        }
    }

    /// Content overflows the viewport along `axis`
    pub fn overflows(&self, axis: Axis) -> bool {
        self.max(axis) > 0.0
    }

    /// Clamp a position into `[0, max]` on both axes
    pub fn clamp(&self, pos: ScrollPosition) -> ScrollPosition {
        ScrollPosition::new(
            pos.left.clamp(0.0, self.max_left),
            pos.top.clamp(0.0, self.max_top),
        )
    }
}

/// Mutable scroll state of one viewport
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewportState {
    pub scroll_left: f32,
    pub scroll_top: f32,
    pub max_left: f32,
    pub max_top: f32,
    pub client_width: f32,
    pub client_height: f32,
    pub is_dragging: bool,
    pub is_wheeling: bool,
    /// The engine animator is moving the viewport
    pub animating: bool,
    /// The host is scrolling natively and has not settled yet
    pub scrolling: bool,
    pub last_input_type: Option<InputType>,
    /// Sign of the last wheel/page request: -1, 0 or 1
    pub wheel_direction: i8,
}

impl ViewportState {
    pub fn position(&self) -> ScrollPosition {
        ScrollPosition::new(self.scroll_left, self.scroll_top)
    }

    pub(crate) fn set_position(&mut self, pos: ScrollPosition) {
        self.scroll_left = pos.left;
        self.scroll_top = pos.top;
    }

    pub(crate) fn set_bounds(&mut self, bounds: &ScrollBounds) {
        self.max_left = bounds.max_left;
        self.max_top = bounds.max_top;
        self.client_width = bounds.client_width;
        self.client_height = bounds.client_height;
    }
}

/// Events driving `ScrollPhase`
pub mod scroll_events {
    use spotscroll_core::EventId;

    pub const ANIMATE: EventId = 1;
    pub const WHEEL: EventId = 2;
    pub const DRAG_START: EventId = 3;
    pub const DRAG_END: EventId = 4;
    /// Animation or native scroll reached its resting position
    pub const SETTLE: EventId = 5;
    pub const STOP: EventId = 6;
}

/// Coarse phase of the viewport
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollPhase {
    #[default]
    Idle,
    Animating,
    Wheeling,
    Dragging,
}

impl StateTransitions for ScrollPhase {
    fn on_event(&self, event: EventId) -> Option<Self> {
        use scroll_events::*;

        match (self, event) {
            (ScrollPhase::Idle, ANIMATE) => Some(ScrollPhase::Animating),
            (ScrollPhase::Idle | ScrollPhase::Animating, WHEEL) => Some(ScrollPhase::Wheeling),
            (ScrollPhase::Wheeling, ANIMATE) => None,
            (ScrollPhase::Dragging, DRAG_START) => None,
            (_, DRAG_START) => Some(ScrollPhase::Dragging),
            (ScrollPhase::Dragging, DRAG_END) => Some(ScrollPhase::Idle),
            (ScrollPhase::Animating | ScrollPhase::Wheeling, SETTLE) => Some(ScrollPhase::Idle),
            (ScrollPhase::Animating | ScrollPhase::Wheeling | ScrollPhase::Dragging, STOP) => {
                Some(ScrollPhase::Idle)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spotscroll_core::StateMachine;

    #[test]
    fn test_bounds_from_sizes() {
        let bounds = ScrollBounds::from_sizes(Size::new(400.0, 500.0), Size::new(300.0, 1500.0));
        assert_eq!(bounds.max_top, 1000.0);
        assert_eq!(bounds.max_left, 0.0);
        assert!(bounds.overflows(Axis::Vertical));
        assert!(!bounds.overflows(Axis::Horizontal));
        assert_eq!(
            bounds.clamp(ScrollPosition::new(-5.0, 1200.0)),
            ScrollPosition::new(0.0, 1000.0)
        );
    }

    #[test]
    fn test_phase_transitions() {
        use super::scroll_events::*;

        let mut phase = StateMachine::new(ScrollPhase::Idle);
        assert_eq!(phase.send(ANIMATE), Some(ScrollPhase::Animating));
        assert_eq!(phase.send(WHEEL), Some(ScrollPhase::Wheeling));
        assert_eq!(phase.send(ANIMATE), None);
        assert_eq!(phase.send(SETTLE), Some(ScrollPhase::Idle));
        assert_eq!(phase.send(DRAG_START), Some(ScrollPhase::Dragging));
        assert_eq!(phase.send(SETTLE), None);
        assert_eq!(phase.send(DRAG_END), Some(ScrollPhase::Idle));
        assert_eq!(phase.send(STOP), None);
    }

    #[test]
    fn test_position_axis_access() {
        let mut pos = ScrollPosition::ZERO;
        pos.set(Axis::Vertical, 40.0);
        assert_eq!(pos.get(Axis::Vertical), 40.0);
        assert_eq!(pos.get(Axis::Horizontal), 0.0);
        assert_eq!(pos.to_point(), Point::new(0.0, 40.0));
    }
}
