//! Scroll animator bridge
//!
//! Owns [`ViewportState`] and the animator that moves it. All position
//! changes go through here:
//!
//! - [`start`](ScrollAnimatorBridge::start) animates or jumps to a target,
//!   redirecting a same-direction animation instead of restarting it
//! - [`scroll_to_accumulated_target`](ScrollAnimatorBridge::scroll_to_accumulated_target)
//!   adds a delta to the in-flight destination so held keys and wheel bursts
//!   keep extending one animation
//! - [`stop`](ScrollAnimatorBridge::stop) finalises the current operation
//!
//! Targets are always clamped into `[0, max]`. A request that clamps to the
//! current position never animates; it flashes the overscroll effect on the
//! edge it pushed against instead, when the caller asks for it.

use spotscroll_animation::{AnimationFrame, ScrollAnimator};
use spotscroll_core::{Axis, DeltaMode, Edge, NodeId, StateMachine};

use crate::config::{ScrollConfig, ScrollDirection};
use crate::host::Layout;
use crate::overscroll::{OverscrollEffects, OverscrollType};
use crate::state::{scroll_events, InputType, ScrollBounds, ScrollPhase, ScrollPosition, ViewportState};

const AXES: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

/// A request to move the viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StartRequest {
    pub target: ScrollPosition,
    pub animate: bool,
    /// Flash the edge effect if the request is clamped away entirely
    pub overscroll_effect: bool,
}

impl StartRequest {
    pub fn animated(target: ScrollPosition) -> Self {
        Self {
            target,
            animate: true,
            overscroll_effect: false,
        }
    }

    pub fn immediate(target: ScrollPosition) -> Self {
        Self {
            target,
            animate: false,
            overscroll_effect: false,
        }
    }

    pub fn with_overscroll_effect(mut self, enabled: bool) -> Self {
        self.overscroll_effect = enabled;
        self
    }
}

/// What a start request did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartOutcome {
    /// Container or content not attached; nothing happened
    Detached,
    /// The clamped target equals the current position
    Clamped,
    /// Position was set immediately
    Jumped,
    /// An animation is running toward the target
    Animating,
}

/// Alignment for programmatic scrolls
///
/// Horizontal alignments are logical: `Left` is the start edge, which is
/// the physical right edge in right-to-left layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollAlign {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Programmatic scroll request
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollToOptions {
    #[serde(default)]
    pub position: Option<ScrollPosition>,
    #[serde(default)]
    pub align: Option<ScrollAlign>,
    /// Item index resolved by the content
    #[serde(default)]
    pub index: Option<usize>,
    #[serde(default)]
    pub node: Option<NodeId>,
    #[serde(default = "default_animate")]
    pub animate: bool,
    /// Focus the indexed item or node once the scroll settles
    #[serde(default)]
    pub focus: bool,
}

fn default_animate() -> bool {
    true
}

impl ScrollToOptions {
    pub fn position(position: ScrollPosition) -> Self {
        Self {
            position: Some(position),
            animate: true,
            ..Default::default()
        }
    }

    pub fn align(align: ScrollAlign) -> Self {
        Self {
            align: Some(align),
            animate: true,
            ..Default::default()
        }
    }

    pub fn index(index: usize) -> Self {
        Self {
            index: Some(index),
            animate: true,
            ..Default::default()
        }
    }

    pub fn node(node: NodeId) -> Self {
        Self {
            node: Some(node),
            animate: true,
            ..Default::default()
        }
    }

    pub fn with_animate(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    pub fn with_focus(mut self, focus: bool) -> Self {
        self.focus = focus;
        self
    }
}

#[derive(Clone, Copy, Debug)]
struct WheelSettings {
    pixel_multiplier: f32,
    pixels_per_line: f32,
}

/// Owner of the viewport's scroll position
pub struct ScrollAnimatorBridge {
    state: ViewportState,
    phase: StateMachine<ScrollPhase>,
    animator: ScrollAnimator,
    accumulated: bool,
    accumulated_target: ScrollPosition,
    container: Option<NodeId>,
    content: Option<NodeId>,
    direction: ScrollDirection,
    duration_ms: f64,
    wheel: WheelSettings,
    /// Content height seen by the last focus calculation
    last_scroll_height: f32,
}

impl ScrollAnimatorBridge {
    pub fn new(config: &ScrollConfig) -> Self {
        Self {
            state: ViewportState::default(),
            phase: StateMachine::new(ScrollPhase::Idle),
            animator: ScrollAnimator::new(config.easing),
            accumulated: false,
            accumulated_target: ScrollPosition::ZERO,
            container: None,
            content: None,
            direction: config.direction,
            duration_ms: config.animation_duration_ms,
            wheel: WheelSettings {
                pixel_multiplier: config.wheel_pixel_multiplier,
                pixels_per_line: config.pixels_per_line,
            },
            last_scroll_height: 0.0,
        }
    }

    // =========================================================================
    // Refs
    // =========================================================================

    pub fn attach(&mut self, container: NodeId, content: NodeId) {
        self.container = Some(container);
        self.content = Some(content);
        tracing::debug!("bridge attached container {:?} content {:?}", container, content);
    }

    pub fn detach(&mut self) {
        self.container = None;
        self.content = None;
    }

    pub fn container(&self) -> Option<NodeId> {
        self.container
    }

    pub fn content(&self) -> Option<NodeId> {
        self.content
    }

    // =========================================================================
    // State access
    // =========================================================================

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn phase(&self) -> ScrollPhase {
        self.phase.current()
    }

    pub fn phase_history(&self) -> &[(ScrollPhase, spotscroll_core::EventId, ScrollPhase)] {
        self.phase.history()
    }

    pub fn position(&self) -> ScrollPosition {
        self.state.position()
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    /// Destination of the running animation
    pub fn animation_target(&self) -> Option<ScrollPosition> {
        self.animator.target().map(ScrollPosition::from_point)
    }

    pub fn is_accumulating(&self) -> bool {
        self.accumulated
    }

    pub fn set_last_input_type(&mut self, input: InputType) {
        self.state.last_input_type = Some(input);
    }

    pub fn last_scroll_height(&self) -> f32 {
        self.last_scroll_height
    }

    pub fn set_last_scroll_height(&mut self, height: f32) {
        self.last_scroll_height = height;
    }

    /// Record the sign of a directional request
    ///
    /// A reversal drops the accumulated target so the next request starts
    /// from the current position. Returns whether the direction changed.
    pub fn note_direction(&mut self, direction: i8) -> bool {
        if direction == self.state.wheel_direction {
            return false;
        }
        if self.accumulated {
            tracing::debug!(
                "direction {} -> {}, dropping accumulated target",
                self.state.wheel_direction,
                direction
            );
        }
        self.accumulated = false;
        self.state.wheel_direction = direction;
        true
    }

    // =========================================================================
    // Bounds
    // =========================================================================

    /// Recompute scroll bounds from the current layout
    pub fn get_scroll_bounds<L: Layout + ?Sized>(&mut self, layout: &L) -> Option<ScrollBounds> {
        let client = layout.rect(self.container?)?.size();
        let scroll = layout.scroll_size(self.content?)?;
        let bounds = ScrollBounds::from_sizes(client, scroll);
        self.state.set_bounds(&bounds);
        Some(bounds)
    }

    pub fn can_scroll_horizontally(&self, bounds: &ScrollBounds) -> bool {
        self.direction.allows(Axis::Horizontal) && bounds.max_left > 0.0
    }

    pub fn can_scroll_vertically(&self, bounds: &ScrollBounds) -> bool {
        self.direction.allows(Axis::Vertical) && bounds.max_top > 0.0
    }

    /// Pixel distance for one wheel step, capped at `max_pixel`
    pub fn calculate_distance_by_wheel(&self, mode: DeltaMode, delta: f32, max_pixel: f32) -> f32 {
        let distance = match mode {
            DeltaMode::Pixel => delta * self.wheel.pixel_multiplier,
            DeltaMode::Line => delta * self.wheel.pixels_per_line * self.wheel.pixel_multiplier,
            DeltaMode::Page if delta < 0.0 => -max_pixel,
            DeltaMode::Page if delta > 0.0 => max_pixel,
            DeltaMode::Page => 0.0,
        };
        distance.clamp(-max_pixel, max_pixel)
    }

    // =========================================================================
    // Movement
    // =========================================================================

    /// Move toward `request.target`, animating when asked
    pub fn start<L: Layout + ?Sized>(
        &mut self,
        layout: &mut L,
        overscroll: &mut OverscrollEffects,
        request: StartRequest,
        now_ms: f64,
    ) -> StartOutcome {
        let Some(bounds) = self.get_scroll_bounds(&*layout) else {
            tracing::debug!("start ignored, viewport not attached");
            return StartOutcome::Detached;
        };

        let current = self.state.position();
        let mut requested = request.target;
        for axis in AXES {
            if !self.direction.allows(axis) {
                requested.set(axis, current.get(axis));
            }
        }
        let target = bounds.clamp(requested);

        if target == current {
            // A request back toward the edge we are leaving cancels the animation
            if let Some(in_flight) = self.animation_target() {
                if !same_direction(current, in_flight, requested) {
                    self.animator.stop();
                    self.accumulated = false;
                    self.state.animating = false;
                    self.phase.send(scroll_events::STOP);
                    tracing::debug!("reversed request at the edge cancels the animation");
                }
            }
            if request.overscroll_effect {
                for axis in AXES {
                    let wanted = requested.get(axis);
                    let edge = if wanted < 0.0 {
                        Edge::Before
                    } else if wanted > bounds.max(axis) {
                        Edge::After
                    } else {
                        continue;
                    };
                    overscroll.apply(axis, edge, OverscrollType::Once, 1.0, now_ms);
                }
            }
            tracing::debug!(
                "scroll request ({:.1}, {:.1}) clamped to current position",
                requested.left,
                requested.top
            );
            return StartOutcome::Clamped;
        }

        if request.animate && self.duration_ms > 0.0 {
            let same_direction = self
                .animation_target()
                .map_or(false, |in_flight| same_direction(current, in_flight, target));

            if same_direction {
                self.animator.extend(target.to_point(), self.duration_ms, now_ms);
            } else {
                self.animator
                    .start(current.to_point(), target.to_point(), self.duration_ms, now_ms);
            }
            self.state.animating = true;
            self.phase.send(scroll_events::ANIMATE);
            tracing::debug!(
                "animating to ({:.1}, {:.1}){}",
                target.left,
                target.top,
                if same_direction { " (extended)" } else { "" }
            );
            StartOutcome::Animating
        } else {
            self.animator.stop();
            self.state.animating = false;
            self.apply_position(layout, target);
            tracing::debug!("jumped to ({:.1}, {:.1})", target.left, target.top);
            StartOutcome::Jumped
        }
    }

    /// Add `delta` to the accumulated destination on one axis and animate there
    pub fn scroll_to_accumulated_target<L: Layout + ?Sized>(
        &mut self,
        layout: &mut L,
        overscroll: &mut OverscrollEffects,
        delta: f32,
        vertical: bool,
        overscroll_effect: bool,
        now_ms: f64,
    ) -> StartOutcome {
        let axis = if vertical { Axis::Vertical } else { Axis::Horizontal };

        if !self.accumulated {
            self.accumulated_target = self.state.position();
            self.accumulated = true;
        }

        let mut requested = self.accumulated_target;
        requested.set(axis, requested.get(axis) + delta);

        let outcome = self.start(
            layout,
            overscroll,
            StartRequest {
                target: requested,
                animate: true,
                overscroll_effect,
            },
            now_ms,
        );

        let max = match axis {
            Axis::Horizontal => self.state.max_left,
            Axis::Vertical => self.state.max_top,
        };
        self.accumulated_target
            .set(axis, requested.get(axis).clamp(0.0, max));
        outcome
    }

    /// Advance the animation and apply the sampled position
    pub fn tick<L: Layout + ?Sized>(&mut self, layout: &mut L, now_ms: f64) -> Option<AnimationFrame> {
        if !self.animator.is_animating() {
            return None;
        }

        let frame = self.animator.sample(now_ms);
        self.apply_position(layout, ScrollPosition::from_point(frame.position));
        tracing::trace!(
            "frame ({:.1}, {:.1}){}",
            frame.position.x,
            frame.position.y,
            if frame.done { " done" } else { "" }
        );

        if frame.done {
            self.state.animating = false;
            self.phase.send(scroll_events::SETTLE);
        }
        Some(frame)
    }

    /// Finalise the current scroll operation
    ///
    /// Returns whether anything was in progress.
    pub fn stop(&mut self) -> bool {
        let was_active = self.animator.is_animating()
            || self.state.animating
            || self.state.is_dragging
            || self.state.is_wheeling
            || self.state.scrolling;

        self.animator.stop();
        self.accumulated = false;
        self.state.animating = false;
        self.state.is_dragging = false;
        self.state.is_wheeling = false;
        self.state.scrolling = false;
        self.phase.send(scroll_events::STOP);
        was_active
    }

    /// Position reported by the host after it scrolled natively
    pub fn sync_position(&mut self, position: ScrollPosition) {
        self.state.set_position(position);
        self.animator.sync(position.to_point());
        self.state.scrolling = true;
    }

    /// The host is scrolling natively (or the engine is standing in for it)
    pub fn mark_scrolling(&mut self) {
        self.state.scrolling = true;
    }

    pub fn begin_wheel(&mut self) {
        self.state.is_wheeling = true;
        self.state.last_input_type = Some(InputType::Wheel);
        self.phase.send(scroll_events::WHEEL);
    }

    pub fn begin_drag(&mut self) {
        self.animator.stop();
        self.accumulated = false;
        self.state.animating = false;
        self.state.is_dragging = true;
        self.state.last_input_type = Some(InputType::Drag);
        self.phase.send(scroll_events::DRAG_START);
    }

    /// Scroll by a drag delta, returning how far the request overshot the bounds
    pub fn drag_by<L: Layout + ?Sized>(&mut self, layout: &mut L, dx: f32, dy: f32) -> ScrollPosition {
        let Some(bounds) = self.get_scroll_bounds(&*layout) else {
            return ScrollPosition::ZERO;
        };

        let current = self.state.position();
        let mut requested = ScrollPosition::new(current.left + dx, current.top + dy);
        for axis in AXES {
            if !self.direction.allows(axis) {
                requested.set(axis, current.get(axis));
            }
        }
        let target = bounds.clamp(requested);
        if target != current {
            self.apply_position(layout, target);
        }

        ScrollPosition::new(requested.left - target.left, requested.top - target.top)
    }

    pub fn end_drag(&mut self) {
        self.state.is_dragging = false;
        self.phase.send(scroll_events::DRAG_END);
    }

    /// Target for an alignment request
    pub fn align_target(&self, align: ScrollAlign, bounds: &ScrollBounds) -> ScrollPosition {
        let current = self.state.position();
        let (left, top) = match align {
            ScrollAlign::Top => (current.left, 0.0),
            ScrollAlign::Bottom => (current.left, bounds.max_top),
            ScrollAlign::Left => (0.0, current.top),
            ScrollAlign::Right => (bounds.max_left, current.top),
            ScrollAlign::TopLeft => (0.0, 0.0),
            ScrollAlign::TopRight => (bounds.max_left, 0.0),
            ScrollAlign::BottomLeft => (0.0, bounds.max_top),
            ScrollAlign::BottomRight => (bounds.max_left, bounds.max_top),
        };
        ScrollPosition::new(left, top)
    }

    /// Target that brings `node` to the start of the viewport
    pub fn node_target<L: Layout + ?Sized>(&self, layout: &L, node: NodeId) -> Option<ScrollPosition> {
        let content = layout.rect(self.content?)?;
        let rect = layout.rect(node)?;
        Some(ScrollPosition::new(rect.x - content.x, rect.y - content.y))
    }

    fn apply_position<L: Layout + ?Sized>(&mut self, layout: &mut L, position: ScrollPosition) {
        self.state.set_position(position);
        self.animator.sync(position.to_point());
        if let Some(content) = self.content {
            layout.set_scroll_position(content, position);
        }
    }
}

/// No axis reverses between the in-flight and the new destination
fn same_direction(current: ScrollPosition, in_flight: ScrollPosition, target: ScrollPosition) -> bool {
    AXES.iter().all(|&axis| {
        let a = in_flight.get(axis) - current.get(axis);
        let b = target.get(axis) - current.get(axis);
        a * b >= 0.0
    })
}
