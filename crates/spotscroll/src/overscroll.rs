//! Overscroll effect engine
//!
//! Tracks, per axis and edge, whether the host should render the edge
//! indicator. A `Once` effect is a short flash cleared by a timer; an
//! `Animated` effect follows a drag past the edge and stays until the drag
//! ends or the edge is left.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use spotscroll_animation::TimerQueue;
use spotscroll_core::{Axis, Direction, Edge};

use crate::config::{ScrollConfig, ScrollDirection};
use crate::state::{ScrollBounds, ScrollPosition};

/// Kind of edge effect
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverscrollType {
    #[default]
    None,
    /// Single flash, cleared after the effect duration
    Once,
    /// Continuous indicator while held past the edge
    Animated,
}

/// Effect state of one edge
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OverscrollStatus {
    #[serde(rename = "type")]
    pub kind: OverscrollType,
    /// Effect strength in `[0, 1]`
    pub ratio: f32,
}

impl OverscrollStatus {
    pub fn is_active(&self) -> bool {
        self.kind != OverscrollType::None
    }
}

fn slot(axis: Axis, edge: Edge) -> (usize, usize) {
    let a = match axis {
        Axis::Horizontal => 0,
        Axis::Vertical => 1,
    };
    let e = match edge {
        Edge::Before => 0,
        Edge::After => 1,
    };
    (a, e)
}

const SLOTS: [(Axis, Edge); 4] = [
    (Axis::Horizontal, Edge::Before),
    (Axis::Horizontal, Edge::After),
    (Axis::Vertical, Edge::Before),
    (Axis::Vertical, Edge::After),
];

/// Per-edge overscroll state for one viewport
#[derive(Default)]
pub struct OverscrollEffects {
    status: [[OverscrollStatus; 2]; 2],
    timers: TimerQueue<(Axis, Edge)>,
    effect_duration_ms: f64,
    rtl: bool,
}

impl OverscrollEffects {
    pub fn new(config: &ScrollConfig) -> Self {
        Self {
            status: Default::default(),
            timers: TimerQueue::new(),
            effect_duration_ms: config.overscroll_effect_duration_ms,
            rtl: config.rtl,
        }
    }

    pub fn status(&self, axis: Axis, edge: Edge) -> OverscrollStatus {
        let (a, e) = slot(axis, edge);
        self.status[a][e]
    }

    pub fn is_active(&self, axis: Axis, edge: Edge) -> bool {
        self.status(axis, edge).is_active()
    }

    /// Edges currently showing an effect
    pub fn active(&self) -> SmallVec<[(Axis, Edge, OverscrollStatus); 4]> {
        SLOTS
            .iter()
            .map(|&(axis, edge)| (axis, edge, self.status(axis, edge)))
            .filter(|(_, _, status)| status.is_active())
            .collect()
    }

    /// Show an effect on one edge
    pub fn apply(&mut self, axis: Axis, edge: Edge, kind: OverscrollType, ratio: f32, now_ms: f64) {
        let (a, e) = slot(axis, edge);
        self.status[a][e] = OverscrollStatus {
            kind,
            ratio: ratio.clamp(0.0, 1.0),
        };
        self.timers.cancel_where(|&(ax, ed)| ax == axis && ed == edge);

        if kind == OverscrollType::Once {
            self.timers.schedule(now_ms, self.effect_duration_ms, (axis, edge));
        }

        tracing::debug!("overscroll {:?} {:?} {:?} ratio {:.2}", axis, edge, kind, ratio);
    }

    /// Apply an effect if the position sits on `edge` of a scrollable axis
    pub fn check_and_apply(
        &mut self,
        axis: Axis,
        edge: Edge,
        kind: OverscrollType,
        position: ScrollPosition,
        bounds: &ScrollBounds,
        now_ms: f64,
    ) -> bool {
        if !bounds.overflows(axis) {
            return false;
        }

        let pos = position.get(axis);
        let at_edge = match edge {
            Edge::Before => pos <= 0.0,
            Edge::After => pos >= bounds.max(axis),
        };

        if at_edge {
            self.apply(axis, edge, kind, 1.0, now_ms);
        }
        at_edge
    }

    /// Edge a navigation direction pushes against
    pub fn edge_for_direction(&self, direction: Direction) -> (Axis, Edge) {
        match direction {
            Direction::Up => (Axis::Vertical, Edge::Before),
            Direction::Down => (Axis::Vertical, Edge::After),
            Direction::Left if self.rtl => (Axis::Horizontal, Edge::After),
            Direction::Left => (Axis::Horizontal, Edge::Before),
            Direction::Right if self.rtl => (Axis::Horizontal, Edge::Before),
            Direction::Right => (Axis::Horizontal, Edge::After),
        }
    }

    /// Flash the edge `direction` pushes against, if the viewport is on it
    pub fn check_by_direction(
        &mut self,
        direction: Direction,
        scroll_direction: ScrollDirection,
        position: ScrollPosition,
        bounds: &ScrollBounds,
        now_ms: f64,
    ) -> bool {
        let (axis, edge) = self.edge_for_direction(direction);
        if !scroll_direction.allows(axis) {
            return false;
        }
        self.check_and_apply(axis, edge, OverscrollType::Once, position, bounds, now_ms)
    }

    pub fn clear(&mut self, axis: Axis, edge: Edge) {
        let (a, e) = slot(axis, edge);
        if self.status[a][e].is_active() {
            tracing::trace!("overscroll cleared {:?} {:?}", axis, edge);
        }
        self.status[a][e] = OverscrollStatus::default();
        self.timers.cancel_where(|&(ax, ed)| ax == axis && ed == edge);
    }

    pub fn clear_all(&mut self) {
        self.status = Default::default();
        self.timers.clear();
    }

    /// Clear effects on edges the viewport has moved away from
    pub fn on_position(&mut self, position: ScrollPosition, bounds: &ScrollBounds) {
        for (axis, edge) in SLOTS {
            if !self.is_active(axis, edge) {
                continue;
            }
            let pos = position.get(axis);
            let on_edge = match edge {
                Edge::Before => pos <= 0.0,
                Edge::After => pos >= bounds.max(axis),
            };
            if !on_edge {
                self.clear(axis, edge);
            }
        }
    }

    /// Expire finished `Once` effects
    pub fn tick(&mut self, now_ms: f64) {
        for (axis, edge) in self.timers.advance(now_ms) {
            let (a, e) = slot(axis, edge);
            self.status[a][e] = OverscrollStatus::default();
            tracing::trace!("overscroll expired {:?} {:?}", axis, edge);
        }
    }

    pub fn next_deadline(&self) -> Option<f64> {
        self.timers.next_deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spotscroll_core::Size;

    fn bounds() -> ScrollBounds {
        ScrollBounds::from_sizes(Size::new(500.0, 500.0), Size::new(1500.0, 1500.0))
    }

    #[test]
    fn test_once_effect_expires() {
        let mut fx = OverscrollEffects::new(&ScrollConfig::default());
        fx.apply(Axis::Vertical, Edge::Before, OverscrollType::Once, 1.0, 0.0);
        assert!(fx.is_active(Axis::Vertical, Edge::Before));

        fx.tick(299.0);
        assert!(fx.is_active(Axis::Vertical, Edge::Before));
        fx.tick(300.0);
        assert!(!fx.is_active(Axis::Vertical, Edge::Before));
    }

    #[test]
    fn test_reapply_restarts_timer() {
        let mut fx = OverscrollEffects::new(&ScrollConfig::default());
        fx.apply(Axis::Vertical, Edge::After, OverscrollType::Once, 1.0, 0.0);
        fx.apply(Axis::Vertical, Edge::After, OverscrollType::Once, 1.0, 200.0);
        fx.tick(300.0);
        assert!(fx.is_active(Axis::Vertical, Edge::After));
        fx.tick(500.0);
        assert!(!fx.is_active(Axis::Vertical, Edge::After));
    }

    #[test]
    fn test_check_only_applies_on_edge() {
        let mut fx = OverscrollEffects::new(&ScrollConfig::default());
        let b = bounds();

        assert!(!fx.check_and_apply(
            Axis::Vertical,
            Edge::Before,
            OverscrollType::Once,
            ScrollPosition::new(0.0, 40.0),
            &b,
            0.0
        ));
        assert!(fx.check_and_apply(
            Axis::Vertical,
            Edge::After,
            OverscrollType::Once,
            ScrollPosition::new(0.0, 1000.0),
            &b,
            0.0
        ));
        assert_eq!(fx.active().len(), 1);
    }

    #[test]
    fn test_rtl_swaps_horizontal_edges() {
        let ltr = OverscrollEffects::new(&ScrollConfig::default());
        let rtl = OverscrollEffects::new(&ScrollConfig::default().with_rtl(true));

        assert_eq!(ltr.edge_for_direction(Direction::Left), (Axis::Horizontal, Edge::Before));
        assert_eq!(rtl.edge_for_direction(Direction::Left), (Axis::Horizontal, Edge::After));
        assert_eq!(rtl.edge_for_direction(Direction::Up), (Axis::Vertical, Edge::Before));
    }

    #[test]
    fn test_leaving_edge_clears_effect() {
        let mut fx = OverscrollEffects::new(&ScrollConfig::default());
        let b = bounds();
        fx.apply(Axis::Vertical, Edge::Before, OverscrollType::Animated, 0.5, 0.0);

        fx.on_position(ScrollPosition::new(0.0, 0.0), &b);
        assert!(fx.is_active(Axis::Vertical, Edge::Before));

        fx.on_position(ScrollPosition::new(0.0, 10.0), &b);
        assert!(!fx.is_active(Axis::Vertical, Edge::Before));
    }

    #[test]
    fn test_direction_check_respects_scroll_direction() {
        let mut fx = OverscrollEffects::new(&ScrollConfig::default());
        let b = bounds();
        assert!(!fx.check_by_direction(
            Direction::Left,
            ScrollDirection::Vertical,
            ScrollPosition::ZERO,
            &b,
            0.0
        ));
        assert!(fx.check_by_direction(
            Direction::Up,
            ScrollDirection::Vertical,
            ScrollPosition::ZERO,
            &b,
            0.0
        ));
    }
}
