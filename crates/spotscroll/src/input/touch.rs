//! Touch, flick, mouse down and drag
//!
//! Direct manipulation takes over from focus navigation: the focused item is
//! blurred and the spotlight container disabled until the scroll settles.
//! Drag is only honoured on touchscreen platforms.

use spotscroll_core::{Axis, Edge, EventResponse, Point};

use crate::config::ScrollMode;
use crate::host::{ScrollEnv, Spotlight};
use crate::overscroll::OverscrollType;
use crate::scroller::{ScrollTimer, Scroller};
use crate::state::InputType;

/// Drag tracking between move events
#[derive(Clone, Debug, Default)]
pub(crate) struct DragState {
    pub(crate) last: Option<Point>,
}

impl Scroller {
    pub fn on_touch_start(&mut self, env: &mut ScrollEnv<'_>) -> EventResponse {
        if !env.host.is_paused() && env.host.current().is_some() {
            env.host.blur();
        }
        EventResponse::IGNORED
    }

    pub fn on_mouse_down(&mut self, env: &mut ScrollEnv<'_>) -> EventResponse {
        let mut response = EventResponse::IGNORED;
        if self.config.spotlight_container_disabled {
            response.prevent_default();
        } else if self.strategy.mode() == ScrollMode::Native {
            env.content.set_container_disabled(false);
        }
        response
    }

    /// A flick gesture along `axis`
    pub fn on_flick(&mut self, env: &mut ScrollEnv<'_>, axis: Axis) {
        if env.host.current().is_some() {
            env.host.blur();
        }

        let Some(bounds) = self.bounds(env) else {
            return;
        };
        let scrollable = match axis {
            Axis::Vertical => self.bridge.can_scroll_vertically(&bounds),
            Axis::Horizontal => self.bridge.can_scroll_horizontally(&bounds),
        };
        if scrollable && !self.config.spotlight_container_disabled {
            env.content.set_container_disabled(true);
        }
    }

    pub fn on_drag_start(&mut self, env: &mut ScrollEnv<'_>, point: Point) -> EventResponse {
        if !self.config.platform.touchscreen || self.bridge.container().is_none() {
            return EventResponse::IGNORED;
        }

        if env.host.current().is_some() {
            env.host.blur();
        }
        self.bridge.begin_drag();
        self.timers.cancel_where(|t| *t == ScrollTimer::ScrollStop);
        if !self.config.spotlight_container_disabled {
            env.content.set_container_disabled(true);
        }
        self.drag.last = Some(point);
        tracing::debug!("drag started at ({:.1}, {:.1})", point.x, point.y);

        let mut response = EventResponse::IGNORED;
        response.prevent_default();
        response
    }

    /// Pointer moved while dragging; content follows the pointer
    pub fn on_drag_move(&mut self, env: &mut ScrollEnv<'_>, point: Point) {
        if !self.config.platform.touchscreen || !self.bridge.state().is_dragging {
            return;
        }
        let Some(last) = self.drag.last.replace(point) else {
            return;
        };

        let overshoot = self
            .bridge
            .drag_by(&mut *env.host, last.x - point.x, last.y - point.y);
        self.after_position_change(env);

        if !self.overscroll_enabled(Some(InputType::Drag)) {
            return;
        }
        let Some(bounds) = self.bounds(env) else {
            return;
        };

        for axis in [Axis::Horizontal, Axis::Vertical] {
            let beyond = overshoot.get(axis);
            if beyond == 0.0 || !bounds.overflows(axis) {
                continue;
            }
            let edge = if beyond < 0.0 { Edge::Before } else { Edge::After };
            let ratio = self.overscroll.status(axis, edge).ratio + beyond.abs() / bounds.client(axis);
            self.overscroll
                .apply(axis, edge, OverscrollType::Animated, ratio, env.now_ms);
        }
    }

    pub fn on_drag_end(&mut self, env: &mut ScrollEnv<'_>) {
        if !self.config.platform.touchscreen || !self.bridge.state().is_dragging {
            return;
        }

        self.drag.last = None;
        self.bridge.end_drag();
        for (axis, edge, status) in self.overscroll.active() {
            if status.kind == OverscrollType::Animated {
                self.overscroll.clear(axis, edge);
            }
        }
        tracing::debug!("drag ended at {:?}", self.bridge.position());
        self.stop(env);
    }
}
