//! Wheel classification
//!
//! Engine-animated scrollers get the delta variant: every wheel step turns
//! into a capped pixel distance added to the accumulated target. Native
//! scrollers get the raw variant, where the host scrolls vertical content
//! by itself and the engine only intercepts what the host cannot do:
//! vertical wheel over a scrollbar and horizontal wheel anywhere.

use spotscroll_core::{Axis, Edge, EventResponse, WheelEvent};

use crate::host::{ScrollEnv, Spotlight};
use crate::input::direction_sign;
use crate::overscroll::OverscrollType;
use crate::scroller::Scroller;
use crate::state::{InputType, ScrollBounds};
use crate::strategy::WheelVariant;

/// Delta used for scrolling: vertical wheel, else horizontal tilt
fn event_delta(event: &WheelEvent) -> f32 {
    if event.delta_y != 0.0 {
        event.delta_y
    } else {
        event.delta_x
    }
}

fn edge_for(delta: f32) -> Edge {
    if delta > 0.0 {
        Edge::After
    } else {
        Edge::Before
    }
}

impl Scroller {
    /// Wheel rotated over the scroll region
    pub fn on_wheel(&mut self, env: &mut ScrollEnv<'_>, event: &WheelEvent) -> EventResponse {
        match self.strategy.wheel_variant() {
            WheelVariant::Delta => self.on_wheel_delta(env, event),
            WheelVariant::Raw => self.on_wheel_raw(env, event),
        }
    }

    fn on_wheel_delta(&mut self, env: &mut ScrollEnv<'_>, event: &WheelEvent) -> EventResponse {
        let mut response = EventResponse::IGNORED;

        if self.bridge.state().is_dragging {
            response.prevent_default();
            response.stop_propagation();
            return response;
        }

        let Some(bounds) = self.bounds(env) else {
            return response;
        };
        let vertical = self.bridge.can_scroll_vertically(&bounds);
        let horizontal = self.bridge.can_scroll_horizontally(&bounds);

        if env.host.current().is_some() {
            env.host.blur();
        }
        self.show_thumbs(&bounds);

        let raw = event_delta(event);
        let delta = if vertical {
            self.wheel_distance(event, raw, &bounds, Axis::Vertical)
        } else if horizontal {
            self.wheel_distance(event, raw, &bounds, Axis::Horizontal)
        } else {
            0.0
        };

        self.bridge.note_direction(direction_sign(delta));

        if delta != 0.0 {
            self.bridge.begin_wheel();
            if !self.config.spotlight_container_disabled {
                env.content.set_container_disabled(true);
            }
            self.scroll_to_accumulated_target(env, delta, vertical, self.config.overscroll_effect_on.wheel);
            response.prevent_default();
            response.stop_propagation();
        } else {
            self.start_hiding_thumbs(env.now_ms);
        }

        response
    }

    fn on_wheel_raw(&mut self, env: &mut ScrollEnv<'_>, event: &WheelEvent) -> EventResponse {
        let mut response = EventResponse::IGNORED;
        let overscroll_required = self.config.overscroll_effect_on.wheel;

        let Some(bounds) = self.bounds(env) else {
            return response;
        };
        let vertical = self.bridge.can_scroll_vertically(&bounds);
        let horizontal = self.bridge.can_scroll_horizontally(&bounds);
        let raw = event_delta(event);
        let position = self.bridge.position();
        let now = env.now_ms;

        if env.host.current().is_some() {
            env.host.blur();
        }
        self.show_thumbs(&bounds);

        let mut delta = 0.0;
        let mut hide_thumbs = false;

        let axis = if vertical {
            Some(Axis::Vertical)
        } else if horizontal {
            Some(Axis::Horizontal)
        } else {
            None
        };

        if let Some(axis) = axis {
            let pos = position.get(axis);
            let max = bounds.max(axis);
            let has_room = (raw < 0.0 && pos > 0.0) || (raw > 0.0 && pos < max);

            if has_room {
                if !self.bridge.state().is_wheeling {
                    if !self.config.spotlight_container_disabled {
                        env.content.set_container_disabled(true);
                    }
                    self.bridge.begin_wheel();
                }

                // Vertical content scrolls natively; only the scrollbar needs help
                let intercept = axis == Axis::Horizontal || event.on_scrollbar;
                if intercept {
                    delta = self.wheel_distance(event, raw, &bounds, axis);
                    hide_thumbs = delta == 0.0;
                    response.prevent_default();
                } else if overscroll_required {
                    self.overscroll
                        .check_and_apply(axis, edge_for(raw), OverscrollType::Once, position, &bounds, now);
                }
                response.stop_propagation();
            } else {
                let at_edge = (raw < 0.0 && pos <= 0.0) || (raw > 0.0 && pos >= max);
                if overscroll_required && at_edge {
                    self.overscroll.apply(axis, edge_for(raw), OverscrollType::Once, 1.0, now);
                }
                hide_thumbs = true;
            }
        }

        if delta != 0.0 {
            response.prevent_default();
            self.bridge.note_direction(direction_sign(delta));
            self.bridge.set_last_input_type(InputType::Wheel);
            self.scroll_to_accumulated_target(env, delta, vertical, overscroll_required);
        }

        if hide_thumbs {
            self.start_hiding_thumbs(now);
        }

        response
    }

    fn wheel_distance(&self, event: &WheelEvent, raw: f32, bounds: &ScrollBounds, axis: Axis) -> f32 {
        let max_pixel = bounds.client(axis) * self.config.wheel_max_pixel_multiplier;
        self.bridge.calculate_distance_by_wheel(event.delta_mode, raw, max_pixel)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ScrollConfig, ScrollMode};
    use crate::headless::{vertical_list, HeadlessFixture};
    use crate::host::{ScrollEnv, Spotlight};
    use crate::monitor::PageKeyMonitor;
    use crate::scroller::Scroller;
    use spotscroll_core::{Axis, Edge, WheelEvent};

    fn mounted(config: ScrollConfig) -> (HeadlessFixture, Scroller) {
        let mut fx = vertical_list(500.0, 100.0, 15);
        let mut scroller = Scroller::new(config, PageKeyMonitor::shared());
        let mut env = ScrollEnv::new(&mut fx.host, &mut fx.content, 0.0);
        scroller.mount(&mut env, fx.container, fx.content_node);
        (fx, scroller)
    }

    #[test]
    fn test_delta_wheel_accumulates() {
        let (mut fx, mut scroller) = mounted(ScrollConfig::default());
        fx.host.focus(fx.items[1]);
        let mut env = ScrollEnv::new(&mut fx.host, &mut fx.content, 0.0);

        // 40px * 1.5 = 60px per step, under the 100px cap
        let response = scroller.on_wheel(&mut env, &WheelEvent::vertical(40.0));
        assert!(response.prevent_default);
        assert_eq!(env.host.current(), None);
        assert!(scroller.state().is_wheeling);
        assert_eq!(scroller.bridge().animation_target().map(|p| p.top), Some(60.0));

        scroller.on_wheel(&mut env, &WheelEvent::vertical(40.0));
        assert_eq!(scroller.bridge().animation_target().map(|p| p.top), Some(120.0));

        drop(env);
        assert!(fx.content.is_container_disabled());
    }

    #[test]
    fn test_delta_wheel_is_capped() {
        let (mut fx, mut scroller) = mounted(ScrollConfig::default());
        let mut env = ScrollEnv::new(&mut fx.host, &mut fx.content, 0.0);

        scroller.on_wheel(&mut env, &WheelEvent::vertical(500.0));
        assert_eq!(scroller.bridge().animation_target().map(|p| p.top), Some(100.0));
    }

    #[test]
    fn test_wheel_at_edge_flashes_without_animating() {
        let (mut fx, mut scroller) = mounted(ScrollConfig::default());
        let mut env = ScrollEnv::new(&mut fx.host, &mut fx.content, 0.0);

        scroller.on_wheel(&mut env, &WheelEvent::vertical(-40.0));
        assert!(!scroller.is_animating());
        assert!(scroller.overscroll().is_active(Axis::Vertical, Edge::Before));
        assert_eq!(scroller.position().top, 0.0);
    }

    #[test]
    fn test_raw_wheel_over_content_left_to_host() {
        let (mut fx, mut scroller) = mounted(ScrollConfig::default().with_mode(ScrollMode::Native));
        let mut env = ScrollEnv::new(&mut fx.host, &mut fx.content, 0.0);

        let response = scroller.on_wheel(&mut env, &WheelEvent::vertical(40.0));
        assert!(!response.prevent_default);
        assert!(response.stop_propagation);
        assert!(scroller.state().is_wheeling);
        assert!(!scroller.is_animating());
    }

    #[test]
    fn test_raw_wheel_on_scrollbar_scrolls() {
        let (mut fx, mut scroller) = mounted(ScrollConfig::default().with_mode(ScrollMode::Native));
        let mut env = ScrollEnv::new(&mut fx.host, &mut fx.content, 0.0);

        let event = WheelEvent {
            delta_y: 40.0,
            on_scrollbar: true,
            ..Default::default()
        };
        let response = scroller.on_wheel(&mut env, &event);
        assert!(response.prevent_default);
        assert_eq!(scroller.bridge().animation_target().map(|p| p.top), Some(60.0));
    }
}
