//! Key classification
//!
//! Page up/down scroll by `client size × page_multiplier` when the key
//! arrives through the scroll content. The focused item is blurred for the
//! duration of the scroll and a point intent remembers where focus should
//! land once it settles. Arrow keys only record the input type; when focus
//! has nowhere to go in that direction the edge effect flashes.

use spotscroll_core::{Axis, Direction, EventResponse, KeyEvent, NodeId, Point};

use crate::config::ScrollMode;
use crate::focus::FocusIntent;
use crate::host::{Layout, ScrollEnv, ScrollHost, Spotlight};
use crate::scroller::Scroller;
use crate::state::InputType;

impl Scroller {
    /// Key pressed while focus is inside the scroll region
    pub fn on_key_down(&mut self, env: &mut ScrollEnv<'_>, event: &KeyEvent) -> EventResponse {
        let mut response = EventResponse::IGNORED;
        if event.key.is_page_key() {
            response.prevent_default();
        }

        self.focus.animate_on_focus = true;

        if event.repeat {
            // Held keys keep the bookkeeping current but never re-trigger
            if event.key.is_page_key() {
                self.bridge.set_last_input_type(InputType::PageKey);
            } else if Direction::from_key(event.key).is_some() {
                self.bridge.set_last_input_type(InputType::ArrowKey);
            }
            return response;
        }

        if !self.has_focus(&*env.host) {
            return response;
        }

        if event.key.is_page_key() {
            if !self.config.direction.allows(Axis::Vertical) {
                return response;
            }
            let direction = page_direction(event);

            if event.target.map_or(false, |target| self.is_content(&*env.host, target)) {
                response.stop_propagation();
                self.scroll_by_page(env, direction);
            }
            if self.config.overscroll_effect_on.page_key {
                self.check_overscroll_by_direction(env, direction);
            }
        } else if let Some(direction) = Direction::from_key(event.key) {
            if self.strategy.mode() == ScrollMode::Js || !env.host.pointer_mode() {
                self.bridge.set_last_input_type(InputType::ArrowKey);

                if self.config.overscroll_effect_on.arrow_key {
                    let next = env
                        .host
                        .current()
                        .and_then(|current| env.host.target_by_direction(direction, current));
                    if next.is_none() {
                        self.check_overscroll_by_direction(env, direction);
                    }
                }
            }
        }

        response
    }

    /// Page key routed by the page key monitor while nothing is focused
    ///
    /// Returns whether the key was consumed.
    pub fn scroll_by_page_on_pointer_mode(&mut self, env: &mut ScrollEnv<'_>, event: &KeyEvent) -> bool {
        self.focus.animate_on_focus = true;

        if event.repeat || !event.key.is_page_key() || !self.config.direction.allows(Axis::Vertical) {
            return false;
        }

        let direction = page_direction(event);
        self.scroll_by_page(env, direction);
        if self.config.overscroll_effect_on.page_key {
            self.check_overscroll_by_direction(env, direction);
        }
        true
    }

    /// Scroll one page toward `direction`
    pub fn scroll_by_page(&mut self, env: &mut ScrollEnv<'_>, direction: Direction) {
        let Some(bounds) = self.bounds(env) else {
            return;
        };

        let axis = direction.axis();
        let backward = matches!(direction, Direction::Up | Direction::Left);
        let factor: i8 = if backward { -1 } else { 1 };
        let page_distance = f32::from(factor) * bounds.client(axis) * self.config.page_multiplier;

        let position = self.bridge.position().get(axis);
        let max = bounds.max(axis);
        let scroll_possible = if backward {
            self.strategy.can_scroll_backward(position)
        } else {
            self.strategy.can_scroll_forward(position, max)
        };

        self.bridge.set_last_input_type(InputType::PageKey);
        self.bridge.note_direction(factor);

        if !scroll_possible {
            tracing::trace!("page {:?} ignored at {:.1} of {:.1}", direction, position, max);
            return;
        }

        match env.host.current() {
            Some(focused) => {
                // A focused scrollbar button is not content; leave focus alone
                if self.is_content(&*env.host, focused) {
                    let landing = self.strategy.lands_on_edge(position + page_distance, max);
                    if let Some(point) = self.page_focus_point(&*env.host, focused, direction, landing) {
                        env.host.blur();
                        if !self.config.spotlight_container_disabled {
                            env.content.set_container_disabled(true);
                        }
                        self.set_intent(FocusIntent::Point { direction, point });
                    }
                }
            }
            None => {
                let point = self.monitor.lock().last_pointer();
                self.set_intent(FocusIntent::Point { direction, point });
            }
        }

        self.scroll_to_accumulated_target(
            env,
            page_distance,
            axis == Axis::Vertical,
            self.config.overscroll_effect_on.page_key,
        );
    }

    /// Flash the edge `direction` pushes against, if the viewport sits on it
    pub fn check_overscroll_by_direction(&mut self, env: &mut ScrollEnv<'_>, direction: Direction) -> bool {
        let Some(bounds) = self.bounds(env) else {
            return false;
        };
        self.overscroll.check_by_direction(
            direction,
            self.config.direction,
            self.bridge.position(),
            &bounds,
            env.now_ms,
        )
    }

    pub(crate) fn is_content<L: Layout + ?Sized>(&self, layout: &L, node: NodeId) -> bool {
        self.bridge
            .content()
            .map_or(false, |content| layout.contains(content, node))
    }

    /// Where focus should land after a page scroll from `focused`
    ///
    /// The focused item's center, clamped into the viewport; when the page
    /// reaches the edge, just inside the viewport edge instead.
    fn page_focus_point<H: ScrollHost + ?Sized>(
        &self,
        host: &H,
        focused: NodeId,
        direction: Direction,
        landing_on_edge: bool,
    ) -> Option<Point> {
        let view = host.rect(self.bridge.container()?)?;
        let item = host.rect(focused)?;
        let center = item.center();

        let mut point = Point::new(
            center.x.clamp(view.left(), view.right()),
            center.y.clamp(view.top(), view.bottom()),
        );

        if landing_on_edge {
            match direction {
                Direction::Up => point.y = view.top() + 1.0,
                Direction::Down => point.y = view.bottom() - 1.0,
                Direction::Left => point.x = view.left() + 1.0,
                Direction::Right => point.x = view.right() - 1.0,
            }
        }
        Some(point)
    }
}

fn page_direction(event: &KeyEvent) -> Direction {
    if event.key.is_page_up() {
        Direction::Up
    } else {
        Direction::Down
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{OverscrollEffectOn, ScrollConfig};
    use crate::headless::{vertical_list, HeadlessFixture};
    use crate::host::{ScrollEnv, Spotlight};
    use crate::monitor::PageKeyMonitor;
    use crate::scroller::Scroller;
    use spotscroll_core::{Axis, Edge, KeyCode, KeyEvent};

    fn mounted(config: ScrollConfig) -> (HeadlessFixture, Scroller) {
        let mut fx = vertical_list(500.0, 100.0, 15);
        let mut scroller = Scroller::new(config, PageKeyMonitor::shared());
        fx.host.focus(fx.items[0]);
        let mut env = ScrollEnv::new(&mut fx.host, &mut fx.content, 0.0);
        scroller.mount(&mut env, fx.container, fx.content_node);
        (fx, scroller)
    }

    #[test]
    fn test_page_down_scrolls_by_page() {
        let (mut fx, mut scroller) = mounted(ScrollConfig::default());
        let mut env = ScrollEnv::new(&mut fx.host, &mut fx.content, 0.0);

        let key = KeyEvent::new(KeyCode::PAGE_DOWN).with_target(fx.items[0]);
        let response = scroller.on_key_down(&mut env, &key);
        assert!(response.prevent_default);
        assert!(response.stop_propagation);
        assert_eq!(scroller.bridge().animation_target().map(|p| p.top), Some(400.0));

        env.now_ms = 1000.0;
        scroller.tick(&mut env);
        assert_eq!(scroller.position().top, 400.0);
        assert!(!scroller.is_animating());
    }

    #[test]
    fn test_repeated_key_only_records_input_type() {
        let (mut fx, mut scroller) = mounted(ScrollConfig::default());
        let mut env = ScrollEnv::new(&mut fx.host, &mut fx.content, 0.0);

        let key = KeyEvent::new(KeyCode::PAGE_DOWN).with_target(fx.items[0]).repeated();
        scroller.on_key_down(&mut env, &key);
        assert!(!scroller.is_animating());
        assert_eq!(
            scroller.state().last_input_type,
            Some(crate::state::InputType::PageKey)
        );
    }

    #[test]
    fn test_page_up_at_top_flashes_edge_when_enabled() {
        let on = OverscrollEffectOn {
            page_key: true,
            ..Default::default()
        };
        let (mut fx, mut scroller) = mounted(ScrollConfig::default().with_overscroll_effect_on(on));
        let mut env = ScrollEnv::new(&mut fx.host, &mut fx.content, 0.0);

        let key = KeyEvent::new(KeyCode::PAGE_UP).with_target(fx.items[0]);
        scroller.on_key_down(&mut env, &key);

        assert!(!scroller.is_animating());
        assert!(scroller.overscroll().is_active(Axis::Vertical, Edge::Before));
    }

    #[test]
    fn test_arrow_without_target_flashes_edge() {
        let on = OverscrollEffectOn {
            arrow_key: true,
            ..Default::default()
        };
        let (mut fx, mut scroller) = mounted(ScrollConfig::default().with_overscroll_effect_on(on));
        let mut env = ScrollEnv::new(&mut fx.host, &mut fx.content, 0.0);

        // Nothing above the first item
        scroller.on_key_down(&mut env, &KeyEvent::new(KeyCode::UP).with_target(fx.items[0]));
        assert!(scroller.overscroll().is_active(Axis::Vertical, Edge::Before));

        // Down has a target, so no effect on the far edge
        scroller.on_key_down(&mut env, &KeyEvent::new(KeyCode::DOWN).with_target(fx.items[0]));
        assert!(!scroller.overscroll().is_active(Axis::Vertical, Edge::After));
    }

    #[test]
    fn test_page_scroll_refocuses_at_point() {
        let (mut fx, mut scroller) = mounted(ScrollConfig::default());
        let items = fx.items.clone();
        let mut env = ScrollEnv::new(&mut fx.host, &mut fx.content, 0.0);

        scroller.on_key_down(&mut env, &KeyEvent::new(KeyCode::PAGE_DOWN).with_target(items[0]));
        assert_eq!(env.host.current(), None);
        assert!(scroller.pending_intent().is_some());

        env.now_ms = 1000.0;
        scroller.tick(&mut env);

        // Item 0's center (y = 50) now shows item 4
        assert_eq!(env.host.current(), Some(items[4]));
        assert!(scroller.pending_intent().is_none());
    }
}
