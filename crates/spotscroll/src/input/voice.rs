//! Voice intent handler
//!
//! The voice runtime delivers a recognised scroll keyword. Direction names
//! (`up`, `left`, `rightmost`, ...) are taken literally; relative terms
//! (`previous`, `next`, `first`, `last`) map onto the scroller's axis and,
//! for horizontal scrollers, onto the reading direction.
//!
//! Horizontal positions are logical, so in a right-to-left layout "left"
//! moves toward the end of the content and "leftmost" aligns to
//! `max_left`.
//!
//! ```rust
//! use spotscroll::input::voice::VoiceScroll;
//! use spotscroll::ScrollAlign;
//!
//! let ltr = VoiceScroll::parse("rightmost", true, false);
//! let rtl = VoiceScroll::parse("leftmost", true, true);
//! assert_eq!(ltr.map(|v| v.align(false)), Some(ScrollAlign::Right));
//! assert_eq!(rtl.map(|v| v.align(true)), Some(ScrollAlign::Right));
//! ```

use spotscroll_core::{Axis, EventResponse, Rect, VoiceEvent};

use crate::bridge::{ScrollAlign, ScrollToOptions};
use crate::config::ScrollDirection;
use crate::host::{Layout, ScrollEnv, Spotlight};
use crate::scroller::Scroller;
use crate::state::InputType;

/// Voice control bookkeeping
#[derive(Clone, Debug, Default)]
pub(crate) struct VoiceState {
    /// A voice-driven scroll is in progress
    pub(crate) is_voice_control: bool,
    pub(crate) control_axis: Option<Axis>,
}

/// A concrete voice scroll action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VoiceScroll {
    Up,
    Down,
    Top,
    Bottom,
    Left,
    Right,
    Leftmost,
    Rightmost,
}

impl VoiceScroll {
    /// Resolve a keyword for a scroller
    ///
    /// `horizontal` selects the axis relative terms apply to.
    pub fn parse(keyword: &str, horizontal: bool, rtl: bool) -> Option<Self> {
        let scroll = match keyword.trim().to_ascii_lowercase().as_str() {
            "up" => Self::Up,
            "down" => Self::Down,
            "top" => Self::Top,
            "bottom" => Self::Bottom,
            "left" => Self::Left,
            "right" => Self::Right,
            "leftmost" => Self::Leftmost,
            "rightmost" => Self::Rightmost,
            "previous" if horizontal => {
                if rtl {
                    Self::Right
                } else {
                    Self::Left
                }
            }
            "next" if horizontal => {
                if rtl {
                    Self::Left
                } else {
                    Self::Right
                }
            }
            "first" if horizontal => {
                if rtl {
                    Self::Rightmost
                } else {
                    Self::Leftmost
                }
            }
            "last" if horizontal => {
                if rtl {
                    Self::Leftmost
                } else {
                    Self::Rightmost
                }
            }
            "previous" => Self::Up,
            "next" => Self::Down,
            "first" => Self::Top,
            "last" => Self::Bottom,
            _ => return None,
        };
        Some(scroll)
    }

    pub fn axis(&self) -> Axis {
        match self {
            Self::Up | Self::Down | Self::Top | Self::Bottom => Axis::Vertical,
            _ => Axis::Horizontal,
        }
    }

    /// Scrolls by a page rather than to an edge
    pub fn is_page(&self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Left | Self::Right)
    }

    /// Moves toward logical position zero
    pub fn is_toward_start(&self, rtl: bool) -> bool {
        match self {
            Self::Up | Self::Top => true,
            Self::Down | Self::Bottom => false,
            Self::Left | Self::Leftmost => !rtl,
            Self::Right | Self::Rightmost => rtl,
        }
    }

    /// Alignment for edge actions, in logical coordinates
    pub fn align(&self, rtl: bool) -> ScrollAlign {
        match self {
            Self::Up | Self::Top => ScrollAlign::Top,
            Self::Down | Self::Bottom => ScrollAlign::Bottom,
            _ if self.is_toward_start(rtl) => ScrollAlign::Left,
            _ => ScrollAlign::Right,
        }
    }
}

impl Scroller {
    /// Voice scroll intent delivered to the scroll content
    pub fn on_voice(&mut self, env: &mut ScrollEnv<'_>, event: &VoiceEvent) -> EventResponse {
        let mut response = EventResponse::IGNORED;

        if !self.config.platform.voice {
            return response;
        }
        let Some(bounds) = self.bounds(env) else {
            return response;
        };

        let rtl = self.config.rtl;
        let horizontal = self.config.direction == ScrollDirection::Horizontal;
        let Some(scroll) = VoiceScroll::parse(&event.scroll, horizontal, rtl) else {
            tracing::debug!("unrecognised voice scroll {:?}", event.scroll);
            self.voice.is_voice_control = false;
            self.voice.control_axis = None;
            return response;
        };

        let axis = scroll.axis();
        let toward_start = scroll.is_toward_start(rtl);
        let position = self.bridge.position().get(axis);
        self.voice.control_axis = Some(axis);

        let reached_edge = if toward_start {
            position <= 0.0
        } else {
            position >= bounds.max(axis) - 1.0
        };

        if reached_edge {
            tracing::debug!("voice {:?} already at the edge", scroll);
            if let Some(voice) = env.voice.as_deref_mut() {
                voice.report_already_completed();
                response.prevent_default();
            }
            return response;
        }

        self.voice.is_voice_control = true;
        self.bridge.set_last_input_type(InputType::Voice);

        if scroll.is_page() {
            let factor: i8 = if toward_start { -1 } else { 1 };
            let distance = f32::from(factor) * bounds.client(axis) * self.config.page_multiplier;
            self.bridge.note_direction(factor);
            self.scroll_to_accumulated_target(
                env,
                distance,
                axis == Axis::Vertical,
                self.overscroll_enabled(Some(InputType::Voice)),
            );
        } else {
            self.scroll_to(env, &ScrollToOptions::align(scroll.align(rtl)));
        }

        response.prevent_default();
        response
    }

    /// End voice control, moving focus back into view if it scrolled away
    pub(crate) fn stop_voice(&mut self, env: &mut ScrollEnv<'_>) {
        if self.voice.is_voice_control {
            self.voice.is_voice_control = false;
            self.update_focus_after_voice_control(env);
        }
    }

    fn update_focus_after_voice_control(&mut self, env: &mut ScrollEnv<'_>) {
        let Some(container) = self.bridge.container() else {
            return;
        };
        let Some(item) = env.host.current() else {
            return;
        };
        if !env.host.contains(container, item) {
            return;
        }
        let (Some(view), Some(item_rect)) = (env.host.rect(container), env.host.rect(item)) else {
            return;
        };

        let axis = self.voice.control_axis.unwrap_or(Axis::Vertical);
        let span = |rect: &Rect| match axis {
            Axis::Vertical => (rect.top(), rect.bottom()),
            Axis::Horizontal => (rect.left(), rect.right()),
        };
        let (view_first, view_last) = span(&view);
        let (item_first, item_last) = span(&item_rect);

        if item_last >= view_first && item_first <= view_last {
            return;
        }

        let visible = env
            .host
            .spottable_descendants(container)
            .into_iter()
            .find(|&node| {
                env.host.rect(node).map_or(false, |rect| {
                    let (first, last) = span(&rect);
                    first >= view_first && last <= view_last
                })
            });

        if let Some(node) = visible {
            tracing::debug!("voice scroll moved focus {:?} -> {:?}", item, node);
            env.host.focus(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PlatformFlags, ScrollConfig};
    use crate::headless::{vertical_list, RecordingVoice};
    use crate::monitor::PageKeyMonitor;

    #[test]
    fn test_relative_terms_follow_axis_and_reading_direction() {
        assert_eq!(VoiceScroll::parse("next", false, false), Some(VoiceScroll::Down));
        assert_eq!(VoiceScroll::parse("next", true, false), Some(VoiceScroll::Right));
        assert_eq!(VoiceScroll::parse("next", true, true), Some(VoiceScroll::Left));
        assert_eq!(VoiceScroll::parse("first", true, true), Some(VoiceScroll::Rightmost));
        assert_eq!(VoiceScroll::parse("sideways", false, false), None);
    }

    #[test]
    fn test_edge_alignment_mirrors_under_rtl() {
        assert_eq!(VoiceScroll::Leftmost.align(true), VoiceScroll::Rightmost.align(false));
        assert_eq!(VoiceScroll::Leftmost.align(false), ScrollAlign::Left);
        assert!(VoiceScroll::Left.is_toward_start(false));
        assert!(!VoiceScroll::Left.is_toward_start(true));
    }

    fn voice_config() -> ScrollConfig {
        ScrollConfig::default().with_platform(PlatformFlags {
            voice: true,
            ..Default::default()
        })
    }

    #[test]
    fn test_voice_at_edge_reports_completed() {
        let mut fx = vertical_list(500.0, 100.0, 15);
        let mut reporter = RecordingVoice::default();
        let mut scroller = Scroller::new(voice_config(), PageKeyMonitor::shared());
        let mut env = ScrollEnv::new(&mut fx.host, &mut fx.content, 0.0).with_voice(&mut reporter);
        scroller.mount(&mut env, fx.container, fx.content_node);

        let response = scroller.on_voice(&mut env, &VoiceEvent::new("up"));
        assert!(response.prevent_default);
        assert!(!scroller.is_animating());
        drop(env);
        assert_eq!(reporter.already_completed, 1);
    }

    #[test]
    fn test_voice_page_and_edge_actions() {
        let mut fx = vertical_list(500.0, 100.0, 15);
        let mut scroller = Scroller::new(voice_config(), PageKeyMonitor::shared());
        let mut env = ScrollEnv::new(&mut fx.host, &mut fx.content, 0.0);
        scroller.mount(&mut env, fx.container, fx.content_node);

        scroller.on_voice(&mut env, &VoiceEvent::new("down"));
        assert_eq!(scroller.bridge().animation_target().map(|p| p.top), Some(400.0));
        assert_eq!(scroller.state().last_input_type, Some(InputType::Voice));

        scroller.on_voice(&mut env, &VoiceEvent::new("bottom"));
        assert_eq!(scroller.bridge().animation_target().map(|p| p.top), Some(1000.0));
    }

    #[test]
    fn test_voice_ignored_without_platform_support() {
        let mut fx = vertical_list(500.0, 100.0, 15);
        let mut scroller = Scroller::new(ScrollConfig::default(), PageKeyMonitor::shared());
        let mut env = ScrollEnv::new(&mut fx.host, &mut fx.content, 0.0);
        scroller.mount(&mut env, fx.container, fx.content_node);

        let response = scroller.on_voice(&mut env, &VoiceEvent::new("down"));
        assert_eq!(response, EventResponse::IGNORED);
        assert!(!scroller.is_animating());
    }

    #[test]
    fn test_focus_follows_voice_scroll() {
        let mut fx = vertical_list(500.0, 100.0, 15);
        fx.host.focus(fx.items[0]);
        let items = fx.items.clone();
        let mut scroller = Scroller::new(voice_config(), PageKeyMonitor::shared());
        let mut env = ScrollEnv::new(&mut fx.host, &mut fx.content, 0.0);
        scroller.mount(&mut env, fx.container, fx.content_node);

        scroller.on_voice(&mut env, &VoiceEvent::new("bottom"));
        env.now_ms = 1000.0;
        scroller.tick(&mut env);

        assert_eq!(scroller.position().top, 1000.0);
        // Item 10 is the first fully visible item at the bottom
        assert_eq!(env.host.current(), Some(items[10]));
    }
}
