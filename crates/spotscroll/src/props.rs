//! Render contract
//!
//! [`ScrollProps`] is what the rendering layer needs from a scroller for one
//! frame: which handlers to bind on the container and the content, the
//! state of each scrollbar, active edge effects, and the position.

use serde::Serialize;
use smallvec::SmallVec;
use spotscroll_core::{Axis, Edge};

use crate::config::ScrollbarVisibility;
use crate::host::ScrollEnv;
use crate::overscroll::OverscrollStatus;
use crate::scroller::Scroller;
use crate::state::{ScrollBounds, ScrollPosition};

/// Handlers the host binds to forward events into the scroller
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventHandler {
    KeyDown,
    Wheel,
    Focus,
    MouseDown,
    Scroll,
    TouchStart,
    Flick,
    Drag,
    Voice,
}

/// State of one scrollbar
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScrollbarProps {
    pub visible: bool,
    /// Scrollbar buttons take part in focus navigation
    pub focusable: bool,
    pub thumb_shown: bool,
}

/// Everything the rendering layer binds for one frame
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScrollProps {
    pub container_handlers: SmallVec<[EventHandler; 8]>,
    pub content_handlers: SmallVec<[EventHandler; 2]>,
    pub horizontal_scrollbar: ScrollbarProps,
    pub vertical_scrollbar: ScrollbarProps,
    pub is_horizontal_scrollbar_visible: bool,
    pub is_vertical_scrollbar_visible: bool,
    pub overscroll: SmallVec<[(Axis, Edge, OverscrollStatus); 4]>,
    pub position: ScrollPosition,
    /// Voice intent advertised on the content, when voice is available
    pub voice_intent: Option<&'static str>,
}

fn scrollbar_visible(visibility: ScrollbarVisibility, enabled: bool, overflows: bool) -> bool {
    match visibility {
        ScrollbarVisibility::Never => false,
        ScrollbarVisibility::Always => enabled,
        ScrollbarVisibility::Auto => enabled && overflows,
    }
}

impl Scroller {
    /// Render props for the current layout
    pub fn props(&mut self, env: &ScrollEnv<'_>) -> ScrollProps {
        let bounds = self.bounds(env).unwrap_or_default();
        self.props_for(&bounds)
    }

    /// Render props for already-measured bounds
    pub fn props_for(&self, bounds: &ScrollBounds) -> ScrollProps {
        let platform = self.config.platform;

        let mut container_handlers: SmallVec<[EventHandler; 8]> = SmallVec::new();
        container_handlers.extend([
            EventHandler::KeyDown,
            EventHandler::Wheel,
            EventHandler::MouseDown,
            EventHandler::Scroll,
        ]);
        if platform.touchscreen {
            container_handlers.extend([EventHandler::TouchStart, EventHandler::Flick, EventHandler::Drag]);
        }

        let mut content_handlers: SmallVec<[EventHandler; 2]> = SmallVec::new();
        content_handlers.push(EventHandler::Focus);
        if platform.voice {
            content_handlers.push(EventHandler::Voice);
        }

        let direction = self.config.direction;
        let horizontal_visible = scrollbar_visible(
            self.config.scrollbar,
            direction.allows(Axis::Horizontal),
            bounds.overflows(Axis::Horizontal),
        );
        let vertical_visible = scrollbar_visible(
            self.config.scrollbar,
            direction.allows(Axis::Vertical),
            bounds.overflows(Axis::Vertical),
        );

        ScrollProps {
            container_handlers,
            content_handlers,
            horizontal_scrollbar: ScrollbarProps {
                visible: horizontal_visible,
                focusable: self.config.focusable_scrollbar,
                thumb_shown: self.thumbs.horizontal,
            },
            vertical_scrollbar: ScrollbarProps {
                visible: vertical_visible,
                focusable: self.config.focusable_scrollbar,
                thumb_shown: self.thumbs.vertical,
            },
            is_horizontal_scrollbar_visible: horizontal_visible,
            is_vertical_scrollbar_visible: vertical_visible,
            overscroll: self.overscroll.active(),
            position: self.bridge.position(),
            voice_intent: platform.voice.then_some("Scroll"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PlatformFlags, ScrollConfig, ScrollDirection};
    use crate::monitor::PageKeyMonitor;
    use spotscroll_core::Size;

    fn bounds() -> ScrollBounds {
        ScrollBounds::from_sizes(Size::new(400.0, 500.0), Size::new(800.0, 1500.0))
    }

    #[test]
    fn test_handlers_follow_platform() {
        let tv = Scroller::new(ScrollConfig::default(), PageKeyMonitor::shared());
        let props = tv.props_for(&bounds());
        assert!(!props.container_handlers.contains(&EventHandler::Drag));
        assert!(!props.content_handlers.contains(&EventHandler::Voice));
        assert_eq!(props.voice_intent, None);

        let config = ScrollConfig::default().with_platform(PlatformFlags {
            touchscreen: true,
            tv: true,
            voice: true,
        });
        let props = Scroller::new(config, PageKeyMonitor::shared()).props_for(&bounds());
        assert!(props.container_handlers.contains(&EventHandler::TouchStart));
        assert!(props.content_handlers.contains(&EventHandler::Voice));
        assert_eq!(props.voice_intent, Some("Scroll"));
    }

    #[test]
    fn test_scrollbar_visibility() {
        let vertical = Scroller::new(ScrollConfig::default(), PageKeyMonitor::shared());
        let props = vertical.props_for(&bounds());
        assert!(props.is_vertical_scrollbar_visible);
        assert!(!props.is_horizontal_scrollbar_visible);

        let both = Scroller::new(
            ScrollConfig::default().with_direction(ScrollDirection::Both),
            PageKeyMonitor::shared(),
        );
        assert!(both.props_for(&bounds()).is_horizontal_scrollbar_visible);

        let mut never = ScrollConfig::default();
        never.scrollbar = ScrollbarVisibility::Never;
        let props = Scroller::new(never, PageKeyMonitor::shared()).props_for(&bounds());
        assert!(!props.is_vertical_scrollbar_visible);
    }
}
