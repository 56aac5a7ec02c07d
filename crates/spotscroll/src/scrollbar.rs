//! Scrollbar thumbs and scrollbar button interaction
//!
//! Thumbs are shown while the viewport is being scrolled by focus or wheel
//! and hidden again by a timer after `thumb_hide_delay_ms`. Scrollbar
//! buttons scroll by a fraction of the page along their own axis.

use serde::{Deserialize, Serialize};
use spotscroll_core::Axis;

use crate::config::{ScrollDirection, ScrollbarVisibility};
use crate::host::ScrollEnv;
use crate::scroller::{ScrollTimer, Scroller};
use crate::state::{InputType, ScrollBounds};

/// Per-axis thumb visibility
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollbarThumbs {
    pub horizontal: bool,
    pub vertical: bool,
}

impl ScrollbarThumbs {
    /// Show thumbs on every enabled axis the content overflows
    pub fn show(&mut self, bounds: &ScrollBounds, direction: ScrollDirection) {
        self.horizontal = direction.allows(Axis::Horizontal) && bounds.overflows(Axis::Horizontal);
        self.vertical = direction.allows(Axis::Vertical) && bounds.overflows(Axis::Vertical);
    }

    pub fn hide(&mut self) {
        self.horizontal = false;
        self.vertical = false;
    }

    pub fn is_shown(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }
}

/// A press on a scrollbar button
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollbarInteraction {
    pub input_type: InputType,
    /// Toward the end of the content
    pub is_forward: bool,
    /// Page button rather than a step button
    pub is_pagination: bool,
    pub is_vertical_scroll_bar: bool,
}

impl Scroller {
    pub fn thumbs(&self) -> ScrollbarThumbs {
        self.thumbs
    }

    pub(crate) fn show_thumbs(&mut self, bounds: &ScrollBounds) {
        if self.config.scrollbar == ScrollbarVisibility::Never {
            return;
        }
        self.thumbs.show(bounds, self.config.direction);
        self.timers.cancel_where(|t| *t == ScrollTimer::HideThumbs);
    }

    /// Flash the thumbs: show them now and hide them after the delay
    pub fn alert_thumbs(&mut self, env: &mut ScrollEnv<'_>) {
        let Some(bounds) = self.bounds(env) else {
            return;
        };
        self.show_thumbs(&bounds);
        self.start_hiding_thumbs(env.now_ms);
    }

    pub(crate) fn start_hiding_thumbs(&mut self, now_ms: f64) {
        self.timers.cancel_where(|t| *t == ScrollTimer::HideThumbs);
        if self.thumbs.horizontal || self.thumbs.vertical {
            self.timers
                .schedule(now_ms, self.config.thumb_hide_delay_ms, ScrollTimer::HideThumbs);
        }
    }

    /// Scroll for a scrollbar button press
    pub fn on_interaction_for_scroll(&mut self, env: &mut ScrollEnv<'_>, interaction: ScrollbarInteraction) {
        let Some(bounds) = self.bounds(env) else {
            return;
        };

        let factor: i8 = if interaction.is_forward { 1 } else { -1 };
        let page_size = if interaction.is_vertical_scroll_bar {
            bounds.client_height
        } else {
            bounds.client_width
        };
        let multiplier = if interaction.is_pagination {
            self.config.page_multiplier
        } else {
            self.config.arrow_key_multiplier
        };
        let distance = page_size * multiplier;

        self.bridge.set_last_input_type(interaction.input_type);
        self.bridge.note_direction(factor);

        tracing::debug!(
            "scrollbar {:?} {} by {:.1}",
            interaction.input_type,
            if interaction.is_forward { "forward" } else { "backward" },
            distance
        );

        self.scroll_to_accumulated_target(
            env,
            f32::from(factor) * distance,
            interaction.is_vertical_scroll_bar,
            self.overscroll_enabled(Some(interaction.input_type)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::vertical_list;
    use crate::monitor::PageKeyMonitor;
    use crate::config::ScrollConfig;
    use spotscroll_core::Size;

    #[test]
    fn test_thumbs_follow_overflow() {
        let bounds = ScrollBounds::from_sizes(Size::new(400.0, 500.0), Size::new(400.0, 1500.0));
        let mut thumbs = ScrollbarThumbs::default();

        thumbs.show(&bounds, ScrollDirection::Both);
        assert!(thumbs.is_shown(Axis::Vertical));
        assert!(!thumbs.is_shown(Axis::Horizontal));

        thumbs.hide();
        assert_eq!(thumbs, ScrollbarThumbs::default());
    }

    #[test]
    fn test_alerted_thumbs_hide_after_delay() {
        let mut fx = vertical_list(500.0, 100.0, 15);
        let mut scroller = Scroller::new(ScrollConfig::default(), PageKeyMonitor::shared());
        let mut env = ScrollEnv::new(&mut fx.host, &mut fx.content, 0.0);
        scroller.mount(&mut env, fx.container, fx.content_node);

        scroller.alert_thumbs(&mut env);
        assert!(scroller.thumbs().vertical);

        env.now_ms = 999.0;
        scroller.tick(&mut env);
        assert!(scroller.thumbs().vertical);

        env.now_ms = 1000.0;
        scroller.tick(&mut env);
        assert!(!scroller.thumbs().vertical);
    }

    #[test]
    fn test_step_and_page_buttons() {
        let mut fx = vertical_list(500.0, 100.0, 15);
        let mut scroller = Scroller::new(ScrollConfig::default(), PageKeyMonitor::shared());
        let mut env = ScrollEnv::new(&mut fx.host, &mut fx.content, 0.0);
        scroller.mount(&mut env, fx.container, fx.content_node);

        let step = ScrollbarInteraction {
            input_type: InputType::ArrowKey,
            is_forward: true,
            is_pagination: false,
            is_vertical_scroll_bar: true,
        };
        scroller.on_interaction_for_scroll(&mut env, step);
        assert_eq!(scroller.bridge().animation_target().map(|p| p.top), Some(100.0));

        let page = ScrollbarInteraction {
            input_type: InputType::PageKey,
            is_pagination: true,
            ..step
        };
        scroller.on_interaction_for_scroll(&mut env, page);
        assert_eq!(scroller.bridge().animation_target().map(|p| p.top), Some(500.0));
    }
}
