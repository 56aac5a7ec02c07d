//! Scroll engine strategies
//!
//! A viewport is either moved by the engine's own animator (`Js`) or by the
//! host's native scrolling (`Native`). The two differ in a handful of
//! policies, collected here behind one trait so handlers never branch on
//! the mode.

use std::fmt::Debug;

use crate::config::{ScrollConfig, ScrollMode};
use crate::state::ViewportState;

/// How raw wheel input reaches the engine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WheelVariant {
    /// Any wheel over the viewport scrolls the active axis
    Delta,
    /// Vertical scrolling is native; only wheel on the scrollbar, or any
    /// wheel on a horizontal-only viewport, is intercepted
    Raw,
}

/// Mode-specific scroll policies
pub trait ScrollStrategy: Debug + Send + Sync {
    fn mode(&self) -> ScrollMode;

    /// A move from `current` to `target` is worth starting a scroll for
    fn is_significant(&self, current: f32, target: f32) -> bool;

    /// There is room to scroll toward the end from `position`
    fn can_scroll_forward(&self, position: f32, max: f32) -> bool;

    fn can_scroll_backward(&self, position: f32) -> bool {
        position > 0.0
    }

    /// A page move to `target` would hit (or pass) an edge
    fn lands_on_edge(&self, target: f32, max: f32) -> bool;

    /// A scroll is still in flight
    fn is_in_flight(&self, state: &ViewportState) -> bool;

    fn wheel_variant(&self) -> WheelVariant;

    /// Whether a focus-driven scroll should animate
    fn animate_on_focus(&self, requested: bool, duration_ms: f64) -> bool;

    /// The end of an engine animation settles the viewport
    ///
    /// Otherwise settling waits for the scroll-stop timer armed by native
    /// scroll events.
    fn settles_on_animation_end(&self) -> bool;

    /// A non-animated start focuses the pending item right away
    fn focuses_on_immediate_start(&self) -> bool;
}

/// Engine-animated scrolling: exact comparisons
#[derive(Clone, Copy, Debug, Default)]
pub struct JsStrategy;

impl ScrollStrategy for JsStrategy {
    fn mode(&self) -> ScrollMode {
        ScrollMode::Js
    }

    fn is_significant(&self, current: f32, target: f32) -> bool {
        current != target
    }

    fn can_scroll_forward(&self, position: f32, max: f32) -> bool {
        max > position
    }

    fn lands_on_edge(&self, target: f32, max: f32) -> bool {
        max <= target || 0.0 >= target
    }

    fn is_in_flight(&self, state: &ViewportState) -> bool {
        state.animating
    }

    fn wheel_variant(&self) -> WheelVariant {
        WheelVariant::Delta
    }

    fn animate_on_focus(&self, requested: bool, duration_ms: f64) -> bool {
        duration_ms > 0.0 && requested
    }

    fn settles_on_animation_end(&self) -> bool {
        true
    }

    fn focuses_on_immediate_start(&self) -> bool {
        false
    }
}

/// Host-native scrolling: positions drift by sub-pixels, so compare with a tolerance
#[derive(Clone, Copy, Debug)]
pub struct NativeStrategy {
    epsilon: f32,
}

impl NativeStrategy {
    pub fn new(epsilon: f32) -> Self {
        Self { epsilon }
    }
}

impl ScrollStrategy for NativeStrategy {
    fn mode(&self) -> ScrollMode {
        ScrollMode::Native
    }

    fn is_significant(&self, current: f32, target: f32) -> bool {
        (target - current).abs() > self.epsilon
    }

    fn can_scroll_forward(&self, position: f32, max: f32) -> bool {
        max - position > self.epsilon
    }

    fn lands_on_edge(&self, target: f32, max: f32) -> bool {
        max - self.epsilon < target || self.epsilon > target
    }

    fn is_in_flight(&self, state: &ViewportState) -> bool {
        state.scrolling
    }

    fn wheel_variant(&self) -> WheelVariant {
        WheelVariant::Raw
    }

    fn animate_on_focus(&self, requested: bool, _duration_ms: f64) -> bool {
        requested
    }

    fn settles_on_animation_end(&self) -> bool {
        false
    }

    fn focuses_on_immediate_start(&self) -> bool {
        true
    }
}

/// Strategy for the configured mode
pub fn strategy_for(config: &ScrollConfig) -> Box<dyn ScrollStrategy> {
    match config.mode {
        ScrollMode::Js => Box::new(JsStrategy),
        ScrollMode::Native => Box::new(NativeStrategy::new(config.epsilon)),
    }
}
