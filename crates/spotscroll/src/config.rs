//! Scroller configuration
//!
//! `ScrollConfig` is built in code or loaded from TOML. Every field has a
//! default, so an empty file is a valid configuration:
//!
//! ```toml
//! direction = "both"
//! mode = "native"
//! page_multiplier = 0.66
//!
//! [overscroll_effect_on]
//! arrow_key = true
//! page_key = true
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use spotscroll_animation::Easing;
use spotscroll_core::Axis;

use crate::error::{Result, ScrollError};
use crate::state::InputType;

/// Axes the viewport scrolls along
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    #[default]
    Vertical,
    Horizontal,
    Both,
}

impl ScrollDirection {
    /// Whether scrolling along `axis` is enabled
    pub fn allows(&self, axis: Axis) -> bool {
        match (self, axis) {
            (ScrollDirection::Both, _) => true,
            (ScrollDirection::Vertical, Axis::Vertical) => true,
            (ScrollDirection::Horizontal, Axis::Horizontal) => true,
            _ => false,
        }
    }
}

/// Which engine moves the viewport
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollMode {
    /// Positions are animated by the engine's own animator
    #[default]
    Js,
    /// The host scrolls natively and reports positions back
    Native,
}

/// Scrollbar rendering policy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollbarVisibility {
    /// Shown only when content overflows the axis
    #[default]
    Auto,
    Always,
    Never,
}

/// Per-input-type overscroll effect switches
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverscrollEffectOn {
    #[serde(default)]
    pub pointer: bool,
    #[serde(default = "default_true")]
    pub wheel: bool,
    #[serde(default)]
    pub arrow_key: bool,
    #[serde(default)]
    pub page_key: bool,
    #[serde(default)]
    pub voice: bool,
    #[serde(default)]
    pub drag: bool,
}

impl OverscrollEffectOn {
    /// Every input type enabled
    pub fn all() -> Self {
        Self {
            pointer: true,
            wheel: true,
            arrow_key: true,
            page_key: true,
            voice: true,
            drag: true,
        }
    }

    pub fn is_enabled(&self, input: InputType) -> bool {
        match input {
            InputType::Pointer => self.pointer,
            InputType::Wheel => self.wheel,
            InputType::ArrowKey => self.arrow_key,
            InputType::PageKey => self.page_key,
            InputType::Voice => self.voice,
            InputType::Drag => self.drag,
        }
    }
}

impl Default for OverscrollEffectOn {
    fn default() -> Self {
        Self {
            pointer: false,
            wheel: true,
            arrow_key: false,
            page_key: false,
            voice: false,
            drag: false,
        }
    }
}

/// Platform capabilities gating optional listeners
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformFlags {
    /// Touch input available; enables drag and touch handlers
    #[serde(default)]
    pub touchscreen: bool,
    #[serde(default = "default_true")]
    pub tv: bool,
    /// Voice runtime present; enables the voice handler
    #[serde(default)]
    pub voice: bool,
}

impl Default for PlatformFlags {
    fn default() -> Self {
        Self {
            touchscreen: false,
            tv: true,
            voice: false,
        }
    }
}

/// Configuration for one scroll viewport
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Identifier used as the position store key prefix
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub direction: ScrollDirection,
    #[serde(default)]
    pub mode: ScrollMode,
    /// Right-to-left reading direction
    #[serde(default)]
    pub rtl: bool,
    #[serde(default)]
    pub overscroll_effect_on: OverscrollEffectOn,
    /// Fraction of the client size scrolled by one page
    #[serde(default = "default_page_multiplier")]
    pub page_multiplier: f32,
    /// Fraction of the client size scrolled by scrollbar arrow buttons
    #[serde(default = "default_arrow_key_multiplier")]
    pub arrow_key_multiplier: f32,
    /// Cap on one wheel step, as a fraction of the client size
    #[serde(default = "default_wheel_max_pixel_multiplier")]
    pub wheel_max_pixel_multiplier: f32,
    #[serde(default = "default_wheel_pixel_multiplier")]
    pub wheel_pixel_multiplier: f32,
    #[serde(default = "default_pixels_per_line")]
    pub pixels_per_line: f32,
    /// Sub-pixel tolerance for native scroll comparisons
    #[serde(default = "default_epsilon")]
    pub epsilon: f32,
    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: f64,
    #[serde(default)]
    pub easing: Easing,
    /// Quiet period after the last native scroll event before settling
    #[serde(default = "default_scroll_stop_waiting")]
    pub scroll_stop_waiting_ms: f64,
    #[serde(default = "default_overscroll_effect_duration")]
    pub overscroll_effect_duration_ms: f64,
    #[serde(default = "default_thumb_hide_delay")]
    pub thumb_hide_delay_ms: f64,
    #[serde(default)]
    pub scrollbar: ScrollbarVisibility,
    #[serde(default)]
    pub focusable_scrollbar: bool,
    /// Keep the spotlight container disabled permanently
    #[serde(default)]
    pub spotlight_container_disabled: bool,
    #[serde(default)]
    pub platform: PlatformFlags,
}

fn default_true() -> bool {
    true
}

fn default_page_multiplier() -> f32 {
    0.8
}

fn default_arrow_key_multiplier() -> f32 {
    0.2
}

fn default_wheel_max_pixel_multiplier() -> f32 {
    0.2
}

fn default_wheel_pixel_multiplier() -> f32 {
    1.5
}

fn default_pixels_per_line() -> f32 {
    39.0
}

fn default_epsilon() -> f32 {
    1.0
}

fn default_animation_duration() -> f64 {
    1000.0
}

fn default_scroll_stop_waiting() -> f64 {
    200.0
}

fn default_overscroll_effect_duration() -> f64 {
    300.0
}

fn default_thumb_hide_delay() -> f64 {
    1000.0
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            id: None,
            direction: ScrollDirection::default(),
            mode: ScrollMode::default(),
            rtl: false,
            overscroll_effect_on: OverscrollEffectOn::default(),
            page_multiplier: default_page_multiplier(),
            arrow_key_multiplier: default_arrow_key_multiplier(),
            wheel_max_pixel_multiplier: default_wheel_max_pixel_multiplier(),
            wheel_pixel_multiplier: default_wheel_pixel_multiplier(),
            pixels_per_line: default_pixels_per_line(),
            epsilon: default_epsilon(),
            animation_duration_ms: default_animation_duration(),
            easing: Easing::default(),
            scroll_stop_waiting_ms: default_scroll_stop_waiting(),
            overscroll_effect_duration_ms: default_overscroll_effect_duration(),
            thumb_hide_delay_ms: default_thumb_hide_delay(),
            scrollbar: ScrollbarVisibility::default(),
            focusable_scrollbar: false,
            spotlight_container_disabled: false,
            platform: PlatformFlags::default(),
        }
    }
}

impl ScrollConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ScrollConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("loaded scroll config from {}", path.display());
        Ok(config)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        let multipliers = [
            ("page_multiplier", self.page_multiplier),
            ("arrow_key_multiplier", self.arrow_key_multiplier),
            ("wheel_max_pixel_multiplier", self.wheel_max_pixel_multiplier),
        ];
        for (name, value) in multipliers {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ScrollError::InvalidConfig(format!(
                    "{} must be in (0, 1], got {}",
                    name, value
                )));
            }
        }

        if !(self.wheel_pixel_multiplier > 0.0) || !(self.pixels_per_line > 0.0) {
            return Err(ScrollError::InvalidConfig(
                "wheel_pixel_multiplier and pixels_per_line must be positive".to_string(),
            ));
        }

        if !(self.epsilon >= 0.0) {
            return Err(ScrollError::InvalidConfig(format!(
                "epsilon must not be negative, got {}",
                self.epsilon
            )));
        }

        let durations = [
            ("animation_duration_ms", self.animation_duration_ms),
            ("scroll_stop_waiting_ms", self.scroll_stop_waiting_ms),
            ("overscroll_effect_duration_ms", self.overscroll_effect_duration_ms),
            ("thumb_hide_delay_ms", self.thumb_hide_delay_ms),
        ];
        for (name, value) in durations {
            if !(value >= 0.0) {
                return Err(ScrollError::InvalidConfig(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }

        if let Some(id) = &self.id {
            if id.is_empty() {
                return Err(ScrollError::InvalidConfig("id must not be empty".to_string()));
            }
        }

        Ok(())
    }

    pub fn with_direction(mut self, direction: ScrollDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_mode(mut self, mode: ScrollMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_rtl(mut self, rtl: bool) -> Self {
        self.rtl = rtl;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_overscroll_effect_on(mut self, on: OverscrollEffectOn) -> Self {
        self.overscroll_effect_on = on;
        self
    }

    pub fn with_platform(mut self, platform: PlatformFlags) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_animation_duration(mut self, duration_ms: f64) -> Self {
        self.animation_duration_ms = duration_ms;
        self
    }
}
