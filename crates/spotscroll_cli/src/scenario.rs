//! Scripted input scenarios
//!
//! A scenario describes one headless viewport and a list of steps. TOML and
//! JSON are both accepted; the format is picked by file extension.
//!
//! ```toml
//! [viewport]
//! height = 500
//! item_size = 100
//! items = 15
//!
//! [[steps]]
//! type = "focus"
//! index = 0
//!
//! [[steps]]
//! type = "key"
//! key = "page_down"
//!
//! [[steps]]
//! type = "tick"
//! ms = 1000
//!
//! [[steps]]
//! type = "expect"
//! top = 400
//! focused = 4
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use spotscroll::{ScrollAlign, ScrollConfig};
use spotscroll_core::DeltaMode;

/// A viewport and the input to replay against it
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub viewport: ViewportSpec,
    /// Scroller configuration; `--config` overrides it
    #[serde(default)]
    pub config: Option<ScrollConfig>,
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    pub fn from_toml(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load a scenario, choosing the parser by extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        let is_json = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json(&raw)
        } else {
            Self::from_toml(&raw)
        }
        .with_context(|| format!("failed to parse scenario {}", path.display()))
    }
}

/// Orientation of the generated item list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListLayout {
    #[default]
    Vertical,
    Horizontal,
}

/// Viewport with a single row or column of equal items
#[derive(Debug, Clone, Deserialize)]
pub struct ViewportSpec {
    #[serde(default)]
    pub layout: ListLayout,
    /// Viewport extent along the list
    #[serde(default = "default_extent")]
    pub height: f32,
    /// Item extent along the list
    #[serde(default = "default_item_size")]
    pub item_size: f32,
    #[serde(default = "default_items")]
    pub items: usize,
}

fn default_extent() -> f32 {
    500.0
}

fn default_item_size() -> f32 {
    100.0
}

fn default_items() -> usize {
    15
}

impl Default for ViewportSpec {
    fn default() -> Self {
        Self {
            layout: ListLayout::default(),
            height: default_extent(),
            item_size: default_item_size(),
            items: default_items(),
        }
    }
}

/// One scripted action or check
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Key down, delivered through the focused item or the page key monitor
    Key {
        key: String,
        #[serde(default)]
        repeat: bool,
    },
    Wheel {
        #[serde(default)]
        delta_x: f32,
        #[serde(default)]
        delta_y: f32,
        #[serde(default)]
        mode: DeltaMode,
        #[serde(default)]
        on_scrollbar: bool,
    },
    Voice {
        scroll: String,
    },
    /// Focus the item at `index`
    Focus {
        index: usize,
    },
    /// Pointer moved; enters pointer mode
    Pointer {
        x: f32,
        y: f32,
    },
    PointerMode {
        enabled: bool,
    },
    Touch,
    /// Drag gesture from one point to another in a single move
    Drag {
        from: [f32; 2],
        to: [f32; 2],
    },
    ScrollTo {
        #[serde(default)]
        left: Option<f32>,
        #[serde(default)]
        top: Option<f32>,
        #[serde(default)]
        align: Option<ScrollAlign>,
        #[serde(default)]
        index: Option<usize>,
        #[serde(default = "default_true")]
        animate: bool,
        #[serde(default)]
        focus: bool,
    },
    /// Advance time in 16ms frames
    Tick {
        ms: f64,
    },
    Unmount,
    Expect(Expectation),
}

fn default_true() -> bool {
    true
}

impl ScenarioStep {
    pub fn kind(&self) -> &'static str {
        match self {
            ScenarioStep::Key { .. } => "key",
            ScenarioStep::Wheel { .. } => "wheel",
            ScenarioStep::Voice { .. } => "voice",
            ScenarioStep::Focus { .. } => "focus",
            ScenarioStep::Pointer { .. } => "pointer",
            ScenarioStep::PointerMode { .. } => "pointer_mode",
            ScenarioStep::Touch => "touch",
            ScenarioStep::Drag { .. } => "drag",
            ScenarioStep::ScrollTo { .. } => "scroll_to",
            ScenarioStep::Tick { .. } => "tick",
            ScenarioStep::Unmount => "unmount",
            ScenarioStep::Expect(_) => "expect",
        }
    }
}

/// Checks against the replay state; unset fields are not checked
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Expectation {
    #[serde(default)]
    pub top: Option<f32>,
    #[serde(default)]
    pub left: Option<f32>,
    /// Index of the focused item
    #[serde(default)]
    pub focused: Option<usize>,
    /// Nothing is focused
    #[serde(default)]
    pub blurred: Option<bool>,
    #[serde(default)]
    pub animating: Option<bool>,
    /// Any edge effect is showing
    #[serde(default)]
    pub overscroll: Option<bool>,
    /// The scroller is in the page key monitor
    #[serde(default)]
    pub registered: Option<bool>,
    /// Voice reports of an already-completed scroll
    #[serde(default)]
    pub voice_completed: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml_scenario() {
        let scenario = Scenario::from_toml(
            r#"
            name = "page"

            [viewport]
            height = 300

            [config]
            mode = "native"

            [[steps]]
            type = "key"
            key = "page_down"

            [[steps]]
            type = "wheel"
            delta_y = 3
            mode = "line"

            [[steps]]
            type = "unmount"

            [[steps]]
            type = "expect"
            registered = false
            "#,
        )
        .unwrap();

        assert_eq!(scenario.viewport.height, 300.0);
        assert_eq!(scenario.viewport.items, 15);
        assert!(scenario.config.is_some());
        assert_eq!(scenario.steps.len(), 4);
        assert!(matches!(
            scenario.steps[1],
            ScenarioStep::Wheel { mode: DeltaMode::Line, .. }
        ));
        assert_eq!(scenario.steps[3].kind(), "expect");
    }

    #[test]
    fn test_parse_json_scenario() {
        let scenario = Scenario::from_json(
            r#"{ "steps": [
                { "type": "scroll_to", "align": "bottom", "animate": false },
                { "type": "drag", "from": [10, 400], "to": [10, 100] }
            ] }"#,
        )
        .unwrap();

        assert!(matches!(
            scenario.steps[0],
            ScenarioStep::ScrollTo {
                align: Some(ScrollAlign::Bottom),
                animate: false,
                ..
            }
        ));
        assert_eq!(scenario.viewport.layout, ListLayout::Vertical);
    }
}
