//! Input event model
//!
//! Platform-agnostic input events consumed by the scroll engine. Hosts
//! translate their native events into these before handing them over.

use serde::{Deserialize, Serialize};

/// Identity of a host element (focusable item, scroll container, content node)
///
/// Ids are assigned by the host and are opaque to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

/// Virtual key codes (platform-agnostic, DOM `keyCode` numbering)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const ENTER: KeyCode = KeyCode(0x0D);
    pub const ESCAPE: KeyCode = KeyCode(0x1B);
    pub const SPACE: KeyCode = KeyCode(0x20);

    // Arrow keys
    pub const LEFT: KeyCode = KeyCode(0x25);
    pub const UP: KeyCode = KeyCode(0x26);
    pub const RIGHT: KeyCode = KeyCode(0x27);
    pub const DOWN: KeyCode = KeyCode(0x28);

    // Navigation keys
    pub const HOME: KeyCode = KeyCode(0x24);
    pub const END: KeyCode = KeyCode(0x23);
    pub const PAGE_UP: KeyCode = KeyCode(0x21);
    pub const PAGE_DOWN: KeyCode = KeyCode(0x22);

    // Unknown/unmapped key
    pub const UNKNOWN: KeyCode = KeyCode(0);

    pub fn is_page_up(&self) -> bool {
        *self == KeyCode::PAGE_UP
    }

    pub fn is_page_down(&self) -> bool {
        *self == KeyCode::PAGE_DOWN
    }

    pub fn is_page_key(&self) -> bool {
        self.is_page_up() || self.is_page_down()
    }

    /// Resolve a human-readable key name (`"page_down"`, `"up"`, ...)
    pub fn from_name(name: &str) -> Option<KeyCode> {
        let code = match name.to_ascii_lowercase().as_str() {
            "enter" => KeyCode::ENTER,
            "escape" | "esc" => KeyCode::ESCAPE,
            "space" => KeyCode::SPACE,
            "left" => KeyCode::LEFT,
            "up" => KeyCode::UP,
            "right" => KeyCode::RIGHT,
            "down" => KeyCode::DOWN,
            "home" => KeyCode::HOME,
            "end" => KeyCode::END,
            "page_up" | "pageup" => KeyCode::PAGE_UP,
            "page_down" | "pagedown" => KeyCode::PAGE_DOWN,
            _ => return None,
        };
        Some(code)
    }
}

/// A directional-navigation direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Map an arrow key to its navigation direction
    pub fn from_key(key: KeyCode) -> Option<Direction> {
        match key {
            KeyCode::UP => Some(Direction::Up),
            KeyCode::DOWN => Some(Direction::Down),
            KeyCode::LEFT => Some(Direction::Left),
            KeyCode::RIGHT => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn reverse(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn axis(&self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Vertical,
            Direction::Left | Direction::Right => Axis::Horizontal,
        }
    }
}

/// Scroll axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Edge of a scroll axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    /// Top or (logical) start edge
    Before,
    /// Bottom or (logical) end edge
    After,
}

/// Units of a raw wheel delta
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

/// Key press
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: KeyCode,
    /// Auto-repeat from a held key
    #[serde(default)]
    pub repeat: bool,
    /// Element that received the key event
    #[serde(default)]
    pub target: Option<NodeId>,
}

impl KeyEvent {
    pub fn new(key: KeyCode) -> Self {
        Self {
            key,
            repeat: false,
            target: None,
        }
    }

    pub fn repeated(mut self) -> Self {
        self.repeat = true;
        self
    }

    pub fn with_target(mut self, target: NodeId) -> Self {
        self.target = Some(target);
        self
    }
}

/// Wheel rotation
///
/// Positive deltas scroll toward the end (down/right).
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelEvent {
    #[serde(default)]
    pub delta_x: f32,
    #[serde(default)]
    pub delta_y: f32,
    #[serde(default)]
    pub delta_mode: DeltaMode,
    /// Wheel happened over a scrollbar rather than the content
    #[serde(default)]
    pub on_scrollbar: bool,
}

impl WheelEvent {
    pub fn vertical(delta_y: f32) -> Self {
        Self {
            delta_y,
            ..Default::default()
        }
    }
}

/// Pointer position update or press
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
}

/// Focus entering an element inside the scroll region
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusEvent {
    pub target: NodeId,
}

/// Recognised voice intent delivered by the voice runtime
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceEvent {
    /// Scroll keyword ("down", "next", "leftmost", ...)
    pub scroll: String,
}

impl VoiceEvent {
    pub fn new(scroll: impl Into<String>) -> Self {
        Self {
            scroll: scroll.into(),
        }
    }
}

/// What a handler asks the host to do with the native event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct EventResponse {
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

impl EventResponse {
    pub const IGNORED: EventResponse = EventResponse {
        prevent_default: false,
        stop_propagation: false,
    };

    pub fn prevent_default(&mut self) {
        self.prevent_default = true;
    }

    pub fn stop_propagation(&mut self) {
        self.stop_propagation = true;
    }

    /// Combine two responses, keeping every request from either
    pub fn merge(self, other: EventResponse) -> EventResponse {
        EventResponse {
            prevent_default: self.prevent_default || other.prevent_default,
            stop_propagation: self.stop_propagation || other.stop_propagation,
        }
    }
}
