//! Collaborator contracts
//!
//! The engine never renders or tracks focus itself. A host supplies:
//!
//! - [`Spotlight`]: the directional focus-navigation system
//! - [`Layout`]: element geometry and the scroll position sink
//! - [`ScrollContent`]: the scrolled content component (list, grid, plain
//!   scroller), which knows how to place and focus its items
//! - [`VoiceReporter`]: the voice runtime's action-result channel
//!
//! Every entry point on [`Scroller`](crate::Scroller) receives these through a
//! [`ScrollEnv`] borrowed for the duration of one event.
//!
//! Horizontal geometry is logical: `x` grows from the start edge, so a
//! right-to-left host mirrors its rectangles before reporting them.

use spotscroll_core::{Direction, NodeId, Point, Rect, Size};

use crate::config::ScrollDirection;
use crate::state::{ScrollBounds, ScrollPosition};

/// Directional focus navigation
pub trait Spotlight {
    /// Currently focused element
    fn current(&self) -> Option<NodeId>;

    /// Container that owns focus when no element is focused
    fn active_container(&self) -> Option<NodeId> {
        None
    }

    /// The user is driving the UI with a pointer
    fn pointer_mode(&self) -> bool;

    /// Focus changes are temporarily suspended
    fn is_paused(&self) -> bool {
        false
    }

    /// Move focus to `node`, returning whether focus moved
    fn focus(&mut self, node: NodeId) -> bool;

    /// Focus the topmost spottable element inside `container`
    fn focus_container(&mut self, container: NodeId) -> bool;

    /// Remove focus from the current element
    fn blur(&mut self);

    /// Element focus would move to from `from` in `direction`
    fn target_by_direction(&self, direction: Direction, from: NodeId) -> Option<NodeId>;

    /// Element focus would move to from an arbitrary point
    fn target_by_direction_from_point(&self, direction: Direction, point: Point) -> Option<NodeId>;

    /// Spottable elements inside `container`, in navigation order
    fn spottable_descendants(&self, container: NodeId) -> Vec<NodeId>;
}

/// Element geometry
pub trait Layout {
    /// Bounding client rect of `node`
    fn rect(&self, node: NodeId) -> Option<Rect>;

    /// Full scrollable size of a content node
    fn scroll_size(&self, content: NodeId) -> Option<Size>;

    /// `node` is `ancestor` or one of its descendants
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool;

    /// Topmost element under a client point
    fn element_from_point(&self, point: Point) -> Option<NodeId>;

    /// Nearest spottable element at or above `node`
    fn closest_spottable(&self, node: NodeId) -> Option<NodeId>;

    /// Apply a scroll offset to a content node
    fn set_scroll_position(&mut self, content: NodeId, position: ScrollPosition);
}

/// Everything the engine needs from the host UI
pub trait ScrollHost: Spotlight + Layout {}

impl<T: Spotlight + Layout + ?Sized> ScrollHost for T {}

/// Input to the content's focus position calculator
#[derive(Clone, Debug, PartialEq)]
pub struct FocusQuery {
    pub item: NodeId,
    pub item_rect: Rect,
    /// Client rect of the viewport
    pub container_rect: Rect,
    pub current: ScrollPosition,
    pub bounds: ScrollBounds,
    pub direction: ScrollDirection,
    /// Position to measure against instead of `current` while an animation
    /// toward it is still running
    pub scroll_position: Option<ScrollPosition>,
    pub scroll_info: Option<ScrollInfo>,
}

/// Scroll state captured before a focus calculation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollInfo {
    /// Content height at the previous calculation
    pub previous_scroll_height: f32,
    pub scroll_top: f32,
}

/// The scrolled content component
pub trait ScrollContent {
    /// Scroll position that reveals the focused item
    ///
    /// Returning `None` skips focus-follow scrolling.
    fn calculate_position_on_focus(&self, _query: &FocusQuery) -> Option<ScrollPosition> {
        None
    }

    fn should_prevent_scroll_by_focus(&self) -> bool {
        false
    }

    fn should_prevent_overscroll_effect(&self) -> bool {
        false
    }

    /// Remember an item focused while focus-follow scrolling was suppressed
    fn set_last_focused_node(&mut self, _node: NodeId) {}

    /// Enable or disable the content's spotlight container
    fn set_container_disabled(&mut self, disabled: bool);

    fn pause_spotlight(&mut self, _paused: bool) {}

    /// Focus the item at `index`, returning whether the content handled it
    fn focus_by_index(&mut self, _host: &mut dyn ScrollHost, _index: usize) -> bool {
        false
    }

    /// Focus `node` after a programmatic scroll
    fn focus_on_node(&mut self, host: &mut dyn ScrollHost, node: NodeId) -> bool {
        host.focus(node)
    }

    /// Scroll position that brings item `index` to the start of the viewport
    fn item_position(&self, _index: usize) -> Option<ScrollPosition> {
        None
    }
}

/// Voice runtime result channel
pub trait VoiceReporter {
    /// The requested scroll had nothing left to do
    fn report_already_completed(&mut self);
}

/// Collaborators borrowed for one event
pub struct ScrollEnv<'a> {
    pub host: &'a mut dyn ScrollHost,
    pub content: &'a mut dyn ScrollContent,
    pub voice: Option<&'a mut dyn VoiceReporter>,
    /// Event timestamp in milliseconds
    pub now_ms: f64,
}

impl<'a> ScrollEnv<'a> {
    pub fn new(
        host: &'a mut dyn ScrollHost,
        content: &'a mut dyn ScrollContent,
        now_ms: f64,
    ) -> Self {
        Self {
            host,
            content,
            voice: None,
            now_ms,
        }
    }

    pub fn with_voice(mut self, voice: &'a mut dyn VoiceReporter) -> Self {
        self.voice = Some(voice);
        self
    }
}
