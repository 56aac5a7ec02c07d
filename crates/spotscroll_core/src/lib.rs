//! Spotscroll Core
//!
//! Foundational primitives shared by the scroll arbitration engine:
//!
//! - **Geometry**: points, sizes and rectangles in viewport pixels
//! - **Input Events**: platform-agnostic key, wheel, focus, pointer and voice events
//! - **State Machines**: typed state machines for scroll phases
//!
//! # Example
//!
//! ```rust
//! use spotscroll_core::events::{Direction, KeyCode};
//!
//! assert_eq!(Direction::from_key(KeyCode::DOWN), Some(Direction::Down));
//! assert!(KeyCode::PAGE_DOWN.is_page_key());
//! ```

pub mod events;
pub mod fsm;
pub mod geometry;

pub use events::{
    Axis, DeltaMode, Direction, Edge, EventResponse, FocusEvent, KeyCode, KeyEvent, NodeId,
    PointerEvent, VoiceEvent, WheelEvent,
};
pub use fsm::{EventId, StateMachine, StateTransitions};
pub use geometry::{Point, Rect, Size};
