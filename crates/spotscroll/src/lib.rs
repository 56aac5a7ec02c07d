//! Spotscroll
//!
//! Scroll arbitration for focus-navigated viewports, as found on TV and
//! remote-control platforms. A [`Scroller`] owns one viewport and decides,
//! for every key, wheel, touch, focus and voice event, whether the viewport
//! scrolls, where it scrolls to, and which item holds focus when it stops:
//!
//! - **Animator bridge**: eased, retargetable two-axis scroll animation
//! - **Focus coordination**: focus-follow scrolling and refocus after page scrolls
//! - **Input classifiers**: page and arrow keys, wheel, touch and drag, voice
//! - **Page key monitor**: routes page keys to the scroller under the pointer
//! - **Overscroll effects**: per-edge flash and drag-held edge effects
//!
//! The engine never touches a UI toolkit directly; the host implements
//! [`Spotlight`] and [`Layout`], the scrolled content implements
//! [`ScrollContent`], and both are lent to each handler through a
//! [`ScrollEnv`]. The [`headless`] module provides in-memory versions.
//!
//! # Example
//!
//! ```rust
//! use spotscroll::headless::vertical_list;
//! use spotscroll::{PageKeyMonitor, ScrollConfig, ScrollEnv, Scroller};
//! use spotscroll_core::WheelEvent;
//!
//! let mut fx = vertical_list(500.0, 100.0, 15);
//! let mut scroller = Scroller::new(ScrollConfig::default(), PageKeyMonitor::shared());
//! let mut env = ScrollEnv::new(&mut fx.host, &mut fx.content, 0.0);
//! scroller.mount(&mut env, fx.container, fx.content_node);
//!
//! scroller.on_wheel(&mut env, &WheelEvent::vertical(120.0));
//! assert!(scroller.is_animating());
//!
//! env.now_ms = 1000.0;
//! scroller.tick(&mut env);
//! assert!(!scroller.is_animating());
//! assert!(scroller.position().top > 0.0);
//! ```

pub mod bridge;
pub mod config;
pub mod error;
pub mod focus;
pub mod headless;
pub mod host;
pub mod input;
pub mod monitor;
pub mod overscroll;
pub mod props;
pub mod scrollbar;
pub mod scroller;
pub mod state;
pub mod store;
pub mod strategy;

pub use bridge::{
    ScrollAlign, ScrollAnimatorBridge, ScrollToOptions, StartOutcome, StartRequest,
};
pub use config::{
    OverscrollEffectOn, PlatformFlags, ScrollConfig, ScrollDirection, ScrollMode,
    ScrollbarVisibility,
};
pub use error::{Result, ScrollError};
pub use focus::{minimal_reveal_position, FocusIntent};
pub use host::{
    FocusQuery, Layout, ScrollContent, ScrollEnv, ScrollHost, ScrollInfo, Spotlight,
    VoiceReporter,
};
pub use input::voice::VoiceScroll;
pub use monitor::{route_page_key, PageKeyMonitor, PageKeyTargets, ScrollerId, SharedPageKeyMonitor};
pub use overscroll::{OverscrollEffects, OverscrollStatus, OverscrollType};
pub use props::{EventHandler, ScrollProps, ScrollbarProps};
pub use scrollbar::{ScrollbarInteraction, ScrollbarThumbs};
pub use scroller::Scroller;
pub use state::{InputType, ScrollBounds, ScrollPhase, ScrollPosition, ViewportState};
pub use store::{ScrollPositionStore, SharedPositionStore};
pub use strategy::{strategy_for, JsStrategy, NativeStrategy, ScrollStrategy, WheelVariant};
