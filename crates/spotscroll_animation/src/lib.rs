//! Spotscroll Animation System
//!
//! Time-driven scroll animation and deferred callbacks.
//!
//! # Features
//!
//! - **Easing**: standard curves plus CSS-compatible cubic bezier
//! - **Scroll Animator**: two-axis eased interpolation sampled with explicit timestamps
//! - **Retargetable**: same-direction requests extend the running animation
//! - **Timers**: deadline-ordered deferred payloads for delayed effects

pub mod animator;
pub mod easing;
pub mod scheduler;

pub use animator::{AnimationFrame, ScrollAnimator};
pub use easing::Easing;
pub use scheduler::{TimerId, TimerQueue};
