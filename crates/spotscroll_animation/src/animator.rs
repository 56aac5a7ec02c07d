//! Two-axis scroll animator
//!
//! Interpolates a scroll position from a start point to a target over a
//! fixed duration. The animator never reads a clock: callers pass
//! timestamps in milliseconds, which keeps frame stepping deterministic.

use spotscroll_core::Point;

use crate::easing::Easing;

/// Fraction of the full duration an extended animation is guaranteed
const MIN_EXTEND_FRACTION: f64 = 0.25;

/// One sampled animation frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    pub position: Point,
    /// The animation reached its target on this frame
    pub done: bool,
}

/// Eased interpolation between two scroll positions
#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    easing: Easing,
    from: Point,
    to: Point,
    start_ms: f64,
    duration_ms: f64,
    full_duration_ms: f64,
    running: bool,
    last: Point,
}

impl ScrollAnimator {
    pub fn new(easing: Easing) -> Self {
        Self {
            easing,
            from: Point::ZERO,
            to: Point::ZERO,
            start_ms: 0.0,
            duration_ms: 0.0,
            full_duration_ms: 0.0,
            running: false,
            last: Point::ZERO,
        }
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Begin a fresh animation, replacing any running one
    pub fn start(&mut self, from: Point, to: Point, duration_ms: f64, now_ms: f64) {
        let duration_ms = duration_ms.max(0.0);
        self.from = from;
        self.to = to;
        self.start_ms = now_ms;
        self.duration_ms = duration_ms;
        self.full_duration_ms = duration_ms;
        self.running = true;
        self.last = from;
        tracing::trace!(
            "animator start ({:.1}, {:.1}) -> ({:.1}, {:.1}) over {:.0}ms",
            from.x,
            from.y,
            to.x,
            to.y,
            duration_ms
        );
    }

    /// Redirect a running animation to a new target without restarting the clock
    ///
    /// The animation continues from the last sampled position and keeps its
    /// original deadline, but never gets less than a quarter of the full
    /// duration. Starts a fresh animation when nothing is running.
    pub fn extend(&mut self, to: Point, full_duration_ms: f64, now_ms: f64) {
        if !self.running {
            self.start(self.last, to, full_duration_ms, now_ms);
            return;
        }

        let deadline = self.start_ms + self.duration_ms;
        let remaining = (deadline - now_ms).max(self.full_duration_ms * MIN_EXTEND_FRACTION);

        self.from = self.last;
        self.to = to;
        self.start_ms = now_ms;
        self.duration_ms = remaining;
        tracing::trace!(
            "animator extend -> ({:.1}, {:.1}), {:.0}ms left",
            to.x,
            to.y,
            remaining
        );
    }

    /// Sample the animation at `now_ms`
    ///
    /// Once the final frame has been returned the animator stops running.
    pub fn sample(&mut self, now_ms: f64) -> AnimationFrame {
        if !self.running {
            return AnimationFrame {
                position: self.last,
                done: true,
            };
        }

        let elapsed = now_ms - self.start_ms;
        let done = self.duration_ms <= 0.0 || elapsed >= self.duration_ms;

        let position = if done {
            self.to
        } else {
            let progress = self.easing.apply((elapsed / self.duration_ms) as f32);
            Point::new(
                self.from.x + (self.to.x - self.from.x) * progress,
                self.from.y + (self.to.y - self.from.y) * progress,
            )
        };

        self.last = position;
        if done {
            self.running = false;
        }

        AnimationFrame { position, done }
    }

    /// Abort the animation where it is
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Forget the last position (used when the position is set externally)
    pub fn sync(&mut self, position: Point) {
        self.last = position;
    }

    pub fn is_animating(&self) -> bool {
        self.running
    }

    /// Target of the running animation
    pub fn target(&self) -> Option<Point> {
        self.running.then_some(self.to)
    }
}

impl Default for ScrollAnimator {
    fn default() -> Self {
        Self::new(Easing::default())
    }
}
