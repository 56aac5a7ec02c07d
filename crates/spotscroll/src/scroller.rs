//! Scroller composition root
//!
//! One [`Scroller`] per scroll viewport. It owns the bridge, the overscroll
//! engine, focus bookkeeping, and timers, and exposes one handler per host
//! event. Handlers live next to the behaviour they implement (`focus`,
//! `input::*`, `scrollbar`); this module holds construction, lifecycle,
//! settling, and frame stepping.
//!
//! # Example
//!
//! ```rust
//! use spotscroll::headless::vertical_list;
//! use spotscroll::{PageKeyMonitor, ScrollConfig, ScrollEnv, Scroller, Spotlight};
//! use spotscroll_core::{KeyCode, KeyEvent};
//!
//! let mut fx = vertical_list(500.0, 100.0, 15);
//! let mut scroller = Scroller::new(ScrollConfig::default(), PageKeyMonitor::shared());
//!
//! fx.host.focus(fx.items[0]);
//! let mut env = ScrollEnv::new(&mut fx.host, &mut fx.content, 0.0);
//! scroller.mount(&mut env, fx.container, fx.content_node);
//! scroller.on_key_down(&mut env, &KeyEvent::new(KeyCode::PAGE_DOWN).with_target(fx.items[0]));
//!
//! env.now_ms = 1000.0;
//! scroller.tick(&mut env);
//! assert_eq!(scroller.position().top, 400.0);
//! ```

use spotscroll_animation::{AnimationFrame, TimerQueue};
use spotscroll_core::NodeId;

use crate::bridge::{ScrollAnimatorBridge, ScrollToOptions, StartOutcome, StartRequest};
use crate::config::{ScrollConfig, ScrollMode};
use crate::focus::{FocusIntent, FocusState};
use crate::host::{ScrollEnv, Spotlight};
use crate::input::touch::DragState;
use crate::input::voice::VoiceState;
use crate::monitor::{ScrollerId, SharedPageKeyMonitor};
use crate::overscroll::OverscrollEffects;
use crate::scrollbar::ScrollbarThumbs;
use crate::state::{InputType, ScrollBounds, ScrollPhase, ScrollPosition, ViewportState};
use crate::store::SharedPositionStore;
use crate::strategy::{strategy_for, ScrollStrategy};

/// Deferred continuations owned by a scroller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ScrollTimer {
    /// No native scroll event arrived for the waiting period
    ScrollStop,
    HideThumbs,
}

/// Scroll coordination for one viewport
pub struct Scroller {
    pub(crate) config: ScrollConfig,
    pub(crate) strategy: Box<dyn ScrollStrategy>,
    pub(crate) bridge: ScrollAnimatorBridge,
    pub(crate) overscroll: OverscrollEffects,
    pub(crate) focus: FocusState,
    /// Item to focus when the current scroll settles
    pub(crate) intent: Option<FocusIntent>,
    pub(crate) voice: VoiceState,
    pub(crate) drag: DragState,
    pub(crate) thumbs: ScrollbarThumbs,
    pub(crate) timers: TimerQueue<ScrollTimer>,
    pub(crate) monitor: SharedPageKeyMonitor,
    registration: Option<ScrollerId>,
    store: Option<SharedPositionStore>,
    /// A programmatic scroll has not settled yet
    pub(crate) scroll_to_pending: bool,
}

impl Scroller {
    pub fn new(config: ScrollConfig, monitor: SharedPageKeyMonitor) -> Self {
        Self {
            strategy: strategy_for(&config),
            bridge: ScrollAnimatorBridge::new(&config),
            overscroll: OverscrollEffects::new(&config),
            focus: FocusState::default(),
            intent: None,
            voice: VoiceState::default(),
            drag: DragState::default(),
            thumbs: ScrollbarThumbs::default(),
            timers: TimerQueue::new(),
            monitor,
            registration: None,
            store: None,
            scroll_to_pending: false,
            config,
        }
    }

    /// Remember positions in `store` under the configured id
    pub fn with_store(mut self, store: SharedPositionStore) -> Self {
        self.store = Some(store);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    pub fn mode(&self) -> ScrollMode {
        self.strategy.mode()
    }

    /// Registration in the page key monitor while mounted
    pub fn id(&self) -> Option<ScrollerId> {
        self.registration
    }

    pub fn is_mounted(&self) -> bool {
        self.registration.is_some()
    }

    pub fn state(&self) -> &ViewportState {
        self.bridge.state()
    }

    pub fn phase(&self) -> ScrollPhase {
        self.bridge.phase()
    }

    pub fn position(&self) -> ScrollPosition {
        self.bridge.position()
    }

    pub fn bridge(&self) -> &ScrollAnimatorBridge {
        &self.bridge
    }

    pub fn overscroll(&self) -> &OverscrollEffects {
        &self.overscroll
    }

    pub fn pending_intent(&self) -> Option<&FocusIntent> {
        self.intent.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.bridge.is_animating()
    }

    /// Earliest pending timer deadline
    pub fn next_deadline(&self) -> Option<f64> {
        match (self.timers.next_deadline(), self.overscroll.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Attach to the host's container and content elements
    ///
    /// Registers with the page key monitor and restores a stored position.
    pub fn mount(&mut self, env: &mut ScrollEnv<'_>, container: NodeId, content: NodeId) {
        if self.registration.is_some() {
            tracing::warn!("scroller already mounted, ignoring mount");
            return;
        }

        self.bridge.attach(container, content);
        self.registration = Some(self.monitor.lock().register(container, &*env.host));

        let stored = match (&self.store, &self.config.id) {
            (Some(store), Some(id)) => store.lock().get(id),
            _ => None,
        };
        if let Some(position) = stored {
            tracing::debug!(
                "restoring stored position ({:.1}, {:.1})",
                position.left,
                position.top
            );
            self.bridge.start(
                &mut *env.host,
                &mut self.overscroll,
                StartRequest::immediate(position),
                env.now_ms,
            );
        }

        if let Some(bounds) = self.bounds(env) {
            self.bridge.set_last_scroll_height(bounds.scroll_height);
        }
    }

    /// Detach from the host, cancelling timers and leaving the monitor
    pub fn unmount(&mut self) {
        if let Some(id) = self.registration.take() {
            self.monitor.lock().unregister(id);
        }
        self.timers.clear();
        self.overscroll.clear_all();
        self.bridge.stop();
        self.bridge.detach();
        self.intent = None;
        self.voice = VoiceState::default();
        self.drag = DragState::default();
        self.thumbs.hide();
        self.scroll_to_pending = false;
    }

    // =========================================================================
    // Scrolling
    // =========================================================================

    /// Move toward a target through the bridge
    pub fn start(&mut self, env: &mut ScrollEnv<'_>, request: StartRequest) -> StartOutcome {
        let outcome = self
            .bridge
            .start(&mut *env.host, &mut self.overscroll, request, env.now_ms);
        self.after_start(env, outcome);
        outcome
    }

    pub(crate) fn scroll_to_accumulated_target(
        &mut self,
        env: &mut ScrollEnv<'_>,
        delta: f32,
        vertical: bool,
        overscroll_effect: bool,
    ) -> StartOutcome {
        let outcome = self.bridge.scroll_to_accumulated_target(
            &mut *env.host,
            &mut self.overscroll,
            delta,
            vertical,
            overscroll_effect,
            env.now_ms,
        );
        self.after_start(env, outcome);
        outcome
    }

    fn after_start(&mut self, env: &mut ScrollEnv<'_>, outcome: StartOutcome) {
        match outcome {
            StartOutcome::Jumped => {
                self.after_position_change(env);
                if self.strategy.focuses_on_immediate_start() {
                    self.focus_on_item(env);
                } else {
                    self.stop(env);
                }
            }
            // Nothing will move, so nothing else will settle this request
            StartOutcome::Clamped if !self.bridge.is_animating() => self.stop(env),
            _ => {}
        }
    }

    /// Programmatic scroll to a position, alignment, item, or node
    ///
    /// Returns `None` when the request names nothing resolvable.
    pub fn scroll_to(
        &mut self,
        env: &mut ScrollEnv<'_>,
        options: &ScrollToOptions,
    ) -> Option<StartOutcome> {
        if options.focus {
            if let Some(index) = options.index {
                self.set_intent(FocusIntent::Index(index));
            } else if let Some(node) = options.node {
                self.set_intent(FocusIntent::Node(node));
            }
        } else if matches!(self.intent, Some(FocusIntent::Index(_) | FocusIntent::Node(_))) {
            self.intent = None;
        }

        let bounds = self.bounds(env)?;
        let target = if let Some(position) = options.position {
            Some(position)
        } else if let Some(align) = options.align {
            Some(self.bridge.align_target(align, &bounds))
        } else if let Some(index) = options.index {
            env.content.item_position(index)
        } else if let Some(node) = options.node {
            self.bridge.node_target(&*env.host, node)
        } else {
            None
        };

        let Some(target) = target else {
            tracing::debug!("scroll_to resolved no target: {:?}", options);
            return None;
        };

        self.scroll_to_pending = true;
        let outcome = self.bridge.start(
            &mut *env.host,
            &mut self.overscroll,
            StartRequest {
                target,
                animate: options.animate,
                overscroll_effect: false,
            },
            env.now_ms,
        );

        if outcome == StartOutcome::Detached {
            self.scroll_to_pending = false;
        } else {
            self.after_start(env, outcome);
        }
        Some(outcome)
    }

    /// Finalise the current scroll and settle focus
    ///
    /// Re-enables the spotlight container, consumes the pending focus
    /// intent, and ends voice control.
    pub fn stop(&mut self, env: &mut ScrollEnv<'_>) {
        let was_active = self.bridge.stop();
        self.scroll_to_pending = false;
        self.timers.cancel_where(|t| *t == ScrollTimer::ScrollStop);
        self.start_hiding_thumbs(env.now_ms);

        if !self.config.spotlight_container_disabled {
            env.content.set_container_disabled(false);
        }
        env.content.pause_spotlight(false);

        self.focus_on_item(env);
        self.focus.last_scroll_position_on_focus = None;
        self.stop_voice(env);

        tracing::debug!("scroll stopped (was active: {})", was_active);
    }

    /// Advance animation and timers to `env.now_ms`
    pub fn tick(&mut self, env: &mut ScrollEnv<'_>) -> Option<AnimationFrame> {
        let now = env.now_ms;
        let frame = self.bridge.tick(&mut *env.host, now);

        if let Some(frame) = frame {
            self.after_position_change(env);
            if frame.done && self.strategy.settles_on_animation_end() {
                self.stop(env);
            }
        }

        self.overscroll.tick(now);

        for timer in self.timers.advance(now) {
            match timer {
                ScrollTimer::ScrollStop => {
                    tracing::debug!("scroll stop timer fired");
                    self.stop(env);
                }
                ScrollTimer::HideThumbs => self.thumbs.hide(),
            }
        }

        frame
    }

    // =========================================================================
    // Host notifications
    // =========================================================================

    /// The host scrolled natively to `position`
    pub fn on_scroll(&mut self, env: &mut ScrollEnv<'_>, position: ScrollPosition) {
        self.bridge.sync_position(position);
        self.after_position_change(env);
    }

    /// Content re-rendered; follow the focused item if the content grew or shrank
    pub fn on_scroller_update(&mut self, env: &mut ScrollEnv<'_>) {
        if !self.scroll_to_pending {
            if let Some(bounds) = self.bounds(env) {
                if bounds.scroll_height != self.bridge.last_scroll_height() {
                    tracing::debug!(
                        "content height {} -> {}",
                        self.bridge.last_scroll_height(),
                        bounds.scroll_height
                    );
                    self.calculate_and_scroll_to(env);
                }
            }
        }

        if let Some(bounds) = self.bounds(env) {
            self.bridge.set_last_scroll_height(bounds.scroll_height);
        }
    }

    pub fn on_resize_window(&mut self, env: &mut ScrollEnv<'_>) {
        if env.host.current().is_some() {
            env.host.blur();
        }
    }

    // =========================================================================
    // Shared helpers
    // =========================================================================

    pub(crate) fn bounds(&mut self, env: &ScrollEnv<'_>) -> Option<ScrollBounds> {
        self.bridge.get_scroll_bounds(&*env.host)
    }

    pub(crate) fn set_intent(&mut self, intent: FocusIntent) {
        if let Some(previous) = &self.intent {
            tracing::debug!("focus intent {:?} replaced by {:?}", previous, intent);
        } else {
            tracing::debug!("focus intent {:?}", intent);
        }
        self.intent = Some(intent);
    }

    pub(crate) fn overscroll_enabled(&self, input: Option<InputType>) -> bool {
        input.map_or(false, |input| self.config.overscroll_effect_on.is_enabled(input))
    }

    /// Bookkeeping after the viewport moved
    pub(crate) fn after_position_change(&mut self, env: &mut ScrollEnv<'_>) {
        let position = self.bridge.position();
        if let Some(bounds) = self.bounds(env) {
            self.overscroll.on_position(position, &bounds);
        }

        if self.strategy.mode() == ScrollMode::Native && !self.bridge.state().is_dragging {
            self.bridge.mark_scrolling();
            self.timers.cancel_where(|t| *t == ScrollTimer::ScrollStop);
            self.timers
                .schedule(env.now_ms, self.config.scroll_stop_waiting_ms, ScrollTimer::ScrollStop);
        }

        if let (Some(store), Some(id)) = (&self.store, &self.config.id) {
            store.lock().set(id, position);
        }
    }
}

impl Drop for Scroller {
    fn drop(&mut self) {
        if let Some(id) = self.registration.take() {
            self.monitor.lock().unregister(id);
        }
    }
}
