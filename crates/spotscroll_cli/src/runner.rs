//! Scenario replay against a headless viewport

use anyhow::{Context, Result};
use spotscroll::headless::{horizontal_list, vertical_list, HeadlessFixture, RecordingVoice};
use spotscroll::{
    route_page_key, PageKeyMonitor, ScrollConfig, ScrollEnv, ScrollPosition, ScrollToOptions,
    Scroller, SharedPageKeyMonitor, Spotlight,
};
use spotscroll_core::{
    Axis, Direction, Edge, EventResponse, FocusEvent, KeyCode, KeyEvent, Point, VoiceEvent,
    WheelEvent,
};

use crate::report::{ReplayReport, ReportStatus, StepRecord};
use crate::scenario::{Expectation, ListLayout, Scenario, ScenarioStep, ViewportSpec};

/// Frame interval used by `tick` steps
const FRAME_MS: f64 = 16.0;

/// Positions within this distance of the expectation pass
const POSITION_TOLERANCE: f32 = 0.5;

/// What a step did, beyond the state it left behind
#[derive(Debug, Default)]
struct StepOutcome {
    response: Option<EventResponse>,
    note: Option<String>,
    failure: Option<String>,
}

/// A mounted scroller over a headless list, plus the replay clock
pub struct Replay {
    fixture: HeadlessFixture,
    scroller: Scroller,
    monitor: SharedPageKeyMonitor,
    voice: RecordingVoice,
    now_ms: f64,
}

fn scroll_env<'a>(
    fixture: &'a mut HeadlessFixture,
    voice: &'a mut RecordingVoice,
    now_ms: f64,
) -> ScrollEnv<'a> {
    ScrollEnv::new(&mut fixture.host, &mut fixture.content, now_ms).with_voice(voice)
}

impl Replay {
    pub fn new(viewport: &ViewportSpec, config: ScrollConfig) -> Self {
        let mut fixture = match viewport.layout {
            ListLayout::Vertical => vertical_list(viewport.height, viewport.item_size, viewport.items),
            ListLayout::Horizontal => {
                horizontal_list(viewport.height, viewport.item_size, viewport.items)
            }
        };
        let monitor = PageKeyMonitor::shared();
        let mut voice = RecordingVoice::default();
        let mut scroller = Scroller::new(config, monitor.clone());

        let (container, content) = (fixture.container, fixture.content_node);
        scroller.mount(&mut scroll_env(&mut fixture, &mut voice, 0.0), container, content);

        Self {
            fixture,
            scroller,
            monitor,
            voice,
            now_ms: 0.0,
        }
    }

    /// Index of the focused item in the list
    pub fn focused(&self) -> Option<usize> {
        let current = self.fixture.host.current()?;
        self.fixture.items.iter().position(|&item| item == current)
    }

    fn record(&self, index: usize, step: &ScenarioStep, outcome: &StepOutcome) -> StepRecord {
        let position = self.scroller.position();
        StepRecord {
            index,
            step: step.kind(),
            time_ms: self.now_ms,
            left: position.left,
            top: position.top,
            focused: self.focused(),
            animating: self.scroller.is_animating(),
            prevent_default: outcome.response.map(|r| r.prevent_default),
            note: outcome.note.clone(),
        }
    }

    fn apply(&mut self, step: &ScenarioStep) -> Result<StepOutcome> {
        let mut outcome = StepOutcome::default();

        match step {
            ScenarioStep::Key { key, repeat } => {
                let code = KeyCode::from_name(key).with_context(|| format!("unknown key {key:?}"))?;
                let mut event = KeyEvent::new(code);
                if *repeat {
                    event = event.repeated();
                }
                if let Some(current) = self.fixture.host.current() {
                    event = event.with_target(current);
                }

                let routed = route_page_key(&self.monitor, &self.fixture.host, &event);
                let mut env = scroll_env(&mut self.fixture, &mut self.voice, self.now_ms);

                if let Some(id) = self.scroller.id().filter(|id| routed.contains(id)) {
                    let consumed = self.scroller.scroll_by_page_on_pointer_mode(&mut env, &event);
                    outcome.note = Some(format!("routed to {id:?}, consumed: {consumed}"));
                } else {
                    let response = self.scroller.on_key_down(&mut env, &event);
                    outcome.response = Some(response);

                    // Directional navigation moves focus unless the scroller took the key
                    let next = Direction::from_key(code)
                        .filter(|_| !response.prevent_default && !env.host.pointer_mode())
                        .and_then(|direction| {
                            let current = env.host.current()?;
                            env.host.target_by_direction(direction, current)
                        });
                    if let Some(next) = next {
                        env.host.focus(next);
                        self.scroller.on_focus(&mut env, &FocusEvent { target: next });
                    }
                }
            }
            ScenarioStep::Wheel {
                delta_x,
                delta_y,
                mode,
                on_scrollbar,
            } => {
                let event = WheelEvent {
                    delta_x: *delta_x,
                    delta_y: *delta_y,
                    delta_mode: *mode,
                    on_scrollbar: *on_scrollbar,
                };
                let mut env = scroll_env(&mut self.fixture, &mut self.voice, self.now_ms);
                outcome.response = Some(self.scroller.on_wheel(&mut env, &event));
            }
            ScenarioStep::Voice { scroll } => {
                let mut env = scroll_env(&mut self.fixture, &mut self.voice, self.now_ms);
                outcome.response = Some(self.scroller.on_voice(&mut env, &VoiceEvent::new(scroll.as_str())));
            }
            ScenarioStep::Focus { index } => {
                let item = self
                    .fixture
                    .items
                    .get(*index)
                    .copied()
                    .with_context(|| format!("no item at index {index}"))?;
                let mut env = scroll_env(&mut self.fixture, &mut self.voice, self.now_ms);
                if env.host.focus(item) {
                    outcome.response = Some(self.scroller.on_focus(&mut env, &FocusEvent { target: item }));
                }
            }
            ScenarioStep::Pointer { x, y } => {
                self.monitor.lock().track_pointer(Point::new(*x, *y));
                self.fixture.host.set_pointer_mode(true);
            }
            ScenarioStep::PointerMode { enabled } => {
                self.fixture.host.set_pointer_mode(*enabled);
            }
            ScenarioStep::Touch => {
                let mut env = scroll_env(&mut self.fixture, &mut self.voice, self.now_ms);
                outcome.response = Some(self.scroller.on_touch_start(&mut env));
            }
            ScenarioStep::Drag { from, to } => {
                let mut env = scroll_env(&mut self.fixture, &mut self.voice, self.now_ms);
                let response = self
                    .scroller
                    .on_drag_start(&mut env, Point::new(from[0], from[1]));
                self.scroller.on_drag_move(&mut env, Point::new(to[0], to[1]));
                self.scroller.on_drag_end(&mut env);
                outcome.response = Some(response);
            }
            ScenarioStep::ScrollTo {
                left,
                top,
                align,
                index,
                animate,
                focus,
            } => {
                let current = self.scroller.position();
                let position = (left.is_some() || top.is_some()).then(|| {
                    ScrollPosition::new(left.unwrap_or(current.left), top.unwrap_or(current.top))
                });
                let options = ScrollToOptions {
                    position,
                    align: *align,
                    index: *index,
                    node: None,
                    animate: *animate,
                    focus: *focus,
                };
                let mut env = scroll_env(&mut self.fixture, &mut self.voice, self.now_ms);
                let result = self.scroller.scroll_to(&mut env, &options);
                outcome.note = Some(match result {
                    Some(started) => format!("{started:?}"),
                    None => "unresolved".to_string(),
                });
            }
            ScenarioStep::Tick { ms } => {
                let until = self.now_ms + ms.max(0.0);
                let mut env = scroll_env(&mut self.fixture, &mut self.voice, self.now_ms);
                while env.now_ms < until {
                    env.now_ms = (env.now_ms + FRAME_MS).min(until);
                    self.scroller.tick(&mut env);
                }
                self.now_ms = until;
            }
            ScenarioStep::Unmount => self.scroller.unmount(),
            ScenarioStep::Expect(expectation) => {
                outcome.failure = self.check(expectation).err();
            }
        }

        Ok(outcome)
    }

    /// First unmet expectation, if any
    fn check(&self, expect: &Expectation) -> std::result::Result<(), String> {
        let position = self.scroller.position();

        for (name, wanted, actual) in [
            ("top", expect.top, position.top),
            ("left", expect.left, position.left),
        ] {
            if let Some(wanted) = wanted {
                if (actual - wanted).abs() > POSITION_TOLERANCE {
                    return Err(format!("{name}: expected {wanted}, got {actual}"));
                }
            }
        }

        if let Some(wanted) = expect.focused {
            if self.focused() != Some(wanted) {
                return Err(format!("focused: expected item {wanted}, got {:?}", self.focused()));
            }
        }
        if let Some(wanted) = expect.blurred {
            let blurred = self.fixture.host.current().is_none();
            if blurred != wanted {
                return Err(format!("blurred: expected {wanted}, got {blurred}"));
            }
        }
        if let Some(wanted) = expect.animating {
            if self.scroller.is_animating() != wanted {
                return Err(format!("animating: expected {wanted}"));
            }
        }
        if let Some(wanted) = expect.overscroll {
            let effects = self.scroller.overscroll();
            let active = [Axis::Horizontal, Axis::Vertical]
                .into_iter()
                .any(|axis| effects.is_active(axis, Edge::Before) || effects.is_active(axis, Edge::After));
            if active != wanted {
                return Err(format!("overscroll: expected {wanted}, got {active}"));
            }
        }
        if let Some(wanted) = expect.registered {
            let registered = self
                .scroller
                .id()
                .map_or(false, |id| self.monitor.lock().contains(id));
            if registered != wanted {
                return Err(format!("registered: expected {wanted}, got {registered}"));
            }
        }
        if let Some(wanted) = expect.voice_completed {
            if self.voice.already_completed != wanted {
                return Err(format!(
                    "voice_completed: expected {wanted}, got {}",
                    self.voice.already_completed
                ));
            }
        }
        Ok(())
    }
}

/// Replay every step, stopping at the first failed expectation
pub fn replay(scenario: &Scenario, config: ScrollConfig) -> Result<ReplayReport> {
    let mut replay = Replay::new(&scenario.viewport, config);
    let mut report = ReplayReport {
        scenario: scenario.name.clone(),
        status: ReportStatus::Passed,
        failed_step_index: None,
        message: None,
        steps: Vec::with_capacity(scenario.steps.len()),
    };

    for (index, step) in scenario.steps.iter().enumerate() {
        let outcome = replay
            .apply(step)
            .with_context(|| format!("step {index} ({})", step.kind()))?;
        report.steps.push(replay.record(index, step, &outcome));

        if let Some(message) = outcome.failure {
            tracing::warn!("step {} failed: {}", index, message);
            report.status = ReportStatus::Failed;
            report.failed_step_index = Some(index);
            report.message = Some(message);
            break;
        }
        tracing::debug!("step {} ({}) done at {:.1}ms", index, step.kind(), replay.now_ms);
    }

    Ok(report)
}
