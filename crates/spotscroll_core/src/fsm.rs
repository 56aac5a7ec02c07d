//! State Machine Runtime
//!
//! Typed flat state machines for interaction phases. States are plain enums
//! implementing [`StateTransitions`]; [`StateMachine`] applies events and
//! keeps a bounded transition history for debugging.

use std::fmt::Debug;
use std::hash::Hash;

use smallvec::SmallVec;

/// Identifier for an event type
pub type EventId = u32;

/// Number of transitions kept in the history
const HISTORY_LIMIT: usize = 16;

/// Trait for state types that map events to transitions
///
/// # Example
///
/// ```rust
/// use spotscroll_core::fsm::{EventId, StateTransitions};
///
/// const PRESS: EventId = 1;
/// const RELEASE: EventId = 2;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Button {
///     Up,
///     Down,
/// }
///
/// impl StateTransitions for Button {
///     fn on_event(&self, event: EventId) -> Option<Self> {
///         match (self, event) {
///             (Button::Up, PRESS) => Some(Button::Down),
///             (Button::Down, RELEASE) => Some(Button::Up),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait StateTransitions: Clone + Copy + PartialEq + Eq + Hash + Debug + 'static {
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: EventId) -> Option<Self>;
}

/// A state machine instance over a typed state
#[derive(Debug, Clone)]
pub struct StateMachine<S: StateTransitions> {
    current: S,
    history: SmallVec<[(S, EventId, S); HISTORY_LIMIT]>,
}

impl<S: StateTransitions> StateMachine<S> {
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            history: SmallVec::new(),
        }
    }

    /// Get the current state
    pub fn current(&self) -> S {
        self.current
    }

    /// Check if we're in a specific state
    pub fn is_in(&self, state: S) -> bool {
        self.current == state
    }

    /// Check if an event would trigger a transition from the current state
    pub fn can_send(&self, event: EventId) -> bool {
        self.current.on_event(event).is_some()
    }

    /// Send an event, returning the new state if a transition happened
    pub fn send(&mut self, event: EventId) -> Option<S> {
        let from = self.current;
        let to = from.on_event(event)?;

        if self.history.len() == HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push((from, event, to));
        self.current = to;

        tracing::trace!("fsm {:?} --{}--> {:?}", from, event, to);
        Some(to)
    }

    /// Jump to a state without an event (used on teardown)
    pub fn reset(&mut self, state: S) {
        self.current = state;
    }

    /// Recent transitions, oldest first
    pub fn history(&self) -> &[(S, EventId, S)] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl<S: StateTransitions + Default> Default for StateMachine<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTER: EventId = 1;
    const LEAVE: EventId = 2;
    const PRESS: EventId = 3;
    const RELEASE: EventId = 4;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    enum Pointer {
        #[default]
        Idle,
        Hovered,
        Pressed,
    }

    impl StateTransitions for Pointer {
        fn on_event(&self, event: EventId) -> Option<Self> {
            match (self, event) {
                (Pointer::Idle, ENTER) => Some(Pointer::Hovered),
                (Pointer::Hovered, LEAVE) => Some(Pointer::Idle),
                (Pointer::Hovered, PRESS) => Some(Pointer::Pressed),
                (Pointer::Pressed, RELEASE) => Some(Pointer::Hovered),
                _ => None,
            }
        }
    }

    #[test]
    fn test_simple_transitions() {
        let mut fsm = StateMachine::<Pointer>::default();
        assert_eq!(fsm.current(), Pointer::Idle);

        assert_eq!(fsm.send(ENTER), Some(Pointer::Hovered));
        assert_eq!(fsm.send(PRESS), Some(Pointer::Pressed));
        assert_eq!(fsm.send(RELEASE), Some(Pointer::Hovered));
        assert_eq!(fsm.send(LEAVE), Some(Pointer::Idle));
    }

    #[test]
    fn test_invalid_event_no_transition() {
        let mut fsm = StateMachine::new(Pointer::Idle);
        assert_eq!(fsm.send(PRESS), None);
        assert!(fsm.is_in(Pointer::Idle));
        assert!(!fsm.can_send(PRESS));
        assert!(fsm.can_send(ENTER));
    }

    #[test]
    fn test_history_is_bounded() {
        let mut fsm = StateMachine::new(Pointer::Idle);
        for _ in 0..20 {
            fsm.send(ENTER);
            fsm.send(LEAVE);
        }
        assert_eq!(fsm.history().len(), HISTORY_LIMIT);
        assert_eq!(
            fsm.history().last(),
            Some(&(Pointer::Hovered, LEAVE, Pointer::Idle))
        );

        fsm.clear_history();
        assert!(fsm.history().is_empty());
    }
}
