//! Deferred timers
//!
//! Fire-and-forget continuations (delayed effect clearing, scroll-stop
//! detection, thumb hiding) are modelled as payloads with deadlines. The
//! owner advances the queue with the current time and handles whatever
//! fired; cancelling is just removing the entry.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct TimerId;
}

struct Timer<T> {
    deadline_ms: f64,
    /// Insertion sequence, breaks ties between equal deadlines
    seq: u64,
    payload: T,
}

/// A queue of payloads waiting for their deadlines
pub struct TimerQueue<T> {
    timers: SlotMap<TimerId, Timer<T>>,
    next_seq: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            next_seq: 0,
        }
    }

    /// Schedule `payload` to fire `delay_ms` after `now_ms`
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, payload: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(Timer {
            deadline_ms: now_ms + delay_ms.max(0.0),
            seq,
            payload,
        })
    }

    /// Cancel a pending timer, returning its payload
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        self.timers.remove(id).map(|t| t.payload)
    }

    /// Cancel every pending timer whose payload matches
    pub fn cancel_where<F: FnMut(&T) -> bool>(&mut self, mut pred: F) -> usize {
        let before = self.timers.len();
        self.timers.retain(|_, t| !pred(&t.payload));
        before - self.timers.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Remove and return all payloads due at `now_ms`, earliest first
    pub fn advance(&mut self, now_ms: f64) -> Vec<T> {
        let mut due: Vec<(f64, u64, TimerId)> = self
            .timers
            .iter()
            .filter(|(_, t)| t.deadline_ms <= now_ms)
            .map(|(id, t)| (t.deadline_ms, t.seq, id))
            .collect();
        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        due.into_iter()
            .filter_map(|(_, _, id)| self.timers.remove(id))
            .map(|t| t.payload)
            .collect()
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<f64> {
        self.timers
            .values()
            .map(|t| t.deadline_ms)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.schedule(0.0, 300.0, "late");
        q.schedule(0.0, 100.0, "early");
        q.schedule(0.0, 100.0, "early-second");

        assert!(q.advance(50.0).is_empty());
        assert_eq!(q.advance(150.0), vec!["early", "early-second"]);
        assert_eq!(q.next_deadline(), Some(300.0));
        assert_eq!(q.advance(1000.0), vec!["late"]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_cancel() {
        let mut q = TimerQueue::new();
        let id = q.schedule(0.0, 10.0, 1);
        q.schedule(0.0, 10.0, 2);
        q.schedule(0.0, 10.0, 3);

        assert_eq!(q.cancel(id), Some(1));
        assert!(!q.is_pending(id));
        assert_eq!(q.cancel_where(|p| *p == 3), 1);
        assert_eq!(q.advance(10.0), vec![2]);
    }

    #[test]
    fn test_clear() {
        let mut q = TimerQueue::new();
        q.schedule(0.0, 10.0, ());
        q.clear();
        assert_eq!(q.len(), 0);
        assert_eq!(q.next_deadline(), None);
    }
}
