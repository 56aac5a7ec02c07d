//! Remembered scroll positions
//!
//! Scrollers with an `id` record their position here on every change and
//! restore it when they mount again, so a list keeps its place across
//! navigation away and back.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::state::ScrollPosition;

/// Store shared between scrollers
pub type SharedPositionStore = Arc<Mutex<ScrollPositionStore>>;

#[derive(Debug, Default)]
pub struct ScrollPositionStore {
    positions: FxHashMap<String, ScrollPosition>,
}

impl ScrollPositionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedPositionStore {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Store key for a scroller id
    pub fn key(id: &str) -> String {
        format!("{}.scrollPosition", id)
    }

    pub fn set(&mut self, id: &str, position: ScrollPosition) {
        self.positions.insert(Self::key(id), position);
    }

    pub fn get(&self, id: &str) -> Option<ScrollPosition> {
        self.positions.get(&Self::key(id)).copied()
    }

    pub fn remove(&mut self, id: &str) -> Option<ScrollPosition> {
        self.positions.remove(&Self::key(id))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_keyed_by_id() {
        let mut store = ScrollPositionStore::new();
        store.set("list", ScrollPosition::new(0.0, 120.0));
        store.set("list", ScrollPosition::new(0.0, 240.0));

        assert_eq!(ScrollPositionStore::key("list"), "list.scrollPosition");
        assert_eq!(store.get("list"), Some(ScrollPosition::new(0.0, 240.0)));
        assert_eq!(store.get("grid"), None);
        assert_eq!(store.len(), 1);
        assert!(store.remove("list").is_some());
        assert!(store.is_empty());
    }
}
