//! Recent activity: bounded, most-recent-first queue of display events.
//!
//! Non-authoritative: the front-end shows it, nothing else reads it.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::util::now_secs;

pub const DEFAULT_ACTIVITY_CAPACITY: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// Unix seconds; 0 for events loaded from snapshots that lacked it.
    #[serde(default)]
    pub at: u64,
    pub message: String,
}

impl ActivityEvent {
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            at: now_secs(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentActivity {
    events: VecDeque<ActivityEvent>,
    capacity: usize,
}

impl Default for RecentActivity {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_ACTIVITY_CAPACITY)
    }
}

impl RecentActivity {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// `events` are expected newest first (as persisted).
    pub(crate) fn from_events(capacity: usize, events: impl IntoIterator<Item = ActivityEvent>) -> Self {
        let mut a = Self::with_capacity(capacity);
        a.events.extend(events.into_iter().take(a.capacity));
        a
    }

    /// Push to the front; the oldest event falls off past capacity.
    pub fn push(&mut self, event: ActivityEvent) {
        self.events.push_front(event);
        self.events.truncate(self.capacity);
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &ActivityEvent> {
        self.events.iter()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
