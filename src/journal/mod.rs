// SPDX-License-Identifier: MPL-2.0
//! Lifecycle journal for notification store activity.
//!
//! The journal keeps the most recent lifecycle events, oldest first, and
//! forgets the oldest once it is full. The renderer never needs it; it exists
//! so hosts can inspect what happened to a notification after it left the
//! screen.

mod events;

pub use crate::domain::journal::JournalCapacity;
pub use events::{DismissReason, LifecycleEvent, LifecycleEventKind};

use std::collections::VecDeque;

use crate::notifications::ToastId;

/// Bounded record of lifecycle events, oldest first.
#[derive(Debug, Clone)]
pub struct Journal {
    events: VecDeque<LifecycleEvent>,
    capacity: JournalCapacity,
}

impl Journal {
    /// Creates an empty journal holding at most `capacity` events.
    #[must_use]
    pub fn new(capacity: JournalCapacity) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity.value()),
            capacity,
        }
    }

    /// Records an event for `id`, dropping the oldest event when full.
    pub fn record(&mut self, id: ToastId, kind: LifecycleEventKind) {
        if self.events.len() >= self.capacity.value() {
            self.events.pop_front();
        }
        self.events.push_back(LifecycleEvent::new(id, kind));
    }

    /// Returns the recorded events in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = &LifecycleEvent> {
        self.events.iter()
    }

    /// Returns the events still on record for a single notification.
    #[must_use]
    pub fn history(&self, id: ToastId) -> Vec<LifecycleEvent> {
        self.events.iter().filter(|e| e.id == id).cloned().collect()
    }

    /// Returns the number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for Journal {
    fn default() -> Self {
        Self::new(JournalCapacity::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::Kind;

    #[test]
    fn history_filters_by_id() {
        let mut journal = Journal::default();
        let a = ToastId::new();
        let b = ToastId::new();

        journal.record(a, LifecycleEventKind::Created { kind: Kind::Info });
        journal.record(b, LifecycleEventKind::Created { kind: Kind::Error });
        journal.record(a, LifecycleEventKind::Evicted);

        let history = journal.history(a);
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].kind, LifecycleEventKind::Evicted);
        assert_eq!(journal.len(), 3);
    }

    #[test]
    fn full_journal_forgets_oldest_events() {
        let mut journal = Journal::new(JournalCapacity::new(16));
        let early = ToastId::new();
        journal.record(early, LifecycleEventKind::Created { kind: Kind::Info });

        let late = ToastId::new();
        for _ in 0..16 {
            journal.record(late, LifecycleEventKind::Purged);
        }

        assert_eq!(journal.len(), 16);
        assert!(journal.history(early).is_empty());
        assert_eq!(journal.history(late).len(), 16);
        assert!(journal.iter().all(|e| e.id == late));
    }
}
