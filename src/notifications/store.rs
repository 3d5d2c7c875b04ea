// SPDX-License-Identifier: MPL-2.0
//! Notification store.
//!
//! The `Store` holds the ordered set of visible toasts (newest first),
//! enforces the capacity limit and drives each toast through its phases.
//! It is purely synchronous: timers are armed through the [`Timers`] seam
//! and their reports come back through [`Store::expire`] and [`Store::purge`].

use std::collections::VecDeque;

use tokio::time::Instant;

use super::notification::{
    ActionCallback, Applied, Durations, Phase, Toast, ToastId, ToastView, Transition,
};
use super::scheduler::{self, Epoch, Sample, TimerHandle, Timers};
use crate::domain::toast::MaxNotifications;
use crate::journal::{DismissReason, Journal, LifecycleEventKind};

/// A toast plus its lifecycle bookkeeping.
#[derive(Debug)]
struct Entry {
    toast: Toast,
    phase: Phase,
    epoch: Epoch,
    /// When the current lifetime timer was armed.
    armed_at: Option<Instant>,
    lifetime: Option<TimerHandle>,
    grace: Option<TimerHandle>,
}

impl Entry {
    fn remaining(&self, now: Instant) -> Option<f32> {
        if self.phase != Phase::Active {
            return None;
        }
        let (armed_at, duration) = (self.armed_at?, self.toast.duration()?);
        match scheduler::sample(armed_at, now, duration) {
            Sample::Remaining(fraction) => Some(fraction),
            Sample::Expired | Sample::Anomaly => Some(0.0),
        }
    }

    fn view(&self, now: Instant) -> ToastView {
        ToastView::new(self.toast.clone(), self.phase, self.remaining(now))
    }
}

/// Ordered, bounded collection of toasts.
#[derive(Debug)]
pub struct Store {
    /// Newest first.
    entries: VecDeque<Entry>,
    capacity: MaxNotifications,
    durations: Durations,
    journal: Journal,
}

impl Store {
    /// Creates an empty store.
    #[must_use]
    pub fn new(capacity: MaxNotifications, durations: Durations, journal: Journal) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.value() + 1),
            capacity,
            durations,
            journal,
        }
    }

    /// Returns the per-kind default lifetimes.
    #[must_use]
    pub fn durations(&self) -> &Durations {
        &self.durations
    }

    /// Inserts a toast at the head, evicting the oldest entries over capacity.
    ///
    /// Returns the IDs of evicted toasts, oldest last.
    pub fn insert(&mut self, toast: Toast, timers: &impl Timers) -> Vec<ToastId> {
        let id = toast.id();
        let kind = toast.kind();
        let duration = toast.duration();

        let mut entry = Entry {
            toast,
            phase: Phase::Active,
            epoch: Epoch::default(),
            armed_at: None,
            lifetime: None,
            grace: None,
        };
        if let Some(duration) = duration {
            Self::arm_lifetime(&mut entry, duration, timers);
        }
        self.entries.push_front(entry);
        self.journal.record(id, LifecycleEventKind::Created { kind });
        tracing::debug!(%id, %kind, ?duration, "toast created");

        let mut evicted = Vec::new();
        while self.entries.len() > self.capacity.value() {
            // Dropping the entry cancels its timers.
            if let Some(oldest) = self.entries.pop_back() {
                let oldest_id = oldest.toast.id();
                self.journal.record(oldest_id, LifecycleEventKind::Evicted);
                tracing::debug!(id = %oldest_id, "toast evicted");
                evicted.push(oldest_id);
            }
        }
        evicted
    }

    /// Applies a transition to an active toast.
    ///
    /// Returns `false` without changing anything if the toast is gone, is
    /// already exiting, or the transition does not apply to it.
    pub fn update(&mut self, id: ToastId, transition: Transition, timers: &impl Timers) -> bool {
        let Some(entry) = Self::active_mut(&mut self.entries, id) else {
            return false;
        };
        let name = transition.name();
        let applied = entry.toast.apply(transition, &self.durations);
        match applied {
            Applied::Rejected => return false,
            Applied::Kept => {}
            Applied::Retimed(duration) => {
                entry.armed_at = None;
                if let Some(mut previous) = entry.lifetime.take() {
                    previous.cancel();
                }
                if let Some(duration) = duration {
                    Self::arm_lifetime(entry, duration, timers);
                }
            }
        }
        self.journal
            .record(id, LifecycleEventKind::Updated { transition: name });
        tracing::debug!(%id, transition = name, "toast updated");
        true
    }

    /// Moves an active toast to `exiting` and starts its grace period.
    ///
    /// Returns `false` if the toast is gone or already exiting.
    pub fn dismiss(&mut self, id: ToastId, reason: DismissReason, timers: &impl Timers) -> bool {
        let Some(entry) = Self::active_mut(&mut self.entries, id) else {
            return false;
        };
        Self::begin_exit(entry, timers);
        self.journal
            .record(id, LifecycleEventKind::Dismissed { reason });
        tracing::debug!(%id, ?reason, "toast dismissed");
        true
    }

    /// Dismisses every active toast. Returns how many were dismissed.
    pub fn dismiss_all(&mut self, reason: DismissReason, timers: &impl Timers) -> usize {
        let mut dismissed = 0;
        for entry in self.entries.iter_mut().filter(|e| e.phase == Phase::Active) {
            Self::begin_exit(entry, timers);
            self.journal
                .record(entry.toast.id(), LifecycleEventKind::Dismissed { reason });
            dismissed += 1;
        }
        if dismissed > 0 {
            tracing::debug!(count = dismissed, ?reason, "toasts dismissed");
        }
        dismissed
    }

    /// Handles a lifetime report. Stale reports are ignored.
    pub fn expire(
        &mut self,
        id: ToastId,
        epoch: Epoch,
        reason: DismissReason,
        timers: &impl Timers,
    ) -> bool {
        let current = self
            .entries
            .iter()
            .any(|e| e.toast.id() == id && e.phase == Phase::Active && e.epoch == epoch);
        current && self.dismiss(id, reason, timers)
    }

    /// Handles a grace report, removing the toast. Stale reports are ignored.
    pub fn purge(&mut self, id: ToastId, epoch: Epoch) -> bool {
        let Some(pos) = self
            .entries
            .iter()
            .position(|e| e.toast.id() == id && e.phase == Phase::Exiting && e.epoch == epoch)
        else {
            return false;
        };
        self.entries.remove(pos);
        self.journal.record(id, LifecycleEventKind::Purged);
        tracing::debug!(%id, "toast purged");
        true
    }

    /// Removes every toast immediately, cancelling all timers.
    ///
    /// Returns `true` if anything was removed.
    pub fn clear(&mut self) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let count = self.entries.len();
        for entry in self.entries.drain(..) {
            self.journal
                .record(entry.toast.id(), LifecycleEventKind::Cleared);
        }
        tracing::debug!(count, "toasts cleared");
        true
    }

    /// Returns the action callback of an active toast, dismissing it first
    /// when the action asks for it.
    pub(crate) fn take_action(
        &mut self,
        id: ToastId,
        timers: &impl Timers,
    ) -> Option<(ActionCallback, bool)> {
        let entry = Self::active_mut(&mut self.entries, id)?;
        let action = entry.toast.action()?;
        let callback = action.callback();
        let dismiss = action.dismiss_on_invoke();
        if dismiss {
            self.dismiss(id, DismissReason::ActionInvoked, timers);
        }
        Some((callback, dismiss))
    }

    /// Returns a snapshot of every toast, newest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ToastView> {
        let now = Instant::now();
        self.entries.iter().map(|e| e.view(now)).collect()
    }

    /// Returns a snapshot of one toast.
    #[must_use]
    pub fn get(&self, id: ToastId) -> Option<ToastView> {
        let now = Instant::now();
        self.entries
            .iter()
            .find(|e| e.toast.id() == id)
            .map(|e| e.view(now))
    }

    /// Returns the remaining-life fraction of an active toast with a
    /// running lifetime timer.
    #[must_use]
    pub fn remaining_fraction(&self, id: ToastId) -> Option<f32> {
        let now = Instant::now();
        self.entries
            .iter()
            .find(|e| e.toast.id() == id)
            .and_then(|e| e.remaining(now))
    }

    /// Returns the number of toasts held (active and exiting).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of timers still scheduled.
    #[must_use]
    pub fn running_timers(&self) -> usize {
        self.entries
            .iter()
            .flat_map(|e| [e.lifetime.as_ref(), e.grace.as_ref()])
            .flatten()
            .filter(|handle| handle.is_running())
            .count()
    }

    /// Returns the lifecycle journal.
    #[must_use]
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    fn active_mut(entries: &mut VecDeque<Entry>, id: ToastId) -> Option<&mut Entry> {
        entries
            .iter_mut()
            .find(|e| e.toast.id() == id && e.phase == Phase::Active)
    }

    fn arm_lifetime(entry: &mut Entry, duration: std::time::Duration, timers: &impl Timers) {
        let armed_at = Instant::now();
        entry.epoch = entry.epoch.next();
        entry.armed_at = Some(armed_at);
        entry.lifetime = Some(timers.lifetime(entry.toast.id(), entry.epoch, armed_at, duration));
    }

    fn begin_exit(entry: &mut Entry, timers: &impl Timers) {
        if let Some(mut lifetime) = entry.lifetime.take() {
            lifetime.cancel();
        }
        entry.armed_at = None;
        entry.phase = Phase::Exiting;
        entry.epoch = entry.epoch.next();
        entry.grace = Some(timers.grace(entry.toast.id(), entry.epoch));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::notification::{Action, Kind, ToastSpec};
    use std::cell::RefCell;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Records arm requests instead of spawning tasks.
    #[derive(Default)]
    struct ManualTimers {
        lifetimes: RefCell<Vec<(ToastId, Epoch, Duration)>>,
        graces: RefCell<Vec<(ToastId, Epoch)>>,
    }

    impl ManualTimers {
        fn last_lifetime(&self, id: ToastId) -> Option<(Epoch, Duration)> {
            self.lifetimes
                .borrow()
                .iter()
                .rev()
                .find(|(i, _, _)| *i == id)
                .map(|(_, e, d)| (*e, *d))
        }

        fn last_grace(&self, id: ToastId) -> Option<Epoch> {
            self.graces
                .borrow()
                .iter()
                .rev()
                .find(|(i, _)| *i == id)
                .map(|(_, e)| *e)
        }
    }

    impl Timers for ManualTimers {
        fn lifetime(
            &self,
            id: ToastId,
            epoch: Epoch,
            _armed_at: Instant,
            duration: Duration,
        ) -> TimerHandle {
            self.lifetimes.borrow_mut().push((id, epoch, duration));
            TimerHandle::inert()
        }

        fn grace(&self, id: ToastId, epoch: Epoch) -> TimerHandle {
            self.graces.borrow_mut().push((id, epoch));
            TimerHandle::inert()
        }
    }

    fn store(capacity: usize) -> Store {
        Store::new(
            MaxNotifications::new(capacity),
            Durations::default(),
            Journal::default(),
        )
    }

    fn push(store: &mut Store, spec: ToastSpec, timers: &ManualTimers) -> ToastId {
        let toast = spec.build(store.durations());
        let id = toast.id();
        store.insert(toast, timers);
        id
    }

    fn ids(store: &Store) -> Vec<ToastId> {
        store.snapshot().iter().map(|v| v.id()).collect()
    }

    #[test]
    fn new_store_is_empty() {
        let store = store(5);
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert_eq!(store.running_timers(), 0);
    }

    #[test]
    fn insert_puts_newest_first() {
        let timers = ManualTimers::default();
        let mut store = store(5);
        let a = push(&mut store, ToastSpec::info("a"), &timers);
        let b = push(&mut store, ToastSpec::info("b"), &timers);
        assert_eq!(ids(&store), vec![b, a]);
    }

    #[test]
    fn insert_over_capacity_evicts_oldest() {
        let timers = ManualTimers::default();
        let mut store = store(3);
        let first = push(&mut store, ToastSpec::info("0"), &timers);
        let rest: Vec<_> = (1..3)
            .map(|i| push(&mut store, ToastSpec::info(i.to_string()), &timers))
            .collect();

        let toast = ToastSpec::info("overflow").build(store.durations());
        let newest = toast.id();
        let evicted = store.insert(toast, &timers);

        assert_eq!(evicted, vec![first]);
        assert_eq!(ids(&store), vec![newest, rest[1], rest[0]]);
        assert!(store
            .journal()
            .history(first)
            .iter()
            .any(|e| e.kind == LifecycleEventKind::Evicted));
    }

    #[test]
    fn capacity_holds_for_any_number_of_inserts() {
        let timers = ManualTimers::default();
        let mut store = store(4);
        for i in 0..50 {
            push(&mut store, ToastSpec::success(i.to_string()), &timers);
            assert!(store.len() <= 4);
        }
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn exiting_entries_count_toward_capacity() {
        let timers = ManualTimers::default();
        let mut store = store(2);
        let a = push(&mut store, ToastSpec::info("a"), &timers);
        store.dismiss(a, DismissReason::Manual, &timers);
        push(&mut store, ToastSpec::info("b"), &timers);
        push(&mut store, ToastSpec::info("c"), &timers);

        assert_eq!(store.len(), 2);
        assert!(store.get(a).is_none());
    }

    #[test]
    fn insert_arms_lifetime_only_for_finite_durations() {
        let timers = ManualTimers::default();
        let mut store = store(5);
        let info = push(&mut store, ToastSpec::info("x"), &timers);
        let loading = push(&mut store, ToastSpec::loading("y"), &timers);

        assert_eq!(
            timers.last_lifetime(info).map(|(_, d)| d),
            Some(Duration::from_millis(5000))
        );
        assert!(timers.last_lifetime(loading).is_none());
    }

    #[test]
    fn dismiss_moves_to_exiting_and_is_idempotent() {
        let timers = ManualTimers::default();
        let mut store = store(5);
        let id = push(&mut store, ToastSpec::info("x"), &timers);

        assert!(store.dismiss(id, DismissReason::Manual, &timers));
        assert!(!store.dismiss(id, DismissReason::Manual, &timers));
        assert_eq!(store.get(id).map(|v| v.phase()), Some(Phase::Exiting));
        assert_eq!(timers.graces.borrow().len(), 1);
    }

    #[test]
    fn dismiss_unknown_id_is_noop() {
        let timers = ManualTimers::default();
        let mut store = store(5);
        assert!(!store.dismiss(ToastId::new(), DismissReason::Manual, &timers));
        assert!(store.journal().is_empty());
    }

    #[test]
    fn purge_removes_after_dismiss_exactly_once() {
        let timers = ManualTimers::default();
        let mut store = store(5);
        let id = push(&mut store, ToastSpec::info("x"), &timers);
        store.dismiss(id, DismissReason::Manual, &timers);
        let epoch = timers.last_grace(id).expect("grace armed");

        assert!(store.purge(id, epoch));
        assert!(!store.purge(id, epoch));
        assert!(store.is_empty());

        let removals = store
            .journal()
            .history(id)
            .iter()
            .filter(|e| e.kind.is_removal())
            .count();
        assert_eq!(removals, 1);
    }

    #[test]
    fn stale_expiry_is_ignored_after_retime() {
        let timers = ManualTimers::default();
        let mut store = store(5);
        let id = push(&mut store, ToastSpec::info("x"), &timers);
        let (old_epoch, _) = timers.last_lifetime(id).expect("armed");

        assert!(store.update(
            id,
            Transition::Retime(Some(Duration::from_secs(30))),
            &timers
        ));
        let (new_epoch, duration) = timers.last_lifetime(id).expect("re-armed");
        assert_ne!(old_epoch, new_epoch);
        assert_eq!(duration, Duration::from_secs(30));

        assert!(!store.expire(id, old_epoch, DismissReason::Expired, &timers));
        assert_eq!(store.get(id).map(|v| v.phase()), Some(Phase::Active));

        assert!(store.expire(id, new_epoch, DismissReason::Expired, &timers));
        assert_eq!(store.get(id).map(|v| v.phase()), Some(Phase::Exiting));
    }

    #[test]
    fn expiry_after_manual_dismiss_is_ignored() {
        let timers = ManualTimers::default();
        let mut store = store(5);
        let id = push(&mut store, ToastSpec::info("x"), &timers);
        let (epoch, _) = timers.last_lifetime(id).expect("armed");

        store.dismiss(id, DismissReason::Manual, &timers);
        assert!(!store.expire(id, epoch, DismissReason::Expired, &timers));

        let dismissals = store
            .journal()
            .history(id)
            .iter()
            .filter(|e| matches!(e.kind, LifecycleEventKind::Dismissed { .. }))
            .count();
        assert_eq!(dismissals, 1);
    }

    #[test]
    fn retime_to_none_stops_auto_dismiss() {
        let timers = ManualTimers::default();
        let mut store = store(5);
        let id = push(&mut store, ToastSpec::info("x"), &timers);
        let armed = timers.lifetimes.borrow().len();

        store.update(id, Transition::Retime(None), &timers);
        assert_eq!(timers.lifetimes.borrow().len(), armed);
        assert_eq!(store.remaining_fraction(id), None);
        assert_eq!(store.get(id).and_then(|v| v.duration()), None);
    }

    #[test]
    fn content_update_does_not_rearm() {
        let timers = ManualTimers::default();
        let mut store = store(5);
        let id = push(&mut store, ToastSpec::info("x"), &timers);
        let armed = timers.lifetimes.borrow().len();

        assert!(store.update(id, Transition::SetMessage("y".into()), &timers));
        assert_eq!(timers.lifetimes.borrow().len(), armed);
        assert_eq!(store.get(id).map(|v| v.message().to_string()), Some("y".into()));
    }

    #[test]
    fn update_on_exiting_or_missing_is_noop() {
        let timers = ManualTimers::default();
        let mut store = store(5);
        let id = push(&mut store, ToastSpec::info("x"), &timers);
        store.dismiss(id, DismissReason::Manual, &timers);

        assert!(!store.update(id, Transition::SetMessage("late".into()), &timers));
        assert!(!store.update(ToastId::new(), Transition::SetMessage("?".into()), &timers));
        assert_eq!(store.get(id).map(|v| v.message().to_string()), Some("x".into()));
    }

    #[test]
    fn fulfil_arms_success_lifetime() {
        let timers = ManualTimers::default();
        let mut store = store(5);
        let id = push(&mut store, ToastSpec::loading("saving"), &timers);

        assert!(store.update(
            id,
            Transition::Fulfil {
                message: "saved".into()
            },
            &timers
        ));
        let view = store.get(id).expect("still present");
        assert_eq!(view.kind(), Kind::Success);
        assert_eq!(
            timers.last_lifetime(id).map(|(_, d)| d),
            Some(Duration::from_millis(5000))
        );
    }

    #[test]
    fn clear_empties_and_journals_each_entry() {
        let timers = ManualTimers::default();
        let mut store = store(5);
        let ids: Vec<_> = (0..3)
            .map(|i| push(&mut store, ToastSpec::info(i.to_string()), &timers))
            .collect();

        assert!(store.clear());
        assert!(store.is_empty());
        assert!(!store.clear());
        for id in ids {
            assert!(store
                .journal()
                .history(id)
                .iter()
                .any(|e| e.kind == LifecycleEventKind::Cleared));
        }
    }

    #[test]
    fn dismiss_all_skips_exiting() {
        let timers = ManualTimers::default();
        let mut store = store(5);
        let a = push(&mut store, ToastSpec::info("a"), &timers);
        push(&mut store, ToastSpec::info("b"), &timers);
        push(&mut store, ToastSpec::loading("c"), &timers);
        store.dismiss(a, DismissReason::Manual, &timers);

        assert_eq!(store.dismiss_all(DismissReason::Manual, &timers), 2);
        assert!(store.snapshot().iter().all(|v| v.phase() == Phase::Exiting));
    }

    #[test]
    fn take_action_dismisses_when_requested() {
        let timers = ManualTimers::default();
        let mut store = store(5);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let id = push(
            &mut store,
            ToastSpec::info("x").action(Action::new("Undo", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })),
            &timers,
        );

        let (callback, dismissed) = store.take_action(id, &timers).expect("action");
        callback(id);
        assert!(dismissed);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.get(id).map(|v| v.phase()), Some(Phase::Exiting));
        assert!(store.take_action(id, &timers).is_none());
    }

    #[test]
    fn take_action_without_action_is_none() {
        let timers = ManualTimers::default();
        let mut store = store(5);
        let id = push(&mut store, ToastSpec::info("x"), &timers);
        assert!(store.take_action(id, &timers).is_none());
        assert_eq!(store.get(id).map(|v| v.phase()), Some(Phase::Active));
    }
}
