// SPDX-License-Identifier: MPL-2.0
//! The `Toaster` handle.
//!
//! A `Toaster` owns one [`Store`], the [`Scheduler`] arming its timers and
//! the set of observers watching it. Handles are cheap to clone; every clone
//! talks to the same store. Every operation runs synchronously under the
//! store lock, so observers never see a half-applied mutation. Snapshots are
//! stamped with a generation under that lock and published in generation
//! order, so observers never go back to an older list after a newer one, even
//! when timers fire on other worker threads.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::watch;

use super::notification::{Durations, ToastId, ToastSpec, ToastView, Transition};
use super::scheduler::{Epoch, Scheduler, TimerSink};
use super::store::Store;
use crate::domain::journal::JournalCapacity;
use crate::domain::toast::{GracePeriod, MaxNotifications, TickInterval};
use crate::error::{Error, Result};
use crate::journal::{DismissReason, Journal, LifecycleEvent};

/// Validated runtime configuration of a [`Toaster`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToasterConfig {
    /// Maximum number of toasts held at once.
    pub capacity: MaxNotifications,
    /// Sampling interval of lifetime timers.
    pub tick: TickInterval,
    /// Delay between dismissal and purge.
    pub grace: GracePeriod,
    /// Default lifetimes per kind.
    pub durations: Durations,
    /// Number of lifecycle events kept in the journal.
    pub journal_capacity: JournalCapacity,
}

/// Messages a renderer sends back in response to user gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Dismiss a specific toast by ID.
    Dismiss(ToastId),
    /// Run the action attached to a toast.
    InvokeAction(ToastId),
}

/// Identifies a registered change listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&[ToastView]) + Send + Sync>;

struct Observers {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
    watch: watch::Sender<Vec<ToastView>>,
    /// Last generation handed out. Only advanced under the store lock.
    generation: AtomicU64,
    delivery: Mutex<Delivery>,
}

/// Snapshots waiting to be published, in generation order.
#[derive(Default)]
struct Delivery {
    /// Newest generation queued or published.
    latest: u64,
    queue: VecDeque<Vec<ToastView>>,
    /// Set while a thread is draining the queue.
    draining: bool,
}

/// Releases the draining flag if a listener panics mid-delivery.
struct Drain<'a> {
    observers: &'a Observers,
    finished: bool,
}

impl Drop for Drain<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let mut delivery = self.observers.delivery();
            delivery.draining = false;
            delivery.queue.clear();
        }
    }
}

impl Observers {
    fn new() -> Self {
        let (watch, _) = watch::channel(Vec::new());
        Self {
            next_id: AtomicU64::new(0),
            listeners: Mutex::new(Vec::new()),
            watch,
            generation: AtomicU64::new(0),
            delivery: Mutex::new(Delivery::default()),
        }
    }

    fn listeners(&self) -> MutexGuard<'_, Vec<(ListenerId, Listener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn delivery(&self) -> MutexGuard<'_, Delivery> {
        self.delivery.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stamps a snapshot. Must be called with the store lock held so that
    /// generations follow the order in which mutations were applied.
    fn stamp(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Publishes `snapshot` unless a newer generation got there first.
    ///
    /// Only one thread delivers at a time; the others queue their snapshot
    /// and return. A listener that mutates the toaster queues too, and sees
    /// its change delivered once the current round is over.
    fn notify(&self, generation: u64, snapshot: Vec<ToastView>) {
        {
            let mut delivery = self.delivery();
            if generation <= delivery.latest {
                return;
            }
            delivery.latest = generation;
            delivery.queue.push_back(snapshot);
            if delivery.draining {
                return;
            }
            delivery.draining = true;
        }

        let mut drain = Drain {
            observers: self,
            finished: false,
        };
        loop {
            let snapshot = {
                let mut delivery = self.delivery();
                match delivery.queue.pop_front() {
                    Some(snapshot) => snapshot,
                    None => {
                        delivery.draining = false;
                        drain.finished = true;
                        return;
                    }
                }
            };
            let listeners: Vec<Listener> = self
                .listeners()
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect();
            for listener in &listeners {
                listener(&snapshot);
            }
            self.watch.send_replace(snapshot);
        }
    }
}

struct Shared {
    store: Mutex<Store>,
    scheduler: Scheduler<Shared>,
    observers: Observers,
}

impl Shared {
    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` under the store lock and, if it reports a visible change,
    /// notifies observers once the lock is released.
    fn mutate<R>(&self, f: impl FnOnce(&mut Store, &Scheduler<Shared>) -> (R, bool)) -> R {
        let (result, published) = {
            let mut store = self.store();
            let (result, changed) = f(&mut store, &self.scheduler);
            let published = changed.then(|| (self.observers.stamp(), store.snapshot()));
            (result, published)
        };
        if let Some((generation, snapshot)) = published {
            self.observers.notify(generation, snapshot);
        }
        result
    }
}

impl TimerSink for Shared {
    fn expire(&self, id: ToastId, epoch: Epoch, reason: DismissReason) {
        self.mutate(|store, timers| {
            let dismissed = store.expire(id, epoch, reason, timers);
            (dismissed, dismissed)
        });
    }

    fn purge(&self, id: ToastId, epoch: Epoch) {
        self.mutate(|store, _| {
            let purged = store.purge(id, epoch);
            (purged, purged)
        });
    }
}

/// Handle to a notification store and its timers.
///
/// # Example
///
/// ```
/// use toast_lifecycle::notifications::{Toaster, ToasterConfig, ToastSpec};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> toast_lifecycle::error::Result<()> {
/// let toaster = Toaster::new(ToasterConfig::default())?;
///
/// let saved = toaster.success("Image saved");
/// toaster.show(ToastSpec::warning("Low disk space").title("Storage"));
///
/// assert_eq!(toaster.len(), 2);
/// toaster.dismiss(saved);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Toaster {
    shared: Arc<Shared>,
}

impl Toaster {
    /// Creates a toaster whose timers run on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRuntime`] when called outside a tokio runtime.
    pub fn new(config: ToasterConfig) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        Ok(Self::with_runtime(config, runtime))
    }

    /// Creates a toaster whose timers run on `runtime`.
    #[must_use]
    pub fn with_runtime(config: ToasterConfig, runtime: Handle) -> Self {
        let shared = Arc::new_cyclic(|weak| Shared {
            store: Mutex::new(Store::new(
                config.capacity,
                config.durations,
                Journal::new(config.journal_capacity),
            )),
            scheduler: Scheduler::new(runtime, config.tick, config.grace, weak.clone()),
            observers: Observers::new(),
        });
        Self { shared }
    }

    /// Creates a toast and returns its ID.
    pub fn show(&self, spec: ToastSpec) -> ToastId {
        self.shared.mutate(|store, timers| {
            let toast = spec.build(store.durations());
            let id = toast.id();
            store.insert(toast, timers);
            (id, true)
        })
    }

    /// Creates an info toast with the default lifetime.
    pub fn info(&self, message: impl Into<String>) -> ToastId {
        self.show(ToastSpec::info(message))
    }

    /// Creates a success toast with the default lifetime.
    pub fn success(&self, message: impl Into<String>) -> ToastId {
        self.show(ToastSpec::success(message))
    }

    /// Creates a warning toast with the default lifetime.
    pub fn warning(&self, message: impl Into<String>) -> ToastId {
        self.show(ToastSpec::warning(message))
    }

    /// Creates an error toast with the error lifetime.
    pub fn error(&self, message: impl Into<String>) -> ToastId {
        self.show(ToastSpec::error(message))
    }

    /// Creates a loading toast that stays until updated or dismissed.
    pub fn loading(&self, message: impl Into<String>) -> ToastId {
        self.show(ToastSpec::loading(message))
    }

    /// Applies a transition to an active toast.
    ///
    /// Returns `false` if the toast is gone, exiting, or the transition
    /// does not apply.
    pub fn update(&self, id: ToastId, transition: Transition) -> bool {
        self.shared.mutate(|store, timers| {
            let applied = store.update(id, transition, timers);
            (applied, applied)
        })
    }

    /// Dismisses a toast. Idempotent.
    pub fn dismiss(&self, id: ToastId) -> bool {
        self.dismiss_with(id, DismissReason::Manual)
    }

    pub(crate) fn dismiss_with(&self, id: ToastId, reason: DismissReason) -> bool {
        self.shared.mutate(|store, timers| {
            let dismissed = store.dismiss(id, reason, timers);
            (dismissed, dismissed)
        })
    }

    /// Dismisses every active toast, each with its own grace period.
    pub fn dismiss_all(&self) -> usize {
        self.shared.mutate(|store, timers| {
            let dismissed = store.dismiss_all(DismissReason::Manual, timers);
            (dismissed, dismissed > 0)
        })
    }

    /// Removes every toast immediately and cancels all timers.
    pub fn clear(&self) -> bool {
        self.shared.mutate(|store, _| {
            let cleared = store.clear();
            (cleared, cleared)
        })
    }

    /// Runs the action attached to an active toast.
    ///
    /// The callback runs after the store lock is released, so it may call
    /// back into the toaster. Returns `false` if there was nothing to run.
    pub fn invoke_action(&self, id: ToastId) -> bool {
        let taken = self.shared.mutate(|store, timers| {
            let taken = store.take_action(id, timers);
            let dismissed = taken.as_ref().is_some_and(|(_, dismissed)| *dismissed);
            (taken, dismissed)
        });
        match taken {
            Some((callback, _)) => {
                callback(id);
                true
            }
            None => false,
        }
    }

    /// Handles a renderer message.
    pub fn handle_message(&self, message: &Message) {
        match message {
            Message::Dismiss(id) => {
                self.dismiss(*id);
            }
            Message::InvokeAction(id) => {
                self.invoke_action(*id);
            }
        }
    }

    /// Returns the current toasts, newest first.
    #[must_use]
    pub fn toasts(&self) -> Vec<ToastView> {
        self.shared.store().snapshot()
    }

    /// Returns one toast, if still held.
    #[must_use]
    pub fn get(&self, id: ToastId) -> Option<ToastView> {
        self.shared.store().get(id)
    }

    /// Returns the number of toasts held (active and exiting).
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.store().len()
    }

    /// Returns true if no toast is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.store().is_empty()
    }

    /// Returns the remaining-life fraction of a toast with a running
    /// lifetime timer, for progress indicators.
    #[must_use]
    pub fn remaining_fraction(&self, id: ToastId) -> Option<f32> {
        self.shared.store().remaining_fraction(id)
    }

    /// Returns the number of lifetime and grace timers still scheduled.
    #[must_use]
    pub fn running_timers(&self) -> usize {
        self.shared.store().running_timers()
    }

    /// Returns the recorded lifecycle events, oldest first.
    #[must_use]
    pub fn journal(&self) -> Vec<LifecycleEvent> {
        self.shared.store().journal().iter().cloned().collect()
    }

    /// Returns the recorded lifecycle events of one toast.
    #[must_use]
    pub fn history(&self, id: ToastId) -> Vec<LifecycleEvent> {
        self.shared.store().journal().history(id)
    }

    /// Registers a listener called with the ordered toast list after every
    /// visible change.
    pub fn on_change(
        &self,
        listener: impl Fn(&[ToastView]) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.shared.observers.next_id.fetch_add(1, Ordering::Relaxed));
        let listener: Listener = Arc::new(listener);
        self.shared.observers.listeners().push((id, listener));
        id
    }

    /// Unregisters a listener. Returns `false` if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.shared.observers.listeners();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() < before
    }

    /// Returns a receiver that always holds the latest toast list.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Vec<ToastView>> {
        self.shared.observers.watch.subscribe()
    }
}

impl std::fmt::Debug for Toaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toaster")
            .field("len", &self.len())
            .field("tick", &self.shared.scheduler.tick())
            .field("grace", &self.shared.scheduler.grace_period())
            .finish_non_exhaustive()
    }
}
