// SPDX-License-Identifier: MPL-2.0
//! Time-based auto-dismissal.
//!
//! The scheduler owns two kinds of tokio tasks:
//!
//! - a **lifetime** task per active toast with a finite duration, sampling
//!   elapsed time every tick and dismissing the toast once its remaining-life
//!   fraction reaches zero;
//! - a **grace** task per dismissal, purging the toast once the exit grace
//!   period has elapsed.
//!
//! Tasks never touch the store directly. They report back through a
//! [`TimerSink`] together with the [`Epoch`] they were armed with, and the
//! store ignores reports whose epoch is no longer current. Together with
//! [`TimerHandle`] aborting its task on drop, a cancelled timer can never
//! dismiss or purge anything.

use std::sync::Weak;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::notification::ToastId;
use crate::domain::toast::{GracePeriod, TickInterval};
use crate::journal::DismissReason;

/// Arming generation of a toast's timers.
///
/// Every time a timer is armed for a toast the store hands out a new epoch;
/// reports carrying an older epoch are stale and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Epoch(u64);

impl Epoch {
    /// Returns the following epoch.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Cancellation handle for a scheduled task.
///
/// Cancelling is idempotent. Dropping the handle cancels the task.
#[derive(Debug, Default)]
pub struct TimerHandle {
    task: Option<AbortHandle>,
}

impl TimerHandle {
    pub(crate) fn spawned(task: AbortHandle) -> Self {
        Self { task: Some(task) }
    }

    /// A handle that owns no task.
    #[must_use]
    pub fn inert() -> Self {
        Self { task: None }
    }

    /// Stops the task if it is still scheduled.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Returns true while the task has neither finished nor been cancelled.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Arms timers on behalf of the store.
pub trait Timers {
    /// Starts sampling the lifetime of `id`, counted from `armed_at`.
    fn lifetime(&self, id: ToastId, epoch: Epoch, armed_at: Instant, duration: Duration)
        -> TimerHandle;

    /// Starts the exit grace period of `id`.
    fn grace(&self, id: ToastId, epoch: Epoch) -> TimerHandle;
}

/// Receives timer reports.
pub trait TimerSink: Send + Sync + 'static {
    /// The lifetime of `id` is over (or could not be measured).
    fn expire(&self, id: ToastId, epoch: Epoch, reason: DismissReason);

    /// The grace period of `id` is over.
    fn purge(&self, id: ToastId, epoch: Epoch);
}

/// One lifetime measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    /// Still alive, with this fraction of its life left.
    Remaining(f32),
    /// Life is over.
    Expired,
    /// The clock went backwards or produced an unusable value.
    Anomaly,
}

/// Computes `max(0, 1 - elapsed / duration)`.
///
/// A zero duration has no life left.
#[must_use]
pub fn remaining_fraction(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 0.0;
    }
    let fraction = 1.0 - elapsed.as_secs_f64() / duration.as_secs_f64();
    fraction.max(0.0) as f32
}

/// Samples the lifetime of a toast armed at `armed_at`.
#[must_use]
pub fn sample(armed_at: Instant, now: Instant, duration: Duration) -> Sample {
    let Some(elapsed) = now.checked_duration_since(armed_at) else {
        return Sample::Anomaly;
    };
    let fraction = remaining_fraction(elapsed, duration);
    if !fraction.is_finite() {
        Sample::Anomaly
    } else if fraction <= 0.0 {
        Sample::Expired
    } else {
        Sample::Remaining(fraction)
    }
}

/// Spawns lifetime and grace tasks on a tokio runtime.
pub struct Scheduler<S> {
    runtime: Handle,
    tick: TickInterval,
    grace: GracePeriod,
    sink: Weak<S>,
}

impl<S: TimerSink> Scheduler<S> {
    /// Creates a scheduler reporting to `sink`.
    ///
    /// Tasks only hold the weak reference, so they wind down once the sink
    /// is dropped.
    pub fn new(runtime: Handle, tick: TickInterval, grace: GracePeriod, sink: Weak<S>) -> Self {
        Self {
            runtime,
            tick,
            grace,
            sink,
        }
    }

    /// Returns the sampling interval.
    #[must_use]
    pub fn tick(&self) -> TickInterval {
        self.tick
    }

    /// Returns the exit grace period.
    #[must_use]
    pub fn grace_period(&self) -> GracePeriod {
        self.grace
    }
}

impl<S: TimerSink> Timers for Scheduler<S> {
    fn lifetime(
        &self,
        id: ToastId,
        epoch: Epoch,
        armed_at: Instant,
        duration: Duration,
    ) -> TimerHandle {
        let sink = Weak::clone(&self.sink);
        let tick = self.tick.as_duration();
        let task = self.runtime.spawn(async move {
            let mut interval = time::interval(tick);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let reason = loop {
                interval.tick().await;
                match sample(armed_at, Instant::now(), duration) {
                    Sample::Remaining(_) => continue,
                    Sample::Expired => break DismissReason::Expired,
                    Sample::Anomaly => {
                        tracing::warn!(%id, "lifetime clock anomaly, dismissing");
                        break DismissReason::ClockAnomaly;
                    }
                }
            };
            if let Some(sink) = sink.upgrade() {
                sink.expire(id, epoch, reason);
            }
        });
        TimerHandle::spawned(task.abort_handle())
    }

    fn grace(&self, id: ToastId, epoch: Epoch) -> TimerHandle {
        let sink = Weak::clone(&self.sink);
        let grace = self.grace.as_duration();
        let task = self.runtime.spawn(async move {
            time::sleep(grace).await;
            if let Some(sink) = sink.upgrade() {
                sink.purge(id, epoch);
            }
        });
        TimerHandle::spawned(task.abort_handle())
    }
}
