// SPDX-License-Identifier: MPL-2.0
//! Lifecycle event types.
//!
//! Every visible state change of the store is described by one of these
//! events, in the order the store applied them.

use tokio::time::Instant;

use crate::notifications::{Kind, ToastId};

/// Why a notification left the `active` phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    /// Dismissed by the caller.
    Manual,
    /// Its lifetime timer ran out.
    Expired,
    /// Its action was invoked with `dismiss_on_invoke`.
    ActionInvoked,
    /// A bound future settled without feedback for that outcome.
    Settled,
    /// A bound future was dropped before it settled.
    Abandoned,
    /// The lifetime timer saw an inconsistent clock and gave up.
    ClockAnomaly,
}

/// A single lifecycle transition.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEventKind {
    /// A notification was inserted at the head of the store.
    Created {
        /// Kind at creation time.
        kind: Kind,
    },
    /// A transition was applied to an active notification.
    Updated {
        /// Name of the applied transition.
        transition: &'static str,
    },
    /// The notification was dropped to make room for a newer one.
    Evicted,
    /// The notification entered the `exiting` phase.
    Dismissed {
        /// What triggered the dismissal.
        reason: DismissReason,
    },
    /// The notification was removed after its grace period.
    Purged,
    /// The notification was removed by a bulk clear.
    Cleared,
}

impl LifecycleEventKind {
    /// Returns true if this event takes the notification out of the store.
    #[must_use]
    pub fn is_removal(&self) -> bool {
        matches!(self, Self::Evicted | Self::Purged | Self::Cleared)
    }
}

/// A lifecycle event with the notification it concerns.
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleEvent {
    /// When the store applied the transition (monotonic).
    pub at: Instant,
    /// The notification concerned.
    pub id: ToastId,
    /// What happened.
    pub kind: LifecycleEventKind,
}

impl LifecycleEvent {
    /// Creates an event stamped with the current instant.
    #[must_use]
    pub fn new(id: ToastId, kind: LifecycleEventKind) -> Self {
        Self {
            at: Instant::now(),
            id,
            kind,
        }
    }
}
