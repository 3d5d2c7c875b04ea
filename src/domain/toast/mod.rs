// SPDX-License-Identifier: MPL-2.0
//! Toast domain types.
//!
//! This module provides pure domain types for the notification lifecycle:
//! - [`MaxNotifications`]: Capacity of the notification store
//! - [`TickInterval`]: Sampling interval of lifetime timers
//! - [`GracePeriod`]: Delay between dismissal and purge

mod newtypes;

pub use newtypes::{
    grace_period_bounds, max_notifications_bounds, tick_interval_bounds, GracePeriod,
    MaxNotifications, TickInterval,
};
