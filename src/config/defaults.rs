// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Capacity**: How many toasts the store holds at once
//! - **Timing**: Sampling interval and exit grace period
//! - **Lifetimes**: Default auto-dismiss durations per kind
//! - **Journal**: Lifecycle event buffer size

// ==========================================================================
// Capacity Defaults
// ==========================================================================

/// Default number of toasts held at once.
pub const DEFAULT_MAX_NOTIFICATIONS: usize = 5;

/// Minimum number of toasts held at once.
pub const MIN_MAX_NOTIFICATIONS: usize = 1;

/// Maximum number of toasts held at once.
pub const MAX_MAX_NOTIFICATIONS: usize = 50;

// ==========================================================================
// Timing Defaults
// ==========================================================================

/// Default lifetime sampling interval (in milliseconds).
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 50;

/// Minimum lifetime sampling interval (in milliseconds).
pub const MIN_TICK_INTERVAL_MS: u64 = 10;

/// Maximum lifetime sampling interval (in milliseconds).
pub const MAX_TICK_INTERVAL_MS: u64 = 1000;

/// Default delay between dismissal and purge (in milliseconds).
pub const DEFAULT_GRACE_PERIOD_MS: u64 = 200;

/// Maximum delay between dismissal and purge (in milliseconds).
pub const MAX_GRACE_PERIOD_MS: u64 = 5000;

// ==========================================================================
// Lifetime Defaults
// ==========================================================================

/// Default lifetime of info, success and warning toasts (in milliseconds).
pub const DEFAULT_DURATION_MS: u64 = 5000;

/// Default lifetime of error toasts (in milliseconds).
pub const ERROR_DURATION_MS: u64 = 8000;

// ==========================================================================
// Journal Defaults
// ==========================================================================

/// Default number of lifecycle events kept.
pub const DEFAULT_JOURNAL_CAPACITY: usize = 256;

/// Minimum number of lifecycle events kept.
pub const MIN_JOURNAL_CAPACITY: usize = 16;

/// Maximum number of lifecycle events kept.
pub const MAX_JOURNAL_CAPACITY: usize = 10000;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_MAX_NOTIFICATIONS > 0);
    assert!(DEFAULT_MAX_NOTIFICATIONS >= MIN_MAX_NOTIFICATIONS);
    assert!(DEFAULT_MAX_NOTIFICATIONS <= MAX_MAX_NOTIFICATIONS);

    assert!(MIN_TICK_INTERVAL_MS > 0);
    assert!(DEFAULT_TICK_INTERVAL_MS >= MIN_TICK_INTERVAL_MS);
    assert!(DEFAULT_TICK_INTERVAL_MS <= MAX_TICK_INTERVAL_MS);
    assert!(DEFAULT_GRACE_PERIOD_MS <= MAX_GRACE_PERIOD_MS);

    assert!(ERROR_DURATION_MS >= DEFAULT_DURATION_MS);

    assert!(DEFAULT_JOURNAL_CAPACITY >= MIN_JOURNAL_CAPACITY);
    assert!(DEFAULT_JOURNAL_CAPACITY <= MAX_JOURNAL_CAPACITY);
};
