// SPDX-License-Identifier: MPL-2.0
//! Toast newtypes.
//!
//! This module provides type-safe wrappers for the lifecycle tunables,
//! ensuring they are always within valid ranges.

use std::time::Duration;

// =============================================================================
// Max Notifications Bounds
// =============================================================================

/// Store capacity bounds (1 to 50 notifications).
pub mod max_notifications_bounds {
    /// Minimum number of notifications held at once.
    pub const MIN: usize = 1;
    /// Maximum number of notifications held at once.
    pub const MAX: usize = 50;
    /// Default number of notifications held at once.
    pub const DEFAULT: usize = 5;
}

// =============================================================================
// MaxNotifications
// =============================================================================

/// Maximum number of notifications the store holds in `active` or `exiting`
/// phase, guaranteed to be within valid range (1–50).
///
/// # Example
///
/// ```
/// use toast_lifecycle::domain::toast::MaxNotifications;
///
/// assert_eq!(MaxNotifications::new(3).value(), 3);
/// // Zero would make every insertion evict itself
/// assert_eq!(MaxNotifications::new(0).value(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxNotifications(usize);

impl MaxNotifications {
    /// Creates a new capacity, clamping to valid range.
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(max_notifications_bounds::MIN, max_notifications_bounds::MAX))
    }

    /// Returns the value as usize.
    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for MaxNotifications {
    fn default() -> Self {
        Self(max_notifications_bounds::DEFAULT)
    }
}

// =============================================================================
// Tick Interval Bounds
// =============================================================================

/// Sampling interval bounds in milliseconds (10ms to 1000ms).
pub mod tick_interval_bounds {
    /// Minimum sampling interval in milliseconds.
    pub const MIN_MS: u64 = 10;
    /// Maximum sampling interval in milliseconds.
    pub const MAX_MS: u64 = 1000;
    /// Default sampling interval in milliseconds.
    pub const DEFAULT_MS: u64 = 50;
}

// =============================================================================
// TickInterval
// =============================================================================

/// Interval at which lifetime timers sample elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickInterval(u64);

impl TickInterval {
    /// Creates a new tick interval from milliseconds, clamping to valid range.
    #[must_use]
    pub fn from_millis(ms: u64) -> Self {
        Self(ms.clamp(tick_interval_bounds::MIN_MS, tick_interval_bounds::MAX_MS))
    }

    /// Returns the interval in milliseconds.
    #[must_use]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// Returns the interval as a Duration.
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for TickInterval {
    fn default() -> Self {
        Self(tick_interval_bounds::DEFAULT_MS)
    }
}

// =============================================================================
// Grace Period Bounds
// =============================================================================

/// Grace period bounds in milliseconds (0ms to 5000ms).
pub mod grace_period_bounds {
    /// Minimum grace period in milliseconds (purge on the next scheduler turn).
    pub const MIN_MS: u64 = 0;
    /// Maximum grace period in milliseconds.
    pub const MAX_MS: u64 = 5000;
    /// Default grace period in milliseconds.
    pub const DEFAULT_MS: u64 = 200;
}

// =============================================================================
// GracePeriod
// =============================================================================

/// Delay between a notification entering `exiting` and its purge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GracePeriod(u64);

impl GracePeriod {
    /// Creates a new grace period from milliseconds, clamping to valid range.
    #[must_use]
    pub fn from_millis(ms: u64) -> Self {
        Self(ms.clamp(grace_period_bounds::MIN_MS, grace_period_bounds::MAX_MS))
    }

    /// Returns the grace period in milliseconds.
    #[must_use]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// Returns the grace period as a Duration.
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for GracePeriod {
    fn default() -> Self {
        Self(grace_period_bounds::DEFAULT_MS)
    }
}

// =============================================================================
// Tests
// =============================================================================
