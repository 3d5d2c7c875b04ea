// SPDX-License-Identifier: MPL-2.0
//! Journal newtypes.

// =============================================================================
// Journal Capacity Bounds
// =============================================================================

/// Journal capacity bounds (16 to 10000 events).
pub mod journal_capacity_bounds {
    /// Minimum journal capacity.
    pub const MIN: usize = 16;
    /// Maximum journal capacity.
    pub const MAX: usize = 10000;
    /// Default journal capacity.
    pub const DEFAULT: usize = 256;
}

// =============================================================================
// JournalCapacity
// =============================================================================

/// Capacity for the lifecycle event journal.
///
/// This newtype enforces validity at the type level, ensuring the value
/// is always within the valid range (16–10000 events).
///
/// # Example
///
/// ```
/// use toast_lifecycle::domain::journal::JournalCapacity;
///
/// assert_eq!(JournalCapacity::new(512).value(), 512);
/// assert_eq!(JournalCapacity::new(50_000).value(), 10000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalCapacity(usize);

impl JournalCapacity {
    /// Creates a new journal capacity, clamping to valid range.
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(journal_capacity_bounds::MIN, journal_capacity_bounds::MAX))
    }

    /// Returns the value as usize.
    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for JournalCapacity {
    fn default() -> Self {
        Self(journal_capacity_bounds::DEFAULT)
    }
}
