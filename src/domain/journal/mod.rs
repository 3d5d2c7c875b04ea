// SPDX-License-Identifier: MPL-2.0
//! Lifecycle journal domain types.
//!
//! - [`JournalCapacity`]: Capacity of the lifecycle event buffer

mod newtypes;

pub use newtypes::{journal_capacity_bounds, JournalCapacity};
