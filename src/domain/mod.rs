// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Value objects with ZERO external dependencies.
//!
//! This module contains pure domain types and their bounds. It has no
//! dependencies on external crates (except `std`) to ensure testability.
//!
//! # Modules
//!
//! - [`journal`]: Journal types ([`JournalCapacity`](journal::JournalCapacity))
//! - [`toast`]: Lifecycle tunables ([`MaxNotifications`](toast::MaxNotifications),
//!   [`TickInterval`](toast::TickInterval), [`GracePeriod`](toast::GracePeriod))

pub mod journal;
pub mod toast;
