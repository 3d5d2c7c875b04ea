// SPDX-License-Identifier: MPL-2.0
//! `toast_lifecycle` manages the lifecycle of transient toast notifications.
//!
//! It keeps a bounded, ordered list of toasts, dismisses them when their
//! lifetime runs out, and can bind a toast to the outcome of a future. The
//! rendering layer stays outside the crate: it subscribes to the list and
//! reports user gestures back.

#![doc(html_root_url = "https://docs.rs/toast_lifecycle/0.1.0")]

pub mod config;
pub mod domain;
pub mod error;
pub mod journal;
pub mod notifications;
