// SPDX-License-Identifier: MPL-2.0
//! Toast notification lifecycle management.
//!
//! This module provides a non-intrusive notification system following
//! toast/snackbar UX patterns. It owns the lifecycle only; rendering is left
//! to the host, which subscribes to the ordered toast list and sends
//! [`Message`]s back in response to user gestures.
//!
//! # Components
//!
//! - [`notification`] - Core `Toast` entity, `Kind`, creation requests and transitions
//! - [`store`] - `Store`, the bounded, ordered collection of toasts
//! - [`scheduler`] - Lifetime and grace timers with cancellation handles
//! - [`promise`] - Binding a toast to the outcome of a future
//! - [`toaster`] - `Toaster`, the handle tying the pieces together
//!
//! # Usage
//!
//! ```
//! use toast_lifecycle::notifications::{Message, Toaster, ToasterConfig, ToastSpec};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> toast_lifecycle::error::Result<()> {
//! let toaster = Toaster::new(ToasterConfig::default())?;
//! toaster.on_change(|toasts| println!("{} toast(s) visible", toasts.len()));
//!
//! let id = toaster.show(ToastSpec::success("Project saved").title("Projects"));
//!
//! // The renderer forwards a click on the close button
//! toaster.handle_message(&Message::Dismiss(id));
//! # Ok(())
//! # }
//! ```
//!
//! # Lifecycle
//!
//! - Default lifetimes: 5s for info/success/warning, 8s for errors, none while pending
//! - At most 5 toasts at once; the oldest is evicted without an exit phase
//! - A dismissed toast stays in `Exiting` for a 200ms grace period before it is purged

pub mod notification;
pub mod promise;
pub mod scheduler;
pub mod store;
pub mod toaster;

pub use notification::{
    Action, Durations, Kind, Lifetime, Phase, Toast, ToastId, ToastSpec, ToastView, Transition,
};
pub use promise::{Feedback, PromiseMessages};
pub use scheduler::TimerHandle;
pub use store::Store;
pub use toaster::{ListenerId, Message, Toaster, ToasterConfig};
