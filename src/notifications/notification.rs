// SPDX-License-Identifier: MPL-2.0
//! Core notification data structures.
//!
//! This module defines the `Toast` entity, its `Kind`, the creation request
//! (`ToastSpec`) and the tagged `Transition`s that may be applied to it.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::defaults;

/// Unique identifier for a notification.
///
/// Identifiers come from a process-wide counter and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(u64);

impl ToastId {
    /// Creates a new unique notification ID.
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ToastId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "toast-{}", self.0)
    }
}

/// Kind determines the default lifetime and how the renderer presents a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Kind {
    /// Neutral information.
    #[default]
    Info,
    /// Operation completed successfully.
    Success,
    /// Warning that doesn't block operation.
    Warning,
    /// Error requiring attention (longer default lifetime).
    Error,
    /// Operation still running; never auto-dismisses.
    Pending,
}

impl Kind {
    /// Returns a stable lowercase name, used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Info => "info",
            Kind::Success => "success",
            Kind::Warning => "warning",
            Kind::Error => "error",
            Kind::Pending => "pending",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default lifetimes per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Durations {
    /// Lifetime of info, success and warning toasts.
    pub default: Duration,
    /// Lifetime of error toasts.
    pub error: Duration,
}

impl Durations {
    /// Returns the default lifetime for `kind`, or `None` if it never expires.
    #[must_use]
    pub fn for_kind(&self, kind: Kind) -> Option<Duration> {
        match kind {
            Kind::Info | Kind::Success | Kind::Warning => Some(self.default),
            Kind::Error => Some(self.error),
            Kind::Pending => None,
        }
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            default: Duration::from_millis(defaults::DEFAULT_DURATION_MS),
            error: Duration::from_millis(defaults::ERROR_DURATION_MS),
        }
    }
}

/// How long a new toast should live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifetime {
    /// Use the store's default for the toast's kind.
    #[default]
    KindDefault,
    /// Auto-dismiss after this long.
    After(Duration),
    /// Never auto-dismiss.
    Persistent,
}

impl Lifetime {
    /// Resolves the lifetime against the per-kind defaults.
    #[must_use]
    pub fn resolve(self, kind: Kind, durations: &Durations) -> Option<Duration> {
        match self {
            Lifetime::KindDefault => durations.for_kind(kind),
            Lifetime::After(duration) => Some(duration),
            Lifetime::Persistent => None,
        }
    }
}

pub(crate) type ActionCallback = Arc<dyn Fn(ToastId) + Send + Sync>;

/// A single button-like action attached to a toast.
#[derive(Clone)]
pub struct Action {
    label: String,
    on_invoke: ActionCallback,
    dismiss_on_invoke: bool,
}

impl Action {
    /// Creates an action that dismisses its toast when invoked.
    pub fn new(
        label: impl Into<String>,
        on_invoke: impl Fn(ToastId) + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            on_invoke: Arc::new(on_invoke),
            dismiss_on_invoke: true,
        }
    }

    /// Keeps the toast on screen after the action runs.
    #[must_use]
    pub fn keep_open(mut self) -> Self {
        self.dismiss_on_invoke = false;
        self
    }

    /// Returns the label shown to the user.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns whether invoking the action dismisses the toast.
    #[must_use]
    pub fn dismiss_on_invoke(&self) -> bool {
        self.dismiss_on_invoke
    }

    pub(crate) fn callback(&self) -> ActionCallback {
        Arc::clone(&self.on_invoke)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("label", &self.label)
            .field("dismiss_on_invoke", &self.dismiss_on_invoke)
            .finish_non_exhaustive()
    }
}

/// A request to create a toast.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use toast_lifecycle::notifications::{Kind, ToastSpec};
///
/// let spec = ToastSpec::warning("Disk almost full")
///     .title("Storage")
///     .duration(Duration::from_secs(10));
/// assert_eq!(spec.kind(), Kind::Warning);
/// ```
#[derive(Debug, Clone)]
pub struct ToastSpec {
    kind: Kind,
    message: String,
    title: Option<String>,
    action: Option<Action>,
    lifetime: Lifetime,
}

impl ToastSpec {
    /// Creates a request with the given kind and message.
    pub fn new(kind: Kind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            title: None,
            action: None,
            lifetime: Lifetime::KindDefault,
        }
    }

    /// Creates an info request.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Kind::Info, message)
    }

    /// Creates a success request.
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Kind::Success, message)
    }

    /// Creates a warning request.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Kind::Warning, message)
    }

    /// Creates an error request.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Kind::Error, message)
    }

    /// Creates a loading request; it never auto-dismisses unless given a duration.
    pub fn loading(message: impl Into<String>) -> Self {
        Self::new(Kind::Pending, message)
    }

    /// Sets the secondary title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Attaches an action, replacing any previous one.
    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Sets a custom auto-dismiss duration, overriding the kind default.
    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.lifetime = Lifetime::After(duration);
        self
    }

    /// Disables auto-dismiss.
    #[must_use]
    pub fn persistent(mut self) -> Self {
        self.lifetime = Lifetime::Persistent;
        self
    }

    /// Returns the requested kind.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the requested lifetime.
    #[must_use]
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// Builds the toast, resolving the lifetime against `durations`.
    pub(crate) fn build(self, durations: &Durations) -> Toast {
        Toast {
            id: ToastId::new(),
            kind: self.kind,
            duration: self.lifetime.resolve(self.kind, durations),
            message: self.message,
            title: self.title,
            action: self.action,
            created_at: Instant::now(),
        }
    }
}

/// A named, invariant-preserving change to an existing toast.
#[derive(Debug, Clone)]
pub enum Transition {
    /// Replaces the message.
    SetMessage(String),
    /// Replaces or removes the title.
    SetTitle(Option<String>),
    /// Replaces or removes the action.
    SetAction(Option<Action>),
    /// Cancels the lifetime timer and restarts it with a new duration
    /// (`None` stops auto-dismiss).
    Retime(Option<Duration>),
    /// Pending → success, with the default success lifetime.
    Fulfil {
        /// Message shown once fulfilled.
        message: String,
    },
    /// Pending → error, with the default error lifetime.
    Reject {
        /// Message shown once rejected.
        message: String,
    },
}

impl Transition {
    /// Returns the transition name, used in logs and the journal.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Transition::SetMessage(_) => "set_message",
            Transition::SetTitle(_) => "set_title",
            Transition::SetAction(_) => "set_action",
            Transition::Retime(_) => "retime",
            Transition::Fulfil { .. } => "fulfil",
            Transition::Reject { .. } => "reject",
        }
    }
}

/// A notification held by the store.
#[derive(Debug, Clone)]
pub struct Toast {
    id: ToastId,
    kind: Kind,
    message: String,
    title: Option<String>,
    duration: Option<Duration>,
    action: Option<Action>,
    created_at: Instant,
}

/// What a transition did to a toast's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Applied {
    /// The transition does not apply to this toast.
    Rejected,
    /// Content changed, the timer keeps running.
    Kept,
    /// The lifetime changed and the timer must restart.
    Retimed(Option<Duration>),
}

impl Toast {
    /// Returns the toast's unique ID.
    #[must_use]
    pub fn id(&self) -> ToastId {
        self.id
    }

    /// Returns the kind.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the title, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the lifetime, or `None` if the toast never auto-dismisses.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Returns the attached action, if any.
    #[must_use]
    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    /// Returns when this toast was created.
    #[must_use]
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Applies a transition in place.
    pub(crate) fn apply(&mut self, transition: Transition, durations: &Durations) -> Applied {
        match transition {
            Transition::SetMessage(message) => {
                self.message = message;
                Applied::Kept
            }
            Transition::SetTitle(title) => {
                self.title = title;
                Applied::Kept
            }
            Transition::SetAction(action) => {
                self.action = action;
                Applied::Kept
            }
            Transition::Retime(duration) => {
                self.duration = duration;
                Applied::Retimed(duration)
            }
            Transition::Fulfil { message } => self.settle(Kind::Success, message, durations),
            Transition::Reject { message } => self.settle(Kind::Error, message, durations),
        }
    }

    fn settle(&mut self, kind: Kind, message: String, durations: &Durations) -> Applied {
        if self.kind != Kind::Pending {
            return Applied::Rejected;
        }
        self.kind = kind;
        self.message = message;
        self.duration = durations.for_kind(kind);
        Applied::Retimed(self.duration)
    }
}

/// Lifecycle phase of a toast still held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Visible and, if it has a duration, counting down.
    Active,
    /// Dismissed; purged once the grace period elapses.
    Exiting,
}

/// Snapshot of a toast as handed to observers.
#[derive(Debug, Clone)]
pub struct ToastView {
    toast: Toast,
    phase: Phase,
    remaining: Option<f32>,
}

impl ToastView {
    pub(crate) fn new(toast: Toast, phase: Phase, remaining: Option<f32>) -> Self {
        Self {
            toast,
            phase,
            remaining,
        }
    }

    /// Returns the lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the remaining-life fraction in `[0, 1]` at snapshot time,
    /// or `None` if no lifetime timer is running.
    #[must_use]
    pub fn remaining_fraction(&self) -> Option<f32> {
        self.remaining
    }
}

impl Deref for ToastView {
    type Target = Toast;

    fn deref(&self) -> &Toast {
        &self.toast
    }
}
