// SPDX-License-Identifier: MPL-2.0
//! Binding a toast to an asynchronous operation.
//!
//! [`Toaster::promise`] shows a loading toast right away and turns it into a
//! success or error toast once the bound future settles. The future's output
//! is handed back untouched, so the call composes with `?` and `.await` like
//! the bare future would.

use std::fmt;
use std::future::Future;

use super::notification::{ToastId, ToastSpec, Transition};
use super::toaster::Toaster;
use crate::journal::DismissReason;

/// Message shown once a bound future settles.
pub enum Feedback<T> {
    /// Fixed text.
    Text(String),
    /// Text computed from the settled value.
    Render(Box<dyn FnOnce(&T) -> String + Send>),
}

impl<T> Feedback<T> {
    /// Resolves the message for `value`.
    pub fn resolve(self, value: &T) -> String {
        match self {
            Feedback::Text(text) => text,
            Feedback::Render(render) => render(value),
        }
    }
}

impl<T> fmt::Debug for Feedback<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Feedback::Render(_) => f.write_str("Render(..)"),
        }
    }
}

/// Messages for the three phases of a bound future.
///
/// When no message is configured for the outcome that actually happens,
/// the loading toast is dismissed instead.
///
/// # Example
///
/// ```
/// use toast_lifecycle::notifications::PromiseMessages;
///
/// let messages = PromiseMessages::<u64, std::io::Error>::new("Uploading…")
///     .success_with(|bytes| format!("Uploaded {bytes} bytes"))
///     .error_with(|err| format!("Upload failed: {err}"));
/// # let _ = messages;
/// ```
#[derive(Debug)]
pub struct PromiseMessages<T, E> {
    pending: String,
    title: Option<String>,
    success: Option<Feedback<T>>,
    error: Option<Feedback<E>>,
}

impl<T, E> PromiseMessages<T, E> {
    /// Creates messages with the text shown while the future is pending.
    pub fn new(pending: impl Into<String>) -> Self {
        Self {
            pending: pending.into(),
            title: None,
            success: None,
            error: None,
        }
    }

    /// Sets a title kept across all phases.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Shows fixed text on success.
    #[must_use]
    pub fn success(mut self, text: impl Into<String>) -> Self {
        self.success = Some(Feedback::Text(text.into()));
        self
    }

    /// Computes the success text from the resolved value.
    #[must_use]
    pub fn success_with(mut self, render: impl FnOnce(&T) -> String + Send + 'static) -> Self {
        self.success = Some(Feedback::Render(Box::new(render)));
        self
    }

    /// Shows fixed text on failure.
    #[must_use]
    pub fn error(mut self, text: impl Into<String>) -> Self {
        self.error = Some(Feedback::Text(text.into()));
        self
    }

    /// Computes the failure text from the error.
    #[must_use]
    pub fn error_with(mut self, render: impl FnOnce(&E) -> String + Send + 'static) -> Self {
        self.error = Some(Feedback::Render(Box::new(render)));
        self
    }
}

/// Dismisses the loading toast if the bound future is dropped unsettled.
struct Unsettled {
    toaster: Toaster,
    id: ToastId,
    armed: bool,
}

impl Unsettled {
    /// Disarms the guard and hands back the toaster to apply the outcome.
    fn settle(&mut self) -> &Toaster {
        self.armed = false;
        &self.toaster
    }
}

impl Drop for Unsettled {
    fn drop(&mut self) {
        if self.armed {
            tracing::debug!(id = %self.id, "bound future dropped before settling");
            self.toaster.dismiss_with(self.id, DismissReason::Abandoned);
        }
    }
}

impl Toaster {
    /// Binds a toast to `future`.
    ///
    /// The loading toast is created before this method returns. The
    /// returned future resolves to exactly what `future` resolved to. If the
    /// toast was dismissed or evicted in the meantime, settling leaves the
    /// store untouched. Dropping the returned future before it settles
    /// dismisses the loading toast.
    ///
    /// # Example
    ///
    /// ```
    /// use toast_lifecycle::notifications::{Kind, PromiseMessages, Toaster, ToasterConfig};
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let toaster = Toaster::new(ToasterConfig::default()).unwrap();
    /// let answer = toaster
    ///     .promise(
    ///         async { Ok::<_, std::io::Error>(42) },
    ///         PromiseMessages::new("Thinking…").success_with(|v: &i32| format!("got {v}")),
    ///     )
    ///     .await
    ///     .unwrap();
    ///
    /// assert_eq!(answer, 42);
    /// assert_eq!(toaster.toasts()[0].kind(), Kind::Success);
    /// # }
    /// ```
    pub fn promise<F, T, E>(
        &self,
        future: F,
        messages: PromiseMessages<T, E>,
    ) -> impl Future<Output = Result<T, E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        let PromiseMessages {
            pending,
            title,
            success,
            error,
        } = messages;

        let mut spec = ToastSpec::loading(pending);
        if let Some(title) = title {
            spec = spec.title(title);
        }
        let id = self.show(spec);
        let mut guard = Unsettled {
            toaster: self.clone(),
            id,
            armed: true,
        };

        async move {
            let outcome = future.await;
            let toaster = guard.settle();
            match outcome {
                Ok(value) => {
                    match success {
                        Some(feedback) => {
                            let message = feedback.resolve(&value);
                            toaster.update(id, Transition::Fulfil { message });
                        }
                        None => {
                            toaster.dismiss_with(id, DismissReason::Settled);
                        }
                    }
                    Ok(value)
                }
                Err(err) => {
                    match error {
                        Some(feedback) => {
                            let message = feedback.resolve(&err);
                            toaster.update(id, Transition::Reject { message });
                        }
                        None => {
                            toaster.dismiss_with(id, DismissReason::Settled);
                        }
                    }
                    Err(err)
                }
            }
        }
    }
}
