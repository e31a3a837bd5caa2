//! Cooperative cancellation for preload futures.
//!
//! A [`Cancelable`] checks its flag before every poll of the inner future and
//! once more when the inner future completes; canceling wakes it so the check
//! happens promptly. After cancellation it resolves to
//! [`AssistError::Canceled`] and discards whatever the inner future produced,
//! so a canceled preload never hands data to its continuation.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use futures_util::task::AtomicWaker;
use pin_project_lite::pin_project;

use crate::{AssistError, Result};

/// A deferred preload step returned by
/// [`LanguageProvider::start`](crate::LanguageProvider::start).
pub type PreloadTask = Cancelable<BoxFuture<'static, Result<()>>>;

pin_project! {
    /// Future wrapper that can be canceled from a [`CancelHandle`].
    #[must_use = "futures do nothing unless polled"]
    pub struct Cancelable<F> {
        #[pin]
        inner: F,
        state: Arc<CancelState>,
    }
}

#[derive(Debug, Default)]
struct CancelState {
    canceled: AtomicBool,
    waker: AtomicWaker,
}

/// Cancels the [`Cancelable`] it was created with. Cloneable.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    state: Arc<CancelState>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.state.canceled.store(true, Ordering::Release);
        self.state.waker.wake();
    }

    pub fn is_canceled(&self) -> bool {
        self.state.canceled.load(Ordering::Acquire)
    }
}

/// Wrap `future` so it can be canceled through the returned handle.
pub fn cancelable<F, T>(future: F) -> (Cancelable<F>, CancelHandle)
where
    F: Future<Output = Result<T>>,
{
    let state = Arc::new(CancelState::default());
    let handle = CancelHandle {
        state: state.clone(),
    };
    (
        Cancelable {
            inner: future,
            state,
        },
        handle,
    )
}

impl<F> std::fmt::Debug for Cancelable<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cancelable")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<F> Cancelable<F> {
    /// A handle for this future, equivalent to the one returned by [`cancelable`].
    pub fn handle(&self) -> CancelHandle {
        CancelHandle {
            state: self.state.clone(),
        }
    }
}

impl<F, T> Future for Cancelable<F>
where
    F: Future<Output = Result<T>>,
{
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        this.state.waker.register(cx.waker());
        if this.state.canceled.load(Ordering::Acquire) {
            return Poll::Ready(Err(AssistError::Canceled));
        }
        match this.inner.poll(cx) {
            Poll::Ready(_) if this.state.canceled.load(Ordering::Acquire) => {
                Poll::Ready(Err(AssistError::Canceled))
            }
            other => other,
        }
    }
}
