//! Bridging callback-style transports into a single awaited reply.
//!
//! Some client libraries report the end of a call by invoking a callback
//! with `(error, response)`, and nothing stops them from invoking it twice.
//! [`pending_check`] turns such a callback into a one-shot future:
//!
//! - the first [`CheckCallback::complete`] resolves the check, every later
//!   call is ignored;
//! - when both an error and a value are supplied the error wins;
//! - if every copy of the callback is dropped without completing, the check
//!   resolves as [`ErrorKind::Cancelled`](crate::ErrorKind::Cancelled).
//!
//! ```rust
//! use relcheck::transport::pending_check;
//! use relcheck::Permissionship;
//!
//! # tokio_test::block_on(async {
//! let (callback, pending) = pending_check();
//! assert!(callback.complete(None, Some(Permissionship::HasPermission)));
//! assert!(!callback.complete(None, Some(Permissionship::NoPermission)));
//!
//! assert_eq!(pending.await.unwrap(), Permissionship::HasPermission);
//! # });
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use parking_lot::Mutex;
use tokio::sync::oneshot;

use super::CheckTransport;
use crate::types::{CheckRequest, Permissionship};
use crate::Error;

type Reply = Result<Permissionship, Error>;

/// Creates a linked callback and pending check.
pub fn pending_check() -> (CheckCallback, PendingCheck) {
    let (sender, receiver) = oneshot::channel();
    (
        CheckCallback {
            sender: Arc::new(Mutex::new(Some(sender))),
        },
        PendingCheck { receiver },
    )
}

/// The completion side of a pending check.
///
/// Cloning is allowed so it can be moved into whatever closure the
/// transport wants; all clones share one completion slot.
#[derive(Clone)]
pub struct CheckCallback {
    sender: Arc<Mutex<Option<oneshot::Sender<Reply>>>>,
}

impl CheckCallback {
    /// Completes the check.
    ///
    /// Returns `true` if this call resolved the check and `false` if it had
    /// already been resolved, in which case the arguments are dropped.
    pub fn complete(&self, error: Option<Error>, response: Option<Permissionship>) -> bool {
        let Some(sender) = self.sender.lock().take() else {
            tracing::warn!(
                has_error = error.is_some(),
                has_response = response.is_some(),
                "ignoring repeated completion of a permission check"
            );
            return false;
        };

        let reply = match (error, response) {
            (Some(error), Some(discarded)) => {
                tracing::warn!(
                    %error,
                    %discarded,
                    "transport signalled both an error and a response; keeping the error"
                );
                Err(error)
            },
            (Some(error), None) => Err(error),
            (None, Some(permissionship)) => Ok(permissionship),
            (None, None) => Err(Error::protocol(
                "transport completed the check without a response or an error",
            )),
        };

        // The receiver may be gone if the caller stopped waiting; the check
        // still counts as resolved.
        let _ = sender.send(reply);
        true
    }

    /// Resolves the check with a response.
    pub fn succeed(&self, permissionship: Permissionship) -> bool {
        self.complete(None, Some(permissionship))
    }

    /// Resolves the check with an error.
    pub fn fail(&self, error: Error) -> bool {
        self.complete(Some(error), None)
    }

    /// Returns `true` once the check has been resolved.
    pub fn is_completed(&self) -> bool {
        self.sender.lock().is_none()
    }
}

impl std::fmt::Debug for CheckCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckCallback")
            .field("completed", &self.is_completed())
            .finish()
    }
}

/// The awaiting side of a pending check. Resolves exactly once.
#[derive(Debug)]
pub struct PendingCheck {
    receiver: oneshot::Receiver<Reply>,
}

impl Future for PendingCheck {
    type Output = Reply;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver).poll(cx).map(|received| {
            received.unwrap_or_else(|_| {
                Err(Error::new(
                    crate::ErrorKind::Cancelled,
                    "transport dropped the check callback without completing it",
                ))
            })
        })
    }
}

/// A transport that reports completion through a [`CheckCallback`].
pub trait CallbackTransport: Send + Sync {
    /// Starts a check. The transport must eventually call
    /// [`CheckCallback::complete`] (or drop the callback).
    fn start_check(&self, request: CheckRequest, callback: CheckCallback);
}

/// Adapts a [`CallbackTransport`] into a [`CheckTransport`].
#[derive(Debug, Clone)]
pub struct CallbackAdapter<T> {
    inner: T,
}

impl<T> CallbackAdapter<T> {
    /// Wraps a callback-style transport.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Returns the wrapped transport.
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait::async_trait]
impl<T: CallbackTransport> CheckTransport for CallbackAdapter<T> {
    async fn dispatch_check(&self, request: CheckRequest) -> Result<Permissionship, Error> {
        let (callback, pending) = pending_check();
        self.inner.start_check(request, callback);
        pending.await
    }
}
