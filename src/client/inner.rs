//! Internal client implementation.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::transport::{CheckTransport, Transport};
use crate::types::{CheckOutcome, CheckRequest, Permissionship};
use crate::Error;

pub(crate) struct ClientInner {
    /// The service endpoint, when built from configuration.
    pub endpoint: Option<Url>,

    /// Which built-in transport is in use, if any.
    pub transport_kind: Option<Transport>,

    /// The transport every check goes through.
    pub transport: Arc<dyn CheckTransport>,

    /// Client-side deadline for one check.
    pub timeout: Option<Duration>,
}

impl ClientInner {
    /// Dispatches one check, bounded by the client-side deadline.
    pub(crate) async fn dispatch(&self, request: CheckRequest) -> Result<Permissionship, Error> {
        let reply = self.transport.dispatch_check(request);
        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, reply).await.unwrap_or_else(|_| {
                Err(Error::timeout(format!(
                    "no reply within {}ms",
                    timeout.as_millis()
                )))
            }),
            None => reply.await,
        }
    }
}

/// Logs an outcome at the level it deserves.
pub(crate) fn log_outcome(outcome: &CheckOutcome) {
    match outcome {
        CheckOutcome::Granted => tracing::debug!(outcome = "granted", "permission granted"),
        CheckOutcome::Denied => tracing::debug!(outcome = "denied", "permission denied"),
        CheckOutcome::Indeterminate => {
            tracing::warn!(outcome = "indeterminate", "service could not determine permission")
        },
        CheckOutcome::Unrecognized(code) => tracing::error!(
            outcome = "unrecognized",
            permissionship = code,
            "service answered with an unrecognized permissionship"
        ),
        CheckOutcome::Failed(error) => tracing::error!(
            outcome = "failed",
            error.kind = %error.kind(),
            error = %error,
            "permission check failed"
        ),
    }
}
