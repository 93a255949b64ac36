//! The permission-check client.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use relcheck::prelude::*;
//!
//! # async fn example() -> Result<(), relcheck::Error> {
//! let client = Client::builder()
//!     .endpoint("https://grpc.example.com:443")
//!     .credentials(PresharedKey::from_env("SPICEDB_TOKEN")?)
//!     .build()?;
//!
//! let outcome = client
//!     .check(
//!         ObjectReference::new("task", "task-001"),
//!         "view",
//!         ObjectReference::new("user", "user-001"),
//!     )
//!     .await;
//!
//! match outcome {
//!     CheckOutcome::Granted => println!("allowed"),
//!     CheckOutcome::Failed(err) => eprintln!("no answer: {err}"),
//!     other => println!("not allowed: {other}"),
//! }
//! # Ok(())
//! # }
//! ```

mod builder;
mod inner;

pub use builder::{
    ClientBuilder, HasCredentials, HasEndpoint, NoCredentials, NoEndpoint, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_TIMEOUT,
};

use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;

use crate::error::AccessDenied;
use crate::transport::{CheckTransport, Transport};
use crate::types::{classify, CheckOutcome, CheckRequest, ObjectReference, SubjectReference};

/// The permission-check client.
///
/// Every check yields exactly one [`CheckOutcome`]; the check methods never
/// return `Err`. A service that cannot be reached shows up as
/// [`CheckOutcome::Failed`], never as a denial.
///
/// ## Thread Safety
///
/// `Client` is `Clone` and thread-safe. Clones share one transport, and any
/// number of checks may be in flight at once.
#[derive(Clone)]
pub struct Client {
    inner: Arc<inner::ClientInner>,
}

impl Client {
    /// Creates a new client builder.
    ///
    /// The builder uses the typestate pattern to ensure the endpoint and
    /// credentials are provided at compile time.
    pub fn builder() -> ClientBuilder<NoEndpoint, NoCredentials> {
        ClientBuilder::new()
    }

    /// Creates a client over an existing transport.
    ///
    /// No client-side deadline is applied; see [`with_timeout`](Self::with_timeout).
    pub fn from_transport(transport: Arc<dyn CheckTransport>) -> Self {
        Self::from_inner(inner::ClientInner {
            endpoint: None,
            transport_kind: None,
            transport,
            timeout: None,
        })
    }

    /// Returns a client sharing this one's transport with a different deadline.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self::from_inner(inner::ClientInner {
            endpoint: self.inner.endpoint.clone(),
            transport_kind: self.inner.transport_kind,
            transport: Arc::clone(&self.inner.transport),
            timeout: Some(timeout),
        })
    }

    /// Asks whether `subject` has `permission` on `resource`.
    ///
    /// ```rust
    /// use std::sync::Arc;
    ///
    /// use relcheck::testing::MockTransport;
    /// use relcheck::{CheckOutcome, Client, ObjectReference};
    ///
    /// # tokio_test::block_on(async {
    /// let client = Client::from_transport(Arc::new(MockTransport::new()));
    /// let outcome = client
    ///     .check(
    ///         ObjectReference::new("task", "task-001"),
    ///         "view",
    ///         ObjectReference::new("user", "user-001"),
    ///     )
    ///     .await;
    /// assert!(matches!(outcome, CheckOutcome::Denied));
    /// # });
    /// ```
    pub async fn check(
        &self,
        resource: ObjectReference,
        permission: impl Into<String>,
        subject: impl Into<SubjectReference>,
    ) -> CheckOutcome {
        self.check_request(CheckRequest::new(resource, permission, subject))
            .await
    }

    /// Runs a prepared check.
    ///
    /// Each call gets its own request ID, recorded on the `check` span and
    /// attached to the error of a failed check.
    pub async fn check_request(&self, request: CheckRequest) -> CheckOutcome {
        self.run(request, new_request_id()).await
    }

    /// Runs independent checks concurrently, returning outcomes in input order.
    pub async fn check_all(
        &self,
        requests: impl IntoIterator<Item = CheckRequest>,
    ) -> Vec<CheckOutcome> {
        futures::future::join_all(
            requests
                .into_iter()
                .map(|request| self.check_request(request)),
        )
        .await
    }

    /// Checks and turns anything but a grant into an error, for `?` guards.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied`] for every outcome other than
    /// [`CheckOutcome::Granted`].
    pub async fn require(&self, request: &CheckRequest) -> Result<(), AccessDenied> {
        let request_id = new_request_id();
        self.run(request.clone(), request_id.clone())
            .await
            .require(request)
            .map_err(|denied| match denied.request_id() {
                Some(_) => denied,
                None => denied.with_request_id(request_id),
            })
    }

    /// Returns the configured endpoint, if built from configuration.
    pub fn endpoint(&self) -> Option<&str> {
        self.inner.endpoint.as_ref().map(url::Url::as_str)
    }

    /// Returns the built-in transport in use, if any.
    pub fn transport(&self) -> Option<Transport> {
        self.inner.transport_kind
    }

    /// Returns the client-side deadline, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.inner.timeout
    }

    pub(crate) fn from_inner(inner: inner::ClientInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    async fn run(&self, request: CheckRequest, request_id: String) -> CheckOutcome {
        let span = tracing::info_span!(
            "check",
            resource = %request.resource(),
            permission = request.permission(),
            subject = %request.subject(),
            request_id = %request_id,
        );

        async move {
            let reply = self.inner.dispatch(request).await.map_err(|error| {
                if error.request_id().is_some() {
                    error
                } else {
                    error.with_request_id(request_id)
                }
            });
            let outcome = classify(reply);
            inner::log_outcome(&outcome);
            outcome
        }
        .instrument(span)
        .await
    }
}

fn new_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint())
            .field("transport", &self.inner.transport_kind)
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use crate::{Error, ErrorKind, OutcomeKind, Permissionship};

    fn request() -> CheckRequest {
        CheckRequest::parse("task:task-001", "view", "user:user-001").unwrap()
    }

    fn client_with(mock: &MockTransport) -> Client {
        Client::from_transport(Arc::new(mock.clone()))
    }

    #[tokio::test]
    async fn test_check_passes_request_through() {
        let mock = MockTransport::new().on(request(), Permissionship::HasPermission);
        let client = client_with(&mock);

        let outcome = client
            .check(
                ObjectReference::new("task", "task-001"),
                "view",
                ObjectReference::new("user", "user-001"),
            )
            .await;

        assert!(outcome.is_granted());
        assert_eq!(mock.calls(), vec![request()]);
    }

    #[tokio::test]
    async fn test_failed_check_carries_request_id() {
        let mock = MockTransport::new();
        mock.fail_next(Error::unavailable("connection refused"));

        let outcome = client_with(&mock).check_request(request()).await;
        let error = outcome.error().unwrap();
        assert_eq!(error.kind(), ErrorKind::Unavailable);
        assert_eq!(error.request_id().unwrap().len(), 36);
    }

    #[tokio::test]
    async fn test_existing_request_id_is_kept() {
        let mock = MockTransport::new();
        mock.fail_next(Error::internal("boom").with_request_id("server-side-id"));

        let outcome = client_with(&mock).check_request(request()).await;
        assert_eq!(outcome.error().unwrap().request_id(), Some("server-side-id"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_becomes_failed() {
        let mock = MockTransport::grant_all().with_delay(Duration::from_secs(60));
        let client = client_with(&mock).with_timeout(Duration::from_secs(1));

        let outcome = client.check_request(request()).await;
        match outcome {
            CheckOutcome::Failed(error) => assert_eq!(error.kind(), ErrorKind::Timeout),
            other => panic!("expected a timeout, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_check_all_keeps_order() {
        let alice = CheckRequest::parse("task:task-001", "view", "user:alice").unwrap();
        let bob = CheckRequest::parse("task:task-001", "view", "user:bob").unwrap();
        let mock = MockTransport::new()
            .on(alice.clone(), Permissionship::HasPermission)
            .on(bob.clone(), Permissionship::Unspecified);

        let kinds: Vec<_> = client_with(&mock)
            .check_all([alice, bob])
            .await
            .iter()
            .map(CheckOutcome::kind)
            .collect();

        assert_eq!(kinds, vec![OutcomeKind::Granted, OutcomeKind::Indeterminate]);
    }

    #[tokio::test]
    async fn test_require() {
        let mock = MockTransport::new().on(request(), Permissionship::HasPermission);
        let client = client_with(&mock);
        assert!(client.require(&request()).await.is_ok());

        let other = CheckRequest::parse("task:task-002", "view", "user:user-001").unwrap();
        let denied = client.require(&other).await.unwrap_err();
        assert!(denied.is_explicit_denial());
        assert!(denied.request_id().is_some());
    }

    #[test]
    fn test_debug() {
        let client = Client::from_transport(Arc::new(MockTransport::new()));
        let debug = format!("{:?}", client);
        assert!(debug.contains("Client"));
        assert!(debug.contains("endpoint: None"));
    }
}
