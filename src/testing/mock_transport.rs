//! MockTransport for testing code that performs checks.

use std::borrow::Cow;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::transport::{CheckTransport, StatsRecorder, TransportStats};
use crate::types::{CheckRequest, Permissionship};
use crate::{Error, ErrorKind};

/// An in-memory [`CheckTransport`] with scripted replies.
///
/// Replies are looked up by exact request. Requests without a rule get the
/// default reply, which is [`Permissionship::NoPermission`] unless changed.
/// Queued failures take precedence over rules, one per check.
///
/// ## Example
///
/// ```rust
/// use relcheck::testing::MockTransport;
/// use relcheck::{CheckRequest, Error, Permissionship};
///
/// let request = CheckRequest::parse("task:task-001", "view", "user:user-001").unwrap();
///
/// let mock = MockTransport::new().on(request.clone(), Permissionship::HasPermission);
/// mock.fail_next(Error::unavailable("connection refused"));
///
/// assert_eq!(mock.request_count(), 0);
/// ```
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
    stats: Arc<StatsRecorder>,
}

#[derive(Default)]
struct MockState {
    rules: HashMap<CheckRequest, Permissionship>,
    default_reply: Option<Permissionship>,
    queued_failures: VecDeque<Error>,
    persistent_failure: Option<(ErrorKind, Cow<'static, str>)>,
    delay: Option<Duration>,
    calls: Vec<CheckRequest>,
}

impl MockTransport {
    /// Creates a mock that answers `NO_PERMISSION` to everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock that answers `HAS_PERMISSION` to everything.
    pub fn grant_all() -> Self {
        Self::new().with_default(Permissionship::HasPermission)
    }

    /// Sets the reply for requests without a rule.
    #[must_use]
    pub fn with_default(self, reply: Permissionship) -> Self {
        self.state.lock().default_reply = Some(reply);
        self
    }

    /// Adds a rule: `request` is answered with `reply`.
    #[must_use]
    pub fn on(self, request: CheckRequest, reply: Permissionship) -> Self {
        self.state.lock().rules.insert(request, reply);
        self
    }

    /// Delays every reply, for exercising timeouts.
    #[must_use]
    pub fn with_delay(self, delay: Duration) -> Self {
        self.state.lock().delay = Some(delay);
        self
    }

    /// Fails the next check with `error`. Calls queue up in order.
    pub fn fail_next(&self, error: Error) {
        self.state.lock().queued_failures.push_back(error);
    }

    /// Fails every check with an error of `kind` until [`reset`](Self::reset).
    pub fn fail_always(&self, kind: ErrorKind, message: impl Into<Cow<'static, str>>) {
        self.state.lock().persistent_failure = Some((kind, message.into()));
    }

    /// Returns the requests received so far, in order.
    pub fn calls(&self) -> Vec<CheckRequest> {
        self.state.lock().calls.clone()
    }

    /// Returns the number of requests received.
    pub fn request_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Returns request counters, as the network transports do.
    pub fn stats(&self) -> TransportStats {
        self.stats.snapshot()
    }

    /// Returns the rules that no check has matched yet.
    pub fn unused_rules(&self) -> Vec<CheckRequest> {
        let state = self.state.lock();
        state
            .rules
            .keys()
            .filter(|rule| !state.calls.contains(rule))
            .cloned()
            .collect()
    }

    /// Clears recorded calls and scripted failures. Rules are kept.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.calls.clear();
        state.queued_failures.clear();
        state.persistent_failure = None;
    }

    fn reply_for(&self, request: CheckRequest) -> (Option<Duration>, Result<Permissionship, Error>) {
        let mut state = self.state.lock();
        let reply = if let Some(error) = state.queued_failures.pop_front() {
            Err(error)
        } else if let Some((kind, ref message)) = state.persistent_failure {
            Err(Error::new(kind, message.clone()))
        } else {
            Ok(state
                .rules
                .get(&request)
                .copied()
                .or(state.default_reply)
                .unwrap_or(Permissionship::NoPermission))
        };
        state.calls.push(request);
        (state.delay, reply)
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MockTransport")
            .field("rules", &state.rules.len())
            .field("calls", &state.calls.len())
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl CheckTransport for MockTransport {
    async fn dispatch_check(&self, request: CheckRequest) -> Result<Permissionship, Error> {
        let (delay, reply) = self.reply_for(request);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.stats.record(&reply);
        reply
    }
}
