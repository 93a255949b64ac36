//! AccessDenied error type for checks that did not grant.

use std::error::Error as StdError;
use std::fmt;

use super::Error;
use crate::types::CheckRequest;

/// Why a `require()` guard refused to proceed.
///
/// Only [`DenialReason::Denied`] is an answer of "no" from the service. The
/// other reasons are "not granted" without being a denial, and audit logs
/// should keep them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenialReason {
    /// The service answered `NO_PERMISSION`.
    Denied,
    /// The service answered `UNSPECIFIED`.
    Indeterminate,
    /// The service answered with a code this crate does not know.
    Unrecognized(i32),
    /// No answer was obtained.
    Failed,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::Denied => write!(f, "no permission"),
            DenialReason::Indeterminate => write!(f, "permission could not be determined"),
            DenialReason::Unrecognized(code) => write!(f, "unrecognized permissionship {}", code),
            DenialReason::Failed => write!(f, "permission check failed"),
        }
    }
}

/// Error returned by [`CheckOutcome::require`](crate::CheckOutcome::require)
/// for every outcome other than `Granted`.
///
/// ## Example
///
/// ```rust
/// use relcheck::{CheckOutcome, CheckRequest, DenialReason, ObjectReference};
///
/// let request = CheckRequest::new(
///     ObjectReference::new("task", "task-001"),
///     "view",
///     ObjectReference::new("user", "user-001"),
/// );
///
/// let denied = CheckOutcome::Denied.require(&request).unwrap_err();
/// assert_eq!(denied.reason(), DenialReason::Denied);
/// assert_eq!(denied.resource(), "task:task-001");
/// ```
#[derive(Debug)]
pub struct AccessDenied {
    resource: String,
    permission: String,
    subject: String,
    reason: DenialReason,
    request_id: Option<String>,
    source: Option<Error>,
}

impl AccessDenied {
    /// Creates a new `AccessDenied` for the given request and reason.
    pub fn new(request: &CheckRequest, reason: DenialReason) -> Self {
        Self {
            resource: request.resource().to_string(),
            permission: request.permission().to_owned(),
            subject: request.subject().to_string(),
            reason,
            request_id: None,
            source: None,
        }
    }

    /// Creates an `AccessDenied` for a check that failed to dispatch.
    ///
    /// The dispatch error is kept as the [`source`](StdError::source).
    pub fn failed(request: &CheckRequest, error: Error) -> Self {
        let request_id = error.request_id().map(str::to_owned);
        Self {
            request_id,
            source: Some(error),
            ..Self::new(request, DenialReason::Failed)
        }
    }

    /// Returns the resource that was checked, in `type:id` form.
    #[inline]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Returns the permission that was checked.
    #[inline]
    pub fn permission(&self) -> &str {
        &self.permission
    }

    /// Returns the subject that was checked, in `type:id` or `type:id#relation` form.
    #[inline]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns why the check did not grant.
    #[inline]
    pub fn reason(&self) -> DenialReason {
        self.reason
    }

    /// Returns `true` only for an explicit `NO_PERMISSION` answer.
    #[inline]
    pub fn is_explicit_denial(&self) -> bool {
        self.reason == DenialReason::Denied
    }

    /// Returns the request ID, if available.
    #[inline]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Returns the dispatch error for [`DenialReason::Failed`].
    pub fn error(&self) -> Option<&Error> {
        self.source.as_ref()
    }

    /// Sets the request ID.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Returns a formatted string suitable for logging.
    pub fn to_log_string(&self) -> String {
        let mut parts = vec![
            format!("resource={}", self.resource),
            format!("permission={}", self.permission),
            format!("subject={}", self.subject),
            format!("reason={}", self.reason),
        ];

        if let Some(ref request_id) = self.request_id {
            parts.push(format!("request_id={}", request_id));
        }

        format!("access_denied: {}", parts.join(" "))
    }
}

impl fmt::Display for AccessDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "access denied: {} cannot {} {} ({})",
            self.subject, self.permission, self.resource, self.reason
        )
    }
}

impl StdError for AccessDenied {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn StdError + 'static))
    }
}
