//! Error kind enumeration for categorizing dispatch failures.

/// Categorization of relcheck errors.
///
/// This enum provides a stable interface for matching on error types. Every
/// kind here means "no answer was obtained"; none of them is a denial.
///
/// ## Retriable vs Non-Retriable
///
/// | ErrorKind         | Retriable | Action                     |
/// |-------------------|-----------|----------------------------|
/// | `Unavailable`     | Yes       | Retry with backoff         |
/// | `Timeout`         | Yes       | Retry with backoff         |
/// | `RateLimited`     | Yes       | Back off                   |
/// | `Connection`      | Yes       | Retry with backoff         |
/// | `Unauthorized`    | No        | Fix the preshared key      |
/// | `Forbidden`       | No        | Fix the key's scope        |
/// | `NotFound`        | No        | Definition doesn't exist   |
/// | `SchemaViolation` | No        | Fix schema/query           |
/// | `InvalidArgument` | No        | Fix input                  |
///
/// relcheck never retries on its own; `is_retriable()` is a hint for callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Authentication failed (invalid or missing preshared key).
    ///
    /// HTTP: 401 Unauthorized
    /// gRPC: UNAUTHENTICATED
    #[error("unauthorized")]
    Unauthorized,

    /// The credentials are valid but may not call the check API.
    ///
    /// This is about the API caller, not the subject being checked. A subject
    /// lacking a permission is [`CheckOutcome::Denied`], never an error.
    ///
    /// HTTP: 403 Forbidden
    /// gRPC: PERMISSION_DENIED
    ///
    /// [`CheckOutcome::Denied`]: crate::CheckOutcome::Denied
    #[error("forbidden")]
    Forbidden,

    /// The service could not find something the request referenced.
    ///
    /// HTTP: 404 Not Found
    /// gRPC: NOT_FOUND
    #[error("not found")]
    NotFound,

    /// Invalid request argument or payload.
    ///
    /// HTTP: 400 Bad Request
    /// gRPC: INVALID_ARGUMENT
    #[error("invalid argument")]
    InvalidArgument,

    /// Request violates the schema (unknown object type or permission).
    ///
    /// gRPC: FAILED_PRECONDITION
    #[error("schema violation")]
    SchemaViolation,

    /// Rate limit exceeded.
    ///
    /// HTTP: 429 Too Many Requests
    /// gRPC: RESOURCE_EXHAUSTED
    #[error("rate limited")]
    RateLimited,

    /// Service temporarily unavailable.
    ///
    /// HTTP: 503 Service Unavailable
    /// gRPC: UNAVAILABLE
    #[error("service unavailable")]
    Unavailable,

    /// Request timed out, either at the service or at the client's own limit.
    ///
    /// HTTP: 504 Gateway Timeout
    /// gRPC: DEADLINE_EXCEEDED
    #[error("timeout")]
    Timeout,

    /// Internal server error.
    ///
    /// HTTP: 500 Internal Server Error
    /// gRPC: INTERNAL
    #[error("internal error")]
    Internal,

    /// The pending check was abandoned before a reply arrived.
    ///
    /// gRPC: CANCELLED
    #[error("cancelled")]
    Cancelled,

    /// Connection error (DNS, TLS handshake, connection refused).
    #[error("connection error")]
    Connection,

    /// Protocol error (unexpected status, inconsistent reply).
    #[error("protocol error")]
    Protocol,

    /// Configuration error (invalid URL, unusable TLS material).
    #[error("configuration error")]
    Configuration,

    /// Unknown or unexpected error.
    #[error("unknown error")]
    Unknown,

    /// Transport layer error that fits no more specific category.
    #[error("transport error")]
    Transport,

    /// The reply could not be parsed.
    #[error("invalid response")]
    InvalidResponse,
}

impl ErrorKind {
    /// Returns `true` if this error kind is generally safe to retry.
    ///
    /// # Example
    ///
    /// ```rust
    /// use relcheck::ErrorKind;
    ///
    /// assert!(ErrorKind::Unavailable.is_retriable());
    /// assert!(!ErrorKind::Unauthorized.is_retriable());
    /// ```
    #[inline]
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            ErrorKind::Unavailable
                | ErrorKind::Timeout
                | ErrorKind::RateLimited
                | ErrorKind::Connection
        )
    }

    /// Creates an `ErrorKind` from an HTTP status code.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => ErrorKind::InvalidArgument,
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            412 => ErrorKind::SchemaViolation,
            429 => ErrorKind::RateLimited,
            499 => ErrorKind::Cancelled,
            500 => ErrorKind::Internal,
            502 => ErrorKind::Protocol,
            503 => ErrorKind::Unavailable,
            504 => ErrorKind::Timeout,
            _ if (400..500).contains(&status) => ErrorKind::InvalidArgument,
            _ if status >= 500 => ErrorKind::Internal,
            _ => ErrorKind::Unknown,
        }
    }

    /// Creates an `ErrorKind` from a gRPC status code.
    #[cfg(feature = "grpc")]
    pub fn from_grpc_code(code: tonic::Code) -> Self {
        use tonic::Code;
        match code {
            Code::Ok | Code::Unknown => ErrorKind::Unknown,
            Code::Cancelled => ErrorKind::Cancelled,
            Code::InvalidArgument | Code::OutOfRange => ErrorKind::InvalidArgument,
            Code::DeadlineExceeded => ErrorKind::Timeout,
            Code::NotFound => ErrorKind::NotFound,
            Code::AlreadyExists | Code::Aborted => ErrorKind::Protocol,
            Code::PermissionDenied => ErrorKind::Forbidden,
            Code::ResourceExhausted => ErrorKind::RateLimited,
            Code::FailedPrecondition => ErrorKind::SchemaViolation,
            Code::Unimplemented => ErrorKind::Protocol,
            Code::Internal | Code::DataLoss => ErrorKind::Internal,
            Code::Unavailable => ErrorKind::Unavailable,
            Code::Unauthenticated => ErrorKind::Unauthorized,
        }
    }
}
