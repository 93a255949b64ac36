//! Transport trait definitions and common types.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::{CheckRequest, Permissionship};
use crate::Error;

// ============================================================================
// Transport Enum
// ============================================================================

/// Built-in transport implementations.
///
/// - **gRPC** (default): the service's native `PermissionsService` API
/// - **Http**: the service's HTTP/JSON gateway
///
/// ## Example
///
/// ```rust
/// use relcheck::Transport;
///
/// let transport = Transport::default();
/// assert!(transport.is_grpc());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    /// gRPC over HTTP/2 (default).
    #[default]
    Grpc,
    /// JSON over HTTP/1.1.
    Http,
}

impl Transport {
    /// Returns `true` if this is gRPC transport.
    pub fn is_grpc(&self) -> bool {
        matches!(self, Transport::Grpc)
    }

    /// Returns `true` if this is HTTP/REST transport.
    pub fn is_http(&self) -> bool {
        matches!(self, Transport::Http)
    }
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transport::Grpc => write!(f, "gRPC"),
            Transport::Http => write!(f, "HTTP/REST"),
        }
    }
}

// ============================================================================
// Transport Stats
// ============================================================================

/// Request counters kept by the built-in transports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransportStats {
    /// Checks handed to the transport.
    pub requests_sent: u64,
    /// Checks that ended in an error.
    pub requests_failed: u64,
}

/// Lock-free counters behind [`TransportStats`].
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    sent: AtomicU64,
    failed: AtomicU64,
}

impl StatsRecorder {
    pub(crate) fn record<T>(&self, result: &Result<T, Error>) {
        self.sent.fetch_add(1, Ordering::Relaxed);
        if result.is_err() {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn snapshot(&self) -> TransportStats {
        TransportStats {
            requests_sent: self.sent.load(Ordering::Relaxed),
            requests_failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

// ============================================================================
// Transport Trait
// ============================================================================

/// The one capability relcheck needs from the authorization service.
///
/// Implementations send the request, wait for the single reply, and return
/// either the permissionship it carries or an error describing why no answer
/// was obtained. They must be usable from many concurrent checks.
///
/// Transports whose client library reports completion through a callback
/// can implement [`CallbackTransport`](crate::transport::CallbackTransport)
/// instead and be wrapped in a
/// [`CallbackAdapter`](crate::transport::CallbackAdapter).
///
/// ## Example
///
/// ```rust
/// use relcheck::transport::CheckTransport;
/// use relcheck::{CheckRequest, Error, Permissionship};
///
/// /// Grants everything to `user:root`.
/// struct RootOnly;
///
/// #[async_trait::async_trait]
/// impl CheckTransport for RootOnly {
///     async fn dispatch_check(&self, request: CheckRequest) -> Result<Permissionship, Error> {
///         Ok(if request.subject().to_string() == "user:root" {
///             Permissionship::HasPermission
///         } else {
///             Permissionship::NoPermission
///         })
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait CheckTransport: Send + Sync {
    /// Dispatches one check and awaits its single reply.
    async fn dispatch_check(&self, request: CheckRequest) -> Result<Permissionship, Error>;
}
