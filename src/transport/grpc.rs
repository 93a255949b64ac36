//! gRPC transport using tonic.
//!
//! Speaks `authzed.api.v1.PermissionsService/CheckPermission` directly over
//! HTTP/2. The channel connects lazily, so building a transport never touches
//! the network; the first check does.

use std::sync::Arc;
use std::time::Duration;

use tonic::codegen::http::uri::PathAndQuery;
use tonic::metadata::{Ascii, MetadataValue};
use tonic::transport::{Certificate, Channel, ClientTlsConfig, Endpoint};
use url::Url;

use super::proto::{CheckPermissionRequest, CheckPermissionResponse, CHECK_PERMISSION_PATH};
use super::traits::{CheckTransport, StatsRecorder, TransportStats};
use crate::auth::PresharedKey;
use crate::client::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT};
use crate::config::TlsConfig;
use crate::types::{CheckRequest, Permissionship};
use crate::user_agent;
use crate::Error;

/// gRPC transport client.
#[derive(Clone)]
pub struct GrpcTransport {
    grpc: tonic::client::Grpc<Channel>,
    base_url: Url,
    authorization: Option<MetadataValue<Ascii>>,
    timeout: Duration,
    stats: Arc<StatsRecorder>,
}

impl std::fmt::Debug for GrpcTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrpcTransport")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.authorization.is_some())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl GrpcTransport {
    /// Returns a builder for the given endpoint.
    ///
    /// `http://` endpoints use plaintext HTTP/2, `https://` endpoints use TLS
    /// verified against the platform roots plus any CA in the [`TlsConfig`].
    pub fn builder(base_url: Url) -> GrpcTransportBuilder {
        GrpcTransportBuilder {
            base_url,
            credentials: None,
            tls_config: TlsConfig::default(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Returns the endpoint this transport talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns request counters.
    pub fn stats(&self) -> TransportStats {
        self.stats.snapshot()
    }

    /// Runs one call under the transport deadline.
    ///
    /// The deadline is not set on the endpoint: tonic reports an expired
    /// endpoint timeout as `CANCELLED`, not `DEADLINE_EXCEEDED`.
    async fn call(&self, request: CheckRequest) -> Result<Permissionship, Error> {
        tokio::time::timeout(self.timeout, self.call_once(request))
            .await
            .map_err(|_| Error::timeout(format!("no check reply within {:?}", self.timeout)))?
    }

    async fn call_once(&self, request: CheckRequest) -> Result<Permissionship, Error> {
        let mut grpc = self.grpc.clone();
        grpc.ready().await.map_err(|e| {
            Error::connection(format!("permissions service not ready: {}", e)).with_source(e)
        })?;

        let mut message = tonic::Request::new(CheckPermissionRequest::from(&request));
        if let Some(ref authorization) = self.authorization {
            message
                .metadata_mut()
                .insert("authorization", authorization.clone());
        }

        let response: tonic::Response<CheckPermissionResponse> = grpc
            .unary(
                message,
                PathAndQuery::from_static(CHECK_PERMISSION_PATH),
                tonic_prost::ProstCodec::default(),
            )
            .await?;

        let response = response.into_inner();
        tracing::trace!(
            permissionship = response.permissionship,
            checked_at = response.checked_at.as_ref().map(|t| t.token.as_str()),
            "check reply"
        );
        Ok(Permissionship::from(response.permissionship))
    }
}

#[async_trait::async_trait]
impl CheckTransport for GrpcTransport {
    async fn dispatch_check(&self, request: CheckRequest) -> Result<Permissionship, Error> {
        let result = self.call(request).await;
        self.stats.record(&result);
        result
    }
}

/// Builder for a [`GrpcTransport`].
#[derive(Debug)]
pub struct GrpcTransportBuilder {
    base_url: Url,
    credentials: Option<PresharedKey>,
    tls_config: TlsConfig,
    timeout: Duration,
    connect_timeout: Duration,
}

impl GrpcTransportBuilder {
    /// Sets the preshared key sent with every check.
    #[must_use]
    pub fn credentials(mut self, key: PresharedKey) -> Self {
        self.credentials = Some(key);
        self
    }

    /// Sets the TLS configuration.
    #[must_use]
    pub fn tls_config(mut self, config: TlsConfig) -> Self {
        self.tls_config = config;
        self
    }

    /// Sets the per-check deadline.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Builds the transport.
    ///
    /// Must be called from within a Tokio runtime; the channel's background
    /// worker is spawned here even though no connection is made yet.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Configuration`](crate::ErrorKind::Configuration)
    /// for an unsupported scheme, an unreadable CA certificate, a key that
    /// is not a valid header value, or `skip_verification`, which this
    /// transport does not support.
    pub fn build(self) -> Result<GrpcTransport, Error> {
        let secure = match self.base_url.scheme() {
            "https" => true,
            "http" => false,
            other => {
                return Err(Error::configuration(format!(
                    "unsupported scheme {:?} for gRPC endpoint",
                    other
                )));
            },
        };

        if self.tls_config.skip_verification {
            return Err(Error::configuration(
                "gRPC transport cannot skip certificate verification; trust the CA instead",
            ));
        }

        let mut endpoint = Endpoint::from_shared(self.base_url.to_string())
            .map_err(|e| Error::configuration(format!("invalid gRPC endpoint: {}", e)))?
            .connect_timeout(self.connect_timeout)
            .user_agent(user_agent::user_agent())
            .map_err(|e| Error::configuration(format!("invalid user agent: {}", e)))?;

        if secure {
            let mut tls = ClientTlsConfig::new().with_native_roots();
            if let Some(pem) = self.tls_config.ca_pem()? {
                tls = tls.ca_certificate(Certificate::from_pem(pem));
            }
            endpoint = endpoint
                .tls_config(tls)
                .map_err(|e| Error::configuration(format!("invalid TLS configuration: {}", e)))?;
        }

        let authorization = self
            .credentials
            .map(|key| {
                key.bearer()
                    .parse::<MetadataValue<Ascii>>()
                    .map_err(|_| Error::configuration("preshared key is not a valid header value"))
            })
            .transpose()?;

        Ok(GrpcTransport {
            grpc: tonic::client::Grpc::new(endpoint.connect_lazy()),
            base_url: self.base_url,
            authorization,
            timeout: self.timeout,
            stats: Arc::new(StatsRecorder::default()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_build_plaintext() {
        let transport = GrpcTransport::builder(url("http://localhost:50051"))
            .credentials(PresharedKey::new("somerandomkeyhere"))
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(transport.base_url().as_str(), "http://localhost:50051/");
        assert_eq!(transport.stats(), TransportStats::default());
        let debug = format!("{:?}", transport);
        assert!(debug.contains("authenticated: true"));
        assert!(!debug.contains("somerandomkeyhere"));
    }

    #[tokio::test]
    async fn test_build_tls() {
        let transport = GrpcTransport::builder(url("https://grpc.authzed.com")).build();
        assert!(transport.is_ok());
    }

    #[tokio::test]
    async fn test_rejects_unknown_scheme() {
        let err = GrpcTransport::builder(url("ftp://localhost:50051"))
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_rejects_skip_verification() {
        let err = GrpcTransport::builder(url("https://localhost:50051"))
            .tls_config(TlsConfig::insecure())
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_rejects_key_with_newline() {
        let err = GrpcTransport::builder(url("http://localhost:50051"))
            .credentials(PresharedKey::new("bad\nkey"))
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    /// Accepts connections and never answers.
    async fn silent_listener() -> (std::net::SocketAddr, tokio::task::JoinHandle<()>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        (addr, handle)
    }

    #[tokio::test]
    async fn test_silent_service_times_out() {
        let (addr, server) = silent_listener().await;
        let transport = GrpcTransport::builder(url(&format!("http://{addr}")))
            .timeout(Duration::from_millis(300))
            .build()
            .unwrap();

        let request = CheckRequest::parse("task:task-001", "view", "user:user-001").unwrap();
        let err = transport.dispatch_check(request).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(err.is_retriable());
        server.abort();
    }

    #[tokio::test]
    async fn test_client_over_silent_service_fails_with_timeout() {
        let (addr, server) = silent_listener().await;
        let client = crate::Client::builder()
            .endpoint(format!("http://{addr}"))
            .credentials("somerandomkeyhere")
            .insecure()
            .timeout(Duration::from_millis(300))
            .build()
            .unwrap();

        let outcome = client
            .check(
                crate::ObjectReference::new("task", "task-001"),
                "view",
                crate::ObjectReference::new("user", "user-001"),
            )
            .await;

        assert_eq!(outcome.error().unwrap().kind(), ErrorKind::Timeout);
        server.abort();
    }

    #[tokio::test]
    async fn test_unreachable_service_fails_without_answer() {
        // Port 9 (discard) is closed on test machines.
        let transport = GrpcTransport::builder(url("http://127.0.0.1:9"))
            .connect_timeout(Duration::from_millis(500))
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();

        let request = CheckRequest::parse("task:task-001", "view", "user:user-001").unwrap();
        let err = transport.dispatch_check(request).await.unwrap_err();

        assert_ne!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(
            transport.stats(),
            TransportStats {
                requests_sent: 1,
                requests_failed: 1,
            }
        );
    }
}
