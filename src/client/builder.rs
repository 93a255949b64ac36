//! Client builder with typestate pattern.

use std::{marker::PhantomData, sync::Arc, time::Duration};

use super::inner::ClientInner;
#[cfg(feature = "grpc")]
use crate::transport::GrpcTransport;
#[cfg(feature = "rest")]
use crate::transport::RestTransport;
use crate::{
    Client, Error,
    auth::PresharedKey,
    config::TlsConfig,
    transport::{CheckTransport, Transport},
};

/// Default per-check timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Marker type: endpoint not yet provided.
pub struct NoEndpoint;

/// Marker type: endpoint has been provided.
pub struct HasEndpoint;

/// Marker type: credentials not yet provided.
pub struct NoCredentials;

/// Marker type: credentials have been provided.
pub struct HasCredentials;

/// Builder for creating [`Client`] instances.
///
/// Uses the typestate pattern so that `build()` only exists once the
/// endpoint and credentials are set.
///
/// ## Required Configuration
///
/// - `endpoint()`: the service's gRPC address or HTTP gateway URL
/// - `credentials()`: the preshared key
///
/// ## Optional Configuration
///
/// - `transport()`: [`Transport::Grpc`] (default) or [`Transport::Http`]
/// - `timeout()`: per-check deadline
/// - `connect_timeout()`: connection establishment deadline
/// - `tls_config()`: custom TLS settings
/// - `insecure()`: allow plaintext `http://` endpoints
///
/// ## Example
///
/// ```rust
/// use std::time::Duration;
///
/// use relcheck::{Client, Transport};
///
/// # tokio_test::block_on(async {
/// let client = Client::builder()
///     .endpoint("http://localhost:8443")
///     .credentials("somerandomkeyhere")
///     .transport(Transport::Http)
///     .insecure()
///     .timeout(Duration::from_secs(2))
///     .build()
///     .unwrap();
/// # drop(client);
/// # });
/// ```
pub struct ClientBuilder<EndpointState, CredentialsState> {
    endpoint: Option<String>,
    credentials: Option<PresharedKey>,
    transport: Transport,
    tls_config: TlsConfig,
    insecure: bool,
    timeout: Option<Duration>,
    connect_timeout: Duration,
    _endpoint_state: PhantomData<EndpointState>,
    _credentials_state: PhantomData<CredentialsState>,
}

impl ClientBuilder<NoEndpoint, NoCredentials> {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            endpoint: None,
            credentials: None,
            transport: Transport::default(),
            tls_config: TlsConfig::default(),
            insecure: false,
            timeout: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            _endpoint_state: PhantomData,
            _credentials_state: PhantomData,
        }
    }
}

impl Default for ClientBuilder<NoEndpoint, NoCredentials> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ClientBuilder<NoEndpoint, C> {
    /// Sets the service endpoint.
    ///
    /// For gRPC this is the API address (`https://grpc.example.com:443`); for
    /// HTTP it is the gateway's base URL.
    pub fn endpoint(self, endpoint: impl Into<String>) -> ClientBuilder<HasEndpoint, C> {
        ClientBuilder {
            endpoint: Some(endpoint.into()),
            credentials: self.credentials,
            transport: self.transport,
            tls_config: self.tls_config,
            insecure: self.insecure,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            _endpoint_state: PhantomData,
            _credentials_state: PhantomData,
        }
    }
}

impl<E> ClientBuilder<E, NoCredentials> {
    /// Sets the preshared key.
    pub fn credentials(self, key: impl Into<PresharedKey>) -> ClientBuilder<E, HasCredentials> {
        ClientBuilder {
            endpoint: self.endpoint,
            credentials: Some(key.into()),
            transport: self.transport,
            tls_config: self.tls_config,
            insecure: self.insecure,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            _endpoint_state: PhantomData,
            _credentials_state: PhantomData,
        }
    }
}

impl<E, C> ClientBuilder<E, C> {
    /// Selects the wire protocol.
    #[must_use]
    pub fn transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Sets the TLS configuration.
    #[must_use]
    pub fn tls_config(mut self, config: TlsConfig) -> Self {
        self.tls_config = config;
        self
    }

    /// Allows plaintext `http://` endpoints.
    ///
    /// **WARNING**: the preshared key then travels unencrypted. Only use this
    /// against a local development server.
    #[must_use]
    pub fn insecure(mut self) -> Self {
        self.insecure = true;
        self
    }

    /// Sets the per-check deadline.
    ///
    /// The client stops waiting when it expires and reports the check as
    /// failed with [`ErrorKind::Timeout`](crate::ErrorKind::Timeout).
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

impl ClientBuilder<HasEndpoint, HasCredentials> {
    /// Builds the client.
    ///
    /// No connection is made here; the first check connects. With the gRPC
    /// transport this must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Configuration`](crate::ErrorKind::Configuration) if:
    /// - the endpoint is not a valid URL
    /// - the endpoint is `http://` and [`insecure()`](Self::insecure) was not called
    /// - the selected transport's feature is disabled
    /// - the TLS configuration cannot be loaded
    pub fn build(self) -> Result<Client, Error> {
        let endpoint = self
            .endpoint
            .ok_or_else(|| Error::configuration("endpoint is required"))?;
        let credentials = self
            .credentials
            .ok_or_else(|| Error::configuration("credentials are required"))?;

        let url = url::Url::parse(&endpoint)?;
        match url.scheme() {
            "https" => {},
            "http" if self.insecure => {
                tracing::warn!(endpoint = %url, "using a plaintext connection");
            },
            "http" => {
                return Err(Error::configuration(
                    "HTTPS is required. Use .insecure() for development with HTTP.",
                ));
            },
            other => {
                return Err(Error::configuration(format!(
                    "unsupported endpoint scheme {:?}",
                    other
                )));
            },
        }

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);

        let transport: Arc<dyn CheckTransport> = match self.transport {
            #[cfg(feature = "grpc")]
            Transport::Grpc => Arc::new(
                GrpcTransport::builder(url.clone())
                    .credentials(credentials)
                    .tls_config(self.tls_config)
                    .timeout(timeout)
                    .connect_timeout(self.connect_timeout)
                    .build()?,
            ),
            #[cfg(not(feature = "grpc"))]
            Transport::Grpc => {
                return Err(Error::configuration(
                    "gRPC transport requested but 'grpc' feature is not enabled",
                ));
            },
            #[cfg(feature = "rest")]
            Transport::Http => Arc::new(
                RestTransport::builder()
                    .base_url(url.as_str())?
                    .credentials(credentials)
                    .tls_config(self.tls_config)
                    .timeout(timeout)
                    .connect_timeout(self.connect_timeout)
                    .build()?,
            ),
            #[cfg(not(feature = "rest"))]
            Transport::Http => {
                return Err(Error::configuration(
                    "HTTP transport requested but 'rest' feature is not enabled",
                ));
            },
        };

        tracing::debug!(endpoint = %url, transport = %self.transport, "client configured");

        Ok(Client::from_inner(ClientInner {
            endpoint: Some(url),
            transport_kind: Some(self.transport),
            transport,
            timeout: Some(timeout),
        }))
    }
}
