//! REST transport using reqwest.
//!
//! Talks to the service's HTTP/JSON gateway (`POST /v1/permissions/check`).
//! The gateway renders enums by name, so the reply's `permissionship` is
//! accepted either as `"PERMISSIONSHIP_HAS_PERMISSION"` or as the numeric code.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use url::Url;

use super::traits::{CheckTransport, StatsRecorder, TransportStats};
use crate::auth::PresharedKey;
use crate::client::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT};
use crate::config::TlsConfig;
use crate::error::ErrorKind;
use crate::types::{CheckRequest, ObjectReference, Permissionship, SubjectReference};
use crate::user_agent;
use crate::Error;

const CHECK_PATH: &str = "v1/permissions/check";

// ============================================================================
// REST Transport
// ============================================================================

/// REST transport using reqwest.
#[derive(Clone)]
pub struct RestTransport {
    client: reqwest::Client,
    check_url: Url,
    stats: Arc<StatsRecorder>,
}

impl std::fmt::Debug for RestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestTransport")
            .field("check_url", &self.check_url.as_str())
            .finish_non_exhaustive()
    }
}

impl RestTransport {
    /// Creates a new REST transport builder.
    pub fn builder() -> RestTransportBuilder {
        RestTransportBuilder::new()
    }

    /// Returns request counters.
    pub fn stats(&self) -> TransportStats {
        self.stats.snapshot()
    }

    async fn call(&self, request: CheckRequest) -> Result<Permissionship, Error> {
        let body = CheckPermissionBody::from(request);

        let response = self
            .client
            .post(self.check_url.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(map_status_error(status.as_u16(), &error_text));
        }

        let reply: CheckPermissionReply = response.json().await?;

        tracing::trace!(
            permissionship = ?reply.permissionship,
            checked_at = reply.checked_at.as_ref().map(|t| t.token.as_str()),
            "check reply"
        );
        reply.permissionship.unwrap_or_default().into_permissionship()
    }
}

#[async_trait::async_trait]
impl CheckTransport for RestTransport {
    async fn dispatch_check(&self, request: CheckRequest) -> Result<Permissionship, Error> {
        let result = self.call(request).await;
        self.stats.record(&result);
        result
    }
}

// ============================================================================
// REST Transport Builder
// ============================================================================

/// Builder for REST transport.
#[derive(Debug)]
pub struct RestTransportBuilder {
    base_url: Option<Url>,
    credentials: Option<PresharedKey>,
    tls_config: TlsConfig,
    timeout: Duration,
    connect_timeout: Duration,
}

impl RestTransportBuilder {
    fn new() -> Self {
        Self {
            base_url: None,
            credentials: None,
            tls_config: TlsConfig::default(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Sets the gateway's base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Configuration`] if the URL does not parse.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self, Error> {
        self.base_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

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

    /// Sets the per-check timeout.
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

    /// Builds the REST transport.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Configuration`] if no base URL was set, the CA
    /// certificate cannot be loaded, or the key is not a valid header value.
    pub fn build(self) -> Result<RestTransport, Error> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::configuration("base URL is required"))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(key) = self.credentials {
            let mut value = HeaderValue::from_str(&key.bearer())
                .map_err(|_| Error::configuration("preshared key is not a valid header value"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut client_builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .default_headers(headers)
            .user_agent(user_agent::user_agent());

        if self.tls_config.skip_verification {
            tracing::warn!("TLS certificate verification is disabled");
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        if let Some(pem) = self.tls_config.ca_pem()? {
            let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                Error::configuration(format!("invalid CA certificate: {}", e)).with_source(e)
            })?;
            client_builder = client_builder.add_root_certificate(cert);
        }

        let client = client_builder.build().map_err(|e| {
            Error::configuration(format!("failed to create HTTP client: {}", e)).with_source(e)
        })?;

        Ok(RestTransport {
            client,
            check_url: check_url(&base_url)?,
            stats: Arc::new(StatsRecorder::default()),
        })
    }
}

/// Joins the check path onto the base URL, keeping any path prefix.
fn check_url(base_url: &Url) -> Result<Url, Error> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(CHECK_PATH)?)
}

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct CheckPermissionBody {
    resource: ObjectReference,
    permission: String,
    subject: SubjectReference,
}

impl From<CheckRequest> for CheckPermissionBody {
    fn from(request: CheckRequest) -> Self {
        let (resource, permission, subject) = request.into_parts();
        Self {
            resource,
            permission,
            subject,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckPermissionReply {
    #[serde(default)]
    checked_at: Option<ZedTokenDto>,
    /// Absent when the value is the zero enum, as proto3 JSON omits defaults.
    #[serde(default)]
    permissionship: Option<WirePermissionship>,
}

#[derive(Debug, Deserialize)]
struct ZedTokenDto {
    token: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WirePermissionship {
    Code(i32),
    Name(String),
}

impl Default for WirePermissionship {
    fn default() -> Self {
        WirePermissionship::Code(Permissionship::UNSPECIFIED_CODE)
    }
}

impl WirePermissionship {
    fn into_permissionship(self) -> Result<Permissionship, Error> {
        match self {
            WirePermissionship::Code(code) => Ok(Permissionship::from(code)),
            WirePermissionship::Name(name) => match Permissionship::from_name(&name) {
                Some(Permissionship::Unrecognized(code)) => {
                    tracing::warn!(name = %name, code, "unrecognized permissionship name");
                    Ok(Permissionship::Unrecognized(code))
                },
                Some(known) => Ok(known),
                None => Err(Error::invalid_response(format!(
                    "permissionship {:?} is not a PERMISSIONSHIP_* name",
                    name
                ))),
            },
        }
    }
}

/// Error body of the gateway: a serialized `google.rpc.Status`.
#[derive(Debug, Deserialize)]
struct StatusBody {
    #[serde(default)]
    code: Option<i32>,
    #[serde(default)]
    message: Option<String>,
}

// ============================================================================
// Error Mapping
// ============================================================================

fn map_status_error(status: u16, body: &str) -> Error {
    let parsed = serde_json::from_str::<StatusBody>(body).ok();
    let message = match parsed.as_ref().and_then(|b| b.message.as_deref()) {
        Some(message) if !message.is_empty() => message.to_owned(),
        _ if body.is_empty() => format!("HTTP {}", status),
        _ => body.to_owned(),
    };

    let kind = ErrorKind::from_http_status(status);
    let error = Error::new(kind, message);
    match parsed.and_then(|b| b.code) {
        Some(code) => error.with_source(GatewayStatus { http: status, code }),
        None => error,
    }
}

/// The gRPC status code reported inside a gateway error body.
#[derive(Debug, thiserror::Error)]
#[error("HTTP {http} with gRPC status code {code}")]
struct GatewayStatus {
    http: u16,
    code: i32,
}

// ============================================================================
// Tests
// ============================================================================
