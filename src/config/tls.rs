//! TLS configuration for the connection to the authorization service.

use std::path::PathBuf;

use crate::Error;

/// TLS settings shared by the gRPC and HTTP transports.
///
/// By default `https` endpoints are verified against the platform's root
/// certificates. Self-hosted deployments usually sign their certificate with
/// a private CA, which can be trusted here.
///
/// ## Example: Private CA
///
/// ```rust
/// use relcheck::TlsConfig;
///
/// let config = TlsConfig::builder()
///     .ca_cert_file("/etc/spicedb/ca.crt")
///     .build();
/// assert!(config.has_custom_ca());
/// ```
#[derive(Debug, Clone, Default, bon::Builder)]
pub struct TlsConfig {
    /// Path of an extra PEM-encoded CA certificate to trust.
    #[builder(into)]
    pub ca_cert_file: Option<PathBuf>,

    /// An extra PEM-encoded CA certificate to trust.
    #[builder(into)]
    pub ca_cert_pem: Option<String>,

    /// Skip server certificate verification.
    ///
    /// **WARNING**: only for local development. Honoured by the HTTP
    /// transport; the gRPC transport refuses to build with it set.
    #[builder(default = false)]
    pub skip_verification: bool,
}

impl TlsConfig {
    /// Creates a config that skips certificate verification.
    ///
    /// **WARNING**: This makes connections vulnerable to man-in-the-middle
    /// attacks.
    pub fn insecure() -> Self {
        Self::builder().skip_verification(true).build()
    }

    /// Returns `true` if an extra CA certificate is configured.
    pub fn has_custom_ca(&self) -> bool {
        self.ca_cert_file.is_some() || self.ca_cert_pem.is_some()
    }

    /// Loads the configured CA certificate, reading the file if needed.
    ///
    /// Inline PEM takes precedence over the file.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Configuration`](crate::ErrorKind::Configuration)
    /// if the file cannot be read.
    pub(crate) fn ca_pem(&self) -> Result<Option<Vec<u8>>, Error> {
        if let Some(ref pem) = self.ca_cert_pem {
            return Ok(Some(pem.as_bytes().to_vec()));
        }
        match self.ca_cert_file {
            Some(ref path) => std::fs::read(path).map(Some).map_err(|e| {
                Error::configuration(format!("failed to read CA certificate {:?}: {}", path, e))
                    .with_source(e)
            }),
            None => Ok(None),
        }
    }
}
