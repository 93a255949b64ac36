//! Connection configuration.
//!
//! - [`TlsConfig`]: TLS settings for `https` endpoints

mod tls;

pub use tls::TlsConfig;
