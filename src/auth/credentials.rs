//! Preshared-key credentials.

use std::fmt;

use zeroize::Zeroizing;

use crate::Error;

/// The preshared key the service was started with.
///
/// Sent as `authorization: Bearer <key>` on every check. The key is wiped
/// from memory when dropped and never shows up in `Debug` output.
///
/// ## Example
///
/// ```rust
/// use relcheck::PresharedKey;
///
/// let key = PresharedKey::new("somerandomkeyhere");
/// assert_eq!(format!("{:?}", key), "PresharedKey([REDACTED])");
/// ```
#[derive(Clone)]
pub struct PresharedKey {
    key: Zeroizing<String>,
}

impl PresharedKey {
    /// Wraps a preshared key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Zeroizing::new(key.into()),
        }
    }

    /// Reads the key from an environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Configuration`](crate::ErrorKind::Configuration)
    /// if the variable is unset, not unicode, or empty.
    pub fn from_env(var: &str) -> Result<Self, Error> {
        match std::env::var(var) {
            Ok(key) if !key.is_empty() => Ok(Self::new(key)),
            Ok(_) => Err(Error::configuration(format!("{} is empty", var))),
            Err(e) => Err(Error::configuration(format!("{}: {}", var, e)).with_source(e)),
        }
    }

    /// Returns the raw key.
    pub fn expose(&self) -> &str {
        &self.key
    }

    /// Returns the `authorization` header value.
    pub(crate) fn bearer(&self) -> Zeroizing<String> {
        Zeroizing::new(format!("Bearer {}", self.key.as_str()))
    }

    /// Returns `true` if the key is empty.
    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }
}

impl fmt::Debug for PresharedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PresharedKey([REDACTED])")
    }
}

impl From<&str> for PresharedKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for PresharedKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_debug_redacts_key() {
        let key = PresharedKey::new("secret-token");
        let debug = format!("{:?}", key);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_bearer_header() {
        let key = PresharedKey::from("secret-token");
        assert_eq!(key.bearer().as_str(), "Bearer secret-token");
        assert_eq!(key.expose(), "secret-token");
    }

    #[test]
    fn test_from_env_missing() {
        let err = PresharedKey::from_env("RELCHECK_TEST_SURELY_UNSET_VARIABLE").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
