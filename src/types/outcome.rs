//! Classification of a check reply into a caller-visible outcome.

use std::fmt;

use super::{CheckRequest, Permissionship};
use crate::error::{AccessDenied, DenialReason};
use crate::Error;

/// The result of one permission check.
///
/// Exactly one outcome is produced per check. Only [`CheckOutcome::Granted`]
/// means "go ahead". The other four are all "not granted" but are kept apart:
///
/// | Outcome           | Meaning                                      |
/// |-------------------|----------------------------------------------|
/// | `Granted`         | The service answered `HAS_PERMISSION`        |
/// | `Denied`          | The service answered `NO_PERMISSION`         |
/// | `Indeterminate`   | The service answered `UNSPECIFIED`           |
/// | `Unrecognized(n)` | The service answered with unknown code `n`   |
/// | `Failed(err)`     | No answer was obtained                       |
///
/// A service that is down is `Failed`, never `Denied`.
///
/// ```rust
/// use relcheck::{CheckOutcome, Permissionship};
///
/// assert!(CheckOutcome::from(Permissionship::HasPermission).is_granted());
/// assert!(CheckOutcome::from(Permissionship::NoPermission).is_denied());
///
/// let unknown = CheckOutcome::from(Permissionship::Unrecognized(3));
/// assert!(!unknown.is_granted());
/// assert!(!unknown.is_denied());
/// ```
#[derive(Debug)]
pub enum CheckOutcome {
    /// Explicit negative answer.
    Denied,
    /// Explicit positive answer.
    Granted,
    /// The service could not determine the permission.
    Indeterminate,
    /// The service answered with a code this crate does not know.
    Unrecognized(i32),
    /// The check could not be dispatched or the service rejected it.
    Failed(Error),
}

/// The variant of a [`CheckOutcome`] without its payload.
///
/// Useful for comparisons and for metrics labels, since [`Error`] is neither
/// `Clone` nor `PartialEq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    /// See [`CheckOutcome::Denied`].
    Denied,
    /// See [`CheckOutcome::Granted`].
    Granted,
    /// See [`CheckOutcome::Indeterminate`].
    Indeterminate,
    /// See [`CheckOutcome::Unrecognized`].
    Unrecognized,
    /// See [`CheckOutcome::Failed`].
    Failed,
}

impl OutcomeKind {
    /// Returns a short lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::Denied => "denied",
            OutcomeKind::Granted => "granted",
            OutcomeKind::Indeterminate => "indeterminate",
            OutcomeKind::Unrecognized => "unrecognized",
            OutcomeKind::Failed => "failed",
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a dispatch result to its outcome.
///
/// ```rust
/// use relcheck::{classify, Error, OutcomeKind, Permissionship};
///
/// assert_eq!(classify(Ok(Permissionship::Unspecified)).kind(), OutcomeKind::Indeterminate);
/// assert_eq!(classify(Err(Error::connection("refused"))).kind(), OutcomeKind::Failed);
/// ```
pub fn classify(reply: Result<Permissionship, Error>) -> CheckOutcome {
    match reply {
        Ok(permissionship) => CheckOutcome::from(permissionship),
        Err(error) => CheckOutcome::Failed(error),
    }
}

impl From<Permissionship> for CheckOutcome {
    fn from(permissionship: Permissionship) -> Self {
        match permissionship {
            Permissionship::NoPermission => CheckOutcome::Denied,
            Permissionship::HasPermission => CheckOutcome::Granted,
            Permissionship::Unspecified => CheckOutcome::Indeterminate,
            Permissionship::Unrecognized(code) => CheckOutcome::Unrecognized(code),
        }
    }
}

impl CheckOutcome {
    /// Returns the variant without its payload.
    pub fn kind(&self) -> OutcomeKind {
        match self {
            CheckOutcome::Denied => OutcomeKind::Denied,
            CheckOutcome::Granted => OutcomeKind::Granted,
            CheckOutcome::Indeterminate => OutcomeKind::Indeterminate,
            CheckOutcome::Unrecognized(_) => OutcomeKind::Unrecognized,
            CheckOutcome::Failed(_) => OutcomeKind::Failed,
        }
    }

    /// Returns `true` only for [`CheckOutcome::Granted`].
    #[inline]
    pub fn is_granted(&self) -> bool {
        matches!(self, CheckOutcome::Granted)
    }

    /// Returns `true` only for an explicit [`CheckOutcome::Denied`].
    #[inline]
    pub fn is_denied(&self) -> bool {
        matches!(self, CheckOutcome::Denied)
    }

    /// Returns `true` if the check produced no answer.
    #[inline]
    pub fn is_failed(&self) -> bool {
        matches!(self, CheckOutcome::Failed(_))
    }

    /// Returns the dispatch error for [`CheckOutcome::Failed`].
    pub fn error(&self) -> Option<&Error> {
        match self {
            CheckOutcome::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Turns anything but `Granted` into an [`AccessDenied`] error.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied` with the matching [`DenialReason`]; for a failed
    /// check the dispatch error travels along as its source.
    ///
    /// ```rust
    /// use relcheck::{CheckOutcome, CheckRequest, DenialReason};
    ///
    /// let request = CheckRequest::parse("task:task-001", "view", "user:user-001").unwrap();
    ///
    /// assert!(CheckOutcome::Granted.require(&request).is_ok());
    /// let err = CheckOutcome::Indeterminate.require(&request).unwrap_err();
    /// assert_eq!(err.reason(), DenialReason::Indeterminate);
    /// ```
    pub fn require(self, request: &CheckRequest) -> Result<(), AccessDenied> {
        match self {
            CheckOutcome::Granted => Ok(()),
            CheckOutcome::Denied => Err(AccessDenied::new(request, DenialReason::Denied)),
            CheckOutcome::Indeterminate => {
                Err(AccessDenied::new(request, DenialReason::Indeterminate))
            },
            CheckOutcome::Unrecognized(code) => {
                Err(AccessDenied::new(request, DenialReason::Unrecognized(code)))
            },
            CheckOutcome::Failed(error) => Err(AccessDenied::failed(request, error)),
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::Denied => write!(f, "denied"),
            CheckOutcome::Granted => write!(f, "granted"),
            CheckOutcome::Indeterminate => write!(f, "indeterminate"),
            CheckOutcome::Unrecognized(code) => write!(f, "unrecognized permissionship {}", code),
            CheckOutcome::Failed(error) => write!(f, "failed: {}", error),
        }
    }
}
