//! The authorization question sent to the service.

use std::fmt;

use super::{ObjectReference, SubjectReference};
use crate::Error;

/// One authorization question: "can `subject` exercise `permission` on `resource`?"
///
/// A `CheckRequest` is immutable once built and is consumed by exactly one
/// dispatch. Building one never fails; malformed identifiers are rejected by
/// the service (and surface as a failed check), or up front by
/// [`validate()`](CheckRequest::validate) when the caller wants that.
///
/// ## Argument Order
///
/// The constructor follows the wire order of the check API: resource,
/// permission, subject.
///
/// ```rust
/// use relcheck::{CheckRequest, ObjectReference};
///
/// let request = CheckRequest::new(
///     ObjectReference::new("task", "task-001"),
///     "view",
///     ObjectReference::new("user", "user-001"),
/// );
///
/// assert_eq!(request.resource().object_id(), "task-001");
/// assert_eq!(request.permission(), "view");
/// assert_eq!(request.to_string(), "task:task-001#view@user:user-001");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CheckRequest {
    resource: ObjectReference,
    permission: String,
    subject: SubjectReference,
}

impl CheckRequest {
    /// Builds a check request. Pure and total.
    pub fn new(
        resource: ObjectReference,
        permission: impl Into<String>,
        subject: impl Into<SubjectReference>,
    ) -> Self {
        Self {
            resource,
            permission: permission.into(),
            subject: subject.into(),
        }
    }

    /// Builds a check request from `type:id` notation.
    ///
    /// The subject may be a subject set (`group:admins#member`).
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::ErrorKind::InvalidArgument)
    /// if either reference cannot be parsed.
    ///
    /// ```rust
    /// use relcheck::CheckRequest;
    ///
    /// let request = CheckRequest::parse("task:task-001", "view", "user:user-001").unwrap();
    /// assert_eq!(request.subject().object().object_type(), "user");
    ///
    /// assert!(CheckRequest::parse("task", "view", "user:user-001").is_err());
    /// ```
    pub fn parse(resource: &str, permission: &str, subject: &str) -> Result<Self, Error> {
        let resource: ObjectReference = resource.parse().map_err(|e| {
            Error::invalid_argument(format!("invalid resource {:?}: {}", resource, e)).with_source(e)
        })?;
        let subject: SubjectReference = subject.parse().map_err(|e| {
            Error::invalid_argument(format!("invalid subject {:?}: {}", subject, e)).with_source(e)
        })?;
        Ok(Self::new(resource, permission, subject))
    }

    /// Returns the resource being accessed.
    #[inline]
    pub fn resource(&self) -> &ObjectReference {
        &self.resource
    }

    /// Returns the permission being checked.
    #[inline]
    pub fn permission(&self) -> &str {
        &self.permission
    }

    /// Returns the subject requesting access.
    #[inline]
    pub fn subject(&self) -> &SubjectReference {
        &self.subject
    }

    /// Reports empty identifiers without contacting the service.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::ErrorKind::InvalidArgument)
    /// naming the first empty part.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.resource.is_well_formed() {
            return Err(Error::invalid_argument(format!(
                "resource {:?} needs a non-empty type and id",
                self.resource.to_string()
            )));
        }
        if self.permission.is_empty() {
            return Err(Error::invalid_argument("permission cannot be empty"));
        }
        if !self.subject.is_well_formed() {
            return Err(Error::invalid_argument(format!(
                "subject {:?} needs a non-empty type, id and relation",
                self.subject.to_string()
            )));
        }
        Ok(())
    }

    /// Splits the request into its parts.
    pub fn into_parts(self) -> (ObjectReference, String, SubjectReference) {
        (self.resource, self.permission, self.subject)
    }
}

impl fmt::Display for CheckRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}@{}", self.resource, self.permission, self.subject)
    }
}
