//! Object and subject references.
//!
//! Both resources and subjects are identified by an object type (a namespace
//! defined in the schema) and an object ID opaque within that namespace. A
//! subject may additionally name a relation, turning it into a subject set
//! such as `group:admins#member`.
//!
//! ```rust
//! use relcheck::{ObjectReference, SubjectReference};
//!
//! let task: ObjectReference = "task:task-001".parse().unwrap();
//! assert_eq!(task.object_type(), "task");
//! assert_eq!(task.object_id(), "task-001");
//!
//! let admins: SubjectReference = "group:admins#member".parse().unwrap();
//! assert_eq!(admins.object().object_type(), "group");
//! assert_eq!(admins.optional_relation(), Some("member"));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A reference to an object, in `type:id` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    object_type: String,
    object_id: String,
}

/// Error parsing an object or subject reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Missing colon separator between type and ID.
    MissingColon,
    /// Empty object type.
    EmptyType,
    /// Empty object ID.
    EmptyId,
    /// A `#` was present but no relation followed it.
    EmptyRelation,
}

impl std::error::Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingColon => write!(f, "missing colon separator in object reference"),
            ParseError::EmptyType => write!(f, "empty object type"),
            ParseError::EmptyId => write!(f, "empty object ID"),
            ParseError::EmptyRelation => write!(f, "empty relation in subject set"),
        }
    }
}

impl ObjectReference {
    /// Creates an object reference from its type and ID.
    ///
    /// No validation happens here; see [`ObjectReference::is_well_formed`].
    ///
    /// ```rust
    /// use relcheck::ObjectReference;
    ///
    /// let user = ObjectReference::new("user", "user-001");
    /// assert_eq!(user.to_string(), "user:user-001");
    /// ```
    pub fn new(object_type: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            object_id: object_id.into(),
        }
    }

    /// Returns the object type (namespace).
    #[inline]
    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    /// Returns the object ID.
    #[inline]
    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    /// Returns `true` if both the type and the ID are non-empty.
    pub fn is_well_formed(&self) -> bool {
        !self.object_type.is_empty() && !self.object_id.is_empty()
    }
}

impl fmt::Display for ObjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object_type, self.object_id)
    }
}

impl FromStr for ObjectReference {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (object_type, object_id) = s.split_once(':').ok_or(ParseError::MissingColon)?;

        if object_type.is_empty() {
            return Err(ParseError::EmptyType);
        }
        if object_id.is_empty() {
            return Err(ParseError::EmptyId);
        }

        Ok(Self::new(object_type, object_id))
    }
}

/// A reference to the subject of a check.
///
/// A plain subject (`user:alice`) has no relation. A subject set
/// (`group:admins#member`) means "everyone who is `member` of `group:admins`".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectReference {
    object: ObjectReference,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    optional_relation: Option<String>,
}

impl SubjectReference {
    /// Creates a plain subject reference.
    pub fn new(object: ObjectReference) -> Self {
        Self {
            object,
            optional_relation: None,
        }
    }

    /// Creates a subject set reference.
    ///
    /// ```rust
    /// use relcheck::{ObjectReference, SubjectReference};
    ///
    /// let admins = SubjectReference::with_relation(
    ///     ObjectReference::new("group", "admins"),
    ///     "member",
    /// );
    /// assert_eq!(admins.to_string(), "group:admins#member");
    /// ```
    pub fn with_relation(object: ObjectReference, relation: impl Into<String>) -> Self {
        Self {
            object,
            optional_relation: Some(relation.into()),
        }
    }

    /// Returns the subject's object.
    #[inline]
    pub fn object(&self) -> &ObjectReference {
        &self.object
    }

    /// Returns the relation for a subject set.
    #[inline]
    pub fn optional_relation(&self) -> Option<&str> {
        self.optional_relation.as_deref()
    }

    /// Returns `true` if the object is well formed and any relation is non-empty.
    pub fn is_well_formed(&self) -> bool {
        self.object.is_well_formed()
            && self.optional_relation.as_ref().is_none_or(|r| !r.is_empty())
    }
}

impl From<ObjectReference> for SubjectReference {
    fn from(object: ObjectReference) -> Self {
        Self::new(object)
    }
}

impl fmt::Display for SubjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.optional_relation {
            Some(relation) => write!(f, "{}#{}", self.object, relation),
            None => write!(f, "{}", self.object),
        }
    }
}

impl FromStr for SubjectReference {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('#') {
            Some((object, relation)) => {
                let object = object.parse()?;
                if relation.is_empty() {
                    return Err(ParseError::EmptyRelation);
                }
                Ok(Self::with_relation(object, relation))
            },
            None => Ok(Self::new(s.parse()?)),
        }
    }
}
