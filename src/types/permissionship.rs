//! The service's answer to a check.

use std::fmt;

/// The answer carried by a successful check reply.
///
/// The service's enumeration may grow. Codes this crate does not know are kept
/// as [`Permissionship::Unrecognized`] instead of being folded into one of the
/// known answers.
///
/// | Code | Wire name                         | Variant          |
/// |------|-----------------------------------|------------------|
/// | 0    | `PERMISSIONSHIP_UNSPECIFIED`      | `Unspecified`    |
/// | 1    | `PERMISSIONSHIP_NO_PERMISSION`    | `NoPermission`   |
/// | 2    | `PERMISSIONSHIP_HAS_PERMISSION`   | `HasPermission`  |
/// | 3    | `PERMISSIONSHIP_CONDITIONAL_PERMISSION` | `Unrecognized(3)` |
/// | any  | any other `PERMISSIONSHIP_*` name | `Unrecognized`   |
///
/// ```rust
/// use relcheck::Permissionship;
///
/// assert_eq!(Permissionship::from(2), Permissionship::HasPermission);
/// assert_eq!(Permissionship::from(3), Permissionship::Unrecognized(3));
/// assert_eq!(Permissionship::Unrecognized(3).code(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permissionship {
    /// The service could not determine the answer.
    Unspecified,
    /// The subject does not have the permission.
    NoPermission,
    /// The subject has the permission.
    HasPermission,
    /// A code outside the known values.
    Unrecognized(i32),
}

impl Permissionship {
    /// Wire code for `UNSPECIFIED`.
    pub const UNSPECIFIED_CODE: i32 = 0;
    /// Wire code for `NO_PERMISSION`.
    pub const NO_PERMISSION_CODE: i32 = 1;
    /// Wire code for `HAS_PERMISSION`.
    pub const HAS_PERMISSION_CODE: i32 = 2;
    /// Stands in for a `PERMISSIONSHIP_*` name with no known code.
    ///
    /// The HTTP gateway renders enums by name, so a value added to the
    /// protocol after this crate arrives without its number.
    pub const UNKNOWN_NAME_CODE: i32 = i32::MIN;

    /// Returns the wire code.
    pub fn code(self) -> i32 {
        match self {
            Permissionship::Unspecified => Self::UNSPECIFIED_CODE,
            Permissionship::NoPermission => Self::NO_PERMISSION_CODE,
            Permissionship::HasPermission => Self::HAS_PERMISSION_CODE,
            Permissionship::Unrecognized(code) => code,
        }
    }

    /// Maps a wire enum name to a permissionship.
    ///
    /// `PERMISSIONSHIP_CONDITIONAL_PERMISSION` comes back as
    /// `Unrecognized(3)`. Any other `PERMISSIONSHIP_*` name comes back as
    /// `Unrecognized(UNKNOWN_NAME_CODE)`. A string without that prefix is not
    /// a permissionship name and returns `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "PERMISSIONSHIP_UNSPECIFIED" => Some(Permissionship::Unspecified),
            "PERMISSIONSHIP_NO_PERMISSION" => Some(Permissionship::NoPermission),
            "PERMISSIONSHIP_HAS_PERMISSION" => Some(Permissionship::HasPermission),
            "PERMISSIONSHIP_CONDITIONAL_PERMISSION" => Some(Permissionship::Unrecognized(3)),
            other if other.starts_with("PERMISSIONSHIP_") => {
                Some(Permissionship::Unrecognized(Self::UNKNOWN_NAME_CODE))
            },
            _ => None,
        }
    }
}

impl From<i32> for Permissionship {
    fn from(code: i32) -> Self {
        match code {
            Self::UNSPECIFIED_CODE => Permissionship::Unspecified,
            Self::NO_PERMISSION_CODE => Permissionship::NoPermission,
            Self::HAS_PERMISSION_CODE => Permissionship::HasPermission,
            other => Permissionship::Unrecognized(other),
        }
    }
}

impl fmt::Display for Permissionship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permissionship::Unspecified => write!(f, "UNSPECIFIED"),
            Permissionship::NoPermission => write!(f, "NO_PERMISSION"),
            Permissionship::HasPermission => write!(f, "HAS_PERMISSION"),
            Permissionship::Unrecognized(code) => write!(f, "UNRECOGNIZED({})", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use test_case::test_case;

    use super::*;

    #[test_case(0 => Permissionship::Unspecified)]
    #[test_case(1 => Permissionship::NoPermission)]
    #[test_case(2 => Permissionship::HasPermission)]
    #[test_case(3 => Permissionship::Unrecognized(3))]
    #[test_case(-1 => Permissionship::Unrecognized(-1) ; "negative code")]
    fn test_from_code(code: i32) -> Permissionship {
        Permissionship::from(code)
    }

    #[test_case("PERMISSIONSHIP_UNSPECIFIED" => Some(Permissionship::Unspecified))]
    #[test_case("PERMISSIONSHIP_NO_PERMISSION" => Some(Permissionship::NoPermission))]
    #[test_case("PERMISSIONSHIP_HAS_PERMISSION" => Some(Permissionship::HasPermission))]
    #[test_case("PERMISSIONSHIP_CONDITIONAL_PERMISSION" => Some(Permissionship::Unrecognized(3)))]
    #[test_case(
        "PERMISSIONSHIP_FUTURE_VALUE" => Some(Permissionship::Unrecognized(Permissionship::UNKNOWN_NAME_CODE))
        ; "future name"
    )]
    #[test_case("HAS_PERMISSION" => None ; "missing prefix")]
    fn test_from_name(name: &str) -> Option<Permissionship> {
        Permissionship::from_name(name)
    }

    #[test]
    fn test_display() {
        assert_eq!(Permissionship::HasPermission.to_string(), "HAS_PERMISSION");
        assert_eq!(Permissionship::Unrecognized(7).to_string(), "UNRECOGNIZED(7)");
    }

    proptest! {
        #[test]
        fn prop_code_survives_conversion(code in any::<i32>()) {
            prop_assert_eq!(Permissionship::from(code).code(), code);
        }
    }
}
