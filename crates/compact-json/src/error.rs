use core::fmt;

use crate::record::Kind;

/// Errors reported by queries on a [`Value`](crate::Value).
///
/// Every error is local to the failing call: documents are read-only, so nothing is left in an
/// inconsistent state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The value can not be represented as the requested type.
    TypeMismatch { expected: &'static str, found: Kind },
    /// The object has no member with this key.
    KeyNotFound { key: Box<str> },
    /// Positional access past the end of an array or object.
    IndexOutOfRange { index: usize, len: usize },
    /// Keyed access on something other than an object.
    NotAnObject { found: Kind },
    /// Positional access on a scalar or null.
    NotAContainer { found: Kind },
}

impl Error {
    pub(crate) fn type_mismatch(expected: &'static str, found: Kind) -> Error {
        Error::TypeMismatch { expected, found }
    }
    pub(crate) fn key_not_found(key: &str) -> Error {
        Error::KeyNotFound { key: key.into() }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TypeMismatch { expected, found } => {
                write!(f, "Can not represent {found} value as `{expected}`")
            }
            Error::KeyNotFound { key } => write!(f, "Key not found: '{key}'"),
            Error::IndexOutOfRange { index, len } => {
                write!(f, "Index {index} is out of range for a container of size {len}")
            }
            Error::NotAnObject { found } => write!(f, "Expected an object, found {found}"),
            Error::NotAContainer { found } => {
                write!(f, "Expected an array or object, found {found}")
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Error::type_mismatch("i64", Kind::String), "Can not represent string value as `i64`"; "type mismatch")]
    #[test_case(Error::key_not_found("missing"), "Key not found: 'missing'"; "key not found")]
    #[test_case(Error::IndexOutOfRange { index: 3, len: 2 }, "Index 3 is out of range for a container of size 2"; "index")]
    #[test_case(Error::NotAnObject { found: Kind::Array }, "Expected an object, found array"; "not an object")]
    #[test_case(Error::NotAContainer { found: Kind::Null }, "Expected an array or object, found null"; "not a container")]
    fn display(error: Error, expected: &str) {
        assert_eq!(error.to_string(), expected);
    }
}
