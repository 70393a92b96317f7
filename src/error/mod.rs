//! Error types for strict value reads.
//!
//! Building a document never fails, and the lenient readers (`as_i32`,
//! `value`, ...) fall back to zero. [`ValueError`] is only produced by the
//! strict `try_value` path, for callers that want to tell "absent" and
//! "malformed" apart from a real zero.

use thiserror::Error;

/// The error returned when an element's text cannot be read as a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The element has no text.
    #[error("element <{element}> has no text")]
    Missing {
        /// Tag name of the element that was read.
        element: String,
    },
    /// The element has text, but it is not a valid value of the target type.
    #[error("element <{element}>: cannot read {text:?} as {target}")]
    Malformed {
        /// Tag name of the element that was read.
        element: String,
        /// The offending text.
        text: String,
        /// Name of the requested type (e.g., `"i32"`).
        target: &'static str,
    },
}

impl ValueError {
    /// Returns the tag name of the element the read was attempted on.
    #[must_use]
    pub fn element(&self) -> &str {
        match self {
            Self::Missing { element } | Self::Malformed { element, .. } => element,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_display() {
        let err = ValueError::Missing {
            element: "age".to_string(),
        };
        assert_eq!(err.to_string(), "element <age> has no text");
        assert_eq!(err.element(), "age");
    }

    #[test]
    fn test_malformed_display() {
        let err = ValueError::Malformed {
            element: "age".to_string(),
            text: "ten".to_string(),
            target: "i32",
        };
        assert_eq!(err.to_string(), "element <age>: cannot read \"ten\" as i32");
    }

    #[test]
    fn test_value_error_is_error_trait() {
        let err = ValueError::Missing {
            element: "x".to_string(),
        };
        let _: &dyn std::error::Error = &err;
    }
}
