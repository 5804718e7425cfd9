//! Error types for scene file parsing.

use thiserror::Error;

/// Boxed underlying cause of a [`SceneError::MalformedDocument`].
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while turning a scene document into a scene graph.
///
/// Every variant except [`SceneError::MalformedDocument`] carries `at`, the
/// dotted location of the offending object inside the document (for example
/// `groups.root.children[2]`).
#[derive(Error, Debug)]
pub enum SceneError {
    /// An object carries a key its schema does not know.
    #[error("unknown field \"{field}\" on {at}")]
    UnknownField {
        /// Location of the object.
        at: String,
        /// The unrecognized key.
        field: String,
    },

    /// A required key is absent.
    #[error("missing required field \"{field}\" on {at}")]
    MissingField {
        /// Location of the object.
        at: String,
        /// The missing key.
        field: String,
    },

    /// A value has the wrong JSON shape (e.g. a string where a number is needed).
    #[error("{at}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Location of the value.
        at: String,
        /// Description of the expected shape.
        expected: String,
        /// Description of what was found.
        found: String,
    },

    /// An enumerated string (light type, primitive name, object type) is not recognized.
    #[error("{at}: invalid value \"{value}\", expected one of {expected}")]
    InvalidEnumValue {
        /// Location of the value.
        at: String,
        /// The value that was given.
        value: String,
        /// The accepted values, comma separated.
        expected: String,
    },

    /// Fields that are individually valid but cannot appear together or in this context.
    #[error("{at}: {message}")]
    StructuralConflict {
        /// Location of the object.
        at: String,
        /// What conflicts.
        message: String,
    },

    /// Two objects registered under the same name.
    #[error("{at}: two objects with the same name \"{name}\"")]
    DuplicateName {
        /// Location of the second registration.
        at: String,
        /// The repeated name.
        name: String,
    },

    /// A master reference names an object that has not been registered (yet).
    #[error("{at}: invalid master object reference \"{name}\"")]
    UnresolvedReference {
        /// Location of the reference.
        at: String,
        /// The referenced name.
        name: String,
    },

    /// A master reference, or a traversal, would make a node its own ancestor.
    #[error("{at}: object \"{name}\" would become its own ancestor")]
    CyclicReference {
        /// Location of the reference.
        at: String,
        /// Name (or handle description) of the node closing the cycle.
        name: String,
    },

    /// The document could not be read or parsed at all, or its root is not an object.
    #[error("malformed scene document: {message}")]
    MalformedDocument {
        /// Human-readable description.
        message: String,
        /// Underlying I/O or JSON error, if any.
        #[source]
        source: Option<BoxedSource>,
    },
}

impl SceneError {
    /// Create an unknown-field error.
    pub fn unknown_field(at: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            at: at.into(),
            field: field.into(),
        }
    }

    /// Create a missing-field error.
    pub fn missing_field(at: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            at: at.into(),
            field: field.into(),
        }
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(
        at: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            at: at.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an invalid enum value error from the list of accepted values.
    pub fn invalid_enum(at: impl Into<String>, value: impl Into<String>, expected: &[&str]) -> Self {
        Self::InvalidEnumValue {
            at: at.into(),
            value: value.into(),
            expected: expected.join(", "),
        }
    }

    /// Create a structural conflict error.
    pub fn conflict(at: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StructuralConflict {
            at: at.into(),
            message: message.into(),
        }
    }

    /// Create a malformed document error without an underlying cause.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            message: message.into(),
            source: None,
        }
    }

    /// Create a malformed document error wrapping an I/O or JSON error.
    pub fn malformed_with(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::MalformedDocument {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Location inside the document where the error was raised, if any.
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::UnknownField { at, .. }
            | Self::MissingField { at, .. }
            | Self::TypeMismatch { at, .. }
            | Self::InvalidEnumValue { at, .. }
            | Self::StructuralConflict { at, .. }
            | Self::DuplicateName { at, .. }
            | Self::UnresolvedReference { at, .. }
            | Self::CyclicReference { at, .. } => Some(at),
            Self::MalformedDocument { .. } => None,
        }
    }
}

/// Result alias used throughout the parser.
pub type Result<T> = std::result::Result<T, SceneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_field_and_object() {
        let err = SceneError::unknown_field("globalData", "foo");
        assert_eq!(err.to_string(), "unknown field \"foo\" on globalData");
        assert_eq!(err.location(), Some("globalData"));
    }

    #[test]
    fn test_invalid_enum_lists_expected_values() {
        let err = SceneError::invalid_enum("groups.root.lights[0].type", "laser", &["point", "spot"]);
        assert!(err.to_string().contains("expected one of point, spot"));
    }

    #[test]
    fn test_malformed_document_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = SceneError::malformed_with("could not open scene.json", io);
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.location(), None);
    }
}
