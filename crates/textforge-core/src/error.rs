//! Error types for the Textforge core library
//!
//! Pipeline construction is the only fallible step in the core: every
//! individual transform is a total function over `&str`.

use thiserror::Error;

/// Main error type for Textforge core operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A transformation name outside the closed vocabulary was requested
    #[error("unknown transformation `{name}`")]
    UnknownTransformation {
        /// The offending name, exactly as supplied by the caller
        name: String,
    },
}

impl Error {
    /// Create an unknown transformation error
    pub fn unknown_transformation(name: impl Into<String>) -> Self {
        Self::UnknownTransformation { name: name.into() }
    }

    /// Name of the transformation that caused the error, if any
    pub fn transformation_name(&self) -> Option<&str> {
        match self {
            Self::UnknownTransformation { name } => Some(name),
        }
    }
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_transformation_display() {
        let err = Error::unknown_transformation("frobnicate");
        assert_eq!(err.to_string(), "unknown transformation `frobnicate`");
        assert_eq!(err.transformation_name(), Some("frobnicate"));
    }
}
