//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! various failure modes in the CLI application.

use std::io;
use std::path::PathBuf;
use textforge_core::TransformKind;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, stdin, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from textforge-core
    #[error("{0}")]
    Core(#[from] textforge_core::Error),

    /// Error from the HTTP adapter
    #[error("Server error: {0}")]
    Server(#[from] textforge_server::ServerError),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Invalid file format
    #[error("Invalid file format for {}: expected {}", path.display(), expected)]
    InvalidFormat { path: PathBuf, expected: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument combination
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(_) => 2,
            Self::Server(_) => 3,
            Self::FileNotFound { .. } => 4,
            Self::InvalidFormat { .. } => 5,
            Self::Config(_) => 6,
            Self::InvalidArgs(_) => 7,
            Self::Json(_) => 8,
            Self::Yaml(_) => 9,
            Self::TomlDe(_) | Self::TomlSer(_) => 10,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::InvalidArgs(_))
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    let mut message = if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    };

    // Unknown names get the vocabulary as a hint
    if let Error::Core(core_error) = error {
        if core_error.transformation_name().is_some() {
            let known = TransformKind::ALL
                .iter()
                .map(|kind| kind.name())
                .collect::<Vec<_>>()
                .join(", ");
            message.push_str(&format!("\n\nKnown transformations: {known}"));
        }
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_per_kind() {
        let errors = [
            Error::Io(io::Error::new(io::ErrorKind::Other, "boom")),
            Error::Core(textforge_core::Error::unknown_transformation("x")),
            Error::Server(textforge_server::ServerError::EmptyListenAddr),
            Error::FileNotFound {
                path: PathBuf::from("missing.yaml"),
            },
            Error::config("bad"),
            Error::invalid_args("bad"),
            Error::other("bad"),
        ];
        let mut codes: Vec<i32> = errors.iter().map(Error::exit_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
        assert!(codes.iter().all(|code| *code != 0));
    }

    #[test]
    fn test_format_unknown_transformation_lists_vocabulary() {
        let error = Error::Core(textforge_core::Error::unknown_transformation("uppercase"));
        let formatted = format_error(&error, false);
        assert!(formatted.starts_with("Error: unknown transformation `uppercase`"));
        assert!(formatted.contains("Known transformations: upper, lower, capitalize"));
        assert!(formatted.ends_with("numbertotext"));
    }

    #[test]
    fn test_format_plain_error() {
        let error = Error::config("listen address missing");
        assert_eq!(
            format_error(&error, false),
            "Error: Configuration error: listen address missing"
        );
        assert!(!error.should_show_help());
        assert!(Error::invalid_args("x").should_show_help());
    }
}
