//! All error types for the catalint crate.
//!
//! These are returned from fallible library operations (loading and saving
//! catalogs, configuration, path manipulation, source discovery). Problems
//! found *inside* catalogs are not errors; they are [`crate::Finding`]s.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid key path `{0}`")]
    InvalidPath(String),

    #[error("path conflict at `{at}` while setting `{path}`")]
    PathConflict { path: String, at: String },

    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("invalid pattern: {0}")]
    Pattern(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Creates a new configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    /// Creates a new path conflict error
    pub fn path_conflict(path: impl Into<String>, at: impl Into<String>) -> Self {
        Error::PathConflict {
            path: path.into(),
            at: at.into(),
        }
    }

    /// Creates a new validation error
    pub fn validation_error(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }
}

impl From<toml::de::Error> for Error {
    fn from(value: toml::de::Error) -> Self {
        Error::Config(format!("toml parse error: {}", value))
    }
}

impl From<regex::Error> for Error {
    fn from(value: regex::Error) -> Self {
        Error::Pattern(value.to_string())
    }
}

impl From<globset::Error> for Error {
    fn from(value: globset::Error) -> Self {
        Error::Pattern(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_parse_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("{ invalid json }").unwrap_err();
        let error = Error::Parse(json_error);
        assert!(error.to_string().contains("parse error"));
    }

    #[test]
    fn test_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = Error::Io(io_error);
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_path_conflict_error() {
        let error = Error::path_conflict("profile.bio.short", "profile.bio");
        assert_eq!(
            error.to_string(),
            "path conflict at `profile.bio` while setting `profile.bio.short`"
        );
    }

    #[test]
    fn test_invalid_path_error() {
        let error = Error::InvalidPath("a..b".to_string());
        assert_eq!(error.to_string(), "invalid key path `a..b`");
    }

    #[test]
    fn test_toml_error_maps_to_config() {
        let toml_error = toml::from_str::<toml::Value>("= nope").unwrap_err();
        let error = Error::from(toml_error);
        assert!(matches!(error, Error::Config(_)));
        assert!(error.to_string().starts_with("configuration error: toml parse error"));
    }

    #[test]
    fn test_validation_error() {
        let error = Error::validation_error("Validation failed");
        assert_eq!(error.to_string(), "validation error: Validation failed");
    }
}
