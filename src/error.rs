//! Error types shared by the extractor and the server configuration.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ArcanaError>;

/// Failures that abort an extraction run.
///
/// Malformed blocks and sections are never errors; they are skipped and
/// counted in the extraction stats.
#[derive(Debug, Error)]
pub enum ArcanaError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize arcana descriptions: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Environment configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value {value:?} for environment variable {name}")]
    InvalidVar { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_mentions_path() {
        let err = ArcanaError::Read {
            path: PathBuf::from("arakan.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let message = err.to_string();
        assert!(message.contains("arakan.txt"));
        assert!(message.contains("no such file"));
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::MissingVar("YOOKASSA_SHOP_ID").to_string(),
            "missing required environment variable YOOKASSA_SHOP_ID"
        );
        let invalid = ConfigError::InvalidVar { name: "PORT", value: "abc".to_string() };
        assert_eq!(invalid.to_string(), "invalid value \"abc\" for environment variable PORT");
    }
}
