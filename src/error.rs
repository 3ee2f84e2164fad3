//! Error types for chatfmt.

use thiserror::Error;

/// Common error type for chatfmt.
///
/// The formatting pipeline itself never fails; these errors come from
/// loading configuration and setting up logging.
#[derive(Error, Debug)]
pub enum ChatFmtError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for ChatFmtError {
    fn from(e: toml::de::Error) -> Self {
        ChatFmtError::Config(e.to_string())
    }
}

/// Result type alias for chatfmt operations.
pub type Result<T> = std::result::Result<T, ChatFmtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ChatFmtError::Config("unexpected key".to_string());
        assert_eq!(err.to_string(), "configuration error: unexpected key");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ChatFmtError = io_err.into();
        assert!(matches!(err, ChatFmtError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Table>("not [valid").unwrap_err();
        let err: ChatFmtError = toml_err.into();
        assert!(matches!(err, ChatFmtError::Config(_)));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(ChatFmtError::Config("test".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
