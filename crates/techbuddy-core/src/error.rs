use thiserror::Error;

/// Top-level error type for the TechBuddy system.
///
/// Turn-level failures (invalid survey answers, completion backend errors)
/// never surface here: the session engine folds them into its turn result.
/// This type covers startup and infrastructure failures only.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TechBuddyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Completion backend error: {0}")]
    Gateway(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for TechBuddyError {
    fn from(err: toml::de::Error) -> Self {
        TechBuddyError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for TechBuddyError {
    fn from(err: toml::ser::Error) -> Self {
        TechBuddyError::Config(err.to_string())
    }
}

/// A specialized `Result` type for TechBuddy operations.
pub type Result<T> = std::result::Result<T, TechBuddyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TechBuddyError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_error_display_all_variants() {
        let cases: Vec<(TechBuddyError, &str)> = vec![
            (
                TechBuddyError::Config("bad key".to_string()),
                "Configuration error: bad key",
            ),
            (
                TechBuddyError::Gateway("status 500".to_string()),
                "Completion backend error: status 500",
            ),
            (
                TechBuddyError::Api("bind failed".to_string()),
                "API error: bind failed",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TechBuddyError = io_err.into();
        assert!(matches!(err, TechBuddyError::Io(_)));
        assert!(err.to_string().starts_with("I/O error:"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_toml_de() {
        let err: std::result::Result<toml::Value, _> = toml::from_str("invalid = [[[");
        let converted: TechBuddyError = err.unwrap_err().into();
        assert!(matches!(converted, TechBuddyError::Config(_)));
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn inner() -> Result<String> {
            let io_result: std::result::Result<i32, std::io::Error> = Ok(42);
            let value = io_result?;
            Ok(format!("got {}", value))
        }

        assert_eq!(inner().unwrap(), "got 42");
    }
}
