use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreasurerError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("No league matching '{name}' found")]
    LeagueNotFound { name: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TreasurerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TreasurerError::ApiError(_) => ErrorCategory::Network,
            TreasurerError::ConfigError { .. }
            | TreasurerError::ConfigValidationError { .. }
            | TreasurerError::InvalidConfigValueError { .. }
            | TreasurerError::MissingConfigError { .. } => ErrorCategory::Configuration,
            TreasurerError::CsvError(_)
            | TreasurerError::SerializationError(_)
            | TreasurerError::LeagueNotFound { .. }
            | TreasurerError::ProcessingError { .. } => ErrorCategory::Data,
            TreasurerError::ZipError(_) | TreasurerError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TreasurerError::LeagueNotFound { .. } => ErrorSeverity::Low,
            TreasurerError::ApiError(_) => ErrorSeverity::Medium,
            TreasurerError::ConfigError { .. }
            | TreasurerError::ConfigValidationError { .. }
            | TreasurerError::InvalidConfigValueError { .. }
            | TreasurerError::MissingConfigError { .. }
            | TreasurerError::CsvError(_)
            | TreasurerError::SerializationError(_)
            | TreasurerError::ProcessingError { .. } => ErrorSeverity::High,
            TreasurerError::ZipError(_) | TreasurerError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check the network connection and that the access token has not expired"
            }
            ErrorCategory::Configuration => {
                "Review the TOML configuration file and the environment variables it references"
            }
            ErrorCategory::Data => match self {
                TreasurerError::LeagueNotFound { .. } => {
                    "Run the `leagues` command to list the leagues available to this account"
                }
                _ => "Re-run with --verbose to see which response could not be processed",
            },
            ErrorCategory::System => "Check that the output directory exists and is writable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TreasurerError::ApiError(_) => {
                "Could not reach the fantasy sports API.".to_string()
            }
            TreasurerError::LeagueNotFound { name } => {
                format!("No league named like '{}' was found.", name)
            }
            TreasurerError::MissingConfigError { field } => {
                format!("The configuration is missing '{}'.", field)
            }
            TreasurerError::InvalidConfigValueError { field, reason, .. } => {
                format!("The configuration value for '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TreasurerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = TreasurerError::MissingConfigError {
            field: "prizes.first".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("prizes.first"));
    }

    #[test]
    fn test_league_not_found_is_low_severity() {
        let err = TreasurerError::LeagueNotFound {
            name: "x-lte".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert!(err.recovery_suggestion().contains("leagues"));
    }
}
