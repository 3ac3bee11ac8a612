//! Error handling for bin-forge

use thiserror::Error;

/// Main error type for bin-forge
#[derive(Error, Debug, Clone)]
pub enum BinForgeError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        url: Option<String>,
    },

    #[error("Timeout error: {operation} timed out after {timeout_ms}ms")]
    Timeout {
        operation: String,
        timeout_ms: u64,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        content: Option<String>,
    },

    #[error("Import error: {message}")]
    Import {
        message: String,
        path: Option<String>,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("CLI error: {message}")]
    Cli { message: String },
}

impl BinForgeError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(
        message: impl Into<String>,
        status_code: Option<u16>,
        url: Option<String>,
    ) -> Self {
        Self::Network {
            message: message.into(),
            status_code,
            url,
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>, content: Option<String>) -> Self {
        Self::Parse {
            message: message.into(),
            content,
        }
    }

    /// Create an import error
    pub fn import(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Import {
            message: message.into(),
            path,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a CLI error
    pub fn cli(message: impl Into<String>) -> Self {
        Self::Cli {
            message: message.into(),
        }
    }

    /// True when the remote side answered that it has no data for the key.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Network { status_code: Some(404), .. })
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message } => {
                format!("❌ Configuration problem: {}\n💡 Check your .env file or environment", message)
            }
            Self::Validation { message } => {
                format!("❌ {}\n💡 Expected BIN|MM|YYYY|CVV, e.g. 477349002646|05|2027|123", message)
            }
            Self::Network { message, status_code, .. } => {
                let status = status_code.map_or(String::new(), |c| format!(" ({})", c));
                format!("❌ Network error{}: {}\n💡 Check your internet connection", status, message)
            }
            Self::Timeout { operation, timeout_ms } => {
                format!("⏱️  Operation '{}' timed out after {}ms\n💡 Try raising BIN_FORGE_TIER_TIMEOUT_MS", operation, timeout_ms)
            }
            Self::Parse { message, .. } => {
                format!("❌ Parse error: {}", message)
            }
            Self::Import { message, path } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" ({})", p));
                format!("⚠️  BIN database not loaded{}: {}\n💡 Local lookups will miss until it loads", path_info, message)
            }
            Self::Internal { message } => {
                format!("❌ Internal error: {}\n💡 This is a bug, please report it", message)
            }
            Self::Cli { message } => {
                format!("❌ Command error: {}\n💡 Use --help for usage information", message)
            }
        }
    }
}

impl From<reqwest::Error> for BinForgeError {
    fn from(err: reqwest::Error) -> Self {
        let status_code = err.status().map(|s| s.as_u16());
        let url = err.url().map(|u| u.to_string());

        if err.is_timeout() {
            Self::network("Request timed out", status_code, url)
        } else if err.is_connect() {
            Self::network("Connection failed", status_code, url)
        } else if err.is_decode() {
            Self::parse(err.to_string(), None)
        } else {
            Self::network(err.to_string(), status_code, url)
        }
    }
}

impl From<serde_json::Error> for BinForgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string(), None)
    }
}

impl From<csv_async::Error> for BinForgeError {
    fn from(err: csv_async::Error) -> Self {
        Self::import(err.to_string(), None)
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, BinForgeError>;

/// Helper macros for common error patterns
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::BinForgeError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::BinForgeError::config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr) => {
        $crate::error::BinForgeError::validation($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::BinForgeError::validation(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::error::BinForgeError::internal($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::BinForgeError::internal(format!($fmt, $($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        let err = BinForgeError::network("missing", Some(404), None);
        assert!(err.is_not_found());

        let err = BinForgeError::network("throttled", Some(429), None);
        assert!(!err.is_not_found());
        assert!(!BinForgeError::timeout("lookup", 3000).is_not_found());
    }

    #[test]
    fn test_macros() {
        let err = validation_error!("bad month {}", "13");
        assert!(err.to_string().contains("bad month 13"));

        let err = config_error!("missing key");
        assert!(matches!(err, BinForgeError::Config { .. }));
    }

    #[test]
    fn test_json_error_becomes_parse() {
        let err: BinForgeError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, BinForgeError::Parse { .. }));
    }

    #[test]
    fn test_timeout_message() {
        let err = BinForgeError::timeout("binlist lookup", 3000);
        assert_eq!(err.to_string(), "Timeout error: binlist lookup timed out after 3000ms");
        assert!(err.user_message().contains("BIN_FORGE_TIER_TIMEOUT_MS"));
    }

    #[test]
    fn test_internal_macro() {
        let err = internal_error!("broken regex {}", "^(");
        assert!(matches!(err, BinForgeError::Internal { .. }));
        assert!(err.user_message().contains("broken regex ^("));
    }

    #[test]
    fn test_user_message_mentions_path() {
        let err = BinForgeError::import("file not found", Some("bins.csv".to_string()));
        assert!(err.user_message().contains("bins.csv"));
    }
}
