//! WeatherAPI error types

use thiserror::Error;

/// Errors that can occur while talking to WeatherAPI or reading its payloads
#[derive(Debug, Error)]
pub enum WeatherApiError {
    /// Connection to the weather service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request to the weather service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The configured timeout in seconds
        timeout_secs: u64,
    },

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// WeatherAPI answered with its own error object
    ///
    /// See <https://www.weatherapi.com/docs/#intro-error-codes> for the codes.
    #[error("WeatherAPI error {code} (HTTP {status}): {message}")]
    Api {
        /// HTTP status of the response
        status: u16,
        /// WeatherAPI internal error code (e.g. 1006 for unknown location)
        code: i64,
        /// Human-readable message from the service
        message: String,
    },

    /// Failed to parse response from weather service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A key was not present in the response
    #[error("Missing field: {path}")]
    MissingField {
        /// Dotted path of the missing key, e.g. `day.condition.text`
        path: String,
    },

    /// A value was present but had the wrong JSON type
    #[error("Unexpected type at {path}: expected {expected}")]
    UnexpectedType {
        /// Dotted path of the offending value
        path: String,
        /// JSON type that was expected
        expected: &'static str,
    },

    /// A 1-based day or hour position is outside what the service returned
    #[error("{what} {position} is out of range ({available} available)")]
    OutOfRange {
        /// What was being indexed ("day" or "hour")
        what: &'static str,
        /// Requested 1-based position
        position: usize,
        /// Number of entries actually returned
        available: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Request URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl WeatherApiError {
    /// Returns true if a caller could reasonably try the same request again
    ///
    /// The client itself never retries.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::RequestFailed(_)
                | Self::ServiceUnavailable(_)
                | Self::Timeout { .. }
                | Self::RateLimitExceeded
        )
    }

    /// Returns true if the response arrived but did not contain what was asked for
    #[must_use]
    pub const fn is_lookup(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. } | Self::UnexpectedType { .. } | Self::OutOfRange { .. }
        )
    }

    pub(crate) fn missing(path: impl Into<String>) -> Self {
        Self::MissingField { path: path.into() }
    }

    pub(crate) fn unexpected(path: impl Into<String>, expected: &'static str) -> Self {
        Self::UnexpectedType {
            path: path.into(),
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(WeatherApiError::ConnectionFailed("test".to_string()).is_retryable());
        assert!(WeatherApiError::ServiceUnavailable("test".to_string()).is_retryable());
        assert!(WeatherApiError::Timeout { timeout_secs: 30 }.is_retryable());
        assert!(WeatherApiError::RateLimitExceeded.is_retryable());

        assert!(!WeatherApiError::ParseError("test".to_string()).is_retryable());
        assert!(!WeatherApiError::missing("temp_c").is_retryable());
        assert!(
            !WeatherApiError::Api {
                status: 400,
                code: 1006,
                message: "No matching location found.".to_string(),
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_lookup_errors() {
        assert!(WeatherApiError::missing("temp_c").is_lookup());
        assert!(WeatherApiError::unexpected("hour", "array").is_lookup());
        assert!(
            WeatherApiError::OutOfRange {
                what: "day",
                position: 4,
                available: 3,
            }
            .is_lookup()
        );

        assert!(!WeatherApiError::ParseError("eof".to_string()).is_lookup());
        assert!(!WeatherApiError::RateLimitExceeded.is_lookup());
    }

    #[test]
    fn test_error_display() {
        let err = WeatherApiError::OutOfRange {
            what: "hour",
            position: 25,
            available: 24,
        };
        assert_eq!(err.to_string(), "hour 25 is out of range (24 available)");

        let err = WeatherApiError::missing("day.condition.text");
        assert!(err.to_string().contains("day.condition.text"));

        let err = WeatherApiError::Api {
            status: 403,
            code: 2008,
            message: "API key has been disabled.".to_string(),
        };
        assert!(err.to_string().contains("2008"));
        assert!(err.to_string().contains("403"));
    }
}
