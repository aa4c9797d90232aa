//! HTTP transport seam
//!
//! The client never talks to the network directly; it hands a fully built
//! URL to an [`HttpTransport`] and interprets whatever comes back.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;
use url::Url;

use crate::{WeatherApiConfig, WeatherApiError};

/// Raw HTTP response as seen by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body, undecoded
    pub body: String,
}

impl HttpResponse {
    /// Create a response from a status code and body
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Blocking HTTP GET capability
///
/// Implementations must not retry; every failure is reported to the caller.
#[cfg_attr(test, mockall::automock)]
pub trait HttpTransport: Send + Sync {
    /// Perform a GET request against `url`
    ///
    /// Non-2xx statuses are *not* errors at this level and come back as a
    /// regular [`HttpResponse`].
    ///
    /// # Errors
    ///
    /// Returns an error if no response could be obtained.
    fn get(&self, url: &Url) -> Result<HttpResponse, WeatherApiError>;
}

/// Default transport backed by a blocking `reqwest` client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout_secs: u64,
}

impl ReqwestTransport {
    /// Create a transport honouring the configured timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &WeatherApiConfig) -> Result<Self, WeatherApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherApiError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: config.timeout_secs,
        })
    }

    fn map_error(&self, e: reqwest::Error) -> WeatherApiError {
        // The URL carries the API key.
        let e = e.without_url();
        if e.is_timeout() {
            WeatherApiError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else if e.is_connect() {
            WeatherApiError::ConnectionFailed(e.to_string())
        } else {
            WeatherApiError::RequestFailed(e.to_string())
        }
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &Url) -> Result<HttpResponse, WeatherApiError> {
        let response = self
            .client
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .map_err(|e| self.map_error(e))?;

        let status = response.status().as_u16();
        debug!(status, "Received WeatherAPI response");

        let body = response.text().map_err(|e| self.map_error(e))?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_success_range() {
        assert!(HttpResponse::new(200, "{}").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(301, "").is_success());
        assert!(!HttpResponse::new(400, "").is_success());
        assert!(!HttpResponse::new(503, "").is_success());
    }

    #[test]
    fn test_transport_creation() {
        let transport = ReqwestTransport::new(&WeatherApiConfig::default());
        assert!(transport.is_ok());
    }

    #[test]
    fn test_mock_transport_returns_configured_response() {
        let mut mock = MockHttpTransport::new();
        mock.expect_get()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"ok":true}"#)));

        let url = Url::parse("https://example.com/v1/current.json").unwrap();
        let response = mock.get(&url).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, r#"{"ok":true}"#);
    }
}
