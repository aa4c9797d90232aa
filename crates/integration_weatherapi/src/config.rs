//! WeatherAPI client configuration

use serde::{Deserialize, Serialize};
use url::Url;

use crate::WeatherApiError;

/// Transport and endpoint settings for the WeatherAPI client
///
/// The API key and location are not part of this struct; they are passed to
/// [`crate::WeatherClient`] directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherApiConfig {
    /// WeatherAPI base URL (default: <https://api.weatherapi.com/v1>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Language of condition texts in forecasts (default: "fr")
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_base_url() -> String {
    "https://api.weatherapi.com/v1".to_string()
}

const fn default_timeout() -> u64 {
    30
}

fn default_language() -> String {
    "fr".to_string()
}

impl Default for WeatherApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            language: default_language(),
        }
    }
}

impl WeatherApiConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute http(s) URL or the
    /// timeout is zero.
    pub fn validate(&self) -> Result<(), WeatherApiError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| WeatherApiError::Configuration(format!("base_url: {e}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(WeatherApiError::Configuration(format!(
                "base_url must use http or https, got {}",
                url.scheme()
            )));
        }

        if self.timeout_secs == 0 {
            return Err(WeatherApiError::Configuration(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
