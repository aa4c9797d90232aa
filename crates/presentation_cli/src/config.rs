//! CLI configuration
//!
//! Sources, later ones winning:
//! - optional config file (`weatherapi.toml` by default)
//! - `WEATHERAPI_*` environment variables, nested keys split on `__`
//!   (e.g. `WEATHERAPI_API_KEY`, `WEATHERAPI_WEATHER__TIMEOUT_SECS`)
//!
//! Command-line flags are applied on top by the caller.

use integration_weatherapi::WeatherApiConfig;
use secrecy::SecretString;
use serde::Deserialize;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "WEATHERAPI";

/// Configuration for the CLI
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// WeatherAPI key
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Location query (city, postcode, `lat,lon`, ...)
    #[serde(default)]
    pub location: Option<String>,

    /// Client settings
    #[serde(default)]
    pub weather: WeatherApiConfig,
}

impl AppConfig {
    /// Load configuration from the process environment and an optional file
    ///
    /// `path` may omit the extension; a missing file is not an error.
    pub fn load(path: &str) -> Result<Self, config::ConfigError> {
        Self::load_from(path, environment())
    }

    fn load_from(path: &str, env: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn env_from(vars: &[(&str, &str)]) -> config::Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        environment().source(Some(source))
    }

    fn write_config(dir: &tempfile::TempDir, contents: &str) -> String {
        let path = dir.path().join("weatherapi.toml");
        std::fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent");

        let config = AppConfig::load_from(&path.to_string_lossy(), env_from(&[])).unwrap();
        assert!(config.api_key.is_none());
        assert!(config.location.is_none());
        assert_eq!(config.weather, WeatherApiConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
api_key = "file-key"
location = "Lyon"

[weather]
timeout_secs = 10
language = "en"
"#,
        );

        let config = AppConfig::load_from(&path, env_from(&[])).unwrap();
        assert_eq!(
            config.api_key.as_ref().map(ExposeSecret::expose_secret),
            Some("file-key")
        );
        assert_eq!(config.location.as_deref(), Some("Lyon"));
        assert_eq!(config.weather.timeout_secs, 10);
        assert_eq!(config.weather.language, "en");
        assert_eq!(config.weather.base_url, "https://api.weatherapi.com/v1");
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "api_key = \"file-key\"\nlocation = \"Lyon\"\n");

        let config = AppConfig::load_from(
            &path,
            env_from(&[
                ("WEATHERAPI_API_KEY", "env-key"),
                ("WEATHERAPI_WEATHER__TIMEOUT_SECS", "5"),
            ]),
        )
        .unwrap();

        assert_eq!(
            config.api_key.as_ref().map(ExposeSecret::expose_secret),
            Some("env-key")
        );
        assert_eq!(config.location.as_deref(), Some("Lyon"));
        assert_eq!(config.weather.timeout_secs, 5);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some(SecretString::from("hunter2")),
            ..Default::default()
        };
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
