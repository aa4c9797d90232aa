//! WeatherAPI CLI
//!
//! Command-line front end for the WeatherAPI client. Each invocation makes a
//! single request and prints one value.

#![allow(clippy::print_stdout)]

mod config;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use integration_weatherapi::{AirQuality, DEFAULT_HOUR, ForecastRequest, WeatherClient};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;

/// WeatherAPI CLI
#[derive(Parser)]
#[command(name = "weatherapi-cli")]
#[command(version, about = "Query WeatherAPI.com from the command line", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (extension optional)
    #[arg(short, long, default_value = "weatherapi", global = true)]
    config: String,

    /// Location query, overrides the configured location
    #[arg(short, long, global = true)]
    location: Option<String>,

    /// API key, overrides the configured key
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the whole `current` object
    Current {
        /// Include air quality data
        #[arg(long)]
        aqi: bool,
    },

    /// Print one current field
    ///
    /// Example: weatherapi-cli field temp_c
    Field {
        /// Field name, e.g. "temp_c" or "humidity"
        name: String,
    },

    /// Print the current condition text
    Condition,

    /// Print the `forecast.forecastday` array
    Forecast {
        /// Number of days to request
        #[arg(short, long, default_value_t = 1)]
        days: u8,

        /// Hour forwarded to the service
        #[arg(long)]
        hour: Option<u8>,

        /// Include air quality data
        #[arg(long)]
        aqi: bool,
    },

    /// Print one daily aggregate field
    ///
    /// Example: weatherapi-cli day-field avgtemp_c --day 3
    DayField {
        /// Field name, e.g. "maxtemp_c" or "daily_will_it_snow"
        name: String,

        /// Day, 1 is today
        #[arg(short, long, default_value_t = 1)]
        day: u8,
    },

    /// Print one hourly field
    ///
    /// Example: weatherapi-cli hour-field temp_c --day 2 --hour 13
    HourField {
        /// Field name, e.g. "temp_c" or "chance_of_rain"
        name: String,

        /// Hour, 1 to 24
        #[arg(long, default_value_t = DEFAULT_HOUR)]
        hour: u8,

        /// Day, 1 is today
        #[arg(short, long, default_value_t = 1)]
        day: u8,
    },

    /// Print the condition text of a forecast day
    DayCondition {
        /// Day, 1 is today
        #[arg(short, long, default_value_t = 1)]
        day: u8,
    },

    /// Print the condition text for an hour of a forecast day
    ///
    /// The service only reports conditions per day here, so this prints the
    /// same text as day-condition.
    HourCondition {
        /// Day, 1 is today
        #[arg(short, long, default_value_t = 1)]
        day: u8,

        /// Hour, 1 to 24
        #[arg(long, default_value_t = DEFAULT_HOUR)]
        hour: u8,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Build the client, letting command-line flags win over configuration
fn build_client(cli: &Cli, config: AppConfig) -> anyhow::Result<WeatherClient> {
    let api_key = cli
        .api_key
        .clone()
        .map(SecretString::from)
        .or(config.api_key)
        .ok_or_else(|| {
            anyhow!("No API key configured (use --api-key, WEATHERAPI_API_KEY or api_key in the config file)")
        })?;

    let location = cli.location.clone().or(config.location).ok_or_else(|| {
        anyhow!("No location configured (use --location, WEATHERAPI_LOCATION or location in the config file)")
    })?;

    debug!(location = %location, base_url = %config.weather.base_url, "Creating WeatherAPI client");

    WeatherClient::with_config(api_key.expose_secret(), location, config.weather)
        .context("Failed to create WeatherAPI client")
}

/// Format a JSON value for the terminal: strings bare, everything else pretty
fn render(value: &Value) -> anyhow::Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Ok(serde_json::to_string_pretty(other)?),
    }
}

/// Run a single command and return what should be printed
fn execute(client: &WeatherClient, command: &Commands) -> anyhow::Result<String> {
    let output = match command {
        Commands::Current { aqi } => {
            let current = client.fetch_current(AirQuality::from(*aqi))?;
            serde_json::to_string_pretty(&current)?
        },
        Commands::Field { name } => render(&client.current_field_value(name)?)?,
        Commands::Condition => client.current_condition_text()?,
        Commands::Forecast { days, hour, aqi } => {
            let mut request =
                ForecastRequest::for_days(*days).with_air_quality(AirQuality::from(*aqi));
            request.hour = *hour;
            let forecast = client.fetch_forecast(request)?;
            serde_json::to_string_pretty(&forecast)?
        },
        Commands::DayField { name, day } => {
            render(&client.forecast_day_field_value(name, *day)?)?
        },
        Commands::HourField { name, hour, day } => {
            render(&client.forecast_hour_field_value(name, *hour, *day)?)?
        },
        Commands::DayCondition { day } => client.forecast_day_condition_text(*day)?,
        Commands::HourCondition { day, hour } => {
            client.forecast_hour_condition_text(*day, *hour)?
        },
    };

    Ok(output)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout only carries the requested value
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(log_filter_from_verbosity(
            cli.verbose,
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config))?;
    let client = build_client(&cli, config)?;

    let output = execute(&client, &cli.command)?;
    println!("{output}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use serde_json::json;

    use super::*;

    fn parse_args(args: &[&str]) -> Result<Cli, clap::Error> {
        let os_args: Vec<OsString> = args.iter().map(OsString::from).collect();
        Cli::try_parse_from(os_args)
    }

    #[test]
    fn cli_parses_field_command() {
        let cli = parse_args(&["weatherapi-cli", "field", "temp_c"]).unwrap();
        if let Commands::Field { name } = cli.command {
            assert_eq!(name, "temp_c");
        } else {
            panic!("Expected Field command");
        }
        assert_eq!(cli.config, "weatherapi");
        assert!(cli.location.is_none());
    }

    #[test]
    fn cli_field_requires_name() {
        assert!(parse_args(&["weatherapi-cli", "field"]).is_err());
    }

    #[test]
    fn cli_hour_field_defaults() {
        let cli = parse_args(&["weatherapi-cli", "hour-field", "temp_c"]).unwrap();
        if let Commands::HourField { name, hour, day } = cli.command {
            assert_eq!(name, "temp_c");
            assert_eq!(hour, 12);
            assert_eq!(day, 1);
        } else {
            panic!("Expected HourField command");
        }
    }

    #[test]
    fn cli_hour_field_with_day_and_hour() {
        let cli = parse_args(&[
            "weatherapi-cli",
            "hour-field",
            "temp_c",
            "--day",
            "2",
            "--hour",
            "13",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::HourField { hour: 13, day: 2, .. }
        ));
    }

    #[test]
    fn cli_forecast_options() {
        let cli = parse_args(&["weatherapi-cli", "forecast", "-d", "3", "--aqi"]).unwrap();
        if let Commands::Forecast { days, hour, aqi } = cli.command {
            assert_eq!(days, 3);
            assert_eq!(hour, None);
            assert!(aqi);
        } else {
            panic!("Expected Forecast command");
        }
    }

    #[test]
    fn cli_global_options_after_subcommand() {
        let cli = parse_args(&[
            "weatherapi-cli",
            "condition",
            "--location",
            "Berlin",
            "-vv",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Condition));
        assert_eq!(cli.location.as_deref(), Some("Berlin"));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn cli_rejects_day_out_of_u8_range() {
        assert!(parse_args(&["weatherapi-cli", "day-condition", "--day", "300"]).is_err());
    }

    #[test]
    fn cli_rejects_unknown_command() {
        assert!(parse_args(&["weatherapi-cli", "radar"]).is_err());
    }

    #[test]
    fn test_log_filter_from_verbosity() {
        assert_eq!(log_filter_from_verbosity(0), "warn");
        assert_eq!(log_filter_from_verbosity(1), "info");
        assert_eq!(log_filter_from_verbosity(2), "debug");
        assert_eq!(log_filter_from_verbosity(7), "trace");
    }

    #[test]
    fn test_render_values() {
        assert_eq!(render(&json!("Sunny")).unwrap(), "Sunny");
        assert_eq!(render(&json!(12.5)).unwrap(), "12.5");
        assert_eq!(
            render(&json!({ "text": "Sunny" })).unwrap(),
            "{\n  \"text\": \"Sunny\"\n}"
        );
    }

    #[test]
    fn test_build_client_prefers_flags() {
        let cli = parse_args(&[
            "weatherapi-cli",
            "condition",
            "--api-key",
            "flag-key",
            "--location",
            "Nantes",
        ])
        .unwrap();
        let config = AppConfig {
            api_key: Some(SecretString::from("config-key")),
            location: Some("Lyon".to_string()),
            ..Default::default()
        };

        let client = build_client(&cli, config).unwrap();
        assert_eq!(client.location(), "Nantes");
    }

    #[test]
    fn test_build_client_falls_back_to_config() {
        let cli = parse_args(&["weatherapi-cli", "condition"]).unwrap();
        let config = AppConfig {
            api_key: Some(SecretString::from("config-key")),
            location: Some("Lyon".to_string()),
            ..Default::default()
        };

        let client = build_client(&cli, config).unwrap();
        assert_eq!(client.location(), "Lyon");
    }

    #[test]
    fn test_build_client_requires_api_key() {
        let cli = parse_args(&["weatherapi-cli", "condition", "--location", "Lyon"]).unwrap();
        let err = build_client(&cli, AppConfig::default()).unwrap_err();
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn test_build_client_requires_location() {
        let cli = parse_args(&["weatherapi-cli", "condition", "--api-key", "k"]).unwrap();
        let err = build_client(&cli, AppConfig::default()).unwrap_err();
        assert!(err.to_string().contains("location"));
    }
}
