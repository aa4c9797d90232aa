#![forbid(unsafe_code)]
//! WeatherAPI.com integration
//!
//! Blocking client for the WeatherAPI.com JSON API (<https://www.weatherapi.com>).
//! Provides current conditions and multi-day forecasts, plus accessors that
//! pull a single field out of the raw response.
//!
//! # Architecture
//!
//! [`WeatherClient`] builds the request URL and interprets the response.
//! The network hop goes through the [`HttpTransport`] trait, implemented by
//! [`ReqwestTransport`] for real traffic and by mocks in tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_weatherapi::WeatherClient;
//!
//! let client = WeatherClient::new("my-api-key", "Paris")?;
//! let temp = client.current_field_value("temp_c")?;
//! let tomorrow = client.forecast_day_condition_text(2)?;
//! println!("{temp} now, {tomorrow} tomorrow");
//! ```

mod client;
mod config;
mod error;
mod models;
mod transport;

pub use client::{DEFAULT_HOUR, WeatherClient};
pub use config::WeatherApiConfig;
pub use error::WeatherApiError;
pub use models::{AirQuality, CurrentWeather, ForecastDay, ForecastRequest};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
