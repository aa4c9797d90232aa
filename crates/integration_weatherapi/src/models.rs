//! Weather data models
//!
//! WeatherAPI payloads are kept as raw JSON objects. Callers pick fields by
//! name, so nothing here knows about units or field semantics; lookups just
//! fail loudly when a key or position is missing.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::WeatherApiError;

/// Air quality data flag (`aqi` query parameter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AirQuality {
    /// Include air quality data
    Yes,
    /// Omit air quality data
    #[default]
    No,
}

impl AirQuality {
    /// Value sent on the wire
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

impl From<bool> for AirQuality {
    fn from(include: bool) -> Self {
        if include { Self::Yes } else { Self::No }
    }
}

impl fmt::Display for AirQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of a forecast request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastRequest {
    /// Air quality flag
    pub aqi: AirQuality,
    /// Number of forecast days requested
    pub days: u8,
    /// Hour forwarded to the service; omitted from the query when `None`
    pub hour: Option<u8>,
}

impl Default for ForecastRequest {
    fn default() -> Self {
        Self {
            aqi: AirQuality::No,
            days: 1,
            hour: None,
        }
    }
}

impl ForecastRequest {
    /// Request `days` days of forecast with the default flags
    #[must_use]
    pub const fn for_days(days: u8) -> Self {
        Self {
            aqi: AirQuality::No,
            days,
            hour: None,
        }
    }

    /// Forward an hour to the service
    #[must_use]
    pub const fn with_hour(mut self, hour: u8) -> Self {
        self.hour = Some(hour);
        self
    }

    /// Set the air quality flag
    #[must_use]
    pub const fn with_air_quality(mut self, aqi: AirQuality) -> Self {
        self.aqi = aqi;
        self
    }
}

/// The `current` object of a `current.json` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrentWeather(Map<String, Value>);

impl CurrentWeather {
    /// Wrap a raw JSON object
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Borrow the raw object
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Take the raw object
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Value of a top-level field such as `temp_c` or `humidity`
    ///
    /// # Errors
    ///
    /// Returns [`WeatherApiError::MissingField`] if the key is absent.
    pub fn field(&self, name: &str) -> Result<&Value, WeatherApiError> {
        value_at(&self.0, name, "")
    }

    /// `condition.text`, e.g. "Partly cloudy"
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the path is absent or not a string.
    pub fn condition_text(&self) -> Result<&str, WeatherApiError> {
        condition_text(&self.0, "")
    }
}

/// One entry of `forecast.forecastday`
///
/// Holds a `day` object of daily aggregates and an `hour` array of hourly
/// objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForecastDay(Map<String, Value>);

impl ForecastDay {
    /// Wrap a raw JSON object
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Borrow the raw object
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// The `day` aggregates object
    ///
    /// # Errors
    ///
    /// Returns a lookup error if `day` is absent or not an object.
    pub fn day(&self) -> Result<&Map<String, Value>, WeatherApiError> {
        object_at(&self.0, "day", "")
    }

    /// Value of `day.<name>`, e.g. `avgtemp_c`
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the path is absent.
    pub fn day_field(&self, name: &str) -> Result<&Value, WeatherApiError> {
        value_at(self.day()?, name, "day")
    }

    /// `day.condition.text`
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the path is absent or not a string.
    pub fn condition_text(&self) -> Result<&str, WeatherApiError> {
        condition_text(self.day()?, "day")
    }

    /// The `hour` array
    ///
    /// # Errors
    ///
    /// Returns a lookup error if `hour` is absent or not an array.
    pub fn hours(&self) -> Result<&[Value], WeatherApiError> {
        value_at(&self.0, "hour", "")?
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| WeatherApiError::unexpected("hour", "array"))
    }

    /// Hourly object at 1-based `position`
    ///
    /// # Errors
    ///
    /// Returns [`WeatherApiError::OutOfRange`] for position 0 or past the end.
    pub fn hour(&self, position: usize) -> Result<&Map<String, Value>, WeatherApiError> {
        let entry = nth(self.hours()?, position, "hour")?;
        entry
            .as_object()
            .ok_or_else(|| WeatherApiError::unexpected(hour_path(position), "object"))
    }

    /// Value of `hour[position - 1].<name>`
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the position or key is absent.
    pub fn hour_field(&self, position: usize, name: &str) -> Result<&Value, WeatherApiError> {
        value_at(self.hour(position)?, name, &hour_path(position))
    }
}

/// 1-based positional access with an out-of-range error instead of a panic
pub(crate) fn nth<'a, T>(
    items: &'a [T],
    position: usize,
    what: &'static str,
) -> Result<&'a T, WeatherApiError> {
    position
        .checked_sub(1)
        .and_then(|index| items.get(index))
        .ok_or(WeatherApiError::OutOfRange {
            what,
            position,
            available: items.len(),
        })
}

fn hour_path(position: usize) -> String {
    format!("hour[{}]", position.saturating_sub(1))
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn value_at<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    prefix: &str,
) -> Result<&'a Value, WeatherApiError> {
    object
        .get(key)
        .ok_or_else(|| WeatherApiError::missing(join(prefix, key)))
}

fn object_at<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    prefix: &str,
) -> Result<&'a Map<String, Value>, WeatherApiError> {
    value_at(object, key, prefix)?
        .as_object()
        .ok_or_else(|| WeatherApiError::unexpected(join(prefix, key), "object"))
}

fn condition_text<'a>(
    object: &'a Map<String, Value>,
    prefix: &str,
) -> Result<&'a str, WeatherApiError> {
    let condition_path = join(prefix, "condition");
    value_at(object_at(object, "condition", prefix)?, "text", &condition_path)?
        .as_str()
        .ok_or_else(|| WeatherApiError::unexpected(join(&condition_path, "text"), "string"))
}

/// Envelope of a `current.json` response
#[derive(Debug, Deserialize)]
pub(crate) struct CurrentResponse {
    pub current: CurrentWeather,
}

/// Envelope of a `forecast.json` response
#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    pub forecast: ForecastBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastBody {
    pub forecastday: Vec<ForecastDay>,
}

/// Error body returned by WeatherAPI on 4xx responses
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub code: i64,
    pub message: String,
}
