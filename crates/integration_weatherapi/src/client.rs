//! WeatherAPI client
//!
//! One blocking GET per call, no caching, no retries.

use std::{fmt, sync::Arc};

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::{
    AirQuality, CurrentWeather, ForecastDay, ForecastRequest, HttpTransport, ReqwestTransport,
    WeatherApiConfig, WeatherApiError,
    models::{ApiErrorResponse, CurrentResponse, ForecastResponse, nth},
};

const CURRENT_ENDPOINT: &str = "current.json";
const FORECAST_ENDPOINT: &str = "forecast.json";

/// Hour used by the hourly accessors when the caller has no preference
pub const DEFAULT_HOUR: u8 = 12;

/// WeatherAPI client bound to one API key and one location
///
/// The location is any query WeatherAPI understands: a city name, a
/// postcode, `lat,lon`, an IATA code and so on.
pub struct WeatherClient {
    api_key: SecretString,
    location: String,
    config: WeatherApiConfig,
    transport: Arc<dyn HttpTransport>,
}

impl fmt::Debug for WeatherClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherClient")
            .field("location", &self.location)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl WeatherClient {
    /// Create a client with the default configuration and HTTP transport
    ///
    /// Neither the key nor the location is validated; the service reports
    /// bad values on the first request.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(
        api_key: impl Into<String>,
        location: impl Into<String>,
    ) -> Result<Self, WeatherApiError> {
        Self::with_config(api_key, location, WeatherApiConfig::default())
    }

    /// Create a client with a custom configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn with_config(
        api_key: impl Into<String>,
        location: impl Into<String>,
        config: WeatherApiConfig,
    ) -> Result<Self, WeatherApiError> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(
            api_key,
            location,
            config,
            Arc::new(transport),
        ))
    }

    /// Create a client on top of an arbitrary transport
    pub fn with_transport(
        api_key: impl Into<String>,
        location: impl Into<String>,
        config: WeatherApiConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            location: location.into(),
            config,
            transport,
        }
    }

    /// The location every request is made for
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// The active configuration
    #[must_use]
    pub const fn config(&self) -> &WeatherApiConfig {
        &self.config
    }

    /// Build an endpoint URL carrying the shared `key` and `q` parameters
    fn endpoint_url(&self, endpoint: &str) -> Result<Url, WeatherApiError> {
        let base = self.config.base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/{endpoint}"))
            .map_err(|e| WeatherApiError::InvalidUrl(e.to_string()))?;

        url.query_pairs_mut()
            .append_pair("key", self.api_key.expose_secret())
            .append_pair("q", &self.location);

        Ok(url)
    }

    /// URL of the current weather endpoint
    pub(crate) fn current_url(&self, aqi: AirQuality) -> Result<Url, WeatherApiError> {
        let mut url = self.endpoint_url(CURRENT_ENDPOINT)?;
        url.query_pairs_mut().append_pair("aqi", aqi.as_str());
        Ok(url)
    }

    /// URL of the forecast endpoint
    pub(crate) fn forecast_url(&self, request: &ForecastRequest) -> Result<Url, WeatherApiError> {
        let mut url = self.endpoint_url(FORECAST_ENDPOINT)?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("aqi", request.aqi.as_str())
                .append_pair("days", &request.days.to_string());
            if let Some(hour) = request.hour {
                query.append_pair("hour", &hour.to_string());
            }
            query.append_pair("lang", &self.config.language);
        }
        Ok(url)
    }

    /// Perform the GET and decode the body into `T`
    fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, WeatherApiError> {
        debug!(endpoint = %url.path(), "Sending WeatherAPI request");

        let response = self.transport.get(url)?;

        if !response.is_success() {
            return Err(Self::status_error(response.status, &response.body));
        }

        serde_json::from_str(&response.body).map_err(|e| WeatherApiError::ParseError(e.to_string()))
    }

    /// Map a non-2xx response onto the error taxonomy
    fn status_error(status: u16, body: &str) -> WeatherApiError {
        if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(body) {
            warn!(
                status,
                code = api_error.error.code,
                message = %api_error.error.message,
                "WeatherAPI returned an error"
            );
            return WeatherApiError::Api {
                status,
                code: api_error.error.code,
                message: api_error.error.message,
            };
        }

        match status {
            429 => WeatherApiError::RateLimitExceeded,
            500..=599 => WeatherApiError::ServiceUnavailable(format!("HTTP {status}")),
            _ => WeatherApiError::RequestFailed(format!("HTTP {status}")),
        }
    }

    /// Fetch the `current` object
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the body is not JSON, or the
    /// body has no `current` object.
    #[instrument(skip(self), fields(location = %self.location))]
    pub fn fetch_current(&self, aqi: AirQuality) -> Result<CurrentWeather, WeatherApiError> {
        let url = self.current_url(aqi)?;
        let response: CurrentResponse = self.get_json(&url)?;
        Ok(response.current)
    }

    /// Fetch the `forecast.forecastday` sequence
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the body is not JSON, or the
    /// body has no `forecast.forecastday` array.
    #[instrument(skip(self), fields(location = %self.location))]
    pub fn fetch_forecast(
        &self,
        request: ForecastRequest,
    ) -> Result<Vec<ForecastDay>, WeatherApiError> {
        let url = self.forecast_url(&request)?;
        let response: ForecastResponse = self.get_json(&url)?;
        debug!(
            days = response.forecast.forecastday.len(),
            "Received forecast"
        );
        Ok(response.forecast.forecastday)
    }

    /// Current value of `field`, e.g. `temp_c` or `humidity`
    ///
    /// See <https://www.weatherapi.com/docs/#apis-realtime> for field names.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the field is absent, or any fetch error.
    pub fn current_field_value(&self, field: &str) -> Result<Value, WeatherApiError> {
        let current = self.fetch_current(AirQuality::No)?;
        current.field(field).cloned()
    }

    /// Current condition text, e.g. "Partly cloudy"
    ///
    /// # Errors
    ///
    /// Returns a lookup error if `condition.text` is absent, or any fetch error.
    pub fn current_condition_text(&self) -> Result<String, WeatherApiError> {
        let current = self.fetch_current(AirQuality::No)?;
        current.condition_text().map(str::to_owned)
    }

    /// Daily aggregate `field` for the 1-based `day`
    ///
    /// Day 0 is treated as day 1. Requests exactly `day` days of forecast.
    ///
    /// ```rust,ignore
    /// client.forecast_day_field_value("avgtemp_c", 3)?;          // 7.7
    /// client.forecast_day_field_value("daily_will_it_snow", 1)?; // 0
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`WeatherApiError::OutOfRange`] if the service returned fewer
    /// days, a lookup error if the field is absent, or any fetch error.
    pub fn forecast_day_field_value(&self, field: &str, day: u8) -> Result<Value, WeatherApiError> {
        let day = day.max(1);
        let forecast = self.fetch_forecast(ForecastRequest::for_days(day))?;
        nth(&forecast, usize::from(day), "day")?
            .day_field(field)
            .cloned()
    }

    /// Hourly `field` for the 1-based `hour` of the 1-based `day`
    ///
    /// `hour` 13 of `day` 2 is the entry at `forecastday[1].hour[12]`.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherApiError::OutOfRange`] if `day` or `hour` is 0 or
    /// past what the service returned, a lookup error if the field is absent,
    /// or any fetch error.
    pub fn forecast_hour_field_value(
        &self,
        field: &str,
        hour: u8,
        day: u8,
    ) -> Result<Value, WeatherApiError> {
        let forecast = self.fetch_forecast(ForecastRequest::for_days(day).with_hour(hour))?;
        nth(&forecast, usize::from(day), "day")?
            .hour_field(usize::from(hour), field)
            .cloned()
    }

    /// Daily condition text for the 1-based `day`
    ///
    /// # Errors
    ///
    /// Returns [`WeatherApiError::OutOfRange`] if `day` is 0 or past what the
    /// service returned, a lookup error if the text is absent, or any fetch
    /// error.
    pub fn forecast_day_condition_text(&self, day: u8) -> Result<String, WeatherApiError> {
        let forecast = self.fetch_forecast(ForecastRequest::for_days(day))?;
        nth(&forecast, usize::from(day), "day")?
            .condition_text()
            .map(str::to_owned)
    }

    /// Condition text for `day`, requested with `hour`
    ///
    /// The hour is forwarded to the service but the *daily* condition is
    /// returned, so the result always equals
    /// [`Self::forecast_day_condition_text`] for the same day.
    ///
    /// # Errors
    ///
    /// Same as [`Self::forecast_day_condition_text`].
    pub fn forecast_hour_condition_text(&self, day: u8, hour: u8) -> Result<String, WeatherApiError> {
        let forecast = self.fetch_forecast(ForecastRequest::for_days(day).with_hour(hour))?;
        nth(&forecast, usize::from(day), "day")?
            .condition_text()
            .map(str::to_owned)
    }

    /// Check if the weather service answers for this key and location
    pub fn is_healthy(&self) -> bool {
        self.fetch_current(AirQuality::No).is_ok()
    }
}
