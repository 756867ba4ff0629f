//! Provider response shapes.
//!
//! Every field is optional here; the transformers decide what is required and
//! report missing pieces as [`WeatherError::MalformedData`](crate::WeatherError).

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCondition {
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMain {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWind {
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSys {
    pub country: Option<String>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCoord {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// `GET /weather` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCurrent {
    pub name: Option<String>,
    /// Offset from UTC in seconds
    pub timezone: Option<i64>,
    #[serde(default)]
    pub weather: Vec<RawCondition>,
    pub main: Option<RawMain>,
    pub wind: Option<RawWind>,
    pub sys: Option<RawSys>,
    pub coord: Option<RawCoord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawForecastEntry {
    /// UTC epoch seconds
    pub dt: Option<i64>,
    pub main: Option<RawMain>,
    #[serde(default)]
    pub weather: Vec<RawCondition>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCity {
    pub timezone: Option<i64>,
}

/// `GET /forecast` body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawForecast {
    pub city: Option<RawCity>,
    #[serde(default)]
    pub list: Vec<RawForecastEntry>,
}

/// Error body the provider sends with non-2xx responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawApiError {
    pub message: Option<String>,
}
