use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unit system requested from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    /// Parse a query value, falling back to metric for anything unrecognised.
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "imperial" => Self::Imperial,
            _ => Self::Metric,
        }
    }

    /// Value sent to the provider and used in cache keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    /// Temperature symbol shown next to values
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
        }
    }
}

/// How a location is resolved upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMode {
    ByName,
    ByCoordinates,
}

impl LookupMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ByName => "city",
            Self::ByCoordinates => "coords",
        }
    }
}

/// A resolved location. Coordinates are kept as the caller wrote them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    City(String),
    Coordinates { lat: String, lon: String },
}

impl Location {
    pub fn mode(&self) -> LookupMode {
        match self {
            Self::City(_) => LookupMode::ByName,
            Self::Coordinates { .. } => LookupMode::ByCoordinates,
        }
    }

    /// Provider query parameters identifying this location
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::City(name) => vec![("q", name.clone())],
            Self::Coordinates { lat, lon } => vec![("lat", lat.clone()), ("lon", lon.clone())],
        }
    }

    /// Deterministic cache key: `<kind>:<mode>:<location>:<units>`.
    ///
    /// City names are lower-cased; coordinates are used verbatim, so `19.0`
    /// and `19.00` are different keys.
    pub fn cache_key(&self, kind: Endpoint, units: Units) -> String {
        let location = match self {
            Self::City(name) => name.to_lowercase(),
            Self::Coordinates { lat, lon } => format!("{}:{}", lat, lon),
        };
        format!(
            "{}:{}:{}:{}",
            kind.as_str(),
            self.mode().as_str(),
            location,
            units.as_str()
        )
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::City(name) => write!(f, "{}", name),
            Self::Coordinates { lat, lon } => write!(f, "{},{}", lat, lon),
        }
    }
}

/// Provider endpoint, doubling as the cache key prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Current,
    Forecast,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Current => "weather",
            Self::Forecast => "forecast",
        }
    }
}

/// Raw lookup input as received from the form / query string
#[derive(Debug, Clone, Default)]
pub struct LookupRequest {
    pub city: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub units: Units,
}

impl LookupRequest {
    pub fn by_city(city: impl Into<String>, units: Units) -> Self {
        Self {
            city: Some(city.into()),
            units,
            ..Self::default()
        }
    }

    pub fn by_coordinates(lat: impl Into<String>, lon: impl Into<String>, units: Units) -> Self {
        Self {
            lat: Some(lat.into()),
            lon: Some(lon.into()),
            units,
            ..Self::default()
        }
    }

    /// Coordinates win when both are non-empty; otherwise a non-empty city.
    /// `None` means there is nothing to look up.
    pub fn resolve(&self) -> Option<Location> {
        let non_empty = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        if let (Some(lat), Some(lon)) = (non_empty(&self.lat), non_empty(&self.lon)) {
            return Some(Location::Coordinates { lat, lon });
        }

        non_empty(&self.city).map(Location::City)
    }
}

/// Geographic position reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Display-ready current conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location: String,
    pub description: String,
    pub temp: f64,
    pub feels_like: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub wind_speed: Option<f64>,
    pub icon: String,
    /// Local time, `HH:MM`
    pub sunrise: String,
    /// Local time, `HH:MM`
    pub sunset: String,
    pub units: String,
    pub coord: Option<Coordinates>,
}

/// One calendar day of forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecastEntry {
    pub date: NaiveDate,
    pub temp_min: f64,
    pub temp_max: f64,
    pub temp_avg: f64,
    pub icon: String,
    pub description: String,
}

/// Parallel arrays for charting daily averages
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

/// Aggregated forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPayload {
    pub daily: Vec<DailyForecastEntry>,
    pub chart: ChartSeries,
    pub units: String,
}

/// What the presentation layer receives for one request.
/// Either both payloads or the error are set, never a mix.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewPayload {
    pub weather: Option<CurrentConditions>,
    pub forecast: Option<ForecastPayload>,
    pub error: Option<String>,
}

impl ViewPayload {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn success(weather: CurrentConditions, forecast: ForecastPayload) -> Self {
        Self {
            weather: Some(weather),
            forecast: Some(forecast),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}
