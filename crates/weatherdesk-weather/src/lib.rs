//! Weather lookups for WeatherDesk
//!
//! Fetches current conditions and a multi-day forecast from an OpenWeather
//! compatible provider, reshapes them into display-ready payloads and keeps
//! them in a short-lived cache.

pub mod cache;
pub mod current;
pub mod error;
pub mod forecast;
pub mod lookup;
pub mod provider;
pub mod raw;
pub mod types;

pub use cache::{InMemoryCache, WeatherCache};
pub use current::build_current_conditions;
pub use error::WeatherError;
pub use forecast::build_forecast;
pub use lookup::{CacheTtls, WeatherLookup};
pub use provider::{OpenWeatherClient, UpstreamClient};
pub use types::*;
