//! Lookup orchestration: resolve the location, consult the cache, fetch what
//! is missing and shape the view payload.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use weatherdesk_core::CacheConfig;

use crate::cache::WeatherCache;
use crate::current::build_current_conditions;
use crate::error::WeatherError;
use crate::forecast::build_forecast;
use crate::provider::UpstreamClient;
use crate::types::{
    CurrentConditions, Endpoint, ForecastPayload, Location, LookupRequest, Units, ViewPayload,
};

/// How long each payload kind stays cached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub current: Duration,
    pub forecast: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            current: Duration::from_secs(300),
            forecast: Duration::from_secs(1200),
        }
    }
}

impl From<&CacheConfig> for CacheTtls {
    fn from(config: &CacheConfig) -> Self {
        Self {
            current: config.current_ttl(),
            forecast: config.forecast_ttl(),
        }
    }
}

/// Stateless per-request lookup over an upstream client and a cache.
#[derive(Debug)]
pub struct WeatherLookup<C, K> {
    client: C,
    cache: K,
    ttls: CacheTtls,
}

impl<C, K> WeatherLookup<C, K>
where
    C: UpstreamClient,
    K: WeatherCache,
{
    pub fn new(client: C, cache: K, ttls: CacheTtls) -> Self {
        Self {
            client,
            cache,
            ttls,
        }
    }

    pub fn cache(&self) -> &K {
        &self.cache
    }

    /// Run one lookup. Never fails: errors become `ViewPayload::error` and
    /// any payload already obtained for this request is dropped.
    pub async fn lookup(&self, request: &LookupRequest) -> ViewPayload {
        let Some(location) = request.resolve() else {
            tracing::debug!("No location in request, skipping lookup");
            return ViewPayload::empty();
        };

        match self.fetch(&location, request.units).await {
            Ok((current, forecast)) => ViewPayload::success(current, forecast),
            Err(e) => {
                tracing::warn!(location = %location, "Weather lookup failed: {}", e);
                ViewPayload::failure(e.user_message())
            }
        }
    }

    /// Current conditions then forecast, each from cache or upstream.
    /// The first failure ends the lookup.
    pub async fn fetch(
        &self,
        location: &Location,
        units: Units,
    ) -> Result<(CurrentConditions, ForecastPayload), WeatherError> {
        let current_key = location.cache_key(Endpoint::Current, units);
        let forecast_key = location.cache_key(Endpoint::Forecast, units);

        let cached_current = self.cached::<CurrentConditions>(&current_key);
        let cached_forecast = self.cached::<ForecastPayload>(&forecast_key);

        let current = match cached_current {
            Some(current) => current,
            None => {
                let raw = self.client.fetch_current(location, units).await?;
                let current = build_current_conditions(&raw, units)?;
                self.store(&current_key, &current, self.ttls.current);
                current
            }
        };

        let forecast = match cached_forecast {
            Some(forecast) => forecast,
            None => {
                let raw = self.client.fetch_forecast(location, units).await?;
                let forecast = build_forecast(&raw, units)?;
                self.store(&forecast_key, &forecast, self.ttls.forecast);
                forecast
            }
        };

        Ok((current, forecast))
    }

    fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.cache.get(key);
        let Some(value) = value else {
            tracing::debug!(key, "Cache miss");
            return None;
        };

        match serde_json::from_value(value) {
            Ok(decoded) => {
                tracing::debug!(key, "Cache hit");
                Some(decoded)
            }
            Err(e) => {
                tracing::warn!(key, "Ignoring undecodable cache entry: {}", e);
                None
            }
        }
    }

    fn store<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        match serde_json::to_value(value) {
            Ok(encoded) => self.cache.set(key, encoded, ttl),
            Err(e) => tracing::warn!(key, "Not caching value: {}", e),
        }
    }
}
