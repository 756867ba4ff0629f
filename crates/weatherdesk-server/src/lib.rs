//! HTTP endpoint for WeatherDesk.
//!
//! `GET /?city=&lat=&lon=&units=` answers with the view payload as JSON;
//! lookup failures travel in its `error` field, so the status is always 200.

use std::convert::Infallible;
use std::sync::Arc;

use serde::Deserialize;
use warp::{Filter, Rejection, Reply};
use weatherdesk_core::{AppError, Config};
use weatherdesk_weather::{
    CacheTtls, InMemoryCache, LookupRequest, OpenWeatherClient, Units, UpstreamClient,
    WeatherCache, WeatherLookup,
};

/// Query string accepted by the lookup route
#[derive(Debug, Default, Deserialize)]
pub struct LookupQuery {
    pub city: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub units: Option<String>,
}

impl From<LookupQuery> for LookupRequest {
    fn from(query: LookupQuery) -> Self {
        Self {
            units: Units::parse_lenient(query.units.as_deref()),
            city: query.city,
            lat: query.lat,
            lon: query.lon,
        }
    }
}

/// All routes, wired to a shared lookup service.
pub fn routes<C, K>(
    lookup: Arc<WeatherLookup<C, K>>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone
where
    C: UpstreamClient + 'static,
    K: WeatherCache + 'static,
{
    let health = warp::get()
        .and(warp::path("health"))
        .and(warp::path::end())
        .map(|| warp::reply::json(&serde_json::json!({ "status": "ok" })));

    let weather = warp::get()
        .and(warp::path::end())
        .and(warp::query::<LookupQuery>())
        .and(warp::any().map(move || Arc::clone(&lookup)))
        .and_then(handle_lookup::<C, K>);

    health.or(weather).with(warp::trace::request())
}

async fn handle_lookup<C, K>(
    query: LookupQuery,
    lookup: Arc<WeatherLookup<C, K>>,
) -> Result<warp::reply::Json, Infallible>
where
    C: UpstreamClient,
    K: WeatherCache,
{
    let view = lookup.lookup(&query.into()).await;
    Ok(warp::reply::json(&view))
}

/// Build the production lookup service from configuration.
pub fn build_lookup(
    config: &Config,
) -> Result<WeatherLookup<OpenWeatherClient, InMemoryCache>, AppError> {
    let client = OpenWeatherClient::from_config(&config.upstream)?;
    let cache = InMemoryCache::new(config.cache.max_entries);
    Ok(WeatherLookup::new(
        client,
        cache,
        CacheTtls::from(&config.cache),
    ))
}

/// Serve until Ctrl-C.
pub async fn run(config: Config) -> Result<(), AppError> {
    let addr = config.server.socket_addr()?;
    let lookup = Arc::new(build_lookup(&config)?);

    let (bound, server) = warp::serve(routes(lookup))
        .try_bind_with_graceful_shutdown(addr, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .map_err(|e| AppError::Other(e.into()))?;

    tracing::info!("WeatherDesk listening on http://{}", bound);
    server.await;
    tracing::info!("WeatherDesk stopped");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_maps_to_request() {
        let query = LookupQuery {
            city: Some("Mumbai".into()),
            lat: None,
            lon: None,
            units: Some("imperial".into()),
        };
        let request = LookupRequest::from(query);
        assert_eq!(request.city.as_deref(), Some("Mumbai"));
        assert_eq!(request.units, Units::Imperial);
    }

    #[test]
    fn test_unknown_units_fall_back_to_metric() {
        let request = LookupRequest::from(LookupQuery {
            units: Some("kelvin".into()),
            ..LookupQuery::default()
        });
        assert_eq!(request.units, Units::Metric);
    }

    #[test]
    fn test_build_lookup_from_default_config() {
        assert!(build_lookup(&Config::default()).is_ok());
    }
}
