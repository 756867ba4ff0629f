//! OpenWeather HTTP client.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::instrument;
use weatherdesk_core::{NetworkError, ReqwestErrorExt, UpstreamConfig};

use crate::error::WeatherError;
use crate::raw::{RawApiError, RawCurrent, RawForecast};
use crate::types::{Endpoint, Location, Units};

/// Source of raw weather data. One request per call, no retries.
pub trait UpstreamClient: Send + Sync {
    fn fetch_current(
        &self,
        location: &Location,
        units: Units,
    ) -> impl Future<Output = Result<RawCurrent, WeatherError>> + Send;

    fn fetch_forecast(
        &self,
        location: &Location,
        units: Units,
    ) -> impl Future<Output = Result<RawForecast, WeatherError>> + Send;
}

impl<T: UpstreamClient + ?Sized> UpstreamClient for Arc<T> {
    fn fetch_current(
        &self,
        location: &Location,
        units: Units,
    ) -> impl Future<Output = Result<RawCurrent, WeatherError>> + Send {
        (**self).fetch_current(location, units)
    }

    fn fetch_forecast(
        &self,
        location: &Location,
        units: Units,
    ) -> impl Future<Output = Result<RawForecast, WeatherError>> + Send {
        (**self).fetch_forecast(location, units)
    }
}

#[derive(Clone)]
pub struct OpenWeatherClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for OpenWeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NetworkError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self, WeatherError> {
        Self::new(
            &config.base_url,
            config.api_key.as_deref().unwrap_or_default(),
            config.timeout(),
        )
    }

    /// GET `{base}/{endpoint}` and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        location: &Location,
        units: Units,
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint.as_str());

        let mut params = location.query_params();
        params.push(("units", units.as_str().to_string()));
        params.push(("appid", self.api_key.clone()));

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| e.into_network_error())?;

        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<RawApiError>(&text)
                .ok()
                .and_then(|body| body.message);
            tracing::warn!(
                "Upstream {} returned {}: {}",
                endpoint.as_str(),
                status,
                message.as_deref().unwrap_or("<no message>")
            );
            return Err(WeatherError::UpstreamHttp {
                status: status.as_u16(),
                message,
                status_text: status.to_string(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                WeatherError::from(e.into_network_error())
            } else {
                tracing::warn!("Upstream {} body could not be read: {}", endpoint.as_str(), e);
                WeatherError::UpstreamProtocol(e.to_string())
            }
        })?;

        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!("Upstream {} body did not decode: {}", endpoint.as_str(), e);
            WeatherError::UpstreamProtocol(e.to_string())
        })
    }
}

impl UpstreamClient for OpenWeatherClient {
    #[instrument(skip(self), level = "info")]
    async fn fetch_current(
        &self,
        location: &Location,
        units: Units,
    ) -> Result<RawCurrent, WeatherError> {
        self.get_json(Endpoint::Current, location, units).await
    }

    #[instrument(skip(self), level = "info")]
    async fn fetch_forecast(
        &self,
        location: &Location,
        units: Units,
    ) -> Result<RawForecast, WeatherError> {
        self.get_json(Endpoint::Forecast, location, units).await
    }
}
