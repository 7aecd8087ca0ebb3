use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    error::{Result, UpstreamError, WeatherError},
    model::{Coordinates, WeatherSnapshot},
};

use super::WeatherProvider;

pub const GEO_URL: &str = "https://api.openweathermap.org/geo/1.0/direct";
pub const WEATHER_URL: &str = "https://api.openweathermap.org/data/3.0/onecall";

const GEO_ENDPOINT: &str = "geocoding";
const WEATHER_ENDPOINT: &str = "weather";

/// OpenWeather geocoding + One Call client.
///
/// Every call makes fresh requests; nothing is cached between invocations.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    http: Client,
    geo_url: String,
    weather_url: String,
}

impl OpenWeatherProvider {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key: api_key.into(),
            http,
            geo_url: GEO_URL.to_string(),
            weather_url: WEATHER_URL.to_string(),
        })
    }

    pub fn with_geo_url(mut self, url: impl Into<String>) -> Self {
        self.geo_url = url.into();
        self
    }

    pub fn with_weather_url(mut self, url: impl Into<String>) -> Self {
        self.weather_url = url.into();
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        debug!(endpoint, url, "calling OpenWeather");

        let res = self
            .http
            .get(url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| upstream(UpstreamError::transport(endpoint, e)))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| upstream(UpstreamError::transport(endpoint, e)))?;

        if !status.is_success() {
            return Err(upstream(UpstreamError::Status {
                endpoint,
                status: status.as_u16(),
                body: truncate_body(&body),
            }));
        }

        serde_json::from_str(&body).map_err(|source| upstream(UpstreamError::Decode { endpoint, source }))
    }
}

fn upstream(err: UpstreamError) -> WeatherError {
    warn!(error = %err, "OpenWeather call failed");
    WeatherError::UpstreamUnavailable(err)
}

#[derive(Debug, Deserialize)]
struct OwGeoMatch {
    lat: f64,
    lon: f64,
}

fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn resolve_coordinates(&self, city: &str) -> Result<Coordinates> {
        let matches: Vec<OwGeoMatch> = self
            .get_json(
                GEO_ENDPOINT,
                &self.geo_url,
                &[("q", city.to_string()), ("limit", "1".to_string())],
            )
            .await?;

        let first = matches
            .first()
            .ok_or_else(|| WeatherError::not_found("City not found"))?;

        Ok(Coordinates {
            latitude: first.lat,
            longitude: first.lon,
        })
    }

    async fn fetch_weather(&self, city: &str) -> Result<WeatherSnapshot> {
        let coords = self.resolve_coordinates(city).await?;
        debug!(city, lat = coords.latitude, lon = coords.longitude, "resolved coordinates");

        let payload: Value = self
            .get_json(
                WEATHER_ENDPOINT,
                &self.weather_url,
                &[
                    ("lat", coords.latitude.to_string()),
                    ("lon", coords.longitude.to_string()),
                    ("units", "metric".to_string()),
                ],
            )
            .await?;

        if is_empty_payload(&payload) {
            return Err(WeatherError::not_found("Weather not found"));
        }

        serde_json::from_value(payload).map_err(|source| {
            upstream(UpstreamError::Decode {
                endpoint: WEATHER_ENDPOINT,
                source,
            })
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
