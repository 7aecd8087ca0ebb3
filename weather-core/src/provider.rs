use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    Config,
    error::Result,
    model::{Coordinates, WeatherSnapshot},
    provider::openweather::OpenWeatherProvider,
};

pub mod openweather;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Resolve a city name to its first geocoding match.
    async fn resolve_coordinates(&self, city: &str) -> Result<Coordinates>;

    /// Geocode `city`, then fetch the full weather payload for it.
    async fn fetch_weather(&self, city: &str) -> Result<WeatherSnapshot>;
}

/// Construct the provider from config, failing when no API key is available.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `weather configure` or set OPENWEATHER_API_KEY."
        )
    })?;

    let mut provider = OpenWeatherProvider::new(api_key, config.timeout())?;
    if let Some(url) = &config.geo_url {
        provider = provider.with_geo_url(url.clone());
    }
    if let Some(url) = &config.weather_url {
        provider = provider.with_weather_url(url.clone());
    }

    Ok(provider)
}
