//! Forecast resolution: local overrides first, upstream provider otherwise.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    error::Result,
    extract::{extract_current, extract_forecast},
    model::{CurrentWeather, ForecastOverride, ForecastRange, OverridePayload},
    provider::WeatherProvider,
    store::OverrideStore,
    validate::Validator,
};

/// Stateless entry point for the three exposed operations.
///
/// Cheap to clone; clones share the provider, store and clock.
#[derive(Debug, Clone)]
pub struct ForecastResolver {
    provider: Arc<dyn WeatherProvider>,
    store: Arc<dyn OverrideStore>,
    validator: Validator,
}

impl ForecastResolver {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        store: Arc<dyn OverrideStore>,
        validator: Validator,
    ) -> Self {
        Self {
            provider,
            store,
            validator,
        }
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Forecast range for a validated (city, date).
    ///
    /// A stored override wins unconditionally and no upstream call is made.
    pub async fn get_forecast(&self, city: &str, date: NaiveDate) -> Result<ForecastRange> {
        if let Some(ov) = self.store.get(city, date).await? {
            info!(city, %date, "serving forecast override");
            return Ok(ov.range());
        }

        debug!(city, %date, "no override, asking provider");
        let snapshot = self.provider.fetch_weather(city).await?;
        extract_forecast(&snapshot, date)
    }

    /// Current conditions; there is no override path for these.
    pub async fn get_current(&self, city: &str) -> Result<CurrentWeather> {
        let snapshot = self.provider.fetch_weather(city).await?;
        extract_current(&snapshot)
    }

    /// Validate and store an override, replacing any existing one for the key.
    pub async fn upsert_override(&self, payload: &OverridePayload) -> Result<ForecastOverride> {
        let value = self.validator.validate_override_payload(payload)?;
        let stored = self.store.upsert(&value).await?;
        info!(
            city = %stored.city,
            date = %stored.date,
            min = stored.min_temperature,
            max = stored.max_temperature,
            "forecast override stored"
        );
        Ok(stored)
    }

    pub async fn list_overrides(&self, city: Option<&str>) -> Result<Vec<ForecastOverride>> {
        self.store.list(city).await
    }
}
