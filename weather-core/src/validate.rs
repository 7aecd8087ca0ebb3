//! Validation of untrusted query and override input.
//!
//! Both the forecast query path and the override write path draw "today" from
//! the same [`Clock`], so a date accepted by one is accepted by the other.

use chrono::{Days, NaiveDate};
use std::sync::Arc;

use crate::{
    clock::{Clock, SystemClock},
    error::{Result, WeatherError},
    model::{DATE_FORMAT, DATE_FORMAT_HINT, ForecastOverride, OverridePayload},
};

/// How many days past today a forecast may be requested or overridden.
pub const FORECAST_HORIZON_DAYS: u64 = 10;

/// Longest city name the override store accepts.
pub const MAX_CITY_LEN: usize = 100;

const REQUIRED: &str = "This field is required.";

/// Trim and require a non-empty city name.
pub fn validate_city(raw: Option<&str>) -> Result<String> {
    let city = raw.map(str::trim).unwrap_or_default();
    if city.is_empty() {
        return Err(WeatherError::validation("city", REQUIRED));
    }
    Ok(city.to_string())
}

/// Parse a `DD.MM.YYYY` date without any window check.
pub fn parse_date(raw: Option<&str>) -> Result<NaiveDate> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(WeatherError::validation("date", REQUIRED));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
        WeatherError::validation(
            "date",
            format!("Date has wrong format. Use one of these formats instead: {DATE_FORMAT_HINT}."),
        )
    })
}

fn check_window(date: NaiveDate, today: NaiveDate) -> Result<NaiveDate> {
    if date < today {
        return Err(WeatherError::validation("date", "Date cannot be in the past"));
    }
    let horizon = today.checked_add_days(Days::new(FORECAST_HORIZON_DAYS));
    if horizon.is_none_or(|last| date > last) {
        return Err(WeatherError::validation(
            "date",
            format!("Date cannot be more than {FORECAST_HORIZON_DAYS} days from today"),
        ));
    }
    Ok(date)
}

fn require_temperature(field: &'static str, value: Option<f64>) -> Result<f64> {
    match value {
        None => Err(WeatherError::validation(field, REQUIRED)),
        Some(v) if !v.is_finite() => Err(WeatherError::validation(field, "A valid number is required.")),
        Some(v) => Ok(v),
    }
}

#[derive(Debug, Clone)]
pub struct Validator {
    clock: Arc<dyn Clock>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl Validator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Parse a forecast date and require it to fall in `[today, today + 10]`.
    pub fn validate_forecast_date(&self, raw: Option<&str>) -> Result<NaiveDate> {
        let date = parse_date(raw)?;
        check_window(date, self.today())
    }

    /// Validate an override write into the shape the store persists.
    ///
    /// Per-field checks (presence, format) run first. Then `min <= max` is
    /// checked, and the date window last.
    pub fn validate_override_payload(&self, payload: &OverridePayload) -> Result<ForecastOverride> {
        let city = validate_city(payload.city.as_deref())?;
        if city.chars().count() > MAX_CITY_LEN {
            return Err(WeatherError::validation(
                "city",
                format!("Ensure this field has no more than {MAX_CITY_LEN} characters."),
            ));
        }

        let date = parse_date(payload.date.as_deref())?;
        let min_temperature = require_temperature("min_temperature", payload.min_temperature)?;
        let max_temperature = require_temperature("max_temperature", payload.max_temperature)?;

        if min_temperature > max_temperature {
            return Err(WeatherError::validation(
                "min_temperature",
                "Min temperature cannot exceed max temperature",
            ));
        }

        let date = check_window(date, self.today())?;

        Ok(ForecastOverride {
            city,
            date,
            min_temperature,
            max_temperature,
        })
    }
}
