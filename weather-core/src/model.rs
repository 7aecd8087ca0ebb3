use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Input format for forecast and override dates, e.g. `01.06.2024`.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Human-readable form of [`DATE_FORMAT`], used in validation messages.
pub const DATE_FORMAT_HINT: &str = "DD.MM.YYYY";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Full payload returned by the weather endpoint for one city.
///
/// Only the fields the extractor reads are modelled; everything else the
/// provider sends is ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Shift in seconds from UTC for the requested location.
    #[serde(default)]
    pub timezone_offset: Option<i64>,
    pub current: CurrentBlock,
    /// Daily forecast, ordered by day.
    #[serde(default)]
    pub daily: Vec<DailyEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentBlock {
    /// Observation time, unix seconds (UTC).
    pub dt: i64,
    pub temp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    /// Day timestamp, unix seconds (UTC).
    pub dt: i64,
    pub temp: DailyTemperature,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTemperature {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Degrees Celsius, one decimal.
    pub temperature: f64,
    /// Provider-local wall clock time, `HH:MM`.
    pub local_time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastRange {
    pub min_temperature: f64,
    pub max_temperature: f64,
}

/// Admin-supplied forecast for a (city, date) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastOverride {
    pub city: String,
    pub date: NaiveDate,
    pub min_temperature: f64,
    pub max_temperature: f64,
}

impl ForecastOverride {
    pub fn range(&self) -> ForecastRange {
        ForecastRange {
            min_temperature: self.min_temperature,
            max_temperature: self.max_temperature,
        }
    }
}

/// Untrusted override write, as received from a caller.
///
/// Every field is optional here so that a missing field is reported by the
/// validator with a field-level message instead of a deserialization error.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OverridePayload {
    pub city: Option<String>,
    /// Date in [`DATE_FORMAT`].
    pub date: Option<String>,
    pub min_temperature: Option<f64>,
    pub max_temperature: Option<f64>,
}
