//! Core library for the `weather` CLI and HTTP server.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client (geocoding + One Call)
//! - Extraction of current conditions and daily forecast ranges
//! - Input validation against an injected clock
//! - Forecast override storage and the override-first resolver
//!
//! It is used by `weather-cli` and `weather-server`.

pub mod clock;
pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod provider;
pub mod resolver;
pub mod store;
pub mod validate;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use error::{ErrorKind, UpstreamError, WeatherError};
pub use model::{
    Coordinates, CurrentWeather, ForecastOverride, ForecastRange, OverridePayload,
    WeatherSnapshot,
};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use resolver::ForecastResolver;
pub use store::{MemoryOverrideStore, OverrideStore, SqliteOverrideStore};
pub use validate::Validator;
