//! HTTP surface for the weather service.
//!
//! Routes:
//! - `GET  /api/weather/current?city=`
//! - `GET  /api/weather/forecast?city=&date=DD.MM.YYYY`
//! - `POST /api/weather/forecast` (override write)
//! - `GET  /api/weather/overrides?city=`

pub mod error;
pub mod handlers;
pub mod router;

pub use error::ApiError;
pub use router::{AppState, weather_router};
