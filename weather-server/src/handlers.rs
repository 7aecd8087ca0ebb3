use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use serde::Deserialize;
use weather_core::{
    CurrentWeather, ForecastOverride, ForecastRange, OverridePayload, validate::validate_city,
};

use crate::{error::ApiError, router::AppState};

#[derive(Debug, Deserialize)]
pub struct CityQuery {
    pub city: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub city: Option<String>,
    pub date: Option<String>,
}

/// GET /api/weather/current?city={city}
pub async fn current(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<Json<CurrentWeather>, ApiError> {
    let city = validate_city(query.city.as_deref())?;
    Ok(Json(state.resolver.get_current(&city).await?))
}

/// GET /api/weather/forecast?city={city}&date={DD.MM.YYYY}
pub async fn forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<ForecastRange>, ApiError> {
    let city = validate_city(query.city.as_deref())?;
    let date = state
        .resolver
        .validator()
        .validate_forecast_date(query.date.as_deref())?;
    Ok(Json(state.resolver.get_forecast(&city, date).await?))
}

/// POST /api/weather/forecast
pub async fn override_forecast(
    State(state): State<AppState>,
    payload: Result<Json<OverridePayload>, JsonRejection>,
) -> Result<Json<ForecastOverride>, ApiError> {
    let Json(payload) = payload?;
    Ok(Json(state.resolver.upsert_override(&payload).await?))
}

/// GET /api/weather/overrides?city={city}
pub async fn list_overrides(
    State(state): State<AppState>,
    Query(query): Query<CityQuery>,
) -> Result<Json<Vec<ForecastOverride>>, ApiError> {
    let city = query.city.as_deref().map(str::trim).filter(|c| !c.is_empty());
    Ok(Json(state.resolver.list_overrides(city).await?))
}
