use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;
use weather_core::WeatherError;

/// Handler error; maps core failures onto HTTP status codes.
///
/// Validation errors are 400 with a field-keyed body. Not-found and upstream
/// failures are both 503, as callers cannot act on the difference.
#[derive(Debug)]
pub enum ApiError {
    Weather(WeatherError),
    Body(JsonRejection),
}

impl From<WeatherError> for ApiError {
    fn from(e: WeatherError) -> Self {
        ApiError::Weather(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::Body(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Weather(WeatherError::Validation { field, message }) => {
                (StatusCode::BAD_REQUEST, Json(json!({ field: [message] }))).into_response()
            }
            ApiError::Weather(e @ (WeatherError::NotFound(_) | WeatherError::UpstreamUnavailable(_))) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response(),
            ApiError::Weather(e @ WeatherError::Store(_)) => {
                error!(error = %e, "override store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "An internal server error occurred." })),
                )
                    .into_response()
            }
            ApiError::Body(rejection) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "non_field_errors": [rejection.body_text()] })),
            )
                .into_response(),
        }
    }
}
