use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use std::time::Instant;
use tracing::{Instrument, info, info_span};
use weather_core::ForecastResolver;

use crate::handlers;

#[derive(Debug, Clone)]
pub struct AppState {
    pub resolver: ForecastResolver,
}

impl AppState {
    pub fn new(resolver: ForecastResolver) -> Self {
        Self { resolver }
    }
}

pub fn weather_router(state: AppState) -> Router {
    Router::new()
        .route("/api/weather/current", get(handlers::current))
        .route(
            "/api/weather/forecast",
            get(handlers::forecast).post(handlers::override_forecast),
        )
        .route("/api/weather/overrides", get(handlers::list_overrides))
        .layer(middleware::from_fn(trace_request))
        .with_state(state)
}

async fn trace_request(req: Request, next: Next) -> Response {
    let span = info_span!("request", method = %req.method(), path = %req.uri().path());

    async move {
        let started = Instant::now();
        let res = next.run(req).await;
        info!(
            status = res.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request handled"
        );
        res
    }
    .instrument(span)
    .await
}
