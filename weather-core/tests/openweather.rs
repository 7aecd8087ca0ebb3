//! Integration tests for `OpenWeatherProvider` against a mock HTTP server.

use std::time::Duration;

use serde_json::json;
use weather_core::{
    ErrorKind, OpenWeatherProvider, UpstreamError, WeatherError, WeatherProvider,
    extract::extract_current,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GEO_PATH: &str = "/geo/1.0/direct";
const WEATHER_PATH: &str = "/data/3.0/onecall";

fn provider(server: &MockServer) -> OpenWeatherProvider {
    provider_with_timeout(server, Duration::from_secs(5))
}

fn provider_with_timeout(server: &MockServer, timeout: Duration) -> OpenWeatherProvider {
    OpenWeatherProvider::new("TEST_KEY", timeout)
        .unwrap()
        .with_geo_url(format!("{}{GEO_PATH}", server.uri()))
        .with_weather_url(format!("{}{WEATHER_PATH}", server.uri()))
}

async fn mount_berlin_geo(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(GEO_PATH))
        .and(query_param("q", "Berlin"))
        .and(query_param("limit", "1"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "Berlin", "lat": 52.52, "lon": 13.405, "country": "DE" }
        ])))
        .mount(server)
        .await;
}

fn onecall_body() -> serde_json::Value {
    json!({
        "lat": 52.52,
        "lon": 13.405,
        "timezone": "Europe/Berlin",
        "timezone_offset": 3600,
        "current": { "dt": 1000, "temp": 15.456, "humidity": 40 },
        "daily": [
            { "dt": 1717239600, "temp": { "day": 20.0, "min": 5.2, "max": 9.8 } }
        ]
    })
}

#[tokio::test]
async fn test_resolve_coordinates_first_match() {
    let server = MockServer::start().await;
    mount_berlin_geo(&server).await;

    let coords = provider(&server).resolve_coordinates("Berlin").await.unwrap();

    assert_eq!(coords.latitude, 52.52);
    assert_eq!(coords.longitude, 13.405);
}

#[tokio::test]
async fn test_unknown_city_is_not_found_without_weather_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GEO_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(onecall_body()))
        .expect(0)
        .mount(&server)
        .await;

    let err = provider(&server).fetch_weather("Atlantis").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "City not found");
}

#[tokio::test]
async fn test_fetch_weather_success() {
    let server = MockServer::start().await;
    mount_berlin_geo(&server).await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("lat", "52.52"))
        .and(query_param("lon", "13.405"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(onecall_body()))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = provider(&server).fetch_weather("Berlin").await.unwrap();

    assert_eq!(snapshot.timezone_offset, Some(3600));
    assert_eq!(snapshot.daily.len(), 1);
    assert_eq!(snapshot.daily[0].temp.max, 9.8);

    let current = extract_current(&snapshot).unwrap();
    assert_eq!(current.temperature, 15.5);
    assert_eq!(current.local_time, "01:16");
}

#[tokio::test]
async fn test_every_call_geocodes_again() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GEO_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "lat": 1.0, "lon": 2.0 }])))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(onecall_body()))
        .expect(2)
        .mount(&server)
        .await;

    let p = provider(&server);
    p.fetch_weather("Berlin").await.unwrap();
    p.fetch_weather("Berlin").await.unwrap();
}

#[tokio::test]
async fn test_empty_weather_payload_is_not_found() {
    let server = MockServer::start().await;
    mount_berlin_geo(&server).await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = provider(&server).fetch_weather("Berlin").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "Weather not found");
}

#[tokio::test]
async fn test_missing_daily_block_defaults_to_empty() {
    let server = MockServer::start().await;
    mount_berlin_geo(&server).await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "current": { "dt": 0, "temp": 1.0 } })),
        )
        .mount(&server)
        .await;

    let snapshot = provider(&server).fetch_weather("Berlin").await.unwrap();
    assert!(snapshot.daily.is_empty());
    assert_eq!(snapshot.timezone_offset, None);
}

#[tokio::test]
async fn test_http_error_status_is_upstream_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GEO_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
        .mount(&server)
        .await;

    let err = provider(&server).fetch_weather("Berlin").await.unwrap_err();

    match err {
        WeatherError::UpstreamUnavailable(UpstreamError::Status { endpoint, status, body }) => {
            assert_eq!(endpoint, "geocoding");
            assert_eq!(status, 401);
            assert_eq!(body, "Invalid API key");
        }
        other => panic!("expected upstream status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_weather_endpoint_error_after_geocode() {
    let server = MockServer::start().await;
    mount_berlin_geo(&server).await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = provider(&server).fetch_weather("Berlin").await.unwrap_err();

    assert!(matches!(
        err,
        WeatherError::UpstreamUnavailable(UpstreamError::Status {
            endpoint: "weather",
            status: 503,
            ..
        })
    ));
}

#[tokio::test]
async fn test_timeout_is_upstream_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GEO_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "lat": 1.0, "lon": 2.0 }]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = provider_with_timeout(&server, Duration::from_millis(100))
        .resolve_coordinates("Berlin")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        WeatherError::UpstreamUnavailable(UpstreamError::Timeout { .. })
    ));
}

#[tokio::test]
async fn test_connection_failure_is_upstream_unavailable() {
    let p = OpenWeatherProvider::new("TEST_KEY", Duration::from_secs(2))
        .unwrap()
        .with_geo_url("http://127.0.0.1:1/geo/1.0/direct");

    let err = p.resolve_coordinates("Berlin").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    mount_berlin_geo(&server).await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = provider(&server).fetch_weather("Berlin").await.unwrap_err();

    assert!(matches!(
        err,
        WeatherError::UpstreamUnavailable(UpstreamError::Decode { endpoint: "weather", .. })
    ));
}
