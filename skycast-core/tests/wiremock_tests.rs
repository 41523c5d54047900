//! Integration tests for the HTTP clients against a mock server.
//!
//! Covers the OpenWeather client (query construction, payload mapping, error
//! surfacing) and the summarizer (success and absorbed failure).

use skycast_core::model::{LocationQuery, SummaryRequest};
use skycast_core::provider::openweather::OpenWeatherProvider;
use skycast_core::provider::{FetchError, WeatherProvider};
use skycast_core::summary::{
    OllamaSummarizer, SUMMARY_FALLBACK, Summarizer, SummarizerConfig, request_summary,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_weather_body() -> serde_json::Value {
    serde_json::json!({
        "name": "Berlin",
        "sys": { "country": "DE", "sunrise": 1722830000_i64, "sunset": 1722884000_i64 },
        "main": {
            "temp": 18.4,
            "feels_like": 17.6,
            "temp_min": 14.5,
            "temp_max": 21.2,
            "humidity": 55,
            "pressure": 1015
        },
        "wind": { "speed": 4.1 },
        "weather": [{ "id": 804, "main": "Clouds", "description": "overcast clouds", "icon": "04d" }],
        "visibility": 10000,
        "cod": 200
    })
}

fn provider_for(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::with_base_url(Some("TEST_KEY".to_string()), server.uri())
}

#[tokio::test]
async fn city_query_sends_expected_parameters_and_maps_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Berlin"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_weather_body()))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let snapshot = provider
        .current_weather(&LocationQuery::City("Berlin".to_string()))
        .await
        .expect("fetch should succeed");

    assert_eq!(snapshot.city, "Berlin");
    assert_eq!(snapshot.country.as_deref(), Some("DE"));
    assert_eq!(snapshot.temperature, 18);
    assert_eq!(snapshot.wind_speed, 15);
    assert_eq!(snapshot.conditions, "Clouds");
    assert_eq!(snapshot.icon.as_deref(), Some("04d"));
    assert_eq!(snapshot.visibility, Some(10000));
}

#[tokio::test]
async fn coordinate_query_sends_lat_lon_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "52.52"))
        .and(query_param("lon", "13.41"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_weather_body()))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let snapshot = provider
        .current_weather(&LocationQuery::Coordinates { latitude: 52.52, longitude: 13.41 })
        .await
        .expect("fetch should succeed");

    assert_eq!(snapshot.city, "Berlin");
}

#[tokio::test]
async fn non_success_response_surfaces_capitalized_provider_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let err = provider
        .current_weather(&LocationQuery::City("Atlantis".to_string()))
        .await
        .expect_err("fetch should fail");

    match err {
        FetchError::Provider(message) => assert_eq!(message, "City not found"),
        other => panic!("expected Provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_success_response_without_message_falls_back() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(500).set_body_string("gateway exploded"))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let err = provider
        .current_weather(&LocationQuery::City("Berlin".to_string()))
        .await
        .expect_err("fetch should fail");

    match err {
        FetchError::Provider(message) => assert_eq!(message, "City not found"),
        other => panic!("expected Provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_api_key_fails_before_any_request() {
    let server = MockServer::start().await;
    // No mock mounted: a request reaching the server would 404 into a
    // Provider error, so a MissingApiKey error proves no request was sent.

    let provider = OpenWeatherProvider::with_base_url(None, server.uri());
    let err = provider
        .current_weather(&LocationQuery::City("Berlin".to_string()))
        .await
        .expect_err("fetch should fail");

    assert!(matches!(err, FetchError::MissingApiKey));
}

fn summary_request() -> SummaryRequest {
    SummaryRequest {
        temperature: 18,
        humidity: 55,
        wind_speed: 15,
        conditions: "Clouds".to_string(),
    }
}

fn summarizer_for(server: &MockServer) -> OllamaSummarizer {
    let config = SummarizerConfig {
        base_url: server.uri(),
        timeout_secs: 5,
        ..Default::default()
    };
    OllamaSummarizer::new(config).expect("summarizer should build")
}

#[tokio::test]
async fn summarizer_returns_chat_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "model": "llama3.2",
            "message": { "role": "assistant", "content": "Overcast but mild, light wind." },
            "done": true
        })))
        .mount(&server)
        .await;

    let summarizer = summarizer_for(&server);
    let summary = summarizer
        .summarize(&summary_request())
        .await
        .expect("summarize should succeed");

    assert_eq!(summary, "Overcast but mild, light wind.");
}

#[tokio::test]
async fn summarizer_failure_is_absorbed_into_the_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let summarizer = summarizer_for(&server);
    let summary = request_summary(&summarizer, &summary_request()).await;

    assert_eq!(summary, SUMMARY_FALLBACK);
}
