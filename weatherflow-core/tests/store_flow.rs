//! End-to-end store flow: select a place, fetch, read the new state.

use std::{sync::Arc, time::Duration};

use weatherflow_core::{
    Condition, Outcome, WeatherFetchError, WeatherStore,
    provider::visualcrossing::VisualCrossingProvider,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COLOMBO: &str = "Colombo, Western Province, Sri Lanka";

fn store(server: &MockServer) -> WeatherStore {
    let provider = VisualCrossingProvider::builder("TEST_KEY")
        .base_url(server.uri())
        .timeout(Duration::from_secs(2))
        .build()
        .expect("client builds");
    WeatherStore::new(Arc::new(provider), "Jaffna")
}

fn colombo_body() -> serde_json::Value {
    serde_json::json!({
        "locations": {
            COLOMBO: {
                "address": COLOMBO,
                "latitude": 6.9271,
                "longitude": 79.8612,
                "values": [
                    { "temp": 30.2, "mint": 26.0, "maxt": 32.0, "heatindex": 36.1, "wspd": 17.3,
                      "humidity": 74.0, "visibility": 9.9, "precip": 0.0, "conditions": "Partially cloudy" },
                    { "temp": 29.0, "mint": 25.5, "maxt": 31.0, "heatindex": 34.0, "wspd": 22.0,
                      "humidity": 82.0, "visibility": 7.5, "precip": 6.2, "conditions": "Rain, Partially cloudy" },
                    { "temp": 28.4, "mint": 25.0, "maxt": 30.5, "heatindex": 33.2, "wspd": 19.0,
                      "humidity": 85.0, "visibility": 6.8, "precip": 11.0, "conditions": "Rain, Overcast" }
                ]
            }
        }
    })
}

#[tokio::test]
async fn submit_place_fetches_once_and_sets_state() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("location", COLOMBO))
        .respond_with(ResponseTemplate::new(200).set_body_json(colombo_body()))
        .expect(1)
        .mount(&server)
        .await;

    let store = store(&server);
    let outcome = store.select(COLOMBO).await.expect("fetch succeeds");
    assert_eq!(outcome, Outcome::Applied);

    let state = store.state();
    assert_eq!(state.place, COLOMBO);
    assert_eq!(state.location.as_deref(), Some(COLOMBO));

    let series = state.series.expect("series is set");
    assert!(!series.is_empty());
    assert_eq!(state.weather.as_ref(), Some(series.current()));
    assert_eq!(series.current().condition, Condition::Cloudy);

    let summary = series.summary();
    assert_eq!(summary.periods, 3);
    assert_eq!(summary.max_temperature_c, Some(30.2));
    assert_eq!(summary.dominant_condition, Condition::Rain);
}

#[tokio::test]
async fn unknown_place_keeps_previous_weather() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("location", COLOMBO))
        .respond_with(ResponseTemplate::new(200).set_body_json(colombo_body()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("location", "Atlantis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "errorCode": 999,
            "message": "Bad API Request:Invalid location parameter value."
        })))
        .mount(&server)
        .await;

    let store = store(&server);
    store.select(COLOMBO).await.expect("first fetch");
    let before = store.state();

    let err = store.select("Atlantis").await.unwrap_err();
    assert!(matches!(err, WeatherFetchError::Provider(_)));

    let after = store.state();
    assert_eq!(after.place, "Atlantis");
    assert_eq!(after.weather, before.weather);
    assert_eq!(after.series, before.series);
    assert_eq!(after.location, before.location);
}

#[tokio::test]
async fn empty_locations_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "locations": {}
        })))
        .mount(&server)
        .await;

    let err = store(&server).refresh().await.unwrap_err();
    assert!(matches!(err, WeatherFetchError::NotFound(p) if p == "Jaffna"));
}

#[tokio::test]
async fn suggest_then_select_clears_candidates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("location", "colo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(colombo_body()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("location", COLOMBO))
        .respond_with(ResponseTemplate::new(200).set_body_json(colombo_body()))
        .mount(&server)
        .await;

    let store = store(&server);
    assert_eq!(store.suggest("colo").await, Outcome::Applied);

    let suggestions = store.suggestions();
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].display_address, COLOMBO);

    store.select(suggestions[0].clone()).await.expect("fetch");
    assert_eq!(store.place(), COLOMBO);
    assert!(store.suggestions().is_empty());
}
