//! Integration tests for the WeatherAPI.com provider against a mock HTTP server.

use chrono::{NaiveDate, NaiveDateTime};
use forecast_core::{
    FetchError, ForecastProvider, LocationQuery, next_24_hour_window,
    provider::weatherapi::WeatherApiProvider,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn hours(date: &str) -> Vec<serde_json::Value> {
    (0..24)
        .map(|h| {
            serde_json::json!({
                "time_epoch": 0,
                "time": format!("{date} {h:02}:00"),
                "temp_c": 10.0 + f64::from(h) / 2.0,
                "feelslike_c": 9.0 + f64::from(h) / 2.0,
                "condition": { "text": "Partly cloudy", "icon": "//cdn.weatherapi.com/116.png", "code": 1003 },
                "wind_kph": 12.2,
                "humidity": 70,
                "chance_of_rain": 20
            })
        })
        .collect()
}

fn day(date: &str) -> serde_json::Value {
    serde_json::json!({
        "date": date,
        "date_epoch": 0,
        "day": {
            "maxtemp_c": 21.4,
            "mintemp_c": 9.8,
            "avgtemp_c": 15.0,
            "maxwind_kph": 18.0,
            "totalprecip_mm": 1.26,
            "avghumidity": 64.0,
            "daily_chance_of_rain": 35,
            "uv": 4.0,
            "condition": { "text": "Patchy rain nearby", "icon": "//cdn.weatherapi.com/176.png", "code": 1063 }
        },
        "hour": hours(date)
    })
}

/// Sample `forecast.json` body; `dates` are emitted in the order given.
fn sample_forecast(dates: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "location": {
            "name": "London",
            "region": "City of London, Greater London",
            "country": "United Kingdom",
            "lat": 51.52,
            "lon": -0.11,
            "tz_id": "Europe/London",
            "localtime_epoch": 1_715_349_600,
            "localtime": "2024-05-10 15:00"
        },
        "current": {
            "last_updated_epoch": 1_715_349_600,
            "last_updated": "2024-05-10 15:00",
            "temp_c": 19.0,
            "feelslike_c": 19.0,
            "is_day": 1,
            "condition": { "text": "Sunny", "icon": "//cdn.weatherapi.com/113.png", "code": 1000 },
            "wind_kph": 11.2,
            "wind_dir": "WSW",
            "pressure_mb": 1021.0,
            "precip_mm": 0.0,
            "humidity": 52,
            "cloud": 0,
            "uv": 5.0,
            "vis_km": 10.0
        },
        "forecast": {
            "forecastday": dates.iter().map(|d| day(d)).collect::<Vec<_>>()
        }
    })
}

fn provider(server: &MockServer) -> WeatherApiProvider {
    WeatherApiProvider::new("TEST_KEY".into()).with_base_url(server.uri())
}

#[tokio::test]
async fn fetches_and_parses_forecast() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .and(query_param("key", "TEST_KEY"))
        .and(query_param("q", "London"))
        .and(query_param("days", "3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(sample_forecast(&["2024-05-10", "2024-05-11", "2024-05-12"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let report = provider(&server)
        .fetch(&LocationQuery::City("London".into()))
        .await
        .expect("fetch should succeed");

    assert_eq!(report.location.name, "London");
    assert_eq!(report.current.condition.text, "Sunny");
    assert_eq!(report.days().len(), 3);
    assert!(report.days().iter().all(|d| d.hour.len() == 24));

    // localtime 15:00 BST at epoch 14:00 UTC.
    assert_eq!(report.location.utc_offset(), chrono::TimeDelta::hours(1));
}

#[tokio::test]
async fn coordinates_are_sent_as_lat_lon() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .and(query_param("q", "51.52,-0.11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_forecast(&["2024-05-10"])))
        .expect(1)
        .mount(&server)
        .await;

    let report = provider(&server)
        .fetch(&LocationQuery::Coordinates { lat: 51.52, lon: -0.11 })
        .await
        .expect("fetch should succeed");

    assert_eq!(report.days().len(), 1);
}

#[tokio::test]
async fn out_of_order_days_are_sorted_before_windowing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(sample_forecast(&["2024-05-11", "2024-05-10"])),
        )
        .mount(&server)
        .await;

    let report = provider(&server)
        .fetch(&LocationQuery::City("London".into()))
        .await
        .expect("fetch should succeed");

    assert_eq!(report.days()[0].date, NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());

    let now = NaiveDateTime::parse_from_str("2024-05-10 15:20", "%Y-%m-%d %H:%M").unwrap();
    let times: Vec<_> = next_24_hour_window(report.days(), now).map(|h| h.time).collect();

    assert_eq!(times.len(), 25);
    assert!(times.windows(2).all(|w| w[0] < w[1]));
    assert!(report.days()[0].is_today(now));
}

#[tokio::test]
async fn api_error_payload_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": { "code": 1006, "message": "No matching location found." }
        })))
        .mount(&server)
        .await;

    let err = provider(&server)
        .fetch(&LocationQuery::City("Atlantis".into()))
        .await
        .unwrap_err();

    match err {
        FetchError::Api { code, message } => {
            assert_eq!(code, 1006);
            assert_eq!(message, "No matching location found.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn server_error_without_payload_reports_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let err = provider(&server)
        .fetch(&LocationQuery::City("London".into()))
        .await
        .unwrap_err();

    match err {
        FetchError::Status { status, body } => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(body, "upstream unavailable");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"location\": 42}"))
        .mount(&server)
        .await;

    let err = provider(&server)
        .fetch(&LocationQuery::City("London".into()))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Parse(_)));
}

#[tokio::test]
async fn invalid_coordinates_never_hit_the_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = provider(&server)
        .fetch(&LocationQuery::Coordinates { lat: 123.0, lon: 0.0 })
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::InvalidCoordinates));
}
