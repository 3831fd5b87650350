//! HTTP client tests against wiremock servers

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use weather_gateway::{
    Coordinates, DataShape, ForecastParams, GatewayError, GeminiResolver, Location,
    LocationResolver, NewsClient, PlacesClient, PlacesOp, TomorrowClient, UpstreamResult,
    WeatherProvider,
};

#[tokio::test]
async fn test_realtime_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather/realtime"))
        .and(query_param("location", "43.0722,-89.4008"))
        .and(query_param("apikey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "values": { "temperature": 21.3 } }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TomorrowClient::new(mock_server.uri(), "test-key").unwrap();
    let result = client
        .fetch(
            DataShape::Realtime,
            &Location::normalize("43.0722,-89.4008"),
            &ForecastParams::default(),
        )
        .await;

    assert_eq!(
        result,
        UpstreamResult::Success(json!({ "data": { "values": { "temperature": 21.3 } } }))
    );
}

#[tokio::test]
async fn test_realtime_free_text_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather/realtime"))
        .and(query_param("location", "Antarctica-unknown-hamlet"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": 400001,
            "type": "Invalid Query Parameters",
            "message": "The entries provided as query parameters were not valid for the request."
        })))
        .mount(&mock_server)
        .await;

    let client = TomorrowClient::new(mock_server.uri(), "test-key").unwrap();
    let result = client
        .fetch(
            DataShape::Realtime,
            &Location::normalize("Antarctica-unknown-hamlet"),
            &ForecastParams::default(),
        )
        .await;

    match result {
        UpstreamResult::Rejected { status, reason } => {
            assert_eq!(status, 400);
            assert!(reason.contains("not valid"));
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_is_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&mock_server)
        .await;

    let client = TomorrowClient::new(mock_server.uri(), "test-key").unwrap();
    let result = client
        .fetch(
            DataShape::Realtime,
            &Location::normalize("Paris"),
            &ForecastParams::default(),
        )
        .await;

    assert!(matches!(result, UpstreamResult::TransportError(ref msg) if msg.contains("503")));
}

#[tokio::test]
async fn test_unreachable_provider_is_transport_error() {
    // Nothing listens on the discard port
    let client = TomorrowClient::new("http://127.0.0.1:9", "test-key").unwrap();
    let result = client
        .fetch(
            DataShape::Realtime,
            &Location::normalize("Paris"),
            &ForecastParams::default(),
        )
        .await;

    assert!(matches!(result, UpstreamResult::TransportError(_)));
}

#[tokio::test]
async fn test_forecast_sends_parameters_and_defaults() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/timelines"))
        .and(query_param("location", "43.0722,-89.4008"))
        .and(query_param("fields", "temperature,humidity"))
        .and(query_param("timesteps", "1h"))
        .and(query_param("startTime", "2025-01-01T00:00:00Z"))
        .and(query_param("endTime", "2025-01-02T00:00:00Z"))
        .and(query_param("units", "metric"))
        .and(query_param("timezone", "UTC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "timelines": [] } })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let params = ForecastParams {
        fields: Some("temperature,humidity".to_string()),
        start_time: Some("2025-01-01T00:00:00Z".to_string()),
        end_time: Some("2025-01-02T00:00:00Z".to_string()),
        units: Some("metric".to_string()),
        ..Default::default()
    };

    let client = TomorrowClient::new(mock_server.uri(), "test-key").unwrap();
    let result = client
        .fetch(
            DataShape::Forecast,
            &Location::normalize("43.0722,-89.4008"),
            &params,
        )
        .await;

    assert!(matches!(result, UpstreamResult::Success(_)));
}

fn gemini_reply(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn test_gemini_resolves_coordinates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-test:generateContent"))
        .and(query_param("key", "gemini-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(gemini_reply("The coordinates are '''-75.2500,-0.0713''' approximately.")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let resolver = GeminiResolver::new(mock_server.uri(), "gemini-test", "gemini-key").unwrap();
    let coords = resolver.resolve("Antarctica-unknown-hamlet").await.unwrap();

    assert_eq!(coords, Coordinates { lat: -75.25, lng: -0.0713 });
}

#[tokio::test]
async fn test_gemini_reply_without_coordinates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("I am not sure where that is.")))
        .mount(&mock_server)
        .await;

    let resolver = GeminiResolver::new(mock_server.uri(), "gemini-test", "gemini-key").unwrap();
    let err = resolver.resolve("Atlantis").await.unwrap_err();

    assert!(matches!(err, GatewayError::Resolution { ref location, .. } if location == "Atlantis"));
}

#[tokio::test]
async fn test_gemini_http_error_is_transport() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
        .mount(&mock_server)
        .await;

    let resolver = GeminiResolver::new(mock_server.uri(), "gemini-test", "bad").unwrap();
    let err = resolver.resolve("Atlantis").await.unwrap_err();

    assert!(matches!(err, GatewayError::Transport(ref msg) if msg.contains("403")));
}

#[tokio::test]
async fn test_places_autocomplete_passthrough() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/autocomplete/json"))
        .and(query_param("input", "Madi"))
        .and(query_param("types", "geocode"))
        .and(query_param("key", "maps-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "predictions": [{ "description": "Madison, WI, USA" }],
            "status": "OK"
        })))
        .mount(&mock_server)
        .await;

    let client = PlacesClient::new(mock_server.uri(), "maps-key").unwrap();
    let body = client
        .execute(&PlacesOp::Autocomplete {
            input: "Madi".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(body["status"], "OK");
    assert_eq!(body["predictions"][0]["description"], "Madison, WI, USA");
}

#[tokio::test]
async fn test_places_reverse_geocode() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .and(query_param("latlng", "43.07,-89.40"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [], "status": "ZERO_RESULTS" })))
        .mount(&mock_server)
        .await;

    let client = PlacesClient::new(mock_server.uri(), "maps-key").unwrap();
    let body = client
        .execute(&PlacesOp::Reverse {
            lat: "43.07".to_string(),
            lng: "-89.40".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(body["status"], "ZERO_RESULTS");
}

#[tokio::test]
async fn test_news_search_parses_feed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "weather Antarctica"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<?xml version="1.0"?><rss version="2.0"><channel>
            <item><title>Record low at the pole</title><link>https://news.example/1</link>
            <pubDate>Tue, 04 Feb 2025 08:00:00 GMT</pubDate></item>
            <item><title>Ice shelf update</title><link>https://news.example/2</link>
            <pubDate>Tue, 04 Feb 2025 07:00:00 GMT</pubDate><source url="https://bbc.co.uk">BBC</source></item>
            </channel></rss>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = NewsClient::new(mock_server.uri()).unwrap();
    let articles = client.search("Antarctica").await.unwrap();

    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].title, "Record low at the pole");
    assert_eq!(articles[0].source, None);
    assert_eq!(articles[1].source.as_deref(), Some("BBC"));
}
