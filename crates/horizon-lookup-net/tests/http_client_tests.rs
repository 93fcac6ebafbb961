//! Tests for the lookup HTTP client.

use std::time::Duration;

use horizon_lookup_net::NetworkError;
use horizon_lookup_net::http::{CACHE_BUSTER_PARAM, HttpClient};

#[test]
fn test_default_config() {
    let client = HttpClient::new();
    let config = client.config();
    assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    assert_eq!(config.redirect_limit, 10);
    assert!(config.bypass_cache);
    assert!(config.user_agent.starts_with("horizon-lookup/"));
}

#[test]
fn test_builder_settings() {
    let client = HttpClient::builder()
        .timeout(Duration::from_secs(60))
        .redirect_limit(0)
        .user_agent("RegattaDesk/2.0")
        .bypass_cache(false)
        .header("X-Api-Key", "secret")
        .expect("valid header")
        .build()
        .expect("Failed to build client");

    let config = client.config();
    assert_eq!(config.timeout, Some(Duration::from_secs(60)));
    assert_eq!(config.redirect_limit, 0);
    assert_eq!(config.user_agent, "RegattaDesk/2.0");
    assert!(!config.bypass_cache);

    let unlimited = HttpClient::builder().without_timeout().build().unwrap();
    assert_eq!(unlimited.config().timeout, None);
}

#[test]
fn test_invalid_default_header_is_rejected() {
    let result = HttpClient::builder().header("bad header", "value");
    assert!(matches!(result, Err(NetworkError::InvalidHeader(_))));
}

#[test]
fn test_request_url_includes_query() {
    let client = HttpClient::new();
    let url = client
        .get("https://club.example/api/sailors")
        .query("fleet", "laser")
        .query("q", "12 34")
        .url()
        .unwrap();

    assert_eq!(url.as_str(), "https://club.example/api/sailors?fleet=laser&q=12+34");
}

#[test]
fn test_bypass_cache_adds_timestamp() {
    let client = HttpClient::new();
    let url = client.get("https://club.example/sailors.json").bypass_cache().url().unwrap();

    let stamp = url
        .query_pairs()
        .find(|(key, _)| key == CACHE_BUSTER_PARAM)
        .map(|(_, value)| value.into_owned())
        .expect("cache buster present");
    assert!(stamp.parse::<i64>().unwrap() > 0);
}

#[tokio::test]
async fn test_invalid_url_fails_on_send() {
    let client = HttpClient::new();
    let result = client.get("not a url").send().await;
    assert!(matches!(result, Err(NetworkError::InvalidUrl(_))));
}

#[tokio::test]
async fn test_invalid_request_header_fails_on_send() {
    let client = HttpClient::new();
    let result = client
        .get("https://club.example/sailors.json")
        .header("bad header", "x")
        .send()
        .await;
    assert!(matches!(result, Err(NetworkError::InvalidHeader(_))));
}

#[cfg(feature = "integration-tests")]
mod integration_tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_json_sends_cache_buster_and_accept() {
        let mock_server = MockServer::start().await;

        // Requests without the cache-busting parameter get a 404
        Mock::given(method("GET"))
            .and(path("/sailors"))
            .and(query_param_is_missing(CACHE_BUSTER_PARAM))
            .respond_with(ResponseTemplate::new(404))
            .with_priority(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/sailors"))
            .and(header("accept", "application/json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!([{"sailnos": "1234"}])),
            )
            .mount(&mock_server)
            .await;

        let client = HttpClient::new();
        let data = client
            .get_json(format!("{}/sailors", mock_server.uri()))
            .await
            .expect("Request failed");

        assert_eq!(data[0]["sailnos"], "1234");
    }

    #[tokio::test]
    async fn test_get_json_without_cache_bypass() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/sailors"))
            .and(query_param_is_missing(CACHE_BUSTER_PARAM))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&mock_server)
            .await;

        let client = HttpClient::builder().bypass_cache(false).build().unwrap();
        let data = client
            .get_json(format!("{}/sailors", mock_server.uri()))
            .await
            .expect("Request failed");

        assert_eq!(data, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_query_and_text_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/status"))
            .and(query_param("fleet", "laser"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new();
        let response = client
            .get(format!("{}/status", mock_server.uri()))
            .query("fleet", "laser")
            .send()
            .await
            .expect("Request failed");

        assert_eq!(response.status(), 200);
        assert!(response.is_success());
        assert_eq!(response.text().await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_get_json_reports_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such list\n"))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new();
        let err = client
            .get_json(format!("{}/missing", mock_server.uri()))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            NetworkError::HttpStatus {
                status: 404,
                message: Some("no such list".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_get_json_rejects_invalid_json() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/garbage"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new();
        let err = client
            .get_json(format!("{}/garbage", mock_server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, NetworkError::Json(_)));
    }

    #[tokio::test]
    async fn test_request_timeout_override() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&mock_server)
            .await;

        let client = HttpClient::new();
        let result = client
            .get(format!("{}/slow", mock_server.uri()))
            .timeout(Duration::from_millis(100))
            .send()
            .await;
        assert_eq!(result.unwrap_err(), NetworkError::Timeout);
    }
}
