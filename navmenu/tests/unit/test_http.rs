//! Deploy-changes HTTP client tests

mod support;

use std::sync::Arc;
use std::time::Duration;

use navmenu::deploy::poller::{DeployOutcome, DeployPoller, Options};
use navmenu::errors::NavError;
use navmenu::http::client::{ClientOptions, HttpClient};
use openapi_client::models::DeployStatus;
use secrecy::SecretString;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{EventLog, RecordingPrompter};

fn client(server: &MockServer) -> HttpClient {
    HttpClient::new(&ClientOptions {
        base_url: format!("{}/blog/ghost", server.uri()),
        session_cookie: Some(SecretString::from("ghost-admin-api-session=abc".to_string())),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

#[tokio::test]
async fn test_trigger_posts_empty_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/blog/ghost/deploy-changes/production"))
        .and(header("content-type", "application/json"))
        .and(header("cache-control", "no-cache"))
        .and(header("cookie", "ghost-admin-api-session=abc"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 0, "msg": "starting"})))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server).trigger_deploy("production").await.unwrap();
    assert_eq!(response.status, DeployStatus::Pending);
    assert_eq!(response.msg, "starting");

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("referer").is_none());
}

#[tokio::test]
async fn test_status_gets_trailing_slash_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blog/ghost/deploy-changes/"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "1", "msg": "done"})))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server).deploy_status().await.unwrap();
    assert_eq!(response.status, DeployStatus::Complete);
    assert_eq!(response.msg, "done");
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blog/ghost/deploy-changes/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = client(&server).deploy_status().await;
    match result {
        Err(NavError::HttpStatus { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_json_is_a_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blog/ghost/deploy-changes/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let result = client(&server).deploy_status().await;
    assert!(matches!(result, Err(NavError::JsonError(_))));
}

#[tokio::test]
async fn test_same_origin_redirect_is_followed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blog/ghost/deploy-changes/"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", "/blog/ghost/deploy-status/"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/blog/ghost/deploy-status/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 1, "msg": "moved"})))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server).deploy_status().await.unwrap();
    assert_eq!(response.msg, "moved");
}

#[tokio::test]
async fn test_cross_origin_redirect_is_not_followed() {
    let server = MockServer::start().await;
    let elsewhere = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blog/ghost/deploy-changes/"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", format!("{}/steal", elsewhere.uri()).as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 1, "msg": ""})))
        .expect(0)
        .mount(&elsewhere)
        .await;

    let result = client(&server).deploy_status().await;
    assert!(matches!(result, Err(NavError::HttpStatus { status: 302, .. })));
}

#[tokio::test]
async fn test_redirect_loop_stops_after_ten_hops() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blog/ghost/deploy-changes/"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", "/blog/ghost/deploy-changes/"),
        )
        .expect(10)
        .mount(&server)
        .await;

    let result = client(&server).deploy_status().await;
    match result {
        Err(NavError::HttpError(e)) => assert!(e.is_redirect()),
        other => panic!("expected a redirect error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_poller_against_http_backend() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/blog/ghost/deploy-changes/production"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 0, "msg": "starting"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/blog/ghost/deploy-changes/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 1, "msg": "done"})))
        .expect(1)
        .mount(&server)
        .await;

    let log = EventLog::new();
    let poller = DeployPoller::new(
        Arc::new(client(&server)),
        Arc::new(RecordingPrompter::new(&log, true)),
        Options {
            poll_interval: Duration::from_millis(10),
            ..Default::default()
        },
    );

    let outcome = poller
        .start_deploy("production", tokio::time::sleep, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        DeployOutcome::Completed {
            message: "done".to_string()
        }
    );
    assert_eq!(log.notifications(), vec!["starting", "done"]);
}
