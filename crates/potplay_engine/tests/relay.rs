use std::time::Duration;

use potplay_core::PushRecord;
use potplay_engine::{HttpRelay, Relay, RelayError, RelaySettings, DEFAULT_PUSH_URL};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn record() -> PushRecord {
    PushRecord {
        title: "电影 存储空间 /NAS 的文件/Movies/Inception.mkv (1080p)".to_string(),
        path: "存储空间 /NAS 的文件/Movies/Inception.mkv".to_string(),
        page_url: "http://nas.local:5666/v/movie/42".to_string(),
    }
}

fn relay_for(server: &MockServer) -> HttpRelay {
    HttpRelay::new(RelaySettings {
        endpoint: format!("{}/push", server.uri()),
        ..RelaySettings::default()
    })
    .expect("relay")
}

#[tokio::test]
async fn relay_posts_json_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/push"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "title": "电影 存储空间 /NAS 的文件/Movies/Inception.mkv (1080p)",
            "path": "存储空间 /NAS 的文件/Movies/Inception.mkv",
            "page_url": "http://nas.local:5666/v/movie/42",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let response = relay_for(&server).send(&record()).await.expect("send ok");
    assert_eq!(response.status, 200);
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&response.body).unwrap(),
        json!({ "ok": true })
    );
}

#[tokio::test]
async fn relay_treats_error_status_as_delivered() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/push"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "ok": false, "error": "player not found" })),
        )
        .mount(&server)
        .await;

    let response = relay_for(&server).send(&record()).await.expect("delivered");
    assert_eq!(response.status, 500);
    assert!(response.body.contains("player not found"));
}

#[tokio::test]
async fn relay_reports_connection_refused_as_transport_error() {
    // Reserve a free port, then close it so nothing is listening there.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let relay = HttpRelay::new(RelaySettings {
        endpoint: format!("http://127.0.0.1:{port}/push"),
        ..RelaySettings::default()
    })
    .unwrap();

    let err = relay.send(&record()).await.unwrap_err();
    assert!(matches!(err, RelayError::Transport(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn relay_times_out_on_slow_companion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/push"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(250)))
        .mount(&server)
        .await;

    let relay = HttpRelay::new(RelaySettings {
        endpoint: format!("{}/push", server.uri()),
        request_timeout: Duration::from_millis(50),
        ..RelaySettings::default()
    })
    .unwrap();

    let err = relay.send(&record()).await.unwrap_err();
    assert!(matches!(err, RelayError::Timeout(_)), "unexpected error: {err:?}");
}

#[test]
fn relay_rejects_bad_endpoints() {
    for endpoint in ["not a url", "ftp://127.0.0.1/push"] {
        let err = HttpRelay::new(RelaySettings {
            endpoint: endpoint.to_string(),
            ..RelaySettings::default()
        })
        .unwrap_err();
        assert!(matches!(err, RelayError::InvalidEndpoint { .. }));
    }
}

#[test]
fn default_endpoint_is_local_push() {
    let relay = HttpRelay::new(RelaySettings::default()).unwrap();
    assert_eq!(relay.endpoint().as_str(), DEFAULT_PUSH_URL);
}
