mod common;

use bark_push::client::{BarkClient, SendOutcome};
use bark_push::payload::{PushOptions, PushParams};
use common::{refused_url, MockRelay};
use serde_json::Value;

#[test]
fn test_success_posts_json_to_push_endpoint() {
    let relay = MockRelay::respond(200, r#"{"code":200,"message":"success"}"#);
    let mut client = BarkClient::with_server(["key123"], relay.url.clone()).unwrap();

    let outcome = client.send("Hi", "there", &PushParams::new());
    assert_eq!(outcome, SendOutcome::Success);
    assert_eq!(client.last_http_status(), 200);
    assert!(client.last_error().is_empty());

    let request = relay.captured();
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/push");
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert!(request.header("user-agent").unwrap().starts_with("bark-push/"));
    assert_eq!(request.body, r#"{"device_keys":["key123"],"title":"Hi","body":"there"}"#);
}

#[test]
fn test_http_error_keeps_status_and_body() {
    let relay = MockRelay::respond(500, "server error");
    let mut client = BarkClient::with_server(["key123"], relay.url.clone()).unwrap();

    let outcome = client.send("Hi", "there", &PushParams::new());
    assert_eq!(outcome, SendOutcome::HttpError);
    assert_eq!(client.last_http_status(), 500);
    assert!(client.last_error().contains("500"));
    assert!(client.last_error().contains("server error"));
    relay.captured();
}

#[test]
fn test_empty_body_is_reported() {
    let relay = MockRelay::respond(200, "");
    let mut client = BarkClient::with_server(["key123"], relay.url.clone()).unwrap();

    assert_eq!(client.send("Hi", "there", &PushParams::new()), SendOutcome::EmptyResponse);
    assert_eq!(client.last_http_status(), 200);
    relay.captured();
}

#[test]
fn test_connection_refused_is_network_error() {
    let mut client = BarkClient::with_server(["key123"], refused_url()).unwrap();

    assert_eq!(client.send("Hi", "there", &PushParams::new()), SendOutcome::NetworkError);
    assert_eq!(client.last_http_status(), 0);
    assert!(!client.last_error().is_empty());
}

#[test]
fn test_advanced_push_over_the_wire() {
    let relay = MockRelay::respond(200, "ok");
    let mut client = BarkClient::with_server(["k1", "k2"], relay.url.clone()).unwrap();

    let options = PushOptions::default()
        .with_url("example.com")
        .with_group("ci")
        .with_level("timeSensitive");
    assert!(client.send_advanced("Build", "line one\nline \"two\"", &options).is_success());

    let body: Value = serde_json::from_str(&relay.captured().body).unwrap();
    assert_eq!(body["device_keys"], serde_json::json!(["k1", "k2"]));
    assert_eq!(body["body"], "line one\nline \"two\"");
    assert_eq!(body["url"], "https://example.com");
    assert_eq!(body["group"], "ci");
    assert_eq!(body["level"], "timeSensitive");
    assert_eq!(body["archive"], 1);
    assert_eq!(body["autoCopy"], 0);
}

#[test]
fn test_redirect_is_not_followed() {
    let target = MockRelay::respond(200, "ok");
    let relay = MockRelay::redirect(302, &format!("{}elsewhere", target.url));
    let mut client = BarkClient::with_server(["key123"], relay.url.clone()).unwrap();

    let outcome = client.send("Hi", "there", &PushParams::new());
    assert_eq!(outcome, SendOutcome::HttpError);
    assert_eq!(client.last_http_status(), 302);
    assert!(client.last_error().contains("302"));

    assert_eq!(relay.captured().path, "/push");
    assert!(target.received().is_empty());
}
