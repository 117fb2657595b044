use std::sync::Arc;

use api_request::{Config, DocumentCookieJar, Handlers, Payload, RequestBuilder};
use serde::Serialize;
use serde_json::json;
use wiremock::matchers::{body_json, body_string, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn builder_for(server: &MockServer) -> RequestBuilder {
    let jar = Arc::new(DocumentCookieJar::new());
    RequestBuilder::from_config(Config::new(server.uri()), jar).expect("builder should build")
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_post_raw_text_sent_verbatim() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/body"))
        .and(body_string("payload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 0})))
        .expect(1)
        .mount(&server)
        .await;

    let mut builder = builder_for(&server);
    builder
        .post("body", "payload", Some(Handlers::new(|_| {})))
        .resolve()
        .await
        .expect("request should succeed");
}

#[derive(Serialize)]
struct NewUser<'a> {
    name: &'a str,
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_post_serializes_structs() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_string(r#"{"name":"a"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 0})))
        .expect(1)
        .mount(&server)
        .await;

    let payload = Payload::json(&NewUser { name: "a" }).expect("payload");
    let mut builder = builder_for(&server);
    builder
        .post("users", payload, Some(Handlers::new(|_| {})))
        .resolve()
        .await
        .expect("request should succeed");
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_put_value_encoded_by_transport() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/users/1"))
        .and(body_json(json!({"name": "a"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 0})))
        .expect(1)
        .mount(&server)
        .await;

    let mut builder = builder_for(&server);
    builder
        .put("users/1", json!({"name": "a"}), Some(Handlers::new(|_| {})))
        .resolve()
        .await
        .expect("request should succeed");
}
