#![allow(dead_code)]

use qalpuch::QalpuchClient;
use serde_json::{json, Value};
use wiremock::{MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "test_token";

/// A mock API rooted at `/v1`, and a client authenticated against it.
pub async fn setup() -> (MockServer, QalpuchClient) {
    let server = MockServer::start().await;
    let client = client_for(&server, TEST_TOKEN);
    (server, client)
}

pub fn client_for(server: &MockServer, token: &str) -> QalpuchClient {
    QalpuchClient::new_with_url(&format!("{}/v1", server.uri()), token).unwrap()
}

/// A `success: true` envelope around `data`.
pub fn ok(status: u16, data: Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "success": true,
        "message": "ok",
        "data": data
    }))
}

/// A `success: false` envelope with `message`.
pub fn fail(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "success": false,
        "message": message
    }))
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
