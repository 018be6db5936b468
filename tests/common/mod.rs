//! Common test utilities for booru-dl E2E tests

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// URL of the mock image endpoint for an ordinal
pub fn image_url(server: &MockServer, ordinal: u32) -> String {
    format!("{}/img/{ordinal}.jpg", server.uri())
}

/// Mount a successful image endpoint at `/img/{ordinal}.jpg`
#[allow(dead_code)]
pub async fn mount_image(server: &MockServer, ordinal: u32, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(format!("/img/{ordinal}.jpg")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

/// Mount a 404 image endpoint at `/img/{ordinal}.jpg`
#[allow(dead_code)]
pub async fn mount_missing_image(server: &MockServer, ordinal: u32) {
    Mock::given(method("GET"))
        .and(path(format!("/img/{ordinal}.jpg")))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

/// A board post JSON object pointing at the mock image endpoint
#[allow(dead_code)]
pub fn board_post(server: &MockServer, id: u64, ordinal: u32, tags: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "file_url": image_url(server, ordinal),
        "tags": tags,
        "rating": "general"
    })
}
