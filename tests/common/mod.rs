/// Common test utilities and helpers for leetwatch tests
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use leetwatch::HttpSubmissionSource;

pub const ENDPOINT_PATH: &str = "/api/submissions";

/// Submission source pointed at a mock server
pub fn source_for(server: &MockServer) -> HttpSubmissionSource {
    HttpSubmissionSource::with_endpoint(format!("{}{}", server.uri(), ENDPOINT_PATH))
}

/// One submission record in the service's wire shape
pub fn submission_json(id: &str, title: &str, slug: &str, time: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "titleSlug": slug,
        "language": "rust",
        "time": time,
    })
}

/// A small, fixed history for a user
pub fn sample_history() -> Vec<Value> {
    vec![
        submission_json("1", "Two Sum", "two-sum", "2024-01-01T00:00:00.000Z"),
        submission_json("2", "Valid Parentheses", "valid-parentheses", "2024-01-02 10:30:00"),
    ]
}

/// Mount a successful submission-list response for one username
pub async fn mount_submissions(
    server: &MockServer,
    username: &str,
    submissions: Vec<Value>,
    expected_calls: u64,
) {
    Mock::given(method("POST"))
        .and(path(ENDPOINT_PATH))
        .and(body_json(json!({ "username": username })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "submissions": submissions })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Mount a success response whose body has no `submissions` field at all
pub async fn mount_bodyless_success(server: &MockServer, username: &str) {
    Mock::given(method("POST"))
        .and(path(ENDPOINT_PATH))
        .and(body_json(json!({ "username": username })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(server)
        .await;
}

/// Mount a structured error response for one username
pub async fn mount_error(server: &MockServer, username: &str, status: u16, error: &str) {
    Mock::given(method("POST"))
        .and(path(ENDPOINT_PATH))
        .and(body_json(json!({ "username": username })))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "error": error })))
        .expect(1)
        .mount(server)
        .await;
}

/// Mount a failure with an unstructured (non-JSON) body
pub async fn mount_raw_failure(server: &MockServer, username: &str, status: u16) {
    Mock::given(method("POST"))
        .and(path(ENDPOINT_PATH))
        .and(body_json(json!({ "username": username })))
        .respond_with(ResponseTemplate::new(status).set_body_string("upstream exploded"))
        .expect(1)
        .mount(server)
        .await;
}
