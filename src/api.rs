//! Submission service client
//!
//! This module provides the wire types for the submission-fetching service and
//! a provider seam (`SubmissionSource`) so the sync engine can be driven by
//! scripted sources in tests.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::Config;

/// A single submission as returned by the service
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Unique within one user's history
    pub id: String,

    /// Problem display name
    pub title: String,

    /// URL-safe problem identifier
    pub title_slug: String,

    /// Submission language
    pub language: String,

    /// Timestamp string; see [`crate::stats`] for the accepted formats
    pub time: String,
}

impl Submission {
    /// Public URL of the submitted problem
    pub fn problem_url(&self) -> String {
        format!("https://leetcode.com/problems/{}/", self.title_slug)
    }
}

/// Request body sent to the submission endpoint
#[derive(Debug, Serialize)]
struct SubmissionRequest<'a> {
    username: &'a str,
}

/// Success body: the submission list lives under a named field.
/// A missing field is treated the same as an empty list.
#[derive(Debug, Deserialize)]
struct SubmissionResponse {
    #[serde(default)]
    submissions: Vec<Submission>,
}

/// Error body shape; any non-success status without this shape falls back
/// to the HTTP status text.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

/// Trait for fetching one user's submission history
///
/// Implement this to back the sync engine with a different transport,
/// or with a scripted source in tests.
#[async_trait]
pub trait SubmissionSource: Send + Sync {
    /// Fetch all submissions for a username
    ///
    /// An empty `Vec` is a valid result (the user exists but has no
    /// submissions); errors are transport or service failures only.
    async fn fetch_submissions(&self, username: &str) -> Result<Vec<Submission>>;
}

/// HTTP-backed submission source
pub struct HttpSubmissionSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSubmissionSource {
    /// Create a source from configuration
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api.timeout))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.api.endpoint.clone(),
        })
    }

    /// Create a source against an explicit endpoint (used by tests)
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl SubmissionSource for HttpSubmissionSource {
    async fn fetch_submissions(&self, username: &str) -> Result<Vec<Submission>> {
        debug!("Fetching submissions for: {}", username);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&SubmissionRequest { username })
            .send()
            .await
            .with_context(|| format!("Request to {} failed", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            // Prefer the structured error field; a malformed or missing body
            // falls back to the status text.
            let status_text = status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.to_string());

            let message = match response.json::<ErrorResponse>().await {
                Ok(ErrorResponse { error: Some(msg) }) => msg,
                _ => status_text,
            };

            return Err(anyhow!(message));
        }

        let body: SubmissionResponse = response
            .json()
            .await
            .context("Failed to parse submission response")?;

        debug!(
            "Fetched {} submissions for: {}",
            body.submissions.len(),
            username
        );

        Ok(body.submissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(slug: &str) -> Submission {
        Submission {
            id: "1".to_string(),
            title: "Two Sum".to_string(),
            title_slug: slug.to_string(),
            language: "rust".to_string(),
            time: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_problem_url() {
        let sub = sample("two-sum");
        assert_eq!(sub.problem_url(), "https://leetcode.com/problems/two-sum/");
    }

    #[test]
    fn test_submission_wire_names_are_camel_case() {
        let json = r#"{
            "id": "42",
            "title": "Valid Parentheses",
            "titleSlug": "valid-parentheses",
            "language": "python3",
            "time": "2024-05-05 10:00:00"
        }"#;

        let sub: Submission = serde_json::from_str(json).expect("Failed to parse submission");
        assert_eq!(sub.title_slug, "valid-parentheses");
        assert_eq!(sub.language, "python3");
    }

    #[test]
    fn test_missing_submissions_field_is_empty_list() {
        let body: SubmissionResponse = serde_json::from_str("{}").expect("Failed to parse body");
        assert!(body.submissions.is_empty());
    }

    #[test]
    fn test_error_body_with_null_error_field() {
        let body: ErrorResponse =
            serde_json::from_str(r#"{"error": null}"#).expect("Failed to parse body");
        assert!(body.error.is_none());
    }
}
