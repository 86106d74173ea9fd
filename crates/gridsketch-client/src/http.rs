//! reqwest adapter for the AOI processing service.
//!
//! Both endpoints go through one shared submit-and-classify routine: the
//! response body is always read as text first, so a malformed or non-JSON
//! error page degrades to a truncated diagnostic instead of a parse crash.

use async_trait::async_trait;
use geojson::FeatureCollection;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use gridsketch_core::error::{GridsketchError, Result};
use gridsketch_core::models::{AoiStats, SegmentOutcome, SegmentRequest};

use crate::ports::AoiService;

/// Maximum length of a non-JSON error body shown to the user
const ERROR_SNIPPET_LEN: usize = 150;

/// HTTP adapter for the AOI processing service
#[derive(Debug, Clone)]
pub struct HttpAoiService {
    /// Base URL of the service (e.g., "http://localhost:5000")
    base_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpAoiService {
    /// Create a new adapter with the given base URL and request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GridsketchError::Network {
                reason: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Create with the default localhost URL and a 30 second timeout
    pub fn localhost() -> Result<Self> {
        Self::new("http://localhost:5000", Duration::from_secs(30))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a JSON body and classify the response.
    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "dispatching request");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| GridsketchError::Network {
                reason: format!("Request to {} failed: {}", url, e),
            })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        // Text first, always; classification happens on the raw body
        let text = response.text().await.map_err(|e| GridsketchError::Network {
            reason: format!("Failed to read response body: {}", e),
        })?;

        if !status.is_success() {
            let err = classify_failure(status.as_u16(), &content_type, &text);
            tracing::warn!(%url, status = status.as_u16(), "service request failed: {}", err);
            return Err(err);
        }

        parse_success(&text)
    }
}

#[async_trait]
impl AoiService for HttpAoiService {
    async fn process_aoi(&self, aoi: &FeatureCollection) -> Result<AoiStats> {
        self.post_json("/process_aoi", aoi).await
    }

    async fn segment_aoi(&self, request: &SegmentRequest) -> Result<SegmentOutcome> {
        self.post_json("/segment_aoi", request).await
    }

    fn download_url(&self, filename: &str) -> String {
        format!("{}/download/{}", self.base_url, filename)
    }
}

/// Error body the service returns on failures it handled itself
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Classify a non-2xx response. A JSON body yields its `error` field;
/// anything else (an HTML traceback, plain text) is truncated to a snippet.
pub fn classify_failure(status: u16, content_type: &str, body: &str) -> GridsketchError {
    if content_type.contains("application/json") {
        if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
            return GridsketchError::Server {
                status,
                message: parsed.error,
            };
        }
    }

    let message = if body.is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {} - {}", status, snippet(body))
    };
    GridsketchError::Server { status, message }
}

/// Parse a 2xx body, treating an empty body as its own error kind.
pub fn parse_success<T: DeserializeOwned>(body: &str) -> Result<T> {
    if body.trim().is_empty() {
        return Err(GridsketchError::EmptyResponse);
    }

    serde_json::from_str(body).map_err(|e| {
        GridsketchError::Serialization(format!("Failed to parse service response: {}", e))
    })
}

fn snippet(body: &str) -> String {
    let mut snippet: String = body.chars().take(ERROR_SNIPPET_LEN).collect();
    if body.chars().count() > ERROR_SNIPPET_LEN {
        snippet.push_str("...");
    }
    snippet
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridsketch_core::models::Centroid;

    #[test]
    fn test_service_creation() {
        let service = HttpAoiService::localhost().unwrap();
        assert_eq!(service.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let service =
            HttpAoiService::new("http://geo.example.com:8000/", Duration::from_secs(10)).unwrap();
        assert_eq!(service.base_url(), "http://geo.example.com:8000");
        assert_eq!(
            service.download_url("grid.geojson"),
            "http://geo.example.com:8000/download/grid.geojson"
        );
    }

    #[test]
    fn test_json_error_body_yields_message() {
        let err = classify_failure(
            400,
            "application/json",
            r#"{"error": "LineString requires at least 2 points"}"#,
        );
        match err {
            GridsketchError::Server { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "LineString requires at least 2 points");
            }
            other => panic!("expected Server error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_json_error_falls_back_to_snippet() {
        let err = classify_failure(500, "application/json", "not actually json");
        match err {
            GridsketchError::Server { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "HTTP 500 - not actually json");
            }
            other => panic!("expected Server error, got {:?}", other),
        }
    }

    #[test]
    fn test_html_body_is_truncated() {
        let body = format!("<html><body>{}</body></html>", "x".repeat(500));
        let err = classify_failure(500, "text/html", &body);
        match err {
            GridsketchError::Server { message, .. } => {
                assert!(message.starts_with("HTTP 500 - <html><body>"));
                assert!(message.ends_with("..."));
                // "HTTP 500 - " prefix plus the snippet plus the ellipsis
                assert_eq!(message.chars().count(), 11 + ERROR_SNIPPET_LEN + 3);
            }
            other => panic!("expected Server error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_error_body() {
        let err = classify_failure(502, "", "");
        match err {
            GridsketchError::Server { message, .. } => assert_eq!(message, "HTTP 502"),
            other => panic!("expected Server error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_success_body() {
        let result: Result<AoiStats> = parse_success("");
        assert!(matches!(result, Err(GridsketchError::EmptyResponse)));

        let result: Result<AoiStats> = parse_success("   \n");
        assert!(matches!(result, Err(GridsketchError::EmptyResponse)));
    }

    #[test]
    fn test_unparseable_success_body() {
        let result: Result<AoiStats> = parse_success("<html>surprise</html>");
        assert!(matches!(result, Err(GridsketchError::Serialization(_))));
    }

    #[test]
    fn test_valid_stats_body() {
        let stats: AoiStats = parse_success(
            r#"{"num_points": 4, "area_sqkm": 2.5, "is_closed": true,
                "centroid": {"lon": 1.0, "lat": 2.0}}"#,
        )
        .unwrap();
        assert_eq!(stats.num_points, 4);
        assert!(stats.is_closed);
        assert_eq!(stats.centroid, Centroid::new(1.0, 2.0));
    }

    #[test]
    fn test_multibyte_body_is_not_split_mid_character() {
        // A body of multi-byte characters longer than the snippet limit
        let body = "é".repeat(ERROR_SNIPPET_LEN + 50);
        let err = classify_failure(500, "text/html", &body);
        match err {
            GridsketchError::Server { message, .. } => {
                assert!(message.ends_with("..."));
            }
            other => panic!("expected Server error, got {:?}", other),
        }
    }
}
