//! Outbound client for the generative-language API.
//!
//! One bounded-timeout POST per inbound request, no retries. The client
//! reports what happened at the wire level as a `FetchOutcome`; it never
//! interprets the document — that is the normalizer's job.

use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

use crate::config::{TimeoutConfig, UpstreamConfig};
use crate::upstream::normalize::FetchOutcome;
use crate::upstream::payload::GenerateContentRequest;

/// Failure to construct the client at startup.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("invalid upstream endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// HTTP client for the upstream provider.
///
/// Holds the resolved endpoint and credential for the process lifetime; the
/// credential travels as a query parameter and is kept out of the stored URL
/// so it can never end up in a log line.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl UpstreamClient {
    /// Build the client from validated configuration.
    pub fn new(
        upstream: &UpstreamConfig,
        timeouts: &TimeoutConfig,
    ) -> Result<Self, ClientBuildError> {
        let endpoint = Url::parse(&format!(
            "{}/models/{}:generateContent",
            upstream.base_url.trim_end_matches('/'),
            upstream.model
        ))?;

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.upstream_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            api_key: upstream.api_key.clone(),
        })
    }

    /// Send one generateContent call and report the raw outcome.
    pub async fn generate(&self, payload: &GenerateContentRequest) -> FetchOutcome {
        let response = match self
            .http
            .post(self.endpoint.clone())
            .query(&[("key", self.api_key.as_str())])
            .json(payload)
            .send()
            .await
        {
            Ok(response) => response,
            // without_url: the request URL carries the credential.
            Err(e) => return FetchOutcome::ConnectFailure(e.without_url().to_string()),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return FetchOutcome::ConnectFailure(e.without_url().to_string()),
        };

        if status.is_success() {
            FetchOutcome::Body(body)
        } else {
            FetchOutcome::HttpError {
                status: status.as_u16(),
                body,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(base_url: &str) -> UpstreamClient {
        let upstream = UpstreamConfig {
            base_url: base_url.to_string(),
            model: "test-model".to_string(),
            api_key: "k".to_string(),
        };
        UpstreamClient::new(&upstream, &TimeoutConfig::default()).unwrap()
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let a = client_for("http://127.0.0.1:9/v1beta");
        let b = client_for("http://127.0.0.1:9/v1beta/");
        assert_eq!(a.endpoint, b.endpoint);
        assert!(a
            .endpoint
            .as_str()
            .ends_with("/v1beta/models/test-model:generateContent"));
    }

    #[test]
    fn credential_is_not_part_of_the_stored_endpoint() {
        let client = client_for("http://127.0.0.1:9/v1beta");
        assert!(!client.endpoint.as_str().contains("key"));
        assert!(client.endpoint.query().is_none());
    }

    #[tokio::test]
    async fn refused_connection_is_a_connect_failure() {
        // Port 9 (discard) is assumed closed.
        let client = client_for("http://127.0.0.1:9/v1beta");
        let payload = crate::upstream::payload::build_payload(
            &serde_json::from_str(r#"{"prompt":"hi"}"#).unwrap(),
        )
        .unwrap();
        match client.generate(&payload).await {
            FetchOutcome::ConnectFailure(detail) => {
                // Redacted summary, no credential.
                assert!(!detail.contains("key="));
            }
            other => panic!("expected ConnectFailure, got {:?}", other),
        }
    }
}
