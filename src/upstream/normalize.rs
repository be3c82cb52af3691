//! The response normalizer.
//!
//! Maps the raw upstream outcome (a 2xx body, an error status, or a failed
//! connection) onto a closed union of named outcomes, in strict order with
//! first match winning. Pure function of its input: no I/O, no logging, no
//! ambient configuration, so every branch is unit-testable offline.

use crate::error::RelayError;
use crate::upstream::schema::{GenerateContentResponse, FINISH_MAX_TOKENS, FINISH_SAFETY};

/// What came back from the wire, before any interpretation.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Upstream replied 2xx; payload body as received.
    Body(String),
    /// Upstream replied with a non-success status.
    HttpError { status: u16, body: String },
    /// The call never produced an HTTP response (refused, DNS, timeout).
    ConnectFailure(String),
}

impl FetchOutcome {
    /// Operator-facing description of the raw outcome, for diagnostics.
    /// Never sent to the caller.
    pub fn diagnostic(&self) -> String {
        match self {
            FetchOutcome::Body(body) => body.clone(),
            FetchOutcome::HttpError { status, body } => {
                format!("upstream HTTP {}: {}", status, body)
            }
            FetchOutcome::ConnectFailure(detail) => detail.clone(),
        }
    }
}

/// Where a block verdict originated; decides the caller-facing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSource {
    /// `promptFeedback.blockReason`: the prompt was rejected outright (500).
    PromptFeedback,
    /// `finishReason == "SAFETY"`: generation was cut off (400).
    SafetyStop,
}

/// Classified upstream outcome. Exactly one variant holds per call.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamResult {
    /// Usable text, passed through unmodified.
    Success(String),
    /// Content policy rejection; reason reported verbatim to the caller.
    Blocked { reason: String, source: BlockSource },
    /// Token budget ran out before any text was produced.
    Truncated,
    /// 200 with a candidate but no text and no diagnostic reason.
    EmptyContent,
    /// The call failed at the transport level. `status` is `Some` when the
    /// upstream actually replied with a non-2xx code.
    TransportError { detail: String, status: Option<u16> },
    /// Document shape unrecognized; upstream contract drift.
    Malformed,
}

impl UpstreamResult {
    /// Label for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            UpstreamResult::Success(_) => "success",
            UpstreamResult::Blocked { .. } => "blocked",
            UpstreamResult::Truncated => "truncated",
            UpstreamResult::EmptyContent => "empty_content",
            UpstreamResult::TransportError { status: None, .. } => "unreachable",
            UpstreamResult::TransportError { status: Some(_), .. } => "bad_gateway",
            UpstreamResult::Malformed => "malformed",
        }
    }

    /// Convert into the caller-facing reply: the answer text, or the error
    /// that fixes the status code and message.
    pub fn into_reply(self) -> Result<String, RelayError> {
        match self {
            UpstreamResult::Success(text) => Ok(text),
            UpstreamResult::Blocked {
                reason,
                source: BlockSource::PromptFeedback,
            } => Err(RelayError::Blocked(reason)),
            UpstreamResult::Blocked {
                source: BlockSource::SafetyStop,
                ..
            } => Err(RelayError::SafetyStop),
            UpstreamResult::Truncated => Err(RelayError::Truncated),
            // EmptyContent is contract drift as far as the caller can tell.
            UpstreamResult::EmptyContent | UpstreamResult::Malformed => Err(RelayError::NoText),
            UpstreamResult::TransportError { status: None, .. } => Err(RelayError::Unreachable),
            UpstreamResult::TransportError {
                status: Some(status),
                ..
            } => Err(RelayError::BadGateway(status)),
        }
    }
}

/// Classify a raw fetch outcome. Strict order, first match wins:
///
/// 1. transport failures (connection-level, then non-2xx reply)
/// 2. non-empty `candidates[0].content.parts[0].text` → success
/// 3. `promptFeedback.blockReason` → blocked, reason verbatim
/// 4. `finishReason == "MAX_TOKENS"` → truncated
/// 5. `finishReason == "SAFETY"` → blocked by safety stop
/// 6. anything else → empty content or malformed
pub fn normalize(outcome: &FetchOutcome) -> UpstreamResult {
    let raw = match outcome {
        FetchOutcome::ConnectFailure(detail) => {
            return UpstreamResult::TransportError {
                detail: detail.clone(),
                status: None,
            }
        }
        FetchOutcome::HttpError { status, body } => {
            return UpstreamResult::TransportError {
                detail: body.clone(),
                status: Some(*status),
            }
        }
        FetchOutcome::Body(raw) => raw,
    };

    let doc: GenerateContentResponse = match serde_json::from_str(raw) {
        Ok(doc) => doc,
        Err(_) => return UpstreamResult::Malformed,
    };

    if let Some(text) = doc.first_text().filter(|t| !t.is_empty()) {
        return UpstreamResult::Success(text.to_string());
    }

    if let Some(reason) = doc
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.clone())
    {
        return UpstreamResult::Blocked {
            reason,
            source: BlockSource::PromptFeedback,
        };
    }

    match doc
        .first_candidate()
        .and_then(|c| c.finish_reason.as_deref())
    {
        Some(FINISH_MAX_TOKENS) => UpstreamResult::Truncated,
        Some(FINISH_SAFETY) => UpstreamResult::Blocked {
            reason: FINISH_SAFETY.to_string(),
            source: BlockSource::SafetyStop,
        },
        _ if doc.first_candidate().is_some() => UpstreamResult::EmptyContent,
        _ => UpstreamResult::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn body(json: serde_json::Value) -> FetchOutcome {
        FetchOutcome::Body(json.to_string())
    }

    fn success_doc(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": text }], "role": "model" },
                "finishReason": "STOP"
            }]
        })
    }

    #[test]
    fn text_passes_through_unmodified() {
        let text = "Répondez: 42 \u{1F600}\n  trailing spaces  ";
        let result = normalize(&body(success_doc(text)));
        assert_eq!(result, UpstreamResult::Success(text.to_string()));
        assert_eq!(result.into_reply().unwrap(), text);
    }

    #[test]
    fn success_wins_over_later_branches() {
        // Text present alongside a block reason: first match wins.
        let result = normalize(&body(serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "ok" }] },
                "finishReason": "MAX_TOKENS"
            }],
            "promptFeedback": { "blockReason": "OTHER" }
        })));
        assert_eq!(result, UpstreamResult::Success("ok".to_string()));
    }

    #[test]
    fn empty_text_is_not_success() {
        let result = normalize(&body(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "" }] } }]
        })));
        assert_eq!(result, UpstreamResult::EmptyContent);
    }

    #[test]
    fn block_reason_reported_verbatim_as_500() {
        let result = normalize(&body(serde_json::json!({
            "promptFeedback": { "blockReason": "OTHER" }
        })));
        let err = result.into_reply().unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("OTHER"));
    }

    #[test]
    fn max_tokens_without_text_is_truncated() {
        let result = normalize(&body(serde_json::json!({
            "candidates": [{ "finishReason": "MAX_TOKENS" }]
        })));
        assert_eq!(result, UpstreamResult::Truncated);
        let err = result.into_reply().unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("token limit"));
    }

    #[test]
    fn safety_stop_is_a_client_error() {
        let result = normalize(&body(serde_json::json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        })));
        assert!(matches!(
            &result,
            UpstreamResult::Blocked {
                source: BlockSource::SafetyStop,
                ..
            }
        ));
        assert_eq!(
            result.into_reply().unwrap_err().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn candidate_with_nothing_usable_is_empty_content() {
        let result = normalize(&body(serde_json::json!({
            "candidates": [{ "finishReason": "STOP" }]
        })));
        assert_eq!(result, UpstreamResult::EmptyContent);
        // Caller sees the same generic message as for malformed documents.
        assert_eq!(
            result.into_reply().unwrap_err(),
            UpstreamResult::Malformed.into_reply().unwrap_err()
        );
    }

    #[test]
    fn unrecognized_document_is_malformed() {
        assert_eq!(
            normalize(&body(serde_json::json!({ "unexpected": true }))),
            UpstreamResult::Malformed
        );
        assert_eq!(
            normalize(&FetchOutcome::Body("not json at all".to_string())),
            UpstreamResult::Malformed
        );
    }

    #[test]
    fn connect_failure_maps_to_503() {
        let result = normalize(&FetchOutcome::ConnectFailure("connection refused".into()));
        assert_eq!(result.label(), "unreachable");
        let err = result.into_reply().unwrap_err();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        // Caller never sees the raw transport detail.
        assert!(!err.to_string().contains("connection refused"));
    }

    #[test]
    fn upstream_error_status_maps_to_502() {
        let result = normalize(&FetchOutcome::HttpError {
            status: 429,
            body: "{\"error\": {\"message\": \"quota\"}}".into(),
        });
        assert_eq!(result.label(), "bad_gateway");
        let err = result.into_reply().unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert!(err.to_string().contains("429"));
        assert!(!err.to_string().contains("quota"));
    }

    #[test]
    fn normalization_is_idempotent() {
        let outcomes = [
            body(success_doc("same answer")),
            FetchOutcome::ConnectFailure("refused".into()),
            body(serde_json::json!({ "promptFeedback": { "blockReason": "SAFETY" } })),
        ];
        for outcome in &outcomes {
            assert_eq!(normalize(outcome), normalize(outcome));
        }
    }
}
