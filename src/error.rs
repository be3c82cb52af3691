//! Request-level error taxonomy.
//!
//! Every error a request can hit maps to a fixed HTTP status and a
//! caller-facing message. The caller always receives `{"error": <message>}`;
//! raw upstream payloads and transport detail stay in the logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::http::response::ErrorBody;

/// Errors surfaced to the caller as a JSON body plus status code.
///
/// None of these crash the serving process; they are converted at the
/// request boundary by the `IntoResponse` impl below.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RelayError {
    /// Request body carried no prompt (missing or empty string).
    #[error("No prompt provided")]
    EmptyPrompt,

    /// Request body was not a JSON object.
    #[error("Missing JSON in request")]
    MalformedBody,

    /// `max_tokens` was present but not a positive integer.
    #[error("max_tokens must be a positive integer")]
    InvalidMaxTokens,

    /// Upstream was unreachable (connection refused, DNS, timeout).
    #[error("Upstream service unreachable")]
    Unreachable,

    /// Upstream replied with a non-success HTTP status.
    #[error("Upstream returned HTTP {0}")]
    BadGateway(u16),

    /// The prompt was rejected before generation (`promptFeedback.blockReason`).
    #[error("Generation blocked by upstream content policy. Reason: {0}")]
    Blocked(String),

    /// Generation was stopped mid-stream by the safety filter.
    #[error("Generation stopped by upstream safety filters; rephrase the prompt")]
    SafetyStop,

    /// Generation hit the token budget before producing usable text.
    #[error("Response truncated by the token limit; raise max_tokens or simplify the prompt")]
    Truncated,

    /// Upstream returned 200 but no text could be extracted.
    #[error("Failed to extract text from upstream response")]
    NoText,
}

impl RelayError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::EmptyPrompt
            | RelayError::MalformedBody
            | RelayError::InvalidMaxTokens
            | RelayError::SafetyStop => StatusCode::BAD_REQUEST,
            RelayError::Unreachable => StatusCode::SERVICE_UNAVAILABLE,
            RelayError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            RelayError::Blocked(_) | RelayError::Truncated | RelayError::NoText => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_400() {
        assert_eq!(RelayError::EmptyPrompt.status(), StatusCode::BAD_REQUEST);
        assert_eq!(RelayError::MalformedBody.status(), StatusCode::BAD_REQUEST);
        assert_eq!(RelayError::InvalidMaxTokens.status(), StatusCode::BAD_REQUEST);
        assert_eq!(RelayError::SafetyStop.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn transport_errors_split_503_502() {
        assert_eq!(
            RelayError::Unreachable.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(RelayError::BadGateway(429).status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn blocked_message_carries_reason_verbatim() {
        let err = RelayError::Blocked("OTHER".into());
        assert!(err.to_string().contains("OTHER"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
