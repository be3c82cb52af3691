//! Caller-facing response bodies.
//!
//! The wire contract is deliberately tiny: every reply is a JSON object
//! with exactly one of `answer` or `error`. Raw upstream payloads and
//! transport detail never appear here; they go to the logs.

use serde::{Deserialize, Serialize};

/// Successful reply: the extracted answer text, unmodified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerBody {
    pub answer: String,
}

/// Failure reply: a classified, human-readable message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
