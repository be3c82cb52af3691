//! Inbound request shape and the upstream payload builder.
//!
//! The builder is a deliberate pass-through: the prompt, system instruction
//! and search flag map one-to-one onto the upstream schema. The only policy
//! here is input rejection — an empty prompt or an unparseable token budget
//! never generates upstream traffic.

use serde::{Deserialize, Serialize};

use crate::error::RelayError;
use crate::upstream::schema::{Content, Part};

/// Default token budget when the caller does not set one. Generous enough
/// that short answers do not come back truncated mid-sentence.
pub const DEFAULT_MAX_TOKENS: u32 = 400;

/// Body of `POST /query`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationRequest {
    /// The prompt text. Required; an empty string is rejected.
    #[serde(default)]
    pub prompt: String,

    /// Optional persona / system instruction.
    #[serde(default)]
    pub system_instruction: Option<String>,

    /// Ask the upstream to ground the answer with web search.
    #[serde(default)]
    pub use_search: bool,

    /// Response token budget. Accepted as an integer or a numeric string.
    #[serde(default)]
    pub max_tokens: Option<MaxTokens>,
}

/// Token budget as callers actually send it: embedded clients have been
/// observed sending both `50` and `"50"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MaxTokens {
    Int(i64),
    Text(String),
}

impl MaxTokens {
    /// Resolve to a positive integer, or fail with a client error.
    fn resolve(&self) -> Result<u32, RelayError> {
        let value = match self {
            MaxTokens::Int(n) => *n,
            MaxTokens::Text(s) => s.trim().parse::<i64>().map_err(|_| RelayError::InvalidMaxTokens)?,
        };
        u32::try_from(value)
            .ok()
            .filter(|v| *v > 0)
            .ok_or(RelayError::InvalidMaxTokens)
    }
}

/// Request document for the upstream generateContent call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// Tool declaration. Only search grounding is exposed.
#[derive(Debug, Clone, Serialize)]
pub struct Tool {
    // Wire name is snake_case, unlike the rest of the document.
    #[serde(rename = "google_search")]
    pub google_search: GoogleSearch,
}

/// Empty marker object enabling search grounding.
#[derive(Debug, Clone, Serialize)]
pub struct GoogleSearch {}

/// Generation parameters forwarded upstream.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
}

fn text_content(text: &str) -> Content {
    Content {
        parts: vec![Part {
            text: Some(text.to_string()),
        }],
        role: None,
    }
}

/// Map a caller request onto the upstream payload.
///
/// Rejects before any network traffic: empty prompt, or a `max_tokens` that
/// does not resolve to a positive integer.
pub fn build_payload(request: &GenerationRequest) -> Result<GenerateContentRequest, RelayError> {
    if request.prompt.is_empty() {
        return Err(RelayError::EmptyPrompt);
    }

    let max_output_tokens = match &request.max_tokens {
        Some(raw) => raw.resolve()?,
        None => DEFAULT_MAX_TOKENS,
    };

    Ok(GenerateContentRequest {
        contents: vec![text_content(&request.prompt)],
        system_instruction: request.system_instruction.as_deref().map(text_content),
        tools: request.use_search.then(|| {
            vec![Tool {
                google_search: GoogleSearch {},
            }]
        }),
        generation_config: Some(GenerationConfig { max_output_tokens }),
    })
}
