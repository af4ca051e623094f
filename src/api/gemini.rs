//! Gemini `generateContent` request body and the caller-facing error envelope
//!
//! Only the outbound request is typed. The inbound `contents` array and the
//! upstream response body are deliberately opaque (`serde_json::Value` /
//! raw bytes): the relay passes them through unmodified so new upstream
//! fields never require changes here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::prompt::REPORT_SYSTEM_INSTRUCTION;

/// Body POSTed to `/v1beta/models/{model}:generateContent`.
///
/// Reference: <https://ai.google.dev/api/generate-content>
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub system_instruction: SystemInstruction,
    /// Conversation turns, passed through from the caller without validation.
    pub contents: Value,
    pub generation_config: GenerationConfig,
}

/// System-level steering prompt. Structured like a content block but with no
/// role and a single text part.
#[derive(Debug, Clone, Serialize)]
pub struct SystemInstruction {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Part {
    pub text: String,
}

/// Generation parameters. The relay only ever requests JSON-formatted output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
}

impl GenerateContentRequest {
    /// Compose the outbound payload for a report request: the fixed system
    /// instruction, the caller's `contents` verbatim, and a JSON-output
    /// generation config.
    pub fn report(contents: Value) -> Self {
        Self {
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: REPORT_SYSTEM_INSTRUCTION.to_string(),
                }],
            },
            contents,
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        }
    }
}

/// JSON body returned to the caller when the relay fails.
///
/// `details` carries the upstream error body for upstream-reported failures
/// and is omitted for configuration and internal errors, so transport-level
/// diagnostics never leak to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: Value) -> Self {
        Self {
            error: error.into(),
            details: Some(details),
        }
    }
}
