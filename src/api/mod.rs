//! Wire types for the upstream Gemini API and the caller-facing error envelope

mod gemini;

pub use gemini::{
    ErrorEnvelope, GenerateContentRequest, GenerationConfig, Part, SystemInstruction,
};
