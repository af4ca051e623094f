//! report-proxy: server-side relay in front of the Gemini API
//!
//! Accepts chat-style requests from a report-builder client, attaches a fixed
//! system instruction and a JSON-output generation config, forwards the result
//! to Google's `generateContent` endpoint with a server-held API key, and
//! relays the upstream response (or an error envelope) back to the caller.

pub mod api;
pub mod config;
pub mod prompt;
pub mod relay;

pub use config::AppConfig;
pub use relay::{run_server, RelayHandler, RelayState};
