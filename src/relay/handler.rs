//! Request handler for the relay
//!
//! A single linear sequence with two early-exit failure branches:
//! credential check, payload construction, one upstream call, response
//! mapping. No per-request mutable state survives the invocation.

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde_json::Value;
use uuid::Uuid;

use super::server::RelayState;
use crate::api::{ErrorEnvelope, GenerateContentRequest};

/// Returned when the credential env var is unset; no upstream call is made.
const MISSING_KEY_ERROR: &str = "API key is not set on the server.";

/// Returned alongside the upstream status when upstream reports a failure.
const UPSTREAM_ERROR: &str = "Failed to fetch from Google API.";

/// Returned for transport and parse failures. Deliberately generic: the
/// underlying diagnostics are logged server-side and never sent to the caller.
const INTERNAL_ERROR: &str = "An internal error occurred while processing the request.";

/// Relay request handler
pub struct RelayHandler {
    state: RelayState,
}

impl RelayHandler {
    pub fn new(state: RelayState) -> Self {
        Self { state }
    }

    /// Handle one inbound request body
    pub async fn handle(&self, body: Bytes) -> Response {
        let request_id = Uuid::new_v4();
        let upstream = &self.state.config.upstream;

        // Fail-fast precondition: no credential, no network call.
        let Some(api_key) = upstream.api_key() else {
            tracing::error!(
                %request_id,
                env = %upstream.api_key_env,
                "Credential environment variable is not set"
            );
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorEnvelope::new(MISSING_KEY_ERROR),
            );
        };

        let inbound: Value = match serde_json::from_slice(&body) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(%request_id, error = %e, "Inbound body is not valid JSON");
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorEnvelope::new(INTERNAL_ERROR),
                );
            }
        };

        // `contents` is opaque: taken verbatim, never validated. A missing or
        // malformed array passes through and surfaces as an upstream error.
        let contents = inbound.get("contents").cloned().unwrap_or(Value::Null);
        let payload = GenerateContentRequest::report(contents);

        let endpoint = upstream.generate_url();
        tracing::debug!(%request_id, endpoint = %endpoint, "Forwarding request upstream");

        // The key rides only on the upstream URL, which is dropped after the
        // call. It must never reach a log line or a response body.
        let url = format!("{endpoint}?key={api_key}");

        let reply = match self.state.transport.post(&url, &payload).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(%request_id, error = %e, "Upstream call failed");
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorEnvelope::new(INTERNAL_ERROR),
                );
            }
        };

        if !reply.status.is_success() {
            let raw = String::from_utf8_lossy(&reply.body);
            tracing::error!(
                %request_id,
                status = %reply.status,
                body = %raw,
                "Upstream returned error response"
            );
            // Relay structured error bodies as JSON details; fall back to the
            // raw text when upstream sends something unparseable.
            let details = serde_json::from_slice(&reply.body)
                .unwrap_or_else(|_| Value::String(raw.into_owned()));
            return error_response(
                reply.status,
                ErrorEnvelope::with_details(UPSTREAM_ERROR, details),
            );
        }

        tracing::debug!(
            %request_id,
            body_size = reply.body.len(),
            "Relaying upstream response verbatim"
        );

        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(reply.body))
            .unwrap()
            .into_response()
    }
}

fn error_response(status: StatusCode, envelope: ErrorEnvelope) -> Response {
    (status, Json(envelope)).into_response()
}
