//! Call Webhook Route
//!
//! Entry point for the telephony provider. Delivery is at-least-once,
//! so the route answers HTTP 200 for every processable request, flags
//! included; a non-200 here would only buy a retry storm. The one
//! exception is a bad HMAC signature, which is rejected outright.

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use leadflow::CallDirection;

use crate::application::InboundCall;
use crate::models::{CallWebhookRequest, CallWebhookResponse};
use crate::AppState;

const SIGNATURE_HEADER: &str = "x-provider-signature";

type HmacSha256 = Hmac<Sha256>;

/// Ingest a provider call webhook
#[utoipa::path(
    post,
    path = "/leadflow/webhooks/call",
    request_body = CallWebhookRequest,
    responses(
        (status = 200, description = "Call processed (flags in body)", body = CallWebhookResponse),
        (status = 401, description = "Bad webhook signature")
    ),
    tag = "Webhook"
)]
pub async fn ingest_call(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CallWebhookResponse>, (axum::http::StatusCode, String)> {
    if let Some(secret) = &state.webhook_secret {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|h| h.to_str().ok())
            .unwrap_or_default();
        if !verify_signature(secret, &body, signature) {
            tracing::warn!("Call webhook rejected: bad signature");
            return Err((
                axum::http::StatusCode::UNAUTHORIZED,
                "Invalid webhook signature".to_string(),
            ));
        }
    }

    let payload: CallWebhookRequest = match serde_json::from_slice(&body) {
        Ok(p) => p,
        Err(e) => {
            // Malformed payloads still get a 200; retrying will not fix
            // them and the provider must not loop.
            tracing::warn!(error = %e, "Unparseable call webhook payload");
            return Ok(Json(CallWebhookResponse::rejected(format!(
                "Invalid payload: {e}"
            ))));
        }
    };

    if payload.call_id.trim().is_empty() {
        return Ok(Json(CallWebhookResponse::rejected("Missing call_id")));
    }
    if payload.agent_email.is_none() && payload.agent_phone.is_none() {
        return Ok(Json(CallWebhookResponse::rejected(
            "Missing agent_email or agent_phone",
        )));
    }

    let raw_payload = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    let call = InboundCall {
        provider_call_id: payload.call_id,
        agent_email: payload.agent_email,
        agent_phone: payload.agent_phone,
        phone_number: payload.phone_number,
        direction: payload.direction.as_deref().and_then(parse_direction),
        answered: payload.answered,
        duration_seconds: payload.duration,
        recording_url: payload.recording_url,
        started_at: payload.started_at,
        ended_at: payload.ended_at,
        raw_payload,
    };

    match state.ingest_service.ingest(call, Utc::now()).await {
        Ok(outcome) => Ok(Json(CallWebhookResponse {
            success: true,
            duplicate: outcome.duplicate,
            agent_matched: outcome.agent_matched,
            lead_matched: outcome.lead_matched,
            call_id: outcome.call_id,
            error: None,
        })),
        Err(e) => {
            // Internal failure: logged, still a 200
            tracing::error!(error = %e, "Call ingestion failed");
            Ok(Json(CallWebhookResponse::rejected(e.to_string())))
        }
    }
}

fn parse_direction(raw: &str) -> Option<CallDirection> {
    match raw.to_ascii_lowercase().as_str() {
        "inbound" => Some(CallDirection::Inbound),
        "outbound" => Some(CallDirection::Outbound),
        _ => None,
    }
}

fn verify_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let Some(hex_signature) = signature.strip_prefix("sha256=") else {
        return false;
    };
    let Ok(expected) = hex::decode(hex_signature) else {
        return false;
    };
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

pub fn router() -> Router<AppState> {
    Router::new().route("/leadflow/webhooks/call", post(ingest_call))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn test_signature_round_trip() {
        let body = br#"{"call_id":"st-1"}"#;
        let signature = sign("topsecret", body);
        assert!(verify_signature("topsecret", body, &signature));
        assert!(!verify_signature("wrong", body, &signature));
        assert!(!verify_signature("topsecret", b"tampered", &signature));
    }

    #[test]
    fn test_signature_requires_prefix() {
        assert!(!verify_signature("s", b"x", "deadbeef"));
        assert!(!verify_signature("s", b"x", "sha256=not-hex"));
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!(parse_direction("Inbound"), Some(CallDirection::Inbound));
        assert_eq!(parse_direction("outbound"), Some(CallDirection::Outbound));
        assert_eq!(parse_direction("conference"), None);
    }
}
