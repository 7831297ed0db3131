use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::error::BridgeError;
use crate::message::ReplyEnvelope;
use crate::server::AppState;

/// Gates the external surface. The sender's origin pattern is derived from
/// the Origin header as `<origin>/*`; a request without the header yields
/// the empty pattern, which only the allow-all token can authorize.
///
/// Rejections are delivered as a 200 with a failure envelope, the same way
/// every other bridge error reaches the caller.
pub async fn origin_gate(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let origin = sender_origin(req.headers());

    if state.gate.is_authorized(&origin).await {
        next.run(req).await
    } else {
        warn!("unauthorized domain {:?}", origin);
        Json(ReplyEnvelope::error(&BridgeError::Unauthorized)).into_response()
    }
}

fn sender_origin(headers: &HeaderMap) -> String {
    match headers.get(header::ORIGIN).and_then(|v| v.to_str().ok()) {
        Some(origin) => format!("{}/*", origin),
        None => String::new(),
    }
}
