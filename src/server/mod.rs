use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::api::Client;
use crate::error::BridgeError;
use crate::gate::AuthorizationGate;
use crate::message::{BridgeRequest, DomainList, ReplyEnvelope};

#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<AuthorizationGate>,
    pub ollama: Arc<Client>,
}

/// Two ingress surfaces: `/bridge` is reachable from web pages and passes
/// the origin gate, `/internal` is the trusted popup/CLI side and also
/// serves the allowlist management requests.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/bridge",
            post(external_message).layer(
                ServiceBuilder::new()
                    .layer(CorsLayer::permissive())
                    .layer(axum::middleware::from_fn_with_state(
                        state.clone(),
                        crate::middleware::origin_gate,
                    )),
            ),
        )
        .route("/internal", post(internal_message))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve() -> Result<()> {
    let gate = Arc::new(AuthorizationGate::load(&crate::envconfig::domains_path()));
    let ollama = Arc::new(Client::from_env()?);
    let app = router(AppState { gate, ollama });

    let addr_str = crate::envconfig::bridge_addr();
    let addr: SocketAddr = addr_str
        .parse()
        .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 11435)));
    info!("bridge listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn external_message(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(e) => return Json(ReplyEnvelope::error(&e)).into_response(),
    };

    let request_id = uuid::Uuid::new_v4();
    info!("external request {} ({})", request.kind(), request_id);

    match request {
        BridgeRequest::FetchModels => forward_reply(state.ollama.fetch_models().await),
        BridgeRequest::OllamaRequest { endpoint, options } => {
            forward_reply(state.ollama.request(&endpoint, &options).await)
        }
        BridgeRequest::SendToOllama { prompt, model } => forward_reply(
            state
                .ollama
                .generate(prompt.as_deref(), model.as_deref())
                .await,
        ),
        other => Json(ReplyEnvelope::error(&BridgeError::InvalidRequest {
            reason: format!("'{}' is not served on this surface", other.kind()),
        }))
        .into_response(),
    }
}

async fn internal_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(e) => return Json(ReplyEnvelope::error(&e)).into_response(),
    };

    let request_id = uuid::Uuid::new_v4();
    info!("internal request {} ({})", request.kind(), request_id);

    match request {
        BridgeRequest::GetDomains => Json(DomainList {
            domains: state.gate.domains().await,
        })
        .into_response(),
        BridgeRequest::AddDomain { domain } => mutation_reply(state.gate.add(&domain).await),
        BridgeRequest::AddCurrentDomain { url } => {
            // The caller supplies the page URL; a popup-style caller that
            // omits it falls back to its own Origin header.
            let page = url.or_else(|| {
                headers
                    .get(header::ORIGIN)
                    .and_then(|v| v.to_str().ok())
                    .map(String::from)
            });
            mutation_reply(state.gate.add_current(page.as_deref()).await.map(|_| ()))
        }
        BridgeRequest::AllowAllDomains => mutation_reply(state.gate.allow_all().await),
        BridgeRequest::RemoveDomain { domain } => mutation_reply(state.gate.remove(&domain).await),
        BridgeRequest::FetchModels => forward_reply(state.ollama.fetch_models().await),
        BridgeRequest::OllamaRequest { endpoint, options } => {
            forward_reply(state.ollama.request(&endpoint, &options).await)
        }
        BridgeRequest::SendToOllama { prompt, model } => forward_reply(
            state
                .ollama
                .generate(prompt.as_deref(), model.as_deref())
                .await,
        ),
    }
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "OK"}))
}

fn parse_request(body: &[u8]) -> crate::error::Result<BridgeRequest> {
    serde_json::from_slice(body).map_err(|e| BridgeError::InvalidRequest {
        reason: e.to_string(),
    })
}

fn forward_reply(result: crate::error::Result<Value>) -> axum::response::Response {
    match result {
        Ok(data) => Json(ReplyEnvelope::data(data)).into_response(),
        Err(e) => Json(ReplyEnvelope::error(&e)).into_response(),
    }
}

fn mutation_reply(result: crate::error::Result<()>) -> axum::response::Response {
    match result {
        Ok(()) => Json(ReplyEnvelope::empty()).into_response(),
        Err(e) => Json(ReplyEnvelope::error(&e)).into_response(),
    }
}
