use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use url::Url;

use crate::error::{BridgeError, Result};
use crate::message::RequestOptions;

/// Model used when a generate request does not name one.
pub const DEFAULT_MODEL: &str = "llama3.1:latest";

pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";

/// HTTP client fixed on the local Ollama base address. Every forwarded
/// request resolves its endpoint against that base with URL-join semantics.
pub struct Client {
    base_url: Url,
    client: reqwest::Client,
}

impl Client {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("OLLAMA_HOST").unwrap_or_else(|_| DEFAULT_OLLAMA_HOST.to_string());
        Self::new(&normalized_host(host))
    }

    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            client: reqwest::Client::new(),
        })
    }

    /// GET the models list from the fixed `/api/tags` path.
    pub async fn fetch_models(&self) -> Result<Value> {
        self.request("/api/tags", &RequestOptions::get()).await
    }

    /// POST a non-streaming generate call. A missing or empty model falls
    /// back to [`DEFAULT_MODEL`]; a missing prompt is simply left out of the
    /// body.
    pub async fn generate(&self, prompt: Option<&str>, model: Option<&str>) -> Result<Value> {
        let mut body = serde_json::Map::new();
        body.insert(
            "model".to_string(),
            json!(model.filter(|m| !m.is_empty()).unwrap_or(DEFAULT_MODEL)),
        );
        if let Some(prompt) = prompt {
            body.insert("prompt".to_string(), json!(prompt));
        }
        body.insert("stream".to_string(), json!(false));

        let options = RequestOptions {
            method: Some("POST".to_string()),
            headers: Some(
                [("Content-Type".to_string(), "application/json".to_string())]
                    .into_iter()
                    .collect(),
            ),
            body: Some(Value::Object(body).to_string()),
        };
        self.request("/api/generate", &options).await
    }

    /// Core pass-through: one HTTP call, one outcome. Non-2xx statuses keep
    /// the upstream status and body text; the bare root endpoint returns raw
    /// text instead of parsed JSON.
    pub async fn request(&self, endpoint: &str, options: &RequestOptions) -> Result<Value> {
        let url = self.base_url.join(endpoint).map_err(|e| {
            BridgeError::InvalidRequest {
                reason: format!("invalid endpoint '{}': {}", endpoint, e),
            }
        })?;
        info!("forwarding request to {}", url);

        let method_name = options.method.as_deref().unwrap_or("GET");
        let method = reqwest::Method::from_bytes(method_name.to_uppercase().as_bytes()).map_err(
            |_| BridgeError::InvalidRequest {
                reason: format!("invalid method '{}'", method_name),
            },
        )?;

        let mut call = self.client.request(method, url);
        if let Some(headers) = &options.headers {
            for (name, value) in headers {
                call = call.header(name, value);
            }
        }
        if let Some(body) = &options.body {
            call = call.body(body.clone());
        }

        let response = call.send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(transport)?;
            return Err(BridgeError::UpstreamHttp {
                status: status.as_u16(),
                body,
            });
        }

        if endpoint == "/" {
            Ok(Value::String(response.text().await.map_err(transport)?))
        } else {
            response.json().await.map_err(transport)
        }
    }
}

fn transport(e: reqwest::Error) -> BridgeError {
    BridgeError::Transport {
        message: e.to_string(),
    }
}

// OLLAMA_HOST may be given as a bare host or without a port; normalize to a
// full http URL the way the upstream CLI does.
fn normalized_host(mut host: String) -> String {
    if !host.starts_with("http://") && !host.starts_with("https://") {
        host = format!("http://{}", host);
    }

    if host.matches(':').count() < 2 {
        host = format!("{}:11434", host);
    }

    host
}

#[derive(Deserialize)]
pub struct ListResponse {
    pub models: Vec<ModelInfo>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ModelInfo {
    pub name: String,
    pub modified_at: String,
    pub size: u64,
    pub digest: String,
}
