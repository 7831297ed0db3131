use std::env;
use std::path::PathBuf;

pub const DEFAULT_BRIDGE_ADDR: &str = "127.0.0.1:11435";

/// Address the bridge daemon listens on.
pub fn bridge_addr() -> String {
    env::var("OLLAMA_BRIDGE_HOST").unwrap_or_else(|_| DEFAULT_BRIDGE_ADDR.to_string())
}

/// Location of the persisted allowlist store.
pub fn domains_path() -> PathBuf {
    let mut path = env::var("OLLAMA_BRIDGE_DOMAINS")
        .unwrap_or_else(|_| "~/.ollama-bridge/allowed_domains.json".to_string());

    if path.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            path = path.replace("~", &home.to_string_lossy());
        }
    }

    PathBuf::from(path)
}
