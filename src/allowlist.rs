use std::fs;
use std::io;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Pattern that authorizes every origin.
pub const ALLOW_ALL_PATTERN: &str = "*://*/*";

// Accepts the wildcard scheme, a real scheme, or none at all, so that
// hand-entered patterns and patterns derived from page origins share one
// grammar. The host part may contain `*` as a literal wildcard token.
static DOMAIN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:\*|[a-zA-Z][a-zA-Z0-9+.-]*)://)?[*a-zA-Z0-9.-]+(?::[0-9]+)?(?:/\*)?$")
        .expect("domain pattern is a valid regex")
});

/// Ordered set of origin patterns permitted to use the bridge.
///
/// Serializes to the persisted store document, a JSON object with the single
/// `allowedDomains` key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Allowlist {
    #[serde(rename = "allowedDomains", default)]
    domains: Vec<String>,
}

impl Allowlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// List containing only the allow-all token.
    pub fn allow_all() -> Self {
        Self {
            domains: vec![ALLOW_ALL_PATTERN.to_string()],
        }
    }

    pub fn is_valid_pattern(pattern: &str) -> bool {
        DOMAIN_PATTERN.is_match(pattern)
    }

    /// True when the allow-all token is present or the exact origin pattern
    /// is listed. No prefix or glob matching happens here.
    pub fn is_authorized(&self, origin_pattern: &str) -> bool {
        self.contains(ALLOW_ALL_PATTERN) || self.contains(origin_pattern)
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.domains.iter().any(|d| d == pattern)
    }

    pub fn insert(&mut self, pattern: String) {
        if !self.contains(&pattern) {
            self.domains.push(pattern);
        }
    }

    pub fn remove(&mut self, pattern: &str) {
        self.domains.retain(|d| d != pattern);
    }

    pub fn patterns(&self) -> &[String] {
        &self.domains
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Reads the store file. A missing or unreadable file yields an empty
    /// list so the daemon always comes up.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(list) => list,
                Err(e) => {
                    warn!("ignoring malformed domain store {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!("ignoring unreadable domain store {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)
    }
}
