use std::path::{Path, PathBuf};

use tokio::sync::RwLock;
use tracing::info;
use url::{Origin, Url};

use crate::allowlist::Allowlist;
use crate::error::{BridgeError, Result};

/// Owns the allowlist and decides which senders may use the bridge.
///
/// Every mutation persists the new list before the caller is told it
/// succeeded; the in-memory list is only swapped once the write went through.
pub struct AuthorizationGate {
    path: PathBuf,
    domains: RwLock<Allowlist>,
}

impl AuthorizationGate {
    pub fn load(path: &Path) -> Self {
        let domains = Allowlist::load(path);
        info!(
            "loaded {} allowed domain(s) from {}",
            domains.len(),
            path.display()
        );
        Self {
            path: path.to_path_buf(),
            domains: RwLock::new(domains),
        }
    }

    pub async fn is_authorized(&self, origin_pattern: &str) -> bool {
        self.domains.read().await.is_authorized(origin_pattern)
    }

    pub async fn domains(&self) -> Vec<String> {
        self.domains.read().await.patterns().to_vec()
    }

    /// Adds a hand-entered pattern after validating it against the grammar.
    /// Adding a pattern that is already listed succeeds without growing the
    /// list.
    pub async fn add(&self, pattern: &str) -> Result<()> {
        if !Allowlist::is_valid_pattern(pattern) {
            return Err(BridgeError::InvalidFormat);
        }

        let mut guard = self.domains.write().await;
        if guard.contains(pattern) {
            return Ok(());
        }

        let mut next = guard.clone();
        next.insert(pattern.to_string());
        self.persist(&next)?;
        *guard = next;
        Ok(())
    }

    /// Derives `<origin>/*` from the caller's page URL and adds it. Derived
    /// patterns skip the manual grammar; only URLs without a real origin are
    /// refused.
    pub async fn add_current(&self, page_url: Option<&str>) -> Result<String> {
        let pattern = origin_pattern_of(page_url)?;

        let mut guard = self.domains.write().await;
        if !guard.contains(&pattern) {
            let mut next = guard.clone();
            next.insert(pattern.clone());
            self.persist(&next)?;
            *guard = next;
        }
        Ok(pattern)
    }

    /// Replaces the whole list with the allow-all token.
    pub async fn allow_all(&self) -> Result<()> {
        let mut guard = self.domains.write().await;
        let next = Allowlist::allow_all();
        self.persist(&next)?;
        *guard = next;
        Ok(())
    }

    /// Removes a pattern. Removing one that is not listed still succeeds.
    pub async fn remove(&self, pattern: &str) -> Result<()> {
        let mut guard = self.domains.write().await;
        let mut next = guard.clone();
        next.remove(pattern);
        self.persist(&next)?;
        *guard = next;
        Ok(())
    }

    fn persist(&self, domains: &Allowlist) -> Result<()> {
        domains
            .save(&self.path)
            .map_err(|e| BridgeError::Storage {
                message: e.to_string(),
            })?;
        info!("updated allowed domains: {:?}", domains.patterns());
        Ok(())
    }
}

fn origin_pattern_of(page_url: Option<&str>) -> Result<String> {
    let url = page_url.ok_or(BridgeError::NoActiveTab)?;
    let parsed = Url::parse(url).map_err(|_| BridgeError::NoActiveTab)?;
    match parsed.origin() {
        origin @ Origin::Tuple(..) => Ok(format!("{}/*", origin.ascii_serialization())),
        Origin::Opaque(_) => Err(BridgeError::NoActiveTab),
    }
}
