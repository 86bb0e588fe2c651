use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use crate::error::LedgerError;

/// Set of known peer base URLs (e.g. `http://127.0.0.1:8001`).
#[derive(Debug, Default)]
pub struct PeerRegistry {
    peers: Mutex<HashSet<String>>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.peers.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add a peer. Returns `false` if it was already known.
    pub fn register(&self, address: &str) -> Result<bool, LedgerError> {
        let address = normalize(address)?;
        Ok(self.lock().insert(address))
    }

    /// Add many peers, skipping blank entries and `own_address`.
    pub fn extend<I, S>(&self, addresses: I, own_address: Option<&str>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let own = own_address.and_then(|a| normalize(a).ok());
        let mut peers = self.lock();
        for address in addresses {
            if let Ok(address) = normalize(address.as_ref()) {
                if own.as_deref() != Some(address.as_str()) {
                    peers.insert(address);
                }
            }
        }
    }

    /// Peers in sorted order, so callers see a stable listing.
    pub fn snapshot(&self) -> Vec<String> {
        let mut peers: Vec<String> = self.lock().iter().cloned().collect();
        peers.sort();
        peers
    }

    pub fn contains(&self, address: &str) -> bool {
        normalize(address)
            .map(|a| self.lock().contains(&a))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Trim whitespace and trailing slashes so `http://a/` and `http://a` collapse.
pub fn normalize(address: &str) -> Result<String, LedgerError> {
    let address = address.trim().trim_end_matches('/');
    if address.is_empty() {
        return Err(LedgerError::Validation("node_address required".into()));
    }
    Ok(address.to_string())
}
