use awc::Client;
use log::{debug, info, warn};
use std::time::Duration;

use super::PeerRegistry;
use crate::api::models::{ChainResponse, RegisterNodeRequest};
use crate::blockchain::{Block, Ledger};
use crate::consensus;
use crate::error::LedgerError;

/// Upper bound on a peer's `/chain` body.
const CHAIN_BODY_LIMIT: usize = 64 * 1024 * 1024;

/// HTTP client for talking to other nodes. Must be used from inside the
/// actix runtime.
#[derive(Debug, Clone)]
pub struct PeerClient {
    timeout: Duration,
}

impl PeerClient {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn client(&self) -> Client {
        Client::builder().timeout(self.timeout).finish()
    }

    /// Pull a peer's full chain.
    pub async fn fetch_chain(&self, peer: &str) -> Result<ChainResponse, LedgerError> {
        let url = format!("{peer}/chain");
        let mut res = self
            .client()
            .get(&url)
            .send()
            .await
            .map_err(|e| LedgerError::peer_unreachable(peer, e))?;
        if !res.status().is_success() {
            return Err(LedgerError::peer_unreachable(
                peer,
                format!("GET /chain returned {}", res.status()),
            ));
        }
        res.json::<ChainResponse>()
            .limit(CHAIN_BODY_LIMIT)
            .await
            .map_err(|e| LedgerError::peer_unreachable(peer, e))
    }

    /// Ask `remote` to register `own_address` and return its chain dump.
    pub async fn register_with(
        &self,
        remote: &str,
        own_address: &str,
    ) -> Result<ChainResponse, LedgerError> {
        let url = format!("{remote}/register_node");
        let body = RegisterNodeRequest {
            node_address: own_address.to_string(),
        };
        let mut res = self
            .client()
            .post(&url)
            .send_json(&body)
            .await
            .map_err(|e| LedgerError::peer_unreachable(remote, e))?;
        if !res.status().is_success() {
            return Err(LedgerError::peer_unreachable(
                remote,
                format!("POST /register_node returned {}", res.status()),
            ));
        }
        res.json::<ChainResponse>()
            .limit(CHAIN_BODY_LIMIT)
            .await
            .map_err(|e| LedgerError::peer_unreachable(remote, e))
    }

    /// Push a freshly mined block to one peer.
    pub async fn announce_block(&self, peer: &str, block: &Block) -> Result<(), LedgerError> {
        let url = format!("{peer}/add_block");
        let res = self
            .client()
            .post(&url)
            .send_json(block)
            .await
            .map_err(|e| LedgerError::peer_unreachable(peer, e))?;
        if !res.status().is_success() {
            return Err(LedgerError::peer_unreachable(
                peer,
                format!("POST /add_block returned {}", res.status()),
            ));
        }
        Ok(())
    }

    /// Push a block to every known peer. Failures are logged and skipped.
    pub async fn announce_to_all(&self, peers: &PeerRegistry, block: &Block) -> usize {
        let mut delivered = 0;
        for peer in peers.snapshot() {
            match self.announce_block(&peer, block).await {
                Ok(()) => delivered += 1,
                Err(e) => warn!("PEERS - announce of block #{} failed: {e}", block.index),
            }
        }
        debug!("PEERS - block #{} announced to {delivered} peer(s)", block.index);
        delivered
    }

    /// Pull every peer's chain and offer them to the consensus rule.
    /// Unreachable peers are logged and skipped. Returns whether the local
    /// chain was replaced.
    pub async fn sync_with_peers(&self, ledger: &Ledger, peers: &PeerRegistry) -> bool {
        let mut candidates = Vec::new();
        for peer in peers.snapshot() {
            match self.fetch_chain(&peer).await {
                Ok(dump) => {
                    debug!("PEERS - {peer} reports {} blocks", dump.length);
                    candidates.push(dump.chain);
                }
                Err(e) => warn!("PEERS - sync skipped: {e}"),
            }
        }
        let adopted = consensus::resolve(ledger, candidates);
        if adopted {
            info!("PEERS - adopted a longer chain ({} blocks)", ledger.len());
        }
        adopted
    }
}
