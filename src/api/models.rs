use serde::{Deserialize, Serialize};

use crate::blockchain::{Block, Ledger};
use crate::config::Config;
use crate::peers::{PeerClient, PeerRegistry};
use crate::record::Record;

/// Shared application state: the ledger, the known peers and the client
/// used to reach them.
pub struct AppState {
    pub ledger: Ledger,
    pub peers: PeerRegistry,
    pub client: PeerClient,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            ledger: Ledger::new(config.difficulty),
            peers: PeerRegistry::new(),
            client: PeerClient::new(config.peer_timeout),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

/* ---------- Record API Models ---------- */

#[derive(Deserialize)]
pub struct NewRecordRequest {
    pub author: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Serialize, Deserialize)]
pub struct PendingResponse {
    pub size: usize,
    pub transactions: Vec<Record>,
}

/* ---------- Chain API Models ---------- */

/// Full chain dump. Also the body peers exchange during sync and registration.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChainResponse {
    pub length: usize,
    pub chain: Vec<Block>,
    #[serde(default)]
    pub peers: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct MineResponse {
    pub index: u64,
    pub hash: String,
    pub nonce: u64,
    pub difficulty: u32,
    pub records: usize,
}

#[derive(Serialize, Deserialize)]
pub struct ConsensusResponse {
    pub adopted: bool,
    pub length: usize,
}

/* ---------- Peer API Models ---------- */

#[derive(Serialize, Deserialize)]
pub struct RegisterNodeRequest {
    pub node_address: String,
}

#[derive(Serialize, Deserialize)]
pub struct RegisterWithResponse {
    pub adopted: bool,
    pub length: usize,
    pub peers: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
