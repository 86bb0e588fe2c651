use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::GENESIS_PREVIOUS_HASH;
use crate::record::Record;

/// A single block in the chain holding an ordered list of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: i64, // Unix timestamp (UTC)
    #[serde(rename = "transactions")]
    pub records: Vec<Record>,
    pub previous_hash: String,
    #[serde(default)]
    pub hash: String, // set once the proof is accepted
    pub nonce: u64, // Proof-of-Work nonce
}

/// Fields covered by the content hash, in their canonical order.
#[derive(Serialize)]
struct HashPreimage<'a> {
    index: u64,
    timestamp: i64,
    transactions: &'a [Record],
    previous_hash: &'a str,
    nonce: u64,
}

impl Block {
    /// The fixed first block. Its hash is computed, not mined, so every node
    /// derives the same genesis.
    pub fn genesis() -> Self {
        let mut block = Self {
            index: 0,
            timestamp: 0,
            records: Vec::new(),
            previous_hash: String::from(GENESIS_PREVIOUS_HASH),
            hash: String::new(),
            nonce: 0,
        };
        block.hash = block.compute_hash();
        block
    }

    /// Create a mining candidate stamped with the current time. The hash stays
    /// empty until a proof is found and accepted.
    pub fn candidate(index: u64, previous_hash: String, records: Vec<Record>) -> Self {
        Self {
            index,
            timestamp: Utc::now().timestamp(),
            records,
            previous_hash,
            hash: String::new(),
            nonce: 0,
        }
    }

    /// SHA-256 over the JSON encoding of every field except `hash`,
    /// returned as lowercase hex.
    pub fn compute_hash(&self) -> String {
        let preimage = HashPreimage {
            index: self.index,
            timestamp: self.timestamp,
            transactions: &self.records,
            previous_hash: &self.previous_hash,
            nonce: self.nonce,
        };
        let bytes = serde_json::to_vec(&preimage).expect("block preimage serializes to JSON");
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        hex::encode(hasher.finalize())
    }

    pub fn is_genesis(&self) -> bool {
        *self == Self::genesis()
    }
}
