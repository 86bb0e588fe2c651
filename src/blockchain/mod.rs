pub mod block;
pub mod model;
pub mod pow;

pub use block::Block;
pub use model::{Ledger, validate_chain};

/// Default Proof-of-Work difficulty (number of leading hex zeros).
pub const DEFAULT_DIFFICULTY: u32 = 2;

/// A SHA-256 hex digest is 64 characters, so no higher target can be met.
pub const MAX_DIFFICULTY: u32 = 64;

/// `previous_hash` carried by the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";
