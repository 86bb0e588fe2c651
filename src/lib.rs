//! Single-node proof-of-work ledger that reconciles with peers by adopting
//! the longest valid chain.

pub mod api;
pub mod blockchain;
pub mod config;
pub mod consensus;
pub mod error;
pub mod peers;
pub mod record;

pub use blockchain::{Block, Ledger};
pub use error::LedgerError;
pub use record::Record;
