use thiserror::Error;

/// Every failure the ledger core reports back to its caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("invalid record: {0}")]
    Validation(String),

    #[error("previous hash incorrect: expected {expected}, found {found}")]
    PreviousHashMismatch { expected: String, found: String },

    #[error("block proof invalid")]
    InvalidProof,

    #[error("no transactions to mine")]
    NothingToMine,

    #[error("peer {address} unreachable: {reason}")]
    PeerUnreachable { address: String, reason: String },
}

impl LedgerError {
    pub fn peer_unreachable(address: &str, reason: impl ToString) -> Self {
        Self::PeerUnreachable {
            address: address.to_string(),
            reason: reason.to_string(),
        }
    }
}
