//! Longest-valid-chain rule used to reconcile with peers.
//!
//! A candidate replaces the local chain only when it is strictly longer and
//! passes full validation. Ties keep the chain already held. The record pool
//! is not reconciled against the adopted chain.

use log::{debug, warn};

use crate::blockchain::{Block, Ledger};

/// Offer one externally obtained chain. Returns whether it was adopted.
pub fn consider_chain(ledger: &Ledger, candidate: Vec<Block>) -> bool {
    let local_len = ledger.len();
    if candidate.len() <= local_len {
        debug!(
            "CONSENSUS - kept local chain ({} blocks) over candidate of {}",
            local_len,
            candidate.len()
        );
        return false;
    }
    if !ledger.validate_chain(&candidate) {
        warn!(
            "CONSENSUS - discarded invalid candidate of {} blocks",
            candidate.len()
        );
        return false;
    }
    ledger.replace_chain(candidate)
}

/// Offer several candidates, longest first, stopping at the first adoption.
pub fn resolve<I>(ledger: &Ledger, candidates: I) -> bool
where
    I: IntoIterator<Item = Vec<Block>>,
{
    let mut candidates: Vec<Vec<Block>> = candidates.into_iter().collect();
    candidates.sort_by(|a, b| b.len().cmp(&a.len()));
    candidates
        .into_iter()
        .any(|candidate| consider_chain(ledger, candidate))
}
