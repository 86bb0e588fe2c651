use log::debug;

use super::Block;

/// Perform Proof-of-Work: starting at nonce 0, find a nonce whose hash has
/// `difficulty` leading hex zeros. The winning nonce is left in `block` and
/// the hash is returned. There is no upper bound on the search.
pub fn mine(block: &mut Block, difficulty: u32) -> String {
    block.nonce = 0;
    let mut hash = block.compute_hash();
    while !is_valid_hash(&hash, difficulty) {
        block.nonce = block.nonce.wrapping_add(1);
        hash = block.compute_hash();
    }
    debug!(
        "POW - block #{} solved at nonce {} (difficulty={})",
        block.index, block.nonce, difficulty
    );
    hash
}

/// True iff the first `difficulty` characters of `hash` are all `'0'`.
pub fn is_valid_hash(hash: &str, difficulty: u32) -> bool {
    let difficulty = difficulty as usize;
    hash.len() >= difficulty && hash.bytes().take(difficulty).all(|c| c == b'0')
}

/// The proof must meet the target AND be the real hash of the block's
/// content, so a random low hash cannot be attached to arbitrary data.
pub fn is_valid_proof(block: &Block, proof: &str, difficulty: u32) -> bool {
    is_valid_hash(proof, difficulty) && proof == block.compute_hash()
}
