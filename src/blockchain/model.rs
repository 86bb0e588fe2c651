use log::{debug, info, warn};
use std::sync::{Mutex, MutexGuard};

use super::{Block, MAX_DIFFICULTY, pow};
use crate::error::LedgerError;
use crate::record::{Record, RecordPool};

/// Chain and pool, always mutated together under the ledger's lock.
#[derive(Debug)]
struct LedgerState {
    chain: Vec<Block>,
    pool: RecordPool,
}

impl LedgerState {
    fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("chain always holds at least the genesis block")
    }
}

/// In-memory blockchain with Proof-of-Work and a pool of unconfirmed records.
///
/// All state sits behind one mutex. Mining reads a snapshot, searches for a
/// nonce without the lock and re-locks only to append.
#[derive(Debug)]
pub struct Ledger {
    state: Mutex<LedgerState>,
    difficulty: u32,
}

impl Ledger {
    /// Initialize a new ledger with the genesis block. `difficulty` is
    /// clamped to `1..=MAX_DIFFICULTY`.
    pub fn new(difficulty: u32) -> Self {
        Self {
            state: Mutex::new(LedgerState {
                chain: vec![Block::genesis()],
                pool: RecordPool::new(),
            }),
            difficulty: difficulty.clamp(1, MAX_DIFFICULTY),
        }
    }

    // A panic while holding the lock cannot leave chain or pool half-written,
    // so a poisoned mutex is still safe to use.
    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn last_block(&self) -> Block {
        self.lock().last_block().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().chain.len()
    }

    /// Snapshot of the whole chain.
    pub fn chain(&self) -> Vec<Block> {
        self.lock().chain.clone()
    }

    pub fn pending_records(&self) -> Vec<Record> {
        self.lock().pool.snapshot()
    }

    /// Validate and pool a new record.
    pub fn submit_record(&self, author: &str, content: &str) -> Result<Record, LedgerError> {
        let record = Record::new(author, content)?;
        self.add_record(record.clone())?;
        Ok(record)
    }

    pub fn add_record(&self, record: Record) -> Result<(), LedgerError> {
        let mut state = self.lock();
        state.pool.add(record)?;
        debug!("POOL - record accepted (size now {})", state.pool.len());
        Ok(())
    }

    /// Package every pooled record into a new block, solve its proof and
    /// append it. Records are removed from the pool only once the block is in.
    pub fn mine(&self) -> Result<Block, LedgerError> {
        let mut candidate = {
            let state = self.lock();
            if state.pool.is_empty() {
                return Err(LedgerError::NothingToMine);
            }
            let last = state.last_block();
            Block::candidate(last.index + 1, last.hash.clone(), state.pool.snapshot())
        };

        let proof = pow::mine(&mut candidate, self.difficulty);

        let mut state = self.lock();
        let drained = candidate.records.len();
        Self::append_locked(&mut state, &mut candidate, proof, self.difficulty)?;
        // Nothing else removes pooled records without moving the tail, so
        // the drained snapshot is still the pool's prefix here.
        debug_assert!(state.pool.starts_with(&candidate.records));
        state.pool.remove_confirmed(drained);
        info!(
            "MINER - sealed block #{} (hash={}, nonce={}, records={})",
            candidate.index, candidate.hash, candidate.nonce, drained
        );
        Ok(candidate)
    }

    /// Append a block whose proof was found elsewhere (a peer, or `mine`).
    pub fn append_block(&self, mut block: Block, proof: &str) -> Result<Block, LedgerError> {
        let mut state = self.lock();
        Self::append_locked(&mut state, &mut block, proof.to_string(), self.difficulty)?;
        Ok(block)
    }

    fn append_locked(
        state: &mut LedgerState,
        block: &mut Block,
        proof: String,
        difficulty: u32,
    ) -> Result<(), LedgerError> {
        let last = state.last_block();
        let tail = &last.hash;
        if block.previous_hash != *tail {
            warn!(
                "LEDGER - rejected block #{}: previous hash {} does not match tail {}",
                block.index, block.previous_hash, tail
            );
            return Err(LedgerError::PreviousHashMismatch {
                expected: tail.clone(),
                found: block.previous_hash.clone(),
            });
        }
        if block.index != last.index + 1 {
            warn!(
                "LEDGER - rejected block #{}: expected index {}",
                block.index,
                last.index + 1
            );
            return Err(LedgerError::Validation(format!(
                "block index {} does not follow {}",
                block.index, last.index
            )));
        }
        block.records.iter().try_for_each(Record::validate)?;
        if !pow::is_valid_proof(block, &proof, difficulty) {
            warn!("LEDGER - rejected block #{}: invalid proof", block.index);
            return Err(LedgerError::InvalidProof);
        }
        block.hash = proof;
        state.chain.push(block.clone());
        Ok(())
    }

    /// Check a full chain: fixed genesis, then linkage, index sequence,
    /// record validity, hash integrity and difficulty for every later block.
    pub fn validate_chain(&self, chain: &[Block]) -> bool {
        validate_chain(chain, self.difficulty)
    }

    /// Swap in `candidate` if it is still strictly longer than the local
    /// chain. Callers validate first; the length is re-checked under the lock.
    pub(crate) fn replace_chain(&self, candidate: Vec<Block>) -> bool {
        let mut state = self.lock();
        if candidate.len() <= state.chain.len() {
            return false;
        }
        info!(
            "LEDGER - chain replaced: {} -> {} blocks",
            state.chain.len(),
            candidate.len()
        );
        state.chain = candidate;
        true
    }
}

pub fn validate_chain(chain: &[Block], difficulty: u32) -> bool {
    let Some(genesis) = chain.first() else {
        return false;
    };
    if !genesis.is_genesis() {
        return false;
    }

    chain.windows(2).all(|pair| {
        let (prev, current) = (&pair[0], &pair[1]);
        current.previous_hash == prev.hash
            && current.index == prev.index + 1
            && current.records.iter().all(|r| r.validate().is_ok())
            && pow::is_valid_proof(current, &current.hash, difficulty)
    })
}
