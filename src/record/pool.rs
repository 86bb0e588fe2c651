use super::model::Record;
use crate::error::LedgerError;

/// FIFO pool of records not yet included in any block.
///
/// The pool holds no lock of its own; the `Ledger` owns it behind the same
/// mutex as the chain.
#[derive(Debug, Default)]
pub struct RecordPool {
    records: Vec<Record>,
}

impl RecordPool {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append a record to the tail of the pool.
    pub fn add(&mut self, record: Record) -> Result<(), LedgerError> {
        record.validate()?;
        self.records.push(record);
        Ok(())
    }

    /// Copy of the current contents, in insertion order. Nothing is removed.
    pub fn snapshot(&self) -> Vec<Record> {
        self.records.clone()
    }

    /// Drop the first `count` records once they have been sealed into an
    /// appended block. Records pushed after the snapshot stay pooled.
    pub fn remove_confirmed(&mut self, count: usize) {
        let count = count.min(self.records.len());
        self.records.drain(..count);
    }

    pub fn starts_with(&self, records: &[Record]) -> bool {
        self.records.starts_with(records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
