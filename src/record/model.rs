use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// A unit of user content waiting to be (or already) sealed into a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub author: String,
    pub content: String,
    /// Seconds since the Unix epoch, with sub-second precision.
    #[serde(rename = "timestamp")]
    pub created_at: f64,
}

impl Record {
    /// Build a record stamped with the current time. The author must not be blank.
    pub fn new(author: impl Into<String>, content: impl Into<String>) -> Result<Self, LedgerError> {
        let now = Utc::now().timestamp_micros() as f64 / 1_000_000.0;
        Self::with_timestamp(author, content, now)
    }

    pub fn with_timestamp(
        author: impl Into<String>,
        content: impl Into<String>,
        created_at: f64,
    ) -> Result<Self, LedgerError> {
        let record = Self {
            author: author.into(),
            content: content.into(),
            created_at,
        };
        record.validate()?;
        Ok(record)
    }

    /// Structural checks shared by submission and pool insertion.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.author.trim().is_empty() {
            return Err(LedgerError::Validation("author required".into()));
        }
        Ok(())
    }
}
