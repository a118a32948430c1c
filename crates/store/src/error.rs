//! Storage error types.

use std::path::PathBuf;

use derive_more::{Display, Error, From};

/// Failure at a storage boundary. Never alters in-memory match state.
#[derive(Debug, Display, Error, From)]
pub enum StoreError {
    #[display("storage I/O failed: {_0}")]
    Io(std::io::Error),
    #[display("encoding failed: {_0}")]
    Encode(serde_json::Error),
    #[display("corrupt artifact: {reason}")]
    #[from(skip)]
    Corrupt { reason: String },
    #[display("no saved artifact at {}", path.display())]
    #[from(skip)]
    Missing { path: PathBuf },
}

impl StoreError {
    pub fn corrupt(reason: impl Into<String>) -> Self {
        Self::Corrupt {
            reason: reason.into(),
        }
    }

    /// The artifact is absent rather than unreadable
    pub fn is_missing(&self) -> bool {
        matches!(self, StoreError::Missing { .. })
    }
}
