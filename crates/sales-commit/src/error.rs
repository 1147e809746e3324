//! Error types for the commit engine.

use std::io;

use thiserror::Error;

/// Result type for sink operations.
pub type SinkResult<T> = std::result::Result<T, SinkError>;

/// Errors that stop a commit before it starts.
///
/// Failures once rows are flowing are not errors: they end the run in
/// [`crate::CommitState::Failed`] and the outcome keeps exact counts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CommitError {
    /// No selected row passed validation.
    #[error("nothing to commit: none of the {selected} selected rows is valid")]
    NothingToCommit { selected: usize },

    #[error("batch size must be at least 1")]
    InvalidBatchSize,

    /// The handle already drove a commit.
    #[error("commit handle is already {state}")]
    HandleInUse { state: String },
}

/// Errors raised by a [`crate::RowSink`].
#[derive(Error, Debug)]
pub enum SinkError {
    // === I/O Errors ===
    #[error("sink I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The destination stopped part-way through a batch. The first
    /// `accepted` records of the batch were persisted.
    #[error("sink I/O error after {accepted} rows of the batch: {source}")]
    Interrupted {
        accepted: usize,
        #[source]
        source: io::Error,
    },

    // === Destination Errors ===
    /// The destination refused the whole batch.
    #[error("sink unavailable: {reason}")]
    Unavailable { reason: String },
}

impl SinkError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Leading records of the failed batch the destination still holds.
    pub fn accepted_rows(&self) -> usize {
        match self {
            Self::Interrupted { accepted, .. } => *accepted,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            CommitError::NothingToCommit { selected: 3 }.to_string(),
            "nothing to commit: none of the 3 selected rows is valid"
        );
        assert_eq!(
            SinkError::unavailable("store offline").to_string(),
            "sink unavailable: store offline"
        );
        let interrupted = SinkError::Interrupted {
            accepted: 2,
            source: io::Error::other("disk full"),
        };
        assert_eq!(
            interrupted.to_string(),
            "sink I/O error after 2 rows of the batch: disk full"
        );
        assert_eq!(interrupted.accepted_rows(), 2);
        assert_eq!(SinkError::unavailable("down").accepted_rows(), 0);
    }
}
