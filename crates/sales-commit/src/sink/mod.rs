//! Destinations for committed rows.

mod jsonl;
mod memory;

use sales_validate::CommitRecord;
use serde::Serialize;

use crate::error::SinkResult;

pub use jsonl::{FINGERPRINT_KEY, JsonLinesSink, ROW_INDEX_KEY};
pub use memory::MemorySink;

/// One row the sink refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowRejection {
    pub row_index: usize,
    pub reason: String,
}

/// Result of handing one batch to a sink.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReceipt {
    pub accepted_count: usize,
    pub rejected_count: usize,
    pub rejections: Vec<RowRejection>,
}

impl BatchReceipt {
    /// Every record of a batch accepted.
    pub fn accepted(count: usize) -> Self {
        Self {
            accepted_count: count,
            ..Self::default()
        }
    }

    /// Some records refused, the rest accepted.
    pub fn with_rejections(batch_len: usize, rejections: Vec<RowRejection>) -> Self {
        Self {
            accepted_count: batch_len.saturating_sub(rejections.len()),
            rejected_count: rejections.len(),
            rejections,
        }
    }
}

/// Consumer of typed records.
///
/// A batch either returns a receipt (possibly rejecting individual rows) or
/// fails. Rows a receipt accepts must already be persisted: the engine counts
/// them as committed as soon as the receipt comes back. A failed batch ends
/// the commit and earlier batches are not rolled back. A failure that leaves
/// the leading rows of the batch persisted reports them through
/// [`crate::SinkError::Interrupted`].
pub trait RowSink {
    fn accept_batch(&mut self, batch: &[CommitRecord]) -> SinkResult<BatchReceipt>;

    /// Release the destination once the run ends, however it ends.
    fn finish(&mut self) -> SinkResult<()> {
        Ok(())
    }
}

impl<S: RowSink + ?Sized> RowSink for &mut S {
    fn accept_batch(&mut self, batch: &[CommitRecord]) -> SinkResult<BatchReceipt> {
        (**self).accept_batch(batch)
    }

    fn finish(&mut self) -> SinkResult<()> {
        (**self).finish()
    }
}

impl<S: RowSink + ?Sized> RowSink for Box<S> {
    fn accept_batch(&mut self, batch: &[CommitRecord]) -> SinkResult<BatchReceipt> {
        (**self).accept_batch(batch)
    }

    fn finish(&mut self) -> SinkResult<()> {
        (**self).finish()
    }
}
