use std::collections::BTreeMap;

use sales_validate::CommitRecord;

use super::{BatchReceipt, RowRejection, RowSink};
use crate::error::{SinkError, SinkResult};

/// Sink that keeps accepted records in memory.
///
/// Can be told to reject specific rows or to fail a given batch, which makes
/// it the sink of choice for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Vec<CommitRecord>,
    batches: usize,
    rejections: BTreeMap<usize, String>,
    fail_on_batch: Option<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the row with this index whenever it arrives.
    pub fn reject_row(mut self, row_index: usize, reason: impl Into<String>) -> Self {
        self.rejections.insert(row_index, reason.into());
        self
    }

    /// Fail the batch with this 0-based number.
    pub fn fail_on_batch(mut self, batch: usize) -> Self {
        self.fail_on_batch = Some(batch);
        self
    }

    pub fn records(&self) -> &[CommitRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<CommitRecord> {
        self.records
    }

    /// Batches received, including a failed one.
    pub fn batch_count(&self) -> usize {
        self.batches
    }
}

impl RowSink for MemorySink {
    fn accept_batch(&mut self, batch: &[CommitRecord]) -> SinkResult<BatchReceipt> {
        let number = self.batches;
        self.batches += 1;
        if self.fail_on_batch == Some(number) {
            return Err(SinkError::unavailable(format!("batch {number} refused")));
        }

        let mut rejections = Vec::new();
        for record in batch {
            match self.rejections.get(&record.row_index) {
                Some(reason) => rejections.push(RowRejection {
                    row_index: record.row_index,
                    reason: reason.clone(),
                }),
                None => self.records.push(record.clone()),
            }
        }
        Ok(BatchReceipt::with_rejections(batch.len(), rejections))
    }
}
