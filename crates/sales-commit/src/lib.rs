//! Commit engine for validated sales rows.
//!
//! Takes an immutable [`CommitRequest`] snapshot (full row set, mapping,
//! fields, selection) and hands typed [`CommitRecord`]s to a [`RowSink`] in
//! batches:
//!
//! - **Gate**: refuses to start when no selected row is valid
//! - **Re-validation** of every row at commit time
//! - **Progress** through a callback, a channel ([`spawn_commit`]) or by
//!   polling the [`CommitHandle`]
//! - **Cancellation** between batches, never mid-row
//! - **Accounting**: every row ends with exactly one [`RowFate`]
//!
//! A failing sink ends the run as [`CommitState::Failed`]; batches already
//! accepted stay committed.
//!
//! # Example
//!
//! ```ignore
//! use sales_commit::{CommitHandle, CommitRequest, JsonLinesSink, run};
//!
//! let request = CommitRequest::new(rows, mapping, fields).with_batch_size(100);
//! let mut sink = JsonLinesSink::create(Path::new("orders.jsonl"))?;
//! let outcome = run(&request, &mut sink, &CommitHandle::new(), |_| {})?;
//! println!("{} committed, {} errors", outcome.committed_count, outcome.error_count);
//! ```
//!
//! [`CommitRecord`]: sales_validate::CommitRecord

mod engine;
mod error;
mod handle;
mod sink;
mod types;

// === Error Types ===
pub use error::{CommitError, SinkError, SinkResult};

// === Engine ===
pub use engine::{CommitJoin, run, spawn_commit};
pub use handle::CommitHandle;

// === Types ===
pub use types::{
    CommitOutcome, CommitProgress, CommitRequest, CommitState, CommitUpdate, DEFAULT_BATCH_SIZE,
    RowFate,
};

// === Sinks ===
pub use sink::{
    BatchReceipt, FINGERPRINT_KEY, JsonLinesSink, MemorySink, ROW_INDEX_KEY, RowRejection, RowSink,
};

pub use sales_validate::CommitRecord;
