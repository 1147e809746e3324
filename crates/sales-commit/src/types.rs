//! Commit request, progress and outcome types.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use sales_model::{Mapping, Row, TargetField};
use serde::Serialize;

use crate::error::CommitError;

/// Rows handed to the sink per call unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 500;

// ============================================================================
// Request
// ============================================================================

/// Everything a commit needs, as an immutable snapshot.
#[derive(Debug, Clone)]
pub struct CommitRequest {
    /// The full row set, not the preview.
    pub rows: Vec<Row>,
    pub mapping: Mapping,
    pub fields: Vec<TargetField>,
    /// Row indices chosen by the operator. `None` commits every valid row;
    /// `Some` of an empty set commits nothing.
    pub selection: Option<BTreeSet<usize>>,
    /// Rows left out of the default selection. Ignored once `selection` is set.
    pub excluded: BTreeSet<usize>,
    pub batch_size: usize,
}

impl CommitRequest {
    pub fn new(rows: Vec<Row>, mapping: Mapping, fields: Vec<TargetField>) -> Self {
        Self {
            rows,
            mapping,
            fields,
            selection: None,
            excluded: BTreeSet::new(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_selection(mut self, selection: BTreeSet<usize>) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_exclusions(mut self, excluded: BTreeSet<usize>) -> Self {
        self.excluded = excluded;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

// ============================================================================
// State
// ============================================================================

/// Commit lifecycle: `Idle -> Running -> {Completed, Cancelled, Failed}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CommitState {
    #[default]
    Idle,
    Running,
    Completed,
    Cancelled,
    Failed { reason: String },
}

impl CommitState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for CommitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed { reason } => write!(f, "failed: {reason}"),
            other => f.write_str(other.label()),
        }
    }
}

/// What happened to one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "fate", rename_all = "snake_case")]
pub enum RowFate {
    Committed,
    SkippedBySelection,
    SkippedByValidation,
    ErroredAtCommit { reason: String },
    /// Queued, but the run was cancelled or failed first.
    NotAttempted,
}

impl RowFate {
    pub fn is_skipped(&self) -> bool {
        matches!(
            self,
            Self::SkippedBySelection | Self::SkippedByValidation | Self::NotAttempted
        )
    }
}

// ============================================================================
// Progress (Channel Messages)
// ============================================================================

/// Progress snapshot; `processed` never decreases during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CommitProgress {
    /// Rows handed to the validator and sink so far.
    pub processed: usize,
    /// Rows queued for this run.
    pub total: usize,
}

impl CommitProgress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.processed as f64 / self.total as f64
        }
    }
}

/// Messages sent from the background commit thread.
#[derive(Debug, Clone)]
pub enum CommitUpdate {
    Started { total: usize },
    Progress(CommitProgress),
    Finished(Result<CommitOutcome, CommitError>),
}

// ============================================================================
// Outcome
// ============================================================================

/// Final accounting of a commit.
///
/// Every row of the request has exactly one fate, so
/// `committed_count + skipped_count + error_count` equals the row count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitOutcome {
    pub state: CommitState,
    pub committed_count: usize,
    pub skipped_count: usize,
    pub error_count: usize,
    pub duration_ms: u64,
    pub fates: BTreeMap<usize, RowFate>,
}

impl CommitOutcome {
    pub(crate) fn from_fates(
        state: CommitState,
        fates: BTreeMap<usize, RowFate>,
        duration_ms: u64,
    ) -> Self {
        let committed_count = fates
            .values()
            .filter(|f| matches!(f, RowFate::Committed))
            .count();
        let error_count = fates
            .values()
            .filter(|f| matches!(f, RowFate::ErroredAtCommit { .. }))
            .count();
        let skipped_count = fates.values().filter(|f| f.is_skipped()).count();
        Self {
            state,
            committed_count,
            skipped_count,
            error_count,
            duration_ms,
            fates,
        }
    }

    pub fn total(&self) -> usize {
        self.fates.len()
    }

    pub fn fate(&self, row_index: usize) -> Option<&RowFate> {
        self.fates.get(&row_index)
    }

    /// Rows a retry should select: errored or never attempted.
    pub fn retry_selection(&self) -> BTreeSet<usize> {
        self.fates
            .iter()
            .filter(|(_, fate)| {
                matches!(fate, RowFate::ErroredAtCommit { .. } | RowFate::NotAttempted)
            })
            .map(|(index, _)| *index)
            .collect()
    }
}
