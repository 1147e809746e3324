//! Batched commit loop.

use std::collections::BTreeMap;
use std::thread::JoinHandle;
use std::time::Instant;

use crossbeam_channel::Sender;
use sales_model::Row;
use sales_validate::{CommitRecord, coerce_row, validate};

use crate::error::CommitError;
use crate::handle::CommitHandle;
use crate::sink::RowSink;
use crate::types::{
    CommitOutcome, CommitProgress, CommitRequest, CommitState, CommitUpdate, RowFate,
};

/// Join handle of a background commit; yields the sink back with the result.
pub type CommitJoin<S> = JoinHandle<(S, Result<CommitOutcome, CommitError>)>;

/// Run a commit on the current thread.
///
/// Rows are validated afresh, selected rows are coerced and handed to `sink`
/// in batches. `on_progress` is called once when the run starts and after
/// every batch. Cancellation through `handle` is checked between batches.
///
/// Returns [`CommitError`] only when nothing was attempted. A sink failure
/// mid-run yields an outcome in [`CommitState::Failed`]; rows of the failed
/// batch count as committed only when the sink reports them persisted.
pub fn run<S, F>(
    request: &CommitRequest,
    sink: &mut S,
    handle: &CommitHandle,
    mut on_progress: F,
) -> Result<CommitOutcome, CommitError>
where
    S: RowSink + ?Sized,
    F: FnMut(CommitProgress),
{
    let started = Instant::now();
    if request.batch_size == 0 {
        return Err(CommitError::InvalidBatchSize);
    }

    let plan = plan(request);
    let queued = plan.queued.len();
    if !plan.any_valid {
        tracing::info!(selected = queued, "nothing to commit");
        return Err(CommitError::NothingToCommit { selected: queued });
    }

    handle.start(queued)?;
    tracing::info!(
        rows = request.rows.len(),
        queued,
        batch_size = request.batch_size,
        "commit started"
    );
    on_progress(handle.progress());

    let mut fates = plan.fates;
    let mut state = CommitState::Completed;

    for (number, batch) in plan.queued.chunks(request.batch_size).enumerate() {
        if handle.is_cancelled() {
            state = CommitState::Cancelled;
            break;
        }

        let mut records: Vec<CommitRecord> = Vec::with_capacity(batch.len());
        for row in batch {
            match coerce_row(row, &request.mapping, &request.fields) {
                Ok(record) => records.push(record),
                Err(errors) => {
                    let reason = errors
                        .iter()
                        .map(|e| e.message.as_str())
                        .collect::<Vec<_>>()
                        .join("; ");
                    fates.insert(row.index, RowFate::ErroredAtCommit { reason });
                }
            }
        }

        if !records.is_empty() {
            match sink.accept_batch(&records) {
                Ok(receipt) => {
                    if receipt.accepted_count + receipt.rejected_count != records.len() {
                        tracing::warn!(
                            batch = number,
                            sent = records.len(),
                            accepted = receipt.accepted_count,
                            rejected = receipt.rejected_count,
                            "sink receipt does not add up; trusting rejections"
                        );
                    }
                    let rejected: BTreeMap<usize, String> = receipt
                        .rejections
                        .into_iter()
                        .map(|r| (r.row_index, r.reason))
                        .collect();
                    for record in &records {
                        let fate = match rejected.get(&record.row_index) {
                            Some(reason) => RowFate::ErroredAtCommit {
                                reason: reason.clone(),
                            },
                            None => RowFate::Committed,
                        };
                        fates.insert(record.row_index, fate);
                    }
                    if !rejected.is_empty() {
                        tracing::warn!(
                            batch = number,
                            rejected = rejected.len(),
                            "sink rejected rows"
                        );
                    }
                }
                Err(error) => {
                    let accepted = error.accepted_rows().min(records.len());
                    let reason = error.to_string();
                    tracing::warn!(
                        batch = number,
                        accepted,
                        %reason,
                        "sink failed, stopping commit"
                    );
                    for (position, record) in records.iter().enumerate() {
                        let fate = if position < accepted {
                            RowFate::Committed
                        } else {
                            RowFate::ErroredAtCommit {
                                reason: reason.clone(),
                            }
                        };
                        fates.insert(record.row_index, fate);
                    }
                    handle.advance(batch.len());
                    state = CommitState::Failed { reason };
                    break;
                }
            }
        }

        let progress = handle.advance(batch.len());
        tracing::debug!(
            batch = number,
            processed = progress.processed,
            total = progress.total,
            "batch committed"
        );
        on_progress(progress);
    }

    if let Err(error) = sink.finish() {
        tracing::warn!(%error, "failed to finish sink");
        if !matches!(state, CommitState::Failed { .. }) {
            state = CommitState::Failed {
                reason: error.to_string(),
            };
        }
    }

    handle.set_state(state.clone());
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let outcome = CommitOutcome::from_fates(state, fates, duration_ms);
    tracing::info!(
        state = %outcome.state,
        committed = outcome.committed_count,
        skipped = outcome.skipped_count,
        errors = outcome.error_count,
        duration_ms,
        "commit finished"
    );
    Ok(outcome)
}

/// Run a commit on a background thread.
///
/// Sends `Started`, one `Progress` per batch and `Finished` on `sender`; a
/// closed channel does not stop the commit. The returned handle cancels or
/// polls the run.
pub fn spawn_commit<S>(
    request: CommitRequest,
    mut sink: S,
    sender: Sender<CommitUpdate>,
) -> (CommitHandle, CommitJoin<S>)
where
    S: RowSink + Send + 'static,
{
    let handle = CommitHandle::new();
    let worker = handle.clone();

    let join = std::thread::spawn(move || {
        let mut started = false;
        let result = run(&request, &mut sink, &worker, |progress| {
            if !started {
                started = true;
                let _ = sender.send(CommitUpdate::Started {
                    total: progress.total,
                });
            }
            let _ = sender.send(CommitUpdate::Progress(progress));
        });
        let _ = sender.send(CommitUpdate::Finished(result.clone()));
        (sink, result)
    });

    (handle, join)
}

/// Row fates fixed before the first batch, plus the rows to attempt.
struct Plan<'a> {
    fates: BTreeMap<usize, RowFate>,
    queued: Vec<&'a Row>,
    any_valid: bool,
}

fn plan(request: &CommitRequest) -> Plan<'_> {
    let report = validate(&request.rows, &request.mapping, &request.fields);
    let committable = report.committable_rows();

    let mut fates = BTreeMap::new();
    let mut queued = Vec::new();
    let mut any_valid = false;

    for row in &request.rows {
        let excluded = request.excluded.contains(&row.index);
        let selected = match &request.selection {
            Some(selection) => selection.contains(&row.index),
            None => !excluded && committable.contains(&row.index),
        };
        if selected {
            any_valid |= committable.contains(&row.index);
            fates.insert(row.index, RowFate::NotAttempted);
            queued.push(row);
        } else if request.selection.is_some() || excluded {
            fates.insert(row.index, RowFate::SkippedBySelection);
        } else {
            fates.insert(row.index, RowFate::SkippedByValidation);
        }
    }

    Plan {
        fates,
        queued,
        any_valid,
    }
}
