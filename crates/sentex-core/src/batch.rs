//! Batch driver.
//!
//! Runs one [`Stage`] over every matching file in a directory:
//!   1. List inputs (sorted, filtered by stage extension)
//!   2. Dispatch each document to a blocking worker, bounded by a semaphore
//!   3. Tally outcomes; per-document failures are logged and counted
//!   4. Emit progress events via broadcast channel
//!
//! Setting the shutdown flag stops dispatch; documents already handed to a
//! worker still finish and are counted.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch, Semaphore};
use tokio::task::{self, JoinError, JoinSet};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::document::key_for_path;
use crate::error::{Result, SentexError};
use crate::pipeline::{DocumentOutcome, PipelineContext, Stage};

// ── Job config ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchJob {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub stage: Stage,
    /// Concurrent documents. 0 means one per available core.
    pub workers: usize,
}

impl BatchJob {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>, stage: Stage) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            stage,
            workers: 0,
        }
    }

    fn worker_count(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

// ── Progress events ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Written,
    NoContent,
    Failed,
}

/// Emitted once per finished document (cloneable for broadcast).
#[derive(Debug, Clone, Serialize)]
pub struct BatchProgress {
    pub run_id: Uuid,
    pub key: String,
    pub status: DocumentStatus,
    pub message: String,
    pub done: usize,
    pub total: usize,
}

// ── Result summary ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub run_id: Uuid,
    pub stage: Stage,
    pub started_at: DateTime<Utc>,
    pub documents_seen: usize,
    pub written: usize,
    pub no_content: usize,
    pub failed: usize,
    /// Paragraphs (extract stage) or sentences (other stages) written.
    pub items_written: usize,
    pub cancelled: bool,
    pub errors: Vec<String>,
    pub duration_ms: u64,
}

impl BatchResult {
    fn new(run_id: Uuid, stage: Stage) -> Self {
        Self {
            run_id,
            stage,
            started_at: Utc::now(),
            documents_seen: 0,
            written: 0,
            no_content: 0,
            failed: 0,
            items_written: 0,
            cancelled: false,
            errors: Vec::new(),
            duration_ms: 0,
        }
    }

    pub fn finished(&self) -> usize {
        self.written + self.no_content + self.failed
    }
}

// ── Orchestrator ──────────────────────────────────────────────────────────────

/// Inputs for `stage` under `dir`, sorted by path.
pub fn collect_inputs(dir: &Path, stage: Stage) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && stage.accepts(&path) {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// What a worker task hands back, or why it never did.
type Joined = std::result::Result<Result<DocumentOutcome>, JoinError>;

/// Run `job.stage` over every input in `job.input_dir`.
///
/// Only directory-level failures are returned as errors; document failures
/// end up in [`BatchResult::errors`].
#[instrument(skip(ctx, progress_tx, shutdown), fields(stage = job.stage.as_str()))]
pub async fn run_batch(
    job: BatchJob,
    ctx: PipelineContext,
    progress_tx: Option<broadcast::Sender<BatchProgress>>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<BatchResult> {
    let run_id = Uuid::new_v4();
    let t0 = std::time::Instant::now();
    let mut result = BatchResult::new(run_id, job.stage);

    let inputs = collect_inputs(&job.input_dir, job.stage)?;
    std::fs::create_dir_all(&job.output_dir)?;

    let total = inputs.len();
    let workers = job.worker_count();
    info!(
        run_id = %run_id,
        input_dir = %job.input_dir.display(),
        documents = total,
        workers,
        "Starting batch"
    );

    let semaphore = Arc::new(Semaphore::new(workers));
    let mut tasks: JoinSet<Result<DocumentOutcome>> = JoinSet::new();
    let mut pending: HashMap<task::Id, PathBuf> = HashMap::new();
    let out_dir = Arc::new(job.output_dir.clone());

    for path in inputs {
        if *shutdown.borrow() {
            result.cancelled = true;
            break;
        }

        let permit = tokio::select! {
            biased;
            _ = shutdown_requested(&mut shutdown) => {
                result.cancelled = true;
                break;
            }
            permit = semaphore.clone().acquire_owned() => {
                permit.map_err(|e| SentexError::Pipeline(format!("worker pool closed: {e}")))?
            }
        };

        result.documents_seen += 1;
        let ctx = ctx.clone();
        let out_dir = Arc::clone(&out_dir);
        let stage = job.stage;
        let worker_path = path.clone();
        let handle = tasks.spawn_blocking(move || {
            let _permit = permit;
            ctx.process_file(stage, &worker_path, &out_dir)
        });
        pending.insert(handle.id(), path);

        while let Some(joined) = tasks.try_join_next_with_id() {
            let (path, outcome) = settle(&mut pending, joined);
            record(&mut result, &path, outcome, total, progress_tx.as_ref());
        }
    }

    if result.cancelled {
        warn!(
            run_id = %run_id,
            dispatched = result.documents_seen,
            total,
            "Shutdown requested, waiting for in-flight documents"
        );
    }

    while let Some(joined) = tasks.join_next_with_id().await {
        let (path, outcome) = settle(&mut pending, joined);
        record(&mut result, &path, outcome, total, progress_tx.as_ref());
    }

    result.duration_ms = t0.elapsed().as_millis() as u64;

    info!(
        run_id      = %run_id,
        written     = result.written,
        no_content  = result.no_content,
        failed      = result.failed,
        items       = result.items_written,
        cancelled   = result.cancelled,
        duration_ms = result.duration_ms,
        "Batch complete"
    );

    Ok(result)
}

/// Resolves once the flag is set. A dropped sender never cancels.
async fn shutdown_requested(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Pair a joined task with the input it was dispatched for.
fn settle(
    pending: &mut HashMap<task::Id, PathBuf>,
    joined: std::result::Result<(task::Id, Result<DocumentOutcome>), JoinError>,
) -> (PathBuf, Joined) {
    let (id, outcome) = match joined {
        Ok((id, outcome)) => (id, Ok(outcome)),
        Err(e) => (e.id(), Err(e)),
    };
    (pending.remove(&id).unwrap_or_default(), outcome)
}

fn record(
    result: &mut BatchResult,
    path: &Path,
    joined: Joined,
    total: usize,
    progress_tx: Option<&broadcast::Sender<BatchProgress>>,
) {
    let key = key_for_path(path);
    let (status, message) = match joined {
        Ok(Ok(DocumentOutcome::Written { output, items })) => {
            result.written += 1;
            result.items_written += items;
            info!(key = %key, items, "✅ Saved {}", output.display());
            (DocumentStatus::Written, format!("saved {items} items"))
        }
        Ok(Ok(DocumentOutcome::NoContent)) => {
            result.no_content += 1;
            warn!(key = %key, "⚠️ No valid paragraphs found in {}", path.display());
            (DocumentStatus::NoContent, "no valid paragraphs".to_string())
        }
        Ok(Err(e)) => {
            let msg = format!("{}: {e}", path.display());
            result.failed += 1;
            warn!(key = %key, "❌ {}", &msg);
            result.errors.push(msg.clone());
            (DocumentStatus::Failed, msg)
        }
        Err(e) => {
            let msg = format!("{}: worker task failed: {e}", path.display());
            result.failed += 1;
            warn!(key = %key, "❌ {}", &msg);
            result.errors.push(msg.clone());
            (DocumentStatus::Failed, msg)
        }
    };

    if let Some(tx) = progress_tx {
        let _ = tx.send(BatchProgress {
            run_id: result.run_id,
            key,
            status,
            message,
            done: result.finished(),
            total,
        });
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
