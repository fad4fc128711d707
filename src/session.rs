//! Sequential download orchestration.
//!
//! Iterates the plan's files in order, invokes the transfer backend per
//! file, reconciles the materialized path against the intended destination
//! with an atomic rename, and converts failures into protocol events. The
//! first file failure aborts the remaining queue: a partial session must
//! never look like a complete one.

use std::fs;
use std::path::Path;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info};

use crate::plan::{DownloadPlan, FileSpec};
use crate::progress::ProgressEmitter;
use crate::protocol::ProtocolEvent;
use crate::sink::{EventSink, SinkError};
use crate::transfer::{FileFetcher, TransferError};

// ============================================================================
// Error Types
// ============================================================================

/// Terminal session outcomes, mapped to exit codes by the binary.
#[derive(Error, Debug)]
pub enum SessionError {
    /// One file failed; an `error` event naming it was already emitted.
    #[error("download of {file} failed: {message}")]
    Transfer { file: String, message: String },

    /// The protocol stream itself failed; nothing more can be reported.
    #[error(transparent)]
    Protocol(#[from] SinkError),
}

// ============================================================================
// Session
// ============================================================================

/// Run one download session to completion or first failure.
///
/// On success the `complete` event is the last thing written. On a transfer
/// failure an `error` event naming the file is written and the remaining
/// queue is abandoned.
pub fn run_session<F: FileFetcher>(
    plan: &DownloadPlan,
    fetcher: &F,
    sink: &EventSink,
) -> Result<(), SessionError> {
    info!(
        target: "session",
        repo_id = %plan.repo_id,
        revision = %plan.revision,
        dest = %plan.destination_root.display(),
        files = plan.files.len(),
        "starting download session"
    );

    for spec in &plan.files {
        let started = Instant::now();
        if let Err(err) = fetch_one(plan, spec, fetcher, sink) {
            let message = format!("Failed to download {}: {err}", spec.path);
            sink.emit(&ProtocolEvent::Error {
                message: message.clone(),
            })?;
            return Err(SessionError::Transfer {
                file: spec.path.clone(),
                message,
            });
        }
        // Timing is diagnostic only; it never enters the protocol stream.
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(target: "session", file = %spec.path, elapsed_ms, "file placed");
    }

    sink.emit(&ProtocolEvent::Complete)?;
    Ok(())
}

fn fetch_one<F: FileFetcher>(
    plan: &DownloadPlan,
    spec: &FileSpec,
    fetcher: &F,
    sink: &EventSink,
) -> Result<(), TransferError> {
    let destination = plan.destination_root.join(&spec.path);
    ensure_parent_dir(&destination)?;

    if !plan.force {
        if let Ok(meta) = fs::metadata(&destination) {
            // Populated by an earlier session; re-transfer is the cache's
            // call, not ours, and a no-op must not error.
            debug!(target: "session", file = %spec.path, "destination already populated, skipping transfer");
            report_already_present(sink, &spec.path, meta.len());
            return Ok(());
        }
    }

    let mut emitter = ProgressEmitter::new(sink.clone(), spec.path.clone(), spec.expected_size);
    let fetched = fetcher.fetch(spec, &mut emitter)?;

    if fetched != destination {
        ensure_parent_dir(&destination)?;
        place_atomically(&fetched, &destination)?;
    }
    Ok(())
}

/// Announce a file that needs no transfer, ending at `downloaded == total`.
fn report_already_present(sink: &EventSink, path: &str, size: u64) {
    let mut emitter = ProgressEmitter::new(sink.clone(), path, Some(size));
    emitter.advance(size);
    emitter.finish();
}

fn ensure_parent_dir(path: &Path) -> Result<(), TransferError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| TransferError::DirectoryCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Move a finished file to its destination with the filesystem's atomic
/// rename. A concurrent reader sees the destination either absent or whole,
/// never truncated.
fn place_atomically(fetched: &Path, destination: &Path) -> Result<(), TransferError> {
    // The cache may hand back a snapshot symlink; move the real blob.
    let source = fs::canonicalize(fetched).unwrap_or_else(|_| fetched.to_path_buf());
    fs::rename(&source, destination).map_err(|err| TransferError::Place {
        dest: destination.to_path_buf(),
        source: err,
    })?;
    if source != *fetched {
        // The snapshot link now dangles.
        let _ = fs::remove_file(fetched);
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
