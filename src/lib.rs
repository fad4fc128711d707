//! Fast download helper for the gglib download manager.
//!
//! The parent process invokes the `gglib-fetch` binary with a download plan
//! (repository, revision, destination, one or more `--file` specs) and reads
//! newline-delimited JSON events from its stdout. stdout carries protocol
//! lines exclusively; human diagnostics go to stderr via `tracing`.
//!
//! # Protocol Schema
//!
//! All messages are JSON objects with a required `status` field:
//!
//! ```json
//! {"status": "ok", "helper": "0.1.0", "hub_client": "0.4.3"}
//! {"status": "progress", "file": "model.gguf", "downloaded": 123456, "total": 789012}
//! {"status": "unavailable", "reason": "accelerated hub backend not compiled into this build"}
//! {"status": "error", "message": "Network timeout"}
//! {"status": "complete"}
//! ```
//!
//! Module layout (reading order):
//! - [`plan`] - parsing raw arguments into a typed, validated download plan
//! - [`protocol`] + [`sink`] - the typed events and the NDJSON channel
//! - [`progress`] - per-file, rate-limited progress emission
//! - [`transfer`] - the seam to the external hub client
//! - [`session`] - sequential per-file orchestration and atomic placement
//! - [`exit`] - the process exit-code contract with the parent

pub mod cli;
pub mod exit;
pub mod plan;
pub mod progress;
pub mod protocol;
pub mod session;
pub mod sink;
pub mod transfer;

pub use cli::Cli;
pub use plan::{DownloadPlan, FileSpec, PlanError, RepoKind, parse_file_specs};
pub use progress::{MIN_PROGRESS_INTERVAL, ProgressEmitter, ProgressThrottle};
pub use protocol::ProtocolEvent;
pub use session::{SessionError, run_session};
pub use sink::{EventSink, SinkError};
pub use transfer::{FileFetcher, TransferError};

#[cfg(feature = "accel")]
pub use transfer::HubClient;
