//! Session controller binary.
//!
//! Owns the process boundary: argument parsing, logging to stderr, the
//! stdout protocol sink, and the exit-code contract. All real work happens
//! in the library; this file only wires outcomes to exit codes.

use std::env;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use gglib_fetch::cli::Cli;
use gglib_fetch::exit;
use gglib_fetch::sink::EventSink;

fn main() {
    suppress_hub_noise();
    init_logging();

    let cli = Cli::parse();
    let sink = EventSink::stdout();
    std::process::exit(run(&cli, &sink));
}

/// Route diagnostics to stderr; stdout is reserved for the protocol.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Keep the hub client's own telemetry and terminal output quiet.
///
/// Set before any other thread exists, while reads of these variables
/// cannot race a write.
#[allow(unsafe_code)]
fn suppress_hub_noise() {
    for name in ["HF_HUB_DISABLE_TELEMETRY", "HF_HUB_DISABLE_PROGRESS_BARS"] {
        if env::var_os(name).is_none() {
            // SAFETY: called from main before any thread is spawned.
            unsafe { env::set_var(name, "1") };
        }
    }
}

#[cfg(feature = "accel")]
fn run(cli: &Cli, sink: &EventSink) -> i32 {
    use gglib_fetch::plan::parse_file_specs;
    use gglib_fetch::protocol::ProtocolEvent;
    use gglib_fetch::session::{SessionError, run_session};
    use gglib_fetch::transfer::HubClient;

    let cache_dir = cli.effective_cache_dir();
    let client = match HubClient::connect(&cache_dir, cli.token.as_deref()) {
        Ok(client) => client,
        Err(err) => {
            // No protocol stream convention exists for this failure; the
            // parent distinguishes it by exit code alone.
            error!(target: "fetch", error = %err, "failed to initialize hub client");
            return exit::HUB_INIT_FAILED;
        }
    };

    if cli.probe {
        let event = ProtocolEvent::Ready {
            helper: env!("CARGO_PKG_VERSION").to_string(),
            hub_client: HubClient::version().to_string(),
        };
        return match sink.emit(&event) {
            Ok(()) => exit::SUCCESS,
            Err(err) => {
                error!(target: "fetch", error = %err, "protocol stream is unwritable");
                exit::PROTOCOL_STREAM_BROKEN
            }
        };
    }

    let files = match parse_file_specs(&cli.files) {
        Ok(files) => files,
        Err(err) => {
            let event = ProtocolEvent::Error {
                message: err.to_string(),
            };
            return match sink.emit(&event) {
                Ok(()) => exit::INVALID_ARGS,
                Err(sink_err) => {
                    error!(target: "fetch", error = %sink_err, "protocol stream is unwritable");
                    exit::PROTOCOL_STREAM_BROKEN
                }
            };
        }
    };

    let plan = cli.plan(files);
    let fetcher = client.fetcher(&plan);
    match run_session(&plan, &fetcher, sink) {
        Ok(()) => exit::SUCCESS,
        Err(SessionError::Transfer { .. }) => exit::TRANSFER_FAILED,
        Err(SessionError::Protocol(err)) => {
            error!(target: "fetch", error = %err, "protocol stream is unwritable");
            exit::PROTOCOL_STREAM_BROKEN
        }
    }
}

#[cfg(not(feature = "accel"))]
fn run(_cli: &Cli, sink: &EventSink) -> i32 {
    use gglib_fetch::protocol::ProtocolEvent;

    let event = ProtocolEvent::Unavailable {
        reason: "accelerated hub backend not compiled into this build (rebuild with the `accel` feature)".to_string(),
    };
    match sink.emit(&event) {
        Ok(()) => exit::ACCEL_UNAVAILABLE,
        Err(err) => {
            error!(target: "fetch", error = %err, "protocol stream is unwritable");
            exit::PROTOCOL_STREAM_BROKEN
        }
    }
}
