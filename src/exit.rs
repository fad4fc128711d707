//! Process exit codes.
//!
//! The parent process keys recovery decisions off these values, so they are
//! a contract, not diagnostics. Codes paired with a protocol event mean the
//! stream carries the details; codes without one mean the failure happened
//! before or below the protocol and only stderr has context.

/// All requested files were placed and `complete` was emitted.
pub const SUCCESS: i32 = 0;

/// The invocation could not be turned into a valid plan. An `error` event
/// carries the reason.
pub const INVALID_ARGS: i32 = 64;

/// A file transfer failed after the session started. An `error` event names
/// the file.
pub const TRANSFER_FAILED: i32 = 65;

/// This binary was built without the accelerated hub backend. An
/// `unavailable` event carries the reason.
pub const ACCEL_UNAVAILABLE: i32 = 90;

/// The hub client could not be constructed. Pre-protocol: stderr only.
pub const HUB_INIT_FAILED: i32 = 97;

/// The protocol stream itself rejected a write. Stderr only, since the
/// stream is the thing that is broken.
pub const PROTOCOL_STREAM_BROKEN: i32 = 98;
