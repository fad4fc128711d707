//! Typed events for the helper-to-parent protocol.
//!
//! Each event serializes to exactly one JSON object; the sink appends the
//! newline. The `status` tag is the discriminant the parent dispatches on.
//!
//! The probe report is tagged `ok` on the wire rather than `probe`: the
//! parent treats the tag as the readiness verdict itself.

use serde::Serialize;

/// Events emitted on the protocol stream.
///
/// This is the ONLY artifact ever written to stdout. Anything else on that
/// stream breaks the parent's parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProtocolEvent {
    /// Probe readiness report with resolved dependency versions.
    #[serde(rename = "ok")]
    Ready {
        /// This helper's own version.
        helper: String,
        /// Version of the hub client the helper was built against.
        hub_client: String,
    },

    /// Byte-count update for one file, rate-limited by the emitter.
    Progress {
        file: String,
        downloaded: u64,
        total: u64,
    },

    /// The accelerated hub backend is missing from this build.
    Unavailable { reason: String },

    /// A fatal-to-session failure; no further files will be attempted.
    Error { message: String },

    /// Every file in the plan was transferred and placed.
    Complete,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_json(event: &ProtocolEvent) -> String {
        serde_json::to_string(event).unwrap()
    }

    #[test]
    fn test_ready_wire_shape() {
        let event = ProtocolEvent::Ready {
            helper: "0.1.0".to_string(),
            hub_client: "0.4.3".to_string(),
        };
        assert_eq!(
            to_json(&event),
            r#"{"status":"ok","helper":"0.1.0","hub_client":"0.4.3"}"#
        );
    }

    #[test]
    fn test_progress_wire_shape() {
        let event = ProtocolEvent::Progress {
            file: "model.gguf".to_string(),
            downloaded: 1000,
            total: 5000,
        };
        assert_eq!(
            to_json(&event),
            r#"{"status":"progress","file":"model.gguf","downloaded":1000,"total":5000}"#
        );
    }

    #[test]
    fn test_unavailable_wire_shape() {
        let event = ProtocolEvent::Unavailable {
            reason: "backend missing".to_string(),
        };
        assert_eq!(
            to_json(&event),
            r#"{"status":"unavailable","reason":"backend missing"}"#
        );
    }

    #[test]
    fn test_error_wire_shape() {
        let event = ProtocolEvent::Error {
            message: "Network timeout".to_string(),
        };
        assert_eq!(
            to_json(&event),
            r#"{"status":"error","message":"Network timeout"}"#
        );
    }

    #[test]
    fn test_complete_wire_shape() {
        assert_eq!(to_json(&ProtocolEvent::Complete), r#"{"status":"complete"}"#);
    }
}
