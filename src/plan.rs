//! Download plan types and file-spec parsing.
//!
//! These types define the interface between the CLI surface and the session
//! orchestrator. They are intentionally simple and free of dependencies on
//! clap or the hub client.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Size-hint delimiters accepted in compact file specs, in priority order.
///
/// `model.gguf::1024` and `model.gguf=1024` are both accepted; `::` wins when
/// an entry somehow contains both.
pub const SIZE_DELIMITERS: [&str; 2] = ["::", "="];

// ============================================================================
// Error Types
// ============================================================================

/// Errors produced while turning raw arguments into a plan.
///
/// The `Display` strings are part of the wire contract: they travel to the
/// parent verbatim inside `error` events, and the parent's remediation text
/// matches on them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Invalid file specification: '{0}'")]
    InvalidSpec(String),

    #[error("At least one --file argument is required")]
    NoFiles,
}

/// Error for unrecognized `--repo-type` values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown repo type '{0}' (expected model, dataset, or space)")]
pub struct InvalidRepoKind(String);

// ============================================================================
// Repo Kind
// ============================================================================

/// The kind of hub repository a plan targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepoKind {
    #[default]
    Model,
    Dataset,
    Space,
}

impl RepoKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Dataset => "dataset",
            Self::Space => "space",
        }
    }
}

impl fmt::Display for RepoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepoKind {
    type Err = InvalidRepoKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "model" => Ok(Self::Model),
            "dataset" => Ok(Self::Dataset),
            "space" => Ok(Self::Space),
            other => Err(InvalidRepoKind(other.to_string())),
        }
    }
}

// ============================================================================
// File Specs
// ============================================================================

/// One file the parent asked for, with an optional size hint in bytes.
///
/// The hint seeds the progress emitter's `total` until the hub client
/// resolves the real content length; it is never treated as authoritative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSpec {
    /// Repo-relative path, normalized to have no leading slash.
    pub path: String,
    /// Size hint from the `path::size` compact form, if present and numeric.
    pub expected_size: Option<u64>,
}

impl FileSpec {
    /// Parse one compact spec entry.
    ///
    /// Returns `Ok(None)` for blank entries (the caller filters them out),
    /// and an error only when the entry normalizes to an empty path. A size
    /// suffix that does not parse as an integer is dropped rather than
    /// failing the entry: the size is a hint, not a contract.
    pub fn parse(raw: &str) -> Result<Option<Self>, PlanError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }

        let mut path = raw;
        let mut expected_size = None;
        for delimiter in SIZE_DELIMITERS {
            if raw.contains(delimiter) {
                // Split at the LAST occurrence so paths containing the
                // delimiter keep their full prefix.
                if let Some((candidate_path, size_text)) = raw.rsplit_once(delimiter) {
                    path = candidate_path;
                    expected_size = size_text.parse::<u64>().ok();
                }
                break;
            }
        }

        let normalized = path.trim_start_matches(['/', ' ']);
        if normalized.is_empty() {
            return Err(PlanError::InvalidSpec(raw.to_string()));
        }

        Ok(Some(Self {
            path: normalized.to_string(),
            expected_size,
        }))
    }
}

/// Parse the raw `--file` values into an ordered spec list.
///
/// Insertion order is the download order. Blank entries are skipped; an
/// empty result is an argument error.
pub fn parse_file_specs<S: AsRef<str>>(raw_values: &[S]) -> Result<Vec<FileSpec>, PlanError> {
    let mut specs = Vec::with_capacity(raw_values.len());
    for raw in raw_values {
        if let Some(spec) = FileSpec::parse(raw.as_ref())? {
            specs.push(spec);
        }
    }
    if specs.is_empty() {
        return Err(PlanError::NoFiles);
    }
    Ok(specs)
}

// ============================================================================
// Download Plan
// ============================================================================

/// The fully parsed, validated description of one download session.
///
/// Built once per process invocation and immutable afterwards; the session
/// orchestrator owns it for the session lifetime.
#[derive(Debug, Clone)]
pub struct DownloadPlan {
    /// Hub repository identifier (`<owner>/<repo>`).
    pub repo_id: String,
    /// Ref to download (branch, tag, or commit SHA).
    pub revision: String,
    /// Hub repository kind.
    pub repo_kind: RepoKind,
    /// Directory the finished files are placed under.
    pub destination_root: PathBuf,
    /// Explicit cache directory, if the parent chose one.
    pub cache_dir: Option<PathBuf>,
    /// Hub auth token for private repositories.
    pub token: Option<String>,
    /// Re-transfer even when the cache or destination already has the file.
    pub force: bool,
    /// Never touch the network; serve from the local cache only.
    pub local_only: bool,
    /// Files to transfer, in download order.
    pub files: Vec<FileSpec>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Single spec parsing
    // ------------------------------------------------------------------------

    #[test]
    fn test_parse_plain_path() {
        let spec = FileSpec::parse("model.gguf").unwrap().unwrap();
        assert_eq!(spec.path, "model.gguf");
        assert_eq!(spec.expected_size, None);
    }

    #[test]
    fn test_parse_path_with_size_hint() {
        let spec = FileSpec::parse("a/b.txt::1024").unwrap().unwrap();
        assert_eq!(spec.path, "a/b.txt");
        assert_eq!(spec.expected_size, Some(1024));
    }

    #[test]
    fn test_parse_equals_delimiter() {
        let spec = FileSpec::parse("weights.bin=4096").unwrap().unwrap();
        assert_eq!(spec.path, "weights.bin");
        assert_eq!(spec.expected_size, Some(4096));
    }

    #[test]
    fn test_parse_double_colon_wins_over_equals() {
        let spec = FileSpec::parse("name=v2.gguf::77").unwrap().unwrap();
        assert_eq!(spec.path, "name=v2.gguf");
        assert_eq!(spec.expected_size, Some(77));
    }

    #[test]
    fn test_parse_splits_at_last_delimiter() {
        let spec = FileSpec::parse("dir::sub::10").unwrap().unwrap();
        assert_eq!(spec.path, "dir::sub");
        assert_eq!(spec.expected_size, Some(10));
    }

    #[test]
    fn test_parse_unparseable_size_is_dropped() {
        let spec = FileSpec::parse("model.gguf::huge").unwrap().unwrap();
        assert_eq!(spec.path, "model.gguf");
        assert_eq!(spec.expected_size, None);
    }

    #[test]
    fn test_parse_strips_leading_slash_and_whitespace() {
        let spec = FileSpec::parse("  /a.txt ").unwrap().unwrap();
        assert_eq!(spec.path, "a.txt");
        assert_eq!(spec.expected_size, None);
    }

    #[test]
    fn test_parse_blank_entry_is_skipped() {
        assert_eq!(FileSpec::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_slash_only_path_is_invalid() {
        let err = FileSpec::parse("/::12").unwrap_err();
        assert!(matches!(err, PlanError::InvalidSpec(_)));
        assert!(err.to_string().contains("/::12"));
    }

    // ------------------------------------------------------------------------
    // Spec lists
    // ------------------------------------------------------------------------

    #[test]
    fn test_parse_list_preserves_order() {
        let specs = parse_file_specs(&["b.bin", "a.bin::1", "c.bin"]).unwrap();
        let paths: Vec<&str> = specs.iter().map(|s| s.path.as_str()).collect();
        assert_eq!(paths, ["b.bin", "a.bin", "c.bin"]);
    }

    #[test]
    fn test_parse_empty_list_fails() {
        let err = parse_file_specs::<&str>(&[]).unwrap_err();
        assert_eq!(err, PlanError::NoFiles);
        assert!(err.to_string().contains("--file"));
    }

    #[test]
    fn test_parse_all_blank_list_fails() {
        let err = parse_file_specs(&["", "  "]).unwrap_err();
        assert_eq!(err, PlanError::NoFiles);
    }

    // ------------------------------------------------------------------------
    // Repo kinds
    // ------------------------------------------------------------------------

    #[test]
    fn test_repo_kind_round_trip() {
        for kind in [RepoKind::Model, RepoKind::Dataset, RepoKind::Space] {
            assert_eq!(kind.as_str().parse::<RepoKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_repo_kind_rejects_unknown() {
        let err = "notebook".parse::<RepoKind>().unwrap_err();
        assert!(err.to_string().contains("notebook"));
    }
}
