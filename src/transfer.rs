//! The seam to the external transfer library.
//!
//! The session orchestrator only sees the [`FileFetcher`] trait; the hub
//! client implementation lives behind the `accel` feature so minimal builds
//! still link. A fetcher is responsible for driving the bound emitter for
//! the whole transfer: resolved total, byte deltas, and the forced final
//! emission.

use std::path::PathBuf;

use thiserror::Error;

use crate::plan::FileSpec;
use crate::progress::ProgressEmitter;

#[cfg(feature = "accel")]
use std::fs;
#[cfg(feature = "accel")]
use std::path::Path;

#[cfg(feature = "accel")]
use hf_hub::api::Progress;
#[cfg(feature = "accel")]
use hf_hub::api::sync::{Api, ApiBuilder, ApiError, ApiRepo};
#[cfg(feature = "accel")]
use hf_hub::{Cache, CacheRepo, Repo, RepoType};
#[cfg(feature = "accel")]
use crate::plan::{DownloadPlan, RepoKind};

// ============================================================================
// Error Types
// ============================================================================

/// Per-file transfer failures.
///
/// Any variant aborts the remaining queue; the session wraps the message
/// with the file name before it reaches the protocol stream.
#[derive(Error, Debug)]
pub enum TransferError {
    /// The hub client failed while resolving or fetching the file.
    #[cfg(feature = "accel")]
    #[error("{0}")]
    Fetch(#[from] ApiError),

    /// `--local-only` was requested and the cache has no entry.
    #[error("not present in the local cache (--local-only)")]
    NotCached,

    /// Could not create a directory on the way to the destination.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The finished file could not be moved to its destination.
    #[error("failed to place file at {dest}: {source}")]
    Place {
        dest: PathBuf,
        source: std::io::Error,
    },
}

// ============================================================================
// Fetcher Seam
// ============================================================================

/// One-file transfer operation, blocking from the helper's point of view.
///
/// Contract: the implementation drives `emitter` synchronously for the whole
/// byte stream (`set_total` once the length is known, `advance` per chunk,
/// `finish` on success) and returns the path where the library materialized
/// the file, which may differ from the intended destination.
pub trait FileFetcher {
    fn fetch(&self, spec: &FileSpec, emitter: &mut ProgressEmitter)
    -> Result<PathBuf, TransferError>;
}

// ============================================================================
// Hub Client (accel backend)
// ============================================================================

#[cfg(feature = "accel")]
impl From<RepoKind> for RepoType {
    fn from(kind: RepoKind) -> Self {
        match kind {
            RepoKind::Model => Self::Model,
            RepoKind::Dataset => Self::Dataset,
            RepoKind::Space => Self::Space,
        }
    }
}

/// Connected hub client plus its cache view.
///
/// Constructing this is the session controller's dependency check: a failure
/// here means the environment cannot transfer at all, independent of any
/// particular plan.
#[cfg(feature = "accel")]
pub struct HubClient {
    api: Api,
    cache: Cache,
}

#[cfg(feature = "accel")]
impl HubClient {
    /// Build the hub client against an explicit cache directory.
    ///
    /// The client's own progress bars are disabled: stdout belongs to the
    /// protocol and nothing else may write to it.
    pub fn connect(cache_dir: &Path, token: Option<&str>) -> Result<Self, ApiError> {
        let mut builder = ApiBuilder::new()
            .with_cache_dir(cache_dir.to_path_buf())
            .with_progress(false);
        if let Some(token) = token {
            builder = builder.with_token(Some(token.to_string()));
        }
        let api = builder.build()?;
        Ok(Self {
            api,
            cache: Cache::new(cache_dir.to_path_buf()),
        })
    }

    /// The hub client version this helper was compiled against.
    pub const fn version() -> &'static str {
        env!("GGLIB_FETCH_HUB_CLIENT_VERSION")
    }

    /// Bind the client to one plan's repository coordinates.
    pub fn fetcher(&self, plan: &DownloadPlan) -> HubFetcher {
        let repo = Repo::with_revision(
            plan.repo_id.clone(),
            plan.repo_kind.into(),
            plan.revision.clone(),
        );
        HubFetcher {
            repo_api: self.api.repo(repo.clone()),
            cache_repo: self.cache.repo(repo),
            force: plan.force,
            local_only: plan.local_only,
        }
    }
}

/// [`FileFetcher`] over the hub client's sync API.
#[cfg(feature = "accel")]
pub struct HubFetcher {
    repo_api: ApiRepo,
    cache_repo: CacheRepo,
    force: bool,
    local_only: bool,
}

#[cfg(feature = "accel")]
impl HubFetcher {
    /// Report a cache hit as a completed transfer so the parent still sees
    /// the file reach `downloaded == total`.
    fn report_cached(path: &Path, emitter: &mut ProgressEmitter) {
        let size = fs::metadata(path).map(|meta| meta.len()).unwrap_or(0);
        emitter.set_total(size);
        emitter.advance(size);
        emitter.finish();
    }
}

#[cfg(feature = "accel")]
impl FileFetcher for HubFetcher {
    fn fetch(
        &self,
        spec: &FileSpec,
        emitter: &mut ProgressEmitter,
    ) -> Result<PathBuf, TransferError> {
        if self.local_only {
            let path = self
                .cache_repo
                .get(&spec.path)
                .ok_or(TransferError::NotCached)?;
            Self::report_cached(&path, emitter);
            return Ok(path);
        }

        if !self.force {
            if let Some(path) = self.cache_repo.get(&spec.path) {
                Self::report_cached(&path, emitter);
                return Ok(path);
            }
        }

        let path = self
            .repo_api
            .download_with_progress(&spec.path, HubProgress { emitter })?;
        Ok(path)
    }
}

/// Adapter from the hub client's progress callbacks onto the emitter's
/// byte-counter surface.
#[cfg(feature = "accel")]
struct HubProgress<'a> {
    emitter: &'a mut ProgressEmitter,
}

#[cfg(feature = "accel")]
impl Progress for HubProgress<'_> {
    fn init(&mut self, size: usize, _filename: &str) {
        self.emitter.set_total(size as u64);
    }

    fn update(&mut self, size: usize) {
        self.emitter.advance(size as u64);
    }

    fn finish(&mut self) {
        self.emitter.finish();
    }
}
