//! Command-line interface.
//!
//! The argument surface is the helper's only input: everything the session
//! needs arrives here and is converted into a [`DownloadPlan`] before any
//! network work starts. File specifications are validated separately so a
//! bad spec can be reported through the protocol stream rather than by
//! clap's own stderr output.

use std::path::PathBuf;

use clap::Parser;

use crate::plan::{DownloadPlan, FileSpec, RepoKind};

/// Hub download helper: transfers files and reports progress as NDJSON on
/// stdout.
#[derive(Parser, Debug)]
#[command(name = "gglib-fetch", version, about)]
pub struct Cli {
    /// Repository identifier, e.g. `TheBloke/Llama-2-7B-GGUF`
    #[arg(long)]
    pub repo_id: String,

    /// Revision (branch, tag, or commit) to download from
    #[arg(long, default_value = "main")]
    pub revision: String,

    /// Repository kind: model, dataset, or space
    #[arg(long, default_value_t = RepoKind::Model)]
    pub repo_type: RepoKind,

    /// Directory where downloaded files are placed
    #[arg(long)]
    pub dest: PathBuf,

    /// Cache directory for the hub client (defaults to a cache under --dest)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Access token for gated repositories
    #[arg(long)]
    pub token: Option<String>,

    /// File to download, optionally with a size hint (`path::bytes` or
    /// `path=bytes`). Repeatable.
    #[arg(long = "file", value_name = "SPEC")]
    pub files: Vec<String>,

    /// Re-download even when the destination file already exists
    #[arg(long)]
    pub force: bool,

    /// Only use files already present in the local cache
    #[arg(long)]
    pub local_only: bool,

    /// Report helper and hub client versions, then exit
    #[arg(long)]
    pub probe: bool,
}

impl Cli {
    /// The cache directory to hand the hub client.
    ///
    /// Defaults to a cache under the destination so the final rename stays
    /// on one filesystem.
    pub fn effective_cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| self.dest.join(".cache").join("huggingface"))
    }

    /// Assemble the plan from the parsed arguments and validated specs.
    pub fn plan(&self, files: Vec<FileSpec>) -> DownloadPlan {
        DownloadPlan {
            repo_id: self.repo_id.clone(),
            revision: self.revision.clone(),
            repo_kind: self.repo_type,
            destination_root: self.dest.clone(),
            cache_dir: Some(self.effective_cache_dir()),
            token: self.token.clone(),
            force: self.force,
            local_only: self.local_only,
            files,
        }
    }
}
