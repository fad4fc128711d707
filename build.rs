//! Build script for gglib-fetch.
//!
//! Resolves the locked version of the hub client so probe reports can name
//! the exact dependency build the helper was compiled against. Best-effort
//! only: a missing or unparseable lockfile falls back to `"unknown"` and
//! NEVER fails the build.

use std::{env, fs, path::Path};

const VERSION_FALLBACK: &str = "unknown";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=Cargo.lock");

    let version = locked_version("hf-hub").unwrap_or_else(|| VERSION_FALLBACK.to_string());
    println!("cargo:rustc-env=GGLIB_FETCH_HUB_CLIENT_VERSION={version}");
}

fn locked_version(package: &str) -> Option<String> {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").ok()?;
    let lockfile = Path::new(&manifest_dir).join("Cargo.lock");
    let contents = fs::read_to_string(lockfile).ok()?;
    parse_locked_version(&contents, package)
}

/// Scan a Cargo.lock body for `package`'s `version` field.
///
/// The lockfile is plain TOML with a fixed layout, so a line scan is enough
/// and avoids pulling a TOML parser into the build dependencies.
fn parse_locked_version(lock: &str, package: &str) -> Option<String> {
    let mut in_target_package = false;
    for line in lock.lines() {
        let line = line.trim();
        if line == "[[package]]" {
            in_target_package = false;
        } else if let Some(name) = line.strip_prefix("name = ") {
            in_target_package = name.trim_matches('"') == package;
        } else if in_target_package {
            if let Some(version) = line.strip_prefix("version = ") {
                return Some(version.trim_matches('"').to_string());
            }
        }
    }
    None
}
