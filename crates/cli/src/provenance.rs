//! `<stem>.provenance.json` sidecars written next to every CLI artifact.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Serialize)]
pub struct Callsite {
    pub file: String,
    pub line: u32,
}

/// Sidecar document: code revision, callsite, params, and outputs.
#[derive(Debug, Serialize)]
pub struct Provenance {
    pub code_rev: String,
    pub overlay_version: &'static str,
    pub callsite: Callsite,
    pub params: Value,
    pub outputs: Vec<String>,
}

impl Provenance {
    /// Describe the current build at the caller's location.
    #[track_caller]
    pub fn here(params: Value, outputs: Vec<String>) -> Self {
        let caller = Location::caller();
        Self {
            code_rev: current_git_rev(),
            overlay_version: overlay::VERSION,
            callsite: Callsite {
                file: caller.file().to_string(),
                line: caller.line(),
            },
            params,
            outputs,
        }
    }
}

/// Write the sidecar for `artifact` and return its path.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, params: Value) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let doc = Provenance::here(params, vec![artifact.to_string_lossy().into_owned()]);
    let path = sidecar_path(artifact);
    ensure_parent(&path)?;
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Create the parent directory of `path` when it has one.
pub fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display())),
        _ => Ok(()),
    }
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "artifact".into());
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// `GIT_COMMIT` (build time, then run time), else `git rev-parse HEAD`, else "unknown".
pub fn current_git_rev() -> String {
    let from_env = option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|rev| !rev.is_empty());
    if let Some(rev) = from_env {
        return rev;
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
