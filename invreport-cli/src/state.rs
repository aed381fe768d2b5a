//! Where the tool looks for its files: the directory holding the executable,
//! so a copied-around binary finds the `.env`, config and extract beside it.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub fn app_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("locating the executable")?;
    match exe.parent() {
        Some(dir) => Ok(dir.to_path_buf()),
        None => std::env::current_dir().context("reading the current directory"),
    }
}

/// Resolve a configured path against `base` unless it is absolute.
pub fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Load `base/.env` into the process environment, if present.
///
/// A malformed file is an error: lines before the bad one are already applied.
pub fn load_dotenv(base: &Path) -> Result<Option<PathBuf>> {
    let path = base.join(".env");
    if !path.exists() {
        return Ok(None);
    }
    dotenv::from_path(&path).with_context(|| format!("loading {}", path.display()))?;
    Ok(Some(path))
}
