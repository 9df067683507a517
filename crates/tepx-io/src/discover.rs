//! Input discovery.

use std::fs;
use std::path::{Path, PathBuf};

use tepx_core::config::SummaryConfig;
use tepx_core::{Error, Result};

/// Candidate summary files under `root`, sorted by name.
///
/// A regular file given directly is returned as-is. In a directory, every regular file whose
/// name starts with the configured prefix and ends with the configured extension is
/// returned; filename validity (the pileup token) is checked later, per file. Symlinks
/// are skipped.
pub fn find_summary_files(root: &Path, cfg: &SummaryConfig) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    let rd = fs::read_dir(root)
        .map_err(|e| Error::Input(format!("cannot list {}: {e}", root.display())))?;
    let suffix = format!(".{}", cfg.extension);
    let mut out = Vec::new();
    for entry in rd {
        let entry = entry?;
        let ft = entry.file_type()?;
        if ft.is_symlink() || !ft.is_file() {
            continue;
        }
        let path = entry.path();
        if let Some(name) = path.file_name().and_then(|s| s.to_str())
            && name.starts_with(cfg.prefix.as_str())
            && name.ends_with(suffix.as_str())
        {
            out.push(path);
        } else {
            tracing::debug!(file = %path.display(), "not a summary file, skipping");
        }
    }
    out.sort();
    Ok(out)
}

/// Path of the cluster table for one pileup scenario: `<dir>/<kind>_<pileup>.parquet`.
pub fn cluster_file_path(dir: &Path, kind: &str, pileup: &str) -> PathBuf {
    dir.join(format!("{kind}_{pileup}.parquet"))
}
