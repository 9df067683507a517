//! Per-pileup summary files.
//!
//! A summary file is a JSON container of named 2-D histograms grouped by directory path:
//!
//! ```json
//! { "directories": { "BRIL_IT_Analysis/TEPX/Hits": { "Number of hits for Disk 1": { ... } } } }
//! ```
//!
//! The pileup value is carried by the file name, `summary_PU_<value>.json` by default.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use tepx_core::config::SummaryConfig;
use tepx_core::{Error, Result};

use crate::histogram::Histogram2D;

/// Directory path → histogram name → histogram.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryContent {
    /// Groups keyed by slash-separated path.
    #[serde(default)]
    pub directories: BTreeMap<String, BTreeMap<String, Histogram2D>>,
}

impl SummaryContent {
    /// Insert (or replace) a histogram; the histogram's own name is set to `name`.
    pub fn insert(&mut self, group: &str, name: &str, mut hist: Histogram2D) {
        hist.name = name.to_string();
        self.directories.entry(group.to_string()).or_default().insert(name.to_string(), hist);
    }

    /// Look a histogram up.
    pub fn get(&self, group: &str, name: &str) -> Option<&Histogram2D> {
        self.directories.get(group)?.get(name)
    }

    /// Serialize to pretty JSON at `path`.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| Error::output_write(path, e))
    }
}

/// A loaded summary file together with its pileup value.
#[derive(Debug, Clone)]
pub struct SummaryFile {
    /// Source path.
    pub path: PathBuf,
    /// Pileup parsed from the file name.
    pub pileup: f64,
    /// Histogram content.
    pub content: SummaryContent,
}

impl SummaryFile {
    /// Parse the pileup from the file name, then read and check the content.
    pub fn open(path: &Path, cfg: &SummaryConfig) -> Result<Self> {
        let name = path.file_name().and_then(|s| s.to_str()).unwrap_or_default();
        let pileup = parse_pileup(name, cfg)?;

        let bytes = std::fs::read(path)
            .map_err(|e| Error::Input(format!("failed to read {}: {e}", path.display())))?;
        let mut content: SummaryContent = serde_json::from_slice(&bytes)
            .map_err(|e| Error::Input(format!("malformed summary file {}: {e}", path.display())))?;

        for (group, hists) in content.directories.iter_mut() {
            for (hname, h) in hists.iter_mut() {
                if h.name.is_empty() {
                    h.name = hname.clone();
                }
                h.validate().map_err(|e| {
                    Error::Input(format!("{}: {group}/{hname}: {e}", path.display()))
                })?;
            }
        }

        tracing::info!(
            pileup,
            file = %path.display(),
            groups = content.directories.len(),
            "loaded summary file"
        );
        Ok(Self { path: path.to_path_buf(), pileup, content })
    }

    /// Histogram `name` in `group`, or [`Error::MissingObservable`].
    pub fn histogram(&self, group: &str, name: &str) -> Result<&Histogram2D> {
        self.content.get(group, name).ok_or_else(|| Error::MissingObservable {
            group: group.to_string(),
            name: name.to_string(),
        })
    }
}

/// Extract the pileup value from a summary file name such as `summary_PU_140.json`.
pub fn parse_pileup(file_name: &str, cfg: &SummaryConfig) -> Result<f64> {
    let unrecognized = || Error::UnrecognizedFilename {
        name: file_name.to_string(),
        expected: cfg.pattern(),
    };
    let suffix = format!(".{}", cfg.extension);
    let token = file_name
        .strip_prefix(cfg.prefix.as_str())
        .and_then(|rest| rest.strip_suffix(suffix.as_str()))
        .ok_or_else(unrecognized)?;
    let value: f64 = token.trim().parse().map_err(|_| unrecognized())?;
    if !value.is_finite() || value < 0.0 {
        return Err(unrecognized());
    }
    Ok(value)
}
