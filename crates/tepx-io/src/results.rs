//! Results container written at the end of a run.
//!
//! Objects are stored by name in insertion-independent (sorted) order, so repeated runs on
//! the same inputs produce identical files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use tepx_core::{Error, Result};

/// Named result objects (graphs, fits, deviations, image references).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultsFile {
    /// Producing tool version.
    pub version: String,
    /// Run label, e.g. the observable.
    pub label: String,
    /// Serialized objects keyed by name.
    pub objects: BTreeMap<String, serde_json::Value>,
}

impl ResultsFile {
    /// Empty container.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            version: tepx_core::VERSION.to_string(),
            label: label.into(),
            objects: BTreeMap::new(),
        }
    }

    /// Store `value` under `name`, replacing any previous object of that name.
    pub fn insert<T: Serialize>(&mut self, name: impl Into<String>, value: &T) -> Result<()> {
        let v = serde_json::to_value(value)?;
        self.objects.insert(name.into(), v);
        Ok(())
    }

    /// Object by name.
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.objects.get(name)
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// `true` when nothing was stored.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Write `<dir>/<stem>.json`, creating `dir` if needed; returns the written path.
    pub fn write(&self, dir: &Path, stem: &str) -> Result<PathBuf> {
        let path = dir.join(format!("{stem}.json"));
        std::fs::create_dir_all(dir).map_err(|e| Error::output_write(dir, e))?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json).map_err(|e| Error::output_write(&path, e))?;
        tracing::info!(path = %path.display(), objects = self.objects.len(), "wrote results");
        Ok(path)
    }

    /// Read a container back.
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_to_unwritable_location_is_output_error() {
        let mut r = ResultsFile::new("Hits");
        r.insert("x", &vec![1.0, 2.0]).unwrap();
        let err = r.write(Path::new("/proc/definitely-not-writable"), "Results_Hits").unwrap_err();
        assert!(matches!(err, Error::OutputWrite { .. }), "{err:?}");
    }

    #[test]
    fn replaces_by_name() {
        let mut r = ResultsFile::new("Hits");
        r.insert("a", &1).unwrap();
        r.insert("a", &2).unwrap();
        assert_eq!(r.len(), 1);
        assert_eq!(r.get("a"), Some(&serde_json::json!(2)));
    }
}
