//! Observable selector for linearity / statistical-error runs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// What is counted per disk and ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Observable {
    /// Cluster counts (statistical-error run).
    Clusters,
    /// Hit counts (linearity run).
    Hits,
    /// N-fold coincidences (linearity run, 2 or 3).
    Coincidences(u8),
}

impl Observable {
    /// Accepted command-line spellings.
    pub const CHOICES: [&'static str; 4] = ["Clusters", "Hits", "2x", "3x"];

    /// Command-line spelling.
    pub fn as_arg(&self) -> String {
        match self {
            Observable::Clusters => "Clusters".into(),
            Observable::Hits => "Hits".into(),
            Observable::Coincidences(n) => format!("{n}x"),
        }
    }

    /// Name of the results container written for this run.
    pub fn results_file_stem(&self) -> String {
        match self {
            Observable::Clusters => "Results_StatError".into(),
            Observable::Hits => "Results_Hits".into(),
            Observable::Coincidences(n) => format!("Results_Coincidences_{n}x"),
        }
    }

    /// Prefix used for per-bucket object and image names.
    pub fn object_prefix(&self) -> String {
        match self {
            Observable::Clusters => "Clusters".into(),
            Observable::Hits => "Hits".into(),
            Observable::Coincidences(n) => format!("{n}xCoincidences"),
        }
    }

    /// Name of the summary canvas.
    pub fn summary_name(&self) -> &'static str {
        match self {
            Observable::Clusters => "SummaryStatError",
            Observable::Hits => "SummaryHits",
            Observable::Coincidences(_) => "SummaryCoincidences",
        }
    }
}

impl fmt::Display for Observable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_arg())
    }
}

impl FromStr for Observable {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Clusters" => Ok(Observable::Clusters),
            "Hits" => Ok(Observable::Hits),
            "2x" => Ok(Observable::Coincidences(2)),
            "3x" => Ok(Observable::Coincidences(3)),
            other => Err(Error::Validation(format!(
                "unknown observable '{other}', expected one of {}",
                Observable::CHOICES.join(", ")
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_choices() {
        for c in Observable::CHOICES {
            let o: Observable = c.parse().unwrap();
            assert_eq!(o.as_arg(), c);
        }
    }

    #[test]
    fn rejects_unknown() {
        assert!("4x".parse::<Observable>().is_err());
        assert!("clusters".parse::<Observable>().is_err());
    }

    #[test]
    fn results_names() {
        assert_eq!(Observable::Clusters.results_file_stem(), "Results_StatError");
        assert_eq!(Observable::Coincidences(3).results_file_stem(), "Results_Coincidences_3x");
    }
}
