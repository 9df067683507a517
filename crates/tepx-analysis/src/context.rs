//! Per-run state for linearity and statistical-error runs.
//!
//! A [`RunContext`] is fed one summary file at a time. It keeps only the accumulated graphs;
//! each file's histograms are dropped once its points have been extracted. [`RunContext::finish`]
//! sorts the graphs, runs the linear fits and returns a [`RunOutcome`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use tepx_core::{AnalysisConfig, Observable, Result};
use tepx_io::{ResultsFile, SummaryFile};

use crate::aggregate::{SeriesSpec, combine_sides, group_path, ring_params, series_for, stat_error};
use crate::graph::Graph;
use crate::linear::{
    BandPoint, ExtrapolatedLine, LinearFit, confidence_band, fit_linear, relative_deviation,
};

/// An input that was not used, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedInput {
    /// File path.
    pub path: PathBuf,
    /// Error message.
    pub reason: String,
}

/// Everything produced for one (disk, ring) bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketResult {
    /// Disk index.
    pub disk: u32,
    /// Ring index.
    pub ring: u32,
    /// Object name, e.g. `Hits Disk1Ring2`.
    pub name: String,
    /// One graph per histogram family; the first is the fitted one.
    pub series: Vec<Graph>,
    /// Linear fit over the low-pileup range.
    pub fit: Option<LinearFit>,
    /// Fitted line over the extrapolation range.
    pub line: Option<ExtrapolatedLine>,
    /// Confidence band at the graph abscissae.
    pub band: Option<Vec<BandPoint>>,
    /// Percent deviation from the extrapolated line.
    pub deviation: Option<Graph>,
    /// Why the fit is absent, when it was attempted.
    pub fit_error: Option<String>,
}

/// Final state of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Observable of the run.
    pub observable: Observable,
    /// Buckets in disk-major order.
    pub buckets: Vec<BucketResult>,
    /// Whole-detector statistical error (statistical-error runs only).
    pub total: Option<Graph>,
    /// Pileup values of the files that were used, in processing order.
    pub pileups: Vec<f64>,
    /// Files that were not used.
    pub skipped: Vec<SkippedInput>,
}

impl RunOutcome {
    /// Results container with graphs, fits, bands and deviations keyed by object name.
    pub fn to_results(&self) -> Result<ResultsFile> {
        let mut out = ResultsFile::new(self.observable.as_arg());
        for b in &self.buckets {
            for g in &b.series {
                out.insert(g.name.clone(), g)?;
            }
            if let Some(fit) = &b.fit {
                out.insert(format!("Fit {}", b.name), fit)?;
            }
            if let Some(line) = &b.line {
                out.insert(format!("Extrapolated {}", b.name), line)?;
            }
            if let Some(band) = &b.band {
                out.insert(format!("Band {}", b.name), band)?;
            }
            if let Some(dev) = &b.deviation {
                out.insert(dev.name.clone(), dev)?;
            }
        }
        if let Some(total) = &self.total {
            out.insert(total.name.clone(), total)?;
        }
        out.insert("Pileups", &self.pileups)?;
        if !self.skipped.is_empty() {
            out.insert("Skipped", &self.skipped)?;
        }
        Ok(out)
    }

    /// Bucket by disk and ring.
    pub fn bucket(&self, disk: u32, ring: u32) -> Option<&BucketResult> {
        self.buckets.iter().find(|b| b.disk == disk && b.ring == ring)
    }
}

/// Name of the whole-detector statistical-error graph.
pub const TOTAL_GRAPH: &str = "StatErrorTEPX";

/// Accumulates points for one observable across summary files.
pub struct RunContext<'a> {
    config: &'a AnalysisConfig,
    observable: Observable,
    group: String,
    series: Vec<SeriesSpec>,
    graphs: BTreeMap<(u32, u32), Vec<Graph>>,
    total: Option<Graph>,
    pileups: Vec<f64>,
    skipped: Vec<SkippedInput>,
}

/// Object name of a bucket, e.g. `2xCoincidences Disk1Ring3`.
pub fn bucket_name(observable: Observable, disk: u32, ring: u32) -> String {
    format!("{} Disk{disk}Ring{ring}", observable.object_prefix())
}

fn bucket_title(observable: Observable, disk: u32, ring: u32) -> String {
    match observable {
        Observable::Clusters => format!("Statistical Error [NB4] Disk{disk}Ring{ring}"),
        _ => format!("Linearity Disk{disk}Ring{ring}"),
    }
}

impl<'a> RunContext<'a> {
    /// Empty context for `observable`.
    pub fn new(config: &'a AnalysisConfig, observable: Observable) -> Self {
        let series = series_for(observable);
        let mut graphs = BTreeMap::new();
        for disk in config.geometry.disks.indices() {
            for ring in config.geometry.rings.indices() {
                let name = bucket_name(observable, disk, ring);
                let title = bucket_title(observable, disk, ring);
                let gs = series
                    .iter()
                    .enumerate()
                    .map(|(i, s)| {
                        let n = if series.len() == 1 || i == 0 {
                            name.clone()
                        } else {
                            format!("{name} {}", s.key)
                        };
                        Graph::new(n, title.clone())
                    })
                    .collect();
                graphs.insert((disk, ring), gs);
            }
        }
        let total = (observable == Observable::Clusters)
            .then(|| Graph::new(TOTAL_GRAPH, "Stat. Error TEPX [NB4]"));
        Self {
            config,
            observable,
            group: group_path(observable, &config.summary),
            series,
            graphs,
            total,
            pileups: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Observable of this run.
    pub fn observable(&self) -> Observable {
        self.observable
    }

    /// Open and process one file; failures are logged and recorded, never returned.
    pub fn process_path(&mut self, path: &Path) {
        let result =
            SummaryFile::open(path, &self.config.summary).and_then(|f| self.process_summary(&f));
        if let Err(e) = result {
            tracing::warn!(file = %path.display(), error = %e, "skipping input");
            self.skipped.push(SkippedInput { path: path.to_path_buf(), reason: e.to_string() });
        }
    }

    /// Extract one point per (disk, ring, series) from a loaded file.
    ///
    /// A disk whose histograms are missing on both sides is logged and skipped; it
    /// contributes nothing to the whole-detector total.
    pub fn process_summary(&mut self, file: &SummaryFile) -> Result<()> {
        let pileup = file.pileup;
        let cfg = self.config;
        let mut total_mean = 0.0;

        for disk in cfg.geometry.disks.indices() {
            for (si, series) in self.series.iter().enumerate() {
                let hist = match combine_sides(file, &self.group, series, disk) {
                    Ok(h) => h,
                    Err(e) => {
                        tracing::warn!(
                            pileup,
                            disk,
                            series = series.key,
                            error = %e,
                            "bucket skipped"
                        );
                        continue;
                    }
                };
                for (ring_bin, ring) in cfg.geometry.rings.indices().enumerate() {
                    let params = match ring_params(
                        &hist,
                        ring_bin,
                        cfg.linearity.central_value,
                        &cfg.poisson,
                    ) {
                        Ok(p) => p,
                        Err(e) => {
                            tracing::warn!(pileup, disk, ring, error = %e, "ring skipped");
                            continue;
                        }
                    };
                    let Some(graph) = self.graphs.get_mut(&(disk, ring)).and_then(|g| g.get_mut(si))
                    else {
                        continue;
                    };
                    match self.observable {
                        Observable::Clusters => {
                            total_mean += params.central;
                            let err = stat_error(params.central, pileup, &cfg.stat_error);
                            graph.push(pileup, err, 0.0);
                        }
                        _ => graph.push(pileup, params.central, params.spread()),
                    }
                }
            }
        }

        if let Some(total) = self.total.as_mut() {
            total.push(pileup, stat_error(total_mean, pileup, &cfg.stat_error), 0.0);
        }
        self.pileups.push(pileup);
        tracing::info!(pileup, observable = %self.observable, "processed summary file");
        Ok(())
    }

    /// Sort graphs, fit linearity buckets and assemble the outcome.
    pub fn finish(self) -> RunOutcome {
        let lin = &self.config.linearity;
        let fits = self.observable != Observable::Clusters;
        let mut buckets = Vec::with_capacity(self.graphs.len());

        for ((disk, ring), mut series) in self.graphs {
            series.iter_mut().for_each(Graph::sort);
            let mut bucket = BucketResult {
                disk,
                ring,
                name: bucket_name(self.observable, disk, ring),
                series,
                fit: None,
                line: None,
                band: None,
                deviation: None,
                fit_error: None,
            };
            if fits && let Some(main) = bucket.series.first() {
                match fit_linear(main, 0.0, lin.fit_basis) {
                    Ok(fit) => {
                        let line = fit.extrapolate(0.0, lin.extrapolate_to);
                        let mut dev = relative_deviation(main, &line);
                        dev.name = format!(
                            "Deviation {} Disk{disk}Ring{ring}",
                            self.observable.as_arg()
                        );
                        bucket.band = confidence_band(&fit, &main.xs(), lin.confidence_level);
                        bucket.deviation = Some(dev);
                        bucket.line = Some(line);
                        bucket.fit = Some(fit);
                    }
                    Err(e) => {
                        tracing::warn!(disk, ring, error = %e, "linear fit failed");
                        bucket.fit_error = Some(e.to_string());
                    }
                }
            }
            buckets.push(bucket);
        }

        let mut total = self.total;
        if let Some(t) = total.as_mut() {
            t.sort();
        }
        RunOutcome {
            observable: self.observable,
            buckets,
            total,
            pileups: self.pileups,
            skipped: self.skipped,
        }
    }
}
