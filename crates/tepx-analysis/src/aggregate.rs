//! Per-(disk, ring) aggregation of summary histograms.
//!
//! Each disk has one 2-D histogram per endcap side with the ring on x and the counted
//! observable on y. The two sides are added, and the y distribution of each ring's x bin is
//! reduced to a central value and a spread.

use serde::{Deserialize, Serialize};

use tepx_core::config::{PoissonFitConfig, StatErrorConfig, SummaryConfig};
use tepx_core::{CentralValue, Error, Observable, Result};
use tepx_io::{Histogram2D, SummaryFile};

use crate::poisson::{PoissonFit, PoissonOutcome, fit_poisson};
use crate::stats::DistributionSummary;

/// One histogram family read per disk, e.g. all hits or only real coincidences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesSpec {
    /// Short key used in object names (`sum`, `real`, ...).
    pub key: &'static str,
    /// Histogram name up to and including `"Disk "`.
    pub base: String,
}

impl SeriesSpec {
    /// Histogram name of `disk` on the +z (`negative == false`) or -z side.
    pub fn histogram_name(&self, disk: u32, negative: bool) -> String {
        if negative { format!("{}-{disk}", self.base) } else { format!("{}{disk}", self.base) }
    }
}

/// Histogram families read for `observable`; the first one is the fitted series.
pub fn series_for(observable: Observable) -> Vec<SeriesSpec> {
    match observable {
        Observable::Clusters => {
            vec![SeriesSpec { key: "clusters", base: "Number of clusters for Disk ".into() }]
        }
        Observable::Hits => {
            vec![SeriesSpec { key: "hits", base: "Number of hits for Disk ".into() }]
        }
        Observable::Coincidences(n) => vec![
            SeriesSpec { key: "sum", base: format!("Number of {n}x Coincidences for Disk ") },
            SeriesSpec { key: "real", base: format!("Number of real {n}x Coincidences for Disk ") },
        ],
    }
}

/// Group path holding the histograms of `observable`.
pub fn group_path(observable: Observable, cfg: &SummaryConfig) -> String {
    match observable {
        Observable::Clusters => format!("{}/Clusters", cfg.base_group),
        Observable::Hits => format!("{}/{}/Hits", cfg.base_group, cfg.subdetector),
        Observable::Coincidences(n) => {
            format!("{}/{}/{n}xCoincidences", cfg.base_group, cfg.subdetector)
        }
    }
}

/// Sum of the +z and -z histograms of one disk.
///
/// A single missing side contributes nothing; both missing is
/// [`Error::MissingObservable`] naming the +z histogram.
pub fn combine_sides(
    file: &SummaryFile,
    group: &str,
    series: &SeriesSpec,
    disk: u32,
) -> Result<Histogram2D> {
    let plus_name = series.histogram_name(disk, false);
    let minus_name = series.histogram_name(disk, true);
    let plus = file.histogram(group, &plus_name).ok();
    let minus = file.histogram(group, &minus_name).ok();
    match (minus, plus) {
        (Some(m), Some(p)) => {
            let mut sum = m.clone();
            sum.add(p)?;
            Ok(sum)
        }
        (Some(only), None) | (None, Some(only)) => {
            let missing = if plus.is_none() { &plus_name } else { &minus_name };
            tracing::warn!(
                group,
                histogram = %missing,
                pileup = file.pileup,
                "missing endcap side, using the other one alone"
            );
            Ok(only.clone())
        }
        (None, None) => {
            Err(Error::MissingObservable { group: group.to_string(), name: plus_name })
        }
    }
}

/// Reduced statistics of one ring's distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingParams {
    /// Mean, RMS and median of the projection.
    pub summary: DistributionSummary,
    /// Value selected by the central-value policy.
    pub central: f64,
    /// Poisson fit, when requested and successful.
    pub poisson: Option<PoissonFit>,
}

impl RingParams {
    /// Spread reported with the central value (the RMS).
    pub fn spread(&self) -> f64 {
        self.summary.rms
    }
}

/// Statistics of x bin `ring_bin` (0-based) of a combined disk histogram.
pub fn ring_params(
    hist: &Histogram2D,
    ring_bin: usize,
    policy: CentralValue,
    poisson_cfg: &PoissonFitConfig,
) -> Result<RingParams> {
    let projection = hist.projection_y(ring_bin)?;
    let summary = DistributionSummary::of(&projection);
    let (central, poisson) = match policy {
        CentralValue::Mean => (summary.mean, None),
        CentralValue::Median => (summary.median, None),
        CentralValue::PoissonFit => match fit_poisson(&projection, poisson_cfg) {
            Ok(PoissonOutcome::Fitted(fit)) => (fit.mean(), Some(fit)),
            Ok(PoissonOutcome::Skipped { mean }) => (mean, None),
            Err(e) => {
                tracing::warn!(
                    histogram = %hist.name,
                    ring_bin,
                    error = %e,
                    "poisson fit failed, using the mean"
                );
                (summary.mean, None)
            }
        },
    };
    tracing::debug!(
        histogram = %hist.name,
        ring_bin,
        mean = summary.mean,
        median = summary.median,
        rms = summary.rms,
        central,
        "ring parameters"
    );
    Ok(RingParams { summary, central, poisson })
}

/// Relative statistical error of a luminosity measurement from `mean` counts per bunch
/// crossing: `1/sqrt(mean·C) · 1/sqrt(rate/R)`. Zero for `mean <= 0` or `pileup == 0`.
pub fn stat_error(mean: f64, pileup: f64, cfg: &StatErrorConfig) -> f64 {
    if pileup == 0.0 || mean <= 0.0 {
        return 0.0;
    }
    let counts = mean * cfg.coincidence_factor;
    let rate = cfg.trigger_rate_khz / cfg.rate_divisor;
    if rate <= 0.0 {
        return 0.0;
    }
    (counts.sqrt() / counts) * (rate.sqrt() / rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::path::PathBuf;
    use tepx_io::{Axis, SummaryContent};

    fn disk_hist(fills: &[(f64, f64)]) -> Histogram2D {
        let x = Axis::new(5, 0.0, 5.0).unwrap();
        let mut h = Histogram2D::new("", x, Axis::new(10, 0.0, 10.0).unwrap());
        for &(x, y) in fills {
            h.fill(x, y);
        }
        h
    }

    fn file_with(entries: Vec<(&str, Histogram2D)>) -> SummaryFile {
        let mut content = SummaryContent::default();
        for (name, h) in entries {
            content.insert("G", name, h);
        }
        SummaryFile { path: PathBuf::from("summary_PU_50.json"), pileup: 50.0, content }
    }

    #[test]
    fn stat_error_zero_cases() {
        let cfg = StatErrorConfig::default();
        assert_eq!(stat_error(0.0, 100.0, &cfg), 0.0);
        assert_eq!(stat_error(5.0, 0.0, &cfg), 0.0);
        let other = StatErrorConfig { trigger_rate_khz: 3.0, ..cfg.clone() };
        assert_eq!(stat_error(0.0, 10.0, &other), 0.0);
    }

    #[test]
    fn stat_error_value() {
        let cfg = StatErrorConfig::default();
        let expected = 1.0 / (4.0 * 16384.0f64).sqrt() / (0.075f64 / 40.0).sqrt();
        assert_relative_eq!(stat_error(4.0, 100.0, &cfg), expected, epsilon = 1e-15);
    }

    #[test]
    fn sides_are_added() {
        let series = &series_for(Observable::Hits)[0];
        let f = file_with(vec![
            ("Number of hits for Disk 1", disk_hist(&[(0.5, 2.5)])),
            ("Number of hits for Disk -1", disk_hist(&[(0.5, 4.5)])),
        ]);
        let h = combine_sides(&f, "G", series, 1).unwrap();
        let p = ring_params(&h, 0, CentralValue::Mean, &PoissonFitConfig::default()).unwrap();
        assert_relative_eq!(p.central, 3.5);
        assert_relative_eq!(p.spread(), 1.0);
    }

    #[test]
    fn missing_side_contributes_zero() {
        let series = &series_for(Observable::Hits)[0];
        let f = file_with(vec![("Number of hits for Disk -2", disk_hist(&[(1.5, 6.5)]))]);
        let h = combine_sides(&f, "G", series, 2).unwrap();
        let p = ring_params(&h, 1, CentralValue::Mean, &PoissonFitConfig::default()).unwrap();
        assert_relative_eq!(p.central, 6.5);
        match combine_sides(&f, "G", series, 3) {
            Err(Error::MissingObservable { name, .. }) => {
                assert_eq!(name, "Number of hits for Disk 3")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn median_policy() {
        let h = disk_hist(&[(0.5, 1.5), (0.5, 1.5), (0.5, 8.5)]);
        let p = ring_params(&h, 0, CentralValue::Median, &PoissonFitConfig::default()).unwrap();
        assert!(p.central < p.summary.mean);
        assert_relative_eq!(p.central, 1.0 + 0.75, epsilon = 1e-12);
    }

    #[test]
    fn poisson_policy_falls_back_to_mean_at_low_counts() {
        let h = disk_hist(&[(0.5, 0.2), (0.5, 0.2), (0.5, 1.2)]);
        let p = ring_params(&h, 0, CentralValue::PoissonFit, &PoissonFitConfig::default()).unwrap();
        assert!(p.poisson.is_none());
        assert_relative_eq!(p.central, p.summary.mean);
    }

    #[test]
    fn names_and_groups() {
        let cfg = SummaryConfig::default();
        assert_eq!(group_path(Observable::Clusters, &cfg), "BRIL_IT_Analysis/Clusters");
        assert_eq!(
            group_path(Observable::Coincidences(3), &cfg),
            "BRIL_IT_Analysis/TEPX/3xCoincidences"
        );
        let s = series_for(Observable::Coincidences(2));
        assert_eq!(s[1].histogram_name(4, true), "Number of real 2x Coincidences for Disk -4");
    }
}
