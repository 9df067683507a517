//! Descriptive statistics of binned distributions.
//!
//! All histogram statistics use bin centres weighted by bin content, the convention of
//! projected histograms in the summary files. An empty distribution has mean, RMS and
//! quantiles equal to 0.

use serde::{Deserialize, Serialize};

use tepx_io::Histogram1D;

/// Content-weighted mean of bin centres.
pub fn mean(h: &Histogram1D) -> f64 {
    let (mut sw, mut swx) = (0.0, 0.0);
    for (i, &w) in h.contents.iter().enumerate() {
        sw += w;
        swx += w * h.axis.center(i);
    }
    if sw == 0.0 { 0.0 } else { swx / sw }
}

/// Population standard deviation of bin centres.
pub fn rms(h: &Histogram1D) -> f64 {
    let (mut sw, mut swx, mut swx2) = (0.0, 0.0, 0.0);
    for (i, &w) in h.contents.iter().enumerate() {
        let x = h.axis.center(i);
        sw += w;
        swx += w * x;
        swx2 += w * x * x;
    }
    if sw == 0.0 {
        return 0.0;
    }
    let m = swx / sw;
    (swx2 / sw - m * m).abs().sqrt()
}

/// Quantile `p ∈ [0, 1]` from the normalised cumulative distribution, interpolating
/// linearly inside the bin where the cumulative sum crosses `p`.
pub fn quantile(h: &Histogram1D, p: f64) -> f64 {
    let n = h.contents.len();
    let total: f64 = h.contents.iter().sum();
    if n == 0 || total <= 0.0 {
        return 0.0;
    }
    let p = p.clamp(0.0, 1.0);

    // cumulative[i] = fraction of content below the low edge of bin i.
    let mut cumulative = Vec::with_capacity(n + 1);
    cumulative.push(0.0);
    let mut acc = 0.0;
    for &w in &h.contents {
        acc += w;
        cumulative.push(acc / total);
    }

    // Last bin whose low-edge cumulative is <= p; empty bins ending on p are skipped.
    let ibin = cumulative.partition_point(|&c| c <= p).saturating_sub(1).min(n - 1);

    let width = h.axis.width();
    let mut x = h.axis.low_edge(ibin);
    let dint = cumulative[ibin + 1] - cumulative[ibin];
    if dint > 0.0 {
        x += width * (p - cumulative[ibin]) / dint;
    }
    x
}

/// Median (0.5-quantile).
pub fn median(h: &Histogram1D) -> f64 {
    quantile(h, 0.5)
}

/// Mean, RMS and median of one distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    /// Sum of contents.
    pub integral: f64,
    /// Mean.
    pub mean: f64,
    /// Population standard deviation.
    pub rms: f64,
    /// 0.5-quantile.
    pub median: f64,
}

impl DistributionSummary {
    /// Summarise a histogram.
    pub fn of(h: &Histogram1D) -> Self {
        Self { integral: h.integral(), mean: mean(h), rms: rms(h), median: median(h) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tepx_io::Axis;

    fn hist(contents: Vec<f64>, lo: f64, hi: f64) -> Histogram1D {
        let axis = Axis::new(contents.len(), lo, hi).unwrap();
        Histogram1D::from_contents("h", axis, contents).unwrap()
    }

    #[test]
    fn constant_distribution() {
        let h = hist(vec![0.0, 0.0, 42.0, 0.0], 0.0, 4.0);
        assert_relative_eq!(mean(&h), 2.5);
        assert_eq!(rms(&h), 0.0);
    }

    #[test]
    fn empty_distribution_is_zero() {
        let h = hist(vec![0.0; 5], 0.0, 5.0);
        assert_eq!(mean(&h), 0.0);
        assert_eq!(rms(&h), 0.0);
        assert_eq!(median(&h), 0.0);
    }

    #[test]
    fn symmetric_two_bin() {
        let h = hist(vec![1.0, 1.0], 0.0, 2.0);
        assert_relative_eq!(mean(&h), 1.0);
        assert_relative_eq!(rms(&h), 0.5);
        assert_relative_eq!(median(&h), 1.0);
    }

    #[test]
    fn quantile_interpolates_within_bin() {
        let h = hist(vec![1.0, 3.0], 0.0, 2.0);
        // cumulative: 0, 0.25, 1.0 -> p=0.5 is one third into bin 1.
        assert_relative_eq!(median(&h), 1.0 + 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(quantile(&h, 0.0), 0.0);
        assert_relative_eq!(quantile(&h, 1.0), 2.0);
    }

    #[test]
    fn quantile_skips_empty_gap() {
        let h = hist(vec![1.0, 0.0, 1.0], 0.0, 3.0);
        assert_relative_eq!(median(&h), 2.0);
    }
}
