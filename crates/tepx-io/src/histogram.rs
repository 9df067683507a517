//! Uniform-bin histograms as stored in summary files.
//!
//! Bins are 0-based and there are no under/overflow bins: entries outside the axis range are
//! simply not stored. The 2-D contents are row-major with shape `[ny][nx]`.

use serde::{Deserialize, Serialize};

use tepx_core::{Error, Result};

/// Uniform binning `[min, max)` split into `n_bins`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    /// Number of bins.
    pub n_bins: usize,
    /// Lower edge of the first bin.
    pub min: f64,
    /// Upper edge of the last bin.
    pub max: f64,
}

impl Axis {
    /// Construct an axis.
    pub fn new(n_bins: usize, min: f64, max: f64) -> Result<Self> {
        if n_bins == 0 {
            return Err(Error::Validation("axis must have at least one bin".into()));
        }
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(Error::Validation(format!("invalid axis range [{min}, {max}]")));
        }
        Ok(Self { n_bins, min, max })
    }

    /// Bin width.
    #[inline]
    pub fn width(&self) -> f64 {
        (self.max - self.min) / self.n_bins as f64
    }

    /// Lower edge of bin `i`.
    #[inline]
    pub fn low_edge(&self, i: usize) -> f64 {
        self.min + i as f64 * self.width()
    }

    /// Centre of bin `i`.
    #[inline]
    pub fn center(&self, i: usize) -> f64 {
        self.min + (i as f64 + 0.5) * self.width()
    }

    /// All `n_bins + 1` edges.
    pub fn edges(&self) -> Vec<f64> {
        (0..=self.n_bins).map(|i| self.low_edge(i)).collect()
    }

    /// Bin containing `v`, or `None` outside `[min, max)` (NaN included).
    #[inline]
    pub fn find_bin(&self, v: f64) -> Option<usize> {
        if !(v >= self.min && v < self.max) {
            return None;
        }
        let i = ((v - self.min) / self.width()) as usize;
        Some(i.min(self.n_bins - 1))
    }

    fn check_len(&self, len: usize, what: &str) -> Result<()> {
        if len != self.n_bins {
            return Err(Error::Input(format!(
                "{what}: expected {} bins, found {len}",
                self.n_bins
            )));
        }
        Ok(())
    }
}

/// One-dimensional histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram1D {
    /// Histogram name.
    #[serde(default)]
    pub name: String,
    /// Axis title.
    #[serde(default)]
    pub title: String,
    /// Binning.
    pub axis: Axis,
    /// Sum of weights per bin.
    pub contents: Vec<f64>,
    /// Number of fills (in range or not).
    #[serde(default)]
    pub entries: f64,
}

impl Histogram1D {
    /// Empty histogram.
    pub fn new(name: impl Into<String>, axis: Axis) -> Self {
        Self {
            name: name.into(),
            title: String::new(),
            contents: vec![0.0; axis.n_bins],
            axis,
            entries: 0.0,
        }
    }

    /// Build from existing contents.
    pub fn from_contents(name: impl Into<String>, axis: Axis, contents: Vec<f64>) -> Result<Self> {
        axis.check_len(contents.len(), "histogram contents")?;
        let entries = contents.iter().sum();
        Ok(Self { name: name.into(), title: String::new(), axis, contents, entries })
    }

    /// Add `w` to the bin containing `v`; returns `false` when out of range.
    pub fn fill_weighted(&mut self, v: f64, w: f64) -> bool {
        self.entries += 1.0;
        match self.axis.find_bin(v) {
            Some(i) => {
                self.contents[i] += w;
                true
            }
            None => false,
        }
    }

    /// Unit-weight fill.
    pub fn fill(&mut self, v: f64) -> bool {
        self.fill_weighted(v, 1.0)
    }

    /// Sum of in-range contents.
    pub fn integral(&self) -> f64 {
        self.contents.iter().sum()
    }

    /// Largest bin content (0 for an empty histogram).
    pub fn max_content(&self) -> f64 {
        self.contents.iter().copied().fold(0.0, f64::max)
    }

    /// Bin-wise sum with a histogram of identical binning.
    pub fn add(&mut self, other: &Histogram1D) -> Result<()> {
        if self.axis != other.axis {
            return Err(Error::Validation(format!(
                "cannot add '{}' to '{}': binning differs",
                other.name, self.name
            )));
        }
        for (a, b) in self.contents.iter_mut().zip(&other.contents) {
            *a += b;
        }
        self.entries += other.entries;
        Ok(())
    }
}

/// Two-dimensional histogram; `contents[iy][ix]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram2D {
    /// Histogram name.
    #[serde(default)]
    pub name: String,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// x binning.
    pub x: Axis,
    /// y binning.
    pub y: Axis,
    /// Row-major contents, `ny` rows of `nx`.
    pub contents: Vec<Vec<f64>>,
    /// Number of fills.
    #[serde(default)]
    pub entries: f64,
}

impl Histogram2D {
    /// Empty histogram.
    pub fn new(name: impl Into<String>, x: Axis, y: Axis) -> Self {
        Self {
            name: name.into(),
            title: String::new(),
            contents: vec![vec![0.0; x.n_bins]; y.n_bins],
            x,
            y,
            entries: 0.0,
        }
    }

    /// Check that the content matrix matches both axes.
    pub fn validate(&self) -> Result<()> {
        self.y.check_len(self.contents.len(), &format!("'{}' rows", self.name))?;
        for row in &self.contents {
            self.x.check_len(row.len(), &format!("'{}' columns", self.name))?;
        }
        Ok(())
    }

    /// Add `w` at `(x, y)`; returns `false` when out of range.
    pub fn fill_weighted(&mut self, x: f64, y: f64, w: f64) -> bool {
        self.entries += 1.0;
        match (self.x.find_bin(x), self.y.find_bin(y)) {
            (Some(ix), Some(iy)) => {
                self.contents[iy][ix] += w;
                true
            }
            _ => false,
        }
    }

    /// Unit-weight fill.
    pub fn fill(&mut self, x: f64, y: f64) -> bool {
        self.fill_weighted(x, y, 1.0)
    }

    /// Content at `(ix, iy)`.
    pub fn get(&self, ix: usize, iy: usize) -> f64 {
        self.contents.get(iy).and_then(|row| row.get(ix)).copied().unwrap_or(0.0)
    }

    /// Largest bin content.
    pub fn max_content(&self) -> f64 {
        self.contents.iter().flatten().copied().fold(0.0, f64::max)
    }

    /// Bin-wise sum with a histogram of identical binning.
    pub fn add(&mut self, other: &Histogram2D) -> Result<()> {
        if self.x != other.x || self.y != other.y {
            return Err(Error::Validation(format!(
                "cannot add '{}' to '{}': binning differs",
                other.name, self.name
            )));
        }
        for (row, orow) in self.contents.iter_mut().zip(&other.contents) {
            for (a, b) in row.iter_mut().zip(orow) {
                *a += b;
            }
        }
        self.entries += other.entries;
        Ok(())
    }

    /// Distribution along y of the single x bin `x_bin` (0-based).
    pub fn projection_y(&self, x_bin: usize) -> Result<Histogram1D> {
        if x_bin >= self.x.n_bins {
            return Err(Error::Validation(format!(
                "x bin {x_bin} out of range for '{}' ({} bins)",
                self.name, self.x.n_bins
            )));
        }
        let contents: Vec<f64> = self.contents.iter().map(|row| row[x_bin]).collect();
        let mut h =
            Histogram1D::from_contents(format!("{}_py{x_bin}", self.name), self.y, contents)?;
        h.title = self.title.clone();
        Ok(h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_bin_edges() {
        let a = Axis::new(4, 0.0, 4.0).unwrap();
        assert_eq!(a.find_bin(0.0), Some(0));
        assert_eq!(a.find_bin(3.999), Some(3));
        assert_eq!(a.find_bin(4.0), None);
        assert_eq!(a.find_bin(-0.1), None);
        assert_eq!(a.find_bin(f64::NAN), None);
        assert_eq!(a.edges(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn rejects_degenerate_axis() {
        assert!(Axis::new(0, 0.0, 1.0).is_err());
        assert!(Axis::new(3, 1.0, 1.0).is_err());
    }

    #[test]
    fn add_and_project() {
        let x = Axis::new(5, 0.0, 5.0).unwrap();
        let y = Axis::new(3, 0.0, 3.0).unwrap();
        let mut plus = Histogram2D::new("plus", x, y);
        let mut minus = Histogram2D::new("minus", x, y);
        plus.fill(1.5, 0.5);
        plus.fill(1.5, 2.5);
        minus.fill(1.5, 2.5);
        minus.fill(4.5, 1.5);
        minus.add(&plus).unwrap();
        let p = minus.projection_y(1).unwrap();
        assert_eq!(p.contents, vec![1.0, 0.0, 2.0]);
        assert_eq!(minus.projection_y(4).unwrap().contents, vec![0.0, 1.0, 0.0]);
        assert!(minus.projection_y(5).is_err());
    }

    #[test]
    fn add_rejects_mismatched_binning() {
        let two = Axis::new(2, 0.0, 2.0).unwrap();
        let mut a = Histogram2D::new("a", two, two);
        let b = Histogram2D::new("b", Axis::new(3, 0.0, 2.0).unwrap(), two);
        assert!(a.add(&b).is_err());
    }

    #[test]
    fn validate_shape() {
        let x = Axis::new(2, 0.0, 2.0).unwrap();
        let y = Axis::new(2, 0.0, 2.0).unwrap();
        let mut h = Histogram2D::new("h", x, y);
        h.validate().unwrap();
        h.contents[1].push(0.0);
        assert!(matches!(h.validate(), Err(Error::Input(_))));
    }
}
