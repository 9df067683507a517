//! Histogram filling from column data with an optional selection mask.

use tepx_core::{Error, Result};
use tepx_io::{Axis, Histogram1D, Histogram2D};

fn check_mask(len: usize, mask: Option<&[bool]>) -> Result<()> {
    if let Some(m) = mask
        && m.len() != len
    {
        return Err(Error::Validation(format!(
            "selection mask has {} rows, column has {len}",
            m.len()
        )));
    }
    Ok(())
}

/// Fill `values` (rows passing `mask`) into a new histogram.
///
/// A value equal to the axis maximum goes into the last bin, so an axis from
/// [`auto_axis`] keeps every finite value. Other out-of-range values are dropped.
pub fn fill_1d(
    name: &str,
    values: &[f64],
    mask: Option<&[bool]>,
    axis: Axis,
) -> Result<Histogram1D> {
    check_mask(values.len(), mask)?;
    let mut h = Histogram1D::new(name, axis);
    let last = axis.n_bins - 1;
    let mut dropped = 0usize;
    for (i, &v) in values.iter().enumerate() {
        if mask.is_some_and(|m| !m[i]) || v.is_nan() {
            continue;
        }
        if h.fill(v) {
            continue;
        }
        if v == axis.max {
            h.contents[last] += 1.0;
        } else {
            dropped += 1;
        }
    }
    if dropped > 0 {
        tracing::debug!(histogram = name, dropped, "entries outside the axis range");
    }
    Ok(h)
}

/// Axis spanning the data range, as used for quick-look histograms: `[min, max]` of the
/// finite values, widened by 0.5 on each side when all values are equal, `[0, 1]` when
/// there are none.
pub fn auto_axis(values: &[f64], n_bins: usize) -> Result<Axis> {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (lo, hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let (lo, hi) = if lo > hi {
        (0.0, 1.0)
    } else if lo == hi {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    };
    Axis::new(n_bins, lo, hi)
}

/// Fill `(xs, ys)` pairs passing `mask`; out-of-range pairs are dropped.
pub fn fill_2d(
    name: &str,
    xs: &[f64],
    ys: &[f64],
    mask: Option<&[bool]>,
    x: Axis,
    y: Axis,
) -> Result<Histogram2D> {
    if xs.len() != ys.len() {
        return Err(Error::Validation(format!(
            "x column has {} rows, y column has {}",
            xs.len(),
            ys.len()
        )));
    }
    check_mask(xs.len(), mask)?;
    let mut h = Histogram2D::new(name, x, y);
    for (i, (&a, &b)) in xs.iter().zip(ys).enumerate() {
        if mask.is_some_and(|m| !m[i]) {
            continue;
        }
        h.fill(a, b);
    }
    Ok(h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upper_edge_is_kept_other_flow_dropped() {
        let axis = Axis::new(2, 0.0, 2.0).unwrap();
        let values = [-1.0, 0.5, 1.5, 2.0, 5.0, f64::NAN];
        let h = fill_1d("e", &values, None, axis).unwrap();
        assert_eq!(h.contents, vec![1.0, 2.0]);
        // Entries count every non-NaN fill, in range or not.
        assert_eq!(h.entries, 5.0);
    }

    #[test]
    fn auto_axis_keeps_every_value() {
        let values = [7.0, 9.5, 12.0, 12.0];
        let h = fill_1d("r", &values, None, auto_axis(&values, 5).unwrap()).unwrap();
        assert_eq!(h.integral(), 4.0);
    }

    #[test]
    fn mask_selects_rows() {
        let axis = Axis::new(1, 0.0, 10.0).unwrap();
        let values = [1.0, 2.0, 3.0];
        let mask = [true, false, true];
        let h = fill_1d("m", &values, Some(&mask), axis).unwrap();
        assert_eq!(h.contents, vec![2.0]);
        assert!(fill_1d("bad", &values, Some(&mask[..2]), axis).is_err());
    }

    #[test]
    fn auto_axis_ranges() {
        let a = auto_axis(&[3.0, 1.0, 2.0], 4).unwrap();
        assert_eq!((a.min, a.max), (1.0, 3.0));
        let b = auto_axis(&[5.0, 5.0], 4).unwrap();
        assert_eq!((b.min, b.max), (4.5, 5.5));
        let c = auto_axis(&[], 4).unwrap();
        assert_eq!((c.min, c.max), (0.0, 1.0));
    }

    #[test]
    fn fill_2d_drops_out_of_range() {
        let ax = Axis::new(2, 0.0, 2.0).unwrap();
        let h = fill_2d("h", &[0.5, 1.5, 9.0], &[0.5, 1.5, 0.5], None, ax, ax).unwrap();
        assert_eq!(h.contents, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }
}
