//! Geometric classification of clusters into disks, rings and sub-disks.
//!
//! Masks are evaluated column-wise over a whole [`ClusterTable`]. Every comparison is strict,
//! so a value exactly on a boundary belongs to no range. Disk and sub-disk tables are
//! mirrored: `lo < z < hi` or `-hi < z < -lo`.

use std::collections::BTreeMap;

use tepx_core::{Geometry, RangeEntry, Result};
use tepx_io::ClusterTable;

/// One boolean per table row.
pub type Mask = Vec<bool>;

/// Rows with `lo < v < hi`.
pub fn range_mask(values: &[f64], entry: &RangeEntry) -> Mask {
    values.iter().map(|&v| entry.contains(v)).collect()
}

/// Rows in the range or its mirror about zero.
pub fn mirrored_mask(values: &[f64], entry: &RangeEntry) -> Mask {
    values.iter().map(|&v| entry.contains_mirrored(v)).collect()
}

/// Element-wise AND.
pub fn and(a: &[bool], b: &[bool]) -> Mask {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(&x, &y)| x && y).collect()
}

/// Element-wise OR.
pub fn or(a: &[bool], b: &[bool]) -> Mask {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(&x, &y)| x || y).collect()
}

/// OR over any number of masks of length `len` (all-false when empty).
pub fn any_of<'a>(len: usize, masks: impl IntoIterator<Item = &'a Mask>) -> Mask {
    masks.into_iter().fold(vec![false; len], |acc, m| or(&acc, m))
}

/// Values where `mask` is set.
pub fn select(values: &[f64], mask: &[bool]) -> Vec<f64> {
    values.iter().zip(mask).filter_map(|(&v, &m)| m.then_some(v)).collect()
}

/// Number of set rows.
pub fn count(mask: &[bool]) -> usize {
    mask.iter().filter(|&&m| m).count()
}

/// `(disk, ring)` of a single point, if it lies inside both.
pub fn classify(geometry: &Geometry, x: f64, y: f64, z: f64) -> Option<(u32, u32)> {
    let disk = geometry.disks.find_mirrored(z)?;
    let ring = geometry.rings.find(x.hypot(y))?;
    Some((disk, ring))
}

/// Disk, ring and (optionally) sub-disk masks for one cluster table.
#[derive(Debug, Clone)]
pub struct Classification {
    len: usize,
    disks: BTreeMap<u32, Mask>,
    rings: BTreeMap<u32, Mask>,
    sub_disks: BTreeMap<(u32, u32), Mask>,
}

impl Classification {
    /// Evaluate disk and ring masks. With `inner_disks`, the sub-disk table is validated and
    /// evaluated too; an invalid table is a [`tepx_core::Error::GeometryConfig`].
    pub fn compute(table: &ClusterTable, geometry: &Geometry, inner_disks: bool) -> Result<Self> {
        geometry.validate()?;
        let disks = geometry
            .disks
            .entries()
            .iter()
            .map(|e| (e.index, mirrored_mask(&table.z, e)))
            .collect();
        let rings =
            geometry.rings.entries().iter().map(|e| (e.index, range_mask(&table.r, e))).collect();

        let mut sub_disks = BTreeMap::new();
        if inner_disks {
            geometry.validate_sub_disks()?;
            for sub in &geometry.sub_disks {
                for e in sub.ranges.entries() {
                    sub_disks.insert((sub.disk, e.index), mirrored_mask(&table.z, e));
                }
            }
        }

        let c = Self { len: table.len(), disks, rings, sub_disks };
        tracing::debug!(
            rows = c.len,
            in_disks = count(&c.any_disk()),
            in_rings = count(&c.any_ring()),
            "classified clusters"
        );
        Ok(c)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` for an empty table.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Mask of disk `d` (all-false for an unknown disk).
    pub fn disk(&self, d: u32) -> Mask {
        self.disks.get(&d).cloned().unwrap_or_else(|| vec![false; self.len])
    }

    /// Mask of ring `r` (all-false for an unknown ring).
    pub fn ring(&self, r: u32) -> Mask {
        self.rings.get(&r).cloned().unwrap_or_else(|| vec![false; self.len])
    }

    /// Mask of sub-range `s` of disk `d` (all-false when not evaluated).
    pub fn sub_disk(&self, d: u32, s: u32) -> Mask {
        self.sub_disks.get(&(d, s)).cloned().unwrap_or_else(|| vec![false; self.len])
    }

    /// `disk ∧ ring`.
    pub fn disk_ring(&self, d: u32, r: u32) -> Mask {
        and(&self.disk(d), &self.ring(r))
    }

    /// Rows in any ring.
    pub fn any_ring(&self) -> Mask {
        any_of(self.len, self.rings.values())
    }

    /// Rows in any disk.
    pub fn any_disk(&self) -> Mask {
        any_of(self.len, self.disks.values())
    }

    /// `disk ∧ (ring_1 ∨ … ∨ ring_n)`.
    pub fn disk_any_ring(&self, d: u32) -> Mask {
        and(&self.disk(d), &self.any_ring())
    }

    /// Evaluated sub-disk keys `(disk, sub)`.
    pub fn sub_disk_keys(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.sub_disks.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tepx_core::{Error, RangeTable, SubDiskRanges};

    #[test]
    fn single_point_classification() {
        let g = Geometry::tepx();
        assert_eq!(classify(&g, 7.0, 0.0, 175.0), Some((1, 1)));
        assert_eq!(classify(&g, 0.0, -23.0, -265.0), Some((4, 5)));
        assert_eq!(classify(&g, 10.0, 0.0, 175.0), None);
        assert_eq!(classify(&g, 7.0, 0.0, 190.0), None);
    }

    #[test]
    fn masks_and_combinators() {
        let g = Geometry::tepx();
        let t = ClusterTable::from_positions(
            vec![7.0, 11.5, 7.0, 6.5],
            vec![0.0, 0.0, 0.0, 0.0],
            vec![175.0, -175.0, 201.0, 175.0],
        )
        .unwrap();
        let c = Classification::compute(&t, &g, false).unwrap();
        assert_eq!(c.disk(1), vec![true, true, false, true]);
        assert_eq!(c.ring(1), vec![true, false, true, false]);
        assert_eq!(c.disk_ring(1, 1), vec![true, false, false, false]);
        assert_eq!(c.disk_any_ring(1), vec![true, true, false, false]);
        assert_eq!(select(&t.r, &c.disk_ring(1, 1)), vec![7.0]);
        assert_eq!(count(&c.disk(9)), 0);
    }

    #[test]
    fn shipped_inner_table_is_rejected() {
        let t = ClusterTable::from_positions(vec![7.0], vec![0.0], vec![175.2]).unwrap();
        let err = Classification::compute(&t, &Geometry::tepx(), true).unwrap_err();
        assert!(matches!(err, Error::GeometryConfig(_)));
    }

    #[test]
    fn sub_disks_are_mirrored() {
        let mut g = Geometry::tepx();
        g.sub_disks = vec![SubDiskRanges {
            disk: 1,
            ranges: RangeTable::from_pairs(&[(174.0, 175.0), (175.0, 176.0)]),
        }];
        let t = ClusterTable::from_positions(
            vec![7.0; 4],
            vec![0.0; 4],
            vec![174.5, -174.5, -175.5, 175.0],
        )
        .unwrap();
        let c = Classification::compute(&t, &g, true).unwrap();
        assert_eq!(c.sub_disk(1, 1), vec![true, true, false, false]);
        assert_eq!(c.sub_disk(1, 2), vec![false, false, true, false]);
        assert_eq!(c.sub_disk_keys().count(), 2);
    }
}
