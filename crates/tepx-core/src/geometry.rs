//! Endcap geometry tables.
//!
//! A [`RangeTable`] is an ordered list of `{index, low, high}` records. Membership is
//! always tested on the **open** interval `(low, high)`: a value sitting exactly on a
//! boundary belongs to neither neighbour. Disk tables describe the `+z` side only; the
//! `-z` mirror `(-high, -low)` is implied.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One `{index, low, high}` record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeEntry {
    /// 1-based disk/ring/sub-disk index.
    pub index: u32,
    /// Lower (exclusive) bound.
    pub low: f64,
    /// Upper (exclusive) bound.
    pub high: f64,
}

impl RangeEntry {
    /// Construct an entry.
    pub const fn new(index: u32, low: f64, high: f64) -> Self {
        Self { index, low, high }
    }

    /// Open-interval membership `low < value < high`.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value > self.low && value < self.high
    }

    /// Membership in the interval or its mirror `(-high, -low)`.
    #[inline]
    pub fn contains_mirrored(&self, value: f64) -> bool {
        self.contains(value) || (value < -self.low && value > -self.high)
    }
}

/// Ordered list of ranges along one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RangeTable {
    entries: Vec<RangeEntry>,
}

impl RangeTable {
    /// Build a table without validation (call [`RangeTable::validate`] before use).
    pub fn new(entries: Vec<RangeEntry>) -> Self {
        Self { entries }
    }

    /// Build a table from `(low, high)` pairs, indexed `1..=n`.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        let entries = pairs
            .iter()
            .enumerate()
            .map(|(i, &(low, high))| RangeEntry::new(i as u32 + 1, low, high))
            .collect();
        Self { entries }
    }

    /// All entries in index order.
    pub fn entries(&self) -> &[RangeEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Indices in table order.
    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().map(|e| e.index)
    }

    /// Entry with the given index.
    pub fn get(&self, index: u32) -> Option<&RangeEntry> {
        self.entries.iter().find(|e| e.index == index)
    }

    /// Index of the entry whose open interval contains `value`.
    pub fn find(&self, value: f64) -> Option<u32> {
        self.entries.iter().find(|e| e.contains(value)).map(|e| e.index)
    }

    /// Index of the entry whose interval or mirror contains `value`.
    pub fn find_mirrored(&self, value: f64) -> Option<u32> {
        self.entries.iter().find(|e| e.contains_mirrored(value)).map(|e| e.index)
    }

    /// Check that every range is finite with `low < high`, that indices strictly increase and
    /// that consecutive ranges do not overlap. Touching ranges are accepted since membership
    /// uses open intervals.
    pub fn validate(&self, what: &str) -> Result<()> {
        if self.entries.is_empty() {
            return Err(Error::GeometryConfig(format!("{what}: table is empty")));
        }
        for e in &self.entries {
            if !e.low.is_finite() || !e.high.is_finite() {
                return Err(Error::GeometryConfig(format!(
                    "{what} {}: bounds must be finite, got [{}, {}]",
                    e.index, e.low, e.high
                )));
            }
            if e.low >= e.high {
                return Err(Error::GeometryConfig(format!(
                    "{what} {}: low must be < high, got [{}, {}]",
                    e.index, e.low, e.high
                )));
            }
        }
        for pair in self.entries.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if b.index <= a.index {
                return Err(Error::GeometryConfig(format!(
                    "{what}: indices must strictly increase, got {} after {}",
                    b.index, a.index
                )));
            }
            if b.low < a.high {
                return Err(Error::GeometryConfig(format!(
                    "{what} {} [{}, {}] overlaps or precedes {what} {} [{}, {}]",
                    b.index, b.low, b.high, a.index, a.low, a.high
                )));
            }
        }
        Ok(())
    }

    /// [`RangeTable::validate`] plus `low >= 0`, required for mirrored and radial tables.
    pub fn validate_non_negative(&self, what: &str) -> Result<()> {
        self.validate(what)?;
        if let Some(e) = self.entries.iter().find(|e| e.low < 0.0) {
            return Err(Error::GeometryConfig(format!(
                "{what} {}: low must be >= 0, got {}",
                e.index, e.low
            )));
        }
        Ok(())
    }
}

/// Sub-disk z ranges for one disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubDiskRanges {
    /// Parent disk index.
    pub disk: u32,
    /// Ordered sub-ranges inside the disk.
    pub ranges: RangeTable,
}

/// Full endcap geometry: disks along `|z|`, rings along `r`, optional sub-disk refinement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    /// Disk z ranges (+z side, cm).
    pub disks: RangeTable,
    /// Ring radial ranges (cm).
    pub rings: RangeTable,
    /// Per-disk sub-ranges in z (cm).
    pub sub_disks: Vec<SubDiskRanges>,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::tepx()
    }
}

impl Geometry {
    /// TEPX endcap: 4 disks, 5 rings.
    ///
    /// The sub-disk table is shipped as recorded for the simulation campaign. Disk 3
    /// sub-range 3 is inverted (`[231.7, 231.2]`) and disk 2 sub-range 4 lies outside
    /// disk 2; [`Geometry::validate_sub_disks`] rejects this table until it is corrected.
    pub fn tepx() -> Self {
        Self {
            disks: RangeTable::from_pairs(&[
                (174.0, 176.0),
                (200.0, 202.0),
                (230.0, 232.0),
                (264.0, 266.0),
            ]),
            rings: RangeTable::from_pairs(&[
                (6.5, 9.7),
                (10.9, 13.7),
                (14.5, 17.3),
                (18.4, 20.9),
                (21.9, 25.3),
            ]),
            sub_disks: vec![
                SubDiskRanges {
                    disk: 1,
                    ranges: RangeTable::from_pairs(&[
                        (174.0, 174.5),
                        (174.5, 175.0),
                        (175.0, 175.5),
                        (175.5, 176.0),
                    ]),
                },
                SubDiskRanges {
                    disk: 2,
                    ranges: RangeTable::from_pairs(&[
                        (200.0, 200.5),
                        (200.5, 201.0),
                        (201.0, 201.5),
                        (202.5, 203.0),
                    ]),
                },
                SubDiskRanges {
                    disk: 3,
                    ranges: RangeTable::from_pairs(&[
                        (230.0, 230.5),
                        (230.5, 230.7),
                        (231.7, 231.2),
                        (231.2, 231.6),
                    ]),
                },
                SubDiskRanges {
                    disk: 4,
                    ranges: RangeTable::from_pairs(&[
                        (264.0, 264.5),
                        (264.5, 265.0),
                        (265.0, 265.5),
                        (265.5, 266.0),
                    ]),
                },
            ],
        }
    }

    /// Validate disk and ring tables. Sub-disk tables are checked separately by
    /// [`Geometry::validate_sub_disks`] because they are only needed for inner-disk studies.
    pub fn validate(&self) -> Result<()> {
        self.disks.validate_non_negative("disk")?;
        self.rings.validate_non_negative("ring")?;
        Ok(())
    }

    /// Validate every sub-disk table and its parent reference.
    pub fn validate_sub_disks(&self) -> Result<()> {
        for sub in &self.sub_disks {
            let Some(parent) = self.disks.get(sub.disk) else {
                return Err(Error::GeometryConfig(format!(
                    "sub-disk table refers to unknown disk {}",
                    sub.disk
                )));
            };
            sub.ranges.validate_non_negative(&format!("disk {} sub-range", sub.disk))?;
            for e in sub.ranges.entries() {
                if e.low < parent.low || e.high > parent.high {
                    tracing::warn!(
                        disk = sub.disk,
                        sub = e.index,
                        low = e.low,
                        high = e.high,
                        "sub-range extends outside its disk"
                    );
                }
            }
        }
        Ok(())
    }

    /// Sub-ranges of `disk`, if configured.
    pub fn sub_disks_of(&self, disk: u32) -> Option<&RangeTable> {
        self.sub_disks.iter().find(|s| s.disk == disk).map(|s| &s.ranges)
    }

    /// Number of disks.
    pub fn n_disks(&self) -> usize {
        self.disks.len()
    }

    /// Number of rings.
    pub fn n_rings(&self) -> usize {
        self.rings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tepx_tables_are_valid() {
        Geometry::tepx().validate().unwrap();
    }

    #[test]
    fn boundaries_are_exclusive() {
        let g = Geometry::tepx();
        for e in g.rings.entries() {
            assert_eq!(g.rings.find(e.low), None);
            assert_eq!(g.rings.find(e.high), None);
        }
        for e in g.disks.entries() {
            assert_eq!(g.disks.find_mirrored(e.low), None);
            assert_eq!(g.disks.find_mirrored(-e.high), None);
        }
    }

    #[test]
    fn mirror_symmetry() {
        let g = Geometry::tepx();
        let mut z = 150.0;
        while z < 280.0 {
            assert_eq!(g.disks.find_mirrored(z), g.disks.find_mirrored(-z), "z = {z}");
            z += 0.125;
        }
    }

    #[test]
    fn reference_points() {
        let g = Geometry::tepx();
        let rings: Vec<_> =
            [7.0, 11.5, 15.0, 19.0, 23.0].iter().map(|&r| g.rings.find(r)).collect();
        assert_eq!(rings, vec![Some(1), Some(2), Some(3), Some(4), Some(5)]);
        let disks: Vec<_> =
            [175.0, 201.0, 231.0, 265.0].iter().map(|&z| g.disks.find_mirrored(z)).collect();
        assert_eq!(disks, vec![Some(1), Some(2), Some(3), Some(4)]);
        assert_eq!(g.rings.find(10.0), None);
    }

    #[test]
    fn overlapping_table_rejected() {
        let t = RangeTable::from_pairs(&[(1.0, 3.0), (2.5, 4.0)]);
        let err = t.validate("ring").unwrap_err();
        assert!(err.to_string().contains("overlaps"));
    }

    #[test]
    fn touching_ranges_accepted() {
        RangeTable::from_pairs(&[(1.0, 2.0), (2.0, 3.0)]).validate("ring").unwrap();
    }

    #[test]
    fn misordered_indices_rejected() {
        let t = RangeTable::new(vec![RangeEntry::new(2, 1.0, 2.0), RangeEntry::new(1, 3.0, 4.0)]);
        assert!(matches!(t.validate("disk"), Err(Error::GeometryConfig(_))));
    }

    #[test]
    fn negative_disk_range_rejected() {
        let t = RangeTable::from_pairs(&[(-1.0, 2.0)]);
        assert!(t.validate_non_negative("disk").is_err());
    }

    #[test]
    fn shipped_sub_disk_table_is_flagged() {
        let err = Geometry::tepx().validate_sub_disks().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("disk 3 sub-range 3"), "{msg}");
        assert!(msg.contains("231.7"), "{msg}");
    }

    #[test]
    fn rings_are_disjoint() {
        let g = Geometry::tepx();
        let mut r = 0.0;
        while r < 30.0 {
            let hits = g.rings.entries().iter().filter(|e| e.contains(r)).count();
            assert!(hits <= 1, "r = {r} in {hits} rings");
            r += 0.05;
        }
    }
}
