//! Cluster-level geometry study: radial distributions per bucket and z–r density maps.

use serde::{Deserialize, Serialize};

use tepx_core::config::ClusterStudyConfig;
use tepx_core::{Error, Geometry, Result};
use tepx_io::{Axis, ClusterTable, Histogram1D, Histogram2D};

use crate::classify::{Classification, count, select};
use crate::filler::{auto_axis, fill_1d, fill_2d};

/// Radial distribution of one (disk, ring) bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingDistribution {
    /// Disk index.
    pub disk: u32,
    /// Ring index.
    pub ring: u32,
    /// Clusters as a function of r.
    pub histogram: Histogram1D,
}

/// Radial distribution of one disk (all rings).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskDistribution {
    /// Disk index.
    pub disk: u32,
    /// Clusters as a function of r.
    pub histogram: Histogram1D,
}

/// Cluster count per sub-disk range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubDiskCount {
    /// Disk index.
    pub disk: u32,
    /// Sub-range index.
    pub sub: u32,
    /// Clusters inside the sub-range (both sides).
    pub clusters: usize,
}

/// All study products for one pileup scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterStudy {
    /// Pileup label.
    pub pileup: String,
    /// Number of clusters read.
    pub n_clusters: usize,
    /// Disk-major radial distributions.
    pub per_ring: Vec<RingDistribution>,
    /// Per-disk radial distributions.
    pub per_disk: Vec<DiskDistribution>,
    /// z–r density over the full z range.
    pub zr_all: Histogram2D,
    /// z–r density on the +z side.
    pub zr_positive: Histogram2D,
    /// z–r density of a single disk.
    pub zr_disk: Histogram2D,
    /// Disk shown in `zr_disk`.
    pub disk_view: u32,
    /// Sub-disk counts (inner-disk study only).
    pub sub_disks: Vec<SubDiskCount>,
}

fn axis(range: [f64; 2], bins: usize) -> Result<Axis> {
    Axis::new(bins, range[0], range[1])
}

/// Build every distribution of the study for one cluster table.
pub fn run_cluster_study(
    pileup: &str,
    table: &ClusterTable,
    geometry: &Geometry,
    cfg: &ClusterStudyConfig,
) -> Result<ClusterStudy> {
    let classes = Classification::compute(table, geometry, cfg.inner_disks)?;

    let mut per_ring = Vec::new();
    for disk in geometry.disks.indices() {
        for ring in geometry.rings.indices() {
            let mask = classes.disk_ring(disk, ring);
            let values = select(&table.r, &mask);
            let axis = auto_axis(&values, cfg.radial_bins)?;
            let histogram = fill_1d(&format!("Disk {disk} Ring {ring}"), &values, None, axis)?;
            per_ring.push(RingDistribution { disk, ring, histogram });
        }
    }

    let mut per_disk = Vec::new();
    for disk in geometry.disks.indices() {
        let mask = classes.disk_any_ring(disk);
        let values = select(&table.r, &mask);
        let axis = auto_axis(&values, cfg.radial_bins)?;
        let histogram = fill_1d(&format!("Disk {disk}"), &values, None, axis)?;
        per_disk.push(DiskDistribution { disk, histogram });
    }

    let r_axis = axis(cfg.r_range, cfg.density_bins)?;
    let z_axis = axis(cfg.z_range, cfg.density_bins)?;
    let zr_all = fill_2d("ZvsR", &table.z, &table.r, None, z_axis, r_axis)?;
    let zr_positive = fill_2d(
        "ZvsR_Pos",
        &table.z,
        &table.r,
        None,
        axis(cfg.z_range_positive, cfg.density_bins)?,
        r_axis,
    )?;

    let view = geometry.disks.get(cfg.disk_view).ok_or_else(|| {
        Error::Validation(format!("disk {} is not configured", cfg.disk_view))
    })?;
    let zr_disk = fill_2d(
        &format!("ZvsR_D{}", cfg.disk_view),
        &table.z,
        &table.r,
        Some(&classes.disk(cfg.disk_view)),
        Axis::new(cfg.disk_view_bins, view.low, view.high)?,
        axis(cfg.r_range, cfg.disk_view_bins)?,
    )?;

    let sub_disks = classes
        .sub_disk_keys()
        .map(|(disk, sub)| {
            let clusters = count(&classes.sub_disk(disk, sub));
            SubDiskCount { disk, sub, clusters }
        })
        .collect();

    tracing::info!(
        pileup,
        clusters = table.len(),
        in_rings = count(&classes.any_ring()),
        "cluster study complete"
    );
    Ok(ClusterStudy {
        pileup: pileup.to_string(),
        n_clusters: table.len(),
        per_ring,
        per_disk,
        zr_all,
        zr_positive,
        zr_disk,
        disk_view: cfg.disk_view,
        sub_disks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ClusterTable {
        ClusterTable::from_positions(
            vec![7.0, 11.5, 15.0, 19.0, 23.0, 7.0, 9.0],
            vec![0.0; 7],
            vec![175.0, 201.0, 231.0, 265.0, -265.0, 190.0, 265.5],
        )
        .unwrap()
    }

    #[test]
    fn buckets_and_maps() {
        let cfg = ClusterStudyConfig::default();
        let s = run_cluster_study("100", &table(), &Geometry::tepx(), &cfg).unwrap();
        assert_eq!(s.per_ring.len(), 20);
        assert_eq!(s.per_disk.len(), 4);
        let d4r5 = s.per_ring.iter().find(|d| d.disk == 4 && d.ring == 5).unwrap();
        assert_eq!(d4r5.histogram.integral(), 1.0);
        let d4 = s.per_disk.iter().find(|d| d.disk == 4).unwrap();
        assert_eq!(d4.histogram.integral(), 3.0);
        // z = 190 is between disks: in the global map, not in any bucket.
        assert_eq!(s.zr_all.contents.iter().flatten().sum::<f64>(), 7.0);
        // The single-disk map spans the +z range only.
        assert_eq!(s.zr_disk.contents.iter().flatten().sum::<f64>(), 2.0);
        assert!(s.sub_disks.is_empty());
    }

    #[test]
    fn inner_study_needs_valid_sub_table() {
        let cfg = ClusterStudyConfig { inner_disks: true, ..Default::default() };
        assert!(matches!(
            run_cluster_study("100", &table(), &Geometry::tepx(), &cfg),
            Err(Error::GeometryConfig(_))
        ));
    }
}
