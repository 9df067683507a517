//! Cluster geometry study: radial distributions and z-r density maps per pileup.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tepx_io::{ResultsFile, cluster_file_path, read_cluster_parquet};

#[derive(Parser)]
#[command(name = "cluster_study")]
#[command(about = "Radial and z-r cluster distributions of the TEPX endcap")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,

    /// Analysis configuration (YAML, or JSON by extension).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Renderer style overrides (YAML).
    #[arg(long)]
    style: Option<PathBuf>,

    /// Directory receiving images and the counts file.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Directory holding `<kind>_<pileup>.parquet` cluster tables.
    path: PathBuf,

    /// Pileup scenario (repeatable). Defaults to the configured list.
    #[arg(long = "pileup")]
    pileups: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tepx_cli::init_logging(cli.log_level);

    let cfg = tepx_cli::load_config(cli.config.as_deref())?;
    let out_dir = tepx_cli::prepare_out_dir(cli.out_dir.clone(), &cfg)?;
    let viz = tepx_cli::viz_config(&cfg.report, cli.style.as_deref())?;
    let study_cfg = &cfg.clusters;
    let pileups =
        if cli.pileups.is_empty() { study_cfg.pileups.clone() } else { cli.pileups.clone() };

    let mut counts = ResultsFile::new("ClusterStudy");
    let mut skipped = Vec::new();
    let mut images = 0usize;
    for pu in &pileups {
        let path = cluster_file_path(&cli.path, &study_cfg.object_kind, pu);
        let table = match read_cluster_parquet(&path, &study_cfg.column_prefix) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "skipping pileup");
                skipped.push(serde_json::json!({ "path": path, "reason": e.to_string() }));
                continue;
            }
        };
        tracing::info!(pileup = %pu, clusters = table.len(), "cluster table loaded");

        let study = match tepx_analysis::run_cluster_study(pu, &table, &cfg.geometry, study_cfg) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(pileup = %pu, error = %e, "cluster study failed");
                skipped.push(serde_json::json!({ "path": path, "reason": e.to_string() }));
                continue;
            }
        };
        counts.insert(format!("Clusters_PU{pu}"), &study.n_clusters)?;
        if !study.sub_disks.is_empty() {
            counts.insert(format!("SubDisks_PU{pu}"), &study.sub_disks)?;
        }

        let artifacts = tepx_viz::cluster_study_artifacts(&study);
        images += tepx_cli::render_all(&artifacts, &out_dir, &viz).len();
    }

    let counts_path = counts.write(&out_dir, "Results_ClusterStudy")?;
    let summary = serde_json::json!({
        "pileups": pileups,
        "results": counts_path,
        "images": images,
        "skipped": skipped,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
