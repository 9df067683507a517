//! TEPX linearity / statistical-error CLI

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tepx_analysis::RunContext;
use tepx_core::Observable;

#[derive(Parser)]
#[command(name = "tepx")]
#[command(about = "TEPX endcap linearity and statistical-error analysis")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,

    /// Analysis configuration (YAML, or JSON by extension). Defaults are used otherwise.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Renderer style overrides (YAML).
    #[arg(long)]
    style: Option<PathBuf>,

    /// Directory receiving images and the results file.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Summary file, or directory of summary files.
    path: Option<PathBuf>,

    /// Observable: Clusters, Hits, 2x or 3x.
    observable: Option<String>,
}

fn usage(default_dir: &std::path::Path) -> String {
    format!(
        "usage: tepx [--config FILE] [--out-dir DIR] PATH {{{}}}\n\
         falling back to {} and Clusters",
        Observable::CHOICES.join(","),
        default_dir.display()
    )
}

/// Positional arguments, or the configured defaults when either is missing or invalid.
fn resolve_inputs(cli: &Cli, default_dir: &std::path::Path) -> (PathBuf, Observable) {
    if let (Some(path), Some(obs)) = (&cli.path, &cli.observable) {
        match obs.parse::<Observable>() {
            Ok(o) => return (path.clone(), o),
            Err(e) => tracing::warn!(error = %e, "invalid observable"),
        }
    }
    eprintln!("{}", usage(default_dir));
    (default_dir.to_path_buf(), Observable::Clusters)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tepx_cli::init_logging(cli.log_level);

    let cfg = tepx_cli::load_config(cli.config.as_deref())?;
    let (input, observable) = resolve_inputs(&cli, &cfg.input_dir);
    let out_dir = tepx_cli::prepare_out_dir(cli.out_dir.clone(), &cfg)?;
    let viz = tepx_cli::viz_config(&cfg.report, cli.style.as_deref())?;

    let files = tepx_io::find_summary_files(&input, &cfg.summary)
        .with_context(|| format!("scanning {}", input.display()))?;
    tracing::info!(
        observable = %observable.as_arg(),
        files = files.len(),
        input = %input.display(),
        "starting run"
    );
    if files.is_empty() {
        tracing::warn!(pattern = %cfg.summary.pattern(), "no summary files found");
    }

    let mut ctx = RunContext::new(&cfg, observable);
    for path in &files {
        ctx.process_path(path);
    }
    let outcome = ctx.finish();

    let results_path = outcome
        .to_results()?
        .write(&out_dir, &observable.results_file_stem())
        .context("writing results file")?;

    let artifacts = tepx_viz::run_artifacts(&outcome, cfg.linearity.confidence_level);
    let images = tepx_cli::render_all(&artifacts, &out_dir, &viz);

    let summary = serde_json::json!({
        "observable": observable.as_arg(),
        "pileups": outcome.pileups,
        "results": results_path,
        "images": images.len(),
        "skipped": outcome.skipped,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
