//! Recharge Coupler - Entry Point
//!
//! Propagates column simulator output of one project into the recharge
//! package of its groundwater model.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use recharge_coupler::core::error::Result;
use recharge_coupler::core::{CouplerConfig, OverlapPolicy, ProjectId};
use recharge_coupler::coupling::{
    compute_recharge, load_project_model, propagate_recharge, PropagateOptions,
};
use recharge_coupler::project::{FsProjectStore, ProjectStore};

/// Write averaged column recharge into a project's groundwater model
#[derive(Parser, Debug)]
#[command(name = "recharge-coupler")]
#[command(about = "Propagate column simulator recharge into groundwater stress periods")]
struct Args {
    /// Project identifier (directory name inside the workspace)
    project_id: String,

    /// Workspace root; overrides the config file
    #[arg(long)]
    workspace: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fail when shapes mapped to different sources overlap
    #[arg(long)]
    reject_overlaps: bool,

    /// Compute and report recharge without writing the package
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => CouplerConfig::load(path)?,
        None => CouplerConfig::default(),
    };
    if let Some(workspace) = args.workspace {
        config.workspace = workspace;
    }
    if args.reject_overlaps {
        config.overlap = OverlapPolicy::Reject;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store = FsProjectStore::new(&config.workspace, config.hydrus.output_file.clone());
    let project = ProjectId::new(args.project_id);
    let options = PropagateOptions::from(&config);

    tracing::info!(
        "Propagating recharge for project {} in {}",
        project,
        store.workspace().display()
    );

    if args.dry_run {
        let metadata = store.read_metadata(&project)?;
        let model = load_project_model(&store, &project, &metadata)?;
        let recharge = compute_recharge(&store, &project, &metadata, &model, &options)?;

        println!("Stress period summary (dry run, nothing written)");
        for (period, grid) in model.stress_periods().iter().zip(&recharge) {
            let values = grid.values();
            let mean = values.iter().sum::<f64>() / values.len().max(1) as f64;
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            println!(
                "  period {:>4}  {:>7} days  mean {:>12.6e}  min {:>12.6e}  max {:>12.6e}",
                period.index + 1,
                period.duration_days(),
                mean,
                min,
                max
            );
        }
        return Ok(());
    }

    propagate_recharge(&store, &project, &options)?;
    tracing::info!("Recharge propagated for project {}", project);
    Ok(())
}
