use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use geneva_compare::{pipeline, Config, ReferenceSource};

#[derive(Parser, Debug)]
#[command(name = "geneva-compare")]
#[command(about = "Compare Geneva 10 simulation output with the 1959 ANL-5977 reference", long_about = None)]
struct Cli {
    /// JSON config file; flags below override it
    #[arg(short, long, value_name = "JSON")]
    config: Option<PathBuf>,

    /// Simulation time series CSV
    #[arg(short, long, value_name = "CSV")]
    simulation: Option<PathBuf>,

    /// Directory holding output_spatial_t{t}.csv snapshots
    #[arg(long, value_name = "DIR")]
    spatial_dir: Option<PathBuf>,

    /// Output directory for the table, report and figures
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Read the reference table from this CSV instead of the embedded copy
    #[arg(long, value_name = "CSV")]
    reference_csv: Option<PathBuf>,

    /// Skip SVG figures
    #[arg(long, action = ArgAction::SetTrue)]
    no_plots: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only warnings and errors
    #[arg(short, long, action = ArgAction::SetTrue, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            _ => "trace",
        }
    }

    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => Config::default(),
        };
        if let Some(path) = self.simulation {
            config.simulation_csv = path;
        }
        if let Some(dir) = self.spatial_dir {
            config.spatial_dir = dir;
        }
        if let Some(dir) = self.output {
            config.output_dir = dir;
        }
        if let Some(path) = self.reference_csv {
            config.reference = ReferenceSource::Csv { path };
        }
        if self.no_plots {
            config.plots = false;
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    let result = cli.into_config().and_then(|config| pipeline::run(&config));
    match result {
        Ok(summary) => {
            log::info!(
                "{} of {} simulation samples compared, {} spatial snapshots, {} files written",
                summary.filter.kept,
                summary.filter.loaded,
                summary.snapshots,
                summary.artifacts.len()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
