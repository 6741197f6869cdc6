use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;

use crate::analysis::derive::{compare_profiles, ProfileComparison};
use crate::config::Config;
use crate::data::filter::{clamp_for_display, filter_valid, FilterOutcome};
use crate::data::loader::{load_spatial_series, load_time_series};
use crate::data::model::{
    time_label, Field, Schema, SpatialProfile, TimeSeries, ValidityBounds, BASELINE_TIME,
};
use crate::data::reference::provider_for;
use crate::error::CompareError;
use crate::report::plot::{comparison_panels, curve_grid, panel_grid, single_panel, spatial_panels};
use crate::report::table::{build_rows, render, ComparisonRow};
use crate::report::writer::ArtifactWriter;

pub const TABLE_FILE: &str = "geneva10_comparison_table.txt";
pub const JSON_FILE: &str = "geneva10_comparison.json";
pub const COMBINED_FIGURE: &str = "geneva10_combined_comparison.svg";
pub const SPATIAL_FIGURE: &str = "geneva10_spatial_profiles.svg";
const SINGLE_FIGURES: [&str; 4] = [
    "geneva10_QP_comparison.svg",
    "geneva10_power_comparison.svg",
    "geneva10_alpha_comparison.svg",
    "geneva10_W_comparison.svg",
];

// ---------------------------------------------------------------------------
// Comparison state
// ---------------------------------------------------------------------------

/// Baseline snapshot plus the derived quantities for every later one.
#[derive(Debug, Clone)]
pub struct SpatialComparison {
    pub baseline: SpatialProfile,
    /// Baseline first, then the later snapshots in configured order.
    pub snapshots: Vec<SpatialProfile>,
    pub changes: Vec<ProfileComparison>,
}

/// Everything computed for one run, independent of rendering.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub reference_origin: String,
    pub reference: TimeSeries,
    /// Simulation sample count before filtering.
    pub loaded: usize,
    pub filtered: FilterOutcome,
    /// Clamped W of `filtered.series`, for figures only.
    pub display_w: Vec<f64>,
    pub rows: Vec<ComparisonRow>,
    pub spatial: Option<SpatialComparison>,
}

/// A rendered output waiting to be written.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub name: String,
    pub contents: Vec<u8>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FilterSummary {
    pub loaded: usize,
    pub kept: usize,
    pub dropped: usize,
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    reference: &'a str,
    simulation: FilterSummary,
    bounds: &'a ValidityBounds,
    rows: &'a [ComparisonRow],
    spatial: Option<&'a [ProfileComparison]>,
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub filter: FilterSummary,
    pub snapshots: usize,
    pub artifacts: Vec<PathBuf>,
}

impl Comparison {
    /// Load both series, filter the simulation, align and derive.
    pub fn prepare(config: &Config) -> Result<Self> {
        let provider = provider_for(&config.reference);
        let reference_origin = provider.describe();
        let reference = provider
            .load()
            .with_context(|| format!("loading {reference_origin}"))?;

        let simulation = load_time_series(&config.simulation_csv, &Schema::SIMULATION)
            .with_context(|| {
                format!("loading simulation data {}", config.simulation_csv.display())
            })?;
        info!("Loaded simulation data: {} time points", simulation.len());
        if !simulation.is_sorted_by_time() {
            warn!("simulation times are not non-decreasing; nearest-time lookup still scans every sample");
        }

        let loaded = simulation.len();
        let filtered = filter_valid(&simulation, &config.bounds).context("filtering simulation data")?;
        if filtered.series.is_empty() {
            return Err(anyhow::Error::new(CompareError::empty("filtered simulation series"))
                .context(format!(
                    "no comparable data: all {loaded} simulation samples failed the validity bounds"
                )));
        }

        let display_w = clamp_for_display(
            &filtered.series.column(Field::W),
            0.0,
            config.w_display_max,
        );
        let rows = build_rows(&reference, &filtered.series, &config.query_times)
            .context("building comparison table")?;
        let spatial = prepare_spatial(config)?;

        Ok(Comparison {
            reference_origin,
            reference,
            loaded,
            filtered,
            display_w,
            rows,
            spatial,
        })
    }

    pub fn filter_summary(&self) -> FilterSummary {
        FilterSummary {
            loaded: self.loaded,
            kept: self.filtered.kept,
            dropped: self.filtered.dropped,
        }
    }

    /// Render every output in memory. Nothing touches disk here.
    pub fn artifacts(&self, config: &Config) -> Result<Vec<Artifact>> {
        let mut out = vec![Artifact {
            name: TABLE_FILE.to_string(),
            contents: render(&self.rows).into_bytes(),
        }];

        let document = ReportDocument {
            reference: &self.reference_origin,
            simulation: self.filter_summary(),
            bounds: &config.bounds,
            rows: &self.rows,
            spatial: self.spatial.as_ref().map(|s| s.changes.as_slice()),
        };
        out.push(Artifact {
            name: JSON_FILE.to_string(),
            contents: serde_json::to_vec_pretty(&document).context("serializing JSON report")?,
        });

        if !config.plots {
            return Ok(out);
        }

        let panels = comparison_panels(
            &self.reference,
            &self.filtered.series,
            &self.display_w,
            config,
        );
        out.push(Artifact {
            name: COMBINED_FIGURE.to_string(),
            contents: panel_grid(&panels).context("rendering combined figure")?.into_bytes(),
        });
        for (name, panel) in SINGLE_FIGURES.iter().zip(&panels) {
            out.push(Artifact {
                name: name.to_string(),
                contents: single_panel(panel)
                    .with_context(|| format!("rendering {name}"))?
                    .into_bytes(),
            });
        }

        if let Some(spatial) = &self.spatial {
            let panels = spatial_panels(&spatial.baseline, &spatial.snapshots, &spatial.changes);
            out.push(Artifact {
                name: SPATIAL_FIGURE.to_string(),
                contents: curve_grid(&panels).context("rendering spatial figure")?.into_bytes(),
            });
        }
        Ok(out)
    }
}

/// Load the configured snapshots and compare each later one against the
/// `t = 0` baseline.
///
/// No baseline, or no snapshot after it, skips the spatial comparison.
/// Snapshots at negative times are ignored.
fn prepare_spatial(config: &Config) -> Result<Option<SpatialComparison>> {
    if !config.has_baseline() {
        warn!(
            "profile_times has no t={} baseline; skipping spatial comparison",
            time_label(BASELINE_TIME)
        );
        return Ok(None);
    }
    let loaded = load_spatial_series(
        &config.spatial_dir,
        &config.spatial_pattern,
        &config.profile_times,
    )
    .context("loading spatial profiles")?;

    let mut baseline = None;
    let mut later = Vec::new();
    for profile in loaded {
        if profile.time == BASELINE_TIME {
            if baseline.is_none() {
                baseline = Some(profile);
            }
        } else if profile.time > BASELINE_TIME {
            later.push(profile);
        } else {
            warn!(
                "Ignoring spatial snapshot at t={} before the baseline",
                time_label(profile.time)
            );
        }
    }

    let baseline = match baseline {
        Some(b) if !later.is_empty() => b,
        _ => {
            warn!(
                "Not enough spatial data found in {} (need t={} and one later snapshot)",
                config.spatial_dir.display(),
                time_label(BASELINE_TIME)
            );
            return Ok(None);
        }
    };

    let changes = later
        .iter()
        .map(|p| {
            compare_profiles(&baseline, p)
                .with_context(|| format!("comparing snapshot t={} to baseline", time_label(p.time)))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut snapshots = Vec::with_capacity(later.len() + 1);
    snapshots.push(baseline.clone());
    snapshots.extend(later);
    Ok(Some(SpatialComparison {
        baseline,
        snapshots,
        changes,
    }))
}

/// Full run: prepare, render everything, then write each artifact atomically.
pub fn run(config: &Config) -> Result<RunSummary> {
    let comparison = Comparison::prepare(config)?;
    let artifacts = comparison.artifacts(config)?;

    let mut writer = ArtifactWriter::create(&config.output_dir)
        .with_context(|| format!("creating output directory {}", config.output_dir.display()))?;
    for artifact in &artifacts {
        writer
            .write(&artifact.name, &artifact.contents)
            .with_context(|| format!("writing {}", artifact.name))?;
    }
    info!("All outputs generated in {}", config.output_dir.display());

    Ok(RunSummary {
        filter: comparison.filter_summary(),
        snapshots: comparison
            .spatial
            .as_ref()
            .map_or(0, |s| s.snapshots.len()),
        artifacts: writer.into_written(),
    })
}
