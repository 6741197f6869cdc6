use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::model::{ValidityBounds, BASELINE_TIME};
use crate::error::CompareError;

// ---------------------------------------------------------------------------
// Reference source selection
// ---------------------------------------------------------------------------

/// Where the benchmark series comes from.
///
/// ```json
/// { "source": "embedded" }
/// { "source": "csv", "path": "validation/reference_data/geneva10_anl5977.csv" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum ReferenceSource {
    #[default]
    Embedded,
    Csv { path: PathBuf },
}

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Everything a comparison run needs. Every field has a default, so a
/// config file only has to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub simulation_csv: PathBuf,
    pub spatial_dir: PathBuf,
    /// File name pattern for snapshots; `{t}` is replaced by the time.
    pub spatial_pattern: String,
    pub output_dir: PathBuf,
    pub reference: ReferenceSource,
    pub bounds: ValidityBounds,
    /// Upper clamp for W in figures. The table never sees clamped values.
    pub w_display_max: f64,
    /// Simulation W is only drawn for `time > w_plot_start`.
    pub w_plot_start: f64,
    /// Stability limit drawn as a guide line on the W figure.
    pub w_limit: f64,
    pub query_times: Vec<f64>,
    /// Snapshot times. The baseline is the `t = 0` entry wherever it sits;
    /// other times must be positive.
    pub profile_times: Vec<f64>,
    pub plots: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            simulation_csv: PathBuf::from("output_time_series.csv"),
            spatial_dir: PathBuf::from("."),
            spatial_pattern: "output_spatial_t{t}.csv".to_string(),
            output_dir: PathBuf::from("analysis/figures"),
            reference: ReferenceSource::Embedded,
            bounds: ValidityBounds::default(),
            w_display_max: 1.0,
            w_plot_start: 50.0,
            w_limit: 0.3,
            query_times: vec![0.0, 50.0, 100.0, 150.0, 200.0, 250.0, 300.0],
            profile_times: vec![0.0, 100.0, 200.0, 250.0, 280.0],
            plots: true,
        }
    }
}

impl Config {
    /// Load a JSON config file. Unknown keys are rejected.
    pub fn from_file(path: &Path) -> Result<Self, CompareError> {
        if !path.is_file() {
            return Err(CompareError::ResourceNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| CompareError::malformed(path.display().to_string(), e.to_string()))
    }

    /// Whether `profile_times` names the `t = 0` baseline at all.
    pub fn has_baseline(&self) -> bool {
        self.profile_times.contains(&BASELINE_TIME)
    }
}
