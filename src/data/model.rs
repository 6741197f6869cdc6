use serde::{Deserialize, Serialize};

use crate::error::CompareError;

// ---------------------------------------------------------------------------
// Sample – one row of a time series
// ---------------------------------------------------------------------------

/// One row of a point-kinetics time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    /// Time in microseconds.
    pub time: f64,
    /// Total energy QP in 10^12 erg.
    pub energy: f64,
    /// Power relative to its initial value.
    pub power: f64,
    /// Inverse period alpha in 1/µs.
    pub alpha: f64,
    /// Dimensionless stability parameter W.
    pub w: f64,
}

impl Sample {
    pub fn new(time: f64, energy: f64, power: f64, alpha: f64, w: f64) -> Self {
        Sample {
            time,
            energy,
            power,
            alpha,
            w,
        }
    }

    /// Read a single field by name.
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::Time => self.time,
            Field::Energy => self.energy,
            Field::Power => self.power,
            Field::Alpha => self.alpha,
            Field::W => self.w,
        }
    }
}

/// The value columns carried by every [`Sample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Time,
    Energy,
    Power,
    Alpha,
    W,
}

// ---------------------------------------------------------------------------
// Schema – CSV column names for each dataset flavour
// ---------------------------------------------------------------------------

/// Column names used by one CSV flavour, in [`Field`] declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    pub name: &'static str,
    pub columns: [&'static str; 5],
}

impl Schema {
    /// The ANL-5977 reference table as distributed in CSV form.
    pub const REFERENCE: Schema = Schema {
        name: "reference",
        columns: [
            "time_microsec",
            "QP_1e12_erg",
            "power_relative",
            "alpha_per_microsec",
            "W",
        ],
    };

    /// The simulator's `output_time_series.csv`.
    pub const SIMULATION: Schema = Schema {
        name: "simulation",
        columns: [
            "time_microsec",
            "QP_1e12_erg",
            "power_relative",
            "alpha_1_microsec",
            "W_dimensionless",
        ],
    };

    pub fn column(&self, field: Field) -> &'static str {
        self.columns[field as usize]
    }
}

// ---------------------------------------------------------------------------
// TimeSeries
// ---------------------------------------------------------------------------

/// An ordered sequence of samples. Time is expected to be non-decreasing but
/// is not enforced; see [`TimeSeries::is_sorted_by_time`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    pub samples: Vec<Sample>,
}

impl TimeSeries {
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        TimeSeries { samples }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the series is empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Extract one column as a vector.
    pub fn column(&self, field: Field) -> Vec<f64> {
        self.samples.iter().map(|s| s.get(field)).collect()
    }

    pub fn times(&self) -> Vec<f64> {
        self.column(Field::Time)
    }

    /// `(time, value)` pairs for one field, the shape the figures consume.
    pub fn points(&self, field: Field) -> Vec<(f64, f64)> {
        self.samples.iter().map(|s| (s.time, s.get(field))).collect()
    }

    pub fn is_sorted_by_time(&self) -> bool {
        self.samples.windows(2).all(|w| w[0].time <= w[1].time)
    }
}

// ---------------------------------------------------------------------------
// ValidityBounds
// ---------------------------------------------------------------------------

/// Thresholds outside which a simulation sample is considered numerically
/// degenerate and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidityBounds {
    /// Samples must satisfy `time > t_min`.
    pub t_min: f64,
    /// Samples must satisfy `energy < energy_max`.
    pub energy_max: f64,
    /// Samples must satisfy `|alpha| < alpha_max`.
    pub alpha_max: f64,
    /// Samples must satisfy `w < w_max`.
    pub w_max: f64,
}

impl Default for ValidityBounds {
    fn default() -> Self {
        ValidityBounds {
            t_min: 1.0,
            energy_max: 1e6,
            alpha_max: 1.0,
            w_max: 10.0,
        }
    }
}

impl ValidityBounds {
    /// Whether every bound holds. NaN in any checked field fails.
    pub fn admits(&self, s: &Sample) -> bool {
        s.time > self.t_min
            && s.energy < self.energy_max
            && s.alpha.abs() < self.alpha_max
            && s.w < self.w_max
    }
}

// ---------------------------------------------------------------------------
// SpatialProfile
// ---------------------------------------------------------------------------

/// Time of the snapshot every other one is compared against.
pub const BASELINE_TIME: f64 = 0.0;

/// A snapshot of the zone-wise state at one simulation time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpatialProfile {
    pub time: f64,
    /// Zone radius in cm.
    pub radius: Vec<f64>,
    /// Temperature in keV.
    pub temperature: Vec<f64>,
    /// Density in g/cm^3.
    pub density: Vec<f64>,
    /// Velocity in cm/µs.
    pub velocity: Vec<f64>,
}

impl SpatialProfile {
    pub const COLUMNS: [&'static str; 4] = [
        "radius_cm",
        "temperature_keV",
        "density_g_cm3",
        "velocity_cm_microsec",
    ];

    /// Build a profile, checking all columns share one length.
    pub fn new(
        time: f64,
        radius: Vec<f64>,
        temperature: Vec<f64>,
        density: Vec<f64>,
        velocity: Vec<f64>,
    ) -> Result<Self, CompareError> {
        let n = radius.len();
        if temperature.len() != n || density.len() != n || velocity.len() != n {
            return Err(CompareError::malformed(
                format!("spatial profile t={}", time_label(time)),
                format!(
                    "column lengths differ: radius {n}, temperature {}, density {}, velocity {}",
                    temperature.len(),
                    density.len(),
                    velocity.len()
                ),
            ));
        }
        Ok(SpatialProfile {
            time,
            radius,
            temperature,
            density,
            velocity,
        })
    }

    /// Number of radial zones.
    pub fn len(&self) -> usize {
        self.radius.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radius.is_empty()
    }
}

/// Render a time for file names and table cells: whole numbers lose the
/// fractional part (`100.0` → `"100"`).
pub fn time_label(t: f64) -> String {
    if t.fract() == 0.0 && t.abs() < 1e15 {
        format!("{t:.0}")
    } else {
        format!("{t}")
    }
}
