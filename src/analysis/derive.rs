//! Element-wise comparison of a spatial snapshot against the `t = 0` baseline.
//!
//! Everything here is pure: no aggregation, no smoothing. Profiles are
//! compared by radial zone index, so both must have the same number of
//! zones. The radius values themselves move (Lagrangian grid) and are not
//! required to match.

use serde::Serialize;

use crate::data::model::SpatialProfile;
use crate::error::CompareError;

/// keV → eV, and the 10^-3 scalings used for alpha and velocity axes.
pub const MILLI: f64 = 1000.0;

/// `current[i] - baseline[i]` for every zone.
pub fn absolute_displacement(baseline: &[f64], current: &[f64]) -> Result<Vec<f64>, CompareError> {
    check_grid(baseline, current)?;
    Ok(current
        .iter()
        .zip(baseline)
        .map(|(&c, &b)| c - b)
        .collect())
}

/// `100 * (current - baseline) / baseline` for a single zone.
pub fn percent_change_at(index: usize, baseline: f64, current: f64) -> Result<f64, CompareError> {
    if baseline == 0.0 {
        return Err(CompareError::DivisionByZero { index });
    }
    Ok(100.0 * (current - baseline) / baseline)
}

/// Percent change per zone. Zones whose baseline is zero are skipped and
/// listed in `skipped`; they never abort the comparison.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PercentChange {
    /// Zone indices with a defined value, ascending.
    pub indices: Vec<usize>,
    pub values: Vec<f64>,
    pub skipped: Vec<usize>,
}

impl PercentChange {
    /// `(x[i], value)` pairs for the defined zones, `x` indexed by zone.
    pub fn points_over(&self, x: &[f64]) -> Vec<(f64, f64)> {
        self.indices
            .iter()
            .zip(&self.values)
            .filter_map(|(&i, &v)| x.get(i).map(|&xi| (xi, v)))
            .collect()
    }
}

pub fn percent_change(baseline: &[f64], current: &[f64]) -> Result<PercentChange, CompareError> {
    check_grid(baseline, current)?;
    let mut out = PercentChange::default();
    for (i, (&b, &c)) in baseline.iter().zip(current).enumerate() {
        match percent_change_at(i, b, c) {
            Ok(v) => {
                out.indices.push(i);
                out.values.push(v);
            }
            Err(_) => out.skipped.push(i),
        }
    }
    Ok(out)
}

/// Multiply every value by `factor` (unit conversion).
pub fn scaled(values: &[f64], factor: f64) -> Vec<f64> {
    values.iter().map(|v| v * factor).collect()
}

fn check_grid(baseline: &[f64], current: &[f64]) -> Result<(), CompareError> {
    if baseline.len() != current.len() {
        return Err(CompareError::GridMismatch {
            baseline: baseline.len(),
            other: current.len(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// ProfileComparison – everything the spatial figure needs for one snapshot
// ---------------------------------------------------------------------------

/// Derived quantities for one snapshot, all indexed by baseline zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileComparison {
    pub time: f64,
    /// Radial expansion ΔR in cm.
    pub radius_displacement: Vec<f64>,
    /// Δρ/ρ₀ in percent.
    pub density_change: PercentChange,
    /// Temperature in eV, over this snapshot's own radius.
    pub temperature_ev: Vec<f64>,
    /// Velocity in 10^-3 cm/µs.
    pub velocity_milli: Vec<f64>,
}

pub fn compare_profiles(
    baseline: &SpatialProfile,
    current: &SpatialProfile,
) -> Result<ProfileComparison, CompareError> {
    if baseline.len() != current.len() {
        return Err(CompareError::GridMismatch {
            baseline: baseline.len(),
            other: current.len(),
        });
    }
    let density_change = percent_change(&baseline.density, &current.density)?;
    if !density_change.skipped.is_empty() {
        log::warn!(
            "t={}: {} zone(s) with zero baseline density skipped",
            current.time,
            density_change.skipped.len()
        );
    }
    Ok(ProfileComparison {
        time: current.time,
        radius_displacement: absolute_displacement(&baseline.radius, &current.radius)?,
        density_change,
        temperature_ev: scaled(&current.temperature, MILLI),
        velocity_milli: scaled(&current.velocity, MILLI),
    })
}
