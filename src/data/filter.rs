use log::info;

use super::model::{TimeSeries, ValidityBounds};
use crate::error::CompareError;

// ---------------------------------------------------------------------------
// Validity filter
// ---------------------------------------------------------------------------

/// Result of [`filter_valid`]: the surviving samples plus the tally.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub series: TimeSeries,
    pub kept: usize,
    pub dropped: usize,
}

/// Keep the samples that satisfy every bound, preserving order.
///
/// A sample failing any bound is dropped whole, never repaired. The result
/// may be empty; callers that need data must check. An empty *input* is an
/// error.
pub fn filter_valid(
    series: &TimeSeries,
    bounds: &ValidityBounds,
) -> Result<FilterOutcome, CompareError> {
    if series.is_empty() {
        return Err(CompareError::empty("simulation series"));
    }
    let samples: Vec<_> = series
        .samples
        .iter()
        .filter(|s| bounds.admits(s))
        .copied()
        .collect();
    let kept = samples.len();
    let dropped = series.len() - kept;
    info!("After filtering: {kept} time points ({dropped} dropped)");
    Ok(FilterOutcome {
        series: TimeSeries::from_samples(samples),
        kept,
        dropped,
    })
}

// ---------------------------------------------------------------------------
// Display clamp
// ---------------------------------------------------------------------------

/// Clamp values into `[lo, hi]` for plotting only. Index `i` of the output
/// always corresponds to index `i` of the input; nothing is removed.
pub fn clamp_for_display(values: &[f64], lo: f64, hi: f64) -> Vec<f64> {
    values.iter().map(|&v| v.clamp(lo, hi)).collect()
}
