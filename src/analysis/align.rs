//! Nearest-sample lookup between two irregularly sampled series.

use serde::Serialize;

use crate::data::model::TimeSeries;
use crate::error::CompareError;

/// Index of the sample whose time is closest to `t`.
///
/// Linear scan, O(n) per query. Ties go to the earlier index. For long
/// sorted series, [`nearest_index_sorted`] gives the same answer in
/// O(log n).
pub fn nearest_index(series: &TimeSeries, t: f64) -> Result<usize, CompareError> {
    if series.is_empty() {
        return Err(CompareError::empty("time series"));
    }
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, s) in series.samples.iter().enumerate() {
        let dist = (s.time - t).abs();
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    Ok(best)
}

/// Binary-search variant of [`nearest_index`] over ascending `times`.
///
/// Same tie-break: with equal distance on both sides, or a run of equal
/// times, the earliest index wins.
pub fn nearest_index_sorted(times: &[f64], t: f64) -> Result<usize, CompareError> {
    if times.is_empty() {
        return Err(CompareError::empty("time series"));
    }
    // First index with time >= t; already the first of its run.
    let right = times.partition_point(|&x| x < t);
    if right == 0 {
        return Ok(0);
    }
    // Walk the left candidate back to the first of its run of equal times.
    let left = times.partition_point(|&x| x < times[right - 1]);
    if right == times.len() {
        return Ok(left);
    }
    if (t - times[left]).abs() <= (times[right] - t).abs() {
        Ok(left)
    } else {
        Ok(right)
    }
}

/// One query time matched against both series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlignedPair {
    pub query: f64,
    pub reference: usize,
    pub simulation: usize,
}

/// Resolve every query time independently in each series.
pub fn align(
    reference: &TimeSeries,
    simulation: &TimeSeries,
    query_times: &[f64],
) -> Result<Vec<AlignedPair>, CompareError> {
    query_times
        .iter()
        .map(|&q| {
            Ok(AlignedPair {
                query: q,
                reference: nearest_index(reference, q)?,
                simulation: nearest_index(simulation, q)?,
            })
        })
        .collect()
}
