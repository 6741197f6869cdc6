//! Comparison logic: time alignment of the two series and derived
//! spatial quantities against the baseline snapshot.

pub mod align;
pub mod derive;
