//! Output artifacts: the fixed-width comparison table, SVG figures and the
//! atomic writer that puts them on disk.

pub mod plot;
pub mod table;
pub mod writer;
