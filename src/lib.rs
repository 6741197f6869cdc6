//! Compare a Geneva 10 point-kinetics simulation against the 1959 ANL-5977
//! reference solution: validity filtering, nearest-time alignment, spatial
//! profile changes, and the table/figure artifacts built from them.

pub mod analysis;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod report;

pub use config::{Config, ReferenceSource};
pub use error::CompareError;
