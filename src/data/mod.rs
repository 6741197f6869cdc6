/// Data layer: core types, loading, reference data and validity filtering.
///
/// Architecture:
/// ```text
///  output_time_series.csv        embedded table / geneva10_anl5977.csv
///        │                                  │
///        ▼                                  ▼
///   ┌──────────┐                     ┌────────────┐
///   │  loader   │  parse → TimeSeries │ reference  │  ReferenceProvider
///   └──────────┘                     └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  drop degenerate samples → FilterOutcome
///   └──────────┘
/// ```
///
/// Spatial snapshots (`output_spatial_t{t}.csv`) go through `loader` only.

pub mod filter;
pub mod loader;
pub mod model;
pub mod reference;
