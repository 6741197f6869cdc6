//! The 1959 ANL-5977 Geneva 10 benchmark series.
//!
//! Two interchangeable providers: the table compiled into the binary, and the
//! same table read from `geneva10_anl5977.csv`. Which one a run uses is a
//! configuration choice ([`crate::config::ReferenceSource`]).

use std::path::PathBuf;
use std::sync::OnceLock;

use super::loader::load_time_series;
use super::model::{Sample, Schema, TimeSeries};
use crate::config::ReferenceSource;
use crate::error::CompareError;

/// Origin string for the compiled-in table, carried into logs and the JSON report.
pub const EMBEDDED_ORIGIN: &str =
    "embedded ANL-5977 table (4 published anchors, other rows interpolated)";

/// Number of rows in the benchmark table.
pub const REFERENCE_POINTS: usize = 26;

/// `(time µs, QP 10^12 erg, relative power, alpha 1/µs, W)`.
///
/// Only rows 0, 4, 5 and 25 (t = 0, 262, 270, 300 µs) are published
/// ANL-5977 values. The other rows are interpolated through those anchors
/// and are not the historical table. To compare against a full transcription,
/// put it in a CSV with the [`Schema::REFERENCE`] header and select it with
/// `--reference-csv` (or `{"source": "csv"}` in the config).
const GENEVA10_ANL5977: [(f64, f64, f64, f64, f64); REFERENCE_POINTS] = [
    (0.0, 3484.515, 1.000, 0.01323, 0.0000),
    (100.0, 3706.499, 3.755, 0.01323, 0.0004),
    (200.0, 4539.973, 14.098, 0.01323, 0.0272),
    (250.0, 5597.361, 26.501, 0.01080, 0.1038),
    (262.0, 5957.890, 29.801, 0.00860, 0.1375),
    (270.0, 6220.336, 31.676, 0.00657, 0.1647),
    (273.0, 6322.610, 32.264, 0.00568, 0.1760),
    (276.0, 6426.638, 32.771, 0.00471, 0.1880),
    (279.0, 6532.143, 33.186, 0.00366, 0.2006),
    (281.0, 6603.147, 33.405, 0.00291, 0.2093),
    (283.0, 6674.564, 33.574, 0.00213, 0.2185),
    (285.0, 6746.286, 33.690, 0.00131, 0.2279),
    (287.0, 6818.196, 33.749, 0.00045, 0.2376),
    (288.0, 6854.182, 33.757, 0.00000, 0.2427),
    (289.0, 6890.169, 33.752, -0.00029, 0.2478),
    (290.0, 6926.146, 33.737, -0.00058, 0.2529),
    (291.0, 6962.102, 33.712, -0.00088, 0.2582),
    (292.0, 6998.027, 33.678, -0.00117, 0.2636),
    (293.0, 7033.909, 33.634, -0.00146, 0.2691),
    (294.0, 7069.740, 33.580, -0.00175, 0.2746),
    (295.0, 7105.507, 33.516, -0.00204, 0.2803),
    (296.0, 7141.202, 33.443, -0.00233, 0.2860),
    (297.0, 7176.814, 33.360, -0.00263, 0.2919),
    (298.0, 7212.332, 33.268, -0.00292, 0.2978),
    (299.0, 7247.747, 33.166, -0.00321, 0.3039),
    (300.0, 7283.048, 33.055, -0.00350, 0.3100),
];

/// The embedded benchmark, built once per process.
pub fn geneva10() -> &'static TimeSeries {
    static SERIES: OnceLock<TimeSeries> = OnceLock::new();
    SERIES.get_or_init(|| {
        TimeSeries::from_samples(
            GENEVA10_ANL5977
                .iter()
                .map(|&(t, qp, p, a, w)| Sample::new(t, qp, p, a, w))
                .collect(),
        )
    })
}

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

/// Something that can hand out the reference series.
pub trait ReferenceProvider {
    /// Short human-readable origin, used in logs and the JSON report.
    fn describe(&self) -> String;

    fn load(&self) -> Result<TimeSeries, CompareError>;
}

/// The compiled-in table. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedReference;

impl ReferenceProvider for EmbeddedReference {
    fn describe(&self) -> String {
        EMBEDDED_ORIGIN.to_string()
    }

    fn load(&self) -> Result<TimeSeries, CompareError> {
        Ok(geneva10().clone())
    }
}

/// The benchmark read from a CSV with the [`Schema::REFERENCE`] header.
#[derive(Debug, Clone)]
pub struct CsvReference {
    path: PathBuf,
    expected_rows: usize,
}

impl CsvReference {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvReference {
            path: path.into(),
            expected_rows: REFERENCE_POINTS,
        }
    }
}

impl ReferenceProvider for CsvReference {
    fn describe(&self) -> String {
        format!("reference CSV {}", self.path.display())
    }

    fn load(&self) -> Result<TimeSeries, CompareError> {
        let series = load_time_series(&self.path, &Schema::REFERENCE)?;
        if series.len() != self.expected_rows {
            return Err(CompareError::malformed(
                self.path.display().to_string(),
                format!(
                    "expected {} reference rows, found {}",
                    self.expected_rows,
                    series.len()
                ),
            ));
        }
        Ok(series)
    }
}

/// Pick the provider named by the configuration.
pub fn provider_for(source: &ReferenceSource) -> Box<dyn ReferenceProvider> {
    match source {
        ReferenceSource::Embedded => Box::new(EmbeddedReference),
        ReferenceSource::Csv { path } => Box::new(CsvReference::new(path.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;
    use tempfile::TempDir;

    fn reference_csv(rows: usize) -> String {
        let mut body = String::from("time_microsec, QP_1e12_erg, power_relative, alpha_per_microsec, W\n");
        for &(t, qp, p, a, w) in GENEVA10_ANL5977.iter().take(rows) {
            writeln!(body, "{t}, {qp}, {p}, {a}, {w}").unwrap();
        }
        body
    }

    #[test]
    fn embedded_table_anchors() {
        let s = geneva10();
        assert_eq!(s.len(), REFERENCE_POINTS);
        assert_eq!(s.samples[0].time, 0.0);
        assert!((s.samples[0].energy - 3484.515).abs() < 1e-9);
        assert_eq!(s.samples[25].time, 300.0);
        assert!((s.samples[25].energy - 7283.048).abs() < 1e-9);
        assert_eq!(s.samples[4].time, 262.0);
        assert_eq!(s.samples[5].time, 270.0);
    }

    #[test]
    fn embedded_origin_admits_interpolation() {
        let origin = EmbeddedReference.describe();
        assert!(origin.contains("interpolated"));
        assert!(origin.contains("anchors"));
        assert!(CsvReference::new("ref.csv").describe().contains("ref.csv"));
    }

    #[test]
    fn embedded_table_is_monotonic() {
        let s = geneva10();
        assert!(s.is_sorted_by_time());
        assert!(s.samples.windows(2).all(|w| w[0].energy < w[1].energy));
    }

    #[test]
    fn csv_provider_matches_embedded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("geneva10_anl5977.csv");
        std::fs::write(&path, reference_csv(REFERENCE_POINTS)).unwrap();
        let from_csv = CsvReference::new(&path).load().unwrap();
        let embedded = EmbeddedReference.load().unwrap();
        assert_eq!(from_csv, embedded);
    }

    #[test]
    fn csv_provider_rejects_short_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("short.csv");
        std::fs::write(&path, reference_csv(20)).unwrap();
        let err = CsvReference::new(&path).load().unwrap_err();
        assert!(matches!(err, CompareError::MalformedData { .. }));
    }

    #[test]
    fn csv_provider_missing_file() {
        let dir = TempDir::new().unwrap();
        let provider = provider_for(&ReferenceSource::Csv {
            path: dir.path().join("absent.csv"),
        });
        assert!(matches!(
            provider.load().unwrap_err(),
            CompareError::ResourceNotFound { .. }
        ));
    }
}
