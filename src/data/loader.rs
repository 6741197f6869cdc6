use std::path::{Path, PathBuf};

use log::{debug, info};

use super::model::{time_label, Sample, Schema, SpatialProfile, TimeSeries};
use crate::error::CompareError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a point-kinetics time series whose header follows `schema`.
///
/// Header and cell whitespace is trimmed; extra columns are ignored.
pub fn load_time_series(path: &Path, schema: &Schema) -> Result<TimeSeries, CompareError> {
    let rows = read_columns(path, &schema.columns)?;
    let samples = rows
        .into_iter()
        .map(|r| Sample::new(r[0], r[1], r[2], r[3], r[4]))
        .collect::<Vec<_>>();
    debug!(
        "{}: {} {} rows",
        path.display(),
        samples.len(),
        schema.name
    );
    Ok(TimeSeries::from_samples(samples))
}

/// Load one spatial snapshot (`radius_cm, temperature_keV, density_g_cm3,
/// velocity_cm_microsec`).
pub fn load_spatial_profile(path: &Path, time: f64) -> Result<SpatialProfile, CompareError> {
    let rows = read_columns(path, &SpatialProfile::COLUMNS)?;
    let mut radius = Vec::with_capacity(rows.len());
    let mut temperature = Vec::with_capacity(rows.len());
    let mut density = Vec::with_capacity(rows.len());
    let mut velocity = Vec::with_capacity(rows.len());
    for r in rows {
        radius.push(r[0]);
        temperature.push(r[1]);
        density.push(r[2]);
        velocity.push(r[3]);
    }
    SpatialProfile::new(time, radius, temperature, density, velocity)
}

/// Resolve the file for snapshot time `t` from a pattern containing `{t}`,
/// e.g. `output_spatial_t{t}.csv`.
pub fn snapshot_path(dir: &Path, pattern: &str, t: f64) -> PathBuf {
    dir.join(pattern.replace("{t}", &time_label(t)))
}

/// Load every snapshot in `times` that exists on disk, in the given order.
///
/// Missing files are skipped; a file that exists but does not parse aborts.
pub fn load_spatial_series(
    dir: &Path,
    pattern: &str,
    times: &[f64],
) -> Result<Vec<SpatialProfile>, CompareError> {
    let mut profiles = Vec::with_capacity(times.len());
    for &t in times {
        let path = snapshot_path(dir, pattern, t);
        if !path.is_file() {
            info!("No spatial data for t={} ({})", time_label(t), path.display());
            continue;
        }
        let profile = load_spatial_profile(&path, t)?;
        info!(
            "Loaded spatial data for t={} ({} zones)",
            time_label(t),
            profile.len()
        );
        profiles.push(profile);
    }
    Ok(profiles)
}

// ---------------------------------------------------------------------------
// CSV helpers
// ---------------------------------------------------------------------------

/// Read the named numeric columns from a headed CSV file, one `Vec<f64>`
/// per row in `columns` order.
fn read_columns(path: &Path, columns: &[&str]) -> Result<Vec<Vec<f64>>, CompareError> {
    if !path.is_file() {
        return Err(CompareError::ResourceNotFound {
            path: path.to_path_buf(),
        });
    }
    let source = path.display().to_string();

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| csv_error(&source, e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(&source, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let indices = columns
        .iter()
        .map(|&name| {
            headers.iter().position(|h| h == name).ok_or_else(|| {
                CompareError::malformed(
                    &source,
                    format!("missing column '{name}' (found: {})", headers.join(", ")),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| csv_error(&source, e))?;
        let row = indices
            .iter()
            .zip(columns)
            .map(|(&idx, &name)| {
                let cell = record.get(idx).unwrap_or("");
                cell.parse::<f64>().map_err(|_| {
                    CompareError::malformed(
                        &source,
                        format!("row {row_no}, column '{name}': '{cell}' is not a number"),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }
    Ok(rows)
}

/// Map a csv error: I/O stays I/O, everything else is a schema problem.
fn csv_error(source: &str, err: csv::Error) -> CompareError {
    if err.is_io_error() {
        match err.into_kind() {
            csv::ErrorKind::Io(io) => CompareError::Io(io),
            other => CompareError::malformed(source, format!("{other:?}")),
        }
    } else {
        CompareError::malformed(source, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn headers_are_trimmed() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "ts.csv",
            " time_microsec , QP_1e12_erg,power_relative , alpha_1_microsec,W_dimensionless\n\
             0.0, 3484.5, 1.0, 0.013, 0.0\n\
             2.0, 3490.0, 1.1, 0.013, 0.01\n",
        );
        let ts = load_time_series(&path, &Schema::SIMULATION).unwrap();
        assert_eq!(ts.len(), 2);
        assert!((ts.samples[1].energy - 3490.0).abs() < 1e-12);
        assert!((ts.samples[1].w - 0.01).abs() < 1e-12);
    }

    #[test]
    fn extra_columns_ignored_and_order_free() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "ts.csv",
            "W_dimensionless,step,time_microsec,alpha_1_microsec,power_relative,QP_1e12_erg\n\
             0.2,7,5.0,0.01,2.0,3500.0\n",
        );
        let ts = load_time_series(&path, &Schema::SIMULATION).unwrap();
        assert_eq!(ts.samples[0], Sample::new(5.0, 3500.0, 2.0, 0.01, 0.2));
    }

    #[test]
    fn missing_file_is_resource_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_time_series(&dir.path().join("nope.csv"), &Schema::SIMULATION).unwrap_err();
        assert!(matches!(err, CompareError::ResourceNotFound { .. }));
    }

    #[test]
    fn renamed_column_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "ts.csv",
            "time_microsec,QP_1e12_erg,power_relative,alpha_per_microsec,W_dimensionless\n\
             1,2,3,4,5\n",
        );
        let err = load_time_series(&path, &Schema::SIMULATION).unwrap_err();
        match err {
            CompareError::MalformedData { detail, .. } => {
                assert!(detail.contains("alpha_1_microsec"))
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn non_numeric_cell_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "p.csv",
            "radius_cm,temperature_keV,density_g_cm3,velocity_cm_microsec\n1.0,abc,7.9,0.0\n",
        );
        let err = load_spatial_profile(&path, 0.0).unwrap_err();
        assert!(matches!(err, CompareError::MalformedData { .. }));
    }

    #[test]
    fn ragged_row_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "p.csv",
            "radius_cm,temperature_keV,density_g_cm3,velocity_cm_microsec\n1.0,0.1,7.9\n",
        );
        let err = load_spatial_profile(&path, 0.0).unwrap_err();
        assert!(matches!(err, CompareError::MalformedData { .. }));
    }

    #[test]
    fn spatial_series_skips_missing_snapshots() {
        let dir = TempDir::new().unwrap();
        let body = "radius_cm,temperature_keV,density_g_cm3,velocity_cm_microsec\n\
                    1.0,0.1,7.9,0.0\n2.0,0.1,7.9,0.0\n";
        write(&dir, "output_spatial_t0.csv", body);
        write(&dir, "output_spatial_t200.csv", body);
        let profiles =
            load_spatial_series(dir.path(), "output_spatial_t{t}.csv", &[0.0, 100.0, 200.0])
                .unwrap();
        let times: Vec<f64> = profiles.iter().map(|p| p.time).collect();
        assert_eq!(times, vec![0.0, 200.0]);
        assert_eq!(profiles[1].len(), 2);
    }

    #[test]
    fn snapshot_paths_use_integer_labels() {
        let p = snapshot_path(Path::new("/data"), "output_spatial_t{t}.csv", 250.0);
        assert_eq!(p, PathBuf::from("/data/output_spatial_t250.csv"));
    }
}
