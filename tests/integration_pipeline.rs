//! Integration tests: a full comparison run against fixture files on disk.
//!
//! Each test builds a simulator-style output directory in a temp dir, runs
//! the pipeline, and inspects what landed in the output directory.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use geneva_compare::pipeline::{self, Comparison, COMBINED_FIGURE, JSON_FILE, SPATIAL_FIGURE, TABLE_FILE};
use geneva_compare::{CompareError, Config};
use tempfile::TempDir;

const HEADER: &str = "time_microsec, QP_1e12_erg, power_relative, alpha_1_microsec, W_dimensionless\n";

fn write_series(dir: &Path, rows: &[(f64, f64, f64, f64, f64)]) {
    let mut body = String::from(HEADER);
    for (t, qp, p, a, w) in rows {
        writeln!(body, "{t}, {qp}, {p}, {a}, {w}").unwrap();
    }
    fs::write(dir.join("output_time_series.csv"), body).unwrap();
}

fn ramp_rows() -> Vec<(f64, f64, f64, f64, f64)> {
    let mut rows: Vec<_> = (0..=600)
        .map(|k| {
            let t = f64::from(k) * 0.5;
            (t, 3484.5 + 12.0 * t, (0.0132 * t).exp(), 0.0132, 0.001 * t + 2.0 * (-t / 8.0).exp())
        })
        .collect();
    rows.push((300.5, 5.0e6, 1.0e9, 3.0, 40.0));
    rows
}

fn write_profile(dir: &Path, t: u32, stretch: f64, density: f64) {
    let mut body = String::from("radius_cm,temperature_keV,density_g_cm3,velocity_cm_microsec\n");
    for i in 1..=10 {
        let r = f64::from(i) * stretch;
        writeln!(body, "{r},0.025,{density},0.001").unwrap();
    }
    fs::write(dir.join(format!("output_spatial_t{t}.csv")), body).unwrap();
}

fn config_for(input: &Path, output: &Path) -> Config {
    Config {
        simulation_csv: input.join("output_time_series.csv"),
        spatial_dir: input.to_path_buf(),
        output_dir: output.to_path_buf(),
        ..Config::default()
    }
}

#[test]
fn full_run_writes_every_artifact() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_series(input.path(), &ramp_rows());
    write_profile(input.path(), 0, 1.0, 1.0);
    write_profile(input.path(), 100, 1.0, 1.1);
    write_profile(input.path(), 280, 1.01, 0.9);

    let out_dir = output.path().join("figures");
    let summary = pipeline::run(&config_for(input.path(), &out_dir)).unwrap();

    // t = 0, 0.5, 1.0 fail t_min; the diverged last row fails every bound.
    assert_eq!(summary.filter.loaded, 602);
    assert_eq!(summary.filter.dropped, 4);
    assert_eq!(summary.filter.kept, 598);
    assert_eq!(summary.snapshots, 3);

    for name in [TABLE_FILE, JSON_FILE, COMBINED_FIGURE, SPATIAL_FIGURE] {
        assert!(out_dir.join(name).is_file(), "{name} missing");
    }
    assert_eq!(summary.artifacts.len(), 8);

    let table = fs::read_to_string(out_dir.join(TABLE_FILE)).unwrap();
    assert!(table.starts_with("Geneva 10 Comparison: 1959 ANL-5977 vs Simulation\n"));
    assert_eq!(table.lines().count(), 3 + 7);
    assert!(table.contains("3484.5"));
    assert!(table.contains("7283.0"));
}

#[test]
fn json_report_carries_rows_and_spatial_changes() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_series(input.path(), &ramp_rows());
    write_profile(input.path(), 0, 1.0, 1.0);
    write_profile(input.path(), 100, 1.0, 1.1);

    let mut config = config_for(input.path(), output.path());
    config.plots = false;
    pipeline::run(&config).unwrap();

    let text = fs::read_to_string(output.path().join(JSON_FILE)).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(doc["reference"].as_str().unwrap().contains("interpolated"));
    assert_eq!(doc["simulation"]["dropped"], 4);
    assert_eq!(doc["rows"].as_array().unwrap().len(), 7);
    assert_eq!(doc["rows"][6]["reference_index"], 25);

    let change = &doc["spatial"][0]["density_change"]["values"];
    let values = change.as_array().unwrap();
    assert_eq!(values.len(), 10);
    for v in values {
        assert!((v.as_f64().unwrap() - 10.0).abs() < 1e-9);
    }
    assert!(!output.path().join(COMBINED_FIGURE).exists());
}

#[test]
fn table_uses_unclamped_values() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_series(input.path(), &ramp_rows());

    let comparison = Comparison::prepare(&config_for(input.path(), output.path())).unwrap();
    // The first kept sample (t = 1.5) has W well above the display ceiling.
    let raw_w = comparison.filtered.series.samples[0].w;
    assert!(raw_w > 1.0);
    assert_eq!(comparison.display_w[0], 1.0);
    assert_eq!(comparison.display_w.len(), comparison.filtered.series.len());
    assert_eq!(comparison.rows[0].simulation_index, 0);
    assert!(comparison.spatial.is_none());
}

#[test]
fn missing_simulation_file_is_reported() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let err = pipeline::run(&config_for(input.path(), &output.path().join("figures"))).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CompareError>(),
        Some(CompareError::ResourceNotFound { .. })
    ));
    assert!(!output.path().join("figures").exists());
}

#[test]
fn all_samples_invalid_means_no_comparable_data() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_series(
        input.path(),
        &[(0.0, 3484.5, 1.0, 0.01, 0.0), (0.5, 3485.0, 1.0, 0.01, 0.0)],
    );
    let err = pipeline::run(&config_for(input.path(), output.path())).unwrap_err();
    assert!(format!("{err:#}").contains("no comparable data"));
    assert!(matches!(
        err.downcast_ref::<CompareError>(),
        Some(CompareError::EmptySeries { .. })
    ));
    assert!(!output.path().join(TABLE_FILE).exists());
}

#[test]
fn mismatched_snapshot_grid_aborts_before_writing() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_series(input.path(), &ramp_rows());
    write_profile(input.path(), 0, 1.0, 1.0);
    fs::write(
        input.path().join("output_spatial_t100.csv"),
        "radius_cm,temperature_keV,density_g_cm3,velocity_cm_microsec\n1.0,0.03,1.0,0.0\n",
    )
    .unwrap();
    let err = pipeline::run(&config_for(input.path(), output.path())).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CompareError>(),
        Some(CompareError::GridMismatch { baseline: 10, other: 1 })
    ));
    assert!(!output.path().join(TABLE_FILE).exists());
}

#[test]
fn baseline_is_t0_whatever_the_profile_order() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_series(input.path(), &ramp_rows());
    write_profile(input.path(), 0, 1.0, 1.0);
    write_profile(input.path(), 100, 1.0, 1.1);

    let config = Config {
        profile_times: vec![100.0, 0.0],
        ..config_for(input.path(), output.path())
    };
    let comparison = Comparison::prepare(&config).unwrap();
    let spatial = comparison.spatial.unwrap();
    assert_eq!(spatial.baseline.time, 0.0);
    assert_eq!(spatial.snapshots[0].time, 0.0);
    assert_eq!(spatial.changes.len(), 1);
    assert_eq!(spatial.changes[0].time, 100.0);
    for v in &spatial.changes[0].density_change.values {
        assert!((v - 10.0).abs() < 1e-9);
    }
}

#[test]
fn missing_t0_snapshot_skips_spatial_comparison() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_series(input.path(), &ramp_rows());
    write_profile(input.path(), 100, 1.0, 1.0);
    write_profile(input.path(), 200, 1.0, 1.1);

    let config = Config {
        profile_times: vec![100.0, 200.0],
        ..config_for(input.path(), output.path())
    };
    let comparison = Comparison::prepare(&config).unwrap();
    assert!(comparison.spatial.is_none());
}

#[test]
fn lone_baseline_skips_spatial_figure() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_series(input.path(), &ramp_rows());
    write_profile(input.path(), 0, 1.0, 1.0);
    let summary = pipeline::run(&config_for(input.path(), output.path())).unwrap();
    assert_eq!(summary.snapshots, 0);
    assert!(output.path().join(TABLE_FILE).is_file());
    assert!(!output.path().join(SPATIAL_FIGURE).exists());
}
