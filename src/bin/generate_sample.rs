use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Reactivity ramp: constant inverse period until disassembly sets in.
fn alpha_at(t: f64) -> f64 {
    const ALPHA0: f64 = 0.01323;
    if t <= 200.0 {
        ALPHA0
    } else if t < 288.0 {
        ALPHA0 * (1.0 - ((t - 200.0) / 88.0).powi(3))
    } else {
        -0.0035 * (t - 288.0) / 12.0
    }
}

const QP0: f64 = 3484.515;
const QP_PER_POWER_US: f64 = 1.066;
const DT: f64 = 0.5;
const ZONES: usize = 40;
const OUTER_RADIUS: f64 = 40.0;
const SNAPSHOT_TIMES: [f64; 5] = [0.0, 100.0, 200.0, 250.0, 280.0];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One integrated kinetics state.
#[derive(Clone, Copy)]
struct State {
    time: f64,
    qp: f64,
    power: f64,
}

/// Trapezoid integration of ln P and QP on a fixed step.
fn integrate(until: f64) -> Vec<State> {
    let steps = (until / DT).round() as usize;
    let mut out = Vec::with_capacity(steps + 1);
    let mut ln_p = 0.0;
    let mut qp = QP0;
    let mut power = 1.0;
    out.push(State { time: 0.0, qp, power });
    for k in 1..=steps {
        let t0 = (k - 1) as f64 * DT;
        let t1 = k as f64 * DT;
        ln_p += 0.5 * (alpha_at(t0) + alpha_at(t1)) * DT;
        let next = f64::exp(ln_p);
        qp += QP_PER_POWER_US * 0.5 * (power + next) * DT;
        power = next;
        out.push(State { time: t1, qp, power });
    }
    out
}

fn stability_at(t: f64) -> f64 {
    // The early transient is what the display clamp exists for.
    0.31 * (t / 300.0).powi(6) + 2.0 * (-t / 8.0).exp()
}

fn write_time_series(path: &Path, states: &[State], rng: &mut SimpleRng) -> Result<usize> {
    let mut w = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    w.write_record([
        "time_microsec",
        " QP_1e12_erg",
        " power_relative",
        " alpha_1_microsec",
        " W_dimensionless",
    ])?;
    for s in states {
        let noise = 1.0 + rng.gauss(0.0, 0.002);
        w.write_record([
            format!("{:.3}", s.time),
            format!("{:.4}", s.qp),
            format!("{:.5}", s.power * noise),
            format!("{:.6}", alpha_at(s.time) + rng.gauss(0.0, 2e-5)),
            format!("{:.5}", stability_at(s.time)),
        ])?;
    }
    // A diverged final step, as a failing solver would leave behind.
    w.write_record(["300.500", "5.0e6", "1.0e9", "3.0", "40.0"])?;
    w.flush()?;
    Ok(states.len() + 1)
}

fn write_snapshot(path: &Path, state: &State) -> Result<()> {
    let burn = (state.qp - QP0) / (7283.048 - QP0);
    let expansion = ((state.time - 200.0).max(0.0) / 80.0).powi(2);
    let rate = 2.0 * (state.time - 200.0).max(0.0) / (80.0 * 80.0);

    let mut w = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    w.write_record([
        "radius_cm",
        "temperature_keV",
        "density_g_cm3",
        "velocity_cm_microsec",
    ])?;
    for i in 0..ZONES {
        let r0 = (i + 1) as f64 * OUTER_RADIUS / ZONES as f64;
        let shape = r0 / OUTER_RADIUS;
        let r = r0 * (1.0 + 2e-3 * expansion * shape);
        let rho0 = if r0 <= 25.0 { 7.9 } else { 10.0 };
        let rho = rho0 * (r0 / r).powi(3);
        let temperature = 0.025 + 0.6 * burn * (1.0 - shape * shape);
        let velocity = r0 * 2e-3 * rate * shape;
        w.write_record([
            format!("{r:.6}"),
            format!("{temperature:.6}"),
            format!("{rho:.6}"),
            format!("{velocity:.8}"),
        ])?;
    }
    w.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let states = integrate(300.0);

    let series_path = out_dir.join("output_time_series.csv");
    let rows = write_time_series(&series_path, &states, &mut rng)?;
    println!("Wrote {rows} time points to {}", series_path.display());

    for &t in &SNAPSHOT_TIMES {
        let idx = (t / DT).round() as usize;
        let path = out_dir.join(format!("output_spatial_t{t:.0}.csv"));
        write_snapshot(&path, &states[idx])?;
        println!("Wrote {ZONES} zones at t={t:.0} to {}", path.display());
    }
    Ok(())
}
