use serde::Serialize;

use crate::analysis::align::align;
use crate::analysis::derive::MILLI;
use crate::data::model::{time_label, TimeSeries};
use crate::error::CompareError;

pub const TITLE: &str = "Geneva 10 Comparison: 1959 ANL-5977 vs Simulation";
const RULE_WIDTH: usize = 70;
const HEADERS: [&str; 7] = [
    "Time",
    "Ref QP",
    "Sim QP",
    "Ref Power",
    "Sim Power",
    "Ref α",
    "Sim α",
];

/// One line of the comparison table. Alpha is stored ×1000.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub time: f64,
    pub reference_index: usize,
    pub simulation_index: usize,
    pub ref_qp: f64,
    pub sim_qp: f64,
    pub ref_power: f64,
    pub sim_power: f64,
    pub ref_alpha_milli: f64,
    pub sim_alpha_milli: f64,
}

impl ComparisonRow {
    fn cells(&self) -> [String; 7] {
        [
            time_label(self.time),
            format!("{:.1}", self.ref_qp),
            format!("{:.1}", self.sim_qp),
            format!("{:.2}", self.ref_power),
            format!("{:.2}", self.sim_power),
            format!("{:.3}", self.ref_alpha_milli),
            format!("{:.3}", self.sim_alpha_milli),
        ]
    }
}

/// Pair the nearest reference and simulation samples at each query time.
///
/// Values come from the unclamped series; an empty series on either side is
/// an [`CompareError::EmptySeries`].
pub fn build_rows(
    reference: &TimeSeries,
    simulation: &TimeSeries,
    query_times: &[f64],
) -> Result<Vec<ComparisonRow>, CompareError> {
    Ok(align(reference, simulation, query_times)?
        .into_iter()
        .map(|pair| {
            let r = &reference.samples[pair.reference];
            let s = &simulation.samples[pair.simulation];
            ComparisonRow {
                time: pair.query,
                reference_index: pair.reference,
                simulation_index: pair.simulation,
                ref_qp: r.energy,
                sim_qp: s.energy,
                ref_power: r.power,
                sim_power: s.power,
                ref_alpha_milli: r.alpha * MILLI,
                sim_alpha_milli: s.alpha * MILLI,
            }
        })
        .collect())
}

/// Fixed-width text: title, `=` rule, right-aligned columns.
pub fn render(rows: &[ComparisonRow]) -> String {
    let cells: Vec<[String; 7]> = rows.iter().map(ComparisonRow::cells).collect();
    let widths: Vec<usize> = (0..HEADERS.len())
        .map(|c| {
            cells
                .iter()
                .map(|r| r[c].chars().count())
                .chain(std::iter::once(HEADERS[c].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(TITLE);
    out.push('\n');
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');
    out.push_str(&join_row(HEADERS.iter().copied(), &widths));
    for row in &cells {
        out.push('\n');
        out.push_str(&join_row(row.iter().map(String::as_str), &widths));
    }
    out.push('\n');
    out
}

fn join_row<'a>(values: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    values
        .zip(widths)
        .map(|(v, &w)| format!("{v:>w$}"))
        .collect::<Vec<_>>()
        .join("  ")
}
