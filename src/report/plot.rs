//! Figure generation using plotters (SVG output).
//!
//! Figures are rendered into memory and handed back as SVG text so the
//! caller decides when, and whether, anything reaches disk.

use anyhow::Result;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::analysis::derive::{scaled, ProfileComparison, MILLI};
use crate::color::{SnapshotColors, REFERENCE, SIMULATION, W_LIMIT, ZERO_LINE};
use crate::config::Config;
use crate::data::model::{Field, SpatialProfile, TimeSeries};

/// Every time-axis figure spans the benchmark window.
pub const TIME_WINDOW: (f64, f64) = (0.0, 300.0);
const FONT: &str = "serif";
const SINGLE_SIZE: (u32, u32) = (640, 500);
const GRID_SIZE: (u32, u32) = (1100, 920);
const W_RANGE: (f64, f64) = (0.0, 0.35);

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

// ---------------------------------------------------------------------------
// Panel descriptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Corner {
    #[default]
    UpperLeft,
    UpperRight,
    LowerRight,
}

impl Corner {
    fn position(self) -> SeriesLabelPosition {
        match self {
            Corner::UpperLeft => SeriesLabelPosition::UpperLeft,
            Corner::UpperRight => SeriesLabelPosition::UpperRight,
            Corner::LowerRight => SeriesLabelPosition::LowerRight,
        }
    }
}

/// A horizontal guide line, optionally named in the legend.
#[derive(Debug, Clone)]
pub struct Guide {
    pub y: f64,
    pub label: Option<String>,
    pub color: RGBColor,
    pub dashed: bool,
}

/// Reference markers against a simulation line on the shared time axis.
#[derive(Debug, Clone, Default)]
pub struct Panel {
    pub title: String,
    pub y_label: String,
    pub reference: Vec<(f64, f64)>,
    pub simulation: Vec<(f64, f64)>,
    pub y_range: Option<(f64, f64)>,
    pub log_y: bool,
    pub guide: Option<Guide>,
    pub legend: Corner,
}

/// One labelled line in a [`CurvePanel`].
#[derive(Debug, Clone)]
pub struct Curve {
    pub label: String,
    pub color: RGBColor,
    pub points: Vec<(f64, f64)>,
}

/// Several labelled curves over a radius axis.
#[derive(Debug, Clone, Default)]
pub struct CurvePanel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub curves: Vec<Curve>,
    pub zero_line: bool,
    pub legend: Corner,
}

// ---------------------------------------------------------------------------
// Panel assembly from comparison data
// ---------------------------------------------------------------------------

/// The four time-series panels: energy, power, inverse period, W.
///
/// `display_w` is the clamped W of `simulation`, index for index.
pub fn comparison_panels(
    reference: &TimeSeries,
    simulation: &TimeSeries,
    display_w: &[f64],
    config: &Config,
) -> [Panel; 4] {
    let energy = Panel {
        title: "(a) Total Energy".into(),
        y_label: "QP (10^12 erg)".into(),
        reference: reference.points(Field::Energy),
        simulation: simulation.points(Field::Energy),
        ..Panel::default()
    };

    let power = Panel {
        title: "(b) Power".into(),
        y_label: "Relative Power".into(),
        reference: reference
            .points(Field::Power)
            .into_iter()
            .filter(|&(t, _)| t > 0.0)
            .collect(),
        simulation: simulation.points(Field::Power),
        log_y: true,
        ..Panel::default()
    };

    let milli = |(t, a): (f64, f64)| (t, a * MILLI);
    let alpha = Panel {
        title: "(c) Inverse Period α".into(),
        y_label: "α (10^-3 µs^-1)".into(),
        reference: reference.points(Field::Alpha).into_iter().map(milli).collect(),
        simulation: simulation.points(Field::Alpha).into_iter().map(milli).collect(),
        guide: Some(Guide {
            y: 0.0,
            label: None,
            color: ZERO_LINE,
            dashed: false,
        }),
        legend: Corner::UpperRight,
        ..Panel::default()
    };

    let w = Panel {
        title: "(d) Stability Parameter".into(),
        y_label: "W".into(),
        reference: reference.points(Field::W),
        simulation: simulation
            .samples
            .iter()
            .zip(display_w)
            .filter(|(s, _)| s.time > config.w_plot_start)
            .map(|(s, &w)| (s.time, w))
            .collect(),
        y_range: Some(W_RANGE),
        guide: Some(Guide {
            y: config.w_limit,
            label: Some("W limit".into()),
            color: W_LIMIT,
            dashed: true,
        }),
        ..Panel::default()
    };

    [energy, power, alpha, w]
}

/// The four spatial panels: ΔR, temperature, Δρ/ρ₀, velocity.
///
/// `snapshots` holds every loaded profile including the baseline;
/// `changes` holds one entry per non-baseline snapshot. Change curves get
/// their own colour ramp over the later times only.
pub fn spatial_panels(
    baseline: &SpatialProfile,
    snapshots: &[SpatialProfile],
    changes: &[ProfileComparison],
) -> [CurvePanel; 4] {
    let times: Vec<f64> = snapshots.iter().map(|p| p.time).collect();
    let colors = SnapshotColors::new(&times);
    let change_times: Vec<f64> = changes.iter().map(|c| c.time).collect();
    let change_colors = SnapshotColors::new(&change_times);

    let expansion = CurvePanel {
        title: "(a) Radial Expansion".into(),
        x_label: "Initial Radius (cm)".into(),
        y_label: "ΔR (cm)".into(),
        curves: change_curves(changes, &change_colors, |c| {
            over_radius(&baseline.radius, &c.radius_displacement)
        }),
        zero_line: true,
        legend: Corner::UpperLeft,
    };

    let temperature = CurvePanel {
        title: "(b) Temperature Profile".into(),
        x_label: "Radius (cm)".into(),
        y_label: "Temperature (eV)".into(),
        curves: snapshots
            .iter()
            .map(|p| Curve {
                label: colors.label_for(p.time),
                color: colors.color_for(p.time),
                points: p
                    .radius
                    .iter()
                    .copied()
                    .zip(scaled(&p.temperature, MILLI))
                    .collect(),
            })
            .collect(),
        zero_line: false,
        legend: Corner::UpperRight,
    };

    let density = CurvePanel {
        title: "(c) Density Change".into(),
        x_label: "Initial Radius (cm)".into(),
        y_label: "Δρ/ρ0 (%)".into(),
        curves: change_curves(changes, &change_colors, |c| {
            c.density_change.points_over(&baseline.radius)
        }),
        zero_line: true,
        legend: Corner::LowerRight,
    };

    let velocity = CurvePanel {
        title: "(d) Velocity Profile".into(),
        x_label: "Initial Radius (cm)".into(),
        y_label: "Velocity (10^-3 cm/µs)".into(),
        curves: change_curves(changes, &change_colors, |c| {
            over_radius(&baseline.radius, &c.velocity_milli)
        }),
        zero_line: true,
        legend: Corner::UpperLeft,
    };

    [expansion, temperature, density, velocity]
}

fn change_curves(
    changes: &[ProfileComparison],
    colors: &SnapshotColors,
    pick: impl Fn(&ProfileComparison) -> Vec<(f64, f64)>,
) -> Vec<Curve> {
    changes
        .iter()
        .map(|c| Curve {
            label: colors.label_for(c.time),
            color: colors.color_for(c.time),
            points: pick(c),
        })
        .collect()
}

fn over_radius(radius: &[f64], values: &[f64]) -> Vec<(f64, f64)> {
    radius.iter().copied().zip(values.iter().copied()).collect()
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// One panel on its own canvas.
pub fn single_panel(panel: &Panel) -> Result<String> {
    render_svg(SINGLE_SIZE, |root| draw_panel(root, panel, 18))
}

/// Four panels in a 2×2 grid.
pub fn panel_grid(panels: &[Panel; 4]) -> Result<String> {
    render_svg(GRID_SIZE, |root| {
        for (area, panel) in root.split_evenly((2, 2)).iter().zip(panels) {
            draw_panel(area, panel, 16)?;
        }
        Ok(())
    })
}

/// Four curve panels in a 2×2 grid.
pub fn curve_grid(panels: &[CurvePanel; 4]) -> Result<String> {
    render_svg(GRID_SIZE, |root| {
        for (area, panel) in root.split_evenly((2, 2)).iter().zip(panels) {
            draw_curve_panel(area, panel, 16)?;
        }
        Ok(())
    })
}

fn render_svg(size: (u32, u32), draw: impl FnOnce(&Area<'_>) -> Result<()>) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }
    Ok(svg)
}

fn draw_panel(area: &Area<'_>, panel: &Panel, font: u32) -> Result<()> {
    let (t0, t1) = TIME_WINDOW;
    let values: Vec<f64> = panel
        .reference
        .iter()
        .chain(&panel.simulation)
        .filter(|&&(t, _)| t >= t0 && t <= t1)
        .map(|&(_, v)| v)
        .collect();

    if panel.log_y {
        let (lo, hi) = panel.y_range.unwrap_or_else(|| log_extent(values.iter().copied()));
        let mut chart = ChartBuilder::on(area)
            .caption(&panel.title, (FONT, font))
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(64)
            .build_cartesian_2d(t0..t1, (lo..hi).log_scale())?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("Time (µs)")
            .y_desc(panel.y_label.as_str())
            .label_style((FONT, font - 4))
            .draw()?;
        draw_panel_series(&mut chart, panel, |v| v > 0.0 && v >= lo && v <= hi, font)
    } else {
        let (lo, hi) = panel.y_range.unwrap_or_else(|| padded_extent(values.iter().copied()));
        let mut chart = ChartBuilder::on(area)
            .caption(&panel.title, (FONT, font))
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(64)
            .build_cartesian_2d(t0..t1, lo..hi)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("Time (µs)")
            .y_desc(panel.y_label.as_str())
            .label_style((FONT, font - 4))
            .draw()?;
        draw_panel_series(&mut chart, panel, |v| v >= lo && v <= hi, font)
    }
}

fn draw_panel_series<'a, 'b: 'a, Y>(
    chart: &mut ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, Y>>,
    panel: &Panel,
    visible: impl Fn(f64) -> bool,
    font: u32,
) -> Result<()>
where
    Y: Ranged<ValueType = f64>,
{
    let (t0, t1) = TIME_WINDOW;
    let keep = |&&(t, v): &&(f64, f64)| t >= t0 && t <= t1 && v.is_finite() && visible(v);

    if let Some(guide) = &panel.guide {
        let color = guide.color;
        let style = color.stroke_width(1);
        let series = if guide.dashed {
            chart.draw_series(DashedLineSeries::new(
                vec![(t0, guide.y), (t1, guide.y)],
                6,
                4,
                style,
            ))?
        } else {
            chart.draw_series(LineSeries::new(vec![(t0, guide.y), (t1, guide.y)], style))?
        };
        if let Some(label) = &guide.label {
            series
                .label(label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x - 10, y), (x + 10, y)], color));
        }
    }

    chart
        .draw_series(
            panel
                .reference
                .iter()
                .filter(keep)
                .map(|&(t, v)| Circle::new((t, v), 3, REFERENCE.stroke_width(1))),
        )?
        .label("1959 Reference")
        .legend(|(x, y)| Circle::new((x, y), 3, REFERENCE.stroke_width(1)));

    chart
        .draw_series(LineSeries::new(
            panel.simulation.iter().filter(keep).copied(),
            SIMULATION.stroke_width(1),
        ))?
        .label("Simulation")
        .legend(|(x, y)| PathElement::new(vec![(x - 10, y), (x + 10, y)], SIMULATION));

    chart
        .configure_series_labels()
        .position(panel.legend.position())
        .background_style(WHITE.mix(0.9))
        .border_style(BLACK)
        .label_font((FONT, font - 4))
        .draw()?;
    Ok(())
}

fn draw_curve_panel(area: &Area<'_>, panel: &CurvePanel, font: u32) -> Result<()> {
    let points: Vec<(f64, f64)> = panel
        .curves
        .iter()
        .flat_map(|c| c.points.iter().copied())
        .collect();
    let (x0, x1) = padded_extent(points.iter().map(|p| p.0));
    let (lo, hi) = padded_extent(
        points
            .iter()
            .map(|p| p.1)
            .chain(panel.zero_line.then_some(0.0)),
    );

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, (FONT, font))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(64)
        .build_cartesian_2d(x0..x1, lo..hi)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(panel.x_label.as_str())
        .y_desc(panel.y_label.as_str())
        .label_style((FONT, font - 4))
        .draw()?;

    if panel.zero_line {
        chart.draw_series(LineSeries::new(
            vec![(x0, 0.0), (x1, 0.0)],
            ZERO_LINE.stroke_width(1),
        ))?;
    }

    for curve in &panel.curves {
        let color = curve.color;
        chart
            .draw_series(LineSeries::new(
                curve.points.iter().copied().filter(|(x, y)| x.is_finite() && y.is_finite()),
                color.stroke_width(2),
            ))?
            .label(curve.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x - 10, y), (x + 10, y)], color));
    }

    if !panel.curves.is_empty() {
        chart
            .configure_series_labels()
            .position(panel.legend.position())
            .background_style(WHITE.mix(0.9))
            .border_style(BLACK)
            .label_font((FONT, font - 5))
            .draw()?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Axis ranges
// ---------------------------------------------------------------------------

/// Finite min/max with 5% headroom; `(0, 1)` when there is nothing to show.
fn padded_extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return (0.0, 1.0);
    }
    if lo == hi {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = 0.05 * (hi - lo);
    (lo - pad, hi + pad)
}

/// Positive finite min/max widened for a log axis.
fn log_extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite() && *v > 0.0)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return (0.1, 10.0);
    }
    (lo / 1.5, hi * 1.5)
}
