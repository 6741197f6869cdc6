use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

use crate::data::model::time_label;

// ---------------------------------------------------------------------------
// Fixed series colours
// ---------------------------------------------------------------------------

pub const REFERENCE: RGBColor = RGBColor(0x1f, 0x77, 0xb4);
pub const SIMULATION: RGBColor = RGBColor(0xd6, 0x27, 0x28);
pub const ZERO_LINE: RGBColor = RGBColor(0x80, 0x80, 0x80);
pub const W_LIMIT: RGBColor = RGBColor(0xff, 0xa5, 0x00);

// ---------------------------------------------------------------------------
// Snapshot ramp
// ---------------------------------------------------------------------------

/// `n` colours running from deep violet to yellow, brightening as they go,
/// so later snapshots read as "hotter".
pub fn generate_ramp(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let f = if n == 1 { 0.5 } else { i as f32 / (n - 1) as f32 };
            let hue = 270.0 + f * 140.0;
            let hsl = Hsl::new(hue, 0.85, 0.30 + 0.30 * f);
            let rgb: Srgb = hsl.into_color();
            RGBColor(
                (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
                (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
                (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
            )
        })
        .collect()
}

/// Maps snapshot times to distinct ramp colours.
#[derive(Debug, Clone)]
pub struct SnapshotColors {
    mapping: Vec<(f64, RGBColor)>,
    default_color: RGBColor,
}

impl SnapshotColors {
    pub fn new(times: &[f64]) -> Self {
        let ramp = generate_ramp(times.len());
        SnapshotColors {
            mapping: times.iter().copied().zip(ramp).collect(),
            default_color: ZERO_LINE,
        }
    }

    pub fn color_for(&self, time: f64) -> RGBColor {
        self.mapping
            .iter()
            .find(|(t, _)| *t == time)
            .map(|&(_, c)| c)
            .unwrap_or(self.default_color)
    }

    /// Legend text for a snapshot, e.g. `t = 100 µs`.
    pub fn label_for(&self, time: f64) -> String {
        format!("t = {} µs", time_label(time))
    }
}
