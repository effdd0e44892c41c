//! Deterministic star field for the sky preview
//!
//! Point positions come from a sine/cosine hash of the `(month, day)` seed,
//! so the same evening always draws the same sky. Only the bottom part of
//! the canvas is kept free for the horizon band.

use serde::Serialize;

pub const STAR_COUNT: usize = 220;

/// Height of the horizon band drawn across the bottom of the canvas
pub const HORIZON_BAND_PX: f64 = 55.0;

/// Fraction of the canvas height that stars may occupy
const SKY_FRACTION: f64 = 0.85;

const X_STRIDE: f64 = 12.9898;
const X_GAIN: f64 = 43758.5453;
const Y_STRIDE: f64 = 78.233;
const Y_GAIN: f64 = 12345.678;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StarPoint {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Drawn with a warm (yellowish) tint instead of blue-white
    pub warm: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarField {
    pub seed: u32,
    pub width: f64,
    pub height: f64,
    /// Top edge of the horizon band; the ground is drawn from here down
    pub horizon_y: f64,
    pub stars: Vec<StarPoint>,
}

/// Fractional part folded into [0, 1)
fn unit_fraction(value: f64) -> f64 {
    let frac = value.rem_euclid(1.0);
    if frac >= 1.0 {
        0.0
    } else {
        frac
    }
}

pub fn star_seed(month: u32, day: u32) -> u32 {
    month * 100 + day * 7
}

pub fn generate_star_field(month: u32, day: u32, width: f64, height: f64) -> StarField {
    let seed = star_seed(month, day);
    let base = f64::from(seed);

    let stars = (0..STAR_COUNT)
        .map(|i| {
            let fi = i as f64;
            let x = unit_fraction((base + fi * X_STRIDE).sin() * X_GAIN) * width;
            let y = unit_fraction((base + fi * Y_STRIDE).cos() * Y_GAIN) * (height * SKY_FRACTION);
            let radius = if i % 15 == 0 {
                2.2
            } else {
                1.0 + ((i * 7) % 10) as f64 / 15.0
            };

            StarPoint {
                x,
                y,
                radius,
                warm: i % 20 == 0,
            }
        })
        .collect();

    StarField {
        seed,
        width,
        height,
        horizon_y: (height - HORIZON_BAND_PX).max(0.0),
        stars,
    }
}
