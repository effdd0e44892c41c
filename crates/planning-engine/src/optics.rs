//! Eyepiece optics calculator
//!
//! - **Magnification**: focal length / eyepiece focal length
//! - **Focal ratio**: focal length / aperture
//! - **Exit pupil**: aperture / magnification (mm)
//! - **Max useful magnification**: 2x per mm of aperture
//!
//! Results are rounded the way they are displayed: one decimal for
//! magnification and focal ratio, two for exit pupil. Rounding works on the
//! exact decimal value of the `f64`, so 1010 / 200 (stored as
//! 5.04999...) gives 5.0, and exact halfway values such as 0.125 round up.
//! The exit pupil is divided by the already-rounded magnification so that
//! printed values stay consistent with each other.

use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Resolving-power rule of thumb, magnification per mm of aperture
pub const MAX_USEFUL_MAG_PER_MM: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OpticsResult {
    pub magnification: f64,
    pub focal_ratio: f64,
    pub exit_pupil_mm: f64,
    pub max_useful_magnification: f64,
}

impl OpticsResult {
    /// Display lines in the order an observer reads them
    pub fn lines(&self) -> [String; 4] {
        [
            format!("Magnification: {:.1}x", self.magnification),
            format!("Focal Ratio: f/{:.1}", self.focal_ratio),
            format!("Exit Pupil: {:.2} mm", self.exit_pupil_mm),
            format!(
                "Estimated Maximum Useful Magnification: {:.0}x",
                self.max_useful_magnification
            ),
        ]
    }
}

impl fmt::Display for OpticsResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Round a non-negative value to `decimals` places, ties upward.
///
/// `{:.N}` formatting rounds the exact binary value but breaks ties to
/// even; a tie is only possible when `value * 2^(decimals + 1)` is an odd
/// integer, in which case the next step up is taken instead.
fn round_to(value: f64, decimals: usize) -> f64 {
    let formatted = format!("{:.*}", decimals, value);
    let mut rounded: f64 = formatted.parse().unwrap_or(value);

    let halves = value * 2f64.powi(decimals as i32 + 1);
    let is_tie = halves.fract() == 0.0 && halves % 2.0 == 1.0;
    if is_tie && rounded < value {
        let step = 10f64.powi(-(decimals as i32));
        rounded = format!("{:.*}", decimals, rounded + step)
            .parse()
            .unwrap_or(rounded);
    }
    rounded
}

fn is_usable(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Derive the optical metrics for a telescope and eyepiece.
///
/// Returns `None` when any input is zero, negative or not finite; there is
/// not enough data to say anything, which is not an error.
pub fn compute_optics(
    aperture_mm: f64,
    focal_length_mm: f64,
    eyepiece_focal_length_mm: f64,
) -> Option<OpticsResult> {
    if !(is_usable(aperture_mm) && is_usable(focal_length_mm) && is_usable(eyepiece_focal_length_mm))
    {
        debug!(
            "Optics skipped: aperture={} focal_length={} eyepiece={}",
            aperture_mm, focal_length_mm, eyepiece_focal_length_mm
        );
        return None;
    }

    let magnification = round_to(focal_length_mm / eyepiece_focal_length_mm, 1);
    let focal_ratio = round_to(focal_length_mm / aperture_mm, 1);
    let max_useful_magnification = (aperture_mm * MAX_USEFUL_MAG_PER_MM).round();
    // A sub-0.05x magnification rounds to zero; there is no meaningful pupil
    if magnification <= 0.0 {
        return None;
    }
    let exit_pupil_mm = round_to(aperture_mm / magnification, 2);

    Some(OpticsResult {
        magnification,
        focal_ratio,
        exit_pupil_mm,
        max_useful_magnification,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reference_instrument() {
        let r = compute_optics(200.0, 1000.0, 10.0).unwrap();
        assert_eq!(r.magnification, 100.0);
        assert_eq!(r.focal_ratio, 5.0);
        assert_eq!(r.exit_pupil_mm, 2.0);
        assert_eq!(r.max_useful_magnification, 400.0);

        let lines = r.lines();
        assert_eq!(lines[0], "Magnification: 100.0x");
        assert_eq!(lines[1], "Focal Ratio: f/5.0");
        assert_eq!(lines[2], "Exit Pupil: 2.00 mm");
        assert_eq!(lines[3], "Estimated Maximum Useful Magnification: 400x");
    }

    #[test]
    fn test_abstains_on_missing_input() {
        assert!(compute_optics(0.0, 1000.0, 10.0).is_none());
        assert!(compute_optics(200.0, 0.0, 10.0).is_none());
        assert!(compute_optics(200.0, 1000.0, 0.0).is_none());
        assert!(compute_optics(-80.0, 400.0, 25.0).is_none());
        assert!(compute_optics(f64::NAN, 400.0, 25.0).is_none());
    }

    #[test]
    fn test_exit_pupil_uses_rounded_magnification() {
        // 1200 / 7 = 171.428..., rounded to 171.4; 127 / 171.4 = 0.7409...
        let r = compute_optics(127.0, 1200.0, 7.0).unwrap();
        assert_eq!(r.magnification, 171.4);
        assert_eq!(r.exit_pupil_mm, 0.74);
        assert_eq!(r.focal_ratio, 9.4);
        assert_eq!(r.max_useful_magnification, 254.0);
    }

    #[test]
    fn test_abstains_when_magnification_rounds_to_zero() {
        // 0.4 / 10 = 0.04x, which rounds to 0.0
        assert!(compute_optics(100.0, 0.4, 10.0).is_none());
        // 0.5 / 10 = 0.05x rounds up to 0.1
        let r = compute_optics(100.0, 0.5, 10.0).unwrap();
        assert_eq!(r.magnification, 0.1);
        assert_eq!(r.exit_pupil_mm, 1000.0);
    }

    #[test]
    fn test_rounds_exact_decimal_value() {
        // 57 / 120 is stored just below 0.475
        let r = compute_optics(57.0, 1200.0, 10.0).unwrap();
        assert_eq!(r.magnification, 120.0);
        assert_eq!(r.exit_pupil_mm, 0.47);

        // 1010 / 200 is stored just below 5.05
        let r = compute_optics(200.0, 1010.0, 10.0).unwrap();
        assert_eq!(r.focal_ratio, 5.0);
        assert_eq!(r.lines()[1], "Focal Ratio: f/5.0");
    }

    #[test]
    fn test_round_to_breaks_exact_ties_upward() {
        assert_eq!(round_to(0.125, 2), 0.13);
        assert_eq!(round_to(0.25, 1), 0.3);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(171.428_571, 1), 171.4);
        assert_eq!(round_to(0.7409, 2), 0.74);
    }

    #[test]
    fn test_small_refractor() {
        let r = compute_optics(80.0, 400.0, 25.0).unwrap();
        assert_eq!(r.magnification, 16.0);
        assert_eq!(r.focal_ratio, 5.0);
        assert_eq!(r.exit_pupil_mm, 5.0);
        assert_eq!(r.max_useful_magnification, 160.0);
    }

    proptest! {
        #[test]
        fn test_positive_inputs_give_positive_results(
            aperture in 20.0f64..500.0,
            focal_length in 200.0f64..4000.0,
            eyepiece in 3.0f64..55.0,
        ) {
            let r = compute_optics(aperture, focal_length, eyepiece).unwrap();
            prop_assert!(r.magnification > 0.0);
            prop_assert!(r.focal_ratio > 0.0);
            prop_assert!(r.exit_pupil_mm > 0.0);
            prop_assert_eq!(r.max_useful_magnification, (aperture * 2.0).round());
        }
    }
}
