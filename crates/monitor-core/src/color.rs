//! Colors and the action sequences played on the actuator.
//!
//! The bridge only understands CIE 1931 chromaticity coordinates, so colors
//! given as linear-light RGB are projected to `xy` before transmission.

use std::time::Duration;

// ── Constants ─────────────────────────────────────────────────────────────────

/// D65 reference white in XYZ, used for the chromaticity of black.
const D65: [f64; 3] = [0.950_47, 1.000_00, 1.088_83];

/// Below this `X + Y + Z` the chromaticity is undefined.
const BLACK_EPSILON: f64 = 1e-14;

// ── Xy ────────────────────────────────────────────────────────────────────────

/// A point in the CIE 1931 chromaticity diagram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Xy {
    pub x: f64,
    pub y: f64,
}

impl Xy {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Chromaticity of the D65 white point.
    pub fn white_point() -> Self {
        let sum = D65[0] + D65[1] + D65[2];
        Self::new(D65[0] / sum, D65[1] / sum)
    }

    /// The `[x, y]` pair as the bridge expects it on the wire.
    pub fn to_wire(self) -> [f32; 2] {
        [self.x as f32, self.y as f32]
    }
}

// ── Color ─────────────────────────────────────────────────────────────────────

/// A color as written in an action table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    /// Linear-light sRGB channels. Only the ratio between channels matters,
    /// so `0.0..=1.0` and `0.0..=255.0` ranges are equivalent.
    LinearRgb { r: f64, g: f64, b: f64 },
    /// Already in the actuator's native chromaticity space.
    Xy(Xy),
}

impl Color {
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Color::LinearRgb { r, g, b }
    }

    /// Project to the actuator's chromaticity space.
    pub fn to_xy(&self) -> Xy {
        match *self {
            Color::Xy(xy) => xy,
            Color::LinearRgb { r, g, b } => {
                let x = 0.412_390_799_265_959_5 * r
                    + 0.357_584_339_383_878 * g
                    + 0.180_480_788_401_834_3 * b;
                let y = 0.212_639_005_871_510_36 * r
                    + 0.715_168_678_767_756 * g
                    + 0.072_192_315_360_733_71 * b;
                let z = 0.019_330_818_715_591_85 * r
                    + 0.119_194_779_794_626 * g
                    + 0.950_532_152_249_660_6 * b;

                let sum = x + y + z;
                if sum.abs() < BLACK_EPSILON {
                    Xy::white_point()
                } else {
                    Xy::new(x / sum, y / sum)
                }
            }
        }
    }
}

// ── ActionStep / ActionSequence ───────────────────────────────────────────────

/// One actuator command: set the group to `color`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionStep {
    pub color: Color,
}

impl From<Color> for ActionStep {
    fn from(color: Color) -> Self {
        Self { color }
    }
}

/// An ordered, finite list of steps, each held for at least `dwell`.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionSequence {
    pub steps: Vec<ActionStep>,
    pub dwell: Duration,
}

impl ActionSequence {
    pub fn new(steps: Vec<ActionStep>, dwell: Duration) -> Self {
        Self { steps, dwell }
    }

    /// Build a sequence from linear RGB triples.
    pub fn from_rgb(colors: &[[f64; 3]], dwell: Duration) -> Self {
        let steps = colors
            .iter()
            .map(|&[r, g, b]| ActionStep::from(Color::rgb(r, g, b)))
            .collect();
        Self { steps, dwell }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
