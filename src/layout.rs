//! Regular polygon layout
//!
//! Places N anchors evenly around a circle. Index `i` always sits at compass
//! angle `2π·i/N + rotation`, measured from the +Y axis towards +X, so label
//! `i` of an option layer binds to the same position every time the layout
//! is regenerated.
//!
//! # Rounding
//!
//! Coordinates are computed in `f64`, translated by the center, then rounded
//! to the nearest pixel with halves rounded away from zero (see
//! [`round_pixel`]). The same rule is used for cursor scaling so anchors and
//! cursors live on the same integer grid.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use crate::error::{RadialError, Result};

/// Pixel-space anchor or cursor coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AnchorPoint {
    pub x: i32,
    pub y: i32,
}

impl AnchorPoint {
    /// Screen origin
    pub const ORIGIN: AnchorPoint = AnchorPoint { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance, exact for any pair of points
    ///
    /// Each axis difference can reach 2^32, so the sum of squares needs
    /// 65 bits.
    pub fn distance_squared(self, other: AnchorPoint) -> i128 {
        let dx = i128::from(self.x) - i128::from(other.x);
        let dy = i128::from(self.y) - i128::from(other.y);
        dx * dx + dy * dy
    }
}

impl std::fmt::Display for AnchorPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Round a pixel coordinate: nearest integer, halves away from zero
pub fn round_pixel(value: f64) -> i32 {
    value.round() as i32
}

/// Generate `sides` anchors on a circle of `radius` around `center`
///
/// # Arguments
/// * `sides` - Number of anchors, must be positive
/// * `radius` - Circle radius in pixels, must be finite and non-negative
/// * `rotation` - Extra rotation in radians applied to every anchor
/// * `center` - Translation applied before rounding
///
/// # Returns
/// Anchors in index order, or `InvalidLayout` for zero sides or a bad radius
///
/// # Example
/// ```
/// use radial_typer::layout::{generate, AnchorPoint};
///
/// let points = generate(4, 100.0, 0.0, AnchorPoint::ORIGIN).unwrap();
/// assert_eq!(points[0], AnchorPoint::new(0, 100));
/// assert_eq!(points[1], AnchorPoint::new(100, 0));
/// ```
pub fn generate(sides: usize, radius: f64, rotation: f64, center: AnchorPoint) -> Result<Vec<AnchorPoint>> {
    if sides == 0 {
        return Err(RadialError::InvalidLayout(
            "polygon needs at least one side".to_string(),
        ));
    }
    if !radius.is_finite() || radius < 0.0 {
        return Err(RadialError::InvalidLayout(format!(
            "radius must be finite and non-negative, got {}",
            radius
        )));
    }
    if !rotation.is_finite() {
        return Err(RadialError::InvalidLayout(format!(
            "rotation must be finite, got {}",
            rotation
        )));
    }

    let segment = TAU / sides as f64;
    let cx = f64::from(center.x);
    let cy = f64::from(center.y);

    let points = (0..sides)
        .map(|i| {
            let angle = segment * i as f64 + rotation;
            AnchorPoint {
                x: round_pixel(cx + angle.sin() * radius),
                y: round_pixel(cy + angle.cos() * radius),
            }
        })
        .collect();

    Ok(points)
}
