//! Stick normalization for gilrs values
//!
//! gilrs reports each axis independently in [-1.0, 1.0], so a stick sweeps a
//! square. The radial board expects a circle: a fully deflected stick should
//! land on the hub radius whatever its direction.

/// Map square input to circular output
///
/// Points on the edge of the square map to the edge of the circle; interior
/// points scale proportionally.
///
/// Formula: scale = max(|x|, |y|) / magnitude
///
/// # Examples
/// - Full up (0, 1) → (0, 1)
/// - Diagonal (1, 1) → (0.707, 0.707)
/// - Half diagonal (0.5, 0.5) → (0.354, 0.354)
///
/// # Returns
/// * `(x, y)` - Values mapped to the unit disc
pub fn square_to_circle(x: f32, y: f32) -> (f32, f32) {
    let magnitude = (x * x + y * y).sqrt();

    if magnitude < 0.0001 {
        return (0.0, 0.0);
    }

    let max_axis = x.abs().max(y.abs());
    let scale = max_axis / magnitude;

    (x * scale, y * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_to_circle_cardinal() {
        let (x, y) = square_to_circle(0.0, 1.0);
        assert!((x - 0.0).abs() < 0.001);
        assert!((y - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_square_to_circle_diagonal() {
        let (x, y) = square_to_circle(1.0, 1.0);
        let mag = (x * x + y * y).sqrt();
        assert!((mag - 1.0).abs() < 0.01, "Diagonal magnitude was {}", mag);
    }

    #[test]
    fn test_square_to_circle_center() {
        assert_eq!(square_to_circle(0.0, 0.0), (0.0, 0.0));
    }
}
