//! Per-frame gamepad state and stick-to-pixel scaling

use std::collections::BTreeSet;

use super::analog::{apply_inversion, process_axis_or_zero};
use super::normalize::square_to_circle;
use crate::config::AnalogConfig;
use crate::hub::Hub;
use crate::layout::{round_pixel, AnchorPoint};

/// Stick deflection, both axes in [-1.0, 1.0], y pointing up
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StickPosition {
    pub x: f32,
    pub y: f32,
}

impl StickPosition {
    pub const CENTER: StickPosition = StickPosition { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Normalize raw gilrs axes for one stick
    ///
    /// Square range to circle, then per-axis deadzone and gamma, then the
    /// configured inversions. `prefix` is "l" or "r".
    pub fn from_raw(raw_x: f32, raw_y: f32, prefix: &str, config: &AnalogConfig) -> Self {
        let (x, y) = square_to_circle(raw_x, raw_y);
        let x = process_axis_or_zero(x, config);
        let y = process_axis_or_zero(y, config);
        Self {
            x: apply_inversion(x, &format!("{}x", prefix), config),
            y: apply_inversion(y, &format!("{}y", prefix), config),
        }
    }
}

/// Everything the frame loop reads from the controller in one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    pub left: StickPosition,
    pub right: StickPosition,
    /// Config names of the buttons currently held
    pub pressed: BTreeSet<String>,
    /// False until a gamepad has reported in
    pub connected: bool,
}

impl InputSnapshot {
    pub fn stick(&self, hub: Hub) -> StickPosition {
        match hub {
            Hub::Left => self.left,
            Hub::Right => self.right,
        }
    }

    pub fn is_pressed(&self, button: &str) -> bool {
        self.pressed.contains(button)
    }
}

/// Map a stick position to a screen-space cursor around `center`
///
/// Full deflection reaches `radius` pixels. Screen y grows downwards, so
/// pushing the stick up moves the cursor to a smaller y. Coordinates
/// saturate at the `i32` range.
pub fn scale_to_hub(stick: StickPosition, center: AnchorPoint, radius: f64) -> AnchorPoint {
    AnchorPoint::new(
        center.x.saturating_add(round_pixel(f64::from(stick.x) * radius)),
        center.y.saturating_sub(round_pixel(f64::from(stick.y) * radius)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn linear() -> AnalogConfig {
        AnalogConfig {
            deadzone: 0.0,
            gamma: 1.0,
            invert: HashMap::new(),
        }
    }

    #[test]
    fn test_centered_stick_sits_on_center() {
        let center = AnchorPoint::new(480, 540);
        assert_eq!(scale_to_hub(StickPosition::CENTER, center, 175.0), center);
    }

    #[test]
    fn test_stick_up_moves_cursor_up_the_screen() {
        let center = AnchorPoint::new(480, 540);
        assert_eq!(
            scale_to_hub(StickPosition::new(0.0, 1.0), center, 175.0),
            AnchorPoint::new(480, 365)
        );
        assert_eq!(
            scale_to_hub(StickPosition::new(-1.0, 0.0), center, 175.0),
            AnchorPoint::new(305, 540)
        );
    }

    #[test]
    fn test_scaling_rounds_half_away_from_zero() {
        let center = AnchorPoint::ORIGIN;
        assert_eq!(scale_to_hub(StickPosition::new(0.5, 0.0), center, 5.0), AnchorPoint::new(3, 0));
        assert_eq!(scale_to_hub(StickPosition::new(-0.5, 0.0), center, 5.0), AnchorPoint::new(-3, 0));
    }

    #[test]
    fn test_huge_radius_saturates() {
        let center = AnchorPoint::new(480, 540);
        assert_eq!(
            scale_to_hub(StickPosition::new(1.0, -1.0), center, 1e10),
            AnchorPoint::new(i32::MAX, i32::MAX)
        );
        assert_eq!(
            scale_to_hub(StickPosition::new(-1.0, 1.0), center, 1e10),
            AnchorPoint::new(i32::MIN, i32::MIN)
        );
    }

    #[test]
    fn test_from_raw_maps_diagonal_onto_circle() {
        let stick = StickPosition::from_raw(1.0, 1.0, "l", &linear());
        let magnitude = (stick.x * stick.x + stick.y * stick.y).sqrt();
        assert!((magnitude - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_from_raw_applies_inversion_per_stick() {
        let mut config = linear();
        config.invert.insert("ry".to_string(), true);

        let left = StickPosition::from_raw(0.0, 0.5, "l", &config);
        let right = StickPosition::from_raw(0.0, 0.5, "r", &config);
        assert_eq!(left.y, 0.5);
        assert_eq!(right.y, -0.5);
    }

    #[test]
    fn test_snapshot_accessors() {
        let mut snapshot = InputSnapshot {
            left: StickPosition::new(0.1, 0.0),
            ..Default::default()
        };
        snapshot.pressed.insert("lt".to_string());

        assert_eq!(snapshot.stick(Hub::Left).x, 0.1);
        assert_eq!(snapshot.stick(Hub::Right), StickPosition::CENTER);
        assert!(snapshot.is_pressed("lt"));
        assert!(!snapshot.is_pressed("rt"));
    }
}
