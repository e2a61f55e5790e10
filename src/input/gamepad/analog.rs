//! Analog axis processing (deadzone, gamma, inversion)

use crate::config::AnalogConfig;

/// Process an analog axis value through deadzone and gamma
///
/// # Arguments
/// * `raw_value` - Axis value after radial normalization (-1.0 to 1.0)
/// * `config` - Analog configuration (deadzone, gamma)
///
/// # Returns
/// Processed value in range -1.0 to 1.0, or None if within deadzone
pub fn process_axis(raw_value: f32, config: &AnalogConfig) -> Option<f32> {
    if raw_value.abs() < config.deadzone {
        return None;
    }

    // Map [deadzone..1.0] → [0.0..1.0] so the hub edge stays reachable
    let sign = raw_value.signum();
    let magnitude = raw_value.abs().min(1.0);
    let normalized = (magnitude - config.deadzone) / (1.0 - config.deadzone);

    // gamma > 1.0 gives finer control near the hub center
    let curved = normalized.powf(config.gamma);

    Some(sign * curved)
}

/// Same as [`process_axis`] with the deadzone mapped to 0.0
pub fn process_axis_or_zero(raw_value: f32, config: &AnalogConfig) -> f32 {
    process_axis(raw_value, config).unwrap_or(0.0)
}

/// Apply axis inversion if configured
///
/// # Arguments
/// * `value` - Processed axis value
/// * `axis_id` - Axis identifier ("lx", "ly", "rx", "ry")
/// * `config` - Analog configuration with invert map
pub fn apply_inversion(value: f32, axis_id: &str, config: &AnalogConfig) -> f32 {
    if config.invert.get(axis_id).copied().unwrap_or(false) {
        -value
    } else {
        value
    }
}
