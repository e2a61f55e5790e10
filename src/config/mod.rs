//! Configuration management for radial-typer
//!
//! Handles loading, validating and hot-reloading the YAML configuration.

pub mod watcher;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;
use tokio::fs;

use crate::dwell::DwellTiming;
use crate::error::RadialError;
use crate::hub::Hub;
use crate::input::gamepad::buttons::is_known_button;
use crate::registry::{hub_center, OptionRegistry};
use crate::selector::{LayerModifier, LayerModifiers};

pub use watcher::ConfigWatcher;

/// Largest accepted screen side in pixels
const MAX_SCREEN_SIZE: u32 = 1 << 16;

/// Largest accepted hub radius in pixels; hub center ± radius stays far
/// inside the `i32` pixel range
const MAX_RADIUS: f64 = 65_536.0;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub display: DisplayConfig,
    pub layout: LayoutConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub modifiers: ModifierConfig,
    /// Virtual keys: button name → emitted label
    #[serde(default)]
    pub keys: BTreeMap<String, String>,
    #[serde(default)]
    pub analog: AnalogConfig,
    #[serde(default)]
    pub haptics: HapticsConfig,
}

/// Screen geometry and frame rate
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
    #[serde(default = "default_screen_width")]
    pub screen_width: u32,
    #[serde(default = "default_screen_height")]
    pub screen_height: u32,
    #[serde(default = "default_fps")]
    pub fps: u32,
}

/// Radial option layout for both hubs
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LayoutConfig {
    /// Hub radius in pixels; also the pixel reach of a fully deflected stick
    #[serde(default = "default_radius")]
    pub radius: f64,
    /// Rotation applied to every layer, in degrees
    #[serde(default)]
    pub rotation_deg: f64,
    pub left: HubLayoutConfig,
    pub right: HubLayoutConfig,
}

/// Layers of one hub, layer index = position in the list
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HubLayoutConfig {
    pub layers: Vec<LayerSpec>,
}

/// Option labels of a layer: either a string of single-character labels or
/// an explicit list
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum LayerSpec {
    Chars(String),
    Labels(Vec<String>),
}

impl LayerSpec {
    pub fn labels(&self) -> Vec<String> {
        match self {
            LayerSpec::Chars(s) => s.chars().map(|c| c.to_string()).collect(),
            LayerSpec::Labels(labels) => labels.clone(),
        }
    }
}

/// Dwell/repeat thresholds per input source
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimingConfig {
    #[serde(default)]
    pub stick: DwellTiming,
    #[serde(default = "default_key_timing")]
    pub keys: DwellTiming,
}

/// Modifier buttons
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ModifierConfig {
    /// Held button → layer index, first held wins
    #[serde(default)]
    pub layers: Vec<LayerModifier>,
    /// Held button that upper-cases single-letter emissions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uppercase: Option<String>,
}

/// Analog stick configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalogConfig {
    #[serde(default = "default_deadzone")]
    pub deadzone: f32,
    #[serde(default = "default_gamma")]
    pub gamma: f32,
    /// Axis id ("lx", "ly", "rx", "ry") → inverted
    #[serde(default)]
    pub invert: HashMap<String, bool>,
}

/// Rumble on first confirmation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HapticsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_rumble_ms")]
    pub duration_ms: u32,
    #[serde(default = "default_rumble_magnitude")]
    pub magnitude: u16,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
            fps: default_fps(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            stick: DwellTiming::default(),
            keys: default_key_timing(),
        }
    }
}

impl Default for AnalogConfig {
    fn default() -> Self {
        Self {
            deadzone: default_deadzone(),
            gamma: default_gamma(),
            invert: HashMap::new(),
        }
    }
}

impl Default for HapticsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            duration_ms: default_rumble_ms(),
            magnitude: default_rumble_magnitude(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file with validation
    pub async fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path))?;

        Self::from_yaml(&contents).with_context(|| format!("Invalid config file: {}", path))
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: AppConfig = serde_yaml::from_str(contents).context("Failed to parse YAML config")?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, path: &str) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .await
            .with_context(|| format!("Failed to write config file: {}", path))?;

        Ok(())
    }

    /// Hub layout by hub
    pub fn hub_layout(&self, hub: Hub) -> &HubLayoutConfig {
        match hub {
            Hub::Left => &self.layout.left,
            Hub::Right => &self.layout.right,
        }
    }

    /// Time budget of one frame at the configured rate
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.display.fps.max(1)))
    }

    /// Build the option registry for both hubs
    ///
    /// Idle anchors default to the hub centers until the input source reports
    /// the stick rest positions.
    pub fn build_registry(&self) -> std::result::Result<OptionRegistry, RadialError> {
        let mut registry = OptionRegistry::new();
        let rotation = self.layout.rotation_deg.to_radians();

        for hub in Hub::ALL {
            let center = hub_center(hub, self.display.screen_width, self.display.screen_height);
            for (index, spec) in self.hub_layout(hub).layers.iter().enumerate() {
                registry.build_rotated(hub, index, spec.labels(), self.layout.radius, rotation, center)?;
            }
        }

        Ok(registry)
    }

    pub fn layer_modifiers(&self) -> LayerModifiers {
        LayerModifiers::new(self.modifiers.layers.clone())
    }

    /// Validate configuration for correctness and consistency
    pub fn validate(&self) -> Result<()> {
        if self.display.fps == 0 {
            anyhow::bail!("display.fps must be at least 1");
        }
        for (name, size) in [
            ("screen_width", self.display.screen_width),
            ("screen_height", self.display.screen_height),
        ] {
            if size == 0 || size > MAX_SCREEN_SIZE {
                anyhow::bail!("display.{} must be in 1..={}, got {}", name, MAX_SCREEN_SIZE, size);
            }
        }
        if !self.layout.radius.is_finite() || self.layout.radius <= 0.0 || self.layout.radius > MAX_RADIUS {
            anyhow::bail!(
                "layout.radius must be a positive number up to {}, got {}",
                MAX_RADIUS,
                self.layout.radius
            );
        }
        if !self.layout.rotation_deg.is_finite() {
            anyhow::bail!("layout.rotation_deg must be finite");
        }

        for hub in Hub::ALL {
            let layers = &self.hub_layout(hub).layers;
            if layers.is_empty() {
                anyhow::bail!("The {} hub needs at least one layer", hub);
            }
        }

        let registry = self.build_registry().context("Invalid layout")?;

        // Layer 0 is active at startup; every modifier layer can be activated
        let mut reachable = vec![0];
        reachable.extend(self.modifiers.layers.iter().map(|m| m.layer));
        for layer in reachable {
            for hub in Hub::ALL {
                registry
                    .get_selectable(hub, layer)
                    .with_context(|| format!("Layer {} is reachable but not usable", layer))?;
            }
        }

        let mut modifier_buttons = HashSet::new();
        for modifier in &self.modifiers.layers {
            self.validate_button(&modifier.button)
                .with_context(|| format!("Invalid layer modifier for layer {}", modifier.layer))?;
            if !modifier_buttons.insert(modifier.button.as_str()) {
                anyhow::bail!("Button '{}' is bound to more than one layer", modifier.button);
            }
        }
        if let Some(button) = &self.modifiers.uppercase {
            self.validate_button(button).context("Invalid uppercase modifier")?;
            if !modifier_buttons.insert(button.as_str()) {
                anyhow::bail!("Button '{}' cannot be both a layer and the uppercase modifier", button);
            }
        }

        for (button, label) in &self.keys {
            self.validate_button(button)
                .with_context(|| format!("Invalid key binding for '{}'", label))?;
            if modifier_buttons.contains(button.as_str()) {
                anyhow::bail!("Button '{}' is a modifier and cannot also be a key", button);
            }
            if label.is_empty() {
                anyhow::bail!("Key binding for button '{}' has an empty label", button);
            }
        }

        if !(0.0..1.0).contains(&self.analog.deadzone) {
            anyhow::bail!("analog.deadzone must be in [0, 1), got {}", self.analog.deadzone);
        }
        if !(self.analog.gamma > 0.0) {
            anyhow::bail!("analog.gamma must be positive, got {}", self.analog.gamma);
        }
        for axis in self.analog.invert.keys() {
            if !matches!(axis.as_str(), "lx" | "ly" | "rx" | "ry") {
                anyhow::bail!("Unknown axis '{}' in analog.invert (expected lx, ly, rx, ry)", axis);
            }
        }

        Ok(())
    }

    fn validate_button(&self, button: &str) -> Result<()> {
        if !is_known_button(button) {
            anyhow::bail!("Unknown button name '{}'", button);
        }
        Ok(())
    }
}

// Default value functions
fn default_screen_width() -> u32 { 1920 }
fn default_screen_height() -> u32 { 1080 }
fn default_fps() -> u32 { 60 }
fn default_radius() -> f64 { 175.0 }
fn default_key_timing() -> DwellTiming { DwellTiming::new(220, 500) }
fn default_deadzone() -> f32 { 0.02 }
fn default_gamma() -> f32 { 1.0 }
fn default_true() -> bool { true }
fn default_rumble_ms() -> u32 { 60 }
fn default_rumble_magnitude() -> u16 { 0xffff }
