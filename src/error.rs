//! Error taxonomy for layout construction and layer selection
//!
//! Every variant is a construction-time or configuration-time failure. Once a
//! board is built, classification and dwell ticks cannot fail.

use thiserror::Error;

use crate::hub::Hub;

/// Result type for radial layout operations
pub type Result<T> = std::result::Result<T, RadialError>;

/// Radial layout error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RadialError {
    /// Polygon request that cannot be laid out (zero sides, bad radius)
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    /// Layer with no options was activated or classified against
    #[error("Layer {layer} of the {hub} hub has no options")]
    EmptyLayer { hub: Hub, layer: usize },

    /// Layer index that was never built for this hub
    #[error("Layer {layer} of the {hub} hub was never built")]
    UnknownLayer { hub: Hub, layer: usize },

    /// Hub name that is neither "left" nor "right"
    #[error("Unknown hub: {0}")]
    UnknownHub(String),

    /// Same label bound twice inside one layer
    #[error("Label '{label}' appears twice in layer {layer} of the {hub} hub")]
    DuplicateLabel { hub: Hub, layer: usize, label: String },
}
