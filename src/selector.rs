//! Layer selection from modifier buttons
//!
//! A modifier maps a held button to a layer index. The first configured
//! modifier that is held wins; with none held both hubs sit on layer 0.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::board::RadialBoard;
use crate::error::Result;
use crate::hub::Hub;

/// Held button that activates a layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerModifier {
    pub button: String,
    pub layer: usize,
}

/// Ordered modifier bindings
#[derive(Debug, Clone, Default)]
pub struct LayerModifiers {
    bindings: Vec<LayerModifier>,
}

impl LayerModifiers {
    pub fn new(bindings: Vec<LayerModifier>) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &[LayerModifier] {
        &self.bindings
    }

    /// Layer requested by the held buttons
    pub fn resolve(&self, pressed: &BTreeSet<String>) -> usize {
        self.bindings
            .iter()
            .find(|m| pressed.contains(&m.button))
            .map(|m| m.layer)
            .unwrap_or(0)
    }

    /// Resolve the requested layer and select it on both hubs
    pub fn apply(&self, board: &mut RadialBoard, pressed: &BTreeSet<String>) -> Result<usize> {
        let layer = self.resolve(pressed);
        for hub in Hub::ALL {
            board.select_layer(hub, layer)?;
        }
        Ok(layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::AnchorPoint;
    use crate::registry::OptionRegistry;

    fn modifiers() -> LayerModifiers {
        LayerModifiers::new(vec![
            LayerModifier { button: "lt".to_string(), layer: 1 },
            LayerModifier { button: "lb".to_string(), layer: 2 },
        ])
    }

    fn held(buttons: &[&str]) -> BTreeSet<String> {
        buttons.iter().map(|b| b.to_string()).collect()
    }

    #[test]
    fn test_resolve_defaults_to_layer_zero() {
        assert_eq!(modifiers().resolve(&held(&[])), 0);
        assert_eq!(modifiers().resolve(&held(&["a"])), 0);
    }

    #[test]
    fn test_first_held_modifier_wins() {
        assert_eq!(modifiers().resolve(&held(&["lb"])), 2);
        assert_eq!(modifiers().resolve(&held(&["lb", "lt"])), 1);
    }


    #[test]
    fn test_apply_switches_both_hubs() {
        let mut registry = OptionRegistry::new();
        for hub in Hub::ALL {
            for layer in 0..3 {
                let labels = vec![format!("{}{}", hub, layer), format!("{}{}x", hub, layer)];
                registry.build(hub, layer, labels, 50.0, AnchorPoint::ORIGIN).unwrap();
            }
        }
        let mut board = RadialBoard::new(registry).unwrap();

        assert_eq!(modifiers().apply(&mut board, &held(&["lt"])).unwrap(), 1);
        assert_eq!(board.active_layer(Hub::Left), 1);
        assert_eq!(board.active_layer(Hub::Right), 1);

        assert_eq!(modifiers().apply(&mut board, &held(&[])).unwrap(), 0);
        assert_eq!(board.active_layer(Hub::Right), 0);
    }

    #[test]
    fn test_apply_fails_for_missing_layer() {
        let mut registry = OptionRegistry::new();
        for hub in Hub::ALL {
            registry.build(hub, 0, vec!["a".to_string()], 50.0, AnchorPoint::ORIGIN).unwrap();
        }
        let mut board = RadialBoard::new(registry).unwrap();
        assert!(modifiers().apply(&mut board, &held(&["lb"])).is_err());
    }
}
