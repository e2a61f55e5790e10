//! Option layer registry
//!
//! Holds, per hub and per layer index, the ordered option labels and the
//! anchors they bind to. Layers are immutable values: changing geometry
//! produces new layers, and replacing the idle anchor swaps only the trailing
//! anchor while keeping every label on its original position.

use std::collections::BTreeMap;
use std::collections::HashSet;
use tracing::debug;

use crate::classifier::{self, Candidate};
use crate::error::{RadialError, Result};
use crate::hub::Hub;
use crate::layout::{self, AnchorPoint};

/// Screen-space center of a hub
///
/// The left hub sits at a quarter of the screen width, the right hub at three
/// quarters, both vertically centered.
pub fn hub_center(hub: Hub, screen_width: u32, screen_height: u32) -> AnchorPoint {
    let quarter = i32::try_from(screen_width / 4).unwrap_or(i32::MAX);
    let half_height = i32::try_from(screen_height / 2).unwrap_or(i32::MAX);
    match hub {
        Hub::Left => AnchorPoint::new(quarter, half_height),
        Hub::Right => AnchorPoint::new(quarter.saturating_mul(3), half_height),
    }
}

/// One option set for one hub
///
/// `anchors` always holds one more entry than `labels`: the last anchor is
/// the idle position and has no label.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionLayer {
    labels: Vec<String>,
    anchors: Vec<AnchorPoint>,
}

impl OptionLayer {
    /// Lay out `labels` around `center` and append the idle anchor
    ///
    /// An empty label list is accepted and yields a layer holding only the
    /// idle anchor. Such a layer may exist but cannot be activated.
    pub fn new(
        hub: Hub,
        layer: usize,
        labels: Vec<String>,
        radius: f64,
        rotation: f64,
        center: AnchorPoint,
        idle: AnchorPoint,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        for label in &labels {
            if !seen.insert(label.as_str()) {
                return Err(RadialError::DuplicateLabel {
                    hub,
                    layer,
                    label: label.clone(),
                });
            }
        }

        let mut anchors = if labels.is_empty() {
            Vec::with_capacity(1)
        } else {
            layout::generate(labels.len(), radius, rotation, center)?
        };
        anchors.push(idle);

        Ok(Self { labels, anchors })
    }

    /// Copy of this layer with a different idle anchor
    pub fn with_idle(&self, idle: AnchorPoint) -> Self {
        let mut anchors = self.anchors.clone();
        if let Some(last) = anchors.last_mut() {
            *last = idle;
        }
        Self {
            labels: self.labels.clone(),
            anchors,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// All anchors, idle anchor last
    pub fn anchors(&self) -> &[AnchorPoint] {
        &self.anchors
    }

    /// Anchors of the real options only
    pub fn option_anchors(&self) -> &[AnchorPoint] {
        &self.anchors[..self.labels.len()]
    }

    pub fn idle_anchor(&self) -> AnchorPoint {
        self.anchors[self.labels.len()]
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Number of real options
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Geometry and layers of a single hub
#[derive(Debug, Clone)]
struct HubLayers {
    idle: Option<AnchorPoint>,
    layers: BTreeMap<usize, OptionLayer>,
}

impl HubLayers {
    fn new() -> Self {
        Self {
            idle: None,
            layers: BTreeMap::new(),
        }
    }
}

/// Owner of every option layer of both hubs
#[derive(Debug, Clone)]
pub struct OptionRegistry {
    hubs: [HubLayers; 2],
}

impl OptionRegistry {
    pub fn new() -> Self {
        Self {
            hubs: [HubLayers::new(), HubLayers::new()],
        }
    }

    fn hub(&self, hub: Hub) -> &HubLayers {
        &self.hubs[hub.index()]
    }

    fn hub_mut(&mut self, hub: Hub) -> &mut HubLayers {
        &mut self.hubs[hub.index()]
    }

    /// Build (or rebuild) one layer of a hub
    ///
    /// Until [`set_idle_anchor`](Self::set_idle_anchor) is called the idle
    /// anchor defaults to `hub_center`, the resting position of a centered
    /// stick.
    pub fn build(
        &mut self,
        hub: Hub,
        layer_index: usize,
        labels: Vec<String>,
        radius: f64,
        hub_center: AnchorPoint,
    ) -> Result<&OptionLayer> {
        self.build_rotated(hub, layer_index, labels, radius, 0.0, hub_center)
    }

    /// Same as [`build`](Self::build) with an extra rotation in radians
    pub fn build_rotated(
        &mut self,
        hub: Hub,
        layer_index: usize,
        labels: Vec<String>,
        radius: f64,
        rotation: f64,
        hub_center: AnchorPoint,
    ) -> Result<&OptionLayer> {
        let idle = self.hub(hub).idle.unwrap_or(hub_center);
        let layer = OptionLayer::new(hub, layer_index, labels, radius, rotation, hub_center, idle)?;

        debug!(
            "Built {} hub layer {} with {} options",
            hub,
            layer_index,
            layer.len()
        );

        let layers = &mut self.hub_mut(hub).layers;
        layers.insert(layer_index, layer);
        Ok(&layers[&layer_index])
    }

    /// Replace the idle anchor of every layer of `hub`
    ///
    /// Label bindings are untouched; only the trailing anchor changes.
    pub fn set_idle_anchor(&mut self, hub: Hub, point: AnchorPoint) {
        let entry = self.hub_mut(hub);
        entry.idle = Some(point);
        for layer in entry.layers.values_mut() {
            *layer = layer.with_idle(point);
        }
        debug!("Idle anchor of {} hub set to {}", hub, point);
    }

    /// Idle anchor explicitly set for `hub`, if any
    pub fn idle_anchor(&self, hub: Hub) -> Option<AnchorPoint> {
        self.hub(hub).idle
    }

    pub fn layer(&self, hub: Hub, layer_index: usize) -> Option<&OptionLayer> {
        self.hub(hub).layers.get(&layer_index)
    }

    /// Layer lookup that fails loudly for unknown indices
    pub fn get(&self, hub: Hub, layer_index: usize) -> Result<&OptionLayer> {
        self.layer(hub, layer_index).ok_or(RadialError::UnknownLayer {
            hub,
            layer: layer_index,
        })
    }

    /// Layer lookup that also rejects layers without options
    pub fn get_selectable(&self, hub: Hub, layer_index: usize) -> Result<&OptionLayer> {
        let layer = self.get(hub, layer_index)?;
        if layer.is_empty() {
            return Err(RadialError::EmptyLayer {
                hub,
                layer: layer_index,
            });
        }
        Ok(layer)
    }

    /// Built layer indices of `hub`, ascending
    pub fn layer_indices(&self, hub: Hub) -> Vec<usize> {
        self.hub(hub).layers.keys().copied().collect()
    }

    /// Label nearest to `cursor` on the given layer, or idle
    pub fn classify(&self, hub: Hub, layer_index: usize, cursor: AnchorPoint) -> Result<Candidate<&str>> {
        let layer = self.get_selectable(hub, layer_index)?;
        Ok(classifier::classify_label(layer, cursor))
    }
}

impl Default for OptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(s: &str) -> Vec<String> {
        s.chars().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_hub_centers() {
        assert_eq!(hub_center(Hub::Left, 1920, 1080), AnchorPoint::new(480, 540));
        assert_eq!(hub_center(Hub::Right, 1920, 1080), AnchorPoint::new(1440, 540));
    }

    #[test]
    fn test_hub_center_saturates_for_huge_screens() {
        assert_eq!(hub_center(Hub::Left, u32::MAX, u32::MAX).x, 1_073_741_823);
        assert_eq!(hub_center(Hub::Right, u32::MAX, u32::MAX), AnchorPoint::new(i32::MAX, i32::MAX));
    }

    #[test]
    fn test_build_appends_idle_anchor() {
        let mut registry = OptionRegistry::new();
        let center = AnchorPoint::new(100, 100);
        let layer = registry.build(Hub::Left, 0, labels("abc"), 50.0, center).unwrap();

        assert_eq!(layer.len(), 3);
        assert_eq!(layer.anchors().len(), 4);
        assert_eq!(layer.idle_anchor(), center);
        assert_eq!(layer.option_anchors()[0], AnchorPoint::new(100, 150));
    }

    #[test]
    fn test_idle_update_preserves_bindings() {
        let mut registry = OptionRegistry::new();
        let center = AnchorPoint::new(480, 540);
        registry.build(Hub::Left, 0, labels("qwerty"), 175.0, center).unwrap();
        registry.build(Hub::Left, 1, labels("12345"), 175.0, center).unwrap();
        let before: Vec<_> = registry.layer(Hub::Left, 0).unwrap().option_anchors().to_vec();

        registry.set_idle_anchor(Hub::Left, AnchorPoint::new(482, 537));

        let after = registry.layer(Hub::Left, 0).unwrap();
        assert_eq!(after.option_anchors(), before.as_slice());
        assert_eq!(after.labels(), labels("qwerty").as_slice());
        assert_eq!(after.idle_anchor(), AnchorPoint::new(482, 537));
        assert_eq!(
            registry.layer(Hub::Left, 1).unwrap().idle_anchor(),
            AnchorPoint::new(482, 537)
        );
    }

    #[test]
    fn test_idle_anchor_carries_into_later_builds() {
        let mut registry = OptionRegistry::new();
        registry.set_idle_anchor(Hub::Right, AnchorPoint::new(1, 2));
        let layer = registry
            .build(Hub::Right, 0, labels("ab"), 10.0, AnchorPoint::new(50, 50))
            .unwrap();
        assert_eq!(layer.idle_anchor(), AnchorPoint::new(1, 2));
    }

    #[test]
    fn test_rebuilding_one_layer_leaves_others_alone() {
        let mut registry = OptionRegistry::new();
        let center = AnchorPoint::new(100, 100);
        registry.build(Hub::Left, 0, labels("abcd"), 50.0, center).unwrap();
        let untouched = registry.layer(Hub::Left, 0).unwrap().clone();

        registry.build(Hub::Left, 1, labels("xyz"), 50.0, center).unwrap();
        registry.build(Hub::Left, 1, labels("xyzuv"), 50.0, center).unwrap();

        assert_eq!(registry.layer(Hub::Left, 0), Some(&untouched));
        assert_eq!(registry.layer(Hub::Left, 1).unwrap().len(), 5);
    }

    #[test]
    fn test_empty_layer_built_but_not_selectable() {
        let mut registry = OptionRegistry::new();
        let layer = registry
            .build(Hub::Right, 2, vec![], 50.0, AnchorPoint::ORIGIN)
            .unwrap();
        assert!(layer.is_empty());
        assert_eq!(layer.anchors().len(), 1);

        assert_eq!(
            registry.get_selectable(Hub::Right, 2).unwrap_err(),
            RadialError::EmptyLayer { hub: Hub::Right, layer: 2 }
        );
    }

    #[test]
    fn test_duplicate_labels_rejected() {
        let mut registry = OptionRegistry::new();
        let err = registry
            .build(Hub::Left, 0, labels("aba"), 50.0, AnchorPoint::ORIGIN)
            .unwrap_err();
        assert_eq!(
            err,
            RadialError::DuplicateLabel {
                hub: Hub::Left,
                layer: 0,
                label: "a".to_string()
            }
        );
    }

    #[test]
    fn test_classify_by_label() {
        let mut registry = OptionRegistry::new();
        let center = AnchorPoint::new(100, 100);
        registry.build(Hub::Left, 0, labels("abc"), 50.0, center).unwrap();

        assert_eq!(
            registry.classify(Hub::Left, 0, AnchorPoint::new(143, 75)),
            Ok(Candidate::Key("b"))
        );
        assert_eq!(registry.classify(Hub::Left, 0, center), Ok(Candidate::Idle));
    }

    #[test]
    fn test_classify_unknown_layer_fails() {
        let registry = OptionRegistry::new();
        assert_eq!(
            registry.classify(Hub::Left, 4, AnchorPoint::ORIGIN),
            Err(RadialError::UnknownLayer { hub: Hub::Left, layer: 4 })
        );
    }

    #[test]
    fn test_layer_indices_sorted() {
        let mut registry = OptionRegistry::new();
        registry.build(Hub::Left, 3, labels("ab"), 10.0, AnchorPoint::ORIGIN).unwrap();
        registry.build(Hub::Left, 0, labels("cd"), 10.0, AnchorPoint::ORIGIN).unwrap();
        assert_eq!(registry.layer_indices(Hub::Left), vec![0, 3]);
        assert!(registry.layer_indices(Hub::Right).is_empty());
    }
}
