//! Radial board - the per-frame context shared by both hubs
//!
//! Owns the option registry plus, per hub, the active layer, the live cursor
//! and the dwell engine. The frame loop holds exactly one board and passes it
//! by `&mut` into each tick; nothing here is global.

use tracing::{debug, info};

use crate::classifier::{self, Candidate};
use crate::dwell::{DwellEngine, DwellEvent, DwellTiming};
use crate::error::Result;
use crate::hub::Hub;
use crate::layout::AnchorPoint;
use crate::registry::{OptionLayer, OptionRegistry};
use crate::sink::{Emission, Source};


/// Live state of one hub
#[derive(Debug, Clone)]
struct HubState {
    active_index: usize,
    /// Snapshot of the active layer, refreshed on selection and rebuild
    active: OptionLayer,
    cursor: AnchorPoint,
    dwell: DwellEngine<String>,
}

/// Classifier, dwell engines and layer selection for both hubs
#[derive(Debug, Clone)]
pub struct RadialBoard {
    registry: OptionRegistry,
    hubs: [HubState; 2],
}

impl RadialBoard {
    /// Create a board with layer 0 active on both hubs
    ///
    /// Fails if either hub lacks a non-empty layer 0. Cursors start on the
    /// idle anchor.
    pub fn new(registry: OptionRegistry) -> Result<Self> {
        let left = Self::initial_state(&registry, Hub::Left)?;
        let right = Self::initial_state(&registry, Hub::Right)?;

        info!(
            "Radial board ready: left {} layer(s), right {} layer(s)",
            registry.layer_indices(Hub::Left).len(),
            registry.layer_indices(Hub::Right).len()
        );

        Ok(Self {
            registry,
            hubs: [left, right],
        })
    }

    fn initial_state(registry: &OptionRegistry, hub: Hub) -> Result<HubState> {
        let active = registry.get_selectable(hub, 0)?.clone();
        Ok(HubState {
            active_index: 0,
            cursor: active.idle_anchor(),
            active,
            dwell: DwellEngine::new(),
        })
    }

    fn state(&self, hub: Hub) -> &HubState {
        &self.hubs[hub.index()]
    }

    fn state_mut(&mut self, hub: Hub) -> &mut HubState {
        &mut self.hubs[hub.index()]
    }

    pub fn registry(&self) -> &OptionRegistry {
        &self.registry
    }

    /// Swap in freshly built geometry
    ///
    /// Active layers are kept when the new registry still has them, otherwise
    /// the hub falls back to layer 0. An idle anchor set on the old registry
    /// carries over unless the new one sets its own. Dwell state is cleared.
    pub fn rebuild(&mut self, mut registry: OptionRegistry) -> Result<()> {
        for hub in Hub::ALL {
            if registry.idle_anchor(hub).is_none() {
                if let Some(idle) = self.registry.idle_anchor(hub) {
                    registry.set_idle_anchor(hub, idle);
                }
            }
        }

        let mut hubs = [
            Self::initial_state(&registry, Hub::Left)?,
            Self::initial_state(&registry, Hub::Right)?,
        ];

        for hub in Hub::ALL {
            let old = self.state(hub);
            let new = &mut hubs[hub.index()];
            new.cursor = old.cursor;
            if let Ok(layer) = registry.get_selectable(hub, old.active_index) {
                new.active_index = old.active_index;
                new.active = layer.clone();
            }
        }

        self.registry = registry;
        self.hubs = hubs;
        info!("Radial board geometry rebuilt");
        Ok(())
    }

    /// Set the idle anchor of `hub` on every layer, active snapshot included
    pub fn set_idle_anchor(&mut self, hub: Hub, point: AnchorPoint) {
        self.registry.set_idle_anchor(hub, point);
        let state = self.state_mut(hub);
        state.active = state.active.with_idle(point);
    }

    /// Make `layer_index` the active layer of `hub`
    ///
    /// Selecting the layer that is already active is a no-op. Any other
    /// switch clears the hub's dwell state, so a pending selection from the
    /// previous layer can never confirm on the new one.
    pub fn select_layer(&mut self, hub: Hub, layer_index: usize) -> Result<()> {
        if self.state(hub).active_index == layer_index {
            return Ok(());
        }

        let layer = self.registry.get_selectable(hub, layer_index)?.clone();
        let state = self.state_mut(hub);
        debug!("{} hub layer {} → {}", hub, state.active_index, layer_index);
        state.active_index = layer_index;
        state.active = layer;
        state.dwell.reset();
        Ok(())
    }

    pub fn update_cursor(&mut self, hub: Hub, cursor: AnchorPoint) {
        self.state_mut(hub).cursor = cursor;
    }

    /// Current classification of `hub`'s cursor on its active layer
    pub fn classify(&self, hub: Hub) -> Candidate<&str> {
        let state = self.state(hub);
        classifier::classify_label(&state.active, state.cursor)
    }

    /// Classify and run one dwell step for `hub`
    pub fn tick_event(&mut self, hub: Hub, frame_delta_ms: u32, timing: &DwellTiming) -> DwellEvent<String> {
        let candidate = self.classify(hub).map(str::to_string);
        self.state_mut(hub).dwell.tick_event(candidate, frame_delta_ms, timing)
    }

    /// Classify and run one dwell step, returning the emission if confirmed
    pub fn tick(&mut self, hub: Hub, frame_delta_ms: u32, timing: &DwellTiming) -> Option<Emission> {
        match self.tick_event(hub, frame_delta_ms, timing) {
            DwellEvent::Confirmed { key, repeat } => Some(Emission::new(Source::Hub(hub), key, repeat)),
            _ => None,
        }
    }

    pub fn active_layer(&self, hub: Hub) -> usize {
        self.state(hub).active_index
    }

    /// Labels of the active layer, for drawing
    pub fn active_layer_labels(&self, hub: Hub) -> &[String] {
        self.state(hub).active.labels()
    }

    /// Anchors of the active layer, idle anchor last, for drawing
    pub fn active_layer_anchors(&self, hub: Hub) -> &[AnchorPoint] {
        self.state(hub).active.anchors()
    }

    pub fn cursor(&self, hub: Hub) -> AnchorPoint {
        self.state(hub).cursor
    }
}
