//! Virtual keys - buttons and D-pad directions debounced like stick picks
//!
//! Each bound button is a boolean candidate stream: held maps to its label,
//! released maps to idle. The stream goes through its own dwell engine with
//! the key timing, so holding a button auto-repeats exactly like holding a
//! stick on an option.

use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::classifier::Candidate;
use crate::dwell::{DwellEngine, DwellEvent, DwellTiming};
use crate::sink::{Emission, Source};

/// One button bound to a fixed label
#[derive(Debug, Clone)]
pub struct VirtualKey {
    button: String,
    label: String,
    engine: DwellEngine<String>,
}

impl VirtualKey {
    pub fn new(button: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            button: button.into(),
            label: label.into(),
            engine: DwellEngine::new(),
        }
    }

    pub fn button(&self) -> &str {
        &self.button
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Run one dwell step for this key
    pub fn tick(&mut self, pressed: bool, frame_delta_ms: u32, timing: &DwellTiming) -> Option<Emission> {
        let candidate = if pressed {
            Candidate::Key(self.label.clone())
        } else {
            Candidate::Idle
        };

        match self.engine.tick_event(candidate, frame_delta_ms, timing) {
            DwellEvent::Confirmed { key, repeat } => {
                Some(Emission::new(Source::Key(self.button.clone()), key, repeat))
            }
            _ => None,
        }
    }
}

/// All virtual keys sharing one timing
#[derive(Debug, Clone)]
pub struct VirtualKeySet {
    keys: Vec<VirtualKey>,
    timing: DwellTiming,
}

impl VirtualKeySet {
    /// Build keys from `button → label` bindings, in button-name order
    pub fn new(bindings: &BTreeMap<String, String>, timing: DwellTiming) -> Self {
        let keys = bindings
            .iter()
            .map(|(button, label)| VirtualKey::new(button.clone(), label.clone()))
            .collect::<Vec<_>>();
        debug!("{} virtual key(s) bound", keys.len());
        Self { keys, timing }
    }

    pub fn keys(&self) -> &[VirtualKey] {
        &self.keys
    }

    pub fn timing(&self) -> &DwellTiming {
        &self.timing
    }

    /// Tick every key against the set of held buttons
    pub fn tick(&mut self, pressed: &BTreeSet<String>, frame_delta_ms: u32) -> Vec<Emission> {
        let timing = self.timing;
        self.keys
            .iter_mut()
            .filter_map(|key| {
                let held = pressed.contains(key.button());
                key.tick(held, frame_delta_ms, &timing)
            })
            .collect()
    }
}
