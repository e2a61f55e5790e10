//! Nearest-neighbor classification of a cursor against an option layer
//!
//! A linear scan over integer squared distances. Option counts are in the
//! tens, and the scan gives an exact, index-ordered tie-break for free: the
//! first anchor reaching the minimum distance wins.

use crate::layout::AnchorPoint;
use crate::registry::OptionLayer;

/// Classification result: either a real option or the idle sentinel
///
/// The idle sentinel is a variant, not a label, so it can never collide with
/// an option that happens to be spelled "IDLE".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Candidate<K> {
    /// Cursor is nearest to the rest position
    Idle,
    /// Cursor is nearest to a real option
    Key(K),
}

impl<K> Candidate<K> {
    pub fn is_idle(&self) -> bool {
        matches!(self, Candidate::Idle)
    }

    /// The key, or `None` for idle
    pub fn key(self) -> Option<K> {
        match self {
            Candidate::Idle => None,
            Candidate::Key(k) => Some(k),
        }
    }

    pub fn as_ref(&self) -> Candidate<&K> {
        match self {
            Candidate::Idle => Candidate::Idle,
            Candidate::Key(k) => Candidate::Key(k),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(K) -> U) -> Candidate<U> {
        match self {
            Candidate::Idle => Candidate::Idle,
            Candidate::Key(k) => Candidate::Key(f(k)),
        }
    }
}

/// Index of the anchor nearest to `cursor`
///
/// Returns `None` only for an empty slice. On exact ties the lowest index
/// wins.
pub fn nearest_anchor(anchors: &[AnchorPoint], cursor: AnchorPoint) -> Option<usize> {
    let mut best: Option<(usize, i128)> = None;

    for (index, anchor) in anchors.iter().enumerate() {
        let distance = anchor.distance_squared(cursor);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((index, distance)),
        }
    }

    best.map(|(index, _)| index)
}

/// Classify `cursor` against a layer's anchors, idle anchor included
///
/// Returns the option index, or `Candidate::Idle` when the trailing idle
/// anchor is nearest. A layer without options always classifies as idle.
pub fn classify(layer: &OptionLayer, cursor: AnchorPoint) -> Candidate<usize> {
    match nearest_anchor(layer.anchors(), cursor) {
        Some(index) if index < layer.len() => Candidate::Key(index),
        _ => Candidate::Idle,
    }
}

/// Classify `cursor` and resolve the option index to its label
pub fn classify_label(layer: &OptionLayer, cursor: AnchorPoint) -> Candidate<&str> {
    match classify(layer, cursor) {
        Candidate::Key(index) => layer.label(index).map_or(Candidate::Idle, Candidate::Key),
        Candidate::Idle => Candidate::Idle,
    }
}
