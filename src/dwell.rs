//! Dwell/repeat confirmation engine
//!
//! Converts a per-frame, possibly flickering candidate stream into debounced
//! emissions. A candidate must stay unchanged for more than `dwell_ms` before
//! it is confirmed; while it keeps being held it re-emits every time more
//! than `repeat_ms` has accumulated again.
//!
//! # Frame accounting
//!
//! A frame's delta is credited to the candidate observed on that frame. The
//! frame on which the candidate changes starts its timer at that frame's
//! delta and never emits. Every later frame adds its delta first and then
//! compares against the threshold with a strict `>`:
//!
//! ```text
//! dwell_ms = 200, delta = 50:
//!   frame     1     2     3     4     5
//!   elapsed  50   100   150   200   250
//!   emits     -     -     -     -   yes
//! ```
//!
//! After a confirmation the timer restarts at zero and the threshold switches
//! to `repeat_ms` until the candidate changes again.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::classifier::Candidate;

/// Dwell and repeat thresholds for one input source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DwellTiming {
    /// Hold time before the first confirmation
    #[serde(default = "default_dwell_ms")]
    pub dwell_ms: u32,
    /// Hold time between repeats once confirmed
    #[serde(default = "default_repeat_ms")]
    pub repeat_ms: u32,
}

impl DwellTiming {
    pub const fn new(dwell_ms: u32, repeat_ms: u32) -> Self {
        Self { dwell_ms, repeat_ms }
    }
}

impl Default for DwellTiming {
    fn default() -> Self {
        Self::new(default_dwell_ms(), default_repeat_ms())
    }
}

fn default_dwell_ms() -> u32 { 220 }
fn default_repeat_ms() -> u32 { 500 }

/// What a single tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DwellEvent<K> {
    /// Candidate differs from the previous frame, timer restarted
    Changed,
    /// Same candidate, threshold not yet exceeded
    Pending { elapsed_ms: u32 },
    /// Threshold exceeded for a real key
    Confirmed { key: K, repeat: bool },
    /// Threshold exceeded while idle; nothing is emitted
    IdleElapsed,
}

impl<K> DwellEvent<K> {
    /// Key to emit, if any
    pub fn into_key(self) -> Option<K> {
        match self {
            DwellEvent::Confirmed { key, .. } => Some(key),
            _ => None,
        }
    }
}

/// Dwell state for one candidate stream
#[derive(Debug, Clone)]
pub struct DwellEngine<K> {
    last_candidate: Option<Candidate<K>>,
    elapsed_ms: u32,
    confirmed_once: bool,
}

impl<K: Clone + PartialEq> DwellEngine<K> {
    pub fn new() -> Self {
        Self {
            last_candidate: None,
            elapsed_ms: 0,
            confirmed_once: false,
        }
    }

    /// Advance by one frame and return the key to emit, if any
    pub fn tick(&mut self, candidate: Candidate<K>, frame_delta_ms: u32, timing: &DwellTiming) -> Option<K> {
        self.tick_event(candidate, frame_delta_ms, timing).into_key()
    }

    /// Advance by one frame and report what happened
    pub fn tick_event(
        &mut self,
        candidate: Candidate<K>,
        frame_delta_ms: u32,
        timing: &DwellTiming,
    ) -> DwellEvent<K> {
        if self.last_candidate.as_ref() != Some(&candidate) {
            self.last_candidate = Some(candidate);
            self.elapsed_ms = frame_delta_ms;
            self.confirmed_once = false;
            return DwellEvent::Changed;
        }

        self.elapsed_ms = self.elapsed_ms.saturating_add(frame_delta_ms);

        let threshold = if self.confirmed_once {
            timing.repeat_ms
        } else {
            timing.dwell_ms
        };

        if self.elapsed_ms <= threshold {
            trace!(elapsed_ms = self.elapsed_ms, threshold, "dwell pending");
            return DwellEvent::Pending {
                elapsed_ms: self.elapsed_ms,
            };
        }

        let repeat = self.confirmed_once;
        self.confirmed_once = true;
        self.elapsed_ms = 0;

        match candidate {
            Candidate::Key(key) => DwellEvent::Confirmed { key, repeat },
            Candidate::Idle => DwellEvent::IdleElapsed,
        }
    }

    /// Forget the current candidate and timers
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn last_candidate(&self) -> Option<&Candidate<K>> {
        self.last_candidate.as_ref()
    }

    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    pub fn confirmed_once(&self) -> bool {
        self.confirmed_once
    }
}

impl<K: Clone + PartialEq> Default for DwellEngine<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMING: DwellTiming = DwellTiming::new(220, 500);

    fn key(k: &'static str) -> Candidate<&'static str> {
        Candidate::Key(k)
    }

    fn run(engine: &mut DwellEngine<&'static str>, candidate: Candidate<&'static str>, frames: usize, delta: u32) -> Vec<Option<&'static str>> {
        (0..frames)
            .map(|_| engine.tick(candidate, delta, &TIMING))
            .collect()
    }

    #[test]
    fn test_initial_state() {
        let engine: DwellEngine<&str> = DwellEngine::new();
        assert_eq!(engine.last_candidate(), None);
        assert_eq!(engine.elapsed_ms(), 0);
        assert!(!engine.confirmed_once());
    }

    #[test]
    fn test_dwell_emits_when_threshold_first_exceeded() {
        let mut engine = DwellEngine::new();
        assert_eq!(run(&mut engine, key("a"), 3, 100), vec![None, None, Some("a")]);
    }

    #[test]
    fn test_exact_threshold_does_not_emit() {
        let mut engine = DwellEngine::new();
        assert_eq!(engine.tick(key("a"), 220, &TIMING), None);

        let mut engine = DwellEngine::new();
        assert_eq!(run(&mut engine, key("a"), 2, 110), vec![None, None]);
        assert_eq!(engine.elapsed_ms(), 220);
        assert_eq!(engine.tick(key("a"), 1, &TIMING), Some("a"));
    }

    #[test]
    fn test_change_frame_never_emits() {
        let mut engine = DwellEngine::new();
        assert_eq!(engine.tick_event(key("a"), 1000, &TIMING), DwellEvent::Changed);
        assert_eq!(engine.elapsed_ms(), 1000);
        assert_eq!(engine.tick(key("a"), 0, &TIMING), Some("a"));
    }

    #[test]
    fn test_flicker_restarts_timer() {
        let mut engine = DwellEngine::new();
        assert_eq!(engine.tick(key("a"), 100, &TIMING), None);
        assert_eq!(engine.tick(key("a"), 100, &TIMING), None);
        assert_eq!(engine.tick(key("b"), 100, &TIMING), None);
        assert_eq!(engine.tick(key("a"), 100, &TIMING), None);
        assert_eq!(engine.tick(key("a"), 100, &TIMING), None);
        // Fresh dwell since the second "a": 100 + 100 + 100 = 300 > 220
        assert_eq!(engine.tick(key("a"), 100, &TIMING), Some("a"));
    }

    #[test]
    fn test_repeat_cadence_uses_repeat_threshold() {
        let mut engine = DwellEngine::new();
        let emitted = run(&mut engine, key("a"), 3, 100);
        assert_eq!(emitted.last(), Some(&Some("a")));

        // 220 ms after the confirmation is not enough for a repeat
        assert_eq!(run(&mut engine, key("a"), 3, 100), vec![None, None, None]);

        // 500 ms is the boundary, 600 ms exceeds it
        assert_eq!(run(&mut engine, key("a"), 2, 100), vec![None, None]);
        assert_eq!(engine.tick(key("a"), 100, &TIMING), Some("a"));

        // And the next repeat needs another full repeat period
        assert_eq!(run(&mut engine, key("a"), 5, 100), vec![None; 5]);
        assert_eq!(engine.tick(key("a"), 100, &TIMING), Some("a"));
    }

    #[test]
    fn test_repeat_events_are_flagged() {
        let mut engine = DwellEngine::new();
        let timing = DwellTiming::new(10, 10);
        engine.tick(key("a"), 20, &timing);
        assert_eq!(
            engine.tick_event(key("a"), 20, &timing),
            DwellEvent::Confirmed { key: "a", repeat: false }
        );
        assert_eq!(
            engine.tick_event(key("a"), 20, &timing),
            DwellEvent::Confirmed { key: "a", repeat: true }
        );
    }

    #[test]
    fn test_interruption_restores_full_dwell() {
        let mut engine = DwellEngine::new();
        run(&mut engine, key("a"), 3, 100);
        assert!(engine.confirmed_once());

        // One idle frame resets the repeat state
        assert_eq!(engine.tick(Candidate::Idle, 16, &TIMING), None);
        assert!(!engine.confirmed_once());

        // Back on "a": full 220 dwell, not the 500 repeat
        assert_eq!(run(&mut engine, key("a"), 3, 100), vec![None, None, Some("a")]);
    }

    #[test]
    fn test_idle_never_emits_but_consumes_threshold() {
        let mut engine: DwellEngine<&str> = DwellEngine::new();
        for _ in 0..50 {
            assert_eq!(engine.tick(Candidate::Idle, 100, &TIMING), None);
        }

        let mut engine: DwellEngine<&str> = DwellEngine::new();
        engine.tick(Candidate::Idle, 100, &TIMING);
        engine.tick(Candidate::Idle, 100, &TIMING);
        assert_eq!(engine.tick_event(Candidate::Idle, 100, &TIMING), DwellEvent::IdleElapsed);
        assert_eq!(engine.elapsed_ms(), 0);
        assert!(engine.confirmed_once());
    }

    #[test]
    fn test_idle_to_key_starts_from_zero() {
        let mut engine = DwellEngine::new();
        run(&mut engine, Candidate::Idle, 10, 100);
        assert_eq!(engine.tick(key("a"), 100, &TIMING), None);
        assert_eq!(engine.elapsed_ms(), 100);
    }

    #[test]
    fn test_end_to_end_frame_trace() {
        let timing = DwellTiming::new(200, 500);
        let mut engine = DwellEngine::new();
        let emitted: Vec<_> = (0..5).map(|_| engine.tick(key("b"), 50, &timing)).collect();
        assert_eq!(emitted, vec![None, None, None, None, Some("b")]);
    }

    #[test]
    fn test_elapsed_saturates() {
        let mut engine = DwellEngine::new();
        let timing = DwellTiming::new(u32::MAX, u32::MAX);
        engine.tick(key("a"), u32::MAX, &timing);
        assert_eq!(engine.tick(key("a"), u32::MAX, &timing), None);
        assert_eq!(engine.elapsed_ms(), u32::MAX);
    }

    #[test]
    fn test_reset() {
        let mut engine = DwellEngine::new();
        engine.tick(key("a"), 100, &TIMING);
        engine.reset();
        assert_eq!(engine.last_candidate(), None);
        assert_eq!(engine.elapsed_ms(), 0);
    }
}
