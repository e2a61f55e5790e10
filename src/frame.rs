//! Frame loop - turns input snapshots into emissions
//!
//! One [`FrameLoop::step`] per frame:
//! 1. resolve the layer from the held modifiers and select it on both hubs
//! 2. scale both sticks into hub cursors
//! 3. classify and dwell-tick both hubs
//! 4. tick the virtual keys
//! 5. upper-case single letters while the uppercase modifier is held
//!
//! [`FrameLoop::run`] drives `step` from a tokio interval and handles config
//! reloads and shutdown.

use anyhow::{Context, Result};
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use crate::board::RadialBoard;
use crate::config::{AppConfig, ConfigWatcher, HapticsConfig};
use crate::dwell::DwellTiming;
use crate::hub::Hub;
use crate::input::gamepad::{scale_to_hub, GamepadPoller, InputSnapshot, Rumble, StickPosition};
use crate::keys::VirtualKeySet;
use crate::layout::AnchorPoint;
use crate::registry::hub_center;
use crate::selector::LayerModifiers;
use crate::sink::{apply_case, Emission, SymbolSink};

/// Per-frame pipeline state
pub struct FrameLoop {
    board: RadialBoard,
    modifiers: LayerModifiers,
    uppercase: Option<String>,
    keys: VirtualKeySet,
    stick_timing: DwellTiming,
    centers: [AnchorPoint; 2],
    radius: f64,
    haptics: HapticsConfig,
    /// Stick rest positions read from the first connected snapshot
    rest: Option<[StickPosition; 2]>,
}

impl FrameLoop {
    /// Build the pipeline from a validated config
    pub fn new(config: &AppConfig) -> Result<Self> {
        let registry = config.build_registry().context("Failed to build radial layout")?;
        let board = RadialBoard::new(registry).context("Failed to create radial board")?;

        Ok(Self {
            board,
            modifiers: config.layer_modifiers(),
            uppercase: config.modifiers.uppercase.clone(),
            keys: VirtualKeySet::new(&config.keys, config.timing.keys),
            stick_timing: config.timing.stick,
            centers: Self::centers(config),
            radius: config.layout.radius,
            haptics: config.haptics.clone(),
            rest: None,
        })
    }

    fn centers(config: &AppConfig) -> [AnchorPoint; 2] {
        let (w, h) = (config.display.screen_width, config.display.screen_height);
        [hub_center(Hub::Left, w, h), hub_center(Hub::Right, w, h)]
    }

    pub fn board(&self) -> &RadialBoard {
        &self.board
    }

    /// Apply a reloaded config
    ///
    /// Geometry is rebuilt in place; active layers survive when they still
    /// exist. All dwell state (stick and keys) starts over. On error the
    /// previous pipeline stays untouched.
    pub fn reload(&mut self, config: &AppConfig) -> Result<()> {
        let registry = config.build_registry().context("Failed to build radial layout")?;
        let mut board = self.board.clone();
        board.rebuild(registry).context("Reloaded layout is unusable")?;

        self.board = board;
        self.modifiers = config.layer_modifiers();
        self.uppercase = config.modifiers.uppercase.clone();
        self.keys = VirtualKeySet::new(&config.keys, config.timing.keys);
        self.stick_timing = config.timing.stick;
        self.centers = Self::centers(config);
        self.radius = config.layout.radius;
        self.haptics = config.haptics.clone();

        if let Some(rest) = self.rest {
            self.apply_rest(rest);
        }
        Ok(())
    }

    fn cursor_for(&self, hub: Hub, stick: StickPosition) -> AnchorPoint {
        scale_to_hub(stick, self.centers[hub.index()], self.radius)
    }

    fn apply_rest(&mut self, rest: [StickPosition; 2]) {
        for hub in Hub::ALL {
            let idle = self.cursor_for(hub, rest[hub.index()]);
            self.board.set_idle_anchor(hub, idle);
        }
    }

    /// The resting stick position becomes the idle anchor
    fn calibrate(&mut self, snapshot: &InputSnapshot) {
        if self.rest.is_some() || !snapshot.connected {
            return;
        }
        let rest = [snapshot.left, snapshot.right];
        self.apply_rest(rest);
        self.rest = Some(rest);
        info!(
            "🎯 Idle anchors calibrated: left {}, right {}",
            self.board.active_layer_anchors(Hub::Left).last().copied().unwrap_or_default(),
            self.board.active_layer_anchors(Hub::Right).last().copied().unwrap_or_default()
        );
    }

    /// Run one frame
    ///
    /// # Arguments
    /// * `snapshot` - Controller state for this frame
    /// * `frame_delta_ms` - Time since the previous frame
    ///
    /// # Returns
    /// Emissions in order: left hub, right hub, then virtual keys
    pub fn step(&mut self, snapshot: &InputSnapshot, frame_delta_ms: u32) -> Vec<Emission> {
        self.calibrate(snapshot);

        if let Err(e) = self.modifiers.apply(&mut self.board, &snapshot.pressed) {
            warn!("Layer switch failed, staying on current layer: {}", e);
        }

        let mut emissions = Vec::new();
        for hub in Hub::ALL {
            let cursor = self.cursor_for(hub, snapshot.stick(hub));
            self.board.update_cursor(hub, cursor);
            trace!("{} cursor {} → {:?}", hub, cursor, self.board.classify(hub));

            if let Some(emission) = self.board.tick(hub, frame_delta_ms, &self.stick_timing) {
                emissions.push(emission);
            }
        }
        emissions.extend(self.keys.tick(&snapshot.pressed, frame_delta_ms));

        let uppercase = self
            .uppercase
            .as_deref()
            .is_some_and(|button| snapshot.is_pressed(button));
        if uppercase {
            for emission in &mut emissions {
                emission.label = apply_case(&emission.label, true);
            }
        }

        emissions
    }

    /// Rumble to play for this frame's emissions, if any
    ///
    /// Only fresh confirmations rumble; repeats stay silent.
    pub fn rumble_for(&self, emissions: &[Emission]) -> Option<Rumble> {
        if !self.haptics.enabled || emissions.iter().all(|e| e.repeat) {
            return None;
        }
        Some(Rumble {
            duration_ms: self.haptics.duration_ms,
            magnitude: self.haptics.magnitude,
        })
    }

    /// Drive the pipeline until `shutdown` resolves
    ///
    /// # Arguments
    /// * `config` - Config the loop was built from (frame rate, analog settings)
    /// * `poller` - Gamepad thread handle
    /// * `sink` - Receives every emission
    /// * `watcher` - Hot-reload source, if enabled
    /// * `shutdown` - Future that ends the loop
    pub async fn run(
        mut self,
        config: &AppConfig,
        poller: &GamepadPoller,
        sink: &mut dyn SymbolSink,
        mut watcher: Option<ConfigWatcher>,
        shutdown: impl Future<Output = ()>,
    ) -> Result<()> {
        tokio::pin!(shutdown);

        let mut fps = config.display.fps;
        let mut ticker = frame_ticker(config.frame_interval());
        let mut last_frame = Instant::now();

        info!("🚀 Frame loop running at {} fps, emitting to {}", fps, sink.name());

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = Instant::now();
                    let delta = frame_delta_ms(now.duration_since(last_frame));
                    last_frame = now;

                    let snapshot = poller.snapshot();
                    let emissions = self.step(&snapshot, delta);

                    for emission in &emissions {
                        if let Err(e) = sink.emit(emission) {
                            warn!("Sink {} failed to emit '{}': {}", sink.name(), emission.label, e);
                        }
                    }
                    if let Some(rumble) = self.rumble_for(&emissions) {
                        poller.rumble(rumble);
                    }
                }

                Some(new_config) = next_reload(&mut watcher) => {
                    info!("📝 Configuration file changed, rebuilding layout...");

                    match self.reload(&new_config) {
                        Ok(()) => {
                            poller.set_analog(new_config.analog.clone());
                            if new_config.display.fps != fps {
                                fps = new_config.display.fps;
                                ticker = frame_ticker(new_config.frame_interval());
                                debug!("Frame rate changed to {} fps", fps);
                            }
                            info!("✅ Layout reloaded");
                        }
                        Err(e) => {
                            warn!("⚠️  Failed to apply reloaded config (keeping old layout): {:#}", e);
                        }
                    }
                }

                _ = &mut shutdown => {
                    info!("Shutdown signal received, stopping frame loop");
                    break;
                }
            }
        }

        Ok(())
    }
}

fn frame_ticker(period: Duration) -> Interval {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

/// Elapsed wall time in whole milliseconds, saturating at `u32::MAX`
fn frame_delta_ms(elapsed: Duration) -> u32 {
    u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX)
}

async fn next_reload(watcher: &mut Option<ConfigWatcher>) -> Option<AppConfig> {
    match watcher {
        Some(watcher) => watcher.next_config().await,
        None => std::future::pending().await,
    }
}
