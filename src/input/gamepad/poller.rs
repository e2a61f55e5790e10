//! gilrs polling thread
//!
//! `Gilrs` is not `Send`, so it lives on a dedicated OS thread. The thread
//! drains gilrs events, reads the active gamepad's sticks and buttons, and
//! publishes an [`InputSnapshot`] over a `watch` channel. The frame loop is
//! the only reader and always sees the latest snapshot; stale ones are
//! overwritten, never queued.

use gilrs::ff::{BaseEffect, BaseEffectType, Effect, EffectBuilder, Replay, Ticks};
use gilrs::{Axis, Button, Event, EventType, GamepadId, Gilrs};
use std::collections::BTreeSet;
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use super::buttons::button_name;
use super::snapshot::{InputSnapshot, StickPosition};
use crate::config::AnalogConfig;

const POLL_INTERVAL: Duration = Duration::from_millis(4);

const ALL_BUTTONS: [Button; 17] = [
    Button::South,
    Button::East,
    Button::North,
    Button::West,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::Mode,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
];

/// Rumble request sent to the polling thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rumble {
    pub duration_ms: u32,
    pub magnitude: u16,
}

/// Handle to the polling thread
pub struct GamepadPoller {
    snapshots: watch::Receiver<InputSnapshot>,
    analog_tx: watch::Sender<AnalogConfig>,
    rumble_tx: mpsc::UnboundedSender<Rumble>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl GamepadPoller {
    /// Spawn the polling thread
    ///
    /// # Arguments
    /// * `analog` - Deadzone, gamma and inversion applied to both sticks
    ///
    /// # Returns
    /// Handle whose snapshot starts out disconnected and centered
    pub fn start(analog: AnalogConfig) -> Self {
        let (snapshot_tx, snapshots) = watch::channel(InputSnapshot::default());
        let (analog_tx, analog_rx) = watch::channel(analog);
        let (rumble_tx, rumble_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let thread = std::thread::Builder::new()
            .name("gamepad-poller".to_string())
            .spawn(move || Self::poll_loop(snapshot_tx, analog_rx, rumble_rx, shutdown_rx));

        let thread = match thread {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("Failed to spawn gamepad thread: {}. Running without gamepad.", e);
                None
            }
        };

        Self {
            snapshots,
            analog_tx,
            rumble_tx,
            shutdown_tx: Some(shutdown_tx),
            thread,
        }
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> InputSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Swap analog settings after a config reload
    pub fn set_analog(&self, analog: AnalogConfig) {
        self.analog_tx.send_replace(analog);
    }

    /// Queue a rumble on the active gamepad
    pub fn rumble(&self, rumble: Rumble) {
        if self.rumble_tx.send(rumble).is_err() {
            debug!("Gamepad thread gone, rumble dropped");
        }
    }

    /// Stop the polling thread and wait for it
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.try_send(());
        }
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                warn!("Gamepad thread panicked");
            }
        }
    }

    fn poll_loop(
        snapshot_tx: watch::Sender<InputSnapshot>,
        mut analog_rx: watch::Receiver<AnalogConfig>,
        mut rumble_rx: mpsc::UnboundedReceiver<Rumble>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        let mut gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("🎮 GilRs initialized");
                g
            }
            Err(e) => {
                warn!("Failed to initialize GilRs: {:?}", e);
                return;
            }
        };

        let mut active: Option<GamepadId> = gilrs
            .gamepads()
            .find(|(_, gp)| gp.is_connected())
            .map(|(id, gp)| {
                info!("Using gamepad {:?}: \"{}\"", id, gp.name());
                id
            });
        if active.is_none() {
            info!("⏳ Waiting for a gamepad to connect...");
        }

        let mut analog = analog_rx.borrow_and_update().clone();
        // Playing effects stop when dropped
        let mut _rumble_effect: Option<Effect> = None;

        loop {
            match shutdown_rx.try_recv() {
                Ok(_) | Err(mpsc::error::TryRecvError::Disconnected) => {
                    info!("Gamepad poller shutting down");
                    break;
                }
                Err(mpsc::error::TryRecvError::Empty) => {}
            }

            if analog_rx.has_changed().unwrap_or(false) {
                analog = analog_rx.borrow_and_update().clone();
                debug!("Analog settings updated");
            }

            while let Some(Event { id, event, .. }) = gilrs.next_event() {
                match event {
                    EventType::Connected if active.is_none() => {
                        info!("🎮 Gamepad connected: \"{}\"", gilrs.gamepad(id).name());
                        active = Some(id);
                    }
                    EventType::Disconnected if active == Some(id) => {
                        warn!("Gamepad disconnected");
                        _rumble_effect = None;
                        active = gilrs
                            .gamepads()
                            .find(|(other, gp)| *other != id && gp.is_connected())
                            .map(|(other, _)| other);
                    }
                    _ => {}
                }
            }

            while let Ok(rumble) = rumble_rx.try_recv() {
                if let Some(id) = active {
                    match Self::play_rumble(&mut gilrs, id, rumble) {
                        Ok(effect) => _rumble_effect = Some(effect),
                        Err(e) => debug!("Rumble failed: {}", e),
                    }
                }
            }

            let snapshot = match active {
                Some(id) => Self::read_snapshot(&gilrs, id, &analog),
                None => InputSnapshot::default(),
            };

            snapshot_tx.send_if_modified(|current| {
                if *current != snapshot {
                    *current = snapshot;
                    true
                } else {
                    false
                }
            });

            if snapshot_tx.is_closed() {
                debug!("Snapshot receiver dropped, stopping gamepad loop");
                break;
            }

            std::thread::sleep(POLL_INTERVAL);
        }
    }

    fn read_snapshot(gilrs: &Gilrs, id: GamepadId, analog: &AnalogConfig) -> InputSnapshot {
        let gamepad = gilrs.gamepad(id);

        let left = StickPosition::from_raw(
            gamepad.value(Axis::LeftStickX),
            gamepad.value(Axis::LeftStickY),
            "l",
            analog,
        );
        let right = StickPosition::from_raw(
            gamepad.value(Axis::RightStickX),
            gamepad.value(Axis::RightStickY),
            "r",
            analog,
        );

        let pressed: BTreeSet<String> = ALL_BUTTONS
            .iter()
            .filter(|button| gamepad.is_pressed(**button))
            .filter_map(|button| button_name(*button))
            .map(str::to_string)
            .collect();

        InputSnapshot {
            left,
            right,
            pressed,
            connected: gamepad.is_connected(),
        }
    }

    fn play_rumble(gilrs: &mut Gilrs, id: GamepadId, rumble: Rumble) -> Result<Effect, gilrs::ff::Error> {
        let effect = EffectBuilder::new()
            .add_effect(BaseEffect {
                kind: BaseEffectType::Weak {
                    magnitude: rumble.magnitude,
                },
                scheduling: Replay {
                    play_for: Ticks::from_ms(rumble.duration_ms),
                    ..Default::default()
                },
                envelope: Default::default(),
            })
            .gamepads(&[id])
            .finish(gilrs)?;
        effect.play()?;
        Ok(effect)
    }
}

impl Drop for GamepadPoller {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.try_send(());
        }
    }
}
