//! Gamepad input using gilrs
//!
//! Sticks drive the two hub cursors, buttons drive layer modifiers, the
//! uppercase modifier and virtual keys.

pub mod analog;
pub mod buttons;
pub mod normalize;
pub mod poller;
pub mod snapshot;

pub use poller::{GamepadPoller, Rumble};
pub use snapshot::{scale_to_hub, InputSnapshot, StickPosition};
