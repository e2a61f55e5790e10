//! radial-typer - two-stick radial text entry
//!
//! Each analog stick steers a cursor around its own hub of options. The
//! option nearest to the cursor becomes the candidate; holding it long
//! enough confirms it, holding longer repeats it.
//!
//! The core (`layout`, `registry`, `classifier`, `dwell`, `selector`,
//! `board`) is synchronous and frame-driven. `input`, `config` and `frame`
//! connect it to a gamepad, a YAML file and a tokio frame timer.

pub mod board;
pub mod classifier;
pub mod config;
pub mod dwell;
pub mod error;
pub mod frame;
pub mod hub;
pub mod input;
pub mod keys;
pub mod layout;
pub mod registry;
pub mod selector;
pub mod sink;

pub use board::RadialBoard;
pub use classifier::Candidate;
pub use error::{RadialError, Result};
pub use hub::Hub;
pub use layout::AnchorPoint;
