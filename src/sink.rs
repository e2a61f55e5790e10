//! Symbol sinks - where confirmed selections go
//!
//! The core only produces [`Emission`] values. Delivering them to the
//! environment is the sink's job; the console sink prints them, which is
//! enough for testing layouts without touching OS input injection.

use anyhow::Result;
use std::io::Write;
use tracing::{debug, info};

use crate::hub::Hub;

/// Input that produced an emission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Radial selection on a hub
    Hub(Hub),
    /// Virtual key bound to a button (button name)
    Key(String),
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Hub(hub) => write!(f, "{} hub", hub),
            Source::Key(button) => write!(f, "button {}", button),
        }
    }
}

/// A confirmed symbol ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emission {
    pub source: Source,
    pub label: String,
    /// True for key-repeat emissions of a held selection
    pub repeat: bool,
}

impl Emission {
    pub fn new(source: Source, label: impl Into<String>, repeat: bool) -> Self {
        Self {
            source,
            label: label.into(),
            repeat,
        }
    }
}

/// Upper-case single-character labels when the case modifier is held
///
/// Multi-character labels name actions ("space", "backspace") and are
/// passed through unchanged.
pub fn apply_case(label: &str, uppercase: bool) -> String {
    if uppercase && label.chars().count() == 1 {
        label.to_uppercase()
    } else {
        label.to_string()
    }
}

/// Consumer of confirmed symbols
pub trait SymbolSink {
    /// Sink name for logging
    fn name(&self) -> &str;

    /// Deliver one emission
    fn emit(&mut self, emission: &Emission) -> Result<()>;
}

/// Writes each symbol to a line-oriented writer (stdout by default)
pub struct ConsoleSink<W: Write = std::io::Stdout> {
    out: W,
    emitted: u64,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, emitted: 0 }
    }

    /// Number of emissions delivered so far
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SymbolSink for ConsoleSink<W> {
    fn name(&self) -> &str {
        "console"
    }

    fn emit(&mut self, emission: &Emission) -> Result<()> {
        writeln!(self.out, "{}", emission.label)?;
        self.out.flush()?;
        self.emitted += 1;

        if emission.repeat {
            debug!(source = %emission.source, label = %emission.label, "repeat");
        } else {
            info!("⌨️  {} → {}", emission.source, emission.label);
        }
        Ok(())
    }
}
