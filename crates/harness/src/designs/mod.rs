//! Bundled designs.
//!
//! Reference implementations of [`SimulatedModule`] that make the harness runnable end to end:
//! 1. **Accumulator:** A single-accumulator processor executing a program from memory.
//! 2. **Counter:** Fills memory with its cycle count and halts when memory is full.
//!
//! Both follow the two-phase discipline: `step_low` only evaluates next-state values and
//! `step_high` latches them.

/// Accumulator processor design.
pub mod accumulator;
/// Memory-filling counter design.
pub mod counter;

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

pub use accumulator::Accumulator;
pub use counter::Counter;

use crate::common::SimError;
use crate::sim::module::SimulatedModule;

/// Selects one of the bundled designs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesignKind {
    /// The accumulator processor.
    #[default]
    #[serde(alias = "acc")]
    Accumulator,
    /// The memory-filling counter.
    Counter,
}

impl DesignKind {
    /// Every bundled design.
    pub const ALL: [Self; 2] = [Self::Accumulator, Self::Counter];

    /// Name accepted on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Accumulator => "accumulator",
            Self::Counter => "counter",
        }
    }

    /// Constructs the design with a memory of `depth` words.
    ///
    /// # Errors
    ///
    /// `SimError::EmptyMemory` if `depth` is 0.
    pub fn build(self, depth: usize) -> Result<Box<dyn SimulatedModule>, SimError> {
        Ok(match self {
            Self::Accumulator => Box::new(Accumulator::new(depth)?),
            Self::Counter => Box::new(Counter::new(depth)?),
        })
    }
}

impl fmt::Display for DesignKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DesignKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "accumulator" | "acc" => Ok(Self::Accumulator),
            "counter" => Ok(Self::Counter),
            _ => Err(SimError::UnknownDesign(s.to_string())),
        }
    }
}
