//! Cycle-accurate test harness for synthesized hardware designs.
//!
//! This crate drives a clocked simulation model from reset to halt and collects its artifacts:
//! 1. **Memory:** Word-addressable system memory with hex image loading and range-clamped binary dumps.
//! 2. **Module:** The two-phase clock interface every simulated design exposes to the harness.
//! 3. **Designs:** Bundled reference designs usable as workloads or for self-test.
//! 4. **Waveform:** Value-change trace recording of a design's declared signals.
//! 5. **Driver:** Reset sequencing, the bounded run loop, halt detection, and shutdown dumping.

/// Common constants and error types.
pub mod common;
/// Run configuration (CLI/JSON options, dump requests).
pub mod config;
/// Bundled reference designs implementing [`SimulatedModule`].
pub mod designs;
/// Simulation driver, module interface, and waveform recording.
pub mod sim;
/// System memory image (load, access, dump).
pub mod memory;

/// Fatal harness error; maps to a non-zero exit status.
pub use crate::common::SimError;
/// Immutable options for a single run; build with `RunConfig::default()` or from JSON.
pub use crate::config::{DumpRequest, RunConfig};
/// Selects and builds a bundled design by name.
pub use crate::designs::DesignKind;
/// Backing store shared between a design and the driver.
pub use crate::memory::{DumpReport, DumpStatus, MemoryImage};
/// Run loop owner; construct with `Driver::new`.
pub use crate::sim::driver::{Driver, RunPhase, RunSummary};
/// Interface consumed by the driver.
pub use crate::sim::module::{Signal, SignalFrame, SimulatedModule};
/// Optional value-change trace sink.
pub use crate::sim::waveform::WaveformRecorder;
