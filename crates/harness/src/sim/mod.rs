//! Simulation control.
//!
//! Provides the interface a simulated design exposes, the optional waveform recorder,
//! and the driver that sequences reset, clocking, halt detection, and shutdown.

/// Run loop and phase sequencing.
pub mod driver;
/// Interface every simulated design implements.
pub mod module;
/// Value-change trace recording.
pub mod waveform;
