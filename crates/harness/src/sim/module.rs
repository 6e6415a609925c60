//! Simulated module interface.
//!
//! This module defines the `SimulatedModule` trait through which the driver controls a design. It provides:
//! 1. **Lifecycle:** One-time `init` before any clocking.
//! 2. **Clocking:** The two half-cycles `step_low` and `step_high`, always called in that order.
//! 3. **Probes:** The halt output, a printable state line, and declared waveform signals.
//! 4. **Memory:** Access to the design-owned memory image for load and dump.
//!
//! Any backend that implements these operations can be driven without changing the driver.

use crate::memory::MemoryImage;

/// A signal a design exposes to the waveform recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    /// Name inside the trace scope.
    pub name: &'static str,
    /// Width in bits (1..=64).
    pub width: u32,
}

impl Signal {
    /// Declares a signal of the given width.
    pub const fn new(name: &'static str, width: u32) -> Self {
        Self { name, width }
    }
}

/// One sample of every declared signal, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalFrame {
    values: Vec<u64>,
}

impl SignalFrame {
    /// Creates an empty frame with room for `signals` values.
    pub fn with_capacity(signals: usize) -> Self {
        Self {
            values: Vec::with_capacity(signals),
        }
    }

    /// Appends the value of the next declared signal.
    pub fn push(&mut self, value: u64) {
        self.values.push(value);
    }

    /// Appends a single-bit value.
    pub fn push_bit(&mut self, bit: bool) {
        self.values.push(u64::from(bit));
    }

    /// Drops all values so the frame can be refilled.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Sampled values in declaration order.
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    /// Number of sampled values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing has been sampled.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A clocked design under simulation.
///
/// The driver calls `init` once, then clocks the design with `step_low` followed by
/// `step_high` for every cycle. Combinational and sequential logic are only settled
/// once both halves have run.
pub trait SimulatedModule {
    /// Short design name used in logs.
    fn name(&self) -> &str;

    /// Puts internal state into its power-on condition. Memory contents are left alone.
    fn init(&mut self);

    /// First half of a clock tick: evaluates combinational logic.
    fn step_low(&mut self, reset: bool);

    /// Second half of a clock tick: latches registers and commits memory writes.
    fn step_high(&mut self, reset: bool);

    /// Current value of the design's halt output.
    fn halted(&self) -> bool;

    /// Signals this design records into a waveform trace.
    fn signals(&self) -> Vec<Signal>;

    /// Pushes the current value of every declared signal into `frame`.
    fn dump_waveform(&self, frame: &mut SignalFrame);

    /// One-line description of the current state for per-cycle output.
    fn state_line(&self) -> String;

    /// The design's system memory.
    fn memory(&self) -> &MemoryImage;

    /// Mutable access to the design's system memory.
    fn memory_mut(&mut self) -> &mut MemoryImage;
}

impl<T: SimulatedModule + ?Sized> SimulatedModule for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn init(&mut self) {
        (**self).init();
    }

    fn step_low(&mut self, reset: bool) {
        (**self).step_low(reset);
    }

    fn step_high(&mut self, reset: bool) {
        (**self).step_high(reset);
    }

    fn halted(&self) -> bool {
        (**self).halted()
    }

    fn signals(&self) -> Vec<Signal> {
        (**self).signals()
    }

    fn dump_waveform(&self, frame: &mut SignalFrame) {
        (**self).dump_waveform(frame);
    }

    fn state_line(&self) -> String {
        (**self).state_line()
    }

    fn memory(&self) -> &MemoryImage {
        (**self).memory()
    }

    fn memory_mut(&mut self) -> &mut MemoryImage {
        (**self).memory_mut()
    }
}
