//! Simulation Driver.
//!
//! This module owns the run loop. A run moves through these phases, in order:
//! 1. **Configuring:** Options are fixed in a [`RunConfig`] before the driver exists.
//! 2. **Initializing:** `init` is called and the optional initial memory image is loaded.
//! 3. **Resetting:** One full clock cycle with reset asserted, then the baseline waveform record.
//! 4. **Running:** Up to `max_cycles` cycles with reset deasserted, stopping early on halt.
//! 5. **Draining:** The waveform recorder, if any, is closed.
//! 6. **Dumping:** The requested memory range, if any, is written out.
//! 7. **Terminated:** The executed cycle count is reported.
//!
//! Only initialization can fail the run. Trace and dump problems are logged and degrade the
//! corresponding output instead.

use std::fmt;
use std::io::{self, Write};

use tracing::{debug, info, warn};

use crate::common::SimError;
use crate::config::RunConfig;
use crate::memory::DumpReport;
use crate::sim::module::{SignalFrame, SimulatedModule};
use crate::sim::waveform::WaveformRecorder;

/// Phase of the driver's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Options are being collected; no module activity yet.
    Configuring,
    /// `init` and the initial memory load.
    Initializing,
    /// The single reset cycle.
    Resetting,
    /// The bounded main loop.
    Running,
    /// Closing the waveform recorder.
    Draining,
    /// Writing the memory dump.
    Dumping,
    /// Run finished.
    Terminated,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Configuring => "configuring",
            Self::Initializing => "initializing",
            Self::Resetting => "resetting",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Dumping => "dumping",
            Self::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Cycles executed after reset.
    pub cycles: u64,
    /// Whether the loop ended because the design raised halt.
    pub halted: bool,
    /// Trace records written (baseline included), or `None` if no complete trace was recorded.
    pub trace_records: Option<u64>,
    /// Outcome of the memory dump, if one was requested.
    pub dump: Option<DumpReport>,
}

/// Drives a [`SimulatedModule`] through one run.
#[derive(Debug)]
pub struct Driver<M> {
    module: M,
    config: RunConfig,
    phase: RunPhase,
}

impl<M: SimulatedModule> Driver<M> {
    /// Creates a driver for `module` with a fixed configuration.
    pub const fn new(module: M, config: RunConfig) -> Self {
        Self {
            module,
            config,
            phase: RunPhase::Configuring,
        }
    }

    /// Current phase.
    pub const fn phase(&self) -> RunPhase {
        self.phase
    }

    /// The configuration this driver runs with.
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    /// The driven module.
    pub const fn module(&self) -> &M {
        &self.module
    }

    /// Consumes the driver and returns the module, e.g. to inspect final memory.
    pub fn into_module(self) -> M {
        self.module
    }

    /// Runs to completion, writing state lines and the final report to stdout.
    ///
    /// # Errors
    ///
    /// Any initialization failure; see [`Driver::run_with_output`].
    pub fn run(&mut self) -> Result<RunSummary, SimError> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run_with_output(&mut out)
    }

    /// Runs to completion, writing state lines and the final report to `out`.
    ///
    /// # Errors
    ///
    /// `SimError::InitialLoad` or `SimError::MalformedImage` if the initial memory image
    /// cannot be loaded. No clock edge is issued in that case.
    pub fn run_with_output<O: Write>(&mut self, out: &mut O) -> Result<RunSummary, SimError> {
        self.enter(RunPhase::Initializing);
        self.module.init();
        if let Some(path) = self.config.initial_memory.clone() {
            let _ = self.module.memory_mut().load_hex(&path)?;
        }

        let mut trace = self.open_trace();
        let mut frame =
            SignalFrame::with_capacity(trace.as_ref().map_or(0, WaveformRecorder::signal_count));

        self.enter(RunPhase::Resetting);
        self.clock(true);
        if let Some(recorder) = trace.as_mut() {
            self.sample(&mut frame);
            if let Err(e) = recorder.record_initial(&frame) {
                warn!("waveform baseline write failed, disabling trace: {e}");
                trace = None;
            }
        }

        self.enter(RunPhase::Running);
        let mut echo = self.config.echo_state;
        let mut cycles = 0u64;
        let mut halted = false;
        while cycles < self.config.max_cycles {
            self.clock(false);
            cycles += 1;

            if echo {
                if let Err(e) = writeln!(out, "{}", self.module.state_line()) {
                    warn!("state output failed, suppressing further state lines: {e}");
                    echo = false;
                }
            }

            if let Some(recorder) = trace.as_mut() {
                self.sample(&mut frame);
                if let Err(e) = recorder.record_cycle(cycles, &frame) {
                    warn!(cycle = cycles, "waveform write failed, disabling trace: {e}");
                    trace = None;
                }
            }

            if self.module.halted() {
                halted = true;
                info!(cycle = cycles, design = self.module.name(), "design halted");
                break;
            }
        }

        self.enter(RunPhase::Draining);
        let trace_records = trace.and_then(|recorder| match recorder.close() {
            Ok(records) => Some(records),
            Err(e) => {
                warn!("waveform flush failed, trace is incomplete: {e}");
                None
            }
        });

        self.enter(RunPhase::Dumping);
        let dump = self
            .config
            .dump
            .as_ref()
            .map(|request| self.module.memory().dump(request));

        self.enter(RunPhase::Terminated);
        info!(cycles, halted, "simulation finished");
        if let Err(e) = writeln!(out, "ran for {cycles} cycles") {
            warn!("could not write final report: {e}");
        }

        Ok(RunSummary {
            cycles,
            halted,
            trace_records,
            dump,
        })
    }

    /// One full clock tick. The two halves are never separated.
    fn clock(&mut self, reset: bool) {
        self.module.step_low(reset);
        self.module.step_high(reset);
    }

    fn sample(&self, frame: &mut SignalFrame) {
        frame.clear();
        self.module.dump_waveform(frame);
    }

    fn open_trace(&self) -> Option<WaveformRecorder> {
        if !self.config.waveform {
            return None;
        }
        match WaveformRecorder::open(&self.config.trace_path, &self.module.signals()) {
            Ok(recorder) => Some(recorder),
            Err(e) => {
                warn!("{e}; continuing without waveform capture");
                None
            }
        }
    }

    fn enter(&mut self, phase: RunPhase) {
        debug!(from = %self.phase, to = %phase, "driver phase");
        self.phase = phase;
    }
}
