//! Waveform recording.
//!
//! Writes a design's declared signals to a VCD value-change trace. The trace holds one
//! baseline record (`#0` with a `$dumpvars` block) followed by one record per executed
//! cycle containing only the signals that changed. Writes are append-only.

use std::cell::RefCell;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::rc::Rc;

use tracing::debug;
use vcd::{IdCode, SimulationCommand, TimescaleUnit, Value};

use crate::common::SimError;
use crate::common::constants::{TRACE_SCOPE, TRACE_TIMESCALE_NS};
use crate::sim::module::{Signal, SignalFrame};

/// A declared signal bound to its VCD identifier.
#[derive(Debug)]
struct TraceVar {
    id: IdCode,
    width: u32,
}

/// Sink shared between the VCD writer and the recorder, which flushes it on close.
struct SharedSink<W>(Rc<RefCell<W>>);

impl<W: Write> Write for SharedSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.borrow_mut().flush()
    }
}

/// An open value-change trace.
pub struct WaveformRecorder<W: Write = BufWriter<File>> {
    writer: vcd::Writer<SharedSink<W>>,
    sink: Rc<RefCell<W>>,
    vars: Vec<TraceVar>,
    last: Vec<u64>,
    records: u64,
}

impl<W: Write> std::fmt::Debug for WaveformRecorder<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaveformRecorder")
            .field("vars", &self.vars)
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}

impl WaveformRecorder {
    /// Creates the trace file at `path` and writes the header for `signals`.
    ///
    /// # Errors
    ///
    /// `SimError::SinkOpen` if the file cannot be created or the header cannot be written.
    pub fn open(path: &Path, signals: &[Signal]) -> Result<Self, SimError> {
        let sink_error = |source| SimError::SinkOpen {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(sink_error)?;
        let recorder = Self::new(BufWriter::new(file), signals).map_err(sink_error)?;
        debug!(path = %path.display(), signals = signals.len(), "opened waveform trace");
        Ok(recorder)
    }
}

impl<W: Write> WaveformRecorder<W> {
    /// Wraps an arbitrary sink and writes the header for `signals`.
    ///
    /// # Errors
    ///
    /// Any I/O error from writing the header.
    pub fn new(sink: W, signals: &[Signal]) -> io::Result<Self> {
        let sink = Rc::new(RefCell::new(sink));
        let mut writer = vcd::Writer::new(SharedSink(Rc::clone(&sink)));
        writer.timescale(TRACE_TIMESCALE_NS, TimescaleUnit::NS)?;
        writer.add_module(TRACE_SCOPE)?;
        let mut vars = Vec::with_capacity(signals.len());
        for signal in signals {
            let id = writer.add_wire(signal.width, signal.name)?;
            vars.push(TraceVar {
                id,
                width: signal.width,
            });
        }
        writer.upscope()?;
        writer.enddefinitions()?;

        Ok(Self {
            writer,
            sink,
            last: Vec::with_capacity(vars.len()),
            vars,
            records: 0,
        })
    }

    /// Writes the baseline record: every signal's post-reset value at time 0.
    ///
    /// # Errors
    ///
    /// Any I/O error from the sink.
    pub fn record_initial(&mut self, frame: &SignalFrame) -> io::Result<()> {
        self.writer.timestamp(0)?;
        self.writer.begin(SimulationCommand::Dumpvars)?;
        self.last.clear();
        for (var, &value) in self.vars.iter().zip(frame.values()) {
            write_value(&mut self.writer, var, value)?;
            self.last.push(value);
        }
        self.writer.end()?;
        self.records += 1;
        Ok(())
    }

    /// Writes the record for `cycle`: a timestamp plus every signal that changed.
    ///
    /// # Errors
    ///
    /// Any I/O error from the sink.
    pub fn record_cycle(&mut self, cycle: u64, frame: &SignalFrame) -> io::Result<()> {
        self.writer.timestamp(cycle)?;
        for (i, (var, &value)) in self.vars.iter().zip(frame.values()).enumerate() {
            match self.last.get_mut(i) {
                Some(previous) if *previous == value => {}
                Some(previous) => {
                    write_value(&mut self.writer, var, value)?;
                    *previous = value;
                }
                None => {
                    write_value(&mut self.writer, var, value)?;
                    self.last.push(value);
                }
            }
        }
        self.records += 1;
        Ok(())
    }

    /// Records written so far, baseline included.
    pub const fn records(&self) -> u64 {
        self.records
    }

    /// Number of declared signals, i.e. values expected per frame.
    pub fn signal_count(&self) -> usize {
        self.vars.len()
    }

    /// Flushes the trace and releases the sink, returning the record count.
    ///
    /// # Errors
    ///
    /// The I/O error from the final flush. Records still buffered at that point are lost.
    pub fn close(self) -> io::Result<u64> {
        let Self {
            writer,
            sink,
            records,
            ..
        } = self;
        drop(writer);
        sink.borrow_mut().flush()?;
        debug!(records, "closed waveform trace");
        Ok(records)
    }
}

fn write_value<W: Write>(writer: &mut vcd::Writer<W>, var: &TraceVar, value: u64) -> io::Result<()> {
    if var.width == 1 {
        return writer.change_scalar(var.id, value & 1 != 0);
    }
    let bits: Vec<Value> = (0..var.width)
        .rev()
        .map(|bit| {
            if bit < 64 && (value >> bit) & 1 != 0 {
                Value::V1
            } else {
                Value::V0
            }
        })
        .collect();
    writer.change_vector(var.id, &bits)
}
