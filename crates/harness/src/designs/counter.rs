//! Memory-filling counter.
//!
//! On every cycle out of reset the counter stores its value at the word address equal to
//! that value, then increments. Halt rises on the cycle that writes the last word.

use crate::common::{SimError, WORD_BITS};
use crate::memory::MemoryImage;
use crate::sim::module::{Signal, SignalFrame, SimulatedModule};

/// The counter design.
#[derive(Debug, Clone)]
pub struct Counter {
    memory: MemoryImage,
    count: u32,
    next_count: u32,
    halted: bool,
    next_halted: bool,
    reset: bool,
}

impl Counter {
    /// Creates the design with a zeroed memory of `depth` words.
    ///
    /// # Errors
    ///
    /// `SimError::EmptyMemory` if `depth` is 0.
    pub fn new(depth: usize) -> Result<Self, SimError> {
        Ok(Self {
            memory: MemoryImage::new(depth, WORD_BITS)?,
            count: 0,
            next_count: 0,
            halted: false,
            next_halted: false,
            reset: false,
        })
    }

    /// Current counter value.
    pub const fn count(&self) -> u32 {
        self.count
    }
}

impl SimulatedModule for Counter {
    fn name(&self) -> &str {
        "counter"
    }

    fn init(&mut self) {
        self.count = 0;
        self.next_count = 0;
        self.halted = false;
        self.next_halted = false;
        self.reset = false;
    }

    fn step_low(&mut self, reset: bool) {
        self.reset = reset;
        if reset {
            self.next_count = 0;
            self.next_halted = false;
        } else if self.halted {
            self.next_count = self.count;
            self.next_halted = true;
        } else {
            self.next_count = self.count.wrapping_add(1);
            self.next_halted = self.next_count as usize >= self.memory.depth();
        }
    }

    fn step_high(&mut self, reset: bool) {
        if !reset && !self.halted {
            self.memory.write_word(self.count as usize, self.count);
        }
        self.count = self.next_count;
        self.halted = self.next_halted;
    }

    fn halted(&self) -> bool {
        self.halted
    }

    fn signals(&self) -> Vec<Signal> {
        vec![
            Signal::new("reset", 1),
            Signal::new("count", 32),
            Signal::new("halted", 1),
        ]
    }

    fn dump_waveform(&self, frame: &mut SignalFrame) {
        frame.push_bit(self.reset);
        frame.push(u64::from(self.count));
        frame.push_bit(self.halted);
    }

    fn state_line(&self) -> String {
        format!("count={:08x} halted={}", self.count, u8::from(self.halted))
    }

    fn memory(&self) -> &MemoryImage {
        &self.memory
    }

    fn memory_mut(&mut self) -> &mut MemoryImage {
        &mut self.memory
    }
}
