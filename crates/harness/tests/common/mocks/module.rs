use mockall::mock;
use simharness_core::memory::MemoryImage;
use simharness_core::{Signal, SignalFrame, SimulatedModule};
use std::cell::RefCell;

mock! {
    pub Module {}
    impl SimulatedModule for Module {
        fn name(&self) -> &'static str;
        fn init(&mut self);
        fn step_low(&mut self, reset: bool);
        fn step_high(&mut self, reset: bool);
        fn halted(&self) -> bool;
        fn signals(&self) -> Vec<Signal>;
        fn dump_waveform(&self, frame: &mut SignalFrame);
        fn state_line(&self) -> String;
        fn memory(&self) -> &MemoryImage;
        fn memory_mut(&mut self) -> &mut MemoryImage;
    }
}

/// A call the driver made on a [`ScriptedModule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Init,
    Low { reset: bool },
    High { reset: bool },
    Sample,
}

/// Records every call and raises halt after a fixed number of cycles out of reset.
#[derive(Debug)]
pub struct ScriptedModule {
    events: RefCell<Vec<Event>>,
    memory: MemoryImage,
    halt_at: Option<u64>,
    cycles: u64,
}

impl ScriptedModule {
    /// Never halts.
    pub fn new(depth: usize) -> Self {
        Self {
            events: RefCell::new(Vec::new()),
            memory: MemoryImage::new(depth, 32).unwrap(),
            halt_at: None,
            cycles: 0,
        }
    }

    /// Raises halt once `cycle` cycles out of reset have completed.
    pub fn halting_at(depth: usize, cycle: u64) -> Self {
        Self {
            halt_at: Some(cycle),
            ..Self::new(depth)
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// Completed cycles with reset deasserted.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    fn log(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

impl SimulatedModule for ScriptedModule {
    fn name(&self) -> &str {
        "scripted"
    }

    fn init(&mut self) {
        self.log(Event::Init);
        self.cycles = 0;
    }

    fn step_low(&mut self, reset: bool) {
        self.log(Event::Low { reset });
    }

    fn step_high(&mut self, reset: bool) {
        self.log(Event::High { reset });
        if reset {
            self.cycles = 0;
        } else {
            self.cycles += 1;
        }
    }

    fn halted(&self) -> bool {
        self.halt_at.is_some_and(|at| self.cycles >= at)
    }

    fn signals(&self) -> Vec<Signal> {
        vec![Signal::new("cycle", 32), Signal::new("halt", 1)]
    }

    fn dump_waveform(&self, frame: &mut SignalFrame) {
        self.log(Event::Sample);
        frame.push(self.cycles);
        frame.push_bit(self.halted());
    }

    fn state_line(&self) -> String {
        format!("cycle={}", self.cycles)
    }

    fn memory(&self) -> &MemoryImage {
        &self.memory
    }

    fn memory_mut(&mut self) -> &mut MemoryImage {
        &mut self.memory
    }
}
