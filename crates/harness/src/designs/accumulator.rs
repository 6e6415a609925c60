//! Accumulator Processor.
//!
//! A single-accumulator machine that executes 32-bit instructions from its system memory.
//! Each instruction takes one clock cycle.
//!
//! # Instruction Format
//!
//! ```text
//!  31      24 23                      0
//! +----------+-------------------------+
//! |  opcode  |         operand         |
//! +----------+-------------------------+
//! ```
//!
//! Memory operands are word addresses. An unknown opcode halts the machine and sets `fault`.
//! Halt is sticky until the next reset.

use crate::common::{SimError, WORD_BITS};
use crate::memory::MemoryImage;
use crate::sim::module::{Signal, SignalFrame, SimulatedModule};

/// Opcode values (bits 31..24).
pub mod opcodes {
    /// Stop execution.
    pub const HALT: u8 = 0x00;
    /// `acc <= operand`
    pub const LDI: u8 = 0x01;
    /// `acc <= mem[operand]`
    pub const LD: u8 = 0x02;
    /// `mem[operand] <= acc`
    pub const ST: u8 = 0x03;
    /// `acc <= acc + mem[operand]`
    pub const ADD: u8 = 0x04;
    /// `acc <= acc - mem[operand]`
    pub const SUB: u8 = 0x05;
    /// `acc <= acc + operand`
    pub const ADDI: u8 = 0x06;
    /// `pc <= operand`
    pub const JMP: u8 = 0x07;
    /// `pc <= operand` if `acc == 0`
    pub const JZ: u8 = 0x08;
}

/// Mask of the 24-bit operand field.
pub const OPERAND_MASK: u32 = 0x00FF_FFFF;

/// Builds an instruction word.
pub const fn encode(opcode: u8, operand: u32) -> u32 {
    ((opcode as u32) << 24) | (operand & OPERAND_MASK)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Registers {
    pc: u32,
    acc: u32,
    halted: bool,
    fault: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct WritePort {
    enable: bool,
    addr: u32,
    data: u32,
}

/// The accumulator design.
#[derive(Debug, Clone)]
pub struct Accumulator {
    memory: MemoryImage,
    regs: Registers,
    next: Registers,
    write: WritePort,
    instr: u32,
    reset: bool,
}

impl Accumulator {
    /// Creates the design with a zeroed memory of `depth` words.
    ///
    /// # Errors
    ///
    /// `SimError::EmptyMemory` if `depth` is 0.
    pub fn new(depth: usize) -> Result<Self, SimError> {
        Ok(Self::with_memory(MemoryImage::new(depth, WORD_BITS)?))
    }

    /// Creates the design around an existing memory image.
    pub fn with_memory(memory: MemoryImage) -> Self {
        Self {
            memory,
            regs: Registers::default(),
            next: Registers::default(),
            write: WritePort::default(),
            instr: 0,
            reset: false,
        }
    }

    /// Program counter (word address).
    pub const fn pc(&self) -> u32 {
        self.regs.pc
    }

    /// Accumulator register.
    pub const fn acc(&self) -> u32 {
        self.regs.acc
    }

    /// Set when the machine stopped on an unknown opcode.
    pub const fn fault(&self) -> bool {
        self.regs.fault
    }

    /// Computes next-state values from the current registers and memory.
    fn evaluate(&self, instr: u32) -> (Registers, WritePort) {
        let regs = self.regs;
        let mut next = Registers {
            pc: regs.pc.wrapping_add(1),
            ..regs
        };
        let mut write = WritePort::default();

        let operand = instr & OPERAND_MASK;
        let addr = operand as usize;
        match (instr >> 24) as u8 {
            opcodes::HALT => {
                next.pc = regs.pc;
                next.halted = true;
            }
            opcodes::LDI => next.acc = operand,
            opcodes::LD => next.acc = self.memory.read_word(addr),
            opcodes::ST => {
                write = WritePort {
                    enable: true,
                    addr: operand,
                    data: regs.acc,
                };
            }
            opcodes::ADD => next.acc = regs.acc.wrapping_add(self.memory.read_word(addr)),
            opcodes::SUB => next.acc = regs.acc.wrapping_sub(self.memory.read_word(addr)),
            opcodes::ADDI => next.acc = regs.acc.wrapping_add(operand),
            opcodes::JMP => next.pc = operand,
            opcodes::JZ => {
                if regs.acc == 0 {
                    next.pc = operand;
                }
            }
            _ => {
                next.pc = regs.pc;
                next.halted = true;
                next.fault = true;
            }
        }
        (next, write)
    }
}

impl SimulatedModule for Accumulator {
    fn name(&self) -> &str {
        "accumulator"
    }

    fn init(&mut self) {
        self.regs = Registers::default();
        self.next = Registers::default();
        self.write = WritePort::default();
        self.instr = 0;
        self.reset = false;
    }

    fn step_low(&mut self, reset: bool) {
        self.reset = reset;
        if reset {
            self.instr = 0;
            self.next = Registers::default();
            self.write = WritePort::default();
            return;
        }
        if self.regs.halted {
            self.next = self.regs;
            self.write = WritePort::default();
            return;
        }
        self.instr = self.memory.read_word(self.regs.pc as usize);
        let (next, write) = self.evaluate(self.instr);
        self.next = next;
        self.write = write;
    }

    fn step_high(&mut self, reset: bool) {
        if reset {
            self.regs = Registers::default();
            return;
        }
        if self.write.enable {
            self.memory
                .write_word(self.write.addr as usize, self.write.data);
        }
        self.regs = self.next;
    }

    fn halted(&self) -> bool {
        self.regs.halted
    }

    fn signals(&self) -> Vec<Signal> {
        vec![
            Signal::new("reset", 1),
            Signal::new("pc", 32),
            Signal::new("acc", 32),
            Signal::new("instr", 32),
            Signal::new("mem_we", 1),
            Signal::new("mem_addr", 24),
            Signal::new("mem_data", 32),
            Signal::new("halted", 1),
            Signal::new("fault", 1),
        ]
    }

    fn dump_waveform(&self, frame: &mut SignalFrame) {
        frame.push_bit(self.reset);
        frame.push(u64::from(self.regs.pc));
        frame.push(u64::from(self.regs.acc));
        frame.push(u64::from(self.instr));
        frame.push_bit(self.write.enable);
        frame.push(u64::from(self.write.addr));
        frame.push(u64::from(self.write.data));
        frame.push_bit(self.regs.halted);
        frame.push_bit(self.regs.fault);
    }

    fn state_line(&self) -> String {
        format!(
            "pc={:06x} instr={:08x} acc={:08x}{}{}",
            self.regs.pc,
            self.instr,
            self.regs.acc,
            if self.write.enable {
                format!(" mem[{:06x}]<={:08x}", self.write.addr, self.write.data)
            } else {
                String::new()
            },
            if self.regs.fault {
                " FAULT"
            } else if self.regs.halted {
                " HALT"
            } else {
                ""
            }
        )
    }

    fn memory(&self) -> &MemoryImage {
        &self.memory
    }

    fn memory_mut(&mut self) -> &mut MemoryImage {
        &mut self.memory
    }
}
