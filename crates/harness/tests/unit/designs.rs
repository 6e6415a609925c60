//! # Design Tests
//!
//! Runs the bundled designs under the driver and checks their architectural results.

use crate::common::harness::{hex_image, init_tracing, le_bytes, out_path, quiet_config};
use pretty_assertions::assert_eq;
use simharness_core::designs::accumulator::{encode, opcodes};
use simharness_core::designs::{Accumulator, Counter};
use simharness_core::{DesignKind, DumpRequest, Driver, RunConfig, SimulatedModule};
use std::fs;
use tempfile::TempDir;

fn accumulator(program: &[u32], data: &[(usize, u32)]) -> Accumulator {
    let mut design = Accumulator::new(16).unwrap();
    for (addr, &word) in program.iter().enumerate() {
        design.memory_mut().write_word(addr, word);
    }
    for &(addr, word) in data {
        design.memory_mut().write_word(addr, word);
    }
    design
}

// ══════════════════════════════════════════════════════════
// 1. Accumulator
// ══════════════════════════════════════════════════════════

#[test]
fn accumulator_adds_two_words() {
    init_tracing();
    let design = accumulator(
        &[
            encode(opcodes::LD, 10),
            encode(opcodes::ADD, 11),
            encode(opcodes::ST, 12),
            encode(opcodes::HALT, 0),
        ],
        &[(10, 5), (11, 7)],
    );

    let mut driver = Driver::new(design, quiet_config(100));
    let summary = driver.run_with_output(&mut Vec::new()).unwrap();
    assert_eq!(summary.cycles, 4);
    assert!(summary.halted);

    let design = driver.into_module();
    assert_eq!(design.memory().read_word(12), 12);
    assert_eq!(design.acc(), 12);
    assert!(!design.fault());
}

#[test]
fn accumulator_countdown_loop() {
    init_tracing();
    let design = accumulator(
        &[
            encode(opcodes::LDI, 3),
            encode(opcodes::JZ, 5),
            encode(opcodes::SUB, 10),
            encode(opcodes::JMP, 1),
            0,
            encode(opcodes::ST, 11),
            encode(opcodes::HALT, 0),
        ],
        &[(10, 1), (11, 0xFFFF_FFFF)],
    );

    let mut driver = Driver::new(design, quiet_config(1_000));
    let summary = driver.run_with_output(&mut Vec::new()).unwrap();
    // LDI, three JZ/SUB/JMP passes, the taken JZ, ST, HALT
    assert_eq!(summary.cycles, 13);

    let design = driver.into_module();
    assert_eq!(design.pc(), 6);
    assert_eq!(design.acc(), 0);
    assert_eq!(design.memory().read_word(11), 0);
}

#[test]
fn accumulator_runaway_program_hits_cycle_budget() {
    init_tracing();
    let design = accumulator(&[encode(opcodes::ADDI, 1), encode(opcodes::JMP, 0)], &[]);

    let mut driver = Driver::new(design, quiet_config(50));
    let summary = driver.run_with_output(&mut Vec::new()).unwrap();
    assert_eq!(summary.cycles, 50);
    assert!(!summary.halted);
    assert_eq!(driver.module().acc(), 25);
}

#[test]
fn accumulator_echoes_state_lines() {
    init_tracing();
    let design = accumulator(&[encode(opcodes::LDI, 0x2A), encode(opcodes::HALT, 0)], &[]);
    let config = RunConfig {
        echo_state: true,
        ..quiet_config(10)
    };

    let mut out = Vec::new();
    let mut driver = Driver::new(design, config);
    let _ = driver.run_with_output(&mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("acc=0000002a"));
    assert!(lines[1].ends_with("HALT"));
    assert_eq!(lines[2], "ran for 2 cycles");
}

// ══════════════════════════════════════════════════════════
// 2. Counter
// ══════════════════════════════════════════════════════════

#[test]
fn counter_fills_memory_then_halts() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let dump = out_path(&dir, "count.bin");
    let config = RunConfig {
        dump: Some(DumpRequest::new(&dump, 0, 0x20)),
        ..quiet_config(100)
    };

    let mut driver = Driver::new(Counter::new(8).unwrap(), config);
    let summary = driver.run_with_output(&mut Vec::new()).unwrap();
    assert_eq!(summary.cycles, 8);
    assert!(summary.halted);

    let expected: Vec<u32> = (0..8).collect();
    assert_eq!(driver.module().memory().words(), expected.as_slice());
    assert_eq!(fs::read(&dump).unwrap(), le_bytes(&expected));
}

#[test]
fn counter_stops_early_on_budget() {
    init_tracing();
    let mut driver = Driver::new(Counter::new(8).unwrap(), quiet_config(3));
    let summary = driver.run_with_output(&mut Vec::new()).unwrap();
    assert_eq!(summary.cycles, 3);
    assert!(!summary.halted);
    assert_eq!(driver.module().count(), 3);
    assert_eq!(driver.module().memory().words(), &[0, 1, 2, 0, 0, 0, 0, 0]);
}

// ══════════════════════════════════════════════════════════
// 3. End to end through DesignKind
// ══════════════════════════════════════════════════════════

#[test]
fn built_design_runs_hex_program_and_dumps() {
    init_tracing();
    let mut words = vec![
        encode(opcodes::LD, 10),
        encode(opcodes::ADD, 11),
        encode(opcodes::ST, 12),
        encode(opcodes::HALT, 0),
    ];
    words.resize(10, 0);
    words.extend([40, 2]);
    let image = hex_image(&words);

    let dir = TempDir::new().unwrap();
    let dump = out_path(&dir, "result.bin");
    let trace = out_path(&dir, "run.vcd");
    let config = RunConfig {
        waveform: true,
        trace_path: trace.clone(),
        initial_memory: Some(image.path().to_path_buf()),
        dump: Some(DumpRequest::new(&dump, 0x30, 4)),
        memory_depth: 16,
        ..quiet_config(100)
    };

    let design = DesignKind::Accumulator.build(config.memory_depth).unwrap();
    let mut driver = Driver::new(design, config);
    let summary = driver.run_with_output(&mut Vec::new()).unwrap();

    assert_eq!(summary.cycles, 4);
    assert_eq!(summary.trace_records, Some(5));
    assert_eq!(fs::read(&dump).unwrap(), le_bytes(&[42]));
    assert!(fs::read_to_string(&trace).unwrap().contains("mem_we"));
}

#[test]
fn every_design_builds() {
    for kind in DesignKind::ALL {
        let design = kind.build(4).unwrap();
        assert_eq!(design.name(), kind.name());
        assert_eq!(design.memory().depth(), 4);
        assert!(!design.signals().is_empty());
    }
    assert!(DesignKind::Counter.build(0).is_err());
}
