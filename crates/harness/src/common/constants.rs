//! Harness-wide constants.

/// Width of one memory word in bits. The only width the memory image supports.
pub const WORD_BITS: u32 = 32;

/// Size of one memory word in bytes.
pub const WORD_BYTES: usize = (WORD_BITS / 8) as usize;

/// Cycle budget used when no `-c` override is given.
pub const DEFAULT_MAX_CYCLES: u64 = 20_000;

/// Trace file written when waveform capture is enabled without an explicit path.
pub const DEFAULT_TRACE_PATH: &str = "trace.vcd";

/// Memory depth in words for the bundled designs (256 KiB).
pub const DEFAULT_MEMORY_DEPTH: usize = 0x1_0000;

/// Timescale of one trace timestamp, in nanoseconds.
pub const TRACE_TIMESCALE_NS: u32 = 1;

/// Module scope name the recorder places every signal under.
pub const TRACE_SCOPE: &str = "testbench";
