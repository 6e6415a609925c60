//! Run configuration for the harness.
//!
//! This module defines the options collected before a run starts. It provides:
//! 1. **Defaults:** Cycle budget, trace path, and memory depth used when nothing is given.
//! 2. **Dump requests:** Parsing of the `<filename>,<start_hex>,<length_hex>` dump specification.
//! 3. **Run configuration:** The immutable option set handed to the driver.
//!
//! Configuration comes from command-line flags, optionally layered over a JSON file
//! (`RunConfig::from_json_file`). Every JSON field is optional.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::common::SimError;
use crate::common::constants::{DEFAULT_MAX_CYCLES, DEFAULT_MEMORY_DEPTH, DEFAULT_TRACE_PATH};
use crate::designs::DesignKind;

/// A byte range of the memory image to write out at shutdown.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DumpRequest {
    /// Destination file.
    pub path: PathBuf,
    /// Start offset in bytes.
    #[serde(default)]
    pub start: u64,
    /// Length in bytes.
    pub length: u64,
}

impl DumpRequest {
    /// Creates a request for `length` bytes starting at byte `start`.
    pub fn new(path: impl Into<PathBuf>, start: u64, length: u64) -> Self {
        Self {
            path: path.into(),
            start,
            length,
        }
    }
}

impl FromStr for DumpRequest {
    type Err = SimError;

    /// Parses `<filename>,<start_hex>,<length_hex>`.
    ///
    /// The filename is everything before the second-to-last comma, so paths containing
    /// commas still work. Numbers accept an optional `0x` prefix.
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| SimError::DumpSpec {
            spec: spec.to_string(),
            reason: reason.to_string(),
        };

        let mut fields = spec.rsplitn(3, ',');
        let (Some(length), Some(start), Some(path)) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(invalid("expected <filename>,<start_hex>,<length_hex>"));
        };
        if path.is_empty() {
            return Err(invalid("missing filename"));
        }

        let start = parse_hex_arg(start).ok_or_else(|| invalid("start is not a hex number"))?;
        let length = parse_hex_arg(length).ok_or_else(|| invalid("length is not a hex number"))?;
        Ok(Self::new(path, start, length))
    }
}

fn parse_hex_arg(field: &str) -> Option<u64> {
    let field = field.trim();
    let digits = field
        .strip_prefix("0x")
        .or_else(|| field.strip_prefix("0X"))
        .unwrap_or(field);
    u64::from_str_radix(digits, 16).ok()
}

/// Immutable options for one run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Record a value-change trace of the design's signals.
    pub waveform: bool,
    /// Where the trace goes when `waveform` is set.
    pub trace_path: PathBuf,
    /// Memory range to write out after the run.
    pub dump: Option<DumpRequest>,
    /// Upper bound on executed cycles, not counting reset.
    pub max_cycles: u64,
    /// Hex image loaded into memory before reset.
    pub initial_memory: Option<PathBuf>,
    /// Which bundled design to simulate.
    pub design: DesignKind,
    /// Memory depth in words for the bundled design.
    pub memory_depth: usize,
    /// Print the design's state line after every cycle.
    pub echo_state: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            waveform: false,
            trace_path: PathBuf::from(DEFAULT_TRACE_PATH),
            dump: None,
            max_cycles: DEFAULT_MAX_CYCLES,
            initial_memory: None,
            design: DesignKind::default(),
            memory_depth: DEFAULT_MEMORY_DEPTH,
            echo_state: true,
        }
    }
}

impl RunConfig {
    /// Reads a configuration from a JSON file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// `SimError::ConfigRead` if the file cannot be read, `SimError::ConfigParse` if it is
    /// not a valid configuration.
    pub fn from_json_file(path: &Path) -> Result<Self, SimError> {
        let text = fs::read_to_string(path).map_err(|source| SimError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text).map_err(|source| SimError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// The deserialization error if `json` is not a valid configuration.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
