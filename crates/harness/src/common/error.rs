//! Error definitions for the harness.
//!
//! This module defines the failures the harness distinguishes. It provides:
//! 1. **Fatal errors:** `SimError`, raised during configuration and initialization; every
//!    variant aborts the run before the first clock edge.
//! 2. **Parse errors:** `HexError`, describing why a text hex image was rejected.
//!
//! Non-fatal conditions (trace sink open failures, dump write failures, range truncation)
//! are not errors here: they are logged where they occur and reported through
//! [`DumpReport`](crate::memory::DumpReport) or the run summary.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a run.
#[derive(Debug, Error)]
pub enum SimError {
    /// A `-d` argument did not have the `<filename>,<start_hex>,<length_hex>` shape.
    #[error("invalid memory dump specification '{spec}': {reason}")]
    DumpSpec {
        /// The argument as given.
        spec: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The requested design name is not one of the bundled designs.
    #[error("unknown design '{0}' (expected 'accumulator' or 'counter')")]
    UnknownDesign(String),

    /// A JSON configuration file could not be read.
    #[error("could not read configuration file '{}': {source}", path.display())]
    ConfigRead {
        /// File that failed to open or read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A JSON configuration file was read but did not describe a run configuration.
    #[error("invalid configuration file '{}': {source}", path.display())]
    ConfigParse {
        /// Offending file.
        path: PathBuf,
        /// Deserialization error with line/column.
        #[source]
        source: serde_json::Error,
    },

    /// The memory image was constructed with a word width other than 32 bits.
    #[error("unsupported memory word width: {0} bits (only 32-bit words are supported)")]
    WordWidth(u32),

    /// The memory depth is zero.
    #[error("memory depth must be at least one word")]
    EmptyMemory,

    /// The initial memory file could not be opened or read.
    #[error("could not read initial memory image '{}': {source}", path.display())]
    InitialLoad {
        /// Image file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The initial memory file was read but is not a valid hex image.
    #[error("malformed initial memory image '{}': {source}", path.display())]
    MalformedImage {
        /// Image file path.
        path: PathBuf,
        /// Parse failure with its line number.
        #[source]
        source: HexError,
    },

    /// A waveform trace sink could not be created.
    #[error("could not open waveform trace '{}': {source}", path.display())]
    SinkOpen {
        /// Trace file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl SimError {
    /// Process exit status for this error. Every fatal harness error maps to 1.
    pub const fn exit_code(&self) -> i32 {
        1
    }

    /// Returns `true` for errors caused by user-supplied options rather than input data.
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::DumpSpec { .. }
                | Self::UnknownDesign(_)
                | Self::ConfigRead { .. }
                | Self::ConfigParse { .. }
                | Self::WordWidth(_)
                | Self::EmptyMemory
        )
    }
}

/// Reasons a text hex image is rejected. Line numbers are 1-based.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum HexError {
    /// A token is not a hexadecimal number that fits in one word.
    #[error("line {line}: invalid hex word '{token}'")]
    InvalidWord {
        /// Line of the token.
        line: usize,
        /// The token text.
        token: String,
    },

    /// An `@` directive does not carry a valid hexadecimal word address.
    #[error("line {line}: invalid address directive '{token}'")]
    InvalidAddress {
        /// Line of the directive.
        line: usize,
        /// The directive text.
        token: String,
    },

    /// A word would be stored at or beyond the memory depth.
    #[error("line {line}: word address {address:#x} exceeds memory depth of {depth} words")]
    Overflow {
        /// Line of the word.
        line: usize,
        /// Word address the value would land at.
        address: usize,
        /// Memory depth in words.
        depth: usize,
    },
}
