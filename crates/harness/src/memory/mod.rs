//! System Memory Image.
//!
//! This module implements the word-addressable backing store of a simulated design. It provides:
//! 1. **Storage:** A fixed-depth array of 32-bit words, zeroed at construction.
//! 2. **Ports:** Word reads and writes used by designs during clocking.
//! 3. **Loading:** Bulk population from a text hex image (see [`hex`]).
//! 4. **Dumping:** Best-effort binary export of a byte range, clamped to the image bounds.
//!
//! The image is owned by the design and borrowed by the driver for load and dump.

/// Text hex image parsing.
pub mod hex;

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::common::{HexError, SimError, WORD_BITS, WORD_BYTES};
use crate::config::DumpRequest;

/// Fixed-depth array of 32-bit words addressed `0..depth`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryImage {
    words: Vec<u32>,
}

/// Outcome of a dump once the output file was (or failed to be) opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DumpStatus {
    /// Every word in the clamped range was written and flushed.
    Complete,
    /// The destination could not be opened; nothing was written.
    OpenFailed,
    /// A write failed part-way; the file holds `written_words` words.
    WriteFailed,
}

/// What a dump request actually produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DumpReport {
    /// Words covered by the request before clamping.
    pub requested_words: u64,
    /// Words written to the destination.
    pub written_words: u64,
    /// Whether the request extended past the end of the image.
    pub truncated: bool,
    /// How the dump finished.
    pub status: DumpStatus,
}

impl DumpReport {
    /// Number of bytes written to the destination.
    pub const fn bytes_written(&self) -> u64 {
        self.written_words * WORD_BYTES as u64
    }

    /// Returns `true` if the clamped range was written in full.
    pub fn is_complete(&self) -> bool {
        self.status == DumpStatus::Complete
    }
}

impl MemoryImage {
    /// Creates a zero-filled image.
    ///
    /// # Arguments
    ///
    /// * `depth` - Number of words.
    /// * `word_bits` - Word width parameter of the design's memory; must be 32.
    ///
    /// # Errors
    ///
    /// `SimError::WordWidth` if `word_bits` is not 32, `SimError::EmptyMemory` if `depth` is 0.
    pub fn new(depth: usize, word_bits: u32) -> Result<Self, SimError> {
        if word_bits != WORD_BITS {
            return Err(SimError::WordWidth(word_bits));
        }
        if depth == 0 {
            return Err(SimError::EmptyMemory);
        }
        Ok(Self {
            words: vec![0; depth],
        })
    }

    /// Number of words in the image.
    pub fn depth(&self) -> usize {
        self.words.len()
    }

    /// Total size of the image in bytes.
    pub fn byte_len(&self) -> u64 {
        (self.words.len() * WORD_BYTES) as u64
    }

    /// All words in address order.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Reads the word at `addr`. Addresses wrap modulo the depth.
    #[inline]
    pub fn read_word(&self, addr: usize) -> u32 {
        self.words[addr % self.words.len()]
    }

    /// Writes the word at `addr`. Addresses wrap modulo the depth.
    #[inline]
    pub fn write_word(&mut self, addr: usize, value: u32) {
        let depth = self.words.len();
        self.words[addr % depth] = value;
    }

    /// Parses a text hex image into the array starting at address 0.
    ///
    /// Returns the number of words stored. On error the image may be partially populated.
    ///
    /// # Errors
    ///
    /// A [`HexError`] naming the first offending line.
    pub fn parse_hex(&mut self, text: &str) -> Result<usize, HexError> {
        hex::parse_into(&mut self.words, text)
    }

    /// Loads a hex image file into the array starting at address 0.
    ///
    /// # Errors
    ///
    /// `SimError::InitialLoad` if the file cannot be read, `SimError::MalformedImage` if it
    /// does not parse.
    pub fn load_hex(&mut self, path: &Path) -> Result<usize, SimError> {
        let text = fs::read_to_string(path).map_err(|source| SimError::InitialLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let loaded = self
            .parse_hex(&text)
            .map_err(|source| SimError::MalformedImage {
                path: path.to_path_buf(),
                source,
            })?;
        info!(path = %path.display(), words = loaded, "loaded initial memory image");
        Ok(loaded)
    }

    /// Dumps the requested byte range to a file as little-endian words.
    ///
    /// Best-effort: open and write failures are logged and reported, never returned as errors.
    pub fn dump(&self, request: &DumpRequest) -> DumpReport {
        let mut file = match File::create(&request.path) {
            Ok(file) => file,
            Err(e) => {
                error!(path = %request.path.display(), "could not open memory dump file: {e}");
                let (requested_words, _, truncated) = self.clamp(request.start, request.length);
                return DumpReport {
                    requested_words,
                    written_words: 0,
                    truncated,
                    status: DumpStatus::OpenFailed,
                };
            }
        };

        let report = self.dump_to(&mut file, request.start, request.length);
        if report.is_complete() {
            info!(
                path = %request.path.display(),
                bytes = report.bytes_written(),
                "wrote memory dump"
            );
        }
        report
    }

    /// Writes the word range `[start/4, (start+length)/4)` to `writer`, clamped to the image.
    ///
    /// Each word is written and flushed in address order, and only counts once both succeed.
    /// The first failure ends the dump, leaving the words before it in place.
    ///
    /// # Arguments
    ///
    /// * `writer` - Destination sink.
    /// * `start` - Start offset in bytes.
    /// * `length` - Requested length in bytes.
    pub fn dump_to<W: Write>(&self, writer: &mut W, start: u64, length: u64) -> DumpReport {
        let (requested_words, range, truncated) = self.clamp(start, length);
        let mut report = DumpReport {
            requested_words,
            written_words: 0,
            truncated,
            status: DumpStatus::Complete,
        };

        for &word in &self.words[range] {
            let written = writer
                .write_all(&word.to_le_bytes())
                .and_then(|()| writer.flush());
            if let Err(e) = written {
                error!(
                    written = report.written_words,
                    "memory dump write failed, output is partial: {e}"
                );
                report.status = DumpStatus::WriteFailed;
                return report;
            }
            report.written_words += 1;
        }
        report
    }

    /// Resolves a byte request to (requested word count, clamped word range, truncated).
    fn clamp(&self, start: u64, length: u64) -> (u64, std::ops::Range<usize>, bool) {
        let word = WORD_BYTES as u64;
        let depth = self.words.len() as u64;
        let first = start / word;
        let end = start.saturating_add(length) / word;
        let requested = end.saturating_sub(first);

        let truncated = start.saturating_add(length) > self.byte_len();
        let clamped_end = end.min(depth);
        let clamped_first = first.min(clamped_end);
        if truncated {
            let available = clamped_end - clamped_first;
            warn!(
                requested_bytes = length,
                available_bytes = available * word,
                "memory dump range exceeds image of {} bytes, truncating to {} bytes",
                depth * word,
                available * word
            );
        } else {
            debug!(first, end, "memory dump range");
        }

        (
            requested,
            clamped_first as usize..clamped_end as usize,
            truncated,
        )
    }
}
