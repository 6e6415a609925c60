//! Common types shared across the harness.
//!
//! This module provides:
//! 1. **Constants:** Word geometry, default run limits, and default output paths.
//! 2. **Error Handling:** The fatal `SimError` taxonomy and hex image parse errors.

/// Word geometry and run defaults.
pub mod constants;

/// Error types for configuration, loading, and sink failures.
pub mod error;

pub use constants::{WORD_BITS, WORD_BYTES};
pub use error::{HexError, SimError};
