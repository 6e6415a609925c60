//! Memory image tests.
