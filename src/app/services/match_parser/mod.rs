//! Match document parsing service
//!
//! Reads raw cricsheet JSON (from a file path or in-memory bytes), validates
//! the top-level document shape, and delegates to the flattener. All
//! format-specific interpretation lives in the flattener; this layer only
//! guarantees that a document handed over is structurally valid.

pub mod parser;

pub use parser::{FileParseResult, MatchParser};
