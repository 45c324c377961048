//! Output generation service
//!
//! Serializes flat delivery records to a destination file as a single JSON
//! array, either buffered in one serialization pass or streamed record by
//! record. Writes are staged through a temporary file in the destination
//! directory and finalized atomically, so a failed write never leaves a
//! destination file claiming success.

pub mod writer;

pub use writer::{RecordWriter, WriteStats};
