//! Batch orchestration service
//!
//! Drives the full pipeline for a set of match files: parse each file into
//! flat delivery records, collect per-file failures without aborting the
//! batch, and write the surviving records to one combined JSON array. Record
//! order in the output always follows input-file order, whether parsing runs
//! sequentially or across a bounded worker pool.

pub mod processor;
pub mod stats;

pub use processor::BatchProcessor;
pub use stats::{BatchOutcome, BatchSummary, FileFailure};
