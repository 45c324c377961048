//! Constants for cricsheet document processing.

/// Match format tags recognized in `info.match_type`, as they appear in
/// cricsheet archives (international and domestic variants)
pub const FORMAT_TAGS: &[&str] = &["T20", "IT20", "ODI", "ODM", "Test", "MDM"];

/// Balls per over when `info.balls_per_over` is absent
pub const DEFAULT_BALLS_PER_OVER: u32 = 6;

/// File extension of match documents discovered in an input directory
pub const MATCH_FILE_EXTENSION: &str = "json";

/// Upper bound on configurable parallel workers
pub const MAX_PARALLEL_WORKERS: usize = 100;

/// Default number of parallel workers, bounded by available parallelism
pub fn default_parallel_workers() -> usize {
    num_cpus::get().max(1)
}
