//! Batch result reporting
//!
//! A batch never aborts on individual file failures, so the summary carries
//! both sides: how many files produced records and exactly which files failed
//! with what error.

use std::path::PathBuf;
use std::time::Duration;

use crate::Error;

/// One input file that could not be parsed
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: Error,
}

/// Overall outcome classification for a completed batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Every input file parsed successfully
    Complete,
    /// Some files parsed, some failed
    Partial,
    /// No input file parsed; the output is a valid empty array
    Failed,
}

/// Statistics and failure detail from a completed batch run
#[derive(Debug)]
pub struct BatchSummary {
    /// Files that parsed successfully
    pub files_processed: usize,
    /// Files that failed to parse
    pub files_failed: usize,
    /// Flat delivery records written to the output file
    pub records_written: usize,
    /// Size of the output file in bytes
    pub bytes_written: u64,
    /// Per-file failure detail, in input order
    pub failures: Vec<FileFailure>,
    /// Wall-clock duration of the batch
    pub processing_time: Duration,
    /// Destination the combined array was written to
    pub output_path: PathBuf,
}

impl BatchSummary {
    /// Total input files the batch attempted
    pub fn total_files(&self) -> usize {
        self.files_processed + self.files_failed
    }

    /// Classify the batch result
    ///
    /// An empty batch counts as complete: nothing was asked for and a valid
    /// empty array was written.
    pub fn outcome(&self) -> BatchOutcome {
        if self.files_failed == 0 {
            BatchOutcome::Complete
        } else if self.files_processed > 0 {
            BatchOutcome::Partial
        } else {
            BatchOutcome::Failed
        }
    }

    /// Calculate success rate percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_files() > 0 {
            (self.files_processed as f64 / self.total_files() as f64) * 100.0
        } else {
            100.0
        }
    }

    /// Calculate files processed per second
    pub fn files_per_second(&self) -> f64 {
        if self.processing_time.as_secs_f64() > 0.0 {
            self.total_files() as f64 / self.processing_time.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Generate human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Batch Processing Summary:\n\
             Files: {} processed, {} failed ({:.1}% success rate)\n\
             Records: {} written ({} bytes)\n\
             Performance: {:.1} files/sec\n\
             Duration: {:.2}s\n\
             Output: {}",
            self.files_processed,
            self.files_failed,
            self.success_rate(),
            self.records_written,
            self.bytes_written,
            self.files_per_second(),
            self.processing_time.as_secs_f64(),
            self.output_path.display()
        )
    }
}
