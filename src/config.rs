//! Configuration for batch processing behavior.
//!
//! Provides the options recognized by the output pipeline: streamed versus
//! buffered serialization, sequential versus parallel file parsing, and the
//! parallel worker bound.

use crate::constants::{MAX_PARALLEL_WORKERS, default_parallel_workers};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Options controlling how a batch of match files is processed and written
///
/// The two axes are independent: `stream` controls how the output array is
/// serialized, `parallel` controls how input files are parsed. Neither affects
/// the emitted record sequence, which is always input-file order followed by
/// document traversal order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOptions {
    /// Emit records incrementally instead of serializing the full in-memory
    /// sequence in one write
    pub stream: bool,

    /// Parse independent input files concurrently, bounded by
    /// `max_concurrent_files`
    pub parallel: bool,

    /// Worker bound for parallel parsing
    pub max_concurrent_files: usize,

    /// Show a progress bar while processing
    pub show_progress: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            stream: false,
            parallel: false,
            max_concurrent_files: default_parallel_workers(),
            show_progress: false,
        }
    }
}

impl BatchOptions {
    /// Validate option values for consistency
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_files == 0 {
            return Err(Error::configuration(
                "Number of concurrent files must be greater than 0".to_string(),
            ));
        }

        if self.max_concurrent_files > MAX_PARALLEL_WORKERS {
            return Err(Error::configuration(format!(
                "Number of concurrent files cannot exceed {}",
                MAX_PARALLEL_WORKERS
            )));
        }

        Ok(())
    }

    /// Worker count actually used for a batch of `file_count` files
    pub fn effective_workers(&self, file_count: usize) -> usize {
        if self.parallel {
            self.max_concurrent_files.min(file_count).max(1)
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = BatchOptions::default();
        assert!(!options.stream);
        assert!(!options.parallel);
        assert!(options.max_concurrent_files >= 1);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_workers() {
        let options = BatchOptions {
            max_concurrent_files: 0,
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_excessive_workers() {
        let options = BatchOptions {
            max_concurrent_files: MAX_PARALLEL_WORKERS + 1,
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_effective_workers_sequential() {
        let options = BatchOptions {
            parallel: false,
            max_concurrent_files: 8,
            ..Default::default()
        };
        assert_eq!(options.effective_workers(20), 1);
    }

    #[test]
    fn test_effective_workers_bounded_by_file_count() {
        let options = BatchOptions {
            parallel: true,
            max_concurrent_files: 8,
            ..Default::default()
        };
        assert_eq!(options.effective_workers(3), 3);
        assert_eq!(options.effective_workers(20), 8);
        assert_eq!(options.effective_workers(0), 1);
    }
}
