//! Command-line argument definitions for the cricsheet processor
//!
//! Defines the complete CLI interface using the clap derive API. The tool has
//! a single pipeline, so arguments live on one struct rather than subcommands.

use crate::config::BatchOptions;
use crate::constants::{MAX_PARALLEL_WORKERS, default_parallel_workers};
use crate::{Error, Result};
use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the cricsheet match processor
///
/// Flattens ball-by-ball cricket match data from nested cricsheet.org JSON
/// documents into one combined array of per-delivery records.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cricsheet-processor",
    version,
    about = "Flatten cricsheet ball-by-ball match JSON into per-delivery records",
    long_about = "Processes cricsheet.org match documents into a single JSON array with one \
                  record per delivery, denormalizing match context onto every record. Accepts \
                  individual match files or directories of them, parses sequentially or in \
                  parallel, and writes the combined output atomically."
)]
pub struct Args {
    /// Match files or directories containing .json match files
    ///
    /// Directories are expanded non-recursively to their .json files in
    /// lexical filename order. Inputs contribute records to the output in the
    /// order given here.
    #[arg(
        value_name = "PATH",
        required = true,
        help = "Match files or directories of .json match files"
    )]
    pub inputs: Vec<PathBuf>,

    /// Output path for the combined JSON array
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        default_value = "deliveries.json",
        help = "Output path for the combined JSON array"
    )]
    pub output_path: PathBuf,

    /// Stream records to the output file incrementally
    ///
    /// By default the full record sequence is serialized in one pass. This
    /// flag writes the array record by record, bounding memory held during
    /// serialization. Both modes produce identical output.
    #[arg(long = "stream", help = "Write output incrementally, record by record")]
    pub stream: bool,

    /// Parse input files in parallel
    ///
    /// Output record order is unaffected: results are recombined in input
    /// order regardless of completion order.
    #[arg(long = "parallel", help = "Parse input files concurrently")]
    pub parallel: bool,

    /// Number of parallel workers
    ///
    /// Only meaningful together with --parallel. Defaults to the number of
    /// available CPU cores.
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        default_value_t = default_parallel_workers(),
        help = "Number of parallel workers for parsing"
    )]
    pub workers: usize,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings and disables the
    /// progress bar and console summary.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl Args {
    /// Validate the arguments for consistency
    pub fn validate(&self) -> Result<()> {
        for input in &self.inputs {
            if !input.exists() {
                return Err(Error::configuration(format!(
                    "Input path does not exist: {}",
                    input.display()
                )));
            }
        }

        if self.workers == 0 {
            return Err(Error::configuration(
                "Number of workers must be greater than 0".to_string(),
            ));
        }

        if self.workers > MAX_PARALLEL_WORKERS {
            return Err(Error::configuration(format!(
                "Number of workers cannot exceed {}",
                MAX_PARALLEL_WORKERS
            )));
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// Convert CLI flags into batch processing options
    pub fn to_batch_options(&self) -> BatchOptions {
        BatchOptions {
            stream: self.stream,
            parallel: self.parallel,
            max_concurrent_files: self.workers,
            show_progress: self.show_progress(),
        }
    }
}

impl Default for Args {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output_path: PathBuf::from("deliveries.json"),
            stream: false,
            parallel: false,
            workers: default_parallel_workers(),
            verbose: 0,
            quiet: false,
        }
    }
}
