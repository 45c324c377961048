//! Command implementation for the cricsheet processor CLI
//!
//! Wires argument handling to the batch pipeline: logging setup, input
//! expansion (directories become their .json files), batch execution, and the
//! console summary.

use std::path::PathBuf;

use colored::Colorize;
use tracing::{debug, info};

use crate::app::services::batch_processor::{BatchProcessor, BatchSummary};
use crate::app::services::match_parser::parser::discover_match_files;
use crate::cli::args::Args;
use crate::Result;

/// Set up structured logging based on CLI verbosity flags
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cricsheet_processor={}", log_level)));

    if args.quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Expand CLI inputs into the ordered list of match files to process
///
/// File inputs are taken as given; directory inputs expand non-recursively to
/// their .json files in lexical filename order. The overall order follows the
/// order inputs were passed on the command line.
pub fn collect_input_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut discovered = discover_match_files(input)?;
            debug!(
                "Expanded directory {} to {} match files",
                input.display(),
                discovered.len()
            );
            files.append(&mut discovered);
        } else {
            files.push(input.clone());
        }
    }

    Ok(files)
}

/// Run the full pipeline for the given arguments
pub async fn run(args: Args) -> Result<BatchSummary> {
    args.validate()?;

    let input_files = collect_input_files(&args.inputs)?;
    info!(
        "Collected {} match files from {} inputs",
        input_files.len(),
        args.inputs.len()
    );

    if !args.quiet {
        println!(
            "{}",
            "Starting cricsheet match processing".bright_green().bold()
        );
        println!(
            "  {} {} match files",
            "Found".bright_green(),
            input_files.len().to_string().bright_white().bold()
        );
    }

    let processor = BatchProcessor::new(args.to_batch_options());
    let summary = processor.process_batch(&input_files, &args.output_path).await?;

    if !args.quiet {
        print_summary(&summary);
    }

    Ok(summary)
}

/// Print the batch summary to the console
fn print_summary(summary: &BatchSummary) {
    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        summary.processing_time.as_millis()
    );
    println!(
        "  {} {}",
        "Files processed:".bright_cyan(),
        summary.files_processed.to_string().bright_white().bold()
    );
    if summary.files_failed > 0 {
        println!(
            "  {} {}",
            "Files failed:".bright_red(),
            summary.files_failed.to_string().bright_red().bold()
        );
        for failure in &summary.failures {
            println!(
                "    {} {}: {}",
                "✗".bright_red(),
                failure.path.display(),
                failure.error
            );
        }
    }
    println!(
        "  {} {}",
        "Records written:".bright_cyan(),
        summary.records_written.to_string().bright_white().bold()
    );
    println!(
        "  {} {}",
        "Output:".bright_cyan(),
        summary.output_path.display()
    );
}
