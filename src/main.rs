use clap::Parser;
use cricsheet_processor::BatchOutcome;
use cricsheet_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    if let Err(error) = commands::setup_logging(&args) {
        eprintln!("Failed to initialize logging: {}", error);
        process::exit(2);
    }

    // Create async runtime and run the pipeline with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(2);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => result,
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(cricsheet_processor::Error::processing_interrupted(
                    "Processing interrupted by user".to_string(),
                ))
            }
        }
    });

    // Exit code reflects the batch outcome: partial batches still produce
    // usable output but signal that some inputs were skipped.
    match result {
        Ok(summary) => match summary.outcome() {
            BatchOutcome::Complete => process::exit(0),
            BatchOutcome::Partial => process::exit(1),
            BatchOutcome::Failed => process::exit(2),
        },
        Err(error) => {
            eprintln!("Error: {}", error);
            process::exit(2);
        }
    }
}
