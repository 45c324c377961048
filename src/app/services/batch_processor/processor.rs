//! Batch pipeline implementation
//!
//! Files are parsed on blocking worker tasks and recombined through an
//! order-preserving bounded stream: up to `max_concurrent_files` parses run
//! at once, but results are consumed in input order, so the written record
//! sequence is identical to a sequential run of the same batch.

use std::path::{Path, PathBuf};
use std::time::Instant;

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::task;
use tracing::{debug, info, warn};

use crate::app::services::match_parser::{FileParseResult, MatchParser};
use crate::app::services::output_writer::RecordWriter;
use crate::config::BatchOptions;
use crate::{Error, Result};

use super::stats::{BatchSummary, FileFailure};

/// Orchestrates parsing a set of match files into one combined output file
#[derive(Debug, Default)]
pub struct BatchProcessor {
    options: BatchOptions,
}

impl BatchProcessor {
    /// Create a batch processor with the given options
    pub fn new(options: BatchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Process a batch of match files into a single JSON array at `output_path`
    ///
    /// Each file contributes its records in input order; files that fail to
    /// parse are recorded in the summary and skipped. The output file is
    /// written even when every input fails, as a valid empty array.
    pub async fn process_batch(
        &self,
        input_files: &[PathBuf],
        output_path: &Path,
    ) -> Result<BatchSummary> {
        self.options.validate()?;

        let start_time = Instant::now();
        let workers = self.options.effective_workers(input_files.len());

        info!(
            "Processing batch of {} match files with {} worker{}",
            input_files.len(),
            workers,
            if workers == 1 { "" } else { "s" }
        );

        let progress_bar = if self.options.show_progress && !input_files.is_empty() {
            Some(create_progress_bar(
                input_files.len() as u64,
                "Parsing match files...",
            ))
        } else {
            None
        };

        let results = self
            .parse_files(input_files, workers, progress_bar.as_ref())
            .await?;

        let mut sequences: Vec<Vec<crate::app::models::FlatDeliveryRecord>> = Vec::new();
        let mut failures = Vec::new();

        for file_result in results {
            match file_result.result {
                Ok(records) => {
                    debug!(
                        "Parsed {} records from {}",
                        records.len(),
                        file_result.path.display()
                    );
                    sequences.push(records);
                }
                Err(error) => {
                    warn!("Failed to parse {}: {}", file_result.path.display(), error);
                    failures.push(FileFailure {
                        path: file_result.path,
                        error,
                    });
                }
            }
        }

        let writer = RecordWriter::new(output_path);
        let write_stats = writer.write_concatenated(&sequences, self.options.stream)?;

        if let Some(pb) = &progress_bar {
            pb.finish_with_message(format!(
                "Completed: {} files parsed, {} records written",
                sequences.len(),
                write_stats.records_written
            ));
        }

        let summary = BatchSummary {
            files_processed: sequences.len(),
            files_failed: failures.len(),
            records_written: write_stats.records_written,
            bytes_written: write_stats.bytes_written,
            failures,
            processing_time: start_time.elapsed(),
            output_path: output_path.to_path_buf(),
        };

        info!(
            "Batch complete: {}/{} files in {:.2}s ({:.1} files/sec), {} records written",
            summary.files_processed,
            summary.total_files(),
            summary.processing_time.as_secs_f64(),
            summary.files_per_second(),
            summary.records_written
        );

        Ok(summary)
    }

    /// Parse all files, preserving input order in the results
    ///
    /// `buffered` polls up to `workers` parse tasks concurrently but yields
    /// completions in submission order, so no reordering pass is needed.
    async fn parse_files(
        &self,
        input_files: &[PathBuf],
        workers: usize,
        progress_bar: Option<&ProgressBar>,
    ) -> Result<Vec<FileParseResult>> {
        let mut parsed = stream::iter(input_files.to_vec())
            .map(|path| {
                task::spawn_blocking(move || {
                    let result = MatchParser::new().parse_file(&path);
                    FileParseResult { path, result }
                })
            })
            .buffered(workers);

        let mut results = Vec::with_capacity(input_files.len());
        while let Some(joined) = parsed.next().await {
            let file_result = joined.map_err(|e| {
                Error::processing_interrupted(format!("parser worker task failed: {}", e))
            })?;

            if let Some(pb) = progress_bar {
                pb.inc(1);
            }
            results.push(file_result);
        }

        Ok(results)
    }
}

/// Create a progress bar with appropriate styling
fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} [{per_sec}] ETA: {eta}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::batch_processor::BatchOutcome;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn match_json(match_type: &str, batter_runs: u32) -> String {
        json!({
            "info": {
                "teams": ["England", "Australia"],
                "match_type": match_type,
                "dates": ["2024-06-01"]
            },
            "innings": [
                {"team": "England", "overs": [{"over": 0, "deliveries": [
                    {"batter": "J Root", "bowler": "M Starc", "non_striker": "B Duckett",
                     "runs": {"batter": batter_runs, "extras": 0, "total": batter_runs}}
                ]}]}
            ]
        })
        .to_string()
    }

    fn write_fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn read_output(path: &Path) -> Vec<crate::app::models::FlatDeliveryRecord> {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_sequential_batch_all_files_succeed() {
        let temp_dir = TempDir::new().unwrap();
        let files = vec![
            write_fixture(&temp_dir, "a.json", &match_json("T20", 1)),
            write_fixture(&temp_dir, "b.json", &match_json("ODI", 2)),
        ];
        let output = temp_dir.path().join("out.json");

        let processor = BatchProcessor::new(BatchOptions::default());
        let summary = processor.process_batch(&files, &output).await.unwrap();

        assert_eq!(summary.outcome(), BatchOutcome::Complete);
        assert_eq!(summary.files_processed, 2);
        assert_eq!(summary.records_written, 2);

        let records = read_output(&output);
        assert_eq!(records[0].match_id.as_deref(), Some("a"));
        assert_eq!(records[1].match_id.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_surviving_records() {
        let temp_dir = TempDir::new().unwrap();
        let files = vec![
            write_fixture(&temp_dir, "good1.json", &match_json("T20", 1)),
            write_fixture(&temp_dir, "broken.json", "{not json"),
            write_fixture(&temp_dir, "good2.json", &match_json("Test", 3)),
        ];
        let output = temp_dir.path().join("out.json");

        let processor = BatchProcessor::new(BatchOptions::default());
        let summary = processor.process_batch(&files, &output).await.unwrap();

        assert_eq!(summary.outcome(), BatchOutcome::Partial);
        assert_eq!(summary.files_processed, 2);
        assert_eq!(summary.files_failed, 1);
        assert_eq!(summary.failures.len(), 1);
        assert!(summary.failures[0].path.ends_with("broken.json"));

        let ids: Vec<Option<String>> = read_output(&output)
            .into_iter()
            .map(|r| r.match_id)
            .collect();
        assert_eq!(
            ids,
            vec![Some("good1".to_string()), Some("good2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_fully_failed_batch_writes_empty_array() {
        let temp_dir = TempDir::new().unwrap();
        let files = vec![
            write_fixture(&temp_dir, "bad1.json", "{"),
            write_fixture(&temp_dir, "bad2.json", "[]"),
        ];
        let output = temp_dir.path().join("out.json");

        let processor = BatchProcessor::new(BatchOptions::default());
        let summary = processor.process_batch(&files, &output).await.unwrap();

        assert_eq!(summary.outcome(), BatchOutcome::Failed);
        assert_eq!(summary.records_written, 0);
        assert!(read_output(&output).is_empty());
    }

    #[tokio::test]
    async fn test_parallel_matches_sequential_output() {
        let temp_dir = TempDir::new().unwrap();
        let files: Vec<PathBuf> = (0..8)
            .map(|i| {
                write_fixture(
                    &temp_dir,
                    &format!("match{}.json", i),
                    &match_json("T20", i % 4),
                )
            })
            .collect();

        let sequential_out = temp_dir.path().join("sequential.json");
        let parallel_out = temp_dir.path().join("parallel.json");

        BatchProcessor::new(BatchOptions::default())
            .process_batch(&files, &sequential_out)
            .await
            .unwrap();
        BatchProcessor::new(BatchOptions {
            parallel: true,
            max_concurrent_files: 4,
            ..Default::default()
        })
        .process_batch(&files, &parallel_out)
        .await
        .unwrap();

        assert_eq!(read_output(&sequential_out), read_output(&parallel_out));
    }

    #[tokio::test]
    async fn test_empty_batch_writes_empty_array() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("out.json");

        let processor = BatchProcessor::new(BatchOptions::default());
        let summary = processor.process_batch(&[], &output).await.unwrap();

        assert_eq!(summary.outcome(), BatchOutcome::Complete);
        assert_eq!(summary.total_files(), 0);
        assert!(read_output(&output).is_empty());
    }

    #[tokio::test]
    async fn test_invalid_options_rejected_before_processing() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("out.json");

        let processor = BatchProcessor::new(BatchOptions {
            max_concurrent_files: 0,
            ..Default::default()
        });
        let result = processor.process_batch(&[], &output).await;

        assert!(matches!(result, Err(Error::Configuration { .. })));
        assert!(!output.exists());
    }
}
