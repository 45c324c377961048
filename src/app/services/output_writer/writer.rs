//! JSON array writer for flat delivery records
//!
//! Both write modes produce the same JSON array; they differ only in how the
//! bytes reach the file. Buffered mode serializes the whole sequence in one
//! pass; streamed mode emits the opening bracket, each record with its
//! separator, and the closing bracket, holding no more than one record's
//! serialization in memory at a time.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::app::models::FlatDeliveryRecord;
use crate::{Error, Result};

/// Writer owning one destination path for the duration of a write call
#[derive(Debug)]
pub struct RecordWriter {
    output_path: PathBuf,
}

/// Statistics from a completed write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteStats {
    pub records_written: usize,
    pub bytes_written: u64,
}

impl RecordWriter {
    /// Create a writer for the given destination file
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Write one record sequence as a JSON array
    pub fn write(&self, records: &[FlatDeliveryRecord], stream: bool) -> Result<WriteStats> {
        self.write_refs(records.iter().collect(), stream)
    }

    /// Write several per-file record sequences as one JSON array,
    /// concatenated in the order given
    pub fn write_concatenated(
        &self,
        sequences: &[Vec<FlatDeliveryRecord>],
        stream: bool,
    ) -> Result<WriteStats> {
        let records: Vec<&FlatDeliveryRecord> =
            sequences.iter().flat_map(|sequence| sequence.iter()).collect();
        self.write_refs(records, stream)
    }

    fn write_refs(&self, records: Vec<&FlatDeliveryRecord>, stream: bool) -> Result<WriteStats> {
        let staging_dir = match self.output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Staged in the destination directory so the final persist is an
        // atomic rename; dropping the temp file on any error path removes it.
        let mut temp_file = NamedTempFile::new_in(staging_dir).map_err(|e| {
            Error::io(
                self.output_path.display().to_string(),
                "failed to create temporary output file",
                e,
            )
        })?;

        let records_written = records.len();
        {
            let mut buffered = BufWriter::new(temp_file.as_file_mut());
            if stream {
                self.serialize_streamed(&records, &mut buffered)?;
            } else {
                self.serialize_buffered(&records, &mut buffered)?;
            }
            buffered
                .flush()
                .map_err(|e| self.io_error("failed to flush output", e))?;
        }

        let bytes_written = temp_file
            .as_file()
            .metadata()
            .map_err(|e| self.io_error("failed to stat output", e))?
            .len();

        temp_file.persist(&self.output_path).map_err(|e| {
            Error::io(
                self.output_path.display().to_string(),
                "failed to finalize output file",
                e.error,
            )
        })?;

        info!(
            "Wrote {} records ({} bytes) to {}",
            records_written,
            bytes_written,
            self.output_path.display()
        );

        Ok(WriteStats {
            records_written,
            bytes_written,
        })
    }

    /// Serialize the full sequence as one JSON array in a single pass
    fn serialize_buffered<W: Write>(
        &self,
        records: &[&FlatDeliveryRecord],
        writer: &mut W,
    ) -> Result<()> {
        debug!("Buffered write of {} records", records.len());
        serde_json::to_writer(writer, records)
            .map_err(|e| Error::serialization("failed to encode record array", e))
    }

    /// Emit the array incrementally, one record at a time
    fn serialize_streamed<W: Write>(
        &self,
        records: &[&FlatDeliveryRecord],
        writer: &mut W,
    ) -> Result<()> {
        debug!("Streamed write of {} records", records.len());

        writer
            .write_all(b"[")
            .map_err(|e| self.io_error("failed to write output", e))?;

        for (index, record) in records.iter().enumerate() {
            if index > 0 {
                writer
                    .write_all(b",")
                    .map_err(|e| self.io_error("failed to write output", e))?;
            }
            serde_json::to_writer(&mut *writer, record)
                .map_err(|e| Error::serialization("failed to encode record", e))?;
        }

        writer
            .write_all(b"]")
            .map_err(|e| self.io_error("failed to write output", e))
    }

    fn io_error(&self, message: &str, source: std::io::Error) -> Error {
        Error::io(self.output_path.display().to_string(), message, source)
    }
}
