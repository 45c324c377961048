//! Cricsheet Processor Library
//!
//! A Rust library for flattening ball-by-ball cricket match data from the
//! nested cricsheet.org JSON format into denormalized delivery records
//! suitable for columnar and time-series ingestion.
//!
//! This library provides tools for:
//! - Parsing cricsheet match documents with top-level shape validation
//! - Flattening innings/overs/deliveries into one record per delivery
//! - Writing combined JSON array output, buffered or streamed incrementally
//! - Batch processing many match files, sequentially or in parallel, with
//!   deterministic output ordering and per-file error reporting

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod batch_processor;
        pub mod flattener;
        pub mod match_parser;
        pub mod output_writer;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{FlatDeliveryRecord, MatchDocument, MatchFormat};
pub use app::services::batch_processor::{BatchOutcome, BatchProcessor, BatchSummary};
pub use app::services::flattener::flatten;
pub use app::services::match_parser::{FileParseResult, MatchParser};
pub use app::services::output_writer::RecordWriter;
pub use config::BatchOptions;

/// Result type alias for the cricsheet processor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cricsheet processing operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Source unreadable or destination unwritable
    #[error("I/O error for '{path}': {message}")]
    Io {
        path: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON that cannot be decoded into the match document shape, or a
    /// document that lacks required structure or a recognized format tag
    #[error("malformed match document '{file}': {message}")]
    MalformedDocument { file: String, message: String },

    /// A record that cannot be encoded to JSON output
    #[error("serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration error
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Processing interrupted
    #[error("processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with the path it concerns
    pub fn io(path: impl Into<String>, message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a malformed document error
    pub fn malformed_document(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            path: "unknown".to_string(),
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}
