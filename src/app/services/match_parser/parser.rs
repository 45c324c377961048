//! Core match parser implementation
//!
//! Deserializes one JSON document into the match document shape, validates
//! the required structure (present `info` and `innings`, recognized format
//! tag, exactly two teams, innings teams drawn from that pair), and invokes
//! the flattener. Unknown fields in the source are ignored, never rejected.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::app::models::{FlatDeliveryRecord, MatchDocument, MatchFormat};
use crate::app::services::flattener;
use crate::constants::MATCH_FILE_EXTENSION;
use crate::{Error, Result};

/// Parser for cricsheet match documents
///
/// The parser is synchronous: reading and decoding one file is blocking
/// CPU-bound work, dispatched through `spawn_blocking` by the batch layer
/// when parallelism is requested.
#[derive(Debug, Default)]
pub struct MatchParser;

/// Outcome of parsing one file within a directory or batch
///
/// Failures are carried per file so one malformed document never aborts its
/// siblings.
#[derive(Debug)]
pub struct FileParseResult {
    pub path: PathBuf,
    pub result: Result<Vec<FlatDeliveryRecord>>,
}

impl MatchParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a single match file into flat delivery records
    ///
    /// The file stem becomes the match id on every emitted record.
    pub fn parse_file(&self, file_path: &Path) -> Result<Vec<FlatDeliveryRecord>> {
        debug!("Parsing match file: {}", file_path.display());

        let bytes = std::fs::read(file_path).map_err(|e| {
            Error::io(
                file_path.display().to_string(),
                "failed to read match file",
                e,
            )
        })?;

        let match_id = file_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(|stem| stem.to_string());

        self.parse_bytes(&bytes, match_id.as_deref())
    }

    /// Parse an in-memory JSON document into flat delivery records
    ///
    /// `source` labels the document in errors and becomes the match id on
    /// emitted records when present.
    pub fn parse_bytes(
        &self,
        bytes: &[u8],
        source: Option<&str>,
    ) -> Result<Vec<FlatDeliveryRecord>> {
        let label = source.unwrap_or("<memory>");

        let doc: MatchDocument = serde_json::from_slice(bytes)
            .map_err(|e| Error::malformed_document(label, e.to_string()))?;

        self.validate_document(&doc, label)?;

        let records = flattener::flatten(&doc, source);
        debug!(
            "Flattened {} deliveries across {} innings from '{}'",
            records.len(),
            doc.innings.len(),
            label
        );

        Ok(records)
    }

    /// Parse every match file in a directory, one result per file
    ///
    /// Enumeration is non-recursive and deterministic: `.json` files in
    /// lexical filename order. A failing file is recorded in its own result
    /// and does not abort the remaining files.
    pub fn parse_directory(&self, directory: &Path) -> Result<Vec<FileParseResult>> {
        let files = discover_match_files(directory)?;
        info!(
            "Parsing {} match files from {}",
            files.len(),
            directory.display()
        );

        let results: Vec<FileParseResult> = files
            .into_iter()
            .map(|path| {
                let result = self.parse_file(&path);
                if let Err(error) = &result {
                    warn!("Failed to parse {}: {}", path.display(), error);
                }
                FileParseResult { path, result }
            })
            .collect();

        Ok(results)
    }

    /// Validate the document shape the flattener relies on
    fn validate_document(&self, doc: &MatchDocument, label: &str) -> Result<()> {
        let format_tag = doc
            .info
            .match_type
            .as_deref()
            .ok_or_else(|| Error::malformed_document(label, "missing info.match_type"))?;

        MatchFormat::from_str(format_tag)
            .map_err(|_| {
                Error::malformed_document(
                    label,
                    format!("unrecognized match format tag '{}'", format_tag),
                )
            })?;

        if doc.info.teams.len() != 2 {
            return Err(Error::malformed_document(
                label,
                format!(
                    "expected exactly 2 teams in info.teams, found {}",
                    doc.info.teams.len()
                ),
            ));
        }

        if doc.innings.is_empty() {
            return Err(Error::malformed_document(label, "document has no innings"));
        }

        for (index, innings) in doc.innings.iter().enumerate() {
            if !doc.info.teams.contains(&innings.team) {
                return Err(Error::malformed_document(
                    label,
                    format!(
                        "innings {} batting team '{}' is not one of the match teams",
                        index, innings.team
                    ),
                ));
            }
        }

        Ok(())
    }
}

/// Enumerate match files in a directory in deterministic lexical order
pub fn discover_match_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(directory).map_err(|e| {
        Error::io(
            directory.display().to_string(),
            "failed to read input directory",
            e,
        )
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path.extension().and_then(|ext| ext.to_str()) == Some(MATCH_FILE_EXTENSION)
        })
        .collect();

    // Sort by filename for consistent processing order
    files.sort_by_key(|path| path.file_name().map(|name| name.to_os_string()));

    debug!(
        "Discovered {} match files in {}",
        files.len(),
        directory.display()
    );

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn valid_match_json() -> String {
        json!({
            "info": {
                "teams": ["England", "Australia"],
                "match_type": "T20",
                "dates": ["2024-06-01"]
            },
            "innings": [
                {"team": "England", "overs": [{"over": 0, "deliveries": [
                    {"batter": "J Root", "bowler": "M Starc", "non_striker": "B Duckett",
                     "runs": {"batter": 4, "extras": 0, "total": 4}}
                ]}]}
            ]
        })
        .to_string()
    }

    #[test]
    fn test_parse_bytes_valid_document() {
        let parser = MatchParser::new();
        let records = parser
            .parse_bytes(valid_match_json().as_bytes(), Some("1001"))
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].match_id.as_deref(), Some("1001"));
        assert_eq!(records[0].ball_number, 1);
    }

    #[test]
    fn test_parse_bytes_rejects_invalid_json() {
        let parser = MatchParser::new();
        let result = parser.parse_bytes(b"{not json", None);
        assert!(matches!(result, Err(Error::MalformedDocument { .. })));
    }

    #[test]
    fn test_parse_bytes_rejects_missing_top_level_keys() {
        let parser = MatchParser::new();

        let no_innings = json!({"info": {"teams": ["A", "B"], "match_type": "T20"}}).to_string();
        assert!(matches!(
            parser.parse_bytes(no_innings.as_bytes(), None),
            Err(Error::MalformedDocument { .. })
        ));

        let no_info = json!({"innings": []}).to_string();
        assert!(matches!(
            parser.parse_bytes(no_info.as_bytes(), None),
            Err(Error::MalformedDocument { .. })
        ));
    }

    #[test]
    fn test_parse_bytes_rejects_missing_format_tag() {
        let parser = MatchParser::new();
        let doc = json!({
            "info": {"teams": ["A", "B"]},
            "innings": [{"team": "A", "overs": []}]
        })
        .to_string();

        let result = parser.parse_bytes(doc.as_bytes(), Some("no-format"));
        match result {
            Err(Error::MalformedDocument { file, message }) => {
                assert_eq!(file, "no-format");
                assert!(message.contains("match_type"));
            }
            other => panic!("Expected MalformedDocument, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_bytes_rejects_unrecognized_format_tag() {
        let parser = MatchParser::new();
        let doc = json!({
            "info": {"teams": ["A", "B"], "match_type": "T10"},
            "innings": [{"team": "A", "overs": []}]
        })
        .to_string();

        assert!(matches!(
            parser.parse_bytes(doc.as_bytes(), None),
            Err(Error::MalformedDocument { .. })
        ));
    }

    #[test]
    fn test_parse_bytes_rejects_empty_innings() {
        let parser = MatchParser::new();
        let doc = json!({
            "info": {"teams": ["A", "B"], "match_type": "ODI"},
            "innings": []
        })
        .to_string();

        assert!(matches!(
            parser.parse_bytes(doc.as_bytes(), None),
            Err(Error::MalformedDocument { .. })
        ));
    }

    #[test]
    fn test_parse_bytes_rejects_unknown_batting_team() {
        let parser = MatchParser::new();
        let doc = json!({
            "info": {"teams": ["A", "B"], "match_type": "Test"},
            "innings": [{"team": "C", "overs": []}]
        })
        .to_string();

        assert!(matches!(
            parser.parse_bytes(doc.as_bytes(), None),
            Err(Error::MalformedDocument { .. })
        ));
    }

    #[test]
    fn test_parse_bytes_ignores_unknown_fields() {
        let parser = MatchParser::new();
        let doc = json!({
            "meta": {"data_version": "1.1.0"},
            "info": {
                "teams": ["A", "B"],
                "match_type": "T20",
                "officials": {"umpires": ["U1"]}
            },
            "innings": [{"team": "A", "overs": [{"over": 0, "deliveries": [
                {"batter": "P", "bowler": "Q", "non_striker": "R",
                 "runs": {"batter": 1, "extras": 0, "total": 1},
                 "review": {"by": "B", "decision": "upheld"}}
            ]}]}]
        })
        .to_string();

        let records = parser.parse_bytes(doc.as_bytes(), None).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_parse_file_sets_match_id_from_stem() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("64815.json");
        fs::write(&file_path, valid_match_json()).unwrap();

        let parser = MatchParser::new();
        let records = parser.parse_file(&file_path).unwrap();
        assert_eq!(records[0].match_id.as_deref(), Some("64815"));
    }

    #[test]
    fn test_parse_file_missing_file_is_io_error() {
        let parser = MatchParser::new();
        let result = parser.parse_file(Path::new("/nonexistent/match.json"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_parse_directory_lexical_order_and_per_file_failures() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.json"), valid_match_json()).unwrap();
        fs::write(temp_dir.path().join("a.json"), valid_match_json()).unwrap();
        fs::write(temp_dir.path().join("c.json"), "{broken").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let parser = MatchParser::new();
        let results = parser.parse_directory(temp_dir.path()).unwrap();

        let names: Vec<String> = results
            .iter()
            .map(|r| r.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json", "c.json"]);

        assert!(results[0].result.is_ok());
        assert!(results[1].result.is_ok());
        assert!(results[2].result.is_err());
    }

    #[test]
    fn test_parse_directory_missing_directory_is_io_error() {
        let parser = MatchParser::new();
        let result = parser.parse_directory(Path::new("/nonexistent/dir"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
