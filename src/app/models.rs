//! Data models for cricsheet match processing
//!
//! This module contains the structures representing one parsed match document
//! (the nested cricsheet JSON shape) and the flat delivery record emitted for
//! analytics ingestion. The document model is structural only: it is built
//! once per parse, read during flattening, and discarded.

use crate::constants::{DEFAULT_BALLS_PER_OVER, FORMAT_TAGS};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// Match Document Structure
// =============================================================================

/// One parsed match: metadata plus innings in chronological batting order
///
/// Unknown fields in the source JSON are ignored for forward compatibility;
/// only the fields consumed by flattening are modeled.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchDocument {
    /// Match-level metadata
    pub info: MatchInfo,

    /// Innings in the order batted; multi-day matches may have more than two
    pub innings: Vec<Innings>,
}

/// Match-level metadata from the `info` section
#[derive(Debug, Clone, Deserialize)]
pub struct MatchInfo {
    /// Ordered pair of team names
    pub teams: Vec<String>,

    /// Match format tag (T20, ODI, Test and domestic variants), carried
    /// verbatim into output records
    pub match_type: Option<String>,

    /// Match dates; the first entry is the match date in output records
    #[serde(default)]
    pub dates: Vec<String>,

    pub venue: Option<String>,
    pub city: Option<String>,

    /// Gender category of the match (men/women)
    pub gender: Option<String>,

    /// Balls per over for this match
    #[serde(default = "default_balls_per_over")]
    pub balls_per_over: u32,

    /// Tournament or series information
    pub event: Option<Event>,

    pub toss: Option<Toss>,
    pub outcome: Option<Outcome>,
}

fn default_balls_per_over() -> u32 {
    DEFAULT_BALLS_PER_OVER
}

/// Tournament or series information
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub name: Option<String>,
}

/// Toss result
#[derive(Debug, Clone, Deserialize)]
pub struct Toss {
    pub winner: Option<String>,
    pub decision: Option<String>,
}

/// Match outcome
#[derive(Debug, Clone, Deserialize)]
pub struct Outcome {
    pub winner: Option<String>,
    pub by: Option<WinMargin>,
}

/// Margin of victory, expressed in runs or wickets
#[derive(Debug, Clone, Deserialize)]
pub struct WinMargin {
    pub runs: Option<u32>,
    pub wickets: Option<u32>,
}

/// One innings: the batting team and its overs in bowling order
///
/// Over numbers are strictly increasing as encountered but need not be
/// contiguous; gaps are passed through, never inferred.
#[derive(Debug, Clone, Deserialize)]
pub struct Innings {
    /// Batting team name; must match one of the two teams in `info`
    pub team: String,

    #[serde(default)]
    pub overs: Vec<Over>,
}

/// One over and its deliveries in the order bowled
#[derive(Debug, Clone, Deserialize)]
pub struct Over {
    /// Over number, 0-indexed
    #[serde(rename = "over")]
    pub number: u32,

    #[serde(default)]
    pub deliveries: Vec<Delivery>,
}

/// One delivery as recorded in the source document
#[derive(Debug, Clone, Deserialize)]
pub struct Delivery {
    pub batter: Option<String>,
    pub bowler: Option<String>,
    pub non_striker: Option<String>,

    /// Runs breakdown for this delivery
    #[serde(default)]
    pub runs: Runs,

    /// Extras by type; absent when the delivery conceded none
    pub extras: Option<Extras>,

    /// Wickets falling on this delivery; usually at most one
    #[serde(default)]
    pub wickets: Vec<Wicket>,
}

/// Runs sub-record of a delivery
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Runs {
    #[serde(default)]
    pub batter: u32,

    #[serde(default)]
    pub extras: u32,

    /// Explicit total; trusted when present, computed from batter runs plus
    /// extras counts when absent
    pub total: Option<u32>,
}

/// Extras counts by type, each defaulting to 0 when absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Extras {
    #[serde(default)]
    pub wides: u32,
    #[serde(default)]
    pub noballs: u32,
    #[serde(default)]
    pub byes: u32,
    #[serde(default)]
    pub legbyes: u32,
    #[serde(default)]
    pub penalty: u32,
}

impl Extras {
    /// Total extra runs conceded on the delivery
    pub fn sum(&self) -> u32 {
        self.wides + self.noballs + self.byes + self.legbyes + self.penalty
    }
}

/// Dismissal details for a wicket falling on a delivery
#[derive(Debug, Clone, Deserialize)]
pub struct Wicket {
    pub kind: Option<String>,
    pub player_out: Option<String>,

    #[serde(default)]
    pub fielders: Vec<Fielder>,
}

/// A fielder involved in a dismissal
#[derive(Debug, Clone, Deserialize)]
pub struct Fielder {
    pub name: Option<String>,
}

// =============================================================================
// Match Format Tag
// =============================================================================

/// Recognized match formats
///
/// Cricsheet archives tag domestic variants separately (IT20, ODM, MDM); the
/// aliases are accepted for validation while the verbatim tag is carried into
/// output records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchFormat {
    /// Limited overs, twenty overs per side
    T20,
    /// Limited overs, fifty overs per side
    Odi,
    /// Multi-day, multiple innings per side
    Test,
}

impl MatchFormat {
    /// Whether this format allows more than one innings per side
    pub fn is_multi_day(self) -> bool {
        matches!(self, MatchFormat::Test)
    }
}

impl FromStr for MatchFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "T20" | "IT20" => Ok(MatchFormat::T20),
            "ODI" | "ODM" => Ok(MatchFormat::Odi),
            "Test" | "MDM" => Ok(MatchFormat::Test),
            other => Err(Error::malformed_document(
                "unknown",
                format!(
                    "unrecognized match format tag '{}': expected one of {}",
                    other,
                    FORMAT_TAGS.join(", ")
                ),
            )),
        }
    }
}

impl std::fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            MatchFormat::T20 => "T20",
            MatchFormat::Odi => "ODI",
            MatchFormat::Test => "Test",
        };
        write!(f, "{}", tag)
    }
}

// =============================================================================
// Flat Delivery Record
// =============================================================================

/// One denormalized output record per delivery
///
/// Carries the full match context on every record so downstream consumers
/// never need a join. Record order equals document traversal order (innings,
/// then over, then ball), which downstream replay relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatDeliveryRecord {
    /// Source file stem when the document came from a file
    pub match_id: Option<String>,
    pub match_date: Option<String>,
    /// Format tag carried verbatim from the source document
    pub match_type: String,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub teams: Vec<String>,
    pub gender: Option<String>,
    pub event_name: Option<String>,
    pub winner: Option<String>,
    pub win_margin: Option<u32>,
    pub win_margin_type: Option<String>,
    pub toss_winner: Option<String>,
    pub toss_decision: Option<String>,

    /// Innings index, 0-based in batting order
    pub innings_index: usize,
    pub batting_team: String,
    pub bowling_team: Option<String>,
    /// Over number as encountered in the source, 0-indexed
    pub over_number: u32,
    /// Ball position within the over, 1-based over all deliveries bowled
    pub ball_number: u32,

    pub batter: Option<String>,
    pub non_striker: Option<String>,
    pub bowler: Option<String>,

    pub runs_batter: u32,
    pub extras_wides: u32,
    pub extras_noballs: u32,
    pub extras_byes: u32,
    pub extras_legbyes: u32,
    pub extras_penalty: u32,
    pub runs_extras: u32,
    pub runs_total: u32,

    pub is_wicket: bool,
    pub wicket_kind: Option<String>,
    pub wicket_player_out: Option<String>,
    pub wicket_fielders: Vec<String>,
}
