//! Delivery flattening service
//!
//! Transforms one validated match document into an ordered sequence of flat
//! delivery records. Traversal order is innings, then over, then ball, and the
//! emitted count always equals the total delivery count: a delivery with
//! missing optional fields is emitted with nulls and zero defaults, never
//! dropped. The flattener performs no I/O and never fails on a document that
//! passed parser validation.

use crate::app::models::{Delivery, FlatDeliveryRecord, Innings, MatchDocument, MatchInfo, Over};

/// Match-level fields denormalized into every record, built once per document
struct MatchContext {
    match_id: Option<String>,
    match_date: Option<String>,
    match_type: String,
    venue: Option<String>,
    city: Option<String>,
    teams: Vec<String>,
    gender: Option<String>,
    event_name: Option<String>,
    winner: Option<String>,
    win_margin: Option<u32>,
    win_margin_type: Option<String>,
    toss_winner: Option<String>,
    toss_decision: Option<String>,
}

impl MatchContext {
    fn from_info(info: &MatchInfo, match_id: Option<&str>) -> Self {
        let (winner, win_margin, win_margin_type) = match &info.outcome {
            Some(outcome) => {
                let margin = outcome.by.as_ref().and_then(|by| {
                    by.runs
                        .map(|runs| (runs, "runs"))
                        .or_else(|| by.wickets.map(|wickets| (wickets, "wickets")))
                });
                (
                    outcome.winner.clone(),
                    margin.map(|(value, _)| value),
                    margin.map(|(_, kind)| kind.to_string()),
                )
            }
            None => (None, None, None),
        };

        Self {
            match_id: match_id.map(|id| id.to_string()),
            match_date: info.dates.first().cloned(),
            match_type: info.match_type.clone().unwrap_or_default(),
            venue: info.venue.clone(),
            city: info.city.clone(),
            teams: info.teams.clone(),
            gender: info.gender.clone(),
            event_name: info.event.as_ref().and_then(|event| event.name.clone()),
            winner,
            win_margin,
            win_margin_type,
            toss_winner: info.toss.as_ref().and_then(|toss| toss.winner.clone()),
            toss_decision: info.toss.as_ref().and_then(|toss| toss.decision.clone()),
        }
    }

    /// The team not batting this innings
    fn bowling_team(&self, batting_team: &str) -> Option<String> {
        self.teams
            .iter()
            .find(|team| team.as_str() != batting_team)
            .cloned()
    }
}

/// Flatten a match document into one record per delivery
///
/// `match_id` identifies the source document (the file stem when parsed from
/// a file) and is copied verbatim into every record. Calling this twice on the
/// same document yields identical output; the document is never mutated.
pub fn flatten(doc: &MatchDocument, match_id: Option<&str>) -> Vec<FlatDeliveryRecord> {
    let context = MatchContext::from_info(&doc.info, match_id);
    let mut records = Vec::new();

    for (innings_index, innings) in doc.innings.iter().enumerate() {
        flatten_innings(&context, innings, innings_index, &mut records);
    }

    records
}

fn flatten_innings(
    context: &MatchContext,
    innings: &Innings,
    innings_index: usize,
    records: &mut Vec<FlatDeliveryRecord>,
) {
    let bowling_team = context.bowling_team(&innings.team);

    for over in &innings.overs {
        flatten_over(
            context,
            over,
            innings_index,
            &innings.team,
            bowling_team.as_deref(),
            records,
        );
    }
}

fn flatten_over(
    context: &MatchContext,
    over: &Over,
    innings_index: usize,
    batting_team: &str,
    bowling_team: Option<&str>,
    records: &mut Vec<FlatDeliveryRecord>,
) {
    // Ball position is 1 + index over every delivery bowled, wides and
    // no-balls included; legal-ball renumbering is a downstream concern.
    for (ball_index, delivery) in over.deliveries.iter().enumerate() {
        records.push(flatten_delivery(
            context,
            delivery,
            innings_index,
            batting_team,
            bowling_team,
            over.number,
            ball_index as u32 + 1,
        ));
    }
}

fn flatten_delivery(
    context: &MatchContext,
    delivery: &Delivery,
    innings_index: usize,
    batting_team: &str,
    bowling_team: Option<&str>,
    over_number: u32,
    ball_number: u32,
) -> FlatDeliveryRecord {
    let extras = delivery.runs.extras;
    let extras_counts = delivery.extras.clone().unwrap_or_default();

    // Explicit total wins when present; otherwise batter runs plus the
    // itemized extras counts.
    let runs_total = delivery
        .runs
        .total
        .unwrap_or(delivery.runs.batter + extras_counts.sum());

    // At most one wicket is flattened; cricsheet records multiple entries only
    // for simultaneous run-out scenarios.
    let wicket = delivery.wickets.first();

    FlatDeliveryRecord {
        match_id: context.match_id.clone(),
        match_date: context.match_date.clone(),
        match_type: context.match_type.clone(),
        venue: context.venue.clone(),
        city: context.city.clone(),
        teams: context.teams.clone(),
        gender: context.gender.clone(),
        event_name: context.event_name.clone(),
        winner: context.winner.clone(),
        win_margin: context.win_margin,
        win_margin_type: context.win_margin_type.clone(),
        toss_winner: context.toss_winner.clone(),
        toss_decision: context.toss_decision.clone(),
        innings_index,
        batting_team: batting_team.to_string(),
        bowling_team: bowling_team.map(|team| team.to_string()),
        over_number,
        ball_number,
        batter: delivery.batter.clone(),
        non_striker: delivery.non_striker.clone(),
        bowler: delivery.bowler.clone(),
        runs_batter: delivery.runs.batter,
        extras_wides: extras_counts.wides,
        extras_noballs: extras_counts.noballs,
        extras_byes: extras_counts.byes,
        extras_legbyes: extras_counts.legbyes,
        extras_penalty: extras_counts.penalty,
        runs_extras: extras,
        runs_total,
        is_wicket: wicket.is_some(),
        wicket_kind: wicket.and_then(|w| w.kind.clone()),
        wicket_player_out: wicket.and_then(|w| w.player_out.clone()),
        wicket_fielders: wicket
            .map(|w| w.fielders.iter().filter_map(|f| f.name.clone()).collect())
            .unwrap_or_default(),
    }
}
