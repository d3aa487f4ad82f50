use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::debug;
use serde::Serialize;

use crate::delivery::Delivery;

/// Innings numbers offered for prediction.
pub const INNINGS_SELECTOR: [u32; 2] = [1, 2];

/// One team's batting turn in one match, reduced to the three training aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InningsSummary {
    pub match_id: u64,
    pub batting_team: String,
    pub innings: u32,
    pub final_score: u64,
    pub total_balls: u32,
    pub wickets_lost: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryTable {
    rows: Vec<InningsSummary>,
}

#[derive(Debug, Default)]
struct Accumulator {
    runs: u64,
    max_ball: u32,
    wickets: u32,
}

/// Folds deliveries into per-innings rows keyed by (match, batting team, innings).
///
/// Ball numbers run per (match, innings) in record order; a group's `total_balls`
/// is the highest ball number among its own deliveries. Balls with no batting
/// team take a number but join no group.
pub fn summarize_innings(deliveries: &[Delivery]) -> SummaryTable {
    let mut ball_counter: HashMap<(u64, u32), u32> = HashMap::new();
    let mut groups: BTreeMap<(u64, &str, u32), Accumulator> = BTreeMap::new();
    let mut teamless = 0usize;

    for d in deliveries {
        let ball = ball_counter.entry((d.match_id, d.innings)).or_insert(0);
        *ball += 1;
        if !d.has_team() {
            teamless += 1;
            continue;
        }

        let acc = groups
            .entry((d.match_id, d.batting_team.as_str(), d.innings))
            .or_default();
        acc.runs += u64::from(d.total_run);
        acc.max_ball = acc.max_ball.max(*ball);
        if d.is_wicket {
            acc.wickets += 1;
        }
    }

    let rows: Vec<InningsSummary> = groups
        .into_iter()
        .map(|((match_id, team, innings), acc)| InningsSummary {
            match_id,
            batting_team: team.to_string(),
            innings,
            final_score: acc.runs,
            total_balls: acc.max_ball,
            wickets_lost: acc.wickets,
        })
        .collect();

    debug!(
        "aggregated {} deliveries into {} innings ({} without a batting team)",
        deliveries.len(),
        rows.len(),
        teamless
    );
    SummaryTable { rows }
}

impl SummaryTable {
    pub fn from_rows(rows: Vec<InningsSummary>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[InningsSummary] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct batting teams, always sorted so selectors are stable across loads.
    pub fn teams(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r.batting_team.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Rows for exactly this team name and innings number. Case-sensitive.
    pub fn matching<'a>(
        &'a self,
        team: &'a str,
        innings: u32,
    ) -> impl Iterator<Item = &'a InningsSummary> + 'a {
        self.rows
            .iter()
            .filter(move |r| r.batting_team == team && r.innings == innings)
    }

    pub fn total_runs(&self) -> u64 {
        self.rows.iter().map(|r| r.final_score).sum()
    }
}
