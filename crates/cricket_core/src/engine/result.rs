use serde::{Deserialize, Serialize};
use std::fmt;

use super::scoring::compute_innings_score;
use crate::models::{MatchState, MatchStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Margin {
    Runs(u32),
    Wickets(u32),
    Tie,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// `None` for a tie.
    pub winner: Option<String>,
    pub margin: Margin,
    pub first_innings_total: u32,
    pub second_innings_total: u32,
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.winner, self.margin) {
            (Some(team), Margin::Runs(n)) => write!(f, "{} won by {} run{}", team, n, plural(n)),
            (Some(team), Margin::Wickets(n)) => write!(f, "{} won by {} wicket{}", team, n, plural(n)),
            _ => f.write_str("Match tied"),
        }
    }
}

fn plural(n: u32) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Winner and margin of a finished match.
///
/// The chasing side wins by the wickets it had left once it passes the first
/// innings total; otherwise the side batting first wins by the run difference.
pub fn decide_result(state: &MatchState) -> Option<MatchResult> {
    if state.status != MatchStatus::Finished {
        return None;
    }

    let first = compute_innings_score(&state.innings[0].events);
    let second = compute_innings_score(&state.innings[1].events);

    let (winner, margin) = if second.total_runs > first.total_runs {
        let left = state.max_wickets().saturating_sub(second.total_wickets);
        (Some(state.innings[1].team_name.clone()), Margin::Wickets(left))
    } else if second.total_runs < first.total_runs {
        (Some(state.innings[0].team_name.clone()), Margin::Runs(first.total_runs - second.total_runs))
    } else {
        (None, Margin::Tie)
    };

    Some(MatchResult {
        winner,
        margin,
        first_innings_total: first.total_runs,
        second_innings_total: second.total_runs,
    })
}
