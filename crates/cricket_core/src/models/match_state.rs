use serde::{Deserialize, Serialize};
use std::fmt;

use super::events::{BallEvent, MAX_RUNS_PER_BALL};
use super::match_setup::{OVERS_RANGE, PLAYERS_RANGE};
use super::player::PlayerId;
use crate::error::{MatchError, Result};

/// Lifecycle of a match. Transitions are governed by
/// `engine::state_machine::transition`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Setup,
    Toss,
    Live,
    Timeout,
    InningsBreak,
    Finished,
    /// Session layer: published but the scorer has not started the toss.
    Waiting,
    /// Session layer: the scorer closed the match room.
    Ended,
}

impl MatchStatus {
    /// Deliveries may only be recorded while play is live.
    pub fn accepts_deliveries(self) -> bool {
        self == MatchStatus::Live
    }

    /// Innings have begun and a scorecard exists.
    pub fn is_in_play(self) -> bool {
        matches!(
            self,
            MatchStatus::Live | MatchStatus::Timeout | MatchStatus::InningsBreak | MatchStatus::Finished
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Setup => "setup",
            MatchStatus::Toss => "toss",
            MatchStatus::Live => "live",
            MatchStatus::Timeout => "timeout",
            MatchStatus::InningsBreak => "innings_break",
            MatchStatus::Finished => "finished",
            MatchStatus::Waiting => "waiting",
            MatchStatus::Ended => "ended",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TossDecision {
    Bat,
    Bowl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inning {
    pub team_name: String,
    /// Insertion order is delivery order.
    pub events: Vec<BallEvent>,
    pub is_completed: bool,
}

impl Inning {
    pub fn new(team_name: impl Into<String>) -> Self {
        Self { team_name: team_name.into(), events: Vec::new(), is_completed: false }
    }

    pub fn last_event(&self) -> Option<&BallEvent> {
        self.events.last()
    }
}

/// Root aggregate: configuration, toss, both innings and the on-field actors.
///
/// Owned by the scorer; observers hold replicas that are replaced wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchState {
    pub team1: String,
    pub team2: String,
    pub overs_per_innings: u32,
    pub players_per_team: u32,

    pub toss_winner: Option<String>,
    pub toss_decision: Option<TossDecision>,
    pub batting_first: Option<String>,

    pub innings: [Inning; 2],
    /// 0 = first innings, 1 = the chase.
    pub current_inning_index: u8,
    pub status: MatchStatus,

    pub striker_id: PlayerId,
    pub non_striker_id: PlayerId,
    pub bowler_id: PlayerId,

    // Transient: present only while the matching status is active.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub innings_break_started_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub next_innings_starts_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timeout_started_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timeout_reason: Option<String>,
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchState {
    pub const DEFAULT_OVERS: u32 = 5;
    pub const DEFAULT_PLAYERS: u32 = 11;

    /// Blank match waiting for setup.
    pub fn new() -> Self {
        Self::lobby("", "", Self::DEFAULT_OVERS, Self::DEFAULT_PLAYERS)
    }

    /// Match created with known teams and limits, still in `setup`.
    pub fn lobby(
        team1: impl Into<String>,
        team2: impl Into<String>,
        overs_per_innings: u32,
        players_per_team: u32,
    ) -> Self {
        let team1 = team1.into();
        let team2 = team2.into();
        Self {
            innings: [Inning::new(team1.clone()), Inning::new(team2.clone())],
            team1,
            team2,
            overs_per_innings,
            players_per_team,
            toss_winner: None,
            toss_decision: None,
            batting_first: None,
            current_inning_index: 0,
            status: MatchStatus::Setup,
            striker_id: PlayerId::new("Batsman 1"),
            non_striker_id: PlayerId::new("Batsman 2"),
            bowler_id: PlayerId::new("Bowler 1"),
            innings_break_started_at: None,
            next_innings_starts_at: None,
            timeout_started_at: None,
            timeout_reason: None,
        }
    }

    pub fn max_wickets(&self) -> u32 {
        self.players_per_team.saturating_sub(1)
    }

    pub fn total_balls(&self) -> u32 {
        self.overs_per_innings.saturating_mul(6)
    }

    /// Reject a state whose limits or deliveries could not have come from a
    /// scoring session.
    pub fn check_limits(&self) -> Result<()> {
        if !OVERS_RANGE.contains(&self.overs_per_innings) {
            return Err(MatchError::CorruptState(format!(
                "{} overs per innings is outside {:?}",
                self.overs_per_innings, OVERS_RANGE
            )));
        }
        if !PLAYERS_RANGE.contains(&self.players_per_team) {
            return Err(MatchError::CorruptState(format!(
                "{} players per team is outside {:?}",
                self.players_per_team, PLAYERS_RANGE
            )));
        }
        if let Some(event) = self.all_events().find(|e| e.runs > MAX_RUNS_PER_BALL) {
            return Err(MatchError::CorruptState(format!(
                "delivery {} carries {} runs",
                event.id, event.runs
            )));
        }
        Ok(())
    }

    /// Current innings index, clamped so a corrupted replica cannot index out
    /// of bounds.
    pub fn current_index(&self) -> usize {
        usize::from(self.current_inning_index.min(1))
    }

    pub fn is_chasing(&self) -> bool {
        self.current_index() == 1
    }

    pub fn current_inning(&self) -> &Inning {
        &self.innings[self.current_index()]
    }

    pub fn current_inning_mut(&mut self) -> &mut Inning {
        let idx = self.current_index();
        &mut self.innings[idx]
    }

    /// Every delivery of the match, first innings first.
    pub fn all_events(&self) -> impl Iterator<Item = &BallEvent> {
        self.innings[0].events.iter().chain(self.innings[1].events.iter())
    }

    pub fn clear_break_marks(&mut self) {
        self.innings_break_started_at = None;
        self.next_innings_starts_at = None;
    }

    pub fn clear_timeout_marks(&mut self) {
        self.timeout_started_at = None;
        self.timeout_reason = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_wickets_is_one_less_than_players() {
        let state = MatchState::lobby("A", "B", 4, 11);
        assert_eq!(state.max_wickets(), 10);
        assert_eq!(state.total_balls(), 24);
    }

    #[test]
    fn transient_fields_are_absent_when_unset() {
        let state = MatchState::lobby("A", "B", 4, 11);
        let json = serde_json::to_value(&state).unwrap();
        assert!(json.get("timeoutStartedAt").is_none());
        assert!(json.get("timeoutReason").is_none());
        assert!(json.get("inningsBreakStartedAt").is_none());
        assert!(json.get("nextInningsStartsAt").is_none());
        // Toss fields are part of the configuration and stay explicit.
        assert!(json["tossWinner"].is_null());
        assert_eq!(json["status"], "setup");
        assert_eq!(json["currentInningIndex"], 0);
    }

    #[test]
    fn status_names_match_wire_format() {
        let json = serde_json::to_string(&MatchStatus::InningsBreak).unwrap();
        assert_eq!(json, "\"innings_break\"");
        assert_eq!(MatchStatus::InningsBreak.to_string(), "innings_break");
    }

    #[test]
    fn limits_reject_impossible_states() {
        assert!(MatchState::new().check_limits().is_ok());

        let mut state = MatchState::lobby("A", "B", 4, 11);
        state.overs_per_innings = u32::MAX;
        assert_eq!(state.total_balls(), u32::MAX);
        assert!(matches!(state.check_limits(), Err(MatchError::CorruptState(_))));

        let mut state = MatchState::lobby("A", "B", 4, 1);
        assert!(state.check_limits().is_err());
        state.players_per_team = 2;
        assert!(state.check_limits().is_ok());
    }

    #[test]
    fn out_of_range_index_is_clamped() {
        let mut state = MatchState::lobby("A", "B", 4, 11);
        state.current_inning_index = 7;
        assert_eq!(state.current_index(), 1);
        assert_eq!(state.current_inning().team_name, "B");
    }
}
