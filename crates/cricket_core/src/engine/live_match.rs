//! Scoring session: the single writer of a [`MatchState`].
//!
//! Every operation checks its guards before touching the state, so a rejected
//! call returns an error and leaves the match exactly as it was.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::analytics::{match_analytics, MatchAnalytics};
use super::result::{decide_result, MatchResult};
use super::scoring::{compute_innings_score, free_hit_pending, InningsScore};
use super::state_machine::{transition, MatchTrigger};
use super::timeline::{highlight_for, Highlight};
use crate::config::ScoringConfig;
use crate::error::{MatchError, Result};
use crate::models::{
    BallEvent, BallType, DismissalType, Inning, MatchSetup, MatchState, MatchStatus, PlayerId,
    TossDecision, MAX_RUNS_PER_BALL,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Authority {
    /// May change the match.
    Scorer,
    /// Read-only replica holder.
    Observer,
}

/// Source of timestamps. Only used to stamp values, never polled.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

/// What a recorded delivery did to the match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallOutcome {
    pub event: BallEvent,
    pub over_completed: bool,
    pub innings_ended: bool,
    pub match_finished: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub highlight: Option<Highlight>,
}

#[derive(Debug, Clone)]
pub struct ScoringSession<C: Clock = SystemClock> {
    state: MatchState,
    authority: Authority,
    config: ScoringConfig,
    clock: C,
}

impl ScoringSession<SystemClock> {
    pub fn scorer(state: MatchState) -> Self {
        Self::with_clock(state, Authority::Scorer, ScoringConfig::default(), SystemClock)
    }

    pub fn observer(state: MatchState) -> Self {
        Self::with_clock(state, Authority::Observer, ScoringConfig::default(), SystemClock)
    }
}

impl<C: Clock> ScoringSession<C> {
    pub fn with_clock(state: MatchState, authority: Authority, config: ScoringConfig, clock: C) -> Self {
        Self { state, authority, config, clock }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn into_state(self) -> MatchState {
        self.state
    }

    pub fn authority(&self) -> Authority {
        self.authority
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    // ========== Read side ==========

    pub fn score(&self) -> InningsScore {
        compute_innings_score(&self.state.current_inning().events)
    }

    pub fn is_free_hit_next(&self) -> bool {
        free_hit_pending(&self.state.current_inning().events)
    }

    pub fn analytics(&self) -> MatchAnalytics {
        match_analytics(&self.state)
    }

    pub fn result(&self) -> Option<MatchResult> {
        decide_result(&self.state)
    }

    // ========== Guards ==========

    fn require_scorer(&self, operation: &'static str) -> Result<()> {
        if self.authority != Authority::Scorer {
            log::warn!("Rejected '{}': observer session", operation);
            return Err(MatchError::ReadOnly);
        }
        Ok(())
    }

    fn next_status(&self, trigger: MatchTrigger) -> Result<MatchStatus> {
        transition(self.state.status, trigger).map_err(|e| {
            log::warn!("{}", e);
            e
        })
    }

    fn set_status(&mut self, next: MatchStatus) {
        if next != self.state.status {
            log::info!("Match status {} -> {}", self.state.status, next);
        }
        self.state.status = next;
    }

    fn reset_players(&mut self) {
        let players = &self.config.players;
        self.state.striker_id = PlayerId::new(players.batsman(1));
        self.state.non_striker_id = PlayerId::new(players.batsman(2));
        self.state.bowler_id = PlayerId::new(players.bowler_placeholder());
    }

    // ========== Lifecycle ==========

    /// Validate setup input and move to the toss.
    pub fn configure(&mut self, setup: &MatchSetup) -> Result<()> {
        self.require_scorer("configure")?;
        let setup = setup.checked()?;
        let next = self.next_status(MatchTrigger::ConfirmSetup)?;

        self.state = MatchState::lobby(
            setup.team1,
            setup.team2,
            setup.overs_per_innings,
            setup.players_per_team,
        );
        self.reset_players();
        self.set_status(next);
        Ok(())
    }

    /// Record the toss and start the first innings.
    pub fn complete_toss(&mut self, winner: &str, decision: TossDecision) -> Result<()> {
        self.require_scorer("complete_toss")?;
        let next = self.next_status(MatchTrigger::CompleteToss)?;

        let winner = winner.trim();
        let (team1, team2) = (self.state.team1.clone(), self.state.team2.clone());
        let other = if winner == team1 {
            team2.clone()
        } else if winner == team2 {
            team1.clone()
        } else {
            return Err(MatchError::InvalidToss(format!(
                "'{}' is neither '{}' nor '{}'",
                winner, team1, team2
            )));
        };

        let (batting_first, batting_second) = match decision {
            TossDecision::Bat => (winner.to_string(), other),
            TossDecision::Bowl => (other, winner.to_string()),
        };

        log::info!("{} won the toss and chose to {:?}; {} bat first", winner, decision, batting_first);
        self.state.toss_winner = Some(winner.to_string());
        self.state.toss_decision = Some(decision);
        self.state.innings = [Inning::new(batting_first.clone()), Inning::new(batting_second)];
        self.state.batting_first = Some(batting_first);
        self.state.current_inning_index = 0;
        self.reset_players();
        self.set_status(next);
        Ok(())
    }

    /// Abandon the match and return to setup with teams and limits kept.
    pub fn exit_to_setup(&mut self) -> Result<()> {
        self.require_scorer("exit_to_setup")?;
        let next = self.next_status(MatchTrigger::Exit)?;

        let lobby = {
            let s = &self.state;
            MatchState::lobby(s.team1.clone(), s.team2.clone(), s.overs_per_innings, s.players_per_team)
        };
        self.state = lobby;
        self.reset_players();
        self.set_status(next);
        Ok(())
    }

    pub fn open_lobby(&mut self) -> Result<()> {
        self.require_scorer("open_lobby")?;
        let next = self.next_status(MatchTrigger::OpenLobby)?;
        self.set_status(next);
        Ok(())
    }

    pub fn end_session(&mut self) -> Result<()> {
        self.require_scorer("end_session")?;
        let next = self.next_status(MatchTrigger::EndSession)?;
        self.state.clear_break_marks();
        self.state.clear_timeout_marks();
        self.set_status(next);
        Ok(())
    }

    // ========== On-field roles ==========

    pub fn set_striker(&mut self, name: impl Into<String>) -> Result<()> {
        self.require_scorer("set_striker")?;
        self.state.striker_id = PlayerId::new(name);
        Ok(())
    }

    pub fn set_non_striker(&mut self, name: impl Into<String>) -> Result<()> {
        self.require_scorer("set_non_striker")?;
        self.state.non_striker_id = PlayerId::new(name);
        Ok(())
    }

    pub fn set_bowler(&mut self, name: impl Into<String>) -> Result<()> {
        self.require_scorer("set_bowler")?;
        self.state.bowler_id = PlayerId::new(name);
        Ok(())
    }

    /// Batsmen seen in the current innings plus the two at the crease.
    fn known_batsmen(&self) -> usize {
        let inning = self.state.current_inning();
        let mut names: Vec<&PlayerId> = Vec::new();
        let candidates = inning
            .events
            .iter()
            .map(|e| &e.striker_id)
            .chain([&self.state.striker_id, &self.state.non_striker_id]);
        for name in candidates {
            if !name.is_unassigned() && !names.contains(&name) {
                names.push(name);
            }
        }
        names.len()
    }

    // ========== Deliveries ==========

    /// Record one delivery; a wicket is bowled, or run out on a free hit.
    pub fn record_ball(&mut self, runs: u32, ball_type: BallType, is_wicket: bool) -> Result<BallOutcome> {
        self.record_delivery(runs, ball_type, is_wicket.then_some(DismissalType::Bowled))
    }

    /// Record one delivery with an explicit dismissal.
    ///
    /// On a free hit any dismissal is recorded as a run-out.
    pub fn record_delivery(
        &mut self,
        runs: u32,
        ball_type: BallType,
        dismissal: Option<DismissalType>,
    ) -> Result<BallOutcome> {
        self.require_scorer("record_ball")?;
        let status = self.state.status;
        if !status.accepts_deliveries() {
            log::warn!("Rejected delivery while match is {}", status);
            return Err(MatchError::Blocked { operation: "record_ball", status });
        }
        if runs > MAX_RUNS_PER_BALL {
            log::warn!("Rejected delivery of {} runs", runs);
            return Err(MatchError::InvalidDelivery(format!(
                "{} runs is more than {} off one ball",
                runs, MAX_RUNS_PER_BALL
            )));
        }

        let now = self.clock.now_millis();
        let index = self.state.current_index();
        let is_wicket = dismissal.is_some();

        let (before, is_free_hit) = {
            let events = &self.state.innings[index].events;
            (compute_innings_score(events), free_hit_pending(events))
        };
        let counts_as_ball = ball_type.counts_as_ball();
        let new_total = before.total_runs.saturating_add(runs + ball_type.penalty());
        let new_wickets = before.total_wickets.saturating_add(u32::from(is_wicket));
        let new_legal_balls = before.legal_balls.saturating_add(u32::from(counts_as_ball));

        // End-of-innings / end-of-match decision, settled before any mutation.
        let overs_done = new_legal_balls >= self.state.total_balls();
        let all_out = new_wickets >= self.state.max_wickets();
        let end = if index == 0 {
            (overs_done || all_out).then_some(MatchTrigger::InningsComplete)
        } else {
            let first = compute_innings_score(&self.state.innings[0].events);
            let target = first.total_runs.saturating_add(1);
            (new_total >= target || overs_done || all_out).then_some(MatchTrigger::MatchComplete)
        };
        let next = match end {
            Some(trigger) => Some(self.next_status(trigger)?),
            None => None,
        };

        // Unnamed roles get placeholders before the event is built.
        let known = self.known_batsmen();
        let players = &self.config.players;
        let striker = if self.state.striker_id.is_unassigned() {
            PlayerId::new(players.batsman(known + 1))
        } else {
            self.state.striker_id.clone()
        };
        let non_striker = if self.state.non_striker_id.is_unassigned() {
            PlayerId::new(players.batsman(known + 2))
        } else {
            self.state.non_striker_id.clone()
        };
        let bowler = if self.state.bowler_id.is_unassigned() {
            PlayerId::new(players.bowler_placeholder())
        } else {
            self.state.bowler_id.clone()
        };

        let event = BallEvent {
            id: Uuid::new_v4().to_string(),
            inning: index as u8 + 1,
            over: before.legal_balls / 6,
            ball_in_over: (before.legal_balls % 6) as u8 + 1,
            runs,
            ball_type,
            is_wicket,
            is_free_hit,
            dismissal_type: dismissal.map(|d| if is_free_hit { DismissalType::RunOut } else { d }),
            striker_id: striker.clone(),
            non_striker_id: non_striker.clone(),
            bowler_id: bowler.clone(),
            timestamp: now,
        };

        let (mut on_strike, mut off_strike) = (striker, non_striker);
        if runs % 2 == 1 {
            std::mem::swap(&mut on_strike, &mut off_strike);
        }
        let over_completed = counts_as_ball && new_legal_balls % 6 == 0;
        if over_completed {
            std::mem::swap(&mut on_strike, &mut off_strike);
        }
        if is_wicket {
            on_strike = PlayerId::unassigned();
        }

        self.state.striker_id = on_strike;
        self.state.non_striker_id = off_strike;
        self.state.bowler_id = bowler;

        let inning = &mut self.state.innings[index];
        inning.events.push(event.clone());
        let highlight = highlight_for(&inning.events);

        log::debug!(
            "Innings {} {}.{}: {} -> {}/{}",
            index + 1,
            event.over,
            event.ball_in_over,
            event.notation(),
            new_total,
            new_wickets
        );

        let mut innings_ended = false;
        let mut match_finished = false;
        if let Some(next) = next {
            self.state.innings[index].is_completed = true;
            if next == MatchStatus::InningsBreak {
                self.state.innings_break_started_at = Some(now);
                innings_ended = true;
            } else {
                innings_ended = true;
                match_finished = true;
            }
            self.set_status(next);
        }

        Ok(BallOutcome { event, over_completed, innings_ended, match_finished, highlight })
    }

    /// Pop the last delivery of the current innings.
    ///
    /// Nothing else is restored: names rotated by the undone delivery stay
    /// where they are and the status does not roll back.
    pub fn undo_last_ball(&mut self) -> Result<BallEvent> {
        self.require_scorer("undo_last_ball")?;
        let popped = self.state.current_inning_mut().events.pop().ok_or(MatchError::EmptyUndo)?;
        log::debug!("Undid delivery {} ({})", popped.id, popped.notation());
        Ok(popped)
    }

    // ========== Breaks ==========

    pub fn start_next_innings(&mut self) -> Result<()> {
        self.require_scorer("start_next_innings")?;
        let next = self.next_status(MatchTrigger::StartNextInnings)?;

        self.state.current_inning_index = 1;
        self.reset_players();
        self.state.clear_break_marks();
        self.set_status(next);
        Ok(())
    }

    /// Stamp when the chase will start, for countdown displays.
    ///
    /// Uses the configured break length when `delay_secs` is `None`. Returns
    /// the stamped instant.
    pub fn schedule_next_innings(&mut self, delay_secs: Option<u32>) -> Result<i64> {
        self.require_scorer("schedule_next_innings")?;
        let status = self.state.status;
        if status != MatchStatus::InningsBreak {
            return Err(MatchError::Blocked { operation: "schedule_next_innings", status });
        }

        let secs = delay_secs.unwrap_or(self.config.breaks.innings_break_secs);
        let starts_at = self.clock.now_millis() + i64::from(secs) * 1000;
        self.state.next_innings_starts_at = Some(starts_at);
        Ok(starts_at)
    }

    pub fn call_timeout(&mut self, reason: Option<&str>) -> Result<()> {
        self.require_scorer("call_timeout")?;
        let next = self.next_status(MatchTrigger::CallTimeout)?;

        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(&self.config.breaks.default_timeout_reason)
            .to_string();
        self.state.timeout_started_at = Some(self.clock.now_millis());
        self.state.timeout_reason = Some(reason);
        self.set_status(next);
        Ok(())
    }

    pub fn resume_match(&mut self) -> Result<()> {
        self.require_scorer("resume_match")?;
        let next = self.next_status(MatchTrigger::Resume)?;
        self.state.clear_timeout_marks();
        self.set_status(next);
        Ok(())
    }

    // ========== Replication ==========

    /// Replace the whole state with `snapshot`. Last writer wins.
    pub fn sync_from(&mut self, snapshot: MatchState) {
        log::info!(
            "Synced match {} v {} ({}, innings {})",
            snapshot.team1,
            snapshot.team2,
            snapshot.status,
            snapshot.current_index() + 1
        );
        self.state = snapshot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    fn session(overs: u32, players: u32) -> ScoringSession<FixedClock> {
        let mut s = ScoringSession::with_clock(
            MatchState::new(),
            Authority::Scorer,
            ScoringConfig::default(),
            FixedClock(NOW),
        );
        s.configure(&MatchSetup::new("Lions", "Tigers", overs, players)).unwrap();
        s.complete_toss("Lions", TossDecision::Bat).unwrap();
        s
    }

    fn dots(s: &mut ScoringSession<FixedClock>, n: usize) {
        for _ in 0..n {
            s.record_ball(0, BallType::Legal, false).unwrap();
        }
    }

    #[test]
    fn configure_and_toss_set_batting_order() {
        let mut s = ScoringSession::with_clock(
            MatchState::new(),
            Authority::Scorer,
            ScoringConfig::default(),
            FixedClock(NOW),
        );
        s.configure(&MatchSetup::new("Lions", "Tigers", 5, 11)).unwrap();
        assert_eq!(s.state().status, MatchStatus::Toss);

        s.complete_toss("Lions", TossDecision::Bowl).unwrap();
        let state = s.state();
        assert_eq!(state.status, MatchStatus::Live);
        assert_eq!(state.batting_first.as_deref(), Some("Tigers"));
        assert_eq!(state.innings[0].team_name, "Tigers");
        assert_eq!(state.innings[1].team_name, "Lions");
        assert_eq!(state.toss_decision, Some(TossDecision::Bowl));
    }

    #[test]
    fn toss_winner_must_be_a_team() {
        let mut s = ScoringSession::with_clock(
            MatchState::new(),
            Authority::Scorer,
            ScoringConfig::default(),
            FixedClock(NOW),
        );
        s.configure(&MatchSetup::new("Lions", "Tigers", 5, 11)).unwrap();
        let before = s.state().clone();
        let err = s.complete_toss("Bears", TossDecision::Bat).unwrap_err();
        assert!(matches!(err, MatchError::InvalidToss(_)));
        assert_eq!(s.state(), &before);
    }

    #[test]
    fn invalid_setup_leaves_state_untouched() {
        let mut s = ScoringSession::scorer(MatchState::new());
        let before = s.state().clone();
        assert!(s.configure(&MatchSetup::new("Lions", "Lions", 5, 11)).is_err());
        assert_eq!(s.state(), &before);
    }

    #[test]
    fn runs_above_the_cap_are_refused() {
        let mut s = session(2, 11);
        let before = s.state().clone();
        let err = s.record_ball(u32::MAX, BallType::Wide, false).unwrap_err();
        assert!(matches!(err, MatchError::InvalidDelivery(_)));
        assert_eq!(s.state(), &before);

        s.record_ball(MAX_RUNS_PER_BALL, BallType::NoBall, false).unwrap();
        assert_eq!(s.score().total_runs, MAX_RUNS_PER_BALL + 1);
    }

    #[test]
    fn odd_runs_swap_strike() {
        let mut s = session(5, 11);
        s.record_ball(1, BallType::Legal, false).unwrap();
        assert_eq!(s.state().striker_id, PlayerId::new("Batsman 2"));
        assert_eq!(s.state().non_striker_id, PlayerId::new("Batsman 1"));
        s.record_ball(2, BallType::Legal, false).unwrap();
        assert_eq!(s.state().striker_id, PlayerId::new("Batsman 2"));
    }

    #[test]
    fn single_off_last_ball_of_over_keeps_striker() {
        let mut s = session(5, 11);
        dots(&mut s, 5);
        let outcome = s.record_ball(1, BallType::Legal, false).unwrap();
        assert!(outcome.over_completed);
        assert_eq!(s.state().striker_id, PlayerId::new("Batsman 1"));
    }

    #[test]
    fn over_end_swaps_on_dot_and_four() {
        let mut s = session(5, 11);
        dots(&mut s, 6);
        assert_eq!(s.state().striker_id, PlayerId::new("Batsman 2"));
        dots(&mut s, 5);
        s.record_ball(4, BallType::Legal, false).unwrap();
        assert_eq!(s.state().striker_id, PlayerId::new("Batsman 1"));
    }

    #[test]
    fn wide_does_not_complete_an_over() {
        let mut s = session(5, 11);
        dots(&mut s, 5);
        let outcome = s.record_ball(0, BallType::Wide, false).unwrap();
        assert!(!outcome.over_completed);
        assert_eq!(outcome.event.ball_in_over, 6);
        assert_eq!(s.state().striker_id, PlayerId::new("Batsman 1"));
    }

    #[test]
    fn event_carries_position_and_clock() {
        let mut s = session(5, 11);
        dots(&mut s, 7);
        let outcome = s.record_ball(2, BallType::Bye, false).unwrap();
        assert_eq!(outcome.event.over, 1);
        assert_eq!(outcome.event.ball_in_over, 2);
        assert_eq!(outcome.event.inning, 1);
        assert_eq!(outcome.event.timestamp, NOW);
        assert!(!outcome.event.id.is_empty());
    }

    #[test]
    fn wicket_clears_striker_and_placeholder_fills_next() {
        let mut s = session(5, 11);
        let outcome = s.record_ball(0, BallType::Legal, true).unwrap();
        assert_eq!(outcome.event.dismissal_type, Some(DismissalType::Bowled));
        assert_eq!(outcome.highlight, Some(Highlight::Wicket));
        assert!(s.state().striker_id.is_unassigned());
        assert_eq!(s.state().non_striker_id, PlayerId::new("Batsman 2"));

        let next = s.record_ball(0, BallType::Legal, false).unwrap();
        assert_eq!(next.event.striker_id, PlayerId::new("Batsman 3"));
        assert_eq!(s.state().striker_id, PlayerId::new("Batsman 3"));
    }

    #[test]
    fn free_hit_wicket_is_run_out() {
        let mut s = session(5, 11);
        let nb = s.record_ball(0, BallType::NoBall, false).unwrap();
        assert_eq!(nb.highlight, Some(Highlight::FreeHit));
        assert!(s.is_free_hit_next());

        let out = s.record_delivery(0, BallType::Legal, Some(DismissalType::Caught)).unwrap();
        assert!(out.event.is_free_hit);
        assert_eq!(out.event.dismissal_type, Some(DismissalType::RunOut));
    }

    #[test]
    fn first_innings_ends_on_overs() {
        let mut s = session(2, 11);
        dots(&mut s, 11);
        let outcome = s.record_ball(0, BallType::Legal, false).unwrap();
        assert!(outcome.innings_ended);
        assert!(!outcome.match_finished);
        let state = s.state();
        assert_eq!(state.status, MatchStatus::InningsBreak);
        assert_eq!(state.innings_break_started_at, Some(NOW));
        assert!(state.innings[0].is_completed);
    }

    #[test]
    fn first_innings_ends_all_out_with_two_players() {
        let mut s = session(2, 2);
        s.record_ball(0, BallType::Legal, true).unwrap();
        assert_eq!(s.state().status, MatchStatus::InningsBreak);
    }

    #[test]
    fn deliveries_blocked_during_break_and_timeout() {
        let mut s = session(1, 11);
        dots(&mut s, 6);
        let before = s.state().clone();
        let err = s.record_ball(1, BallType::Legal, false).unwrap_err();
        assert_eq!(err, MatchError::Blocked { operation: "record_ball", status: MatchStatus::InningsBreak });
        assert_eq!(s.state(), &before);

        s.start_next_innings().unwrap();
        s.call_timeout(None).unwrap();
        assert_eq!(s.state().timeout_reason.as_deref(), Some("Drinks Break"));
        assert_eq!(s.state().timeout_started_at, Some(NOW));
        assert!(s.record_ball(1, BallType::Legal, false).is_err());
        assert!(s.state().innings[1].events.is_empty());

        s.resume_match().unwrap();
        assert_eq!(s.state().timeout_started_at, None);
        assert_eq!(s.state().timeout_reason, None);
        assert!(s.record_ball(1, BallType::Legal, false).is_ok());
    }

    #[test]
    fn next_innings_resets_players_and_break_marks() {
        let mut s = session(1, 11);
        dots(&mut s, 6);
        s.clock_mut().0 = NOW + 5_000;
        let at = s.schedule_next_innings(Some(30)).unwrap();
        assert_eq!(at, NOW + 35_000);
        assert_eq!(s.state().next_innings_starts_at, Some(at));

        s.start_next_innings().unwrap();
        let state = s.state();
        assert_eq!(state.current_inning_index, 1);
        assert_eq!(state.status, MatchStatus::Live);
        assert_eq!(state.striker_id, PlayerId::new("Batsman 1"));
        assert_eq!(state.bowler_id, PlayerId::new("Bowler 1"));
        assert_eq!(state.innings_break_started_at, None);
        assert_eq!(state.next_innings_starts_at, None);
    }

    #[test]
    fn schedule_only_during_break() {
        let mut s = session(1, 11);
        assert!(matches!(s.schedule_next_innings(None), Err(MatchError::Blocked { .. })));
    }

    #[test]
    fn chase_finishes_on_target() {
        let mut s = session(1, 11);
        s.record_ball(4, BallType::Legal, false).unwrap();
        dots(&mut s, 5);
        s.start_next_innings().unwrap();

        s.record_ball(4, BallType::Legal, false).unwrap();
        assert_eq!(s.state().status, MatchStatus::Live);
        let outcome = s.record_ball(0, BallType::Wide, false).unwrap();
        assert!(outcome.match_finished);
        assert_eq!(s.state().status, MatchStatus::Finished);
        assert!(s.state().innings[1].is_completed);
        assert!(s.record_ball(1, BallType::Legal, false).is_err());
    }

    #[test]
    fn undo_pops_only_the_tail() {
        let mut s = session(5, 11);
        assert_eq!(s.undo_last_ball().unwrap_err(), MatchError::EmptyUndo);
        s.record_ball(1, BallType::Legal, false).unwrap();
        let before = s.score();
        s.record_ball(3, BallType::Legal, false).unwrap();
        let popped = s.undo_last_ball().unwrap();
        assert_eq!(popped.runs, 3);
        assert_eq!(s.score(), before);
        // Names stay rotated.
        assert_eq!(s.state().striker_id, PlayerId::new("Batsman 1"));
    }

    #[test]
    fn observer_cannot_write() {
        let live = session(5, 11).into_state();
        let mut obs = ScoringSession::observer(live.clone());
        assert_eq!(obs.record_ball(1, BallType::Legal, false).unwrap_err(), MatchError::ReadOnly);
        assert_eq!(obs.set_bowler("Someone").unwrap_err(), MatchError::ReadOnly);
        assert_eq!(obs.undo_last_ball().unwrap_err(), MatchError::ReadOnly);
        assert_eq!(obs.state(), &live);
    }

    #[test]
    fn observer_applies_replicas() {
        let mut scorer = session(5, 11);
        scorer.record_ball(4, BallType::Legal, false).unwrap();
        let mut obs = ScoringSession::observer(MatchState::new());
        obs.sync_from(scorer.state().clone());
        assert_eq!(obs.score().total_runs, 4);
    }

    #[test]
    fn exit_returns_to_setup_and_keeps_config() {
        let mut s = session(3, 7);
        s.record_ball(4, BallType::Legal, false).unwrap();
        s.exit_to_setup().unwrap();
        let state = s.state();
        assert_eq!(state.status, MatchStatus::Setup);
        assert_eq!(state.team1, "Lions");
        assert_eq!(state.players_per_team, 7);
        assert!(state.innings[0].events.is_empty());
        assert_eq!(state.toss_winner, None);
    }

    #[test]
    fn session_lifecycle_ends() {
        let mut s = ScoringSession::with_clock(
            MatchState::new(),
            Authority::Scorer,
            ScoringConfig::default(),
            FixedClock(NOW),
        );
        s.open_lobby().unwrap();
        assert_eq!(s.state().status, MatchStatus::Waiting);
        assert!(s.end_session().is_err());
        s.configure(&MatchSetup::new("Lions", "Tigers", 1, 11)).unwrap();
        s.complete_toss("Tigers", TossDecision::Bat).unwrap();
        s.call_timeout(Some("Rain")).unwrap();
        assert_eq!(s.state().timeout_reason.as_deref(), Some("Rain"));
        s.end_session().unwrap();
        assert_eq!(s.state().status, MatchStatus::Ended);
        assert_eq!(s.state().timeout_reason, None);
    }

    #[test]
    fn custom_placeholders_from_config() {
        let mut config = ScoringConfig::default();
        config.players.batsman_prefix = "Player".to_string();
        let mut s = ScoringSession::with_clock(MatchState::new(), Authority::Scorer, config, FixedClock(NOW));
        s.configure(&MatchSetup::new("Lions", "Tigers", 1, 11)).unwrap();
        assert_eq!(s.state().striker_id, PlayerId::new("Player 1"));
    }

    #[test]
    fn blank_bowler_gets_placeholder() {
        let mut s = session(5, 11);
        s.set_bowler("  ").unwrap();
        let outcome = s.record_ball(0, BallType::Legal, false).unwrap();
        assert_eq!(outcome.event.bowler_id, PlayerId::new("Bowler 1"));
    }

    #[test]
    fn hat_trick_is_highlighted() {
        let mut s = session(5, 11);
        s.set_bowler("Quick").unwrap();
        s.record_ball(0, BallType::Legal, true).unwrap();
        s.record_ball(0, BallType::Legal, true).unwrap();
        let third = s.record_ball(0, BallType::Legal, true).unwrap();
        assert_eq!(third.highlight, Some(Highlight::HatTrick));
    }
}
