//! Run rates, chase arithmetic and a rule-based win probability.
//!
//! Everything is recomputed from the innings logs on each call. Undefined
//! figures come back as `None`; no rate ever divides by zero.

use serde::{Deserialize, Serialize};

use super::scoring::{compute_innings_score, format_overs};
use crate::models::MatchState;

// Win probability weights
const RUN_RATE_WEIGHT: f64 = 0.5;
const WICKET_WEIGHT: f64 = 0.3;
const BALL_WEIGHT: f64 = 0.2;
const RUN_RATE_FACTOR_CAP: f64 = 2.0;
const MIN_PROBABILITY: f64 = 5.0;
const MAX_PROBABILITY: f64 = 95.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchAnalytics {
    pub current_run_rate: f64,
    /// Chase only.
    pub required_run_rate: Option<f64>,
    /// Chase only.
    pub win_probability: Option<f64>,
    pub target: Option<u32>,
    /// Negative once the target has been passed.
    pub runs_needed: Option<i64>,
    pub balls_remaining: u32,
    /// `None` when no balls remain.
    pub overs_remaining: Option<String>,
    pub wickets_remaining: u32,
    /// Current runs plus CRR over the remaining overs, rounded.
    pub projected_total: u32,
    pub chase_outlook: Option<ChaseOutlook>,
    pub win_probability_band: Option<ProbabilityBand>,
}

/// How the chasing side's scoring compares with what it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChaseOutlook {
    /// CRR >= RRR
    Ahead,
    /// CRR >= 0.8 x RRR
    SlightlyBehind,
    WellBehind,
}

impl ChaseOutlook {
    pub fn classify(current_run_rate: f64, required_run_rate: f64) -> Self {
        if current_run_rate >= required_run_rate {
            ChaseOutlook::Ahead
        } else if current_run_rate >= required_run_rate * 0.8 {
            ChaseOutlook::SlightlyBehind
        } else {
            ChaseOutlook::WellBehind
        }
    }
}

/// Which side the win probability favours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilityBand {
    /// >= 70
    BattingFavoured,
    /// >= 40
    Balanced,
    BowlingFavoured,
}

impl ProbabilityBand {
    pub fn classify(probability: f64) -> Self {
        if probability >= 70.0 {
            ProbabilityBand::BattingFavoured
        } else if probability >= 40.0 {
            ProbabilityBand::Balanced
        } else {
            ProbabilityBand::BowlingFavoured
        }
    }
}

pub fn current_run_rate(runs: u32, balls_bowled: u32) -> f64 {
    if balls_bowled == 0 {
        return 0.0;
    }
    f64::from(runs) / (f64::from(balls_bowled) / 6.0)
}

/// `None` when no balls remain, 0 when nothing more is needed.
pub fn required_run_rate(runs_needed: i64, balls_remaining: u32) -> Option<f64> {
    if balls_remaining == 0 {
        return None;
    }
    if runs_needed <= 0 {
        return Some(0.0);
    }
    Some(runs_needed as f64 / (f64::from(balls_remaining) / 6.0))
}

/// `27` -> `"4.3"`
pub fn balls_to_overs(balls: u32) -> String {
    format_overs(balls)
}

/// Chasing side's chance of winning, in percent.
///
/// 100 once the target is reached, 0 when out of wickets or balls, otherwise
/// a weighted blend of run-rate ratio, wickets left and balls left clamped to
/// [5, 95].
pub fn win_probability(
    current_runs: u32,
    current_wickets: u32,
    balls_bowled: u32,
    target: u32,
    total_balls: u32,
    total_wickets: u32,
) -> Option<f64> {
    if target == 0 {
        return None;
    }

    let runs_needed = i64::from(target) - i64::from(current_runs);
    let balls_remaining = total_balls.saturating_sub(balls_bowled);
    let wickets_remaining = total_wickets.saturating_sub(current_wickets);

    if runs_needed <= 0 {
        return Some(100.0);
    }
    if wickets_remaining == 0 || balls_remaining == 0 {
        return Some(0.0);
    }

    let crr = current_run_rate(current_runs, balls_bowled);
    let rrr = required_run_rate(runs_needed, balls_remaining)?;

    let run_rate_factor = (crr / rrr).min(RUN_RATE_FACTOR_CAP);
    let wicket_factor = f64::from(wickets_remaining) / f64::from(total_wickets);
    let ball_factor = f64::from(balls_remaining) / f64::from(total_balls);

    let raw = (run_rate_factor * RUN_RATE_WEIGHT + wicket_factor * WICKET_WEIGHT + ball_factor * BALL_WEIGHT)
        * 100.0;
    Some(raw.clamp(MIN_PROBABILITY, MAX_PROBABILITY))
}

pub fn match_analytics(state: &MatchState) -> MatchAnalytics {
    let score = compute_innings_score(&state.current_inning().events);
    let total_balls = state.total_balls();
    let balls_bowled = score.legal_balls;
    let balls_remaining = total_balls.saturating_sub(balls_bowled);
    let total_wickets = state.max_wickets();
    let wickets_remaining = total_wickets.saturating_sub(score.total_wickets);

    let target = state
        .is_chasing()
        .then(|| compute_innings_score(&state.innings[0].events).total_runs.saturating_add(1));
    let runs_needed = target.map(|t| i64::from(t) - i64::from(score.total_runs));

    let crr = current_run_rate(score.total_runs, balls_bowled);
    let rrr = runs_needed.and_then(|needed| required_run_rate(needed, balls_remaining));
    let probability = target.and_then(|t| {
        win_probability(score.total_runs, score.total_wickets, balls_bowled, t, total_balls, total_wickets)
    });

    let projected = f64::from(score.total_runs) + crr * (f64::from(balls_remaining) / 6.0);

    MatchAnalytics {
        current_run_rate: crr,
        required_run_rate: rrr,
        win_probability: probability,
        target,
        runs_needed,
        balls_remaining,
        overs_remaining: (balls_remaining > 0).then(|| balls_to_overs(balls_remaining)),
        wickets_remaining,
        projected_total: projected.round() as u32,
        chase_outlook: rrr.map(|r| ChaseOutlook::classify(crr, r)),
        win_probability_band: probability.map(ProbabilityBand::classify),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BallEvent, BallType};

    fn legal(runs: u32, over: u32) -> BallEvent {
        BallEvent {
            id: String::new(),
            inning: 1,
            over,
            ball_in_over: 1,
            runs,
            ball_type: BallType::Legal,
            is_wicket: false,
            is_free_hit: false,
            dismissal_type: None,
            striker_id: "A".into(),
            non_striker_id: "B".into(),
            bowler_id: "X".into(),
            timestamp: 0,
        }
    }

    #[test]
    fn run_rates_guard_zero_balls() {
        assert_eq!(current_run_rate(10, 0), 0.0);
        assert!((current_run_rate(12, 12) - 6.0).abs() < 1e-9);
        assert_eq!(required_run_rate(10, 0), None);
        assert_eq!(required_run_rate(0, 6), Some(0.0));
        assert_eq!(required_run_rate(-3, 6), Some(0.0));
        assert!((required_run_rate(12, 12).unwrap() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn win_probability_definite_outcomes() {
        assert_eq!(win_probability(50, 2, 10, 50, 30, 10), Some(100.0));
        assert_eq!(win_probability(10, 10, 10, 50, 30, 10), Some(0.0));
        assert_eq!(win_probability(10, 2, 30, 50, 30, 10), Some(0.0));
        assert_eq!(win_probability(10, 2, 10, 0, 30, 10), None);
    }

    #[test]
    fn win_probability_is_clamped() {
        // Cruising: CRR far above RRR, no wickets lost.
        let high = win_probability(48, 0, 6, 50, 60, 10).unwrap();
        assert_eq!(high, 95.0);
        // Hopeless: nothing scored, one wicket and one ball left.
        let low = win_probability(0, 9, 59, 50, 60, 10).unwrap();
        assert_eq!(low, 5.0);
    }

    #[test]
    fn win_probability_blends_factors() {
        // 12 off 12 balls (CRR 6) needing 38 off 18 (RRR 12.67), 8 of 10 wickets left.
        let p = win_probability(12, 2, 12, 50, 30, 10).unwrap();
        let rrr = 38.0 / 3.0;
        let expected = ((6.0 / rrr) * 0.5 + 0.8 * 0.3 + 0.6 * 0.2) * 100.0;
        assert!((p - expected).abs() < 1e-9);
        assert!(p > 50.0 && p < 70.0);
    }

    #[test]
    fn first_innings_has_no_chase_figures() {
        let mut state = MatchState::lobby("A", "B", 5, 11);
        state.innings[0].events = (0..6).map(|_| legal(2, 0)).collect();
        let a = match_analytics(&state);
        assert!((a.current_run_rate - 12.0).abs() < 1e-9);
        assert_eq!(a.target, None);
        assert_eq!(a.required_run_rate, None);
        assert_eq!(a.win_probability, None);
        assert_eq!(a.balls_remaining, 24);
        assert_eq!(a.overs_remaining.as_deref(), Some("4.0"));
        assert_eq!(a.projected_total, 60);
        assert_eq!(a.chase_outlook, None);
    }

    #[test]
    fn chase_figures() {
        let mut state = MatchState::lobby("A", "B", 2, 11);
        state.innings[0].events = (0..12).map(|i| legal(2, i / 6)).collect();
        state.current_inning_index = 1;
        state.innings[1].events = (0..6).map(|_| legal(1, 0)).collect();

        let a = match_analytics(&state);
        assert_eq!(a.target, Some(25));
        assert_eq!(a.runs_needed, Some(19));
        assert_eq!(a.balls_remaining, 6);
        assert!((a.required_run_rate.unwrap() - 19.0).abs() < 1e-9);
        assert_eq!(a.chase_outlook, Some(ChaseOutlook::WellBehind));
        assert_eq!(a.wickets_remaining, 10);
        let p = a.win_probability.unwrap();
        assert!((5.0..=95.0).contains(&p));
    }

    #[test]
    fn no_balls_left_means_no_rrr() {
        let mut state = MatchState::lobby("A", "B", 1, 11);
        state.current_inning_index = 1;
        state.innings[1].events = (0..6).map(|_| legal(0, 0)).collect();
        let a = match_analytics(&state);
        assert_eq!(a.required_run_rate, None);
        assert_eq!(a.overs_remaining, None);
        // Target 1 not reached, balls exhausted.
        assert_eq!(a.win_probability, Some(0.0));
    }

    #[test]
    fn bands() {
        assert_eq!(ProbabilityBand::classify(70.0), ProbabilityBand::BattingFavoured);
        assert_eq!(ProbabilityBand::classify(40.0), ProbabilityBand::Balanced);
        assert_eq!(ProbabilityBand::classify(39.9), ProbabilityBand::BowlingFavoured);
        assert_eq!(ChaseOutlook::classify(8.0, 8.0), ChaseOutlook::Ahead);
        assert_eq!(ChaseOutlook::classify(7.0, 8.0), ChaseOutlook::SlightlyBehind);
        assert_eq!(ChaseOutlook::classify(6.0, 8.0), ChaseOutlook::WellBehind);
    }
}
