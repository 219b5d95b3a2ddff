//! Scoring calculator.
//!
//! Pure folds over a delivery log. Nothing here keeps state between calls, so
//! every figure can be recomputed from scratch after any change to the log
//! (including an undo).

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::models::{BallType, Delivery, Identifier, Inning, MatchState, PlayerId};

/// Per-bucket extras. Wides and no-balls count deliveries, byes and leg-byes
/// count runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extras {
    pub wide: u32,
    pub noball: u32,
    pub bye: u32,
    pub legbye: u32,
}

impl Extras {
    pub fn total(&self) -> u32 {
        [self.wide, self.noball, self.bye, self.legbye].into_iter().fold(0, u32::saturating_add)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InningsScore {
    pub total_runs: u32,
    pub total_wickets: u32,
    pub legal_balls: u32,
    /// Cricket notation, e.g. `3.4` for 22 balls.
    pub overs: String,
    pub extras: Extras,
    pub total_extras: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatsmanStats<Id = PlayerId> {
    pub name: Id,
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub sr: f64,
    pub is_out: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dismissal: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BowlerStats<Id = PlayerId> {
    pub name: Id,
    pub overs: String,
    pub legal_balls: u32,
    /// Not tracked; always 0.
    pub maidens: u32,
    pub runs: u32,
    pub wickets: u32,
    pub economy: f64,
    pub wides: u32,
    pub no_balls: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerOfTheMatch<Id = PlayerId> {
    pub name: Id,
    pub points: u32,
    /// e.g. `["54 Runs", "2 Wickets"]`
    pub stats: Vec<String>,
}

impl<Id> PlayerOfTheMatch<Id> {
    pub fn headline(&self) -> String {
        self.stats.join(" & ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopBatsman {
    pub name: PlayerId,
    pub runs: u32,
    pub balls: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopBowler {
    pub name: PlayerId,
    pub wickets: u32,
    pub runs: u32,
    pub overs: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InningsSummary {
    pub team_name: String,
    pub total_runs: u32,
    pub total_wickets: u32,
    pub overs: String,
    pub top_batsman: Option<TopBatsman>,
    pub top_bowler: Option<TopBowler>,
    pub extras: u32,
}

/// `balls` in over notation: 27 balls -> `4.3`.
pub fn format_overs(balls: u32) -> String {
    format!("{}.{}", balls / 6, balls % 6)
}

/// Runs per 100 balls, 0 when no balls faced.
pub fn strike_rate(runs: u32, balls: u32) -> f64 {
    if balls == 0 {
        return 0.0;
    }
    f64::from(runs) / f64::from(balls) * 100.0
}

/// Runs per six legal balls, 0 when none bowled.
pub fn economy_rate(runs: u32, legal_balls: u32) -> f64 {
    if legal_balls == 0 {
        return 0.0;
    }
    f64::from(runs) / (f64::from(legal_balls) / 6.0)
}

pub fn compute_innings_score<D: Delivery>(events: &[D]) -> InningsScore {
    let mut total_runs: u32 = 0;
    let mut total_wickets = 0;
    let mut legal_balls = 0;
    let mut extras = Extras::default();

    for event in events {
        let runs = event.runs();
        // Logs may arrive from outside a session, so run sums saturate.
        total_runs = total_runs.saturating_add(runs);

        match event.ball_type() {
            BallType::Wide => {
                total_runs = total_runs.saturating_add(1);
                extras.wide += 1;
            }
            BallType::NoBall => {
                total_runs = total_runs.saturating_add(1);
                extras.noball += 1;
            }
            BallType::Bye => extras.bye = extras.bye.saturating_add(runs),
            BallType::LegBye => extras.legbye = extras.legbye.saturating_add(runs),
            BallType::Legal => {}
        }

        if event.is_wicket() {
            total_wickets += 1;
        }
        if event.ball_type().counts_as_ball() {
            legal_balls += 1;
        }
    }

    InningsScore {
        total_runs,
        total_wickets,
        legal_balls,
        overs: format_overs(legal_balls),
        total_extras: extras.total(),
        extras,
    }
}

pub fn batsman_stats<D: Delivery>(events: &[D], player: &D::Id) -> BatsmanStats<D::Id> {
    let mut runs: u32 = 0;
    let mut balls = 0;
    let mut fours = 0;
    let mut sixes = 0;
    let mut dismissal = None;

    for event in events.iter().filter(|e| e.striker() == player) {
        let ball_type = event.ball_type();
        if ball_type.credits_batsman() {
            runs = runs.saturating_add(event.runs());
            match event.runs() {
                4 => fours += 1,
                6 => sixes += 1,
                _ => {}
            }
        }
        if ball_type.faced_by_batsman() {
            balls += 1;
        }
        if event.is_wicket() {
            // Who was run out is not recorded, so run-outs never mark the
            // striker as out.
            match event.dismissal() {
                Some(kind) if !kind.credited_to_bowler() => {}
                Some(kind) => dismissal = Some(kind.as_str().to_string()),
                None => dismissal = Some("out".to_string()),
            }
        }
    }

    BatsmanStats {
        name: player.clone(),
        runs,
        balls,
        fours,
        sixes,
        sr: strike_rate(runs, balls),
        is_out: dismissal.is_some(),
        dismissal,
    }
}

pub fn bowler_stats<D: Delivery>(events: &[D], player: &D::Id) -> BowlerStats<D::Id> {
    let mut runs: u32 = 0;
    let mut legal_balls = 0;
    let mut wickets = 0;
    let mut wides = 0;
    let mut no_balls = 0;

    for event in events.iter().filter(|e| e.bowler() == player) {
        match event.ball_type() {
            BallType::Wide => {
                runs = runs.saturating_add(event.runs()).saturating_add(1);
                wides += 1;
            }
            BallType::NoBall => {
                runs = runs.saturating_add(event.runs()).saturating_add(1);
                no_balls += 1;
            }
            BallType::Legal => {
                runs = runs.saturating_add(event.runs());
                legal_balls += 1;
            }
            BallType::Bye | BallType::LegBye => legal_balls += 1,
        }

        if event.is_wicket() && event.dismissal().map_or(true, |d| d.credited_to_bowler()) {
            wickets += 1;
        }
    }

    BowlerStats {
        name: player.clone(),
        overs: format_overs(legal_balls),
        legal_balls,
        maidens: 0,
        runs,
        wickets,
        economy: economy_rate(runs, legal_balls),
        wides,
        no_balls,
    }
}

/// Strikers in order of first appearance, blanks skipped.
pub fn batsmen_in_order<D: Delivery>(events: &[D]) -> Vec<D::Id> {
    let seen: IndexSet<&D::Id> =
        events.iter().map(|e| e.striker()).filter(|id| !id.is_blank()).collect();
    seen.into_iter().cloned().collect()
}

/// Bowlers in order of first appearance, blanks skipped.
pub fn bowlers_in_order<D: Delivery>(events: &[D]) -> Vec<D::Id> {
    let seen: IndexSet<&D::Id> =
        events.iter().map(|e| e.bowler()).filter(|id| !id.is_blank()).collect();
    seen.into_iter().cloned().collect()
}

/// Free hit pending for the next delivery.
///
/// A no-ball earns a free hit; a wide bowled on a free hit keeps it alive.
pub fn free_hit_pending<D: Delivery>(events: &[D]) -> bool {
    match events.last() {
        Some(last) => match last.ball_type() {
            BallType::NoBall => true,
            BallType::Wide => last.is_free_hit(),
            _ => false,
        },
        None => false,
    }
}

pub fn batting_points<Id>(stats: &BatsmanStats<Id>) -> u32 {
    let mut points = stats.runs.saturating_add(stats.fours + stats.sixes * 2);
    if stats.runs >= 50 {
        points += 10;
    }
    if stats.runs >= 100 {
        points += 20;
    }
    points
}

pub fn bowling_points<Id>(stats: &BowlerStats<Id>) -> u32 {
    let mut points = stats.wickets * 20;
    if stats.wickets >= 3 {
        points += 10;
    }
    if stats.wickets >= 5 {
        points += 20;
    }
    points
}

/// Player-of-the-match over an arbitrary delivery pool.
///
/// Ties go to whoever entered the tally first: batsmen in order of first
/// appearance, then bowlers in order of first appearance.
pub fn player_of_the_match_from<D: Delivery>(events: &[D]) -> Option<PlayerOfTheMatch<D::Id>> {
    let mut tally: IndexMap<D::Id, (u32, Vec<String>)> = IndexMap::new();

    for name in batsmen_in_order(events) {
        let stats = batsman_stats(events, &name);
        let points = batting_points(&stats);
        if points > 0 {
            let entry = tally.entry(name).or_default();
            entry.0 = entry.0.saturating_add(points);
            if stats.runs > 20 {
                entry.1.push(format!("{} Runs", stats.runs));
            }
        }
    }

    for name in bowlers_in_order(events) {
        let stats = bowler_stats(events, &name);
        let points = bowling_points(&stats);
        if points > 0 {
            let entry = tally.entry(name).or_default();
            entry.0 = entry.0.saturating_add(points);
            if stats.wickets > 0 {
                entry.1.push(format!("{} Wickets", stats.wickets));
            }
        }
    }

    let mut best: Option<(D::Id, u32, Vec<String>)> = None;
    for (name, (points, stats)) in tally {
        if best.as_ref().map_or(true, |(_, top, _)| points > *top) {
            best = Some((name, points, stats));
        }
    }

    best.map(|(name, points, stats)| PlayerOfTheMatch { name, points, stats })
}

/// Player-of-the-match pooled across both innings.
pub fn player_of_the_match(state: &MatchState) -> Option<PlayerOfTheMatch> {
    let pooled: Vec<_> = state.all_events().collect();
    player_of_the_match_from(&pooled)
}

pub fn generate_innings_summary(inning: &Inning) -> InningsSummary {
    let events = &inning.events;
    let score = compute_innings_score(events);

    let mut top_batsman: Option<TopBatsman> = None;
    let mut max_runs = 0;
    for name in batsmen_in_order(events) {
        let stats = batsman_stats(events, &name);
        if stats.runs > max_runs {
            max_runs = stats.runs;
            top_batsman = Some(TopBatsman { name: stats.name, runs: stats.runs, balls: stats.balls });
        }
    }

    let mut top_bowler: Option<TopBowler> = None;
    let mut max_wickets = 0;
    for name in bowlers_in_order(events) {
        let stats = bowler_stats(events, &name);
        let fewer_runs = top_bowler.as_ref().map_or(true, |top| stats.runs < top.runs);
        if stats.wickets > max_wickets || (stats.wickets == max_wickets && fewer_runs) {
            max_wickets = stats.wickets;
            top_bowler = Some(TopBowler {
                name: stats.name,
                wickets: stats.wickets,
                runs: stats.runs,
                overs: stats.overs,
            });
        }
    }

    InningsSummary {
        team_name: inning.team_name.clone(),
        total_runs: score.total_runs,
        total_wickets: score.total_wickets,
        overs: score.overs,
        top_batsman,
        top_bowler,
        extras: score.total_extras,
    }
}
