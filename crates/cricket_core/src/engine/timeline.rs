//! Over-by-over view of an innings log and per-delivery highlights.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::scoring::compute_innings_score;
use crate::models::{BallEvent, BallType, Delivery, PlayerId};

/// Deliveries sharing one `over` index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverGroup {
    /// Zero-based.
    pub over: u32,
    /// Bowler of the first delivery in the group.
    pub bowler: PlayerId,
    pub balls: Vec<BallEvent>,
}

impl OverGroup {
    pub fn runs(&self) -> u32 {
        self.balls.iter().map(BallEvent::total_runs).fold(0, u32::saturating_add)
    }

    pub fn wickets(&self) -> u32 {
        self.balls.iter().filter(|b| b.is_wicket).count() as u32
    }

    pub fn notation(&self) -> Vec<String> {
        self.balls.iter().map(BallEvent::notation).collect()
    }
}

/// Moment worth calling out to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    HatTrick,
    Wicket,
    FreeHit,
    Four,
    Six,
}

/// Deliveries grouped by over, most recent over first.
pub fn over_history(events: &[BallEvent]) -> Vec<OverGroup> {
    let mut groups: BTreeMap<u32, Vec<BallEvent>> = BTreeMap::new();
    for event in events {
        groups.entry(event.over).or_default().push(event.clone());
    }

    groups
        .into_iter()
        .rev()
        .map(|(over, balls)| OverGroup {
            over,
            bowler: balls.first().map(|b| b.bowler_id.clone()).unwrap_or_default(),
            balls,
        })
        .collect()
}

/// Deliveries of the over currently in progress.
pub fn current_over(events: &[BallEvent]) -> Vec<&BallEvent> {
    let over = compute_innings_score(events).legal_balls / 6;
    events.iter().filter(|e| e.over == over).collect()
}

/// The next delivery starts a fresh over, so the scorer may name a new bowler.
pub fn is_new_over(events: &[BallEvent]) -> bool {
    let legal_balls = compute_innings_score(events).legal_balls;
    if legal_balls == 0 {
        return true;
    }
    if legal_balls % 6 != 0 {
        return false;
    }
    match events.last() {
        Some(last) => last.over < legal_balls / 6,
        None => true,
    }
}

pub fn last_ball_was_wicket(events: &[BallEvent]) -> bool {
    events.last().map_or(false, |e| e.is_wicket)
}

/// Player names may be edited at the start of an over or after a wicket.
pub fn players_editable(events: &[BallEvent]) -> bool {
    is_new_over(events) || last_ball_was_wicket(events)
}

/// Highlight for the latest delivery in `events`, if any.
///
/// A wicket is a hat-trick when the same bowler's two previous deliveries in
/// the log were wickets too.
pub fn highlight_for<D: Delivery>(events: &[D]) -> Option<Highlight> {
    let (latest, earlier) = events.split_last()?;

    if latest.is_wicket() {
        let mut previous = earlier.iter().rev().filter(|e| e.bowler() == latest.bowler());
        let hat_trick = matches!(
            (previous.next(), previous.next()),
            (Some(a), Some(b)) if a.is_wicket() && b.is_wicket()
        );
        return Some(if hat_trick { Highlight::HatTrick } else { Highlight::Wicket });
    }

    match (latest.ball_type(), latest.runs()) {
        (BallType::NoBall, _) => Some(Highlight::FreeHit),
        (BallType::Legal, 4) => Some(Highlight::Four),
        (BallType::Legal, 6) => Some(Highlight::Six),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DismissalType;

    fn push(events: &mut Vec<BallEvent>, bowler: &str, runs: u32, ball_type: BallType, wicket: bool) {
        let legal = compute_innings_score(events).legal_balls;
        events.push(BallEvent {
            id: format!("e{}", events.len()),
            inning: 1,
            over: legal / 6,
            ball_in_over: (legal % 6 + 1) as u8,
            runs,
            ball_type,
            is_wicket: wicket,
            is_free_hit: false,
            dismissal_type: wicket.then_some(DismissalType::Bowled),
            striker_id: "A".into(),
            non_striker_id: "B".into(),
            bowler_id: bowler.into(),
            timestamp: 0,
        });
    }

    #[test]
    fn history_groups_by_over_newest_first() {
        let mut events = Vec::new();
        for _ in 0..6 {
            push(&mut events, "X", 1, BallType::Legal, false);
        }
        push(&mut events, "Y", 0, BallType::Wide, false);
        push(&mut events, "Y", 4, BallType::Legal, false);

        let history = over_history(&events);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].over, 1);
        assert_eq!(history[0].bowler, PlayerId::new("Y"));
        assert_eq!(history[0].notation(), vec!["wd", "4"]);
        assert_eq!(history[0].runs(), 5);
        assert_eq!(history[1].over, 0);
        assert_eq!(history[1].balls.len(), 6);
        assert_eq!(history[1].runs(), 6);
    }

    #[test]
    fn new_over_detection() {
        let mut events = Vec::new();
        assert!(is_new_over(&events));
        push(&mut events, "X", 0, BallType::Legal, false);
        assert!(!is_new_over(&events));
        for _ in 0..5 {
            push(&mut events, "X", 0, BallType::Legal, false);
        }
        assert!(is_new_over(&events));
        // A wide at the start of the next over is still over 1.
        push(&mut events, "Y", 0, BallType::Wide, false);
        assert!(!is_new_over(&events));
        assert_eq!(current_over(&events).len(), 1);
    }

    #[test]
    fn editing_allowed_after_wicket() {
        let mut events = Vec::new();
        push(&mut events, "X", 0, BallType::Legal, false);
        assert!(!players_editable(&events));
        push(&mut events, "X", 0, BallType::Legal, true);
        assert!(last_ball_was_wicket(&events));
        assert!(players_editable(&events));
    }

    #[test]
    fn hat_trick_needs_same_bowler() {
        let mut events = Vec::new();
        push(&mut events, "X", 0, BallType::Legal, true);
        push(&mut events, "Y", 0, BallType::Legal, false);
        push(&mut events, "X", 0, BallType::Legal, true);
        assert_eq!(highlight_for(&events), Some(Highlight::Wicket));
        push(&mut events, "X", 0, BallType::Legal, true);
        assert_eq!(highlight_for(&events), Some(Highlight::HatTrick));
    }

    #[test]
    fn boundaries_only_off_legal_balls() {
        let mut events = Vec::new();
        push(&mut events, "X", 4, BallType::Bye, false);
        assert_eq!(highlight_for(&events), None);
        push(&mut events, "X", 4, BallType::Legal, false);
        assert_eq!(highlight_for(&events), Some(Highlight::Four));
        push(&mut events, "X", 6, BallType::Legal, false);
        assert_eq!(highlight_for(&events), Some(Highlight::Six));
        push(&mut events, "X", 0, BallType::NoBall, false);
        assert_eq!(highlight_for(&events), Some(Highlight::FreeHit));
        assert_eq!(highlight_for::<BallEvent>(&[]), None);
    }
}
