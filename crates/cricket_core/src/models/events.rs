use serde::{Deserialize, Serialize};
use std::fmt;

use super::player::{Identifier, PlayerId};

/// Most runs a single delivery may carry, extras excluded.
pub const MAX_RUNS_PER_BALL: u32 = 7;

/// How a delivery was bowled, from the scorer's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BallType {
    Legal,
    Wide,
    #[serde(rename = "noball")]
    NoBall,
    Bye,
    #[serde(rename = "legbye")]
    LegBye,
}

impl BallType {
    pub const ALL: [BallType; 5] =
        [BallType::Legal, BallType::Wide, BallType::NoBall, BallType::Bye, BallType::LegBye];

    /// Counts toward the six-ball over and the innings ball budget.
    pub fn counts_as_ball(self) -> bool {
        matches!(self, BallType::Legal | BallType::Bye | BallType::LegBye)
    }

    /// Wides and no-balls award one extra run on top of `runs`.
    pub fn penalty(self) -> u32 {
        match self {
            BallType::Wide | BallType::NoBall => 1,
            _ => 0,
        }
    }

    /// Runs off this delivery are credited to the striker.
    pub fn credits_batsman(self) -> bool {
        matches!(self, BallType::Legal | BallType::NoBall)
    }

    /// The striker is charged a ball faced.
    pub fn faced_by_batsman(self) -> bool {
        self != BallType::Wide
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BallType::Legal => "legal",
            BallType::Wide => "wide",
            BallType::NoBall => "noball",
            BallType::Bye => "bye",
            BallType::LegBye => "legbye",
        }
    }
}

impl fmt::Display for BallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DismissalType {
    Bowled,
    Caught,
    Lbw,
    RunOut,
    Stumped,
    HitWicket,
    Others,
}

impl DismissalType {
    /// Run-outs are neither credited to the bowler nor, in this model,
    /// attributed to the striker: the log does not record who was run out.
    pub fn credited_to_bowler(self) -> bool {
        self != DismissalType::RunOut
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DismissalType::Bowled => "bowled",
            DismissalType::Caught => "caught",
            DismissalType::Lbw => "lbw",
            DismissalType::RunOut => "run-out",
            DismissalType::Stumped => "stumped",
            DismissalType::HitWicket => "hit-wicket",
            DismissalType::Others => "others",
        }
    }
}

impl fmt::Display for DismissalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One delivery. Immutable once appended to an innings log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallEvent {
    pub id: String,
    /// 1 or 2
    pub inning: u8,
    /// Zero-based over index at the time of recording.
    pub over: u32,
    /// 1-6, informational only.
    pub ball_in_over: u8,
    pub runs: u32,
    #[serde(rename = "type")]
    pub ball_type: BallType,
    pub is_wicket: bool,
    #[serde(default)]
    pub is_free_hit: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dismissal_type: Option<DismissalType>,
    pub striker_id: PlayerId,
    pub non_striker_id: PlayerId,
    pub bowler_id: PlayerId,
    /// Milliseconds since the Unix epoch. Ordering comes from the log, not this.
    pub timestamp: i64,
}

impl BallEvent {
    /// Runs this delivery adds to the team total, penalty included.
    pub fn total_runs(&self) -> u32 {
        self.runs.saturating_add(self.ball_type.penalty())
    }

    /// Scorebook notation: `W`, `4`, `2wd`, `nb`, `1lb`, ...
    pub fn notation(&self) -> String {
        if self.is_wicket {
            return "W".to_string();
        }
        match self.ball_type {
            BallType::Wide | BallType::NoBall => {
                let suffix = if self.ball_type == BallType::Wide { "wd" } else { "nb" };
                if self.runs > 0 {
                    format!("{}{}", self.runs + 1, suffix)
                } else {
                    suffix.to_string()
                }
            }
            BallType::Bye => format!("{}b", self.runs),
            BallType::LegBye => format!("{}lb", self.runs),
            BallType::Legal => self.runs.to_string(),
        }
    }
}

/// Read access the scoring calculator needs from a delivery.
///
/// The folds in `engine::scoring` are written against this trait so a roster
/// backed identifier can replace free-text names without touching them.
pub trait Delivery {
    type Id: Identifier;

    fn ball_type(&self) -> BallType;
    fn runs(&self) -> u32;
    fn is_wicket(&self) -> bool;
    fn is_free_hit(&self) -> bool;
    fn dismissal(&self) -> Option<DismissalType>;
    fn striker(&self) -> &Self::Id;
    fn bowler(&self) -> &Self::Id;
}

impl Delivery for BallEvent {
    type Id = PlayerId;

    fn ball_type(&self) -> BallType {
        self.ball_type
    }

    fn runs(&self) -> u32 {
        self.runs
    }

    fn is_wicket(&self) -> bool {
        self.is_wicket
    }

    fn is_free_hit(&self) -> bool {
        self.is_free_hit
    }

    fn dismissal(&self) -> Option<DismissalType> {
        self.dismissal_type
    }

    fn striker(&self) -> &PlayerId {
        &self.striker_id
    }

    fn bowler(&self) -> &PlayerId {
        &self.bowler_id
    }
}

impl<D: Delivery> Delivery for &D {
    type Id = D::Id;

    fn ball_type(&self) -> BallType {
        D::ball_type(*self)
    }

    fn runs(&self) -> u32 {
        D::runs(*self)
    }

    fn is_wicket(&self) -> bool {
        D::is_wicket(*self)
    }

    fn is_free_hit(&self) -> bool {
        D::is_free_hit(*self)
    }

    fn dismissal(&self) -> Option<DismissalType> {
        D::dismissal(*self)
    }

    fn striker(&self) -> &D::Id {
        D::striker(*self)
    }

    fn bowler(&self) -> &D::Id {
        D::bowler(*self)
    }
}
