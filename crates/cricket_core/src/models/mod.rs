pub mod events;
pub mod match_setup;
pub mod match_state;
pub mod player;

pub use events::{BallEvent, BallType, Delivery, DismissalType, MAX_RUNS_PER_BALL};
pub use match_setup::{MatchSetup, OVERS_RANGE, PLAYERS_RANGE};
pub use match_state::{Inning, MatchState, MatchStatus, TossDecision};
pub use player::{Identifier, PlayerId};
