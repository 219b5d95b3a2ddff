//! Scoring engine: calculator, lifecycle table, the scoring session and the
//! read-only views derived from a match.

pub mod analytics;
pub mod live_match;
pub mod result;
pub mod scoring;
pub mod state_machine;
pub mod timeline;

pub use analytics::{match_analytics, ChaseOutlook, MatchAnalytics, ProbabilityBand};
pub use live_match::{Authority, BallOutcome, Clock, FixedClock, ScoringSession, SystemClock};
pub use result::{decide_result, Margin, MatchResult};
pub use scoring::{
    batsman_stats, bowler_stats, compute_innings_score, format_overs, free_hit_pending,
    generate_innings_summary, player_of_the_match, BatsmanStats, BowlerStats, Extras,
    InningsScore, InningsSummary, PlayerOfTheMatch,
};
pub use state_machine::{transition, MatchTrigger};
pub use timeline::{highlight_for, over_history, Highlight, OverGroup};
