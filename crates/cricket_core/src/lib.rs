//! # cricket_core - Ball-by-Ball Limited-Overs Cricket Scoring
//!
//! The scorer's side of a two-innings limited-overs match: a delivery log per
//! innings, everything derived from it, and the lifecycle that moves a match
//! from setup through the toss, play, breaks and the result.
//!
//! ## Features
//! - Pure scoring calculator (totals, extras, batting and bowling cards)
//! - Explicit lifecycle transition table
//! - Chase analytics and win probability
//! - Seeded auto-commentary
//! - Versioned, checksummed match snapshots
//! - JSON API for UI and replication layers

#![allow(clippy::doc_lazy_continuation)]
#![allow(clippy::field_reassign_with_default)]
#![allow(clippy::large_enum_variant)]

pub mod api;
pub mod commentary;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod save;

// Re-export main API functions
pub use api::{
    apply_action, apply_action_json, match_report_json, ActionEffect, ActionRequest, MatchAction,
    MatchReport,
};
pub use error::{MatchError, Result};

pub use config::{ScoringConfig, ACTIVE_CONFIG};

pub use engine::{
    decide_result, match_analytics, Authority, BallOutcome, MatchAnalytics, MatchResult,
    MatchTrigger, ScoringSession,
};

pub use commentary::{CommentaryItem, CommentaryKind, CommentaryTracker};

pub use models::{
    BallEvent, BallType, DismissalType, Inning, MatchSetup, MatchState, MatchStatus, PlayerId,
    TossDecision,
};

// Re-export snapshot system
pub use save::{FileStore, MatchSnapshot, MemoryStore, SnapshotError, SnapshotStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// JSON API schema version
pub const SCHEMA_VERSION: u8 = api::API_SCHEMA_VERSION;
