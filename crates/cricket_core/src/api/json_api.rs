use serde::{Deserialize, Serialize};

use super::error_codes;
use crate::config::ACTIVE_CONFIG;
use crate::engine::scoring::{
    batsman_stats, batsmen_in_order, bowler_stats, bowlers_in_order, compute_innings_score,
    free_hit_pending, generate_innings_summary, player_of_the_match,
};
use crate::engine::timeline::{over_history, players_editable};
use crate::engine::{
    decide_result, match_analytics, Authority, BallOutcome, BatsmanStats, BowlerStats, Clock,
    InningsScore, InningsSummary, MatchAnalytics, MatchResult, OverGroup, PlayerOfTheMatch,
    ScoringSession, SystemClock,
};
use crate::error::{self, MatchError};
use crate::models::{BallEvent, BallType, DismissalType, MatchSetup, MatchState, MatchStatus, TossDecision};

pub const API_SCHEMA_VERSION: u8 = 1;

fn err_code(code: &str, message: impl std::fmt::Display) -> String {
    format!("{code}: {message}")
}

fn match_error_code(err: &MatchError) -> &'static str {
    match err {
        MatchError::ReadOnly => error_codes::READ_ONLY,
        MatchError::Blocked { .. } => error_codes::BLOCKED,
        MatchError::EmptyUndo => error_codes::EMPTY_UNDO,
        MatchError::InvalidTransition { .. } => error_codes::INVALID_TRANSITION,
        MatchError::InvalidSetup(_) => error_codes::INVALID_SETUP,
        MatchError::InvalidToss(_) => error_codes::INVALID_TOSS,
        MatchError::InvalidDelivery(_) => error_codes::INVALID_DELIVERY,
        MatchError::CorruptState(_) => error_codes::INVALID_STATE,
        MatchError::SerializationError(_) | MatchError::DeserializationError(_) => {
            error_codes::SERIALIZATION
        }
    }
}

fn check_schema(version: u8) -> Result<(), String> {
    if version != API_SCHEMA_VERSION {
        return Err(err_code(
            error_codes::UNSUPPORTED_SCHEMA,
            format!("Unsupported schema version: {version}"),
        ));
    }
    Ok(())
}

fn to_error_string(err: MatchError) -> String {
    if err.is_guard() {
        log::debug!("Action rejected: {}", err);
    } else {
        log::warn!("Action failed: {}", err);
    }
    err_code(match_error_code(&err), err)
}

fn legal() -> BallType {
    BallType::Legal
}

fn scorer() -> Authority {
    Authority::Scorer
}

/// One scorer command.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MatchAction {
    Configure(MatchSetup),
    OpenLobby,
    CompleteToss {
        winner: String,
        decision: TossDecision,
    },
    ExitToSetup,
    EndSession,
    SetStriker {
        name: String,
    },
    SetNonStriker {
        name: String,
    },
    SetBowler {
        name: String,
    },
    RecordBall {
        runs: u32,
        #[serde(rename = "type", default = "legal")]
        ball_type: BallType,
        #[serde(rename = "isWicket", default)]
        is_wicket: bool,
        #[serde(rename = "dismissalType", default)]
        dismissal_type: Option<DismissalType>,
    },
    UndoLastBall,
    StartNextInnings,
    ScheduleNextInnings {
        #[serde(rename = "delaySecs", default)]
        delay_secs: Option<u32>,
    },
    CallTimeout {
        #[serde(default)]
        reason: Option<String>,
    },
    ResumeMatch,
}

/// What an applied action produced beyond the new state.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionEffect {
    None,
    Ball(BallOutcome),
    Undone(BallEvent),
}

/// Run one [`MatchAction`] against a session.
pub fn apply_action<C: Clock>(
    session: &mut ScoringSession<C>,
    action: MatchAction,
) -> error::Result<ActionEffect> {
    match action {
        MatchAction::Configure(setup) => session.configure(&setup)?,
        MatchAction::OpenLobby => session.open_lobby()?,
        MatchAction::CompleteToss { winner, decision } => session.complete_toss(&winner, decision)?,
        MatchAction::ExitToSetup => session.exit_to_setup()?,
        MatchAction::EndSession => session.end_session()?,
        MatchAction::SetStriker { name } => session.set_striker(name)?,
        MatchAction::SetNonStriker { name } => session.set_non_striker(name)?,
        MatchAction::SetBowler { name } => session.set_bowler(name)?,
        MatchAction::RecordBall { runs, ball_type, is_wicket, dismissal_type } => {
            let dismissal = match (is_wicket, dismissal_type) {
                (false, _) => None,
                (true, Some(kind)) => Some(kind),
                (true, None) => Some(DismissalType::Bowled),
            };
            return session.record_delivery(runs, ball_type, dismissal).map(ActionEffect::Ball);
        }
        MatchAction::UndoLastBall => return session.undo_last_ball().map(ActionEffect::Undone),
        MatchAction::StartNextInnings => session.start_next_innings()?,
        MatchAction::ScheduleNextInnings { delay_secs } => {
            session.schedule_next_innings(delay_secs)?;
        }
        MatchAction::CallTimeout { reason } => session.call_timeout(reason.as_deref())?,
        MatchAction::ResumeMatch => session.resume_match()?,
    }
    Ok(ActionEffect::None)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    pub schema_version: u8,
    #[serde(default = "scorer")]
    pub authority: Authority,
    pub state: MatchState,
    pub action: MatchAction,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub schema_version: u8,
    pub state: MatchState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<BallOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub undone: Option<BallEvent>,
}

/// Apply one action to the state in the request and return the new state.
///
/// Errors are `"CODE: message"` strings; the caller's state is not modified.
pub fn apply_action_json(request_json: &str) -> Result<String, String> {
    let request: ActionRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::INVALID_JSON, format!("Invalid JSON request: {e}")))?;
    check_schema(request.schema_version)?;

    request.state.check_limits().map_err(to_error_string)?;

    let ActionRequest { authority, state, action, .. } = request;
    let mut session =
        ScoringSession::with_clock(state, authority, ACTIVE_CONFIG.clone(), SystemClock);

    let effect = apply_action(&mut session, action).map_err(to_error_string)?;
    let (outcome, undone) = match effect {
        ActionEffect::Ball(outcome) => (Some(outcome), None),
        ActionEffect::Undone(event) => (None, Some(event)),
        ActionEffect::None => (None, None),
    };

    let response = ActionResponse {
        schema_version: API_SCHEMA_VERSION,
        state: session.into_state(),
        outcome,
        undone,
    };
    serde_json::to_string(&response)
        .map_err(|e| err_code(error_codes::SERIALIZATION, format!("Failed to serialize response: {e}")))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub schema_version: u8,
    pub state: MatchState,
}

/// Everything a scoreboard needs, derived from one state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub schema_version: u8,
    pub status: MatchStatus,
    pub current_innings: u8,
    pub score: InningsScore,
    pub innings: Vec<InningsSummary>,
    pub batting: Vec<BatsmanStats>,
    pub bowling: Vec<BowlerStats>,
    pub overs: Vec<OverGroup>,
    pub analytics: MatchAnalytics,
    pub free_hit_next: bool,
    pub players_editable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<MatchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_of_the_match: Option<PlayerOfTheMatch>,
}

impl MatchReport {
    pub fn build(state: &MatchState) -> Self {
        let events = &state.current_inning().events;
        let finished = state.status == MatchStatus::Finished;

        Self {
            schema_version: API_SCHEMA_VERSION,
            status: state.status,
            current_innings: state.current_inning_index.min(1) + 1,
            score: compute_innings_score(events),
            innings: if state.status.is_in_play() {
                state.innings.iter().map(generate_innings_summary).collect()
            } else {
                Vec::new()
            },
            batting: batsmen_in_order(events).iter().map(|p| batsman_stats(events, p)).collect(),
            bowling: bowlers_in_order(events).iter().map(|p| bowler_stats(events, p)).collect(),
            overs: over_history(events),
            analytics: match_analytics(state),
            free_hit_next: free_hit_pending(events),
            players_editable: players_editable(events),
            result: decide_result(state),
            player_of_the_match: if finished { player_of_the_match(state) } else { None },
        }
    }
}

/// Build a [`MatchReport`] for the state in `request_json`.
pub fn match_report_json(request_json: &str) -> Result<String, String> {
    let request: ReportRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::INVALID_JSON, format!("Invalid JSON request: {e}")))?;
    check_schema(request.schema_version)?;
    request.state.check_limits().map_err(to_error_string)?;

    serde_json::to_string(&MatchReport::build(&request.state))
        .map_err(|e| err_code(error_codes::SERIALIZATION, format!("Failed to serialize report: {e}")))
}
