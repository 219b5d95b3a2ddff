//! Match lifecycle transition table.
//!
//! Every status change in the crate goes through [`transition`]; a pair that
//! is not in the table is rejected and the caller's state stays as it was.

use std::fmt;

use crate::error::{MatchError, Result};
use crate::models::MatchStatus;

/// What happened to make the match change status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchTrigger {
    OpenLobby,
    ConfirmSetup,
    CompleteToss,
    Exit,
    CallTimeout,
    Resume,
    InningsComplete,
    StartNextInnings,
    MatchComplete,
    EndSession,
}

impl MatchTrigger {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchTrigger::OpenLobby => "open_lobby",
            MatchTrigger::ConfirmSetup => "confirm_setup",
            MatchTrigger::CompleteToss => "complete_toss",
            MatchTrigger::Exit => "exit",
            MatchTrigger::CallTimeout => "call_timeout",
            MatchTrigger::Resume => "resume",
            MatchTrigger::InningsComplete => "innings_complete",
            MatchTrigger::StartNextInnings => "start_next_innings",
            MatchTrigger::MatchComplete => "match_complete",
            MatchTrigger::EndSession => "end_session",
        }
    }
}

impl fmt::Display for MatchTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Next status for `(from, trigger)`, or `InvalidTransition`.
pub fn transition(from: MatchStatus, trigger: MatchTrigger) -> Result<MatchStatus> {
    use MatchStatus::*;
    use MatchTrigger::*;

    let to = match (from, trigger) {
        (Setup, OpenLobby) => Waiting,
        (Setup | Waiting, ConfirmSetup) => Toss,
        (Toss, CompleteToss) => Live,
        (Toss | Live, Exit) => Setup,
        (Live, CallTimeout) => Timeout,
        (Timeout, Resume) => Live,
        (Live, InningsComplete) => InningsBreak,
        (InningsBreak, StartNextInnings) => Live,
        (Live, MatchComplete) => Finished,
        (Live | Timeout | InningsBreak | Finished, EndSession) => Ended,
        _ => return Err(MatchError::InvalidTransition { from, trigger }),
    };
    Ok(to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use MatchStatus::*;
    use MatchTrigger::*;

    const ALL_STATUSES: [MatchStatus; 8] =
        [Setup, Toss, Live, Timeout, InningsBreak, Finished, Waiting, Ended];
    const ALL_TRIGGERS: [MatchTrigger; 10] = [
        OpenLobby,
        ConfirmSetup,
        CompleteToss,
        Exit,
        CallTimeout,
        Resume,
        InningsComplete,
        StartNextInnings,
        MatchComplete,
        EndSession,
    ];

    #[test]
    fn happy_path_through_a_full_match() {
        let mut status = Setup;
        for trigger in [ConfirmSetup, CompleteToss, CallTimeout, Resume, InningsComplete, StartNextInnings, MatchComplete, EndSession] {
            status = transition(status, trigger).unwrap();
        }
        assert_eq!(status, Ended);
    }

    #[test]
    fn lobby_then_setup() {
        let waiting = transition(Setup, OpenLobby).unwrap();
        assert_eq!(waiting, Waiting);
        assert_eq!(transition(waiting, ConfirmSetup).unwrap(), Toss);
    }

    #[test]
    fn exit_returns_to_setup_from_toss_and_live_only() {
        assert_eq!(transition(Toss, Exit).unwrap(), Setup);
        assert_eq!(transition(Live, Exit).unwrap(), Setup);
        assert!(transition(Timeout, Exit).is_err());
        assert!(transition(Finished, Exit).is_err());
    }

    #[test]
    fn finished_is_terminal_except_for_end_session() {
        for trigger in ALL_TRIGGERS {
            let result = transition(Finished, trigger);
            if trigger == EndSession {
                assert_eq!(result.unwrap(), Ended);
            } else {
                assert!(result.is_err(), "finished accepted {trigger}");
            }
        }
    }

    #[test]
    fn ended_accepts_nothing() {
        for trigger in ALL_TRIGGERS {
            assert!(transition(Ended, trigger).is_err());
        }
    }

    #[test]
    fn table_has_expected_size() {
        let accepted = ALL_STATUSES
            .iter()
            .flat_map(|s| ALL_TRIGGERS.iter().map(move |t| (*s, *t)))
            .filter(|(s, t)| transition(*s, *t).is_ok())
            .count();
        assert_eq!(accepted, 15);
    }

    #[test]
    fn rejection_reports_the_pair() {
        let err = transition(Timeout, InningsComplete).unwrap_err();
        assert_eq!(err, MatchError::InvalidTransition { from: Timeout, trigger: InningsComplete });
    }
}
