use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use validator::{Validate, ValidationError};

use crate::error::{MatchError, Result};

/// Overs per innings a match may be played over.
pub const OVERS_RANGE: RangeInclusive<u32> = 1..=50;
/// Players per side.
pub const PLAYERS_RANGE: RangeInclusive<u32> = 2..=11;

/// Scorer input for a new match, checked before the state leaves `setup`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_distinct_teams"))]
pub struct MatchSetup {
    #[validate(length(min = 1, max = 64), custom = "validate_not_blank")]
    pub team1: String,
    #[validate(length(min = 1, max = 64), custom = "validate_not_blank")]
    pub team2: String,
    #[validate(range(min = 1, max = 50))]
    pub overs_per_innings: u32,
    #[validate(range(min = 2, max = 11))]
    pub players_per_team: u32,
}

impl MatchSetup {
    pub fn new(
        team1: impl Into<String>,
        team2: impl Into<String>,
        overs_per_innings: u32,
        players_per_team: u32,
    ) -> Self {
        Self { team1: team1.into(), team2: team2.into(), overs_per_innings, players_per_team }
    }

    /// Validate and return the setup with team names trimmed.
    pub fn checked(&self) -> Result<MatchSetup> {
        self.validate().map_err(|e| MatchError::InvalidSetup(e.to_string()))?;
        Ok(MatchSetup {
            team1: self.team1.trim().to_string(),
            team2: self.team2.trim().to_string(),
            ..self.clone()
        })
    }
}

fn validate_not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn validate_distinct_teams(setup: &MatchSetup) -> std::result::Result<(), ValidationError> {
    if setup.team1.trim().eq_ignore_ascii_case(setup.team2.trim()) {
        return Err(ValidationError::new("teams_must_differ"));
    }
    Ok(())
}
