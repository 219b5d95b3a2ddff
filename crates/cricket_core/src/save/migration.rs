use super::error::SnapshotError;
use super::format::MatchSnapshot;
use super::SNAPSHOT_VERSION;
use crate::models::{MatchState, MatchStatus};

/// Bring a snapshot up to `SNAPSHOT_VERSION`.
pub fn migrate_snapshot(mut snapshot: MatchSnapshot) -> Result<MatchSnapshot, SnapshotError> {
    let original_version = snapshot.version;

    snapshot = match snapshot.version {
        0 => migrate_v0_to_v1(snapshot)?,
        1 => snapshot,
        v if v > SNAPSHOT_VERSION => {
            log::warn!("Loading snapshot from future version {} (current: {})", v, SNAPSHOT_VERSION);
            snapshot
        }
        _ => {
            return Err(SnapshotError::VersionMismatch {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
    };

    snapshot.version = SNAPSHOT_VERSION;

    if original_version != SNAPSHOT_VERSION {
        snapshot.touch();
        log::info!("Migrated snapshot from version {} to {}", original_version, SNAPSHOT_VERSION);
    }

    Ok(snapshot)
}

/// v0 snapshots predate delivery ids and could carry stale break/timeout
/// stamps after the status had moved on.
fn migrate_v0_to_v1(mut snapshot: MatchSnapshot) -> Result<MatchSnapshot, SnapshotError> {
    log::info!("Migrating snapshot from version 0 to 1");

    let state = &mut snapshot.state;
    normalize_transients(state);

    if state.current_inning_index > 1 {
        log::warn!("Clamping current inning index {} to 1", state.current_inning_index);
        state.current_inning_index = 1;
    }

    for (idx, inning) in state.innings.iter_mut().enumerate() {
        for (n, event) in inning.events.iter_mut().enumerate() {
            if event.id.is_empty() {
                event.id = format!("legacy-{}-{}", idx + 1, n + 1);
            }
        }
    }

    let (first, second) = batting_order(state);
    if state.innings[0].team_name.is_empty() {
        state.innings[0].team_name = first;
    }
    if state.innings[1].team_name.is_empty() {
        state.innings[1].team_name = second;
    }

    Ok(snapshot)
}

/// Drop transient stamps that do not belong to the current status.
pub fn normalize_transients(state: &mut MatchState) {
    if state.status != MatchStatus::Timeout
        && (state.timeout_started_at.is_some() || state.timeout_reason.is_some())
    {
        log::warn!("Clearing stale timeout marks on a {} match", state.status);
        state.clear_timeout_marks();
    }
    if state.status != MatchStatus::InningsBreak
        && (state.innings_break_started_at.is_some() || state.next_innings_starts_at.is_some())
    {
        log::warn!("Clearing stale innings break marks on a {} match", state.status);
        state.clear_break_marks();
    }
}

fn batting_order(state: &MatchState) -> (String, String) {
    match state.batting_first.as_deref() {
        Some(first) if first == state.team2 => (state.team2.clone(), state.team1.clone()),
        _ => (state.team1.clone(), state.team2.clone()),
    }
}

pub fn needs_migration(snapshot: &MatchSnapshot) -> bool {
    snapshot.version < SNAPSHOT_VERSION
}

pub fn migration_description(from_version: u32, to_version: u32) -> String {
    match (from_version, to_version) {
        (0, 1) => "Assigning delivery ids and clearing stale break stamps".to_string(),
        _ => format!("Updating snapshot format from version {} to {}", from_version, to_version),
    }
}
