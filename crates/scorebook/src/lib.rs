//! Scorebook Library
//!
//! Match files on disk: JSON state for editing and transport, packed
//! `.match` snapshots for storage, YAML scripts replayed through a scoring
//! session.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use cricket_core::api::{apply_action, ActionEffect};
use cricket_core::commentary::CommentaryTracker;
use cricket_core::engine::FixedClock;
use cricket_core::save::{
    decode_snapshot, migrate_snapshot, migration, snapshot_from_json, snapshot_to_json,
    SNAPSHOT_VERSION,
};
use cricket_core::{
    Authority, FileStore, MatchAction, MatchReport, MatchSetup, MatchSnapshot, MatchState,
    ScoringConfig, ScoringSession,
};

/// Simulated time between two scripted actions.
const ACTION_SPACING_MS: i64 = 30_000;

/// Load the scoring config from `path`, or the process default.
pub fn load_config(path: Option<&Path>) -> Result<ScoringConfig> {
    let Some(path) = path else {
        return Ok(cricket_core::ACTIVE_CONFIG.clone());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = ScoringConfig::from_path_str(&path.to_string_lossy(), &content)
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    Ok(config)
}

fn is_packed(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("match")
}

/// Read a match from JSON, or from a packed `.match` snapshot.
pub fn load_state(path: &Path) -> Result<MatchState> {
    load_state_noted(path).map(|(state, _)| state)
}

/// Like [`load_state`], also describing any snapshot migration applied.
pub fn load_state_noted(path: &Path) -> Result<(MatchState, Option<String>)> {
    let (state, note) = if is_packed(path) {
        let bytes = fs::read(path).with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
        let snapshot =
            decode_snapshot(&bytes).with_context(|| format!("Failed to load snapshot: {}", path.display()))?;

        let note = migration::needs_migration(&snapshot)
            .then(|| migration::migration_description(snapshot.version, SNAPSHOT_VERSION));
        if let Some(note) = &note {
            log::info!("{}: {}", path.display(), note);
        }

        let snapshot = migrate_snapshot(snapshot)
            .with_context(|| format!("Failed to migrate snapshot: {}", path.display()))?;
        (snapshot.state, note)
    } else {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read match file: {}", path.display()))?;
        let state = snapshot_from_json(&json)
            .with_context(|| format!("Failed to parse match file: {}", path.display()))?;
        (state, None)
    };

    state.check_limits().with_context(|| format!("Unusable match file: {}", path.display()))?;
    Ok((state, note))
}

/// Write a match as JSON, or packed when `path` ends in `.match`.
pub fn save_state(path: &Path, state: &MatchState) -> Result<()> {
    if is_packed(path) {
        FileStore::save_to_path(path, &MatchSnapshot::new(state.clone()))
            .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    let json = snapshot_to_json(state).context("Failed to serialize match")?;
    fs::write(path, json).with_context(|| format!("Failed to write match file: {}", path.display()))
}

/// A fresh match, configured and waiting for the toss.
pub fn new_match(setup: &MatchSetup, config: ScoringConfig) -> Result<MatchState> {
    let mut session =
        ScoringSession::with_clock(MatchState::new(), Authority::Scorer, config, FixedClock(0));
    session.configure(setup)?;
    Ok(session.into_state())
}

/// Actions to replay against a match.
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    /// Commentary seed (default 0)
    #[serde(default)]
    pub seed: u64,
    /// Clock value of the first action, Unix milliseconds
    #[serde(default)]
    pub start_at: i64,
    pub actions: Vec<MatchAction>,
}

impl Script {
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse script")
    }
}

/// Outcome of replaying a script.
#[derive(Debug, Clone)]
pub struct PlayLog {
    pub state: MatchState,
    /// One line per action, plus any commentary it drew.
    pub lines: Vec<String>,
}

/// Replay `script` on `state`. Stops at the first rejected action.
pub fn play_script(state: MatchState, script: Script, config: ScoringConfig) -> Result<PlayLog> {
    let mut tracker = CommentaryTracker::new(&state, config.commentary.clone(), script.seed);
    let mut session =
        ScoringSession::with_clock(state, Authority::Scorer, config, FixedClock(script.start_at));
    let mut lines = Vec::new();

    for (step, action) in script.actions.into_iter().enumerate() {
        let label = format!("{action:?}");
        let effect = apply_action(&mut session, action)
            .with_context(|| format!("Action {} rejected: {}", step + 1, label))?;

        let state = session.state();
        let line = match effect {
            ActionEffect::Ball(outcome) => {
                let score = session.score();
                format!(
                    "{}.{} {} {}  {}/{} ({})",
                    outcome.event.over,
                    outcome.event.ball_in_over,
                    outcome.event.bowler_id,
                    outcome.event.notation(),
                    score.total_runs,
                    score.total_wickets,
                    score.overs
                )
            }
            ActionEffect::Undone(event) => format!("undo {} ({})", event.notation(), event.id),
            ActionEffect::None => format!("-> {}", state.status),
        };
        lines.push(line);

        let now = session.clock_mut().0;
        if let Some(item) = tracker.observe(session.state(), now) {
            lines.push(format!("   \"{}\"", item.text));
        }
        session.clock_mut().0 += ACTION_SPACING_MS;
        log::debug!("Applied scripted action {}", step + 1);
    }

    Ok(PlayLog { state: session.into_state(), lines })
}

/// Plain-text scorecard of the current innings.
pub fn render_scorecard(state: &MatchState) -> String {
    let report = MatchReport::build(state);
    let mut out = String::new();

    let _ = writeln!(out, "{} v {} ({})", state.team1, state.team2, report.status);
    for summary in &report.innings {
        let _ = writeln!(
            out,
            "  {:<16} {}/{} ({} ov, extras {})",
            summary.team_name, summary.total_runs, summary.total_wickets, summary.overs, summary.extras
        );
    }

    let _ = writeln!(out, "\nBatting (innings {})", report.current_innings);
    for b in &report.batting {
        let mark = if b.is_out { "" } else { "*" };
        let _ = writeln!(
            out,
            "  {:<16} {:>3}{:<1} ({:>3})  4s {:>2}  6s {:>2}  SR {:>6.2}",
            b.name.to_string(),
            b.runs,
            mark,
            b.balls,
            b.fours,
            b.sixes,
            b.sr
        );
    }

    let _ = writeln!(out, "\nBowling");
    for b in &report.bowling {
        let _ = writeln!(
            out,
            "  {:<16} {:>4}-{}-{:>3}-{}  Econ {:>5.2}",
            b.name.to_string(),
            b.overs,
            b.maidens,
            b.runs,
            b.wickets,
            b.economy
        );
    }

    let analytics = &report.analytics;
    let _ = writeln!(out, "\nCRR {:.2}", analytics.current_run_rate);
    if let (Some(target), Some(needed)) = (analytics.target, analytics.runs_needed) {
        let _ = writeln!(out, "Target {}, need {} off {} balls", target, needed.max(0), analytics.balls_remaining);
    }
    if let Some(p) = analytics.win_probability {
        let _ = writeln!(out, "Win probability {:.0}%", p);
    }
    if let Some(result) = &report.result {
        let _ = writeln!(out, "\n{}", result);
    }
    if let Some(potm) = &report.player_of_the_match {
        let _ = writeln!(out, "Player of the match: {}", potm.headline());
    }
    out
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackMetadata {
    pub json_size: u64,
    pub packed_size: u64,
    pub compression_ratio: f64,
    pub deliveries: usize,
    pub saved_at: String,
}

/// Convert a JSON match file into a packed snapshot.
pub fn pack(input_json: &Path, output: &Path) -> Result<PackMetadata> {
    if !is_packed(output) {
        bail!("Packed output must end in .match: {}", output.display());
    }
    let json_size = fs::metadata(input_json)
        .with_context(|| format!("Failed to read match file: {}", input_json.display()))?
        .len();
    let state = load_state(input_json)?;
    let snapshot = MatchSnapshot::new(state);
    FileStore::save_to_path(output, &snapshot)
        .with_context(|| format!("Failed to write snapshot: {}", output.display()))?;

    let packed_size = fs::metadata(output)?.len();
    Ok(PackMetadata {
        json_size,
        packed_size,
        compression_ratio: packed_size as f64 / json_size.max(1) as f64,
        deliveries: snapshot.state.all_events().count(),
        saved_at: snapshot.saved_at_rfc3339(),
    })
}

/// Convert a packed snapshot back into JSON.
pub fn unpack(input: &Path, output_json: &Path) -> Result<()> {
    let state = load_state(input)?;
    save_state(output_json, &state)
}
