//! Scorebook CLI
//!
//! Create, score, inspect and pack match files.

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "scorebook")]
#[command(about = "Score limited-overs cricket matches from the command line", long_about = None)]
struct Cli {
    /// Scoring config (YAML or JSON); defaults to $CRICKET_SCORING_CONFIG
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Create a configured match waiting for the toss
    New {
        #[arg(long)]
        team1: String,

        #[arg(long)]
        team2: String,

        #[arg(long, default_value = "5")]
        overs: u32,

        #[arg(long, default_value = "11")]
        players: u32,

        /// Output match file (.json or .match)
        #[arg(long)]
        out: PathBuf,
    },

    /// Replay a YAML action script against a match
    Play {
        /// Match file to start from
        #[arg(long)]
        state: PathBuf,

        /// YAML script with an `actions` list
        #[arg(long)]
        script: PathBuf,

        /// Output match file; defaults to overwriting --state
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the scorecard, analytics and result
    Report {
        #[arg(long)]
        state: PathBuf,

        /// Print the JSON report instead of text
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Pack a JSON match into a checksummed .match snapshot
    Pack {
        #[arg(long)]
        r#in: PathBuf,

        #[arg(long)]
        out: PathBuf,

        /// Output metadata JSON file
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// Unpack a .match snapshot into JSON
    Unpack {
        #[arg(long)]
        r#in: PathBuf,

        #[arg(long)]
        out: PathBuf,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = scorebook::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::New { team1, team2, overs, players, out } => {
            let setup = cricket_core::MatchSetup::new(team1, team2, overs, players);
            let state = scorebook::new_match(&setup, config)?;
            scorebook::save_state(&out, &state)?;
            println!("🏏 {} v {}, {} overs, {} a side", state.team1, state.team2, overs, players);
            println!("   Saved to: {}", out.display());
        }

        Commands::Play { state, script, out } => {
            let (match_state, note) = scorebook::load_state_noted(&state)?;
            print_migration(note.as_deref());
            let content = std::fs::read_to_string(&script)
                .with_context(|| format!("Failed to read script: {}", script.display()))?;
            let script = scorebook::Script::from_yaml(&content)?;

            let log = scorebook::play_script(match_state, script, config)?;
            for line in &log.lines {
                println!("{}", line);
            }

            let out = out.unwrap_or(state);
            scorebook::save_state(&out, &log.state)?;
            println!("\n✅ {} -> {}", log.state.status, out.display());
        }

        Commands::Report { state, json } => {
            let (match_state, note) = scorebook::load_state_noted(&state)?;
            print_migration(note.as_deref());
            if json {
                let report = cricket_core::MatchReport::build(&match_state);
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", scorebook::render_scorecard(&match_state));
            }
        }

        Commands::Pack { r#in, out, metadata } => {
            println!("📦 Packing match...");
            println!("   Input:  {}", r#in.display());
            println!("   Output: {}", out.display());

            let meta = scorebook::pack(&r#in, &out)?;
            print_metadata(&meta);

            if let Some(metadata_path) = metadata {
                let metadata_json = serde_json::to_string_pretty(&meta)?;
                std::fs::write(&metadata_path, metadata_json)?;
                println!("\n📄 Metadata saved to: {}", metadata_path.display());
            }
        }

        Commands::Unpack { r#in, out } => {
            scorebook::unpack(&r#in, &out)?;
            println!("✅ Unpacked {} -> {}", r#in.display(), out.display());
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_migration(note: Option<&str>) {
    if let Some(note) = note {
        eprintln!("🔄 {}", note);
    }
}

#[cfg(feature = "cli")]
fn print_metadata(meta: &scorebook::PackMetadata) {
    println!("\n✅ Match packed successfully!");
    println!("   JSON size:       {} bytes", meta.json_size);
    println!("   Packed size:     {} bytes", meta.packed_size);
    println!("   Compression:     {:.1}%", meta.compression_ratio * 100.0);
    println!("   Deliveries:      {}", meta.deliveries);
    println!("   Saved:           {}", meta.saved_at);
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("scorebook CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
