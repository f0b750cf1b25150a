//! Swimrace: play a race in the terminal.
//!
//! ```text
//! swimrace          # one player
//! swimrace 2        # two players on one keyboard
//! ```
//!
//! Set `SWIMRACE_LOG` (e.g. `SWIMRACE_LOG=debug`) to write logs to
//! `SWIMRACE_LOG_FILE` (default `swimrace.log`).

use std::fs::File;
use std::sync::Mutex;
use swimrace::{Engine, EngineConfig, KeyMap, Race, RaceConfig, Standing, Status, Swimmer};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> swimrace::Result<()> {
    init_tracing();

    let players = player_count(std::env::args().skip(1));
    let mut swimmers = vec![Swimmer::new("Player 1", 0, KeyMap::PLAYER_ONE)];
    if players == 2 {
        swimmers.push(Swimmer::new("Player 2", 1, KeyMap::PLAYER_TWO));
    }

    let mut race = Race::new(swimmers, RaceConfig::default())?;
    let standings = Engine::new(EngineConfig::default()).run(&mut race)?;
    info!("session ended");

    for standing in &standings {
        println!("{}", describe(standing));
    }
    match race.winner() {
        Some(winner) => println!("{} wins!", winner.name()),
        None if race.is_over() => println!("No winner."),
        None => println!("Race abandoned."),
    }
    Ok(())
}

/// Logs go to a file because the race owns the terminal.
fn init_tracing() {
    let Ok(filter) = std::env::var("SWIMRACE_LOG") else {
        return;
    };
    let path = std::env::var("SWIMRACE_LOG_FILE").unwrap_or_else(|_| "swimrace.log".to_string());
    let Ok(file) = File::create(&path) else {
        eprintln!("cannot open log file {path}");
        return;
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn player_count(mut args: impl Iterator<Item = String>) -> usize {
    if args.any(|arg| matches!(arg.as_str(), "2" | "--two" | "--2p")) {
        2
    } else {
        1
    }
}

fn describe(standing: &Standing) -> String {
    let outcome = match standing.status {
        Status::Finished { at } => format!("finished in {at:.2}s"),
        Status::Drowned { at } => format!("ran out of air at {at:.2}s"),
        Status::Swimming => "did not finish".to_string(),
    };
    format!(
        "{}: {outcome}, {} strokes, {:.1}m",
        standing.name, standing.stroke_count, standing.position
    )
}
