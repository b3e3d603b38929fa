//! Replays a persisted action log through the engine and prints the
//! hash recorded at every step, one line per `step_index`.
//!
//! Usage: `fg-replay <path-to-action-log.json>`

use std::env;
use std::fs;
use std::process::ExitCode;

use fg_engine::{ActionLog, Engine};

fn parse_args() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    args.get(1).cloned()
}

fn main() -> ExitCode {
    env_logger::init();

    let Some(path) = parse_args() else {
        eprintln!("usage: fg-replay <path-to-action-log.json>");
        return ExitCode::FAILURE;
    };

    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("failed to read {path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let log: ActionLog = match serde_json::from_str(&raw) {
        Ok(log) => log,
        Err(err) => {
            eprintln!("failed to parse {path} as an action log: {err}");
            return ExitCode::FAILURE;
        }
    };

    log::info!("replaying {path}: {} actions, seed {}", log.actions.len(), log.seed);

    let mut engine = Engine::new();
    if let Err(err) = engine.load_content(fg_content::default_bundle()) {
        eprintln!("failed to load content: {err}");
        return ExitCode::FAILURE;
    }

    let (_state, hashes) = match engine.replay_log(&log) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("replay failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    for (step_index, hash) in &hashes {
        println!("{step_index}\t{hash}");
    }

    ExitCode::SUCCESS
}
