//! Replays a persisted action log deterministically and reports a
//! hash of the resulting state at every step, for cross-implementation
//! parity checks and for `tools/fg-replay`.

use std::collections::BTreeMap;

use fg_types::action::Action;
use fg_types::content::LoadedContent;
use fg_types::error::EngineError;
use fg_types::hash::hash_state;
use fg_types::state::RunState;
use serde::{Deserialize, Serialize};

use crate::{reducer, setup};

/// Header carried alongside an `ActionLog`, stamped at creation time so
/// a replay tool can tell at a glance which engine and content version
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLogHeader {
    pub engine_version: String,
    pub content_version: u32,
    pub spec_version: String,
    pub created_at_utc: String,
}

/// A single recorded `(step_index, hash)` pair, used to spot-check a
/// long log without replaying the whole thing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub step_index: usize,
    pub state_hash: String,
}

/// A complete recording of one run: the seed it was started with and
/// every action submitted, in order. `actions[0]` is always `START_RUN`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLog {
    pub header: ActionLogHeader,
    pub seed: u32,
    pub actions: Vec<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoints: Option<Vec<Checkpoint>>,
}

/// Replays `log` from scratch. Step 0 is the hash immediately after
/// `create_run` (consuming `actions[0]`, which must be `START_RUN`);
/// step `i` for `i >= 1` is the hash after applying `actions[i]`.
///
/// Any declared `checkpoints` are verified against the replayed hashes
/// and a mismatch is reported as `EngineError::IllegalAction` rather
/// than silently ignored — a checkpoint only has value if it's load
/// bearing.
pub fn replay_log(content: &LoadedContent, log: &ActionLog) -> Result<(RunState, BTreeMap<usize, String>), EngineError> {
    let Some(Action::StartRun { seed, run_length_target }) = log.actions.first() else {
        return Err(EngineError::IllegalAction {
            reason: "action log must begin with START_RUN".to_string(),
        });
    };
    if *seed != log.seed {
        return Err(EngineError::IllegalAction {
            reason: "START_RUN seed does not match the log's declared seed".to_string(),
        });
    }

    let mut state = setup::create_run(content, *seed, *run_length_target);
    let mut hashes = BTreeMap::new();
    hashes.insert(0usize, hash_state(&state));

    for (index, action) in log.actions.iter().enumerate().skip(1) {
        let (next, _events) = reducer::apply_action(content, &state, action.clone())?;
        state = next;
        hashes.insert(index, hash_state(&state));
    }

    if let Some(checkpoints) = &log.checkpoints {
        for checkpoint in checkpoints {
            match hashes.get(&checkpoint.step_index) {
                Some(hash) if *hash == checkpoint.state_hash => {}
                _ => {
                    return Err(EngineError::IllegalAction {
                        reason: format!("checkpoint mismatch at step {}", checkpoint.step_index),
                    });
                }
            }
        }
    }

    Ok((state, hashes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fg_content::default_bundle;
    use fg_content::loader::load_content;
    use fg_types::action::Action;
    use fg_types::enums::RunLengthTarget;

    fn header() -> ActionLogHeader {
        ActionLogHeader {
            engine_version: fg_types::error::ENGINE_VERSION.to_string(),
            content_version: 1,
            spec_version: "v1.1".to_string(),
            created_at_utc: "1970-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn replay_rejects_a_log_not_starting_with_start_run() {
        let content = load_content(default_bundle()).unwrap();
        let log = ActionLog {
            header: header(),
            seed: 1,
            actions: vec![Action::ChooseEngage],
            checkpoints: None,
        };
        assert!(replay_log(&content, &log).is_err());
    }

    #[test]
    fn replay_rejects_a_seed_mismatch() {
        let content = load_content(default_bundle()).unwrap();
        let log = ActionLog {
            header: header(),
            seed: 2,
            actions: vec![Action::StartRun {
                seed: 1,
                run_length_target: RunLengthTarget::Seven,
            }],
            checkpoints: None,
        };
        assert!(replay_log(&content, &log).is_err());
    }

    #[test]
    fn replay_of_just_start_run_matches_create_run_hash() {
        let content = load_content(default_bundle()).unwrap();
        let log = ActionLog {
            header: header(),
            seed: 7,
            actions: vec![Action::StartRun {
                seed: 7,
                run_length_target: RunLengthTarget::Seven,
            }],
            checkpoints: None,
        };
        let (state, hashes) = replay_log(&content, &log).unwrap();
        let direct = setup::create_run(&content, 7, RunLengthTarget::Seven);
        assert_eq!(hashes[&0], hash_state(&direct));
        assert_eq!(hash_state(&state), hash_state(&direct));
    }

    #[test]
    fn replay_is_idempotent_across_two_runs_of_the_same_log() {
        let content = load_content(default_bundle()).unwrap();
        let log = ActionLog {
            header: header(),
            seed: 42,
            actions: vec![Action::StartRun {
                seed: 42,
                run_length_target: RunLengthTarget::Seven,
            }],
            checkpoints: None,
        };
        let (_state_a, hashes_a) = replay_log(&content, &log).unwrap();
        let (_state_b, hashes_b) = replay_log(&content, &log).unwrap();
        assert_eq!(hashes_a, hashes_b);
    }

    #[test]
    fn replay_rejects_a_failing_checkpoint() {
        let content = load_content(default_bundle()).unwrap();
        let log = ActionLog {
            header: header(),
            seed: 7,
            actions: vec![Action::StartRun {
                seed: 7,
                run_length_target: RunLengthTarget::Seven,
            }],
            checkpoints: Some(vec![Checkpoint {
                step_index: 0,
                state_hash: "not-the-real-hash".to_string(),
            }]),
        };
        assert!(replay_log(&content, &log).is_err());
    }
}
