//! Public entry point: a content-holding `Engine` handle wrapping
//! `create_run`/`legal_actions`/`apply_action`/`hash_state`/`replay_log`,
//! plus the persisted save-blob shape and its forward-only migrations.

use fg_types::action::Action;
use fg_types::content::{ContentBundle, LoadedContent};
use fg_types::enums::RunLengthTarget;
use fg_types::error::{EngineError, FatalDiagnostics, ENGINE_VERSION};
use fg_types::event::Event;
use fg_types::hash::hash_state;
use fg_types::state::{RunConfig, RunState};
use serde::{Deserialize, Serialize};

use crate::replay::{ActionLog, ActionLogHeader};
use crate::{reducer, replay, setup};

/// The current save-blob layout version. Bump this and add a migration
/// arm in `SaveBlob::migrate` whenever the persisted shape changes;
/// never break deserialization of an older `save_version` in place.
pub const CURRENT_SAVE_VERSION: u32 = 1;

/// The content-holding handle every caller goes through. Content is
/// loaded once and treated as read-only for the handle's lifetime;
/// every other call is a pure function of its own `&RunState` argument,
/// so two runs can share one `Engine` without aliasing each other.
#[derive(Debug, Default)]
pub struct Engine {
    content: Option<LoadedContent>,
}

impl Engine {
    pub fn new() -> Self {
        Self { content: None }
    }

    /// Validates and installs `bundle`. Replaces any previously loaded
    /// content; callers that need both versions at once should use two
    /// `Engine`s.
    pub fn load_content(&mut self, bundle: ContentBundle) -> Result<(), EngineError> {
        let loaded = fg_content::loader::load_content(bundle)?;
        self.content = Some(loaded);
        Ok(())
    }

    fn content(&self) -> Result<&LoadedContent, EngineError> {
        self.content.as_ref().ok_or_else(|| EngineError::ContentNotLoaded {
            diagnostics: FatalDiagnostics::new(None, None, None),
        })
    }

    pub fn content_version(&self) -> Option<u32> {
        self.content.as_ref().map(|c| c.content_version)
    }

    pub fn create_run(&self, seed: u32, run_length_target: RunLengthTarget) -> Result<RunState, EngineError> {
        Ok(setup::create_run(self.content()?, seed, run_length_target))
    }

    pub fn legal_actions(&self, state: &RunState) -> Result<Vec<Action>, EngineError> {
        Ok(crate::legal_actions::legal_actions(self.content()?, state))
    }

    pub fn apply_action(&self, state: &RunState, action: Action) -> Result<(RunState, Vec<Event>), EngineError> {
        reducer::apply_action(self.content()?, state, action)
    }

    pub fn hash_state(&self, state: &RunState) -> String {
        hash_state(state)
    }

    pub fn replay_log(&self, log: &ActionLog) -> Result<(RunState, std::collections::BTreeMap<usize, String>), EngineError> {
        replay::replay_log(self.content()?, log)
    }

    /// Builds a fresh `SaveBlob` at the current save version from a
    /// live `state` and the log that produced it.
    pub fn save(&self, state: &RunState, action_log: ActionLog, created_at_utc: String) -> Result<SaveBlob, EngineError> {
        let content_version = self.content()?.content_version;
        Ok(SaveBlob {
            header: SaveBlobHeader {
                engine_version: ENGINE_VERSION.to_string(),
                content_version,
                spec_version: "v1.1".to_string(),
                save_version: CURRENT_SAVE_VERSION,
                created_at_utc,
            },
            seed: state.seed,
            run_config: state.run_config,
            rng_state: RngStateDto {
                algo: "xorshift32".to_string(),
                state: state.rng.raw(),
            },
            state: state.clone(),
            action_log,
            checksum: None,
        })
    }

    /// Loads `blob`, migrating it to `CURRENT_SAVE_VERSION` first if
    /// it's older. The returned state is exactly what was persisted;
    /// no replay happens here (callers that want parity verification
    /// should run `replay_log` on `blob.action_log` separately).
    pub fn load(&self, blob: SaveBlob) -> Result<RunState, EngineError> {
        let blob = blob.migrate();
        Ok(blob.state)
    }
}

/// The save-blob header, identical to `ActionLogHeader` plus the
/// blob's own `save_version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveBlobHeader {
    pub engine_version: String,
    pub content_version: u32,
    pub spec_version: String,
    pub save_version: u32,
    pub created_at_utc: String,
}

/// Mirror of `RunState`'s embedded RNG word, kept at the top level so
/// a save-inspection tool doesn't need to parse the full state to read
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngStateDto {
    pub algo: String,
    pub state: u32,
}

/// The full persisted shape of a run in progress: enough to resume
/// play directly from `state`, plus the `action_log` that reconstructs
/// it from scratch for parity checking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveBlob {
    pub header: SaveBlobHeader,
    pub seed: u32,
    pub run_config: RunConfig,
    pub rng_state: RngStateDto,
    pub state: RunState,
    pub action_log: ActionLog,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl SaveBlob {
    /// Upgrades `self` to `CURRENT_SAVE_VERSION` in place, applying
    /// migrations in order. A blob from a newer engine than this one
    /// understands is left as-is; `Engine::load` will surface whatever
    /// deserialization or gameplay errors that causes rather than
    /// silently downgrading data.
    fn migrate(mut self) -> Self {
        // No migrations exist yet; save_version 1 is the only shape
        // ever shipped. Add `if self.header.save_version < 2 { ... }`
        // arms here as the format evolves, each one forward-only.
        if self.header.save_version < CURRENT_SAVE_VERSION {
            self.header.save_version = CURRENT_SAVE_VERSION;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fg_content::default_bundle;
    use fg_types::action::Action;

    fn engine() -> Engine {
        let mut engine = Engine::new();
        engine.load_content(default_bundle()).unwrap();
        engine
    }

    #[test]
    fn calls_before_load_content_are_content_not_loaded() {
        let engine = Engine::new();
        let err = engine.create_run(1, RunLengthTarget::Seven).unwrap_err();
        assert!(matches!(err, EngineError::ContentNotLoaded { .. }));
    }

    #[test]
    fn round_trips_a_save_blob_through_migrate() {
        let engine = engine();
        let state = engine.create_run(7, RunLengthTarget::Seven).unwrap();
        let log = ActionLog {
            header: ActionLogHeader {
                engine_version: ENGINE_VERSION.to_string(),
                content_version: engine.content_version().unwrap(),
                spec_version: "v1.1".to_string(),
                created_at_utc: "1970-01-01T00:00:00Z".to_string(),
            },
            seed: 7,
            actions: vec![Action::StartRun {
                seed: 7,
                run_length_target: RunLengthTarget::Seven,
            }],
            checkpoints: None,
        };
        let blob = engine.save(&state, log, "1970-01-01T00:00:00Z".to_string()).unwrap();
        let json = serde_json::to_string(&blob).unwrap();
        let parsed: SaveBlob = serde_json::from_str(&json).unwrap();
        let loaded = engine.load(parsed).unwrap();
        assert_eq!(hash_state(&loaded), hash_state(&state));
    }

    #[test]
    fn legal_actions_and_apply_action_agree_on_a_fresh_run() {
        let engine = engine();
        let state = engine.create_run(7, RunLengthTarget::Seven).unwrap();
        let actions = engine.legal_actions(&state).unwrap();
        assert!(!actions.is_empty());
        let (_next, _events) = engine.apply_action(&state, actions[0].clone()).unwrap();
    }
}
