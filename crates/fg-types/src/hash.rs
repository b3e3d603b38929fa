//! Canonical state hashing for replay and cross-implementation parity.
//!
//! `serde_json::Value`'s default `Map` is a `BTreeMap`, so converting a
//! state to `Value` already yields lexicographically sorted object
//! keys at every nesting level — canonicalization falls out of the
//! conversion rather than needing a bespoke walker.

use sha2::{Digest, Sha256};

use crate::state::RunState;

/// SHA-256 over the canonical JSON form of `state` with the UI sidecar
/// removed, hex-lowercase, 64 characters.
pub fn hash_state(state: &RunState) -> String {
    let canonical = canonical_json(state);
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex_lower(&digest)
}

/// The canonical JSON string hashed by `hash_state`, exposed for tests
/// and diagnostics that want to inspect what was actually hashed.
pub fn canonical_json(state: &RunState) -> String {
    let mut value = serde_json::to_value(state).expect("RunState always serializes");
    if let Some(obj) = value.as_object_mut() {
        obj.remove("debug");
    }
    serde_json::to_string(&value).expect("Value always serializes")
}

fn hex_lower(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        s.push_str(&format!("{:02x}", b));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::Phase;
    use crate::pending::PromptUiSidecar;
    use crate::state::{Floor, FloorParams, MajorsState, Player, Room, RulesState, RunConfig};
    use crate::rng::RngState;
    use std::collections::HashMap;

    fn sample_state() -> RunState {
        RunState {
            seed: 1,
            run_config: RunConfig::default(),
            rng: RngState::new(1),
            phase: Phase::RunInit,
            player: Player::new(20),
            floor: Floor {
                floor_number: 1,
                active_major_id: "the_fool".into(),
                engaged_rooms_completed: 0,
                floor_discard: vec![],
                boss_mode: false,
                boss_rooms_required: 2,
                boss_rooms_completed: 0,
                boss_deck: None,
                params: FloorParams::default(),
            },
            room: Room::empty(),
            majors: MajorsState::default(),
            rules: RulesState::default(),
            card_orientations: HashMap::new(),
            minor_deck: vec![],
            major_deck: vec![],
            last_room_was_flee: false,
            pending_prompt: None,
            pending_resolution: None,
            pending_continuation: None,
            debug: PromptUiSidecar::default(),
        }
    }

    #[test]
    fn hash_is_64_char_lowercase_hex() {
        let state = sample_state();
        let h = hash_state(&state);
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn hash_is_deterministic_for_equal_states() {
        let a = sample_state();
        let b = sample_state();
        assert_eq!(hash_state(&a), hash_state(&b));
    }

    #[test]
    fn hash_ignores_debug_sidecar_contents() {
        let mut a = sample_state();
        let mut b = sample_state();
        b.debug = PromptUiSidecar {
            prompt_label_key: Some("some_label".into()),
            option_label_keys: vec!["opt_a".into()],
        };
        a.debug = PromptUiSidecar::default();
        assert_eq!(hash_state(&a), hash_state(&b));
    }

    #[test]
    fn hash_changes_when_gameplay_field_changes() {
        let a = sample_state();
        let mut b = sample_state();
        b.player.hp -= 1;
        assert_ne!(hash_state(&a), hash_state(&b));
    }
}
