//! `create_run`: builds the initial `RunState` from a seed and a run
//! configuration, deterministically, by drawing every card orientation
//! and deck shuffle from the embedded RNG in the fixed order the
//! parity contract requires.

use std::collections::HashMap;

use fg_types::card::full_registry;
use fg_types::content::LoadedContent;
use fg_types::enums::{Orientation, Phase, RunLengthTarget};
use fg_types::pending::PromptUiSidecar;
use fg_types::rng::RngState;
use fg_types::state::{
    Floor, FloorParams, MajorsState, Player, Room, RulesState, RunConfig, RunState,
};

/// Starting hit points for a fresh run. Not part of the content
/// bundle: a property of the engine's own default, the way the
/// teacher's scenario setup fixes a starting hero HP before content
/// ever gets consulted.
pub const DEFAULT_STARTING_MAX_HP: u32 = 20;

/// Boss-room count required to defeat a floor's Major, by floor number:
/// floors 1-7 need 2, 8-14 need 3, 15+ need 4.
pub fn boss_rooms_required_for_floor(floor_number: u32) -> u32 {
    match floor_number {
        1..=7 => 2,
        8..=14 => 3,
        _ => 4,
    }
}

/// Builds the initial `RunState`. `content` must already be loaded;
/// its Majors are shuffled once into `major_deck` and the first is
/// popped as floor 1's active Major.
pub fn create_run(content: &LoadedContent, seed: u32, run_length_target: RunLengthTarget) -> RunState {
    let mut rng = RngState::new(seed);

    let mut card_orientations = HashMap::with_capacity(56);
    for identity in full_registry() {
        let id = identity.id();
        let orientation = if rng.next_u32() % 2 == 0 {
            Orientation::Upright
        } else {
            Orientation::Reversed
        };
        card_orientations.insert(id, orientation);
    }

    let mut major_deck: Vec<_> = content.major_ids_in_order().to_vec();
    rng.shuffle(&mut major_deck);
    let active_major_id = major_deck.remove(0);

    let mut minor_deck: Vec<_> = full_registry().into_iter().map(|c| c.id()).collect();
    rng.shuffle(&mut minor_deck);

    RunState {
        seed,
        run_config: RunConfig {
            run_length_target,
            fate_cap: fg_types::state::FATE_CAP,
        },
        rng,
        phase: Phase::FloorStart,
        player: Player::new(DEFAULT_STARTING_MAX_HP),
        floor: Floor {
            floor_number: 1,
            active_major_id,
            engaged_rooms_completed: 0,
            floor_discard: Vec::new(),
            boss_mode: false,
            boss_rooms_required: boss_rooms_required_for_floor(1),
            boss_rooms_completed: 0,
            boss_deck: None,
            params: FloorParams::default(),
        },
        room: Room::empty(),
        majors: MajorsState::default(),
        rules: RulesState::default(),
        card_orientations,
        minor_deck,
        major_deck,
        last_room_was_flee: false,
        pending_prompt: None,
        pending_resolution: None,
        pending_continuation: None,
        debug: PromptUiSidecar::default(),
    }
}

/// Rebuilds `minor_deck` at floor start from the full registry minus
/// currently equipped ids, then shuffles it. Also resets every other
/// per-floor field the reducer's `FloorStart` entry touches.
pub fn enter_floor_start(state: &mut RunState) {
    let equipped: std::collections::HashSet<_> = state.player.equipped_ids().into_iter().collect();
    let mut minor_deck: Vec<_> = full_registry()
        .into_iter()
        .map(|c| c.id())
        .filter(|id| !equipped.contains(id))
        .collect();
    state.rng.shuffle(&mut minor_deck);
    state.minor_deck = minor_deck;
    state.floor.floor_discard.clear();
    state.floor.boss_deck = None;
    state.floor.boss_mode = false;
    state.floor.engaged_rooms_completed = 0;
    state.floor.boss_rooms_completed = 0;
    state.floor.boss_rooms_required = boss_rooms_required_for_floor(state.floor.floor_number);
    state.floor.params = FloorParams::default();
    state.rules = RulesState::default();
    state.room = Room::empty();
    state.last_room_was_flee = false;
}

#[cfg(test)]
pub(crate) fn test_state_fixture() -> RunState {
    use fg_types::state::RunConfig;

    RunState {
        seed: 1,
        run_config: RunConfig::default(),
        rng: RngState::new(1),
        phase: Phase::FloorStart,
        player: Player::new(DEFAULT_STARTING_MAX_HP),
        floor: Floor {
            floor_number: 1,
            active_major_id: "the_fool".into(),
            engaged_rooms_completed: 0,
            floor_discard: Vec::new(),
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
        minor_deck: Vec::new(),
        major_deck: Vec::new(),
        last_room_was_flee: false,
        pending_prompt: None,
        pending_resolution: None,
        pending_continuation: None,
        debug: PromptUiSidecar::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fg_content::default_bundle;
    use fg_content::loader::load_content;

    #[test]
    fn create_run_assigns_all_56_orientations() {
        let content = load_content(default_bundle()).unwrap();
        let state = create_run(&content, 1, RunLengthTarget::Seven);
        assert_eq!(state.card_orientations.len(), 56);
        assert_eq!(state.minor_deck.len(), 56);
    }

    #[test]
    fn create_run_is_deterministic_for_same_seed() {
        let content = load_content(default_bundle()).unwrap();
        let a = create_run(&content, 42, RunLengthTarget::Seven);
        let b = create_run(&content, 42, RunLengthTarget::Seven);
        assert_eq!(fg_types::hash::hash_state(&a), fg_types::hash::hash_state(&b));
    }

    #[test]
    fn create_run_pops_first_shuffled_major_as_active() {
        let content = load_content(default_bundle()).unwrap();
        let state = create_run(&content, 1, RunLengthTarget::Seven);
        assert_eq!(state.major_deck.len(), 20);
        assert!(content.major(&state.floor.active_major_id).is_some());
    }

    #[test]
    fn boss_rooms_required_thresholds() {
        assert_eq!(boss_rooms_required_for_floor(1), 2);
        assert_eq!(boss_rooms_required_for_floor(7), 2);
        assert_eq!(boss_rooms_required_for_floor(8), 3);
        assert_eq!(boss_rooms_required_for_floor(14), 3);
        assert_eq!(boss_rooms_required_for_floor(15), 4);
    }
}
