//! Stateless rules helpers that sit between the card model and the
//! reducer: weapon usability, armor application, the Fate gain rule,
//! and the per-room healing limiter.

use fg_types::card::{effective_orientation, enemy_value, identity_from_id};
use fg_types::enums::{Orientation, WeaponRestrictionMode};
use fg_types::event::Event;
use fg_types::ids::CardId;
use fg_types::state::{RulesState, RunState, Weapon};

/// The orientation `slot`'s card resolves/evaluates at right now, given
/// the current boss mode and any pending cleanse on the slot.
pub fn slot_effective_orientation(state: &RunState, slot: usize) -> Option<Orientation> {
    let card_id = state.room.slots[slot].as_ref()?;
    let identity = identity_from_id(card_id)?;
    Some(effective_orientation(
        state.orientation_of(card_id),
        identity.rank,
        state.floor.boss_mode,
        state.room.pending_cleanses[slot],
    ))
}

/// Whether resolving the card in `slot` at its current effective
/// orientation would grant Fate (reversed grants, cleansed-to-upright
/// does not).
pub fn resolution_grants_fate(state: &RunState, slot: usize) -> bool {
    slot_effective_orientation(state, slot) == Some(Orientation::Reversed)
}

/// `can_use_weapon`: cheat flags override, otherwise first use is
/// always legal, then the active restriction mode governs repeat use
/// against the last enemy value the weapon helped defeat.
pub fn can_use_weapon_with_mode(
    player_cheat_next: bool,
    cheat_this_room: bool,
    weapon: &Weapon,
    enemy: u32,
    mode: WeaponRestrictionMode,
) -> bool {
    if player_cheat_next || cheat_this_room {
        return true;
    }
    match weapon.last_helped_defeat_value {
        None => true,
        Some(last) => match mode {
            WeaponRestrictionMode::Strict => enemy < last,
            WeaponRestrictionMode::Default => enemy <= last,
        },
    }
}

/// Applies armor reduction to incoming damage. Returns the reduced
/// damage and, if the armor was consumed, the discarded card id plus
/// the discard event. Reversed-cups damage bypasses armor entirely and
/// must be applied with `apply_damage_bypassing_armor` instead.
pub fn apply_damage_with_armor(
    armor: &Option<fg_types::state::Armor>,
    incoming: u32,
) -> (u32, Option<CardId>) {
    match armor {
        Some(a) if a.value > 0 => {
            let reduced = incoming.saturating_sub(a.value);
            (reduced, Some(a.card_id.clone()))
        }
        _ => (incoming, None),
    }
}

/// Per-room healing limiter: a no-op once `healing_used_this_room` is
/// set or `amount` is non-positive. Otherwise raises hp by
/// `min(amount, max_hp - hp)` and latches the room flag if that delta
/// was positive. Applies uniformly to every healing source.
pub fn apply_heal(state: &mut RunState, amount: i64) -> Vec<Event> {
    let mut events = Vec::new();
    if state.room.healing_used_this_room || amount <= 0 {
        return events;
    }
    let headroom = state.player.max_hp.saturating_sub(state.player.hp);
    let delta = (amount as u32).min(headroom);
    if delta > 0 {
        state.player.hp += delta;
        state.room.healing_used_this_room = true;
        events.push(Event::PlayerHpChanged {
            delta: delta as i32,
            hp: state.player.hp,
        });
    }
    events
}

/// Applies damage, clamping hp at zero, and emits the change event.
pub fn apply_damage(state: &mut RunState, amount: u32) -> Vec<Event> {
    let mut events = Vec::new();
    if amount == 0 {
        return events;
    }
    let before = state.player.hp;
    state.player.hp = state.player.hp.saturating_sub(amount);
    let delta = before as i64 - state.player.hp as i64;
    if delta != 0 {
        events.push(Event::PlayerHpChanged {
            delta: -(delta as i32),
            hp: state.player.hp,
        });
    }
    events
}

/// Grants Fate, clamped at `run_config.fate_cap`, and emits the change
/// event if the value actually moved.
pub fn grant_fate(state: &mut RunState, amount: u32) -> Vec<Event> {
    let mut events = Vec::new();
    if amount == 0 {
        return events;
    }
    let before = state.player.fate;
    state.player.fate = (state.player.fate + amount).min(state.run_config.fate_cap);
    let delta = state.player.fate as i64 - before as i64;
    if delta != 0 {
        events.push(Event::PlayerFateChanged {
            delta: delta as i32,
            fate: state.player.fate,
        });
    }
    events
}

/// Spends Fate; caller must have already checked `player.fate >= amount`.
pub fn spend_fate(state: &mut RunState, amount: u32) -> Vec<Event> {
    let mut events = Vec::new();
    if amount == 0 {
        return events;
    }
    let before = state.player.fate;
    state.player.fate = state.player.fate.saturating_sub(amount);
    events.push(Event::PlayerFateChanged {
        delta: state.player.fate as i32 - before as i32,
        fate: state.player.fate,
    });
    events
}

pub fn gain_gold(state: &mut RunState, amount: u32) -> Vec<Event> {
    let mut events = Vec::new();
    if amount == 0 {
        return events;
    }
    let before = state.player.gold;
    state.player.gold = (state.player.gold + amount).min(fg_types::state::MAX_GOLD);
    let delta = state.player.gold as i64 - before as i64;
    if delta != 0 {
        events.push(Event::PlayerGoldChanged {
            delta: delta as i32,
            gold: state.player.gold,
        });
    }
    events
}

pub fn spend_gold(state: &mut RunState, amount: u32) -> Vec<Event> {
    let mut events = Vec::new();
    if amount == 0 {
        return events;
    }
    let before = state.player.gold;
    state.player.gold = state.player.gold.saturating_sub(amount);
    events.push(Event::PlayerGoldChanged {
        delta: state.player.gold as i32 - before as i32,
        gold: state.player.gold,
    });
    events
}

pub fn enemy_value_for_slot(state: &RunState, slot: usize) -> Option<u32> {
    let card_id = state.room.slots[slot].as_ref()?;
    let identity = identity_from_id(card_id)?;
    let effective = slot_effective_orientation(state, slot)?;
    enemy_value(identity.rank, effective)
}

pub fn active_rules(state: &RunState) -> &RulesState {
    &state.rules
}

/// Unresolved occupied slots eligible for `COMMIT_RESOLVE` right now,
/// filtered by the active order constraint.
pub fn allowed_commit_slots(state: &RunState) -> Vec<usize> {
    let candidates: Vec<usize> = state.room.unresolved_occupied_slots().collect();
    if candidates.is_empty() {
        return candidates;
    }
    use fg_types::enums::OrderConstraintKind;
    match state.rules.order_constraint.kind {
        OrderConstraintKind::None => candidates,
        OrderConstraintKind::LeftToRight => vec![*candidates.iter().min().unwrap()],
        OrderConstraintKind::RightToLeft => vec![*candidates.iter().max().unwrap()],
        OrderConstraintKind::SuitOrder => {
            // Ties on suit lock order are forced to the lower-index slot,
            // not offered as a choice.
            let min_order = candidates
                .iter()
                .filter_map(|&s| slot_suit_lock_order(state, s))
                .min();
            match min_order {
                Some(min_order) => candidates
                    .into_iter()
                    .find(|&s| slot_suit_lock_order(state, s) == Some(min_order))
                    .into_iter()
                    .collect(),
                None => candidates,
            }
        }
        OrderConstraintKind::AscOrderingValue => {
            // Ties on ordering value are forced to the lower-index slot,
            // not offered as a choice.
            let min_val = candidates.iter().map(|&s| slot_ordering_value(state, s)).min();
            match min_val {
                Some(min_val) => candidates
                    .into_iter()
                    .find(|&s| slot_ordering_value(state, s) == min_val)
                    .into_iter()
                    .collect(),
                None => candidates,
            }
        }
    }
}

fn slot_suit_lock_order(state: &RunState, slot: usize) -> Option<u8> {
    let card_id = state.room.slots[slot].as_ref()?;
    let identity = identity_from_id(card_id)?;
    Some(identity.suit.lock_order())
}

pub fn slot_ordering_value(state: &RunState, slot: usize) -> u32 {
    let Some(card_id) = &state.room.slots[slot] else {
        return 0;
    };
    let Some(identity) = identity_from_id(card_id) else {
        return 0;
    };
    let effective = slot_effective_orientation(state, slot).unwrap_or(Orientation::Upright);
    fg_types::card::ordering_value(identity.rank, effective)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fg_types::state::Armor;

    #[test]
    fn apply_heal_latches_once_per_room() {
        let mut state = crate::setup::test_state_fixture();
        state.player.hp = 10;
        state.player.max_hp = 20;
        let events = apply_heal(&mut state, 2);
        assert_eq!(state.player.hp, 12);
        assert_eq!(events.len(), 1);
        let events2 = apply_heal(&mut state, 2);
        assert_eq!(state.player.hp, 12);
        assert!(events2.is_empty());
    }

    #[test]
    fn apply_heal_clamps_to_max_hp() {
        let mut state = crate::setup::test_state_fixture();
        state.player.hp = 19;
        state.player.max_hp = 20;
        apply_heal(&mut state, 5);
        assert_eq!(state.player.hp, 20);
    }

    #[test]
    fn damage_reduced_by_armor() {
        let armor = Some(Armor {
            card_id: "swords_2".into(),
            value: 3,
        });
        let (reduced, discarded) = apply_damage_with_armor(&armor, 5);
        assert_eq!(reduced, 2);
        assert!(discarded.is_some());
    }

    #[test]
    fn can_use_weapon_default_mode_allows_equal_value() {
        let weapon = fg_types::state::Weapon {
            card_id: "swords_5".into(),
            value: 5,
            last_helped_defeat_value: Some(13),
            tucked_enemy_ids: vec![],
        };
        assert!(can_use_weapon_with_mode(
            false,
            false,
            &weapon,
            13,
            WeaponRestrictionMode::Default
        ));
        assert!(!can_use_weapon_with_mode(
            false,
            false,
            &weapon,
            14,
            WeaponRestrictionMode::Default
        ));
    }

    #[test]
    fn can_use_weapon_strict_mode_requires_strictly_less() {
        let weapon = fg_types::state::Weapon {
            card_id: "swords_5".into(),
            value: 5,
            last_helped_defeat_value: Some(13),
            tucked_enemy_ids: vec![],
        };
        assert!(!can_use_weapon_with_mode(
            false,
            false,
            &weapon,
            13,
            WeaponRestrictionMode::Strict
        ));
        assert!(can_use_weapon_with_mode(
            false,
            false,
            &weapon,
            12,
            WeaponRestrictionMode::Strict
        ));
    }

    #[test]
    fn grant_fate_clamps_at_cap() {
        let mut state = crate::setup::test_state_fixture();
        state.player.fate = 9;
        grant_fate(&mut state, 5);
        assert_eq!(state.player.fate, 10);
    }
}
