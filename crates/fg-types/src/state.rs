//! `RunState`: the complete, hashable (modulo the UI sidecar) snapshot
//! of a single run. Constructed by `create_run`, advanced only by
//! `apply_action`, never mutated in place by callers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::enums::{
    ChariotDirection, OrderConstraintKind, Orientation, Phase, RunLengthTarget,
    WeaponRestrictionMode,
};
use crate::ids::{CardId, MajorId};
use crate::pending::{PendingContinuation, PendingPrompt, PromptUiSidecar};
use crate::rng::RngState;

pub const FATE_CAP: u32 = 10;
pub const MAX_GOLD: u32 = 9999;
pub const ROOM_SLOTS: usize = 4;
pub const MAX_ATTUNED: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub card_id: CardId,
    pub value: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_helped_defeat_value: Option<u32>,
    #[serde(default)]
    pub tucked_enemy_ids: Vec<CardId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Armor {
    pub card_id: CardId,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    pub card_id: CardId,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub hp: u32,
    pub max_hp: u32,
    pub gold: u32,
    pub fate: u32,
    pub weapon: Option<Weapon>,
    pub armor: Option<Armor>,
    pub spell: Option<Spell>,
    pub cheat_weapon_next_enemy_fight: bool,
    pub cheat_weapon_this_room: bool,
}

impl Player {
    pub fn new(max_hp: u32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            gold: 0,
            fate: 0,
            weapon: None,
            armor: None,
            spell: None,
            cheat_weapon_next_enemy_fight: false,
            cheat_weapon_this_room: false,
        }
    }

    /// Ids of the three equipment slots, if occupied. Used by set-
    /// conservation invariants and by floor-start deck rebuilding.
    pub fn equipped_ids(&self) -> Vec<CardId> {
        let mut ids = Vec::with_capacity(3);
        if let Some(w) = &self.weapon {
            ids.push(w.card_id.clone());
        }
        if let Some(a) = &self.armor {
            ids.push(a.card_id.clone());
        }
        if let Some(s) = &self.spell {
            ids.push(s.card_id.clone());
        }
        ids
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FloorParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chariot_direction: Option<ChariotDirection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Floor {
    pub floor_number: u32,
    pub active_major_id: MajorId,
    pub engaged_rooms_completed: u32,
    pub floor_discard: Vec<CardId>,
    pub boss_mode: bool,
    pub boss_rooms_required: u32,
    pub boss_rooms_completed: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boss_deck: Option<Vec<CardId>>,
    pub params: FloorParams,
}

/// Fate-action kinds suppressed for the remainder of the current room,
/// set by `DISABLE_FATE_ACTION` shadows/gifts scoped `THIS_ROOM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisabledFateAction {
    Cleanse,
    Reroll,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub slots: [Option<CardId>; ROOM_SLOTS],
    pub resolved_mask: [bool; ROOM_SLOTS],
    pub pending_cleanses: [bool; ROOM_SLOTS],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carried_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carry_choice_index: Option<usize>,
    pub leap_used: bool,
    pub healing_used_this_room: bool,
    pub hanged_man_triggered_this_room: bool,
    pub disabled_fate_actions_this_room: Vec<DisabledFateAction>,
}

impl Room {
    pub fn empty() -> Self {
        Self {
            slots: [None, None, None, None],
            resolved_mask: [false; ROOM_SLOTS],
            pending_cleanses: [false; ROOM_SLOTS],
            carried_index: None,
            carry_choice_index: None,
            leap_used: false,
            healing_used_this_room: false,
            hanged_man_triggered_this_room: false,
            disabled_fate_actions_this_room: Vec::new(),
        }
    }

    pub fn occupied_slots(&self) -> impl Iterator<Item = usize> + '_ {
        (0..ROOM_SLOTS).filter(move |&i| self.slots[i].is_some())
    }

    pub fn unresolved_occupied_slots(&self) -> impl Iterator<Item = usize> + '_ {
        (0..ROOM_SLOTS).filter(move |&i| self.slots[i].is_some() && !self.resolved_mask[i])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MajorsState {
    pub claimed: Vec<MajorId>,
    pub attuned: Vec<MajorId>,
    pub spent_this_floor: Vec<MajorId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConstraint {
    pub kind: OrderConstraintKind,
    pub requires_choose_carried_first: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_major_id: Option<MajorId>,
}

impl Default for OrderConstraint {
    fn default() -> Self {
        Self {
            kind: OrderConstraintKind::None,
            requires_choose_carried_first: false,
            scope_major_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesState {
    pub weapon_restriction_mode: WeaponRestrictionMode,
    pub order_constraint: OrderConstraint,
}

impl Default for RulesState {
    fn default() -> Self {
        Self {
            weapon_restriction_mode: WeaponRestrictionMode::Default,
            order_constraint: OrderConstraint::default(),
        }
    }
}

/// A committed slot awaiting no-choice-or-prompted resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingResolution {
    pub slot: usize,
    pub card_id: CardId,
}

/// Tunables a host may vary per run without recompiling the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub run_length_target: RunLengthTarget,
    pub fate_cap: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            run_length_target: RunLengthTarget::Seven,
            fate_cap: FATE_CAP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    pub seed: u32,
    pub run_config: RunConfig,
    pub rng: RngState,
    pub phase: Phase,
    pub player: Player,
    pub floor: Floor,
    pub room: Room,
    pub majors: MajorsState,
    pub rules: RulesState,
    /// Physical orientation of every one of the 56 minor cards, keyed
    /// by id. Mutated only by `USE_LEAP_OF_FAITH`.
    pub card_orientations: HashMap<CardId, Orientation>,
    pub minor_deck: Vec<CardId>,
    pub major_deck: Vec<MajorId>,
    pub last_room_was_flee: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_prompt: Option<PendingPrompt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_resolution: Option<PendingResolution>,
    /// Set when a shadow or gift effect parks a Major prompt from a
    /// context whose own phase transition must wait for that prompt to
    /// clear. Consumed (and cleared) the moment `pending_prompt` next
    /// becomes `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_continuation: Option<PendingContinuation>,
    /// UI-only sidecar; excluded from `hash_state`.
    #[serde(default)]
    pub debug: PromptUiSidecar,
}

impl RunState {
    pub fn active_deck(&self) -> &[CardId] {
        if self.floor.boss_mode {
            self.floor
                .boss_deck
                .as_deref()
                .unwrap_or(&[])
        } else {
            &self.minor_deck
        }
    }

    pub fn active_deck_mut(&mut self) -> &mut Vec<CardId> {
        if self.floor.boss_mode {
            self.floor.boss_deck.get_or_insert_with(Vec::new)
        } else {
            &mut self.minor_deck
        }
    }

    pub fn orientation_of(&self, id: &CardId) -> Orientation {
        self.card_orientations
            .get(id)
            .copied()
            .unwrap_or(Orientation::Upright)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_new_starts_at_full_hp_and_zero_resources() {
        let p = Player::new(20);
        assert_eq!(p.hp, 20);
        assert_eq!(p.max_hp, 20);
        assert_eq!(p.gold, 0);
        assert_eq!(p.fate, 0);
    }

    #[test]
    fn room_empty_has_no_occupied_slots() {
        let room = Room::empty();
        assert_eq!(room.occupied_slots().count(), 0);
    }

    #[test]
    fn order_constraint_default_is_none_kind() {
        let oc = OrderConstraint::default();
        assert_eq!(oc.kind, OrderConstraintKind::None);
        assert!(!oc.requires_choose_carried_first);
    }
}
