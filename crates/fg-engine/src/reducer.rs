//! `apply_action`: the full phase state machine. Every automatic
//! ("bullet") transition described for a phase happens inline, inside
//! the same call that triggers it — a caller never needs to submit a
//! no-op action just to let the engine advance.

use std::collections::HashSet;

use fg_types::action::{Action, AceChoice};
use fg_types::card::{enemy_value, identity_from_id};
use fg_types::enums::{EquipmentKind, Orientation, Phase, Rank, ShadowTrigger, Suit};
use fg_types::error::{EngineError, FatalDiagnostics};
use fg_types::event::Event;
use fg_types::ids::CardId;
use fg_types::content::LoadedContent;
use fg_types::pending::{AceSuitPrompt, CupsHighChoice, MajorTargetOp, PendingContinuation, PendingPrompt};
use fg_types::state::{Armor, DisabledFateAction, Room, RunState, Spell, Weapon, MAX_ATTUNED};

use crate::{majors, rules, setup};

/// Applies one action to `state`, returning the resulting state and
/// the events produced. `state` is never mutated in place; the caller
/// keeps its own copy valid for replay or rollback.
pub fn apply_action(
    content: &LoadedContent,
    state: &RunState,
    action: Action,
) -> Result<(RunState, Vec<Event>), EngineError> {
    let mut next = state.clone();
    let mut events = Vec::new();

    match &action {
        Action::MajorChoiceSelect { .. }
        | Action::MajorBargainSelect { .. }
        | Action::ReorderTop3Confirm { .. }
        | Action::ReorderRoom4Confirm { .. }
        | Action::SelectTargetConfirm { .. } => resolve_major_prompt(content, &mut next, action, &mut events)?,
        _ => match next.phase {
            Phase::FloorStart => handle_floor_start(content, &mut next, action, &mut events)?,
            Phase::RoomChoice => handle_room_choice(content, &mut next, action, &mut events)?,
            Phase::EngageSetup => handle_engage_setup(&mut next, action)?,
            Phase::PreResolveWindow => handle_pre_resolve_window(content, &mut next, action, &mut events)?,
            Phase::ResolveExecute => handle_resolve_execute(content, &mut next, action, &mut events)?,
            _ => return Err(illegal("no actions are legal in the current phase")),
        },
    }

    Ok((next, events))
}

fn illegal(reason: impl Into<String>) -> EngineError {
    EngineError::IllegalAction { reason: reason.into() }
}

fn deck_exhausted(state: &RunState, content: &LoadedContent) -> EngineError {
    EngineError::DeckExhausted {
        diagnostics: FatalDiagnostics::new(Some(content.content_version), Some(state.seed), None),
    }
}

// ---------------------------------------------------------------
// Automatic transitions shared by several phase handlers.
// ---------------------------------------------------------------

fn apply_major_shadow_if_trigger(
    content: &LoadedContent,
    state: &mut RunState,
    trigger: ShadowTrigger,
    events: &mut Vec<Event>,
) -> Result<(), EngineError> {
    let major_id = state.floor.active_major_id.clone();
    let Some(def) = content.major(&major_id) else {
        return Ok(());
    };
    if def.shadow.trigger != trigger {
        return Ok(());
    }
    let effect = def.shadow.effect.clone();
    match majors::evaluate(state, &major_id, &effect)? {
        majors::EvalOutcome::Done(ev) => events.extend(ev),
        majors::EvalOutcome::Parked(ev) => events.extend(ev),
    }
    Ok(())
}

/// Fills empty slots from the active deck, emits `ROOM_REVEALED`,
/// applies the `ROOM_REVEALED` shadow hook, then lands in `RoomChoice`.
fn fill_room_and_reveal(content: &LoadedContent, state: &mut RunState, events: &mut Vec<Event>) -> Result<(), EngineError> {
    for slot in 0..4 {
        if state.room.slots[slot].is_none() {
            let card = majors::draw_one(state)?;
            state.room.slots[slot] = Some(card);
        }
    }
    events.push(Event::RoomRevealed { slots: state.room.slots.clone() });
    apply_major_shadow_if_trigger(content, state, ShadowTrigger::RoomRevealed, events)?;
    state.phase = Phase::RoomChoice;
    Ok(())
}

// ---------------------------------------------------------------
// FloorStart
// ---------------------------------------------------------------

fn handle_floor_start(
    content: &LoadedContent,
    state: &mut RunState,
    action: Action,
    events: &mut Vec<Event>,
) -> Result<(), EngineError> {
    let Action::SelectAttunement { majors: chosen } = action else {
        return Err(illegal("only SELECT_ATTUNEMENT is legal in FloorStart"));
    };
    validate_attunement_subset(state, &chosen)?;
    state.majors.attuned = chosen;
    state.majors.spent_this_floor.clear();

    apply_major_shadow_if_trigger(content, state, ShadowTrigger::FloorStart, events)?;
    apply_major_shadow_if_trigger(content, state, ShadowTrigger::OrderConstraint, events)?;

    fill_room_and_reveal(content, state, events)
}

fn validate_attunement_subset(state: &RunState, chosen: &[fg_types::ids::MajorId]) -> Result<(), EngineError> {
    if chosen.len() > MAX_ATTUNED {
        return Err(illegal("attunement selection exceeds the 3-member cap"));
    }
    let mut seen = HashSet::new();
    for major_id in chosen {
        if !state.majors.claimed.contains(major_id) {
            return Err(illegal(format!("{major_id} has not been claimed")));
        }
        if !seen.insert(major_id.clone()) {
            return Err(illegal(format!("{major_id} selected more than once")));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------
// RoomChoice
// ---------------------------------------------------------------

fn handle_room_choice(
    content: &LoadedContent,
    state: &mut RunState,
    action: Action,
    events: &mut Vec<Event>,
) -> Result<(), EngineError> {
    match action {
        Action::ChooseEngage => {
            state.last_room_was_flee = false;
            state.phase = Phase::EngageSetup;
            if !state.rules.order_constraint.requires_choose_carried_first {
                state.phase = Phase::PreResolveWindow;
            }
            Ok(())
        }
        Action::ChooseFlee => {
            if state.last_room_was_flee {
                return Err(illegal("cannot flee twice in a row"));
            }
            for slot in 0..4 {
                if let Some(id) = state.room.slots[slot].take() {
                    events.push(Event::CardBottomed { card_id: id.clone() });
                    state.active_deck_mut().push(id);
                }
            }
            state.room = Room::empty();
            state.last_room_was_flee = true;
            fill_room_and_reveal(content, state, events)
        }
        _ => Err(illegal("only CHOOSE_ENGAGE or CHOOSE_FLEE are legal in RoomChoice")),
    }
}

// ---------------------------------------------------------------
// EngageSetup
// ---------------------------------------------------------------

fn handle_engage_setup(state: &mut RunState, action: Action) -> Result<(), EngineError> {
    let Action::SelectCarriedCard { slot } = action else {
        return Err(illegal("only SELECT_CARRIED_CARD is legal in EngageSetup"));
    };
    if !state.rules.order_constraint.requires_choose_carried_first {
        return Err(illegal("no carry choice is required this floor"));
    }
    if state.room.slots[slot].is_none() {
        return Err(illegal("slot is empty"));
    }
    state.room.carry_choice_index = Some(slot);
    state.phase = Phase::PreResolveWindow;
    Ok(())
}

// ---------------------------------------------------------------
// PreResolveWindow
// ---------------------------------------------------------------

fn handle_pre_resolve_window(
    content: &LoadedContent,
    state: &mut RunState,
    action: Action,
    events: &mut Vec<Event>,
) -> Result<(), EngineError> {
    match action {
        Action::UseLeapOfFaith { slot } => {
            if state.room.leap_used {
                return Err(illegal("leap of faith already used this room"));
            }
            let card_id = state.room.slots[slot].clone().ok_or_else(|| illegal("slot is empty"))?;
            let flipped = state.orientation_of(&card_id).flip();
            state.card_orientations.insert(card_id, flipped);
            state.room.leap_used = true;
            if flipped == Orientation::Reversed {
                events.extend(rules::grant_fate(state, 2));
            } else {
                apply_damage_through_armor(state, 2, events);
            }
            Ok(())
        }
        Action::SpendFateReroll { slot } => {
            require_fate_action_enabled(state, DisabledFateAction::Reroll)?;
            spend_fate_checked(state, 1)?;
            let ev = majors::apply_target_op(state, MajorTargetOp::Reroll, slot)?;
            events.extend(ev);
            Ok(())
        }
        Action::SpendFateCleanse { slot } => {
            require_fate_action_enabled(state, DisabledFateAction::Cleanse)?;
            if rules::slot_effective_orientation(state, slot) != Some(Orientation::Reversed) {
                return Err(illegal("target is not effectively reversed"));
            }
            spend_fate_checked(state, 1)?;
            let ev = majors::apply_target_op(state, MajorTargetOp::Cleanse, slot)?;
            events.extend(ev);
            Ok(())
        }
        Action::SpendFateExileReplace { slot } => {
            spend_fate_checked(state, 2)?;
            let ev = majors::apply_target_op(state, MajorTargetOp::ExileReplace, slot)?;
            events.extend(ev);
            Ok(())
        }
        Action::SpendFateCheatWeapon => {
            spend_fate_checked(state, 2)?;
            state.player.cheat_weapon_next_enemy_fight = true;
            Ok(())
        }
        Action::UseSpellCleanse { slot } => {
            if rules::slot_effective_orientation(state, slot) != Some(Orientation::Reversed) {
                return Err(illegal("target is not effectively reversed"));
            }
            discard_spell(state, events)?;
            let ev = majors::apply_target_op(state, MajorTargetOp::Cleanse, slot)?;
            events.extend(ev);
            Ok(())
        }
        Action::UseSpellReroll { slot } => {
            discard_spell(state, events)?;
            let ev = majors::apply_target_op(state, MajorTargetOp::Reroll, slot)?;
            events.extend(ev);
            Ok(())
        }
        Action::UseMajorGift { major_id } => {
            if !state.majors.attuned.contains(&major_id) {
                return Err(illegal(format!("{major_id} is not attuned")));
            }
            if state.majors.spent_this_floor.contains(&major_id) {
                return Err(illegal(format!("{major_id}'s gift is already spent this floor")));
            }
            let def = content
                .major(&major_id)
                .ok_or_else(|| illegal(format!("unknown major {major_id}")))?;
            let effect = def.gift.effect.clone();
            state.majors.spent_this_floor.push(major_id.clone());
            match majors::evaluate(state, &major_id, &effect)? {
                majors::EvalOutcome::Done(ev) => events.extend(ev),
                majors::EvalOutcome::Parked(ev) => events.extend(ev),
            }
            Ok(())
        }
        Action::CommitResolve { slot } => handle_commit_resolve(content, state, slot, events),
        _ => Err(illegal("action not legal in the pre-resolve window")),
    }
}

fn require_fate_action_enabled(state: &RunState, action: DisabledFateAction) -> Result<(), EngineError> {
    if state.room.disabled_fate_actions_this_room.contains(&action) {
        Err(illegal("that fate action is disabled this room"))
    } else {
        Ok(())
    }
}

fn spend_fate_checked(state: &mut RunState, amount: u32) -> Result<(), EngineError> {
    if state.player.fate < amount {
        return Err(illegal("not enough fate"));
    }
    rules::spend_fate(state, amount);
    Ok(())
}

fn discard_spell(state: &mut RunState, events: &mut Vec<Event>) -> Result<(), EngineError> {
    let spell = state.player.spell.take().ok_or_else(|| illegal("no spell prepared"))?;
    events.push(Event::DiscardEquipment {
        kind: EquipmentKind::Spell,
        card_id: spell.card_id.clone(),
    });
    state.floor.floor_discard.push(spell.card_id);
    Ok(())
}

fn handle_commit_resolve(
    content: &LoadedContent,
    state: &mut RunState,
    slot: usize,
    events: &mut Vec<Event>,
) -> Result<(), EngineError> {
    let allowed = rules::allowed_commit_slots(state);
    if !allowed.contains(&slot) {
        return Err(illegal("slot is not committable under the active order constraint"));
    }

    if hanged_man_hook_applies(content, state) {
        let exiled = state.room.slots[slot].take();
        if let Some(id) = exiled {
            events.push(Event::CardExiled { card_id: id.clone() });
            state.floor.floor_discard.push(id);
        }
        let replacement = majors::draw_one(state)?;
        state.room.slots[slot] = Some(replacement);
        state.room.hanged_man_triggered_this_room = true;
        return Ok(());
    }

    let card_id = state.room.slots[slot].clone().ok_or_else(|| illegal("slot is empty"))?;
    state.pending_resolution = Some(fg_types::state::PendingResolution { slot, card_id: card_id.clone() });
    state.phase = Phase::ResolveExecute;
    attempt_no_choice_resolution(content, state, slot, &card_id, events)
}

fn hanged_man_hook_applies(content: &LoadedContent, state: &RunState) -> bool {
    if state.room.hanged_man_triggered_this_room {
        return false;
    }
    if state.room.resolved_mask.iter().any(|&r| r) {
        return false;
    }
    let Some(def) = content.major(&state.floor.active_major_id) else {
        return false;
    };
    def.shadow.trigger == ShadowTrigger::BeforeFirstResolveAttempt
        && matches!(def.shadow.effect, fg_types::effect::EffectNode::ForcedExileFirstResolveAttempt)
}

// ---------------------------------------------------------------
// ResolveExecute: immediate resolution + the prompts it can park
// ---------------------------------------------------------------

fn apply_damage_through_armor(state: &mut RunState, amount: u32, events: &mut Vec<Event>) {
    let (reduced, discarded) = rules::apply_damage_with_armor(&state.player.armor, amount);
    if let Some(card_id) = discarded {
        state.player.armor = None;
        events.push(Event::DiscardEquipment { kind: EquipmentKind::Armor, card_id });
    }
    events.extend(rules::apply_damage(state, reduced));
}

fn attempt_no_choice_resolution(
    content: &LoadedContent,
    state: &mut RunState,
    slot: usize,
    card_id: &CardId,
    events: &mut Vec<Event>,
) -> Result<(), EngineError> {
    let identity = identity_from_id(card_id).ok_or_else(|| illegal("unresolvable card id"))?;
    let effective = rules::slot_effective_orientation(state, slot).unwrap_or(Orientation::Upright);

    match (identity.suit, identity.rank) {
        (Suit::Pentacles, Rank::Number(v)) => {
            let v = v as u32;
            if effective == Orientation::Upright {
                events.extend(rules::gain_gold(state, v));
            } else {
                let lose = v.min(state.player.gold);
                events.extend(rules::spend_gold(state, lose));
                apply_damage_through_armor(state, v - lose, events);
            }
            finalize_resolution(content, state, slot, card_id.clone(), true, events)
        }
        (Suit::Cups, Rank::Number(v)) => {
            let v = v as u32;
            if effective == Orientation::Upright && v >= 8 {
                state.pending_prompt = Some(PendingPrompt::CupsHighChoice { slot, value: v });
                Ok(())
            } else if effective == Orientation::Upright {
                events.extend(rules::apply_heal(state, v as i64));
                finalize_resolution(content, state, slot, card_id.clone(), true, events)
            } else {
                events.extend(rules::apply_damage(state, v));
                finalize_resolution(content, state, slot, card_id.clone(), true, events)
            }
        }
        (Suit::Wands, Rank::Number(v)) => {
            let v = v as u32;
            if effective == Orientation::Upright {
                if let Some(old) = state.player.spell.take() {
                    events.push(Event::DiscardEquipment { kind: EquipmentKind::Spell, card_id: old.card_id.clone() });
                    state.floor.floor_discard.push(old.card_id);
                }
                state.player.spell = Some(Spell { card_id: card_id.clone(), value: v });
                events.push(Event::EquipSpell { card_id: card_id.clone(), value: v });
                finalize_resolution(content, state, slot, card_id.clone(), false, events)
            } else if let Some(spell) = state.player.spell.take() {
                events.push(Event::DiscardEquipment { kind: EquipmentKind::Spell, card_id: spell.card_id.clone() });
                state.floor.floor_discard.push(spell.card_id);
                finalize_resolution(content, state, slot, card_id.clone(), true, events)
            } else {
                apply_damage_through_armor(state, 2, events);
                finalize_resolution(content, state, slot, card_id.clone(), true, events)
            }
        }
        (Suit::Swords, Rank::Number(v)) => {
            let v = v as u32;
            if effective == Orientation::Upright {
                if let Some(old) = state.player.weapon.take() {
                    events.push(Event::DiscardEquipment { kind: EquipmentKind::Weapon, card_id: old.card_id.clone() });
                    state.floor.floor_discard.push(old.card_id);
                }
                state.player.weapon = Some(Weapon {
                    card_id: card_id.clone(),
                    value: v,
                    last_helped_defeat_value: None,
                    tucked_enemy_ids: Vec::new(),
                });
                events.push(Event::EquipWeapon { card_id: card_id.clone(), value: v });
                finalize_resolution(content, state, slot, card_id.clone(), false, events)
            } else if state.player.weapon.is_some() {
                state.pending_prompt = Some(PendingPrompt::SwordsAmbushBlock { slot, value: v });
                Ok(())
            } else {
                apply_damage_through_armor(state, v, events);
                finalize_resolution(content, state, slot, card_id.clone(), true, events)
            }
        }
        (suit, Rank::Ace) => {
            let suit_prompt = match suit {
                Suit::Pentacles => AceSuitPrompt::Pentacles,
                Suit::Cups => AceSuitPrompt::Cups,
                Suit::Wands => AceSuitPrompt::Wands,
                Suit::Swords => AceSuitPrompt::Swords,
            };
            state.pending_prompt = Some(PendingPrompt::AceResolution { slot, suit_prompt });
            Ok(())
        }
        (_, rank) if rank.is_court() => {
            let value = enemy_value(rank, effective).expect("court rank always has an enemy value");
            let can_fight = state
                .player
                .weapon
                .as_ref()
                .map(|w| {
                    rules::can_use_weapon_with_mode(
                        state.player.cheat_weapon_next_enemy_fight,
                        state.player.cheat_weapon_this_room,
                        w,
                        value,
                        state.rules.weapon_restriction_mode,
                    )
                })
                .unwrap_or(false);
            if can_fight {
                state.pending_prompt = Some(PendingPrompt::EnemyFightChoice { slot, enemy_value: value });
                Ok(())
            } else {
                apply_damage_through_armor(state, value, events);
                finalize_resolution(content, state, slot, card_id.clone(), true, events)
            }
        }
        _ => Err(illegal("card has no defined resolution")),
    }
}

fn handle_resolve_execute(
    content: &LoadedContent,
    state: &mut RunState,
    action: Action,
    events: &mut Vec<Event>,
) -> Result<(), EngineError> {
    let pending = state.pending_resolution.clone().ok_or_else(|| illegal("no resolution is pending"))?;

    match (action, state.pending_prompt.clone()) {
        (Action::ResolveAceChoice { choice }, Some(PendingPrompt::AceResolution { slot, suit_prompt })) => {
            apply_ace_choice(state, slot, suit_prompt, choice, events)?;
            state.pending_prompt = None;
            finalize_resolution(content, state, pending.slot, pending.card_id, true, events)
        }
        (Action::ResolveCupsHighChoice { choice }, Some(PendingPrompt::CupsHighChoice { value, .. })) => {
            match choice {
                CupsHighChoice::Heal => {
                    events.extend(rules::apply_heal(state, value as i64));
                    state.pending_prompt = None;
                    finalize_resolution(content, state, pending.slot, pending.card_id, true, events)
                }
                CupsHighChoice::EquipArmor => {
                    if let Some(old) = state.player.armor.take() {
                        events.push(Event::DiscardEquipment { kind: EquipmentKind::Armor, card_id: old.card_id.clone() });
                        state.floor.floor_discard.push(old.card_id);
                    }
                    state.player.armor = Some(Armor { card_id: pending.card_id.clone(), value });
                    events.push(Event::EquipArmor { card_id: pending.card_id.clone(), value });
                    state.pending_prompt = None;
                    finalize_resolution(content, state, pending.slot, pending.card_id, false, events)
                }
            }
        }
        (Action::ResolveSwordsAmbush { block }, Some(PendingPrompt::SwordsAmbushBlock { value, .. })) => {
            let weapon_value = state.player.weapon.as_ref().map(|w| w.value).unwrap_or(0);
            let damage = if block { value.saturating_sub(weapon_value) } else { value };
            apply_damage_through_armor(state, damage, events);
            state.pending_prompt = None;
            finalize_resolution(content, state, pending.slot, pending.card_id, true, events)
        }
        (Action::ResolveEnemyFight { use_weapon }, Some(PendingPrompt::EnemyFightChoice { enemy_value: value, .. })) => {
            if use_weapon {
                let weapon_value = state
                    .player
                    .weapon
                    .as_ref()
                    .ok_or_else(|| illegal("no weapon prepared"))?
                    .value;
                let damage = value.saturating_sub(weapon_value);
                apply_damage_through_armor(state, damage, events);
                if let Some(w) = state.player.weapon.as_mut() {
                    w.last_helped_defeat_value = Some(value);
                    w.tucked_enemy_ids.push(pending.card_id.clone());
                }
                state.player.cheat_weapon_next_enemy_fight = false;
                state.player.cheat_weapon_this_room = false;
            } else {
                apply_damage_through_armor(state, value, events);
            }
            state.pending_prompt = None;
            finalize_resolution(content, state, pending.slot, pending.card_id, true, events)
        }
        (_, Some(expected)) => Err(EngineError::PromptMismatch {
            expected: format!("{expected:?}"),
            got: "a non-matching resolution action".to_string(),
            diagnostics: FatalDiagnostics::new(Some(content.content_version), Some(state.seed), None),
        }),
        (_, None) => Err(illegal("no prompt is pending")),
    }
}

fn apply_ace_choice(
    state: &mut RunState,
    ace_slot: usize,
    suit_prompt: AceSuitPrompt,
    choice: AceChoice,
    events: &mut Vec<Event>,
) -> Result<(), EngineError> {
    match (suit_prompt, choice) {
        (AceSuitPrompt::Pentacles, AceChoice::PentaclesPayHeal) => {
            if state.player.gold < 5 {
                return Err(illegal("not enough gold"));
            }
            events.extend(rules::spend_gold(state, 5));
            events.extend(rules::apply_heal(state, 5));
            Ok(())
        }
        (AceSuitPrompt::Pentacles, AceChoice::PentaclesGainTake) => {
            events.extend(rules::gain_gold(state, 5));
            apply_damage_through_armor(state, 3, events);
            Ok(())
        }
        (AceSuitPrompt::Cups, AceChoice::CupsHealToFull) => {
            let headroom = state.player.max_hp.saturating_sub(state.player.hp) as i64;
            events.extend(rules::apply_heal(state, headroom));
            Ok(())
        }
        (AceSuitPrompt::Cups, AceChoice::CupsCleanseFree { slot }) => {
            if slot == ace_slot || rules::slot_effective_orientation(state, slot) != Some(Orientation::Reversed) {
                return Err(illegal("invalid cleanse target"));
            }
            events.extend(majors::apply_target_op(state, MajorTargetOp::Cleanse, slot)?);
            Ok(())
        }
        (AceSuitPrompt::Wands, AceChoice::WandsExileReplaceFree { slot }) => {
            if slot == ace_slot {
                return Err(illegal("cannot target the ace's own slot"));
            }
            events.extend(majors::apply_target_op(state, MajorTargetOp::ExileReplace, slot)?);
            Ok(())
        }
        (AceSuitPrompt::Wands, AceChoice::WandsRerollFree { slot }) => {
            if slot == ace_slot {
                return Err(illegal("cannot target the ace's own slot"));
            }
            events.extend(majors::apply_target_op(state, MajorTargetOp::Reroll, slot)?);
            Ok(())
        }
        (AceSuitPrompt::Swords, AceChoice::SwordsCheatWeaponFree) => {
            state.player.cheat_weapon_this_room = true;
            Ok(())
        }
        (AceSuitPrompt::Swords, AceChoice::SwordsRerollFree { slot }) => {
            if slot == ace_slot {
                return Err(illegal("cannot target the ace's own slot"));
            }
            events.extend(majors::apply_target_op(state, MajorTargetOp::Reroll, slot)?);
            Ok(())
        }
        _ => Err(illegal("ace choice does not match the open suit prompt")),
    }
}

/// Completion of a resolution: marks the slot resolved, clears it,
/// grants Fate if the effective orientation was reversed, checks for
/// defeat, applies the `AFTER_FIRST_RESOLUTION` hook on the first
/// resolution of the room, and either advances to `RoomEnd` handling
/// or returns to the pre-resolve window for the remaining slot.
fn finalize_resolution(
    content: &LoadedContent,
    state: &mut RunState,
    slot: usize,
    card_id: CardId,
    send_to_discard: bool,
    events: &mut Vec<Event>,
) -> Result<(), EngineError> {
    let grants_fate = rules::resolution_grants_fate(state, slot);
    state.room.resolved_mask[slot] = true;
    state.room.pending_cleanses[slot] = false;
    state.room.slots[slot] = None;
    if send_to_discard {
        state.floor.floor_discard.push(card_id.clone());
    }
    events.push(Event::CardResolved { card_id, slot_index: slot });
    if grants_fate {
        events.extend(rules::grant_fate(state, 1));
    }
    state.pending_resolution = None;
    state.pending_prompt = None;

    if state.player.hp == 0 {
        state.phase = Phase::RunDefeat;
        return Ok(());
    }

    let resolved_count = state.room.resolved_mask.iter().filter(|&&r| r).count();
    if resolved_count == 1 {
        apply_major_shadow_if_trigger(content, state, ShadowTrigger::AfterFirstResolution, events)?;
        if state.pending_prompt.is_some() {
            // The shadow parked a Major prompt; the tail below can't
            // run until the player resolves it. `resolve_major_prompt`
            // picks this continuation back up once `pending_prompt`
            // clears.
            state.pending_continuation = Some(PendingContinuation::AfterFirstResolution);
            return Ok(());
        }
    }

    room_continuation_tail(content, state, events)
}

/// The post-first-resolution tail shared by `finalize_resolution`'s
/// immediate path and `resolve_major_prompt`'s deferred continuation:
/// ends the room if it's now fully resolved, otherwise hands control
/// back to the pre-resolve window.
fn room_continuation_tail(content: &LoadedContent, state: &mut RunState, events: &mut Vec<Event>) -> Result<(), EngineError> {
    let resolved_count = state.room.resolved_mask.iter().filter(|&&r| r).count();
    if resolved_count >= 3 {
        room_end(content, state, events)
    } else {
        state.phase = Phase::PreResolveWindow;
        Ok(())
    }
}

// ---------------------------------------------------------------
// Room and floor completion
// ---------------------------------------------------------------

fn room_end(content: &LoadedContent, state: &mut RunState, events: &mut Vec<Event>) -> Result<(), EngineError> {
    if state.floor.boss_mode {
        state.floor.boss_rooms_completed += 1;
    } else {
        state.floor.engaged_rooms_completed += 1;
    }

    if !state.floor.boss_mode && state.floor.engaged_rooms_completed >= 6 {
        let mut boss_deck = state.floor.floor_discard.clone();
        state.rng.shuffle(&mut boss_deck);
        state.floor.boss_deck = Some(boss_deck);
        state.floor.boss_mode = true;
        state.floor.boss_rooms_required = setup::boss_rooms_required_for_floor(state.floor.floor_number);
    }

    if state.floor.boss_mode && state.floor.boss_rooms_completed >= state.floor.boss_rooms_required {
        let major_id = state.floor.active_major_id.clone();
        if !state.majors.claimed.contains(&major_id) {
            state.majors.claimed.push(major_id.clone());
        }
        if state.majors.claimed.len() as u32 >= state.run_config.run_length_target.as_u32() {
            state.phase = Phase::RunVictory;
            return Ok(());
        }
        if state.major_deck.is_empty() {
            return Err(deck_exhausted(state, content));
        }
        state.floor.floor_number += 1;
        state.floor.active_major_id = state.major_deck.remove(0);
        state.phase = Phase::FloorStart;
        setup::enter_floor_start(state);
        return Ok(());
    }

    let carried_id = state
        .room
        .unresolved_occupied_slots()
        .next()
        .and_then(|i| state.room.slots[i].clone());
    let mut new_room = Room::empty();
    if let Some(id) = carried_id {
        new_room.slots[0] = Some(id);
        new_room.carried_index = Some(0);
    }
    state.room = new_room;
    fill_room_and_reveal(content, state, events)
}

// ---------------------------------------------------------------
// Major-prompt resumption (phase-independent)
// ---------------------------------------------------------------

fn resolve_major_prompt(
    content: &LoadedContent,
    state: &mut RunState,
    action: Action,
    events: &mut Vec<Event>,
) -> Result<(), EngineError> {
    resolve_major_prompt_action(content, state, action, events)?;

    if state.pending_prompt.is_none() {
        if let Some(PendingContinuation::AfterFirstResolution) = state.pending_continuation.take() {
            room_continuation_tail(content, state, events)?;
        }
    }
    Ok(())
}

fn resolve_major_prompt_action(
    content: &LoadedContent,
    state: &mut RunState,
    action: Action,
    events: &mut Vec<Event>,
) -> Result<(), EngineError> {
    match (action, state.pending_prompt.clone()) {
        (Action::MajorChoiceSelect { option_index }, Some(PendingPrompt::MajorChoice { major_id, option_count })) => {
            if option_index >= option_count {
                return Err(illegal("option index out of range"));
            }
            let options = crate::legal_actions::major_prompts::find_choice_options(content, &major_id)
                .ok_or_else(|| illegal("no CHOICE node found for this major"))?;
            let effect = (*options[option_index].effect).clone();
            state.pending_prompt = None;
            match majors::evaluate(state, &major_id, &effect)? {
                majors::EvalOutcome::Done(ev) => events.extend(ev),
                majors::EvalOutcome::Parked(ev) => events.extend(ev),
            }
            Ok(())
        }
        (Action::MajorBargainSelect { option_index }, Some(PendingPrompt::MajorBargain { major_id, option_count })) => {
            if option_index >= option_count {
                return Err(illegal("option index out of range"));
            }
            let options = crate::legal_actions::major_prompts::find_bargain_options(content, &major_id)
                .ok_or_else(|| illegal("no BARGAIN node found for this major"))?;
            let option = options[option_index].clone();
            if let Some(pay) = option.pay_gold {
                if state.player.gold < pay {
                    return Err(illegal("not enough gold for this bargain option"));
                }
                events.extend(rules::spend_gold(state, pay));
            }
            if let Some(damage) = option.take_damage {
                apply_damage_through_armor(state, damage, events);
            }
            if let Some(heal) = option.heal {
                events.extend(rules::apply_heal(state, heal as i64));
            }
            if let Some(gold) = option.gain_gold {
                events.extend(rules::gain_gold(state, gold));
            }
            state.pending_prompt = None;
            Ok(())
        }
        (Action::ReorderTop3Confirm { order }, Some(PendingPrompt::ReorderTop3 { card_count, .. })) => {
            if order.len() != card_count || !is_permutation(&order, card_count) {
                return Err(illegal("order is not a permutation of the peeked cards"));
            }
            reorder_top_of_deck(state, &order);
            state.pending_prompt = None;
            Ok(())
        }
        (Action::ReorderRoom4Confirm { order }, Some(PendingPrompt::ReorderRoom4 { .. })) => {
            if !is_permutation(&order, 4) {
                return Err(illegal("order is not a permutation of the four room slots"));
            }
            majors::apply_room_permutation(state, order);
            state.pending_prompt = None;
            Ok(())
        }
        (
            Action::SelectTargetConfirm { slot },
            Some(PendingPrompt::SelectTarget { op, candidate_slots, .. }),
        ) => {
            if !candidate_slots.contains(&slot) {
                return Err(illegal("slot is not a legal target"));
            }
            let ev = majors::apply_target_op(state, op, slot)?;
            events.extend(ev);
            state.pending_prompt = None;
            Ok(())
        }
        (_, Some(expected)) => Err(EngineError::PromptMismatch {
            expected: format!("{expected:?}"),
            got: "a non-matching major-prompt action".to_string(),
            diagnostics: FatalDiagnostics::new(Some(content.content_version), Some(state.seed), None),
        }),
        (_, None) => Err(illegal("no major prompt is pending")),
    }
}

fn is_permutation(order: &[usize], n: usize) -> bool {
    if order.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &i in order {
        if i >= n || seen[i] {
            return false;
        }
        seen[i] = true;
    }
    true
}

fn reorder_top_of_deck(state: &mut RunState, order: &[usize]) {
    let deck = state.active_deck_mut();
    let n = order.len();
    if deck.len() < n {
        return;
    }
    let top: Vec<CardId> = deck.drain(0..n).collect();
    let reordered: Vec<CardId> = order.iter().map(|&i| top[i].clone()).collect();
    for (i, card) in reordered.into_iter().enumerate() {
        deck.insert(i, card);
    }
}
