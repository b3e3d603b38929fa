//! The Majors interpreter: walks an effect-primitive tree and either
//! completes it immediately or parks a pending prompt for the player
//! to resolve with a follow-up action. Shadows and gifts are never
//! hand-coded per Major id — every id authors the same closed set of
//! primitives and this module is the only place that knows what they
//! mean.

use fg_types::card::identity_from_id;
use fg_types::effect::{EffectNode, Predicate, Selector};
use fg_types::enums::{ChariotDirection, EffectScope, Orientation};
use fg_types::error::EngineError;
use fg_types::event::Event;
use fg_types::ids::{CardId, MajorId};
use fg_types::pending::{MajorTargetOp, PendingPrompt};
use fg_types::state::{DisabledFateAction, RunState};

use crate::rules;

/// Result of evaluating one node: either it ran to completion, or it
/// needs a player decision and parked a prompt on `state`.
pub enum EvalOutcome {
    Done(Vec<Event>),
    /// Parked with whatever events the tree emitted before the
    /// decision point (e.g. the `PEEK_TOP_N` event fires even though
    /// the reorder it offers is still pending).
    Parked(Vec<Event>),
}

/// Evaluates `node` as the effect of `major_id`, mutating `state` for
/// every sub-effect that can complete without a decision. If any node
/// parks a prompt, evaluation stops there — effects sequenced after a
/// parking node in the same tree resume only implicitly, by being
/// authored as their own shadow/gift rather than chained after a
/// decision (this engine does not suspend and resume a partially-
/// walked tree across actions; content should author at most one
/// decision-requiring primitive per shadow/gift).
pub fn evaluate(state: &mut RunState, major_id: &MajorId, node: &EffectNode) -> Result<EvalOutcome, EngineError> {
    match node {
        EffectNode::Noop | EffectNode::ForcedExileFirstResolveAttempt => Ok(EvalOutcome::Done(vec![])),
        EffectNode::Sequence { effects } => {
            let mut all_events = Vec::new();
            for effect in effects {
                match evaluate(state, major_id, effect)? {
                    EvalOutcome::Done(events) => all_events.extend(events),
                    EvalOutcome::Parked(events) => {
                        all_events.extend(events);
                        return Ok(EvalOutcome::Parked(all_events));
                    }
                }
            }
            Ok(EvalOutcome::Done(all_events))
        }
        EffectNode::Choice { options, .. } => {
            state.pending_prompt = Some(PendingPrompt::MajorChoice {
                major_id: major_id.clone(),
                option_count: options.len(),
            });
            Ok(EvalOutcome::Parked(vec![]))
        }
        EffectNode::Conditional {
            if_predicate,
            then_effect,
            else_effect,
        } => {
            let branch = if evaluate_predicate(state, if_predicate) {
                then_effect
            } else {
                else_effect
            };
            evaluate(state, major_id, branch)
        }
        EffectNode::RerollRevealed { selector } => {
            resolve_and_act(state, major_id, *selector, MajorTargetOp::Reroll, false)
        }
        EffectNode::ExileReplaceRevealed { selector } => {
            resolve_and_act(state, major_id, *selector, MajorTargetOp::ExileReplace, false)
        }
        EffectNode::CleanseRevealed { selector } => {
            resolve_and_act(state, major_id, *selector, MajorTargetOp::Cleanse, true)
        }
        EffectNode::PeekTopN { n, can_reorder } => {
            let ids: Vec<CardId> = state.active_deck().iter().take(*n as usize).cloned().collect();
            let events = vec![Event::PeekTopN {
                n: *n,
                card_ids: ids.clone(),
            }];
            if *can_reorder && !ids.is_empty() {
                state.pending_prompt = Some(PendingPrompt::ReorderTop3 {
                    major_id: major_id.clone(),
                    card_count: ids.len(),
                });
                return Ok(EvalOutcome::Parked(events));
            }
            Ok(EvalOutcome::Done(events))
        }
        EffectNode::ReorderTopN { n } => {
            let card_count = state.active_deck().len().min(*n as usize);
            if card_count == 0 {
                return Ok(EvalOutcome::Done(vec![]));
            }
            state.pending_prompt = Some(PendingPrompt::ReorderTop3 {
                major_id: major_id.clone(),
                card_count,
            });
            Ok(EvalOutcome::Parked(vec![]))
        }
        EffectNode::ReorderRoomByValue => {
            reorder_room_by_value(state);
            Ok(EvalOutcome::Done(vec![]))
        }
        EffectNode::ReorderRoomArbitrary => {
            state.pending_prompt = Some(PendingPrompt::ReorderRoom4 {
                major_id: major_id.clone(),
            });
            Ok(EvalOutcome::Parked(vec![]))
        }
        EffectNode::Bargain { options, .. } => {
            state.pending_prompt = Some(PendingPrompt::MajorBargain {
                major_id: major_id.clone(),
                option_count: options.len(),
            });
            Ok(EvalOutcome::Parked(vec![]))
        }
        EffectNode::DisableFateAction { fate_action, scope } => {
            if *scope == EffectScope::ThisRoom {
                let disabled = match fate_action {
                    fg_types::enums::FateAction::Cleanse => DisabledFateAction::Cleanse,
                    fg_types::enums::FateAction::Reroll => DisabledFateAction::Reroll,
                };
                if !state.room.disabled_fate_actions_this_room.contains(&disabled) {
                    state.room.disabled_fate_actions_this_room.push(disabled);
                }
            }
            Ok(EvalOutcome::Done(vec![]))
        }
        EffectNode::SetWeaponRestrictionMode { mode, scope } => {
            if *scope == EffectScope::ThisFloor {
                state.rules.weapon_restriction_mode = *mode;
            }
            Ok(EvalOutcome::Done(vec![]))
        }
        EffectNode::SetOrderConstraint {
            order_constraint,
            requires_choose_carried_first,
            scope,
        } => {
            if *scope == EffectScope::ThisFloor {
                state.rules.order_constraint = fg_types::state::OrderConstraint {
                    kind: *order_constraint,
                    requires_choose_carried_first: *requires_choose_carried_first,
                    scope_major_id: Some(major_id.clone()),
                };
            }
            Ok(EvalOutcome::Done(vec![]))
        }
        EffectNode::SetFloorParam {
            param_key,
            param_value,
            scope,
        } => {
            if *scope == EffectScope::ThisFloor {
                apply_floor_param(state, param_key, param_value);
            }
            Ok(EvalOutcome::Done(vec![]))
        }
    }
}

fn apply_floor_param(state: &mut RunState, key: &str, value: &str) {
    match key {
        "cheatWeapon" => state.player.cheat_weapon_next_enemy_fight = true,
        "chariotDirection" => {
            state.floor.params.chariot_direction = match value {
                "LEFT_TO_RIGHT" => Some(ChariotDirection::LeftToRight),
                "RIGHT_TO_LEFT" => Some(ChariotDirection::RightToLeft),
                _ => None,
            };
        }
        _ => log::warn!("unrecognized floor param '{key}' ignored at resolution time"),
    }
}

fn evaluate_predicate(state: &RunState, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::RoomHasEnemy => state.room.occupied_slots().any(|s| is_enemy_slot(state, s)),
        Predicate::RoomHasAnyEffectiveReversed => state
            .room
            .occupied_slots()
            .any(|s| rules::slot_effective_orientation(state, s) == Some(Orientation::Reversed)),
        Predicate::PlayerGoldAtLeast { value } => state.player.gold >= *value,
    }
}

fn is_enemy_slot(state: &RunState, slot: usize) -> bool {
    state.room.slots[slot]
        .as_ref()
        .and_then(identity_from_id)
        .map(|identity| identity.rank.is_court())
        .unwrap_or(false)
}

enum SelectorResolution {
    NoCandidates,
    Slot(usize),
    NeedsChoice(Vec<usize>),
}

fn resolve_selector(state: &mut RunState, selector: Selector, cleanse_only: bool) -> SelectorResolution {
    let mut candidates: Vec<usize> = state.room.occupied_slots().collect();
    if cleanse_only {
        candidates.retain(|&s| rules::slot_effective_orientation(state, s) == Some(Orientation::Reversed));
    }
    if candidates.is_empty() {
        return SelectorResolution::NoCandidates;
    }
    match selector {
        Selector::PlayerChoice => SelectorResolution::NeedsChoice(candidates),
        Selector::Random => {
            let idx = state.rng.random_index(candidates.len()).unwrap_or(0);
            SelectorResolution::Slot(candidates[idx])
        }
        Selector::Leftmost => SelectorResolution::Slot(candidates[0]),
        Selector::HighestValue => {
            let values: Vec<(usize, u32)> = candidates
                .iter()
                .map(|&s| (s, rules::slot_ordering_value(state, s)))
                .collect();
            let max_val = values.iter().map(|(_, v)| *v).max().unwrap_or(0);
            let tied: Vec<usize> = values
                .iter()
                .filter(|(_, v)| *v == max_val)
                .map(|(s, _)| *s)
                .collect();
            if tied.len() == 1 {
                SelectorResolution::Slot(tied[0])
            } else {
                SelectorResolution::NeedsChoice(tied)
            }
        }
        Selector::IfEnemyPresentPlayerChoice => {
            let enemy_slots: Vec<usize> = candidates.into_iter().filter(|&s| is_enemy_slot(state, s)).collect();
            if enemy_slots.is_empty() {
                SelectorResolution::NoCandidates
            } else {
                SelectorResolution::NeedsChoice(enemy_slots)
            }
        }
        Selector::IfAnyReversedPlayerChoice => {
            let reversed_slots: Vec<usize> = candidates
                .into_iter()
                .filter(|&s| rules::slot_effective_orientation(state, s) == Some(Orientation::Reversed))
                .collect();
            if reversed_slots.is_empty() {
                SelectorResolution::NoCandidates
            } else {
                SelectorResolution::NeedsChoice(reversed_slots)
            }
        }
    }
}

fn resolve_and_act(
    state: &mut RunState,
    major_id: &MajorId,
    selector: Selector,
    op: MajorTargetOp,
    cleanse_only: bool,
) -> Result<EvalOutcome, EngineError> {
    match resolve_selector(state, selector, cleanse_only) {
        SelectorResolution::NoCandidates => Ok(EvalOutcome::Done(vec![])),
        SelectorResolution::Slot(slot) => {
            let events = apply_target_op(state, op, slot)?;
            Ok(EvalOutcome::Done(events))
        }
        SelectorResolution::NeedsChoice(candidate_slots) => {
            state.pending_prompt = Some(PendingPrompt::SelectTarget {
                major_id: major_id.clone(),
                op,
                candidate_slots,
            });
            Ok(EvalOutcome::Parked(vec![]))
        }
    }
}

/// Applies a resolved `MajorTargetOp` to `slot`, called both for
/// selectors that resolve automatically and for the reducer's
/// `SelectTargetConfirm` handler once the player names a slot.
pub fn apply_target_op(state: &mut RunState, op: MajorTargetOp, slot: usize) -> Result<Vec<Event>, EngineError> {
    match op {
        MajorTargetOp::Reroll => reroll_slot(state, slot),
        MajorTargetOp::ExileReplace => exile_replace_slot(state, slot),
        MajorTargetOp::Cleanse => {
            state.room.pending_cleanses[slot] = true;
            Ok(vec![])
        }
    }
}

fn reroll_slot(state: &mut RunState, slot: usize) -> Result<Vec<Event>, EngineError> {
    let mut events = Vec::new();
    if let Some(old_id) = state.room.slots[slot].take() {
        events.push(Event::CardBottomed { card_id: old_id.clone() });
        state.active_deck_mut().push(old_id);
    }
    state.room.pending_cleanses[slot] = false;
    state.room.slots[slot] = Some(draw_one(state)?);
    Ok(events)
}

fn exile_replace_slot(state: &mut RunState, slot: usize) -> Result<Vec<Event>, EngineError> {
    let mut events = Vec::new();
    if let Some(old_id) = state.room.slots[slot].take() {
        events.push(Event::CardExiled { card_id: old_id.clone() });
        state.floor.floor_discard.push(old_id);
    }
    state.room.pending_cleanses[slot] = false;
    state.room.slots[slot] = Some(draw_one(state)?);
    Ok(events)
}

/// Draws from the front of the active deck. A fatal `DeckExhausted` if
/// the deck is empty — content and floor bookkeeping must keep this
/// from ever actually happening.
pub fn draw_one(state: &mut RunState) -> Result<CardId, EngineError> {
    let seed = state.seed;
    let deck = state.active_deck_mut();
    if deck.is_empty() {
        return Err(EngineError::DeckExhausted {
            diagnostics: fg_types::error::FatalDiagnostics::new(None, Some(seed), None),
        });
    }
    Ok(deck.remove(0))
}

/// `REORDER_ROOM_BY_VALUE`: reorders the room's parallel arrays by
/// ascending ordering value (ties by original index), remapping
/// `carried_index`/`carry_choice_index` by the cards they referred to.
pub fn reorder_room_by_value(state: &mut RunState) {
    let carried_id = state.room.carried_index.and_then(|i| state.room.slots[i].clone());
    let carry_choice_id = state
        .room
        .carry_choice_index
        .and_then(|i| state.room.slots[i].clone());

    let mut order: Vec<usize> = (0..4).collect();
    order.sort_by_key(|&i| (rules::slot_ordering_value(state, i), i));

    let old_slots = state.room.slots.clone();
    let old_resolved = state.room.resolved_mask;
    let old_cleanses = state.room.pending_cleanses;

    for (new_index, &old_index) in order.iter().enumerate() {
        state.room.slots[new_index] = old_slots[old_index].clone();
        state.room.resolved_mask[new_index] = old_resolved[old_index];
        state.room.pending_cleanses[new_index] = old_cleanses[old_index];
    }

    state.room.carried_index = carried_id.and_then(|id| state.room.slots.iter().position(|s| s.as_ref() == Some(&id)));
    state.room.carry_choice_index =
        carry_choice_id.and_then(|id| state.room.slots.iter().position(|s| s.as_ref() == Some(&id)));
}

/// Applies a confirmed room-wide permutation (`REORDER_ROOM_ARBITRARY`
/// resolution), with the same id-based remapping as the by-value form.
pub fn apply_room_permutation(state: &mut RunState, order: [usize; 4]) {
    let carried_id = state.room.carried_index.and_then(|i| state.room.slots[i].clone());
    let carry_choice_id = state
        .room
        .carry_choice_index
        .and_then(|i| state.room.slots[i].clone());

    let old_slots = state.room.slots.clone();
    let old_resolved = state.room.resolved_mask;
    let old_cleanses = state.room.pending_cleanses;

    for (new_index, &old_index) in order.iter().enumerate() {
        state.room.slots[new_index] = old_slots[old_index].clone();
        state.room.resolved_mask[new_index] = old_resolved[old_index];
        state.room.pending_cleanses[new_index] = old_cleanses[old_index];
    }

    state.room.carried_index = carried_id.and_then(|id| state.room.slots.iter().position(|s| s.as_ref() == Some(&id)));
    state.room.carry_choice_index =
        carry_choice_id.and_then(|id| state.room.slots.iter().position(|s| s.as_ref() == Some(&id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::test_state_fixture;

    #[test]
    fn disable_fate_action_this_floor_scope_is_ignored() {
        let mut state = test_state_fixture();
        let node = EffectNode::DisableFateAction {
            fate_action: fg_types::enums::FateAction::Cleanse,
            scope: EffectScope::ThisFloor,
        };
        let major_id: MajorId = "the_devil".into();
        evaluate(&mut state, &major_id, &node).unwrap();
        assert!(state.room.disabled_fate_actions_this_room.is_empty());
    }

    #[test]
    fn disable_fate_action_this_room_scope_latches() {
        let mut state = test_state_fixture();
        let node = EffectNode::DisableFateAction {
            fate_action: fg_types::enums::FateAction::Cleanse,
            scope: EffectScope::ThisRoom,
        };
        let major_id: MajorId = "the_devil".into();
        evaluate(&mut state, &major_id, &node).unwrap();
        assert_eq!(state.room.disabled_fate_actions_this_room.len(), 1);
        evaluate(&mut state, &major_id, &node).unwrap();
        assert_eq!(state.room.disabled_fate_actions_this_room.len(), 1);
    }

    #[test]
    fn reroll_revealed_with_no_candidates_is_noop() {
        let mut state = test_state_fixture();
        let node = EffectNode::RerollRevealed {
            selector: Selector::Leftmost,
        };
        let major_id: MajorId = "the_magician".into();
        let outcome = evaluate(&mut state, &major_id, &node).unwrap();
        assert!(matches!(outcome, EvalOutcome::Done(events) if events.is_empty()));
    }

    #[test]
    fn choice_parks_major_choice_prompt() {
        let mut state = test_state_fixture();
        let node = EffectNode::Choice {
            prompt_key: "p".into(),
            options: vec![
                fg_types::effect::ChoiceOption {
                    label_key: "a".into(),
                    effect: Box::new(EffectNode::Noop),
                },
                fg_types::effect::ChoiceOption {
                    label_key: "b".into(),
                    effect: Box::new(EffectNode::Noop),
                },
            ],
        };
        let major_id: MajorId = "the_lovers".into();
        let outcome = evaluate(&mut state, &major_id, &node).unwrap();
        assert!(matches!(outcome, EvalOutcome::Parked(_)));
        assert!(matches!(
            state.pending_prompt,
            Some(PendingPrompt::MajorChoice { option_count: 2, .. })
        ));
    }
}
