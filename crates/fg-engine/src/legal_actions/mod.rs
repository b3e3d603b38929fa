//! Deterministic enumeration of every action legal in the current
//! state. The action log replay and save-parity contracts both assume
//! `legal_actions` is a pure function of `(content, state)` with a
//! fixed ordering — never randomized, never dependent on RNG draws.

pub(crate) mod major_prompts;
mod pre_resolve;
mod resolve_execute;

use fg_types::action::Action;
use fg_types::content::LoadedContent;
use fg_types::enums::Phase;
use fg_types::ids::MajorId;
use fg_types::pending::PendingPrompt;
use fg_types::state::{RunState, MAX_ATTUNED};

pub fn legal_actions(content: &LoadedContent, state: &RunState) -> Vec<Action> {
    if let Some(prompt) = &state.pending_prompt {
        return match prompt {
            PendingPrompt::MajorChoice { .. }
            | PendingPrompt::MajorBargain { .. }
            | PendingPrompt::ReorderTop3 { .. }
            | PendingPrompt::ReorderRoom4 { .. }
            | PendingPrompt::SelectTarget { .. } => major_prompts::legal_actions_for_prompt(content, state, prompt),
            _ => resolve_execute::legal_actions_resolve_execute(state, prompt),
        };
    }

    match state.phase {
        Phase::FloorStart => floor_start_actions(state),
        Phase::RoomChoice => room_choice_actions(state),
        Phase::EngageSetup => engage_setup_actions(state),
        Phase::PreResolveWindow => pre_resolve::legal_actions_pre_resolve(content, state),
        _ => Vec::new(),
    }
}

fn floor_start_actions(state: &RunState) -> Vec<Action> {
    attunement_subsets(&state.majors.claimed)
        .into_iter()
        .map(|majors| Action::SelectAttunement { majors })
        .collect()
}

/// Locked subset enumeration order: the empty set, then singletons in
/// `claimed` order, then pairs and triples in lexicographic index
/// order, capped at `MAX_ATTUNED` members.
fn attunement_subsets(claimed: &[MajorId]) -> Vec<Vec<MajorId>> {
    let n = claimed.len();
    let mut subsets = vec![Vec::new()];
    for i in 0..n {
        subsets.push(vec![claimed[i].clone()]);
    }
    if MAX_ATTUNED >= 2 {
        for i in 0..n {
            for j in (i + 1)..n {
                subsets.push(vec![claimed[i].clone(), claimed[j].clone()]);
            }
        }
    }
    if MAX_ATTUNED >= 3 {
        for i in 0..n {
            for j in (i + 1)..n {
                for k in (j + 1)..n {
                    subsets.push(vec![claimed[i].clone(), claimed[j].clone(), claimed[k].clone()]);
                }
            }
        }
    }
    subsets
}

fn room_choice_actions(state: &RunState) -> Vec<Action> {
    let mut out = vec![Action::ChooseEngage];
    if !state.last_room_was_flee {
        out.push(Action::ChooseFlee);
    }
    out
}

fn engage_setup_actions(state: &RunState) -> Vec<Action> {
    if !state.rules.order_constraint.requires_choose_carried_first {
        return Vec::new();
    }
    state
        .room
        .occupied_slots()
        .map(|slot| Action::SelectCarriedCard { slot })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attunement_subsets_includes_empty_set_first() {
        let claimed: Vec<MajorId> = vec!["the_fool".into(), "the_magician".into()];
        let subsets = attunement_subsets(&claimed);
        assert_eq!(subsets[0], Vec::<MajorId>::new());
    }

    #[test]
    fn attunement_subsets_caps_at_three_members() {
        let claimed: Vec<MajorId> = (0..5).map(|i| format!("major_{i}").into()).collect();
        let subsets = attunement_subsets(&claimed);
        assert!(subsets.iter().all(|s| s.len() <= MAX_ATTUNED));
        assert!(subsets.iter().any(|s| s.len() == 3));
    }

    #[test]
    fn flee_omitted_after_a_flee() {
        let mut state = crate::setup::test_state_fixture();
        state.last_room_was_flee = true;
        let actions = room_choice_actions(&state);
        assert!(!actions.contains(&Action::ChooseFlee));
    }
}
