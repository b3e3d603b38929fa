//! Legal actions during the pre-resolve window: every optional action
//! available before a card is committed, in the fixed order the parity
//! contract requires, followed by commit-resolve itself.

use fg_types::action::Action;
use fg_types::content::LoadedContent;
use fg_types::enums::Orientation;
use fg_types::state::{DisabledFateAction, RunState};

use crate::rules;

pub fn legal_actions_pre_resolve(content: &LoadedContent, state: &RunState) -> Vec<Action> {
    let mut out = Vec::new();

    for major_id in &state.majors.attuned {
        if !state.majors.spent_this_floor.contains(major_id) && content.major(major_id).is_some() {
            out.push(Action::UseMajorGift { major_id: major_id.clone() });
        }
    }

    if !state.room.leap_used {
        for slot in state.room.occupied_slots() {
            out.push(Action::UseLeapOfFaith { slot });
        }
    }

    let reroll_disabled = state.room.disabled_fate_actions_this_room.contains(&DisabledFateAction::Reroll);
    let cleanse_disabled = state.room.disabled_fate_actions_this_room.contains(&DisabledFateAction::Cleanse);

    if state.player.fate >= 1 && !reroll_disabled {
        for slot in state.room.unresolved_occupied_slots() {
            out.push(Action::SpendFateReroll { slot });
        }
    }

    if state.player.fate >= 1 && !cleanse_disabled {
        for slot in state.room.unresolved_occupied_slots() {
            if rules::slot_effective_orientation(state, slot) == Some(Orientation::Reversed) {
                out.push(Action::SpendFateCleanse { slot });
            }
        }
    }

    if state.player.fate >= 2 {
        for slot in state.room.unresolved_occupied_slots() {
            out.push(Action::SpendFateExileReplace { slot });
        }
        out.push(Action::SpendFateCheatWeapon);
    }

    if state.player.spell.is_some() {
        for slot in state.room.unresolved_occupied_slots() {
            if rules::slot_effective_orientation(state, slot) == Some(Orientation::Reversed) {
                out.push(Action::UseSpellCleanse { slot });
            }
        }
        for slot in state.room.unresolved_occupied_slots() {
            out.push(Action::UseSpellReroll { slot });
        }
    }

    for slot in rules::allowed_commit_slots(state) {
        out.push(Action::CommitResolve { slot });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use fg_content::default_bundle;
    use fg_content::loader::load_content;

    #[test]
    fn commit_resolve_offered_for_every_unresolved_occupied_slot_by_default() {
        let content = load_content(default_bundle()).unwrap();
        let mut state = crate::setup::test_state_fixture();
        state.room.slots = [
            Some("cups_2".into()),
            Some("pentacles_3".into()),
            None,
            Some("swords_4".into()),
        ];
        let actions = legal_actions_pre_resolve(&content, &state);
        let commits: Vec<_> = actions
            .iter()
            .filter_map(|a| match a {
                Action::CommitResolve { slot } => Some(*slot),
                _ => None,
            })
            .collect();
        assert_eq!(commits, vec![0, 1, 3]);
    }

    #[test]
    fn leap_not_offered_once_used() {
        let content = load_content(default_bundle()).unwrap();
        let mut state = crate::setup::test_state_fixture();
        state.room.slots[0] = Some("cups_2".into());
        state.room.leap_used = true;
        let actions = legal_actions_pre_resolve(&content, &state);
        assert!(!actions.iter().any(|a| matches!(a, Action::UseLeapOfFaith { .. })));
    }
}
