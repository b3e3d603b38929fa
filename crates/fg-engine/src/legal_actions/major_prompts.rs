//! Enumerates legal actions while a Major-initiated prompt is parked,
//! independent of the current phase — a shadow or gift can park one
//! from `RoomReveal`, `FloorStart`, or mid-resolution alike.

use fg_types::action::Action;
use fg_types::content::LoadedContent;
use fg_types::effect::EffectNode;
use fg_types::ids::MajorId;
use fg_types::pending::PendingPrompt;
use fg_types::state::RunState;

/// The `BARGAIN` node that parked the current prompt. Since a Major
/// authors at most one `BARGAIN` site across shadow and gift in every
/// bundle this engine ships, checking the gift first and falling back
/// to the shadow resolves the ambiguity in practice.
pub(crate) fn find_bargain_options<'a>(
    content: &'a LoadedContent,
    major_id: &MajorId,
) -> Option<&'a [fg_types::effect::BargainOption]> {
    let def = content.major(major_id)?;
    if let EffectNode::Bargain { options, .. } = &def.gift.effect {
        return Some(options);
    }
    if let EffectNode::Bargain { options, .. } = &def.shadow.effect {
        return Some(options);
    }
    None
}

/// The `CHOICE` node that parked the current prompt, by the same
/// gift-first-then-shadow heuristic as `find_bargain_options`.
pub(crate) fn find_choice_options<'a>(
    content: &'a LoadedContent,
    major_id: &MajorId,
) -> Option<&'a [fg_types::effect::ChoiceOption]> {
    let def = content.major(major_id)?;
    if let EffectNode::Choice { options, .. } = &def.gift.effect {
        return Some(options);
    }
    if let EffectNode::Choice { options, .. } = &def.shadow.effect {
        return Some(options);
    }
    None
}

pub fn legal_actions_for_prompt(content: &LoadedContent, state: &RunState, prompt: &PendingPrompt) -> Vec<Action> {
    match prompt {
        PendingPrompt::MajorChoice { option_count, .. } => (0..*option_count)
            .map(|i| Action::MajorChoiceSelect { option_index: i })
            .collect(),
        PendingPrompt::MajorBargain { major_id, option_count } => {
            let options = find_bargain_options(content, major_id);
            (0..*option_count)
                .filter(|&i| {
                    options
                        .and_then(|opts| opts.get(i))
                        .and_then(|opt| opt.pay_gold)
                        .map(|pay| state.player.gold >= pay)
                        .unwrap_or(true)
                })
                .map(|i| Action::MajorBargainSelect { option_index: i })
                .collect(),
        }
        PendingPrompt::ReorderTop3 { card_count, .. } => permutations(*card_count)
            .into_iter()
            .map(|order| Action::ReorderTop3Confirm { order })
            .collect(),
        PendingPrompt::ReorderRoom4 { .. } => permutations(4)
            .into_iter()
            .map(|order| {
                Action::ReorderRoom4Confirm {
                    order: [order[0], order[1], order[2], order[3]],
                }
            })
            .collect(),
        PendingPrompt::SelectTarget { candidate_slots, .. } => candidate_slots
            .iter()
            .map(|&slot| Action::SelectTargetConfirm { slot })
            .collect(),
        _ => Vec::new(),
    }
}

fn permutations(n: usize) -> Vec<Vec<usize>> {
    let mut items: Vec<usize> = (0..n).collect();
    let mut result = Vec::new();
    permute(&mut items, 0, &mut result);
    result.sort();
    result
}

fn permute(items: &mut Vec<usize>, k: usize, out: &mut Vec<Vec<usize>>) {
    if k == items.len() {
        out.push(items.clone());
        return;
    }
    for i in k..items.len() {
        items.swap(k, i);
        permute(items, k + 1, out);
        items.swap(k, i);
    }
}
