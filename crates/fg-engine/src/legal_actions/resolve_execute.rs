//! Legal actions while a non-Major resolution prompt (Ace, enemy
//! fight, ambush, Cups-high) is parked.

use fg_types::action::{Action, AceChoice};
use fg_types::pending::{AceSuitPrompt, CupsHighChoice, PendingPrompt};
use fg_types::state::RunState;

use crate::rules;

pub fn legal_actions_resolve_execute(state: &RunState, prompt: &PendingPrompt) -> Vec<Action> {
    match prompt {
        PendingPrompt::AceResolution { slot, suit_prompt } => ace_choices(state, *slot, *suit_prompt),
        PendingPrompt::EnemyFightChoice { enemy_value, .. } => {
            let mut actions = vec![Action::ResolveEnemyFight { use_weapon: false }];
            let can_use = state
                .player
                .weapon
                .as_ref()
                .map(|w| {
                    rules::can_use_weapon_with_mode(
                        state.player.cheat_weapon_next_enemy_fight,
                        state.player.cheat_weapon_this_room,
                        w,
                        *enemy_value,
                        state.rules.weapon_restriction_mode,
                    )
                })
                .unwrap_or(false);
            if can_use {
                actions.push(Action::ResolveEnemyFight { use_weapon: true });
            }
            actions
        }
        PendingPrompt::SwordsAmbushBlock { .. } => vec![
            Action::ResolveSwordsAmbush { block: false },
            Action::ResolveSwordsAmbush { block: true },
        ],
        PendingPrompt::CupsHighChoice { .. } => vec![
            Action::ResolveCupsHighChoice { choice: CupsHighChoice::Heal },
            Action::ResolveCupsHighChoice { choice: CupsHighChoice::EquipArmor },
        ],
        _ => Vec::new(),
    }
}

fn other_occupied_slots_ascending(state: &RunState, exclude: usize) -> Vec<usize> {
    state.room.occupied_slots().filter(|&s| s != exclude).collect()
}

fn ace_choices(state: &RunState, slot: usize, suit_prompt: AceSuitPrompt) -> Vec<Action> {
    let mut out = Vec::new();
    match suit_prompt {
        AceSuitPrompt::Pentacles => {
            if state.player.gold >= 5 {
                out.push(AceChoice::PentaclesPayHeal);
            }
            out.push(AceChoice::PentaclesGainTake);
        }
        AceSuitPrompt::Cups => {
            out.push(AceChoice::CupsHealToFull);
            for other in other_occupied_slots_ascending(state, slot) {
                if rules::slot_effective_orientation(state, other) == Some(fg_types::enums::Orientation::Reversed) {
                    out.push(AceChoice::CupsCleanseFree { slot: other });
                }
            }
        }
        AceSuitPrompt::Wands => {
            for other in other_occupied_slots_ascending(state, slot) {
                out.push(AceChoice::WandsExileReplaceFree { slot: other });
                out.push(AceChoice::WandsRerollFree { slot: other });
            }
        }
        AceSuitPrompt::Swords => {
            out.push(AceChoice::SwordsCheatWeaponFree);
            for other in other_occupied_slots_ascending(state, slot) {
                out.push(AceChoice::SwordsRerollFree { slot: other });
            }
        }
    }
    out.into_iter().map(|choice| Action::ResolveAceChoice { choice }).collect()
}
