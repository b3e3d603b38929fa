//! A hand-authored 21-Major content bundle, used by tests, `fg-replay`
//! fixtures, and as the reference bundle for parity checks. Authored
//! as Rust-literal data, interpreted generically through the effect
//! DSL rather than matched by id.

use std::collections::HashMap;

use fg_types::content::{
    ContentBundle, Gift, MajorDefinition, MajorsBundle, Shadow, StringsBundle, UiDescriptor,
};
use fg_types::effect::{BargainOption, ChoiceOption, EffectNode, Predicate, Selector};
use fg_types::enums::{EffectScope, FateAction, OrderConstraintKind, ShadowTrigger, WeaponRestrictionMode};

const CONTENT_VERSION: u32 = 1;

struct MajorSpec {
    id: &'static str,
    name: &'static str,
    shadow_desc: &'static str,
    gift_desc: &'static str,
    trigger: ShadowTrigger,
    shadow_effect: EffectNode,
    gift_effect: EffectNode,
}

pub fn default_bundle() -> ContentBundle {
    let specs = major_specs();
    let mut strings = HashMap::new();
    let mut majors = Vec::with_capacity(specs.len());

    for spec in specs {
        let name_key = format!("{}.name", spec.id);
        let shadow_key = format!("{}.shadow", spec.id);
        let gift_key = format!("{}.gift", spec.id);
        strings.insert(name_key.clone(), spec.name.to_string());
        strings.insert(shadow_key.clone(), spec.shadow_desc.to_string());
        strings.insert(gift_key.clone(), spec.gift_desc.to_string());

        majors.push(MajorDefinition {
            id: spec.id.into(),
            ui: UiDescriptor {
                name_key: name_key.into(),
                shadow_description_key: shadow_key.into(),
                gift_description_key: gift_key.into(),
            },
            shadow: Shadow {
                trigger: spec.trigger,
                effect: spec.shadow_effect,
            },
            gift: Gift {
                effect: spec.gift_effect,
            },
        });
    }

    ContentBundle {
        majors_bundle: MajorsBundle {
            content_version: CONTENT_VERSION,
            majors,
        },
        strings_bundle: StringsBundle { strings },
    }
}

fn major_specs() -> Vec<MajorSpec> {
    vec![
        MajorSpec {
            id: "the_fool",
            name: "The Fool",
            shadow_desc: "Each room's reveal is unremarkable.",
            gift_desc: "Peek the top three cards of the active deck.",
            trigger: ShadowTrigger::RoomRevealed,
            shadow_effect: EffectNode::Noop,
            gift_effect: EffectNode::PeekTopN {
                n: 3,
                can_reorder: true,
            },
        },
        MajorSpec {
            id: "the_magician",
            name: "The Magician",
            shadow_desc: "Nothing stirs at the start of the floor.",
            gift_desc: "Reroll the revealed card of your choosing.",
            trigger: ShadowTrigger::FloorStart,
            shadow_effect: EffectNode::Noop,
            gift_effect: EffectNode::RerollRevealed {
                selector: Selector::PlayerChoice,
            },
        },
        MajorSpec {
            id: "the_high_priestess",
            name: "The High Priestess",
            shadow_desc: "The order of things is hidden.",
            gift_desc: "Cleanse a reversed card of your choosing.",
            trigger: ShadowTrigger::OrderConstraint,
            shadow_effect: EffectNode::Noop,
            gift_effect: EffectNode::CleanseRevealed {
                selector: Selector::PlayerChoice,
            },
        },
        MajorSpec {
            id: "the_empress",
            name: "The Empress",
            shadow_desc: "The floor opens gently.",
            gift_desc: "A bargain: pay gold to heal, or take a small risk for gold.",
            trigger: ShadowTrigger::FloorStart,
            shadow_effect: EffectNode::Noop,
            gift_effect: EffectNode::Bargain {
                prompt_key: "the_empress.bargain_prompt".into(),
                options: vec![
                    BargainOption {
                        label_key: "the_empress.bargain_pay".into(),
                        pay_gold: Some(5),
                        heal: Some(5),
                        ..Default::default()
                    },
                    BargainOption {
                        label_key: "the_empress.bargain_risk".into(),
                        take_damage: Some(3),
                        gain_gold: Some(5),
                        ..Default::default()
                    },
                ],
            },
        },
        MajorSpec {
            id: "the_emperor",
            name: "The Emperor",
            shadow_desc: "Weapons answer only to discipline this floor.",
            gift_desc: "Nothing is offered yet.",
            trigger: ShadowTrigger::FloorStart,
            shadow_effect: EffectNode::SetWeaponRestrictionMode {
                mode: WeaponRestrictionMode::Strict,
                scope: EffectScope::ThisFloor,
            },
            gift_effect: EffectNode::Noop,
        },
        MajorSpec {
            id: "the_hierophant",
            name: "The Hierophant",
            shadow_desc: "Cards must be faced in their suits' order.",
            gift_desc: "Nothing is offered yet.",
            trigger: ShadowTrigger::OrderConstraint,
            shadow_effect: EffectNode::SetOrderConstraint {
                order_constraint: OrderConstraintKind::SuitOrder,
                requires_choose_carried_first: false,
                scope: EffectScope::ThisFloor,
            },
            gift_effect: EffectNode::Noop,
        },
        MajorSpec {
            id: "the_lovers",
            name: "The Lovers",
            shadow_desc: "A choice must be made at the start of the room.",
            gift_desc: "Choose between two small boons.",
            trigger: ShadowTrigger::RoomRevealed,
            shadow_effect: EffectNode::Noop,
            gift_effect: EffectNode::Choice {
                prompt_key: "the_lovers.choice_prompt".into(),
                options: vec![
                    ChoiceOption {
                        label_key: "the_lovers.choice_a".into(),
                        effect: Box::new(EffectNode::Noop),
                    },
                    ChoiceOption {
                        label_key: "the_lovers.choice_b".into(),
                        effect: Box::new(EffectNode::Noop),
                    },
                ],
            },
        },
        MajorSpec {
            id: "the_chariot",
            name: "The Chariot",
            shadow_desc: "The room unfolds in a fixed direction.",
            gift_desc: "Nothing is offered yet.",
            trigger: ShadowTrigger::FloorStart,
            shadow_effect: EffectNode::SetFloorParam {
                param_key: "chariotDirection".to_string(),
                param_value: "LEFT_TO_RIGHT".to_string(),
                scope: EffectScope::ThisFloor,
            },
            gift_effect: EffectNode::Noop,
        },
        MajorSpec {
            id: "strength",
            name: "Strength",
            shadow_desc: "The floor is calm at its opening.",
            gift_desc: "Cleanse whichever reversed card you choose.",
            trigger: ShadowTrigger::FloorStart,
            shadow_effect: EffectNode::Noop,
            gift_effect: EffectNode::CleanseRevealed {
                selector: Selector::HighestValue,
            },
        },
        MajorSpec {
            id: "the_hermit",
            name: "The Hermit",
            shadow_desc: "The floor begins without incident.",
            gift_desc: "Exile and replace a card of your choosing.",
            trigger: ShadowTrigger::FloorStart,
            shadow_effect: EffectNode::Noop,
            gift_effect: EffectNode::ExileReplaceRevealed {
                selector: Selector::PlayerChoice,
            },
        },
        MajorSpec {
            id: "wheel_of_fortune",
            name: "Wheel of Fortune",
            shadow_desc: "The room reveals as fate wills.",
            gift_desc: "Peek and reorder the top three of the active deck.",
            trigger: ShadowTrigger::RoomRevealed,
            shadow_effect: EffectNode::Noop,
            gift_effect: EffectNode::PeekTopN {
                n: 3,
                can_reorder: true,
            },
        },
        MajorSpec {
            id: "justice",
            name: "Justice",
            shadow_desc: "Ascending weight governs resolution this floor.",
            gift_desc: "Nothing is offered yet.",
            trigger: ShadowTrigger::OrderConstraint,
            shadow_effect: EffectNode::SetOrderConstraint {
                order_constraint: OrderConstraintKind::AscOrderingValue,
                requires_choose_carried_first: false,
                scope: EffectScope::ThisFloor,
            },
            gift_effect: EffectNode::Noop,
        },
        MajorSpec {
            id: "the_hanged_man",
            name: "The Hanged Man",
            shadow_desc: "The first card you commit is taken before it resolves.",
            gift_desc: "Nothing is offered yet.",
            trigger: ShadowTrigger::BeforeFirstResolveAttempt,
            shadow_effect: EffectNode::ForcedExileFirstResolveAttempt,
            gift_effect: EffectNode::Noop,
        },
        MajorSpec {
            id: "death",
            name: "Death",
            shadow_desc: "Something ends once a card first resolves.",
            gift_desc: "Nothing is offered yet.",
            trigger: ShadowTrigger::AfterFirstResolution,
            shadow_effect: EffectNode::Conditional {
                if_predicate: Predicate::RoomHasAnyEffectiveReversed,
                then_effect: Box::new(EffectNode::Noop),
                else_effect: Box::new(EffectNode::Noop),
            },
            gift_effect: EffectNode::Noop,
        },
        MajorSpec {
            id: "temperance",
            name: "Temperance",
            shadow_desc: "The floor opens in balance.",
            gift_desc: "A measured bargain of gold and healing.",
            trigger: ShadowTrigger::FloorStart,
            shadow_effect: EffectNode::Noop,
            gift_effect: EffectNode::Bargain {
                prompt_key: "temperance.bargain_prompt".into(),
                options: vec![
                    BargainOption {
                        label_key: "temperance.bargain_pay".into(),
                        pay_gold: Some(3),
                        heal: Some(3),
                        ..Default::default()
                    },
                    BargainOption {
                        label_key: "temperance.bargain_free".into(),
                        ..Default::default()
                    },
                ],
            },
        },
        MajorSpec {
            id: "the_devil",
            name: "The Devil",
            shadow_desc: "Cleansing is forbidden this room.",
            gift_desc: "Nothing is offered yet.",
            trigger: ShadowTrigger::RoomRevealed,
            shadow_effect: EffectNode::DisableFateAction {
                fate_action: FateAction::Cleanse,
                scope: EffectScope::ThisRoom,
            },
            gift_effect: EffectNode::Noop,
        },
        MajorSpec {
            id: "the_tower",
            name: "The Tower",
            shadow_desc: "Rerolling is forbidden this room.",
            gift_desc: "Nothing is offered yet.",
            trigger: ShadowTrigger::RoomRevealed,
            shadow_effect: EffectNode::DisableFateAction {
                fate_action: FateAction::Reroll,
                scope: EffectScope::ThisRoom,
            },
            gift_effect: EffectNode::Noop,
        },
        MajorSpec {
            id: "the_star",
            name: "The Star",
            shadow_desc: "The floor opens under a calm sky.",
            gift_desc: "Reorder the room's four slots as you see fit.",
            trigger: ShadowTrigger::FloorStart,
            shadow_effect: EffectNode::Noop,
            gift_effect: EffectNode::ReorderRoomArbitrary,
        },
        MajorSpec {
            id: "the_moon",
            name: "The Moon",
            shadow_desc: "Nothing is certain at the reveal.",
            gift_desc: "Reorder the room's four slots by ascending value.",
            trigger: ShadowTrigger::RoomRevealed,
            shadow_effect: EffectNode::Noop,
            gift_effect: EffectNode::ReorderRoomByValue,
        },
        MajorSpec {
            id: "the_sun",
            name: "The Sun",
            shadow_desc: "The floor begins in clear light.",
            gift_desc: "Exile and replace whichever enemy you choose, if any stands.",
            trigger: ShadowTrigger::FloorStart,
            shadow_effect: EffectNode::Noop,
            gift_effect: EffectNode::Conditional {
                if_predicate: Predicate::RoomHasEnemy,
                then_effect: Box::new(EffectNode::ExileReplaceRevealed {
                    selector: Selector::IfEnemyPresentPlayerChoice,
                }),
                else_effect: Box::new(EffectNode::Noop),
            },
        },
        MajorSpec {
            id: "judgement",
            name: "Judgement",
            shadow_desc: "The floor begins with a reckoning deferred.",
            gift_desc: "Nothing is offered yet.",
            trigger: ShadowTrigger::FloorStart,
            shadow_effect: EffectNode::Noop,
            gift_effect: EffectNode::Noop,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bundle_has_exactly_21_majors() {
        let bundle = default_bundle();
        assert_eq!(bundle.majors_bundle.majors.len(), 21);
    }

    #[test]
    fn default_bundle_loads_cleanly() {
        let bundle = default_bundle();
        let loaded = crate::loader::load_content(bundle).expect("default bundle must validate");
        assert_eq!(loaded.major_count(), 21);
    }

    #[test]
    fn hanged_man_shadow_matches_forced_exile_hook() {
        let bundle = default_bundle();
        let hanged_man = bundle
            .majors_bundle
            .majors
            .iter()
            .find(|m| m.id.as_str() == "the_hanged_man")
            .expect("the_hanged_man must be present");
        assert_eq!(
            hanged_man.shadow.trigger,
            ShadowTrigger::BeforeFirstResolveAttempt
        );
        assert!(matches!(
            hanged_man.shadow.effect,
            EffectNode::ForcedExileFirstResolveAttempt
        ));
    }
}
