//! The Major effect-primitive DSL. Shadows and gifts are authored as
//! trees of these nodes and interpreted generically by the engine —
//! there is deliberately no per-Major Rust code path here.

use serde::{Deserialize, Serialize};

use crate::enums::{EffectScope, FateAction, OrderConstraintKind, WeaponRestrictionMode};
use crate::ids::StringKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Selector {
    PlayerChoice,
    Random,
    Leftmost,
    /// Ties fall back to `PlayerChoice`.
    HighestValue,
    IfEnemyPresentPlayerChoice,
    IfAnyReversedPlayerChoice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Predicate {
    RoomHasEnemy,
    RoomHasAnyEffectiveReversed,
    PlayerGoldAtLeast { value: u32 },
}

/// One option authored inside a `BARGAIN` node. At most one of
/// `pay_gold`/`take_damage` is present; apply order is pay/damage,
/// then heal, then gain_gold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BargainOption {
    pub label_key: StringKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay_gold: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_damage: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heal: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gain_gold: Option<u32>,
}

/// One option authored inside a `CHOICE` node: an opaque label plus an
/// effect to evaluate if chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub label_key: StringKey,
    pub effect: Box<EffectNode>,
}

/// A node in the effect-primitive tree. The closed set matches the
/// sixteen primitives plus `NOOP`; new primitives require extending
/// this enum and the interpreter together, never bespoke per-id code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectNode {
    Noop,
    Sequence {
        effects: Vec<EffectNode>,
    },
    Choice {
        prompt_key: StringKey,
        options: Vec<ChoiceOption>,
    },
    Conditional {
        #[serde(rename = "if")]
        if_predicate: Predicate,
        then_effect: Box<EffectNode>,
        else_effect: Box<EffectNode>,
    },
    RerollRevealed {
        selector: Selector,
    },
    ExileReplaceRevealed {
        selector: Selector,
    },
    CleanseRevealed {
        selector: Selector,
    },
    PeekTopN {
        n: u8,
        can_reorder: bool,
    },
    ReorderTopN {
        n: u8,
    },
    ReorderRoomByValue,
    ReorderRoomArbitrary,
    Bargain {
        prompt_key: StringKey,
        options: Vec<BargainOption>,
    },
    DisableFateAction {
        fate_action: FateAction,
        scope: EffectScope,
    },
    SetWeaponRestrictionMode {
        mode: WeaponRestrictionMode,
        scope: EffectScope,
    },
    SetOrderConstraint {
        order_constraint: OrderConstraintKind,
        requires_choose_carried_first: bool,
        scope: EffectScope,
    },
    SetFloorParam {
        param_key: String,
        param_value: String,
        scope: EffectScope,
    },
    ForcedExileFirstResolveAttempt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_node_sequence_round_trips_through_json() {
        let node = EffectNode::Sequence {
            effects: vec![
                EffectNode::Noop,
                EffectNode::DisableFateAction {
                    fate_action: FateAction::Cleanse,
                    scope: EffectScope::ThisRoom,
                },
            ],
        };
        let json = serde_json::to_string(&node).unwrap();
        let back: EffectNode = serde_json::from_str(&json).unwrap();
        assert_eq!(node, back);
    }

    #[test]
    fn conditional_tag_uses_if_key() {
        let node = EffectNode::Conditional {
            if_predicate: Predicate::PlayerGoldAtLeast { value: 5 },
            then_effect: Box::new(EffectNode::Noop),
            else_effect: Box::new(EffectNode::Noop),
        };
        let json = serde_json::to_value(&node).unwrap();
        assert!(json.get("if").is_some());
    }
}
