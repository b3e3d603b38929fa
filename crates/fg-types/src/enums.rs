//! Small closed-set enums shared across the card model, rules state, and
//! the Majors effect DSL.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suit {
    Cups,
    Pentacles,
    Swords,
    Wands,
}

pub const ALL_SUITS: [Suit; 4] = [Suit::Cups, Suit::Pentacles, Suit::Swords, Suit::Wands];

impl Suit {
    /// Lock order used by `SUIT_ORDER` commit constraints: cups, pentacles,
    /// swords, wands.
    pub fn lock_order(self) -> u8 {
        match self {
            Suit::Cups => 0,
            Suit::Pentacles => 1,
            Suit::Swords => 2,
            Suit::Wands => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    Ace,
    Number(u8),
    Page,
    Knight,
    Queen,
    King,
}

impl Rank {
    pub fn is_numbered(self) -> bool {
        matches!(self, Rank::Number(n) if (2..=10).contains(&n))
    }

    pub fn is_court(self) -> bool {
        matches!(self, Rank::Page | Rank::Knight | Rank::Queen | Rank::King)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Upright,
    Reversed,
}

impl Orientation {
    pub fn flip(self) -> Self {
        match self {
            Orientation::Upright => Orientation::Reversed,
            Orientation::Reversed => Orientation::Upright,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    RunInit,
    FloorStart,
    RoomReveal,
    RoomChoice,
    EngageSetup,
    PreResolveWindow,
    ResolveCommit,
    ResolveExecute,
    RoomEnd,
    RunVictory,
    RunDefeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunLengthTarget {
    Seven = 7,
    Fourteen = 14,
    TwentyOne = 21,
}

impl RunLengthTarget {
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeaponRestrictionMode {
    Default,
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderConstraintKind {
    None,
    LeftToRight,
    RightToLeft,
    SuitOrder,
    AscOrderingValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChariotDirection {
    LeftToRight,
    RightToLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FateAction {
    Cleanse,
    Reroll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShadowTrigger {
    FloorStart,
    RoomRevealed,
    OrderConstraint,
    BeforeFirstResolveAttempt,
    AfterFirstResolution,
}

/// Scope over which a rules-mutating effect (weapon restriction, order
/// constraint, disabled fate action, floor param) applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectScope {
    ThisRoom,
    ThisFloor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentKind {
    Weapon,
    Armor,
    Spell,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suit_lock_order_matches_spec_sequence() {
        let mut suits = ALL_SUITS;
        suits.sort_by_key(|s| s.lock_order());
        assert_eq!(
            suits,
            [Suit::Cups, Suit::Pentacles, Suit::Swords, Suit::Wands]
        );
    }

    #[test]
    fn rank_numbered_excludes_ace_and_court() {
        assert!(!Rank::Ace.is_numbered());
        assert!(Rank::Number(2).is_numbered());
        assert!(Rank::Number(10).is_numbered());
        assert!(!Rank::Page.is_numbered());
    }

    #[test]
    fn orientation_flip_is_involution() {
        assert_eq!(Orientation::Upright.flip().flip(), Orientation::Upright);
    }
}
