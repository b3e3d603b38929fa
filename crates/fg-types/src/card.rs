//! The fixed 56-card minor registry and the rules helpers that derive
//! values from a card's identity and effective orientation.

use serde::{Deserialize, Serialize};

use crate::enums::{Orientation, Rank, Suit, ALL_SUITS};
use crate::ids::CardId;

/// A minor card's immutable identity: suit and rank. Orientation is
/// mutable and lives alongside the id in `RunState`'s containers, not
/// here — this type is the registry-side, physically-immutable half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardIdentity {
    pub suit: Suit,
    pub rank: Rank,
}

impl CardIdentity {
    pub fn id(&self) -> CardId {
        CardId::new(format!("{}_{}", suit_key(self.suit), rank_key(self.rank)))
    }
}

fn suit_key(suit: Suit) -> &'static str {
    match suit {
        Suit::Cups => "cups",
        Suit::Pentacles => "pentacles",
        Suit::Swords => "swords",
        Suit::Wands => "wands",
    }
}

fn rank_key(rank: Rank) -> String {
    match rank {
        Rank::Ace => "ace".to_string(),
        Rank::Number(n) => n.to_string(),
        Rank::Page => "page".to_string(),
        Rank::Knight => "knight".to_string(),
        Rank::Queen => "queen".to_string(),
        Rank::King => "king".to_string(),
    }
}

/// Every rank in a single suit, ace through king, in canonical order.
const RANKS: [Rank; 14] = [
    Rank::Ace,
    Rank::Number(2),
    Rank::Number(3),
    Rank::Number(4),
    Rank::Number(5),
    Rank::Number(6),
    Rank::Number(7),
    Rank::Number(8),
    Rank::Number(9),
    Rank::Number(10),
    Rank::Page,
    Rank::Knight,
    Rank::Queen,
    Rank::King,
];

/// The full 56-card minor registry, suit-major then rank order. This is
/// the canonical enumeration order used to build `minor_deck` before
/// shuffling and to validate set-conservation invariants.
pub fn full_registry() -> Vec<CardIdentity> {
    let mut out = Vec::with_capacity(56);
    for suit in ALL_SUITS {
        for rank in RANKS {
            out.push(CardIdentity { suit, rank });
        }
    }
    out
}

/// Inverse of `CardIdentity::id`, used by content/save loading to
/// resolve ids back to typed identities.
pub fn identity_from_id(id: &CardId) -> Option<CardIdentity> {
    let s = id.as_str();
    let (suit_part, rank_part) = s.split_once('_')?;
    let suit = match suit_part {
        "cups" => Suit::Cups,
        "pentacles" => Suit::Pentacles,
        "swords" => Suit::Swords,
        "wands" => Suit::Wands,
        _ => return None,
    };
    let rank = match rank_part {
        "ace" => Rank::Ace,
        "page" => Rank::Page,
        "knight" => Rank::Knight,
        "queen" => Rank::Queen,
        "king" => Rank::King,
        n => Rank::Number(n.parse().ok()?),
    };
    Some(CardIdentity { suit, rank })
}

/// Enemy base value for court cards: page=11, knight=12, queen=13, king=14.
pub fn court_base_value(rank: Rank) -> Option<u32> {
    match rank {
        Rank::Page => Some(11),
        Rank::Knight => Some(12),
        Rank::Queen => Some(13),
        Rank::King => Some(14),
        _ => None,
    }
}

/// Enemy value for a court card at the given effective orientation:
/// `base + (2 if reversed else 0)`.
pub fn enemy_value(rank: Rank, effective: Orientation) -> Option<u32> {
    let base = court_base_value(rank)?;
    Some(base + if effective == Orientation::Reversed { 2 } else { 0 })
}

/// Minor numeric value: the numbered rank's face value.
pub fn numeric_value(rank: Rank) -> Option<u32> {
    match rank {
        Rank::Number(n) => Some(n as u32),
        _ => None,
    }
}

/// Ordering value: ace -> 1, numbered -> its value, court -> enemy value
/// at the given effective orientation.
pub fn ordering_value(rank: Rank, effective: Orientation) -> u32 {
    match rank {
        Rank::Ace => 1,
        Rank::Number(n) => n as u32,
        _ => enemy_value(rank, effective).unwrap_or(0),
    }
}

/// Computes effective orientation per the resolution-time rule:
/// start from physical orientation, boss-corrupt numbered ranks, then
/// let a pending cleanse override back to upright.
pub fn effective_orientation(
    physical: Orientation,
    rank: Rank,
    boss_mode: bool,
    pending_cleanse: bool,
) -> Orientation {
    let mut orientation = physical;
    if boss_mode && rank.is_numbered() {
        orientation = Orientation::Reversed;
    }
    if pending_cleanse {
        orientation = Orientation::Upright;
    }
    orientation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_registry_has_56_unique_cards() {
        let registry = full_registry();
        assert_eq!(registry.len(), 56);
        let ids: std::collections::HashSet<_> = registry.iter().map(|c| c.id()).collect();
        assert_eq!(ids.len(), 56);
    }

    #[test]
    fn id_round_trips_through_identity_from_id() {
        for card in full_registry() {
            let id = card.id();
            let back = identity_from_id(&id).expect("id should parse back");
            assert_eq!(back, card);
        }
    }

    #[test]
    fn court_enemy_value_adds_two_when_reversed() {
        assert_eq!(
            enemy_value(Rank::Queen, Orientation::Upright),
            Some(13)
        );
        assert_eq!(
            enemy_value(Rank::Queen, Orientation::Reversed),
            Some(15)
        );
    }

    #[test]
    fn effective_orientation_boss_corrupts_numbered_only() {
        assert_eq!(
            effective_orientation(Orientation::Upright, Rank::Number(5), true, false),
            Orientation::Reversed
        );
        assert_eq!(
            effective_orientation(Orientation::Upright, Rank::King, true, false),
            Orientation::Upright
        );
    }

    #[test]
    fn effective_orientation_cleanse_overrides_boss_corruption() {
        assert_eq!(
            effective_orientation(Orientation::Upright, Rank::Number(5), true, true),
            Orientation::Upright
        );
    }

    #[test]
    fn ordering_value_ace_is_one() {
        assert_eq!(ordering_value(Rank::Ace, Orientation::Upright), 1);
    }

    #[test]
    fn ordering_value_court_uses_enemy_value() {
        assert_eq!(ordering_value(Rank::King, Orientation::Upright), 14);
        assert_eq!(ordering_value(Rank::King, Orientation::Reversed), 16);
    }
}
