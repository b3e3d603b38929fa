//! Observable events emitted by `apply_action`, in order. Ordering
//! within one call is part of the public contract; callers may render
//! or log them but must never feed them back into the reducer.

use serde::{Deserialize, Serialize};

use crate::enums::EquipmentKind;
use crate::ids::CardId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Event {
    RoomRevealed {
        slots: [Option<CardId>; 4],
    },
    PeekTopN {
        n: u8,
        card_ids: Vec<CardId>,
    },
    PlayerHpChanged {
        delta: i32,
        hp: u32,
    },
    PlayerGoldChanged {
        delta: i32,
        gold: u32,
    },
    PlayerFateChanged {
        delta: i32,
        fate: u32,
    },
    CardBottomed {
        card_id: CardId,
    },
    CardExiled {
        card_id: CardId,
    },
    CardResolved {
        card_id: CardId,
        slot_index: usize,
    },
    EquipWeapon {
        card_id: CardId,
        value: u32,
    },
    EquipArmor {
        card_id: CardId,
        value: u32,
    },
    EquipSpell {
        card_id: CardId,
        value: u32,
    },
    DiscardEquipment {
        kind: EquipmentKind,
        card_id: CardId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_round_trips_through_json() {
        let event = Event::PlayerHpChanged { delta: -3, hp: 17 };
        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
