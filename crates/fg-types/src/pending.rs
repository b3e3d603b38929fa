//! Pending prompt as a tagged sum type attached to `RunState`.
//!
//! Only `PendingPrompt` itself is part of the hashable state. UI-facing
//! payload that doesn't affect legality (resolved display strings, a
//! cached candidate list already derivable from state+content) lives in
//! the parallel `PromptUiSidecar`, which `hash_state` never touches.

use serde::{Deserialize, Serialize};

use crate::ids::{MajorId, StringKey};

/// Which suit-specific Ace prompt is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AceSuitPrompt {
    Pentacles,
    Cups,
    Wands,
    Swords,
}

/// Which revealed-card operation a parked `SelectTarget` prompt will
/// perform once the player names a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MajorTargetOp {
    Reroll,
    ExileReplace,
    Cleanse,
}

/// Cups 8-10 upright choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CupsHighChoice {
    Heal,
    EquipArmor,
}

/// The canonical, hashable prompt kind. Every variant carries exactly
/// the data needed to validate a resolving action against
/// `legal_actions` — no display text, no cached labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PendingPrompt {
    /// An Ace sits in `slot` awaiting its suit-specific resolution.
    AceResolution { slot: usize, suit_prompt: AceSuitPrompt },
    /// A court card in `slot` with enemy value `enemy_value` may be
    /// fought barehanded or with the prepared weapon.
    EnemyFightChoice { slot: usize, enemy_value: u32 },
    /// A reversed sword in `slot` may be blocked with the prepared
    /// weapon.
    SwordsAmbushBlock { slot: usize, value: u32 },
    /// An upright Cups 8-10 in `slot` offers heal or equip-as-armor.
    CupsHighChoice { slot: usize, value: u32 },
    /// A Major `CHOICE` node parked mid-evaluation; `option_count`
    /// bounds the legal option indices.
    MajorChoice { major_id: MajorId, option_count: usize },
    /// A Major `BARGAIN` node parked mid-evaluation.
    MajorBargain { major_id: MajorId, option_count: usize },
    /// A Major `PEEK_TOP_N` with `can_reorder` parked a reorder of the
    /// top 3 cards of the active deck.
    ReorderTop3 { major_id: MajorId, card_count: usize },
    /// A Major `REORDER_ROOM_ARBITRARY` parked a full-room reorder.
    ReorderRoom4 { major_id: MajorId },
    /// A Major target-selecting primitive (`PLAYER_CHOICE` selector)
    /// parked target selection over the given candidate slots.
    SelectTarget {
        major_id: MajorId,
        op: MajorTargetOp,
        candidate_slots: Vec<usize>,
    },
}

/// What the reducer resumes once the *current* pending prompt finally
/// resolves to completion (not merely re-parks into a different
/// prompt). Needed because a shadow effect can itself park a Major
/// prompt from a context — like the tail of a resolution — whose own
/// phase transition has to wait for that prompt to clear before it can
/// run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PendingContinuation {
    /// Resume a resolution's post-first-resolution tail: `room_end` if
    /// the room is now fully resolved, otherwise back to
    /// `PreResolveWindow`.
    AfterFirstResolution,
}

/// UI-only sidecar, excluded from `hash_state`. Holds resolved display
/// strings for the currently parked prompt so a client doesn't need to
/// re-resolve content lookups every frame.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PromptUiSidecar {
    pub prompt_label_key: Option<StringKey>,
    pub option_label_keys: Vec<StringKey>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_prompt_round_trips_through_json() {
        let prompt = PendingPrompt::EnemyFightChoice {
            slot: 2,
            enemy_value: 13,
        };
        let json = serde_json::to_string(&prompt).unwrap();
        let back: PendingPrompt = serde_json::from_str(&json).unwrap();
        assert_eq!(prompt, back);
    }

    #[test]
    fn sidecar_default_is_empty() {
        let sidecar = PromptUiSidecar::default();
        assert!(sidecar.prompt_label_key.is_none());
        assert!(sidecar.option_label_keys.is_empty());
    }
}
