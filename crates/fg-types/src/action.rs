//! The action vocabulary. A single `Action` enum serves both roles the
//! engine API needs: `legal_actions` enumerates fully-parameterized
//! values of this type, and `apply_action` consumes exactly one of
//! them — there is no separate "legal action description" type to keep
//! in sync.

use serde::{Deserialize, Serialize};

use crate::enums::RunLengthTarget;
use crate::ids::MajorId;
use crate::pending::CupsHighChoice;

/// Suit-specific Ace resolution choices, covering every branch in the
/// four Ace prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "choice", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AceChoice {
    PentaclesPayHeal,
    PentaclesGainTake,
    CupsHealToFull,
    CupsCleanseFree { slot: usize },
    WandsExileReplaceFree { slot: usize },
    WandsRerollFree { slot: usize },
    SwordsCheatWeaponFree,
    SwordsRerollFree { slot: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Must be the first action of every action log; constructs the
    /// run via `create_run` rather than being dispatched by the
    /// reducer directly.
    StartRun {
        seed: u32,
        run_length_target: RunLengthTarget,
    },
    SelectAttunement {
        majors: Vec<MajorId>,
    },
    ChooseEngage,
    ChooseFlee,
    SelectCarriedCard {
        slot: usize,
    },
    UseLeapOfFaith {
        slot: usize,
    },
    SpendFateReroll {
        slot: usize,
    },
    SpendFateCleanse {
        slot: usize,
    },
    SpendFateExileReplace {
        slot: usize,
    },
    SpendFateCheatWeapon,
    UseSpellCleanse {
        slot: usize,
    },
    UseSpellReroll {
        slot: usize,
    },
    UseMajorGift {
        major_id: MajorId,
    },
    CommitResolve {
        slot: usize,
    },
    ResolveAceChoice {
        choice: AceChoice,
    },
    ResolveCupsHighChoice {
        choice: CupsHighChoice,
    },
    ResolveSwordsAmbush {
        block: bool,
    },
    ResolveEnemyFight {
        use_weapon: bool,
    },
    MajorChoiceSelect {
        option_index: usize,
    },
    MajorBargainSelect {
        option_index: usize,
    },
    ReorderTop3Confirm {
        order: Vec<usize>,
    },
    ReorderRoom4Confirm {
        order: [usize; 4],
    },
    SelectTargetConfirm {
        slot: usize,
    },
}

impl Action {
    /// Stable discriminant string, used in logs and diagnostics —
    /// mirrors the variant's serde tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::StartRun { .. } => "START_RUN",
            Action::SelectAttunement { .. } => "SELECT_ATTUNEMENT",
            Action::ChooseEngage => "CHOOSE_ENGAGE",
            Action::ChooseFlee => "CHOOSE_FLEE",
            Action::SelectCarriedCard { .. } => "SELECT_CARRIED_CARD",
            Action::UseLeapOfFaith { .. } => "USE_LEAP_OF_FAITH",
            Action::SpendFateReroll { .. } => "SPEND_FATE_REROLL",
            Action::SpendFateCleanse { .. } => "SPEND_FATE_CLEANSE",
            Action::SpendFateExileReplace { .. } => "SPEND_FATE_EXILE_REPLACE",
            Action::SpendFateCheatWeapon => "SPEND_FATE_CHEAT_WEAPON",
            Action::UseSpellCleanse { .. } => "USE_SPELL_CLEANSE",
            Action::UseSpellReroll { .. } => "USE_SPELL_REROLL",
            Action::UseMajorGift { .. } => "USE_MAJOR_GIFT",
            Action::CommitResolve { .. } => "COMMIT_RESOLVE",
            Action::ResolveAceChoice { .. } => "RESOLVE_ACE_CHOICE",
            Action::ResolveCupsHighChoice { .. } => "RESOLVE_CUPS_HIGH_CHOICE",
            Action::ResolveSwordsAmbush { .. } => "RESOLVE_SWORDS_AMBUSH",
            Action::ResolveEnemyFight { .. } => "RESOLVE_ENEMY_FIGHT",
            Action::MajorChoiceSelect { .. } => "MAJOR_CHOICE_SELECT",
            Action::MajorBargainSelect { .. } => "MAJOR_BARGAIN_SELECT",
            Action::ReorderTop3Confirm { .. } => "REORDER_TOP3_CONFIRM",
            Action::ReorderRoom4Confirm { .. } => "REORDER_ROOM4_CONFIRM",
            Action::SelectTargetConfirm { .. } => "SELECT_TARGET_CONFIRM",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_round_trips_through_json() {
        let action = Action::CommitResolve { slot: 2 };
        let json = serde_json::to_string(&action).unwrap();
        let back: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(action, back);
    }

    #[test]
    fn kind_matches_serde_tag_style() {
        assert_eq!(Action::ChooseEngage.kind(), "CHOOSE_ENGAGE");
        assert_eq!(Action::SpendFateCheatWeapon.kind(), "SPEND_FATE_CHEAT_WEAPON");
    }
}
