//! `load_content`: validates a raw `ContentBundle` and builds the
//! id-indexed `LoadedContent` the engine consults for the life of a
//! process.

use std::collections::{HashMap, HashSet};

use fg_types::content::{ContentBundle, LoadedContent, MajorDefinition};
use fg_types::effect::EffectNode;
use fg_types::enums::EffectScope;
use fg_types::error::EngineError;
use fg_types::ids::{MajorId, StringKey};

const EXPECTED_MAJOR_COUNT: usize = 21;

/// Validates `bundle` and builds the id-indexed content the engine
/// will consult. Fails with `EngineError::ContentInvalid` on the first
/// structural or referential problem found.
pub fn load_content(bundle: ContentBundle) -> Result<LoadedContent, EngineError> {
    let ContentBundle {
        majors_bundle,
        strings_bundle,
    } = bundle;

    if majors_bundle.majors.len() != EXPECTED_MAJOR_COUNT {
        return Err(invalid(format!(
            "expected exactly {EXPECTED_MAJOR_COUNT} majors, got {}",
            majors_bundle.majors.len()
        )));
    }

    let mut majors_by_id = HashMap::with_capacity(majors_bundle.majors.len());
    let mut major_order = Vec::with_capacity(majors_bundle.majors.len());
    let mut seen_ids: HashSet<MajorId> = HashSet::new();

    for major in &majors_bundle.majors {
        if !seen_ids.insert(major.id.clone()) {
            return Err(invalid(format!("duplicate major id: {}", major.id)));
        }
        validate_major(major, &strings_bundle.strings)?;
        major_order.push(major.id.clone());
    }

    for major in majors_bundle.majors {
        let id = major.id.clone();
        majors_by_id.insert(id, major);
    }

    log::info!(
        "content loaded: content_version={}, majors={}",
        majors_bundle_content_version(&majors_by_id, majors_bundle.content_version),
        majors_by_id.len()
    );

    Ok(LoadedContent::new(
        majors_bundle.content_version,
        majors_by_id,
        major_order,
        strings_bundle,
    ))
}

fn majors_bundle_content_version(
    _majors_by_id: &HashMap<MajorId, MajorDefinition>,
    content_version: u32,
) -> u32 {
    content_version
}

fn validate_major(
    major: &MajorDefinition,
    strings: &HashMap<String, String>,
) -> Result<(), EngineError> {
    require_string(strings, &major.ui.name_key, &major.id)?;
    require_string(strings, &major.ui.shadow_description_key, &major.id)?;
    require_string(strings, &major.ui.gift_description_key, &major.id)?;

    validate_effect(&major.shadow.effect, strings, &major.id)?;
    validate_effect(&major.gift.effect, strings, &major.id)?;
    Ok(())
}

fn require_string(
    strings: &HashMap<String, String>,
    key: &StringKey,
    major_id: &MajorId,
) -> Result<(), EngineError> {
    if strings.contains_key(key.as_str()) {
        Ok(())
    } else {
        Err(invalid(format!(
            "major {major_id}: missing string key '{key}'"
        )))
    }
}

fn validate_effect(
    node: &EffectNode,
    strings: &HashMap<String, String>,
    major_id: &MajorId,
) -> Result<(), EngineError> {
    match node {
        EffectNode::Noop => Ok(()),
        EffectNode::Sequence { effects } => {
            if effects.is_empty() {
                return Err(invalid(format!(
                    "major {major_id}: SEQUENCE requires at least one effect"
                )));
            }
            for effect in effects {
                validate_effect(effect, strings, major_id)?;
            }
            Ok(())
        }
        EffectNode::Choice {
            prompt_key,
            options,
        } => {
            require_string(strings, prompt_key, major_id)?;
            if options.is_empty() {
                return Err(invalid(format!(
                    "major {major_id}: CHOICE requires at least one option"
                )));
            }
            for option in options {
                require_string(strings, &option.label_key, major_id)?;
                validate_effect(&option.effect, strings, major_id)?;
            }
            Ok(())
        }
        EffectNode::Conditional {
            then_effect,
            else_effect,
            ..
        } => {
            validate_effect(then_effect, strings, major_id)?;
            validate_effect(else_effect, strings, major_id)?;
            Ok(())
        }
        EffectNode::RerollRevealed { .. }
        | EffectNode::ExileReplaceRevealed { .. }
        | EffectNode::CleanseRevealed { .. } => Ok(()),
        EffectNode::PeekTopN { n, .. } => {
            if *n != 3 {
                return Err(invalid(format!(
                    "major {major_id}: PEEK_TOP_N requires n=3, got {n}"
                )));
            }
            Ok(())
        }
        EffectNode::ReorderTopN { n } => {
            if *n != 3 {
                return Err(invalid(format!(
                    "major {major_id}: REORDER_TOP_N requires n=3, got {n}"
                )));
            }
            Ok(())
        }
        EffectNode::ReorderRoomByValue | EffectNode::ReorderRoomArbitrary => Ok(()),
        EffectNode::Bargain {
            prompt_key,
            options,
        } => {
            require_string(strings, prompt_key, major_id)?;
            if options.len() < 2 {
                return Err(invalid(format!(
                    "major {major_id}: BARGAIN requires at least two options, got {}",
                    options.len()
                )));
            }
            for option in options {
                require_string(strings, &option.label_key, major_id)?;
            }
            Ok(())
        }
        EffectNode::DisableFateAction { scope, .. } => {
            require_scope(*scope, EffectScope::ThisRoom, "DISABLE_FATE_ACTION", major_id)
        }
        EffectNode::SetWeaponRestrictionMode { scope, .. } => require_scope(
            *scope,
            EffectScope::ThisFloor,
            "SET_WEAPON_RESTRICTION_MODE",
            major_id,
        ),
        EffectNode::SetOrderConstraint { scope, .. } => {
            require_scope(*scope, EffectScope::ThisFloor, "SET_ORDER_CONSTRAINT", major_id)
        }
        EffectNode::SetFloorParam {
            param_key,
            param_value,
            scope,
        } => {
            require_scope(*scope, EffectScope::ThisFloor, "SET_FLOOR_PARAM", major_id)?;
            validate_floor_param(param_key, param_value, major_id)
        }
        EffectNode::ForcedExileFirstResolveAttempt => Ok(()),
    }
}

fn require_scope(
    actual: EffectScope,
    expected: EffectScope,
    primitive: &str,
    major_id: &MajorId,
) -> Result<(), EngineError> {
    if actual == expected {
        Ok(())
    } else {
        Err(invalid(format!(
            "major {major_id}: {primitive} requires scope {expected:?}, got {actual:?}"
        )))
    }
}

fn validate_floor_param(
    param_key: &str,
    param_value: &str,
    major_id: &MajorId,
) -> Result<(), EngineError> {
    match param_key {
        "chariotDirection" => {
            if param_value == "LEFT_TO_RIGHT" || param_value == "RIGHT_TO_LEFT" {
                Ok(())
            } else {
                Err(invalid(format!(
                    "major {major_id}: chariotDirection param_value must be LEFT_TO_RIGHT or RIGHT_TO_LEFT, got '{param_value}'"
                )))
            }
        }
        "cheatWeapon" => Ok(()),
        other => {
            log::warn!("major {major_id}: unrecognized SET_FLOOR_PARAM key '{other}', treated as a no-op at resolution time");
            Ok(())
        }
    }
}

fn invalid(reason: String) -> EngineError {
    EngineError::ContentInvalid { reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fg_types::content::{MajorsBundle, Shadow, Gift, StringsBundle, UiDescriptor};
    use fg_types::enums::ShadowTrigger;

    fn minimal_major(id: &str) -> MajorDefinition {
        MajorDefinition {
            id: id.into(),
            ui: UiDescriptor {
                name_key: "name".into(),
                shadow_description_key: "shadow".into(),
                gift_description_key: "gift".into(),
            },
            shadow: Shadow {
                trigger: ShadowTrigger::FloorStart,
                effect: EffectNode::Noop,
            },
            gift: Gift {
                effect: EffectNode::Noop,
            },
        }
    }

    fn minimal_strings() -> StringsBundle {
        let mut strings = HashMap::new();
        strings.insert("name".to_string(), "Name".to_string());
        strings.insert("shadow".to_string(), "Shadow".to_string());
        strings.insert("gift".to_string(), "Gift".to_string());
        StringsBundle { strings }
    }

    fn bundle_with(majors: Vec<MajorDefinition>) -> ContentBundle {
        ContentBundle {
            majors_bundle: MajorsBundle {
                content_version: 1,
                majors,
            },
            strings_bundle: minimal_strings(),
        }
    }

    #[test]
    fn rejects_wrong_major_count() {
        let bundle = bundle_with(vec![minimal_major("the_fool")]);
        let err = load_content(bundle).unwrap_err();
        assert!(matches!(err, EngineError::ContentInvalid { .. }));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let majors: Vec<_> = (0..21).map(|_| minimal_major("the_fool")).collect();
        let err = load_content(bundle_with(majors)).unwrap_err();
        assert!(matches!(err, EngineError::ContentInvalid { .. }));
    }

    #[test]
    fn rejects_missing_string_key() {
        let mut major = minimal_major("the_fool");
        major.ui.name_key = "missing_key".into();
        let mut majors = vec![major];
        majors.extend((1..21).map(|i| minimal_major(&format!("major_{i}"))));
        let err = load_content(bundle_with(majors)).unwrap_err();
        assert!(matches!(err, EngineError::ContentInvalid { .. }));
    }

    #[test]
    fn rejects_bargain_with_one_option() {
        let mut major = minimal_major("the_fool");
        major.gift.effect = EffectNode::Bargain {
            prompt_key: "name".into(),
            options: vec![fg_types::effect::BargainOption {
                label_key: "name".into(),
                ..Default::default()
            }],
        };
        let mut majors = vec![major];
        majors.extend((1..21).map(|i| minimal_major(&format!("major_{i}"))));
        let err = load_content(bundle_with(majors)).unwrap_err();
        assert!(matches!(err, EngineError::ContentInvalid { .. }));
    }

    #[test]
    fn accepts_valid_21_major_bundle() {
        let majors: Vec<_> = (0..21).map(|i| minimal_major(&format!("major_{i}"))).collect();
        let loaded = load_content(bundle_with(majors)).unwrap();
        assert_eq!(loaded.major_count(), 21);
    }
}
