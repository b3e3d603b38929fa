//! Shapes for the content bundle the engine consumes: Major Arcana
//! definitions and the opaque string table they reference. Validation
//! and id-indexing live in the content-loading crate; these types are
//! the plain data shape it parses into.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::effect::EffectNode;
use crate::enums::ShadowTrigger;
use crate::ids::{MajorId, StringKey};

/// Three opaque string keys a UI resolves to localized text: name,
/// shadow description, gift description. The engine never inspects
/// their contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiDescriptor {
    pub name_key: StringKey,
    pub shadow_description_key: StringKey,
    pub gift_description_key: StringKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shadow {
    pub trigger: ShadowTrigger,
    pub effect: EffectNode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gift {
    pub effect: EffectNode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorDefinition {
    pub id: MajorId,
    pub ui: UiDescriptor,
    pub shadow: Shadow,
    pub gift: Gift,
}

/// Exactly 21 Major definitions, content-versioned as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorsBundle {
    pub content_version: u32,
    pub majors: Vec<MajorDefinition>,
}

/// Flat string→string table. Every `StringKey` a Major references must
/// resolve here; the loader enforces this at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StringsBundle {
    pub strings: HashMap<String, String>,
}

impl StringsBundle {
    pub fn get(&self, key: &StringKey) -> Option<&str> {
        self.strings.get(key.as_str()).map(String::as_str)
    }
}

/// The raw, unvalidated input to `load_content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBundle {
    pub majors_bundle: MajorsBundle,
    pub strings_bundle: StringsBundle,
}

/// The validated, id-indexed form the engine actually consults. Built
/// once by the content-loading crate and held read-only for the life
/// of a process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedContent {
    pub content_version: u32,
    majors_by_id: HashMap<MajorId, MajorDefinition>,
    major_order: Vec<MajorId>,
    strings: StringsBundle,
}

impl LoadedContent {
    /// Constructed only by the content loader after full validation
    /// succeeds; callers elsewhere should never build this by hand.
    pub fn new(
        content_version: u32,
        majors_by_id: HashMap<MajorId, MajorDefinition>,
        major_order: Vec<MajorId>,
        strings: StringsBundle,
    ) -> Self {
        Self {
            content_version,
            majors_by_id,
            major_order,
            strings,
        }
    }

    pub fn major(&self, id: &MajorId) -> Option<&MajorDefinition> {
        self.majors_by_id.get(id)
    }

    pub fn major_count(&self) -> usize {
        self.majors_by_id.len()
    }

    /// Majors in authored order — the order `major_deck` is built from
    /// before the per-run shuffle.
    pub fn major_ids_in_order(&self) -> &[MajorId] {
        &self.major_order
    }

    pub fn string(&self, key: &StringKey) -> Option<&str> {
        self.strings.get(key)
    }
}
