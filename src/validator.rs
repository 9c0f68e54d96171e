use crate::zone::ZoneDefinition;
use std::collections::{BTreeSet, HashSet};

/// Outcome of checking a zone's list against the loaded names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ZoneValidation {
    Valid,
    /// names the dataset does not contain, in zone-list order
    Missing(Vec<String>),
}

impl ZoneValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, ZoneValidation::Valid)
    }
}

/// Checks that every municipality of `zone` is present in `known_names`.
///
/// A single unknown name invalidates the whole zone. The problem is logged,
/// never raised.
pub fn validate(zone: &ZoneDefinition, known_names: &BTreeSet<String>) -> ZoneValidation {
    let mut seen = HashSet::new();
    let missing: Vec<String> = zone
        .municipalities
        .iter()
        .filter(|name| !known_names.contains(name.as_str()))
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect();

    if missing.is_empty() {
        ZoneValidation::Valid
    } else {
        log::warn!(
            "Missing municipalities for {}: {}",
            zone.id,
            missing.join(", ")
        );
        ZoneValidation::Missing(missing)
    }
}
