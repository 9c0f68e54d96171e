use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A named group of municipalities written out as one GeoJSON file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneDefinition {
    pub id: String,
    pub municipalities: Vec<String>,
}

impl ZoneDefinition {
    pub fn new<I, S>(id: &str, municipalities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.to_string(),
            municipalities: municipalities.into_iter().map(Into::into).collect(),
        }
    }

    /// Membership is exact string equality, no normalization.
    pub fn municipality_set(&self) -> HashSet<&str> {
        self.municipalities.iter().map(String::as_str).collect()
    }
}

/// Returns every municipality listed by more than one zone, with the ids of
/// the zones listing it (registry order).
pub fn overlapping_municipalities(zones: &[ZoneDefinition]) -> BTreeMap<String, Vec<String>> {
    let mut assignments: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for zone in zones {
        for name in zone.municipality_set() {
            assignments
                .entry(name.to_string())
                .or_default()
                .push(zone.id.clone());
        }
    }
    assignments.retain(|_, ids| ids.len() > 1);
    assignments
}

const ARTM_ZONE_A: &[&str] = &[
    "Baie-D'Urfé",
    "Beaconsfield",
    "Côte-Saint-Luc",
    "Dollard-des-Ormeaux",
    "Dorval",
    "Hampstead",
    "Kirkland",
    "L'Île-Dorval",
    "Montréal",
    "Montréal-Est",
    "Montréal-Ouest",
    "Mont-Royal",
    "Pointe-Claire",
    "Sainte-Anne-de-Bellevue",
    "Senneville",
    "Westmount",
];

const ARTM_ZONE_B: &[&str] = &[
    "Boucherville",
    "Brossard",
    "Laval",
    "Longueuil",
    "Saint-Bruno-de-Montarville",
    "Saint-Lambert",
];

const ARTM_ZONE_C: &[&str] = &[
    "Blainville",
    "Boisbriand",
    "Bois-des-Filion",
    "Charlemagne",
    "Deux-Montagnes",
    "L'Assomption",
    "Lorraine",
    "Mascouche",
    "Mirabel",
    "Oka",
    "Pointe-Calumet",
    "Repentigny",
    "Rosemère",
    "Sainte-Anne-des-Plaines",
    "Sainte-Marthe-sur-le-Lac",
    "Sainte-Thérèse",
    "Saint-Eustache",
    "Saint-Jérôme",
    "Saint-Joseph-du-Lac",
    "Saint-Sulpice",
    "Terrebonne",
    "Beauharnois",
    "Beloeil",
    "Candiac",
    "Carignan",
    "Chambly",
    "Châteauguay",
    "Contrecoeur",
    "Delson",
    "Hudson",
    "Kahnawake",
    "La Prairie",
    "Léry",
    "L'Île-Perrot",
    "McMasterville",
    "Mercier",
    "Mont-Saint-Hilaire",
    "Notre-Dame-de-l'Île-Perrot",
    "Otterburn Park",
    "Pincourt",
    "Richelieu",
    "Saint-Amable",
    "Saint-Basile-le-Grand",
    "Saint-Constant",
    "Sainte-Catherine",
    "Sainte-Julie",
    "Saint-Lazare",
    "Saint-Mathias-sur-Richelieu",
    "Saint-Mathieu-de-Beloeil",
    "Saint-Philippe",
    "Terrasse-Vaudreuil",
    "Varennes",
    "Vaudreuil-Dorion",
    "Verchères",
];

const ARTM_ZONE_D: &[&str] = &[
    "L'Épiphanie",
    "Marieville",
    "Rigaud",
    "Sainte-Madeleine",
    "Sainte-Marie-Madeleine",
    "Sainte-Martine",
    "Saint-Hyacinthe",
    "Saint-Placide",
];

/// The four ARTM fare zones of the greater Montréal area.
pub fn artm_zones() -> Vec<ZoneDefinition> {
    vec![
        ZoneDefinition::new("artm_zone_a", ARTM_ZONE_A.iter().copied()),
        ZoneDefinition::new("artm_zone_b", ARTM_ZONE_B.iter().copied()),
        ZoneDefinition::new("artm_zone_c", ARTM_ZONE_C.iter().copied()),
        ZoneDefinition::new("artm_zone_d", ARTM_ZONE_D.iter().copied()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artm_registry_order() {
        let ids: Vec<_> = artm_zones().into_iter().map(|z| z.id).collect();
        assert_eq!(
            ids,
            vec!["artm_zone_a", "artm_zone_b", "artm_zone_c", "artm_zone_d"]
        );
    }

    #[test]
    fn artm_zones_are_disjoint() {
        let overlaps = overlapping_municipalities(&artm_zones());
        assert!(overlaps.is_empty(), "overlapping names: {overlaps:?}");
    }

    #[test]
    fn artm_zone_lists_have_no_duplicates() {
        for zone in artm_zones() {
            assert_eq!(
                zone.municipality_set().len(),
                zone.municipalities.len(),
                "duplicate name in {}",
                zone.id
            );
        }
    }

    #[test]
    fn overlap_is_reported_with_every_zone() {
        let zones = vec![
            ZoneDefinition::new("north", ["Laval", "Mirabel"]),
            ZoneDefinition::new("south", ["Longueuil"]),
            ZoneDefinition::new("west", ["Mirabel", "Oka"]),
        ];
        let overlaps = overlapping_municipalities(&zones);
        assert_eq!(overlaps.len(), 1);
        assert_eq!(
            overlaps.get("Mirabel"),
            Some(&vec!["north".to_string(), "west".to_string()])
        );
    }

    #[test]
    fn membership_uses_exact_equality() {
        let zone = ZoneDefinition::new("a", ["Montréal"]);
        let members = zone.municipality_set();
        assert!(members.contains("Montréal"));
        assert!(!members.contains("Montreal"));
        assert!(!members.contains("montréal"));
        assert!(!members.contains("Montréal "));
    }
}
