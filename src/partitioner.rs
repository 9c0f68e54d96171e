use crate::config::ExtractorConfig;
use crate::error::ZoneExtractionError;
use crate::extractor::{extract, WrittenZone};
use crate::loader::{load_shapefile, MunicipalDataset};
use crate::validator::{validate, ZoneValidation};
use crate::zone::overlapping_municipalities;

/// A zone left out because some of its municipalities are not in the data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedZone {
    pub zone_id: String,
    pub missing: Vec<String>,
}

/// What happened to each zone, in registry order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    pub written: Vec<WrittenZone>,
    pub skipped: Vec<SkippedZone>,
}

/// Loads the shapefile once and writes one GeoJSON file per valid zone.
pub fn run(config: &ExtractorConfig) -> Result<RunReport, ZoneExtractionError> {
    log::info!("=== Starting zone extraction ===");
    let dataset = load_shapefile(&config.shapefile_path, &config.name_field)?;
    let report = partition_dataset(&dataset, config)?;
    log::info!(
        "=== Extraction complete: {} zone(s) written, {} skipped ===",
        report.written.len(),
        report.skipped.len()
    );
    Ok(report)
}

/// Validates then extracts every configured zone against an already loaded
/// dataset. A zone with any unknown municipality is skipped entirely and the
/// remaining zones still run; write failures abort immediately.
pub fn partition_dataset(
    dataset: &MunicipalDataset,
    config: &ExtractorConfig,
) -> Result<RunReport, ZoneExtractionError> {
    for (name, zone_ids) in overlapping_municipalities(&config.zones) {
        log::warn!(
            "Municipality {name} is assigned to several zones: {}",
            zone_ids.join(", ")
        );
    }

    let known_names = dataset.names();
    let mut report = RunReport::default();
    for zone in &config.zones {
        match validate(zone, &known_names) {
            ZoneValidation::Missing(missing) => {
                report.skipped.push(SkippedZone {
                    zone_id: zone.id.clone(),
                    missing,
                });
            }
            ZoneValidation::Valid => {
                let written = extract(zone, dataset, config)?;
                log::info!(
                    "Written {} with {} features to {}",
                    written.zone_id,
                    written.feature_count,
                    written.path.display()
                );
                report.written.push(written);
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MunicipalRecord;
    use crate::zone::ZoneDefinition;
    use geo::{polygon, Geometry};
    use std::fs;
    use std::path::Path;

    fn record(name: &str, x: f64) -> MunicipalRecord {
        MunicipalRecord::new(
            name,
            Geometry::Polygon(polygon![
                (x: x, y: 0.0),
                (x: x + 1.0, y: 0.0),
                (x: x + 1.0, y: 1.0),
                (x: x, y: 1.0),
            ]),
            "MUS_NM_MUN",
        )
    }

    fn montreal_dataset() -> MunicipalDataset {
        MunicipalDataset::new(vec![
            record("Montréal", 0.0),
            record("Laval", 2.0),
            record("Unknown Town", 4.0),
        ])
    }

    fn config(dir: &Path, zones: Vec<ZoneDefinition>) -> ExtractorConfig {
        ExtractorConfig {
            destination_path: dir.to_path_buf(),
            zones,
            ..ExtractorConfig::default()
        }
    }

    #[test]
    fn invalid_zone_is_skipped_entirely() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(
            dir.path(),
            vec![
                ZoneDefinition::new("artm_zone_a", ["Montréal"]),
                ZoneDefinition::new("artm_zone_b", ["Laval", "Ghost City"]),
            ],
        );

        let report = partition_dataset(&montreal_dataset(), &config).unwrap();

        assert_eq!(report.written.len(), 1);
        assert_eq!(report.written[0].zone_id, "artm_zone_a");
        assert_eq!(report.written[0].feature_count, 1);
        assert_eq!(
            report.skipped,
            vec![SkippedZone {
                zone_id: "artm_zone_b".into(),
                missing: vec!["Ghost City".into()],
            }]
        );
        assert!(dir.path().join("artm_zone_a.geojson").exists());
        assert!(!dir.path().join("artm_zone_b.geojson").exists());
    }

    #[test]
    fn empty_dataset_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), crate::zone::artm_zones());

        let report = partition_dataset(&MunicipalDataset::default(), &config).unwrap();

        assert!(report.written.is_empty());
        assert_eq!(report.skipped.len(), 4);
        for (skipped, zone) in report.skipped.iter().zip(&config.zones) {
            assert_eq!(skipped.zone_id, zone.id);
            assert_eq!(skipped.missing, zone.municipalities);
        }
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn overlapping_municipality_lands_in_both_zones() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(
            dir.path(),
            vec![
                ZoneDefinition::new("west", ["Montréal", "Laval"]),
                ZoneDefinition::new("north", ["Laval"]),
            ],
        );

        let report = partition_dataset(&montreal_dataset(), &config).unwrap();

        let counts: Vec<_> = report
            .written
            .iter()
            .map(|w| (w.zone_id.as_str(), w.feature_count))
            .collect();
        assert_eq!(counts, vec![("west", 2), ("north", 1)]);
        let north = fs::read_to_string(dir.path().join("north.geojson")).unwrap();
        assert!(north.contains("Laval"));
    }

    #[test]
    fn repeated_runs_are_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(
            dir.path(),
            vec![ZoneDefinition::new("artm_zone_a", ["Montréal", "Laval"])],
        );
        let dataset = montreal_dataset();
        let path = dir.path().join("artm_zone_a.geojson");

        partition_dataset(&dataset, &config).unwrap();
        let first = fs::read(&path).unwrap();
        partition_dataset(&dataset, &config).unwrap();
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn missing_shapefile_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExtractorConfig {
            shapefile_path: dir.path().join("absent.shp"),
            ..config(dir.path(), crate::zone::artm_zones())
        };
        let err = run(&config).unwrap_err();
        assert!(matches!(err, ZoneExtractionError::ShapefileError { .. }));
    }
}
