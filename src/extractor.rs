use crate::config::ExtractorConfig;
use crate::error::ZoneExtractionError;
use crate::loader::{MunicipalDataset, MunicipalRecord};
use crate::zone::ZoneDefinition;
use geo::algorithm::bounding_rect::BoundingRect;
use geojson::{Feature, FeatureCollection, Geometry as GeoJsonGeometry, JsonObject};
use serde_json::Value;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Records of one zone, borrowed from the dataset in dataset order.
pub struct ZoneExtract<'a> {
    pub zone: &'a ZoneDefinition,
    pub records: Vec<&'a MunicipalRecord>,
}

/// A zone file that made it to disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrittenZone {
    pub zone_id: String,
    pub path: PathBuf,
    pub feature_count: usize,
}

pub fn select<'a>(zone: &'a ZoneDefinition, dataset: &'a MunicipalDataset) -> ZoneExtract<'a> {
    let members = zone.municipality_set();
    let records = dataset
        .records()
        .iter()
        .filter(|r| r.name.as_deref().is_some_and(|n| members.contains(n)))
        .collect();
    ZoneExtract { zone, records }
}

/// Writes the zone's records to `<destination>/<zone id>.geojson`,
/// replacing any previous file. Geometries are written as loaded.
pub fn extract(
    zone: &ZoneDefinition,
    dataset: &MunicipalDataset,
    config: &ExtractorConfig,
) -> Result<WrittenZone, ZoneExtractionError> {
    let selected = select(zone, dataset);
    log::debug!(
        "Selected {} of {} records for {}",
        selected.records.len(),
        dataset.len(),
        zone.id
    );

    let output_dir = config.destination_path.as_path();
    create_dir_all(output_dir).map_err(|source| ZoneExtractionError::OutputError {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let output_path = config.output_path(zone);
    let collection = to_feature_collection(&selected, config.write_bbox);
    write_collection(&collection, &output_path, config.pretty)?;

    Ok(WrittenZone {
        zone_id: zone.id.clone(),
        path: output_path,
        feature_count: selected.records.len(),
    })
}

fn to_feature_collection(extract: &ZoneExtract, write_bbox: bool) -> FeatureCollection {
    let features: Vec<Feature> = extract.records.iter().map(|r| to_feature(r)).collect();

    let mut foreign_members = JsonObject::new();
    foreign_members.insert("name".to_string(), Value::String(extract.zone.id.clone()));

    FeatureCollection {
        bbox: if write_bbox {
            collection_bbox(&extract.records)
        } else {
            None
        },
        features,
        foreign_members: Some(foreign_members),
    }
}

fn to_feature(record: &MunicipalRecord) -> Feature {
    Feature {
        bbox: None,
        geometry: record.geometry.as_ref().map(GeoJsonGeometry::from),
        id: None,
        properties: Some(record.properties.clone()),
        foreign_members: None,
    }
}

fn collection_bbox(records: &[&MunicipalRecord]) -> Option<Vec<f64>> {
    let mut bounds: Option<(f64, f64, f64, f64)> = None;
    for rect in records
        .iter()
        .filter_map(|r| r.geometry.as_ref())
        .filter_map(|g| g.bounding_rect())
    {
        let (min, max) = (rect.min(), rect.max());
        bounds = Some(match bounds {
            None => (min.x, min.y, max.x, max.y),
            Some((min_x, min_y, max_x, max_y)) => (
                min_x.min(min.x),
                min_y.min(min.y),
                max_x.max(max.x),
                max_y.max(max.y),
            ),
        });
    }
    bounds.map(|(min_x, min_y, max_x, max_y)| vec![min_x, min_y, max_x, max_y])
}

fn write_collection(
    collection: &FeatureCollection,
    output_path: &Path,
    pretty: bool,
) -> Result<(), ZoneExtractionError> {
    let io_error = |source: std::io::Error| ZoneExtractionError::OutputError {
        path: output_path.to_path_buf(),
        source,
    };
    let file = File::create(output_path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, collection)?;
    } else {
        serde_json::to_writer(&mut writer, collection)?;
    }
    writer.flush().map_err(io_error)?;
    Ok(())
}
