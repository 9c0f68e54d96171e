use crate::error::ZoneExtractionError;
use crate::zone::{artm_zones, ZoneDefinition};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_SHAPEFILE_PATH: &str = "BDAT(adm)_SHP/Bdat/SHP/munic_s.shp";
pub const DEFAULT_DESTINATION_PATH: &str = "../";
pub const DEFAULT_NAME_FIELD: &str = "MUS_NM_MUN";

/// Everything a run needs. Built once and only read afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub shapefile_path: PathBuf,
    pub destination_path: PathBuf,
    /// dBase column holding the municipality name
    pub name_field: String,
    pub pretty: bool,
    pub write_bbox: bool,
    pub zones: Vec<ZoneDefinition>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            shapefile_path: PathBuf::from(DEFAULT_SHAPEFILE_PATH),
            destination_path: PathBuf::from(DEFAULT_DESTINATION_PATH),
            name_field: String::from(DEFAULT_NAME_FIELD),
            pretty: true,
            write_bbox: false,
            zones: artm_zones(),
        }
    }
}

impl ExtractorConfig {
    pub fn output_path(&self, zone: &ZoneDefinition) -> PathBuf {
        self.destination_path.join(format!("{}.geojson", zone.id))
    }
}

impl TryFrom<&Path> for ExtractorConfig {
    type Error = ZoneExtractionError;

    fn try_from(f: &Path) -> Result<Self, Self::Error> {
        let extension = f.extension().and_then(|e| e.to_str()).unwrap_or_default();
        let read = || {
            std::fs::read_to_string(f).map_err(|e| {
                ZoneExtractionError::ConfigurationError(format!(
                    "failure reading {}: {e}",
                    f.display()
                ))
            })
        };
        match extension {
            "toml" => toml::from_str(&read()?).map_err(|e| {
                ZoneExtractionError::ConfigurationError(format!(
                    "failure decoding {}: {e}",
                    f.display()
                ))
            }),
            "json" => serde_json::from_str(&read()?).map_err(|e| {
                ZoneExtractionError::ConfigurationError(format!(
                    "failure decoding {}: {e}",
                    f.display()
                ))
            }),
            _ => Err(ZoneExtractionError::ConfigurationError(format!(
                "unsupported file type: {}",
                f.display()
            ))),
        }
    }
}
