use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort the whole run. Zones with unknown municipalities are
/// not errors, see [`crate::validator::ZoneValidation`].
#[derive(Error, Debug)]
pub enum ZoneExtractionError {
    #[error("failure reading run configuration: {0}")]
    ConfigurationError(String),
    #[error("failed reading shapefile '{}': {source}", .path.display())]
    ShapefileError {
        path: PathBuf,
        source: shapefile::Error,
    },
    #[error("failed reading attribute table '{}': {source}", .path.display())]
    DbaseError {
        path: PathBuf,
        source: shapefile::dbase::Error,
    },
    #[error("attribute table '{}' has no field '{field}'", .path.display())]
    MissingNameColumn { field: String, path: PathBuf },
    #[error("field '{field}' missing from shapefile record {row}")]
    MissingNameField { field: String, row: usize },
    #[error("field '{field}' has unexpected field type '{field_type}' at row {row}")]
    UnexpectedNameType {
        field: String,
        field_type: String,
        row: usize,
    },
    #[error("unexpected shape type {shape_type} found at row {row}, must be polygonal")]
    UnsupportedShape { shape_type: String, row: usize },
    #[error("failed to convert shapefile polygon at row {row}: {message}")]
    GeometryConversion { row: usize, message: String },
    #[error("failed writing '{}': {source}", .path.display())]
    OutputError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failure encoding GeoJSON: {source}")]
    SerdeJsonError {
        #[from]
        source: serde_json::Error,
    },
}
