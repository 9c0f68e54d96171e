use crate::error::ZoneExtractionError;
use geo::{Geometry, MultiPolygon};
use serde_json::{Map, Value};
use shapefile::dbase::{FieldValue, Record};
use shapefile::Shape;
use std::collections::BTreeSet;
use std::path::Path;

/// One row of the municipal boundary dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct MunicipalRecord {
    /// `None` when the name column is empty for this row
    pub name: Option<String>,
    /// `None` for null shapes
    pub geometry: Option<Geometry<f64>>,
    /// every dBase attribute of the row, name column included
    pub properties: Map<String, Value>,
}

impl MunicipalRecord {
    pub fn new(name: &str, geometry: Geometry<f64>, name_field: &str) -> Self {
        let mut properties = Map::new();
        properties.insert(name_field.to_string(), Value::String(name.to_string()));
        Self {
            name: Some(name.to_string()),
            geometry: Some(geometry),
            properties,
        }
    }
}

/// Municipal records in file order. Never modified once loaded.
#[derive(Clone, Debug, Default)]
pub struct MunicipalDataset {
    records: Vec<MunicipalRecord>,
}

impl MunicipalDataset {
    pub fn new(records: Vec<MunicipalRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[MunicipalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct municipality names present in the dataset.
    pub fn names(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .filter_map(|r| r.name.clone())
            .collect()
    }
}

/// Reads a polygon shapefile (and its .dbf) into memory.
pub fn load_shapefile(path: &Path, name_field: &str) -> Result<MunicipalDataset, ZoneExtractionError> {
    log::info!("Loading file: {}", path.display());
    let rows = shapefile::read(path).map_err(|source| ZoneExtractionError::ShapefileError {
        path: path.to_path_buf(),
        source,
    })?;
    require_name_column(path, name_field)?;

    let mut records = Vec::with_capacity(rows.len());
    for (row, (shape, record)) in rows.into_iter().enumerate() {
        let geometry = convert_shape(shape, row)?;
        let name = read_name(&record, name_field, row)?;
        records.push(MunicipalRecord {
            name,
            geometry,
            properties: record_properties(record),
        });
    }

    let dataset = MunicipalDataset::new(records);
    log::info!(
        "Loaded {} records ({} distinct municipalities) from {}",
        dataset.len(),
        dataset.names().len(),
        path.display()
    );
    Ok(dataset)
}

// the column must be declared even when the table has no rows
fn require_name_column(path: &Path, name_field: &str) -> Result<(), ZoneExtractionError> {
    let dbf_path = path.with_extension("dbf");
    let table = shapefile::dbase::Reader::from_path(&dbf_path).map_err(|source| {
        ZoneExtractionError::DbaseError {
            path: dbf_path.clone(),
            source,
        }
    })?;
    if table.fields().iter().any(|f| f.name() == name_field) {
        Ok(())
    } else {
        Err(ZoneExtractionError::MissingNameColumn {
            field: name_field.to_string(),
            path: dbf_path,
        })
    }
}

fn convert_shape(shape: Shape, row: usize) -> Result<Option<Geometry<f64>>, ZoneExtractionError> {
    let multi_polygon: MultiPolygon<f64> = match shape {
        Shape::NullShape => return Ok(None),
        Shape::Polygon(polygon) => polygon.try_into().map_err(|e| {
            ZoneExtractionError::GeometryConversion {
                row,
                message: format!("{e}"),
            }
        })?,
        Shape::PolygonM(polygon) => polygon.try_into().map_err(|e| {
            ZoneExtractionError::GeometryConversion {
                row,
                message: format!("{e}"),
            }
        })?,
        Shape::PolygonZ(polygon) => polygon.try_into().map_err(|e| {
            ZoneExtractionError::GeometryConversion {
                row,
                message: format!("{e}"),
            }
        })?,
        other => {
            return Err(ZoneExtractionError::UnsupportedShape {
                shape_type: other.shapetype().to_string(),
                row,
            })
        }
    };
    Ok(Some(collapse_single_part(multi_polygon)))
}

// single-part shapes come out as plain polygons
fn collapse_single_part(mut multi_polygon: MultiPolygon<f64>) -> Geometry<f64> {
    if multi_polygon.0.len() == 1 {
        Geometry::Polygon(multi_polygon.0.remove(0))
    } else {
        Geometry::MultiPolygon(multi_polygon)
    }
}

fn read_name(record: &Record, name_field: &str, row: usize) -> Result<Option<String>, ZoneExtractionError> {
    let field = record
        .get(name_field)
        .ok_or_else(|| ZoneExtractionError::MissingNameField {
            field: name_field.to_string(),
            row,
        })?;
    match field {
        FieldValue::Character(name) => Ok(name.clone()),
        FieldValue::Memo(name) => Ok(Some(name.clone())),
        other => Err(ZoneExtractionError::UnexpectedNameType {
            field: name_field.to_string(),
            field_type: other.field_type().to_string(),
            row,
        }),
    }
}

fn record_properties(record: Record) -> Map<String, Value> {
    record
        .into_iter()
        .map(|(name, value)| (name, field_value_to_json(value)))
        .collect()
}

pub(crate) fn field_value_to_json(value: FieldValue) -> Value {
    match value {
        FieldValue::Character(s) => s.map(Value::String).unwrap_or(Value::Null),
        FieldValue::Memo(s) => Value::String(s),
        FieldValue::Numeric(n) => n.map(Value::from).unwrap_or(Value::Null),
        FieldValue::Float(f) => f.map(|f| Value::from(f as f64)).unwrap_or(Value::Null),
        FieldValue::Double(d) => Value::from(d),
        FieldValue::Currency(c) => Value::from(c),
        FieldValue::Integer(i) => Value::from(i),
        FieldValue::Logical(b) => b.map(Value::Bool).unwrap_or(Value::Null),
        FieldValue::Date(d) => d
            .map(|d| Value::String(format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day())))
            .unwrap_or(Value::Null),
        other => Value::String(format!("{other:?}")),
    }
}
