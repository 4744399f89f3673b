//! Reader for sidecars already converted from XML to JSON.
//!
//! Generic XML-to-object converters turn a PAM sidecar into a nested object
//! tree where:
//! - repeated elements become arrays, but a single element stays a scalar
//!   or object (`Metadata` and `Double` can be either);
//! - numeric text becomes a JSON number unless it has more precision than a
//!   double can round-trip, in which case it stays a string.
//!
//! The reader accepts both shapes and hands values to the shared
//! normalization step as [`RawValue`]s.
//!
//! One difference from the XML reader: a bare JSON number outside the `f64`
//! range (`1e400`) is rejected by the JSON parser itself, so it surfaces as
//! [`AuxGcpError::MalformedDocument`] with a line and column rather than as
//! [`AuxGcpError::NumericFormat`] with an array index. The same value as a
//! JSON string is attributed per value, like in XML.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use super::metadata::{self, GeodataXformEntry, MetadataEntry, RawValue};
use super::model::RawGeoreferenceBlock;
use crate::error::AuxGcpError;

const MEMORY_LOCATION: &str = "<memory>";
const DOMAIN_ATTRIBUTE_KEYS: [&str; 2] = ["@_domain", "@domain"];

/// Read a converted sidecar from disk.
pub fn read_aux_json(path: &Path) -> Result<RawGeoreferenceBlock, AuxGcpError> {
    let location = path.display().to_string();
    let json = fs::read_to_string(path).map_err(|source| AuxGcpError::Retrieval {
        location: location.clone(),
        message: source.to_string(),
    })?;
    parse_aux_json_str(&json, &location)
}

/// Parse a converted sidecar from a string.
pub fn from_aux_json_str(json: &str) -> Result<RawGeoreferenceBlock, AuxGcpError> {
    parse_aux_json_str(json, MEMORY_LOCATION)
}

/// Parse a converted sidecar from bytes.
pub fn from_aux_json_slice(bytes: &[u8]) -> Result<RawGeoreferenceBlock, AuxGcpError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|source| AuxGcpError::malformed(MEMORY_LOCATION, source.to_string()))?;
    raw_block_from_value(&value, MEMORY_LOCATION)
}

/// Parse a converted sidecar, naming `location` in any error.
pub fn parse_aux_json_str(
    json: &str,
    location: &str,
) -> Result<RawGeoreferenceBlock, AuxGcpError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|source| AuxGcpError::malformed(location, source.to_string()))?;
    raw_block_from_value(&value, location)
}

fn raw_block_from_value(
    value: &Value,
    location: &str,
) -> Result<RawGeoreferenceBlock, AuxGcpError> {
    let entries = metadata_entries(value, location)?;
    metadata::raw_block_from_entries(&entries, location)
}

fn metadata_entries(value: &Value, location: &str) -> Result<Vec<MetadataEntry>, AuxGcpError> {
    let dataset = value
        .get("PAMDataset")
        .and_then(Value::as_object)
        .ok_or_else(|| AuxGcpError::malformed(location, "missing \"PAMDataset\" object"))?;

    let entries = match dataset.get("Metadata") {
        None | Some(Value::Null) => Vec::new(),
        Some(metadata) => one_or_many(metadata)
            .into_iter()
            .map(|entry| metadata_entry(entry, location))
            .collect::<Result<_, _>>()?,
    };

    Ok(entries)
}

fn metadata_entry(entry: &Value, location: &str) -> Result<MetadataEntry, AuxGcpError> {
    // Text-only <Metadata/> elements convert to strings; they cannot hold a transform.
    let Some(entry) = entry.as_object() else {
        return Ok(MetadataEntry::Other { domain: None });
    };

    match entry.get("GeodataXform") {
        Some(xform) => {
            let xform = xform.as_object().ok_or_else(|| {
                AuxGcpError::malformed(location, "\"GeodataXform\" is not an object")
            })?;
            Ok(MetadataEntry::GeodataXform(geodata_xform(xform)))
        }
        None => Ok(MetadataEntry::Other {
            domain: DOMAIN_ATTRIBUTE_KEYS
                .iter()
                .find_map(|key| entry.get(*key).and_then(Value::as_str))
                .map(ToOwned::to_owned),
        }),
    }
}

fn geodata_xform(xform: &Map<String, Value>) -> GeodataXformEntry {
    let spatial_reference = xform.get("SpatialReference").and_then(Value::as_object);

    GeodataXformEntry {
        wkid: spatial_reference.and_then(|sr| sr.get("WKID")).and_then(raw_value),
        latest_wkid: spatial_reference
            .and_then(|sr| sr.get("LatestWKID"))
            .and_then(raw_value),
        wkt: spatial_reference
            .and_then(|sr| sr.get("WKT"))
            .and_then(Value::as_str)
            .map(ToOwned::to_owned),
        polynomial_order: xform.get("PolynomialOrder").and_then(raw_value),
        source_gcps: xform.get(metadata::SOURCE_ARRAY).map(double_values),
        target_gcps: xform.get(metadata::TARGET_ARRAY).map(double_values),
    }
}

/// Reads the `Double` children of a coordinate array container.
///
/// An empty container (`""` or `{}`) holds no values.
fn double_values(array: &Value) -> Vec<RawValue> {
    match array.get("Double") {
        None | Some(Value::Null) => Vec::new(),
        Some(doubles) => one_or_many(doubles)
            .into_iter()
            .map(|value| raw_value(value).unwrap_or_else(|| RawValue::Text(value.to_string())))
            .collect(),
    }
}

/// Maps a JSON scalar onto the adapter boundary type.
fn raw_value(value: &Value) -> Option<RawValue> {
    match value {
        Value::Number(number) => number.as_f64().map(RawValue::Number),
        Value::String(text) => Some(RawValue::Text(text.clone())),
        _ => None,
    }
}

fn one_or_many(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(values) => values.iter().collect(),
        other => vec![other],
    }
}
