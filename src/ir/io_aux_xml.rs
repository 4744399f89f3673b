//! GDAL PAM sidecar (`*.aux.xml`) reader.
//!
//! Only the parts needed for ground control points are read:
//!
//! ```text
//! <PAMDataset>
//!   <Metadata domain="IMAGE_STRUCTURE">...</Metadata>
//!   <Metadata domain="xml:ESRI" format="xml">
//!     <GeodataXform>
//!       <PolynomialOrder>1</PolynomialOrder>
//!       <SpatialReference><WKID>102970</WKID><LatestWKID>6557</LatestWKID></SpatialReference>
//!       <SourceGCPs><Double>16.003</Double>...</SourceGCPs>
//!       <TargetGCPs><Double>635883.59</Double>...</TargetGCPs>
//!     </GeodataXform>
//!   </Metadata>
//! </PAMDataset>
//! ```
//!
//! Everything else in the document is ignored.

use std::fs;
use std::path::Path;

use roxmltree::Node;

use super::metadata::{self, GeodataXformEntry, MetadataEntry, RawValue};
use super::model::RawGeoreferenceBlock;
use crate::error::AuxGcpError;

const ROOT_TAG: &str = "PAMDataset";
const MEMORY_LOCATION: &str = "<memory>";

/// Read a sidecar file from disk.
pub fn read_aux_xml(path: &Path) -> Result<RawGeoreferenceBlock, AuxGcpError> {
    let location = path.display().to_string();
    let xml = fs::read_to_string(path).map_err(|source| AuxGcpError::Retrieval {
        location: location.clone(),
        message: source.to_string(),
    })?;
    parse_aux_xml_str(&xml, &location)
}

/// Parse sidecar XML from a UTF-8 string.
pub fn from_aux_xml_str(xml: &str) -> Result<RawGeoreferenceBlock, AuxGcpError> {
    parse_aux_xml_str(xml, MEMORY_LOCATION)
}

/// Parse sidecar XML from bytes.
///
/// The input must be valid UTF-8.
pub fn from_aux_xml_slice(bytes: &[u8]) -> Result<RawGeoreferenceBlock, AuxGcpError> {
    let xml = std::str::from_utf8(bytes).map_err(|source| {
        AuxGcpError::malformed(MEMORY_LOCATION, format!("input is not valid UTF-8: {source}"))
    })?;
    from_aux_xml_str(xml)
}

/// Parse sidecar XML, naming `location` in any error.
pub fn parse_aux_xml_str(xml: &str, location: &str) -> Result<RawGeoreferenceBlock, AuxGcpError> {
    let entries = parse_metadata_entries(xml, location)?;
    metadata::raw_block_from_entries(&entries, location)
}

/// Lower every `<Metadata>` child of the root into a typed entry.
pub fn parse_metadata_entries(
    xml: &str,
    location: &str,
) -> Result<Vec<MetadataEntry>, AuxGcpError> {
    let document = roxmltree::Document::parse(xml)
        .map_err(|source| AuxGcpError::malformed(location, source.to_string()))?;

    let root = document.root_element();
    if root.tag_name().name() != ROOT_TAG {
        return Err(AuxGcpError::malformed(
            location,
            format!(
                "missing <{ROOT_TAG}> root element (found <{}>)",
                root.tag_name().name()
            ),
        ));
    }

    Ok(child_elements(root, "Metadata")
        .map(|metadata| match child_element(metadata, "GeodataXform") {
            Some(xform) => MetadataEntry::GeodataXform(parse_geodata_xform(xform)),
            None => MetadataEntry::Other {
                domain: metadata.attribute("domain").map(ToOwned::to_owned),
            },
        })
        .collect())
}

fn parse_geodata_xform(xform: Node<'_, '_>) -> GeodataXformEntry {
    let spatial_reference = child_element(xform, "SpatialReference");

    GeodataXformEntry {
        wkid: spatial_reference.and_then(|node| optional_child_value(node, "WKID")),
        latest_wkid: spatial_reference.and_then(|node| optional_child_value(node, "LatestWKID")),
        wkt: spatial_reference.and_then(|node| optional_child_text(node, "WKT")),
        polynomial_order: optional_child_value(xform, "PolynomialOrder"),
        source_gcps: child_element(xform, metadata::SOURCE_ARRAY).map(double_values),
        target_gcps: child_element(xform, metadata::TARGET_ARRAY).map(double_values),
    }
}

/// Collects `<Double>` children in document order.
///
/// Empty elements are kept as empty text so they fail normalization instead
/// of silently shifting the pairing.
fn double_values(array: Node<'_, '_>) -> Vec<RawValue> {
    child_elements(array, "Double")
        .map(|double| RawValue::Text(double.text().unwrap_or_default().to_string()))
        .collect()
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

fn child_elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |child| child.is_element() && child.tag_name().name() == tag)
}

fn optional_child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    child_element(node, tag)
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}

fn optional_child_value(node: Node<'_, '_>, tag: &str) -> Option<RawValue> {
    optional_child_text(node, tag).map(RawValue::Text)
}
