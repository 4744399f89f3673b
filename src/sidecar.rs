//! End-to-end sidecar loading: retrieve, parse, build.

use std::fmt;
use std::str::FromStr;

use crate::builder::build_control_points;
use crate::error::AuxGcpError;
use crate::ir::{io_aux_json, io_aux_xml, ControlPointSet, RawGeoreferenceBlock};
use crate::retrieve::{sidecar_location, Retrieve};

/// Document shape of a sidecar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SidecarFormat {
    /// The `*.aux.xml` file as written by GIS tools.
    #[default]
    AuxXml,
    /// The same document after generic XML-to-JSON conversion.
    AuxJson,
}

impl FromStr for SidecarFormat {
    type Err = AuxGcpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aux-xml" | "xml" => Ok(SidecarFormat::AuxXml),
            "aux-json" | "json" => Ok(SidecarFormat::AuxJson),
            other => Err(AuxGcpError::UnsupportedFormat(format!(
                "'{other}' (supported: aux-xml, aux-json)"
            ))),
        }
    }
}

impl fmt::Display for SidecarFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SidecarFormat::AuxXml => write!(f, "aux-xml"),
            SidecarFormat::AuxJson => write!(f, "aux-json"),
        }
    }
}

/// Parses already-retrieved sidecar text.
pub fn parse_sidecar(
    text: &str,
    location: &str,
    format: SidecarFormat,
) -> Result<RawGeoreferenceBlock, AuxGcpError> {
    match format {
        SidecarFormat::AuxXml => io_aux_xml::parse_aux_xml_str(text, location),
        SidecarFormat::AuxJson => io_aux_json::parse_aux_json_str(text, location),
    }
}

/// Retrieves and parses the sidecar at `location`.
pub fn load_raw_block(
    retriever: &impl Retrieve,
    location: &str,
    format: SidecarFormat,
) -> Result<RawGeoreferenceBlock, AuxGcpError> {
    let text = retriever.retrieve(location)?;
    tracing::debug!(location, bytes = text.len(), %format, "retrieved sidecar");
    parse_sidecar(&text, location, format)
}

/// Retrieves an `*.aux.xml` sidecar and returns its control points.
///
/// # Errors
/// Any of the retrieval, parse, or build errors; no partial result is ever
/// returned.
pub fn auxiliary_xml_to_control_points(
    retriever: &impl Retrieve,
    location: &str,
) -> Result<ControlPointSet, AuxGcpError> {
    load_control_points(retriever, location, SidecarFormat::AuxXml)
}

/// Retrieves a sidecar of the given format and returns its control points.
pub fn load_control_points(
    retriever: &impl Retrieve,
    location: &str,
    format: SidecarFormat,
) -> Result<ControlPointSet, AuxGcpError> {
    let block = load_raw_block(retriever, location, format)?;
    let set = build_control_points(&block)?;
    tracing::info!(
        location,
        control_points = set.len(),
        wkid = set.spatial_reference().wkid,
        "loaded control points"
    );
    Ok(set)
}

/// Loads control points for an image from the sidecar stored next to it.
pub fn control_points_for_image(
    retriever: &impl Retrieve,
    image_location: &str,
) -> Result<ControlPointSet, AuxGcpError> {
    auxiliary_xml_to_control_points(retriever, &sidecar_location(image_location))
}
