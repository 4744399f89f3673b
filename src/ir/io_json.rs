//! JSON output for control point sets.
//!
//! The layout mirrors the in-memory model:
//!
//! ```json
//! {
//!   "spatial_reference": { "wkid": 6557 },
//!   "control_points": [
//!     { "source_point": { "x": 16.0, "y": -0.63 },
//!       "target_point": { "x": 635883.59, "y": 1505281.15 } }
//!   ]
//! }
//! ```

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use super::model::ControlPointSet;
use crate::error::AuxGcpError;

/// Writes a control point set to a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_control_points_json(path: &Path, set: &ControlPointSet) -> Result<(), AuxGcpError> {
    let file = File::create(path).map_err(AuxGcpError::Io)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, set).map_err(|source| AuxGcpError::JsonWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a control point set to a JSON string.
pub fn to_json_string(set: &ControlPointSet) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_control_points;
    use crate::ir::{RawGeoreferenceBlock, SpatialReference};

    fn sample_set() -> ControlPointSet {
        let block = RawGeoreferenceBlock::new(
            SpatialReference::from_wkid(6557),
            vec![16.0, 0.63, 16.7, 16.36],
            vec![635883.59, 1505281.15, 636166.84, 1511639.65],
        );
        build_control_points(&block).expect("build control points")
    }

    #[test]
    fn test_json_format() {
        let json = to_json_string(&sample_set()).expect("serialization failed");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["spatial_reference"]["wkid"], 6557);
        assert_eq!(value["control_points"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["control_points"][0]["source_point"]["y"], -0.63);
        assert_eq!(value["control_points"][1]["target_point"]["x"], 636166.84);
        assert!(value.get("polynomial_order").is_none());
    }

    #[test]
    fn test_write_to_file() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("gcps.json");

        write_control_points_json(&path, &sample_set()).expect("write json");

        let written = std::fs::read_to_string(&path).expect("read back");
        assert!(written.contains("\"control_points\""));
        assert!(written.contains("\"wkid\": 6557"));
    }
}
