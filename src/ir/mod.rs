//! Data model and document adapters for sidecar georeferencing.
//!
//! # Design Principles
//!
//! 1. **Type Safety**: Source (image) and target (world) coordinates carry a
//!    marker type so the two spaces cannot be mixed up.
//!
//! 2. **One normalization step**: Adapters never convert numbers themselves.
//!    They hand [`RawValue`]s to [`metadata`], which is the only place text
//!    becomes `f64`.
//!
//! 3. **Values only**: Nothing here holds state between calls.
//!
//! # Example
//!
//! ```
//! use auxgcp::ir::io_aux_xml::from_aux_xml_str;
//!
//! let xml = r#"<PAMDataset><Metadata><GeodataXform>
//!   <SpatialReference><WKID>6557</WKID></SpatialReference>
//!   <SourceGCPs><Double>16.0</Double><Double>0.63</Double></SourceGCPs>
//!   <TargetGCPs><Double>635883.59</Double><Double>1505281.15</Double></TargetGCPs>
//! </GeodataXform></Metadata></PAMDataset>"#;
//!
//! let block = from_aux_xml_str(xml).unwrap();
//! assert_eq!(block.spatial_reference.wkid, 6557);
//! assert_eq!(block.source_values, vec![16.0, 0.63]);
//! ```

mod coord;
pub mod io_aux_json;
pub mod io_aux_xml;
pub mod io_json;
pub mod metadata;
mod model;
mod space;

// Re-export core types for convenient access
pub use coord::Coord;
pub use metadata::{GeodataXformEntry, MetadataEntry, RawValue};
pub use model::{ControlPoint, ControlPointSet, RawGeoreferenceBlock, SpatialReference};
pub use space::{Source, Target};
