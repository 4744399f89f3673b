//! Typed view of the `<Metadata>` entries in a PAM sidecar.
//!
//! Both input adapters (XML and converted JSON) lower the document into a
//! list of [`MetadataEntry`] values. Picking the georeferencing entry and
//! normalizing its values into a [`RawGeoreferenceBlock`] happens here, once,
//! regardless of which adapter produced the entries.

use super::model::{RawGeoreferenceBlock, SpatialReference};
use crate::error::AuxGcpError;

/// Name of the source control point array, used in error reports.
pub const SOURCE_ARRAY: &str = "SourceGCPs";
/// Name of the target control point array, used in error reports.
pub const TARGET_ARRAY: &str = "TargetGCPs";

/// A scalar as handed over by a document adapter.
///
/// Generic document converters keep high-precision numbers as text to avoid
/// rounding them, so a coordinate can show up as either form.
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Converts the value to a finite `f64`.
    ///
    /// Numbers pass through unchanged; text is trimmed and parsed as a
    /// decimal. Returns `None` for anything else, including text that spells
    /// out NaN or infinity.
    pub fn normalize(&self) -> Option<f64> {
        let value = match self {
            RawValue::Number(value) => *value,
            RawValue::Text(text) => text.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    /// Interprets the value as a non-negative integer code.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            RawValue::Number(value) => {
                let in_range = *value >= 0.0 && *value <= f64::from(u32::MAX);
                (in_range && value.fract() == 0.0).then_some(*value as u32)
            }
            RawValue::Text(text) => text.trim().parse::<u32>().ok(),
        }
    }

    fn display(&self) -> String {
        match self {
            RawValue::Number(value) => value.to_string(),
            RawValue::Text(text) => text.clone(),
        }
    }
}

/// One `<Metadata>` element of a sidecar.
#[derive(Clone, Debug, PartialEq)]
pub enum MetadataEntry {
    /// The entry carrying the ground control point transform.
    GeodataXform(GeodataXformEntry),
    /// Any other metadata domain (image structure, statistics, ...).
    Other { domain: Option<String> },
}

impl MetadataEntry {
    pub fn as_geodata_xform(&self) -> Option<&GeodataXformEntry> {
        match self {
            MetadataEntry::GeodataXform(entry) => Some(entry),
            MetadataEntry::Other { .. } => None,
        }
    }
}

/// Contents of a `<GeodataXform>` element, values not yet normalized.
///
/// Missing children are `None` so the adapter stays permissive; the checks
/// happen in [`GeodataXformEntry::to_raw_block`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeodataXformEntry {
    pub wkid: Option<RawValue>,
    pub latest_wkid: Option<RawValue>,
    pub wkt: Option<String>,
    pub polynomial_order: Option<RawValue>,
    pub source_gcps: Option<Vec<RawValue>>,
    pub target_gcps: Option<Vec<RawValue>>,
}

impl GeodataXformEntry {
    /// Normalizes the entry into a [`RawGeoreferenceBlock`].
    ///
    /// `location` names the document in error messages.
    pub fn to_raw_block(&self, location: &str) -> Result<RawGeoreferenceBlock, AuxGcpError> {
        let spatial_reference = self.spatial_reference(location)?;

        let source_values = normalize_values(
            required_array(self.source_gcps.as_deref(), location, SOURCE_ARRAY)?,
            location,
            SOURCE_ARRAY,
        )?;
        let target_values = normalize_values(
            required_array(self.target_gcps.as_deref(), location, TARGET_ARRAY)?,
            location,
            TARGET_ARRAY,
        )?;

        let polynomial_order = match &self.polynomial_order {
            None => None,
            Some(raw) => match raw.as_u32() {
                Some(order) => Some(order),
                None => {
                    tracing::warn!(
                        location,
                        value = %raw.display(),
                        "ignoring unreadable <PolynomialOrder>"
                    );
                    None
                }
            },
        };

        let block = RawGeoreferenceBlock {
            spatial_reference,
            source_values,
            target_values,
            polynomial_order,
        };
        block
            .check_shape()
            .map_err(|message| AuxGcpError::malformed(location, message))?;

        Ok(block)
    }

    /// Resolves the usable spatial reference code.
    ///
    /// `LatestWKID` wins over `WKID` when both are present; the other one is
    /// kept as the legacy code. An unreadable code is skipped with a warning
    /// as long as the other one is usable.
    fn spatial_reference(&self, location: &str) -> Result<SpatialReference, AuxGcpError> {
        let wkid = parse_code(self.wkid.as_ref(), location, "WKID");
        let latest = parse_code(self.latest_wkid.as_ref(), location, "LatestWKID");

        let (latest, wkid) = match (latest, wkid) {
            (Err(err), Ok(Some(wkid))) => {
                tracing::warn!(location, error = %err, "ignoring unreadable <LatestWKID>");
                (None, Some(wkid))
            }
            (Ok(Some(latest)), Err(err)) => {
                tracing::warn!(location, error = %err, "ignoring unreadable <WKID>");
                (Some(latest), None)
            }
            (latest, wkid) => (latest?, wkid?),
        };

        let (wkid, legacy_wkid) = match (latest, wkid) {
            (Some(latest), Some(wkid)) if latest != wkid => (latest, Some(wkid)),
            (Some(latest), _) => (latest, None),
            (None, Some(wkid)) => (wkid, None),
            (None, None) => {
                return Err(AuxGcpError::malformed(
                    location,
                    "missing <WKID> or <LatestWKID> in <SpatialReference>",
                ))
            }
        };

        Ok(SpatialReference {
            wkid,
            legacy_wkid,
            wkt: self.wkt.clone(),
        })
    }
}

/// Finds the georeferencing entry by its shape, not its position.
pub fn find_geodata_xform(entries: &[MetadataEntry]) -> Option<&GeodataXformEntry> {
    entries.iter().find_map(MetadataEntry::as_geodata_xform)
}

/// Selects the georeferencing entry and normalizes it.
pub fn raw_block_from_entries(
    entries: &[MetadataEntry],
    location: &str,
) -> Result<RawGeoreferenceBlock, AuxGcpError> {
    let xform = find_geodata_xform(entries).ok_or_else(|| AuxGcpError::MissingGeoreference {
        location: location.to_string(),
    })?;

    tracing::debug!(
        location,
        metadata_entries = entries.len(),
        "found <GeodataXform> entry"
    );

    xform.to_raw_block(location)
}

/// Normalizes every value of one coordinate array, failing on the first bad one.
pub fn normalize_values(
    values: &[RawValue],
    location: &str,
    array: &'static str,
) -> Result<Vec<f64>, AuxGcpError> {
    values
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            raw.normalize().ok_or_else(|| AuxGcpError::NumericFormat {
                location: location.to_string(),
                array,
                index,
                value: raw.display(),
            })
        })
        .collect()
}

fn required_array<'a>(
    values: Option<&'a [RawValue]>,
    location: &str,
    array: &str,
) -> Result<&'a [RawValue], AuxGcpError> {
    values.ok_or_else(|| {
        AuxGcpError::malformed(location, format!("missing <{array}> in <GeodataXform>"))
    })
}

fn parse_code(
    raw: Option<&RawValue>,
    location: &str,
    tag: &str,
) -> Result<Option<u32>, AuxGcpError> {
    raw.map(|raw| {
        raw.as_u32().ok_or_else(|| {
            AuxGcpError::malformed(
                location,
                format!(
                    "invalid <{tag}> value '{}' in <SpatialReference>; expected u32",
                    raw.display()
                ),
            )
        })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> RawValue {
        RawValue::Text(value.to_string())
    }

    fn xform(source: Vec<RawValue>, target: Vec<RawValue>) -> GeodataXformEntry {
        GeodataXformEntry {
            wkid: Some(RawValue::Number(102970.0)),
            latest_wkid: Some(RawValue::Number(6557.0)),
            source_gcps: Some(source),
            target_gcps: Some(target),
            ..Default::default()
        }
    }

    #[test]
    fn normalize_accepts_numbers_and_decimal_text() {
        assert_eq!(RawValue::Number(0.632).normalize(), Some(0.632));
        assert_eq!(text(" 0.63205331346944149 ").normalize(), Some(0.63205331346944149));
        assert_eq!(text("1e3").normalize(), Some(1000.0));
    }

    #[test]
    fn normalize_agrees_between_number_and_text() {
        let number = RawValue::Number(635883.59383201599).normalize();
        let text = text("635883.59383201599").normalize();
        assert_eq!(number, text);
    }

    #[test]
    fn normalize_rejects_garbage_and_non_finite() {
        assert_eq!(text("abc").normalize(), None);
        assert_eq!(text("").normalize(), None);
        assert_eq!(text("12abc").normalize(), None);
        assert_eq!(text("NaN").normalize(), None);
        assert_eq!(RawValue::Number(f64::INFINITY).normalize(), None);
    }

    #[test]
    fn as_u32_requires_integral_codes() {
        assert_eq!(RawValue::Number(6557.0).as_u32(), Some(6557));
        assert_eq!(RawValue::Number(6557.5).as_u32(), None);
        assert_eq!(RawValue::Number(-1.0).as_u32(), None);
        assert_eq!(text("6557").as_u32(), Some(6557));
        assert_eq!(text("EPSG:6557").as_u32(), None);
    }

    #[test]
    fn find_geodata_xform_ignores_position() {
        let entries = vec![
            MetadataEntry::Other {
                domain: Some("IMAGE_STRUCTURE".into()),
            },
            MetadataEntry::Other { domain: None },
            MetadataEntry::GeodataXform(xform(vec![], vec![])),
        ];
        assert!(find_geodata_xform(&entries).is_some());
        assert!(find_geodata_xform(&entries[..2]).is_none());
    }

    #[test]
    fn missing_entry_is_missing_georeference() {
        let entries = vec![MetadataEntry::Other { domain: None }];
        let err = raw_block_from_entries(&entries, "<memory>").unwrap_err();
        assert!(matches!(err, AuxGcpError::MissingGeoreference { .. }));
    }

    #[test]
    fn latest_wkid_takes_precedence() {
        let block = xform(
            vec![text("1"), text("2")],
            vec![RawValue::Number(3.0), RawValue::Number(4.0)],
        )
        .to_raw_block("<memory>")
        .expect("normalize block");

        assert_eq!(block.spatial_reference.wkid, 6557);
        assert_eq!(block.spatial_reference.legacy_wkid, Some(102970));
        assert_eq!(block.source_values, vec![1.0, 2.0]);
        assert_eq!(block.target_values, vec![3.0, 4.0]);
    }

    #[test]
    fn wkid_alone_is_used() {
        let mut entry = xform(vec![], vec![]);
        entry.latest_wkid = None;
        let block = entry.to_raw_block("<memory>").expect("normalize block");
        assert_eq!(block.spatial_reference.wkid, 102970);
        assert_eq!(block.spatial_reference.legacy_wkid, None);
    }

    #[test]
    fn unreadable_latest_wkid_falls_back_to_wkid() {
        let mut entry = xform(vec![], vec![]);
        entry.latest_wkid = Some(text("n/a"));
        let block = entry.to_raw_block("<memory>").expect("normalize block");
        assert_eq!(block.spatial_reference.wkid, 102970);
        assert_eq!(block.spatial_reference.legacy_wkid, None);
    }

    #[test]
    fn unreadable_wkid_is_skipped_when_latest_is_usable() {
        let mut entry = xform(vec![], vec![]);
        entry.wkid = Some(text("n/a"));
        let block = entry.to_raw_block("<memory>").expect("normalize block");
        assert_eq!(block.spatial_reference.wkid, 6557);
        assert_eq!(block.spatial_reference.legacy_wkid, None);
    }

    #[test]
    fn unreadable_lone_code_is_malformed() {
        let mut entry = xform(vec![], vec![]);
        entry.wkid = None;
        entry.latest_wkid = Some(text("n/a"));
        let err = entry.to_raw_block("<memory>").unwrap_err();
        assert!(err.to_string().contains("LatestWKID"), "{err}");
    }

    #[test]
    fn missing_codes_are_malformed() {
        let mut entry = xform(vec![], vec![]);
        entry.wkid = None;
        entry.latest_wkid = None;
        let err = entry.to_raw_block("<memory>").unwrap_err();
        assert!(matches!(err, AuxGcpError::MalformedDocument { .. }));
    }

    #[test]
    fn bad_value_reports_array_and_index() {
        let entry = xform(vec![text("1"), text("2")], vec![text("3"), text("four")]);
        match entry.to_raw_block("sample.aux.xml").unwrap_err() {
            AuxGcpError::NumericFormat {
                location,
                array,
                index,
                value,
            } => {
                assert_eq!(location, "sample.aux.xml");
                assert_eq!(array, TARGET_ARRAY);
                assert_eq!(index, 1);
                assert_eq!(value, "four");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn odd_length_is_malformed() {
        let entry = xform(
            vec![text("1"), text("2"), text("3")],
            vec![text("1"), text("2"), text("3")],
        );
        let err = entry.to_raw_block("<memory>").unwrap_err();
        assert!(matches!(err, AuxGcpError::MalformedDocument { .. }));
    }

    #[test]
    fn missing_array_is_malformed() {
        let mut entry = xform(vec![], vec![]);
        entry.target_gcps = None;
        let err = entry.to_raw_block("<memory>").unwrap_err();
        assert!(err.to_string().contains("TargetGCPs"), "{err}");
    }

    #[test]
    fn unreadable_polynomial_order_is_ignored() {
        let mut entry = xform(vec![], vec![]);
        entry.polynomial_order = Some(text("first"));
        let block = entry.to_raw_block("<memory>").expect("normalize block");
        assert_eq!(block.polynomial_order, None);

        entry.polynomial_order = Some(RawValue::Number(2.0));
        let block = entry.to_raw_block("<memory>").expect("normalize block");
        assert_eq!(block.polynomial_order, Some(2));
    }
}
