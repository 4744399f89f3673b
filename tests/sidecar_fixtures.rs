use std::path::Path;

use auxgcp::ir::io_aux_json::read_aux_json;
use auxgcp::ir::io_aux_xml::read_aux_xml;
use auxgcp::ir::Coord;
use auxgcp::retrieve::Retriever;
use auxgcp::sidecar::{load_control_points, SidecarFormat};
use auxgcp::{auxiliary_xml_to_control_points, build_control_points, AuxGcpError};

const XML_FIXTURE: &str = "tests/fixtures/4403.tiff.aux.xml";
const JSON_FIXTURE: &str = "tests/fixtures/4403.tiff.aux.json";

#[test]
fn fixture_yields_six_control_points_in_order() {
    let set = auxiliary_xml_to_control_points(&Retriever::default(), XML_FIXTURE)
        .expect("load fixture");

    assert_eq!(set.len(), 6);
    assert_eq!(set.spatial_reference().wkid, 6557);
    assert_eq!(set.spatial_reference().legacy_wkid, Some(102970));
    assert_eq!(set.polynomial_order(), Some(1));

    let first = set.control_points()[0];
    assert_eq!(
        first.source_point,
        Coord::new(16.003273954722772, -0.63205331346944149)
    );
    assert_eq!(
        first.target_point,
        Coord::new(635883.59383201599, 1505281.1492782086)
    );

    let last = set.control_points()[5];
    assert_eq!(
        last.source_point,
        Coord::new(3.2241326298176083, -10.549609354405675)
    );
    assert_eq!(
        last.target_point,
        Coord::new(630714.34691207111, 1509288.6498717221)
    );
}

#[test]
fn xml_and_converted_json_agree() {
    let from_xml = read_aux_xml(Path::new(XML_FIXTURE)).expect("read xml fixture");
    let from_json = read_aux_json(Path::new(JSON_FIXTURE)).expect("read json fixture");

    assert_eq!(from_xml.source_values, from_json.source_values);
    assert_eq!(from_xml.target_values, from_json.target_values);
    assert_eq!(
        from_xml.spatial_reference.wkid,
        from_json.spatial_reference.wkid
    );

    assert_eq!(
        build_control_points(&from_xml).expect("build from xml"),
        build_control_points(&from_json).expect("build from json")
    );
}

#[test]
fn json_format_loads_through_pipeline() {
    let set = load_control_points(&Retriever::default(), JSON_FIXTURE, SidecarFormat::AuxJson)
        .expect("load json fixture");
    assert_eq!(set.len(), 6);
}

#[test]
fn fixture_without_transform_is_missing_georeference() {
    let err = auxiliary_xml_to_control_points(
        &Retriever::default(),
        "tests/fixtures/no_xform.aux.xml",
    )
    .unwrap_err();
    assert!(matches!(err, AuxGcpError::MissingGeoreference { .. }), "{err}");
}

#[test]
fn odd_length_fixture_is_malformed() {
    let err = auxiliary_xml_to_control_points(
        &Retriever::default(),
        "tests/fixtures/odd_length.aux.xml",
    )
    .unwrap_err();
    assert!(matches!(err, AuxGcpError::MalformedDocument { .. }), "{err}");
}

#[test]
fn missing_file_is_retrieval_error() {
    let err = auxiliary_xml_to_control_points(
        &Retriever::default(),
        "tests/fixtures/does_not_exist.aux.xml",
    )
    .unwrap_err();
    assert!(matches!(err, AuxGcpError::Retrieval { .. }), "{err}");
}

#[test]
fn unreachable_host_is_retrieval_error() {
    // Port 9 on localhost is the discard service; nothing listens there in CI.
    let err = auxiliary_xml_to_control_points(
        &Retriever::default(),
        "http://127.0.0.1:9/4403.tiff.aux.xml",
    )
    .unwrap_err();
    assert!(matches!(err, AuxGcpError::Retrieval { .. }), "{err}");
}
