#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Renders a minimal PAM sidecar around the given `<Double>` texts.
pub fn sidecar_xml(wkid: u32, source: &[String], target: &[String]) -> String {
    let mut xml = String::new();
    xml.push_str("<PAMDataset>\n");
    xml.push_str("  <Metadata domain=\"IMAGE_STRUCTURE\"><MDI key=\"INTERLEAVE\">PIXEL</MDI></Metadata>\n");
    xml.push_str("  <Metadata domain=\"xml:ESRI\" format=\"xml\">\n");
    xml.push_str("    <GeodataXform>\n");
    writeln!(
        xml,
        "      <SpatialReference><WKID>{wkid}</WKID></SpatialReference>"
    )
    .expect("write to string");
    push_array(&mut xml, "SourceGCPs", source);
    push_array(&mut xml, "TargetGCPs", target);
    xml.push_str("    </GeodataXform>\n");
    xml.push_str("  </Metadata>\n");
    xml.push_str("</PAMDataset>\n");
    xml
}

/// Same as [`sidecar_xml`], formatting each value with `{:?}` so it parses back exactly.
pub fn sidecar_xml_from_values(wkid: u32, source: &[f64], target: &[f64]) -> String {
    let render = |values: &[f64]| values.iter().map(|v| format!("{v:?}")).collect::<Vec<_>>();
    sidecar_xml(wkid, &render(source), &render(target))
}

pub fn write_sidecar(path: &Path, xml: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, xml).expect("write sidecar file");
}

fn push_array(xml: &mut String, tag: &str, values: &[String]) {
    writeln!(xml, "      <{tag}>").expect("write to string");
    for value in values {
        writeln!(xml, "        <Double>{value}</Double>").expect("write to string");
    }
    writeln!(xml, "      </{tag}>").expect("write to string");
}
