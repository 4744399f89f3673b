//! Fuzz target for sidecar XML parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the sidecar parser and,
//! whenever parsing succeeds, to the control point builder, checking for
//! panics, crashes, or hangs.

#![no_main]

use auxgcp::build_control_points;
use auxgcp::ir::io_aux_xml::from_aux_xml_slice;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid excessive memory usage.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(block) = from_aux_xml_slice(data) {
        let _ = build_control_points(&block);
    }
});
