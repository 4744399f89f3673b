//! Fuzz target for converted-JSON sidecar parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the JSON sidecar parser,
//! checking for panics, crashes, or hangs.

#![no_main]

use auxgcp::ir::io_aux_json::from_aux_json_slice;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid excessive memory usage.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = from_aux_json_slice(data);
});
