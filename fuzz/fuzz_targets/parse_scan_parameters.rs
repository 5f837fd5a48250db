#![no_main]
use bidsify::{build_functional_metadata, ScanParameters};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(params) = ScanParameters::from_reader(data) {
        let _ = build_functional_metadata(&params, "task-fuzz_run-1");
    }
});
