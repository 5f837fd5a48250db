#![no_main]
use bidsify::ImageHeader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(header) = ImageHeader::from_reader(data) {
        let _ = header.shape();
        let _ = header.time_points();
    }
});
