#![no_main]

use boxtally_core::pipeline::ScanParser;
use boxtally_scan_pipeline::parser::BarcodeScanParser;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let parser = BarcodeScanParser::new();

    // 크래시나 패닉 없이 Ok 또는 Err을 반환해야 한다
    let _ = parser.parse(data);
});
