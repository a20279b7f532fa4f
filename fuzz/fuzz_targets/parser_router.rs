#![no_main]

use boxtally_scan_pipeline::parser::ParserRouter;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let router = ParserRouter::with_defaults();

    // 자동 감지 경로도 패닉 없이 동작해야 한다
    let _ = router.parse(data);
});
