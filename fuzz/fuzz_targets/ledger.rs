#![no_main]

use arbitrary::Arbitrary;
use boxtally_core::types::ScanRecord;
use boxtally_scan_pipeline::recon::TallyLedger;
use libfuzzer_sys::fuzz_target;

/// 퍼저가 생성하는 스캔 시퀀스
#[derive(Debug, Arbitrary)]
struct ScanSequence {
    scans: Vec<(u8, i64, i64)>,
}

fuzz_target!(|input: ScanSequence| {
    let mut ledger = TallyLedger::new();

    for (id, expected, box_number) in input.scans {
        let record = ScanRecord {
            shipment_id: format!("S{}", id % 8),
            expected_count: expected,
            box_number,
        };
        ledger.add_scan(&record);

        // 불변식: 스냅샷의 어떤 집계도 중복 박스를 갖지 않는다
        for tally in ledger.snapshot() {
            let mut seen = std::collections::HashSet::new();
            for b in &tally.scanned_boxes {
                assert!(seen.insert(*b), "duplicate box in tally");
            }
        }
    }
});
