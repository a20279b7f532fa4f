//! 대사(reconciliation) 모듈 -- 트랜잭션 유형별로 격리된 스캔 집계
//!
//! [`ReconStore`]는 트랜잭션 유형([`TransactionKind`])마다 독립된
//! [`TallyLedger`] 버킷을 유지합니다. 한 유형에서 기록한 스캔이 다른
//! 유형으로 새지 않으며, `clear()`는 활성 유형의 원장만 비웁니다.
//!
//! 스토어는 숨은 싱글턴이 아니라 명시적으로 생성하여 소유자에게 주입합니다.
//! 파이프라인 처리 루프가 단일 변경 주체이고, 스냅샷 조회는 짧은 읽기로만
//! 수행됩니다.

pub mod ledger;

pub use ledger::{ScanOutcome, TallyLedger};

use boxtally_core::types::{ScanRecord, ShipmentTally, TransactionKind};

/// 트랜잭션 유형별 대사 스토어
///
/// 네 개의 독립 원장과 현재 활성 유형을 관리합니다.
/// `add_scan`/`clear`/`snapshot`은 활성 유형의 원장에만 작용합니다.
#[derive(Debug, Default)]
pub struct ReconStore {
    /// 유형별 원장 버킷 (TransactionKind::index 순서)
    ledgers: [TallyLedger; 4],
    /// 현재 활성 트랜잭션 유형
    active: TransactionKind,
}

impl ReconStore {
    /// 기본 활성 유형으로 빈 스토어를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 지정한 활성 유형으로 빈 스토어를 생성합니다.
    pub fn with_active(kind: TransactionKind) -> Self {
        Self {
            ledgers: Default::default(),
            active: kind,
        }
    }

    /// 활성 트랜잭션 유형을 전환합니다.
    ///
    /// 멱등 연산입니다. 전환 자체는 어떤 원장도 변경하지 않습니다.
    pub fn set_active_context(&mut self, kind: TransactionKind) {
        self.active = kind;
    }

    /// 현재 활성 트랜잭션 유형을 반환합니다.
    pub fn active_context(&self) -> TransactionKind {
        self.active
    }

    /// 활성 원장에 스캔을 기록합니다.
    pub fn add_scan(&mut self, record: &ScanRecord) -> ScanOutcome {
        self.ledgers[self.active.index()].add_scan(record)
    }

    /// 활성 원장을 통째로 비웁니다.
    ///
    /// 다른 유형의 원장은 건드리지 않습니다.
    pub fn clear(&mut self) {
        self.ledgers[self.active.index()].clear();
    }

    /// 활성 원장의 스냅샷을 최초 삽입 순서로 반환합니다.
    pub fn snapshot(&self) -> Vec<&ShipmentTally> {
        self.ledgers[self.active.index()].snapshot()
    }

    /// 활성 원장에서 선적의 누락 박스를 조회합니다.
    pub fn missing_boxes(&self, shipment_id: &str) -> Option<Vec<i64>> {
        self.ledgers[self.active.index()].missing_boxes(shipment_id)
    }

    /// 특정 유형의 원장에 대한 읽기 전용 참조를 반환합니다.
    pub fn ledger(&self, kind: TransactionKind) -> &TallyLedger {
        &self.ledgers[kind.index()]
    }

    /// 활성 원장에 대한 읽기 전용 참조를 반환합니다.
    pub fn active_ledger(&self) -> &TallyLedger {
        &self.ledgers[self.active.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, expected: i64, box_number: i64) -> ScanRecord {
        ScanRecord {
            shipment_id: id.to_owned(),
            expected_count: expected,
            box_number,
        }
    }

    #[test]
    fn default_active_context() {
        let store = ReconStore::new();
        assert_eq!(store.active_context(), TransactionKind::default());
    }

    #[test]
    fn set_active_context_is_idempotent() {
        let mut store = ReconStore::new();
        store.set_active_context(TransactionKind::Audit);
        store.set_active_context(TransactionKind::Audit);
        assert_eq!(store.active_context(), TransactionKind::Audit);
    }

    #[test]
    fn scans_recorded_under_active_context_only() {
        let mut store = ReconStore::new();
        store.set_active_context(TransactionKind::Inward);
        store.add_scan(&record("A1", 3, 1));

        // INWARD에서 기록한 스캔은 OUTWARD 스냅샷에 나타나지 않음
        store.set_active_context(TransactionKind::Outward);
        assert!(store.snapshot().is_empty());

        store.set_active_context(TransactionKind::Inward);
        assert_eq!(store.snapshot().len(), 1);
    }

    #[test]
    fn clear_wipes_only_active_context() {
        let mut store = ReconStore::new();
        store.set_active_context(TransactionKind::Audit);
        store.add_scan(&record("A1", 3, 1));

        store.set_active_context(TransactionKind::Inward);
        store.add_scan(&record("B2", 2, 1));

        // AUDIT에서 clear — INWARD는 그대로
        store.set_active_context(TransactionKind::Audit);
        store.clear();
        assert!(store.snapshot().is_empty());

        store.set_active_context(TransactionKind::Inward);
        assert_eq!(store.snapshot().len(), 1);
        assert_eq!(store.snapshot()[0].shipment_id, "B2");
    }

    #[test]
    fn same_shipment_id_isolated_across_contexts() {
        let mut store = ReconStore::new();
        store.set_active_context(TransactionKind::Inward);
        store.add_scan(&record("A1", 3, 1));

        store.set_active_context(TransactionKind::PrnOutward);
        store.add_scan(&record("A1", 5, 1));
        store.add_scan(&record("A1", 5, 2));

        assert_eq!(
            store.ledger(TransactionKind::Inward).get("A1").unwrap().expected_count,
            3
        );
        assert_eq!(
            store
                .ledger(TransactionKind::PrnOutward)
                .get("A1")
                .unwrap()
                .scanned_count(),
            2
        );
    }

    #[test]
    fn missing_boxes_uses_active_context() {
        let mut store = ReconStore::with_active(TransactionKind::Outward);
        store.add_scan(&record("A1", 3, 2));
        assert_eq!(store.missing_boxes("A1").unwrap(), vec![1, 3]);

        store.set_active_context(TransactionKind::Audit);
        assert!(store.missing_boxes("A1").is_none());
    }

    #[test]
    fn duplicate_suppression_within_context() {
        let mut store = ReconStore::new();
        store.add_scan(&record("A1", 3, 1));
        let outcome = store.add_scan(&record("A1", 3, 1));
        assert_eq!(outcome, ScanOutcome::Duplicate);
        assert_eq!(store.active_ledger().duplicate_count(), 1);
    }

    #[test]
    fn all_four_contexts_are_independent() {
        let mut store = ReconStore::new();
        for (i, kind) in TransactionKind::ALL.into_iter().enumerate() {
            store.set_active_context(kind);
            store.add_scan(&record(&format!("S{i}"), 1, 1));
        }

        for (i, kind) in TransactionKind::ALL.into_iter().enumerate() {
            let ledger = store.ledger(kind);
            assert_eq!(ledger.len(), 1);
            assert!(ledger.get(&format!("S{i}")).is_some());
        }
    }
}
