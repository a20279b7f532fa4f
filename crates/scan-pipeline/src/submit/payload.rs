//! 제출 페이로드 -- 트랜잭션 배치의 JSON 직렬화 형식
//!
//! 백엔드는 트랜잭션 유형별 엔드포인트로 POST된 JSON 배치를 소비합니다.
//! 페이로드는 제출 시점의 원장 스냅샷에서 생성되며, 원장 자체는 제출이
//! 확인될 때까지 변경되지 않습니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use boxtally_core::types::{ShipmentTally, TransactionKind};

/// 제출 페이로드의 선적 엔트리
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentEntry {
    /// 선적 식별자
    pub lrno: String,
    /// 기대 박스 수
    pub expected_count: i64,
    /// 스캔된 박스 번호 (최초 스캔 순서)
    pub boxes: Vec<i64>,
    /// 누락 박스 번호
    pub missing: Vec<i64>,
    /// 완료 여부
    pub complete: bool,
}

impl ShipmentEntry {
    /// 선적 집계에서 엔트리를 생성합니다.
    pub fn from_tally(tally: &ShipmentTally) -> Self {
        let missing = tally.missing_boxes();
        Self {
            lrno: tally.shipment_id.clone(),
            expected_count: tally.expected_count,
            boxes: tally.scanned_boxes.clone(),
            complete: missing.is_empty(),
            missing,
        }
    }
}

/// 트랜잭션 배치 제출 페이로드
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionPayload {
    /// 트랜잭션 유형
    pub kind: TransactionKind,
    /// 제출 장치 식별자
    pub device_id: String,
    /// 제출 시각 (UTC)
    pub submitted_at: DateTime<Utc>,
    /// 선적 엔트리 목록 (원장 스냅샷 순서)
    pub shipments: Vec<ShipmentEntry>,
}

impl TransactionPayload {
    /// 원장 스냅샷에서 페이로드를 생성합니다.
    pub fn from_snapshot(
        kind: TransactionKind,
        device_id: impl Into<String>,
        snapshot: &[&ShipmentTally],
    ) -> Self {
        Self {
            kind,
            device_id: device_id.into(),
            submitted_at: Utc::now(),
            shipments: snapshot.iter().map(|t| ShipmentEntry::from_tally(t)).collect(),
        }
    }

    /// 페이로드의 선적 수를 반환합니다.
    pub fn shipment_count(&self) -> usize {
        self.shipments.len()
    }

    /// 모든 선적이 완료 상태인지 확인합니다.
    pub fn is_all_complete(&self) -> bool {
        !self.shipments.is_empty() && self.shipments.iter().all(|s| s.complete)
    }
}
