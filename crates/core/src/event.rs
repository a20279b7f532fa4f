//! 이벤트 시스템 — 모듈 간 통신의 기본 단위
//!
//! 모든 모듈 간 통신은 이벤트 기반 메시지 패싱으로 수행됩니다.
//! [`EventMetadata`]는 모든 이벤트에 공통으로 포함되는 메타데이터이며,
//! [`Event`] trait은 모든 이벤트 타입이 구현해야 하는 인터페이스입니다.

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::types::{ScanRecord, TransactionKind};

// --- 모듈명 상수 ---

/// 스캔 파이프라인 모듈명
pub const MODULE_SCAN_PIPELINE: &str = "scan-pipeline";
/// 제출 게이트웨이 모듈명
pub const MODULE_SUBMIT_GATEWAY: &str = "submit-gateway";
/// CLI 모듈명
pub const MODULE_CLI: &str = "cli";

// --- 이벤트 타입 상수 ---

/// 스캔 이벤트 타입
pub const EVENT_TYPE_SCAN: &str = "scan";
/// 선적 완료 이벤트 타입
pub const EVENT_TYPE_COMPLETION: &str = "completion";
/// 제출 이벤트 타입
pub const EVENT_TYPE_SUBMISSION: &str = "submission";

/// 이벤트 메타데이터 — 모든 이벤트에 공통으로 포함되는 추적 정보
///
/// 각 이벤트의 발생 시각, 생성 모듈, 추적 ID를 담고 있어
/// 이벤트 흐름을 추적하고 디버깅할 수 있습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetadata {
    /// 이벤트 발생 시각
    pub timestamp: SystemTime,
    /// 이벤트를 생성한 모듈명 (예: "scan-pipeline")
    pub source_module: String,
    /// 추적 ID — 같은 흐름의 이벤트를 연결합니다
    pub trace_id: String,
}

impl EventMetadata {
    /// 기존 trace_id를 사용하여 새 메타데이터를 생성합니다.
    ///
    /// 이벤트 체인에서 동일한 추적 ID를 유지할 때 사용합니다.
    pub fn new(source_module: impl Into<String>, trace_id: impl Into<String>) -> Self {
        Self {
            timestamp: SystemTime::now(),
            source_module: source_module.into(),
            trace_id: trace_id.into(),
        }
    }

    /// 새로운 UUID v4 trace_id를 생성하여 메타데이터를 만듭니다.
    ///
    /// 새로운 이벤트 체인의 시작점에서 사용합니다.
    pub fn with_new_trace(source_module: impl Into<String>) -> Self {
        Self {
            timestamp: SystemTime::now(),
            source_module: source_module.into(),
            trace_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

impl fmt::Display for EventMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] source={} trace={}",
            unix_timestamp_str(self.timestamp),
            self.source_module,
            self.trace_id,
        )
    }
}

/// 모든 이벤트가 구현해야 하는 기본 trait
///
/// 각 모듈은 자체 이벤트 타입을 정의하고 이 trait을 구현합니다.
/// `Send + Sync + 'static` 바운드로 `tokio::mpsc` 채널을 통한
/// 안전한 전송을 보장합니다.
pub trait Event: Send + Sync + 'static {
    /// 이벤트 고유 ID (UUID v4)
    fn event_id(&self) -> &str;

    /// 이벤트 메타데이터 (timestamp, source_module, trace_id)
    fn metadata(&self) -> &EventMetadata;

    /// 이벤트 타입명 (로깅 및 라우팅에 사용)
    fn event_type(&self) -> &str;
}

/// 수락된 스캔 이벤트
///
/// 파이프라인이 원시 스캔 라인을 파싱하여 원장에 기록했을 때 생성됩니다.
/// 중복 스캔도 이벤트로 방출되며 `duplicate` 플래그로 구분됩니다.
#[derive(Debug, Clone)]
pub struct ScanEvent {
    /// 이벤트 고유 ID
    pub id: String,
    /// 이벤트 메타데이터
    pub metadata: EventMetadata,
    /// 파싱된 스캔 레코드
    pub record: ScanRecord,
    /// 스캔이 기록된 트랜잭션 유형
    pub kind: TransactionKind,
    /// 수집 소스 식별자 (예: "tcp:0.0.0.0:7070")
    pub source: String,
    /// 중복 스캔 여부 (원장에 새로 기록되지 않음)
    pub duplicate: bool,
}

impl ScanEvent {
    /// 새로운 trace를 시작하는 스캔 이벤트를 생성합니다.
    pub fn new(
        record: ScanRecord,
        kind: TransactionKind,
        source: impl Into<String>,
        duplicate: bool,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            metadata: EventMetadata::with_new_trace(MODULE_SCAN_PIPELINE),
            record,
            kind,
            source: source.into(),
            duplicate,
        }
    }

    /// 기존 trace에 연결된 스캔 이벤트를 생성합니다.
    pub fn with_trace(
        record: ScanRecord,
        kind: TransactionKind,
        source: impl Into<String>,
        duplicate: bool,
        trace_id: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            metadata: EventMetadata::new(MODULE_SCAN_PIPELINE, trace_id),
            record,
            kind,
            source: source.into(),
            duplicate,
        }
    }
}

impl Event for ScanEvent {
    fn event_id(&self) -> &str {
        &self.id
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }

    fn event_type(&self) -> &str {
        EVENT_TYPE_SCAN
    }
}

impl fmt::Display for ScanEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ScanEvent[{}] kind={} {} duplicate={}",
            &self.id[..8.min(self.id.len())],
            self.kind,
            self.record,
            self.duplicate,
        )
    }
}

/// 선적 완료 이벤트
///
/// 어떤 선적의 누락 박스 집합이 방금 비워졌을 때 생성됩니다.
#[derive(Debug, Clone)]
pub struct CompletionEvent {
    /// 이벤트 고유 ID
    pub id: String,
    /// 이벤트 메타데이터
    pub metadata: EventMetadata,
    /// 완료된 선적이 속한 트랜잭션 유형
    pub kind: TransactionKind,
    /// 완료된 선적 식별자
    pub shipment_id: String,
    /// 해당 선적의 기대 박스 수
    pub expected_count: i64,
}

impl CompletionEvent {
    /// 새로운 trace를 시작하는 완료 이벤트를 생성합니다.
    pub fn new(kind: TransactionKind, shipment_id: impl Into<String>, expected_count: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            metadata: EventMetadata::with_new_trace(MODULE_SCAN_PIPELINE),
            kind,
            shipment_id: shipment_id.into(),
            expected_count,
        }
    }

    /// 기존 trace에 연결된 완료 이벤트를 생성합니다.
    pub fn with_trace(
        kind: TransactionKind,
        shipment_id: impl Into<String>,
        expected_count: i64,
        trace_id: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            metadata: EventMetadata::new(MODULE_SCAN_PIPELINE, trace_id),
            kind,
            shipment_id: shipment_id.into(),
            expected_count,
        }
    }
}

impl Event for CompletionEvent {
    fn event_id(&self) -> &str {
        &self.id
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }

    fn event_type(&self) -> &str {
        EVENT_TYPE_COMPLETION
    }
}

impl fmt::Display for CompletionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CompletionEvent[{}] kind={} shipment={} boxes={}",
            &self.id[..8.min(self.id.len())],
            self.kind,
            self.shipment_id,
            self.expected_count,
        )
    }
}

/// 제출 결과 이벤트
///
/// 트랜잭션 배치 제출 시도가 끝났을 때 생성됩니다.
#[derive(Debug, Clone)]
pub struct SubmissionEvent {
    /// 이벤트 고유 ID
    pub id: String,
    /// 이벤트 메타데이터
    pub metadata: EventMetadata,
    /// 제출된 트랜잭션 유형
    pub kind: TransactionKind,
    /// 제출된 선적 수
    pub shipment_count: usize,
    /// 성공 여부
    pub success: bool,
}

impl SubmissionEvent {
    /// 새로운 trace를 시작하는 제출 이벤트를 생성합니다.
    pub fn new(kind: TransactionKind, shipment_count: usize, success: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            metadata: EventMetadata::with_new_trace(MODULE_SUBMIT_GATEWAY),
            kind,
            shipment_count,
            success,
        }
    }

    /// 기존 trace에 연결된 제출 이벤트를 생성합니다.
    pub fn with_trace(
        kind: TransactionKind,
        shipment_count: usize,
        success: bool,
        trace_id: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            metadata: EventMetadata::new(MODULE_SUBMIT_GATEWAY, trace_id),
            kind,
            shipment_count,
            success,
        }
    }
}

impl Event for SubmissionEvent {
    fn event_id(&self) -> &str {
        &self.id
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }

    fn event_type(&self) -> &str {
        EVENT_TYPE_SUBMISSION
    }
}

impl fmt::Display for SubmissionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.success { "OK" } else { "FAILED" };
        write!(
            f,
            "SubmissionEvent[{}] kind={} shipments={} status={}",
            &self.id[..8.min(self.id.len())],
            self.kind,
            self.shipment_count,
            status,
        )
    }
}

/// SystemTime을 사람이 읽을 수 있는 형태로 변환합니다.
fn unix_timestamp_str(time: SystemTime) -> String {
    match time.duration_since(SystemTime::UNIX_EPOCH) {
        Ok(duration) => {
            let secs = duration.as_secs();
            format!("{secs}")
        }
        Err(_) => "unknown".to_owned(),
    }
}
