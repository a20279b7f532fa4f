//! 메트릭 상수 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`, `metrics::gauge!()`,
//! `metrics::histogram!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `boxtally_`
//! - 모듈명: `pipeline_`, `submit_`, `daemon_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency), 없음 (gauge)
//!
//! # 사용 예시
//!
//! ```ignore
//! use boxtally_core::metrics;
//! use metrics::counter;
//!
//! counter!(boxtally_core::metrics::PIPELINE_SCANS_COLLECTED_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 트랜잭션 유형 레이블 키 (audit, inward, outward, prn-outward)
pub const LABEL_KIND: &str = "kind";

/// 파서 형식 레이블 키 (barcode, json)
pub const LABEL_PARSER_FORMAT: &str = "format";

/// 수집 소스 레이블 키 (tcp, hid)
pub const LABEL_SOURCE: &str = "source";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

// ─── Scan Pipeline 메트릭 ──────────────────────────────────────────

/// Pipeline: 수집된 전체 원시 스캔 라인 수 (counter)
pub const PIPELINE_SCANS_COLLECTED_TOTAL: &str = "boxtally_pipeline_scans_collected_total";

/// Pipeline: 원장에 기록된 스캔 수 (counter)
pub const PIPELINE_SCANS_RECORDED_TOTAL: &str = "boxtally_pipeline_scans_recorded_total";

/// Pipeline: 중복으로 무시된 스캔 수 (counter)
pub const PIPELINE_SCANS_DUPLICATE_TOTAL: &str = "boxtally_pipeline_scans_duplicate_total";

/// Pipeline: 디바운스로 억제된 스캔 수 (counter)
pub const PIPELINE_SCANS_DEBOUNCED_TOTAL: &str = "boxtally_pipeline_scans_debounced_total";

/// Pipeline: 파싱 실패 수 (counter)
pub const PIPELINE_PARSE_ERRORS_TOTAL: &str = "boxtally_pipeline_parse_errors_total";

/// Pipeline: 버퍼 오버플로우로 드롭된 스캔 수 (counter)
pub const PIPELINE_SCANS_DROPPED_TOTAL: &str = "boxtally_pipeline_scans_dropped_total";

/// Pipeline: 버퍼 내 대기 중인 스캔 수 (gauge)
pub const PIPELINE_BUFFER_SIZE: &str = "boxtally_pipeline_buffer_size";

/// Pipeline: 완료된 선적 수 (counter, label: kind)
pub const PIPELINE_SHIPMENTS_COMPLETED_TOTAL: &str = "boxtally_pipeline_shipments_completed_total";

/// Pipeline: 배치 처리 소요 시간 (histogram, 초)
pub const PIPELINE_PROCESSING_DURATION_SECONDS: &str =
    "boxtally_pipeline_processing_duration_seconds";

// ─── Submit Gateway 메트릭 ─────────────────────────────────────────

/// Submit: 제출 시도 수 (counter, label: kind)
pub const SUBMIT_ATTEMPTS_TOTAL: &str = "boxtally_submit_attempts_total";

/// Submit: 제출 실패 수 (counter, label: kind)
pub const SUBMIT_FAILURES_TOTAL: &str = "boxtally_submit_failures_total";

/// Submit: 제출된 선적 수 (counter, label: kind)
pub const SUBMIT_SHIPMENTS_TOTAL: &str = "boxtally_submit_shipments_total";

// ─── Daemon 메트릭 ──────────────────────────────────────────────────

/// Daemon: 가동 시간 (gauge, 초)
pub const DAEMON_UPTIME_SECONDS: &str = "boxtally_daemon_uptime_seconds";

/// Daemon: 등록된 플러그인 수 (gauge)
pub const DAEMON_PLUGINS_REGISTERED: &str = "boxtally_daemon_plugins_registered";

// ─── 히스토그램 버킷 정의 ────────────────────────────────────────────

/// 배치 처리 지연 시간 히스토그램 버킷 (초)
///
/// 100us ~ 10s 범위, 로그 단위 분포
pub const PROCESSING_DURATION_BUCKETS: [f64; 10] = [
    0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 10.0,
];

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// `metrics::describe_counter!()`, `describe_gauge!()`, `describe_histogram!()`을
/// 호출하여 Prometheus HELP 텍스트를 설정합니다.
///
/// 이 함수는 전역 레코더 설치 후 한 번만 호출해야 합니다.
/// 일반적으로 `boxtally-daemon`의 시작 시점에서 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    // Scan Pipeline
    describe_counter!(
        PIPELINE_SCANS_COLLECTED_TOTAL,
        "Total number of raw scan lines collected from all sources"
    );
    describe_counter!(
        PIPELINE_SCANS_RECORDED_TOTAL,
        "Total number of scans recorded into the reconciliation ledger"
    );
    describe_counter!(
        PIPELINE_SCANS_DUPLICATE_TOTAL,
        "Total number of duplicate box scans silently absorbed"
    );
    describe_counter!(
        PIPELINE_SCANS_DEBOUNCED_TOTAL,
        "Total number of scan lines suppressed by the debounce window"
    );
    describe_counter!(
        PIPELINE_PARSE_ERRORS_TOTAL,
        "Total number of scan parsing failures"
    );
    describe_counter!(
        PIPELINE_SCANS_DROPPED_TOTAL,
        "Total number of scans dropped due to buffer overflow"
    );
    describe_gauge!(
        PIPELINE_BUFFER_SIZE,
        "Current number of raw scans in the processing buffer"
    );
    describe_counter!(
        PIPELINE_SHIPMENTS_COMPLETED_TOTAL,
        "Total number of shipments whose missing-box set became empty"
    );
    describe_histogram!(
        PIPELINE_PROCESSING_DURATION_SECONDS,
        "Time to process a single scan batch in seconds"
    );

    // Submit Gateway
    describe_counter!(
        SUBMIT_ATTEMPTS_TOTAL,
        "Total number of transaction batch submission attempts"
    );
    describe_counter!(
        SUBMIT_FAILURES_TOTAL,
        "Total number of failed transaction batch submissions"
    );
    describe_counter!(
        SUBMIT_SHIPMENTS_TOTAL,
        "Total number of shipments submitted to the backend"
    );

    // Daemon
    describe_gauge!(DAEMON_UPTIME_SECONDS, "Boxtally daemon uptime in seconds");
    describe_gauge!(
        DAEMON_PLUGINS_REGISTERED,
        "Number of plugins registered in the daemon"
    );
}
