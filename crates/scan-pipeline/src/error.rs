//! 스캔 파이프라인 에러 타입
//!
//! [`ScanPipelineError`]는 스캔 파이프라인 내부에서 발생하는 모든 에러를 표현합니다.
//! `From<ScanPipelineError> for BoxtallyError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use boxtally_core::error::{BoxtallyError, ParseError, PipelineError};

/// 스캔 파이프라인 도메인 에러
///
/// 파싱, 수집, 버퍼링, 채널 통신, 제출 등 파이프라인 내부의
/// 모든 에러 상황을 포괄합니다.
#[derive(Debug, thiserror::Error)]
pub enum ScanPipelineError {
    /// 스캔 라인 파싱 실패
    #[error("parse error: {format} at offset {offset}: {reason}")]
    Parse {
        /// 파서 형식 (barcode, json 등)
        format: String,
        /// 실패 위치 (바이트 오프셋)
        offset: usize,
        /// 실패 사유
        reason: String,
    },

    /// 지원하지 않는 스캔 형식
    #[error("unsupported scan format: {0}")]
    UnsupportedFormat(String),

    /// 수집기 에러 (네트워크, stdin 등)
    #[error("collector error: {source_type}: {reason}")]
    Collector {
        /// 수집 소스 유형 (tcp, hid 등)
        source_type: String,
        /// 에러 사유
        reason: String,
    },

    /// 버퍼 오버플로우
    #[error("buffer overflow: capacity {capacity}, dropped {dropped} entries")]
    BufferOverflow {
        /// 버퍼 최대 용량
        capacity: usize,
        /// 드롭된 엔트리 수
        dropped: usize,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 제출 실패
    #[error("submit error: {kind}: {reason}")]
    Submit {
        /// 트랜잭션 유형
        kind: String,
        /// 실패 사유
        reason: String,
    },

    /// 채널 통신 에러
    #[error("channel error: {0}")]
    Channel(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ScanPipelineError> for BoxtallyError {
    fn from(err: ScanPipelineError) -> Self {
        match err {
            ScanPipelineError::Parse { offset, reason, .. } => {
                BoxtallyError::Parse(ParseError::Failed { offset, reason })
            }
            ScanPipelineError::UnsupportedFormat(format) => {
                BoxtallyError::Parse(ParseError::UnsupportedFormat(format))
            }
            other => BoxtallyError::Pipeline(PipelineError::InitFailed(other.to_string())),
        }
    }
}
