//! 스캔 파이프라인 설정
//!
//! [`PipelineConfig`]는 core의 [`ScanPipelineConfig`](boxtally_core::config::ScanPipelineConfig)를
//! 기반으로 파이프라인 전용 설정을 제공합니다.
//!
//! # 사용 예시
//! ```ignore
//! use boxtally_core::config::BoxtallyConfig;
//! use boxtally_scan_pipeline::config::PipelineConfig;
//!
//! let core_config = BoxtallyConfig::default();
//! let config = PipelineConfig::from_core(&core_config.scan_pipeline);
//! ```

use serde::{Deserialize, Serialize};

use boxtally_core::types::TransactionKind;

use crate::error::ScanPipelineError;

/// 버퍼 오버플로우 시 드롭 정책
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropPolicy {
    /// 가장 오래된 엔트리를 드롭 (기본값)
    #[default]
    Oldest,
    /// 가장 최신 엔트리를 드롭 (새 유입 거부)
    Newest,
}

/// 스캔 파이프라인 설정
///
/// core의 `ScanPipelineConfig`에서 파생되며, 파이프라인 내부에서
/// 사용하는 추가 설정을 포함합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// 수집 소스 목록 (tcp, hid)
    pub sources: Vec<String>,
    /// TCP 스캔 수신 바인드 주소
    pub tcp_bind: String,
    /// 스캔이 기록될 트랜잭션 유형
    pub kind: TransactionKind,
    /// 배치 크기 (이 개수만큼 모이면 플러시)
    pub batch_size: usize,
    /// 배치 플러시 간격 (초)
    pub flush_interval_secs: u64,
    /// 동일 스캔 라인 재수신 억제 윈도우 (밀리초)
    pub debounce_ms: u64,

    // --- 확장 설정 (core에 없는 추가 필드) ---
    /// 인메모리 버퍼 최대 용량
    pub buffer_capacity: usize,
    /// 버퍼 오버플로우 드롭 정책
    pub drop_policy: DropPolicy,
    /// 활성 컨텍스트의 모든 선적이 완료되면 자동 제출
    pub auto_submit: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sources: vec!["tcp".to_owned()],
            tcp_bind: "0.0.0.0:7070".to_owned(),
            kind: TransactionKind::Inward,
            batch_size: 50,
            flush_interval_secs: 2,
            debounce_ms: 400,
            buffer_capacity: 10_000,
            drop_policy: DropPolicy::Oldest,
            auto_submit: false,
        }
    }
}

impl PipelineConfig {
    /// core의 `ScanPipelineConfig`에서 파이프라인 설정을 생성합니다.
    ///
    /// core 설정에 없는 확장 필드는 기본값이 적용됩니다.
    pub fn from_core(core: &boxtally_core::config::ScanPipelineConfig) -> Self {
        Self {
            enabled: core.enabled,
            sources: core.sources.clone(),
            tcp_bind: core.tcp_bind.clone(),
            kind: TransactionKind::from_str_loose(&core.default_kind).unwrap_or_default(),
            batch_size: core.batch_size,
            flush_interval_secs: core.flush_interval_secs,
            debounce_ms: core.debounce_ms,
            ..Self::default()
        }
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ScanPipelineError> {
        const MAX_BATCH_SIZE: usize = 100_000;
        const MAX_BUFFER_CAPACITY: usize = 1_000_000;
        const MAX_FLUSH_INTERVAL_SECS: u64 = 3600; // 1 hour
        const MAX_DEBOUNCE_MS: u64 = 10_000;

        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(ScanPipelineError::Config {
                field: "batch_size".to_owned(),
                reason: format!("must be 1-{}", MAX_BATCH_SIZE),
            });
        }

        if self.flush_interval_secs == 0 || self.flush_interval_secs > MAX_FLUSH_INTERVAL_SECS {
            return Err(ScanPipelineError::Config {
                field: "flush_interval_secs".to_owned(),
                reason: format!("must be 1-{}", MAX_FLUSH_INTERVAL_SECS),
            });
        }

        if self.buffer_capacity == 0 || self.buffer_capacity > MAX_BUFFER_CAPACITY {
            return Err(ScanPipelineError::Config {
                field: "buffer_capacity".to_owned(),
                reason: format!("must be 1-{}", MAX_BUFFER_CAPACITY),
            });
        }

        if self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(ScanPipelineError::Config {
                field: "debounce_ms".to_owned(),
                reason: format!("must be 0-{}", MAX_DEBOUNCE_MS),
            });
        }

        if self.enabled && self.sources.is_empty() {
            return Err(ScanPipelineError::Config {
                field: "sources".to_owned(),
                reason: "at least one source must be configured when enabled".to_owned(),
            });
        }

        const VALID_SOURCES: &[&str] = &["tcp", "hid"];
        for source in &self.sources {
            if !VALID_SOURCES.contains(&source.as_str()) {
                return Err(ScanPipelineError::Config {
                    field: "sources".to_owned(),
                    reason: format!("unknown source '{}'", source),
                });
            }
        }

        Ok(())
    }
}

/// 파이프라인 설정 빌더
///
/// 3개 이상의 설정 필드가 있으므로 빌더 패턴을 사용합니다.
#[derive(Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 활성화 여부를 설정합니다.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    /// 수집 소스를 설정합니다.
    pub fn sources(mut self, sources: Vec<String>) -> Self {
        self.config.sources = sources;
        self
    }

    /// TCP 바인드 주소를 설정합니다.
    pub fn tcp_bind(mut self, bind: impl Into<String>) -> Self {
        self.config.tcp_bind = bind.into();
        self
    }

    /// 트랜잭션 유형을 설정합니다.
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.config.kind = kind;
        self
    }

    /// 배치 크기를 설정합니다.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    /// 플러시 간격(초)을 설정합니다.
    pub fn flush_interval_secs(mut self, secs: u64) -> Self {
        self.config.flush_interval_secs = secs;
        self
    }

    /// 디바운스 윈도우(밀리초)를 설정합니다.
    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.config.debounce_ms = ms;
        self
    }

    /// 버퍼 용량을 설정합니다.
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.config.buffer_capacity = capacity;
        self
    }

    /// 드롭 정책을 설정합니다.
    pub fn drop_policy(mut self, policy: DropPolicy) -> Self {
        self.config.drop_policy = policy;
        self
    }

    /// 자동 제출 여부를 설정합니다.
    pub fn auto_submit(mut self, auto: bool) -> Self {
        self.config.auto_submit = auto;
        self
    }

    /// 설정을 검증하고 `PipelineConfig`를 생성합니다.
    pub fn build(self) -> Result<PipelineConfig, ScanPipelineError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
