//! 설정 관리 — boxtally.toml 파싱 및 런타임 설정
//!
//! [`BoxtallyConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`BOXTALLY_SCAN_PIPELINE_TCP_BIND=0.0.0.0:7070` 형식)
//! 3. 설정 파일 (`boxtally.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), boxtally_core::error::BoxtallyError> {
//! use boxtally_core::config::BoxtallyConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = BoxtallyConfig::load("boxtally.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = BoxtallyConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{BoxtallyError, ConfigError};
use crate::types::TransactionKind;

/// Boxtally 통합 설정
///
/// `boxtally.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoxtallyConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 스캔 파이프라인 설정
    #[serde(default)]
    pub scan_pipeline: ScanPipelineConfig,
    /// 제출 게이트웨이 설정
    #[serde(default)]
    pub submit: SubmitConfig,
    /// 메트릭 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl BoxtallyConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, BoxtallyError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, BoxtallyError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BoxtallyError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                BoxtallyError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, BoxtallyError> {
        toml::from_str(toml_str).map_err(|e| {
            BoxtallyError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `BOXTALLY_{SECTION}_{FIELD}`
    /// 예: `BOXTALLY_SUBMIT_BASE_URL=https://wms.example.com`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "BOXTALLY_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "BOXTALLY_GENERAL_LOG_FORMAT");
        override_string(&mut self.general.data_dir, "BOXTALLY_GENERAL_DATA_DIR");
        override_string(&mut self.general.pid_file, "BOXTALLY_GENERAL_PID_FILE");

        // Scan pipeline
        override_bool(
            &mut self.scan_pipeline.enabled,
            "BOXTALLY_SCAN_PIPELINE_ENABLED",
        );
        override_csv(
            &mut self.scan_pipeline.sources,
            "BOXTALLY_SCAN_PIPELINE_SOURCES",
        );
        override_string(
            &mut self.scan_pipeline.tcp_bind,
            "BOXTALLY_SCAN_PIPELINE_TCP_BIND",
        );
        override_string(
            &mut self.scan_pipeline.default_kind,
            "BOXTALLY_SCAN_PIPELINE_DEFAULT_KIND",
        );
        override_usize(
            &mut self.scan_pipeline.batch_size,
            "BOXTALLY_SCAN_PIPELINE_BATCH_SIZE",
        );
        override_u64(
            &mut self.scan_pipeline.flush_interval_secs,
            "BOXTALLY_SCAN_PIPELINE_FLUSH_INTERVAL_SECS",
        );
        override_u64(
            &mut self.scan_pipeline.debounce_ms,
            "BOXTALLY_SCAN_PIPELINE_DEBOUNCE_MS",
        );

        // Submit
        override_bool(&mut self.submit.enabled, "BOXTALLY_SUBMIT_ENABLED");
        override_string(&mut self.submit.base_url, "BOXTALLY_SUBMIT_BASE_URL");
        override_string(&mut self.submit.device_id, "BOXTALLY_SUBMIT_DEVICE_ID");
        override_u64(&mut self.submit.timeout_secs, "BOXTALLY_SUBMIT_TIMEOUT_SECS");
        override_bool(&mut self.submit.auto_submit, "BOXTALLY_SUBMIT_AUTO_SUBMIT");

        // Metrics
        override_bool(&mut self.metrics.enabled, "BOXTALLY_METRICS_ENABLED");
        override_string(&mut self.metrics.listen_addr, "BOXTALLY_METRICS_LISTEN_ADDR");
        override_u16(&mut self.metrics.port, "BOXTALLY_METRICS_PORT");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), BoxtallyError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        // 스캔 파이프라인 검증
        if self.scan_pipeline.enabled {
            if self.scan_pipeline.sources.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "scan_pipeline.sources".to_owned(),
                    reason: "at least one source must be configured when enabled".to_owned(),
                }
                .into());
            }

            let valid_sources = ["tcp", "hid"];
            for source in &self.scan_pipeline.sources {
                if !valid_sources.contains(&source.as_str()) {
                    return Err(ConfigError::InvalidValue {
                        field: "scan_pipeline.sources".to_owned(),
                        reason: format!(
                            "unknown source '{}', must be one of: {}",
                            source,
                            valid_sources.join(", ")
                        ),
                    }
                    .into());
                }
            }

            if TransactionKind::from_str_loose(&self.scan_pipeline.default_kind).is_none() {
                return Err(ConfigError::InvalidValue {
                    field: "scan_pipeline.default_kind".to_owned(),
                    reason: format!(
                        "unknown transaction kind '{}'",
                        self.scan_pipeline.default_kind
                    ),
                }
                .into());
            }

            if self.scan_pipeline.batch_size == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "scan_pipeline.batch_size".to_owned(),
                    reason: "must be greater than 0".to_owned(),
                }
                .into());
            }
        }

        // 제출 게이트웨이 검증
        if self.submit.enabled {
            if self.submit.base_url.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "submit.base_url".to_owned(),
                    reason: "base_url must not be empty when submit is enabled".to_owned(),
                }
                .into());
            }

            if !self.submit.base_url.starts_with("http://")
                && !self.submit.base_url.starts_with("https://")
            {
                return Err(ConfigError::InvalidValue {
                    field: "submit.base_url".to_owned(),
                    reason: "base_url must start with http:// or https://".to_owned(),
                }
                .into());
            }

            if self.submit.timeout_secs == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "submit.timeout_secs".to_owned(),
                    reason: "must be greater than 0".to_owned(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// 파이프라인의 기본 트랜잭션 유형을 반환합니다.
    ///
    /// `validate`를 통과한 설정에서만 호출해야 합니다.
    /// 알 수 없는 값이면 기본 유형으로 대체합니다.
    pub fn default_kind(&self) -> TransactionKind {
        TransactionKind::from_str_loose(&self.scan_pipeline.default_kind).unwrap_or_default()
    }
}

// Default는 derive 매크로로 자동 생성 (각 필드가 Default를 구현하므로)

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
    /// 데이터 디렉토리
    pub data_dir: String,
    /// PID 파일 경로 (빈 문자열이면 미사용)
    pub pid_file: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
            data_dir: "/var/lib/boxtally".to_owned(),
            pid_file: String::new(),
        }
    }
}

/// 스캔 파이프라인 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanPipelineConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// 수집 소스 (tcp, hid)
    pub sources: Vec<String>,
    /// TCP 스캔 수신 바인드 주소
    pub tcp_bind: String,
    /// 데몬 모드에서 스캔이 기록될 트랜잭션 유형
    pub default_kind: String,
    /// 배치 크기 (이 개수만큼 모이면 플러시)
    pub batch_size: usize,
    /// 배치 플러시 간격 (초)
    pub flush_interval_secs: u64,
    /// 동일 스캔 라인 재수신 억제 윈도우 (밀리초)
    pub debounce_ms: u64,
}

impl Default for ScanPipelineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sources: vec!["tcp".to_owned()],
            tcp_bind: "0.0.0.0:7070".to_owned(),
            default_kind: "inward".to_owned(),
            batch_size: 50,
            flush_interval_secs: 2,
            debounce_ms: 400,
        }
    }
}

/// 제출 게이트웨이 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// 백엔드 기본 URL
    pub base_url: String,
    /// 이 장치의 식별자 (제출 페이로드에 포함)
    pub device_id: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// 활성 컨텍스트의 모든 선적이 완료되면 자동 제출
    pub auto_submit: bool,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: String::new(),
            device_id: "boxtally-01".to_owned(),
            timeout_secs: 15,
            auto_submit: false,
        }
    }
}

/// 메트릭 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// 메트릭 HTTP 리스너 바인드 주소
    pub listen_addr: String,
    /// 메트릭 HTTP 리스너 포트
    pub port: u16,
    /// 스크레이프 엔드포인트 경로
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: "127.0.0.1".to_owned(),
            port: 9187,
            endpoint: "/metrics".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u16(target: &mut u16, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u16>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u16 from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val.split(',').map(|s| s.trim().to_owned()).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_values() {
        let config = BoxtallyConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "json");
        assert!(config.scan_pipeline.enabled);
        assert_eq!(config.scan_pipeline.tcp_bind, "0.0.0.0:7070");
        assert!(!config.submit.enabled);
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn default_config_passes_validation() {
        let config = BoxtallyConfig::default();
        config.validate().unwrap();
    }

    #[test]
    fn parse_empty_toml_uses_defaults() {
        let config = BoxtallyConfig::parse("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.scan_pipeline.batch_size, 50);
    }

    #[test]
    fn parse_partial_toml_merges_with_defaults() {
        let toml = r#"
[general]
log_level = "debug"

[scan_pipeline]
tcp_bind = "127.0.0.1:9090"
"#;
        let config = BoxtallyConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_level, "debug");
        // log_format은 기본값 유지
        assert_eq!(config.general.log_format, "json");
        assert_eq!(config.scan_pipeline.tcp_bind, "127.0.0.1:9090");
        assert_eq!(config.scan_pipeline.batch_size, 50);
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
[general]
log_level = "warn"
log_format = "pretty"
data_dir = "/opt/boxtally/data"
pid_file = "/opt/boxtally/boxtally.pid"

[scan_pipeline]
enabled = true
sources = ["tcp", "hid"]
tcp_bind = "0.0.0.0:7171"
default_kind = "outward"
batch_size = 100
flush_interval_secs = 5
debounce_ms = 250

[submit]
enabled = true
base_url = "https://wms.example.com"
device_id = "dock-3-scanner"
timeout_secs = 30
auto_submit = true

[metrics]
enabled = true
listen_addr = "0.0.0.0"
port = 9200
"#;
        let config = BoxtallyConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.scan_pipeline.sources.len(), 2);
        assert_eq!(config.default_kind(), TransactionKind::Outward);
        assert_eq!(config.submit.device_id, "dock-3-scanner");
        assert!(config.submit.auto_submit);
        assert_eq!(config.metrics.port, 9200);
        config.validate().unwrap();
    }

    #[test]
    fn parse_invalid_toml_returns_error() {
        let result = BoxtallyConfig::parse("invalid = [[[toml");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            BoxtallyError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = BoxtallyConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = BoxtallyConfig::default();
        config.general.log_format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }

    #[test]
    fn validate_rejects_empty_sources_when_enabled() {
        let mut config = BoxtallyConfig::default();
        config.scan_pipeline.sources.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_unknown_source() {
        let mut config = BoxtallyConfig::default();
        config.scan_pipeline.sources = vec!["bluetooth".to_owned()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("bluetooth"));
    }

    #[test]
    fn validate_rejects_unknown_default_kind() {
        let mut config = BoxtallyConfig::default();
        config.scan_pipeline.default_kind = "sideways".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sideways"));
    }

    #[test]
    fn validate_skips_pipeline_checks_when_disabled() {
        let mut config = BoxtallyConfig::default();
        config.scan_pipeline.enabled = false;
        config.scan_pipeline.sources.clear();
        config.scan_pipeline.default_kind = "sideways".to_owned();
        // 파이프라인이 비활성화 상태면 검증을 건너뜀
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_empty_base_url_when_submit_enabled() {
        let mut config = BoxtallyConfig::default();
        config.submit.enabled = true;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn validate_rejects_non_http_base_url() {
        let mut config = BoxtallyConfig::default();
        config.submit.enabled = true;
        config.submit.base_url = "ftp://wms.example.com".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http"));
    }

    #[test]
    fn validate_rejects_zero_submit_timeout() {
        let mut config = BoxtallyConfig::default();
        config.submit.enabled = true;
        config.submit.base_url = "https://wms.example.com".to_owned();
        config.submit.timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: 테스트는 단일 스레드에서 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_BOXTALLY_STR", "overridden") };
        override_string(&mut val, "TEST_BOXTALLY_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_BOXTALLY_STR") };
    }

    #[test]
    fn env_override_bool_invalid_keeps_original() {
        let mut val = false;
        // SAFETY: 테스트는 단일 스레드에서 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_BOXTALLY_BOOL_BAD", "not-a-bool") };
        override_bool(&mut val, "TEST_BOXTALLY_BOOL_BAD");
        assert!(!val); // 원래 값 유지
        unsafe { std::env::remove_var("TEST_BOXTALLY_BOOL_BAD") };
    }

    #[test]
    fn env_override_csv() {
        let mut val = vec!["a".to_owned()];
        // SAFETY: 테스트는 단일 스레드에서 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_BOXTALLY_CSV", "tcp, hid") };
        override_csv(&mut val, "TEST_BOXTALLY_CSV");
        assert_eq!(val, vec!["tcp", "hid"]);
        unsafe { std::env::remove_var("TEST_BOXTALLY_CSV") };
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut val = "original".to_owned();
        override_string(&mut val, "TEST_BOXTALLY_NONEXISTENT_12345");
        assert_eq!(val, "original");
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = BoxtallyConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = BoxtallyConfig::parse(&toml_str).unwrap();
        assert_eq!(config.general.log_level, parsed.general.log_level);
        assert_eq!(config.scan_pipeline.tcp_bind, parsed.scan_pipeline.tcp_bind);
        assert_eq!(config.submit.timeout_secs, parsed.submit.timeout_secs);
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let result = BoxtallyConfig::from_file("/nonexistent/path/boxtally.toml").await;
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            BoxtallyError::Config(ConfigError::FileNotFound { .. })
        ));
    }
}
