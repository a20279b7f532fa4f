//! boxtally.toml 통합 설정 테스트
//!
//! - boxtally.toml.example 파싱 테스트
//! - 부분 설정 (일부 섹션만) 로딩 테스트
//! - 환경변수 우선순위 테스트
//! - 빈 파일 / 잘못된 형식 에러 테스트

use serial_test::serial;

use boxtally_core::config::BoxtallyConfig;
use boxtally_core::error::{BoxtallyError, ConfigError};
use boxtally_core::types::TransactionKind;

// =============================================================================
// boxtally.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../boxtally.toml.example");
    let config = BoxtallyConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "json");
    assert_eq!(config.general.data_dir, "/var/lib/boxtally");
    assert_eq!(config.general.pid_file, "");
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../boxtally.toml.example");
    let config = BoxtallyConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_has_correct_pipeline_defaults() {
    let content = include_str!("../../../boxtally.toml.example");
    let config = BoxtallyConfig::parse(content).expect("should parse");

    assert!(config.scan_pipeline.enabled);
    assert_eq!(config.scan_pipeline.sources, vec!["tcp"]);
    assert_eq!(config.scan_pipeline.tcp_bind, "0.0.0.0:7070");
    assert_eq!(config.default_kind(), TransactionKind::Inward);
    assert_eq!(config.scan_pipeline.batch_size, 50);
    assert_eq!(config.scan_pipeline.flush_interval_secs, 2);
    assert_eq!(config.scan_pipeline.debounce_ms, 400);
}

#[test]
fn example_config_has_correct_submit_defaults() {
    let content = include_str!("../../../boxtally.toml.example");
    let config = BoxtallyConfig::parse(content).expect("should parse");

    assert!(!config.submit.enabled);
    assert_eq!(config.submit.device_id, "boxtally-01");
    assert_eq!(config.submit.timeout_secs, 15);
    assert!(!config.submit.auto_submit);
}

#[test]
fn example_config_has_correct_metrics_defaults() {
    let content = include_str!("../../../boxtally.toml.example");
    let config = BoxtallyConfig::parse(content).expect("should parse");

    assert!(!config.metrics.enabled);
    assert_eq!(config.metrics.listen_addr, "127.0.0.1");
    assert_eq!(config.metrics.port, 9187);
    assert_eq!(config.metrics.endpoint, "/metrics");
}

// =============================================================================
// 파일 로딩 테스트
// =============================================================================

#[tokio::test]
async fn load_from_tempfile() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("boxtally.toml");
    tokio::fs::write(
        &path,
        "[general]\nlog_level = \"debug\"\n\n[scan_pipeline]\ndefault_kind = \"audit\"\n",
    )
    .await
    .expect("write config");

    let config = BoxtallyConfig::from_file(&path).await.expect("load config");
    assert_eq!(config.general.log_level, "debug");
    assert_eq!(config.default_kind(), TransactionKind::Audit);
}

#[tokio::test]
async fn load_missing_file_is_file_not_found() {
    let result = BoxtallyConfig::load("/nonexistent/boxtally-test.toml").await;
    assert!(matches!(
        result.unwrap_err(),
        BoxtallyError::Config(ConfigError::FileNotFound { .. })
    ));
}

#[tokio::test]
async fn load_invalid_file_fails_validation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("boxtally.toml");
    tokio::fs::write(&path, "[general]\nlog_level = \"extreme\"\n")
        .await
        .expect("write config");

    let result = BoxtallyConfig::from_file(&path).await;
    assert!(matches!(
        result.unwrap_err(),
        BoxtallyError::Config(ConfigError::InvalidValue { .. })
    ));
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

#[test]
#[serial]
fn env_override_beats_file_value() {
    // SAFETY: #[serial] 테스트는 동시에 실행되지 않으므로 환경변수 조작이 안전합니다.
    unsafe { std::env::set_var("BOXTALLY_GENERAL_LOG_LEVEL", "error") };

    let mut config = BoxtallyConfig::parse("[general]\nlog_level = \"debug\"\n").expect("parse");
    config.apply_env_overrides();
    assert_eq!(config.general.log_level, "error");

    unsafe { std::env::remove_var("BOXTALLY_GENERAL_LOG_LEVEL") };
}

#[test]
#[serial]
fn env_override_submit_base_url() {
    // SAFETY: #[serial] 테스트는 동시에 실행되지 않으므로 환경변수 조작이 안전합니다.
    unsafe { std::env::set_var("BOXTALLY_SUBMIT_BASE_URL", "https://override.example.com") };

    let mut config = BoxtallyConfig::default();
    config.apply_env_overrides();
    assert_eq!(config.submit.base_url, "https://override.example.com");

    unsafe { std::env::remove_var("BOXTALLY_SUBMIT_BASE_URL") };
}

#[test]
#[serial]
fn env_override_sources_csv() {
    // SAFETY: #[serial] 테스트는 동시에 실행되지 않으므로 환경변수 조작이 안전합니다.
    unsafe { std::env::set_var("BOXTALLY_SCAN_PIPELINE_SOURCES", "tcp,hid") };

    let mut config = BoxtallyConfig::default();
    config.apply_env_overrides();
    assert_eq!(config.scan_pipeline.sources, vec!["tcp", "hid"]);
    config.validate().expect("overridden sources are valid");

    unsafe { std::env::remove_var("BOXTALLY_SCAN_PIPELINE_SOURCES") };
}
