//! 에러 타입 — 도메인별 에러 정의

/// Boxtally 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum BoxtallyError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 파이프라인 처리 에러
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// 스캔 파싱 에러
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// 제출 게이트웨이 에러
    #[error("submit error: {0}")]
    Submit(#[from] SubmitError),

    /// 플러그인 생명주기 에러
    #[error("plugin error: {0}")]
    Plugin(#[from] PluginError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 파이프라인 처리 에러
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// 채널 전송 실패
    #[error("channel send failed: {0}")]
    ChannelSend(String),

    /// 채널 수신 실패
    #[error("channel receive failed: {0}")]
    ChannelRecv(String),

    /// 파이프라인 초기화 실패
    #[error("pipeline init failed: {0}")]
    InitFailed(String),

    /// 이미 실행 중인 파이프라인을 다시 시작하려 함
    #[error("pipeline already running")]
    AlreadyRunning,

    /// 실행 중이 아닌 파이프라인을 정지하려 함
    #[error("pipeline not running")]
    NotRunning,
}

/// 스캔 파싱 에러
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// 지원하지 않는 형식
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// 필수 키 누락 (LRNO, PkgsNo, BoxNo)
    #[error("missing required field: {field}")]
    MissingField { field: String },

    /// 정수 필드 파싱 실패
    #[error("invalid integer for '{field}': '{value}'")]
    InvalidNumber { field: String, value: String },

    /// 파싱 실패
    #[error("parse failed at offset {offset}: {reason}")]
    Failed { offset: usize, reason: String },

    /// 입력 데이터 초과
    #[error("input too large: {size} bytes (max: {max})")]
    TooLarge { size: usize, max: usize },
}

/// 제출 게이트웨이 에러
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// 엔드포인트 구성 실패
    #[error("invalid endpoint for '{kind}': {reason}")]
    Endpoint { kind: String, reason: String },

    /// 전송 실패 (연결, 타임아웃 등)
    #[error("transport failed: {0}")]
    Transport(String),

    /// 백엔드가 비성공 상태 코드를 반환함
    #[error("backend rejected submission: HTTP {code}")]
    Status { code: u16 },
}

/// 플러그인 생명주기 에러
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// 동일한 이름의 플러그인이 이미 등록됨
    #[error("plugin already registered: {name}")]
    AlreadyRegistered { name: String },

    /// 플러그인을 찾을 수 없음
    #[error("plugin not found: {name}")]
    NotFound { name: String },

    /// 유효하지 않은 상태에서의 생명주기 전환
    #[error("plugin '{name}' in state '{current}', expected '{expected}'")]
    InvalidState {
        name: String,
        current: String,
        expected: String,
    },

    /// 하나 이상의 플러그인 정지 실패
    #[error("plugin stop failed: {0}")]
    StopFailed(String),
}
