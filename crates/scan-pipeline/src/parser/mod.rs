//! 스캔 파싱 모듈 -- `KEY=VALUE;` 바코드 형식, JSON 등 형식별 파서
//!
//! [`ParserRouter`]는 원시 스캔 데이터의 형식을 판별하여 적절한 파서를 선택합니다.
//! 각 파서는 core의 [`ScanParser`](boxtally_core::pipeline::ScanParser) trait을 구현합니다.
//!
//! # 지원 형식
//! - `KEY=VALUE;` 바코드 라인 ([`BarcodeScanParser`])
//! - 구조화 JSON ([`JsonScanParser`])
//!
//! # 사용 예시
//! ```ignore
//! use boxtally_scan_pipeline::parser::{ParserRouter, BarcodeScanParser, JsonScanParser};
//!
//! let router = ParserRouter::new()
//!     .register(Box::new(BarcodeScanParser::new()))
//!     .register(Box::new(JsonScanParser::default()));
//!
//! let record = router.parse(b"LRNO=A1;PkgsNo=3;BoxNo=1;")?;
//! ```

pub mod barcode;
pub mod json;

pub use barcode::BarcodeScanParser;
pub use json::{JsonFieldMapping, JsonScanParser};

use boxtally_core::error::BoxtallyError;
use boxtally_core::pipeline::ScanParser;
use boxtally_core::types::ScanRecord;

use crate::error::ScanPipelineError;

/// 파서 라우터 -- 스캔 형식을 자동 감지하여 적절한 파서를 선택합니다.
///
/// 등록된 파서 목록을 순회하며, 첫 번째로 파싱에 성공한 파서의 결과를 반환합니다.
/// 모든 파서가 실패하면 마지막 에러를 반환합니다.
pub struct ParserRouter {
    /// 등록된 파서 목록 (순서대로 시도)
    parsers: Vec<Box<dyn ScanParser>>,
}

impl ParserRouter {
    /// 새 파서 라우터를 생성합니다.
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// 기본 파서 세트 (바코드 + JSON)로 라우터를 생성합니다.
    pub fn with_defaults() -> Self {
        let mut router = Self::new();
        router.parsers.push(Box::new(BarcodeScanParser::new()));
        router.parsers.push(Box::new(JsonScanParser::default()));
        router
    }

    /// 파서를 등록합니다. 등록 순서대로 시도됩니다.
    pub fn register(mut self, parser: Box<dyn ScanParser>) -> Self {
        self.parsers.push(parser);
        self
    }

    /// 원시 스캔 데이터를 파싱합니다.
    ///
    /// 등록된 파서를 순서대로 시도하여 첫 번째 성공 결과를 반환합니다.
    /// 모든 파서가 실패하면 마지막 에러를 반환합니다.
    pub fn parse(&self, raw: &[u8]) -> Result<ScanRecord, BoxtallyError> {
        if self.parsers.is_empty() {
            return Err(
                ScanPipelineError::UnsupportedFormat("no parsers registered".to_owned()).into(),
            );
        }

        let mut last_error = None;

        for parser in &self.parsers {
            match parser.parse(raw) {
                Ok(record) => return Ok(record),
                Err(e) => {
                    last_error = Some(e);
                    continue;
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ScanPipelineError::UnsupportedFormat("all parsers failed".to_owned()).into()
        }))
    }

    /// 특정 형식 이름의 파서로 직접 파싱합니다.
    pub fn parse_with(&self, format_name: &str, raw: &[u8]) -> Result<ScanRecord, BoxtallyError> {
        for parser in &self.parsers {
            if parser.format_name() == format_name {
                return parser.parse(raw);
            }
        }
        Err(ScanPipelineError::UnsupportedFormat(format_name.to_owned()).into())
    }

    /// 등록된 파서 형식 이름 목록을 반환합니다.
    pub fn registered_formats(&self) -> Vec<&str> {
        self.parsers.iter().map(|p| p.format_name()).collect()
    }
}

impl Default for ParserRouter {
    fn default() -> Self {
        Self::with_defaults()
    }
}
