//! 바코드 스캔 라인 파서
//!
//! 핸드 스캐너와 카메라 디코더가 내보내는 `KEY=VALUE;` 형식의
//! 스캔 라인을 파싱합니다.
//!
//! # 스캔 라인 형식
//! ```text
//! LRNO=<string>;PkgsNo=<int>;BoxNo=<int>;
//! ```
//!
//! 필드 순서는 무관하며, 인식하지 않는 키는 무시됩니다.
//!
//! # 사용 예시
//! ```ignore
//! use boxtally_scan_pipeline::parser::BarcodeScanParser;
//! use boxtally_core::pipeline::ScanParser;
//!
//! let parser = BarcodeScanParser::new();
//! let record = parser.parse(b"LRNO=A1;PkgsNo=3;BoxNo=1;")?;
//! assert_eq!(record.shipment_id, "A1");
//! ```

use boxtally_core::error::BoxtallyError;
use boxtally_core::pipeline::ScanParser;
use boxtally_core::types::ScanRecord;

use crate::error::ScanPipelineError;

/// 선적 식별자 키 (대소문자 구분, 정확 일치)
const KEY_SHIPMENT: &str = "LRNO";
/// 기대 박스 수 키
const KEY_EXPECTED: &str = "PkgsNo";
/// 박스 번호 키
const KEY_BOX: &str = "BoxNo";

/// 바코드 스캔 라인 파서
///
/// core의 [`ScanParser`] trait을 구현하여 스캔 라인을 `ScanRecord`로 변환합니다.
///
/// ## 파싱 규칙
/// - `;`로 필드 분리, 각 필드는 첫 `=`에서 키/값으로 분리
/// - `=`가 없는 필드는 조용히 버림
/// - `LRNO`, `PkgsNo`, `BoxNo` 세 키가 모두 있어야 함
/// - `PkgsNo`/`BoxNo`는 정수여야 하지만 값 범위는 검증하지 않음
///   (0이나 음수도 그대로 통과)
pub struct BarcodeScanParser {
    /// 최대 허용 입력 크기 (바이트)
    max_input_size: usize,
}

impl BarcodeScanParser {
    /// 기본 설정으로 새 파서를 생성합니다.
    pub fn new() -> Self {
        Self {
            max_input_size: 4 * 1024, // 4KB
        }
    }

    /// 최대 입력 크기를 설정합니다.
    pub fn with_max_input_size(mut self, size: usize) -> Self {
        self.max_input_size = size;
        self
    }

    /// 원시 스캔 라인을 파싱합니다.
    fn parse_barcode(&self, raw: &[u8]) -> Result<ScanRecord, ScanPipelineError> {
        if raw.len() > self.max_input_size {
            return Err(ScanPipelineError::Parse {
                format: "barcode".to_owned(),
                offset: 0,
                reason: format!(
                    "input too large: {} bytes (max: {})",
                    raw.len(),
                    self.max_input_size
                ),
            });
        }

        let input = String::from_utf8_lossy(raw);
        let input = input.trim();

        if input.is_empty() {
            return Err(ScanPipelineError::Parse {
                format: "barcode".to_owned(),
                offset: 0,
                reason: "empty input".to_owned(),
            });
        }

        let mut shipment_id: Option<&str> = None;
        let mut expected_raw: Option<&str> = None;
        let mut box_raw: Option<&str> = None;

        let mut offset = 0usize;
        for field in input.split(';') {
            let field_offset = offset;
            offset += field.len() + 1;

            let field = field.trim();
            if field.is_empty() {
                continue;
            }

            // 첫 '='에서 키/값 분리. '='가 없는 필드는 조용히 버림.
            let Some((key, value)) = field.split_once('=') else {
                continue;
            };

            match key {
                KEY_SHIPMENT => {
                    if value.is_empty() {
                        return Err(ScanPipelineError::Parse {
                            format: "barcode".to_owned(),
                            offset: field_offset,
                            reason: "LRNO value must not be empty".to_owned(),
                        });
                    }
                    shipment_id = Some(value);
                }
                KEY_EXPECTED => expected_raw = Some(value),
                KEY_BOX => box_raw = Some(value),
                // 인식하지 않는 키는 무시
                _ => {}
            }
        }

        let shipment_id = shipment_id.ok_or_else(|| missing_key(KEY_SHIPMENT))?;
        let expected_raw = expected_raw.ok_or_else(|| missing_key(KEY_EXPECTED))?;
        let box_raw = box_raw.ok_or_else(|| missing_key(KEY_BOX))?;

        let expected_count = parse_int(KEY_EXPECTED, expected_raw)?;
        let box_number = parse_int(KEY_BOX, box_raw)?;

        Ok(ScanRecord {
            shipment_id: shipment_id.to_owned(),
            expected_count,
            box_number,
        })
    }
}

/// 필수 키 누락 에러를 생성합니다.
fn missing_key(key: &str) -> ScanPipelineError {
    ScanPipelineError::Parse {
        format: "barcode".to_owned(),
        offset: 0,
        reason: format!("missing required key: {key}"),
    }
}

/// 정수 필드를 파싱합니다. 범위 검증은 하지 않습니다.
fn parse_int(key: &str, value: &str) -> Result<i64, ScanPipelineError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| ScanPipelineError::Parse {
            format: "barcode".to_owned(),
            offset: 0,
            reason: format!("invalid integer for {key}: '{value}'"),
        })
}

impl Default for BarcodeScanParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanParser for BarcodeScanParser {
    fn format_name(&self) -> &str {
        "barcode"
    }

    fn parse(&self, raw: &[u8]) -> Result<ScanRecord, BoxtallyError> {
        self.parse_barcode(raw).map_err(BoxtallyError::from)
    }
}
