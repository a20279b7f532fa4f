//! JSON 스캔 페이로드 파서
//!
//! 카메라 디코더 브리지 앱이 HTTP/TCP로 전달하는 구조화 JSON 스캔을
//! 파싱합니다. 필드 이름 매핑을 통해 서로 다른 브리지 구현을 지원합니다.
//!
//! # 사용 예시
//! ```ignore
//! use boxtally_scan_pipeline::parser::JsonScanParser;
//! use boxtally_core::pipeline::ScanParser;
//!
//! let parser = JsonScanParser::default();
//! let record = parser.parse(br#"{"lrno":"A1","pkgs_no":3,"box_no":1}"#)?;
//! assert_eq!(record.shipment_id, "A1");
//! ```

use boxtally_core::error::BoxtallyError;
use boxtally_core::pipeline::ScanParser;
use boxtally_core::types::ScanRecord;

use crate::error::ScanPipelineError;

/// JSON 스캔 필드 매핑 설정
///
/// 브리지 앱마다 필드 이름이 다르므로 매핑으로 통합합니다.
#[derive(Debug, Clone)]
pub struct JsonFieldMapping {
    /// 선적 식별자 필드명 (기본: "lrno")
    pub shipment_field: String,
    /// 기대 박스 수 필드명 (기본: "pkgs_no")
    pub expected_field: String,
    /// 박스 번호 필드명 (기본: "box_no")
    pub box_field: String,
}

impl Default for JsonFieldMapping {
    fn default() -> Self {
        Self {
            shipment_field: "lrno".to_owned(),
            expected_field: "pkgs_no".to_owned(),
            box_field: "box_no".to_owned(),
        }
    }
}

/// JSON 스캔 파서
///
/// 구조화된 JSON 스캔 페이로드를 `ScanRecord`로 변환합니다.
/// [`JsonFieldMapping`]을 통해 다양한 브리지 형식을 지원합니다.
pub struct JsonScanParser {
    /// 필드 매핑 설정
    mapping: JsonFieldMapping,
    /// 최대 허용 입력 크기 (바이트)
    max_input_size: usize,
}

impl JsonScanParser {
    /// 커스텀 필드 매핑으로 새 파서를 생성합니다.
    pub fn new(mapping: JsonFieldMapping) -> Self {
        Self {
            mapping,
            max_input_size: 64 * 1024, // 64KB
        }
    }

    /// 최대 입력 크기를 설정합니다.
    pub fn with_max_input_size(mut self, size: usize) -> Self {
        self.max_input_size = size;
        self
    }

    /// JSON 값에서 정수 필드를 추출합니다.
    ///
    /// 숫자 또는 숫자 문자열("3")을 모두 허용합니다.
    fn extract_int(value: &serde_json::Value, field: &str) -> Option<i64> {
        match value.get(field)? {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// JSON 바이트를 파싱하여 `ScanRecord`를 생성합니다.
    fn parse_json(&self, raw: &[u8]) -> Result<ScanRecord, ScanPipelineError> {
        if raw.len() > self.max_input_size {
            return Err(ScanPipelineError::Parse {
                format: "json".to_owned(),
                offset: 0,
                reason: format!(
                    "input too large: {} bytes (max: {})",
                    raw.len(),
                    self.max_input_size
                ),
            });
        }

        let value: serde_json::Value =
            serde_json::from_slice(raw).map_err(|e| ScanPipelineError::Parse {
                format: "json".to_owned(),
                offset: e.column(),
                reason: e.to_string(),
            })?;

        // 최상위가 JSON 객체여야 합니다
        if !value.is_object() {
            return Err(ScanPipelineError::Parse {
                format: "json".to_owned(),
                offset: 0,
                reason: "expected JSON object at top level".to_owned(),
            });
        }

        let shipment_id = value
            .get(&self.mapping.shipment_field)
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ScanPipelineError::Parse {
                format: "json".to_owned(),
                offset: 0,
                reason: format!("missing or empty field '{}'", self.mapping.shipment_field),
            })?;

        let expected_count = Self::extract_int(&value, &self.mapping.expected_field)
            .ok_or_else(|| ScanPipelineError::Parse {
                format: "json".to_owned(),
                offset: 0,
                reason: format!("missing or non-integer field '{}'", self.mapping.expected_field),
            })?;

        let box_number = Self::extract_int(&value, &self.mapping.box_field).ok_or_else(|| {
            ScanPipelineError::Parse {
                format: "json".to_owned(),
                offset: 0,
                reason: format!("missing or non-integer field '{}'", self.mapping.box_field),
            }
        })?;

        Ok(ScanRecord {
            shipment_id: shipment_id.to_owned(),
            expected_count,
            box_number,
        })
    }
}

impl Default for JsonScanParser {
    fn default() -> Self {
        Self::new(JsonFieldMapping::default())
    }
}

impl ScanParser for JsonScanParser {
    fn format_name(&self) -> &str {
        "json"
    }

    fn parse(&self, raw: &[u8]) -> Result<ScanRecord, BoxtallyError> {
        self.parse_json(raw).map_err(BoxtallyError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_name_is_json() {
        let parser = JsonScanParser::default();
        assert_eq!(parser.format_name(), "json");
    }

    #[test]
    fn parse_basic_payload() {
        let parser = JsonScanParser::default();
        let record = parser
            .parse(br#"{"lrno":"A1","pkgs_no":3,"box_no":1}"#)
            .unwrap();
        assert_eq!(record.shipment_id, "A1");
        assert_eq!(record.expected_count, 3);
        assert_eq!(record.box_number, 1);
    }

    #[test]
    fn parse_numeric_strings() {
        // 일부 브리지는 숫자를 문자열로 보냄
        let parser = JsonScanParser::default();
        let record = parser
            .parse(br#"{"lrno":"A1","pkgs_no":"3","box_no":"2"}"#)
            .unwrap();
        assert_eq!(record.expected_count, 3);
        assert_eq!(record.box_number, 2);
    }

    #[test]
    fn parse_extra_fields_ignored() {
        let parser = JsonScanParser::default();
        let record = parser
            .parse(br#"{"lrno":"A1","pkgs_no":3,"box_no":1,"device":"cam-2","ts":"2024-01-15"}"#)
            .unwrap();
        assert_eq!(record.shipment_id, "A1");
    }

    #[test]
    fn parse_custom_field_mapping() {
        let mapping = JsonFieldMapping {
            shipment_field: "shipment".to_owned(),
            expected_field: "total".to_owned(),
            box_field: "seq".to_owned(),
        };
        let parser = JsonScanParser::new(mapping);
        let record = parser
            .parse(br#"{"shipment":"LR-9","total":5,"seq":4}"#)
            .unwrap();
        assert_eq!(record.shipment_id, "LR-9");
        assert_eq!(record.expected_count, 5);
        assert_eq!(record.box_number, 4);
    }

    #[test]
    fn parse_missing_shipment_fails() {
        let parser = JsonScanParser::default();
        let err = parser.parse(br#"{"pkgs_no":3,"box_no":1}"#).unwrap_err();
        assert!(err.to_string().contains("lrno"));
    }

    #[test]
    fn parse_empty_shipment_fails() {
        let parser = JsonScanParser::default();
        assert!(parser.parse(br#"{"lrno":"","pkgs_no":3,"box_no":1}"#).is_err());
    }

    #[test]
    fn parse_non_integer_expected_fails() {
        let parser = JsonScanParser::default();
        assert!(parser
            .parse(br#"{"lrno":"A1","pkgs_no":"many","box_no":1}"#)
            .is_err());
    }

    #[test]
    fn parse_float_box_number_fails() {
        let parser = JsonScanParser::default();
        assert!(parser
            .parse(br#"{"lrno":"A1","pkgs_no":3,"box_no":1.5}"#)
            .is_err());
    }

    #[test]
    fn parse_negative_values_pass_through() {
        let parser = JsonScanParser::default();
        let record = parser
            .parse(br#"{"lrno":"A1","pkgs_no":-1,"box_no":0}"#)
            .unwrap();
        assert_eq!(record.expected_count, -1);
        assert_eq!(record.box_number, 0);
    }

    #[test]
    fn parse_top_level_array_fails() {
        let parser = JsonScanParser::default();
        assert!(parser.parse(br#"[1,2,3]"#).is_err());
    }

    #[test]
    fn parse_invalid_json_fails() {
        let parser = JsonScanParser::default();
        assert!(parser.parse(b"{not json").is_err());
    }

    #[test]
    fn parse_barcode_line_fails() {
        // 바코드 형식은 JSON 파서에서 거부되어야 라우터 폴백이 동작함
        let parser = JsonScanParser::default();
        assert!(parser.parse(b"LRNO=A1;PkgsNo=3;BoxNo=1;").is_err());
    }

    #[test]
    fn parse_too_large_input_fails() {
        let parser = JsonScanParser::default().with_max_input_size(8);
        assert!(parser.parse(br#"{"lrno":"A1","pkgs_no":3,"box_no":1}"#).is_err());
    }
}
