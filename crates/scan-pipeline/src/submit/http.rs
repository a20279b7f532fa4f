//! HTTP 제출 sink
//!
//! 트랜잭션 배치를 유형별 엔드포인트로 JSON POST합니다.
//! 백엔드는 유형별로 분리된 제출 엔드포인트를 제공합니다:
//!
//! ```text
//! {base_url}/audit_submit.php
//! {base_url}/inward_submit.php
//! {base_url}/outward_submit.php
//! {base_url}/prn_outward_submit.php
//! ```

use std::time::Duration;

use boxtally_core::pipeline::BoxFuture;
use boxtally_core::types::TransactionKind;
use tracing::{debug, warn};

use super::{SubmissionSink, TransactionPayload};
use crate::error::ScanPipelineError;

/// HTTP 제출 sink
///
/// `reqwest` 클라이언트로 유형별 엔드포인트에 JSON을 POST합니다.
/// 비성공 상태 코드는 제출 실패로 취급합니다.
pub struct HttpSubmissionSink {
    /// HTTP 클라이언트 (타임아웃 포함)
    client: reqwest::Client,
    /// 백엔드 기본 URL (trailing slash 없음)
    base_url: String,
}

impl HttpSubmissionSink {
    /// 새 HTTP sink를 생성합니다.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self, ScanPipelineError> {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_owned();

        if base_url.is_empty() {
            return Err(ScanPipelineError::Config {
                field: "base_url".to_owned(),
                reason: "base_url must not be empty".to_owned(),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ScanPipelineError::Config {
                field: "base_url".to_owned(),
                reason: format!("failed to build http client: {e}"),
            })?;

        Ok(Self { client, base_url })
    }

    /// 트랜잭션 유형별 제출 엔드포인트 URL을 반환합니다.
    pub fn endpoint(&self, kind: TransactionKind) -> String {
        let path = match kind {
            TransactionKind::Audit => "audit_submit.php",
            TransactionKind::Inward => "inward_submit.php",
            TransactionKind::Outward => "outward_submit.php",
            TransactionKind::PrnOutward => "prn_outward_submit.php",
        };
        format!("{}/{}", self.base_url, path)
    }

    /// 페이로드를 POST하고 상태 코드를 확인합니다.
    async fn post_payload(&self, payload: &TransactionPayload) -> Result<(), ScanPipelineError> {
        let url = self.endpoint(payload.kind);
        debug!(
            url = %url,
            shipments = payload.shipment_count(),
            "submitting transaction batch"
        );

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| ScanPipelineError::Submit {
                kind: payload.kind.to_string(),
                reason: format!("transport failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                url = %url,
                status = status.as_u16(),
                "backend rejected submission"
            );
            return Err(ScanPipelineError::Submit {
                kind: payload.kind.to_string(),
                reason: format!("HTTP {}", status.as_u16()),
            });
        }

        debug!(url = %url, "submission accepted");
        Ok(())
    }
}

impl SubmissionSink for HttpSubmissionSink {
    fn name(&self) -> &str {
        "http"
    }

    fn submit<'a>(
        &'a self,
        payload: &'a TransactionPayload,
    ) -> BoxFuture<'a, Result<(), ScanPipelineError>> {
        Box::pin(self.post_payload(payload))
    }
}
