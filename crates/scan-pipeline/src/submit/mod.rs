//! 제출 모듈 -- 트랜잭션 배치 직렬화 및 백엔드 전송
//!
//! [`TransactionPayload`]는 원장 스냅샷의 JSON 직렬화 형식이고,
//! [`SubmissionSink`]는 전송 계층의 경계(seam)입니다.
//! 운영 구현은 [`HttpSubmissionSink`]이며, 테스트에서는 mock sink를
//! 주입합니다.
//!
//! 활성 컨텍스트는 sink가 성공을 확인한 뒤에만 비워집니다.
//! 전송 실패는 원장을 절대 변경하지 않습니다.

pub mod http;
pub mod payload;

pub use http::HttpSubmissionSink;
pub use payload::{ShipmentEntry, TransactionPayload};

use boxtally_core::pipeline::BoxFuture;

use crate::error::ScanPipelineError;

/// 제출 전송 계층 trait
///
/// 새로운 전송 방식(HTTP 외)을 지원하려면 이 trait을 구현합니다.
/// `BoxFuture` 반환으로 `Box<dyn SubmissionSink>` 형태의 동적 주입이
/// 가능합니다.
pub trait SubmissionSink: Send + Sync {
    /// sink 이름 (로깅용)
    fn name(&self) -> &str;

    /// 페이로드를 백엔드에 제출합니다.
    ///
    /// `Ok(())`은 백엔드가 배치를 수락했음을 의미합니다.
    fn submit<'a>(
        &'a self,
        payload: &'a TransactionPayload,
    ) -> BoxFuture<'a, Result<(), ScanPipelineError>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxtally_core::types::{ShipmentTally, TransactionKind};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 테스트용 mock sink -- 제출 횟수를 세고 항상 성공
    struct CountingSink {
        submitted: Arc<AtomicUsize>,
    }

    impl SubmissionSink for CountingSink {
        fn name(&self) -> &str {
            "counting"
        }

        fn submit<'a>(
            &'a self,
            _payload: &'a TransactionPayload,
        ) -> BoxFuture<'a, Result<(), ScanPipelineError>> {
            Box::pin(async move {
                self.submitted.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        }
    }

    #[tokio::test]
    async fn sink_can_be_boxed_and_called() {
        let submitted = Arc::new(AtomicUsize::new(0));
        let sink: Box<dyn SubmissionSink> = Box::new(CountingSink {
            submitted: Arc::clone(&submitted),
        });

        let tally = ShipmentTally::new("A1", 1, 1);
        let snapshot = vec![&tally];
        let payload = TransactionPayload::from_snapshot(TransactionKind::Inward, "d", &snapshot);

        sink.submit(&payload).await.unwrap();
        assert_eq!(submitted.load(Ordering::SeqCst), 1);
        assert_eq!(sink.name(), "counting");
    }
}
