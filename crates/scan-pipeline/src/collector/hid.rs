//! HID(키보드 웨지) 스캔 수집기
//!
//! 키보드 웨지 모드의 핸드 스캐너는 스캔 내용을 타이핑하고 Enter를
//! 입력합니다. 이 수집기는 프로세스에 연결된 stdin을 라인 단위로 읽어
//! 스캔으로 전달합니다.

use bytes::Bytes;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::{CollectorStatus, RawScan};
use crate::error::ScanPipelineError;

/// HID stdin 수집기의 소스 식별자
const HID_SOURCE: &str = "hid:stdin";

/// HID stdin 스캔 수집기
///
/// stdin을 라인 단위로 읽어 각 라인을 하나의 스캔으로 전달합니다.
/// 빈 라인은 무시합니다.
pub struct HidStdinCollector {
    /// 수집된 스캔 전송 채널
    tx: mpsc::Sender<RawScan>,
    /// Cancellation token for graceful shutdown
    cancel_token: CancellationToken,
    /// 현재 상태
    status: CollectorStatus,
}

impl HidStdinCollector {
    /// 새 HID stdin 수집기를 생성합니다.
    pub fn new(tx: mpsc::Sender<RawScan>, cancel_token: CancellationToken) -> Self {
        Self {
            tx,
            cancel_token,
            status: CollectorStatus::Idle,
        }
    }

    /// 수집기를 시작합니다.
    ///
    /// stdin이 닫히거나(EOF) 취소 신호를 받을 때까지 실행됩니다.
    pub async fn run(&mut self) -> Result<(), ScanPipelineError> {
        self.status = CollectorStatus::Running;
        info!("Starting HID stdin scan collector");

        let reader = BufReader::new(tokio::io::stdin());
        let result = pump_lines(reader, &self.tx, HID_SOURCE, &self.cancel_token).await;

        self.status = CollectorStatus::Stopped;
        result
    }

    /// 현재 상태를 반환합니다.
    pub fn status(&self) -> &CollectorStatus {
        &self.status
    }
}

/// 버퍼 리더에서 라인을 읽어 스캔 채널로 펌프합니다.
///
/// EOF 또는 취소 신호에서 정상 종료합니다.
/// stdin 외의 리더로도 동작하므로 테스트에서 직접 호출할 수 있습니다.
pub async fn pump_lines<R: AsyncBufRead + Unpin>(
    mut reader: R,
    tx: &mpsc::Sender<RawScan>,
    source: &str,
    cancel: &CancellationToken,
) -> Result<(), ScanPipelineError> {
    let mut line_buffer = String::new();

    loop {
        line_buffer.clear();

        tokio::select! {
            result = reader.read_line(&mut line_buffer) => {
                match result {
                    Ok(0) => {
                        // EOF - 입력 종료
                        debug!(source, "input closed (EOF)");
                        break;
                    }
                    Ok(_) => {
                        // 빈 라인 스킵 (스캐너의 Enter 입력만 있는 경우)
                        if line_buffer.trim().is_empty() {
                            continue;
                        }

                        let data = Bytes::from(line_buffer.trim_end().to_owned());
                        let raw_scan = RawScan::new(data, source);

                        if let Err(e) = tx.send(raw_scan).await {
                            error!("Failed to send scan to channel: {}", e);
                            return Err(ScanPipelineError::Channel(e.to_string()));
                        }
                    }
                    Err(e) => {
                        error!(source, "read error: {}", e);
                        return Err(ScanPipelineError::Collector {
                            source_type: "hid".to_owned(),
                            reason: format!("read error: {}", e),
                        });
                    }
                }
            }
            _ = cancel.cancelled() => {
                debug!(source, "received shutdown signal");
                break;
            }
        }
    }

    Ok(())
}
