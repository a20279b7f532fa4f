//! TCP 스캔 수집기
//!
//! 네트워크 스캐너 브리지(Bluetooth HID 게이트웨이, 카메라 디코더 앱)가
//! 내보내는 newline 구분 스캔 라인을 TCP 소켓으로 수신합니다.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Semaphore, mpsc};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::{CollectorStatus, RawScan};
use crate::error::ScanPipelineError;

/// TCP 스캔 수집기 설정
#[derive(Debug, Clone)]
pub struct ScanTcpConfig {
    /// 바인드 주소 (예: "0.0.0.0:7070")
    pub bind_addr: String,
    /// 최대 동시 연결 수
    pub max_connections: usize,
    /// 최대 스캔 라인 크기 (바이트)
    pub max_line_size: usize,
    /// 연결 타임아웃 (초)
    pub connection_timeout_secs: u64,
}

impl Default for ScanTcpConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:7070".to_owned(),
            max_connections: 64,
            max_line_size: 4 * 1024,      // 4KB
            connection_timeout_secs: 300, // 5 minutes
        }
    }
}

/// TCP 스캔 수집기
///
/// TCP 소켓에서 스캔 라인을 수신합니다.
/// 각 TCP 연결은 별도의 tokio 태스크에서 처리됩니다.
pub struct ScanTcpCollector {
    /// 수집기 설정
    config: ScanTcpConfig,
    /// 수집된 스캔 전송 채널
    tx: mpsc::Sender<RawScan>,
    /// Cancellation token for graceful shutdown
    cancel_token: CancellationToken,
    /// 현재 상태
    status: CollectorStatus,
    /// 현재 활성 연결 수
    active_connections: usize,
}

impl ScanTcpCollector {
    /// 새 TCP 스캔 수집기를 생성합니다.
    pub fn new(
        config: ScanTcpConfig,
        tx: mpsc::Sender<RawScan>,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            config,
            tx,
            cancel_token,
            status: CollectorStatus::Idle,
            active_connections: 0,
        }
    }

    /// 수집기를 시작합니다.
    ///
    /// TCP 소켓에 바인드하고 연결 수락 루프를 실행합니다.
    /// 각 연결은 별도 태스크에서 처리됩니다.
    /// CancellationToken을 통해 graceful shutdown을 지원합니다.
    pub async fn run(&mut self) -> Result<(), ScanPipelineError> {
        self.status = CollectorStatus::Running;
        info!("Starting TCP scan collector on {}", self.config.bind_addr);

        // TCP 리스너 바인드
        let listener = TcpListener::bind(&self.config.bind_addr)
            .await
            .map_err(|e| ScanPipelineError::Collector {
                source_type: "tcp".to_owned(),
                reason: format!("failed to bind to {}: {}", self.config.bind_addr, e),
            })?;

        info!("TCP scan collector listening on {}", self.config.bind_addr);

        // 연결 수 제한을 위한 세마포어
        let connection_semaphore = Arc::new(Semaphore::new(self.config.max_connections));

        loop {
            tokio::select! {
                result = listener.accept() => {
                    let (stream, addr) = result.map_err(|e| ScanPipelineError::Collector {
                        source_type: "tcp".to_owned(),
                        reason: format!("accept error: {}", e),
                    })?;

                    debug!("Accepted scanner connection from {}", addr);

                    // 연결 수 제한 확인
                    let permit = match connection_semaphore.clone().try_acquire_owned() {
                        Ok(p) => p,
                        Err(_) => {
                            warn!(
                                "Max connections reached, rejecting connection from {}",
                                addr
                            );
                            continue;
                        }
                    };

                    self.active_connections += 1;

                    let tx = self.tx.clone();
                    let config = self.config.clone();
                    let bind_addr = self.config.bind_addr.clone();
                    let cancel = self.cancel_token.clone();

                    // 각 연결을 별도 태스크에서 처리
                    tokio::spawn(async move {
                        if let Err(e) = Self::handle_connection(stream, tx, config, bind_addr, cancel).await {
                            error!("Scanner connection handler error: {}", e);
                        }
                        drop(permit); // 연결 종료 시 세마포어 반환
                    });
                }
                _ = self.cancel_token.cancelled() => {
                    info!("TCP scan collector received shutdown signal");
                    self.status = CollectorStatus::Stopped;
                    break;
                }
            }
        }

        Ok(())
    }

    /// 단일 스캐너 연결을 처리합니다.
    ///
    /// 스캐너 브리지는 라인당 하나의 스캔을 보냅니다 (newline 구분).
    async fn handle_connection(
        stream: TcpStream,
        tx: mpsc::Sender<RawScan>,
        config: ScanTcpConfig,
        bind_addr: String,
        cancel: CancellationToken,
    ) -> Result<(), ScanPipelineError> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_owned());

        let mut reader = BufReader::new(stream);
        let mut line_buffer = String::new();
        let connection_timeout = Duration::from_secs(config.connection_timeout_secs);

        loop {
            line_buffer.clear();

            // 타임아웃과 함께 라인 읽기, cancellation token도 체크
            tokio::select! {
                result = timeout(connection_timeout, reader.read_line(&mut line_buffer)) => {
                    match result {
                        Ok(Ok(0)) => {
                            // EOF - 연결 종료
                            debug!("Scanner connection closed by peer: {}", peer_addr);
                            break;
                        }
                        Ok(Ok(_bytes_read)) => {
                            // 라인이 최대 크기를 초과하는지 확인
                            if line_buffer.len() > config.max_line_size {
                                warn!(
                                    "Scan line exceeds max size from {} ({} bytes, max: {}), closing connection",
                                    peer_addr,
                                    line_buffer.len(),
                                    config.max_line_size
                                );
                                break;
                            }

                            // 빈 라인 스킵
                            if line_buffer.trim().is_empty() {
                                continue;
                            }

                            // RawScan 생성 및 전송
                            let data = Bytes::from(line_buffer.trim_end().to_owned());
                            let raw_scan =
                                RawScan::new(data, format!("tcp:{}[{}]", bind_addr, peer_addr));

                            if let Err(e) = tx.send(raw_scan).await {
                                error!("Failed to send scan to channel: {}", e);
                                return Err(ScanPipelineError::Channel(e.to_string()));
                            }
                        }
                        Ok(Err(e)) => {
                            error!("Read error from {}: {}", peer_addr, e);
                            return Err(ScanPipelineError::Collector {
                                source_type: "tcp".to_owned(),
                                reason: format!("read error: {}", e),
                            });
                        }
                        Err(_) => {
                            warn!("Scanner connection timeout from {}", peer_addr);
                            return Err(ScanPipelineError::Collector {
                                source_type: "tcp".to_owned(),
                                reason: "connection timeout".to_owned(),
                            });
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    debug!("Connection handler for {} received shutdown signal", peer_addr);
                    break;
                }
            }
        }

        Ok(())
    }

    /// 바인드 주소를 반환합니다.
    pub fn bind_addr(&self) -> &str {
        &self.config.bind_addr
    }

    /// 현재 활성 연결 수를 반환합니다.
    pub fn active_connections(&self) -> usize {
        self.active_connections
    }

    /// 현재 상태를 반환합니다.
    pub fn status(&self) -> &CollectorStatus {
        &self.status
    }
}
