//! 파이프라인 오케스트레이션 -- 수집/파싱/집계/제출의 전체 흐름을 관리합니다.
//!
//! [`ScanPipeline`]은 core의 [`Plugin`](boxtally_core::plugin::Plugin) trait을 구현하여
//! `boxtally-daemon`에서 다른 모듈과 동일한 생명주기로 관리됩니다.
//!
//! # 내부 아키텍처
//! ```text
//! Collectors -> mpsc -> Debounce -> Buffer -> ParserRouter -> ReconStore -> events/submit
//! ```
//!
//! 처리 루프 태스크가 원장의 단일 변경 주체입니다. 외부 조회는
//! [`recon_handle`](ScanPipeline::recon_handle)로 짧은 읽기 잠금만 수행합니다.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use boxtally_core::error::{BoxtallyError, PipelineError, PluginError};
use boxtally_core::event::{CompletionEvent, ScanEvent, SubmissionEvent};
use boxtally_core::metrics as metric_names;
use boxtally_core::metrics::LABEL_KIND;
use boxtally_core::pipeline::HealthStatus;
use boxtally_core::plugin::{Plugin, PluginInfo, PluginState, PluginType};

use crate::buffer::ScanBuffer;
use crate::collector::{CollectorSet, HidStdinCollector, RawScan, ScanTcpCollector, ScanTcpConfig};
use crate::config::PipelineConfig;
use crate::debounce::ScanDebouncer;
use crate::error::ScanPipelineError;
use crate::parser::ParserRouter;
use crate::recon::{ReconStore, ScanOutcome};
use crate::submit::{SubmissionSink, TransactionPayload};

/// 스캔 이벤트 채널 기본 용량
const SCAN_EVENT_CHANNEL_CAPACITY: usize = 1024;

/// 정지 시 태스크 종료 대기 시간
const TASK_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// 파이프라인 공유 카운터
///
/// 처리 루프 태스크가 쓰고, 파이프라인 구조체가 읽습니다.
#[derive(Debug, Default)]
struct PipelineStats {
    /// 수집된 원시 스캔 수
    collected: AtomicU64,
    /// 원장에 기록된 스캔 수
    recorded: AtomicU64,
    /// 중복으로 흡수된 스캔 수
    duplicates: AtomicU64,
    /// 디바운스로 억제된 스캔 수
    debounced: AtomicU64,
    /// 파싱 실패 수
    parse_errors: AtomicU64,
    /// 버퍼 오버플로우로 드롭된 스캔 수
    dropped: AtomicU64,
    /// 현재 버퍼 크기
    buffer_len: AtomicUsize,
}

/// 스캔 파이프라인 -- 수집/파싱/집계/제출의 전체 흐름을 관리합니다.
///
/// core의 `Plugin` trait을 구현하여 `boxtally-daemon`에서
/// 다른 모듈과 동일한 생명주기(init/start/stop/health_check)로 관리됩니다.
///
/// # 사용 예시
/// ```ignore
/// use boxtally_scan_pipeline::{ScanPipeline, ScanPipelineBuilder};
///
/// let (mut pipeline, scan_rx) = ScanPipelineBuilder::new()
///     .config(config)
///     .build()?;
///
/// pipeline.init().await?;
/// pipeline.start().await?;
/// ```
pub struct ScanPipeline {
    /// 파이프라인 설정
    config: PipelineConfig,
    /// 플러그인 메타데이터
    info: PluginInfo,
    /// 현재 생명주기 상태
    state: PluginState,
    /// 트랜잭션 유형별 대사 스토어
    recon: Arc<Mutex<ReconStore>>,
    /// 공유 카운터
    stats: Arc<PipelineStats>,
    /// 제출 sink (start 시 처리 루프로 이동)
    sink: Option<Box<dyn SubmissionSink>>,
    /// 제출 페이로드에 포함되는 장치 식별자
    device_id: String,
    /// 내부 RawScan 채널 송신측 (수집기에 전달)
    raw_tx: mpsc::Sender<RawScan>,
    /// 내부 RawScan 채널 수신측 (start 시 처리 루프로 이동)
    raw_rx: Option<mpsc::Receiver<RawScan>>,
    /// 스캔 이벤트 전송 채널
    scan_tx: mpsc::Sender<ScanEvent>,
    /// 선적 완료 이벤트 전송 채널
    completion_tx: Option<mpsc::Sender<CompletionEvent>>,
    /// 제출 결과 이벤트 전송 채널
    submission_tx: Option<mpsc::Sender<SubmissionEvent>>,
    /// Graceful shutdown용 cancellation token
    cancel_token: CancellationToken,
    /// 백그라운드 태스크 핸들
    tasks: Vec<tokio::task::JoinHandle<()>>,
    /// 수집기 세트
    collectors: CollectorSet,
}

impl ScanPipeline {
    /// 현재 상태 이름을 반환합니다.
    pub fn state_name(&self) -> &str {
        match self.state {
            PluginState::Created => "created",
            PluginState::Initialized => "initialized",
            PluginState::Running => "running",
            PluginState::Stopped => "stopped",
            PluginState::Failed => "failed",
        }
    }

    /// 대사 스토어 핸들을 반환합니다.
    ///
    /// 스냅샷 조회 등 짧은 읽기에만 사용해야 합니다.
    pub fn recon_handle(&self) -> Arc<Mutex<ReconStore>> {
        Arc::clone(&self.recon)
    }

    /// 원시 스캔 채널 송신측을 반환합니다.
    ///
    /// 수집기 외의 경로(테스트, 내장 소스)로 스캔을 주입할 때 사용합니다.
    pub fn raw_scan_sender(&self) -> mpsc::Sender<RawScan> {
        self.raw_tx.clone()
    }

    /// 수집된 원시 스캔 수를 반환합니다.
    pub fn collected_count(&self) -> u64 {
        self.stats.collected.load(Ordering::Relaxed)
    }

    /// 원장에 기록된 스캔 수를 반환합니다.
    pub fn recorded_count(&self) -> u64 {
        self.stats.recorded.load(Ordering::Relaxed)
    }

    /// 중복으로 흡수된 스캔 수를 반환합니다.
    pub fn duplicate_count(&self) -> u64 {
        self.stats.duplicates.load(Ordering::Relaxed)
    }

    /// 파싱 실패 수를 반환합니다.
    pub fn parse_error_count(&self) -> u64 {
        self.stats.parse_errors.load(Ordering::Relaxed)
    }

    /// 버퍼 사용률을 0.0~1.0 범위로 반환합니다.
    pub fn buffer_utilization(&self) -> f64 {
        if self.config.buffer_capacity == 0 {
            return 0.0;
        }
        self.stats.buffer_len.load(Ordering::Relaxed) as f64 / self.config.buffer_capacity as f64
    }

    /// 등록된 수집기 수를 반환합니다.
    pub fn collector_count(&self) -> usize {
        self.collectors.len()
    }
}

impl Plugin for ScanPipeline {
    fn info(&self) -> &PluginInfo {
        &self.info
    }

    fn state(&self) -> PluginState {
        self.state
    }

    async fn init(&mut self) -> Result<(), BoxtallyError> {
        if self.state != PluginState::Created {
            return Err(PluginError::InvalidState {
                name: self.info.name.clone(),
                current: self.state.to_string(),
                expected: PluginState::Created.to_string(),
            }
            .into());
        }

        self.config.validate().map_err(BoxtallyError::from)?;
        self.state = PluginState::Initialized;
        Ok(())
    }

    async fn start(&mut self) -> Result<(), BoxtallyError> {
        if self.state == PluginState::Running {
            return Err(PipelineError::AlreadyRunning.into());
        }
        if self.state != PluginState::Initialized {
            return Err(PluginError::InvalidState {
                name: self.info.name.clone(),
                current: self.state.to_string(),
                expected: PluginState::Initialized.to_string(),
            }
            .into());
        }

        let raw_rx = self.raw_rx.take().ok_or_else(|| {
            BoxtallyError::Pipeline(PipelineError::InitFailed(
                "pipeline cannot be restarted".to_owned(),
            ))
        })?;

        tracing::info!(kind = %self.config.kind, "starting scan pipeline");

        // 1. 수집기 태스크 스폰
        for source in &self.config.sources {
            match source.as_str() {
                "tcp" => {
                    let tcp_config = ScanTcpConfig {
                        bind_addr: self.config.tcp_bind.clone(),
                        ..Default::default()
                    };
                    let mut collector = ScanTcpCollector::new(
                        tcp_config,
                        self.raw_tx.clone(),
                        self.cancel_token.child_token(),
                    );
                    self.collectors.register("tcp");
                    self.tasks.push(tokio::spawn(async move {
                        if let Err(e) = collector.run().await {
                            error!(error = %e, "tcp collector terminated with error");
                        }
                    }));
                }
                "hid" => {
                    let mut collector = HidStdinCollector::new(
                        self.raw_tx.clone(),
                        self.cancel_token.child_token(),
                    );
                    self.collectors.register("hid");
                    self.tasks.push(tokio::spawn(async move {
                        if let Err(e) = collector.run().await {
                            error!(error = %e, "hid collector terminated with error");
                        }
                    }));
                }
                // config.validate()가 알 수 없는 소스를 거부하므로 도달 불가
                other => {
                    warn!(source = other, "ignoring unknown scan source");
                }
            }
        }

        // 2. 처리 루프 스폰
        let processor = ScanProcessor {
            config: self.config.clone(),
            router: ParserRouter::with_defaults(),
            recon: Arc::clone(&self.recon),
            stats: Arc::clone(&self.stats),
            sink: self.sink.take(),
            device_id: self.device_id.clone(),
            scan_tx: self.scan_tx.clone(),
            completion_tx: self.completion_tx.clone(),
            submission_tx: self.submission_tx.clone(),
        };
        let cancel = self.cancel_token.child_token();
        self.tasks
            .push(tokio::spawn(run_processing_loop(processor, raw_rx, cancel)));

        self.state = PluginState::Running;
        tracing::info!("scan pipeline started");
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), BoxtallyError> {
        if self.state != PluginState::Running {
            return Err(PipelineError::NotRunning.into());
        }

        tracing::info!("stopping scan pipeline");

        // 수집기와 처리 루프에 종료 신호 전달.
        // 처리 루프는 종료 전에 버퍼 잔여분을 드레인합니다.
        self.cancel_token.cancel();

        for mut task in self.tasks.drain(..) {
            if tokio::time::timeout(TASK_SHUTDOWN_TIMEOUT, &mut task)
                .await
                .is_err()
            {
                warn!("pipeline task did not stop in time, aborting");
                task.abort();
            }
        }

        self.collectors.stop_all();
        self.state = PluginState::Stopped;
        tracing::info!("scan pipeline stopped");
        Ok(())
    }

    async fn health_check(&self) -> HealthStatus {
        match self.state {
            PluginState::Running => {
                let utilization = self.buffer_utilization();
                if utilization > 0.9 {
                    return HealthStatus::Degraded(format!(
                        "buffer utilization high: {:.1}%",
                        utilization * 100.0
                    ));
                }

                let collected = self.collected_count();
                let parse_errors = self.parse_error_count();
                if collected > 0 && parse_errors * 2 > collected {
                    return HealthStatus::Degraded(format!(
                        "parse error ratio high: {parse_errors}/{collected}"
                    ));
                }

                HealthStatus::Healthy
            }
            PluginState::Created | PluginState::Initialized => {
                HealthStatus::Unhealthy("not started".to_owned())
            }
            PluginState::Stopped => HealthStatus::Unhealthy("stopped".to_owned()),
            PluginState::Failed => HealthStatus::Unhealthy("failed".to_owned()),
        }
    }
}

/// 처리 루프가 소유하는 스캔 처리기
struct ScanProcessor {
    config: PipelineConfig,
    router: ParserRouter,
    recon: Arc<Mutex<ReconStore>>,
    stats: Arc<PipelineStats>,
    sink: Option<Box<dyn SubmissionSink>>,
    device_id: String,
    scan_tx: mpsc::Sender<ScanEvent>,
    completion_tx: Option<mpsc::Sender<CompletionEvent>>,
    submission_tx: Option<mpsc::Sender<SubmissionEvent>>,
}

impl ScanProcessor {
    /// 원시 스캔 배치를 파싱하고 원장에 기록합니다.
    async fn process_batch(&self, batch: Vec<RawScan>) {
        let started = std::time::Instant::now();

        for raw in batch {
            self.process_scan(raw).await;
        }

        histogram!(metric_names::PIPELINE_PROCESSING_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());
    }

    /// 단일 원시 스캔을 처리합니다.
    async fn process_scan(&self, raw: RawScan) {
        let parse_result = match &raw.format_hint {
            Some(hint) => self.router.parse_with(hint, &raw.data),
            None => self.router.parse(&raw.data),
        };

        let record = match parse_result {
            Ok(record) => record,
            Err(e) => {
                self.stats.parse_errors.fetch_add(1, Ordering::Relaxed);
                counter!(metric_names::PIPELINE_PARSE_ERRORS_TOTAL).increment(1);
                warn!(source = %raw.source, error = %e, "failed to parse scan line");
                return;
            }
        };

        // 원장 갱신은 짧은 잠금 구간 안에서만 수행
        let (kind, outcome, completed_now, all_complete) = {
            let mut store = lock_store(&self.recon);
            let kind = store.active_context();
            let outcome = store.add_scan(&record);
            let completed_now = !outcome.is_duplicate()
                && store
                    .active_ledger()
                    .get(&record.shipment_id)
                    .is_some_and(|t| t.is_complete());
            let all_complete = store.active_ledger().is_all_complete();
            (kind, outcome, completed_now, all_complete)
        };

        match outcome {
            ScanOutcome::NewShipment | ScanOutcome::Recorded => {
                self.stats.recorded.fetch_add(1, Ordering::Relaxed);
                counter!(metric_names::PIPELINE_SCANS_RECORDED_TOTAL).increment(1);
            }
            ScanOutcome::Duplicate => {
                self.stats.duplicates.fetch_add(1, Ordering::Relaxed);
                counter!(metric_names::PIPELINE_SCANS_DUPLICATE_TOTAL).increment(1);
                debug!(shipment = %record.shipment_id, box_number = record.box_number,
                    "duplicate box scan absorbed");
            }
        }

        let event = ScanEvent::new(
            record.clone(),
            kind,
            raw.source.clone(),
            outcome.is_duplicate(),
        );
        if self.scan_tx.send(event).await.is_err() {
            debug!("scan event receiver dropped");
        }

        if completed_now {
            counter!(
                metric_names::PIPELINE_SHIPMENTS_COMPLETED_TOTAL,
                LABEL_KIND => kind.to_string()
            )
            .increment(1);
            info!(shipment = %record.shipment_id, kind = %kind, "shipment complete");

            if let Some(tx) = &self.completion_tx {
                let event =
                    CompletionEvent::new(kind, record.shipment_id.clone(), record.expected_count);
                if tx.send(event).await.is_err() {
                    debug!("completion event receiver dropped");
                }
            }

            if self.config.auto_submit && all_complete {
                self.try_submit().await;
            }
        }
    }

    /// 활성 컨텍스트의 스냅샷을 제출하고, 성공 시에만 컨텍스트를 비웁니다.
    async fn try_submit(&self) {
        let Some(sink) = &self.sink else {
            debug!("auto submit requested but no sink configured");
            return;
        };

        let payload = {
            let store = lock_store(&self.recon);
            TransactionPayload::from_snapshot(
                store.active_context(),
                self.device_id.clone(),
                &store.snapshot(),
            )
        };

        if payload.shipment_count() == 0 {
            return;
        }

        let kind = payload.kind;
        counter!(metric_names::SUBMIT_ATTEMPTS_TOTAL, LABEL_KIND => kind.to_string()).increment(1);

        // 처리 루프가 유일한 변경 주체이므로, 제출 중 원장이 바뀌지 않습니다.
        let success = match sink.submit(&payload).await {
            Ok(()) => {
                counter!(metric_names::SUBMIT_SHIPMENTS_TOTAL, LABEL_KIND => kind.to_string())
                    .increment(payload.shipment_count() as u64);
                let mut store = lock_store(&self.recon);
                store.clear();
                info!(
                    kind = %kind,
                    shipments = payload.shipment_count(),
                    "transaction batch submitted, context cleared"
                );
                true
            }
            Err(e) => {
                counter!(metric_names::SUBMIT_FAILURES_TOTAL, LABEL_KIND => kind.to_string())
                    .increment(1);
                // 실패 시 원장은 그대로 유지 — 다음 완료 시 재시도
                warn!(kind = %kind, error = %e, "transaction batch submission failed");
                false
            }
        };

        if let Some(tx) = &self.submission_tx {
            let event = SubmissionEvent::new(kind, payload.shipment_count(), success);
            if tx.send(event).await.is_err() {
                debug!("submission event receiver dropped");
            }
        }
    }
}

/// 메인 처리 루프
///
/// 수집기에서 원시 스캔을 받아 디바운스/버퍼링하고,
/// 배치 크기 또는 플러시 간격에 따라 파싱/집계합니다.
/// 종료 신호를 받으면 버퍼 잔여분을 드레인한 뒤 반환합니다.
async fn run_processing_loop(
    processor: ScanProcessor,
    mut raw_rx: mpsc::Receiver<RawScan>,
    cancel: CancellationToken,
) {
    let mut buffer = ScanBuffer::new(
        processor.config.buffer_capacity,
        processor.config.drop_policy.clone(),
    );
    let mut debouncer = ScanDebouncer::new(Duration::from_millis(processor.config.debounce_ms));

    let mut flush_interval =
        tokio::time::interval(Duration::from_secs(processor.config.flush_interval_secs));
    flush_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            maybe_raw = raw_rx.recv() => {
                match maybe_raw {
                    Some(raw) => {
                        processor.stats.collected.fetch_add(1, Ordering::Relaxed);
                        counter!(metric_names::PIPELINE_SCANS_COLLECTED_TOTAL).increment(1);

                        if !debouncer.accept(&raw) {
                            processor.stats.debounced.fetch_add(1, Ordering::Relaxed);
                            counter!(metric_names::PIPELINE_SCANS_DEBOUNCED_TOTAL).increment(1);
                            continue;
                        }

                        if buffer.push(raw) {
                            processor.stats.dropped.fetch_add(1, Ordering::Relaxed);
                            counter!(metric_names::PIPELINE_SCANS_DROPPED_TOTAL).increment(1);
                        }
                        update_buffer_gauge(&processor.stats, &buffer);

                        if buffer.should_flush(processor.config.batch_size) {
                            let batch = buffer.drain_batch(processor.config.batch_size);
                            update_buffer_gauge(&processor.stats, &buffer);
                            processor.process_batch(batch).await;
                        }
                    }
                    None => {
                        // 모든 수집기가 종료됨 — 잔여분 처리 후 종료
                        let remaining = buffer.drain_all();
                        update_buffer_gauge(&processor.stats, &buffer);
                        if !remaining.is_empty() {
                            processor.process_batch(remaining).await;
                        }
                        debug!("raw scan channel closed, processing loop exiting");
                        break;
                    }
                }
            }
            _ = flush_interval.tick() => {
                if !buffer.is_empty() {
                    let batch = buffer.drain_batch(processor.config.batch_size);
                    update_buffer_gauge(&processor.stats, &buffer);
                    processor.process_batch(batch).await;
                }
            }
            _ = cancel.cancelled() => {
                let remaining = buffer.drain_all();
                update_buffer_gauge(&processor.stats, &buffer);
                if !remaining.is_empty() {
                    info!(count = remaining.len(), "draining remaining buffered scans");
                    processor.process_batch(remaining).await;
                }
                break;
            }
        }
    }
}

/// 버퍼 크기 게이지와 공유 카운터를 갱신합니다.
fn update_buffer_gauge(stats: &PipelineStats, buffer: &ScanBuffer) {
    stats.buffer_len.store(buffer.len(), Ordering::Relaxed);
    gauge!(metric_names::PIPELINE_BUFFER_SIZE).set(buffer.len() as f64);
}

/// 대사 스토어 잠금을 획득합니다. poisoned lock은 내부 값으로 복구합니다.
fn lock_store(recon: &Arc<Mutex<ReconStore>>) -> MutexGuard<'_, ReconStore> {
    match recon.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// 스캔 파이프라인 빌더
///
/// 파이프라인을 구성하고 필요한 채널을 생성합니다.
pub struct ScanPipelineBuilder {
    config: PipelineConfig,
    scan_tx: Option<mpsc::Sender<ScanEvent>>,
    completion_tx: Option<mpsc::Sender<CompletionEvent>>,
    submission_tx: Option<mpsc::Sender<SubmissionEvent>>,
    sink: Option<Box<dyn SubmissionSink>>,
    device_id: String,
    scan_channel_capacity: usize,
}

impl ScanPipelineBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            scan_tx: None,
            completion_tx: None,
            submission_tx: None,
            sink: None,
            device_id: "boxtally-01".to_owned(),
            scan_channel_capacity: SCAN_EVENT_CHANNEL_CAPACITY,
        }
    }

    /// 파이프라인 설정을 지정합니다.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// 외부 스캔 이벤트 전송 채널을 설정합니다.
    ///
    /// 설정하지 않으면 빌더가 새 채널을 생성합니다.
    pub fn scan_sender(mut self, tx: mpsc::Sender<ScanEvent>) -> Self {
        self.scan_tx = Some(tx);
        self
    }

    /// 선적 완료 이벤트 전송 채널을 설정합니다.
    pub fn completion_sender(mut self, tx: mpsc::Sender<CompletionEvent>) -> Self {
        self.completion_tx = Some(tx);
        self
    }

    /// 제출 결과 이벤트 전송 채널을 설정합니다.
    pub fn submission_sender(mut self, tx: mpsc::Sender<SubmissionEvent>) -> Self {
        self.submission_tx = Some(tx);
        self
    }

    /// 제출 sink를 설정합니다.
    pub fn submission_sink(mut self, sink: Box<dyn SubmissionSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// 장치 식별자를 설정합니다.
    pub fn device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = device_id.into();
        self
    }

    /// 스캔 이벤트 채널 용량을 설정합니다 (외부 채널 미사용 시).
    pub fn scan_channel_capacity(mut self, capacity: usize) -> Self {
        self.scan_channel_capacity = capacity;
        self
    }

    /// 파이프라인을 빌드합니다.
    ///
    /// # Returns
    /// - `ScanPipeline`: 파이프라인 인스턴스 (상태: Created)
    /// - `Option<mpsc::Receiver<ScanEvent>>`: 스캔 이벤트 수신 채널
    ///   (외부 scan_sender를 설정한 경우 None)
    pub fn build(
        self,
    ) -> Result<(ScanPipeline, Option<mpsc::Receiver<ScanEvent>>), ScanPipelineError> {
        self.config.validate()?;

        let (raw_tx, raw_rx) = mpsc::channel(self.config.buffer_capacity);

        let (scan_tx, scan_rx) = if let Some(tx) = self.scan_tx {
            (tx, None)
        } else {
            let (tx, rx) = mpsc::channel(self.scan_channel_capacity);
            (tx, Some(rx))
        };

        let recon = Arc::new(Mutex::new(ReconStore::with_active(self.config.kind)));

        let pipeline = ScanPipeline {
            info: PluginInfo {
                name: "scan-pipeline".to_owned(),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                description: "scan collection and reconciliation pipeline".to_owned(),
                plugin_type: PluginType::ScanPipeline,
            },
            config: self.config,
            state: PluginState::Created,
            recon,
            stats: Arc::new(PipelineStats::default()),
            sink: self.sink,
            device_id: self.device_id,
            raw_tx,
            raw_rx: Some(raw_rx),
            scan_tx,
            completion_tx: self.completion_tx,
            submission_tx: self.submission_tx,
            cancel_token: CancellationToken::new(),
            tasks: Vec::new(),
            collectors: CollectorSet::default(),
        };

        Ok((pipeline, scan_rx))
    }
}

impl Default for ScanPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
