//! 스캔 디바운스 -- 동일 스캔 라인 재수신 억제
//!
//! 카메라 디코더는 같은 물리 바코드를 연속 프레임마다 다시 내보내므로,
//! [`ScanDebouncer`]는 마지막으로 수락한 라인과 동일한 라인이 짧은
//! 쿨다운 윈도우 안에 다시 들어오면 억제합니다.
//!
//! 이것은 타이밍 휴리스틱일 뿐입니다. 중복 스캔의 정확성 보장은
//! 원장의 중복 억제([`TallyLedger`](crate::recon::TallyLedger))가 담당합니다.

use std::time::{Duration, Instant};

use bytes::Bytes;

use crate::collector::RawScan;

/// 스캔 디바운서
///
/// 윈도우가 0이면 디바운스가 비활성화됩니다.
pub struct ScanDebouncer {
    /// 억제 윈도우
    window: Duration,
    /// 마지막으로 수락한 라인과 수락 시각
    last_accepted: Option<(Bytes, Instant)>,
    /// 억제된 스캔 수 (통계용)
    suppressed_count: u64,
}

impl ScanDebouncer {
    /// 지정한 윈도우로 새 디바운서를 생성합니다.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: None,
            suppressed_count: 0,
        }
    }

    /// 스캔을 수락할지 결정합니다.
    ///
    /// 직전에 수락한 라인과 동일한 데이터가 윈도우 안에 다시 들어오면
    /// `false`를 반환하고 억제 카운터를 올립니다.
    pub fn accept(&mut self, raw: &RawScan) -> bool {
        if self.window.is_zero() {
            return true;
        }

        if let Some((last_data, at)) = &self.last_accepted
            && *last_data == raw.data
            && at.elapsed() < self.window
        {
            self.suppressed_count += 1;
            tracing::debug!(source = %raw.source, "scan suppressed by debounce window");
            return false;
        }

        self.last_accepted = Some((raw.data.clone(), Instant::now()));
        true
    }

    /// 억제된 스캔 수를 반환합니다.
    pub fn suppressed_count(&self) -> u64 {
        self.suppressed_count
    }
}
