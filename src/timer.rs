// Monotonic timing for workload execution

use chrono::Utc;
use std::time::{Duration, Instant};

use crate::report::BenchmarkResult;
use crate::workload::Workload;

/// Run `f` to completion and measure how long it took.
///
/// Timing uses the monotonic clock, so wall-clock adjustments during a
/// run cannot produce negative or skewed durations.
pub fn time<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let started = Instant::now();
    let value = f();
    (value, started.elapsed())
}

/// Time one registered workload and capture the full result record,
/// stamped with the capture time.
pub fn time_workload(workload: &Workload) -> BenchmarkResult {
    let (checksum, duration) = time(|| workload.execute());
    BenchmarkResult {
        keyword: workload.keyword,
        title: workload.title,
        detail: workload.detail,
        summary_label: workload.summary_label,
        checksum,
        duration,
        timestamp: Utc::now(),
    }
}
