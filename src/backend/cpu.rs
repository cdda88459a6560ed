use super::source::SystemSource;
use crate::model::CpuTimes;

/// Whole-system CPU utilization from successive counter readings.
///
/// Each call to [`CpuSampler::sample`] measures the interval since the
/// previous call, so it must be called once per sampling period.
pub struct CpuSampler {
    prev: CpuTimes,
}

impl CpuSampler {
    /// Seeds the baseline so the first sample has something to diff against.
    pub fn new(source: &impl SystemSource) -> Self {
        let prev = source.cpu_times().unwrap_or_else(|| {
            log::warn!("Could not read CPU counters for baseline; first sample will be skewed");
            CpuTimes::default()
        });
        Self { prev }
    }

    pub fn sample(&mut self, source: &impl SystemSource) -> f64 {
        match source.cpu_times() {
            Some(now) => {
                let percent = usage_between(&self.prev, &now);
                self.prev = now;
                percent
            }
            None => 0.0,
        }
    }
}

/// Busy share of elapsed CPU time between two readings, clamped to 0..=100.
pub fn usage_between(prev: &CpuTimes, now: &CpuTimes) -> f64 {
    let idle = now.idle.saturating_sub(prev.idle);
    let total = now.kernel.saturating_sub(prev.kernel) + now.user.saturating_sub(prev.user);
    if total == 0 {
        return 0.0;
    }
    let busy = total as f64 - idle as f64;
    (busy * 100.0 / total as f64).clamp(0.0, 100.0)
}
