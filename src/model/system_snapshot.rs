/// Cumulative system CPU time counters, in clock ticks since boot.
///
/// `kernel` includes `idle`, so `kernel + user` is all elapsed CPU time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTimes {
    pub idle: u64,
    pub kernel: u64,
    pub user: u64,
}

impl CpuTimes {
    pub fn new(idle: u64, kernel: u64, user: u64) -> Self {
        Self { idle, kernel, user }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricSample {
    pub cpu_percent: f64,
    pub mem_percent: f64,
}

/// A process as listed by the OS, before its memory is queried.
#[derive(Debug, Clone, PartialEq)]
pub struct RawProcess {
    pub pid: u32,
    pub name: String,
    pub threads: u64,
}
