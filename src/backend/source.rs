use crate::model::{CpuTimes, RawProcess};
use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use procfs::prelude::*;
use procfs::{KernelStats, Meminfo};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Signal used when the user ends a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KillSignal {
    /// Ask the process to exit (SIGTERM).
    Term,
    /// Terminate unconditionally (SIGKILL).
    Kill,
}

impl From<KillSignal> for Signal {
    fn from(sig: KillSignal) -> Self {
        match sig {
            KillSignal::Term => Signal::SIGTERM,
            KillSignal::Kill => Signal::SIGKILL,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum TerminateError {
    #[error("permission denied for PID {pid}")]
    PermissionDenied { pid: u32 },
    #[error("PID {pid} no longer exists")]
    NoSuchProcess { pid: u32 },
    #[error("refusing to signal PID {pid}")]
    Refused { pid: u32 },
    #[error("failed to signal PID {pid}: {source}")]
    Os { pid: u32, source: Errno },
}

impl TerminateError {
    pub fn from_errno(pid: u32, errno: Errno) -> Self {
        match errno {
            Errno::EPERM | Errno::EACCES => TerminateError::PermissionDenied { pid },
            Errno::ESRCH => TerminateError::NoSuchProcess { pid },
            source => TerminateError::Os { pid, source },
        }
    }
}

/// Everything the dashboard reads from (or does to) the operating system.
///
/// Reads return `None` on failure; callers decide how to degrade.
pub trait SystemSource {
    fn cpu_times(&self) -> Option<CpuTimes>;
    fn memory_load_percent(&self) -> Option<f64>;
    /// `None` when the process table itself could not be opened.
    fn processes(&self) -> Option<Vec<RawProcess>>;
    fn working_set(&self, pid: u32) -> Option<u64>;
    fn terminate(&self, pid: u32, signal: KillSignal) -> Result<(), TerminateError>;
}

/// Live Linux source backed by `/proc`.
pub struct ProcSource;

impl ProcSource {
    pub fn new() -> Self {
        Self
    }
}

impl SystemSource for ProcSource {
    fn cpu_times(&self) -> Option<CpuTimes> {
        let stats = match KernelStats::current() {
            Ok(s) => s,
            Err(e) => {
                log::debug!("Failed to read /proc/stat: {}", e);
                return None;
            }
        };
        let t = &stats.total;
        Some(fold_cpu_line(
            t.user,
            t.nice,
            t.system,
            t.idle,
            t.iowait.unwrap_or(0),
            t.irq.unwrap_or(0),
            t.softirq.unwrap_or(0),
            t.steal.unwrap_or(0),
        ))
    }

    fn memory_load_percent(&self) -> Option<f64> {
        let info = match Meminfo::current() {
            Ok(m) => m,
            Err(e) => {
                log::debug!("Failed to read /proc/meminfo: {}", e);
                return None;
            }
        };
        let available = info
            .mem_available
            .unwrap_or(info.mem_free + info.buffers + info.cached);
        memory_load(info.mem_total, available)
    }

    fn processes(&self) -> Option<Vec<RawProcess>> {
        let all = match procfs::process::all_processes() {
            Ok(iter) => iter,
            Err(e) => {
                log::warn!("Failed to open process table: {}", e);
                return None;
            }
        };

        let mut processes = Vec::new();
        for proc in all.flatten() {
            // Processes can exit between listing and reading
            let stat = match proc.stat() {
                Ok(s) => s,
                Err(e) => {
                    log::debug!("Skipping PID {}: {}", proc.pid(), e);
                    continue;
                }
            };
            processes.push(RawProcess {
                pid: stat.pid as u32,
                name: stat.comm,
                threads: stat.num_threads.max(0) as u64,
            });
        }
        Some(processes)
    }

    fn working_set(&self, pid: u32) -> Option<u64> {
        let proc = procfs::process::Process::new(i32::try_from(pid).ok()?).ok()?;
        let status = proc.status().ok()?;
        // Kernel threads have no VmRSS line
        status.vmrss.map(|kb| kb * 1024)
    }

    fn terminate(&self, pid: u32, sig: KillSignal) -> Result<(), TerminateError> {
        // 0 and negative values address process groups
        let raw = match i32::try_from(pid) {
            Ok(p) if p > 0 => p,
            _ => return Err(TerminateError::Refused { pid }),
        };
        signal::kill(Pid::from_raw(raw), Signal::from(sig))
            .map_err(|e| TerminateError::from_errno(pid, e))
    }
}

/// Folds the aggregate `cpu` line of `/proc/stat` into idle/kernel/user
/// totals. Kernel time includes idle time.
#[allow(clippy::too_many_arguments)]
pub fn fold_cpu_line(
    user: u64,
    nice: u64,
    system: u64,
    idle: u64,
    iowait: u64,
    irq: u64,
    softirq: u64,
    steal: u64,
) -> CpuTimes {
    let idle_total = idle + iowait;
    CpuTimes {
        idle: idle_total,
        kernel: system + irq + softirq + steal + idle_total,
        user: user + nice,
    }
}

pub fn memory_load(total: u64, available: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    let used = total.saturating_sub(available);
    Some(used as f64 / total as f64 * 100.0)
}

#[cfg(test)]
pub mod fake {
    use super::*;
    use std::cell::RefCell;
    use std::collections::{HashMap, VecDeque};

    /// Scripted source: each `cpu_times`/`memory_load_percent` call pops the
    /// next queued reading, repeating the last one when the queue runs dry.
    #[derive(Default)]
    pub struct FakeSource {
        pub cpu: RefCell<VecDeque<Option<CpuTimes>>>,
        pub memory: RefCell<VecDeque<Option<f64>>>,
        pub processes: RefCell<Option<Vec<RawProcess>>>,
        pub working_sets: HashMap<u32, u64>,
        pub terminate_result: RefCell<Option<TerminateError>>,
        pub terminated: RefCell<Vec<(u32, KillSignal)>>,
        pub enumerations: RefCell<usize>,
    }

    impl FakeSource {
        pub fn with_cpu(readings: &[Option<CpuTimes>]) -> Self {
            Self {
                cpu: RefCell::new(readings.iter().copied().collect()),
                processes: RefCell::new(Some(Vec::new())),
                ..Default::default()
            }
        }

        fn next<T: Copy>(queue: &RefCell<VecDeque<Option<T>>>) -> Option<T> {
            let mut q = queue.borrow_mut();
            if q.len() > 1 {
                q.pop_front().flatten()
            } else {
                q.front().copied().flatten()
            }
        }
    }

    impl SystemSource for FakeSource {
        fn cpu_times(&self) -> Option<CpuTimes> {
            Self::next(&self.cpu)
        }

        fn memory_load_percent(&self) -> Option<f64> {
            Self::next(&self.memory)
        }

        fn processes(&self) -> Option<Vec<RawProcess>> {
            *self.enumerations.borrow_mut() += 1;
            self.processes.borrow().clone()
        }

        fn working_set(&self, pid: u32) -> Option<u64> {
            self.working_sets.get(&pid).copied()
        }

        fn terminate(&self, pid: u32, signal: KillSignal) -> Result<(), TerminateError> {
            if let Some(err) = self.terminate_result.borrow_mut().take() {
                return Err(err);
            }
            self.terminated.borrow_mut().push((pid, signal));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_time_includes_idle() {
        let t = fold_cpu_line(100, 5, 40, 800, 20, 3, 2, 0);
        assert_eq!(t.idle, 820);
        assert_eq!(t.user, 105);
        assert_eq!(t.kernel, 40 + 3 + 2 + 820);
        // kernel + user covers every column
        assert_eq!(t.kernel + t.user, 100 + 5 + 40 + 800 + 20 + 3 + 2);
    }

    #[test]
    fn memory_load_percent_of_total() {
        assert_eq!(memory_load(1000, 250), Some(75.0));
        assert_eq!(memory_load(1000, 1000), Some(0.0));
        assert_eq!(memory_load(0, 0), None);
        // available larger than total must not underflow
        assert_eq!(memory_load(1000, 2000), Some(0.0));
    }

    #[test]
    fn errno_mapping() {
        assert_eq!(
            TerminateError::from_errno(7, Errno::EPERM),
            TerminateError::PermissionDenied { pid: 7 }
        );
        assert_eq!(
            TerminateError::from_errno(7, Errno::ESRCH),
            TerminateError::NoSuchProcess { pid: 7 }
        );
        assert_eq!(
            TerminateError::from_errno(7, Errno::EINVAL),
            TerminateError::Os { pid: 7, source: Errno::EINVAL }
        );
    }

    #[test]
    fn refuses_process_group_pids() {
        let source = ProcSource::new();
        assert_eq!(
            source.terminate(0, KillSignal::Term),
            Err(TerminateError::Refused { pid: 0 })
        );
        assert_eq!(
            source.terminate(u32::MAX, KillSignal::Term),
            Err(TerminateError::Refused { pid: u32::MAX })
        );
    }

    #[test]
    fn kill_signal_maps_to_posix() {
        assert_eq!(Signal::from(KillSignal::Term), Signal::SIGTERM);
        assert_eq!(Signal::from(KillSignal::Kill), Signal::SIGKILL);
    }
}
