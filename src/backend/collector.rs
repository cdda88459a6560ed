use super::cpu::CpuSampler;
use super::history::{HistoryBuffer, HISTORY_SIZE};
use super::memory::sample_memory;
use super::process;
use super::source::{KillSignal, SystemSource, TerminateError};
use crate::model::{MetricSample, ProcessEntry};

/// Result of one timer tick.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub sample: MetricSample,
    /// Present on ticks where the process list was due for a refresh.
    pub processes: Option<Vec<ProcessEntry>>,
}

/// Owns all sampling state. Driven from the UI timer; never shared across
/// threads.
pub struct Collector<S: SystemSource> {
    source: S,
    cpu_sampler: CpuSampler,
    cpu_history: HistoryBuffer,
    mem_history: HistoryBuffer,
    process_refresh_ticks: u32,
    ticks_since_refresh: u32,
    kill_signal: KillSignal,
}

impl<S: SystemSource> Collector<S> {
    pub fn new(source: S, process_refresh_ticks: u32, kill_signal: KillSignal) -> Self {
        let cpu_sampler = CpuSampler::new(&source);
        Self {
            source,
            cpu_sampler,
            cpu_history: HistoryBuffer::new(HISTORY_SIZE),
            mem_history: HistoryBuffer::new(HISTORY_SIZE),
            process_refresh_ticks: process_refresh_ticks.max(1),
            ticks_since_refresh: 0,
            kill_signal,
        }
    }

    /// Samples CPU and memory into the histories and, every
    /// `process_refresh_ticks` ticks, takes a process snapshot.
    pub fn tick(&mut self) -> TickReport {
        let sample = MetricSample {
            cpu_percent: self.cpu_sampler.sample(&self.source),
            mem_percent: sample_memory(&self.source),
        };
        self.cpu_history.push(sample.cpu_percent);
        self.mem_history.push(sample.mem_percent);

        self.ticks_since_refresh += 1;
        let processes = if self.ticks_since_refresh >= self.process_refresh_ticks {
            self.ticks_since_refresh = 0;
            Some(self.refresh_processes())
        } else {
            None
        };

        TickReport { sample, processes }
    }

    pub fn refresh_processes(&self) -> Vec<ProcessEntry> {
        let entries = process::enumerate(&self.source);
        log::debug!("Enumerated {} processes", entries.len());
        entries
    }

    pub fn terminate(&self, pid: u32) -> Result<(), TerminateError> {
        match self.source.terminate(pid, self.kill_signal) {
            Ok(()) => {
                log::info!("Sent {:?} to PID {}", self.kill_signal, pid);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to terminate PID {}: {}", pid, e);
                Err(e)
            }
        }
    }

    pub fn cpu_history(&self) -> &HistoryBuffer {
        &self.cpu_history
    }

    pub fn mem_history(&self) -> &HistoryBuffer {
        &self.mem_history
    }
}
