use std::fmt;

/// Resident memory of a process, or a marker that it could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkingSet {
    Bytes(u64),
    Unavailable,
}

impl WorkingSet {
    pub fn bytes(&self) -> Option<u64> {
        match self {
            WorkingSet::Bytes(b) => Some(*b),
            WorkingSet::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.bytes().is_some()
    }
}

impl From<Option<u64>> for WorkingSet {
    fn from(bytes: Option<u64>) -> Self {
        bytes.map_or(WorkingSet::Unavailable, WorkingSet::Bytes)
    }
}

impl fmt::Display for WorkingSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bytes() {
            Some(b) => write!(f, "{:.2} MB", b as f64 / (1024.0 * 1024.0)),
            None => f.write_str("N/A"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
    pub threads: u64,
    pub working_set: WorkingSet,
}

impl ProcessEntry {
    pub fn new(pid: u32, name: impl Into<String>, threads: u64, working_set: WorkingSet) -> Self {
        Self {
            pid,
            name: name.into(),
            threads,
            working_set,
        }
    }
}
