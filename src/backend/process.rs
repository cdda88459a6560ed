use super::source::SystemSource;
use crate::model::{ProcessEntry, WorkingSet};

/// Snapshot of every running process, in the order the OS lists them.
///
/// A process whose memory cannot be queried is still listed, with
/// [`WorkingSet::Unavailable`]. If the process table cannot be opened the
/// snapshot is empty; the next refresh simply tries again.
pub fn enumerate(source: &impl SystemSource) -> Vec<ProcessEntry> {
    let Some(raw) = source.processes() else {
        log::warn!("Process enumeration failed, showing an empty list");
        return Vec::new();
    };

    raw.into_iter()
        .map(|p| {
            let working_set = WorkingSet::from(source.working_set(p.pid));
            ProcessEntry::new(p.pid, p.name, p.threads, working_set)
        })
        .collect()
}

/// Processes whose termination would take down the session or the system.
pub fn is_critical_process(pid: u32, name: &str) -> bool {
    if pid <= 2 {
        return true; // init and kthreadd
    }
    matches!(
        name,
        "systemd" | "init" | "kthreadd" | "Xorg" | "Xwayland"
        | "kwin_wayland" | "kwin_x11" | "plasmashell" | "sddm"
        | "gnome-shell" | "gdm" | "dbus-daemon" | "dbus-broker"
        | "polkitd" | "systemd-logind" | "pipewire" | "wireplumber"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::source::fake::FakeSource;
    use crate::model::RawProcess;
    use std::cell::RefCell;
    use std::collections::HashMap;

    fn raw(pid: u32, name: &str, threads: u64) -> RawProcess {
        RawProcess {
            pid,
            name: name.to_string(),
            threads,
        }
    }

    #[test]
    fn keeps_os_order_and_marks_unreadable_memory() {
        let source = FakeSource {
            processes: RefCell::new(Some(vec![
                raw(9, "bash", 1),
                raw(1, "systemd", 1),
                raw(42, "firefox", 87),
            ])),
            working_sets: HashMap::from([(9, 4096), (42, 512 * 1024 * 1024)]),
            ..Default::default()
        };

        let entries = enumerate(&source);
        let pids: Vec<u32> = entries.iter().map(|e| e.pid).collect();
        assert_eq!(pids, vec![9, 1, 42]);
        assert_eq!(entries[0].working_set, WorkingSet::Bytes(4096));
        assert_eq!(entries[1].working_set, WorkingSet::Unavailable);
        assert_eq!(entries[2].threads, 87);
        assert_eq!(entries[2].name, "firefox");
    }

    #[test]
    fn failed_snapshot_is_empty() {
        let source = FakeSource {
            processes: RefCell::new(None),
            ..Default::default()
        };
        assert!(enumerate(&source).is_empty());
    }

    #[test]
    fn critical_processes() {
        assert!(is_critical_process(1, "anything"));
        assert!(is_critical_process(2, "kthreadd"));
        assert!(is_critical_process(1234, "Xwayland"));
        assert!(!is_critical_process(1234, "firefox"));
    }
}
