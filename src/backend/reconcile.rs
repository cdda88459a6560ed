use crate::model::ProcessEntry;

/// Rows to display after a refresh, and which of them to select.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub rows: Vec<ProcessEntry>,
    pub selected_index: Option<usize>,
}

/// Rebuilds the displayed list from `entries`, locating the previously
/// selected process by PID rather than by row position.
pub fn reconcile(previous_selected: Option<u32>, entries: Vec<ProcessEntry>) -> Reconciled {
    let selected_index =
        previous_selected.and_then(|pid| entries.iter().position(|e| e.pid == pid));
    Reconciled {
        rows: entries,
        selected_index,
    }
}

/// The user's current selection, tracked by process identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub selected_pid: Option<u32>,
}

impl SelectionState {
    pub fn select(&mut self, pid: Option<u32>) {
        self.selected_pid = pid;
    }

    /// Reconciles against a new snapshot and forgets the selection if the
    /// selected process is gone.
    pub fn reconcile(&mut self, entries: Vec<ProcessEntry>) -> Reconciled {
        let reconciled = reconcile(self.selected_pid, entries);
        if reconciled.selected_index.is_none() {
            self.selected_pid = None;
        }
        reconciled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WorkingSet;

    fn entries(pids: &[u32]) -> Vec<ProcessEntry> {
        pids.iter()
            .map(|&pid| ProcessEntry::new(pid, format!("proc{pid}"), 1, WorkingSet::Unavailable))
            .collect()
    }

    #[test]
    fn selection_follows_pid() {
        let result = reconcile(Some(42), entries(&[7, 42, 9]));
        assert_eq!(result.selected_index, Some(1));
        assert_eq!(result.rows.len(), 3);
    }

    #[test]
    fn selection_moves_with_row() {
        let mut state = SelectionState::default();
        state.select(Some(42));
        assert_eq!(state.reconcile(entries(&[42, 7, 9])).selected_index, Some(0));
        assert_eq!(state.reconcile(entries(&[7, 9, 3, 42])).selected_index, Some(3));
        assert_eq!(state.selected_pid, Some(42));
    }

    #[test]
    fn selection_lost_when_process_exits() {
        let mut state = SelectionState { selected_pid: Some(42) };
        let result = state.reconcile(entries(&[7, 9]));
        assert_eq!(result.selected_index, None);
        assert_eq!(state.selected_pid, None);

        // does not come back if the PID reappears later
        assert_eq!(state.reconcile(entries(&[42])).selected_index, None);
    }

    #[test]
    fn no_previous_selection() {
        let result = reconcile(None, entries(&[1, 2, 3]));
        assert_eq!(result.selected_index, None);
    }

    #[test]
    fn empty_snapshot() {
        let result = reconcile(Some(5), Vec::new());
        assert!(result.rows.is_empty());
        assert_eq!(result.selected_index, None);
    }

    #[test]
    fn rows_are_replaced_wholesale() {
        let result = reconcile(Some(2), entries(&[3, 2, 1]));
        let pids: Vec<u32> = result.rows.iter().map(|e| e.pid).collect();
        assert_eq!(pids, vec![3, 2, 1]);
    }
}
