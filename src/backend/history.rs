/// Samples kept per graph: one minute at one sample per second.
pub const HISTORY_SIZE: usize = 60;

/// Fixed-capacity ring of samples, pre-filled with zeros.
///
/// `write_index` always points at the slot overwritten by the next push,
/// which after a full cycle is also the oldest sample.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    slots: Vec<f64>,
    write_index: usize,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![0.0; capacity.max(1)],
            write_index: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn push(&mut self, value: f64) {
        self.slots[self.write_index] = value;
        self.write_index = (self.write_index + 1) % self.slots.len();
    }

    /// Most recently pushed value (`0.0` before the first push).
    pub fn latest(&self) -> f64 {
        let cap = self.slots.len();
        self.slots[(self.write_index + cap - 1) % cap]
    }

    /// Values oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        let (newer, older) = self.slots.split_at(self.write_index);
        older.iter().chain(newer).copied()
    }

    pub fn ordered_snapshot(&self) -> Vec<f64> {
        let mut values = Vec::with_capacity(self.capacity());
        values.extend(self.iter());
        values
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(HISTORY_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn starts_zeroed() {
        let history = HistoryBuffer::default();
        assert_eq!(history.capacity(), HISTORY_SIZE);
        assert_eq!(history.ordered_snapshot(), vec![0.0; HISTORY_SIZE]);
        assert_eq!(history.latest(), 0.0);
    }

    #[test]
    fn partial_fill_keeps_leading_zeros() {
        let mut history = HistoryBuffer::new(4);
        history.push(7.0);
        history.push(8.0);
        assert_eq!(history.ordered_snapshot(), vec![0.0, 0.0, 7.0, 8.0]);
        assert_eq!(history.latest(), 8.0);
    }

    #[test]
    fn wraparound_drops_oldest() {
        let mut history = HistoryBuffer::new(4);
        for v in [10.0, 20.0, 30.0, 40.0, 50.0] {
            history.push(v);
        }
        assert_eq!(history.ordered_snapshot(), vec![20.0, 30.0, 40.0, 50.0]);
        assert_eq!(history.latest(), 50.0);
    }

    #[test]
    fn zero_capacity_is_coerced() {
        let mut history = HistoryBuffer::new(0);
        history.push(3.0);
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.ordered_snapshot(), vec![3.0]);
    }

    proptest! {
        #[test]
        fn snapshot_length_is_capacity(
            cap in 1usize..100,
            values in prop::collection::vec(0.0f64..100.0, 0..300),
        ) {
            let mut history = HistoryBuffer::new(cap);
            for v in &values {
                history.push(*v);
            }
            let snapshot = history.ordered_snapshot();
            prop_assert_eq!(snapshot.len(), cap);
            if let Some(last) = values.last() {
                prop_assert_eq!(snapshot[cap - 1], *last);
                prop_assert_eq!(history.latest(), *last);
            }
        }

        #[test]
        fn snapshot_is_tail_of_pushes(
            cap in 1usize..50,
            values in prop::collection::vec(0.0f64..100.0, 0..200),
        ) {
            let mut history = HistoryBuffer::new(cap);
            for v in &values {
                history.push(*v);
            }
            let mut expected = vec![0.0; cap.saturating_sub(values.len())];
            expected.extend(values.iter().skip(values.len().saturating_sub(cap)));
            prop_assert_eq!(history.ordered_snapshot(), expected);
        }
    }
}
