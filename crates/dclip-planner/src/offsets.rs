//! Offset calculation.
//!
//! The offset of entry `k` is the sum of the durations of entries `0..k`,
//! accumulated left to right in `f64`. [`OffsetAccumulator`] is the single
//! implementation of that sum: the committer uses it while building a plan
//! and [`prefix_offsets`] uses it to verify one. Consumers read offsets from
//! the plan and never accumulate durations on their own.

/// Running prefix sum of clip durations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OffsetAccumulator {
    next: f64,
}

impl OffsetAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a clip of `duration_secs` and return its start offset.
    pub fn place(&mut self, duration_secs: f64) -> f64 {
        let start = self.next;
        self.next += duration_secs;
        start
    }

    /// Total duration placed so far.
    pub fn total(&self) -> f64 {
        self.next
    }
}

/// Start offsets for a sequence of durations.
pub fn prefix_offsets<I>(durations: I) -> Vec<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut acc = OffsetAccumulator::new();
    durations.into_iter().map(|d| acc.place(d)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_offsets() {
        assert_eq!(prefix_offsets([400.0, 200.0, 100.0]), vec![0.0, 400.0, 600.0]);
    }

    #[test]
    fn test_empty() {
        assert!(prefix_offsets(std::iter::empty()).is_empty());
    }

    #[test]
    fn test_accumulator_total() {
        let mut acc = OffsetAccumulator::new();
        assert_eq!(acc.place(12.5), 0.0);
        assert_eq!(acc.place(7.25), 12.5);
        assert_eq!(acc.total(), 19.75);
    }

    #[test]
    fn test_fractional_durations_match_accumulator() {
        let durations = [0.1, 0.2, 0.3, 29.97, 14.033];
        let offsets = prefix_offsets(durations);

        let mut acc = OffsetAccumulator::new();
        for (duration, offset) in durations.iter().zip(&offsets) {
            assert_eq!(acc.place(*duration).to_bits(), offset.to_bits());
        }
    }
}
