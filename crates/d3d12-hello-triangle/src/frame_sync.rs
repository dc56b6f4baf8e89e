/// CPU-side bookkeeping for the single frame fence.
///
/// The value handed out by [`FenceTracker::next_signal`] is what the command
/// queue signals once the submitted work completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceTracker {
    next_value: u64,
}

impl Default for FenceTracker {
    fn default() -> Self {
        Self { next_value: 1 }
    }
}

impl FenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value to signal for the work just submitted.
    pub fn next_signal(&mut self) -> u64 {
        let value = self.next_value;
        self.next_value += 1;
        value
    }

    pub fn must_wait(completed: u64, signalled: u64) -> bool {
        completed < signalled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_signal_is_one() {
        let mut tracker = FenceTracker::new();
        assert_eq!(tracker.next_signal(), 1);
    }

    #[test]
    fn signals_strictly_increase() {
        let mut tracker = FenceTracker::new();
        let values: Vec<u64> = (0..5).map(|_| tracker.next_signal()).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn waits_only_while_the_gpu_is_behind() {
        assert!(FenceTracker::must_wait(0, 1));
        assert!(FenceTracker::must_wait(4, 5));
        assert!(!FenceTracker::must_wait(5, 5));
        assert!(!FenceTracker::must_wait(6, 5));
    }
}
