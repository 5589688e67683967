/// A single cancellable task scheduled on a logical millisecond clock.
/// Every trigger supersedes the pending task, so a burst of triggers
/// runs once, `delay_ms` after the last one.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay_ms: u64,
    deadline: Option<u64>,
    fired: usize,
}

impl Debouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            deadline: None,
            fired: 0,
        }
    }

    /// Cancel any pending task and schedule a fresh one. Returns its deadline.
    pub fn trigger(&mut self, now_ms: u64) -> u64 {
        let deadline = now_ms.saturating_add(self.delay_ms);
        if let Some(previous) = self.deadline.replace(deadline) {
            trace!("Rescheduled debounced task from {} to {}", previous, deadline);
        }
        deadline
    }

    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<u64> {
        self.deadline
    }

    /// Number of times the task has run
    pub fn fired(&self) -> usize {
        self.fired
    }

    /// True exactly once when the pending task has come due
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                self.fired += 1;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_runs_once_after_last_trigger() {
        let mut debouncer = Debouncer::new(100);
        for now in [0, 20, 40, 60, 80] {
            debouncer.trigger(now);
            assert!(!debouncer.poll(now));
        }
        assert_eq!(debouncer.deadline(), Some(180));
        assert!(!debouncer.poll(179));
        assert!(debouncer.poll(180));
        assert!(!debouncer.poll(500));
        assert_eq!(debouncer.fired(), 1);
    }

    #[test]
    fn test_separate_bursts_run_separately() {
        let mut debouncer = Debouncer::new(50);
        debouncer.trigger(0);
        assert!(debouncer.poll(60));
        debouncer.trigger(100);
        debouncer.trigger(120);
        assert!(!debouncer.poll(160));
        assert!(debouncer.poll(170));
        assert_eq!(debouncer.fired(), 2);
    }

    #[test]
    fn test_cancel() {
        let mut debouncer = Debouncer::new(100);
        assert!(!debouncer.cancel());
        debouncer.trigger(0);
        assert!(debouncer.is_pending());
        assert!(debouncer.cancel());
        assert!(!debouncer.poll(1000));
        assert_eq!(debouncer.fired(), 0);
    }
}
