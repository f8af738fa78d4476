use crate::error::SubmissionError;

/// Counts consecutive dropped frames.
///
/// A rejected submission drops one frame and rendering continues. More than
/// `budget` drops in a row escalate to [`SubmissionError::Persistent`]; a fatal
/// error escalates immediately. Any presented frame resets the run.
#[derive(Debug, Clone)]
pub struct DropTracker {
    budget: u32,
    consecutive: u32,
    total: u64,
}

impl DropTracker {
    pub fn new(budget: u32) -> Self {
        Self { budget, consecutive: 0, total: 0 }
    }

    #[inline]
    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }

    #[inline]
    pub fn total_dropped(&self) -> u64 {
        self.total
    }

    pub fn record_presented(&mut self) {
        if self.consecutive > 0 {
            log::debug!("frame presented after {} dropped", self.consecutive);
        }
        self.consecutive = 0;
    }

    /// `Ok` while the frame can simply be dropped.
    pub fn record_drop(&mut self, err: SubmissionError) -> Result<(), SubmissionError> {
        if matches!(err, SubmissionError::Fatal { .. }) {
            return Err(err);
        }

        self.consecutive += 1;
        self.total += 1;
        if self.consecutive > self.budget {
            return Err(SubmissionError::Persistent { count: self.consecutive, last: err.to_string() });
        }

        log::warn!("dropping frame ({}/{}): {err}", self.consecutive, self.budget);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected() -> SubmissionError {
        SubmissionError::Rejected { reason: "timeout".into() }
    }

    #[test]
    fn drops_within_budget_are_absorbed() {
        let mut t = DropTracker::new(3);
        for _ in 0..3 {
            assert!(t.record_drop(rejected()).is_ok());
        }
        assert_eq!(t.consecutive(), 3);
        let err = t.record_drop(rejected()).unwrap_err();
        assert!(matches!(err, SubmissionError::Persistent { count: 4, .. }));
    }

    #[test]
    fn presented_frame_resets_the_run() {
        let mut t = DropTracker::new(1);
        t.record_drop(rejected()).unwrap();
        t.record_presented();
        t.record_drop(rejected()).unwrap();
        assert_eq!(t.consecutive(), 1);
        assert_eq!(t.total_dropped(), 2);
    }

    #[test]
    fn fatal_escalates_immediately() {
        let mut t = DropTracker::new(10);
        let err = t.record_drop(SubmissionError::Fatal { reason: "oom".into() }).unwrap_err();
        assert!(matches!(err, SubmissionError::Fatal { .. }));
        assert_eq!(t.total_dropped(), 0);
    }
}
