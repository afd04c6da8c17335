//! Digest scheduling.

use std::time::{Duration, Instant};

/// Tracks when the next top-N digest is due.
#[derive(Debug, Clone)]
pub(crate) struct DigestSchedule {
    interval: Duration,
    last_sent: Option<Instant>,
}

impl DigestSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_sent: None,
        }
    }

    /// Whether a digest should go out at `now`. The first check is always due.
    pub fn is_due(&self, now: Instant) -> bool {
        self.last_sent
            .map_or(true, |last| now.saturating_duration_since(last) >= self.interval)
    }

    pub fn mark_sent(&mut self, now: Instant) {
        self.last_sent = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_check_is_due() {
        let schedule = DigestSchedule::new(Duration::from_secs(3600));
        assert!(schedule.is_due(Instant::now()));
    }

    #[test]
    fn waits_full_interval_after_send() {
        let mut schedule = DigestSchedule::new(Duration::from_secs(3600));
        let start = Instant::now();
        schedule.mark_sent(start);

        assert!(!schedule.is_due(start + Duration::from_secs(3599)));
        assert!(schedule.is_due(start + Duration::from_secs(3600)));
    }
}
