use std::time::{Duration, Instant};

/// Decides when a session should write its draft.
///
/// A save is due when the debounce has elapsed since the last answer, or when
/// the interval has elapsed since the last save and something changed. Before
/// the first save the interval counts from the first unsaved change. Time is
/// passed in by the caller.
#[derive(Debug, Clone)]
pub struct AutosaveTimer {
    interval: Duration,
    debounce: Duration,
    last_saved: Option<Instant>,
    last_change: Option<Instant>,
    dirty_since: Option<Instant>,
    dirty: bool,
}

impl AutosaveTimer {
    pub fn new(interval: Duration, debounce: Duration) -> Self {
        Self {
            interval,
            debounce,
            last_saved: None,
            last_change: None,
            dirty_since: None,
            dirty: false,
        }
    }

    pub fn notify_answer(&mut self, now: Instant) {
        self.last_change = Some(now);
        if !self.dirty {
            self.dirty_since = Some(now);
        }
        self.dirty = true;
    }

    pub fn due(&self, now: Instant) -> bool {
        if !self.dirty {
            return false;
        }
        let debounced = self
            .last_change
            .is_some_and(|at| now.saturating_duration_since(at) >= self.debounce);
        let interval_elapsed = self
            .last_saved
            .or(self.dirty_since)
            .is_some_and(|at| now.saturating_duration_since(at) >= self.interval);
        debounced || interval_elapsed
    }

    pub fn mark_saved(&mut self, now: Instant) {
        self.last_saved = Some(now);
        self.dirty = false;
        self.dirty_since = None;
    }

    /// Records a save made outside the timer, dated at the latest known change.
    pub fn mark_clean(&mut self) {
        if let Some(at) = self.last_change {
            self.last_saved = Some(at);
        }
        self.dirty = false;
        self.dirty_since = None;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl Default for AutosaveTimer {
    fn default() -> Self {
        Self::new(Duration::from_secs(30), Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_due_without_changes() {
        let timer = AutosaveTimer::default();
        assert!(!timer.due(Instant::now() + Duration::from_secs(120)));
    }

    #[test]
    fn test_debounce() {
        let start = Instant::now();
        let mut timer = AutosaveTimer::default();
        timer.notify_answer(start);
        assert!(!timer.due(start + Duration::from_millis(400)));
        assert!(timer.due(start + Duration::from_millis(1000)));

        timer.mark_saved(start + Duration::from_millis(1000));
        assert!(!timer.due(start + Duration::from_secs(5)));
    }

    #[test]
    fn test_interval_catches_rapid_typing() {
        let start = Instant::now();
        let mut timer = AutosaveTimer::new(Duration::from_secs(30), Duration::from_secs(1));
        timer.mark_saved(start);
        // an answer every half second never settles the debounce
        let mut t = start;
        for _ in 0..59 {
            t += Duration::from_millis(500);
            timer.notify_answer(t);
            assert!(!timer.due(t));
        }
        t += Duration::from_millis(500);
        timer.notify_answer(t);
        assert!(timer.due(t));
    }

    #[test]
    fn test_interval_runs_before_first_save() {
        let start = Instant::now();
        let mut timer = AutosaveTimer::default();
        timer.notify_answer(start);
        assert!(!timer.due(start));

        let later = start + Duration::from_secs(40);
        timer.notify_answer(later);
        assert!(timer.due(later));
    }

    #[test]
    fn test_mark_clean_resets_dirty_state() {
        let start = Instant::now();
        let mut timer = AutosaveTimer::default();
        timer.notify_answer(start);
        timer.mark_clean();
        assert!(!timer.is_dirty());
        assert!(!timer.due(start + Duration::from_secs(120)));
    }
}
