//! Suggestion debouncer
//!
//! Holds off fetching until the caret has been stable for the configured
//! delay (default 1000ms). The timer is polled from the event loop rather than
//! driven by a callback, so at most one timer is ever live.

use std::time::{Duration, Instant};

/// Default debounce delay in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;

/// Tracks when the caret last moved and whether a fetch is waiting on it.
#[derive(Debug)]
pub struct SuggestDebouncer {
    delay_ms: u64,
    /// Time of the caret move or edit that armed the timer
    armed_at: Option<Instant>,
}

impl Default for SuggestDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

impl SuggestDebouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            armed_at: None,
        }
    }

    /// Arm the timer, restarting the full delay if it was already armed.
    pub fn schedule(&mut self) {
        self.armed_at = Some(Instant::now());
    }

    /// Disarm the timer.
    pub fn cancel(&mut self) {
        self.armed_at = None;
    }

    /// Whether the timer is armed and the full delay has elapsed since it was
    /// last scheduled.
    pub fn is_ready(&self) -> bool {
        self.armed_at
            .is_some_and(|armed_at| armed_at.elapsed() >= Duration::from_millis(self.delay_ms))
    }

    /// Disarm the timer after it fired.
    pub fn mark_complete(&mut self) {
        self.armed_at = None;
    }

    pub fn has_pending(&self) -> bool {
        self.armed_at.is_some()
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Change the delay; an armed timer keeps its start time.
    pub fn set_delay_ms(&mut self, delay_ms: u64) {
        self.delay_ms = delay_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::thread;

    // =========================================================================
    // Unit Tests
    // =========================================================================

    #[test]
    fn test_new_debouncer() {
        let debouncer = SuggestDebouncer::new(1000);
        assert_eq!(debouncer.delay_ms(), 1000);
        assert!(!debouncer.has_pending());
        assert!(!debouncer.is_ready());
    }

    #[test]
    fn test_default_is_one_second() {
        let debouncer = SuggestDebouncer::default();
        assert_eq!(debouncer.delay_ms(), 1000);
    }

    #[test]
    fn test_schedule_sets_pending() {
        let mut debouncer = SuggestDebouncer::new(1000);
        debouncer.schedule();
        assert!(debouncer.has_pending());
        assert!(!debouncer.is_ready());
    }

    #[test]
    fn test_zero_delay_is_ready_immediately() {
        let mut debouncer = SuggestDebouncer::new(0);
        debouncer.schedule();
        assert!(debouncer.is_ready());
    }

    #[test]
    fn test_is_ready_true_after_delay() {
        let mut debouncer = SuggestDebouncer::new(50);
        debouncer.schedule();
        thread::sleep(Duration::from_millis(60));
        assert!(debouncer.is_ready());
    }

    #[test]
    fn test_cancel_clears_state() {
        let mut debouncer = SuggestDebouncer::new(0);
        debouncer.schedule();
        debouncer.cancel();
        assert!(!debouncer.has_pending());
        assert!(!debouncer.is_ready());
    }

    #[test]
    fn test_mark_complete_clears_state() {
        let mut debouncer = SuggestDebouncer::new(0);
        debouncer.schedule();
        assert!(debouncer.is_ready());

        debouncer.mark_complete();
        assert!(!debouncer.has_pending());
        assert!(!debouncer.is_ready());
    }

    #[test]
    fn test_reschedule_midway_restarts_full_delay() {
        let mut debouncer = SuggestDebouncer::new(100);
        debouncer.schedule();

        // Caret moves halfway through the window
        thread::sleep(Duration::from_millis(50));
        debouncer.schedule();

        // The original window would have elapsed by now
        thread::sleep(Duration::from_millis(60));
        assert!(!debouncer.is_ready());

        thread::sleep(Duration::from_millis(50));
        assert!(debouncer.is_ready());
    }

    #[test]
    fn test_set_delay_ms() {
        let mut debouncer = SuggestDebouncer::new(1000);
        debouncer.set_delay_ms(0);
        debouncer.schedule();
        assert!(debouncer.is_ready());
    }

    // =========================================================================
    // Property-Based Tests
    // =========================================================================

    // For any burst of caret moves inside the window, the timer fires exactly
    // once, a full delay after the last move.
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        #[test]
        fn prop_burst_fires_once_after_last_move(
            num_moves in 1usize..=6,
            delay_ms in 40u64..80u64
        ) {
            let mut debouncer = SuggestDebouncer::new(delay_ms);

            for _ in 0..num_moves {
                debouncer.schedule();
                thread::sleep(Duration::from_millis(5));
            }

            prop_assert!(!debouncer.is_ready());
            prop_assert!(debouncer.has_pending());

            thread::sleep(Duration::from_millis(delay_ms + 20));
            prop_assert!(debouncer.is_ready());

            debouncer.mark_complete();
            prop_assert!(!debouncer.is_ready());
            prop_assert!(!debouncer.has_pending());
        }
    }
}
