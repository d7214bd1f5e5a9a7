//! Presence debouncing

use tracing::trace;

/// Hysteretic counter turning noisy beacon samples into a stable
/// driver-present signal.
///
/// Qualifying samples increment the counter, anything else decrements it
/// with a floor at zero. Reaching the threshold arms the system; falling
/// all the way back to zero is the disarm condition. The counter may run
/// past the threshold; only the comparison matters.
#[derive(Debug)]
pub struct PresenceDebouncer {
    count: u32,
    threshold: u32,
}

impl PresenceDebouncer {
    pub fn new(threshold: u32) -> Self {
        Self {
            count: 0,
            threshold,
        }
    }

    /// Feed one sample. Returns true when this sample armed the debouncer
    /// (crossed the threshold from below).
    pub fn update(&mut self, qualifying: bool) -> bool {
        let was_armed = self.is_armed();
        if qualifying {
            self.count += 1;
        } else {
            self.count = self.count.saturating_sub(1);
        }
        trace!(count = self.count, qualifying, "presence sample");
        !was_armed && self.is_armed()
    }

    /// Whether enough consecutive presence has accumulated to activate.
    pub fn is_armed(&self) -> bool {
        self.count >= self.threshold
    }

    /// Whether presence has fully decayed (the disarm condition).
    pub fn is_idle(&self) -> bool {
        self.count == 0
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_samples_arm() {
        let mut debouncer = PresenceDebouncer::new(3);
        assert!(!debouncer.update(true));
        assert!(!debouncer.update(true));
        assert!(debouncer.update(true));
        assert!(debouncer.is_armed());
    }

    #[test]
    fn test_single_miss_decrements() {
        let mut debouncer = PresenceDebouncer::new(3);
        for _ in 0..5 {
            debouncer.update(true);
        }
        assert_eq!(debouncer.count(), 5);
        debouncer.update(false);
        assert_eq!(debouncer.count(), 4);
        assert!(debouncer.is_armed());
    }

    #[test]
    fn test_counter_floors_at_zero() {
        let mut debouncer = PresenceDebouncer::new(3);
        for _ in 0..10 {
            debouncer.update(false);
        }
        assert_eq!(debouncer.count(), 0);
        assert!(debouncer.is_idle());
    }

    #[test]
    fn test_arming_edge_reported_once() {
        let mut debouncer = PresenceDebouncer::new(2);
        assert!(!debouncer.update(true));
        assert!(debouncer.update(true));
        // Already armed, no new edge.
        assert!(!debouncer.update(true));
        debouncer.update(false);
        debouncer.update(false);
        debouncer.update(false);
        assert!(debouncer.is_idle());
        assert!(!debouncer.update(true));
        assert!(debouncer.update(true));
    }
}
