use std::time::{Duration, Instant};

/// Identifies one scheduled dismissal. Stale tokens are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayToken(u64);

/// Single global slot for a transient result (e.g. the last dice roll).
///
/// Showing a value starts a single-shot dismissal timer and cancels any
/// pending one; when the timer fires the value is cleared.
#[derive(Debug, Clone)]
pub struct ResultOverlay<T> {
    value: Option<T>,
    deadline: Option<Instant>,
    generation: u64,
}

impl<T> Default for ResultOverlay<T> {
    fn default() -> Self {
        Self {
            value: None,
            deadline: None,
            generation: 0,
        }
    }
}

impl<T> ResultOverlay<T> {
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Show `value` until `now + timeout`. `None` clears the slot and
    /// schedules nothing.
    pub fn show(&mut self, value: Option<T>, timeout: Duration, now: Instant) -> Option<OverlayToken> {
        self.generation = self.generation.wrapping_add(1);
        match value {
            Some(v) => {
                self.value = Some(v);
                self.deadline = Some(now + timeout);
                Some(OverlayToken(self.generation))
            }
            None => {
                self.value = None;
                self.deadline = None;
                None
            }
        }
    }

    /// Fire the timer identified by `token`. Returns `true` if it was still
    /// current and the value was cleared.
    pub fn fire(&mut self, token: OverlayToken) -> bool {
        if token.0 != self.generation || self.deadline.is_none() {
            return false;
        }
        self.value = None;
        self.deadline = None;
        true
    }

    /// Fire the pending timer if its deadline has passed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => self.fire(OverlayToken(self.generation)),
            _ => false,
        }
    }

    /// Drop the pending timer without clearing the value.
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.deadline = None;
    }

    pub fn clear(&mut self) {
        self.cancel();
        self.value = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_clears_after_timeout() {
        let now = Instant::now();
        let mut overlay = ResultOverlay::default();
        overlay.show(Some(17), Duration::from_secs(8), now);
        assert!(!overlay.tick(now + Duration::from_secs(7)));
        assert_eq!(overlay.value(), Some(&17));
        assert!(overlay.tick(now + Duration::from_secs(8)));
        assert_eq!(overlay.value(), None);
        assert!(!overlay.is_pending());
    }

    #[test]
    fn new_value_cancels_pending_timer() {
        let now = Instant::now();
        let mut overlay = ResultOverlay::default();
        let first = overlay.show(Some(3), Duration::from_secs(8), now).unwrap();
        let later = now + Duration::from_secs(5);
        overlay.show(Some(12), Duration::from_secs(8), later);
        assert!(!overlay.fire(first));
        assert!(!overlay.tick(now + Duration::from_secs(9)));
        assert_eq!(overlay.value(), Some(&12));
        assert!(overlay.tick(later + Duration::from_secs(8)));
    }

    #[test]
    fn showing_none_clears_immediately() {
        let now = Instant::now();
        let mut overlay = ResultOverlay::default();
        overlay.show(Some("crit"), Duration::from_secs(8), now);
        assert!(overlay.show(None, Duration::from_secs(8), now).is_none());
        assert_eq!(overlay.value(), None);
        assert!(!overlay.is_pending());
    }

    #[test]
    fn cancel_keeps_value() {
        let now = Instant::now();
        let mut overlay = ResultOverlay::default();
        let token = overlay.show(Some(1), Duration::ZERO, now).unwrap();
        overlay.cancel();
        assert!(!overlay.fire(token));
        assert!(!overlay.tick(now));
        assert_eq!(overlay.value(), Some(&1));
        overlay.clear();
        assert_eq!(overlay.value(), None);
    }
}
