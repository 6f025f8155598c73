//! Per-LED toggle timing.
//!
//! A [`ToggleTracker`] remembers when its LED last flipped and whether it is
//! lit. It is pure timestamp arithmetic: the caller decides the period and
//! writes the resulting level to hardware.

use crate::time::TimeInstant;

/// Last-toggle timestamp and illumination of one LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleTracker<I> {
    last_toggle: I,
    illuminated: bool,
}

impl<I: TimeInstant> ToggleTracker<I> {
    /// Creates a tracker that last toggled at `now`.
    pub fn new(now: I, illuminated: bool) -> Self {
        Self {
            last_toggle: now,
            illuminated,
        }
    }

    /// True once strictly more than `period_ms` has passed since the last toggle.
    #[inline]
    pub fn is_due(&self, now: I, period_ms: u64) -> bool {
        now.millis_since(self.last_toggle) > period_ms
    }

    /// Flips the level and records `now` as the toggle time. Returns the new level.
    #[inline]
    pub fn toggle(&mut self, now: I) -> bool {
        self.illuminated = !self.illuminated;
        self.last_toggle = now;
        self.illuminated
    }

    /// Toggles if due. Returns the new level when a toggle happened.
    pub fn poll(&mut self, now: I, period_ms: u64) -> Option<bool> {
        if self.is_due(now, period_ms) {
            Some(self.toggle(now))
        } else {
            None
        }
    }

    /// Restarts timing at `now` with the given level.
    pub fn restart(&mut self, now: I, illuminated: bool) {
        self.last_toggle = now;
        self.illuminated = illuminated;
    }

    /// Current level.
    #[inline]
    pub fn illuminated(&self) -> bool {
        self.illuminated
    }

    /// Time of the last toggle or restart.
    #[inline]
    pub fn last_toggle(&self) -> I {
        self.last_toggle
    }
}

/// Two LEDs blinking in lockstep, exactly out of phase.
///
/// Only the primary level is stored; the secondary is derived from it, so the
/// pair can never drift into the same phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairedToggle<I> {
    tracker: ToggleTracker<I>,
}

impl<I: TimeInstant> PairedToggle<I> {
    /// Creates a pair whose primary LED is at `primary`.
    pub fn new(now: I, primary: bool) -> Self {
        Self {
            tracker: ToggleTracker::new(now, primary),
        }
    }

    /// Toggles both LEDs if due. Returns `(primary, secondary)` on a toggle.
    pub fn poll(&mut self, now: I, period_ms: u64) -> Option<(bool, bool)> {
        self.tracker.poll(now, period_ms).map(|primary| (primary, !primary))
    }

    /// Restarts timing at `now` with the primary LED at `primary`.
    pub fn restart(&mut self, now: I, primary: bool) {
        self.tracker.restart(now, primary);
    }

    /// Level of the primary LED.
    #[inline]
    pub fn primary(&self) -> bool {
        self.tracker.illuminated()
    }

    /// Level of the secondary LED; always `!primary()`.
    #[inline]
    pub fn secondary(&self) -> bool {
        !self.tracker.illuminated()
    }

    /// The underlying tracker.
    pub fn tracker(&self) -> &ToggleTracker<I> {
        &self.tracker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Uptime;

    #[test]
    fn due_only_strictly_after_period() {
        let tracker = ToggleTracker::new(Uptime(0), true);
        assert!(!tracker.is_due(Uptime(499), 500));
        assert!(!tracker.is_due(Uptime(500), 500));
        assert!(tracker.is_due(Uptime(501), 500));
    }

    #[test]
    fn poll_flips_level_and_restarts_period() {
        let mut tracker = ToggleTracker::new(Uptime(0), true);

        assert_eq!(tracker.poll(Uptime(510), 500), Some(false));
        assert_eq!(tracker.last_toggle(), Uptime(510));
        assert_eq!(tracker.poll(Uptime(900), 500), None);
        assert_eq!(tracker.poll(Uptime(1020), 500), Some(true));
    }

    #[test]
    fn pair_stays_out_of_phase() {
        let mut pair = PairedToggle::new(Uptime(0), true);
        assert_eq!((pair.primary(), pair.secondary()), (true, false));

        let mut now = 0;
        for _ in 0..200 {
            now += 10;
            if let Some((a, b)) = pair.poll(Uptime(now), 250) {
                assert_ne!(a, b);
            }
            assert_ne!(pair.primary(), pair.secondary());
        }
    }

    #[test]
    fn pair_restart_resets_shared_tracker() {
        let mut pair = PairedToggle::new(Uptime(0), true);
        assert_eq!(pair.poll(Uptime(260), 250), Some((false, true)));

        pair.restart(Uptime(300), true);

        assert_eq!(pair.tracker().last_toggle(), Uptime(300));
        assert!(pair.tracker().illuminated());
        assert_eq!(pair.poll(Uptime(550), 250), None);
    }
}
