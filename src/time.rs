//! Time abstraction traits for platform-agnostic timing.
//!
//! The controller only ever asks "how many milliseconds have passed since
//! this instant", so the traits stay small. [`Uptime`] is a ready-made
//! millisecond instant for platforms whose tick counter is already in
//! milliseconds (e.g. a `k_uptime_get()`-style counter or an SysTick ISR).

/// Trait for abstracting time sources.
///
/// Must be monotonic: successive calls never return an earlier instant.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq {
    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;
}

/// Trait abstraction for instant types.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    ///
    /// Implementations should saturate to zero if `earlier` is actually later.
    fn duration_since(&self, earlier: Self) -> Self::Duration;

    /// Milliseconds elapsed since `earlier`.
    #[inline]
    fn millis_since(&self, earlier: Self) -> u64 {
        self.duration_since(earlier).as_millis()
    }
}

/// A plain millisecond duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Milliseconds(pub u64);

impl TimeDuration for Milliseconds {
    fn as_millis(&self) -> u64 {
        self.0
    }
}

/// Milliseconds since boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Uptime(pub u64);

impl Uptime {
    /// Raw millisecond count.
    pub const fn as_millis(&self) -> u64 {
        self.0
    }
}

impl TimeInstant for Uptime {
    type Duration = Milliseconds;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        Milliseconds(self.0.saturating_sub(earlier.0))
    }
}

/// Host clock measuring uptime from its own creation.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Starts a clock at uptime zero.
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource<Uptime> for StdClock {
    fn now(&self) -> Uptime {
        let elapsed = self.origin.elapsed().as_millis();
        Uptime(u64::try_from(elapsed).unwrap_or(u64::MAX))
    }
}
