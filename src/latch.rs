//! Single-slot event latches written from interrupt context.
//!
//! An [`EventLatch`] remembers only that at least one press happened since the
//! controller last looked. Several presses between two ticks collapse into one
//! event; counting them is deliberately not supported.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::types::Button;

/// A boolean mailbox set by a notifier and cleared by the control loop.
#[derive(Debug, Default)]
pub struct EventLatch {
    pending: AtomicBool,
}

impl EventLatch {
    /// Creates a cleared latch.
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
        }
    }

    /// Records an event. Calling this repeatedly before the next
    /// [`test_and_clear`](Self::test_and_clear) has no further effect.
    #[inline]
    pub fn set(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Returns whether an event is pending and clears it.
    #[cfg(target_has_atomic = "8")]
    #[inline]
    pub fn test_and_clear(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    /// Returns whether an event is pending and clears it.
    ///
    /// Without compare-and-swap a press landing between the load and the store
    /// merges into the event being consumed.
    #[cfg(not(target_has_atomic = "8"))]
    #[inline]
    pub fn test_and_clear(&self) -> bool {
        if self.pending.load(Ordering::Acquire) {
            self.pending.store(false, Ordering::Release);
            true
        } else {
            false
        }
    }

    /// Peeks without clearing.
    #[inline]
    pub fn is_set(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Drops any pending event.
    #[inline]
    pub fn clear(&self) {
        self.pending.store(false, Ordering::Release);
    }
}

/// One latch per [`Button`].
///
/// `const`-constructible so it can live in a `static` shared with interrupt
/// handlers:
///
/// ```
/// use gpio_lab::{Button, ButtonLatches};
///
/// static LATCHES: ButtonLatches = ButtonLatches::new();
///
/// // from the GPIO callback
/// LATCHES.set(Button::Sleep);
/// assert!(LATCHES.test_and_clear(Button::Sleep));
/// ```
#[derive(Debug, Default)]
pub struct ButtonLatches {
    latches: [EventLatch; 4],
}

impl ButtonLatches {
    /// Creates a set of cleared latches.
    pub const fn new() -> Self {
        Self {
            latches: [
                EventLatch::new(),
                EventLatch::new(),
                EventLatch::new(),
                EventLatch::new(),
            ],
        }
    }

    /// Latch for `button`.
    #[inline]
    pub fn latch(&self, button: Button) -> &EventLatch {
        &self.latches[button.index()]
    }

    /// Records a press of `button`.
    #[inline]
    pub fn set(&self, button: Button) {
        self.latch(button).set();
    }

    /// Returns whether `button` was pressed since the last call and clears it.
    #[inline]
    pub fn test_and_clear(&self, button: Button) -> bool {
        self.latch(button).test_and_clear()
    }

    /// Peeks at `button` without clearing.
    #[inline]
    pub fn is_set(&self, button: Button) -> bool {
        self.latch(button).is_set()
    }

    /// Drops every pending press.
    pub fn clear_all(&self) {
        for latch in &self.latches {
            latch.clear();
        }
    }
}
