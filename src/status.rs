//! Read-only view of the controller for observers in other contexts.

use core::sync::atomic::{AtomicI32, AtomicU8, Ordering};

use crate::types::Mode;

/// Mode and action frequency as last published by the controller.
///
/// Each field is a single atomic word; readers may observe a mode and a
/// frequency from different ticks.
#[derive(Debug)]
pub struct StatusCell {
    mode: AtomicU8,
    freq_hz: AtomicI32,
}

impl StatusCell {
    /// Creates a cell reporting [`Mode::Init`] and 0 Hz.
    pub const fn new() -> Self {
        Self {
            mode: AtomicU8::new(Mode::Init.as_raw()),
            freq_hz: AtomicI32::new(0),
        }
    }

    /// Current mode, or `None` if the stored byte is not a known mode.
    pub fn mode(&self) -> Option<Mode> {
        Mode::from_raw(self.mode.load(Ordering::Relaxed))
    }

    /// Current action frequency. May be outside the valid range.
    pub fn freq_hz(&self) -> i32 {
        self.freq_hz.load(Ordering::Relaxed)
    }

    pub(crate) fn publish(&self, mode: Mode, freq_hz: i32) {
        self.mode.store(mode.as_raw(), Ordering::Relaxed);
        self.freq_hz.store(freq_hz, Ordering::Relaxed);
    }
}

impl Default for StatusCell {
    fn default() -> Self {
        Self::new()
    }
}
