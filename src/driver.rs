//! Fixed-interval polling loop around a [`ModeController`].

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;

use crate::board::Board;
use crate::controller::{ModeController, StartupError};
use crate::time::{TimeInstant, TimeSource};

/// Ticks a controller, sleeping the configured tick interval between ticks.
///
/// Ticks that run late are not made up; the next tick simply sees a later
/// time.
pub struct PollingLoop<'a, I: TimeInstant, B: Board, T: TimeSource<I>, D: DelayNs> {
    controller: ModeController<'a, I, B, T>,
    delay: D,
    ticks: u64,
}

impl<'a, I: TimeInstant, B: Board, T: TimeSource<I>, D: DelayNs> PollingLoop<'a, I, B, T, D> {
    /// Wraps `controller`, sleeping with `delay`.
    pub fn new(controller: ModeController<'a, I, B, T>, delay: D) -> Self {
        Self {
            controller,
            delay,
            ticks: 0,
        }
    }

    /// Runs forever. Returns only if hardware configuration fails.
    pub fn run(&mut self) -> Result<Infallible, StartupError<B::Error>> {
        loop {
            self.step()?;
        }
    }

    /// Runs `ticks` iterations.
    pub fn run_for(&mut self, ticks: u32) -> Result<(), StartupError<B::Error>> {
        for _ in 0..ticks {
            self.step()?;
        }
        Ok(())
    }

    /// Runs one tick followed by one sleep.
    pub fn step(&mut self) -> Result<(), StartupError<B::Error>> {
        self.controller.tick()?;
        self.ticks = self.ticks.wrapping_add(1);
        self.delay.delay_ms(self.controller.config().tick_interval_ms());
        Ok(())
    }

    /// Returns the number of completed ticks.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Returns the controller.
    pub fn controller(&self) -> &ModeController<'a, I, B, T> {
        &self.controller
    }

    /// Unwraps the controller and delay.
    pub fn into_parts(self) -> (ModeController<'a, I, B, T>, D) {
        (self.controller, self.delay)
    }
}

/// Blocking delay backed by [`std::thread::sleep`].
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

#[cfg(feature = "std")]
impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }
}
