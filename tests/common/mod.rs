//! Shared test infrastructure for gpio-lab integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::Cell;

use gpio_lab::{
    Board, Button, ButtonLatches, ControllerConfig, Led, LedOutput, Mode, ModeController,
    TimeSource, Uptime,
};

/// Tick interval used by every helper, matching the firmware default.
pub const TICK_MS: u64 = 10;

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockClock {
    now_ms: Cell<u64>,
}

impl MockClock {
    pub fn new() -> Self {
        Self { now_ms: Cell::new(0) }
    }

    /// Advance time by the given number of milliseconds
    pub fn advance(&self, millis: u64) {
        self.now_ms.set(self.now_ms.get() + millis);
    }

    pub fn set(&self, millis: u64) {
        self.now_ms.set(millis);
    }

    pub fn millis(&self) -> u64 {
        self.now_ms.get()
    }
}

impl TimeSource<Uptime> for MockClock {
    fn now(&self) -> Uptime {
        Uptime(self.now_ms.get())
    }
}

// ============================================================================
// Mock Board
// ============================================================================

/// Mock board that records LED writes and interrupt arming
pub struct MockBoard {
    levels: [bool; 4],
    changes: [u32; 4],
    armed: [bool; 4],
    history: heapless::Vec<(Led, bool), 64>,
    configure_calls: u32,
    fail_configure: bool,
}

/// Error reported by a failing [`MockBoard`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortNotReady;

impl MockBoard {
    pub fn new() -> Self {
        Self {
            levels: [false; 4],
            changes: [0; 4],
            armed: [false; 4],
            history: heapless::Vec::new(),
            configure_calls: 0,
            fail_configure: false,
        }
    }

    /// A board whose configuration always fails
    pub fn failing() -> Self {
        Self {
            fail_configure: true,
            ..Self::new()
        }
    }

    pub fn level(&self, led: Led) -> bool {
        self.levels[led_index(led)]
    }

    /// Number of writes that changed the level of `led`
    pub fn changes(&self, led: Led) -> u32 {
        self.changes[led_index(led)]
    }

    pub fn is_armed(&self, button: Button) -> bool {
        self.armed[button_index(button)]
    }

    /// First writes made to the board, in order
    pub fn history(&self) -> &[(Led, bool)] {
        &self.history
    }

    pub fn configure_calls(&self) -> u32 {
        self.configure_calls
    }
}

impl LedOutput for MockBoard {
    fn set_output(&mut self, led: Led, on: bool) {
        let i = led_index(led);
        if self.levels[i] != on {
            self.changes[i] += 1;
        }
        self.levels[i] = on;
        let _ = self.history.push((led, on));
    }
}

impl Board for MockBoard {
    type Error = PortNotReady;

    fn configure(&mut self) -> Result<(), Self::Error> {
        self.configure_calls += 1;
        if self.fail_configure {
            Err(PortNotReady)
        } else {
            Ok(())
        }
    }

    fn set_armed(&mut self, button: Button, armed: bool) {
        self.armed[button_index(button)] = armed;
    }
}

fn led_index(led: Led) -> usize {
    Led::ALL.iter().position(|l| *l == led).unwrap()
}

fn button_index(button: Button) -> usize {
    Button::ALL.iter().position(|b| *b == button).unwrap()
}

// ============================================================================
// Controller helpers
// ============================================================================

pub type TestController<'a> = ModeController<'a, Uptime, MockBoard, MockClock>;

pub fn controller<'a>(clock: &'a MockClock, latches: &'a ButtonLatches) -> TestController<'a> {
    ModeController::new(MockBoard::new(), clock, latches, ControllerConfig::default())
}

/// Tick once, then let one tick interval pass
pub fn step(controller: &mut TestController<'_>, clock: &MockClock) -> Mode {
    let mode = controller.tick().unwrap();
    clock.advance(TICK_MS);
    mode
}

/// Tick through Init, DefaultSetup and AwakeEntry
pub fn boot(controller: &mut TestController<'_>, clock: &MockClock) {
    for _ in 0..3 {
        step(controller, clock);
    }
    assert_eq!(controller.mode(), Mode::AwakeRun);
}

/// Keep ticking for `millis` milliseconds of simulated time
pub fn run_for(controller: &mut TestController<'_>, clock: &MockClock, millis: u64) {
    for _ in 0..millis / TICK_MS {
        step(controller, clock);
    }
}

/// Simulate a button press and let the loop settle for `settle_ms`
pub fn press(
    controller: &mut TestController<'_>,
    clock: &MockClock,
    latches: &ButtonLatches,
    button: Button,
    settle_ms: u64,
) {
    latches.set(button);
    run_for(controller, clock, settle_ms);
}
