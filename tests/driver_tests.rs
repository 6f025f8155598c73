//! Integration tests for PollingLoop

mod common;
use common::*;

use embedded_hal::delay::DelayNs;
use gpio_lab::{
    Button, ButtonLatches, ControllerConfig, Led, Mode, ModeController, PollingLoop, StartupError,
};

/// Delay that advances a mock clock instead of sleeping
struct ClockDelay<'a> {
    clock: &'a MockClock,
    pending_ns: u64,
}

impl<'a> ClockDelay<'a> {
    fn new(clock: &'a MockClock) -> Self {
        Self {
            clock,
            pending_ns: 0,
        }
    }
}

impl DelayNs for ClockDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.pending_ns += u64::from(ns);
        self.clock.advance(self.pending_ns / 1_000_000);
        self.pending_ns %= 1_000_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.clock.advance(u64::from(ms));
    }
}

#[test]
fn loop_sleeps_one_tick_interval_per_iteration() {
    let clock = MockClock::new();
    let latches = ButtonLatches::new();
    let mut driver = PollingLoop::new(controller(&clock, &latches), ClockDelay::new(&clock));

    driver.run_for(3).unwrap();

    assert_eq!(driver.ticks(), 3);
    assert_eq!(clock.millis(), 30);
    assert_eq!(driver.controller().mode(), Mode::AwakeRun);
}

#[test]
fn loop_uses_configured_tick_interval() {
    let clock = MockClock::new();
    let latches = ButtonLatches::new();
    let config = ControllerConfig::builder().tick_interval_ms(25).build().unwrap();
    let controller = ModeController::new(MockBoard::new(), &clock, &latches, config);
    let mut driver = PollingLoop::new(controller, ClockDelay::new(&clock));

    driver.run_for(4).unwrap();

    assert_eq!(clock.millis(), 100);
}

#[test]
fn run_returns_only_on_configuration_failure() {
    let clock = MockClock::new();
    let latches = ButtonLatches::new();
    let controller =
        ModeController::new(MockBoard::failing(), &clock, &latches, ControllerConfig::default());
    let mut driver = PollingLoop::new(controller, ClockDelay::new(&clock));

    let err = driver.run().unwrap_err();

    assert_eq!(err, StartupError::Configuration(PortNotReady));
    assert_eq!(driver.ticks(), 0);
    assert_eq!(driver.controller().board().configure_calls(), 1);
}

#[test]
fn presses_between_iterations_are_handled() {
    let clock = MockClock::new();
    let latches = ButtonLatches::new();
    let mut driver = PollingLoop::new(controller(&clock, &latches), ClockDelay::new(&clock));
    driver.run_for(3).unwrap();

    latches.set(Button::Sleep);
    driver.run_for(2).unwrap();
    assert_eq!(driver.controller().mode(), Mode::Sleep);
    assert!(!driver.controller().led(Led::Action));

    latches.set(Button::Sleep);
    driver.run_for(2).unwrap();
    assert_eq!(driver.controller().mode(), Mode::AwakeRun);

    let (controller, _delay) = driver.into_parts();
    assert_eq!(controller.freq_hz(), 2);
}
