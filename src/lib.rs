#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`ModeController`**: The state machine; call `tick()` once per loop iteration
//! - **`Mode`**: `Init`, `DefaultSetup`, `AwakeEntry`, `AwakeRun`, `Sleep` or `Error`
//! - **`ButtonLatches`**: One `EventLatch` per `Button`, set from interrupt context
//! - **`ToggleTracker`** / **`PairedToggle`**: Decide when an LED (or an out-of-phase pair) flips
//! - **`Board`** / **`LedOutput`**: Traits to implement for your hardware (or use `GpioBoard`)
//! - **`TimeSource`**: Trait to implement for your timing system
//! - **`ControllerConfig`**: Heartbeat interval, frequency range and steps, tick interval
//! - **`PollingLoop`**: Ticks a controller forever with a fixed sleep
//! - **`StatusCell`**: Lock-free view of mode and frequency for observers
//!
//! Button presses only raise flags; everything else happens inside `tick()`.
//! A FreqUp or FreqDown press changes the frequency without clamping, and the
//! next range check moves the controller to `Error` if it left `[min, max]`.
//! Reset is the only way out of `Error`.

#[macro_use]
mod fmt;

pub mod board;
pub mod config;
pub mod controller;
pub mod driver;
pub mod latch;
pub mod status;
pub mod time;
pub mod toggle;
pub mod types;

pub use board::{Board, GpioBoard, LedBank, LedOutput};
pub use config::{ConfigBuilder, ConfigError, ControllerConfig};
pub use controller::{ModeController, StartupError, TRANSITION_HISTORY};
pub use driver::PollingLoop;
#[cfg(feature = "std")]
pub use driver::StdDelay;
pub use latch::{ButtonLatches, EventLatch};
pub use status::StatusCell;
#[cfg(feature = "std")]
pub use time::StdClock;
pub use time::{Milliseconds, TimeDuration, TimeInstant, TimeSource, Uptime};
pub use toggle::{PairedToggle, ToggleTracker};
pub use types::{Button, Led, Mode, Transition};
