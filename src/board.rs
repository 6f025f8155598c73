//! Hardware abstraction for LEDs, button interrupts and startup configuration.
//!
//! Implement [`Board`] for your hardware, or wrap four `embedded-hal` output
//! pins in a [`GpioBoard`].

use embedded_hal::digital::OutputPin;

use crate::types::{Button, Led};

/// Trait for abstracting LED outputs.
pub trait LedOutput {
    /// Drives `led` on or off.
    ///
    /// Must be idempotent. Handle any hardware errors internally - this method
    /// cannot fail once the board is configured.
    fn set_output(&mut self, led: Led, on: bool);
}

/// The hardware the controller runs on.
pub trait Board: LedOutput {
    /// Error reported by [`configure`](Board::configure).
    type Error;

    /// Readies the peripherals. Called exactly once, from
    /// [`Mode::Init`](crate::Mode::Init). A failure is fatal.
    fn configure(&mut self) -> Result<(), Self::Error>;

    /// Enables or disables the interrupt for `button`.
    ///
    /// Boards that cannot gate interrupts can keep the default; the controller
    /// discards presses of disarmed buttons either way.
    fn set_armed(&mut self, button: Button, armed: bool) {
        let _ = (button, armed);
    }
}

/// Write-through cache in front of a [`LedOutput`].
///
/// Remembers the last level written to each LED and only forwards changes.
#[derive(Debug)]
pub struct LedBank<L> {
    output: L,
    levels: [bool; 4],
}

impl<L: LedOutput> LedBank<L> {
    /// Wraps `output`. All LEDs are assumed off until written.
    pub fn new(output: L) -> Self {
        Self {
            output,
            levels: [false; 4],
        }
    }

    /// Drives `led` to `on` if it is not already there.
    pub fn set(&mut self, led: Led, on: bool) {
        if self.levels[led.index()] != on {
            self.force(led, on);
        }
    }

    /// Drives `led` to `on` unconditionally.
    pub fn force(&mut self, led: Led, on: bool) {
        self.output.set_output(led, on);
        self.levels[led.index()] = on;
    }

    /// Last level written to `led`.
    #[inline]
    pub fn level(&self, led: Led) -> bool {
        self.levels[led.index()]
    }

    /// The wrapped output.
    pub fn inner(&self) -> &L {
        &self.output
    }

    /// The wrapped output, mutably.
    ///
    /// Writes made through this reference bypass the cache.
    pub fn inner_mut(&mut self) -> &mut L {
        &mut self.output
    }

    /// Unwraps the output.
    pub fn into_inner(self) -> L {
        self.output
    }
}

/// [`Board`] over four `embedded-hal` output pins.
///
/// Buttons are not owned here; their interrupts are registered by the
/// platform, which calls [`ButtonLatches::set`](crate::ButtonLatches::set).
pub struct GpioBoard<P> {
    heartbeat: P,
    action: P,
    buzzer: P,
    error: P,
}

impl<P: OutputPin> GpioBoard<P> {
    /// Wraps the four LED pins.
    pub fn new(heartbeat: P, action: P, buzzer: P, error: P) -> Self {
        Self {
            heartbeat,
            action,
            buzzer,
            error,
        }
    }

    fn pin(&mut self, led: Led) -> &mut P {
        match led {
            Led::Heartbeat => &mut self.heartbeat,
            Led::Action => &mut self.action,
            Led::Buzzer => &mut self.buzzer,
            Led::Error => &mut self.error,
        }
    }

    fn drive(&mut self, led: Led, on: bool) -> Result<(), P::Error> {
        let pin = self.pin(led);
        if on { pin.set_high() } else { pin.set_low() }
    }

    /// Releases the pins.
    pub fn release(self) -> (P, P, P, P) {
        (self.heartbeat, self.action, self.buzzer, self.error)
    }
}

impl<P: OutputPin> LedOutput for GpioBoard<P> {
    fn set_output(&mut self, led: Led, on: bool) {
        if self.drive(led, on).is_err() {
            warn!("failed to drive {} LED", led);
        }
    }
}

impl<P: OutputPin> Board for GpioBoard<P> {
    type Error = P::Error;

    /// Drives the power-on levels: heartbeat and action on, buzzer and error off.
    fn configure(&mut self) -> Result<(), Self::Error> {
        self.drive(Led::Heartbeat, true)?;
        self.drive(Led::Action, true)?;
        self.drive(Led::Buzzer, false)?;
        self.drive(Led::Error, false)?;
        Ok(())
    }
}
