//! Button/LED mode controller.
//!
//! Provides [`ModeController`], the finite-state machine that runs once per
//! tick: it services the current [`Mode`], consumes pending button presses in
//! [`Button::ALL`] order, and commits the next mode.
//!
//! Frequency presses change the action frequency unconditionally. Range
//! checking happens only in [`Mode::AwakeEntry`] and [`Mode::AwakeRun`], which
//! is what turns a press past either bound into [`Mode::Error`].

use heapless::HistoryBuf;

use crate::board::{Board, LedBank};
use crate::config::ControllerConfig;
use crate::latch::ButtonLatches;
use crate::status::StatusCell;
use crate::time::{TimeInstant, TimeSource};
use crate::toggle::{PairedToggle, ToggleTracker};
use crate::types::{Button, Led, Mode, Transition};

/// Number of transitions kept by [`ModeController::transitions`].
pub const TRANSITION_HISTORY: usize = 8;

/// Fatal errors. Only [`Mode::Init`] can produce one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartupError<E> {
    /// [`Board::configure`] failed.
    Configuration(E),
}

impl<E: core::fmt::Debug> core::fmt::Display for StartupError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StartupError::Configuration(err) => {
                write!(f, "hardware configuration failed: {:?}", err)
            }
        }
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug> std::error::Error for StartupError<E> {}

/// Drives the heartbeat, action, buzzer and error LEDs from button presses.
///
/// All state the lab firmware kept in globals lives here and is mutated only
/// by [`tick`](Self::tick). The only state shared with other contexts is the
/// [`ButtonLatches`] (written by interrupts) and the optional [`StatusCell`]
/// (read by observers).
///
/// # Type Parameters
/// * `'a` - Lifetime of the time source, latches and status references
/// * `I` - Time instant type
/// * `B` - Board implementation type
/// * `T` - Time source implementation type
pub struct ModeController<'a, I: TimeInstant, B: Board, T: TimeSource<I>> {
    leds: LedBank<B>,
    time_source: &'a T,
    latches: &'a ButtonLatches,
    status: Option<&'a StatusCell>,
    config: ControllerConfig,
    mode: Mode,
    freq_hz: i32,
    heartbeat: ToggleTracker<I>,
    action: PairedToggle<I>,
    armed: [bool; 4],
    transitions: HistoryBuf<Transition<I>, TRANSITION_HISTORY>,
}

impl<'a, I: TimeInstant, B: Board, T: TimeSource<I>> ModeController<'a, I, B, T> {
    /// Creates a controller in [`Mode::Init`]. The board is not touched until
    /// the first tick.
    pub fn new(
        board: B,
        time_source: &'a T,
        latches: &'a ButtonLatches,
        config: ControllerConfig,
    ) -> Self {
        let now = time_source.now();

        Self {
            leds: LedBank::new(board),
            time_source,
            latches,
            status: None,
            config,
            mode: Mode::Init,
            freq_hz: config.default_freq_hz(),
            heartbeat: ToggleTracker::new(now, true),
            action: PairedToggle::new(now, true),
            armed: [false; 4],
            transitions: HistoryBuf::new(),
        }
    }

    /// Publishes mode and frequency to `status` after every tick.
    pub fn with_status(mut self, status: &'a StatusCell) -> Self {
        status.publish(self.mode, self.freq_hz);
        self.status = Some(status);
        self
    }

    /// Runs one iteration of the state machine and returns the new mode.
    ///
    /// # Returns
    /// * `Ok(mode)` - The mode current after this tick
    /// * `Err` - Hardware configuration failed in [`Mode::Init`]; the
    ///   controller stays in `Init` and should not be ticked again
    pub fn tick(&mut self) -> Result<Mode, StartupError<B::Error>> {
        let now = self.time_source.now();

        let next = self.service(now)?;
        let next = self.handle_presses(next);
        self.commit(next, now);

        Ok(self.mode)
    }

    fn service(&mut self, now: I) -> Result<Mode, StartupError<B::Error>> {
        match self.mode {
            Mode::Init => {
                if let Err(err) = self.leds.inner_mut().configure() {
                    error!("hardware configuration failed");
                    return Err(StartupError::Configuration(err));
                }

                self.leds.force(Led::Heartbeat, self.heartbeat.illuminated());
                self.leds.force(Led::Action, self.action.primary());
                self.leds.force(Led::Buzzer, self.action.secondary());
                self.leds.force(Led::Error, false);
                self.arm_for(Mode::DefaultSetup);
                self.beat(now);

                Ok(Mode::DefaultSetup)
            }
            Mode::DefaultSetup => {
                self.arm_for(Mode::DefaultSetup);
                self.beat(now);

                self.freq_hz = self.config.default_freq_hz();
                self.action.restart(now, true);
                self.show_action_pair();
                self.leds.set(Led::Error, false);

                Ok(Mode::AwakeEntry)
            }
            Mode::AwakeEntry => {
                self.arm_for(Mode::AwakeEntry);
                self.beat(now);

                self.show_action_pair();
                self.leds.set(Led::Error, false);

                if self.config.in_range(self.freq_hz) {
                    Ok(Mode::AwakeRun)
                } else {
                    warn!("action frequency {} Hz out of range", self.freq_hz);
                    Ok(Mode::Error)
                }
            }
            Mode::AwakeRun => {
                self.arm_for(Mode::AwakeRun);
                self.beat(now);

                let Some(period_ms) = self.config.action_half_period_ms(self.freq_hz) else {
                    warn!("action frequency {} Hz out of range", self.freq_hz);
                    return Ok(Mode::Error);
                };

                if self.action.poll(now, period_ms).is_some() {
                    debug!("action and buzzer LEDs toggled");
                }
                self.show_action_pair();

                Ok(Mode::AwakeRun)
            }
            Mode::Sleep => {
                self.arm_for(Mode::Sleep);
                self.beat(now);

                self.leds.set(Led::Action, false);
                self.leds.set(Led::Buzzer, false);

                Ok(Mode::Sleep)
            }
            Mode::Error => {
                self.arm_for(Mode::Error);
                self.beat(now);

                self.leds.set(Led::Error, true);
                self.leds.set(Led::Action, false);
                self.leds.set(Led::Buzzer, false);

                Ok(Mode::Error)
            }
        }
    }

    fn handle_presses(&mut self, mut next: Mode) -> Mode {
        for button in Button::ALL {
            if !self.latches.test_and_clear(button) {
                continue;
            }
            if !self.armed[button.index()] {
                debug!("{} press ignored, interrupt disabled", button);
                continue;
            }
            next = self.on_press(button, next);
        }
        next
    }

    fn on_press(&mut self, button: Button, next: Mode) -> Mode {
        match button {
            Button::Sleep => {
                info!("sleep button pressed");
                match self.mode {
                    Mode::Sleep => Mode::AwakeEntry,
                    _ if next == Mode::Error => next,
                    _ => Mode::Sleep,
                }
            }
            Button::Reset => {
                info!("reset button pressed, restoring {} Hz", self.config.default_freq_hz());
                Mode::DefaultSetup
            }
            Button::FreqUp => {
                // never more than two steps past the range; the builder reserves that headroom
                self.freq_hz += self.config.freq_up_step_hz();
                info!("freq up button pressed, frequency is {} Hz", self.freq_hz);
                Self::recheck(next)
            }
            Button::FreqDown => {
                self.freq_hz -= self.config.freq_down_step_hz();
                info!("freq down button pressed, frequency is {} Hz", self.freq_hz);
                Self::recheck(next)
            }
        }
    }

    /// A frequency change while running goes back through the range check.
    fn recheck(next: Mode) -> Mode {
        if next == Mode::AwakeRun {
            Mode::AwakeEntry
        } else {
            next
        }
    }

    fn commit(&mut self, next: Mode, now: I) {
        if next != self.mode {
            info!("{} -> {}", self.mode, next);
            self.transitions.write(Transition {
                from: self.mode,
                to: next,
                at: now,
            });
        }
        self.mode = next;

        if let Some(status) = self.status {
            status.publish(self.mode, self.freq_hz);
        }
    }

    fn beat(&mut self, now: I) {
        if let Some(on) = self.heartbeat.poll(now, self.config.heartbeat_interval_ms()) {
            self.leds.set(Led::Heartbeat, on);
        }
    }

    fn show_action_pair(&mut self) {
        self.leds.set(Led::Action, self.action.primary());
        self.leds.set(Led::Buzzer, self.action.secondary());
    }

    fn arm_for(&mut self, mode: Mode) {
        for button in Button::ALL {
            let armed = mode.arms(button);
            if self.armed[button.index()] != armed {
                self.armed[button.index()] = armed;
                self.leds.inner_mut().set_armed(button, armed);
            }
        }
    }

    /// Returns the current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the current action frequency. May be out of range.
    pub fn freq_hz(&self) -> i32 {
        self.freq_hz
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Returns the level last driven on `led`.
    pub fn led(&self, led: Led) -> bool {
        self.leds.level(led)
    }

    /// Returns the heartbeat tracker.
    pub fn heartbeat(&self) -> &ToggleTracker<I> {
        &self.heartbeat
    }

    /// Returns the action/buzzer pair.
    pub fn action(&self) -> &PairedToggle<I> {
        &self.action
    }

    /// Returns whether presses of `button` are currently acted on.
    pub fn is_armed(&self, button: Button) -> bool {
        self.armed[button.index()]
    }

    /// Returns the most recent mode transitions, oldest first.
    pub fn transitions(&self) -> impl Iterator<Item = &Transition<I>> {
        self.transitions.oldest_ordered()
    }

    /// Returns the most recent transition, if any.
    pub fn last_transition(&self) -> Option<&Transition<I>> {
        self.transitions.recent()
    }

    /// Returns a reference to the board.
    pub fn board(&self) -> &B {
        self.leds.inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::LedOutput;
    use crate::time::Uptime;
    use core::cell::Cell;

    struct Clock(Cell<u64>);

    impl TimeSource<Uptime> for Clock {
        fn now(&self) -> Uptime {
            Uptime(self.0.get())
        }
    }

    #[derive(Default)]
    struct NullBoard {
        fail: bool,
    }

    impl LedOutput for NullBoard {
        fn set_output(&mut self, _led: Led, _on: bool) {}
    }

    impl Board for NullBoard {
        type Error = ();

        fn configure(&mut self) -> Result<(), ()> {
            if self.fail { Err(()) } else { Ok(()) }
        }
    }

    #[test]
    fn boots_into_awake_run_in_three_ticks() {
        let clock = Clock(Cell::new(0));
        let latches = ButtonLatches::new();
        let mut controller =
            ModeController::new(NullBoard::default(), &clock, &latches, ControllerConfig::default());

        assert_eq!(controller.tick(), Ok(Mode::DefaultSetup));
        assert_eq!(controller.tick(), Ok(Mode::AwakeEntry));
        assert_eq!(controller.tick(), Ok(Mode::AwakeRun));
        assert_eq!(controller.freq_hz(), 2);
        assert_eq!(controller.transitions().count(), 3);
    }

    #[test]
    fn configuration_failure_is_fatal() {
        let clock = Clock(Cell::new(0));
        let latches = ButtonLatches::new();
        let mut controller = ModeController::new(
            NullBoard { fail: true },
            &clock,
            &latches,
            ControllerConfig::default(),
        );

        assert_eq!(controller.tick(), Err(StartupError::Configuration(())));
        assert_eq!(controller.mode(), Mode::Init);
        assert!(controller.last_transition().is_none());
    }

    #[test]
    fn recheck_only_redirects_running_mode() {
        type C<'a> = ModeController<'a, Uptime, NullBoard, Clock>;
        assert_eq!(C::recheck(Mode::AwakeRun), Mode::AwakeEntry);
        assert_eq!(C::recheck(Mode::Sleep), Mode::Sleep);
        assert_eq!(C::recheck(Mode::DefaultSetup), Mode::DefaultSetup);
        assert_eq!(C::recheck(Mode::Error), Mode::Error);
    }
}
