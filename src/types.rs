//! Core types shared by the controller, latches and board.

/// Operating mode of the controller.
///
/// Exactly one mode is current at any time. Transitions are evaluated once
/// per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Mode {
    /// Configure hardware and drive initial LED levels.
    Init = 0,

    /// Restore the default frequency and LED levels.
    DefaultSetup = 1,

    /// Re-arm buttons, restore action LEDs and check the frequency range.
    AwakeEntry = 2,

    /// Blink the action and buzzer LEDs.
    AwakeRun = 3,

    /// Action and buzzer LEDs off; only Sleep and Reset are armed.
    Sleep = 4,

    /// Frequency out of range; only Reset is armed.
    Error = 5,
}

impl Mode {
    /// All modes in encoding order.
    pub const ALL: [Mode; 6] = [
        Mode::Init,
        Mode::DefaultSetup,
        Mode::AwakeEntry,
        Mode::AwakeRun,
        Mode::Sleep,
        Mode::Error,
    ];

    /// Stable one-byte encoding used by [`StatusCell`](crate::StatusCell).
    #[inline]
    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    /// Decodes a raw mode byte. Values outside the enumeration yield `None`.
    pub const fn from_raw(raw: u8) -> Option<Mode> {
        match raw {
            0 => Some(Mode::Init),
            1 => Some(Mode::DefaultSetup),
            2 => Some(Mode::AwakeEntry),
            3 => Some(Mode::AwakeRun),
            4 => Some(Mode::Sleep),
            5 => Some(Mode::Error),
            _ => None,
        }
    }

    /// Whether `button` has its interrupt enabled while in this mode.
    pub const fn arms(self, button: Button) -> bool {
        match self {
            Mode::Init => false,
            Mode::DefaultSetup | Mode::AwakeEntry | Mode::AwakeRun => true,
            Mode::Sleep => matches!(button, Button::Sleep | Button::Reset),
            Mode::Error => matches!(button, Button::Reset),
        }
    }
}

impl core::fmt::Display for Mode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Mode::Init => "init",
            Mode::DefaultSetup => "default-setup",
            Mode::AwakeEntry => "awake-entry",
            Mode::AwakeRun => "awake-run",
            Mode::Sleep => "sleep",
            Mode::Error => "error",
        };
        f.write_str(name)
    }
}

/// A physical push button.
///
/// Declaration order is the order in which pending presses are handled
/// within a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Toggle between sleeping and awake.
    Sleep,
    /// Restore defaults, clearing an error.
    Reset,
    /// Raise the action frequency.
    FreqUp,
    /// Lower the action frequency.
    FreqDown,
}

impl Button {
    /// All buttons in processing order.
    pub const ALL: [Button; 4] = [Button::Sleep, Button::Reset, Button::FreqUp, Button::FreqDown];

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// A controllable LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Led {
    /// Toggles in every mode to show the loop is alive.
    Heartbeat,
    /// The IV pump indicator, blinking at the action frequency.
    Action,
    /// Blinks in inverse phase with [`Led::Action`].
    Buzzer,
    /// Lit while in [`Mode::Error`].
    Error,
}

impl Led {
    /// All LEDs.
    pub const ALL: [Led; 4] = [Led::Heartbeat, Led::Action, Led::Buzzer, Led::Error];

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// A recorded mode change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<I> {
    /// Mode before the tick.
    pub from: Mode,
    /// Mode after the tick.
    pub to: Mode,
    /// Time sampled at the start of the tick.
    pub at: I,
}
