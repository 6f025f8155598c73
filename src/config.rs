//! Controller timing and frequency configuration.

/// Heartbeat half-period in milliseconds.
pub const HEARTBEAT_INTERVAL_MS: u64 = 500;

/// Action frequency applied at startup and on reset.
pub const DEFAULT_FREQ_HZ: i32 = 2;

/// Lowest valid action frequency.
pub const MIN_FREQ_HZ: i32 = 1;

/// Highest valid action frequency.
pub const MAX_FREQ_HZ: i32 = 5;

/// Change applied by one FreqUp or FreqDown press.
pub const FREQ_STEP_HZ: i32 = 1;

/// Sleep between polling loop iterations.
pub const TICK_INTERVAL_MS: u32 = 10;

const MS_PER_HZ: u64 = 1000;

/// Validated controller configuration.
///
/// The defaults reproduce the lab firmware: 500 ms heartbeat, 2 Hz action
/// LEDs, valid range 1-5 Hz, 1 Hz per button press, 10 ms tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerConfig {
    heartbeat_interval_ms: u64,
    default_freq_hz: i32,
    min_freq_hz: i32,
    max_freq_hz: i32,
    freq_up_step_hz: i32,
    freq_down_step_hz: i32,
    tick_interval_ms: u32,
}

impl ControllerConfig {
    /// Creates a builder starting from the default configuration.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Heartbeat half-period.
    pub const fn heartbeat_interval_ms(&self) -> u64 {
        self.heartbeat_interval_ms
    }

    /// Frequency applied in [`Mode::DefaultSetup`](crate::Mode::DefaultSetup).
    pub const fn default_freq_hz(&self) -> i32 {
        self.default_freq_hz
    }

    /// Lower bound of the valid range (inclusive).
    pub const fn min_freq_hz(&self) -> i32 {
        self.min_freq_hz
    }

    /// Upper bound of the valid range (inclusive).
    pub const fn max_freq_hz(&self) -> i32 {
        self.max_freq_hz
    }

    /// Increment applied by FreqUp.
    pub const fn freq_up_step_hz(&self) -> i32 {
        self.freq_up_step_hz
    }

    /// Decrement applied by FreqDown.
    pub const fn freq_down_step_hz(&self) -> i32 {
        self.freq_down_step_hz
    }

    /// Polling loop sleep.
    pub const fn tick_interval_ms(&self) -> u32 {
        self.tick_interval_ms
    }

    /// Whether `freq_hz` lies in `[min, max]`.
    pub const fn in_range(&self, freq_hz: i32) -> bool {
        freq_hz >= self.min_freq_hz && freq_hz <= self.max_freq_hz
    }

    /// Half-period of the action LEDs at `freq_hz`, `1000 / (2 * freq_hz)` ms.
    ///
    /// Returns `None` when `freq_hz` is out of range.
    pub const fn action_half_period_ms(&self, freq_hz: i32) -> Option<u64> {
        if !self.in_range(freq_hz) {
            return None;
        }
        Some(MS_PER_HZ / (2 * freq_hz as u64))
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_ms: HEARTBEAT_INTERVAL_MS,
            default_freq_hz: DEFAULT_FREQ_HZ,
            min_freq_hz: MIN_FREQ_HZ,
            max_freq_hz: MAX_FREQ_HZ,
            freq_up_step_hz: FREQ_STEP_HZ,
            freq_down_step_hz: FREQ_STEP_HZ,
            tick_interval_ms: TICK_INTERVAL_MS,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Heartbeat interval of zero.
    ZeroHeartbeatInterval,

    /// Tick interval of zero.
    ZeroTickInterval,

    /// A frequency step of zero or less.
    NonPositiveFrequencyStep,

    /// Minimum frequency below 1 Hz.
    NonPositiveMinimum,

    /// Minimum above maximum.
    EmptyFrequencyRange,

    /// Two frequency steps past either end of the range do not fit in an `i32`.
    FrequencyOverflow,

    /// Default frequency outside `[min, max]`.
    DefaultOutOfRange,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroHeartbeatInterval => {
                write!(f, "heartbeat interval must be non-zero")
            }
            ConfigError::ZeroTickInterval => {
                write!(f, "tick interval must be non-zero")
            }
            ConfigError::NonPositiveFrequencyStep => {
                write!(f, "frequency steps must be at least 1 Hz")
            }
            ConfigError::NonPositiveMinimum => {
                write!(f, "minimum frequency must be at least 1 Hz")
            }
            ConfigError::EmptyFrequencyRange => {
                write!(f, "minimum frequency exceeds maximum frequency")
            }
            ConfigError::FrequencyOverflow => {
                write!(f, "frequency range leaves no room for two steps past its ends")
            }
            ConfigError::DefaultOutOfRange => {
                write!(f, "default frequency lies outside the valid range")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Builder for [`ControllerConfig`].
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: ControllerConfig,
}

impl ConfigBuilder {
    /// Starts from the default configuration.
    pub fn new() -> Self {
        Self {
            config: ControllerConfig::default(),
        }
    }

    /// Sets the heartbeat half-period.
    pub fn heartbeat_interval_ms(mut self, millis: u64) -> Self {
        self.config.heartbeat_interval_ms = millis;
        self
    }

    /// Sets the frequency restored by reset.
    pub fn default_freq_hz(mut self, hz: i32) -> Self {
        self.config.default_freq_hz = hz;
        self
    }

    /// Sets the inclusive valid frequency range.
    ///
    /// The controller can step at most twice past either end before it stops
    /// accepting frequency presses, so `max + 2 * up_step` and
    /// `min - 2 * down_step` must fit in an `i32`.
    pub fn freq_range_hz(mut self, min: i32, max: i32) -> Self {
        self.config.min_freq_hz = min;
        self.config.max_freq_hz = max;
        self
    }

    /// Sets the same step for FreqUp and FreqDown.
    pub fn freq_step_hz(mut self, hz: i32) -> Self {
        self.config.freq_up_step_hz = hz;
        self.config.freq_down_step_hz = hz;
        self
    }

    /// Sets the FreqUp and FreqDown steps independently.
    pub fn freq_steps_hz(mut self, up: i32, down: i32) -> Self {
        self.config.freq_up_step_hz = up;
        self.config.freq_down_step_hz = down;
        self
    }

    /// Sets the polling loop sleep.
    pub fn tick_interval_ms(mut self, millis: u32) -> Self {
        self.config.tick_interval_ms = millis;
        self
    }

    /// Validates and builds the configuration.
    pub fn build(self) -> Result<ControllerConfig, ConfigError> {
        let c = self.config;

        if c.heartbeat_interval_ms == 0 {
            return Err(ConfigError::ZeroHeartbeatInterval);
        }
        if c.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if c.freq_up_step_hz <= 0 || c.freq_down_step_hz <= 0 {
            return Err(ConfigError::NonPositiveFrequencyStep);
        }
        if c.min_freq_hz < 1 {
            return Err(ConfigError::NonPositiveMinimum);
        }
        if c.min_freq_hz > c.max_freq_hz {
            return Err(ConfigError::EmptyFrequencyRange);
        }
        let top = c.freq_up_step_hz.checked_mul(2).and_then(|s| c.max_freq_hz.checked_add(s));
        let bottom = c.freq_down_step_hz.checked_mul(2).and_then(|s| c.min_freq_hz.checked_sub(s));
        if top.is_none() || bottom.is_none() {
            return Err(ConfigError::FrequencyOverflow);
        }
        if !c.in_range(c.default_freq_hz) {
            return Err(ConfigError::DefaultOutOfRange);
        }

        Ok(c)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
