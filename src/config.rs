//! Tuning constants for battery-presence sensing.
//!
//! The debounce interval and the meaning of the sense-pin level depend on
//! the board's battery connector and pull-up network. They are collected in
//! [`SenseConfig`] so firmware can adjust them without touching the
//! interrupt path.

use embassy_time::Duration;

/// Default debounce interval in milliseconds.
///
/// Battery contacts bounce for a few milliseconds on insertion and removal.
/// 50 ms swallows the bounce while still tracking deliberate swaps.
pub const DEFAULT_DEBOUNCE_MS: u64 = 50;

/// Which sense-pin level means "battery installed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Pin reads high while a battery is installed
    ActiveHigh,
    /// Pin reads low while a battery is installed
    ActiveLow,
}

impl Polarity {
    /// Maps a raw pin level onto battery presence.
    pub const fn is_present(self, pin_high: bool) -> bool {
        match self {
            Polarity::ActiveHigh => pin_high,
            Polarity::ActiveLow => !pin_high,
        }
    }
}

/// Edge set the sense interrupt is armed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    /// Rising edges only
    Rising,
    /// Falling edges only
    Falling,
    /// Both rising and falling edges
    Both,
}

impl Trigger {
    /// True if rising edges should raise the interrupt.
    pub const fn rising(self) -> bool {
        matches!(self, Trigger::Rising | Trigger::Both)
    }

    /// True if falling edges should raise the interrupt.
    pub const fn falling(self) -> bool {
        matches!(self, Trigger::Falling | Trigger::Both)
    }
}

/// Battery-sense configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SenseConfig {
    /// Minimum spacing between two accepted presence transitions
    pub debounce: Duration,
    /// Pin level that indicates a battery is installed
    pub polarity: Polarity,
    /// Edges routed to the interrupt handler
    pub trigger: Trigger,
}

impl SenseConfig {
    /// 50 ms debounce, active-high sense pin, both edges.
    pub const DEFAULT: Self = Self {
        debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        polarity: Polarity::ActiveHigh,
        trigger: Trigger::Both,
    };

    pub const fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub const fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    pub const fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }
}

impl Default for SenseConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
