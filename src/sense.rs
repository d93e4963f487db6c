//! Interrupt-safe battery-presence state.
//!
//! [`BatterySense`] is the half of the power status that the sense-pin
//! interrupt touches. It holds nothing but atomics, so it can live in a
//! `static` and be shared between the interrupt vector and the main loop
//! without a lock.
//!
//! # Debounce
//!
//! Battery contacts bounce. A single insertion can produce a burst of
//! edges within a few milliseconds. The filter accepts an edge only if at
//! least [`SenseConfig::debounce`] has passed since the previously accepted
//! edge, and then recomputes presence from the pin level itself:
//!
//! ```text
//! edge ─► armed? ─no─► drop
//!           │yes
//!           ▼
//!   now - last_change < debounce? ─yes─► drop
//!           │no
//!           ▼
//!   has_battery = polarity(pin), last_change = now
//! ```
//!
//! The interrupt handler is the only writer. The main loop only reads
//! `has_battery`.

use embassy_time::Instant;
use portable_atomic::{AtomicBool, AtomicU64, Ordering};

use crate::config::SenseConfig;

/// Sentinel stored in `last_change` until the first edge is accepted.
const NEVER: u64 = u64::MAX;

/// Battery presence state
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BatteryPresence {
    /// Battery installed (assumed until the first edge says otherwise)
    #[default]
    Present,
    /// Battery removed
    Absent,
}

impl From<bool> for BatteryPresence {
    fn from(value: bool) -> Self {
        match value {
            true => BatteryPresence::Present,
            false => BatteryPresence::Absent,
        }
    }
}

impl From<BatteryPresence> for bool {
    fn from(value: BatteryPresence) -> Self {
        value == BatteryPresence::Present
    }
}

/// Debounced battery-presence flag fed by the sense-pin interrupt.
pub struct BatterySense {
    config: SenseConfig,
    /// Set once the interrupt has been attached
    armed: AtomicBool,
    has_battery: AtomicBool,
    /// Tick count of the last accepted edge, or `NEVER`
    last_change: AtomicU64,
}

impl BatterySense {
    /// Creates the sense state with a battery assumed present.
    pub const fn new(config: SenseConfig) -> Self {
        Self {
            config,
            armed: AtomicBool::new(false),
            has_battery: AtomicBool::new(true),
            last_change: AtomicU64::new(NEVER),
        }
    }

    pub const fn config(&self) -> &SenseConfig {
        &self.config
    }

    /// Starts accepting edges. Returns `false` if already armed.
    pub(crate) fn arm(&self) -> bool {
        !self.armed.swap(true, Ordering::AcqRel)
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Sense-pin interrupt handler.
    ///
    /// Call this from the EXTI vector with the pin level sampled inside the
    /// handler. Never blocks and never touches the I2C bus.
    pub fn interrupt_handler(&self, pin_high: bool) {
        self.on_edge(pin_high, Instant::now());
    }

    /// Runs the debounce filter for an edge observed at `now`.
    ///
    /// Returns `true` if the edge was accepted.
    pub fn on_edge(&self, pin_high: bool, now: Instant) -> bool {
        if !self.armed.load(Ordering::Acquire) {
            return false;
        }

        let last = self.last_change.load(Ordering::Relaxed);
        if last != NEVER {
            let elapsed = now.saturating_duration_since(Instant::from_ticks(last));
            if elapsed < self.config.debounce {
                return false;
            }
        }

        self.has_battery
            .store(self.config.polarity.is_present(pin_high), Ordering::Release);
        self.last_change.store(now.as_ticks(), Ordering::Relaxed);
        true
    }

    /// Debounced presence flag. Safe from any context.
    pub fn has_battery(&self) -> bool {
        self.has_battery.load(Ordering::Acquire)
    }

    pub fn presence(&self) -> BatteryPresence {
        self.has_battery().into()
    }
}

impl Default for BatterySense {
    fn default() -> Self {
        Self::new(SenseConfig::DEFAULT)
    }
}
