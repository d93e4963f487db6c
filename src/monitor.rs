//! Power transition tracking for the main control loop.
//!
//! The control loop polls [`PowerStatus::snapshot`](crate::PowerStatus::snapshot)
//! at its own cadence and feeds the result to [`PowerMonitor`], which
//! reports what changed since the previous poll.

use embassy_time::Duration;
use heapless::Vec;

/// Maximum events a single update can produce (one per tracked value)
pub const MAX_EVENTS: usize = 3;

/// One reading of every power value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerSnapshot {
    pub has_power: bool,
    pub is_charging: bool,
    pub has_battery: bool,
}

/// A change between two consecutive snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerEvent {
    /// External power went away, running on battery
    PowerLost,
    /// External power came back
    PowerRestored,
    /// Charge cycle started
    ChargingStarted,
    /// Charge cycle ended (full, fault or power lost)
    ChargingStopped,
    /// Battery removed
    BatteryRemoved,
    /// Battery inserted
    BatteryInserted,
}

pub type PowerEvents = Vec<PowerEvent, MAX_EVENTS>;

/// Diffs consecutive snapshots into [`PowerEvent`]s.
#[derive(Debug, Default)]
pub struct PowerMonitor {
    last: Option<PowerSnapshot>,
}

impl PowerMonitor {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Last snapshot passed to [`update`](Self::update).
    pub fn last(&self) -> Option<PowerSnapshot> {
        self.last
    }

    /// Records `snapshot` and returns what changed since the previous one.
    ///
    /// The first update only establishes a baseline and reports nothing.
    pub fn update(&mut self, snapshot: PowerSnapshot) -> PowerEvents {
        let mut events = PowerEvents::new();

        if let Some(prev) = self.last.replace(snapshot) {
            // At most one event per field, capacity is never exceeded
            if prev.has_power != snapshot.has_power {
                let _ = events.push(if snapshot.has_power {
                    PowerEvent::PowerRestored
                } else {
                    PowerEvent::PowerLost
                });
            }
            if prev.is_charging != snapshot.is_charging {
                let _ = events.push(if snapshot.is_charging {
                    PowerEvent::ChargingStarted
                } else {
                    PowerEvent::ChargingStopped
                });
            }
            if prev.has_battery != snapshot.has_battery {
                let _ = events.push(if snapshot.has_battery {
                    PowerEvent::BatteryInserted
                } else {
                    PowerEvent::BatteryRemoved
                });
            }
        }

        events
    }
}

/// Main-loop poll cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorConfig {
    /// Interval while external power is present
    pub powered_interval: Duration,
    /// Interval while running on battery
    pub battery_interval: Duration,
}

impl MonitorConfig {
    pub const DEFAULT: Self = Self {
        powered_interval: Duration::from_secs(1),
        battery_interval: Duration::from_secs(10),
    };

    /// Chooses the delay before the next poll. Polling slows down on battery.
    pub fn poll_interval(&self, snapshot: &PowerSnapshot) -> Duration {
        if snapshot.has_power {
            self.powered_interval
        } else {
            self.battery_interval
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
