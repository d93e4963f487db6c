//! Power status as seen by the main loop.

use crate::{
    monitor::PowerSnapshot,
    pmic::{Pmic, SenseInterrupt},
    sense::{BatterySense, BatteryPresence},
};

/// Reports external power, charging and battery presence.
///
/// Battery presence comes from the shared [`BatterySense`], which the
/// sense-pin interrupt keeps up to date. Power and charging are read from
/// the PMIC on every call. They take `&mut self` because they run a bus
/// transaction, which keeps them out of the interrupt's reach.
pub struct PowerStatus<'a, P, S> {
    /// Interrupt-owned presence state
    sense: &'a BatterySense,
    /// PMIC handle, queried on demand
    pmic: P,
    /// Interrupt attach hook for the sense pin
    interrupt: S,
}

impl<'a, P, S> PowerStatus<'a, P, S>
where
    P: Pmic,
    S: SenseInterrupt,
{
    /// Creates a new PowerStatus.
    ///
    /// # Arguments
    ///
    /// * `sense` - Presence state shared with the sense-pin interrupt
    /// * `pmic` - PMIC used for power-good and charge status
    /// * `interrupt` - Hook that attaches the sense-pin interrupt
    pub fn new(sense: &'a BatterySense, pmic: P, interrupt: S) -> Self {
        Self {
            sense,
            pmic,
            interrupt,
        }
    }

    /// Arms the debounce filter and attaches the sense-pin interrupt.
    ///
    /// Call once during initialization. Later calls do nothing.
    pub fn setup(&mut self) {
        if !self.sense.arm() {
            #[cfg(feature = "debug-mode")]
            defmt::warn!("PowerStatus::setup called twice");
            return;
        }

        self.interrupt.enable(self.sense.config().trigger);

        #[cfg(feature = "debug-mode")]
        defmt::info!("Battery sense armed: {}", self.sense.config());
    }

    /// True if powered by USB, a dedicated charger or auxiliary input.
    ///
    /// Blocking I2C read. Not interrupt or timer safe.
    pub fn has_power(&mut self) -> bool {
        self.pmic.is_power_good()
    }

    /// True if the battery is currently charging.
    ///
    /// Blocking I2C read. Not interrupt or timer safe.
    pub fn is_charging(&mut self) -> bool {
        self.pmic.is_charging()
    }

    /// True if a battery is installed (debounced).
    pub fn has_battery(&self) -> bool {
        self.sense.has_battery()
    }

    pub fn presence(&self) -> BatteryPresence {
        self.sense.presence()
    }

    /// Reads all three values in one pass.
    pub fn snapshot(&mut self) -> PowerSnapshot {
        PowerSnapshot {
            has_power: self.has_power(),
            is_charging: self.is_charging(),
            has_battery: self.has_battery(),
        }
    }

    /// Consumes the status and returns the PMIC and interrupt hook.
    pub fn release(self) -> (P, S) {
        (self.pmic, self.interrupt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SenseConfig, Trigger};
    use embassy_time::Instant;

    #[derive(Default)]
    struct FakePmic {
        power_good: bool,
        charging: bool,
        reads: usize,
    }

    impl Pmic for FakePmic {
        fn is_power_good(&mut self) -> bool {
            self.reads += 1;
            self.power_good
        }

        fn is_charging(&mut self) -> bool {
            self.reads += 1;
            self.charging
        }
    }

    #[derive(Default)]
    struct FakeInterrupt {
        enabled: Option<Trigger>,
        calls: usize,
    }

    impl SenseInterrupt for FakeInterrupt {
        fn enable(&mut self, trigger: Trigger) {
            self.enabled = Some(trigger);
            self.calls += 1;
        }
    }

    #[test]
    fn setup_attaches_configured_trigger() {
        let sense = BatterySense::new(SenseConfig::DEFAULT.with_trigger(Trigger::Falling));
        let mut status = PowerStatus::new(&sense, FakePmic::default(), FakeInterrupt::default());
        status.setup();

        let (_, interrupt) = status.release();
        assert_eq!(interrupt.enabled, Some(Trigger::Falling));
        assert!(sense.is_armed());
    }

    #[test]
    fn second_setup_is_noop() {
        let sense = BatterySense::default();
        let mut status = PowerStatus::new(&sense, FakePmic::default(), FakeInterrupt::default());
        status.setup();
        status.setup();

        let (_, interrupt) = status.release();
        assert_eq!(interrupt.calls, 1);
    }

    #[test]
    fn battery_present_before_setup() {
        let sense = BatterySense::default();
        let status = PowerStatus::new(&sense, FakePmic::default(), FakeInterrupt::default());
        sense.on_edge(false, Instant::from_millis(0));
        assert!(status.has_battery());
        assert_eq!(status.presence(), BatteryPresence::Present);
    }

    #[test]
    fn has_battery_tracks_sense() {
        let sense = BatterySense::default();
        let mut status = PowerStatus::new(&sense, FakePmic::default(), FakeInterrupt::default());
        status.setup();
        sense.on_edge(false, Instant::from_millis(0));
        assert!(!status.has_battery());
    }

    #[test]
    fn queries_pass_through_without_caching() {
        let sense = BatterySense::default();
        let pmic = FakePmic {
            power_good: true,
            charging: false,
            reads: 0,
        };
        let mut status = PowerStatus::new(&sense, pmic, FakeInterrupt::default());

        assert!(status.has_power());
        assert!(!status.is_charging());
        assert!(status.has_power());

        let (pmic, _) = status.release();
        assert_eq!(pmic.reads, 3);
    }

    #[test]
    fn snapshot_reads_everything() {
        let sense = BatterySense::default();
        let pmic = FakePmic {
            power_good: true,
            charging: true,
            reads: 0,
        };
        let mut status = PowerStatus::new(&sense, pmic, FakeInterrupt::default());
        assert_eq!(
            status.snapshot(),
            PowerSnapshot {
                has_power: true,
                is_charging: true,
                has_battery: true,
            }
        );
    }
}
