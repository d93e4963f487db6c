//! Collaborator interfaces for [`PowerStatus`](crate::PowerStatus).

use crate::config::Trigger;

/// Power-management IC queries.
///
/// Both calls are blocking bus transactions. Call them from the main loop
/// only, never from an interrupt or timer callback. Implementations decide
/// what a failed transaction reports. [`Bq24195`](crate::bq24195::Bq24195)
/// reports `false`.
pub trait Pmic {
    /// True while USB, a dedicated charger or auxiliary input powers the device.
    fn is_power_good(&mut self) -> bool;

    /// True while a charge cycle is in progress.
    fn is_charging(&mut self) -> bool;
}

impl<T: Pmic + ?Sized> Pmic for &mut T {
    fn is_power_good(&mut self) -> bool {
        T::is_power_good(self)
    }

    fn is_charging(&mut self) -> bool {
        T::is_charging(self)
    }
}

/// Platform hook that routes sense-pin edges to
/// [`BatterySense::interrupt_handler`](crate::BatterySense::interrupt_handler).
///
/// A registration failure is fatal for the platform, so there is no error
/// path here.
pub trait SenseInterrupt {
    /// Configure and unmask the sense-pin interrupt for `trigger`.
    fn enable(&mut self, trigger: Trigger);
}
