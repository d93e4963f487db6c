//! Battery-sense interrupt wiring and the power monitor task.
//!
//! The sense pin (PB7) is routed through EXTI line 7, which shares the
//! `EXTI4_15` vector. The vector is owned here rather than by embassy's
//! EXTI driver so the handler stays a plain, bounded function: clear the
//! pending bit, sample the pin, run the debounce filter.
//!
//! The PMIC is only ever touched from [`power_monitor_task`].

use embassy_stm32::{gpio::Input, i2c::I2c, mode::Blocking, pac};
use embassy_time::Timer;
use pac::interrupt;
use power_status::{
    BatterySense, MonitorConfig, PowerMonitor, PowerStatus, SenseConfig, SenseInterrupt, Trigger,
    bq24195::Bq24195,
};

use crate::hardware::{BAT_SENSE_PIN, BAT_SENSE_PORT};

/// IMR register index for EXTI line 7 (lines 0-31 are in IMR1)
const IMR1_REG_IDX: usize = 0;

/// Battery presence shared between the EXTI vector and the main loop.
pub static BATTERY_SENSE: BatterySense = BatterySense::new(SenseConfig::DEFAULT);

pub type BoardPowerStatus = PowerStatus<'static, Bq24195<I2c<'static, Blocking>>, ExtiSense>;

/// EXTI attach hook for the battery sense pin.
///
/// Holds the configured input so the pin keeps its pull-down.
pub struct ExtiSense {
    _pin: Input<'static>,
}

impl ExtiSense {
    pub fn new(pin: Input<'static>) -> Self {
        Self { _pin: pin }
    }
}

impl SenseInterrupt for ExtiSense {
    /// Routes PB7 to EXTI line 7 and unmasks `EXTI4_15`.
    fn enable(&mut self, trigger: Trigger) {
        let exti = pac::EXTI;

        // SYSCFG owns the port mux for EXTI lines
        pac::RCC.apb2enr().modify(|w| w.set_syscfgen(true));
        pac::SYSCFG
            .exticr(BAT_SENSE_PIN / 4)
            .modify(|w| w.set_exti(BAT_SENSE_PIN % 4, BAT_SENSE_PORT));

        exti.rtsr(IMR1_REG_IDX)
            .modify(|w| w.set_line(BAT_SENSE_PIN, trigger.rising()));
        exti.ftsr(IMR1_REG_IDX)
            .modify(|w| w.set_line(BAT_SENSE_PIN, trigger.falling()));

        // Drop any edge latched before the filter was armed
        exti.pr(IMR1_REG_IDX)
            .modify(|w| w.set_line(BAT_SENSE_PIN, true));
        exti.imr(IMR1_REG_IDX)
            .modify(|w| w.set_line(BAT_SENSE_PIN, true));

        unsafe {
            cortex_m::peripheral::NVIC::unmask(embassy_stm32::interrupt::EXTI4_15);
        };
    }
}

/// Battery sense interrupt handler (EXTI lines 4-15).
///
/// # Safety
///
/// This interrupt handler accesses PAC registers directly.
#[interrupt]
fn EXTI4_15() {
    let exti = pac::EXTI;

    // Only line 7 is unmasked in this vector
    exti.pr(IMR1_REG_IDX)
        .modify(|w| w.set_line(BAT_SENSE_PIN, true));

    let pin_high = pac::GPIOB.idr().read().idr(BAT_SENSE_PIN) == pac::gpio::vals::Idr::HIGH;

    BATTERY_SENSE.interrupt_handler(pin_high);
}

/// Async task that polls power status and reacts to transitions.
///
/// Polls quickly on external power and backs off while running on
/// battery.
///
/// # Arguments
///
/// * `status` - Power status, already set up (takes ownership)
/// * `config` - Poll cadence
#[embassy_executor::task]
pub async fn power_monitor_task(mut status: BoardPowerStatus, config: MonitorConfig) {
    let mut monitor = PowerMonitor::new();

    loop {
        let snapshot = status.snapshot();

        for _event in monitor.update(snapshot) {
            #[cfg(feature = "debug-mode")]
            defmt::info!("Power event: {} ({})", _event, snapshot);
        }

        Timer::after(config.poll_interval(&snapshot)).await;
    }
}
