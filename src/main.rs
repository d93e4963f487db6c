//! Firmware for a battery-backed board reporting its power condition.
//!
//! # Overview
//!
//! This firmware tracks three things and reacts when they change:
//! - External power (BQ24195 power-good, read over I2C)
//! - Charging (BQ24195 charge status, read over I2C)
//! - Battery presence (sense pin on EXTI, debounced in the interrupt)
//!
//! # Hardware
//!
//! - **MCU**: STM32L031G6U6 (Cortex-M0+, ultra-low-power)
//! - **PMIC**: BQ24195 single-cell charger / power path on I2C1
//! - **Battery sense**: PB7, high while a cell is in the holder
//! - **RTC**: 32.768 kHz crystal for timekeeping in STOP mode
//!
//! # Low Power Operation
//!
//! - MSI oscillator at 4.194 MHz, enough to clock I2C1 at 100 kHz
//! - Embassy executor automatically enters STOP mode when idle
//! - The monitor polls every second on external power and every ten
//!   seconds on battery
//! - The sense interrupt wakes the MCU on battery insertion/removal
//!
//! # Module Organization
//!
//! - [`power`] - Sense interrupt and power monitor task
//! - [`hardware`] - Pin mappings and peripheral initialization

#![no_std]
#![no_main]

mod hardware;
mod power;

use embassy_executor::Spawner;
use embassy_stm32::{
    Config,
    rcc::{LsConfig, LseConfig, mux::ClockMux},
    time::Hertz,
};
use power_status::{MonitorConfig, PowerStatus, bq24195::Bq24195};
use {defmt_rtt as _, panic_probe as _};

use hardware::Peripherals;
use power::{BATTERY_SENSE, ExtiSense, power_monitor_task};

/// Poll cadence for the power monitor.
const MONITOR_CONFIG: MonitorConfig = MonitorConfig::DEFAULT;

/// Creates a low-power clock configuration for STM32L031.
///
/// # Clock Settings
///
/// - **MSI**: 4.194 MHz (lowest range that still drives 100 kHz I2C)
/// - **System clock**: MSI (no PLL)
/// - **LSE**: 32.768 kHz external crystal for RTC
/// - **Voltage scale**: Range 1
///
/// # Returns
///
/// Configured RCC settings for embassy-stm32 initialization
fn create_low_power_config() -> embassy_stm32::rcc::Config {
    embassy_stm32::rcc::Config {
        msi: Some(embassy_stm32::rcc::MSIRange::RANGE4M),
        hsi: false,
        hse: None,
        pll: None,
        sys: embassy_stm32::rcc::Sysclk::MSI,
        ahb_pre: embassy_stm32::rcc::AHBPrescaler::DIV1,
        apb1_pre: embassy_stm32::rcc::APBPrescaler::DIV1,
        apb2_pre: embassy_stm32::rcc::APBPrescaler::DIV1,
        ls: LsConfig {
            rtc: embassy_stm32::rcc::RtcClockSource::LSE,
            lsi: false,
            lse: Some(LseConfig {
                frequency: Hertz::hz(32768),
                mode: embassy_stm32::rcc::LseMode::Oscillator(embassy_stm32::rcc::LseDrive::Low),
            }),
        },
        voltage_scale: embassy_stm32::rcc::VoltageScale::RANGE1,
        mux: ClockMux::default(),
    }
}

/// Main entry point.
///
/// # Initialization Sequence
///
/// 1. Configure clocks
/// 2. Initialize STM32 peripherals
/// 3. Build the power status around the BQ24195 and the sense pin
/// 4. Arm the sense filter and attach the EXTI interrupt
/// 5. Spawn the power monitor task
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let mut config = Config::default();
    config.rcc = create_low_power_config();

    let p = embassy_stm32::init(config);

    #[cfg(feature = "debug-mode")]
    defmt::info!("Power status firmware starting...");

    let peripherals = Peripherals::new(p);

    let mut status = PowerStatus::new(
        &BATTERY_SENSE,
        Bq24195::new(peripherals.pmic_i2c),
        ExtiSense::new(peripherals.bat_sense),
    );

    #[cfg(feature = "debug-mode")]
    defmt::info!("Attaching battery sense interrupt...");

    status.setup();

    #[cfg(feature = "debug-mode")]
    defmt::info!("Spawning power monitor task...");

    spawner
        .spawn(power_monitor_task(status, MONITOR_CONFIG))
        .unwrap();
}
