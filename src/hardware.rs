//! Hardware abstraction and peripheral initialization.
//!
//! This module defines the pin mappings and peripheral initialization
//! for the power-status board.
//!
//! # Pin Assignments
//!
//! ## Battery Sense
//! - **PB7**: BAT_SENSE - High while a battery is in the holder (EXTI line 7)
//!
//! ## PMIC (BQ24195, I2C1)
//! - **PA9**: I2C1_SCL
//! - **PA10**: I2C1_SDA
//!
//! ## Low Power & RTC
//! - **PC14**: OSC32_IN - 32.768 kHz crystal input
//! - **PC15**: OSC32_OUT - 32.768 kHz crystal output
//!
//! ## Debug (SWD)
//! - **PA13**: SWDIO
//! - **PA14**: SWCLK

use embassy_stm32::{
    gpio::{Input, Pull},
    i2c::{self, I2c},
    mode::Blocking,
    time::Hertz,
};

/// Pin number of BAT_SENSE within GPIOB, also its EXTI line.
pub const BAT_SENSE_PIN: usize = 7;

/// SYSCFG EXTICR port index for GPIOB.
pub const BAT_SENSE_PORT: u8 = 1;

/// I2C1 bus speed for the PMIC.
const PMIC_I2C_HZ: u32 = 100_000;

/// Top-level peripheral container for the power-status board.
pub struct Peripherals {
    /// Battery sense input (PB7, pulled down so an empty holder reads low)
    pub bat_sense: Input<'static>,
    /// Blocking I2C bus to the PMIC
    pub pmic_i2c: I2c<'static, Blocking>,
}

impl Peripherals {
    /// Initializes all peripherals from STM32 peripheral singleton.
    ///
    /// # Arguments
    ///
    /// * `p` - STM32 peripheral singleton from embassy_stm32::init()
    pub fn new(p: embassy_stm32::Peripherals) -> Self {
        let mut i2c_config = i2c::Config::default();
        i2c_config.frequency = Hertz::hz(PMIC_I2C_HZ);

        Self {
            bat_sense: Input::new(p.PB7, Pull::Down),
            pmic_i2c: I2c::new_blocking(p.I2C1, p.PA9, p.PA10, i2c_config),
        }
    }
}
