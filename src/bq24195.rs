//! BQ24195 charger / power-path PMIC status driver.
//!
//! Only the status side of the part is covered: power-good and charge
//! state from the system status register, plus the fault register. Charge
//! parameters stay at their power-on defaults.
//!
//! Reference: Texas Instruments BQ24195 datasheet (SLUSB97)

use embedded_hal::i2c::I2c;

use crate::pmic::Pmic;

/// 7-bit I2C address (fixed in silicon).
pub const I2C_ADDR: u8 = 0x6B;

/// REG08: System status (VBUS_STAT, CHRG_STAT, DPM_STAT, PG_STAT, THERM_STAT, VSYS_STAT).
pub const REG_SYSTEM_STATUS: u8 = 0x08;
pub const VBUS_STAT_MASK: u8 = 0b1100_0000; // <<6
pub const CHRG_STAT_MASK: u8 = 0b0011_0000; // <<4
pub const DPM_STAT: u8 = 1 << 3;
pub const PG_STAT: u8 = 1 << 2;
pub const THERM_STAT: u8 = 1 << 1;
pub const VSYS_STAT: u8 = 1 << 0;

/// REG09: Fault (WATCHDOG_FAULT, BOOST_FAULT, CHRG_FAULT, BAT_FAULT, NTC_FAULT).
pub const REG_FAULT: u8 = 0x09;
pub const WATCHDOG_FAULT: u8 = 1 << 7;
pub const BOOST_FAULT: u8 = 1 << 6;
pub const CHRG_FAULT_MASK: u8 = 0b0011_0000; // <<4
pub const BAT_FAULT: u8 = 1 << 3;
pub const NTC_FAULT_MASK: u8 = 0b0000_0111;

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Bus transaction failed
    I2c(E),
}

/// Input source detected on VBUS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VbusStatus {
    Unknown,
    UsbHost,
    Adapter,
    Otg,
}

impl From<u8> for VbusStatus {
    fn from(reg: u8) -> Self {
        match (reg & VBUS_STAT_MASK) >> 6 {
            0b01 => VbusStatus::UsbHost,
            0b10 => VbusStatus::Adapter,
            0b11 => VbusStatus::Otg,
            _ => VbusStatus::Unknown,
        }
    }
}

/// Charge cycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChargeStatus {
    NotCharging,
    PreCharge,
    FastCharging,
    Done,
}

impl ChargeStatus {
    /// True while current is flowing into the battery.
    pub fn is_charging(self) -> bool {
        matches!(self, ChargeStatus::PreCharge | ChargeStatus::FastCharging)
    }
}

impl From<u8> for ChargeStatus {
    fn from(reg: u8) -> Self {
        match (reg & CHRG_STAT_MASK) >> 4 {
            0b01 => ChargeStatus::PreCharge,
            0b10 => ChargeStatus::FastCharging,
            0b11 => ChargeStatus::Done,
            _ => ChargeStatus::NotCharging,
        }
    }
}

/// Decoded REG08
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SystemStatus {
    pub vbus: VbusStatus,
    pub charge: ChargeStatus,
    /// Input current or voltage limit is active
    pub dpm: bool,
    /// Input source is good
    pub power_good: bool,
    /// Thermal regulation is active
    pub thermal_regulation: bool,
    /// Battery below VSYSMIN
    pub vsys_regulation: bool,
}

impl From<u8> for SystemStatus {
    fn from(reg: u8) -> Self {
        Self {
            vbus: reg.into(),
            charge: reg.into(),
            dpm: reg & DPM_STAT != 0,
            power_good: reg & PG_STAT != 0,
            thermal_regulation: reg & THERM_STAT != 0,
            vsys_regulation: reg & VSYS_STAT != 0,
        }
    }
}

/// Decoded REG09
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Faults {
    pub watchdog: bool,
    pub boost: bool,
    /// CHRG_FAULT: 0 normal, 1 input fault, 2 thermal shutdown, 3 safety timer expired
    pub charge: u8,
    pub battery_ovp: bool,
    /// NTC_FAULT: 0 normal, 5 cold, 6 hot
    pub ntc: u8,
}

impl Faults {
    pub fn any(&self) -> bool {
        self.watchdog || self.boost || self.charge != 0 || self.battery_ovp || self.ntc != 0
    }
}

impl From<u8> for Faults {
    fn from(reg: u8) -> Self {
        Self {
            watchdog: reg & WATCHDOG_FAULT != 0,
            boost: reg & BOOST_FAULT != 0,
            charge: (reg & CHRG_FAULT_MASK) >> 4,
            battery_ovp: reg & BAT_FAULT != 0,
            ntc: reg & NTC_FAULT_MASK,
        }
    }
}

/// Blocking BQ24195 driver over I2C.
pub struct Bq24195<I2C> {
    i2c: I2C,
    addr: u8,
}

impl<I2C> Bq24195<I2C>
where
    I2C: I2c,
{
    /// Create with the fixed 7-bit address (0x6B).
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            addr: I2C_ADDR,
        }
    }

    /// Create with explicit address (for parts behind a translator).
    pub fn with_address(i2c: I2C, addr: u8) -> Self {
        Self { i2c, addr }
    }

    /// Consume and return the underlying I2C device.
    pub fn release(self) -> I2C {
        self.i2c
    }

    pub fn system_status(&mut self) -> Result<SystemStatus, Error<I2C::Error>> {
        Ok(self.read1(REG_SYSTEM_STATUS)?.into())
    }

    /// Read REG09. The part latches faults until this register is read, so
    /// back-to-back reads report the latched fault and then the live one.
    pub fn faults(&mut self) -> Result<Faults, Error<I2C::Error>> {
        Ok(self.read1(REG_FAULT)?.into())
    }

    fn read1(&mut self, reg: u8) -> Result<u8, Error<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.addr, &[reg], &mut buf)
            .map_err(Error::I2c)?;
        Ok(buf[0])
    }
}

impl<I2C> Pmic for Bq24195<I2C>
where
    I2C: I2c,
{
    fn is_power_good(&mut self) -> bool {
        match self.system_status() {
            Ok(status) => status.power_good,
            Err(_e) => {
                #[cfg(feature = "debug-mode")]
                defmt::warn!("BQ24195 status read failed");
                false
            }
        }
    }

    fn is_charging(&mut self) -> bool {
        match self.system_status() {
            Ok(status) => status.charge.is_charging(),
            Err(_e) => {
                #[cfg(feature = "debug-mode")]
                defmt::warn!("BQ24195 status read failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    /// Serves a fixed register file, or fails every transaction.
    struct RegisterI2c {
        regs: [u8; 0x0B],
        fail: bool,
        transactions: std::vec::Vec<(u8, u8)>,
    }

    impl RegisterI2c {
        fn with(reg: u8, value: u8) -> Self {
            let mut regs = [0u8; 0x0B];
            regs[reg as usize] = value;
            Self {
                regs,
                fail: false,
                transactions: std::vec::Vec::new(),
            }
        }

        fn failing() -> Self {
            Self {
                regs: [0u8; 0x0B],
                fail: true,
                transactions: std::vec::Vec::new(),
            }
        }
    }

    impl ErrorType for RegisterI2c {
        type Error = ErrorKind;
    }

    impl I2c for RegisterI2c {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            let mut reg = 0u8;
            for op in operations.iter_mut() {
                match op {
                    Operation::Write(data) => reg = data[0],
                    Operation::Read(buf) => {
                        buf[0] = self.regs[reg as usize];
                        self.transactions.push((address, reg));
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn decode_usb_powered_fast_charging() {
        // VBUS=USB host, CHRG=fast, PG=1
        let status = SystemStatus::from(0b0110_0100);
        assert_eq!(status.vbus, VbusStatus::UsbHost);
        assert_eq!(status.charge, ChargeStatus::FastCharging);
        assert!(status.power_good);
        assert!(!status.dpm);
        assert!(!status.thermal_regulation);
        assert!(!status.vsys_regulation);
    }

    #[test]
    fn decode_battery_only() {
        let status = SystemStatus::from(0b0000_0001);
        assert_eq!(status.vbus, VbusStatus::Unknown);
        assert_eq!(status.charge, ChargeStatus::NotCharging);
        assert!(!status.power_good);
        assert!(status.vsys_regulation);
    }

    #[test]
    fn charge_done_is_not_charging() {
        assert!(!ChargeStatus::Done.is_charging());
        assert!(!ChargeStatus::NotCharging.is_charging());
        assert!(ChargeStatus::PreCharge.is_charging());
        assert!(ChargeStatus::FastCharging.is_charging());
    }

    #[test]
    fn decode_faults() {
        let faults = Faults::from(0b1010_1110);
        assert!(faults.watchdog);
        assert!(!faults.boost);
        assert_eq!(faults.charge, 2);
        assert!(faults.battery_ovp);
        assert_eq!(faults.ntc, 6);
        assert!(faults.any());
        assert!(!Faults::from(0).any());
    }

    #[test]
    fn reads_status_register_at_fixed_address() {
        let mut pmic = Bq24195::new(RegisterI2c::with(REG_SYSTEM_STATUS, 0b1010_0100));
        let status = pmic.system_status().unwrap();
        assert_eq!(status.vbus, VbusStatus::Adapter);
        assert_eq!(status.charge, ChargeStatus::FastCharging);

        let i2c = pmic.release();
        assert_eq!(i2c.transactions.as_slice(), &[(I2C_ADDR, REG_SYSTEM_STATUS)]);
    }

    #[test]
    fn reads_fault_register() {
        let mut pmic = Bq24195::with_address(RegisterI2c::with(REG_FAULT, BAT_FAULT), 0x10);
        assert!(pmic.faults().unwrap().battery_ovp);
        let i2c = pmic.release();
        assert_eq!(i2c.transactions.as_slice(), &[(0x10, REG_FAULT)]);
    }

    #[test]
    fn pmic_queries_follow_status_register() {
        // USB powered, charge terminated
        let mut pmic = Bq24195::new(RegisterI2c::with(REG_SYSTEM_STATUS, 0b0111_0100));
        assert!(pmic.is_power_good());
        assert!(!pmic.is_charging());
    }

    #[test]
    fn bus_error_reads_as_false() {
        let mut pmic = Bq24195::new(RegisterI2c::failing());
        assert_eq!(pmic.system_status(), Err(Error::I2c(ErrorKind::Other)));
        assert!(!pmic.is_power_good());
        assert!(!pmic.is_charging());
    }
}
