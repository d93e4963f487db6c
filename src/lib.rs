//! Power status reporting for a battery-backed device.
//!
//! # Overview
//!
//! Application code asks three questions about power:
//! - Is external power present? (PMIC power-good, over I2C)
//! - Is the battery charging? (PMIC charge status, over I2C)
//! - Is a battery installed? (debounced sense-pin interrupt)
//!
//! The first two are blocking bus reads and must only run in the main
//! loop. The third is an atomic flag kept current by the sense-pin
//! interrupt and can be read from anywhere.
//!
//! # Contexts
//!
//! ```text
//!  EXTI (sense pin) ──► BatterySense::interrupt_handler   (atomics only)
//!                              │
//!                              ▼ &'static BatterySense
//!  main loop ─────────► PowerStatus ──► Pmic (I2C, blocking)
//! ```
//!
//! # Module Organization
//!
//! - [`config`] - Debounce, polarity and trigger settings
//! - [`sense`] - Interrupt-side debounce filter
//! - [`pmic`] - PMIC and interrupt-attach collaborator traits
//! - [`status`] - Main-loop power status
//! - [`bq24195`] - BQ24195 PMIC status driver
//! - [`monitor`] - Transition detection and poll cadence

#![cfg_attr(not(test), no_std)]

pub mod bq24195;
pub mod config;
pub mod monitor;
pub mod pmic;
pub mod sense;
pub mod status;

pub use config::{Polarity, SenseConfig, Trigger};
pub use monitor::{MonitorConfig, PowerEvent, PowerMonitor, PowerSnapshot};
pub use pmic::{Pmic, SenseInterrupt};
pub use sense::{BatteryPresence, BatterySense};
pub use status::PowerStatus;
