//! Control logic for a single-board irrigation controller
//!
//! Everything in this crate is independent of the board it runs on. Hardware is reached
//! through small traits ([`MoistureSensor`], [`Actuators`], [`StatusSink`], [`Clock`]) and
//! the `embedded-hal` digital pin traits, so the firmware binary wires in the real
//! peripherals and the tests wire in fakes driven by a virtual clock.

#![cfg_attr(not(test), no_std)]

#[macro_use]
pub mod serial;

pub mod alert;
pub mod config;
pub mod control_pad;
pub mod display;
pub mod moisture;
pub mod outputs;
pub mod system;
pub mod timer;

#[cfg(test)]
mod fakes;

pub use alert::AlertKind;
pub use config::{ConfigError, ControllerConfig};
pub use control_pad::{Button, ButtonType, ControlPad};
pub use display::{Display, Status, StatusScreen, StatusSink};
pub use moisture::{MoistureBand, MoistureReading, MoistureSensor};
pub use outputs::{Actuators, Led, Outputs};
pub use system::{Controller, ControllerMode, CycleReport, Peripherals};
pub use timer::Clock;
