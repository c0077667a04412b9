//! register-bus: byte-addressed register access over a two-wire bus
//!
//! This crate provides a small blocking trait for talking to a single peripheral that exposes
//! 8-bit registers, with feature-gated backends. The default build enables a `mock` backend so
//! that binaries can compile and run on any host without the bus hardware.

mod types;
pub use types::{PeripheralAddress, Register};

mod error;
pub use error::{BusError, Result};

mod traits;
pub use traits::RegisterBus;

#[cfg(feature = "mock")]
mod mock;

#[cfg(feature = "mock")]
pub use mock::MockBus;

#[cfg(feature = "i2cdev")]
mod i2c;

#[cfg(feature = "i2cdev")]
pub use i2c::I2cBus;
