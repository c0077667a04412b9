use crate::{PeripheralAddress, Register, Result};

/// A minimal blocking register channel to one peripheral.
pub trait RegisterBus {
    /// Open a bus device by path (e.g., "/dev/i2c-0").
    fn open(path: &str) -> Result<Self>
    where
        Self: Sized;

    /// Address the peripheral that subsequent register transfers go to.
    fn select(&mut self, address: PeripheralAddress) -> Result<()>;

    /// Read one register byte.
    fn read_register(&mut self, reg: Register) -> Result<u8>;

    /// Write one register byte.
    fn write_register(&mut self, reg: Register, value: u8) -> Result<()>;
}
