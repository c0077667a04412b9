use crate::{BusError, PeripheralAddress, Register, RegisterBus, Result};
use i2cdev::core::I2CDevice;
use i2cdev::linux::LinuxI2CDevice;
use std::fs::OpenOptions;
use std::io::ErrorKind;
use tracing::debug;

/// Linux `/dev/i2c-N` character device backend.
pub struct I2cBus {
    path: String,
    device: Option<LinuxI2CDevice>,
}

impl RegisterBus for I2cBus {
    fn open(path: &str) -> Result<Self> {
        // Probe read/write access up front so a missing or locked node fails at startup
        OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => BusError::DeviceNotFound(path.to_string()),
                _ => BusError::Io(format!("{path}: {e}")),
            })?;
        Ok(Self {
            path: path.to_string(),
            device: None,
        })
    }

    fn select(&mut self, address: PeripheralAddress) -> Result<()> {
        // SAFETY: the address is usually claimed by the kernel PMIC driver; only single
        // register byte transfers are issued through the forced handle.
        let device = unsafe { LinuxI2CDevice::force_new(&self.path, address.raw()) }.map_err(
            |e| BusError::Select {
                address,
                reason: e.to_string(),
            },
        )?;
        debug!(path = %self.path, %address, "peripheral selected");
        self.device = Some(device);
        Ok(())
    }

    fn read_register(&mut self, reg: Register) -> Result<u8> {
        let device = self.device.as_mut().ok_or(BusError::NotSelected)?;
        device
            .write(&[reg.0])
            .map_err(|e| BusError::Io(format!("query {reg}: {e}")))?;
        let mut buf = [0u8; 1];
        device
            .read(&mut buf)
            .map_err(|e| BusError::Io(format!("read {reg}: {e}")))?;
        Ok(buf[0])
    }

    fn write_register(&mut self, reg: Register, value: u8) -> Result<()> {
        let device = self.device.as_mut().ok_or(BusError::NotSelected)?;
        device
            .write(&[reg.0, value])
            .map_err(|e| BusError::Io(format!("write {reg}: {e}")))?;
        Ok(())
    }
}
