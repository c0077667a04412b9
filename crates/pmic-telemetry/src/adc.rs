//! ADC enable sequence run once at startup.

use crate::{Error, Result};
use register_bus::{PeripheralAddress, Register, RegisterBus};
use std::thread;
use std::time::Duration;
use tracing::info;

/// ADC enable 1: battery voltage/current, ACIN voltage/current.
pub const ADC_ENABLE_1: Register = Register(0x82);
pub const ADC_ENABLE_1_MASK: u8 = 0xCC;
/// ADC enable 2: internal temperature.
pub const ADC_ENABLE_2: Register = Register(0x83);
pub const ADC_ENABLE_2_MASK: u8 = 0x80;

/// One conversion period (1/25 s).
pub const ADC_SETTLE: Duration = Duration::from_millis(40);

/// Select the peripheral and force on the required ADC enable bits.
///
/// Returns `true` when any bit had to be set, meaning the next reading is not settled yet.
pub fn prepare_adc<B: RegisterBus>(bus: &mut B, address: PeripheralAddress) -> Result<bool> {
    bus.select(address)
        .map_err(|source| Error::Select { address, source })?;

    let mut changed = false;
    for (reg, mask) in [
        (ADC_ENABLE_1, ADC_ENABLE_1_MASK),
        (ADC_ENABLE_2, ADC_ENABLE_2_MASK),
    ] {
        let value = bus
            .read_register(reg)
            .map_err(|source| Error::Read { reg, source })?;
        if value & mask != mask {
            info!(%reg, from = value, to = value | mask, "enabling ADC channels");
            bus.write_register(reg, value | mask)
                .map_err(|source| Error::Write { reg, source })?;
            changed = true;
        }
    }
    Ok(changed)
}

/// [`prepare_adc`], then wait out one conversion if anything changed.
pub fn enable_adc<B: RegisterBus>(bus: &mut B, address: PeripheralAddress) -> Result<()> {
    if prepare_adc(bus, address)? {
        thread::sleep(ADC_SETTLE);
    }
    Ok(())
}
