//! Register reads and decode formulas for one collection cycle.

use crate::{Error, Quantity, Result, Snapshot, Value};
use register_bus::{Register, RegisterBus};
use tracing::trace;

pub const POWER_STATUS: Register = Register(0x01);
pub const VBUS_IPSOUT: Register = Register(0x30);
pub const CHARGE_CONTROL: Register = Register(0x33);
pub const ACIN_VOLTAGE: (Register, Register) = (Register(0x56), Register(0x57));
pub const ACIN_CURRENT: (Register, Register) = (Register(0x58), Register(0x59));
pub const VBUS_VOLTAGE: (Register, Register) = (Register(0x5A), Register(0x5B));
pub const VBUS_CURRENT: (Register, Register) = (Register(0x5C), Register(0x5D));
pub const INTERNAL_TEMP: (Register, Register) = (Register(0x5E), Register(0x5F));
pub const BATTERY_VOLTAGE: (Register, Register) = (Register(0x78), Register(0x79));
pub const BATTERY_CHARGE: (Register, Register) = (Register(0x7A), Register(0x7B));
pub const BATTERY_DISCHARGE: (Register, Register) = (Register(0x7C), Register(0x7D));
pub const FUEL_GAUGE: Register = Register(0xB9);

/// Power status register (0x01).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerStatus(pub u8);

impl PowerStatus {
    pub fn battery_present(self) -> bool {
        self.0 & 0x20 != 0
    }

    pub fn acin_present(self) -> bool {
        self.0 & 0x80 != 0
    }

    /// VBUS readings are gated on the battery-present bit as well.
    pub fn vbus_readable(self) -> bool {
        self.battery_present()
    }
}

/// Charge control register (0x33).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChargeControl(pub u8);

impl ChargeControl {
    pub fn charging_enabled(self) -> bool {
        self.0 & 0x80 != 0
    }

    /// Target charge current in mA: 300 + 100 per step of the low nibble.
    pub fn current_limit(self) -> u16 {
        u16::from(self.0 & 0x0F) * 100 + 300
    }

    /// Termination current: 10% of `limit`, or 15% when the adjust bit is set.
    pub fn termination_limit(self, limit: u16) -> u16 {
        let base = limit / 10;
        if self.0 & 0x10 != 0 {
            base + (base >> 1)
        } else {
            base
        }
    }

    /// `(limit, termination)` when charging is enabled.
    pub fn limits(self) -> Option<(u16, u16)> {
        if !self.charging_enabled() {
            return None;
        }
        let limit = self.current_limit();
        Some((limit, self.termination_limit(limit)))
    }
}

/// VBUS-IPSOUT path management register (0x30).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VbusIpsout(pub u8);

impl VbusIpsout {
    /// Hold voltage limit in mV, when limiting is active.
    pub fn voltage_limit(self) -> Option<u16> {
        if self.0 & 0x40 == 0 {
            return None;
        }
        Some(u16::from(self.0 >> 3) * 100 + 4000)
    }

    /// Current limit in mA; selector 3 means unlimited.
    pub fn current_limit(self) -> Option<u16> {
        const TARGETS: [u16; 3] = [900, 500, 100];
        TARGETS.get(usize::from(self.0 & 0x03)).copied()
    }
}

/// 12-bit ADC value: eight high bits, then the low nibble of the second register.
pub fn combine_pair(high: u8, low: u8) -> u16 {
    (u16::from(high) << 4) | u16::from(low & 0x0F)
}

/// 13-bit discharge current: eight high bits, then five low bits.
pub fn combine_discharge(high: u8, low: u8) -> u16 {
    (u16::from(high) << 5) | u16::from(low & 0x1F)
}

/// Internal temperature in degrees Fahrenheit.
pub fn internal_temperature(raw: u16) -> f32 {
    (f64::from(raw) * 0.18 - 228.46) as f32
}

/// Battery gauge percentage.
pub fn gauge_percent(byte: u8) -> u8 {
    byte & 0x7F
}

struct Reader<'a, B> {
    bus: &'a mut B,
}

impl<B: RegisterBus> Reader<'_, B> {
    fn byte(&mut self, reg: Register) -> Result<u8> {
        let value = self
            .bus
            .read_register(reg)
            .map_err(|source| Error::Read { reg, source })?;
        trace!(%reg, value, "register read");
        Ok(value)
    }

    fn pair(&mut self, (high, low): (Register, Register)) -> Result<u16> {
        let high = self.byte(high)?;
        let low = self.byte(low)?;
        Ok(combine_pair(high, low))
    }
}

/// Read the PMIC once and decode a fresh snapshot.
///
/// Quantities whose subsystem is absent are left invalid. Any bus failure aborts the cycle.
pub fn sample<B: RegisterBus>(bus: &mut B) -> Result<Snapshot> {
    let mut snap = Snapshot::new();
    let mut rd = Reader { bus };

    let power = PowerStatus(rd.byte(POWER_STATUS)?);
    let charge = ChargeControl(rd.byte(CHARGE_CONTROL)?);

    let temp = internal_temperature(rd.pair(INTERNAL_TEMP)?);
    snap.record(Quantity::InternalTemp, Value::F32(temp));

    if let Some((limit, term)) = charge.limits() {
        snap.record(Quantity::ChargeLimit, Value::U16(limit));
        snap.record(Quantity::ChargeTermination, Value::U16(term));
    }

    if power.battery_present() {
        let charging = f32::from(rd.pair(BATTERY_CHARGE)?) / 2.0;
        snap.record(Quantity::BatteryCharge, Value::F32(charging));

        let (high, low) = BATTERY_DISCHARGE;
        let discharge = combine_discharge(rd.byte(high)?, rd.byte(low)?);
        snap.record(Quantity::BatteryDischarge, Value::U16(discharge));

        let level = gauge_percent(rd.byte(FUEL_GAUGE)?);
        snap.record(Quantity::BatteryLevel, Value::U8(level));

        let voltage = f32::from(rd.pair(BATTERY_VOLTAGE)?) * 1.1;
        snap.record(Quantity::BatteryVoltage, Value::F32(voltage));
    }

    if power.acin_present() {
        let voltage = f32::from(rd.pair(ACIN_VOLTAGE)?) * 1.7;
        snap.record(Quantity::AcinVoltage, Value::F32(voltage));

        let current = f32::from(rd.pair(ACIN_CURRENT)?) * 0.625;
        snap.record(Quantity::AcinCurrent, Value::F32(current));
    }

    if power.vbus_readable() {
        let voltage = f32::from(rd.pair(VBUS_VOLTAGE)?) * 1.7;
        snap.record(Quantity::VbusVoltage, Value::F32(voltage));

        let current = f32::from(rd.pair(VBUS_CURRENT)?) * 0.375;
        snap.record(Quantity::VbusCurrent, Value::F32(current));
    }

    let ipsout = VbusIpsout(rd.byte(VBUS_IPSOUT)?);
    if let Some(limit) = ipsout.voltage_limit() {
        snap.record(Quantity::VbusVoltageLimit, Value::U16(limit));
    }
    if let Some(limit) = ipsout.current_limit() {
        snap.record(Quantity::VbusCurrentLimit, Value::U16(limit));
    }

    Ok(snap)
}
