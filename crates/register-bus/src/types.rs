use crate::BusError;
use core::fmt;
use core::str::FromStr;

/// Address of one byte-wide register on the selected peripheral.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Register(pub u8);

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{raw:02X}", raw = self.0)
    }
}

/// 7-bit peripheral address on the bus
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct PeripheralAddress(u16);

impl PeripheralAddress {
    pub const fn new(addr7: u16) -> Option<Self> {
        if addr7 <= 0x7F {
            Some(Self(addr7))
        } else {
            None
        }
    }

    pub const fn raw(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for PeripheralAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{raw:02X}", raw = self.0)
    }
}

impl FromStr for PeripheralAddress {
    type Err = BusError;

    /// Accepts `0x`-prefixed hex or plain decimal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let parsed = if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
            u16::from_str_radix(hex, 16).ok()
        } else {
            t.parse::<u16>().ok()
        };
        parsed
            .and_then(Self::new)
            .ok_or_else(|| BusError::InvalidAddress(s.to_string()))
    }
}
