//! pmic-telemetry: AXP209 register decoding and chart protocol output
//!
//! The crate turns raw PMIC register bytes into a per-cycle [`Snapshot`] of physical
//! quantities and renders the static chart table plus each snapshot as the line-oriented
//! external plugin protocol (`CHART`/`DIMENSION`/`BEGIN`/`SET`/`END`).

mod error;
pub use error::{Error, Result};

mod quantity;
pub use quantity::{Algorithm, FormatRule, Quantity, QuantityDef, ValueKind};

mod charts;
pub use charts::{Chart, CHARTS, MAX_CHART_DIMENSIONS};

mod snapshot;
pub use snapshot::{Snapshot, Value};

pub mod adc;
pub use adc::enable_adc;

pub mod sampler;
pub use sampler::sample;

mod emit;
pub use emit::ProtocolWriter;

pub mod cadence;
pub use cadence::{compensated_sleep, Collector};

use register_bus::PeripheralAddress;

/// Default bus device on the C.H.I.P. board.
pub const DEFAULT_DEVICE: &str = "/dev/i2c-0";

/// Factory-fixed AXP209 address.
pub const AXP209_ADDRESS: PeripheralAddress = match PeripheralAddress::new(0x34) {
    Some(address) => address,
    None => panic!("0x34 is a 7-bit address"),
};
