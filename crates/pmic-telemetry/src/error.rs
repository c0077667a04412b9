use register_bus::{BusError, PeripheralAddress, Register};
use thiserror::Error;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Every variant is fatal to the collector; there is no per-register retry.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to communicate with peripheral at {address}")]
    Select {
        address: PeripheralAddress,
        source: BusError,
    },
    #[error("unable to read register {reg}")]
    Read { reg: Register, source: BusError },
    #[error("unable to write register {reg}")]
    Write { reg: Register, source: BusError },
    #[error("unable to emit chart data")]
    Output(#[from] std::io::Error),
}
