use crate::PeripheralAddress;
use thiserror::Error;

pub type Result<T, E = BusError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("bus device not found: {0}")]
    DeviceNotFound(String),
    #[error("operation not supported on this backend: {0}")]
    Unsupported(&'static str),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("unable to select peripheral {address}: {reason}")]
    Select {
        address: PeripheralAddress,
        reason: String,
    },
    #[error("no peripheral selected")]
    NotSelected,
    #[error("invalid peripheral address: {0}")]
    InvalidAddress(String),
}
