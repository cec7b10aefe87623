//! Error types for keyboard lighting operations

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TesoroError {
    #[error("Device not found: vendor 0x{vendor_id:04x}, product 0x{product_id:04x}")]
    DeviceNotFound { vendor_id: u16, product_id: u16 },

    #[error("Unknown key name: {0:?}")]
    UnknownKey(String),

    #[error("Control transfer failed: {0}")]
    TransferFailure(#[from] nusb::transfer::TransferError),

    #[error("USB error: {0}")]
    Usb(#[from] nusb::Error),

    #[error("Device busy: send permission not granted within {0:?}")]
    DeviceBusy(Duration),

    #[error("Invalid profile {0}: expected 1-6")]
    InvalidProfile(u8),

    #[error("Invalid lighting mode: {0}")]
    InvalidMode(u8),

    #[error("Invalid spectrum submode: {0}")]
    InvalidSubmode(u8),

    #[error("Too many packet parameters: expected at most 5, got {0}")]
    TooManyParams(usize),

    #[error("Unsupported control request type: 0x{0:02x}")]
    InvalidRequestType(u8),
}

impl TesoroError {
    /// True for errors caused by caller input rather than the device.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            TesoroError::UnknownKey(_)
                | TesoroError::InvalidProfile(_)
                | TesoroError::InvalidMode(_)
                | TesoroError::InvalidSubmode(_)
                | TesoroError::TooManyParams(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TesoroError>;
