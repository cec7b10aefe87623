//! USB access for Tesoro devices via nusb
//!
//! The backend traits keep the packet sender independent of `nusb`.

pub mod device;
pub mod device_info;
pub mod enumerate;
pub mod transport;

pub use device::{NusbBackend, NusbHandle};
pub use device_info::UsbDeviceEntry;
pub use enumerate::{
    describe, list_devices, DeviceDescriptor, DeviceType, GRAM_SPECTRUM_PRODUCT_ID, VENDOR_ID,
};
pub use transport::{ControlSetup, UsbBackend, UsbHandle, SET_REPORT};
