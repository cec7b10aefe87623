//! USB backend abstraction
//!
//! The packet sender only needs a handful of USB operations. They are
//! collected here so the real `nusb` backend and in-memory test backends
//! can be swapped freely.

use crate::error::Result;
use crate::hid::UsbDeviceEntry;
use async_trait::async_trait;

/// Setup fields of a host-to-device control transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlSetup {
    pub request_type: u8,
    pub request: u8,
    pub value: u16,
    pub index: u16,
}

// HID class requests
const HID_SET_REPORT: u8 = 0x09;

// bmRequestType: host-to-device, class, interface
const REQUEST_TYPE_CLASS_INTERFACE_OUT: u8 = 0x21;

/// SET_REPORT for report 0x07 (type 0x03 in the high byte) on interface 1.
pub const SET_REPORT: ControlSetup = ControlSetup {
    request_type: REQUEST_TYPE_CLASS_INTERFACE_OUT,
    request: HID_SET_REPORT,
    value: 0x0307,
    index: 0x01,
};

/// Something that can find and open USB devices.
#[async_trait]
pub trait UsbBackend: Send + Sync {
    type Handle: UsbHandle;

    /// Open the first device matching `vendor_id`/`product_id`.
    ///
    /// Returns `Ok(None)` when no such device is attached.
    async fn open(&self, vendor_id: u16, product_id: u16) -> Result<Option<Self::Handle>>;

    /// List attached devices with the given vendor id.
    async fn list_devices(&self, vendor_id: u16) -> Result<Vec<UsbDeviceEntry>>;
}

/// An open device. Dropping the handle closes it.
#[async_trait]
pub trait UsbHandle: Send {
    fn kernel_driver_active(&self, interface: u8) -> Result<bool>;

    fn detach_kernel_driver(&mut self, interface: u8) -> Result<()>;

    fn attach_kernel_driver(&mut self, interface: u8) -> Result<()>;

    async fn control_write(&mut self, setup: ControlSetup, data: &[u8]) -> Result<()>;

    async fn claim_interface(&mut self, interface: u8) -> Result<()>;

    async fn release_interface(&mut self, interface: u8) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_report_setup() {
        assert_eq!(SET_REPORT.request_type, 0x21);
        assert_eq!(SET_REPORT.request, 0x09);
        assert_eq!(SET_REPORT.value, 0x0307);
        assert_eq!(SET_REPORT.index, 0x01);
    }
}
