//! USB device information from enumeration

use std::fmt;

/// A USB device as seen on the bus, before any model matching.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UsbDeviceEntry {
    pub vendor_id: u16,
    pub product_id: u16,
    pub bus_number: u8,
    pub device_address: u8,
}

impl UsbDeviceEntry {
    #[cfg(target_os = "linux")]
    pub fn from_nusb(dev: &nusb::DeviceInfo) -> Self {
        Self {
            vendor_id: dev.vendor_id(),
            product_id: dev.product_id(),
            bus_number: dev.busnum(),
            device_address: dev.device_address(),
        }
    }

    #[cfg(not(target_os = "linux"))]
    pub fn from_nusb(dev: &nusb::DeviceInfo) -> Self {
        Self {
            vendor_id: dev.vendor_id(),
            product_id: dev.product_id(),
            bus_number: 0, // Not available on non-Linux
            device_address: dev.device_address(),
        }
    }
}

impl fmt::Display for UsbDeviceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:03}:{:03} ({:04x}:{:04x})",
            self.bus_number, self.device_address, self.vendor_id, self.product_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let entry = UsbDeviceEntry {
            vendor_id: 0x195d,
            product_id: 0x2047,
            bus_number: 3,
            device_address: 12,
        };
        assert_eq!(entry.to_string(), "003:012 (195d:2047)");
    }
}
