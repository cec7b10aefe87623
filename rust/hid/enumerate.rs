//! Tesoro device discovery

use crate::error::Result;
use crate::hid::{UsbBackend, UsbDeviceEntry};
use serde::Serialize;

/// Tesoro USB vendor ID
pub const VENDOR_ID: u16 = 0x195d;

/// Gram Spectrum keyboard product ID
pub const GRAM_SPECTRUM_PRODUCT_ID: u16 = 0x2047;

/// Kind of device behind a product ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
#[repr(u8)]
pub enum DeviceType {
    Keyboard = 0,
}

impl From<DeviceType> for u8 {
    fn from(t: DeviceType) -> Self {
        t as u8
    }
}

struct KnownModel {
    product_id: u16,
    name: &'static str,
    device_type: DeviceType,
}

static KNOWN_MODELS: &[KnownModel] = &[KnownModel {
    product_id: GRAM_SPECTRUM_PRODUCT_ID,
    name: "Gram Spectrum",
    device_type: DeviceType::Keyboard,
}];

/// A recognized Tesoro device attached to the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDescriptor {
    pub name: String,
    pub bus: u8,
    pub address: u8,
    pub product_id: u16,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
}

/// Keep the entries that match a known model, sorted by bus and address.
pub fn describe(entries: impl IntoIterator<Item = UsbDeviceEntry>) -> Vec<DeviceDescriptor> {
    let mut results: Vec<DeviceDescriptor> = entries
        .into_iter()
        .filter(|entry| entry.vendor_id == VENDOR_ID)
        .filter_map(|entry| {
            KNOWN_MODELS
                .iter()
                .find(|model| model.product_id == entry.product_id)
                .map(|model| DeviceDescriptor {
                    name: model.name.to_string(),
                    bus: entry.bus_number,
                    address: entry.device_address,
                    product_id: model.product_id,
                    device_type: model.device_type,
                })
        })
        .collect();

    results.sort_by_key(|d| (d.bus, d.address));
    results
}

/// Enumerate attached Tesoro devices.
pub async fn list_devices<B: UsbBackend>(backend: &B) -> Result<Vec<DeviceDescriptor>> {
    let entries = backend.list_devices(VENDOR_ID).await?;
    Ok(describe(entries))
}
