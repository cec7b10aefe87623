//! `nusb` implementation of the USB backend

use crate::config::SenderConfig;
use crate::error::{Result, TesoroError};
use crate::hid::{ControlSetup, UsbBackend, UsbDeviceEntry, UsbHandle};
use async_trait::async_trait;
use nusb::transfer::{ControlOut, ControlType, Recipient};
use std::time::Duration;
use tracing::debug;

/// USB access through `nusb`.
#[derive(Clone, Debug)]
pub struct NusbBackend {
    timeout: Duration,
}

impl NusbBackend {
    pub fn new(config: &SenderConfig) -> Self {
        Self {
            timeout: config.transfer_timeout(),
        }
    }
}

impl Default for NusbBackend {
    fn default() -> Self {
        Self::new(&SenderConfig::default())
    }
}

#[async_trait]
impl UsbBackend for NusbBackend {
    type Handle = NusbHandle;

    async fn open(&self, vendor_id: u16, product_id: u16) -> Result<Option<NusbHandle>> {
        let Some(info) = nusb::list_devices()
            .await?
            .find(|d| d.vendor_id() == vendor_id && d.product_id() == product_id)
        else {
            return Ok(None);
        };

        let device = info.open().await?;
        debug!(device = %UsbDeviceEntry::from_nusb(&info), "opened device");

        Ok(Some(NusbHandle {
            device,
            info,
            interface: None,
            timeout: self.timeout,
        }))
    }

    async fn list_devices(&self, vendor_id: u16) -> Result<Vec<UsbDeviceEntry>> {
        Ok(nusb::list_devices()
            .await?
            .filter(|d| d.vendor_id() == vendor_id)
            .map(|d| UsbDeviceEntry::from_nusb(&d))
            .collect())
    }
}

/// Open device handle. The claimed interface, if any, is released on drop.
pub struct NusbHandle {
    device: nusb::Device,
    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    info: nusb::DeviceInfo,
    interface: Option<nusb::Interface>,
    timeout: Duration,
}

/// Split a bmRequestType into the `nusb` control type and recipient.
fn decode_request_type(request_type: u8) -> Result<(ControlType, Recipient)> {
    // Direction bit set means device-to-host
    if request_type & 0x80 != 0 {
        return Err(TesoroError::InvalidRequestType(request_type));
    }

    let control_type = match (request_type >> 5) & 0x03 {
        0 => ControlType::Standard,
        1 => ControlType::Class,
        2 => ControlType::Vendor,
        _ => return Err(TesoroError::InvalidRequestType(request_type)),
    };

    let recipient = match request_type & 0x1f {
        0 => Recipient::Device,
        1 => Recipient::Interface,
        2 => Recipient::Endpoint,
        3 => Recipient::Other,
        _ => return Err(TesoroError::InvalidRequestType(request_type)),
    };

    Ok((control_type, recipient))
}

#[async_trait]
impl UsbHandle for NusbHandle {
    /// A bound kernel driver shows up as a `driver` link in the
    /// interface's sysfs directory, e.g. `3-1/3-1:1.1/driver`.
    #[cfg(target_os = "linux")]
    fn kernel_driver_active(&self, interface: u8) -> Result<bool> {
        let device_dir = self.info.sysfs_path();
        let Some(name) = device_dir.file_name() else {
            return Ok(false);
        };
        let config = self
            .device
            .active_configuration()
            .map(|c| c.configuration_value())
            .unwrap_or(1);

        let interface_dir =
            device_dir.join(format!("{}:{}.{}", name.to_string_lossy(), config, interface));
        Ok(interface_dir.join("driver").exists())
    }

    #[cfg(not(target_os = "linux"))]
    fn kernel_driver_active(&self, _interface: u8) -> Result<bool> {
        Ok(false)
    }

    #[cfg(target_os = "linux")]
    fn detach_kernel_driver(&mut self, interface: u8) -> Result<()> {
        self.device.detach_kernel_driver(interface)?;
        Ok(())
    }

    #[cfg(not(target_os = "linux"))]
    fn detach_kernel_driver(&mut self, _interface: u8) -> Result<()> {
        Ok(())
    }

    #[cfg(target_os = "linux")]
    fn attach_kernel_driver(&mut self, interface: u8) -> Result<()> {
        self.device.attach_kernel_driver(interface)?;
        Ok(())
    }

    #[cfg(not(target_os = "linux"))]
    fn attach_kernel_driver(&mut self, _interface: u8) -> Result<()> {
        Ok(())
    }

    async fn control_write(&mut self, setup: ControlSetup, data: &[u8]) -> Result<()> {
        let (control_type, recipient) = decode_request_type(setup.request_type)?;

        self.device
            .control_out(
                ControlOut {
                    control_type,
                    recipient,
                    request: setup.request,
                    value: setup.value,
                    index: setup.index,
                    data,
                },
                self.timeout,
            )
            .await?;

        Ok(())
    }

    async fn claim_interface(&mut self, interface: u8) -> Result<()> {
        let claimed = self.device.claim_interface(interface).await?;
        self.interface = Some(claimed);
        Ok(())
    }

    async fn release_interface(&mut self, _interface: u8) -> Result<()> {
        // nusb releases the interface when the handle is dropped
        self.interface = None;
        Ok(())
    }
}
