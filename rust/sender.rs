//! Serialized packet transmission to the keyboard
//!
//! Each operation builds its packets up front, then runs one send
//! sequence under the sender's permit:
//!
//! ```text
//! open -> detach kernel driver (if bound) -> write packets, 10 ms apart
//!      -> claim + release interface 1 -> reattach kernel driver -> close
//! ```
//!
//! The claim/release cycle makes the host re-evaluate the interface.
//! Without it the media keys stop producing events after a raw session.

use crate::config::SenderConfig;
use crate::error::{Result, TesoroError};
use crate::hid::{self, DeviceDescriptor, UsbBackend, UsbHandle, SET_REPORT, VENDOR_ID};
use crate::packet::{
    color_sequence, key_color_sequence, mode_sequence, profile_sequence, Color, Mode, Packet,
    Profile, SpectrumSubmode,
};
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tokio::time::{sleep, timeout};
use tracing::{debug, trace, warn};

/// HID interface carrying the lighting reports
const HID_INTERFACE: u8 = 1;

/// Sends packet sequences, one sequence at a time.
///
/// Share a single sender (e.g. in an `Arc`) between all tasks that talk to
/// the keyboard; overlapping calls queue on its permit and never interleave.
pub struct PacketSender<B: UsbBackend> {
    backend: B,
    permit: Mutex<()>,
    packet_delay: Duration,
    busy_timeout: Option<Duration>,
}

impl<B: UsbBackend> PacketSender<B> {
    pub fn new(backend: B, config: &SenderConfig) -> Self {
        Self {
            backend,
            permit: Mutex::new(()),
            packet_delay: config.packet_delay(),
            busy_timeout: config.busy_timeout(),
        }
    }

    /// Change the active profile.
    pub async fn set_profile(&self, product_id: u16, profile: Profile) -> Result<()> {
        self.send(product_id, &profile_sequence(profile)).await
    }

    /// Set the whole-keyboard color. Spectrum mode colors are untouched.
    pub async fn set_color(&self, product_id: u16, color: Color, profile: Profile) -> Result<()> {
        self.send(product_id, &color_sequence(color, profile)).await
    }

    /// Set the lighting mode. Switching to spectrum mode is not required
    /// before [`set_key_colors`](Self::set_key_colors).
    pub async fn set_mode(
        &self,
        product_id: u16,
        mode: Mode,
        profile: Profile,
        submode: SpectrumSubmode,
    ) -> Result<()> {
        self.send(product_id, &mode_sequence(mode, profile, submode))
            .await
    }

    /// Set individual key colors (spectrum mode).
    ///
    /// Fails with [`TesoroError::UnknownKey`] before touching the device if
    /// any key name is unknown.
    pub async fn set_key_colors<I, K>(&self, product_id: u16, colors: I, profile: Profile) -> Result<()>
    where
        I: IntoIterator<Item = (K, Color)>,
        K: AsRef<str>,
    {
        let packets = key_color_sequence(colors, profile)?;
        self.send(product_id, &packets).await
    }

    /// Attached Tesoro devices. Does not wait for the send permit.
    pub async fn list_devices(&self) -> Result<Vec<DeviceDescriptor>> {
        hid::list_devices(&self.backend).await
    }

    /// Run one full send sequence for `packets`.
    pub async fn send(&self, product_id: u16, packets: &[Packet]) -> Result<()> {
        let _permit = self.acquire().await?;

        let handle = self
            .backend
            .open(VENDOR_ID, product_id)
            .await?
            .ok_or(TesoroError::DeviceNotFound {
                vendor_id: VENDOR_ID,
                product_id,
            })?;
        let mut session = Session::begin(handle)?;

        debug!(
            "Sending {} packets to {:04x}:{:04x}",
            packets.len(),
            VENDOR_ID,
            product_id
        );
        let written = self.write_packets(&mut session.handle, packets).await;
        let cycled = cycle_interface(&mut session.handle).await;
        let restored = session.restore();
        drop(session);

        let outcome = settle(
            written,
            [("interface cycle", cycled), ("kernel driver reattach", restored)],
        );
        match &outcome {
            Ok(()) => debug!("Send sequence complete"),
            Err(e) => debug!("Send sequence failed: {}", e),
        }
        outcome
    }

    async fn acquire(&self) -> Result<MutexGuard<'_, ()>> {
        match self.busy_timeout {
            Some(limit) => timeout(limit, self.permit.lock())
                .await
                .map_err(|_elapsed| TesoroError::DeviceBusy(limit)),
            None => Ok(self.permit.lock().await),
        }
    }

    async fn write_packets(&self, handle: &mut B::Handle, packets: &[Packet]) -> Result<()> {
        for packet in packets {
            trace!("Writing {:?}", packet);
            handle.control_write(SET_REPORT, packet.as_ref()).await?;
            sleep(self.packet_delay).await;
        }
        Ok(())
    }
}

/// An open device with the kernel driver possibly detached.
///
/// Dropping the session, including when the send future is cancelled
/// mid-sequence, gives the kernel driver back before the handle closes.
struct Session<H: UsbHandle> {
    handle: H,
    reattach: bool,
}

impl<H: UsbHandle> Session<H> {
    fn begin(mut handle: H) -> Result<Self> {
        let reattach = handle.kernel_driver_active(HID_INTERFACE)?;
        if reattach {
            handle.detach_kernel_driver(HID_INTERFACE)?;
            debug!("Detached kernel driver from interface {}", HID_INTERFACE);
        }
        Ok(Self { handle, reattach })
    }

    fn restore(&mut self) -> Result<()> {
        if std::mem::take(&mut self.reattach) {
            self.handle.attach_kernel_driver(HID_INTERFACE)?;
            debug!("Reattached kernel driver to interface {}", HID_INTERFACE);
        }
        Ok(())
    }
}

impl<H: UsbHandle> Drop for Session<H> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!("Kernel driver reattach on abandoned send failed: {}", e);
        }
    }
}

async fn cycle_interface<H: UsbHandle>(handle: &mut H) -> Result<()> {
    handle.claim_interface(HID_INTERFACE).await?;
    handle.release_interface(HID_INTERFACE).await
}

/// First error wins; later cleanup failures are only logged.
fn settle<const N: usize>(primary: Result<()>, cleanup: [(&str, Result<()>); N]) -> Result<()> {
    let mut outcome = primary;
    for (step, result) in cleanup {
        if let Err(e) = result {
            if outcome.is_err() {
                warn!("{} failed after earlier error: {}", step, e);
            } else {
                outcome = Err(e);
            }
        }
    }
    outcome
}
