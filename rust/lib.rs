//! Lighting control for Tesoro Gram Spectrum keyboards
//!
//! Lighting commands are 8-byte HID reports written with control
//! transfers:
//! - Key name to key code table
//! - Packet construction for profile, color, mode and per-key colors
//! - Serialized, paced transmission with kernel driver handling (nusb)
//! - Optional Python bindings (feature `python`)

pub mod config;
pub mod error;
pub mod hid;
pub mod keys;
pub mod packet;
pub mod sender;

#[cfg(feature = "python")]
mod python;

pub use config::SenderConfig;
pub use error::{Result, TesoroError};
pub use hid::{DeviceDescriptor, DeviceType, NusbBackend, GRAM_SPECTRUM_PRODUCT_ID, VENDOR_ID};
pub use keys::{key_names, lookup_key_code, KeyCode};
pub use packet::{Color, Command, Mode, Packet, Profile, SpectrumSubmode, PACKET_SIZE};
pub use sender::PacketSender;
