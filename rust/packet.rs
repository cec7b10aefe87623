//! Gram Spectrum lighting packet protocol
//!
//! Every packet is 8 bytes, sent as a HID SET_REPORT:
//!   0      - Report ID (always 0x07)
//!   1      - Command
//!   2      - Profile (1-5 gaming, 6 PC mode)
//!   3-7    - Parameters, zero-padded on the right
//!
//! The device never answers; there is nothing to parse on the way back.

use crate::error::{Result, TesoroError};
use crate::keys::{lookup_key_code, KeyCode};
use serde::{Deserialize, Serialize};

pub const PACKET_SIZE: usize = 8;
pub const PARAM_SIZE: usize = 5;
pub const REPORT_ID: u8 = 0x07;

// Spectrum framing
const SPECTRUM_BEGIN: u8 = 0xfe;
const SPECTRUM_END: u8 = 0xff;
const SPECTRUM_TRAILER: u8 = 0x0a;

/// Command byte of a packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
// Values not yet checked against captured device traffic
pub enum Command {
    Profile = 0x03,
    Mode = 0x0a,
    Color = 0x0b,
    ColorSpectrum = 0x0d,
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> Self {
        cmd as u8
    }
}

/// On-device memory slot holding one lighting configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Profile(u8);

impl Profile {
    pub const PC_MODE: Profile = Profile(6);

    pub fn new(value: u8) -> Result<Self> {
        match value {
            1..=6 => Ok(Profile(value)),
            _ => Err(TesoroError::InvalidProfile(value)),
        }
    }

    #[inline]
    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_pc_mode(self) -> bool {
        self == Self::PC_MODE
    }
}

impl TryFrom<u8> for Profile {
    type Error = TesoroError;

    fn try_from(value: u8) -> Result<Self> {
        Profile::new(value)
    }
}

impl From<Profile> for u8 {
    fn from(profile: Profile) -> Self {
        profile.0
    }
}

/// RGB color, 8 bits per channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self { red, green, blue }
    }
}

impl From<[u8; 3]> for Color {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Self { red, green, blue }
    }
}

/// Lighting mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Mode {
    Standard = 0,
    Trigger = 1,
    Ripple = 2,
    Firework = 3,
    Radiation = 4,
    Breathing = 5,
    RainbowWave = 6,
    SpectrumColors = 8,
}

impl TryFrom<u8> for Mode {
    type Error = TesoroError;

    fn try_from(v: u8) -> Result<Self> {
        match v {
            0 => Ok(Mode::Standard),
            1 => Ok(Mode::Trigger),
            2 => Ok(Mode::Ripple),
            3 => Ok(Mode::Firework),
            4 => Ok(Mode::Radiation),
            5 => Ok(Mode::Breathing),
            6 => Ok(Mode::RainbowWave),
            8 => Ok(Mode::SpectrumColors),
            _ => Err(TesoroError::InvalidMode(v)),
        }
    }
}

/// Sub mode, only meaningful with [`Mode::SpectrumColors`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum SpectrumSubmode {
    #[default]
    Shine = 0,
    Breathing = 1,
    Trigger = 2,
}

impl TryFrom<u8> for SpectrumSubmode {
    type Error = TesoroError;

    fn try_from(v: u8) -> Result<Self> {
        match v {
            0 => Ok(SpectrumSubmode::Shine),
            1 => Ok(SpectrumSubmode::Breathing),
            2 => Ok(SpectrumSubmode::Trigger),
            _ => Err(TesoroError::InvalidSubmode(v)),
        }
    }
}

/// A single 8-byte lighting packet.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Packet {
    buf: [u8; PACKET_SIZE],
}

impl Packet {
    /// Build a packet, zero-padding `params` to five bytes.
    pub fn new(command: Command, profile: Profile, params: &[u8]) -> Result<Self> {
        if params.len() > PARAM_SIZE {
            return Err(TesoroError::TooManyParams(params.len()));
        }

        let mut buf = [0u8; PACKET_SIZE];
        buf[0] = REPORT_ID;
        buf[1] = command.into();
        buf[2] = profile.value();
        buf[3..3 + params.len()].copy_from_slice(params);
        Ok(Self { buf })
    }

    // Parameter lists below are fixed and never exceed PARAM_SIZE.
    fn with_params(command: Command, profile: Profile, params: [u8; PARAM_SIZE]) -> Self {
        let mut buf = [0u8; PACKET_SIZE];
        buf[0] = REPORT_ID;
        buf[1] = command.into();
        buf[2] = profile.value();
        buf[3..].copy_from_slice(&params);
        Self { buf }
    }

    fn spectrum(profile: Profile, code: u8, color: Color) -> Self {
        Self::with_params(
            Command::ColorSpectrum,
            profile,
            [code, color.red, color.green, color.blue, SPECTRUM_TRAILER],
        )
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; PACKET_SIZE] {
        &self.buf
    }

    #[inline]
    pub fn command(&self) -> u8 {
        self.buf[1]
    }

    #[inline]
    pub fn profile(&self) -> u8 {
        self.buf[2]
    }

    #[inline]
    pub fn params(&self) -> &[u8] {
        &self.buf[3..]
    }
}

impl AsRef<[u8]> for Packet {
    fn as_ref(&self) -> &[u8] {
        &self.buf
    }
}

impl std::fmt::Debug for Packet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Packet({:02x?})", self.buf)
    }
}

/// Select `profile` as the target of subsequent commands.
pub fn profile_sequence(profile: Profile) -> Vec<Packet> {
    vec![Packet::with_params(Command::Profile, profile, [0; PARAM_SIZE])]
}

/// Set the whole-keyboard color. Does not affect spectrum mode colors.
pub fn color_sequence(color: Color, profile: Profile) -> Vec<Packet> {
    vec![Packet::with_params(
        Command::Color,
        profile,
        [color.red, color.green, color.blue, 0, 0],
    )]
}

pub fn mode_sequence(mode: Mode, profile: Profile, submode: SpectrumSubmode) -> Vec<Packet> {
    vec![Packet::with_params(
        Command::Mode,
        profile,
        [mode as u8, submode as u8, 0, 0, 0],
    )]
}

/// Per-key colors, framed by a profile select and the spectrum sentinels.
///
/// Every key name is resolved before any packet is built, so one unknown
/// name fails the whole call. Keys are emitted in iteration order; an
/// empty input still yields the three framing packets.
pub fn key_color_sequence<I, K>(colors: I, profile: Profile) -> Result<Vec<Packet>>
where
    I: IntoIterator<Item = (K, Color)>,
    K: AsRef<str>,
{
    let resolved: Vec<(KeyCode, Color)> = colors
        .into_iter()
        .map(|(name, color)| Ok((lookup_key_code(name.as_ref())?, color)))
        .collect::<Result<_>>()?;

    let mut packets = Vec::with_capacity(resolved.len() + 3);
    packets.extend(profile_sequence(profile));
    packets.push(Packet::spectrum(profile, SPECTRUM_BEGIN, Color::BLACK));
    packets.extend(
        resolved
            .into_iter()
            .map(|(code, color)| Packet::spectrum(profile, code.into(), color)),
    );
    packets.push(Packet::spectrum(profile, SPECTRUM_END, Color::BLACK));
    Ok(packets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(n: u8) -> Profile {
        Profile::new(n).unwrap()
    }

    #[test]
    fn test_packet_layout() {
        let packet = Packet::new(Command::Color, profile(3), &[1, 2]).unwrap();
        assert_eq!(packet.as_bytes(), &[0x07, 0x0b, 3, 1, 2, 0, 0, 0]);
        assert_eq!(packet.command(), 0x0b);
        assert_eq!(packet.profile(), 3);
        assert_eq!(packet.params(), &[1, 2, 0, 0, 0]);
    }

    #[test]
    fn test_packet_always_eight_bytes() {
        for len in 0..=PARAM_SIZE {
            let params: Vec<u8> = (1..=len as u8).collect();
            let packet = Packet::new(Command::Mode, profile(1), &params).unwrap();
            let bytes = packet.as_ref();
            assert_eq!(bytes.len(), PACKET_SIZE);
            assert_eq!(&bytes[3..3 + len], params.as_slice());
            assert!(bytes[3 + len..].iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn test_packet_too_many_params() {
        let result = Packet::new(Command::Mode, profile(1), &[0; 6]);
        assert!(matches!(result, Err(TesoroError::TooManyParams(6))));
    }

    #[test]
    fn test_profile_range() {
        assert!(Profile::new(0).is_err());
        assert!(Profile::new(7).is_err());
        assert!(Profile::new(1).is_ok());
        assert!(Profile::new(6).unwrap().is_pc_mode());
        assert!(!Profile::new(5).unwrap().is_pc_mode());
    }

    #[test]
    fn test_color_sequence() {
        let packets = color_sequence(Color::new(10, 20, 30), profile(2));
        assert_eq!(packets.len(), 1);
        assert_eq!(
            packets[0].as_bytes(),
            &[0x07, Command::Color as u8, 2, 10, 20, 30, 0, 0]
        );
    }

    #[test]
    fn test_mode_sequence_rainbow_wave() {
        let mode = Mode::try_from(6).unwrap();
        let packets = mode_sequence(mode, profile(1), SpectrumSubmode::default());
        assert_eq!(
            packets[0].as_bytes(),
            &[0x07, Command::Mode as u8, 1, 6, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_mode_sequence_with_submode() {
        let packets = mode_sequence(Mode::SpectrumColors, profile(4), SpectrumSubmode::Trigger);
        assert_eq!(packets[0].params(), &[8, 2, 0, 0, 0]);
    }

    #[test]
    fn test_mode_from_u8() {
        assert_eq!(Mode::try_from(0).unwrap(), Mode::Standard);
        assert_eq!(Mode::try_from(8).unwrap(), Mode::SpectrumColors);
        assert!(matches!(Mode::try_from(7), Err(TesoroError::InvalidMode(7))));
        assert!(matches!(
            SpectrumSubmode::try_from(3),
            Err(TesoroError::InvalidSubmode(3))
        ));
    }

    #[test]
    fn test_profile_sequence() {
        let packets = profile_sequence(Profile::PC_MODE);
        assert_eq!(
            packets[0].as_bytes(),
            &[0x07, Command::Profile as u8, 6, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_key_color_sequence_framing() {
        let colors = vec![
            ("w", Color::new(255, 0, 0)),
            ("a", Color::new(0, 255, 0)),
            ("s", Color::new(0, 0, 255)),
            ("d", Color::new(1, 2, 3)),
        ];
        let packets = key_color_sequence(colors.clone(), profile(5)).unwrap();
        assert_eq!(packets.len(), colors.len() + 3);

        assert_eq!(packets[0].command(), Command::Profile as u8);
        assert_eq!(packets[1].as_bytes(), &[0x07, 0x0d, 5, 0xfe, 0, 0, 0, 0x0a]);
        assert_eq!(
            packets.last().unwrap().as_bytes(),
            &[0x07, 0x0d, 5, 0xff, 0, 0, 0, 0x0a]
        );

        for (packet, (name, color)) in packets[2..packets.len() - 1].iter().zip(&colors) {
            let code = lookup_key_code(name).unwrap();
            assert_eq!(
                packet.as_bytes(),
                &[0x07, 0x0d, 5, code.0, color.red, color.green, color.blue, 0x0a]
            );
        }
    }

    #[test]
    fn test_key_color_sequence_empty() {
        let packets = key_color_sequence(Vec::<(&str, Color)>::new(), profile(1)).unwrap();
        assert_eq!(packets.len(), 3);
        assert_eq!(packets[0].command(), Command::Profile as u8);
        assert_eq!(packets[1].params()[0], 0xfe);
        assert_eq!(packets[2].params()[0], 0xff);
    }

    #[test]
    fn test_key_color_sequence_rejects_unknown_key() {
        let colors = vec![("esc", Color::BLACK), ("bogus", Color::BLACK), ("f1", Color::BLACK)];
        match key_color_sequence(colors, profile(1)) {
            Err(TesoroError::UnknownKey(name)) => assert_eq!(name, "bogus"),
            other => panic!("expected UnknownKey, got {:?}", other),
        }
    }

    #[test]
    fn test_color_conversions() {
        assert_eq!(Color::from((1, 2, 3)), Color::new(1, 2, 3));
        assert_eq!(Color::from([4, 5, 6]), Color::new(4, 5, 6));
    }

    #[test]
    fn test_serde_shapes() {
        assert_eq!(serde_json::to_string(&profile(3)).unwrap(), "3");
        assert_eq!(serde_json::from_str::<Profile>("6").unwrap(), Profile::PC_MODE);
        assert!(serde_json::from_str::<Profile>("7").is_err());
        assert!(serde_json::from_str::<Profile>("0").is_err());

        let color = Color::new(1, 2, 255);
        let json = serde_json::to_value(color).unwrap();
        assert_eq!(json, serde_json::json!({"red": 1, "green": 2, "blue": 255}));
        assert_eq!(serde_json::from_value::<Color>(json).unwrap(), color);
    }
}
