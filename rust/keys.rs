//! Key name to key code table for the Gram Spectrum
//!
//! The firmware addresses keys by physical position: the high three bits
//! of a code select the row (0 = function row, 5 = bottom row) and the low
//! five bits the column within that row. Codes 0xFE and 0xFF are reserved
//! for the spectrum sentinel packets and never name a key.

use crate::error::{Result, TesoroError};

/// Device-internal address of a physical key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u8);

impl From<KeyCode> for u8 {
    fn from(code: KeyCode) -> Self {
        code.0
    }
}

const fn key(row: u8, column: u8) -> KeyCode {
    KeyCode((row << 5) | column)
}

// Positions not yet checked against captured device traffic
static KEYS: &[(&str, KeyCode)] = &[
    // Row 0
    ("esc", key(0, 0)),
    ("f1", key(0, 2)),
    ("f2", key(0, 3)),
    ("f3", key(0, 4)),
    ("f4", key(0, 5)),
    ("f5", key(0, 6)),
    ("f6", key(0, 7)),
    ("f7", key(0, 8)),
    ("f8", key(0, 9)),
    ("f9", key(0, 10)),
    ("f10", key(0, 11)),
    ("f11", key(0, 12)),
    ("f12", key(0, 13)),
    ("print_screen", key(0, 14)),
    ("scroll_lock", key(0, 15)),
    ("pause", key(0, 16)),
    // Row 1
    ("grave", key(1, 0)),
    ("1", key(1, 1)),
    ("2", key(1, 2)),
    ("3", key(1, 3)),
    ("4", key(1, 4)),
    ("5", key(1, 5)),
    ("6", key(1, 6)),
    ("7", key(1, 7)),
    ("8", key(1, 8)),
    ("9", key(1, 9)),
    ("0", key(1, 10)),
    ("minus", key(1, 11)),
    ("equal", key(1, 12)),
    ("backspace", key(1, 13)),
    ("insert", key(1, 14)),
    ("home", key(1, 15)),
    ("page_up", key(1, 16)),
    ("num_lock", key(1, 17)),
    ("kp_slash", key(1, 18)),
    ("kp_asterisk", key(1, 19)),
    ("kp_minus", key(1, 20)),
    // Row 2
    ("tab", key(2, 0)),
    ("q", key(2, 1)),
    ("w", key(2, 2)),
    ("e", key(2, 3)),
    ("r", key(2, 4)),
    ("t", key(2, 5)),
    ("y", key(2, 6)),
    ("u", key(2, 7)),
    ("i", key(2, 8)),
    ("o", key(2, 9)),
    ("p", key(2, 10)),
    ("left_bracket", key(2, 11)),
    ("right_bracket", key(2, 12)),
    ("backslash", key(2, 13)),
    ("delete", key(2, 14)),
    ("end", key(2, 15)),
    ("page_down", key(2, 16)),
    ("kp_7", key(2, 17)),
    ("kp_8", key(2, 18)),
    ("kp_9", key(2, 19)),
    ("kp_plus", key(2, 20)),
    // Row 3
    ("caps_lock", key(3, 0)),
    ("a", key(3, 1)),
    ("s", key(3, 2)),
    ("d", key(3, 3)),
    ("f", key(3, 4)),
    ("g", key(3, 5)),
    ("h", key(3, 6)),
    ("j", key(3, 7)),
    ("k", key(3, 8)),
    ("l", key(3, 9)),
    ("semicolon", key(3, 10)),
    ("apostrophe", key(3, 11)),
    ("enter", key(3, 13)),
    ("kp_4", key(3, 17)),
    ("kp_5", key(3, 18)),
    ("kp_6", key(3, 19)),
    // Row 4
    ("left_shift", key(4, 0)),
    ("z", key(4, 2)),
    ("x", key(4, 3)),
    ("c", key(4, 4)),
    ("v", key(4, 5)),
    ("b", key(4, 6)),
    ("n", key(4, 7)),
    ("m", key(4, 8)),
    ("comma", key(4, 9)),
    ("period", key(4, 10)),
    ("slash", key(4, 11)),
    ("right_shift", key(4, 13)),
    ("up", key(4, 15)),
    ("kp_1", key(4, 17)),
    ("kp_2", key(4, 18)),
    ("kp_3", key(4, 19)),
    ("kp_enter", key(4, 20)),
    // Row 5
    ("left_ctrl", key(5, 0)),
    ("left_super", key(5, 1)),
    ("left_alt", key(5, 2)),
    ("space", key(5, 6)),
    ("right_alt", key(5, 10)),
    ("fn", key(5, 11)),
    ("menu", key(5, 12)),
    ("right_ctrl", key(5, 13)),
    ("left", key(5, 14)),
    ("down", key(5, 15)),
    ("right", key(5, 16)),
    ("kp_0", key(5, 18)),
    ("kp_period", key(5, 19)),
];

/// Look up the key code for a key name (ASCII case-insensitive).
pub fn lookup_key_code(name: &str) -> Result<KeyCode> {
    KEYS.iter()
        .find(|(key_name, _)| key_name.eq_ignore_ascii_case(name))
        .map(|&(_, code)| code)
        .ok_or_else(|| TesoroError::UnknownKey(name.to_string()))
}

/// All known key names, in table order.
pub fn key_names() -> impl Iterator<Item = &'static str> {
    KEYS.iter().map(|&(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_lookup_known_keys() {
        assert_eq!(lookup_key_code("esc").unwrap(), KeyCode(0x00));
        assert_eq!(lookup_key_code("q").unwrap(), KeyCode(0x41));
        assert_eq!(lookup_key_code("space").unwrap(), KeyCode(0xa6));
    }

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(lookup_key_code("ESC").unwrap(), lookup_key_code("esc").unwrap());
        assert_eq!(
            lookup_key_code("Left_Shift").unwrap(),
            lookup_key_code("left_shift").unwrap()
        );
    }

    #[test]
    fn test_lookup_unknown_key() {
        match lookup_key_code("hyper") {
            Err(TesoroError::UnknownKey(name)) => assert_eq!(name, "hyper"),
            other => panic!("expected UnknownKey, got {:?}", other),
        }
    }

    #[test]
    fn test_codes_unique_and_not_sentinels() {
        let mut seen = HashSet::new();
        for (name, code) in KEYS {
            assert!(seen.insert(*code), "duplicate code for {}", name);
            assert!(code.0 < 0xfe, "{} collides with a sentinel", name);
        }
    }

    #[test]
    fn test_names_unique() {
        let names: HashSet<_> = key_names().collect();
        assert_eq!(names.len(), KEYS.len());
    }
}
