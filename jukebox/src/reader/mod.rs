//! Card readers
//!
//! A reader is polled with a timeout and answers with the UID of the card
//! in front of it, if any.

use std::fmt;
use std::time::Duration;

use crate::error::ReaderError;

pub mod keyboard;
pub mod linux_i2c;
pub mod pn532;

pub use keyboard::KeyboardReader;
pub use linux_i2c::LinuxI2c;
pub use pn532::{I2cBus, Pn532};

/// Raw UID bytes of an RFID/NFC card
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardUid(Vec<u8>);

impl CardUid {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Parse hex digits, optionally separated by `:`, `-` or spaces
    pub fn from_hex(text: &str) -> Option<Self> {
        let digits: Vec<u8> = text
            .bytes()
            .filter(|b| !matches!(b, b':' | b'-' | b' '))
            .collect();
        if digits.is_empty() || digits.len() % 2 != 0 {
            return None;
        }

        digits
            .chunks(2)
            .map(|pair| {
                let pair = std::str::from_utf8(pair).ok()?;
                u8::from_str_radix(pair, 16).ok()
            })
            .collect::<Option<Vec<u8>>>()
            .map(Self)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex, as used for card table keys
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Display for CardUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Anything that can report the card currently presented
pub trait CardReader {
    /// Wait up to `timeout` for a card; `Ok(None)` when none showed up
    fn read_card(&mut self, timeout: Duration) -> Result<Option<CardUid>, ReaderError>;
}

impl<R: CardReader + ?Sized> CardReader for Box<R> {
    fn read_card(&mut self, timeout: Duration) -> Result<Option<CardUid>, ReaderError> {
        (**self).read_card(timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("04a2b3c4", Some(vec![0x04, 0xa2, 0xb3, 0xc4]))]
    #[case("04:A2:B3:C4", Some(vec![0x04, 0xa2, 0xb3, 0xc4]))]
    #[case("de ad be ef", Some(vec![0xde, 0xad, 0xbe, 0xef]))]
    #[case("", None)]
    #[case("abc", None)]
    #[case("zz11", None)]
    #[case("0x", None)]
    fn test_from_hex(#[case] text: &str, #[case] expected: Option<Vec<u8>>) {
        assert_eq!(CardUid::from_hex(text), expected.map(CardUid::new));
    }

    #[test]
    fn test_hex_is_lowercase_and_padded() {
        let uid = CardUid::new(vec![0x04, 0xA2, 0x0B]);
        assert_eq!(uid.to_hex(), "04a20b");
        assert_eq!(uid.to_string(), "04a20b");
    }
}
