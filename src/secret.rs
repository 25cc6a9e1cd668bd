// Shamir A., How to Share a Secret,
// Communications of the ACM, 22, 1979, pp. 612--613.
//
// Licensed under the GPL-2.0-or-later OR LGPL-2.0-or-later.

//! How a secret is written down: printable ASCII or hex digits.

use std::convert::TryFrom;

use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::field::{Field, FieldElement};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Printable bytes 0x20..=0x7e, one byte per 8 bits of field.
    Ascii,
    /// Hex digits, one per 4 bits of field; lower case on output.
    Hex,
}

impl Default for Encoding {
    fn default() -> Self {
        Encoding::Ascii
    }
}

fn printable(b: u8) -> bool {
    (0x20..=0x7e).contains(&b)
}

impl Encoding {
    pub fn from_hex_flag(hex: bool) -> Self {
        if hex {
            Encoding::Hex
        } else {
            Encoding::Ascii
        }
    }

    /// Field degree implied by `secret` when none is configured. Odd hex
    /// lengths round up and are then rejected by [`Encoding::import`].
    pub fn auto_degree(self, secret: &str) -> u32 {
        let len = secret.len();
        let bits = match self {
            Encoding::Hex => (len.saturating_add(1) & !1).saturating_mul(4),
            Encoding::Ascii => len.saturating_mul(8),
        };
        u32::try_from(bits).unwrap_or(u32::MAX)
    }

    /// Reads `secret` as an element of `field`.
    ///
    /// Hex secrets must have exactly `degree / 4` digits. ASCII secrets may
    /// be shorter than `degree / 8` bytes and are then left-padded with
    /// zero bytes.
    pub fn import(self, field: &Field, secret: &str) -> Result<FieldElement> {
        match self {
            Encoding::Hex => {
                let want = field.hex_digits();
                if secret.len() > want {
                    return Err(Error::InputTooLong { max: want, actual: secret.len() });
                }
                if secret.len() < want {
                    return Err(Error::InputTooShort { expected: want, actual: secret.len() });
                }
                let bytes = Zeroizing::new(hex::decode(secret).map_err(|_| Error::InvalidSyntax)?);
                Ok(FieldElement::from_be_bytes(&bytes))
            }
            Encoding::Ascii => {
                let bytes = secret.as_bytes();
                if bytes.len() > field.bytes() {
                    return Err(Error::InputTooLong { max: field.bytes(), actual: bytes.len() });
                }
                if !bytes.iter().all(|&b| printable(b)) {
                    return Err(Error::BinaryData);
                }
                Ok(FieldElement::from_be_bytes(bytes))
            }
        }
    }

    /// Writes `x` out. ASCII output drops leading zero bytes and fails on
    /// anything unprintable.
    pub fn export(self, field: &Field, x: &FieldElement) -> Result<Zeroizing<String>> {
        let bytes = x.to_be_bytes(field.bytes());
        match self {
            Encoding::Hex => Ok(Zeroizing::new(hex::encode(&bytes[..]))),
            Encoding::Ascii => {
                let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
                let text = &bytes[start..];
                if !text.iter().all(|&b| printable(b)) {
                    return Err(Error::BinaryData);
                }
                Ok(Zeroizing::new(text.iter().map(|&b| b as char).collect()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_degrees() {
        assert_eq!(Encoding::Ascii.auto_degree("password"), 64);
        assert_eq!(Encoding::Hex.auto_degree("0011223344556677"), 64);
        assert_eq!(Encoding::Hex.auto_degree("abc"), 16);
        assert_eq!(Encoding::Ascii.auto_degree(""), 0);
    }

    #[test]
    fn hex_length_is_exact() {
        let f = Field::new(16).unwrap();
        assert!(matches!(
            Encoding::Hex.import(&f, "abc"),
            Err(Error::InputTooShort { expected: 4, actual: 3 })
        ));
        assert!(matches!(
            Encoding::Hex.import(&f, "abcde"),
            Err(Error::InputTooLong { max: 4, actual: 5 })
        ));
        assert!(matches!(Encoding::Hex.import(&f, "abzz"), Err(Error::InvalidSyntax)));
        assert_eq!(Encoding::Hex.import(&f, "AbCd").unwrap(), FieldElement::from_u64(0xabcd));
    }

    #[test]
    fn ascii_is_big_endian_and_may_be_short() {
        let f = Field::new(32).unwrap();
        assert_eq!(Encoding::Ascii.import(&f, "AB").unwrap(), FieldElement::from_u64(0x4142));
        assert!(matches!(
            Encoding::Ascii.import(&f, "ABCDE"),
            Err(Error::InputTooLong { max: 4, actual: 5 })
        ));
        assert!(matches!(Encoding::Ascii.import(&f, "a\tb"), Err(Error::BinaryData)));
        let wide = Field::new(64).unwrap();
        assert!(matches!(Encoding::Ascii.import(&wide, "caf\u{e9}"), Err(Error::BinaryData)));
    }

    #[test]
    fn export_forms() {
        let f = Field::new(32).unwrap();
        let x = FieldElement::from_u64(0x4142);
        assert_eq!(&*Encoding::Hex.export(&f, &x).unwrap(), "00004142");
        assert_eq!(&*Encoding::Ascii.export(&f, &x).unwrap(), "AB");
        assert_eq!(&*Encoding::Ascii.export(&f, &FieldElement::zero()).unwrap(), "");
        assert!(matches!(
            Encoding::Ascii.export(&f, &FieldElement::from_u64(0x41_01_42)),
            Err(Error::BinaryData)
        ));
    }
}
