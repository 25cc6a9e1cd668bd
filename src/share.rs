// Shamir A., How to Share a Secret,
// Communications of the ACM, 22, 1979, pp. 612--613.
//
// Licensed under the GPL-2.0-or-later OR LGPL-2.0-or-later.

//! The share line format: `[prefix-]INDEX-HEXVALUE`.
//!
//! `INDEX` is decimal, zero-padded to the width of the share count, and
//! `HEXVALUE` has exactly `degree / 4` lower-case hex digits. There is no
//! version tag; the field degree is read off the length of the value.

use std::fmt::Write;
use std::str::FromStr;

use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::field::{Field, FieldElement, MAX_DEGREE};

/// Longest accepted prefix token.
pub const MAX_TOKEN_LEN: usize = 128;

/// Longest accepted share line: token, separators, a ten-digit index and
/// the widest value, plus slack.
pub const MAX_LINE_LEN: usize = MAX_TOKEN_LEN + 1 + 10 + 1 + MAX_DEGREE as usize / 4 + 10;

/// One point `(index, P(index))` of a shared polynomial.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Share {
    index: u32,
    value: FieldElement,
    degree: u32,
}

impl Share {
    pub fn new(index: u32, value: FieldElement, degree: u32) -> Self {
        Share { index, value, degree }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// The index as a field element.
    pub fn x(&self) -> FieldElement {
        FieldElement::from_u64(u64::from(self.index))
    }

    pub fn value(&self) -> &FieldElement {
        &self.value
    }

    pub fn degree(&self) -> u32 {
        self.degree
    }

    /// Digits needed to print every index up to `total`.
    pub fn index_width(total: u32) -> usize {
        let mut width = 1;
        let mut n = total;
        while n >= 10 {
            n /= 10;
            width += 1;
        }
        width
    }

    /// Renders the share line.
    pub fn format(&self, prefix: Option<&str>, width: usize) -> String {
        let hex = Zeroizing::new(hex::encode(&self.value.to_be_bytes(self.degree as usize / 8)[..]));
        let mut out = String::with_capacity(MAX_LINE_LEN);
        if let Some(p) = prefix {
            out.push_str(p);
            out.push('-');
        }
        // writing into a String cannot fail
        let _ = write!(out, "{:0width$}-", self.index, width = width);
        out.push_str(&hex);
        out
    }

    /// Parses a share line. Anything after the first line break is ignored,
    /// and so is every hyphen-separated field before the index.
    pub fn parse(line: &str) -> Result<Self> {
        let line = match line.find(|c| c == '\r' || c == '\n') {
            Some(end) => &line[..end],
            None => line,
        };
        if line.len() > MAX_LINE_LEN {
            return Err(Error::InputTooLong { max: MAX_LINE_LEN, actual: line.len() });
        }

        let mut fields = line.rsplitn(3, '-');
        let value = fields.next().unwrap_or("");
        let index = fields.next().ok_or(Error::InvalidSyntax)?;

        let digits = value.len();
        let degree = (4 * digits) as u32;
        if !Field::valid(degree) {
            return Err(Error::ShareHasIllegalLength(digits));
        }

        if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidShare);
        }
        let index: u32 = index.parse().map_err(|_| Error::InvalidShare)?;
        if index == 0 || (degree < 32 && u64::from(index) >> degree != 0) {
            return Err(Error::InvalidShare);
        }

        let bytes = Zeroizing::new(hex::decode(value).map_err(|_| Error::InvalidSyntax)?);
        Ok(Share {
            index,
            value: FieldElement::from_be_bytes(&bytes),
            degree,
        })
    }
}

impl FromStr for Share {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Share::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        assert_eq!(Share::index_width(1), 1);
        assert_eq!(Share::index_width(9), 1);
        assert_eq!(Share::index_width(10), 2);
        assert_eq!(Share::index_width(255), 3);
        assert_eq!(Share::index_width(1000), 4);
    }

    #[test]
    fn format_and_parse() {
        let share = Share::new(3, FieldElement::from_u64(0xa1b2), 16);
        assert_eq!(share.format(None, 3), "003-a1b2");
        assert_eq!(share.format(Some("prefix"), 3), "prefix-003-a1b2");
        assert_eq!(Share::parse("prefix-003-a1b2").unwrap(), share);
        assert_eq!(Share::parse("003-A1B2\r\n").unwrap(), share);
        assert_eq!("my-long-label-3-a1b2".parse::<Share>().unwrap(), share);
    }

    #[test]
    fn value_keeps_leading_zeros() {
        let share = Share::new(12, FieldElement::from_u64(1), 64);
        let line = share.format(None, 2);
        assert_eq!(line, "12-0000000000000001");
        assert_eq!(Share::parse(&line).unwrap().degree(), 64);
    }

    #[test]
    fn malformed_lines() {
        assert!(matches!(Share::parse("a1b2"), Err(Error::InvalidSyntax)));
        assert!(matches!(Share::parse("1-a1b"), Err(Error::ShareHasIllegalLength(3))));
        assert!(matches!(Share::parse("1-"), Err(Error::ShareHasIllegalLength(0))));
        assert!(matches!(Share::parse("0-a1b2"), Err(Error::InvalidShare)));
        assert!(matches!(Share::parse("x1-a1b2"), Err(Error::InvalidShare)));
        assert!(matches!(Share::parse("-a1b2"), Err(Error::InvalidShare)));
        assert!(matches!(Share::parse("256-a1"), Err(Error::InvalidShare)));
        assert!(matches!(Share::parse("1-a1g2"), Err(Error::InvalidSyntax)));

        let long = format!("{}-1-a1b2", "w".repeat(MAX_LINE_LEN));
        assert!(matches!(Share::parse(&long), Err(Error::InputTooLong { .. })));
    }
}
