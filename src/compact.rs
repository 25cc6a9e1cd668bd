// Shamir A., How to Share a Secret,
// Communications of the ACM, 22, 1979, pp. 612--613.
//
// Licensed under the GPL-2.0-or-later OR LGPL-2.0-or-later.

//! Compact binary shares over a prime field.
//!
//! A second, self-contained scheme for short fixed-size secrets (12, 13
//! or 16 bytes). Arithmetic is modulo a prime just below 2^96, 2^104 or
//! 2^128, and each share is one header byte followed by the share value:
//!
//! ```text
//! mmmmxxxx yyyyyyyy ... yyyyyyyy
//! ```
//!
//! where the high nibble is the threshold and the low nibble the share
//! index, both in `1..=16` with 16 written as 0. So at most 16 shares
//! exist.
//!
//! Coefficients are not random. Coefficient `i` is the double SHA-256 of
//! `secret || threshold || i`, so splitting the same secret twice gives
//! the same shares. These shares are not interchangeable with the
//! GF(2^n) line format of [`crate::share`].

use sha2::{Digest, Sha256};
use tracing::debug;
use zeroize::{Zeroize, Zeroizing};

use crate::error::{Error, Result};

/// Largest threshold and share count a header nibble can carry.
pub const MAX_SHARES: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompactVersion {
    Compact96,
    Compact104,
    Compact128,
}

impl CompactVersion {
    pub fn bits(self) -> u32 {
        match self {
            CompactVersion::Compact96 => 96,
            CompactVersion::Compact104 => 104,
            CompactVersion::Compact128 => 128,
        }
    }

    /// Secret length, and share length without the header byte.
    pub fn bytes(self) -> usize {
        self.bits() as usize / 8
    }

    pub fn share_len(self) -> usize {
        self.bytes() + 1
    }

    /// The prime modulus.
    pub fn order(self) -> u128 {
        match self {
            CompactVersion::Compact96 => 0xffff_ffff_ffff_ffff_ffff_ffef,
            CompactVersion::Compact104 => 0xff_ffff_ffff_ffff_ffff_ffff_ffef,
            CompactVersion::Compact128 => 0xffff_ffff_ffff_ffff_ffff_ffff_ffff_ff61,
        }
    }

    fn modulus(self) -> Modulus {
        Modulus(self.order())
    }
}

// Arithmetic mod p for p < 2^128, operands already reduced.
struct Modulus(u128);

impl Modulus {
    fn add(&self, a: u128, b: u128) -> u128 {
        let (s, carry) = a.overflowing_add(b);
        if carry || s >= self.0 {
            s.wrapping_sub(self.0)
        } else {
            s
        }
    }

    fn sub(&self, a: u128, b: u128) -> u128 {
        if a >= b {
            a - b
        } else {
            self.0 - (b - a)
        }
    }

    fn mul(&self, a: u128, b: u128) -> u128 {
        let mut r = 0;
        for i in (0..128).rev() {
            r = self.add(r, r);
            if (b >> i) & 1 == 1 {
                r = self.add(r, a);
            }
        }
        r
    }

    fn pow(&self, mut base: u128, mut e: u128) -> u128 {
        let mut r = 1;
        while e != 0 {
            if e & 1 == 1 {
                r = self.mul(r, base);
            }
            base = self.mul(base, base);
            e >>= 1;
        }
        r
    }

    // p is prime, so a^(p-2) is the inverse
    fn invert(&self, a: u128) -> u128 {
        self.pow(a, self.0 - 2)
    }
}

fn from_be(bytes: &[u8]) -> u128 {
    bytes.iter().fold(0, |acc, &b| (acc << 8) | u128::from(b))
}

fn to_be(v: u128, len: usize) -> Zeroizing<Vec<u8>> {
    let full = v.to_be_bytes();
    Zeroizing::new(full[16 - len..].to_vec())
}

fn to_nibble(v: u32) -> u8 {
    if v == 16 {
        0
    } else {
        v as u8
    }
}

fn from_nibble(v: u8) -> u32 {
    if v == 0 {
        16
    } else {
        u32::from(v)
    }
}

// Double SHA-256 of secret || threshold || i, padded with zero bytes
// until the truncated digest falls below the order.
fn coefficient(version: CompactVersion, secret: &[u8], threshold: u8, i: u8) -> u128 {
    let mut pad = Vec::new();
    loop {
        let mut inner = Sha256::new()
            .chain_update(secret)
            .chain_update([threshold, i])
            .chain_update(&pad)
            .finalize();
        let mut outer = Sha256::digest(&inner);
        let x = from_be(&outer[..version.bytes()]);
        inner.as_mut_slice().zeroize();
        outer.as_mut_slice().zeroize();
        if x < version.order() {
            return x;
        }
        pad.push(0);
    }
}

/// One decoded compact share.
#[derive(Clone, PartialEq, Eq)]
pub struct CompactShare {
    threshold: u32,
    index: u32,
    value: u128,
}

impl std::fmt::Debug for CompactShare {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompactShare")
            .field("threshold", &self.threshold)
            .field("index", &self.index)
            .finish()
    }
}

impl Drop for CompactShare {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}

impl CompactShare {
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// Decodes `bytes`, which must be exactly `version.share_len()` long
    /// and carry a value below the order.
    pub fn parse(version: CompactVersion, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != version.share_len() {
            return Err(Error::InvalidShare);
        }
        let value = from_be(&bytes[1..]);
        if value >= version.order() {
            return Err(Error::InvalidShare);
        }
        Ok(CompactShare {
            threshold: from_nibble(bytes[0] >> 4),
            index: from_nibble(bytes[0] & 0x0f),
            value,
        })
    }

    pub fn to_bytes(&self, version: CompactVersion) -> Vec<u8> {
        let mut out = Vec::with_capacity(version.share_len());
        out.push(to_nibble(self.threshold) << 4 | to_nibble(self.index));
        out.extend_from_slice(&to_be(self.value, version.bytes()));
        out
    }
}

/// Splits a `version.bytes()`-long secret into `shares` compact shares,
/// any `threshold` of which recover it.
pub fn split(version: CompactVersion, secret: &[u8], threshold: u32, shares: u32) -> Result<Vec<Vec<u8>>> {
    let want = version.bytes();
    if secret.len() < want {
        return Err(Error::InputTooShort { expected: want, actual: secret.len() });
    }
    if secret.len() > want {
        return Err(Error::InputTooLong { max: want, actual: secret.len() });
    }
    if threshold == 0 || threshold > shares || shares > MAX_SHARES {
        return Err(Error::InvalidThreshold { threshold, shares });
    }
    let p = version.modulus();
    let s = from_be(secret);
    if s >= p.0 {
        return Err(Error::SecretOutOfRange);
    }

    let mut coefficients = Zeroizing::new(vec![s]);
    for i in 1..threshold {
        coefficients.push(coefficient(version, secret, threshold as u8, (i - 1) as u8));
    }

    debug!(bits = version.bits(), threshold, shares, "compact split");

    let out = (1..=shares)
        .map(|index| {
            let x = u128::from(index);
            let value = coefficients.iter().rev().fold(0, |y, &c| p.add(p.mul(y, x), c));
            CompactShare { threshold, index, value }.to_bytes(version)
        })
        .collect();
    Ok(out)
}

/// Recovers the secret from compact shares.
///
/// The threshold is read from the first share, and exactly that many
/// shares are taken from `shares`; any further items are not read.
pub fn combine<I>(version: CompactVersion, shares: I) -> Result<Zeroizing<Vec<u8>>>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let mut source = shares.into_iter();
    let first = match source.next() {
        Some(bytes) => CompactShare::parse(version, bytes.as_ref())?,
        None => return Err(Error::MissingShare { number: 1, threshold: 1 }),
    };
    let threshold = first.threshold;

    let mut points = vec![first];
    while points.len() < threshold as usize {
        let number = points.len() as u32 + 1;
        let bytes = source.next().ok_or(Error::MissingShare { number, threshold })?;
        let share = CompactShare::parse(version, bytes.as_ref())?;
        if share.threshold != threshold {
            return Err(Error::DifferentThresholds { expected: threshold, actual: share.threshold });
        }
        if points.iter().any(|p| p.index == share.index) {
            return Err(Error::SharesInconsistent);
        }
        points.push(share);
    }

    // Lagrange interpolation at zero
    let p = version.modulus();
    let mut secret = 0;
    for (j, pj) in points.iter().enumerate() {
        let mut num = 1;
        let mut den = 1;
        for (k, pk) in points.iter().enumerate() {
            if j != k {
                let xj = u128::from(pj.index);
                let xk = u128::from(pk.index);
                num = p.mul(num, p.sub(0, xk));
                den = p.mul(den, p.sub(xj, xk));
            }
        }
        let term = p.mul(p.mul(pj.value, num), p.invert(den));
        secret = p.add(secret, term);
    }

    let out = to_be(secret, version.bytes());
    secret.zeroize();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(s: &str) -> Vec<u8> {
        hex::decode(s).unwrap()
    }

    #[test]
    fn orders_fit_their_width() {
        for &v in [CompactVersion::Compact96, CompactVersion::Compact104, CompactVersion::Compact128].iter() {
            let bits = 128 - v.order().leading_zeros();
            assert_eq!(bits, v.bits());
        }
    }

    #[test]
    fn modular_arithmetic() {
        let p = CompactVersion::Compact128.modulus();
        let big = p.0 - 1;
        assert_eq!(p.add(big, big), p.0 - 2);
        assert_eq!(p.mul(big, big), 1);
        assert_eq!(p.sub(3, 5), p.0 - 2);
        for &a in [2u128, 12345, big, 0xdead_beef_cafe].iter() {
            assert_eq!(p.mul(a, p.invert(a)), 1);
        }
    }

    #[test]
    fn coefficients_are_hash_derived() {
        let secret: Vec<u8> = (1..=12).collect();
        assert_eq!(
            coefficient(CompactVersion::Compact96, &secret, 2, 0),
            28_125_694_137_483_536_111_145_467_527
        );
    }

    #[test]
    fn known_shares_96() {
        let secret: Vec<u8> = (1..=12).collect();
        let shares = split(CompactVersion::Compact96, &secret, 2, 3).unwrap();
        assert_eq!(
            shares,
            vec![
                h("215be30a6a5882d7cf1d344993"),
                h("22b6c411d0abffa896315e881a"),
                h("2311a51936ff7c795d4588c6b2"),
            ]
        );
        let back = combine(CompactVersion::Compact96, vec![&shares[2], &shares[0]]).unwrap();
        assert_eq!(&back[..], &secret[..]);
    }

    #[test]
    fn known_shares_104() {
        let shares = split(CompactVersion::Compact104, b"thirteen byte", 3, 5).unwrap();
        assert_eq!(shares[0], h("311fc3c545c28d7e371eadc4ef0e"));
        assert_eq!(shares[4], h("35080c31e1bfe8c2a269c28b3c0a"));
        let back = combine(CompactVersion::Compact104, vec![&shares[4], &shares[1], &shares[2]]).unwrap();
        assert_eq!(&back[..], b"thirteen byte");
    }

    #[test]
    fn sixteen_of_sixteen() {
        let secret = h("00112233445566778899aabbccddeeff");
        let shares = split(CompactVersion::Compact128, &secret, 16, 16).unwrap();
        assert_eq!(shares[0], h("01372e8efe384c9d9ebceb7ab6d5846618"));
        // threshold 16 and index 16 both encode as nibble 0
        assert_eq!(shares[15], h("00f8554b4e0b7416c877d5732805987d83"));
        let back = combine(CompactVersion::Compact128, shares.iter().rev()).unwrap();
        assert_eq!(&back[..], &secret[..]);
    }

    #[test]
    fn threshold_one_shares_carry_the_secret() {
        let secret: Vec<u8> = (1..=12).collect();
        let shares = split(CompactVersion::Compact96, &secret, 1, 2).unwrap();
        assert_eq!(shares[0], h("110102030405060708090a0b0c"));
        assert_eq!(shares[1], h("120102030405060708090a0b0c"));
        assert_eq!(&combine(CompactVersion::Compact96, vec![&shares[1]]).unwrap()[..], &secret[..]);
    }

    #[test]
    fn split_rejects_bad_input() {
        let v = CompactVersion::Compact96;
        assert!(matches!(split(v, &[1; 11], 2, 3), Err(Error::InputTooShort { expected: 12, actual: 11 })));
        assert!(matches!(split(v, &[1; 13], 2, 3), Err(Error::InputTooLong { max: 12, actual: 13 })));
        assert!(matches!(split(v, &[0xff; 12], 2, 3), Err(Error::SecretOutOfRange)));
        assert!(matches!(split(v, &[1; 12], 2, 17), Err(Error::InvalidThreshold { .. })));
        assert!(matches!(split(v, &[1; 12], 4, 3), Err(Error::InvalidThreshold { .. })));
        assert!(matches!(split(v, &[1; 12], 0, 3), Err(Error::InvalidThreshold { .. })));
    }

    #[test]
    fn combine_rejects_bad_share_sets() {
        let v = CompactVersion::Compact104;
        let three = split(v, b"thirteen byte", 3, 4).unwrap();
        let two = split(v, b"thirteen byte", 2, 4).unwrap();

        let none: Vec<Vec<u8>> = Vec::new();
        assert!(matches!(combine(v, none), Err(Error::MissingShare { number: 1, .. })));
        assert!(matches!(
            combine(v, &three[..2]),
            Err(Error::MissingShare { number: 3, threshold: 3 })
        ));
        assert!(matches!(
            combine(v, vec![&three[0], &two[1], &three[2]]),
            Err(Error::DifferentThresholds { expected: 3, actual: 2 })
        ));
        assert!(matches!(
            combine(v, vec![&three[0], &three[0], &three[2]]),
            Err(Error::SharesInconsistent)
        ));
        assert!(matches!(combine(v, vec![&three[0][..5]]), Err(Error::InvalidShare)));

        let mut over = three[0].clone();
        for b in over[1..].iter_mut() {
            *b = 0xff;
        }
        assert!(matches!(CompactShare::parse(v, &over), Err(Error::InvalidShare)));
    }

    #[test]
    fn share_debug_hides_value() {
        let s = CompactShare::parse(CompactVersion::Compact96, &h("215be30a6a5882d7cf1d344993")).unwrap();
        assert_eq!(s.threshold(), 2);
        assert_eq!(s.index(), 1);
        assert_eq!(format!("{:?}", s), "CompactShare { threshold: 2, index: 1 }");
    }
}
