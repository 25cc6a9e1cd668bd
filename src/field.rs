// Shamir A., How to Share a Secret,
// Communications of the ACM, 22, 1979, pp. 612--613.
//
// Licensed under the GPL-2.0-or-later OR LGPL-2.0-or-later.

//! Arithmetic in GF(2^deg) for deg = 8, 16, ..., 1024.
//!
//! Elements are polynomials over GF(2) of degree below `deg`, stored as
//! fixed-width little-endian limb arrays wide enough for the largest field
//! plus one overflow bit (the modulus itself has bit `deg` set). The
//! reduction polynomials are the ones used by the `ssss` tool, so shares
//! produced here interoperate with it bit for bit.

use std::fmt;
use std::ops::BitXorAssign;

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{Error, Result};

/// Largest supported field degree, in bits.
pub const MAX_DEGREE: u32 = 1024;

const LIMB_BITS: usize = 64;
const LIMBS: usize = MAX_DEGREE as usize / LIMB_BITS + 1;

/// Largest element encoding accepted by [`FieldElement::from_be_bytes`].
pub const MAX_BYTES: usize = MAX_DEGREE as usize / 8;

// Middle exponents of the irreducible trinomial/pentanomial
// x^deg + x^a + x^b + x^c + 1 for deg = 8 * (row + 1).
#[rustfmt::skip]
const IRRED_COEFF: [[u16; 3]; 128] = [
    [4, 3, 1], [5, 3, 1], [4, 3, 1], [7, 3, 2],
    [5, 4, 3], [5, 3, 2], [7, 4, 2], [4, 3, 1],
    [10, 9, 3], [9, 4, 2], [7, 6, 2], [10, 9, 6],
    [4, 3, 1], [5, 4, 3], [4, 3, 1], [7, 2, 1],
    [5, 3, 2], [7, 4, 2], [6, 3, 2], [5, 3, 2],
    [15, 3, 2], [11, 3, 2], [9, 8, 7], [7, 2, 1],
    [5, 3, 2], [9, 3, 1], [7, 3, 1], [9, 8, 3],
    [9, 4, 2], [8, 5, 3], [15, 14, 10], [10, 5, 2],
    [9, 6, 2], [9, 3, 2], [9, 5, 2], [11, 10, 1],
    [7, 3, 2], [11, 2, 1], [9, 7, 4], [4, 3, 1],
    [8, 3, 1], [7, 4, 1], [7, 2, 1], [13, 11, 6],
    [5, 3, 2], [7, 3, 2], [8, 7, 5], [12, 3, 2],
    [13, 10, 6], [5, 3, 2], [5, 3, 2], [9, 5, 2],
    [9, 7, 2], [13, 4, 3], [4, 3, 1], [11, 6, 4],
    [18, 9, 6], [19, 18, 13], [11, 3, 2], [15, 9, 6],
    [4, 3, 1], [16, 5, 2], [15, 14, 6], [8, 5, 2],
    [15, 11, 2], [11, 6, 2], [7, 5, 3], [8, 3, 1],
    [19, 16, 9], [11, 9, 6], [15, 7, 6], [13, 4, 3],
    [14, 13, 3], [13, 6, 3], [9, 5, 2], [19, 13, 6],
    [19, 10, 3], [11, 6, 5], [9, 2, 1], [14, 3, 2],
    [13, 3, 1], [7, 5, 4], [11, 9, 8], [11, 6, 5],
    [23, 16, 9], [19, 14, 6], [23, 10, 2], [8, 3, 2],
    [5, 4, 3], [9, 6, 4], [4, 3, 2], [13, 8, 6],
    [13, 11, 1], [13, 10, 3], [11, 6, 5], [19, 17, 4],
    [15, 14, 7], [13, 9, 6], [9, 7, 3], [9, 7, 1],
    [14, 3, 2], [11, 8, 2], [11, 6, 4], [13, 5, 2],
    [11, 5, 1], [11, 4, 1], [19, 10, 3], [21, 10, 6],
    [13, 3, 1], [15, 7, 5], [19, 18, 10], [7, 5, 3],
    [12, 7, 2], [7, 5, 1], [14, 9, 6], [10, 3, 2],
    [15, 13, 12], [12, 11, 9], [16, 9, 7], [12, 9, 3],
    [9, 5, 2], [17, 10, 6], [24, 9, 3], [17, 15, 13],
    [5, 4, 3], [19, 17, 8], [15, 6, 3], [19, 6, 1],
];

/// An element of GF(2^deg), independent of any particular `deg`.
///
/// Which field an element belongs to is tracked by the [`Field`] it is used
/// with; the element itself only guarantees exact bit positions. Values are
/// wiped from memory when dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct FieldElement {
    limbs: [u64; LIMBS],
}

impl FieldElement {
    pub fn zero() -> Self {
        FieldElement { limbs: [0; LIMBS] }
    }

    pub fn one() -> Self {
        Self::from_u64(1)
    }

    pub fn from_u64(v: u64) -> Self {
        let mut x = Self::zero();
        x.limbs[0] = v;
        x
    }

    /// Reads a big-endian byte string.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is longer than [`MAX_BYTES`].
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        assert!(
            bytes.len() <= MAX_BYTES,
            "element encoding longer than {} bytes",
            MAX_BYTES
        );
        let mut x = Self::zero();
        for (i, &b) in bytes.iter().rev().enumerate() {
            x.limbs[i / 8] |= u64::from(b) << (8 * (i % 8));
        }
        x
    }

    /// Big-endian encoding in exactly `len` bytes. Bits above `8 * len` are
    /// not represented.
    pub fn to_be_bytes(&self, len: usize) -> Zeroizing<Vec<u8>> {
        let mut out = Zeroizing::new(vec![0u8; len]);
        for i in 0..len.min(LIMBS * 8) {
            out[len - 1 - i] = (self.limbs[i / 8] >> (8 * (i % 8))) as u8;
        }
        out
    }

    pub fn is_zero(&self) -> bool {
        self.limbs.iter().all(|&l| l == 0)
    }

    pub fn is_one(&self) -> bool {
        self.limbs[0] == 1 && self.limbs[1..].iter().all(|&l| l == 0)
    }

    pub fn bit(&self, i: usize) -> bool {
        i < LIMBS * LIMB_BITS && (self.limbs[i / LIMB_BITS] >> (i % LIMB_BITS)) & 1 == 1
    }

    fn set_bit(&mut self, i: usize) {
        self.limbs[i / LIMB_BITS] |= 1 << (i % LIMB_BITS);
    }

    /// Position of the highest set bit plus one, zero for the zero element.
    /// This is the "size" the inversion routine compares, not the numeric
    /// magnitude.
    pub fn bits(&self) -> usize {
        for (i, &l) in self.limbs.iter().enumerate().rev() {
            if l != 0 {
                return i * LIMB_BITS + (LIMB_BITS - l.leading_zeros() as usize);
            }
        }
        0
    }

    fn shl1(&mut self) {
        let mut carry = 0;
        for l in self.limbs.iter_mut() {
            let next = *l >> (LIMB_BITS - 1);
            *l = (*l << 1) | carry;
            carry = next;
        }
    }

    fn shl(&self, n: usize) -> Self {
        let mut out = Self::zero();
        let (words, bits) = (n / LIMB_BITS, n % LIMB_BITS);
        for i in (words..LIMBS).rev() {
            let src = i - words;
            let mut l = self.limbs[src] << bits;
            if bits != 0 && src > 0 {
                l |= self.limbs[src - 1] >> (LIMB_BITS - bits);
            }
            out.limbs[i] = l;
        }
        out
    }
}

impl BitXorAssign<&FieldElement> for FieldElement {
    fn bitxor_assign(&mut self, rhs: &FieldElement) {
        for (l, r) in self.limbs.iter_mut().zip(rhs.limbs.iter()) {
            *l ^= r;
        }
    }
}

// Elements hold secrets and polynomial coefficients, so `{:?}` never
// shows the value. Hex output has to be asked for with `{:x}`.
impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldElement(..)")
    }
}

impl fmt::LowerHex for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str("0x")?;
        }
        let top = self.bits().saturating_sub(1) / LIMB_BITS;
        write!(f, "{:x}", self.limbs[top])?;
        for l in self.limbs[..top].iter().rev() {
            write!(f, "{:016x}", l)?;
        }
        Ok(())
    }
}

/// GF(2^deg) for one fixed `deg`, with its reduction polynomial.
#[derive(Clone, Debug)]
pub struct Field {
    degree: u32,
    modulus: FieldElement,
}

impl Field {
    /// True iff `degree` is a multiple of 8 in `8..=1024`.
    pub fn valid(degree: u32) -> bool {
        degree >= 8 && degree <= MAX_DEGREE && degree % 8 == 0
    }

    pub fn new(degree: u32) -> Result<Self> {
        if !Self::valid(degree) {
            return Err(Error::InvalidSecurityLevel(degree));
        }
        let mut modulus = FieldElement::zero();
        modulus.set_bit(degree as usize);
        for &e in IRRED_COEFF[(degree / 8 - 1) as usize].iter() {
            modulus.set_bit(e as usize);
        }
        modulus.set_bit(0);
        Ok(Field { degree, modulus })
    }

    pub fn degree(&self) -> u32 {
        self.degree
    }

    /// Size of an element in bytes.
    pub fn bytes(&self) -> usize {
        self.degree as usize / 8
    }

    /// Size of an element in hex digits.
    pub fn hex_digits(&self) -> usize {
        self.degree as usize / 4
    }

    pub fn modulus(&self) -> &FieldElement {
        &self.modulus
    }

    /// Whether `x` is a reduced element of this field.
    pub fn contains(&self, x: &FieldElement) -> bool {
        x.bits() <= self.degree as usize
    }

    pub fn add(&self, x: &FieldElement, y: &FieldElement) -> FieldElement {
        let mut z = x.clone();
        z ^= y;
        z
    }

    /// Shift-and-add multiplication, reducing after every shift.
    pub fn mult(&self, x: &FieldElement, y: &FieldElement) -> FieldElement {
        let deg = self.degree as usize;
        let mut b = x.clone();
        let mut z = if y.bit(0) { b.clone() } else { FieldElement::zero() };
        for i in 1..deg {
            b.shl1();
            if b.bit(deg) {
                b ^= &self.modulus;
            }
            if y.bit(i) {
                z ^= &b;
            }
        }
        z
    }

    /// `x^n` by square-and-multiply.
    pub fn pow(&self, x: &FieldElement, mut n: u32) -> FieldElement {
        let mut base = x.clone();
        let mut acc = FieldElement::one();
        while n > 0 {
            if n & 1 == 1 {
                acc = self.mult(&acc, &base);
            }
            base = self.mult(&base, &base);
            n >>= 1;
        }
        acc
    }

    /// Multiplicative inverse by the extended Euclidean algorithm over
    /// GF(2)[x].
    ///
    /// # Panics
    ///
    /// Panics if `x` is zero.
    pub fn invert(&self, x: &FieldElement) -> FieldElement {
        assert!(!x.is_zero(), "zero has no inverse");
        let mut u = x.clone();
        let mut v = self.modulus.clone();
        let mut z = FieldElement::one();
        let mut g = FieldElement::zero();
        while !u.is_one() {
            let (bu, bv) = (u.bits(), v.bits());
            let shift = if bu < bv {
                std::mem::swap(&mut u, &mut v);
                std::mem::swap(&mut z, &mut g);
                bv - bu
            } else {
                bu - bv
            };
            u ^= &v.shl(shift);
            z ^= &g.shl(shift);
        }
        z
    }
}
