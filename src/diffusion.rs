// Shamir A., How to Share a Secret,
// Communications of the ACM, 22, 1979, pp. 612--613.
//
// Licensed under the GPL-2.0-or-later OR LGPL-2.0-or-later.

//! Keyless whitening of the secret before it is shared.
//!
//! A 64-bit XTEA-style block permutation is applied to overlapping 8-byte
//! windows of the secret, sliding by two bytes and wrapping around, for
//! 40 passes over the buffer. Every output bit ends up depending on every
//! input bit, so structure in the plaintext (ASCII text, say) is not
//! visible through a few leaked share bits.
//!
//! The byte layout matches the `ssss` tool: the element is exported as
//! 16-bit big-endian words, least significant word first.

use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::field::{Field, FieldElement};

/// Smallest field degree the permutation is defined for (one full block).
pub const MIN_DEGREE: u32 = 64;

const DELTA: u32 = 0x9E37_79B9;
const ROUNDS: u32 = 32;
const PASSES: usize = 40;

fn encipher_block(v: &mut [u32; 2]) {
    let mut sum: u32 = 0;
    for _ in 0..ROUNDS {
        v[0] = v[0].wrapping_add(((v[1] << 4 ^ v[1] >> 5).wrapping_add(v[1])) ^ sum);
        sum = sum.wrapping_add(DELTA);
        v[1] = v[1].wrapping_add(((v[0] << 4 ^ v[0] >> 5).wrapping_add(v[0])) ^ sum);
    }
}

fn decipher_block(v: &mut [u32; 2]) {
    let mut sum: u32 = DELTA.wrapping_mul(ROUNDS);
    for _ in 0..ROUNDS {
        v[1] = v[1].wrapping_sub(((v[0] << 4 ^ v[0] >> 5).wrapping_add(v[0])) ^ sum);
        sum = sum.wrapping_sub(DELTA);
        v[0] = v[0].wrapping_sub(((v[1] << 4 ^ v[1] >> 5).wrapping_add(v[1])) ^ sum);
    }
}

// Runs the block permutation on the 8 bytes at `idx`, wrapping at `data.len()`.
fn process_window(data: &mut [u8], idx: usize, block: fn(&mut [u32; 2])) {
    let len = data.len();
    let mut v = [0u32; 2];
    for (i, word) in v.iter_mut().enumerate() {
        for k in 0..4 {
            *word = *word << 8 | u32::from(data[(idx + 4 * i + k) % len]);
        }
    }
    block(&mut v);
    for (i, word) in v.iter().enumerate() {
        for k in 0..4 {
            data[(idx + 4 * i + k) % len] = (word >> (24 - 8 * k)) as u8;
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Direction {
    Encode,
    Decode,
}

fn process(field: &Field, x: &FieldElement, direction: Direction) -> Result<FieldElement> {
    let degree = field.degree();
    if degree < MIN_DEGREE {
        return Err(Error::SecurityLevelTooSmallForDiffusion(degree));
    }
    let len = field.bytes();
    let words = (degree as usize + 8) / 16;

    // 16-bit words, least significant first, each stored big-endian
    let be = x.to_be_bytes(2 * words);
    let mut v = Zeroizing::new(vec![0u8; 2 * words]);
    for w in 0..words {
        let src = 2 * (words - 1 - w);
        v[2 * w] = be[src];
        v[2 * w + 1] = be[src + 1];
    }

    // an odd byte count leaves the top word half empty: pull its data byte
    // down so the windows cover exactly `len` bytes
    let odd = degree % 16 == 8;
    if odd {
        v[len - 1] = v[len];
    }

    match direction {
        Direction::Encode => {
            for i in (0..PASSES * len).step_by(2) {
                process_window(&mut v[..len], i, encipher_block);
            }
        }
        Direction::Decode => {
            for i in (0..PASSES * len).step_by(2).rev() {
                process_window(&mut v[..len], i, decipher_block);
            }
        }
    }

    if odd {
        v[len] = v[len - 1];
        v[len - 1] = 0;
    }

    let mut out = Zeroizing::new(vec![0u8; 2 * words]);
    for w in 0..words {
        let dst = 2 * (words - 1 - w);
        out[dst] = v[2 * w];
        out[dst + 1] = v[2 * w + 1];
    }
    let y = FieldElement::from_be_bytes(&out);
    debug_assert!(field.contains(&y));
    Ok(y)
}

/// Whitens `x` before splitting.
pub fn encode(field: &Field, x: &FieldElement) -> Result<FieldElement> {
    process(field, x, Direction::Encode)
}

/// Inverse of [`encode`].
pub fn decode(field: &Field, x: &FieldElement) -> Result<FieldElement> {
    process(field, x, Direction::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_inverse() {
        let mut v = [0x0123_4567, 0x89ab_cdef];
        encipher_block(&mut v);
        assert_ne!(v, [0x0123_4567, 0x89ab_cdef]);
        decipher_block(&mut v);
        assert_eq!(v, [0x0123_4567, 0x89ab_cdef]);
    }

    #[test]
    fn decipher_starts_from_final_sum() {
        assert_eq!(DELTA.wrapping_mul(ROUNDS), 0xC6EF_3720);
    }

    #[test]
    fn window_wraps_around() {
        let mut data = [1u8, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        process_window(&mut data, 6, encipher_block);
        // window covers 6,7,8,9,0,1,2,3
        assert_eq!(&data[4..6], &[5, 6]);
        process_window(&mut data, 6, decipher_block);
        assert_eq!(data, [1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn rejects_small_fields() {
        let f = Field::new(56).unwrap();
        let err = encode(&f, &FieldElement::from_u64(5)).unwrap_err();
        assert!(matches!(err, Error::SecurityLevelTooSmallForDiffusion(56)));
        assert!(decode(&f, &FieldElement::from_u64(5)).is_err());
    }

    #[test]
    fn roundtrip_even_and_odd_byte_counts() {
        for &deg in [64u32, 72, 128, 136, 1016, 1024].iter() {
            let f = Field::new(deg).unwrap();
            let bytes: Vec<u8> = (0..f.bytes()).map(|i| (i * 7 + 3) as u8).collect();
            let x = FieldElement::from_be_bytes(&bytes);
            let y = encode(&f, &x).unwrap();
            assert!(f.contains(&y), "degree {}", deg);
            assert_ne!(x, y, "degree {}", deg);
            assert_eq!(decode(&f, &y).unwrap(), x, "degree {}", deg);
        }
    }

    fn hex_element(s: &str) -> FieldElement {
        FieldElement::from_be_bytes(&hex::decode(s).unwrap())
    }

    #[test]
    fn matches_ssss_output() {
        let cases = [
            (64, &b"password"[..], "f81672308394e7da"),
            (104, &b"correct horse"[..], "baffd590b39d57128347d7430f"),
            (64, &[0u8; 8][..], "afc8ceeae8ffade9"),
            (72, &[0u8; 9][..], "028f09dddb7b8e4424"),
        ];
        for &(deg, input, want) in cases.iter() {
            let f = Field::new(deg).unwrap();
            let x = FieldElement::from_be_bytes(input);
            let y = encode(&f, &x).unwrap();
            assert_eq!(y, hex_element(want), "degree {}", deg);
            assert_eq!(decode(&f, &y).unwrap(), x, "degree {}", deg);
        }
    }

    #[test]
    fn zero_does_not_stay_zero() {
        let f = Field::new(64).unwrap();
        assert!(!encode(&f, &FieldElement::zero()).unwrap().is_zero());
    }
}
