// Shamir A., How to Share a Secret,
// Communications of the ACM, 22, 1979, pp. 612--613.
//
// Licensed under the GPL-2.0-or-later OR LGPL-2.0-or-later.

//! Polynomials over GF(2^deg).

use crate::field::{Field, FieldElement};

/// `c[0] + c[1] x + ... + c[k] x^k`, lowest coefficient first.
///
/// Coefficients are wiped when the polynomial is dropped.
#[derive(Clone, Debug)]
pub struct Polynomial {
    coefficients: Vec<FieldElement>,
}

impl Polynomial {
    pub fn new(coefficients: Vec<FieldElement>) -> Self {
        Polynomial { coefficients }
    }

    pub fn coefficients(&self) -> &[FieldElement] {
        &self.coefficients
    }

    /// Horner evaluation, from the highest coefficient down. The empty
    /// polynomial evaluates to zero.
    pub fn evaluate(&self, field: &Field, x: &FieldElement) -> FieldElement {
        let mut acc = FieldElement::zero();
        for c in self.coefficients.iter().rev() {
            acc = field.mult(&acc, x);
            acc ^= c;
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(v: u64) -> FieldElement {
        FieldElement::from_u64(v)
    }

    #[test]
    fn constant_and_empty() {
        let f = Field::new(8).unwrap();
        assert!(Polynomial::new(vec![]).evaluate(&f, &e(5)).is_zero());
        assert_eq!(Polynomial::new(vec![e(0x41)]).evaluate(&f, &e(9)), e(0x41));
    }

    #[test]
    fn matches_naive_sum() {
        let f = Field::new(8).unwrap();
        let p = Polynomial::new(vec![e(0x41), e(0x01), e(0x57), e(0x83)]);
        for x in 1..20u64 {
            let x = e(x);
            let mut power = FieldElement::one();
            let mut sum = FieldElement::zero();
            for c in p.coefficients() {
                sum ^= &f.mult(c, &power);
                power = f.mult(&power, &x);
            }
            assert_eq!(p.evaluate(&f, &x), sum);
        }
    }

    #[test]
    fn linear_in_gf256() {
        // 0x41 + x, addition is xor
        let f = Field::new(8).unwrap();
        let p = Polynomial::new(vec![e(0x41), e(0x01)]);
        assert_eq!(p.evaluate(&f, &e(1)), e(0x40));
        assert_eq!(p.evaluate(&f, &e(2)), e(0x43));
        assert_eq!(p.evaluate(&f, &e(3)), e(0x42));
    }
}
