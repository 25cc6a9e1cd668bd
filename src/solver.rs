// Shamir A., How to Share a Secret,
// Communications of the ACM, 22, 1979, pp. 612--613.
//
// Licensed under the GPL-2.0-or-later OR LGPL-2.0-or-later.

//! Recovering the constant coefficient from `t` points.
//!
//! Each point `(x, y)` contributes one column of descending powers
//! `x^(t-1), ..., x, 1` to a `t x t` matrix and `y` to the right-hand side.
//! Gaussian elimination over GF(2^deg) then leaves the constant term in the
//! last slot of the vector.
//!
//! The pivot search only looks along the current row, swapping columns
//! (and the matching right-hand entries). This is the order `ssss` uses and
//! is kept as is: a system it cannot pivot is reported inconsistent here too.

use tracing::debug;

use crate::error::{Error, Result};
use crate::field::{Field, FieldElement};

/// A Vandermonde-shaped system being filled one point at a time.
///
/// Every entry is wiped when the system is dropped.
#[derive(Debug)]
pub struct LinearSystem {
    size: usize,
    // a[row][column]; column i belongs to the i-th point
    a: Vec<Vec<FieldElement>>,
    b: Vec<FieldElement>,
}

impl LinearSystem {
    pub fn new(size: usize) -> Self {
        LinearSystem {
            size,
            a: vec![vec![FieldElement::zero(); size]; size],
            b: Vec::with_capacity(size),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of points added so far.
    pub fn len(&self) -> usize {
        self.b.len()
    }

    pub fn is_empty(&self) -> bool {
        self.b.is_empty()
    }

    /// Adds the column for a point at `x` with right-hand value `y`.
    ///
    /// # Panics
    ///
    /// Panics if the system already holds `size` points.
    pub fn push_point(&mut self, field: &Field, x: &FieldElement, y: FieldElement) {
        let i = self.b.len();
        assert!(i < self.size, "linear system is full");
        let t = self.size;
        self.a[t - 1][i] = FieldElement::one();
        for j in (0..t - 1).rev() {
            self.a[j][i] = field.mult(&self.a[j + 1][i], x);
        }
        self.b.push(y);
    }

    /// Eliminates and returns the constant term.
    ///
    /// Fails with [`Error::SharesInconsistent`] when no pivot can be found,
    /// which is what a repeated share index produces. Also fails if fewer
    /// than `size` points were pushed.
    pub fn solve(mut self, field: &Field) -> Result<FieldElement> {
        let n = self.size;
        if n == 0 || self.b.len() != n {
            return Err(Error::SharesInconsistent);
        }
        let a = &mut self.a;
        let b = &mut self.b;

        for i in 0..n {
            if a[i][i].is_zero() {
                let j = match (i + 1..n).find(|&j| !a[i][j].is_zero()) {
                    Some(j) => j,
                    None => {
                        debug!(row = i, size = n, "no pivot");
                        return Err(Error::SharesInconsistent);
                    }
                };
                for row in a[i..].iter_mut() {
                    row.swap(i, j);
                }
                b.swap(i, j);
            }
            for j in i + 1..n {
                if a[i][j].is_zero() {
                    continue;
                }
                for k in i + 1..n {
                    let h = field.mult(&a[k][i], &a[i][j]);
                    let mut t = field.mult(&a[k][j], &a[i][i]);
                    t ^= &h;
                    a[k][j] = t;
                }
                let h = field.mult(&b[i], &a[i][j]);
                let mut t = field.mult(&b[j], &a[i][i]);
                t ^= &h;
                b[j] = t;
            }
        }

        // the pivot check above guarantees a non-zero last pivot
        let inv = field.invert(&a[n - 1][n - 1]);
        Ok(field.mult(&b[n - 1], &inv))
    }
}
