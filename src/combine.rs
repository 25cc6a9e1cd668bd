// Shamir A., How to Share a Secret,
// Communications of the ACM, 22, 1979, pp. 612--613.
//
// Licensed under the GPL-2.0-or-later OR LGPL-2.0-or-later.

//! Recovering a secret from `threshold` share lines.

use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::diffusion;
use crate::error::{Error, Result};
use crate::field::{Field, FieldElement};
use crate::secret::Encoding;
use crate::share::Share;
use crate::solver::LinearSystem;

/// Parameters of one combine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineConfig {
    threshold: u32,
    diffusion: bool,
    encoding: Encoding,
    capacity: Option<usize>,
}

impl CombineConfig {
    /// `threshold` shares, diffusion on, ASCII output, no size limit.
    pub fn new(threshold: u32) -> Self {
        CombineConfig {
            threshold,
            diffusion: true,
            encoding: Encoding::Ascii,
            capacity: None,
        }
    }

    pub fn with_diffusion(mut self, diffusion: bool) -> Self {
        self.diffusion = diffusion;
        self
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Longest secret, in characters, the caller can take.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn diffusion(&self) -> bool {
        self.diffusion
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}

fn next_share<I>(source: &mut I, number: u32, threshold: u32) -> Result<Share>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    let line = source.next().ok_or(Error::MissingShare { number, threshold })?;
    let share = Share::parse(line.as_ref())?;
    trace!(number, index = share.index(), "share read");
    Ok(share)
}

// The shares lie on x^t + c_{t-1} x^{t-1} + ... + c_0; moving the known
// x^t term to the right-hand side leaves a plain Vandermonde system.
fn point(field: &Field, share: &Share, threshold: u32) -> (FieldElement, FieldElement) {
    let x = share.x();
    let y = field.add(share.value(), &field.pow(&x, threshold));
    (x, y)
}

/// Pulls exactly `threshold` share lines from `shares` and reconstructs
/// the secret.
///
/// The field degree comes from the first share; every later share must
/// match it. Nothing is returned unless every step succeeds.
pub fn combine<I>(shares: I, config: &CombineConfig) -> Result<Zeroizing<String>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let threshold = config.threshold;
    if threshold == 0 {
        return Err(Error::InvalidThreshold { threshold, shares: 0 });
    }
    let mut source = shares.into_iter();

    let first = next_share(&mut source, 1, threshold)?;
    let field = Field::new(first.degree())?;
    // one point per share read; the matrix waits until all are in
    let mut points = vec![point(&field, &first, threshold)];
    drop(first);

    for number in 2..=threshold {
        let share = next_share(&mut source, number, threshold)?;
        if share.degree() != field.degree() {
            return Err(Error::DifferentSecurityLevels {
                expected: field.degree(),
                actual: share.degree(),
            });
        }
        points.push(point(&field, &share, threshold));
    }

    let mut system = LinearSystem::new(points.len());
    for (x, y) in points {
        system.push_point(&field, &x, y);
    }

    debug!(
        degree = field.degree(),
        threshold,
        diffusion = config.diffusion,
        "combining shares"
    );

    let mut secret = system.solve(&field)?;
    if config.diffusion {
        secret = diffusion::decode(&field, &secret)?;
    }

    let out = config.encoding.export(&field, &secret)?;
    if let Some(capacity) = config.capacity {
        if out.len() > capacity {
            return Err(Error::BufferTooSmall { needed: out.len(), capacity });
        }
    }
    Ok(out)
}
