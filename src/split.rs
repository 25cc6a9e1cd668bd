// Shamir A., How to Share a Secret,
// Communications of the ACM, 22, 1979, pp. 612--613.
//
// Licensed under the GPL-2.0-or-later OR LGPL-2.0-or-later.

//! Splitting a secret into share lines.
//!
//! The secret becomes the constant term of a random polynomial of degree
//! `threshold` whose leading coefficient is fixed at one, the form the
//! `ssss` tool uses. Share `i` is that polynomial evaluated at `i`.
//! Shares are produced lazily by a [`ShareStream`], so at most one
//! rendered share exists at a time.

use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::diffusion;
use crate::error::{Error, Result};
use crate::field::{Field, FieldElement};
use crate::poly::Polynomial;
use crate::random::{self, RandomSource};
use crate::secret::Encoding;
use crate::share::{Share, MAX_TOKEN_LEN};

/// Parameters of one split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitConfig {
    threshold: u32,
    shares: u32,
    security: u32,
    diffusion: bool,
    prefix: Option<String>,
    encoding: Encoding,
}

impl SplitConfig {
    /// `threshold` of `shares`, automatic security level, diffusion on,
    /// no prefix, ASCII secret.
    pub fn new(threshold: u32, shares: u32) -> Self {
        SplitConfig {
            threshold,
            shares,
            security: 0,
            diffusion: true,
            prefix: None,
            encoding: Encoding::Ascii,
        }
    }

    /// Field degree in bits; zero derives it from the secret's length.
    pub fn with_security(mut self, bits: u32) -> Self {
        self.security = bits;
        self
    }

    pub fn with_diffusion(mut self, diffusion: bool) -> Self {
        self.diffusion = diffusion;
        self
    }

    pub fn with_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn shares(&self) -> u32 {
        self.shares
    }

    pub fn security(&self) -> u32 {
        self.security
    }

    pub fn diffusion(&self) -> bool {
        self.diffusion
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    fn check(&self) -> Result<()> {
        if self.threshold == 0 || self.threshold > self.shares {
            return Err(Error::InvalidThreshold {
                threshold: self.threshold,
                shares: self.shares,
            });
        }
        if let Some(p) = &self.prefix {
            if p.len() > MAX_TOKEN_LEN {
                return Err(Error::TokenTooLong { len: p.len(), max: MAX_TOKEN_LEN });
            }
        }
        Ok(())
    }

    fn degree_for(&self, secret: &str) -> u32 {
        if self.security == 0 {
            self.encoding.auto_degree(secret)
        } else {
            self.security
        }
    }
}

/// One rendered share together with its position in the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLine {
    /// 1-based share number, which is also the share's index.
    pub number: u32,
    pub total: u32,
    pub text: String,
}

/// Lazily evaluates the split polynomial at `1..=total`.
///
/// The polynomial, including the secret, is wiped when the stream drops.
#[derive(Debug)]
pub struct ShareStream {
    field: Field,
    poly: Polynomial,
    prefix: Option<String>,
    width: usize,
    next: u64,
    total: u32,
}

impl ShareStream {
    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn total(&self) -> u32 {
        self.total
    }
}

impl Iterator for ShareStream {
    type Item = ShareLine;

    fn next(&mut self) -> Option<ShareLine> {
        if self.next > u64::from(self.total) {
            return None;
        }
        let number = self.next as u32;
        self.next += 1;

        let x = FieldElement::from_u64(u64::from(number));
        let y = self.poly.evaluate(&self.field, &x);
        let share = Share::new(number, y, self.field.degree());
        trace!(number, total = self.total, "share emitted");
        Some(ShareLine {
            number,
            total: self.total,
            text: share.format(self.prefix.as_deref(), self.width),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (u64::from(self.total) + 1 - self.next) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for ShareStream {}

/// Receives shares as they are produced.
pub trait ShareSink {
    fn accept(&mut self, share: ShareLine) -> Result<()>;
}

impl<F> ShareSink for F
where
    F: FnMut(ShareLine) -> Result<()>,
{
    fn accept(&mut self, share: ShareLine) -> Result<()> {
        self(share)
    }
}

/// Prepares the share polynomial for `secret` and returns the stream of
/// shares.
///
/// All validation and every random read happens here; iterating the
/// stream cannot fail.
pub fn split<R>(secret: &str, config: &SplitConfig, random: &mut R) -> Result<ShareStream>
where
    R: RandomSource + ?Sized,
{
    config.check()?;
    let field = Field::new(config.degree_for(secret))?;
    let threshold = config.threshold;
    let total = config.shares;
    if field.degree() < 32 && u64::from(total) >> field.degree() != 0 {
        return Err(Error::InvalidThreshold { threshold, shares: total });
    }

    let mut secret = config.encoding.import(&field, secret)?;
    if config.diffusion {
        secret = diffusion::encode(&field, &secret)?;
    }

    // grown as bytes arrive, never sized from the threshold up front
    let mut coefficients = vec![secret];

    random.open().map_err(Error::OpenRandom)?;
    let mut buf = Zeroizing::new(vec![0u8; field.bytes()]);
    for _ in 1..threshold {
        random::fill(random, &mut buf)?;
        coefficients.push(FieldElement::from_be_bytes(&buf));
    }
    random.close().map_err(Error::CloseRandom)?;

    // leading x^threshold term, as ssss evaluates it
    coefficients.push(FieldElement::one());

    debug!(
        degree = field.degree(),
        threshold,
        shares = total,
        diffusion = config.diffusion,
        "splitting secret"
    );

    Ok(ShareStream {
        width: Share::index_width(total),
        prefix: config.prefix.clone(),
        field,
        poly: Polynomial::new(coefficients),
        next: 1,
        total,
    })
}

/// Splits `secret` and hands every share to `sink` in order.
///
/// A sink error stops the run; shares already delivered must then be
/// discarded by the caller.
pub fn split_into<R, S>(secret: &str, config: &SplitConfig, random: &mut R, mut sink: S) -> Result<()>
where
    R: RandomSource + ?Sized,
    S: ShareSink,
{
    for share in split(secret, config, random)? {
        sink.accept(share)?;
    }
    Ok(())
}
