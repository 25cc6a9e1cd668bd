// Shamir A., How to Share a Secret,
// Communications of the ACM, 22, 1979, pp. 612--613.
//
// Licensed under the GPL-2.0-or-later OR LGPL-2.0-or-later.

//! Sources of random coefficients.
//!
//! Splitting draws `threshold - 1` field elements from a [`RandomSource`].
//! The source is opened once, read until every coefficient is filled, and
//! closed again; a source that cannot deliver every requested byte fails
//! the split rather than leaving a coefficient partly filled.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use rand_core::{CryptoRng, RngCore};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Device read by default, as the `ssss` tool does.
pub const RANDOM_SOURCE: &str = "/dev/random";

/// Consecutive zero-length reads tolerated before a source counts as dry.
pub const MAX_EMPTY_READS: usize = 8;

/// A byte source with an explicit open/read/close lifecycle.
///
/// `read` has `std::io::Read` semantics: it may return fewer bytes than
/// requested, and `Ok(0)` means nothing was available.
pub trait RandomSource {
    fn open(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn open(&mut self) -> io::Result<()> {
        (**self).open()
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Fills `buf` completely, retrying short and interrupted reads.
///
/// On failure the source is closed before the error is returned.
pub fn fill<S: RandomSource + ?Sized>(source: &mut S, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0;
    let mut empty = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => {
                empty += 1;
                if empty >= MAX_EMPTY_READS {
                    let _ = source.close();
                    return Err(Error::ReadRandom(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!("random source dry after {} of {} bytes", filled, buf.len()),
                    )));
                }
            }
            Ok(n) => {
                filled += n;
                empty = 0;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => {
                let _ = source.close();
                return Err(Error::ReadRandom(e));
            }
        }
    }
    Ok(())
}

/// A random device file such as `/dev/random`.
#[derive(Debug)]
pub struct DevRandom {
    path: PathBuf,
    file: Option<File>,
}

impl DevRandom {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        DevRandom {
            path: path.as_ref().to_path_buf(),
            file: None,
        }
    }

    pub fn urandom() -> Self {
        Self::new("/dev/urandom")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for DevRandom {
    fn default() -> Self {
        Self::new(RANDOM_SOURCE)
    }
}

impl RandomSource for DevRandom {
    fn open(&mut self) -> io::Result<()> {
        debug!(path = %self.path.display(), "opening random source");
        self.file = Some(File::open(&self.path)?);
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.file.as_mut() {
            Some(f) => f.read(buf),
            None => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "random source not open",
            )),
        }
    }

    fn close(&mut self) -> io::Result<()> {
        // dropping the handle closes it; a second close is a no-op
        self.file.take();
        Ok(())
    }
}

/// Adapter for any `rand_core` cryptographic generator, e.g. `OsRng`.
#[derive(Debug)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: RngCore + CryptoRng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        RngSource { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: RngCore + CryptoRng> RandomSource for RngSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.rng
            .try_fill_bytes(buf)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        Ok(buf.len())
    }
}

/// Caller-supplied entropy, consumed front to back.
///
/// Running out is an ordinary read failure, so a buffer that is too short
/// makes the split fail instead of reusing bytes.
#[derive(Debug)]
pub struct FixedBytes<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> FixedBytes<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        FixedBytes { bytes, offset: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }
}

impl RandomSource for FixedBytes<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.remaining());
        buf[..n].copy_from_slice(&self.bytes[self.offset..self.offset + n]);
        self.offset += n;
        if n == 0 && !buf.is_empty() {
            warn!("fixed random buffer exhausted");
        }
        Ok(n)
    }
}
