// An implementation of secret sharing from
//
// Shamir A.,
// How to Share a Secret,
// Communications of the ACM, 22, 1979, pp. 612--613.
//
// Shares are computed over GF(2^n) for n = 8, 16, ..., 1024 and use the
// same field polynomials, diffusion layer and line format as ssss
// (B. Poettering, 2005, 2006), so shares move freely between the two.
//
// Licensed under the GPL-2.0-or-later OR LGPL-2.0-or-later.

//! Shamir's Secret Sharing Scheme over binary Galois fields.
//!
//! A secret of `n` bits is read as one element of GF(2^n) and hidden in
//! the constant term of a random polynomial; any `threshold` evaluations
//! of that polynomial recover it, fewer reveal nothing.
//!
//! ```no_run
//! use ssss::{combine, split, CombineConfig, DevRandom, SplitConfig};
//!
//! let config = SplitConfig::new(3, 5);
//! let shares: Vec<String> = split("password", &config, &mut DevRandom::urandom())?
//!     .map(|line| line.text)
//!     .collect();
//!
//! let secret = combine(&shares[1..4], &CombineConfig::new(3))?;
//! assert_eq!(&*secret, "password");
//! # Ok::<(), ssss::Error>(())
//! ```
//!
//! Modules, leaf to root:
//!
//! - [`field`]: GF(2^n) arithmetic on fixed-width elements
//! - [`random`]: where coefficient randomness comes from
//! - [`diffusion`]: optional keyless whitening of the secret
//! - [`poly`]: Horner evaluation
//! - [`solver`]: Gaussian elimination over the Vandermonde system
//! - [`secret`], [`share`]: text formats
//! - [`mod@split`], [`mod@combine`]: the two operations
//! - [`compact`]: a separate fixed-size scheme over prime fields

pub mod combine;
pub mod compact;
pub mod diffusion;
pub mod error;
pub mod field;
pub mod poly;
pub mod random;
pub mod secret;
pub mod share;
pub mod solver;
pub mod split;

pub use crate::combine::{combine, CombineConfig};
pub use crate::compact::{CompactShare, CompactVersion};
pub use crate::error::{Error, ErrorCategory, Result};
pub use crate::field::{Field, FieldElement, MAX_DEGREE};
pub use crate::random::{DevRandom, FixedBytes, RandomSource, RngSource};
pub use crate::secret::Encoding;
pub use crate::share::{Share, MAX_LINE_LEN, MAX_TOKEN_LEN};
pub use crate::split::{split, split_into, ShareLine, ShareSink, ShareStream, SplitConfig};
