// An implementation of key sharing from

// Shamir A.,
// How to Share a Secret,
// Communications of the ACM, 22, 1979, pp. 612--613.

// Shares are computed over GF(2^n), n a multiple of 8 up to 1024, and
// are line-compatible with ssss-split (B. Poettering, 2005, 2006).
//
// Licensed under the GPL-2.0-or-later OR LGPL-2.0-or-later.

// t = threshold (shares needed to recover the secret)
// n = number of shares

extern crate clap;
use clap::{value_t, App, Arg};

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

use ssss::{split_into, DevRandom, Encoding, ShareLine, SplitConfig, MAX_LINE_LEN};

fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let matches = App::new("shamir-split")
        .version("1.0")
        .author("Declan Malone <idablack@users.sourceforge.net>")
        .about("Shamir's Secret Sharing Scheme: split a secret into shares")
        .usage("echo secret | shamir-split -t threshold -n shares [-w token] [-s level] [-x] [-D]")
        .arg(Arg::with_name("threshold").short("t").takes_value(true).required(true)
             .help("number of shares needed to recover the secret"))
        .arg(Arg::with_name("shares").short("n").takes_value(true).required(true)
             .help("number of shares to generate"))
        .arg(Arg::with_name("token").short("w").takes_value(true)
             .help("label prepended to every share"))
        .arg(Arg::with_name("security").short("s").takes_value(true)
             .help("security level in bits (default: from secret length)"))
        .arg(Arg::with_name("hex").short("x").help("secret is given in hex"))
        .arg(Arg::with_name("no-diffusion").short("D").help("disable the diffusion layer"))
        .arg(Arg::with_name("quiet").short("q").help("no prompt"))
        .arg(Arg::with_name("random").long("random").takes_value(true)
             .help("random device to read (default /dev/random)"))
        .arg(Arg::with_name("verbose").short("v").multiple(true).help("log to stderr"))
        .get_matches();

    init_logging(matches.occurrences_of("verbose"));

    let threshold = value_t!(matches, "threshold", u32).unwrap_or_else(|e| e.exit());
    let shares = value_t!(matches, "shares", u32).unwrap_or_else(|e| e.exit());
    let security = if matches.is_present("security") {
        value_t!(matches, "security", u32).unwrap_or_else(|e| e.exit())
    } else {
        0
    };

    let mut config = SplitConfig::new(threshold, shares)
        .with_security(security)
        .with_diffusion(!matches.is_present("no-diffusion"))
        .with_encoding(Encoding::from_hex_flag(matches.is_present("hex")));
    if let Some(token) = matches.value_of("token") {
        config = config.with_prefix(token);
    }

    let mut random = match matches.value_of("random") {
        Some(path) => DevRandom::new(path),
        None => DevRandom::default(),
    };

    if !matches.is_present("quiet") {
        eprint!("Enter the secret: ");
        io::stderr().flush()?;
    }
    // must not reallocate: a freed buffer would keep an unwiped copy
    let mut secret = Zeroizing::new(String::with_capacity(MAX_LINE_LEN));
    io::stdin().lock().read_line(&mut secret).context("reading secret")?;
    let trimmed = secret.trim_end_matches(|c| c == '\r' || c == '\n');

    let stdout = io::stdout();
    let mut out = stdout.lock();
    split_into(trimmed, &config, &mut random, |line: ShareLine| -> ssss::Result<()> {
        writeln!(out, "{}", line.text)?;
        Ok(())
    })
    .context("split failed")?;
    out.flush()?;
    Ok(())
}
