// An implementation of key reconstruction from

// Shamir A.,
// How to Share a Secret,
// Communications of the ACM, 22, 1979, pp. 612--613.

// Reads share lines in the ssss format,
//
//   [token-]INDEX-HEXVALUE
//
// one per line on stdin, and prints the recovered secret. Exactly
// `threshold` lines are read; the field width is taken from the length of
// the first share's value and every other share must agree with it.
//
// Licensed under the GPL-2.0-or-later OR LGPL-2.0-or-later.

extern crate clap;
use clap::{value_t, App, Arg};

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

use ssss::{combine, CombineConfig, Encoding};

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
    let matches = App::new("shamir-combine")
        .version("1.0")
        .author("Declan Malone <idablack@users.sourceforge.net>")
        .about("Shamir's Secret Sharing Scheme: recover a secret from shares")
        .usage("cat share1 share2 ... | shamir-combine -t threshold [-x] [-D]")
        .arg(Arg::with_name("threshold").short("t").takes_value(true).required(true)
             .help("number of shares to read"))
        .arg(Arg::with_name("hex").short("x").help("print the secret in hex"))
        .arg(Arg::with_name("no-diffusion").short("D").help("shares were made without diffusion"))
        .arg(Arg::with_name("quiet").short("q").help("no prompt"))
        .arg(Arg::with_name("verbose").short("v").multiple(true).help("log to stderr"))
        .get_matches();

    init_logging(matches.occurrences_of("verbose"));

    let threshold = value_t!(matches, "threshold", u32).unwrap_or_else(|e| e.exit());
    let config = CombineConfig::new(threshold)
        .with_diffusion(!matches.is_present("no-diffusion"))
        .with_encoding(Encoding::from_hex_flag(matches.is_present("hex")));

    if !matches.is_present("quiet") {
        eprintln!("Enter {} shares separated by newlines:", threshold);
    }

    let stdin = io::stdin();
    let mut lines = Vec::new();
    for line in stdin.lock().lines().take(threshold as usize) {
        lines.push(Zeroizing::new(line.context("reading shares")?));
    }
    let secret = combine(lines.iter().map(|l| l.as_str()), &config).context("combine failed")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", &*secret)?;
    out.flush()?;
    Ok(())
}
