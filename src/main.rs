use std::fmt::{self, Display};
use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::exit;
use std::thread::available_parallelism;

use clap::error::ErrorKind;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use md5rush::frame::{bytes_to_words, hunt, words_to_bytes};
use md5rush::{kernel, Engine, Error, LeadingZeros};

/// Hunt for a byte sequence whose MD5 digest starts with zero nibbles.
#[derive(Parser)]
#[command(name = "md5rush", version, about, long_about = None)]
struct Cli {
    /// Number of leading zero nibbles to look for
    #[arg(
        short,
        long,
        value_name = "ZEROS",
        value_parser = clap::value_parser!(u32).range(0..=32)
    )]
    zeros: u32,

    /// Number of threads to use (0: detect hardware concurrency)
    #[arg(short, long, value_name = "THREADS", default_value_t = 0)]
    threads: usize,

    /// File holding the prefix bytes
    #[arg(short, long, value_name = "PREFIXFILE")]
    prefix: Option<PathBuf>,

    /// File the winning byte sequence is written to
    #[arg(short, long, value_name = "OUTFILE")]
    output: Option<PathBuf>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            exit(0);
        }
        Err(err) => {
            eprint!("{err}");
            exit(1);
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("md5rush: {err}");
        exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let threads = match cli.threads {
        0 => available_parallelism()
            .map(NonZeroUsize::get)
            .map_err(|_| Error::UnknownConcurrency)?,
        n => n,
    };
    let pred = LeadingZeros::new(cli.zeros)?;

    let mut prefix = match &cli.prefix {
        Some(path) => {
            let bytes = fs::read(path).map_err(|source| Error::ReadPrefix {
                path: path.clone(),
                source,
            })?;
            bytes_to_words(&bytes)
        }
        None => Vec::new(),
    };

    println!("Using {threads} threads.");

    let engine = Engine::new(threads);
    let bar = ProgressBar::new_spinner().with_style(
        ProgressStyle::with_template("[{elapsed_precise}] {per_sec:.green} hashed {human_pos}")
            .unwrap(),
    );
    let count = hunt(&mut prefix, &engine, pred, &mut |n| bar.inc(n))?;
    bar.finish_and_clear();

    println!("Treasure Found!");
    println!("Treasure: {}", WordHex(&prefix));

    let bytes = words_to_bytes(&prefix);
    println!("Hash: {}", kernel::md5(&bytes));
    println!("Hash computed: {count}");

    if let Some(path) = &cli.output {
        fs::write(path, &bytes).map_err(|source| Error::WriteTreasure {
            path: path.clone(),
            source,
        })?;
        println!("Treasure saved to {}", path.display());
    }
    Ok(())
}

/// Words printed as the bytes they serialize to, two hex digits per byte.
struct WordHex<'a>(&'a [u32]);

impl Display for WordHex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for word in self.0 {
            write!(f, "{:08x}", word.swap_bytes())?;
        }
        Ok(())
    }
}
