use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use fenhash::session::{OutputFormat, Session};
use fenhash::KeyStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger};

/// Computes Zobrist hashes of chess positions given in FEN.
///
/// Positions are taken from the arguments or, if there are none, read from the
/// standard input one per line.
#[derive(Parser, Debug)]
#[command(version = fenhash::version(), about)]
struct Args {
    /// Positions to hash. Each one has to be quoted as a single argument.
    #[arg(value_name = "FEN")]
    fens: Vec<String>,

    /// How hashes are printed.
    #[arg(long, value_enum, default_value_t = OutputFormat::Hex)]
    format: OutputFormat,

    /// Generates the keys from a seeded generator instead of the system
    /// entropy source, which makes hashes reproducible between runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Verbosity: off, error, warn, info, debug or trace.
    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,

    /// Writes the log to this file instead of the standard error.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(args: &Args) -> anyhow::Result<()> {
    match &args.log_file {
        Some(path) => WriteLogger::init(
            args.log_level,
            Config::default(),
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => TermLogger::init(
            args.log_level,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
    }
    .context("installing logger")
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;
    log::info!("fenhash {}", fenhash::version());

    let keys = match args.seed {
        Some(seed) => {
            log::info!("Generating keys from seed {seed}");
            KeyStore::from_rng(&mut StdRng::seed_from_u64(seed))
        },
        None => KeyStore::generate(),
    }
    .context("generating Zobrist keys")?;

    let stdout = io::stdout();
    let mut session = Session::new(&keys, BufWriter::new(stdout.lock()), args.format);
    if args.fens.is_empty() {
        session.run(io::stdin().lock())
    } else {
        for fen in &args.fens {
            session.hash(fen)?;
        }
        session.into_output().flush().context("flushing output")
    }
}
