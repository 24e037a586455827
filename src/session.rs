//! Line-oriented front end: reads FENs from an input stream and writes one
//! hash per line.
//!
//! Besides FENs, two commands are understood:
//!
//! - `d` prints a summary of the key store in use.
//! - `quit` stops processing.
//!
//! Blank lines are skipped. A line that fails to parse produces an
//! `error: <reason>` line and the session continues with the next one.

use std::fmt;
use std::io::{self, BufRead, Write};

use anyhow::Context;

use crate::zobrist::{compute_hash, Key, KeyStore};

/// How hashes are printed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Zero-padded hexadecimal with `0x` prefix.
    #[default]
    Hex,
    /// Plain unsigned decimal.
    Decimal,
}

impl OutputFormat {
    #[allow(missing_docs)]
    #[must_use]
    pub fn render(self, hash: Key) -> String {
        match self {
            Self::Hex => format!("{hash:#018x}"),
            Self::Decimal => hash.to_string(),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hex => "hex",
            Self::Decimal => "decimal",
        })
    }
}

/// Hashes positions with one [`KeyStore`] and reports them to `output`.
pub struct Session<'a, W: Write> {
    keys: &'a KeyStore,
    output: W,
    format: OutputFormat,
}

impl<'a, W: Write> Session<'a, W> {
    /// Creates a session. All hashes it reports come from `keys` and are
    /// therefore comparable with each other.
    #[must_use]
    pub const fn new(keys: &'a KeyStore, output: W, format: OutputFormat) -> Self {
        Self {
            keys,
            output,
            format,
        }
    }

    /// Continuously reads `input` and processes each line until the stream
    /// ends or `quit` is received.
    ///
    /// # Errors
    ///
    /// Fails only on I/O errors: malformed positions and lines that are not
    /// valid UTF-8 are reported to the output and skipped.
    pub fn run<R: BufRead>(&mut self, input: R) -> anyhow::Result<()> {
        for line in input.lines() {
            // The bytes of an undecodable line are consumed, so reading can go on.
            let line = match line {
                Ok(line) => line,
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    log::warn!("Skipping line: {e}");
                    writeln!(self.output, "error: input is not valid UTF-8")?;
                    continue;
                },
                Err(e) => return Err(e).context("reading input"),
            };
            match line.trim() {
                "" => continue,
                "quit" => break,
                "d" => writeln!(self.output, "{:?}", self.keys)?,
                fen => self.hash(fen)?,
            }
        }
        self.output.flush().context("flushing output")
    }

    /// Hashes a single FEN and writes the result (or the reason it could not
    /// be hashed) as one line.
    ///
    /// # Errors
    ///
    /// Fails if writing to the output fails.
    pub fn hash(&mut self, fen: &str) -> anyhow::Result<()> {
        match compute_hash(fen, self.keys) {
            Ok(hash) => writeln!(self.output, "{}", self.format.render(hash))?,
            Err(e) => {
                log::warn!("Skipping \"{fen}\": {e}");
                writeln!(self.output, "error: {e}")?;
            },
        }
        Ok(())
    }

    /// Returns the output stream, e.g. to inspect what has been written.
    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    const STARTING: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn run(keys: &KeyStore, format: OutputFormat, input: &str) -> String {
        let mut session = Session::new(keys, Vec::new(), format);
        session.run(input.as_bytes()).unwrap();
        String::from_utf8(session.into_output()).unwrap()
    }

    fn keys() -> KeyStore {
        KeyStore::from_rng(&mut StdRng::seed_from_u64(2024)).unwrap()
    }

    #[test]
    fn hashes_every_line() {
        let keys = keys();
        let expected = compute_hash(STARTING, &keys).unwrap();
        let output = run(
            &keys,
            OutputFormat::Hex,
            &format!("{STARTING}\n\n  fen {STARTING}  \n"),
        );
        assert_eq!(
            output,
            format!("{expected:#018x}\n{expected:#018x}\n")
        );
    }

    #[test]
    fn decimal() {
        let keys = keys();
        let expected = compute_hash(STARTING, &keys).unwrap();
        assert_eq!(
            run(&keys, OutputFormat::Decimal, STARTING),
            format!("{expected}\n")
        );
    }

    #[test]
    fn errors_do_not_stop_the_session() {
        let keys = keys();
        let expected = compute_hash(STARTING, &keys).unwrap();
        let output = run(
            &keys,
            OutputFormat::Hex,
            &format!("8/8/8/8/8/8/8/8 w\n{STARTING}\n"),
        );
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("error: malformed FEN"), "{}", lines[0]);
        assert_eq!(lines[1], format!("{expected:#018x}"));
    }

    #[test]
    fn invalid_utf8_does_not_stop_the_session() {
        let keys = keys();
        let expected = compute_hash("8/8/8/8/8/8/8/8 w - -", &keys).unwrap();
        let mut session = Session::new(&keys, Vec::new(), OutputFormat::Hex);
        session
            .run(&b"\xff\xfe junk\n8/8/8/8/8/8/8/8 w - -\n"[..])
            .unwrap();
        let output = String::from_utf8(session.into_output()).unwrap();
        assert_eq!(
            output,
            format!("error: input is not valid UTF-8\n{expected:#018x}\n")
        );
    }

    #[test]
    fn commands() {
        let keys = keys();
        let output = run(&keys, OutputFormat::Hex, &format!("d\nquit\n{STARTING}\n"));
        assert_eq!(output, format!("{keys:?}\n"));
    }

    #[test]
    fn render() {
        assert_eq!(OutputFormat::Hex.render(255), "0x00000000000000ff");
        assert_eq!(OutputFormat::Decimal.render(255), "255");
        assert_eq!(OutputFormat::default(), OutputFormat::Hex);
    }
}
