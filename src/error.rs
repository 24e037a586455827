//! Errors produced while parsing positions and generating keys.

/// Everything that can go wrong in this crate. Both kinds are final: a
/// malformed FEN stays malformed and a missing entropy source is not something
/// a retry would fix, so the caller decides what to do with them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input could not be interpreted as a FEN: too few fields or a field
    /// holding symbols outside of its alphabet.
    #[error("malformed FEN: {0}")]
    MalformedFen(String),
    /// The cryptographically secure random generator could not supply bits
    /// for the key tables.
    #[error("random source is unavailable")]
    RandomSourceUnavailable(#[source] rand::Error),
}

/// Shorthand for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Returns early with [`Error::MalformedFen`] built from a format string.
macro_rules! malformed {
    ($($arg:tt)*) => {
        return Err($crate::error::Error::MalformedFen(format!($($arg)*)))
    };
}

pub(crate) use malformed;
