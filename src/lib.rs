//! Zobrist hashing of chess positions serialized in [Forsyth-Edwards Notation]
//! (FEN).
//!
//! A position hash is a 64-bit fingerprint that is identical for identical
//! positions regardless of the move order that led to them. Search engines use
//! it to detect transpositions with a table lookup instead of comparing full
//! board states.
//!
//! The workflow is: build one [`KeyStore`] for the lifetime of the process and
//! hash any number of positions against it with [`compute_hash`].
//!
//! [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation

pub mod chess;
pub mod error;
pub mod session;
pub mod zobrist;

pub use error::{Error, Result};
use shadow_rs::shadow;
pub use zobrist::{compute_hash, Key, KeyStore, ZobristHash};

shadow!(build);

/// Returns the full version that can be used to identify how the binary was
/// built in the first place.
#[must_use]
pub fn version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}
