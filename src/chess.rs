//! Chess notions needed to read a position: board primitives and the FEN
//! fields that feed the hash.

pub mod core;
pub mod fen;
