//! [Zobrist hashing] of chess positions.
//!
//! A [`KeyStore`] holds one random key per position feature: every (piece
//! kind, color, square) triple, Black to move, each of the 16 castling rights
//! combinations and each en passant file plus "no en passant". The hash of a
//! position is the XOR of the keys of its features, so two positions reached
//! by different move orders (transpositions) get the same hash.
//!
//! Hashes are only comparable when they were produced by the same
//! [`KeyStore`]. A store is immutable once built: generating a new one does not
//! touch the old one, but hashes computed with different stores have nothing
//! in common.
//!
//! ```
//! use fenhash::zobrist::{compute_hash, KeyStore};
//!
//! let keys = KeyStore::generate().expect("entropy source is available");
//! let hash = compute_hash(
//!     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
//!     &keys,
//! )
//! .unwrap();
//! assert_eq!(
//!     hash,
//!     compute_hash("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 5 17", &keys).unwrap()
//! );
//! ```
//!
//! [Zobrist hashing]: https://www.chessprogramming.org/Zobrist_Hashing

use std::fmt;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::chess::core::{CastleRights, Color, File, Piece, PieceKind, Square, BOARD_SIZE};
use crate::chess::fen::Fen;
use crate::error::{Error, Result};

/// Zobrist keys are 64-bit unsigned integers. Both the random table entries
/// and the resulting position hashes use this type.
pub type Key = u64;

const PIECE_KINDS: usize = PieceKind::ALL.len();
const COLORS: usize = 2;
const SQUARES: usize = BOARD_SIZE as usize;
const CASTLING_COMBINATIONS: usize = 16;
const EN_PASSANT_SLOTS: usize = 9;
/// Slot of the "no en passant target" key.
const NO_EN_PASSANT: usize = 8;

/// Total number of random keys in a [`KeyStore`].
pub const KEY_COUNT: usize =
    PIECE_KINDS * COLORS * SQUARES + 1 + CASTLING_COMBINATIONS + EN_PASSANT_SLOTS;

/// Random key tables for one hashing generation.
///
/// The store is read-only after construction and can be shared between
/// threads by reference or through an `Arc`.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyStore {
    pieces: Box<[[[Key; SQUARES]; COLORS]; PIECE_KINDS]>,
    side_to_move: Key,
    castling: [Key; CASTLING_COMBINATIONS],
    en_passant: [Key; EN_PASSANT_SLOTS],
}

impl KeyStore {
    /// Builds a new generation of keys from the operating system's
    /// cryptographically secure random number generator.
    ///
    /// Every call produces an unrelated generation: hashes computed with the
    /// previous store can not be compared to hashes computed with this one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RandomSourceUnavailable`] if the system entropy source
    /// can not be read.
    pub fn generate() -> Result<Self> {
        let keys = Self::from_rng(&mut OsRng)?;
        log::debug!("Generated {KEY_COUNT} Zobrist keys from the system entropy source");
        Ok(keys)
    }

    /// Builds a generation of keys drawing from `rng`.
    ///
    /// The tables are filled in a fixed order: piece keys by kind, color and
    /// square, then the side to move key, the castling keys and the en passant
    /// keys. Seeding the same generator the same way reproduces the store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RandomSourceUnavailable`] if `rng` fails to produce
    /// random bytes.
    pub fn from_rng<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Result<Self> {
        let mut pieces = Box::new([[[0; SQUARES]; COLORS]; PIECE_KINDS]);
        for key in pieces.iter_mut().flatten().flatten() {
            *key = next_key(rng)?;
        }
        let side_to_move = next_key(rng)?;
        let mut castling = [0; CASTLING_COMBINATIONS];
        for key in &mut castling {
            *key = next_key(rng)?;
        }
        let mut en_passant = [0; EN_PASSANT_SLOTS];
        for key in &mut en_passant {
            *key = next_key(rng)?;
        }
        Ok(Self {
            pieces,
            side_to_move,
            castling,
            en_passant,
        })
    }

    /// Key of `piece` standing on `square`.
    #[must_use]
    pub fn piece(&self, piece: Piece, square: Square) -> Key {
        self.pieces[piece.kind.index()][piece.color.index()][square.index()]
    }

    /// Key that is present in the hash only when Black is to move.
    #[must_use]
    pub const fn side_to_move(&self) -> Key {
        self.side_to_move
    }

    /// Key of the castling rights combination. The empty combination has its
    /// own key, too.
    #[must_use]
    pub const fn castling(&self, rights: CastleRights) -> Key {
        self.castling[rights.index()]
    }

    /// Key of the en passant target file, or of the absence of a target.
    #[must_use]
    pub const fn en_passant(&self, file: Option<File>) -> Key {
        match file {
            Some(file) => self.en_passant[file as usize],
            None => self.en_passant[NO_EN_PASSANT],
        }
    }

    /// Folds the keys of every feature of `fen` into one hash.
    #[must_use]
    pub fn hash(&self, fen: &Fen) -> Key {
        let mut hash = ZobristHash::new();
        for (square, piece) in fen.placement() {
            hash.toggle_piece(self, *piece, *square);
        }
        if fen.side_to_move() == Color::Black {
            hash.toggle_side_to_move(self);
        }
        hash.toggle_castling(self, fen.castling());
        hash.toggle_en_passant(self, fen.en_passant());
        hash.key()
    }

    /// Iterates over all keys in the order they were generated.
    pub fn iter(&self) -> impl Iterator<Item = Key> + '_ {
        self.pieces
            .iter()
            .flatten()
            .flatten()
            .copied()
            .chain(std::iter::once(self.side_to_move))
            .chain(self.castling.iter().copied())
            .chain(self.en_passant.iter().copied())
    }
}

impl fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyStore")
            .field("pieces", &(PIECE_KINDS * COLORS * SQUARES))
            .field("castling", &CASTLING_COMBINATIONS)
            .field("en_passant", &EN_PASSANT_SLOTS)
            .finish_non_exhaustive()
    }
}

fn next_key<R: RngCore + ?Sized>(rng: &mut R) -> Result<Key> {
    let mut bytes = [0; 8];
    rng.try_fill_bytes(&mut bytes)
        .map_err(Error::RandomSourceUnavailable)?;
    Ok(Key::from_le_bytes(bytes))
}

/// Accumulates the hash of a position one feature at a time.
///
/// XOR is its own inverse, so toggling a feature twice removes it. This makes
/// incremental updates cheap: moving a piece toggles it on the origin and the
/// destination squares, a change of castling rights toggles the old and the
/// new combination. A complete hash contains exactly one castling key and one
/// en passant key.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ZobristHash(Key);

impl ZobristHash {
    /// Empty accumulator: no features toggled.
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Adds `piece` on `square` to the hash, or removes it if already present.
    pub fn toggle_piece(&mut self, keys: &KeyStore, piece: Piece, square: Square) {
        self.0 ^= keys.piece(piece, square);
    }

    /// Flips the side to move: the key is present only when Black is to move.
    pub fn toggle_side_to_move(&mut self, keys: &KeyStore) {
        self.0 ^= keys.side_to_move();
    }

    /// Adds or removes the key of the `rights` combination.
    pub fn toggle_castling(&mut self, keys: &KeyStore, rights: CastleRights) {
        self.0 ^= keys.castling(rights);
    }

    /// Adds or removes the key of the en passant `file` (or of its absence).
    pub fn toggle_en_passant(&mut self, keys: &KeyStore, file: Option<File>) {
        self.0 ^= keys.en_passant(file);
    }

    /// Accumulated value.
    #[must_use]
    pub const fn key(self) -> Key {
        self.0
    }
}

impl From<ZobristHash> for Key {
    fn from(hash: ZobristHash) -> Self {
        hash.0
    }
}

impl fmt::Display for ZobristHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Parses `fen` and computes its hash with `keys`.
///
/// Only the first four fields (piece placement, side to move, castling rights
/// and en passant target) are hashed; move counters are ignored. Of the en
/// passant target only the file matters.
///
/// # Errors
///
/// Returns [`Error::MalformedFen`] if `fen` has fewer than four fields or any
/// of them can not be interpreted.
pub fn compute_hash(fen: &str, keys: &KeyStore) -> Result<Key> {
    let parsed = Fen::parse(fen)?;
    let hash = keys.hash(&parsed);
    log::trace!("{parsed} -> {hash:#018x}");
    Ok(hash)
}
