//! Extracts the hashed fields from [Forsyth-Edwards Notation] (FEN): piece
//! placement, side to move, castling rights and the en passant target.
//!
//! The parser does not check whether the position is legal (e.g. the number of
//! kings or pawns on the backranks) and does not require every rank to be fully
//! described: it only reads what the hash needs. Halfmove clock and fullmove
//! counter are optional and ignored, so EPD-style records parse as well.
//!
//! [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation

use std::fmt;

use crate::chess::core::{CastleRights, Color, File, Piece, Rank, Square, BOARD_WIDTH};
use crate::error::{malformed, Error, Result};

/// Number of leading space-separated fields that have to be present.
pub const REQUIRED_FIELDS: usize = 4;

/// The parts of a FEN that determine its Zobrist hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fen {
    placement: Vec<(Square, Piece)>,
    side_to_move: Color,
    castling: CastleRights,
    en_passant: Option<File>,
}

impl Fen {
    /// Parses the first four fields of `input`.
    ///
    /// Fields are separated by single spaces. The whole line may carry
    /// surrounding whitespace and a `fen ` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedFen`] if fewer than [`REQUIRED_FIELDS`] fields
    /// are present or any of them contains symbols outside of its alphabet.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let input = input.strip_prefix("fen ").unwrap_or(input);
        let fields: Vec<&str> = input.split(' ').take(REQUIRED_FIELDS).collect();
        let &[board, side, castling, en_passant] = fields.as_slice() else {
            malformed!(
                "expected at least {REQUIRED_FIELDS} space-separated fields, got {} in \"{input}\"",
                fields.len()
            );
        };
        Ok(Self {
            placement: parse_placement(board)?,
            side_to_move: Color::try_from(side)?,
            castling: CastleRights::try_from(castling)?,
            en_passant: parse_en_passant(en_passant)?,
        })
    }

    /// Occupied squares in the order they appear in the FEN: from the eighth
    /// rank down to the first one, left to right within a rank.
    #[must_use]
    pub fn placement(&self) -> &[(Square, Piece)] {
        &self.placement
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn castling(&self) -> CastleRights {
        self.castling
    }

    /// File of the en passant target square. The rank is implied by the side
    /// to move and does not participate in hashing.
    #[must_use]
    pub const fn en_passant(&self) -> Option<File> {
        self.en_passant
    }
}

impl TryFrom<&str> for Fen {
    type Error = Error;

    fn try_from(input: &str) -> Result<Self> {
        Self::parse(input)
    }
}

impl fmt::Display for Fen {
    /// Writes the four hashed fields back. Empty squares are collapsed into
    /// digits and ranks are always fully described.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut board = [[None; BOARD_WIDTH as usize]; BOARD_WIDTH as usize];
        for (square, piece) in &self.placement {
            board[square.rank() as usize][square.file() as usize] = Some(*piece);
        }
        for (rank_id, rank) in board.iter().enumerate().rev() {
            let mut empty_squares = 0;
            for square in rank {
                match square {
                    Some(piece) => {
                        if empty_squares != 0 {
                            write!(f, "{empty_squares}")?;
                            empty_squares = 0;
                        }
                        write!(f, "{piece}")?;
                    },
                    None => empty_squares += 1,
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if rank_id != 0 {
                f.write_str("/")?;
            }
        }
        write!(f, " {} {} ", self.side_to_move, self.castling)?;
        match self.en_passant {
            // The target square is behind the pawn that has just moved.
            Some(file) => {
                let rank = match self.side_to_move {
                    Color::White => Rank::Six,
                    Color::Black => Rank::Three,
                };
                write!(f, "{}", Square::new(file, rank))
            },
            None => f.write_str("-"),
        }
    }
}

/// Walks the piece placement field. '/' moves to the next rank down, digits
/// skip empty squares, letters are pieces.
fn parse_placement(board: &str) -> Result<Vec<(Square, Piece)>> {
    let mut placement = Vec::with_capacity(32);
    let mut rank_id: u8 = BOARD_WIDTH - 1;
    let mut file_id: u8 = 0;
    for symbol in board.chars() {
        match symbol {
            '/' => {
                if rank_id == 0 {
                    malformed!("expected at most {BOARD_WIDTH} ranks, got {board}");
                }
                rank_id -= 1;
                file_id = 0;
            },
            '1'..='8' => file_id = file_id.saturating_add(symbol as u8 - b'0'),
            '0' | '9' => malformed!("empty square run should be within 1..=8, got {symbol}"),
            _ => {
                let piece = Piece::try_from(symbol)?;
                if file_id >= BOARD_WIDTH {
                    malformed!("piece '{symbol}' is placed beyond the h-file in {board}");
                }
                let square = Square::new(File::try_from(file_id)?, Rank::try_from(rank_id)?);
                placement.push((square, piece));
                file_id += 1;
            },
        }
    }
    Ok(placement)
}

fn parse_en_passant(en_passant: &str) -> Result<Option<File>> {
    if en_passant == "-" {
        return Ok(None);
    }
    match en_passant.chars().next() {
        Some(file) => Ok(Some(File::try_from(file)?)),
        None => malformed!("missing en passant target"),
    }
}
