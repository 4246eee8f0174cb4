//! Core value types shared by every subsystem.
//!
//! Squares address an 8x8 mailbox in notation order: row 0 is board rank 8
//! and row 7 is board rank 1, so the first placement row of a position text
//! maps directly onto row 0.

use std::fmt;

pub use crate::game_state::game_state::GameState;
pub use crate::game_state::undo_state::UndoState;

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a pawn advance for this side.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row holding this side's king and rooks at the start of a game.
    #[inline]
    pub const fn home_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    #[inline]
    pub const fn pawn_start_row(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn promotion_row(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    #[inline]
    pub const fn is_minor(self) -> bool {
        matches!(self, PieceKind::Knight | PieceKind::Bishop)
    }

    /// Lowercase notation letter.
    pub const fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    /// Case-insensitive inverse of [`PieceKind::to_char`].
    pub fn from_char(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Rook => "rook",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Uppercase for white, lowercase for black.
    pub fn to_fen_char(self) -> char {
        let base = self.kind.to_char();
        match self.color {
            Color::White => base.to_ascii_uppercase(),
            Color::Black => base,
        }
    }

    pub fn from_fen_char(ch: char) -> Option<Self> {
        let color = if ch.is_ascii_uppercase() {
            Color::White
        } else if ch.is_ascii_lowercase() {
            Color::Black
        } else {
            return None;
        };
        PieceKind::from_char(ch).map(|kind| Piece::new(color, kind))
    }
}

/// A board coordinate. `file` 0 is the a-file; `row` 0 is rank 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    pub file: u8,
    pub row: u8,
}

impl Square {
    /// Returns `None` when either coordinate leaves the board.
    #[inline]
    pub fn new(file: i8, row: i8) -> Option<Self> {
        if (0..8).contains(&file) && (0..8).contains(&row) {
            Some(Self {
                file: file as u8,
                row: row as u8,
            })
        } else {
            None
        }
    }

    #[inline]
    pub fn offset(self, file_delta: i8, row_delta: i8) -> Option<Self> {
        Square::new(self.file as i8 + file_delta, self.row as i8 + row_delta)
    }

    /// Board rank as printed in notation (1..=8).
    #[inline]
    pub const fn rank_number(self) -> u8 {
        8 - self.row
    }

    /// Chebyshev distance, the number of king steps between two squares.
    #[inline]
    pub fn distance(self, other: Square) -> u8 {
        let df = (self.file as i8 - other.file as i8).unsigned_abs();
        let dr = (self.row as i8 - other.row as i8).unsigned_abs();
        df.max(dr)
    }

    /// King-step distance to the nearest of the four central squares.
    #[inline]
    pub fn center_distance(self) -> u8 {
        let df = if self.file < 4 { 3 - self.file } else { self.file - 4 };
        let dr = if self.row < 4 { 3 - self.row } else { self.row - 4 };
        df.max(dr)
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |file| Square { file, row }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            char::from(b'a' + self.file),
            char::from(b'0' + self.rank_number())
        )
    }
}

/// Compact castling rights bitmask.
pub type CastlingRights = u8;
pub const CASTLE_WHITE_KINGSIDE: CastlingRights = 1 << 0;
pub const CASTLE_WHITE_QUEENSIDE: CastlingRights = 1 << 1;
pub const CASTLE_BLACK_KINGSIDE: CastlingRights = 1 << 2;
pub const CASTLE_BLACK_QUEENSIDE: CastlingRights = 1 << 3;
pub const CASTLE_ALL: CastlingRights =
    CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE | CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE;

#[inline]
pub const fn kingside_right(color: Color) -> CastlingRights {
    match color {
        Color::White => CASTLE_WHITE_KINGSIDE,
        Color::Black => CASTLE_BLACK_KINGSIDE,
    }
}

#[inline]
pub const fn queenside_right(color: Color) -> CastlingRights {
    match color {
        Color::White => CASTLE_WHITE_QUEENSIDE,
        Color::Black => CASTLE_BLACK_QUEENSIDE,
    }
}
