use std::fmt;

use crate::game_state::chess_types::{Piece, PieceKind, Square};

pub type MoveFlags = u8;

pub const FLAG_DOUBLE_PAWN_PUSH: MoveFlags = 1 << 0;
pub const FLAG_EN_PASSANT: MoveFlags = 1 << 1;
pub const FLAG_CASTLING: MoveFlags = 1 << 2;

/// A move as generated from one specific position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChessMove {
    pub from: Square,
    pub to: Square,
    pub moved_piece: Piece,
    pub captured_piece: Option<Piece>,
    pub promotion: Option<PieceKind>,
    pub flags: MoveFlags,
}

impl ChessMove {
    #[inline]
    pub fn quiet(from: Square, to: Square, moved_piece: Piece) -> Self {
        Self {
            from,
            to,
            moved_piece,
            captured_piece: None,
            promotion: None,
            flags: 0,
        }
    }

    #[inline]
    pub fn with_capture(mut self, captured_piece: Option<Piece>) -> Self {
        self.captured_piece = captured_piece;
        self
    }

    #[inline]
    pub fn with_promotion(mut self, promotion: PieceKind) -> Self {
        self.promotion = Some(promotion);
        self
    }

    #[inline]
    pub fn with_flags(mut self, flags: MoveFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured_piece.is_some()
    }

    #[inline]
    pub fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    #[inline]
    pub fn is_en_passant(&self) -> bool {
        (self.flags & FLAG_EN_PASSANT) != 0
    }

    #[inline]
    pub fn is_castling(&self) -> bool {
        (self.flags & FLAG_CASTLING) != 0
    }

    #[inline]
    pub fn is_double_pawn_push(&self) -> bool {
        (self.flags & FLAG_DOUBLE_PAWN_PUSH) != 0
    }

    /// Piece standing on the destination once the move is made.
    #[inline]
    pub fn piece_after_move(&self) -> Piece {
        match self.promotion {
            Some(kind) => Piece::new(self.moved_piece.color, kind),
            None => self.moved_piece,
        }
    }
}

/// Minimal long-algebraic form, e.g. `e2e4` or `e7e8q`.
impl fmt::Display for ChessMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.to_char())?;
        }
        Ok(())
    }
}
