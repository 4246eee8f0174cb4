//! Position snapshot.
//!
//! `GameState` is the central model for the engine: an 8x8 mailbox of
//! pieces plus the side to move, castling rights, en-passant target and
//! clocks. Move application produces a new snapshot, so a `GameState` is
//! never mutated once a turn has been handed to a reader.

use crate::errors::ChessError;
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::*;
use crate::utils::fen_generator::{generate_board_field, generate_fen};
use crate::utils::fen_parser::parse_fen;

pub type Board = [[Option<Piece>; 8]; 8];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// `board[row][file]`, row 0 is rank 8.
    pub board: Board,

    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    pub halfmove_clock: u16,
    pub fullmove_number: u16,
}

/// Placement, side to move and castling rights. En-passant availability is
/// not part of the signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepetitionSignature {
    board: Board,
    side_to_move: Color,
    castling_rights: CastlingRights,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            board: [[None; 8]; 8],
            side_to_move: Color::White,
            castling_rights: 0,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }
}

impl GameState {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    pub fn new_game() -> Self {
        let mut game_state = Self::new_empty();
        for (file, kind) in [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ]
        .into_iter()
        .enumerate()
        {
            game_state.board[0][file] = Some(Piece::new(Color::Black, kind));
            game_state.board[1][file] = Some(Piece::new(Color::Black, PieceKind::Pawn));
            game_state.board[6][file] = Some(Piece::new(Color::White, PieceKind::Pawn));
            game_state.board[7][file] = Some(Piece::new(Color::White, kind));
        }
        game_state.castling_rights = CASTLE_ALL;
        debug_assert_eq!(game_state.get_fen(), STARTING_POSITION_FEN);
        game_state
    }

    #[inline]
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        parse_fen(fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    /// Only the piece-placement field of the position text.
    #[inline]
    pub fn placement(&self) -> String {
        generate_board_field(self)
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board[square.row as usize][square.file as usize]
    }

    #[inline]
    pub fn set_piece(&mut self, square: Square, piece: Option<Piece>) {
        self.board[square.row as usize][square.file as usize] = piece;
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king = Piece::new(color, PieceKind::King);
        Square::all().find(|sq| self.piece_at(*sq) == Some(king))
    }

    /// Every occupied square with its piece, in notation order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    #[inline]
    pub fn has_castling_right(&self, right: CastlingRights) -> bool {
        (self.castling_rights & right) != 0
    }

    pub fn repetition_signature(&self) -> RepetitionSignature {
        RepetitionSignature {
            board: self.board,
            side_to_move: self.side_to_move,
            castling_rights: self.castling_rights,
        }
    }
}
