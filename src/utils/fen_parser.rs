//! Position text parser.
//!
//! Accepts the full six-field form or the bare placement field used for
//! puzzle loading. Anything else is `MalformedNotation`.

use crate::errors::ChessError;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> Result<GameState, ChessError> {
    let parts: Vec<&str> = fen.split_whitespace().collect();

    let mut game_state = GameState::new_empty();

    match parts.as_slice() {
        [board_part] => {
            parse_board(board_part, &mut game_state)?;
            game_state.castling_rights = infer_castling_rights(&game_state);
        }
        [board_part, side_part, castling_part, en_passant_part, halfmove_part, fullmove_part] => {
            parse_board(board_part, &mut game_state)?;
            game_state.side_to_move = parse_side_to_move(side_part)?;
            game_state.castling_rights = parse_castling_rights(castling_part)?;
            game_state.en_passant_square = parse_en_passant_square(en_passant_part)?;
            game_state.halfmove_clock = halfmove_part
                .parse::<u16>()
                .map_err(|_| malformed(format!("invalid halfmove clock: {halfmove_part}")))?;
            game_state.fullmove_number = fullmove_part
                .parse::<u16>()
                .map_err(|_| malformed(format!("invalid fullmove number: {fullmove_part}")))?;
        }
        _ => {
            return Err(malformed(format!(
                "expected 1 or 6 fields, found {}",
                parts.len()
            )))
        }
    }

    validate(&game_state)?;
    Ok(game_state)
}

fn malformed(message: String) -> ChessError {
    ChessError::MalformedNotation(message)
}

fn parse_board(board_part: &str, game_state: &mut GameState) -> Result<(), ChessError> {
    let rows: Vec<&str> = board_part.split('/').collect();
    if rows.len() != 8 {
        return Err(malformed(format!(
            "board layout must contain 8 rows, found {}",
            rows.len()
        )));
    }

    for (row, row_str) in rows.iter().enumerate() {
        let mut file = 0usize;
        let mut previous_was_digit = false;

        for ch in row_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(malformed(format!("invalid empty-square count '{ch}'")));
                }
                // Runs of empty squares are written as a single digit.
                if previous_was_digit {
                    return Err(malformed(format!("adjacent digits in row {}", row + 1)));
                }
                previous_was_digit = true;
                file += empty_count as usize;
                if file > 8 {
                    return Err(malformed(format!("row {} has more than 8 columns", row + 1)));
                }
                continue;
            }

            previous_was_digit = false;
            let piece = Piece::from_fen_char(ch)
                .ok_or_else(|| malformed(format!("invalid piece character '{ch}'")))?;

            if file >= 8 {
                return Err(malformed(format!("row {} has more than 8 columns", row + 1)));
            }

            game_state.board[row][file] = Some(piece);
            file += 1;
        }

        if file != 8 {
            return Err(malformed(format!(
                "row {} sums to {file} columns instead of 8",
                row + 1
            )));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> Result<Color, ChessError> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(malformed(format!("invalid side-to-move field: {side_part}"))),
    }
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, ChessError> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;

    for ch in castling_part.chars() {
        let right = match ch {
            'K' => CASTLE_WHITE_KINGSIDE,
            'Q' => CASTLE_WHITE_QUEENSIDE,
            'k' => CASTLE_BLACK_KINGSIDE,
            'q' => CASTLE_BLACK_QUEENSIDE,
            _ => return Err(malformed(format!("invalid castling rights character: {ch}"))),
        };
        if rights & right != 0 {
            return Err(malformed(format!("repeated castling right: {ch}")));
        }
        rights |= right;
    }

    Ok(rights)
}

fn parse_en_passant_square(en_passant_part: &str) -> Result<Option<Square>, ChessError> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let square = algebraic_to_square(en_passant_part)?;
    if square.rank_number() != 3 && square.rank_number() != 6 {
        return Err(malformed(format!(
            "en-passant target must be on rank 3 or 6: {en_passant_part}"
        )));
    }
    Ok(Some(square))
}

/// Rights for every king and rook still standing on its home square.
fn infer_castling_rights(game_state: &GameState) -> CastlingRights {
    let mut rights = 0;
    for color in [Color::White, Color::Black] {
        let row = color.home_row();
        let king = Some(Piece::new(color, PieceKind::King));
        let king_home = game_state.piece_at(Square { file: 4, row }) == king;
        if !king_home {
            continue;
        }
        let rook = Some(Piece::new(color, PieceKind::Rook));
        if game_state.piece_at(Square { file: 7, row }) == rook {
            rights |= kingside_right(color);
        }
        if game_state.piece_at(Square { file: 0, row }) == rook {
            rights |= queenside_right(color);
        }
    }
    rights
}

fn validate(game_state: &GameState) -> Result<(), ChessError> {
    for color in [Color::White, Color::Black] {
        let kings = game_state
            .pieces_of(color)
            .filter(|(_, piece)| piece.kind == PieceKind::King)
            .count();
        if kings != 1 {
            return Err(malformed(format!("{color} must have exactly one king, found {kings}")));
        }
    }

    if is_king_in_check(game_state, game_state.side_to_move.opposite()) {
        return Err(malformed(format!(
            "{} is in check but it is not their move",
            game_state.side_to_move.opposite()
        )));
    }

    Ok(())
}
