use crate::game_state::{chess_types::*, game_state::GameState};

pub fn generate_fen(game_state: &GameState) -> String {
    let board = generate_board_field(game_state);
    let side_to_move = match game_state.side_to_move {
        Color::White => "w",
        Color::Black => "b",
    };
    let castling = generate_castling_field(game_state.castling_rights);
    let en_passant = game_state
        .en_passant_square
        .map(|square| square.to_string())
        .unwrap_or_else(|| "-".to_owned());

    format!(
        "{} {} {} {} {} {}",
        board,
        side_to_move,
        castling,
        en_passant,
        game_state.halfmove_clock,
        game_state.fullmove_number
    )
}

pub fn generate_board_field(game_state: &GameState) -> String {
    let mut out = String::new();

    for (row_idx, row) in game_state.board.iter().enumerate() {
        let mut empty_count = 0u8;

        for square in row {
            if let Some(piece) = square {
                if empty_count > 0 {
                    out.push(char::from(b'0' + empty_count));
                    empty_count = 0;
                }
                out.push(piece.to_fen_char());
            } else {
                empty_count += 1;
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }

        if row_idx < 7 {
            out.push('/');
        }
    }

    out
}

fn generate_castling_field(rights: CastlingRights) -> String {
    let mut out = String::new();

    for (right, ch) in [
        (CASTLE_WHITE_KINGSIDE, 'K'),
        (CASTLE_WHITE_QUEENSIDE, 'Q'),
        (CASTLE_BLACK_KINGSIDE, 'k'),
        (CASTLE_BLACK_QUEENSIDE, 'q'),
    ] {
        if (rights & right) != 0 {
            out.push(ch);
        }
    }

    if out.is_empty() {
        out.push('-');
    }

    out
}
