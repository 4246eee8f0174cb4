//! Minimal move text: origin, destination and an optional promotion letter,
//! as in `e2e4` or `e7e8q`.

use crate::errors::ChessError;
use crate::game_state::chess_types::Square;
use crate::utils::algebraic::algebraic_to_square;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveText {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<char>,
}

pub fn parse_long_algebraic(long_algebraic: &str) -> Result<MoveText, ChessError> {
    let text = long_algebraic.trim();
    if !text.is_ascii() || (text.len() != 4 && text.len() != 5) {
        return Err(ChessError::MalformedNotation(format!(
            "invalid long algebraic move: '{long_algebraic}'"
        )));
    }

    let from = algebraic_to_square(&text[0..2])?;
    let to = algebraic_to_square(&text[2..4])?;
    let promotion = text[4..].chars().next();

    Ok(MoveText {
        from,
        to,
        promotion,
    })
}
