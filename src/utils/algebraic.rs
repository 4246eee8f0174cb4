//! Square text conversions.
//!
//! Converts between coordinates such as `e4` and internal squares. Input is
//! case-insensitive; output is always lowercase.

use crate::errors::ChessError;
use crate::game_state::chess_types::Square;

/// Convert algebraic notation (for example: "e4" or "E4") to a square.
pub fn algebraic_to_square(square: &str) -> Result<Square, ChessError> {
    let bytes = square.trim().as_bytes();
    if bytes.len() != 2 {
        return Err(ChessError::MalformedNotation(format!(
            "invalid algebraic square: '{square}'"
        )));
    }

    let file = bytes[0].to_ascii_lowercase();
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) {
        return Err(ChessError::MalformedNotation(format!(
            "invalid algebraic file: '{}'",
            file as char
        )));
    }
    if !(b'1'..=b'8').contains(&rank) {
        return Err(ChessError::MalformedNotation(format!(
            "invalid algebraic rank: '{}'",
            rank as char
        )));
    }

    Ok(Square {
        file: file - b'a',
        row: b'8' - rank,
    })
}

#[cfg(test)]
mod tests {
    use super::algebraic_to_square;
    use crate::errors::ChessError;
    use crate::game_state::chess_types::Square;

    #[test]
    fn round_trip_square_conversions() {
        assert_eq!(
            algebraic_to_square("a1").expect("a1 should parse"),
            Square { file: 0, row: 7 }
        );
        assert_eq!(
            algebraic_to_square("h8").expect("h8 should parse"),
            Square { file: 7, row: 0 }
        );
        assert_eq!(Square { file: 4, row: 4 }.to_string(), "e4");
    }

    #[test]
    fn uppercase_input_is_accepted() {
        assert_eq!(
            algebraic_to_square("E2").expect("E2 should parse"),
            algebraic_to_square("e2").expect("e2 should parse")
        );
    }

    #[test]
    fn bad_squares_are_malformed() {
        for text in ["", "e", "e9", "i1", "e22", "1e"] {
            assert!(matches!(
                algebraic_to_square(text),
                Err(ChessError::MalformedNotation(_))
            ));
        }
    }
}
