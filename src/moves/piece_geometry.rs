//! Movement geometry per piece type as `(file_delta, row_delta)` pairs.

use crate::game_state::chess_types::Square;

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

pub const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// On-board targets of a fixed offset set.
pub fn leaper_targets(from: Square, offsets: &[(i8, i8)]) -> impl Iterator<Item = Square> + '_ {
    offsets
        .iter()
        .filter_map(move |(df, dr)| from.offset(*df, *dr))
}

/// Squares along one direction, nearest first, up to the board edge.
pub fn ray(from: Square, direction: (i8, i8)) -> impl Iterator<Item = Square> {
    let (df, dr) = direction;
    std::iter::successors(from.offset(df, dr), move |sq| sq.offset(df, dr))
}
