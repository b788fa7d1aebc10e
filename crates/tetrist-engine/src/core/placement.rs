use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    board::Board,
    piece::{Piece, PieceKind},
};

/// A candidate move: an oriented piece resting with its top-left corner at `(x, y)`.
///
/// The rotation count, the column and the row identify a placement uniquely. The row is
/// derived by a gravity drop (see [`simulate_drop`]) rather than chosen directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    piece: Piece,
    x: usize,
    y: usize,
}

impl Placement {
    #[must_use]
    pub fn new(piece: Piece, x: usize, y: usize) -> Self {
        Self { piece, x, y }
    }

    /// The piece in the orientation it is placed with.
    #[must_use]
    pub fn piece(&self) -> &Piece {
        &self.piece
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.piece.kind()
    }

    /// Number of clockwise rotations applied to the spawn orientation (0-3).
    #[must_use]
    pub fn rotation(&self) -> u8 {
        self.piece.rotation().count()
    }

    /// Column of the piece's bounding box left edge.
    #[must_use]
    pub fn x(&self) -> usize {
        self.x
    }

    /// Row of the piece's bounding box top edge.
    #[must_use]
    pub fn y(&self) -> usize {
        self.y
    }

    /// Returns `true` if the placement fits on `board` without colliding.
    #[must_use]
    pub fn fits(&self, board: &Board) -> bool {
        !board.is_colliding(&self.piece, self.x, self.y)
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "kind#rotation@x,y" (e.g., "S#1@4,18")
        write!(
            f,
            "{}#{}@{},{}",
            self.kind().as_char(),
            self.rotation(),
            self.x,
            self.y
        )
    }
}

impl Serialize for Placement {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Placement {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;

        let s = String::deserialize(deserializer)?;
        let format_error = || D::Error::custom(format!("expected 'kind#rotation@x,y', got '{s}'"));

        let (kind_str, rest) = s.split_once('#').ok_or_else(format_error)?;
        let (rotation_str, position_str) = rest.split_once('@').ok_or_else(format_error)?;
        let (x_str, y_str) = position_str.split_once(',').ok_or_else(format_error)?;

        let kind = kind_str
            .parse::<PieceKind>()
            .map_err(D::Error::custom)?;
        let rotation = rotation_str.parse::<u8>().map_err(|e| {
            D::Error::custom(format!("invalid rotation: {rotation_str} ({e})"))
        })?;
        if rotation > 3 {
            return Err(D::Error::custom(format!(
                "rotation must be 0-3, got {rotation}"
            )));
        }
        let x = x_str
            .parse::<usize>()
            .map_err(|e| D::Error::custom(format!("invalid x position: {x_str} ({e})")))?;
        let y = y_str
            .parse::<usize>()
            .map_err(|e| D::Error::custom(format!("invalid y position: {y_str} ({e})")))?;

        Ok(Placement::new(Piece::with_rotation(kind, rotation), x, y))
    }
}

/// Result of dropping a piece straight down a column.
#[derive(Debug, Clone)]
pub struct SimulatedDrop {
    /// Placement at the last non-colliding row.
    pub placement: Placement,
    /// Scratch board with the piece committed and filled rows cleared.
    pub board: Board,
    /// Rows cleared by the drop.
    pub cleared_lines: usize,
}

impl SimulatedDrop {
    /// Returns `false` when the scratch board carries the invalid-placement marker.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.board.is_invalid()
    }
}

/// Finds the lowest row at which `piece` rests in column `x`.
///
/// Starting from row 0 the row advances while the next one is free. Returns `None` when the
/// piece already collides at row 0 (blocked spawn or a column range that does not fit).
#[must_use]
pub fn drop_row(board: &Board, piece: &Piece, x: usize) -> Option<usize> {
    if board.is_colliding(piece, x, 0) {
        return None;
    }
    let mut y = 0;
    while !board.is_colliding(piece, x, y + 1) {
        y += 1;
    }
    Some(y)
}

/// Drops `piece` in column `x`, commits it to a scratch copy and clears filled rows.
///
/// Produces the same board as an animated step-by-step fall. When the piece cannot enter the
/// board at all it is placed speculatively at row 0, which leaves the invalid-placement
/// marker on the scratch board.
///
/// # Example
///
/// ```
/// use tetrist_engine::{Board, Piece, PieceKind, simulate_drop};
///
/// let board = Board::standard();
/// let drop = simulate_drop(&board, &Piece::new(PieceKind::O), 0);
/// assert_eq!(drop.placement.y(), 18);
/// assert!(drop.is_valid());
/// ```
#[must_use]
pub fn simulate_drop(board: &Board, piece: &Piece, x: usize) -> SimulatedDrop {
    let y = drop_row(board, piece, x).unwrap_or(0);
    let (scratch, cleared_lines) = board.place_speculative(piece, x, y);
    SimulatedDrop {
        placement: Placement::new(*piece, x, y),
        board: scratch,
        cleared_lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_rests_on_floor_and_stack() {
        let board: Board = "
            ....
            ....
            ....
            .1..
            "
        .parse()
        .unwrap();
        let o = Piece::new(PieceKind::O);
        assert_eq!(drop_row(&board, &o, 2), Some(2));
        assert_eq!(drop_row(&board, &o, 0), Some(1));
    }

    #[test]
    fn test_drop_row_is_floor_seeking() {
        let board: Board = "
            ......
            ......
            ..3...
            .33...
            .3..1.
            "
        .parse()
        .unwrap();
        for kind in PieceKind::ALL {
            let mut piece = Piece::new(kind);
            for _ in 0..4 {
                for x in 0..=board.cols() - piece.width() {
                    let Some(y) = drop_row(&board, &piece, x) else {
                        continue;
                    };
                    assert!(!board.is_colliding(&piece, x, y));
                    assert!(board.is_colliding(&piece, x, y + 1));
                }
                piece = piece.rotated_clockwise();
            }
        }
    }

    #[test]
    fn test_drop_blocked_at_spawn_is_invalid() {
        let board: Board = "1...\n1...".parse().unwrap();
        let i = Piece::new(PieceKind::I);
        assert_eq!(drop_row(&board, &i, 0), None);
        let drop = simulate_drop(&board, &i, 0);
        assert!(!drop.is_valid());
    }

    #[test]
    fn test_i_piece_on_empty_board_lands_on_floor() {
        let board = Board::standard();
        let i = Piece::new(PieceKind::I);
        let drop = simulate_drop(&board, &i, 3);
        assert_eq!(drop.placement.y(), 19);
        assert!(drop.placement.fits(&board));
        assert_eq!(drop.cleared_lines, 0);

        let mut live = board.clone();
        assert_eq!(live.apply_placement(&drop.placement), 0);
        assert_eq!(live, drop.board);
        for x in 0..live.cols() {
            let expected = usize::from((3..7).contains(&x));
            assert_eq!(live.column_height(x), expected);
        }
    }

    #[test]
    fn test_placement_serialization() {
        let placement = Placement::new(Piece::with_rotation(PieceKind::S, 1), 4, 18);
        let serialized = serde_json::to_string(&placement).unwrap();
        assert_eq!(serialized, "\"S#1@4,18\"");
        assert_eq!(placement.to_string(), "S#1@4,18");

        let deserialized: Placement = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, placement);
    }

    #[test]
    fn test_placement_deserialization_error_cases() {
        assert!(serde_json::from_str::<Placement>("\"S1@4,18\"").is_err());
        assert!(serde_json::from_str::<Placement>("\"S#1#4,18\"").is_err());
        assert!(serde_json::from_str::<Placement>("\"S#1@4\"").is_err());
        assert!(serde_json::from_str::<Placement>("\"X#1@4,18\"").is_err());
        assert!(serde_json::from_str::<Placement>("\"S#4@4,18\"").is_err());
        assert!(serde_json::from_str::<Placement>("\"S#1@abc,18\"").is_err());
    }
}
