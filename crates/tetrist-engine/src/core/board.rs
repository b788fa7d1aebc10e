use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{piece::Piece, placement::Placement};

/// Rectangular playfield of integer cells with a permanent floor sentinel row.
///
/// # Cell values
///
/// - [`Board::EMPTY`] (`0`): free cell
/// - `1..=7`: color id of the piece that occupies the cell
/// - [`Board::INVALID`] (`-1`): marker written by [`Board::place_speculative`] when a
///   hypothetical placement overlaps or leaves the board; only ever found on scratch copies
///
/// # Layout
///
/// Cells are stored row-major, top row first. Below the `rows` playable rows there is one
/// extra row filled with [`Board::FLOOR`]. Collision checks can probe one row past the last
/// playable row without special-casing the bottom edge. The floor row is never cleared,
/// never written to and never counted as a filled line.
///
/// ```text
/// y = 0          . . . . . . . . . .
/// ...
/// y = rows - 1   . . . . . . . . . .
/// y = rows       1 1 1 1 1 1 1 1 1 1   <- floor sentinel
/// ```
///
/// # Text form
///
/// [`Display`](fmt::Display) and [`FromStr`] use one line per playable row: `.` for empty,
/// a digit for a color id and `x` for the invalid marker. The floor row is implicit.
///
/// ```
/// use tetrist_engine::Board;
///
/// let board: Board = "....\n.11.\n1111".parse().unwrap();
/// assert_eq!((board.rows(), board.cols()), (3, 4));
/// assert_eq!(board.column_height(1), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<i32>,
}

impl Board {
    pub const STANDARD_ROWS: usize = 20;
    pub const STANDARD_COLS: usize = 10;

    pub const EMPTY: i32 = 0;
    pub const INVALID: i32 = -1;
    pub const FLOOR: i32 = 1;

    /// Creates an empty board with `rows` playable rows plus the floor sentinel.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "board must have at least one cell");
        let mut cells = vec![Self::EMPTY; rows * cols];
        cells.extend(std::iter::repeat_n(Self::FLOOR, cols));
        Self { rows, cols, cells }
    }

    /// Creates an empty 20×10 board.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(Self::STANDARD_ROWS, Self::STANDARD_COLS)
    }

    /// Number of playable rows (the floor row excluded).
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.cols + x
    }

    /// Returns the cell at `(x, y)`, where `y == rows()` addresses the floor row.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> i32 {
        self.get(x, y)
            .unwrap_or_else(|| panic!("cell ({x}, {y}) is outside the board"))
    }

    /// Like [`Self::cell`], but returns `None` outside the board (floor row included).
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<i32> {
        (x < self.cols && y <= self.rows).then(|| self.cells[self.index(x, y)])
    }

    #[must_use]
    pub fn row(&self, y: usize) -> &[i32] {
        assert!(y <= self.rows);
        &self.cells[y * self.cols..][..self.cols]
    }

    /// Returns an iterator over the playable rows, top to bottom.
    pub fn playable_rows(&self) -> impl Iterator<Item = &[i32]> {
        self.cells[..self.rows * self.cols].chunks_exact(self.cols)
    }

    #[must_use]
    pub fn floor_row(&self) -> &[i32] {
        self.row(self.rows)
    }

    /// Height of column `x` measured from the floor (`0` for an empty column).
    #[must_use]
    pub fn column_height(&self, x: usize) -> usize {
        (0..self.rows)
            .find(|&y| self.cell(x, y) != Self::EMPTY)
            .map_or(0, |top| self.rows - top)
    }

    /// Returns `true` if any cell carries the invalid-placement marker.
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        self.cells.contains(&Self::INVALID)
    }

    /// Checks whether `piece` with its top-left corner at `(x, y)` collides.
    ///
    /// A piece collides when any occupied cell lands on a non-empty board cell (the floor
    /// row included) or falls outside the board. Out of bounds is always a collision.
    #[must_use]
    pub fn is_colliding(&self, piece: &Piece, x: usize, y: usize) -> bool {
        piece
            .occupied_positions()
            .any(|(dx, dy)| self.get(x + dx, y + dy).is_none_or(|c| c != Self::EMPTY))
    }

    /// Merges the piece's cells into the board at `(x, y)`.
    ///
    /// Values are added to the existing cells. Callers guarantee the target cells are free
    /// (see [`Self::is_colliding`]); writing into the floor row or outside the playable area
    /// is a programming error.
    pub fn fill_piece(&mut self, piece: &Piece, x: usize, y: usize) {
        let color = piece.color();
        for (dx, dy) in piece.occupied_positions() {
            let (cx, cy) = (x + dx, y + dy);
            assert!(
                cx < self.cols && cy < self.rows,
                "piece cell ({cx}, {cy}) is outside the playable area"
            );
            let index = self.index(cx, cy);
            self.cells[index] += color;
        }
    }

    /// Clears filled rows and returns the number of rows cleared.
    ///
    /// A row is filled when every cell holds a piece. Cleared rows are removed, the rows
    /// above shift down and fresh empty rows enter at the top. The floor row is untouched.
    /// A row carrying the invalid marker is never cleared.
    pub fn clear_lines(&mut self) -> usize {
        let cols = self.cols;
        let mut count = 0;
        for y in (0..self.rows).rev() {
            if is_row_filled(self.row(y)) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.cells
                    .copy_within(y * cols..(y + 1) * cols, (y + count) * cols);
            }
        }
        self.cells[..count * cols].fill(Self::EMPTY);
        count
    }

    /// Commits a placement to this board and clears filled rows.
    ///
    /// Returns the number of rows cleared.
    pub fn apply_placement(&mut self, placement: &Placement) -> usize {
        self.fill_piece(placement.piece(), placement.x(), placement.y());
        self.clear_lines()
    }

    /// Builds a scratch copy with `piece` placed at `(x, y)` and filled rows cleared.
    ///
    /// Unlike [`Self::fill_piece`], overlaps never panic: every piece cell that lands on an
    /// occupied cell or outside the playable area writes [`Self::INVALID`] into the top row of
    /// that column instead. Scoring treats such a board as having near-infinite cost.
    ///
    /// Returns the scratch board and the number of rows cleared on it.
    #[must_use]
    pub fn place_speculative(&self, piece: &Piece, x: usize, y: usize) -> (Board, usize) {
        let mut board = self.clone();
        let color = piece.color();
        for (dx, dy) in piece.occupied_positions() {
            let (cx, cy) = (x + dx, y + dy);
            if cx < self.cols && cy < self.rows && board.cell(cx, cy) == Self::EMPTY {
                let index = board.index(cx, cy);
                board.cells[index] = color;
            } else {
                let marker_x = cx.min(self.cols - 1);
                board.cells[marker_x] = Self::INVALID;
            }
        }
        let cleared_lines = board.clear_lines();
        (board, cleared_lines)
    }
}

fn is_row_filled(row: &[i32]) -> bool {
    row.iter().all(|&c| c > Board::EMPTY)
}

fn cell_char(cell: i32) -> char {
    match cell {
        Board::EMPTY => '.',
        Board::INVALID => 'x',
        1..=9 => char::from_digit(cell.unsigned_abs(), 10).unwrap_or('?'),
        _ => '?',
    }
}

fn render_row(row: &[i32]) -> String {
    row.iter().copied().map(cell_char).collect()
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.playable_rows().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            f.write_str(&render_row(row))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseBoardError {
    #[display("board has no rows")]
    Empty,
    #[display("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[display("invalid cell {found:?} at row {row}, column {col}")]
    InvalidCell { row: usize, col: usize, found: char },
}

impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();
        let cols = lines.first().ok_or(ParseBoardError::Empty)?.chars().count();

        let mut board = Board::new(lines.len(), cols);
        for (y, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != cols {
                return Err(ParseBoardError::RaggedRow {
                    row: y,
                    expected: cols,
                    found,
                });
            }
            for (x, ch) in line.chars().enumerate() {
                let cell = match ch {
                    '.' => Board::EMPTY,
                    'x' => Board::INVALID,
                    '1'..='9' => ch.to_digit(10).and_then(|d| i32::try_from(d).ok()).unwrap_or(0),
                    _ => {
                        return Err(ParseBoardError::InvalidCell {
                            row: y,
                            col: x,
                            found: ch,
                        });
                    }
                };
                let index = board.index(x, y);
                board.cells[index] = cell;
            }
        }
        Ok(board)
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: ["..........", "....11....", ...] (one string per playable row)
        serializer.collect_seq(self.playable_rows().map(render_row))
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rows = Vec::<String>::deserialize(deserializer)?;
        rows.join("\n").parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use crate::PieceKind;

    use super::*;

    fn board(text: &str) -> Board {
        text.parse().unwrap()
    }

    #[test]
    fn test_new_board() {
        let board = Board::standard();
        assert_eq!(board.rows(), 20);
        assert_eq!(board.cols(), 10);
        for row in board.playable_rows() {
            assert!(row.iter().all(|&c| c == Board::EMPTY));
        }
        assert!(board.floor_row().iter().all(|&c| c == Board::FLOOR));
        assert_eq!(board.playable_rows().count(), 20);
    }

    #[test]
    fn test_collision_with_cells_and_bounds() {
        let board = board(
            "
            ....
            ....
            .1..
            ",
        );
        let o = Piece::new(PieceKind::O);
        assert!(!board.is_colliding(&o, 0, 0));
        assert!(!board.is_colliding(&o, 2, 1));
        // overlaps the occupied cell
        assert!(board.is_colliding(&o, 0, 1));
        // right edge
        assert!(board.is_colliding(&o, 3, 0));
        // floor sentinel
        assert!(board.is_colliding(&o, 2, 2));
        // entirely below the floor
        assert!(board.is_colliding(&o, 0, 10));
    }

    #[test]
    fn test_fill_piece_is_additive() {
        let mut board = Board::new(3, 4);
        let t = Piece::new(PieceKind::T);
        board.fill_piece(&t, 1, 1);
        assert_eq!(board.to_string(), "....\n.777\n..7.");
    }

    #[test]
    #[should_panic(expected = "outside the playable area")]
    fn test_fill_piece_into_floor_panics() {
        let mut board = Board::new(3, 4);
        board.fill_piece(&Piece::new(PieceKind::O), 0, 2);
    }

    #[test]
    fn test_clear_lines_shifts_rows_down() {
        let mut board = board(
            "
            2...
            1111
            .3..
            4444
            ",
        );
        let cleared = board.clear_lines();
        assert_eq!(cleared, 2);
        assert_eq!(board.to_string(), "....\n....\n2...\n.3..");
        assert_eq!(board.rows(), 4);
        assert!(board.floor_row().iter().all(|&c| c == Board::FLOOR));
    }

    #[test]
    fn test_clear_lines_is_idempotent() {
        let mut board = board(
            "
            .1..
            1111
            11.1
            1111
            ",
        );
        board.clear_lines();
        let once = board.clone();
        assert_eq!(board.clear_lines(), 0);
        assert_eq!(board, once);
    }

    #[test]
    fn test_clear_lines_all_filled() {
        let mut board = board("1111\n2222\n3333");
        assert_eq!(board.clear_lines(), 3);
        assert_eq!(board, Board::new(3, 4));
    }

    #[test]
    fn test_row_with_invalid_marker_is_not_cleared() {
        let mut board = board("x111\n1111");
        assert_eq!(board.clear_lines(), 1);
        assert!(board.is_invalid());
    }

    #[test]
    fn test_place_speculative_marks_overlap() {
        let board = board(
            "
            ....
            ....
            .1..
            ",
        );
        let o = Piece::new(PieceKind::O);
        let (scratch, cleared) = board.place_speculative(&o, 0, 1);
        assert_eq!(cleared, 0);
        assert!(scratch.is_invalid());
        assert_eq!(scratch.cell(1, 0), Board::INVALID);
        // the source board is untouched
        assert!(!board.is_invalid());
    }

    #[test]
    fn test_place_speculative_marks_out_of_bounds() {
        let board = Board::new(3, 4);
        let i = Piece::new(PieceKind::I);
        // two cells past the right edge
        let (scratch, cleared) = board.place_speculative(&i, 2, 1);
        assert_eq!(cleared, 0);
        assert_eq!(scratch.cell(2, 1), i.color());
        assert_eq!(scratch.cell(3, 1), i.color());
        assert_eq!(scratch.cell(3, 0), Board::INVALID);
        assert_eq!(scratch.cell(0, 0), Board::EMPTY);

        // bottom half reaches into the floor row
        let o = Piece::new(PieceKind::O);
        let (scratch, cleared) = board.place_speculative(&o, 1, 2);
        assert_eq!(cleared, 0);
        assert_eq!(scratch.cell(1, 2), o.color());
        assert_eq!(scratch.cell(1, 0), Board::INVALID);
        assert_eq!(scratch.cell(2, 0), Board::INVALID);
        assert_eq!(scratch.cell(0, 0), Board::EMPTY);
        assert!(!board.is_invalid());
    }

    #[test]
    fn test_place_speculative_clears_lines() {
        let board = board(
            "
            ....
            11..
            ",
        );
        let o = Piece::new(PieceKind::O);
        let (scratch, cleared) = board.place_speculative(&o, 2, 0);
        assert_eq!(cleared, 1);
        assert!(!scratch.is_invalid());
        assert_eq!(scratch.to_string(), "....\n..66");
    }

    #[test]
    fn test_column_height() {
        let board = board(
            "
            ....
            .2..
            .2.1
            ",
        );
        assert_eq!(board.column_height(0), 0);
        assert_eq!(board.column_height(1), 2);
        assert_eq!(board.column_height(3), 1);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Board>(), Err(ParseBoardError::Empty));
        assert_eq!(
            "...\n..".parse::<Board>(),
            Err(ParseBoardError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            "..#".parse::<Board>(),
            Err(ParseBoardError::InvalidCell {
                row: 0,
                col: 2,
                found: '#'
            })
        );
    }

    #[test]
    fn test_board_serialization() {
        let board = board("....\n.x..\n1234");
        let serialized = serde_json::to_string(&board).unwrap();
        assert_eq!(serialized, r#"["....",".x..","1234"]"#);

        let deserialized: Board = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, board);
        assert!(serde_json::from_str::<Board>(r#"["...",".."]"#).is_err());
    }
}
