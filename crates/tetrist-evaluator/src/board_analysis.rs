//! Lazily evaluated board metrics.
//!
//! [`BoardAnalysis`] wraps a (scratch) board and computes each metric on first access.
//! Scoring models only pay for the metrics they read.

use std::cell::OnceCell;

use tetrist_engine::Board;

#[derive(Debug)]
pub struct BoardAnalysis {
    board: Board,
    column_heights: OnceCell<Vec<usize>>,
    max_height: OnceCell<usize>,
    bumpiness: OnceCell<usize>,
    num_holes: OnceCell<usize>,
    row_transitions: OnceCell<usize>,
    column_transitions: OnceCell<usize>,
    cumulative_wells: OnceCell<usize>,
}

impl Clone for BoardAnalysis {
    fn clone(&self) -> Self {
        Self::from_board(self.board.clone())
    }
}

impl BoardAnalysis {
    #[must_use]
    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            column_heights: OnceCell::new(),
            max_height: OnceCell::new(),
            bumpiness: OnceCell::new(),
            num_holes: OnceCell::new(),
            row_transitions: OnceCell::new(),
            column_transitions: OnceCell::new(),
            cumulative_wells: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn into_board(self) -> Board {
        self.board
    }

    /// Stack height of every column, measured from the floor.
    #[must_use]
    pub fn column_heights(&self) -> &[usize] {
        self.column_heights.get_or_init(|| {
            (0..self.board.cols())
                .map(|x| self.board.column_height(x))
                .collect()
        })
    }

    #[must_use]
    pub fn max_height(&self) -> usize {
        *self
            .max_height
            .get_or_init(|| self.column_heights().iter().copied().max().unwrap_or(0))
    }

    /// Sum of absolute height differences between adjacent columns.
    #[must_use]
    pub fn bumpiness(&self) -> usize {
        *self.bumpiness.get_or_init(|| {
            self.column_heights()
                .windows(2)
                .map(|w| w[0].abs_diff(w[1]))
                .sum()
        })
    }

    /// Number of empty cells judged covered by their immediate neighborhood.
    ///
    /// An empty cell is a hole when at least 3 of its 4 neighbors are filled. The side walls
    /// and the floor row count as filled; the open space above the top row does not. This is a
    /// local approximation, not a reachability test: a cell under an overhang with two open
    /// sides is not counted, and an open notch between two stacks is.
    #[must_use]
    pub fn num_holes(&self) -> usize {
        *self.num_holes.get_or_init(|| {
            let board = &self.board;
            (0..board.rows())
                .flat_map(|y| (0..board.cols()).map(move |x| (x, y)))
                .filter(|&(x, y)| is_hole(board, x, y))
                .count()
        })
    }

    /// Filled/empty boundaries crossed walking each row, with both side walls filled.
    #[must_use]
    pub fn row_transitions(&self) -> usize {
        *self.row_transitions.get_or_init(|| {
            self.board
                .playable_rows()
                .map(|row| {
                    let cells = row.iter().map(|&c| c != Board::EMPTY);
                    count_transitions(cells)
                })
                .sum()
        })
    }

    /// Filled/empty boundaries crossed walking each column top to bottom.
    ///
    /// The edge above the top row counts as filled, and the walk ends on the floor row.
    #[must_use]
    pub fn column_transitions(&self) -> usize {
        *self.column_transitions.get_or_init(|| {
            let board = &self.board;
            (0..board.cols())
                .map(|x| {
                    // include the floor row, which closes every column
                    let cells = (0..=board.rows()).map(|y| board.cell(x, y) != Board::EMPTY);
                    count_transitions(cells)
                })
                .sum()
        })
    }

    /// Sum over wells of `1 + 2 + ... + depth`.
    ///
    /// A well cell is an empty cell whose left and right neighbors (or walls) are both filled.
    /// Consecutive well cells down a column form one well; each contributes its running depth.
    #[must_use]
    pub fn cumulative_wells(&self) -> usize {
        *self.cumulative_wells.get_or_init(|| {
            let board = &self.board;
            let mut sum = 0;
            for x in 0..board.cols() {
                let mut depth = 0;
                for y in 0..board.rows() {
                    if is_well_cell(board, x, y) {
                        depth += 1;
                        sum += depth;
                    } else {
                        depth = 0;
                    }
                }
            }
            sum
        })
    }
}

fn is_filled(board: &Board, x: usize, y: usize) -> bool {
    board.cell(x, y) != Board::EMPTY
}

fn is_side_filled(board: &Board, x: Option<usize>, y: usize) -> bool {
    x.filter(|&x| x < board.cols())
        .is_none_or(|x| is_filled(board, x, y))
}

fn is_hole(board: &Board, x: usize, y: usize) -> bool {
    if is_filled(board, x, y) {
        return false;
    }
    let neighbors = [
        is_side_filled(board, x.checked_sub(1), y),
        is_side_filled(board, Some(x + 1), y),
        y > 0 && is_filled(board, x, y - 1),
        is_filled(board, x, y + 1),
    ];
    neighbors.iter().filter(|filled| **filled).count() >= 3
}

fn is_well_cell(board: &Board, x: usize, y: usize) -> bool {
    !is_filled(board, x, y)
        && is_side_filled(board, x.checked_sub(1), y)
        && is_side_filled(board, Some(x + 1), y)
}

fn count_transitions<I>(cells: I) -> usize
where
    I: IntoIterator<Item = bool>,
{
    let mut transitions = 0;
    let mut prev_occupied = true;
    for occupied in cells {
        if occupied != prev_occupied {
            transitions += 1;
        }
        prev_occupied = occupied;
    }
    if !prev_occupied {
        transitions += 1;
    }
    transitions
}
