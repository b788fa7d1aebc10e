use std::str::FromStr;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Side length of the largest bounding box any canonical piece occupies.
pub const MAX_PIECE_SIZE: usize = 4;

type PieceGrid = [[u8; MAX_PIECE_SIZE]; MAX_PIECE_SIZE];

/// A tetromino as a small rectangular grid of color ids.
///
/// Pieces are immutable values: [`Piece::rotated_clockwise`] returns a new piece and leaves
/// the source untouched. Every occupied cell carries the same color id, which is also the
/// value written into the board when the piece is committed.
///
/// # Example
///
/// ```
/// use tetrist_engine::{Piece, PieceKind};
///
/// let piece = Piece::new(PieceKind::I);
/// assert_eq!((piece.width(), piece.height()), (4, 1));
///
/// let vertical = piece.rotated_clockwise();
/// assert_eq!((vertical.width(), vertical.height()), (1, 4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    rotation: PieceRotation,
    width: u8,
    height: u8,
    cells: PieceGrid,
}

impl Piece {
    /// Creates a piece of the given kind in its spawn orientation.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub fn new(kind: PieceKind) -> Self {
        let shape = kind.spawn_shape();
        let mut cells = [[0; MAX_PIECE_SIZE]; MAX_PIECE_SIZE];
        for (dst, src) in cells.iter_mut().zip(shape) {
            dst[..src.len()].copy_from_slice(src);
        }
        Self {
            kind,
            rotation: PieceRotation::default(),
            width: shape[0].len() as u8,
            height: shape.len() as u8,
            cells,
        }
    }

    /// Creates a piece of the given kind rotated clockwise `rotation` times from spawn.
    #[must_use]
    pub fn with_rotation(kind: PieceKind, rotation: u8) -> Self {
        let mut piece = Self::new(kind);
        for _ in 0..rotation % 4 {
            piece = piece.rotated_clockwise();
        }
        piece
    }

    /// Draws a uniformly random piece among the seven canonical shapes.
    #[must_use]
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new(rng.random())
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn width(&self) -> usize {
        usize::from(self.width)
    }

    #[must_use]
    pub fn height(&self) -> usize {
        usize::from(self.height)
    }

    /// Color id written into the board for every occupied cell.
    #[must_use]
    pub fn color(&self) -> i32 {
        self.kind.color()
    }

    /// Value of the cell at `(dx, dy)` inside the bounding box (`0` for empty).
    #[must_use]
    pub fn cell(&self, dx: usize, dy: usize) -> u8 {
        assert!(dx < self.width() && dy < self.height());
        self.cells[dy][dx]
    }

    /// Iterates the rows of the bounding box, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.cells[..self.height()]
            .iter()
            .map(|row| &row[..self.width()])
    }

    /// Returns an iterator of occupied `(dx, dy)` offsets inside the bounding box.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows().enumerate().flat_map(|(dy, row)| {
            row.iter()
                .enumerate()
                .filter(|(_dx, cell)| **cell != 0)
                .map(move |(dx, _cell)| (dx, dy))
        })
    }

    /// Returns the piece rotated a quarter turn.
    ///
    /// The new grid is the transpose of the old one with its columns reversed:
    /// `new[x][y] = old[y][width - 1 - x]`. Four rotations yield the original piece.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        let (width, height) = (self.width(), self.height());
        let mut cells = [[0; MAX_PIECE_SIZE]; MAX_PIECE_SIZE];
        for (new_y, row) in cells.iter_mut().take(width).enumerate() {
            for (new_x, cell) in row.iter_mut().take(height).enumerate() {
                *cell = self.cells[new_x][width - 1 - new_y];
            }
        }
        Self {
            kind: self.kind,
            rotation: self.rotation.rotated_right(),
            width: self.height,
            height: self.width,
            cells,
        }
    }
}

/// Number of clockwise quarter turns applied since spawn, modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceRotation(u8);

impl PieceRotation {
    #[must_use]
    pub fn rotated_right(self) -> Self {
        PieceRotation((self.0 + 1) % 4)
    }

    #[must_use]
    pub const fn count(self) -> u8 {
        self.0
    }
}

/// The seven canonical tetromino shapes.
///
/// The discriminant doubles as the color id stored in board cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    I = 1,
    S = 2,
    Z = 3,
    L = 4,
    J = 5,
    O = 6,
    T = 7,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::L,
        PieceKind::J,
        PieceKind::O,
        PieceKind::T,
    ];

    #[must_use]
    pub const fn color(self) -> i32 {
        self as i32
    }

    const fn spawn_shape(self) -> &'static [&'static [u8]] {
        match self {
            PieceKind::I => &[&[1, 1, 1, 1]],
            PieceKind::S => &[&[0, 2, 2], &[2, 2, 0]],
            PieceKind::Z => &[&[3, 3, 0], &[0, 3, 3]],
            PieceKind::L => &[&[0, 0, 4], &[4, 4, 4]],
            PieceKind::J => &[&[5, 0, 0], &[5, 5, 5]],
            PieceKind::O => &[&[6, 6], &[6, 6]],
            PieceKind::T => &[&[7, 7, 7], &[0, 7, 0]],
        }
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// ```
    /// use tetrist_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
        }
    }

    /// Parses a piece kind from a single character (case-insensitive).
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'I' => Some(PieceKind::I),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'L' => Some(PieceKind::L),
            'J' => Some(PieceKind::J),
            'O' => Some(PieceKind::O),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid piece kind: {input:?} (expected one of I, S, Z, L, J, O, T)")]
pub struct ParsePieceKindError {
    input: String,
}

impl FromStr for PieceKind {
    type Err = ParsePieceKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => None,
        }
        .ok_or_else(|| ParsePieceKindError {
            input: s.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn grid(piece: &Piece) -> Vec<Vec<u8>> {
        piece.rows().map(<[u8]>::to_vec).collect()
    }

    #[test]
    fn test_four_rotations_are_identity() {
        for kind in PieceKind::ALL {
            let piece = Piece::new(kind);
            let rotated = piece
                .rotated_clockwise()
                .rotated_clockwise()
                .rotated_clockwise()
                .rotated_clockwise();
            assert_eq!(rotated, piece, "{kind:?} should return to spawn after 4 turns");
        }
    }

    #[test]
    fn test_rotation_does_not_mutate_source() {
        let piece = Piece::new(PieceKind::L);
        let before = grid(&piece);
        let _ = piece.rotated_clockwise();
        assert_eq!(grid(&piece), before);
    }

    #[test]
    fn test_rotation_formula() {
        // [[0,0,4],[4,4,4]] -> new[x][y] = old[y][w-1-x]
        let rotated = Piece::new(PieceKind::L).rotated_clockwise();
        assert_eq!(grid(&rotated), vec![vec![4, 4], vec![0, 4], vec![0, 4]]);
        assert_eq!(rotated.rotation().count(), 1);

        let vertical = Piece::new(PieceKind::I).rotated_clockwise();
        assert_eq!(grid(&vertical), vec![vec![1], vec![1], vec![1], vec![1]]);
    }

    #[test]
    fn test_o_piece_grid_is_rotation_invariant() {
        let piece = Piece::new(PieceKind::O);
        let mut rotated = piece;
        for _ in 0..4 {
            rotated = rotated.rotated_clockwise();
            assert_eq!(grid(&rotated), grid(&piece));
        }
    }

    #[test]
    fn test_every_piece_has_four_cells_of_one_color() {
        for kind in PieceKind::ALL {
            let piece = Piece::new(kind);
            assert_eq!(piece.occupied_positions().count(), 4);
            for (dx, dy) in piece.occupied_positions() {
                assert_eq!(i32::from(piece.cell(dx, dy)), kind.color());
            }
        }
    }

    #[test]
    fn test_with_rotation_wraps() {
        for kind in PieceKind::ALL {
            assert_eq!(Piece::with_rotation(kind, 4), Piece::new(kind));
            assert_eq!(
                Piece::with_rotation(kind, 1),
                Piece::new(kind).rotated_clockwise()
            );
        }
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
            assert_eq!(kind.as_char().to_string().parse::<PieceKind>(), Ok(kind));
        }
        assert_eq!(PieceKind::from_char('t'), Some(PieceKind::T));
        assert_eq!(PieceKind::from_char('X'), None);
        assert!("IS".parse::<PieceKind>().is_err());
        assert!("".parse::<PieceKind>().is_err());
    }

    #[test]
    fn test_random_piece_covers_all_kinds() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = [false; PieceKind::LEN];
        for _ in 0..500 {
            let piece = Piece::random(&mut rng);
            seen[usize::from(piece.kind() as u8) - 1] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
