//! Baseline player that places each piece at a uniformly random legal drop.

use rand::{Rng, seq::IndexedRandom as _};
use tetrist_engine::{Board, Piece, Placement, drop_row};

use crate::move_enumerator::rotations;

/// Picks a rotation and column uniformly among the drops that fit on `board`.
///
/// When no drop fits, returns the unrotated piece at the top-left corner, which collides;
/// callers detect it with [`Placement::fits`].
pub fn random_placement<R>(board: &Board, piece: &Piece, rng: &mut R) -> Placement
where
    R: Rng + ?Sized,
{
    let placements = rotations(piece)
        .into_iter()
        .flat_map(|rotated| {
            let max_x = board.cols().saturating_sub(rotated.width());
            (0..=max_x).filter_map(move |x| {
                drop_row(board, &rotated, x).map(|y| Placement::new(rotated, x, y))
            })
        })
        .collect::<Vec<_>>();
    placements
        .choose(rng)
        .copied()
        .unwrap_or_else(|| Placement::new(*piece, 0, 0))
}
