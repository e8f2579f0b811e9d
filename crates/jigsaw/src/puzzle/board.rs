use bevy::math::Vec2;

use super::piece::{Piece, PieceId, PlayArea};
use crate::error::PuzzleError;

/// Side length of every piece. The play-area width drives the size on both
/// axes, so pieces are square even when the play area is not.
pub fn piece_size(grid_size: u32, play_area: PlayArea) -> f32 {
    play_area.width / grid_size as f32
}

/// Slices the play area into `grid_size * grid_size` pieces, row-major, each
/// sitting on its home cell.
pub fn build_pieces(grid_size: u32, play_area: PlayArea) -> Result<Vec<Piece>, PuzzleError> {
    if grid_size == 0 {
        return Err(PuzzleError::EmptyGrid);
    }
    play_area.ensure_sized()?;

    let size = piece_size(grid_size, play_area);
    if play_area.max_position(Vec2::splat(size)).y < 0.0 {
        return Err(PuzzleError::PlayAreaTooShort {
            height: play_area.height,
            piece: size,
        });
    }

    let pieces = (0..grid_size)
        .flat_map(|row| (0..grid_size).map(move |col| (row, col)))
        .enumerate()
        .map(|(index, (row, col))| Piece::new(PieceId(index), row, col, size, play_area))
        .collect();
    Ok(pieces)
}
