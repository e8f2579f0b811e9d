use thiserror::Error;

use crate::puzzle::PieceId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PuzzleError {
    #[error("Grid size must be at least 1")]
    EmptyGrid,

    #[error("Play area is not laid out yet ({width}x{height})")]
    UnsizedPlayArea { width: f32, height: f32 },

    #[error("Play area height {height} cannot fit a {piece}px piece")]
    PlayAreaTooShort { height: f32, piece: f32 },

    #[error("No piece with id {0}")]
    UnknownPiece(PieceId),
}
