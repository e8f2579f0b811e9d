use core::fmt::{self, Display, Formatter};

use bevy::math::{Rect, UVec2, Vec2};

use crate::error::PuzzleError;

/// Index of a piece inside its session, stable for the life of the puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub usize);

impl Display for PieceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The bounded region pieces are shuffled into, in pixels.
///
/// Coordinates follow the page convention: origin at the top-left corner,
/// y growing downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
}

impl PlayArea {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub const fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn ensure_sized(&self) -> Result<(), PuzzleError> {
        let sized = |v: f32| v.is_finite() && v > 0.0;
        if sized(self.width) && sized(self.height) {
            Ok(())
        } else {
            Err(PuzzleError::UnsizedPlayArea {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Largest top-left position that keeps a piece of `piece_size` fully inside.
    pub fn max_position(&self, piece_size: Vec2) -> Vec2 {
        self.size() - piece_size
    }

    pub fn contains_piece_at(&self, position: Vec2, piece_size: Vec2) -> bool {
        let max = self.max_position(piece_size);
        (0.0..=max.x).contains(&position.x) && (0.0..=max.y).contains(&position.y)
    }
}

/// The part of the source image a piece displays.
///
/// The image is stretched to exactly fill the play area; the piece shows the
/// `size` window found at `-offset` in that stretched image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageRegion {
    pub offset: Vec2,
    pub size: Vec2,
    pub scaled_image: Vec2,
}

impl ImageRegion {
    /// Crop rectangle in play-area pixels.
    pub fn rect(&self) -> Rect {
        Rect::from_corners(-self.offset, -self.offset + self.size)
    }

    /// Crop rectangle in texels of an image whose real size is `image_size`.
    pub fn texel_rect(&self, image_size: UVec2) -> Rect {
        let scale = image_size.as_vec2() / self.scaled_image;
        let rect = self.rect();
        Rect::from_corners(rect.min * scale, rect.max * scale)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    id: PieceId,
    correct_row: u32,
    correct_col: u32,
    size: Vec2,
    region: ImageRegion,
    pub(crate) position: Vec2,
}

impl Piece {
    pub(crate) fn new(
        id: PieceId,
        row: u32,
        col: u32,
        piece_size: f32,
        play_area: PlayArea,
    ) -> Self {
        let home = Vec2::new(col as f32, row as f32) * piece_size;
        Self {
            id,
            correct_row: row,
            correct_col: col,
            size: Vec2::splat(piece_size),
            region: ImageRegion {
                offset: -home,
                size: Vec2::splat(piece_size),
                scaled_image: play_area.size(),
            },
            position: home,
        }
    }

    pub const fn id(&self) -> PieceId {
        self.id
    }

    pub const fn correct_row(&self) -> u32 {
        self.correct_row
    }

    pub const fn correct_col(&self) -> u32 {
        self.correct_col
    }

    pub const fn position(&self) -> Vec2 {
        self.position
    }

    pub const fn size(&self) -> Vec2 {
        self.size
    }

    pub const fn region(&self) -> &ImageRegion {
        &self.region
    }

    /// Top-left corner of the piece's home cell.
    pub fn home_position(&self) -> Vec2 {
        Vec2::new(self.correct_col as f32, self.correct_row as f32) * self.size.x
    }

    pub fn contains(&self, point: Vec2) -> bool {
        Rect::from_corners(self.position, self.position + self.size).contains(point)
    }
}
