use bevy::math::Vec2;

use super::piece::PlayArea;

/// Nearest grid-aligned position for a piece released at `position`, or
/// `None` when the piece is not fully inside the play area. Pieces outside
/// the area are left where they were dropped.
pub fn snap_position(position: Vec2, piece_size: Vec2, play_area: PlayArea) -> Option<Vec2> {
    if !play_area.contains_piece_at(position, piece_size) {
        return None;
    }
    let max = play_area.max_position(piece_size);
    let snapped = (position / piece_size).round() * piece_size;
    Some(snapped.clamp(Vec2::ZERO, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIECE: Vec2 = Vec2::splat(100.0);

    #[test]
    fn rounds_to_nearest_cell() {
        let area = PlayArea::new(600.0, 600.0);
        assert_eq!(
            snap_position(Vec2::new(304.0, 197.0), PIECE, area),
            Some(Vec2::new(300.0, 200.0))
        );
        assert_eq!(
            snap_position(Vec2::new(149.0, 151.0), PIECE, area),
            Some(Vec2::new(100.0, 200.0))
        );
        assert_eq!(
            snap_position(Vec2::ZERO, PIECE, area),
            Some(Vec2::ZERO)
        );
    }

    #[test]
    fn clamps_to_bounds() {
        // 580 wide: max_x is 480 but the nearest column is 500.
        let area = PlayArea::new(580.0, 600.0);
        assert_eq!(
            snap_position(Vec2::new(470.0, 20.0), PIECE, area),
            Some(Vec2::new(480.0, 0.0))
        );
    }

    #[test]
    fn leaves_pieces_outside_alone() {
        let area = PlayArea::new(600.0, 600.0);
        assert_eq!(snap_position(Vec2::new(-10.0, 50.0), PIECE, area), None);
        assert_eq!(snap_position(Vec2::new(50.0, 501.0), PIECE, area), None);
        assert_eq!(snap_position(Vec2::new(700.0, 700.0), PIECE, area), None);
    }
}
