use super::piece::Piece;

/// Default distance, in pixels, a piece may sit from its home cell and still
/// count as placed.
pub const DEFAULT_TOLERANCE: f32 = 5.0;

pub fn piece_is_home(piece: &Piece, tolerance: f32) -> bool {
    let delta = (piece.position() - piece.home_position()).abs();
    delta.x < tolerance && delta.y < tolerance
}

pub fn is_solved(pieces: &[Piece], tolerance: f32) -> bool {
    pieces.iter().all(|piece| piece_is_home(piece, tolerance))
}

#[cfg(test)]
mod tests {
    use bevy::math::Vec2;

    use super::*;
    use crate::puzzle::board::build_pieces;
    use crate::puzzle::piece::PlayArea;

    fn solved_board() -> Vec<Piece> {
        build_pieces(6, PlayArea::new(600.0, 600.0)).expect("valid board")
    }

    #[test]
    fn fresh_board_is_solved() {
        assert!(is_solved(&solved_board(), DEFAULT_TOLERANCE));
    }

    #[test]
    fn one_piece_off_by_tolerance_breaks_the_win() {
        for nudge in [
            Vec2::new(5.0, 0.0),
            Vec2::new(0.0, -5.0),
            Vec2::new(-12.0, 30.0),
        ] {
            let mut pieces = solved_board();
            let Some(piece) = pieces.get_mut(14) else {
                panic!("board has 36 pieces");
            };
            piece.position += nudge;
            assert!(!is_solved(&pieces, DEFAULT_TOLERANCE), "nudge {nudge}");
        }
    }

    #[test]
    fn small_drift_still_counts() {
        let mut pieces = solved_board();
        for piece in &mut pieces {
            piece.position += Vec2::new(4.9, -4.9);
        }
        assert!(is_solved(&pieces, DEFAULT_TOLERANCE));
    }
}
