use bevy::math::Vec2;

use super::piece::{Piece, PlayArea};

/// Scatters every piece uniformly inside the play area. Pieces may overlap.
pub fn shuffle(pieces: &mut [Piece], play_area: PlayArea, rng: &mut fastrand::Rng) {
    for piece in pieces {
        // Clamped at zero so a piece wider than the area still lands at the origin.
        let max = play_area.max_position(piece.size()).max(Vec2::ZERO);
        piece.position = Vec2::new(rng.f32() * max.x, rng.f32() * max.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::board::build_pieces;

    fn assert_in_bounds(pieces: &[Piece], play_area: PlayArea) {
        for piece in pieces {
            let max = play_area.max_position(piece.size());
            let p = piece.position();
            assert!(
                (0.0..=max.x).contains(&p.x) && (0.0..=max.y).contains(&p.y),
                "piece {} escaped to {p}",
                piece.id()
            );
        }
    }

    #[test]
    fn stays_within_bounds() {
        let play_area = PlayArea::new(600.0, 450.0);
        let mut pieces = build_pieces(6, play_area).expect("valid board");
        let mut rng = fastrand::Rng::with_seed(7);

        shuffle(&mut pieces, play_area, &mut rng);
        assert_in_bounds(&pieces, play_area);

        let first = pieces.iter().map(Piece::position).collect::<Vec<_>>();
        shuffle(&mut pieces, play_area, &mut rng);
        assert_in_bounds(&pieces, play_area);
        let second = pieces.iter().map(Piece::position).collect::<Vec<_>>();
        assert_ne!(first, second, "a second shuffle should move pieces");
    }

    #[test]
    fn same_seed_same_layout() {
        let play_area = PlayArea::new(300.0, 300.0);
        let mut a = build_pieces(3, play_area).expect("valid board");
        let mut b = a.clone();
        shuffle(&mut a, play_area, &mut fastrand::Rng::with_seed(42));
        shuffle(&mut b, play_area, &mut fastrand::Rng::with_seed(42));
        assert_eq!(a, b);
    }
}
