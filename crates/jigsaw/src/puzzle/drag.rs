use bevy::math::Vec2;

use super::piece::{Piece, PieceId};

/// Pointer ownership of at most one piece.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        piece: PieceId,
        /// Pointer position relative to the piece's top-left corner at press time.
        offset: Vec2,
    },
}

impl DragState {
    pub const fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    pub const fn dragged_piece(&self) -> Option<PieceId> {
        match *self {
            Self::Idle => None,
            Self::Dragging { piece, .. } => Some(piece),
        }
    }

    /// Grabs `piece` at pointer position `at`. Returns `false` and keeps the
    /// current drag when another press arrives mid-drag.
    pub fn begin(&mut self, piece: &Piece, at: Vec2) -> bool {
        if self.is_dragging() {
            return false;
        }
        *self = Self::Dragging {
            piece: piece.id(),
            offset: at - piece.position(),
        };
        true
    }

    /// Where the dragged piece goes for a pointer at `at`. No clamping.
    pub fn follow(&self, at: Vec2) -> Option<(PieceId, Vec2)> {
        match *self {
            Self::Idle => None,
            Self::Dragging { piece, offset } => Some((piece, at - offset)),
        }
    }

    pub fn end(&mut self) -> Option<PieceId> {
        let piece = self.dragged_piece();
        *self = Self::Idle;
        piece
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::board::build_pieces;
    use crate::puzzle::piece::PlayArea;

    fn pieces() -> Vec<Piece> {
        build_pieces(2, PlayArea::new(200.0, 200.0)).expect("valid board")
    }

    #[test]
    fn keeps_grab_offset() {
        let pieces = pieces();
        let Some(piece) = pieces.get(3) else {
            panic!("board has 4 pieces");
        };
        let mut drag = DragState::default();

        assert!(drag.begin(piece, Vec2::new(130.0, 120.0)));
        assert_eq!(
            drag,
            DragState::Dragging {
                piece: PieceId(3),
                offset: Vec2::new(30.0, 20.0)
            }
        );
        assert_eq!(
            drag.follow(Vec2::new(10.0, -50.0)),
            Some((PieceId(3), Vec2::new(-20.0, -70.0)))
        );
    }

    #[test]
    fn second_press_is_ignored() {
        let pieces = pieces();
        let (Some(first), Some(second)) = (pieces.first(), pieces.get(1)) else {
            panic!("board has 4 pieces");
        };
        let mut drag = DragState::default();

        assert!(drag.begin(first, Vec2::new(10.0, 10.0)));
        assert!(!drag.begin(second, Vec2::new(110.0, 10.0)));
        assert_eq!(drag.dragged_piece(), Some(PieceId(0)));
    }

    #[test]
    fn idle_ignores_move_and_release() {
        let mut drag = DragState::Idle;
        assert_eq!(drag.follow(Vec2::ONE), None);
        assert_eq!(drag.end(), None);
        assert_eq!(drag, DragState::Idle);
    }
}
