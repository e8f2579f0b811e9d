use bevy::log::{debug, info};
use bevy::math::Vec2;

use super::board::{build_pieces, piece_size};
use super::drag::DragState;
use super::piece::{Piece, PieceId, PlayArea};
use super::shuffle::shuffle;
use super::snap::snap_position;
use super::win::{is_solved, DEFAULT_TOLERANCE};
use crate::error::PuzzleError;

/// Grid shape and win tolerance for one puzzle instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardSettings {
    pub grid_size: u32,
    pub tolerance: f32,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            grid_size: 6,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// What happened when the pointer let go of a piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Release {
    pub piece: PieceId,
    pub position: Vec2,
    pub snapped: bool,
    pub solved: bool,
    /// The puzzle went from unsolved to solved with this release.
    pub newly_solved: bool,
}

/// Everything one loaded puzzle owns. Loading another image replaces the
/// whole session.
#[derive(Debug, Clone)]
pub struct PuzzleSession {
    image: String,
    play_area: PlayArea,
    settings: BoardSettings,
    pieces: Vec<Piece>,
    /// Draw order, back to front.
    stacking: Vec<PieceId>,
    drag: DragState,
    solved: bool,
    rng: fastrand::Rng,
}

impl PuzzleSession {
    /// Builds the board with every piece on its home cell.
    pub fn new(
        image: impl Into<String>,
        play_area: PlayArea,
        settings: BoardSettings,
        rng: fastrand::Rng,
    ) -> Result<Self, PuzzleError> {
        let pieces = build_pieces(settings.grid_size, play_area)?;
        let stacking = pieces.iter().map(Piece::id).collect();
        Ok(Self {
            image: image.into(),
            play_area,
            settings,
            pieces,
            stacking,
            drag: DragState::Idle,
            solved: false,
            rng,
        })
    }

    /// Builds the board and scatters it, ready to play.
    pub fn load(
        image: impl Into<String>,
        play_area: PlayArea,
        settings: BoardSettings,
        rng: fastrand::Rng,
    ) -> Result<Self, PuzzleError> {
        let mut session = Self::new(image, play_area, settings, rng)?;
        session.shuffle();
        info!(
            "Loaded {} as a {n}x{n} puzzle in {}x{}",
            session.image,
            session.play_area.width,
            session.play_area.height,
            n = session.settings.grid_size
        );
        Ok(session)
    }

    pub fn shuffle(&mut self) {
        if let Some(piece) = self.drag.end() {
            debug!("Shuffle dropped piece {piece} mid-drag");
        }
        shuffle(&mut self.pieces, self.play_area, &mut self.rng);
        self.solved = false;
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub const fn play_area(&self) -> PlayArea {
        self.play_area
    }

    pub const fn settings(&self) -> BoardSettings {
        self.settings
    }

    pub fn piece_size(&self) -> f32 {
        piece_size(self.settings.grid_size, self.play_area)
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.0)
    }

    /// Draw order, back to front.
    pub fn stacking(&self) -> &[PieceId] {
        &self.stacking
    }

    pub fn stack_depth(&self, id: PieceId) -> Option<usize> {
        self.stacking.iter().position(|&stacked| stacked == id)
    }

    pub const fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Result of the last win evaluation.
    pub const fn is_solved(&self) -> bool {
        self.solved
    }

    /// Topmost piece under `at`.
    pub fn piece_at(&self, at: Vec2) -> Option<PieceId> {
        self.stacking
            .iter()
            .rev()
            .copied()
            .find(|&id| self.piece(id).is_some_and(|piece| piece.contains(at)))
    }

    /// Starts dragging the topmost piece under `at`, if any.
    pub fn press(&mut self, at: Vec2) -> Option<PieceId> {
        if self.drag.is_dragging() {
            debug!("Ignoring press at {at} while dragging");
            return None;
        }
        let id = self.piece_at(at)?;
        self.press_piece(id, at).ok()?.then_some(id)
    }

    /// Starts dragging `id`, grabbed at `at`. `Ok(false)` when a drag is
    /// already in progress.
    pub fn press_piece(&mut self, id: PieceId, at: Vec2) -> Result<bool, PuzzleError> {
        let piece = self
            .pieces
            .get(id.0)
            .ok_or(PuzzleError::UnknownPiece(id))?;
        if !self.drag.begin(piece, at) {
            debug!("Ignoring press on {id} while dragging");
            return Ok(false);
        }
        self.raise(id);
        Ok(true)
    }

    /// Moves the dragged piece under the pointer.
    pub fn drag_to(&mut self, at: Vec2) -> Option<PieceId> {
        let (id, position) = self.drag.follow(at)?;
        let piece = self.pieces.get_mut(id.0)?;
        piece.position = position;
        Some(id)
    }

    /// Drops the dragged piece, snapping it when it lies inside the play
    /// area, then re-evaluates the win.
    pub fn release(&mut self) -> Option<Release> {
        let id = self.drag.end()?;
        let play_area = self.play_area;
        let piece = self.pieces.get_mut(id.0)?;

        let snapped = snap_position(piece.position, piece.size(), play_area);
        if let Some(snapped) = snapped {
            piece.position = snapped;
        } else {
            debug!("Piece {id} dropped outside the play area at {}", piece.position);
        }
        let position = piece.position;

        let was_solved = self.solved;
        self.solved = is_solved(&self.pieces, self.settings.tolerance);
        if self.solved && !was_solved {
            info!("Puzzle {} solved", self.image);
        }

        Some(Release {
            piece: id,
            position,
            snapped: snapped.is_some(),
            solved: self.solved,
            newly_solved: self.solved && !was_solved,
        })
    }

    fn raise(&mut self, id: PieceId) {
        self.stacking.retain(|&stacked| stacked != id);
        self.stacking.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> PuzzleSession {
        PuzzleSession::new(
            "test.png",
            PlayArea::new(600.0, 600.0),
            BoardSettings::default(),
            fastrand::Rng::with_seed(1),
        )
        .expect("valid board")
    }

    #[test]
    fn press_raises_piece_to_top() {
        let mut session = session();
        assert_eq!(session.stack_depth(PieceId(0)), Some(0));

        assert_eq!(session.press(Vec2::new(50.0, 50.0)), Some(PieceId(0)));
        assert_eq!(session.stacking().last(), Some(&PieceId(0)));
        assert_eq!(session.stack_depth(PieceId(0)), Some(35));
    }

    #[test]
    fn topmost_piece_wins_the_hit_test() {
        let mut session = session();
        // Park piece 7 over piece 0, then grab the overlap.
        assert_eq!(session.press(Vec2::new(150.0, 150.0)), Some(PieceId(7)));
        session.drag_to(Vec2::new(60.0, 60.0));
        assert!(session.release().is_some());

        assert_eq!(session.piece_at(Vec2::new(40.0, 40.0)), Some(PieceId(7)));
    }

    #[test]
    fn press_on_empty_space_does_nothing() {
        let mut session = session();
        assert_eq!(session.press(Vec2::new(-5.0, -5.0)), None);
        assert_eq!(session.drag_state(), DragState::Idle);
    }

    #[test]
    fn unknown_piece_is_an_error() {
        let mut session = session();
        assert_eq!(
            session.press_piece(PieceId(99), Vec2::ZERO),
            Err(PuzzleError::UnknownPiece(PieceId(99)))
        );
    }

    #[test]
    fn shuffle_ends_an_active_drag() {
        let mut session = session();
        assert!(session.press(Vec2::new(10.0, 10.0)).is_some());
        session.shuffle();
        assert_eq!(session.drag_state(), DragState::Idle);
        assert_eq!(session.release(), None);
    }

    #[test]
    fn win_is_reported_once() {
        let mut session = session();
        assert!(session.press(Vec2::new(10.0, 10.0)).is_some());
        let first = session.release().expect("drag was active");
        assert!(first.solved && first.newly_solved);

        assert!(session.press(Vec2::new(10.0, 10.0)).is_some());
        let second = session.release().expect("drag was active");
        assert!(second.solved && !second.newly_solved);
    }
}
