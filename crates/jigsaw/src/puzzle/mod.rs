//! Engine-free puzzle model: board building, shuffling, dragging, snapping
//! and win detection over plain piece records. The Bevy side only reads
//! positions out of here and feeds pointer input in.

pub mod board;
pub mod drag;
pub mod piece;
pub mod session;
pub mod shuffle;
pub mod snap;
pub mod win;

pub use drag::DragState;
pub use piece::{ImageRegion, Piece, PieceId, PlayArea};
pub use session::{BoardSettings, PuzzleSession, Release};
