use bevy::prelude::*;
use bevy::window::WindowResized;

use crate::config::JigsawConfig;
use crate::error::PuzzleError;
use crate::pointer::{world_pointer_actions, PointerAction};
use crate::puzzle::{PuzzleSession, Release};
use crate::toolbar::ToolbarButton;
use crate::view::PlayAreaFrame;

#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameState {
    /// Waiting for a window size to build the first puzzle.
    #[default]
    Init,
    Playing,
    /// Every piece is home. Pieces can still be picked up, which returns
    /// to `Playing`.
    Solved,
    /// The host ended the bit; input is ignored until a restart.
    Ended,
}

/// Frame order: toolbar input, puzzle (re)builds, dragging, then sprites.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PuzzleSet {
    Input,
    Load,
    Drag,
    Present,
}

/// Rebuild the puzzle from the selected image. Also used as reset.
#[derive(Event, Debug, Clone, Copy)]
pub struct LoadPuzzle;

#[derive(Event, Debug, Clone, Copy)]
pub struct ShufflePuzzle;

/// A new session replaced the previous one.
#[derive(Event, Debug, Clone, Copy)]
pub struct PuzzleLoaded;

#[derive(Event, Debug, Clone)]
pub struct PuzzleSolved {
    pub image: String,
}

/// Index into [`JigsawConfig::images`] of the image the next load uses.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImageSelection {
    pub index: usize,
}

impl ImageSelection {
    pub fn cycle(&mut self, image_count: usize) {
        self.index = if image_count == 0 {
            0
        } else {
            (self.index + 1) % image_count
        };
    }
}

pub struct LoadedPuzzle {
    pub session: PuzzleSession,
    pub image: Handle<Image>,
    pub frame: PlayAreaFrame,
}

#[derive(Resource, Default)]
pub struct ActivePuzzle(pub Option<LoadedPuzzle>);

impl ActivePuzzle {
    pub fn is_solved(&self) -> bool {
        self.0.as_ref().is_some_and(|puzzle| puzzle.session.is_solved())
    }
}

#[derive(Component)]
struct SolvedBanner;

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .init_resource::<ImageSelection>()
            .init_resource::<ActivePuzzle>()
            .add_event::<LoadPuzzle>()
            .add_event::<ShufflePuzzle>()
            .add_event::<PuzzleLoaded>()
            .add_event::<PuzzleSolved>()
            .configure_sets(
                Update,
                (
                    PuzzleSet::Input,
                    PuzzleSet::Load,
                    PuzzleSet::Drag,
                    PuzzleSet::Present,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                request_initial_load
                    .run_if(in_state(GameState::Init))
                    .in_set(PuzzleSet::Input),
            )
            .add_systems(
                Update,
                (handle_load, handle_shuffle, refit_play_area)
                    .chain()
                    .in_set(PuzzleSet::Load),
            )
            .add_systems(
                Update,
                drive_drag
                    .run_if(in_state(GameState::Playing).or(in_state(GameState::Solved)))
                    .in_set(PuzzleSet::Drag),
            )
            .add_systems(Update, show_solved_banner.in_set(PuzzleSet::Present))
            .add_systems(OnExit(GameState::Solved), despawn_solved_banner);
    }
}

fn request_initial_load(mut load_events: EventWriter<LoadPuzzle>) {
    load_events.send(LoadPuzzle);
}

fn handle_load(
    mut load_events: EventReader<LoadPuzzle>,
    mut loaded_events: EventWriter<PuzzleLoaded>,
    config: Res<JigsawConfig>,
    selection: Res<ImageSelection>,
    windows: Query<&Window>,
    asset_server: Res<AssetServer>,
    mut active: ResMut<ActivePuzzle>,
    mut next_state: ResMut<NextState<GameState>>,
    mut last_error: Local<Option<PuzzleError>>,
) {
    if load_events.is_empty() {
        return;
    }
    load_events.clear();

    let Ok(window) = windows.get_single() else {
        return;
    };
    let Some(image) = config.images.get(selection.index) else {
        error!("No puzzle image at index {}", selection.index);
        return;
    };

    let frame = PlayAreaFrame::fit(window.size(), config.play_area_fill);
    match PuzzleSession::load(
        image.path.clone(),
        frame.area,
        config.board_settings(),
        config.rng(),
    ) {
        Ok(session) => {
            *last_error = None;
            active.0 = Some(LoadedPuzzle {
                session,
                image: asset_server.load(image.path.clone()),
                frame,
            });
            loaded_events.send(PuzzleLoaded);
            next_state.set(GameState::Playing);
        }
        Err(err) => {
            // The window may take a few frames to get a size; report each
            // distinct failure once.
            if last_error.as_ref() != Some(&err) {
                warn!("Skipping puzzle build: {err}");
            }
            *last_error = Some(err);
        }
    }
}

fn handle_shuffle(
    mut shuffle_events: EventReader<ShufflePuzzle>,
    mut active: ResMut<ActivePuzzle>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if shuffle_events.is_empty() {
        return;
    }
    shuffle_events.clear();

    if !matches!(state.get(), GameState::Playing | GameState::Solved) {
        return;
    }
    let Some(puzzle) = active.0.as_mut() else {
        return;
    };
    puzzle.session.shuffle();
    info!("Shuffled {}", puzzle.session.image());
    next_state.set(GameState::Playing);
}

fn refit_play_area(
    mut resized_events: EventReader<WindowResized>,
    config: Res<JigsawConfig>,
    mut active: ResMut<ActivePuzzle>,
) {
    let Some(resized) = resized_events.read().last() else {
        return;
    };
    let Some(puzzle) = active.0.as_mut() else {
        return;
    };
    let window_size = Vec2::new(resized.width, resized.height);
    puzzle.frame = puzzle.frame.refit(window_size, config.play_area_fill);
    debug!("Play area rescaled to {} for {window_size}", puzzle.frame.scale);
}

/// State change a release calls for: a fresh win moves to `Solved`, and
/// breaking a finished picture goes back to `Playing`.
fn state_after_release(current: &GameState, release: &Release) -> Option<GameState> {
    if release.newly_solved {
        Some(GameState::Solved)
    } else if !release.solved && *current == GameState::Solved {
        Some(GameState::Playing)
    } else {
        None
    }
}

fn drive_drag(
    button_input: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    windows: Query<&Window>,
    camera: Query<(&Camera, &GlobalTransform)>,
    toolbar: Query<&Interaction, With<ToolbarButton>>,
    mut active: ResMut<ActivePuzzle>,
    mut solved_events: EventWriter<PuzzleSolved>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut tracked_touch: Local<Option<u64>>,
) {
    let Some(puzzle) = active.0.as_mut() else {
        return;
    };

    let actions = world_pointer_actions(
        &button_input,
        &touch_input,
        &mut tracked_touch,
        &windows,
        &camera,
    );
    for action in actions {
        match action {
            PointerAction::Press(world_position) => {
                // Presses on the toolbar belong to its buttons.
                if toolbar.iter().any(|interaction| *interaction != Interaction::None) {
                    continue;
                }
                puzzle.session.press(puzzle.frame.to_local(world_position));
            }
            PointerAction::Move(world_position) => {
                puzzle.session.drag_to(puzzle.frame.to_local(world_position));
            }
            PointerAction::Release => {
                let Some(release) = puzzle.session.release() else {
                    continue;
                };
                if release.newly_solved {
                    solved_events.send(PuzzleSolved {
                        image: puzzle.session.image().to_owned(),
                    });
                }
                if let Some(next) = state_after_release(state.get(), &release) {
                    next_state.set(next);
                }
            }
        }
    }
}

fn show_solved_banner(mut commands: Commands, mut solved_events: EventReader<PuzzleSolved>) {
    let Some(solved) = solved_events.read().last() else {
        return;
    };
    debug!("Showing win banner for {}", solved.image);
    commands.spawn((
        Text::new("Puzzle complete!"),
        TextFont {
            font_size: 40.0,
            ..default()
        },
        TextColor(Color::WHITE),
        TextLayout::new_with_justify(JustifyText::Center),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Percent(4.0),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            ..default()
        },
        SolvedBanner,
    ));
}

fn despawn_solved_banner(mut commands: Commands, banners: Query<Entity, With<SolvedBanner>>) {
    for entity in &banners {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::PieceId;

    fn release(solved: bool, newly_solved: bool) -> Release {
        Release {
            piece: PieceId(0),
            position: Vec2::ZERO,
            snapped: true,
            solved,
            newly_solved,
        }
    }

    #[test]
    fn winning_release_enters_solved() {
        assert_eq!(
            state_after_release(&GameState::Playing, &release(true, true)),
            Some(GameState::Solved)
        );
    }

    #[test]
    fn moving_a_piece_after_the_win_resumes_play() {
        assert_eq!(
            state_after_release(&GameState::Solved, &release(false, false)),
            Some(GameState::Playing)
        );
        // Picking a piece up and putting it back keeps the win.
        assert_eq!(
            state_after_release(&GameState::Solved, &release(true, false)),
            None
        );
        assert_eq!(
            state_after_release(&GameState::Playing, &release(false, false)),
            None
        );
    }

    #[test]
    fn image_selection_wraps() {
        let mut selection = ImageSelection::default();
        selection.cycle(3);
        selection.cycle(3);
        assert_eq!(selection.index, 2);
        selection.cycle(3);
        assert_eq!(selection.index, 0);
        selection.cycle(0);
        assert_eq!(selection.index, 0);
    }
}
