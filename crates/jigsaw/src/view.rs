use bevy::prelude::*;

use crate::game::{ActivePuzzle, PuzzleLoaded, PuzzleSet};
use crate::puzzle::{PieceId, PlayArea};
use crate::toolbar::TOOLBAR_HEIGHT;

const BACKDROP_COLOR: Color = Color::srgb(0.12, 0.12, 0.14);
const BACKDROP_Z: f32 = -10.0;
const PIECE_Z: f32 = 0.0;
const PIECE_Z_STEP: f32 = 0.01;

/// Where the play area sits in the world. The puzzle model works in
/// play-area pixels (origin top-left, y down); Bevy's world is centered
/// with y up. `scale` is world units per play-area pixel, so a resized
/// window rescales the board without rebuilding it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayAreaFrame {
    pub center: Vec2,
    pub area: PlayArea,
    pub scale: f32,
}

impl PlayAreaFrame {
    /// Largest square that fits above the toolbar, scaled by `fill`.
    pub fn fit(window_size: Vec2, fill: f32) -> Self {
        let free = Vec2::new(window_size.x, window_size.y - TOOLBAR_HEIGHT);
        let side = free.min_element().max(0.0) * fill;
        Self {
            center: Vec2::new(0.0, TOOLBAR_HEIGHT / 2.0),
            area: PlayArea::new(side, side),
            scale: 1.0,
        }
    }

    /// Keeps the play area and rescales it into the space [`Self::fit`]
    /// would pick for the new window. A window with no room keeps the
    /// current frame.
    pub fn refit(&self, window_size: Vec2, fill: f32) -> Self {
        let fitted = Self::fit(window_size, fill);
        if fitted.area.width <= 0.0 || self.area.width <= 0.0 {
            return *self;
        }
        Self {
            scale: fitted.area.width / self.area.width,
            ..fitted.with_area(self.area)
        }
    }

    const fn with_area(self, area: PlayArea) -> Self {
        Self { area, ..self }
    }

    /// World-space size of the whole play area.
    pub fn world_size(&self) -> Vec2 {
        self.area.size() * self.scale
    }

    pub fn to_world(&self, local: Vec2) -> Vec2 {
        let half = self.area.size() / 2.0;
        self.center + Vec2::new(local.x - half.x, half.y - local.y) * self.scale
    }

    pub fn to_local(&self, world: Vec2) -> Vec2 {
        let half = self.area.size() / 2.0;
        let offset = (world - self.center) / self.scale;
        Vec2::new(offset.x + half.x, half.y - offset.y)
    }
}

#[derive(Component)]
pub struct PieceSprite(pub PieceId);

#[derive(Component)]
struct PlayAreaBackdrop;

pub struct ViewPlugin;

impl Plugin for ViewPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (rebuild_board_view, (sync_backdrop, sync_piece_sprites))
                .chain()
                .in_set(PuzzleSet::Present),
        );
    }
}

fn rebuild_board_view(
    mut commands: Commands,
    mut loaded_events: EventReader<PuzzleLoaded>,
    active: Res<ActivePuzzle>,
    stale: Query<Entity, Or<(With<PieceSprite>, With<PlayAreaBackdrop>)>>,
) {
    if loaded_events.is_empty() {
        return;
    }
    loaded_events.clear();

    for entity in &stale {
        commands.entity(entity).despawn_recursive();
    }

    let Some(puzzle) = active.0.as_ref() else {
        return;
    };

    commands.spawn((
        Sprite::from_color(BACKDROP_COLOR, puzzle.frame.world_size()),
        Transform::from_translation(puzzle.frame.center.extend(BACKDROP_Z)),
        PlayAreaBackdrop,
    ));

    // Hidden until the image is loaded and each sprite knows its crop.
    for piece in puzzle.session.pieces() {
        commands.spawn((
            Sprite {
                image: puzzle.image.clone(),
                custom_size: Some(piece.size()),
                ..default()
            },
            Transform::default(),
            Visibility::Hidden,
            PieceSprite(piece.id()),
        ));
    }
}

fn sync_backdrop(
    active: Res<ActivePuzzle>,
    mut backdrops: Query<(&mut Sprite, &mut Transform), With<PlayAreaBackdrop>>,
) {
    let Some(puzzle) = active.0.as_ref() else {
        return;
    };
    for (mut sprite, mut transform) in &mut backdrops {
        sprite.custom_size = Some(puzzle.frame.world_size());
        transform.translation = puzzle.frame.center.extend(BACKDROP_Z);
    }
}

fn sync_piece_sprites(
    active: Res<ActivePuzzle>,
    images: Res<Assets<Image>>,
    mut sprites: Query<
        (&PieceSprite, &mut Transform, &mut Sprite, &mut Visibility),
        Without<PlayAreaBackdrop>,
    >,
) {
    let Some(puzzle) = active.0.as_ref() else {
        return;
    };
    let session = &puzzle.session;
    let image_size = images.get(&puzzle.image).map(Image::size);

    let mut depths = vec![0; session.pieces().len()];
    for (depth, id) in session.stacking().iter().enumerate() {
        if let Some(slot) = depths.get_mut(id.0) {
            *slot = depth;
        }
    }

    for (piece_sprite, mut transform, mut sprite, mut visibility) in &mut sprites {
        let Some(piece) = session.piece(piece_sprite.0) else {
            continue;
        };
        let depth = depths.get(piece_sprite.0 .0).copied().unwrap_or_default();
        let center = piece.position() + piece.size() / 2.0;
        transform.translation = puzzle
            .frame
            .to_world(center)
            .extend(PIECE_Z + depth as f32 * PIECE_Z_STEP);
        sprite.custom_size = Some(piece.size() * puzzle.frame.scale);

        if sprite.rect.is_none() {
            if let Some(size) = image_size {
                sprite.rect = Some(piece.region().texel_rect(size));
                *visibility = Visibility::Inherited;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_square_above_toolbar() {
        let frame = PlayAreaFrame::fit(Vec2::new(360.0, 640.0), 0.5);
        assert_eq!(frame.area, PlayArea::new(180.0, 180.0));
        assert_eq!(frame.center, Vec2::new(0.0, TOOLBAR_HEIGHT / 2.0));
        assert_eq!(frame.scale, 1.0);
    }

    #[test]
    fn resized_window_rescales_without_changing_area() {
        let frame = PlayAreaFrame::fit(Vec2::new(360.0, 640.0), 0.5);
        let wider = frame.refit(Vec2::new(1000.0, 784.0), 0.5);

        assert_eq!(wider.area, frame.area);
        assert_eq!(wider.scale, 2.0);
        assert_eq!(wider.world_size(), Vec2::splat(360.0));
        // Play-area corners still land on the fitted square.
        assert_eq!(wider.to_world(Vec2::ZERO), Vec2::new(-180.0, 212.0));
        assert_eq!(wider.to_local(Vec2::new(-180.0, 212.0)), Vec2::ZERO);
    }

    #[test]
    fn collapsed_window_keeps_frame() {
        let frame = PlayAreaFrame::fit(Vec2::new(360.0, 640.0), 0.5);
        assert_eq!(frame.refit(Vec2::new(360.0, 10.0), 0.5), frame);
    }

    #[test]
    fn unsized_window_yields_unusable_area() {
        let frame = PlayAreaFrame::fit(Vec2::ZERO, 0.9);
        assert!(frame.area.ensure_sized().is_err());
    }

    #[test]
    fn corners_map_between_spaces() {
        let frame = PlayAreaFrame {
            center: Vec2::new(0.0, 32.0),
            area: PlayArea::new(300.0, 300.0),
            scale: 1.0,
        };
        assert_eq!(frame.to_world(Vec2::ZERO), Vec2::new(-150.0, 182.0));
        assert_eq!(frame.to_world(Vec2::splat(300.0)), Vec2::new(150.0, -118.0));
        assert_eq!(frame.to_local(Vec2::new(-150.0, 182.0)), Vec2::ZERO);
        assert_eq!(frame.to_local(Vec2::new(0.0, 32.0)), Vec2::splat(150.0));
    }
}
