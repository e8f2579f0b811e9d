use bevy::prelude::*;

/// One step of a mouse or touch gesture, in whatever space the caller maps
/// positions into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    Press(Vec2),
    Move(Vec2),
    Release,
}

impl PointerAction {
    fn map_position(self, f: impl FnOnce(Vec2) -> Option<Vec2>) -> Option<Self> {
        match self {
            Self::Press(position) => f(position).map(Self::Press),
            Self::Move(position) => f(position).map(Self::Move),
            Self::Release => Some(Self::Release),
        }
    }
}

/// Pointer actions of this frame in screen coordinates, in the order they
/// logically happened: press, move, release. A quick tap can produce all
/// three in the same frame.
///
/// Touch follows a single finger: `tracked_touch` holds the id of the
/// finger that started the gesture, and other fingers are ignored until it
/// lifts.
pub fn screen_pointer_actions(
    button_input: &ButtonInput<MouseButton>,
    touch_input: &Touches,
    tracked_touch: &mut Option<u64>,
    cursor_position: Option<Vec2>,
) -> Vec<PointerAction> {
    let mut actions = Vec::new();

    if button_input.just_pressed(MouseButton::Left) {
        actions.extend(cursor_position.map(PointerAction::Press));
    }
    if button_input.pressed(MouseButton::Left) || button_input.just_released(MouseButton::Left) {
        actions.extend(cursor_position.map(PointerAction::Move));
    }
    if button_input.just_released(MouseButton::Left) {
        actions.push(PointerAction::Release);
    }

    if tracked_touch.is_none() {
        if let Some(touch) = touch_input.iter_just_pressed().next() {
            *tracked_touch = Some(touch.id());
            actions.push(PointerAction::Press(touch.position()));
        }
    }
    if let Some(id) = *tracked_touch {
        if let Some(touch) = touch_input.get_pressed(id) {
            actions.push(PointerAction::Move(touch.position()));
        } else {
            if let Some(touch) = touch_input.get_released(id) {
                actions.push(PointerAction::Move(touch.position()));
            }
            // Lifted or canceled.
            actions.push(PointerAction::Release);
            *tracked_touch = None;
        }
    }

    actions
}

/// Same as [`screen_pointer_actions`], with positions projected through the
/// 2D camera into world space.
pub fn world_pointer_actions(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    tracked_touch: &mut Option<u64>,
    windows: &Query<&Window>,
    camera: &Query<(&Camera, &GlobalTransform)>,
) -> Vec<PointerAction> {
    let Ok(window) = windows.get_single() else {
        return Vec::new();
    };
    let Ok((camera, camera_transform)) = camera.get_single() else {
        return Vec::new();
    };

    screen_pointer_actions(
        button_input,
        touch_input,
        tracked_touch,
        window.cursor_position(),
    )
    .into_iter()
    .filter_map(|action| {
        action.map_position(|position| camera.viewport_to_world_2d(camera_transform, position).ok())
    })
    .collect()
}
