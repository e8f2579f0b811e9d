use bevy::prelude::*;
use strum::IntoEnumIterator;

use crate::config::JigsawConfig;
use crate::game::{GameState, ImageSelection, LoadPuzzle, PuzzleSet, ShufflePuzzle};

pub const TOOLBAR_HEIGHT: f32 = 64.0;

const TOOLBAR_COLOR: Color = Color::srgb(0.08, 0.08, 0.1);
const BUTTON_COLOR: Color = Color::srgb(0.22, 0.22, 0.28);
const BUTTON_PRESSED_COLOR: Color = Color::srgb(0.35, 0.45, 0.35);

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, strum::EnumIter, strum::Display)]
pub enum ToolbarButton {
    Image,
    Load,
    Shuffle,
}

/// Text of the image button, showing the current selection.
#[derive(Component)]
struct ImageLabel;

pub struct ToolbarPlugin;

impl Plugin for ToolbarPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_toolbar).add_systems(
            Update,
            (
                handle_toolbar.run_if(not(in_state(GameState::Ended))),
                update_image_label,
                tint_buttons,
            )
                .in_set(PuzzleSet::Input),
        );
    }
}

fn image_label(config: &JigsawConfig, selection: &ImageSelection) -> String {
    let name = config
        .images
        .get(selection.index)
        .map_or("?", |image| image.name.as_str());
    format!("{}: {name}", ToolbarButton::Image)
}

fn spawn_toolbar(
    mut commands: Commands,
    config: Res<JigsawConfig>,
    selection: Res<ImageSelection>,
) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(0.0),
                width: Val::Percent(100.0),
                height: Val::Px(TOOLBAR_HEIGHT),
                justify_content: JustifyContent::SpaceEvenly,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(TOOLBAR_COLOR),
        ))
        .with_children(|parent| {
            for button in ToolbarButton::iter() {
                let label = match button {
                    ToolbarButton::Image => image_label(&config, &selection),
                    _ => button.to_string(),
                };
                parent
                    .spawn((
                        Button,
                        Node {
                            padding: UiRect::axes(Val::Px(12.0), Val::Px(8.0)),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        BackgroundColor(BUTTON_COLOR),
                        button,
                    ))
                    .with_children(|button_node| {
                        let mut text = button_node.spawn((
                            Text::new(label),
                            TextFont {
                                font_size: 18.0,
                                ..default()
                            },
                            TextColor(Color::WHITE),
                        ));
                        if button == ToolbarButton::Image {
                            text.insert(ImageLabel);
                        }
                    });
            }
        });
}

fn handle_toolbar(
    interaction_query: Query<(&Interaction, &ToolbarButton), Changed<Interaction>>,
    config: Res<JigsawConfig>,
    mut selection: ResMut<ImageSelection>,
    mut load_events: EventWriter<LoadPuzzle>,
    mut shuffle_events: EventWriter<ShufflePuzzle>,
) {
    for (interaction, button) in &interaction_query {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match button {
            ToolbarButton::Image => selection.cycle(config.images.len()),
            ToolbarButton::Load => {
                load_events.send(LoadPuzzle);
            }
            ToolbarButton::Shuffle => {
                shuffle_events.send(ShufflePuzzle);
            }
        }
    }
}

fn update_image_label(
    config: Res<JigsawConfig>,
    selection: Res<ImageSelection>,
    mut labels: Query<&mut Text, With<ImageLabel>>,
) {
    if !selection.is_changed() {
        return;
    }
    for mut text in &mut labels {
        text.0 = image_label(&config, &selection);
    }
}

fn tint_buttons(
    mut buttons: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<ToolbarButton>),
    >,
) {
    for (interaction, mut color) in &mut buttons {
        color.0 = match interaction {
            Interaction::Pressed => BUTTON_PRESSED_COLOR,
            Interaction::Hovered | Interaction::None => BUTTON_COLOR,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_label_names_selection() {
        let config = JigsawConfig::default();
        assert_eq!(
            image_label(&config, &ImageSelection { index: 1 }),
            "Image: Checker"
        );
        assert_eq!(
            image_label(&config, &ImageSelection { index: 7 }),
            "Image: ?"
        );
    }
}
