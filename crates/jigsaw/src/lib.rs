use bevy::prelude::*;

pub mod config;
pub mod error;
pub mod puzzle;

mod app;
mod game;
mod pointer;
mod ribbit;
mod toolbar;
mod view;

use config::JigsawConfig;
use game::GamePlugin;
use ribbit::Jigsaw;
use toolbar::ToolbarPlugin;
use view::ViewPlugin;

pub fn run() {
    app::bit_app::<Jigsaw>(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
        .insert_resource(JigsawConfig::load())
        .add_plugins((GamePlugin, ToolbarPlugin, ViewPlugin))
        .add_systems(Startup, setup)
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);
}
