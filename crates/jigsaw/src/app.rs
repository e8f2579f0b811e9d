use bevy::asset::{AssetMetaCheck, AssetMode, AssetPlugin};
use bevy::prelude::*;
use bevy::render::settings::{
    Backends, PowerPreference, RenderCreation, WgpuSettings, WgpuSettingsPriority,
};
use bevy::render::RenderPlugin;
#[cfg(target_arch = "wasm32")]
use bevy::window::PrimaryWindow;
use bevy::window::{PresentMode, WindowMode, WindowResolution};

use crate::ribbit::{RibbitMessageHandler, RibbitPlugin};

// typical smartphone screen ratio (9:16)
pub const WINDOW_WIDTH: f32 = 360.0;
pub const WINDOW_HEIGHT: f32 = 640.0;

fn asset_plugin(bit_name: &str, bit_version: &str) -> AssetPlugin {
    // Natively assets sit next to the crate; the host serves them per bit and version.
    let file_path = if cfg!(target_arch = "wasm32") {
        format!("bits/{bit_name}-{bit_version}/assets")
    } else {
        "assets".to_owned()
    };
    AssetPlugin {
        mode: AssetMode::Unprocessed,
        file_path,
        processed_file_path: "imported_assets/Default".to_owned(),
        watch_for_changes_override: None,
        meta_check: AssetMetaCheck::Never,
    }
}

fn window_plugin(bit_name: &str) -> WindowPlugin {
    WindowPlugin {
        primary_window: Some(Window {
            title: bit_name.to_owned(),
            present_mode: PresentMode::Fifo,
            resolution: WindowResolution::new(WINDOW_WIDTH, WINDOW_HEIGHT),
            canvas: Some("#bit".into()),
            fit_canvas_to_parent: true,
            mode: WindowMode::Windowed,
            // Leave browser shortcuts like F5 and Ctrl+R alone.
            prevent_default_event_handling: false,
            ..default()
        }),
        ..default()
    }
}

fn render_plugin() -> RenderPlugin {
    RenderPlugin {
        render_creation: RenderCreation::Automatic(WgpuSettings {
            backends: Some(Backends::BROWSER_WEBGPU | Backends::GL),
            power_preference: PowerPreference::HighPerformance,
            priority: WgpuSettingsPriority::Functionality,
            ..default()
        }),
        ..default()
    }
}

/// Largest surface wgpu accepts on the devices bits target.
#[cfg(any(target_arch = "wasm32", test))]
const MAX_SURFACE_EXTENT: f32 = 2048.0;

#[cfg(any(target_arch = "wasm32", test))]
fn surface_size(viewport: Vec2) -> Vec2 {
    viewport.min(Vec2::splat(MAX_SURFACE_EXTENT))
}

/// Keeps the window at the browser viewport size. Bigger surfaces fail
/// `Surface::configure` validation and panic.
#[cfg(target_arch = "wasm32")]
fn follow_browser_size(mut windows: Query<&mut Window, With<PrimaryWindow>>) {
    let Some(browser) = web_sys::window() else {
        return;
    };
    let (Some(width), Some(height)) = (
        browser.inner_width().ok().and_then(|width| width.as_f64()),
        browser.inner_height().ok().and_then(|height| height.as_f64()),
    ) else {
        return;
    };
    let target = surface_size(Vec2::new(width as f32, height as f32));

    for mut window in &mut windows {
        if (window.size() - target).abs().max_element() > f32::EPSILON {
            window.resolution.set(target.x, target.y);
        }
    }
}

/// App with the window, asset and render setup every bit shares, plus the
/// host messaging for `T`.
pub fn bit_app<T: RibbitMessageHandler>(bit_name: &str, bit_version: &str) -> App {
    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(asset_plugin(bit_name, bit_version))
            .set(window_plugin(bit_name))
            .set(render_plugin()),
    )
    // Saves battery on phones.
    .add_plugins(bevy_framepace::FramepacePlugin)
    .add_plugins(RibbitPlugin::<T>::default())
    .insert_resource(ClearColor(Color::BLACK));

    #[cfg(target_arch = "wasm32")]
    {
        app.add_systems(PreUpdate, follow_browser_size);
    }

    app
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_is_capped_per_axis() {
        assert_eq!(
            surface_size(Vec2::new(1284.0, 2418.0)),
            Vec2::new(1284.0, 2048.0)
        );
        assert_eq!(surface_size(Vec2::new(360.0, 640.0)), Vec2::new(360.0, 640.0));
    }
}
