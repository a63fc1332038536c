use std::path::Path;

use bevy::prelude::*;
use orrery_core::{PlayField, SimConfig};
use orrery_render::OrreryRenderPlugin;
use orrery_sim::{SimulationPlugin, SimulationState};

const CONFIG_PATH: &str = "orrery.toml";
const WINDOW_SIZE: (f32, f32) = (1280.0, 720.0);

/// `orrery.toml` from the working directory, or defaults
fn load_config() -> SimConfig {
    let path = Path::new(CONFIG_PATH);
    if !path.exists() {
        return SimConfig::default();
    }
    match SimConfig::load(path) {
        Ok(config) => {
            info!("Loaded config from {}", CONFIG_PATH);
            config
        }
        Err(err) => {
            warn!("Ignoring {}: {}; using defaults", CONFIG_PATH, err);
            SimConfig::default()
        }
    }
}

fn main() {
    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Orrery".into(),
            resolution: WINDOW_SIZE.into(),
            ..default()
        }),
        ..default()
    }));

    // read after DefaultPlugins so config messages reach the log
    let config = load_config();
    let field = PlayField::new(0.0, 0.0, WINDOW_SIZE.0, WINDOW_SIZE.1);

    app.insert_resource(ClearColor(Color::srgb(0.01, 0.01, 0.03)))
        .insert_resource(SimulationState::new(config, field))
        .add_plugins(SimulationPlugin)
        .add_plugins(OrreryRenderPlugin)
        .run();
}
