use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use orrery_core::PlayField;
use orrery_sim::SimulationState;

/// Marker for the single 2D camera
#[derive(Component)]
pub struct OrreryCamera;

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((Camera2d, OrreryCamera));
}

/// Play field covering a window of the given logical size
pub fn play_field_for(width: f32, height: f32) -> PlayField {
    PlayField::new(0.0, 0.0, width, height)
}

/// Simulation coordinates (origin top-left, y down) to Bevy world space
/// (origin at the window center, y up)
pub fn to_world(position: Vec2, field: &PlayField) -> Vec2 {
    Vec2::new(
        position.x - field.x - field.width * 0.5,
        field.y + field.height * 0.5 - position.y,
    )
}

/// Keep the play field matched to the window
///
/// The first frame picks up the initial window size; later frames only react
/// to resize events.
pub fn fit_play_field(
    mut resized: EventReader<WindowResized>,
    window: Query<&Window, With<PrimaryWindow>>,
    mut sim: ResMut<SimulationState>,
    mut fitted: Local<bool>,
) {
    let mut size = resized.read().last().map(|e| Vec2::new(e.width, e.height));
    if !*fitted {
        if let Ok(window) = window.get_single() {
            size = size.or(Some(window.size()));
        }
    }
    let Some(size) = size else {
        return;
    };
    *fitted = true;
    let field = play_field_for(size.x, size.y);
    if field != sim.field {
        debug!("Play field resized to {}x{}", field.width, field.height);
        sim.set_play_field(field);
    }
}
