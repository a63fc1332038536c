use bevy::prelude::*;

use super::audio;
use super::camera;
use super::shapes;
use super::ui;

/// Main render plugin for the orrery
///
/// Everything here only reads the simulation snapshot, or writes the few
/// runtime tunables, so it can be swapped out without touching the core.
pub struct OrreryRenderPlugin;

impl Plugin for OrreryRenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ui::HudThrottle>()
            .add_systems(Startup, (camera::spawn_camera, ui::spawn_hud))
            .add_systems(
                Update,
                (
                    camera::fit_play_field,
                    ui::control_system,
                    shapes::draw_bodies.after(camera::fit_play_field),
                    ui::update_hud,
                    audio::play_sound_cues,
                ),
            );
    }
}
