use bevy::prelude::{
    App, Event, EventReader, EventWriter, IntoSystemConfigs, Plugin, Res, ResMut, Time, Update, info,
};
use orrery_core::{ResetReason, SimEvent};

use crate::clock::FrameClock;
use crate::state::SimulationState;

/// Bevy plugin for the simulation pipeline
///
/// Expects a [`SimulationState`] resource inserted by the app. Each frame it
/// applies pending reset requests, steps once, then republishes the frame's
/// cues as [`SoundCue`] events.
pub struct SimulationPlugin;

/// One named cue raised by the simulation this frame
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundCue(pub SimEvent);

/// External "reset simulation" command
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ResetRequested;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SoundCue>()
            .add_event::<ResetRequested>()
            .init_resource::<FrameClock>()
            .add_systems(Update, (handle_reset_requests, simulation_tick, forward_events).chain());
    }
}

fn handle_reset_requests(mut requests: EventReader<ResetRequested>, mut sim: ResMut<SimulationState>) {
    // several presses in one frame collapse into a single reset
    if requests.read().count() > 0 {
        info!("Reset requested");
        sim.reset(ResetReason::UserRequest);
    }
}

/// Main simulation tick, one step per rendered frame
fn simulation_tick(mut sim: ResMut<SimulationState>, mut clock: ResMut<FrameClock>, time: Res<Time>) {
    if sim.paused {
        clock.restart();
        return;
    }
    let dt = clock.advance(time.elapsed_secs_f64());
    sim.step(dt);
}

fn forward_events(mut sim: ResMut<SimulationState>, mut cues: EventWriter<SoundCue>) {
    for event in sim.drain_events() {
        cues.send(SoundCue(event));
    }
}
