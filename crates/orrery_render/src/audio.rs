use bevy::prelude::*;
use orrery_core::SimEvent;
use orrery_sim::{SimulationState, SoundCue};

/// Whether a cue is audible at this volume
///
/// Wall bounces are frequent enough that they only play at volume 3 and up.
pub fn audible(event: SimEvent, volume: u32) -> bool {
    match event {
        _ if volume == 0 => false,
        SimEvent::WallLeftRight | SimEvent::WallTopBottom => volume >= 3,
        _ => true,
    }
}

/// Consume the frame's sound cues
///
/// No synthesis backend is wired in; audible cues are logged so a mixer can
/// be added behind this system.
pub fn play_sound_cues(mut cues: EventReader<SoundCue>, sim: Res<SimulationState>) {
    let volume = sim.config.audio_volume;
    for SoundCue(event) in cues.read() {
        if audible(*event, volume) {
            debug!("Sound cue: {} (volume {})", event.name(), volume);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_muted_plays_nothing() {
        assert!(!audible(SimEvent::RedRedCollision, 0));
        assert!(!audible(SimEvent::Windchime, 0));
    }

    #[test]
    fn test_wall_cues_need_volume() {
        assert!(!audible(SimEvent::WallLeftRight, 2));
        assert!(audible(SimEvent::WallTopBottom, 3));
        assert!(audible(SimEvent::CloudVanished, 1));
    }
}
