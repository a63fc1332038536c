use bevy::prelude::*;
use orrery_core::{FLAG_ANTIGRAVITY_TEXT, MAX_AUDIO_VOLUME};
use orrery_sim::{ResetRequested, SimulationState};

/// Marker for the HUD text
#[derive(Component)]
pub struct HudText;

/// Marker for the centered "ANTIGRAVITY" banner
#[derive(Component)]
pub struct AntigravityBanner;

const GRAVITY_STEP: f32 = 10.0;
const GREEN_MASS_STEP: f32 = 20.0;
const GREEN_MASS_RANGE: (f32, f32) = (20.0, 200.0);

/// Spawn the HUD overlay
pub fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Text::new("orrery"),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgba(0.8, 0.85, 1.0, 0.85)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        HudText,
    ));

    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 28.0,
            ..default()
        },
        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.9)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Percent(45.0),
            left: Val::Percent(42.0),
            ..default()
        },
        AntigravityBanner,
    ));
}

/// Format counts compactly for the HUD
fn fmt_count(n: usize) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1e6)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1e3)
    } else {
        format!("{}", n)
    }
}

/// HUD frame counter for throttling
#[derive(Resource, Default)]
pub struct HudThrottle {
    pub frame: u32,
}

/// Update HUD text every 10th frame; the banner follows every frame
pub fn update_hud(
    sim: Res<SimulationState>,
    mut throttle: ResMut<HudThrottle>,
    mut hud_query: Query<&mut Text, (With<HudText>, Without<AntigravityBanner>)>,
    mut banner_query: Query<&mut Text, (With<AntigravityBanner>, Without<HudText>)>,
) {
    if let Ok(mut banner) = banner_query.get_single_mut() {
        let showing = sim.snapshot().iter().any(|i| i.has_flag(FLAG_ANTIGRAVITY_TEXT));
        let wanted = if showing { "ANTIGRAVITY" } else { "" };
        if banner.as_str() != wanted {
            **banner = wanted.to_string();
        }
    }

    throttle.frame = throttle.frame.wrapping_add(1);
    if throttle.frame % 10 != 0 {
        return;
    }
    let Ok(mut text) = hud_query.get_single_mut() else {
        return;
    };
    let counts = sim.counts();
    let paused = if sim.paused { " [PAUSED]" } else { "" };
    **text = format!(
        "Run #{} | {:.1}s{}\n\
         Red: {} (+{} mini) | Green: {} | Clouds: {}\n\
         Crescents: {} yellow, {} orange | Comets: {}\n\
         Mass: {:.1} | G: {:.0} | Green mass: {:.0} | Volume: {}\n\
         \n\
         [R] Reset  [Space] Pause  [G/Shift+G] Gravity\n\
         [M] Green mass  [V] Volume",
        sim.reset_count,
        sim.elapsed,
        paused,
        fmt_count(counts.red),
        fmt_count(counts.mini_red),
        counts.green,
        counts.clouds,
        counts.yellow,
        counts.orange,
        counts.comets,
        sim.total_mass(),
        sim.config.gravity_constant,
        sim.config.green_mass,
        sim.config.audio_volume,
    );
}

/// G steps up, or down with `lower`, never below zero
fn step_gravity(g: f32, lower: bool) -> f32 {
    if lower { (g - GRAVITY_STEP).max(0.0) } else { g + GRAVITY_STEP }
}

/// Green mass cycles through its range
fn next_green_mass(mass: f32) -> f32 {
    let next = mass + GREEN_MASS_STEP;
    if next > GREEN_MASS_RANGE.1 { GREEN_MASS_RANGE.0 } else { next }
}

/// Volume cycles 0..=MAX_AUDIO_VOLUME
fn next_volume(volume: u32) -> u32 {
    if volume >= MAX_AUDIO_VOLUME { 0 } else { volume + 1 }
}

/// Handle keyboard input for the runtime controls
pub fn control_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut sim: ResMut<SimulationState>,
    mut resets: EventWriter<ResetRequested>,
) {
    if keyboard.just_pressed(KeyCode::KeyR) {
        resets.send(ResetRequested);
    }
    if keyboard.just_pressed(KeyCode::Space) {
        sim.paused = !sim.paused;
    }
    if keyboard.just_pressed(KeyCode::KeyG) {
        let lower = keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
        sim.config.gravity_constant = step_gravity(sim.config.gravity_constant, lower);
        info!("G set to {}", sim.config.gravity_constant);
    }
    if keyboard.just_pressed(KeyCode::KeyM) {
        sim.config.green_mass = next_green_mass(sim.config.green_mass);
        info!("Green mass set to {}", sim.config.green_mass);
    }
    if keyboard.just_pressed(KeyCode::KeyV) {
        sim.config.audio_volume = next_volume(sim.config.audio_volume);
    }
}
