use bevy::math::{Isometry2d, Rot2};
use bevy::prelude::*;
use orrery_core::{EntityKind, FLAG_ANTIGRAVITY, FLAG_TRANSFORM_BLUE, RenderInstance};
use orrery_sim::SimulationState;

use super::camera::to_world;

/// Antigravity flashes between the body color and white at this rate (Hz)
const FLASH_RATE: f32 = 4.0;

/// Final color of one instance: kind color, antigravity flash, opacity
pub fn instance_color(instance: &RenderInstance) -> Option<Color> {
    let kind = instance.kind()?;
    let [mut r, mut g, mut b, a] = kind.color();
    if instance.has_flag(FLAG_ANTIGRAVITY) && flash_on(instance.antigravity_remaining) {
        (r, g, b) = (1.0, 1.0, 1.0);
    }
    if instance.has_flag(FLAG_TRANSFORM_BLUE) && instance.progress > 0.0 {
        let [br, bg, bb, _] = EntityKind::BlueDot.color();
        let t = instance.progress.clamp(0.0, 1.0);
        r += (br - r) * t;
        g += (bg - g) * t;
        b += (bb - b) * t;
    }
    Some(Color::srgba(r, g, b, a * instance.opacity.clamp(0.0, 1.0)))
}

fn flash_on(remaining: f32) -> bool {
    (remaining * FLASH_RATE * 2.0) as u32 % 2 == 0
}

/// Drawn radius; dissolving crescents shrink as they go
pub fn drawn_radius(instance: &RenderInstance) -> f32 {
    match instance.kind() {
        Some(EntityKind::YellowCrescent) if instance.progress >= 0.0 => {
            instance.radius * (1.0 - instance.progress.clamp(0.0, 1.0))
        }
        _ => instance.radius,
    }
}

/// Draw every live body from this frame's snapshot
pub fn draw_bodies(mut gizmos: Gizmos, sim: Res<SimulationState>) {
    let field = sim.field;
    for instance in sim.snapshot() {
        let Some(kind) = instance.kind() else {
            continue;
        };
        let Some(color) = instance_color(&instance) else {
            continue;
        };
        let center = to_world(Vec2::from_array(instance.position), &field);
        let radius = drawn_radius(&instance);
        match kind {
            EntityKind::YellowCrescent | EntityKind::OrangeCrescent => {
                // open side faces right
                let facing = Isometry2d::new(center, Rot2::degrees(90.0));
                gizmos.arc_2d(facing, std::f32::consts::PI * 1.3, radius, color);
            }
            EntityKind::Cloud => {}
            _ => {
                gizmos.circle_2d(Isometry2d::from_translation(center), radius, color);
            }
        }
    }

    for cloud in &sim.clouds {
        let [r, g, b, a] = EntityKind::Cloud.color();
        let opacity = orrery_core::fade_in_opacity(cloud.fade_in);
        let color = Color::srgba(r, g, b, a * opacity);
        let center = to_world(cloud.body.position, &field);
        for puff in &cloud.puffs {
            // puff offsets share the simulation's y-down convention
            let at = center + Vec2::new(puff.offset.x, -puff.offset.y);
            gizmos.circle_2d(Isometry2d::from_translation(at), puff.radius, color);
        }
    }
}
