use orrery_core::constants::MIN_GRAVITY_DISTANCE;
use orrery_core::{Body, Vec2};

/// Which side of a pair has its felt force reversed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AntigravityFlags {
    pub a: bool,
    pub b: bool,
}

impl AntigravityFlags {
    pub const NONE: AntigravityFlags = AntigravityFlags { a: false, b: false };

    pub fn new(a: bool, b: bool) -> Self {
        Self { a, b }
    }
}

/// Mutual inverse-square attraction between two bodies for one step
///
/// F = G * m_a * m_b / d^2, and each body accelerates by F over its own mass.
/// An antigravity flag flips only the force felt by that body, so one side
/// may be pulled in while the other is pushed away. Skipped when either mass
/// is zero or the bodies are closer than [`MIN_GRAVITY_DISTANCE`].
pub fn apply_gravitational_force(a: &mut Body, b: &mut Body, g: f32, dt: f32, antigravity: AntigravityFlags) {
    if a.mass == 0.0 || b.mass == 0.0 {
        return;
    }
    let delta = b.position - a.position;
    let dist_sq = delta.length_squared();
    let dist = dist_sq.sqrt();
    if dist < MIN_GRAVITY_DISTANCE {
        return;
    }

    let force = g * a.mass * b.mass / dist_sq;
    let normal = delta / dist;
    let dir_a = if antigravity.a { -1.0 } else { 1.0 };
    let dir_b = if antigravity.b { -1.0 } else { 1.0 };

    a.velocity += normal * (force / a.mass) * dt * dir_a;
    b.velocity -= normal * (force / b.mass) * dt * dir_b;
}

/// One-sided pull of `target` toward a massive source
///
/// Used for massless bodies (comets), which feel gravity without exerting it.
pub fn accelerate_toward(target: &mut Body, source_position: Vec2, source_mass: f32, g: f32, dt: f32) {
    if source_mass == 0.0 {
        return;
    }
    let delta = source_position - target.position;
    let dist_sq = delta.length_squared();
    let dist = dist_sq.sqrt();
    if dist < MIN_GRAVITY_DISTANCE {
        return;
    }
    target.velocity += delta / dist * (g * source_mass / dist_sq) * dt;
}
