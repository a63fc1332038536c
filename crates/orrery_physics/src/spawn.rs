use std::f32::consts::{FRAC_PI_2, PI, TAU};

use orrery_core::constants::*;
use orrery_core::{PlayField, Puff, Vec2};
use rand::Rng;

use crate::motion::random_direction;

/// Half-width of the inward cone a comet may enter through (radians)
const COMET_CONE: f32 = 0.45 * PI;

/// Uniform point inside the margin-adjusted play field
pub fn random_point_in<R: Rng + ?Sized>(field: &PlayField, rng: &mut R) -> Vec2 {
    Vec2::new(
        field.min_x() + rng.gen_range(0.0..1.0) * (field.max_x() - field.min_x()),
        field.min_y() + rng.gen_range(0.0..1.0) * (field.max_y() - field.min_y()),
    )
}

/// Start position and velocity of a comet entering through `edge`
///
/// Edges are numbered clockwise from the top: 0 top, 1 right, 2 bottom, 3 left.
/// The heading points inward within [`COMET_CONE`] of the wall normal.
pub fn comet_edge_spawn<R: Rng + ?Sized>(edge: u8, field: &PlayField, rng: &mut R) -> (Vec2, Vec2) {
    let along_x = field.x + rng.gen_range(0.0..1.0) * field.width;
    let along_y = field.y + rng.gen_range(0.0..1.0) * field.height;
    let (position, inward) = match edge % 4 {
        0 => (Vec2::new(along_x, field.y), FRAC_PI_2),
        1 => (Vec2::new(field.x + field.width, along_y), PI),
        2 => (Vec2::new(along_x, field.y + field.height), 3.0 * FRAC_PI_2),
        _ => (Vec2::new(field.x, along_y), 0.0),
    };
    let angle = inward + rng.gen_range(-COMET_CONE..COMET_CONE);
    (position, Vec2::from_angle(angle) * COMET_SPEED)
}

/// A massive body other bodies are seeded to orbit around
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitSource {
    pub position: Vec2,
    pub weight: f32,
}

/// Speed law for one kind's tangential seed: `min(cap, scale * (1 - d / reach))`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitProfile {
    pub cap: f32,
    pub scale: f32,
}

pub const RED_ORBIT: OrbitProfile = OrbitProfile { cap: 15.0, scale: 30.0 };
pub const GREEN_ORBIT: OrbitProfile = OrbitProfile { cap: 12.0, scale: 25.0 };
pub const EARTH_ORBIT: OrbitProfile = OrbitProfile { cap: 10.0, scale: 20.0 };

/// Initial tangential velocity around every source within half a field width
pub fn orbital_seed_velocity(
    position: Vec2,
    sources: &[OrbitSource],
    profile: OrbitProfile,
    field: &PlayField,
) -> Vec2 {
    let reach = field.width * 0.5;
    let mut velocity = Vec2::ZERO;
    for source in sources {
        let radial = source.position - position;
        let dist = radial.length();
        if dist <= 0.0 || dist >= reach {
            continue;
        }
        let speed = profile.cap.min(profile.scale * (1.0 - dist / reach));
        velocity += (radial / dist).perp() * speed * source.weight;
    }
    velocity
}

/// Cloud radius between the minimum and maximum
pub fn cloud_radius<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen_range(CLOUD_MIN_RADIUS..CLOUD_MAX_RADIUS)
}

/// 4 to 8 puffs, 10-50 % of the radius out, each 30-80 % of the radius
pub fn cloud_puffs<R: Rng + ?Sized>(radius: f32, rng: &mut R) -> Vec<Puff> {
    let count = rng.gen_range(4..=8);
    (0..count)
        .map(|_| {
            let angle = rng.gen_range(0.0..TAU);
            let distance = rng.gen_range(0.1..0.5) * radius;
            Puff {
                offset: Vec2::from_angle(angle) * distance,
                radius: radius * rng.gen_range(0.3..0.8),
            }
        })
        .collect()
}

/// Mass a cloud takes on when a dwell reshapes it
pub fn cloud_active_mass<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    RED_MASS * rng.gen_range(CLOUD_ACTIVE_MASS_MIN..CLOUD_ACTIVE_MASS_MAX)
}

/// Positions of the two minis a split produces: `offset` away in opposite directions
pub fn split_positions<R: Rng + ?Sized>(center: Vec2, offset: f32, rng: &mut R) -> [Vec2; 2] {
    let dir = random_direction(rng);
    [center + dir * offset, center - dir * offset]
}

/// Position and velocity of a red dot dropped by a comet
///
/// The dot appears to one side of the comet's heading and drifts away from it;
/// a stationary comet drops it in a random direction.
pub fn comet_seed<R: Rng + ?Sized>(position: Vec2, velocity: Vec2, rng: &mut R) -> (Vec2, Vec2) {
    let side = if velocity.length_squared() > 0.0 {
        let perp = velocity.normalize().perp();
        if rng.gen_bool(0.5) { perp } else { -perp }
    } else {
        random_direction(rng)
    };
    (position + side * COMET_SEED_OFFSET, velocity + side * COMET_SEED_DRIFT)
}
