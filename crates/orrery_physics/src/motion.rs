use orrery_core::constants::*;
use orrery_core::{Body, PlayField, Vec2};
use rand::Rng;

/// Which walls a body touched during one integration step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WallHit {
    pub left_right: bool,
    pub top_bottom: bool,
}

impl WallHit {
    pub fn any(&self) -> bool {
        self.left_right || self.top_bottom
    }
}

/// Explicit Euler step with constant downward gravity and wall reflection
///
/// Position ends inside the margin-adjusted bounds; the velocity component
/// normal to a touched wall is reflected.
pub fn integrate_motion(body: &mut Body, downward_gravity: f32, dt: f32, field: &PlayField) -> WallHit {
    body.velocity.y += downward_gravity * dt;
    body.position += body.velocity * dt;

    let mut hit = WallHit::default();
    if body.position.x <= field.min_x() {
        body.position.x = field.min_x();
        body.velocity.x = -body.velocity.x;
        hit.left_right = true;
    } else if body.position.x >= field.max_x() {
        body.position.x = field.max_x();
        body.velocity.x = -body.velocity.x;
        hit.left_right = true;
    }
    if body.position.y <= field.min_y() {
        body.position.y = field.min_y();
        body.velocity.y = -body.velocity.y;
        hit.top_bottom = true;
    } else if body.position.y >= field.max_y() {
        body.position.y = field.max_y();
        body.velocity.y = -body.velocity.y;
        hit.top_bottom = true;
    }
    hit
}

/// Euler step without walls for comets
///
/// Returns false once the body has left the raw rectangle and should be removed.
pub fn integrate_free(body: &mut Body, downward_gravity: f32, dt: f32, field: &PlayField) -> bool {
    body.velocity.y += downward_gravity * dt;
    body.position += body.velocity * dt;
    field.contains_outer(body.position)
}

fn rescale(body: &mut Body, speed: f32, target: f32) {
    if speed > 0.0 {
        body.velocity *= target / speed;
    }
}

/// Hard clamp on speed
pub fn cap_velocity(body: &mut Body, max_speed: f32) {
    let speed = body.speed();
    if speed > max_speed {
        rescale(body, speed, max_speed);
    }
}

/// Relax toward the 30 px/s floor at roughly 10 % per second
pub fn gradually_slow_down(body: &mut Body, dt: f32) {
    let speed = body.speed();
    if speed > SLOWDOWN_FLOOR {
        let target = (speed * (1.0 - SLOWDOWN_RATE * dt)).max(SLOWDOWN_FLOOR);
        rescale(body, speed, target);
    }
}

/// Post-impact safety clamp: above 200 px/s lose 20 %, never below 50 px/s
pub fn reduce_velocity_if_too_fast(body: &mut Body) {
    let speed = body.speed();
    if speed > FAST_SPEED {
        let target = (speed * FAST_REDUCTION).max(FAST_FLOOR);
        rescale(body, speed, target);
    }
}

/// Drag of 0.5 % per second
pub fn apply_viscosity(body: &mut Body, dt: f32) {
    body.velocity *= 1.0 - VISCOSITY_RATE * dt;
}

/// Raise speed to at least `min_speed`
///
/// A body already moving keeps its heading; a stationary one gets a random one.
pub fn enforce_min_speed<R: Rng + ?Sized>(body: &mut Body, min_speed: f32, rng: &mut R) {
    let speed = body.speed();
    if speed >= min_speed {
        return;
    }
    if speed > 0.0 {
        rescale(body, speed, min_speed);
    } else {
        body.velocity = random_direction(rng) * min_speed;
    }
}

/// Antigravity kick: a slow body gets a random heading at 1-2x the floor
pub fn antigravity_kick<R: Rng + ?Sized>(body: &mut Body, rng: &mut R) {
    if body.speed() < ANTIGRAVITY_MIN_SPEED {
        let magnitude = rng.gen_range(ANTIGRAVITY_MIN_SPEED..ANTIGRAVITY_MIN_SPEED * 2.0);
        body.velocity = random_direction(rng) * magnitude;
    }
}

pub fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    Vec2::from_angle(rng.gen_range(0.0..std::f32::consts::TAU))
}
