use orrery_core::Body;

/// Overlap test plus impulse response for two circles
///
/// Resolves only a closing contact (normal relative speed < 0). The impulse
/// `J = k * m_a * m_b * v_rel / (m_a + m_b)` is applied along the normal and
/// each body is pushed out by half the overlap. Coincident centers are ignored.
/// Returns true when a collision was resolved.
pub fn check_collision(a: &mut Body, b: &mut Body, radius_a: f32, radius_b: f32, restitution: f32) -> bool {
    let delta = b.position - a.position;
    let dist = delta.length();
    let min_dist = radius_a + radius_b;
    if dist >= min_dist || dist <= 0.0 {
        return false;
    }

    let normal = delta / dist;
    let rel_speed = (b.velocity - a.velocity).dot(normal);
    if rel_speed >= 0.0 {
        return false;
    }

    let total = a.mass + b.mass;
    if total > 0.0 && a.mass > 0.0 && b.mass > 0.0 {
        let impulse = restitution * a.mass * b.mass * rel_speed / total;
        a.velocity += normal * (impulse / a.mass);
        b.velocity -= normal * (impulse / b.mass);
    }

    let separation = normal * (min_dist - dist) * 0.5;
    a.position -= separation;
    b.position += separation;
    true
}

/// Keep a freshly resolved pair drifting apart at no less than `min_speed`
pub fn enforce_separation_speed(a: &mut Body, b: &mut Body, min_speed: f32) {
    let delta = b.position - a.position;
    let dist = delta.length();
    if dist <= 0.0 {
        return;
    }
    let normal = delta / dist;
    let separating = (b.velocity - a.velocity).dot(normal);
    if separating < min_speed {
        let boost = normal * ((min_speed - separating) * 0.5);
        a.velocity -= boost;
        b.velocity += boost;
    }
}
