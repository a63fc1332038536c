use orrery_core::constants::{EARTH_SEPARATION_SPEED, MAX_DELTA_TIME, RED_DOT_CEILING};
use orrery_core::{ResetReason, SimEvent, Vec2};
use orrery_physics::*;

use crate::lifecycle::Contact;
use crate::pairs::{Slot, unordered_pairs};
use crate::state::SimulationState;

impl SimulationState {
    /// Advance the whole system by one frame of `dt` seconds
    ///
    /// Order: ceiling check, forces over every unordered pair, integration with
    /// wall bounce, collisions, speed shaping, lifecycle, ceiling check again.
    pub fn step(&mut self, dt: f32) {
        if self.paused {
            return;
        }
        let dt = dt.clamp(0.0, MAX_DELTA_TIME);

        self.enforce_ceiling();
        self.sync_tunables();
        self.apply_forces(dt);
        self.integrate(dt);
        let contacts = self.resolve_collisions();
        self.shape_velocities(dt);
        self.run_lifecycle(&contacts, dt);
        self.age_fade_in(dt);

        self.frame += 1;
        self.elapsed += dt as f64;
        self.enforce_ceiling();
    }

    /// Runaway growth guard: a full reset once red dots reach the ceiling
    fn enforce_ceiling(&mut self) {
        if self.reds.len() >= RED_DOT_CEILING {
            self.reset(ResetReason::PopulationCeiling);
        }
    }

    /// Runtime-adjustable parameters that live on entities
    fn sync_tunables(&mut self) {
        let mass = self.config.green_mass;
        for green in self.greens.iter_mut() {
            green.body.mass = mass;
        }
    }

    fn apply_forces(&mut self, dt: f32) {
        let g = self.config.gravity_constant;
        let slots = self.gravity_slots();
        for (a, b) in unordered_pairs(&slots) {
            let flags = AntigravityFlags::new(self.antigravity_active(a), self.antigravity_active(b));
            self.with_pair(a, b, |body_a, body_b| {
                apply_gravitational_force(body_a, body_b, g, dt, flags)
            });
        }

        // Comets feel every massive body but pull on nothing
        let sources: Vec<(Vec2, f32)> = slots
            .iter()
            .filter_map(|&slot| self.body(slot).map(|b| (b.position, b.mass)))
            .collect();
        for comet in self.comets.iter_mut() {
            for &(position, mass) in &sources {
                accelerate_toward(&mut comet.body, position, mass, g, dt);
            }
        }

        for cloud in self.clouds.iter_mut() {
            cloud.body.velocity = Vec2::ZERO;
        }
    }

    fn integrate(&mut self, dt: f32) {
        let down = self.config.downward_gravity;
        let field = self.field;
        let mut hits = Vec::new();
        for slot in self.collider_slots() {
            let Some(body) = self.body_mut(slot) else {
                continue;
            };
            let hit = integrate_motion(body, down, dt, &field);
            if hit.any() {
                reduce_velocity_if_too_fast(body);
                hits.push(hit);
            }
        }
        for hit in hits {
            if hit.left_right {
                self.emit(SimEvent::WallLeftRight);
            }
            if hit.top_bottom {
                self.emit(SimEvent::WallTopBottom);
            }
        }

        // Comets never bounce; leaving the rectangle removes them
        self.comets
            .retain_mut(|comet| integrate_free(&mut comet.body, down, dt, &field));
    }

    fn resolve_collisions(&mut self) -> Vec<Contact> {
        let k = self.config.restitution;
        let slots = self.collider_slots();
        let mut contacts = Vec::new();
        for (a, b) in unordered_pairs(&slots) {
            let (radius_a, radius_b) = (self.collision_radius(a), self.collision_radius(b));
            let near = match (self.body(a), self.body(b)) {
                (Some(x), Some(y)) => x.distance_to(y) < radius_a + radius_b,
                _ => false,
            };
            if !near {
                continue;
            }
            let earth = a == Slot::Earth || b == Slot::Earth;
            let resolved = self.with_pair(a, b, |body_a, body_b| {
                let hit = check_collision(body_a, body_b, radius_a, radius_b, k);
                if hit {
                    reduce_velocity_if_too_fast(body_a);
                    reduce_velocity_if_too_fast(body_b);
                    if earth {
                        enforce_separation_speed(body_a, body_b, EARTH_SEPARATION_SPEED);
                    }
                }
                hit
            });
            if resolved == Some(true) {
                contacts.push(Contact { a, b });
            }
        }
        contacts
    }

    fn shape_velocities(&mut self, dt: f32) {
        let cap = self.config.speed_cap;
        let shape = |body: &mut orrery_core::Body| {
            gradually_slow_down(body, dt);
            apply_viscosity(body, dt);
            cap_velocity(body, cap);
        };
        for slot in self.collider_slots() {
            if let Some(body) = self.body_mut(slot) {
                shape(body);
            }
        }
        for comet in self.comets.iter_mut() {
            shape(&mut comet.body);
        }
    }

    fn age_fade_in(&mut self, dt: f32) {
        self.blue.fade_in += dt;
        if let Some(earth) = self.earth.as_mut() {
            earth.fade_in += dt;
        }
        self.reds.iter_mut().for_each(|r| r.fade_in += dt);
        self.greens.iter_mut().for_each(|g| g.fade_in += dt);
        self.clouds.iter_mut().for_each(|c| c.fade_in += dt);
        self.yellows.iter_mut().for_each(|y| y.fade_in += dt);
        self.oranges.iter_mut().for_each(|o| o.fade_in += dt);
        self.comets.iter_mut().for_each(|c| c.fade_in += dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_core::{Comet, PlayField, RedDot, SimConfig};

    fn quiet_state(seed: u64) -> SimulationState {
        let config = SimConfig {
            seed: Some(seed),
            ..SimConfig::default()
        };
        SimulationState::new(config, PlayField::new(0.0, 0.0, 1000.0, 800.0))
    }

    #[test]
    fn test_paused_step_is_noop() {
        let mut state = quiet_state(1);
        state.paused = true;
        let before = state.blue.body.position;
        state.step(0.05);
        assert_eq!(state.frame, 0);
        assert_eq!(state.blue.body.position, before);
    }

    #[test]
    fn test_delta_is_clamped() {
        let mut state = quiet_state(2);
        state.step(5.0);
        assert!((state.elapsed - MAX_DELTA_TIME as f64).abs() < 1e-6);
        state.step(-1.0);
        assert!((state.elapsed - MAX_DELTA_TIME as f64).abs() < 1e-6);
        assert_eq!(state.frame, 2);
    }

    #[test]
    fn test_bodies_stay_in_field() {
        let mut state = quiet_state(3);
        for _ in 0..600 {
            state.step(1.0 / 60.0);
            let field = state.field;
            for slot in state.collider_slots() {
                let body = state.body(slot).copied().unwrap();
                assert!(field.contains_outer(body.position), "{slot:?} escaped at {:?}", body.position);
            }
        }
    }

    #[test]
    fn test_ceiling_resets_before_forces() {
        let mut state = quiet_state(4);
        let center = state.field.center();
        while state.reds.len() < RED_DOT_CEILING {
            state.reds.push(RedDot::regular(center, Vec2::ZERO, 100.0));
        }
        let resets = state.reset_count;
        state.step(0.016);
        assert_eq!(state.reset_count, resets + 1);
        assert!(state.reds.len() < RED_DOT_CEILING);
        assert_eq!(state.frame, 1);
    }

    #[test]
    fn test_green_mass_follows_config() {
        let mut state = quiet_state(5);
        state.config.green_mass = 42.0;
        state.step(0.016);
        assert!(state.greens.iter().all(|g| g.body.mass == 42.0));
    }

    #[test]
    fn test_comet_leaving_field_removed() {
        let mut state = quiet_state(6);
        state.comets.clear();
        let field = state.field;
        let edge = Vec2::new(field.x + field.width - 0.5, field.center().y);
        state.comets.push(Comet::new(edge, Vec2::new(300.0, 0.0), 100.0));
        state.step(0.1);
        assert!(state.comets.iter().all(|c| field.contains_outer(c.body.position)));
    }

    #[test]
    fn test_clouds_never_move() {
        let mut state = quiet_state(7);
        for cloud in state.clouds.iter_mut() {
            cloud.decay.rearm(1.0e6);
        }
        let before: Vec<Vec2> = state.clouds.iter().map(|c| c.body.position).collect();
        assert!(!before.is_empty());
        for _ in 0..30 {
            state.step(0.016);
        }
        // clouds spawned during the run are appended after the pinned ones
        let after: Vec<Vec2> = state.clouds.iter().map(|c| c.body.position).collect();
        assert!(after.len() >= before.len());
        assert_eq!(&after[..before.len()], &before[..]);
        assert!(state.clouds.iter().all(|c| c.body.velocity == Vec2::ZERO));
    }

    #[test]
    fn test_head_on_contact_emits_cue() {
        let mut state = quiet_state(8);
        state.reds.clear();
        state.greens.clear();
        state.clouds.clear();
        state.earth = None;
        state.config.gravity_constant = 0.0;
        let center = state.field.center();
        state.blue.body.position = center + Vec2::new(0.0, 200.0);
        state.reds.push(RedDot::regular(center, Vec2::new(10.0, 0.0), 100.0));
        state.reds.push(RedDot::regular(center + Vec2::new(5.0, 0.0), Vec2::new(-10.0, 0.0), 100.0));
        state.drain_events();
        state.step(0.016);
        let events = state.drain_events();
        assert!(events.contains(&SimEvent::RedRedCollision));
        assert!(state.reds[0].body.velocity.x < 0.0);
        assert!(state.reds[1].body.velocity.x > 0.0);
    }
}
