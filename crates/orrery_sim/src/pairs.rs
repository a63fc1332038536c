//! Uniform addressing of every body in the pool, and unordered pair iteration
//! across all kinds at once.

use orrery_core::constants::{COLLISION_RADIUS, EARTH_RADIUS};
use orrery_core::Body;

use crate::state::SimulationState;

/// Index of one body in its kind's collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Blue,
    Earth,
    Red(usize),
    Green(usize),
    Yellow(usize),
    Orange(usize),
    Cloud(usize),
}

/// Every `(i, j)` with `i < j` over `items`, each unordered pair exactly once
pub fn unordered_pairs<T: Copy>(items: &[T]) -> impl Iterator<Item = (T, T)> + '_ {
    items
        .iter()
        .enumerate()
        .flat_map(move |(i, &a)| items[i + 1..].iter().map(move |&b| (a, b)))
}

impl SimulationState {
    /// Bodies that take part in gravity, in a fixed kind order
    pub fn gravity_slots(&self) -> Vec<Slot> {
        let mut slots = self.collider_slots();
        slots.extend((0..self.clouds.len()).map(Slot::Cloud));
        slots
    }

    /// Bodies that collide and bounce; comets and clouds never do
    pub fn collider_slots(&self) -> Vec<Slot> {
        let mut slots = Vec::with_capacity(
            2 + self.reds.len() + self.greens.len() + self.yellows.len() + self.oranges.len() + self.clouds.len(),
        );
        slots.push(Slot::Blue);
        if self.earth.is_some() {
            slots.push(Slot::Earth);
        }
        slots.extend((0..self.reds.len()).map(Slot::Red));
        slots.extend((0..self.greens.len()).map(Slot::Green));
        slots.extend((0..self.yellows.len()).map(Slot::Yellow));
        slots.extend((0..self.oranges.len()).map(Slot::Orange));
        slots
    }

    pub fn body(&self, slot: Slot) -> Option<&Body> {
        match slot {
            Slot::Blue => Some(&self.blue.body),
            Slot::Earth => self.earth.as_ref().map(|e| &e.body),
            Slot::Red(i) => self.reds.get(i).map(|r| &r.body),
            Slot::Green(i) => self.greens.get(i).map(|g| &g.body),
            Slot::Yellow(i) => self.yellows.get(i).map(|y| &y.body),
            Slot::Orange(i) => self.oranges.get(i).map(|o| &o.body),
            Slot::Cloud(i) => self.clouds.get(i).map(|c| &c.body),
        }
    }

    pub fn body_mut(&mut self, slot: Slot) -> Option<&mut Body> {
        match slot {
            Slot::Blue => Some(&mut self.blue.body),
            Slot::Earth => self.earth.as_mut().map(|e| &mut e.body),
            Slot::Red(i) => self.reds.get_mut(i).map(|r| &mut r.body),
            Slot::Green(i) => self.greens.get_mut(i).map(|g| &mut g.body),
            Slot::Yellow(i) => self.yellows.get_mut(i).map(|y| &mut y.body),
            Slot::Orange(i) => self.oranges.get_mut(i).map(|o| &mut o.body),
            Slot::Cloud(i) => self.clouds.get_mut(i).map(|c| &mut c.body),
        }
    }

    /// Run `f` on two distinct bodies and store the results back
    ///
    /// Returns `None` without calling `f` if either slot is stale.
    pub fn with_pair<R>(&mut self, a: Slot, b: Slot, f: impl FnOnce(&mut Body, &mut Body) -> R) -> Option<R> {
        if a == b {
            return None;
        }
        let mut body_a = *self.body(a)?;
        let mut body_b = *self.body(b)?;
        let out = f(&mut body_a, &mut body_b);
        *self.body_mut(a)? = body_a;
        *self.body_mut(b)? = body_b;
        Some(out)
    }

    /// Whether gravity felt by this body is currently reversed
    pub fn antigravity_active(&self, slot: Slot) -> bool {
        match slot {
            Slot::Blue => self.blue.antigravity.is_active(),
            Slot::Green(i) => self.greens.get(i).is_some_and(|g| g.antigravity.is_active()),
            _ => false,
        }
    }

    /// Radius used for contact tests, independent of the drawn size
    pub fn collision_radius(&self, slot: Slot) -> f32 {
        match slot {
            Slot::Earth => EARTH_RADIUS,
            Slot::Red(i) => self.reds.get(i).map_or(COLLISION_RADIUS, |r| r.collision_radius()),
            _ => COLLISION_RADIUS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_core::{PlayField, SimConfig};

    #[test]
    fn test_unordered_pairs_visits_each_once() {
        let items = [1, 2, 3, 4];
        let pairs: Vec<_> = unordered_pairs(&items).collect();
        assert_eq!(pairs, vec![(1, 2), (1, 3), (1, 4), (2, 3), (2, 4), (3, 4)]);
        assert_eq!(unordered_pairs(&[7]).count(), 0);
        assert_eq!(unordered_pairs::<u8>(&[]).count(), 0);
    }

    #[test]
    fn test_slot_lists() {
        let config = SimConfig {
            seed: Some(3),
            ..SimConfig::default()
        };
        let state = SimulationState::new(config, PlayField::new(0.0, 0.0, 800.0, 600.0));
        let colliders = state.collider_slots();
        let gravity = state.gravity_slots();
        assert_eq!(colliders[0], Slot::Blue);
        assert_eq!(colliders[1], Slot::Earth);
        assert_eq!(gravity.len(), colliders.len() + state.clouds.len());
        assert!(!colliders.iter().any(|s| matches!(s, Slot::Cloud(_))));
        assert!(gravity.iter().all(|&s| state.body(s).is_some()));
    }

    #[test]
    fn test_with_pair_writes_back_and_rejects_stale() {
        let config = SimConfig {
            seed: Some(3),
            ..SimConfig::default()
        };
        let mut state = SimulationState::new(config, PlayField::new(0.0, 0.0, 800.0, 600.0));
        let moved = state.with_pair(Slot::Blue, Slot::Red(0), |a, b| {
            a.velocity.x = 11.0;
            b.velocity.x = -11.0;
        });
        assert!(moved.is_some());
        assert_eq!(state.blue.body.velocity.x, 11.0);
        assert_eq!(state.reds[0].body.velocity.x, -11.0);
        assert!(state.with_pair(Slot::Blue, Slot::Red(5000), |_, _| ()).is_none());
        assert!(state.with_pair(Slot::Blue, Slot::Blue, |_, _| ()).is_none());
    }
}
