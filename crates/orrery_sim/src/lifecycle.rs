//! Per-kind state machines: splitting, merging, decay, cloud effects,
//! antigravity, crescent transforms and spawning.

use std::collections::HashSet;

use bevy::prelude::{debug, info};
use orrery_core::*;
use orrery_physics::spawn::{self, OrbitSource, RED_ORBIT};
use orrery_physics::{antigravity_kick, enforce_min_speed, sample_exponential};
use rand::Rng;

use crate::pairs::Slot;
use crate::state::SimulationState;

/// A resolved collision between two pool bodies, in slot-list order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: Slot,
    pub b: Slot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContactKind {
    RedRed(usize, usize),
    RedBlue(usize),
    RedGreen(usize),
    BlueGreen(usize),
    GreenGreen(usize, usize),
    Earth,
    Crescent,
}

fn classify(a: Slot, b: Slot) -> Option<ContactKind> {
    Some(match (a, b) {
        (Slot::Earth, _) | (_, Slot::Earth) => ContactKind::Earth,
        (Slot::Yellow(_) | Slot::Orange(_), _) | (_, Slot::Yellow(_) | Slot::Orange(_)) => ContactKind::Crescent,
        (Slot::Red(i), Slot::Red(j)) => ContactKind::RedRed(i, j),
        (Slot::Red(i), Slot::Blue) | (Slot::Blue, Slot::Red(i)) => ContactKind::RedBlue(i),
        (Slot::Red(i), Slot::Green(_)) | (Slot::Green(_), Slot::Red(i)) => ContactKind::RedGreen(i),
        (Slot::Blue, Slot::Green(g)) | (Slot::Green(g), Slot::Blue) => ContactKind::BlueGreen(g),
        (Slot::Green(i), Slot::Green(j)) => ContactKind::GreenGreen(i, j),
        _ => return None,
    })
}

/// Two-body transitions held back until every contact of the frame is seen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    Split(usize),
    Merge(usize, usize),
    MiniOrange { keep: usize, remove: usize },
}

/// Remove `indices` from `items`, highest first so earlier indices stay valid
pub(crate) fn remove_indices<T>(items: &mut Vec<T>, mut indices: Vec<usize>) {
    indices.sort_unstable();
    indices.dedup();
    for &i in indices.iter().rev() {
        if i < items.len() {
            items.remove(i);
        }
    }
}

/// Shared access to the star-like state of the blue dot and green stars
pub(crate) trait Star {
    fn body(&mut self) -> &mut Body;
    fn antigravity(&mut self) -> &mut Antigravity;
    fn dwell(&mut self) -> &mut CloudDwell;
    fn text(&mut self) -> &mut f32;
}

impl Star for BlueDot {
    fn body(&mut self) -> &mut Body {
        &mut self.body
    }
    fn antigravity(&mut self) -> &mut Antigravity {
        &mut self.antigravity
    }
    fn dwell(&mut self) -> &mut CloudDwell {
        &mut self.dwell
    }
    fn text(&mut self) -> &mut f32 {
        &mut self.antigravity_text
    }
}

impl Star for GreenDot {
    fn body(&mut self) -> &mut Body {
        &mut self.body
    }
    fn antigravity(&mut self) -> &mut Antigravity {
        &mut self.antigravity
    }
    fn dwell(&mut self) -> &mut CloudDwell {
        &mut self.dwell
    }
    fn text(&mut self) -> &mut f32 {
        &mut self.antigravity_text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StarId {
    Blue,
    Green(usize),
}

fn activate_star<S: Star, R: Rng + ?Sized>(star: &mut S, rng: &mut R, show_text: bool) {
    star.antigravity().activate();
    antigravity_kick(star.body(), rng);
    if show_text {
        *star.text() = ANTIGRAVITY_TEXT_DURATION;
    }
}

fn tick_star<S: Star>(star: &mut S, dt: f32) -> AntigravityTick {
    let text = star.text();
    *text = (*text - dt).max(0.0);
    star.antigravity().tick(dt)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dwell {
    Outside,
    Inside,
    /// Continuous dwell reached the trigger inside this cloud
    Triggered(usize),
}

/// Advance one star's continuous cloud dwell
///
/// Entering a cloud kicks the velocity once (rarely doubled, usually halved)
/// and floors the speed. Leaving resets the dwell clock.
fn dwell_step<S: Star, R: Rng + ?Sized>(
    star: &mut S,
    clouds: &[Cloud],
    rng: &mut R,
    min_speed: f32,
    trigger: f32,
    dt: f32,
) -> Dwell {
    let position = star.body().position;
    let Some(cloud) = clouds.iter().position(|c| c.contains(position)) else {
        *star.dwell() = CloudDwell::default();
        return Dwell::Outside;
    };
    if !star.dwell().inside {
        star.dwell().inside = true;
        let factor = if rng.gen_range(0.0..1.0) < CLOUD_DWELL_DOUBLE_CHANCE { 2.0 } else { 0.5 };
        star.body().velocity *= factor;
        enforce_min_speed(star.body(), min_speed, rng);
    }
    let dwell = star.dwell();
    dwell.time += dt;
    if dwell.time >= trigger {
        dwell.time = 0.0;
        Dwell::Triggered(cloud)
    } else {
        Dwell::Inside
    }
}

impl SimulationState {
    /// Every lifecycle transition for one frame, in a fixed order
    pub(crate) fn run_lifecycle(&mut self, contacts: &[Contact], dt: f32) {
        self.process_contacts(contacts);
        self.update_antigravity(dt);
        self.update_cloud_dwell(dt);
        self.update_red_cloud_fade(dt);
        self.update_red_decay(dt);
        self.update_yellow_crescents(dt);
        self.update_orange_crescents(dt);
        self.update_clouds(dt);
        self.update_comets(dt);
        self.spontaneous_spawns(dt);
        self.recover_from_collapse();
    }

    fn process_contacts(&mut self, contacts: &[Contact]) {
        let mut consumed = HashSet::new();
        let mut deferred = Vec::new();

        for contact in contacts {
            let Some(kind) = classify(contact.a, contact.b) else {
                continue;
            };
            match kind {
                ContactKind::RedRed(i, j) => {
                    self.emit(SimEvent::RedRedCollision);
                    let both_mini = self.reds.get(i).is_some_and(RedDot::is_mini)
                        && self.reds.get(j).is_some_and(RedDot::is_mini);
                    if !both_mini || consumed.contains(&i) || consumed.contains(&j) {
                        continue;
                    }
                    let roll: f64 = self.rng.gen_range(0.0..1.0);
                    let action = if roll < MINI_ORANGE_CHANCE {
                        Deferred::MiniOrange { keep: i, remove: j }
                    } else if roll < MINI_ORANGE_CHANCE + MINI_MERGE_CHANCE {
                        Deferred::Merge(i, j)
                    } else {
                        continue;
                    };
                    consumed.insert(i);
                    consumed.insert(j);
                    deferred.push(action);
                }
                ContactKind::RedBlue(i) => {
                    self.emit(SimEvent::RedBlueCollision);
                    if let Some(red) = self.reds.get_mut(i) {
                        red.blue_collisions += 1;
                    }
                    self.consider_split(i, &mut consumed, &mut deferred);
                }
                ContactKind::RedGreen(i) => {
                    self.emit(SimEvent::RedGreenCollision);
                    if let Some(red) = self.reds.get_mut(i) {
                        red.green_collisions += 1;
                    }
                    self.consider_split(i, &mut consumed, &mut deferred);
                }
                ContactKind::BlueGreen(g) => self.blue_green_contact(g),
                ContactKind::GreenGreen(i, j) => {
                    self.emit(SimEvent::GreenGreenCollision);
                    let threshold = self.config.green_antigravity_threshold;
                    for g in [i, j] {
                        let Some(green) = self.greens.get_mut(g) else {
                            continue;
                        };
                        green.green_collisions += 1;
                        if green.green_collisions >= threshold {
                            green.green_collisions = 0;
                            self.activate_antigravity(StarId::Green(g));
                        }
                    }
                }
                ContactKind::Earth => self.emit(SimEvent::EarthCollision),
                ContactKind::Crescent => self.emit(SimEvent::CrescentCollision),
            }
        }

        self.apply_deferred(deferred);
    }

    fn consider_split(&mut self, i: usize, consumed: &mut HashSet<usize>, deferred: &mut Vec<Deferred>) {
        let Some(red) = self.reds.get(i) else {
            return;
        };
        if red.is_mini() || consumed.contains(&i) {
            return;
        }
        let policy = self.config.split_policy;
        if red.split_collisions() < policy.threshold() {
            return;
        }
        let split = match policy {
            SplitPolicy::Deterministic { .. } => true,
            SplitPolicy::Probabilistic { chance, .. } => self.rng.gen_range(0.0..1.0) < chance,
        };
        if split {
            consumed.insert(i);
            deferred.push(Deferred::Split(i));
        }
    }

    fn blue_green_contact(&mut self, green: usize) {
        self.emit(SimEvent::BlueGreenCollision);

        self.blue_green_collisions += 1;
        if self.blue_green_collisions >= self.config.cloud_spawn_collisions {
            self.blue_green_collisions = 0;
            if self.clouds.len() < self.config.max_clouds {
                self.spawn_cloud_random();
                self.emit(SimEvent::CloudSpawned);
                debug!("Cloud spawned from blue-green collisions ({} clouds)", self.clouds.len());
            }
        }

        self.blue_green_antigravity += 1;
        if self.blue_green_antigravity >= self.config.blue_antigravity_threshold {
            self.blue_green_antigravity = 0;
            self.activate_antigravity(StarId::Blue);
        }

        let threshold = self.config.green_antigravity_threshold;
        if let Some(g) = self.greens.get_mut(green) {
            g.blue_collisions += 1;
            if g.blue_collisions >= threshold {
                g.blue_collisions = 0;
                self.activate_antigravity(StarId::Green(green));
            }
        }
    }

    fn apply_deferred(&mut self, deferred: Vec<Deferred>) {
        let mut removals = Vec::new();
        for action in deferred {
            match action {
                Deferred::Split(i) => self.split_red(i),
                Deferred::Merge(i, j) => {
                    if self.merge_in_place(i, j) {
                        removals.push(j);
                    }
                }
                Deferred::MiniOrange { keep, remove } => {
                    let Some((a, b)) = self.mini_pair(keep, remove) else {
                        continue;
                    };
                    self.spawn_orange((a.position + b.position) * 0.5, (a.velocity + b.velocity) * 0.5);
                    removals.push(remove);
                    debug!("Mini red collision produced an orange crescent");
                }
            }
        }
        remove_indices(&mut self.reds, removals);
    }

    /// Merge two mini reds into one regular red dot at their midpoint
    ///
    /// The merged dot takes index `i`. Returns false, changing nothing, when
    /// either index is stale or no longer a mini.
    pub fn merge_minis(&mut self, i: usize, j: usize) -> bool {
        if !self.merge_in_place(i, j) {
            return false;
        }
        self.reds.remove(j);
        true
    }

    /// Overwrite `i` with the merged dot; `j` is left for the caller to remove
    fn merge_in_place(&mut self, i: usize, j: usize) -> bool {
        if i == j {
            return false;
        }
        let Some((a, b)) = self.mini_pair(i, j) else {
            return false;
        };
        let position = (a.position + b.position) * 0.5;
        let velocity = (a.velocity + b.velocity) * 0.5;
        let threshold = self.red_threshold();
        self.reds[i] = RedDot::regular(position, velocity, threshold);
        self.emit(SimEvent::RedDotsMerged);
        debug!("Mini reds {} and {} merged", i, j);
        true
    }

    /// Bodies of two reds that are both still minis
    fn mini_pair(&self, i: usize, j: usize) -> Option<(Body, Body)> {
        let a = self.reds.get(i).filter(|r| r.is_mini())?;
        let b = self.reds.get(j).filter(|r| r.is_mini())?;
        Some((a.body, b.body))
    }

    /// Replace a regular red dot by two minis at opposite offsets
    ///
    /// The first mini takes the parent's index, the second is appended, so no
    /// other index moves. Minis and stale indices are skipped.
    pub fn split_red(&mut self, i: usize) {
        let Some(parent) = self.reds.get(i).filter(|r| !r.is_mini()).map(|r| r.body) else {
            return;
        };
        let [first, second] = spawn::split_positions(parent.position, parent.radius, &mut self.rng);
        let t1 = self.red_threshold();
        let t2 = self.red_threshold();
        self.reds[i] = RedDot::mini(first, parent.velocity, t1);
        self.reds.push(RedDot::mini(second, parent.velocity, t2));
        self.emit(SimEvent::MiniRedsCreated);
        debug!("Red dot {} split into mini reds", i);
    }

    pub(crate) fn activate_antigravity(&mut self, who: StarId) {
        let show_text = !self.antigravity_text_shown;
        match who {
            StarId::Blue => activate_star(&mut self.blue, &mut self.rng, show_text),
            StarId::Green(i) => match self.greens.get_mut(i) {
                Some(green) => activate_star(green, &mut self.rng, show_text),
                None => return,
            },
        }
        self.antigravity_text_shown = true;
        self.emit(SimEvent::AntigravityActivated);
        if show_text {
            self.emit(SimEvent::AntigravityTextShown);
        }
        debug!("Antigravity activated on {:?}", who);
    }

    fn update_antigravity(&mut self, dt: f32) {
        let tick = tick_star(&mut self.blue, dt);
        let mut chimes = tick.chimes;
        if tick.ended {
            debug!("Antigravity ended on {:?}", StarId::Blue);
        }
        for (i, green) in self.greens.iter_mut().enumerate() {
            let tick = tick_star(green, dt);
            chimes += tick.chimes;
            if tick.ended {
                debug!("Antigravity ended on {:?}", StarId::Green(i));
            }
        }
        for _ in 0..chimes {
            self.emit(SimEvent::Windchime);
        }
    }

    fn update_cloud_dwell(&mut self, dt: f32) {
        let min_speed = self.config.cloud_dwell_min_speed;
        let trigger = self.config.cloud_dwell_trigger;

        if let Dwell::Triggered(cloud) = dwell_step(&mut self.blue, &self.clouds, &mut self.rng, min_speed, trigger, dt)
        {
            self.activate_antigravity(StarId::Blue);
            self.cloud_dwell_payoff(cloud);
        }
        for i in 0..self.greens.len() {
            let outcome = dwell_step(&mut self.greens[i], &self.clouds, &mut self.rng, min_speed, trigger, dt);
            if let Dwell::Triggered(cloud) = outcome {
                self.activate_antigravity(StarId::Green(i));
                self.cloud_dwell_payoff(cloud);
            }
        }
    }

    /// A completed dwell either reshapes the cloud (with a crescent and two reds) or consumes it
    fn cloud_dwell_payoff(&mut self, cloud: usize) {
        let Some((center, radius)) = self.clouds.get(cloud).map(|c| (c.body.position, c.body.radius)) else {
            return;
        };
        if !self.config.cloud_dwell_spawns {
            self.clouds.remove(cloud);
            self.emit(SimEvent::CloudVanished);
            return;
        }

        self.spawn_yellow(center, Vec2::ZERO);
        let sources = [OrbitSource {
            position: center,
            weight: 1.0,
        }];
        for position in spawn::split_positions(center, radius * 0.25, &mut self.rng) {
            let position = self.field.clamp(position);
            let velocity = spawn::orbital_seed_velocity(position, &sources, RED_ORBIT, &self.field);
            self.spawn_red(position, velocity);
        }
        let puffs = spawn::cloud_puffs(radius, &mut self.rng);
        let mass = spawn::cloud_active_mass(&mut self.rng);
        self.clouds[cloud].reshape(puffs, mass);
        self.emit(SimEvent::CloudReshaped);
        debug!("Cloud {} reshaped after dwell (mass {:.2})", cloud, mass);
    }

    fn update_red_cloud_fade(&mut self, dt: f32) {
        let mut faded = Vec::new();
        let mut splits = Vec::new();
        for (i, red) in self.reds.iter_mut().enumerate() {
            let RedForm::Regular { cloud_fade, in_cloud } = &mut red.form else {
                continue;
            };
            let position = red.body.position;
            if self.clouds.iter().any(|c| c.contains(position)) {
                *cloud_fade -= CLOUD_FADE_RATE * dt;
                *in_cloud = true;
                if *cloud_fade <= 0.0 {
                    *cloud_fade = 0.0;
                    faded.push(i);
                }
            } else {
                if *in_cloud && *cloud_fade > 0.0 && *cloud_fade < 1.0 {
                    splits.push(i);
                }
                *in_cloud = false;
            }
        }
        for i in splits {
            self.split_red(i);
        }
        for _ in &faded {
            self.emit(SimEvent::RedDotFaded);
        }
        remove_indices(&mut self.reds, faded);
    }

    fn update_red_decay(&mut self, dt: f32) {
        let expired: Vec<usize> = self
            .reds
            .iter_mut()
            .enumerate()
            .filter_map(|(i, red)| red.decay.tick(dt).then_some(i))
            .collect();

        let mut removals = Vec::new();
        for i in expired {
            if !self.reds[i].is_mini() {
                let threshold = self.red_threshold();
                self.reds[i].downgrade_to_mini(threshold);
                continue;
            }
            if self.rng.gen_range(0.0..1.0) >= MINI_TRANSFORM_CHANCE {
                removals.push(i);
                continue;
            }

            let target = TransformTarget::ALL[self.rng.gen_range(0..TransformTarget::ALL.len())];
            if self.transform_mini(i, target) {
                removals.push(i);
            }
        }
        remove_indices(&mut self.reds, removals);
    }

    /// Turn the mini red at `i` into `target`, keeping its position and velocity
    ///
    /// Returns true when the mini itself must still be removed; a red target
    /// reuses its slot.
    fn transform_mini(&mut self, i: usize, target: TransformTarget) -> bool {
        let Some(body) = self.reds.get(i).map(|r| r.body) else {
            return false;
        };
        let (position, velocity) = (body.position, body.velocity);
        self.emit(SimEvent::Transformation);
        debug!("Mini red transformed into {:?}", target);
        match target {
            TransformTarget::RedDot => {
                let threshold = self.red_threshold();
                self.reds[i] = RedDot::regular(position, velocity, threshold);
                return false;
            }
            TransformTarget::GreenDot => self.spawn_green(position, velocity),
            TransformTarget::YellowCrescent => self.spawn_yellow(position, velocity),
            TransformTarget::OrangeCrescent => self.spawn_orange(position, velocity),
            TransformTarget::Cloud => self.spawn_cloud_at(position),
        }
        true
    }

    fn update_yellow_crescents(&mut self, dt: f32) {
        let mut dissolved = Vec::new();
        for (i, yellow) in self.yellows.iter_mut().enumerate() {
            yellow.phase = match yellow.phase {
                YellowPhase::Decaying { elapsed } => {
                    let elapsed = elapsed + dt;
                    if elapsed >= YELLOW_DECAY_TIME {
                        let into = if self.rng.gen_range(0.0..1.0) < YELLOW_TO_BLUE_CHANCE {
                            DissolveTarget::BlueDot
                        } else {
                            DissolveTarget::RedDot
                        };
                        YellowPhase::Dissolving { elapsed: 0.0, into }
                    } else {
                        YellowPhase::Decaying { elapsed }
                    }
                }
                YellowPhase::Dissolving { elapsed, into } => {
                    let elapsed = elapsed + dt;
                    if elapsed >= YELLOW_DISSOLVE_TIME {
                        dissolved.push((i, into));
                    }
                    YellowPhase::Dissolving { elapsed, into }
                }
            };
        }

        let mut removals = Vec::with_capacity(dissolved.len());
        for (i, into) in dissolved {
            let body = self.yellows[i].body;
            match into {
                DissolveTarget::BlueDot => self.blue.teleport(body.position, body.velocity),
                DissolveTarget::RedDot => self.spawn_red(body.position, body.velocity),
            }
            self.emit(SimEvent::YellowCrescentDissolved);
            debug!("Yellow crescent dissolved into {:?}", into);
            removals.push(i);
        }
        remove_indices(&mut self.yellows, removals);
    }

    fn update_orange_crescents(&mut self, dt: f32) {
        let mut faded = Vec::new();
        for (i, orange) in self.oranges.iter_mut().enumerate() {
            orange.phase = match orange.phase {
                OrangePhase::Decaying(mut timer) => {
                    if timer.tick(dt) {
                        OrangePhase::FadingOut {
                            remaining: ORANGE_FADE_TIME,
                        }
                    } else {
                        OrangePhase::Decaying(timer)
                    }
                }
                OrangePhase::FadingOut { remaining } => {
                    let remaining = remaining - dt;
                    if remaining <= 0.0 {
                        faded.push(i);
                    }
                    OrangePhase::FadingOut {
                        remaining: remaining.max(0.0),
                    }
                }
            };
        }
        for _ in &faded {
            self.emit(SimEvent::OrangeCrescentFaded);
        }
        remove_indices(&mut self.oranges, faded);
    }

    /// Half-life removal, then overlap dedup where the lowest index survives
    fn update_clouds(&mut self, dt: f32) {
        let mut gone: Vec<usize> = self
            .clouds
            .iter_mut()
            .enumerate()
            .filter_map(|(i, cloud)| cloud.decay.tick(dt).then_some(i))
            .collect();

        let mut survivors: Vec<usize> = Vec::with_capacity(self.clouds.len());
        for j in 0..self.clouds.len() {
            if gone.contains(&j) {
                continue;
            }
            if survivors.iter().any(|&i| self.clouds[i].overlaps(&self.clouds[j])) {
                gone.push(j);
            } else {
                survivors.push(j);
            }
        }

        for _ in &gone {
            self.emit(SimEvent::CloudVanished);
        }
        if !gone.is_empty() {
            debug!("{} cloud(s) vanished", gone.len());
        }
        remove_indices(&mut self.clouds, gone);
    }

    fn update_comets(&mut self, dt: f32) {
        let mean = self.config.comet_spawn_mean;
        let mut drops = Vec::new();
        for comet in self.comets.iter_mut() {
            if comet.spawn.tick(dt) {
                let threshold = sample_exponential(mean, &mut self.rng);
                comet.spawn.rearm(threshold);
                drops.push(spawn::comet_seed(comet.body.position, comet.body.velocity, &mut self.rng));
            }
        }
        for (position, velocity) in drops {
            let position = self.field.clamp(position);
            self.spawn_red(position, velocity);
        }
    }

    fn spontaneous_spawns(&mut self, dt: f32) {
        if self.spontaneous_cloud.tick(dt) {
            let threshold = sample_exponential(self.config.spontaneous_cloud_mean, &mut self.rng);
            self.spontaneous_cloud.rearm(threshold);
            if self.clouds.len() < self.config.max_clouds {
                self.spawn_cloud_random();
                self.emit(SimEvent::CloudSpawned);
            }
        }
        if self.spontaneous_comet.tick(dt) {
            let threshold = sample_exponential(self.config.spontaneous_comet_mean, &mut self.rng);
            self.spontaneous_comet.rearm(threshold);
            self.spawn_comet();
            self.emit(SimEvent::CometSpawned);
        }
    }

    /// One lone red dot with a cloud around is a dead end; trade the cloud for two reds
    fn recover_from_collapse(&mut self) {
        if self.reds.len() != 1 || self.clouds.is_empty() {
            return;
        }
        self.clouds.pop();
        self.emit(SimEvent::CloudVanished);
        self.spawn_red_random();
        self.spawn_red_random();
        info!("Population collapse recovered: {} red, {} cloud", self.reds.len(), self.clouds.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(seed: u64) -> SimulationState {
        let config = SimConfig {
            seed: Some(seed),
            ..SimConfig::default()
        };
        SimulationState::new(config, PlayField::new(0.0, 0.0, 800.0, 600.0))
    }

    #[test]
    fn test_classify_is_order_independent() {
        assert_eq!(classify(Slot::Blue, Slot::Red(2)), Some(ContactKind::RedBlue(2)));
        assert_eq!(classify(Slot::Red(2), Slot::Blue), Some(ContactKind::RedBlue(2)));
        assert_eq!(classify(Slot::Green(1), Slot::Blue), Some(ContactKind::BlueGreen(1)));
        assert_eq!(classify(Slot::Earth, Slot::Yellow(0)), Some(ContactKind::Earth));
        assert_eq!(classify(Slot::Orange(0), Slot::Red(3)), Some(ContactKind::Crescent));
        assert_eq!(classify(Slot::Cloud(0), Slot::Blue), None);
    }

    #[test]
    fn test_remove_indices_descending() {
        let mut items = vec!['a', 'b', 'c', 'd', 'e'];
        remove_indices(&mut items, vec![1, 3, 1, 9]);
        assert_eq!(items, vec!['a', 'c', 'e']);
    }

    #[test]
    fn test_deterministic_split_at_threshold() {
        let mut s = state(21);
        s.config.split_policy = SplitPolicy::Deterministic { threshold: 3 };
        s.reds.truncate(1);
        s.reds[0].blue_collisions = 2;
        let contact = Contact {
            a: Slot::Blue,
            b: Slot::Red(0),
        };
        s.process_contacts(&[contact]);
        assert_eq!(s.reds.len(), 2);
        assert!(s.reds.iter().all(RedDot::is_mini));
        assert!(s.pending_events().contains(&SimEvent::MiniRedsCreated));
    }

    #[test]
    fn test_red_red_contact_never_counts_toward_split() {
        let mut s = state(22);
        s.config.split_policy = SplitPolicy::Deterministic { threshold: 1 };
        s.reds.truncate(2);
        let contact = Contact {
            a: Slot::Red(0),
            b: Slot::Red(1),
        };
        s.process_contacts(&[contact]);
        assert_eq!(s.reds.len(), 2);
        assert_eq!(s.reds[0].split_collisions(), 0);
        assert!(!s.reds[0].is_mini());
    }

    #[test]
    fn test_split_skips_stale_and_mini() {
        let mut s = state(23);
        s.reds.truncate(1);
        s.reds[0] = RedDot::mini(Vec2::new(100.0, 100.0), Vec2::ZERO, 5.0);
        s.split_red(0);
        s.split_red(40);
        assert_eq!(s.reds.len(), 1);
    }

    #[test]
    fn test_blue_green_contacts_spawn_cloud_and_antigravity() {
        let mut s = state(24);
        s.config.cloud_spawn_collisions = 2;
        s.config.blue_antigravity_threshold = 2;
        let clouds_before = s.clouds.len();
        let contact = Contact {
            a: Slot::Blue,
            b: Slot::Green(0),
        };
        s.process_contacts(&[contact, contact]);
        assert_eq!(s.clouds.len(), clouds_before + 1);
        assert!(s.blue.antigravity.is_active());
        assert!(s.blue.body.speed() >= ANTIGRAVITY_MIN_SPEED - 1e-3);
        assert_eq!(s.blue_green_collisions, 0);
        assert!(s.antigravity_text_shown);
        let events = s.drain_events();
        assert!(events.contains(&SimEvent::AntigravityTextShown));
        assert!(events.contains(&SimEvent::CloudSpawned));

        // the text only shows for the first activation of a run
        s.activate_antigravity(StarId::Green(0));
        assert!(!s.drain_events().contains(&SimEvent::AntigravityTextShown));
    }

    #[test]
    fn test_red_fades_inside_cloud() {
        let mut s = state(25);
        s.reds.truncate(1);
        s.clouds.truncate(1);
        let center = s.clouds[0].body.position;
        s.reds[0] = RedDot::regular(center, Vec2::ZERO, 1000.0);
        for _ in 0..39 {
            s.update_red_cloud_fade(0.1);
        }
        assert_eq!(s.reds.len(), 1);
        assert!(s.reds[0].cloud_fade() < 0.1);
        for _ in 0..3 {
            s.update_red_cloud_fade(0.1);
        }
        assert!(s.reds.is_empty());
        assert!(s.pending_events().contains(&SimEvent::RedDotFaded));
    }

    #[test]
    fn test_partial_fade_exit_splits() {
        let mut s = state(26);
        s.reds.truncate(1);
        s.clouds.truncate(1);
        let center = s.clouds[0].body.position;
        s.reds[0] = RedDot::regular(center, Vec2::ZERO, 1000.0);
        s.update_red_cloud_fade(0.5);
        s.reds[0].body.position = center + Vec2::new(s.clouds[0].body.radius * 3.0, 0.0);
        s.clouds[0].body.position = Vec2::new(-10_000.0, -10_000.0);
        s.update_red_cloud_fade(0.1);
        assert_eq!(s.reds.len(), 2);
        assert!(s.reds.iter().all(RedDot::is_mini));
    }

    #[test]
    fn test_orange_fades_out_then_removed() {
        let mut s = state(27);
        s.oranges.clear();
        s.oranges.push(OrangeCrescent::new(Vec2::new(50.0, 50.0), Vec2::ZERO, 0.2));
        s.update_orange_crescents(0.3);
        assert!(matches!(s.oranges[0].phase, OrangePhase::FadingOut { .. }));
        s.update_orange_crescents(0.6);
        assert_eq!(s.oranges.len(), 1);
        s.update_orange_crescents(0.6);
        assert!(s.oranges.is_empty());
    }

    #[test]
    fn test_overlapping_clouds_keep_lowest_index() {
        let mut s = state(28);
        s.clouds.clear();
        s.clouds.push(Cloud::new(Vec2::new(100.0, 100.0), 50.0, 1000.0, Vec::new()));
        s.clouds.push(Cloud::new(Vec2::new(600.0, 400.0), 50.0, 1000.0, Vec::new()));
        s.clouds.push(Cloud::new(Vec2::new(130.0, 100.0), 50.0, 1000.0, Vec::new()));
        s.update_clouds(0.01);
        assert_eq!(s.clouds.len(), 2);
        assert_eq!(s.clouds[0].body.position, Vec2::new(100.0, 100.0));
        assert_eq!(s.clouds[1].body.position, Vec2::new(600.0, 400.0));
    }

    #[test]
    fn test_cloud_dwell_activates_and_reshapes() {
        let mut s = state(29);
        s.clouds.truncate(1);
        let center = s.clouds[0].body.position;
        let mass_before = s.clouds[0].body.mass;
        s.blue.body.position = center;
        s.blue.body.velocity = Vec2::ZERO;
        let yellows = s.yellows.len();
        let reds = s.reds.len();
        s.config.cloud_dwell_trigger = 0.5;
        for green in s.greens.iter_mut() {
            green.body.position = center + Vec2::new(10_000.0, 0.0);
        }
        // keep the blue dot pinned in the cloud
        for _ in 0..6 {
            s.blue.body.position = center;
            s.update_cloud_dwell(0.1);
        }
        assert!(s.blue.antigravity.is_active());
        assert_eq!(s.yellows.len(), yellows + 1);
        assert_eq!(s.reds.len(), reds + 2);
        assert_eq!(s.clouds.len(), 1);
        assert_ne!(s.clouds[0].body.mass, mass_before);
    }

    #[test]
    fn test_collapse_recovery() {
        let mut s = state(30);
        s.reds.truncate(1);
        let clouds = s.clouds.len();
        assert!(clouds >= 1);
        s.recover_from_collapse();
        assert_eq!(s.reds.len(), 3);
        assert_eq!(s.clouds.len(), clouds - 1);
    }

    fn mini_pair_state(s: &mut SimulationState) {
        s.reds.clear();
        s.oranges.clear();
        s.reds.push(RedDot::mini(Vec2::new(100.0, 100.0), Vec2::new(2.0, 0.0), 1000.0));
        s.reds.push(RedDot::mini(Vec2::new(103.0, 100.0), Vec2::new(-4.0, 2.0), 1000.0));
        s.drain_events();
    }

    #[test]
    fn test_expired_regular_becomes_mini() {
        let mut s = state(31);
        s.reds.clear();
        s.reds.push(RedDot::regular(Vec2::new(200.0, 150.0), Vec2::new(3.0, -1.0), 0.0));
        s.update_red_decay(0.1);
        assert_eq!(s.reds.len(), 1);
        assert!(s.reds[0].is_mini());
        assert_eq!(s.reds[0].body.position, Vec2::new(200.0, 150.0));
        assert_eq!(s.reds[0].body.velocity, Vec2::new(3.0, -1.0));
        assert_eq!(s.reds[0].decay.elapsed, 0.0);
    }

    #[test]
    fn test_expired_minis_mostly_vanish() {
        let mut s = state(32);
        let mut removed = 0;
        let mut transformed = 0;
        for _ in 0..3000 {
            s.reds.clear();
            s.reds.push(RedDot::mini(Vec2::new(200.0, 150.0), Vec2::ZERO, 0.0));
            s.drain_events();
            s.update_red_decay(0.1);
            if s.pending_events().contains(&SimEvent::Transformation) {
                transformed += 1;
            } else {
                assert!(s.reds.is_empty());
                removed += 1;
            }
        }
        // about 1 % transform
        assert!((5..=80).contains(&transformed), "transformed = {transformed}");
        assert_eq!(removed + transformed, 3000);
    }

    #[test]
    fn test_transform_keeps_position_and_velocity() {
        let position = Vec2::new(220.0, 180.0);
        let velocity = Vec2::new(-6.0, 4.0);
        for target in TransformTarget::ALL {
            let mut s = state(33);
            s.reds.clear();
            s.reds.push(RedDot::mini(position, velocity, 0.0));
            let (greens, yellows, oranges, clouds) = (s.greens.len(), s.yellows.len(), s.oranges.len(), s.clouds.len());
            s.drain_events();

            let remove = s.transform_mini(0, target);

            assert!(s.pending_events().contains(&SimEvent::Transformation));
            let body = match target {
                TransformTarget::RedDot => {
                    assert!(!remove);
                    assert!(!s.reds[0].is_mini());
                    s.reds[0].body
                }
                TransformTarget::GreenDot => {
                    assert_eq!(s.greens.len(), greens + 1);
                    s.greens[greens].body
                }
                TransformTarget::YellowCrescent => {
                    assert_eq!(s.yellows.len(), yellows + 1);
                    s.yellows[yellows].body
                }
                TransformTarget::OrangeCrescent => {
                    assert_eq!(s.oranges.len(), oranges + 1);
                    s.oranges[oranges].body
                }
                TransformTarget::Cloud => {
                    assert_eq!(s.clouds.len(), clouds + 1);
                    assert_eq!(s.clouds[clouds].body.position, position);
                    assert!(remove);
                    continue;
                }
            };
            assert_eq!(remove, target != TransformTarget::RedDot);
            assert_eq!(body.position, position);
            assert_eq!(body.velocity, velocity);
        }
    }

    #[test]
    fn test_mini_contacts_orange_or_merge() {
        let mut s = state(34);
        let midpoint = Vec2::new(101.5, 100.0);
        let contact = Contact {
            a: Slot::Red(0),
            b: Slot::Red(1),
        };
        let (mut oranges, mut merges, mut nothing) = (0, 0, 0);
        for _ in 0..4000 {
            mini_pair_state(&mut s);
            s.process_contacts(&[contact]);
            let events = s.drain_events();
            if !s.oranges.is_empty() {
                oranges += 1;
                assert_eq!(s.oranges.len(), 1);
                assert_eq!(s.oranges[0].body.position, midpoint);
                assert_eq!(s.oranges[0].body.velocity, Vec2::new(-1.0, 1.0));
                assert_eq!(s.reds.len(), 1);
                assert!(s.reds[0].is_mini());
                assert_eq!(s.reds[0].body.position, Vec2::new(100.0, 100.0));
                assert!(!events.contains(&SimEvent::RedDotsMerged));
            } else if events.contains(&SimEvent::RedDotsMerged) {
                merges += 1;
                assert_eq!(s.reds.len(), 1);
                assert!(!s.reds[0].is_mini());
                assert_eq!(s.reds[0].body.position, midpoint);
                assert_eq!(s.reds[0].body.velocity, Vec2::new(-1.0, 1.0));
            } else {
                nothing += 1;
                assert_eq!(s.reds.len(), 2);
            }
        }
        // 1.25 % orange, 5 % merge
        assert!((20..=90).contains(&oranges), "oranges = {oranges}");
        assert!((130..=280).contains(&merges), "merges = {merges}");
        assert_eq!(oranges + merges + nothing, 4000);
    }

    #[test]
    fn test_shared_mini_takes_one_outcome_per_frame() {
        let mut s = state(35);
        let contacts = [
            Contact {
                a: Slot::Red(0),
                b: Slot::Red(1),
            },
            Contact {
                a: Slot::Red(0),
                b: Slot::Red(2),
            },
        ];
        let mut any = 0;
        for _ in 0..3000 {
            mini_pair_state(&mut s);
            s.reds.push(RedDot::mini(Vec2::new(97.0, 100.0), Vec2::ZERO, 1000.0));
            s.process_contacts(&contacts);
            let merges = s.drain_events().iter().filter(|&&e| e == SimEvent::RedDotsMerged).count();
            let outcomes = merges + s.oranges.len();
            assert!(outcomes <= 1, "mini 0 took {outcomes} outcomes");
            assert_eq!(s.reds.len(), 3 - outcomes);
            any += outcomes;
        }
        assert!(any > 0);
    }

    #[test]
    fn test_probabilistic_split_rate() {
        let mut s = state(36);
        s.config.split_policy = SplitPolicy::Probabilistic {
            threshold: 20,
            chance: 0.2,
        };
        let contact = Contact {
            a: Slot::Blue,
            b: Slot::Red(0),
        };

        for _ in 0..500 {
            s.reds.clear();
            s.reds.push(RedDot::regular(Vec2::new(300.0, 300.0), Vec2::ZERO, 1000.0));
            s.reds[0].blue_collisions = 10;
            s.process_contacts(&[contact]);
            assert_eq!(s.reds.len(), 1, "split below the threshold");
        }

        let mut splits = 0;
        for _ in 0..2000 {
            s.reds.clear();
            s.reds.push(RedDot::regular(Vec2::new(300.0, 300.0), Vec2::ZERO, 1000.0));
            s.reds[0].blue_collisions = 12;
            s.reds[0].green_collisions = 7;
            s.process_contacts(&[contact]);
            if s.reds.len() == 2 {
                splits += 1;
            }
        }
        assert!((320..=480).contains(&splits), "splits = {splits}");
    }

    #[test]
    fn test_green_green_contacts_activate_both() {
        let mut s = state(37);
        s.config.green_antigravity_threshold = 3;
        s.greens.clear();
        s.greens.push(GreenDot::new(Vec2::new(100.0, 100.0), Vec2::ZERO, GREEN_MASS));
        s.greens.push(GreenDot::new(Vec2::new(105.0, 100.0), Vec2::ZERO, GREEN_MASS));
        let contact = Contact {
            a: Slot::Green(0),
            b: Slot::Green(1),
        };
        s.process_contacts(&[contact, contact]);
        assert!(s.greens.iter().all(|g| !g.antigravity.is_active()));
        s.process_contacts(&[contact]);
        assert!(s.greens.iter().all(|g| g.antigravity.is_active()));
        assert!(s.greens.iter().all(|g| g.green_collisions == 0));
        assert!(!s.blue.antigravity.is_active());
        let events = s.drain_events();
        assert_eq!(events.iter().filter(|&&e| e == SimEvent::GreenGreenCollision).count(), 3);
        assert!(events.contains(&SimEvent::AntigravityActivated));
    }

    #[test]
    fn test_comet_drops_red_and_rearms() {
        let mut s = state(38);
        s.comets.clear();
        let position = Vec2::new(400.0, 300.0);
        let velocity = Vec2::new(20.0, 0.0);
        s.comets.push(Comet::new(position, velocity, 0.0));
        s.comets.push(Comet::new(Vec2::new(200.0, 200.0), velocity, 1000.0));
        let reds = s.reds.len();

        s.update_comets(0.1);

        assert_eq!(s.reds.len(), reds + 1);
        let dropped = s.reds[reds].body;
        assert!((dropped.position.distance(position) - COMET_SEED_OFFSET).abs() < 1e-3);
        assert!(dropped.velocity.distance(velocity) <= COMET_SEED_DRIFT + 1e-3);
        assert_eq!(s.comets[0].spawn.elapsed, 0.0);
        assert!(s.comets[1].spawn.elapsed > 0.0);
    }
}
