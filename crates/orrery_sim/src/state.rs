use bevy::prelude::{Resource, info};
use orrery_core::*;
use orrery_physics::spawn::{self, EARTH_ORBIT, GREEN_ORBIT, OrbitSource, RED_ORBIT};
use orrery_physics::{sample_count, sample_exponential, sample_half_life};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The whole simulated system, tracked as a Bevy Resource
///
/// Every entity collection, global counter and the random source live here and
/// are only touched from [`SimulationState::step`] and [`SimulationState::reset`].
#[derive(Resource)]
pub struct SimulationState {
    pub config: SimConfig,
    pub field: PlayField,
    pub blue: BlueDot,
    pub earth: Option<Earth>,
    pub reds: Vec<RedDot>,
    pub greens: Vec<GreenDot>,
    pub clouds: Vec<Cloud>,
    pub yellows: Vec<YellowCrescent>,
    pub oranges: Vec<OrangeCrescent>,
    pub comets: Vec<Comet>,
    /// Blue-green collisions since the last spawned cloud
    pub blue_green_collisions: u32,
    /// Blue-green collisions since the blue dot last went antigravity
    pub blue_green_antigravity: u32,
    /// First antigravity activation of a run shows text; later ones don't
    pub antigravity_text_shown: bool,
    pub spontaneous_cloud: DecayTimer,
    pub spontaneous_comet: DecayTimer,
    pub reset_count: u32,
    /// Frames stepped since the last reset
    pub frame: u64,
    /// Simulated seconds since the last reset
    pub elapsed: f64,
    /// Whether stepping is suspended
    pub paused: bool,
    pub(crate) events: Vec<SimEvent>,
    pub(crate) rng: ChaCha8Rng,
}

/// Live entity counts per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PopulationCounts {
    pub red: usize,
    pub mini_red: usize,
    pub green: usize,
    pub clouds: usize,
    pub yellow: usize,
    pub orange: usize,
    pub comets: usize,
    pub earth: usize,
}

impl PopulationCounts {
    pub fn total(&self) -> usize {
        // the blue dot always exists
        1 + self.red + self.mini_red + self.green + self.clouds + self.yellow + self.orange + self.comets + self.earth
    }
}

impl SimulationState {
    pub fn new(config: SimConfig, field: PlayField) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random::<u64>);
        let mut state = Self {
            config,
            field,
            blue: BlueDot::new(field.center()),
            earth: None,
            reds: Vec::new(),
            greens: Vec::new(),
            clouds: Vec::new(),
            yellows: Vec::new(),
            oranges: Vec::new(),
            comets: Vec::new(),
            blue_green_collisions: 0,
            blue_green_antigravity: 0,
            antigravity_text_shown: false,
            spontaneous_cloud: DecayTimer::new(0.0),
            spontaneous_comet: DecayTimer::new(0.0),
            reset_count: 0,
            frame: 0,
            elapsed: 0.0,
            paused: false,
            events: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        state.reset(ResetReason::Startup);
        state
    }

    /// Clear everything and draw a fresh initial population
    ///
    /// Safe to call at any frame boundary, any number of times.
    pub fn reset(&mut self, reason: ResetReason) {
        self.reds.clear();
        self.greens.clear();
        self.clouds.clear();
        self.yellows.clear();
        self.oranges.clear();
        self.comets.clear();
        self.earth = None;
        self.events.clear();

        self.blue_green_collisions = 0;
        self.blue_green_antigravity = 0;
        self.antigravity_text_shown = false;
        self.frame = 0;
        self.elapsed = 0.0;

        // Blue first so every other body can be seeded around it
        let blue_pos = spawn::random_point_in(&self.field, &mut self.rng);
        self.blue = BlueDot::new(blue_pos);

        let earth_pos = spawn::random_point_in(&self.field, &mut self.rng);
        let earth_vel = spawn::orbital_seed_velocity(earth_pos, &self.orbit_sources(0.5, 0.5), EARTH_ORBIT, &self.field);
        self.earth = Some(Earth::new(earth_pos, earth_vel));

        let greens = if self.rng.gen_bool(0.1) { self.rng.gen_range(2..=3) } else { 1 };
        for _ in 0..greens {
            self.spawn_green_random();
        }

        let reds = sample_count(self.config.initial_red_dots, &mut self.rng);
        for _ in 0..reds {
            self.spawn_red_random();
        }

        self.spawn_cloud_random();

        let cloud_threshold = sample_exponential(self.config.spontaneous_cloud_mean, &mut self.rng);
        self.spontaneous_cloud.rearm(cloud_threshold);
        let comet_threshold = sample_exponential(self.config.spontaneous_comet_mean, &mut self.rng);
        self.spontaneous_comet.rearm(comet_threshold);

        self.reset_count += 1;
        self.events.push(SimEvent::Reset);
        info!(
            "Simulation reset ({:?}, #{}): {} red, {} green, {} cloud",
            reason,
            self.reset_count,
            self.reds.len(),
            self.greens.len(),
            self.clouds.len()
        );
    }

    /// Apply new play-field geometry; bodies outside it are pulled back in
    pub fn set_play_field(&mut self, field: PlayField) {
        self.field = field;
        let clamp = |body: &mut Body| body.position = field.clamp(body.position);
        clamp(&mut self.blue.body);
        if let Some(earth) = self.earth.as_mut() {
            clamp(&mut earth.body);
        }
        self.reds.iter_mut().for_each(|r| clamp(&mut r.body));
        self.greens.iter_mut().for_each(|g| clamp(&mut g.body));
        self.clouds.iter_mut().for_each(|c| clamp(&mut c.body));
        self.yellows.iter_mut().for_each(|y| clamp(&mut y.body));
        self.oranges.iter_mut().for_each(|o| clamp(&mut o.body));
        self.comets.retain(|c| field.contains_outer(c.body.position));
    }

    /// Hand the cues emitted since the last drain to the caller
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn counts(&self) -> PopulationCounts {
        let mini_red = self.reds.iter().filter(|r| r.is_mini()).count();
        PopulationCounts {
            red: self.reds.len() - mini_red,
            mini_red,
            green: self.greens.len(),
            clouds: self.clouds.len(),
            yellow: self.yellows.len(),
            orange: self.oranges.len(),
            comets: self.comets.len(),
            earth: usize::from(self.earth.is_some()),
        }
    }

    /// Total mass of every gravitating body
    pub fn total_mass(&self) -> f32 {
        self.blue.body.mass
            + self.earth.map_or(0.0, |e| e.body.mass)
            + self.reds.iter().map(|r| r.body.mass).sum::<f32>()
            + self.greens.iter().map(|g| g.body.mass).sum::<f32>()
            + self.clouds.iter().map(|c| c.body.mass).sum::<f32>()
            + self.yellows.iter().map(|y| y.body.mass).sum::<f32>()
            + self.oranges.iter().map(|o| o.body.mass).sum::<f32>()
    }

    /// Read-only view of every live entity for the renderer
    pub fn snapshot(&self) -> Vec<RenderInstance> {
        let mut out = Vec::with_capacity(self.counts().total());

        let star = |kind, body: &Body, antigravity: &Antigravity, text: f32, fade_in: f32| {
            let mut inst = RenderInstance::new(kind, body.position, body.radius);
            inst.opacity = fade_in_opacity(fade_in);
            if antigravity.is_active() {
                inst.flags |= FLAG_ANTIGRAVITY;
                inst.antigravity_remaining = antigravity.remaining;
            }
            if text > 0.0 {
                inst.flags |= FLAG_ANTIGRAVITY_TEXT;
            }
            inst
        };

        out.push(star(
            EntityKind::BlueDot,
            &self.blue.body,
            &self.blue.antigravity,
            self.blue.antigravity_text,
            self.blue.fade_in,
        ));
        if let Some(earth) = &self.earth {
            let mut inst = RenderInstance::new(EntityKind::Earth, earth.body.position, earth.body.radius);
            inst.opacity = fade_in_opacity(earth.fade_in);
            out.push(inst);
        }
        for red in &self.reds {
            let mut inst = RenderInstance::new(red.kind(), red.body.position, red.body.radius);
            inst.opacity = fade_in_opacity(red.fade_in) * red.cloud_fade();
            out.push(inst);
        }
        for green in &self.greens {
            out.push(star(
                EntityKind::GreenDot,
                &green.body,
                &green.antigravity,
                green.antigravity_text,
                green.fade_in,
            ));
        }
        for cloud in &self.clouds {
            let mut inst = RenderInstance::new(EntityKind::Cloud, cloud.body.position, cloud.body.radius);
            inst.opacity = fade_in_opacity(cloud.fade_in);
            out.push(inst);
        }
        for yellow in &self.yellows {
            let mut inst = RenderInstance::new(EntityKind::YellowCrescent, yellow.body.position, yellow.body.radius);
            let progress = yellow.dissolve_progress();
            inst.progress = progress;
            inst.opacity = fade_in_opacity(yellow.fade_in) * (1.0 - progress.max(0.0));
            if let YellowPhase::Dissolving { into: DissolveTarget::BlueDot, .. } = yellow.phase {
                inst.flags |= FLAG_TRANSFORM_BLUE;
            }
            out.push(inst);
        }
        for orange in &self.oranges {
            let mut inst = RenderInstance::new(EntityKind::OrangeCrescent, orange.body.position, orange.body.radius);
            let progress = orange.fade_progress();
            inst.progress = progress;
            inst.opacity = fade_in_opacity(orange.fade_in) * (1.0 - progress.max(0.0));
            out.push(inst);
        }
        for comet in &self.comets {
            let mut inst = RenderInstance::new(EntityKind::Comet, comet.body.position, comet.body.radius);
            inst.opacity = fade_in_opacity(comet.fade_in);
            out.push(inst);
        }
        out
    }

    pub(crate) fn emit(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Massive bodies new arrivals are seeded to orbit (blue always weighs 1.0)
    fn orbit_sources(&self, earth_weight: f32, green_weight: f32) -> Vec<OrbitSource> {
        let mut sources = vec![OrbitSource {
            position: self.blue.body.position,
            weight: 1.0,
        }];
        if let Some(earth) = &self.earth {
            sources.push(OrbitSource {
                position: earth.body.position,
                weight: earth_weight,
            });
        }
        sources.extend(self.greens.iter().map(|g| OrbitSource {
            position: g.body.position,
            weight: green_weight,
        }));
        sources
    }

    pub(crate) fn red_threshold(&mut self) -> f32 {
        sample_exponential(self.config.red_decay_mean, &mut self.rng)
    }

    pub(crate) fn spawn_red(&mut self, position: Vec2, velocity: Vec2) {
        let threshold = self.red_threshold();
        self.reds.push(RedDot::regular(position, velocity, threshold));
    }

    pub(crate) fn spawn_red_random(&mut self) {
        let position = spawn::random_point_in(&self.field, &mut self.rng);
        let velocity = spawn::orbital_seed_velocity(position, &self.orbit_sources(0.5, 0.5), RED_ORBIT, &self.field);
        self.spawn_red(position, velocity);
    }

    pub(crate) fn spawn_green(&mut self, position: Vec2, velocity: Vec2) {
        self.greens.push(GreenDot::new(position, velocity, self.config.green_mass));
    }

    pub(crate) fn spawn_green_random(&mut self) {
        let position = spawn::random_point_in(&self.field, &mut self.rng);
        let velocity = spawn::orbital_seed_velocity(position, &self.orbit_sources(0.5, 0.3), GREEN_ORBIT, &self.field);
        self.spawn_green(position, velocity);
    }

    pub(crate) fn spawn_cloud_at(&mut self, position: Vec2) {
        let radius = spawn::cloud_radius(&mut self.rng);
        let puffs = spawn::cloud_puffs(radius, &mut self.rng);
        let threshold = sample_half_life(self.config.cloud_half_life, &mut self.rng);
        self.clouds.push(Cloud::new(position, radius, threshold, puffs));
    }

    pub(crate) fn spawn_cloud_random(&mut self) {
        let position = spawn::random_point_in(&self.field, &mut self.rng);
        self.spawn_cloud_at(position);
    }

    pub(crate) fn spawn_orange(&mut self, position: Vec2, velocity: Vec2) {
        let threshold = sample_half_life(self.config.orange_half_life, &mut self.rng);
        self.oranges.push(OrangeCrescent::new(position, velocity, threshold));
    }

    pub(crate) fn spawn_yellow(&mut self, position: Vec2, velocity: Vec2) {
        self.yellows.push(YellowCrescent::new(position, velocity));
    }

    pub(crate) fn spawn_comet(&mut self) {
        let edge = self.rng.gen_range(0..4u8);
        let (position, velocity) = spawn::comet_edge_spawn(edge, &self.field, &mut self.rng);
        let threshold = sample_exponential(self.config.comet_spawn_mean, &mut self.rng);
        self.comets.push(Comet::new(position, velocity, threshold));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> SimulationState {
        let config = SimConfig {
            seed: Some(seed),
            ..SimConfig::default()
        };
        SimulationState::new(config, PlayField::new(0.0, 0.0, 800.0, 600.0))
    }

    #[test]
    fn test_initial_population() {
        for seed in 0..20 {
            let state = seeded(seed);
            let counts = state.counts();
            assert!((2..=8).contains(&counts.red), "seed {seed}: {counts:?}");
            assert_eq!(counts.mini_red, 0);
            assert!((1..=3).contains(&counts.green));
            assert_eq!(counts.clouds, 1);
            assert_eq!(counts.earth, 1);
            assert_eq!(state.blue.body.velocity, Vec2::ZERO);
            assert_eq!(state.reset_count, 1);
            assert!(state.field.contains(state.blue.body.position));
        }
    }

    #[test]
    fn test_same_seed_same_population() {
        let a = seeded(99);
        let b = seeded(99);
        assert_eq!(a.reds, b.reds);
        assert_eq!(a.greens, b.greens);
        assert_eq!(a.blue, b.blue);
    }

    #[test]
    fn test_snapshot_covers_every_entity() {
        let mut state = seeded(4);
        state.spawn_comet();
        state.spawn_orange(Vec2::new(100.0, 100.0), Vec2::ZERO);
        state.spawn_yellow(Vec2::new(200.0, 100.0), Vec2::ZERO);
        let snapshot = state.snapshot();
        assert_eq!(snapshot.len(), state.counts().total());
        assert_eq!(snapshot[0].kind(), Some(EntityKind::BlueDot));
        assert!(snapshot.iter().all(|inst| inst.kind().is_some()));
        assert!(snapshot.iter().all(|inst| (0.0..=1.0).contains(&inst.opacity)));
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut state = seeded(1);
        assert_eq!(state.drain_events(), vec![SimEvent::Reset]);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_resize_pulls_bodies_inside() {
        let mut state = seeded(12);
        let small = PlayField::new(0.0, 0.0, 100.0, 80.0);
        state.set_play_field(small);
        assert!(small.contains(state.blue.body.position));
        assert!(state.reds.iter().all(|r| small.contains(r.body.position)));
        assert!(state.greens.iter().all(|g| small.contains(g.body.position)));
    }
}
