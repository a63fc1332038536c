use glam::Vec2;

use crate::constants::*;
use crate::types::{Body, EntityKind};

/// Elapsed time counted up against a randomly drawn threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayTimer {
    pub elapsed: f32,
    pub threshold: f32,
}

impl DecayTimer {
    pub fn new(threshold: f32) -> Self {
        Self {
            elapsed: 0.0,
            threshold: threshold.max(0.0),
        }
    }

    /// Advance by `dt`; true once the threshold has been reached
    pub fn tick(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        self.expired()
    }

    pub fn expired(&self) -> bool {
        self.elapsed >= self.threshold
    }

    /// Start over against a fresh threshold
    pub fn rearm(&mut self, threshold: f32) {
        *self = Self::new(threshold);
    }
}

/// Timed force reversal carried by the blue dot and the green stars
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Antigravity {
    pub remaining: f32,
    /// Time since the last windchime cue
    pub windchime_elapsed: f32,
}

/// What one antigravity tick produced
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AntigravityTick {
    pub chimes: u32,
    pub ended: bool,
}

impl Antigravity {
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn activate(&mut self) {
        self.remaining = ANTIGRAVITY_DURATION;
        self.windchime_elapsed = 0.0;
    }

    pub fn tick(&mut self, dt: f32) -> AntigravityTick {
        let mut out = AntigravityTick::default();
        if !self.is_active() {
            return out;
        }
        self.windchime_elapsed += dt;
        while self.windchime_elapsed >= WINDCHIME_INTERVAL {
            self.windchime_elapsed -= WINDCHIME_INTERVAL;
            out.chimes += 1;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.windchime_elapsed = 0.0;
            out.ended = true;
        }
        out
    }
}

/// Continuous time spent inside a cloud
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CloudDwell {
    pub time: f32,
    pub inside: bool,
}

/// Regular dots fade inside clouds; minis are exempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RedForm {
    Regular {
        /// 1.0 fully visible, 0.0 gone
        cloud_fade: f32,
        in_cloud: bool,
    },
    Mini,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RedDot {
    pub body: Body,
    pub form: RedForm,
    pub blue_collisions: u32,
    pub green_collisions: u32,
    pub decay: DecayTimer,
    pub fade_in: f32,
}

impl RedDot {
    pub fn regular(position: Vec2, velocity: Vec2, decay_threshold: f32) -> Self {
        Self {
            body: Body::new(position, velocity, RED_MASS, RED_RADIUS),
            form: RedForm::Regular {
                cloud_fade: 1.0,
                in_cloud: false,
            },
            blue_collisions: 0,
            green_collisions: 0,
            decay: DecayTimer::new(decay_threshold),
            fade_in: 0.0,
        }
    }

    pub fn mini(position: Vec2, velocity: Vec2, decay_threshold: f32) -> Self {
        Self {
            body: Body::new(position, velocity, MINI_RED_MASS, MINI_RED_RADIUS),
            form: RedForm::Mini,
            ..Self::regular(position, velocity, decay_threshold)
        }
    }

    pub fn is_mini(&self) -> bool {
        matches!(self.form, RedForm::Mini)
    }

    pub fn kind(&self) -> EntityKind {
        if self.is_mini() {
            EntityKind::MiniRedDot
        } else {
            EntityKind::RedDot
        }
    }

    /// Collisions that count toward splitting (red-red never does)
    pub fn split_collisions(&self) -> u32 {
        self.blue_collisions + self.green_collisions
    }

    pub fn collision_radius(&self) -> f32 {
        if self.is_mini() {
            MINI_RED_RADIUS
        } else {
            COLLISION_RADIUS
        }
    }

    /// Radioactive decay of a regular dot: halve in place, keep the motion
    pub fn downgrade_to_mini(&mut self, decay_threshold: f32) {
        let motion = (self.body.position, self.body.velocity);
        *self = Self {
            fade_in: self.fade_in,
            ..Self::mini(motion.0, motion.1, decay_threshold)
        };
    }

    pub fn cloud_fade(&self) -> f32 {
        match self.form {
            RedForm::Regular { cloud_fade, .. } => cloud_fade,
            RedForm::Mini => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreenDot {
    pub body: Body,
    pub blue_collisions: u32,
    pub green_collisions: u32,
    pub antigravity: Antigravity,
    pub dwell: CloudDwell,
    /// Remaining antigravity-text time, 0 when hidden
    pub antigravity_text: f32,
    pub fade_in: f32,
}

impl GreenDot {
    pub fn new(position: Vec2, velocity: Vec2, mass: f32) -> Self {
        Self {
            body: Body::new(position, velocity, mass, GREEN_RADIUS),
            blue_collisions: 0,
            green_collisions: 0,
            antigravity: Antigravity::default(),
            dwell: CloudDwell::default(),
            antigravity_text: 0.0,
            fade_in: 0.0,
        }
    }
}

/// The singleton blue planet; its collision counters live on the simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlueDot {
    pub body: Body,
    pub antigravity: Antigravity,
    pub dwell: CloudDwell,
    pub antigravity_text: f32,
    pub fade_in: f32,
}

impl BlueDot {
    pub fn new(position: Vec2) -> Self {
        Self {
            body: Body::new(position, Vec2::ZERO, BLUE_MASS, BLUE_RADIUS),
            antigravity: Antigravity::default(),
            dwell: CloudDwell::default(),
            antigravity_text: 0.0,
            fade_in: 0.0,
        }
    }

    /// Yellow-crescent teleport: take over its motion and fade in again
    pub fn teleport(&mut self, position: Vec2, velocity: Vec2) {
        self.body.position = position;
        self.body.velocity = velocity;
        self.fade_in = 0.0;
    }
}

/// One lobe of a cloud's outline, relative to the cloud center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Puff {
    pub offset: Vec2,
    pub radius: f32,
}

/// Stationary, weakly massive region that fades red dots and traps stars
#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    pub body: Body,
    pub decay: DecayTimer,
    pub puffs: Vec<Puff>,
    pub fade_in: f32,
}

impl Cloud {
    pub fn new(position: Vec2, radius: f32, decay_threshold: f32, puffs: Vec<Puff>) -> Self {
        Self {
            body: Body::new(position, Vec2::ZERO, CLOUD_BASE_MASS, radius),
            decay: DecayTimer::new(decay_threshold),
            puffs,
            fade_in: 0.0,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.body.position.distance(point) < self.body.radius
    }

    pub fn overlaps(&self, other: &Cloud) -> bool {
        self.body.distance_to(&other.body) < self.body.radius + other.body.radius
    }

    /// Dwell transformation: new outline and a heavier mass instead of vanishing
    pub fn reshape(&mut self, puffs: Vec<Puff>, mass: f32) {
        self.puffs = puffs;
        self.body.mass = mass.max(0.0);
    }
}

/// What a dissolving yellow crescent turns into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DissolveTarget {
    BlueDot,
    RedDot,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum YellowPhase {
    Decaying { elapsed: f32 },
    Dissolving { elapsed: f32, into: DissolveTarget },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YellowCrescent {
    pub body: Body,
    pub phase: YellowPhase,
    pub fade_in: f32,
}

impl YellowCrescent {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            body: Body::new(position, velocity, YELLOW_CRESCENT_MASS, YELLOW_CRESCENT_RADIUS),
            phase: YellowPhase::Decaying { elapsed: 0.0 },
            fade_in: 0.0,
        }
    }

    /// Dissolve progress in [0, 1], -1 while still decaying
    pub fn dissolve_progress(&self) -> f32 {
        match self.phase {
            YellowPhase::Decaying { .. } => -1.0,
            YellowPhase::Dissolving { elapsed, .. } => (elapsed / YELLOW_DISSOLVE_TIME).clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrangePhase {
    Decaying(DecayTimer),
    FadingOut { remaining: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrangeCrescent {
    pub body: Body,
    pub phase: OrangePhase,
    pub fade_in: f32,
}

impl OrangeCrescent {
    pub fn new(position: Vec2, velocity: Vec2, decay_threshold: f32) -> Self {
        Self {
            body: Body::new(position, velocity, ORANGE_CRESCENT_MASS, ORANGE_CRESCENT_RADIUS),
            phase: OrangePhase::Decaying(DecayTimer::new(decay_threshold)),
            fade_in: 0.0,
        }
    }

    /// Fade-out progress in [0, 1], -1 while still decaying
    pub fn fade_progress(&self) -> f32 {
        match self.phase {
            OrangePhase::Decaying(_) => -1.0,
            OrangePhase::FadingOut { remaining } => (1.0 - remaining / ORANGE_FADE_TIME).clamp(0.0, 1.0),
        }
    }
}

/// Massless visitor that seeds red dots along its path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comet {
    pub body: Body,
    /// Time since the last seeded red dot
    pub spawn: DecayTimer,
    pub fade_in: f32,
}

impl Comet {
    pub fn new(position: Vec2, velocity: Vec2, spawn_threshold: f32) -> Self {
        Self {
            body: Body::new(position, velocity, 0.0, COMET_RADIUS),
            spawn: DecayTimer::new(spawn_threshold),
            fade_in: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Earth {
    pub body: Body,
    pub fade_in: f32,
}

impl Earth {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            body: Body::new(position, velocity, EARTH_MASS, EARTH_RADIUS),
            fade_in: 0.0,
        }
    }
}

/// Kinds an expiring mini may become
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformTarget {
    RedDot,
    GreenDot,
    YellowCrescent,
    OrangeCrescent,
    Cloud,
}

impl TransformTarget {
    pub const ALL: [TransformTarget; 5] = [
        Self::RedDot,
        Self::GreenDot,
        Self::YellowCrescent,
        Self::OrangeCrescent,
        Self::Cloud,
    ];
}

/// Opacity contribution of a fade-in age
pub fn fade_in_opacity(age: f32) -> f32 {
    (age / FADE_IN_TIME).clamp(0.0, 1.0)
}
