// Simulation units are arbitrary screen units:
// - Distance: 1 unit = 1 canvas pixel
// - Time: 1 unit = 1 second of wall-clock time
// - Mass: 1 unit = one regular red dot

/// Default gravitational constant (px^3 / (mass * s^2))
pub const INITIAL_G: f32 = 100.0;

/// Constant downward pull applied during integration (disabled by default)
pub const DOWNWARD_GRAVITY: f32 = 0.0;

/// Base visual radius; most kinds are sized relative to it
pub const DOT_RADIUS: f32 = 8.0;

/// Distance kept between bodies and the play-field edge
pub const MARGIN: f32 = 8.0;

/// Fixed collision radius shared by most kinds regardless of visual size
pub const COLLISION_RADIUS: f32 = 3.0;

// Masses
pub const RED_MASS: f32 = 1.0;
pub const MINI_RED_MASS: f32 = RED_MASS * 0.5;
pub const BLUE_MASS: f32 = 40.0;
pub const GREEN_MASS: f32 = 80.0;
pub const YELLOW_CRESCENT_MASS: f32 = 2.0;
pub const ORANGE_CRESCENT_MASS: f32 = 15.0;
pub const EARTH_MASS: f32 = RED_MASS * 50.0;
pub const CLOUD_BASE_MASS: f32 = RED_MASS * 0.1;

// Radii
pub const RED_RADIUS: f32 = DOT_RADIUS / 2.0;
pub const MINI_RED_RADIUS: f32 = DOT_RADIUS / 4.0;
pub const BLUE_RADIUS: f32 = DOT_RADIUS;
pub const GREEN_RADIUS: f32 = DOT_RADIUS * 2.0;
pub const YELLOW_CRESCENT_RADIUS: f32 = DOT_RADIUS * 1.5;
pub const ORANGE_CRESCENT_RADIUS: f32 = DOT_RADIUS;
pub const EARTH_RADIUS: f32 = DOT_RADIUS;
pub const COMET_RADIUS: f32 = DOT_RADIUS * 0.75;
pub const CLOUD_MIN_RADIUS: f32 = DOT_RADIUS * 4.0;
pub const CLOUD_MAX_RADIUS: f32 = DOT_RADIUS * 20.0;

/// Largest step the integrator is allowed to take (seconds)
pub const MAX_DELTA_TIME: f32 = 0.1;

/// Substituted on the very first frame, when no previous timestamp exists
pub const FIRST_FRAME_DELTA: f32 = 0.016;

/// Gravity is skipped entirely below this separation
pub const MIN_GRAVITY_DISTANCE: f32 = 1.0;

// Velocity shaping
pub const SLOWDOWN_FLOOR: f32 = 30.0;
pub const SLOWDOWN_RATE: f32 = 0.1;
pub const FAST_SPEED: f32 = 200.0;
pub const FAST_REDUCTION: f32 = 0.8;
pub const FAST_FLOOR: f32 = 50.0;
pub const VISCOSITY_RATE: f32 = 0.005;
pub const SPEED_CAP: f32 = 300.0;
pub const EARTH_SEPARATION_SPEED: f32 = 5.0;

/// Restitution-like impulse multiplier; 2.0 is an exact elastic exchange
pub const RESTITUTION: f32 = 1.5;

// Red dot splitting
pub const DETERMINISTIC_SPLIT_THRESHOLD: u32 = 50;
pub const PROBABILISTIC_SPLIT_THRESHOLD: u32 = 20;
pub const PROBABILISTIC_SPLIT_CHANCE: f64 = 0.2;

// Mini-red contact outcomes (one weighted draw)
pub const MINI_ORANGE_CHANCE: f64 = 0.0125;
pub const MINI_MERGE_CHANCE: f64 = 0.05;

/// Chance that an expiring mini-red transforms instead of dissolving
pub const MINI_TRANSFORM_CHANCE: f64 = 0.01;

/// Mean of the exponential red-dot decay timer (seconds)
pub const RED_DECAY_MEAN: f32 = 10.0;

/// Rate at which a regular red dot fades while inside a cloud (per second)
pub const CLOUD_FADE_RATE: f32 = 0.25;

// Antigravity
pub const ANTIGRAVITY_DURATION: f32 = 3.0;
pub const ANTIGRAVITY_MIN_SPEED: f32 = 50.0;
pub const WINDCHIME_INTERVAL: f32 = 0.4;
pub const ANTIGRAVITY_TEXT_DURATION: f32 = 1.5;
pub const BLUE_ANTIGRAVITY_THRESHOLD: u32 = 75;
pub const GREEN_ANTIGRAVITY_THRESHOLD: u32 = 150;

// Clouds
pub const CLOUD_SPAWN_COLLISIONS: u32 = 10;
pub const MAX_CLOUDS: usize = 2;
pub const CLOUD_HALF_LIFE: f32 = 30.0;
pub const CLOUD_DWELL_TRIGGER: f32 = 10.0;
pub const CLOUD_DWELL_MIN_SPEED: f32 = 20.0;
pub const CLOUD_DWELL_DOUBLE_CHANCE: f64 = 0.1;
pub const CLOUD_ACTIVE_MASS_MIN: f32 = 0.5;
pub const CLOUD_ACTIVE_MASS_MAX: f32 = 2.0;

// Crescents
pub const YELLOW_DECAY_TIME: f32 = 10.0;
pub const YELLOW_DISSOLVE_TIME: f32 = 0.5;
pub const YELLOW_TO_BLUE_CHANCE: f64 = 0.1;
pub const ORANGE_HALF_LIFE: f32 = 5.0;
pub const ORANGE_FADE_TIME: f32 = 1.0;

// Comets
pub const COMET_SPEED: f32 = 20.0;
pub const COMET_SPAWN_MEAN: f32 = 10.0;
pub const COMET_SEED_OFFSET: f32 = DOT_RADIUS * 1.5;
pub const COMET_SEED_DRIFT: f32 = 5.0;

// Spontaneous spawning
pub const SPONTANEOUS_CLOUD_MEAN: f32 = 20.0;
pub const SPONTANEOUS_COMET_MEAN: f32 = 24.0;

/// Red-dot population that forces a full reset
pub const RED_DOT_CEILING: usize = 1000;

/// Length of the fade-in shown for every new entity (seconds)
pub const FADE_IN_TIME: f32 = 1.0;

/// Highest audio volume step; 0 mutes
pub const MAX_AUDIO_VOLUME: u32 = 10;
