pub mod collision;
pub mod forces;
pub mod motion;
pub mod sampling;
pub mod spawn;

pub use collision::{check_collision, enforce_separation_speed};
pub use forces::{AntigravityFlags, accelerate_toward, apply_gravitational_force};
pub use motion::*;
pub use sampling::{sample_count, sample_exponential, sample_half_life};
