pub mod config;
pub mod constants;
pub mod entities;
pub mod error;
pub mod events;
pub mod types;

pub use config::{SimConfig, SplitPolicy};
pub use constants::*;
pub use entities::*;
pub use error::{ConfigError, ConfigResult};
pub use events::{ResetReason, SimEvent};
pub use glam::Vec2;
pub use types::*;
