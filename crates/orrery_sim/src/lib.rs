pub mod clock;
pub mod frame;
pub mod lifecycle;
pub mod pairs;
pub mod pipeline;
pub mod state;

pub use clock::FrameClock;
pub use lifecycle::Contact;
pub use pairs::{Slot, unordered_pairs};
pub use pipeline::{ResetRequested, SimulationPlugin, SoundCue};
pub use state::{PopulationCounts, SimulationState};
