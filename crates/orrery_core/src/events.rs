use serde::{Deserialize, Serialize};

/// Named cue emitted by the simulation for the sound layer
///
/// The simulation never plays anything itself; consumers decide what each
/// cue sounds like, including nothing when muted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimEvent {
    RedRedCollision,
    RedBlueCollision,
    RedGreenCollision,
    BlueGreenCollision,
    GreenGreenCollision,
    EarthCollision,
    CrescentCollision,
    WallLeftRight,
    WallTopBottom,
    MiniRedsCreated,
    RedDotsMerged,
    RedDotFaded,
    CloudSpawned,
    CloudVanished,
    CloudReshaped,
    AntigravityActivated,
    AntigravityTextShown,
    Windchime,
    YellowCrescentDissolved,
    OrangeCrescentFaded,
    Transformation,
    CometSpawned,
    Reset,
}

impl SimEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RedRedCollision => "red-red collision",
            Self::RedBlueCollision => "red-blue collision",
            Self::RedGreenCollision => "red-green collision",
            Self::BlueGreenCollision => "blue-green collision",
            Self::GreenGreenCollision => "green-green collision",
            Self::EarthCollision => "earth collision",
            Self::CrescentCollision => "crescent collision",
            Self::WallLeftRight => "wall hit: left/right",
            Self::WallTopBottom => "wall hit: top/bottom",
            Self::MiniRedsCreated => "mini reds created",
            Self::RedDotsMerged => "red dots merged",
            Self::RedDotFaded => "red dot faded",
            Self::CloudSpawned => "cloud spawned",
            Self::CloudVanished => "cloud vanished",
            Self::CloudReshaped => "cloud reshaped",
            Self::AntigravityActivated => "antigravity activated",
            Self::AntigravityTextShown => "antigravity text shown",
            Self::Windchime => "windchime",
            Self::YellowCrescentDissolved => "yellow crescent dissolved",
            Self::OrangeCrescentFaded => "orange crescent faded",
            Self::Transformation => "transformation",
            Self::CometSpawned => "comet spawned",
            Self::Reset => "reset",
        }
    }

    pub fn is_collision(&self) -> bool {
        matches!(
            self,
            Self::RedRedCollision
                | Self::RedBlueCollision
                | Self::RedGreenCollision
                | Self::BlueGreenCollision
                | Self::GreenGreenCollision
                | Self::EarthCollision
                | Self::CrescentCollision
        )
    }
}

/// Why the whole population was redrawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResetReason {
    Startup,
    UserRequest,
    PopulationCeiling,
}
