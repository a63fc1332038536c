use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::MARGIN;

/// Kinematic state shared by every entity kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Mass 0 never exerts gravity but can still be pulled
    pub mass: f32,
    /// Visual radius
    pub radius: f32,
}

impl Body {
    pub fn new(position: Vec2, velocity: Vec2, mass: f32, radius: f32) -> Self {
        Self {
            position,
            velocity,
            mass: mass.max(0.0),
            radius: radius.max(0.0),
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn distance_to(&self, other: &Body) -> f32 {
        self.position.distance(other.position)
    }
}

/// The bounding rectangle bodies live in
///
/// Owned by the layout side; the simulation only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayField {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl Default for PlayField {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1280.0, 720.0)
    }
}

impl PlayField {
    /// Degenerate sizes are widened so the margin-adjusted box is never empty
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        let floor = 2.0 * MARGIN + 1.0;
        Self {
            x,
            y,
            width: width.max(floor),
            height: height.max(floor),
            margin: MARGIN,
        }
    }

    pub fn min_x(&self) -> f32 {
        self.x + self.margin
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.width - self.margin
    }

    pub fn min_y(&self) -> f32 {
        self.y + self.margin
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height - self.margin
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Inside the margin-adjusted box (inclusive)
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min_x() && p.x <= self.max_x() && p.y >= self.min_y() && p.y <= self.max_y()
    }

    /// Inside the raw rectangle, ignoring the margin
    pub fn contains_outer(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.min_x(), self.max_x()),
            p.y.clamp(self.min_y(), self.max_y()),
        )
    }
}

/// Entity kinds as seen by the renderer and the sound layer
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    RedDot = 0,
    MiniRedDot = 1,
    GreenDot = 2,
    BlueDot = 3,
    Cloud = 4,
    YellowCrescent = 5,
    OrangeCrescent = 6,
    Comet = 7,
    Earth = 8,
}

impl EntityKind {
    pub fn from_u32(value: u32) -> Option<Self> {
        Some(match value {
            0 => Self::RedDot,
            1 => Self::MiniRedDot,
            2 => Self::GreenDot,
            3 => Self::BlueDot,
            4 => Self::Cloud,
            5 => Self::YellowCrescent,
            6 => Self::OrangeCrescent,
            7 => Self::Comet,
            8 => Self::Earth,
            _ => return None,
        })
    }

    /// Display color [r, g, b, a]
    pub fn color(&self) -> [f32; 4] {
        match self {
            Self::RedDot | Self::MiniRedDot => [0.9, 0.15, 0.15, 1.0],
            Self::GreenDot => [0.2, 0.85, 0.3, 1.0],
            Self::BlueDot => [0.2, 0.4, 1.0, 1.0],
            Self::Cloud => [0.6, 0.6, 0.65, 0.35],
            Self::YellowCrescent => [1.0, 0.85, 0.1, 1.0],
            Self::OrangeCrescent => [1.0, 0.55, 0.1, 1.0],
            Self::Comet => [0.9, 0.95, 1.0, 1.0],
            Self::Earth => [0.25, 0.6, 0.9, 1.0],
        }
    }
}

/// Bit 0 of [`RenderInstance::flags`]
pub const FLAG_ANTIGRAVITY: u32 = 1;
/// Bit 1: dissolving crescent will become the blue dot
pub const FLAG_TRANSFORM_BLUE: u32 = 1 << 1;
/// Bit 2: antigravity text is on screen for this body
pub const FLAG_ANTIGRAVITY_TEXT: u32 = 1 << 2;

/// Read-only, upload-ready view of one live entity
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct RenderInstance {
    /// [`EntityKind`] discriminant
    pub kind: u32,
    pub flags: u32,
    pub position: [f32; 2],
    pub radius: f32,
    /// Combined fade-in and fade-out opacity in [0, 1]
    pub opacity: f32,
    /// Seconds of antigravity left, 0 when inactive
    pub antigravity_remaining: f32,
    /// Dissolve or fade-out progress in [0, 1], -1 when not in such a phase
    pub progress: f32,
}

impl RenderInstance {
    pub fn new(kind: EntityKind, position: Vec2, radius: f32) -> Self {
        Self {
            kind: kind as u32,
            flags: 0,
            position: position.to_array(),
            radius,
            opacity: 1.0,
            antigravity_remaining: 0.0,
            progress: -1.0,
        }
    }

    pub fn kind(&self) -> Option<EntityKind> {
        EntityKind::from_u32(self.kind)
    }

    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playfield_bounds() {
        let field = PlayField::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(field.min_x(), 18.0);
        assert_eq!(field.max_x(), 102.0);
        assert_eq!(field.min_y(), 28.0);
        assert_eq!(field.max_y(), 62.0);
        assert!(field.contains(Vec2::new(50.0, 40.0)));
        assert!(!field.contains(Vec2::new(12.0, 40.0)));
        assert!(field.contains_outer(Vec2::new(12.0, 40.0)));
    }

    #[test]
    fn test_degenerate_playfield_widened() {
        let field = PlayField::new(0.0, 0.0, 0.0, -5.0);
        assert!(field.max_x() > field.min_x());
        assert!(field.max_y() > field.min_y());
    }

    #[test]
    fn test_kind_roundtrip() {
        for raw in 0..9 {
            let kind = EntityKind::from_u32(raw).unwrap();
            assert_eq!(kind as u32, raw);
        }
        assert!(EntityKind::from_u32(42).is_none());
    }

    #[test]
    fn test_render_instance_is_pod() {
        let inst = RenderInstance::new(EntityKind::Comet, Vec2::new(1.0, 2.0), 6.0);
        let bytes: &[u8] = bytemuck::bytes_of(&inst);
        assert_eq!(bytes.len(), std::mem::size_of::<RenderInstance>());
        assert_eq!(inst.kind(), Some(EntityKind::Comet));
        assert_eq!(inst.progress, -1.0);
    }
}
