use bevy::prelude::Resource;
use orrery_core::constants::{FIRST_FRAME_DELTA, MAX_DELTA_TIME};

/// Turns wall-clock timestamps into a bounded simulation delta
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous call, clamped to `[0, MAX_DELTA_TIME]`
    ///
    /// The first call has no previous timestamp and returns a nominal 1/60 s.
    pub fn advance(&mut self, now: f64) -> f32 {
        let dt = match self.last {
            None => FIRST_FRAME_DELTA,
            Some(last) => ((now - last) as f32).clamp(0.0, MAX_DELTA_TIME),
        };
        self.last = Some(now);
        dt
    }

    /// Forget the previous timestamp, e.g. after a pause
    pub fn restart(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_nominal() {
        let mut clock = FrameClock::new();
        assert!((clock.advance(123.0) - FIRST_FRAME_DELTA).abs() < 1e-6);
    }

    #[test]
    fn test_delta_between_calls() {
        let mut clock = FrameClock::new();
        clock.advance(1.0);
        assert!((clock.advance(1.05) - 0.05).abs() < 1e-5);
    }

    #[test]
    fn test_delta_clamped() {
        let mut clock = FrameClock::new();
        clock.advance(1.0);
        // tab resumed after a long background
        assert!((clock.advance(31.0) - MAX_DELTA_TIME).abs() < 1e-6);
        // clock went backwards
        assert_eq!(clock.advance(30.0), 0.0);
    }

    #[test]
    fn test_restart_returns_nominal() {
        let mut clock = FrameClock::new();
        clock.advance(1.0);
        clock.restart();
        assert!((clock.advance(9.0) - FIRST_FRAME_DELTA).abs() < 1e-6);
    }
}
