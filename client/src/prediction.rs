//! Local prediction: input-driven paddle velocity and correction smoothing

use crate::input::Key;
use game_core::Player;
use serde::Deserialize;

/// How a `position_correction` is applied to the local paddle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CorrectionPolicy {
    /// Overwrite `y` immediately
    #[default]
    HardSnap,
    /// Spread the offset evenly over the next `ticks` ticks
    Smooth { ticks: u32 },
}

/// Correction offset still to be applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingCorrection {
    remaining: f32,
    ticks_left: u32,
}

impl PendingCorrection {
    pub fn new(offset: f32, ticks: u32) -> Self {
        Self {
            remaining: offset,
            ticks_left: ticks.max(1),
        }
    }

    /// Offset to apply this tick. Returns `None` once the correction is complete.
    pub fn next_step(&mut self) -> Option<f32> {
        if self.ticks_left == 0 {
            return None;
        }
        let step = self.remaining / self.ticks_left as f32;
        self.remaining -= step;
        self.ticks_left -= 1;
        Some(step)
    }

    pub fn is_complete(&self) -> bool {
        self.ticks_left == 0
    }
}

/// Paddle velocity for a pressed key
pub fn velocity_for(key: Key, speed: f32) -> f32 {
    match key {
        Key::Up => -speed,
        Key::Down => speed,
    }
}

/// Apply a correction to the local paddle according to policy.
///
/// Returns the pending smoothing state, if any.
pub fn apply_correction(
    player: &mut Player,
    target_y: f32,
    policy: CorrectionPolicy,
) -> Option<PendingCorrection> {
    match policy {
        CorrectionPolicy::HardSnap => {
            player.y = target_y;
            None
        }
        CorrectionPolicy::Smooth { ticks } => {
            Some(PendingCorrection::new(target_y - player.y, ticks))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::Side;

    #[test]
    fn test_velocity_for_keys() {
        assert_eq!(velocity_for(Key::Up, 1.0), -1.0);
        assert_eq!(velocity_for(Key::Down, 2.5), 2.5);
    }

    #[test]
    fn test_hard_snap_is_idempotent() {
        let mut player = Player::new(Side::Left, 30.0);
        assert_eq!(
            apply_correction(&mut player, 5.0, CorrectionPolicy::HardSnap),
            None
        );
        let once = player;
        apply_correction(&mut player, 5.0, CorrectionPolicy::HardSnap);
        assert_eq!(player, once);
        assert_eq!(player.y, 5.0);
    }

    #[test]
    fn test_smooth_correction_spreads_offset() {
        let mut player = Player::new(Side::Left, 10.0);
        let policy = CorrectionPolicy::Smooth { ticks: 4 };
        let mut pending = apply_correction(&mut player, 14.0, policy)
            .expect("smooth policy defers the correction");
        assert_eq!(player.y, 10.0, "smooth policy does not snap");

        let mut total = 0.0;
        while let Some(step) = pending.next_step() {
            assert_eq!(step, 1.0);
            total += step;
        }
        assert_eq!(total, 4.0);
        assert!(pending.is_complete());
        assert_eq!(pending.next_step(), None);
    }
}
