use crate::{Ball, Config, Player};
use glam::Vec2;

/// Outcome of a ball striking a paddle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BounceEvent {
    /// New ball velocity
    pub vel: Vec2,
    /// Ball position pushed clear of the paddle face
    pub pos: Vec2,
}

impl BounceEvent {
    pub fn apply(&self, ball: &mut Ball) {
        ball.pos = self.pos;
        ball.vel = self.vel;
    }
}

/// Test the ball against one paddle.
///
/// Returns `None` unless the ball's box overlaps the paddle's box. On overlap the
/// horizontal velocity is pointed away from the paddle (a sign flip when the ball
/// was approaching) and the ball is moved to the paddle face so it cannot tunnel
/// through on the next tick.
pub fn test_intersection(ball: &Ball, player: &Player, config: &Config) -> Option<BounceEvent> {
    let side = player.side();
    let paddle_x = config.paddle_x(side);
    let paddle_half_width = config.paddle_width / 2.0;
    let radius = config.ball_radius;

    let overlaps_x = (ball.pos.x - paddle_x).abs() < paddle_half_width + radius;
    let overlaps_y =
        ball.pos.y + radius > player.y && ball.pos.y - radius < player.y + config.paddle_height;
    if !overlaps_x || !overlaps_y {
        return None;
    }

    let outward = side.outward();
    let mut vel = Vec2::new(ball.vel.x.abs() * outward, ball.vel.y);

    if config.max_deflection > 0.0 {
        // Relative hit position from -1 (top edge) to 1 (bottom edge)
        let half_height = config.paddle_height / 2.0;
        let hit = ((ball.pos.y - (player.y + half_height)) / half_height).clamp(-1.0, 1.0);
        vel.y = hit * config.max_deflection;
    }

    let pos = Vec2::new(
        paddle_x + outward * (paddle_half_width + radius),
        ball.pos.y,
    );

    Some(BounceEvent { vel, pos })
}

/// Reflect the ball off the top and bottom walls
pub fn bounce_off_walls(ball: &mut Ball, config: &Config) -> bool {
    let radius = config.ball_radius;
    if ball.pos.y - radius < 0.0 {
        ball.pos.y = radius;
        ball.vel.y = ball.vel.y.abs();
        true
    } else if ball.pos.y + radius > config.arena_height {
        ball.pos.y = config.arena_height - radius;
        ball.vel.y = -ball.vel.y.abs();
        true
    } else {
        false
    }
}
