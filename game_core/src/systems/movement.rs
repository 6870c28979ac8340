use crate::{Ball, Config, Players};

/// Apply paddle velocity, clamped to arena bounds
pub fn move_paddles(players: &mut Players, config: &Config) {
    for side in crate::Side::BOTH {
        let paddle = &mut players[side];
        if paddle.dy != 0.0 {
            paddle.y = config.clamp_paddle_y(paddle.y + paddle.dy);
        }
    }
}

/// Move ball based on velocity
pub fn move_ball(ball: &mut Ball) {
    ball.pos += ball.vel;
}
