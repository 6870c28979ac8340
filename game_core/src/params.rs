/// Game tuning parameters for Pong
///
/// Units are playfield units; velocities are per tick.
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Arena
    pub const ARENA_WIDTH: f32 = 100.0;
    pub const ARENA_HEIGHT: f32 = 100.0;

    // Paddle
    pub const PADDLE_WIDTH: f32 = 2.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    pub const PADDLE_INSET: f32 = 3.0; // Distance from side wall to paddle centre
    pub const PADDLE_SPEED: f32 = 1.0; // units per tick

    // Ball
    pub const BALL_RADIUS: f32 = 1.0;
    pub const MAX_DEFLECTION: f32 = 0.0; // 0 = pure horizontal flip

    // Network
    pub const FPS: f64 = 60.0;
    pub const CLIENT_LATENCY_MS: f64 = 100.0;
}
