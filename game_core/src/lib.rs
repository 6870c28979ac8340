pub mod components;
pub mod config;
pub mod params;
pub mod systems;

pub use components::*;
pub use config::*;
pub use params::*;

use systems::*;

/// Advance the game one tick: integrate motion, then resolve collisions.
///
/// Paddles are tested left first, then right. A left bounce moves the ball, so the
/// right test always sees the post-left position.
pub fn step(state: &mut GameState, config: &Config) {
    // 1. Move ball
    move_ball(&mut state.ball);

    // 2. Move paddles
    move_paddles(&mut state.players, config);

    // 3. Keep the ball on the table
    bounce_off_walls(&mut state.ball, config);

    // 4. Ball vs paddles
    for side in Side::BOTH {
        if let Some(bounce) = test_intersection(&state.ball, &state.players[side], config) {
            bounce.apply(&mut state.ball);
        }
    }
}
