//! Client-side game state store

use crate::prediction::PendingCorrection;
use game_core::{GameState, Player, Side};

/// Owns the client's copy of the game state.
///
/// Both the tick loop and reconciliation write through this store. Tick count only
/// moves forward through [`StateStore::advance_tick`] or a full load.
#[derive(Debug, Default)]
pub struct StateStore {
    state: GameState,
    local_side: Option<Side>,
    // Server tick of the last applied ball_position
    last_ball_tick: Option<u64>,
    pending_correction: Option<PendingCorrection>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tick_count(&self) -> u64 {
        self.state.tick_count
    }

    pub fn started(&self) -> bool {
        self.state.started
    }

    pub fn local_side(&self) -> Option<Side> {
        self.local_side
    }

    /// Claim a side for this client. The first claim wins; returns false if a
    /// different side was already claimed.
    pub fn claim_side(&mut self, side: Side) -> bool {
        match self.local_side {
            Some(existing) => existing == side,
            None => {
                self.local_side = Some(side);
                self.state.players[side].is_local = true;
                true
            }
        }
    }

    /// Replace one player slot, keeping the local flag consistent with the claimed side
    pub fn replace_player(&mut self, mut player: Player) {
        player.is_local = self.local_side == Some(player.side());
        self.state.players.replace(player);
    }

    /// Replace the whole state. The local flag is re-applied and `started` never reverts.
    pub fn load(&mut self, mut incoming: GameState) {
        for side in Side::BOTH {
            incoming.players[side].is_local = self.local_side == Some(side);
        }
        incoming.started |= self.state.started;
        self.state = incoming;
        self.last_ball_tick = None;
        self.pending_correction = None;
    }

    pub fn reset_tick_count(&mut self) {
        self.state.tick_count = 0;
    }

    pub fn mark_started(&mut self) {
        self.state.started = true;
    }

    pub fn local_player(&self) -> Option<&Player> {
        self.local_side.map(|side| &self.state.players[side])
    }

    pub fn local_player_mut(&mut self) -> Option<&mut Player> {
        self.local_side.map(|side| &mut self.state.players[side])
    }

    /// The non-local player, once the local side is known
    pub fn opponent_mut(&mut self) -> Option<&mut Player> {
        self.local_side.map(|side| &mut self.state.players[side.opponent()])
    }

    pub fn ball_mut(&mut self) -> &mut game_core::Ball {
        &mut self.state.ball
    }

    pub fn last_ball_tick(&self) -> Option<u64> {
        self.last_ball_tick
    }

    pub fn set_last_ball_tick(&mut self, tick: u64) {
        self.last_ball_tick = Some(tick);
    }

    pub fn set_pending_correction(&mut self, pending: Option<PendingCorrection>) {
        self.pending_correction = pending;
    }

    pub fn has_pending_correction(&self) -> bool {
        self.pending_correction.is_some()
    }

    /// Integrate one tick: pending correction first, then motion and collisions
    pub fn integrate(&mut self, config: &game_core::Config) {
        if let Some(pending) = self.pending_correction.as_mut() {
            let step = pending.next_step();
            if pending.is_complete() {
                self.pending_correction = None;
            }
            if let (Some(step), Some(side)) = (step, self.local_side) {
                let player = &mut self.state.players[side];
                player.y = config.clamp_paddle_y(player.y + step);
            }
        }
        game_core::step(&mut self.state, config);
    }

    pub fn advance_tick(&mut self) -> u64 {
        self.state.tick_count += 1;
        self.state.tick_count
    }
}
