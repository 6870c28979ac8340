//! Reconciliation of authoritative server messages onto the state store

use crate::config::ClientConfig;
use crate::prediction::apply_correction;
use crate::render::{STARTED_MESSAGE, START_MESSAGE, WAITING_MESSAGE};
use crate::state::StateStore;
use game_core::{Ball, GameState, Player, Players, Side};
use glam::Vec2;
use proto::{
    BallPosition, GameStateP, JoinedRoom, OpponentPosition, PlayerP, PositionCorrection, SideP,
    S2C,
};

/// Side effects the session should perform after a message is applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    pub status: Option<&'static str>,
    pub render: bool,
    pub start_ticking: bool,
}

/// Apply one inbound message to the store
pub fn apply(store: &mut StateStore, msg: S2C, config: &ClientConfig) -> Outcome {
    match msg {
        S2C::JoinedRoom(msg) => joined_room(store, msg),
        S2C::Start(msg) => start(store, &msg),
        S2C::OpponentPosition(msg) => opponent_position(store, msg),
        S2C::BallPosition(msg) => ball_position(store, msg, config),
        S2C::PositionCorrection(msg) => position_correction(store, msg, config),
    }
}

fn side_from_wire(side: SideP) -> Side {
    match side {
        SideP::Left => Side::Left,
        SideP::Right => Side::Right,
    }
}

fn player_from_wire(side: Side, wire: &PlayerP) -> Player {
    let mut player = Player::new(side, wire.y);
    player.dy = wire.dy;
    player
}

/// Convert a wire snapshot. Slots come from the `players` keys.
pub fn state_from_wire(wire: &GameStateP) -> GameState {
    let mut players = Players::default();
    players.replace(player_from_wire(Side::Left, &wire.players.left));
    players.replace(player_from_wire(Side::Right, &wire.players.right));

    GameState {
        tick_count: wire.tick_count,
        players,
        ball: Ball::new(
            Vec2::new(wire.ball.x, wire.ball.y),
            Vec2::new(wire.ball.dx, wire.ball.dy),
        ),
        started: wire.started,
    }
}

fn joined_room(store: &mut StateStore, msg: JoinedRoom) -> Outcome {
    match msg.player.side.map(side_from_wire) {
        Some(side) => {
            if msg.player.local.unwrap_or(true) && !store.claim_side(side) {
                log::warn!(
                    "Ignoring local claim on {:?}, already playing {:?}",
                    side,
                    store.local_side()
                );
            }
            store.replace_player(player_from_wire(side, &msg.player));
            log::info!("Joined room as {:?}", side);
        }
        None => log::warn!("joined_room without a player side, loading state only"),
    }

    store.load(state_from_wire(&msg.state));

    let status = if store.started() {
        STARTED_MESSAGE
    } else {
        WAITING_MESSAGE
    };
    Outcome {
        status: Some(status),
        render: true,
        start_ticking: false,
    }
}

fn start(store: &mut StateStore, msg: &GameStateP) -> Outcome {
    store.reset_tick_count();
    store.load(state_from_wire(msg));
    store.mark_started();
    log::info!("Game started at tick {}", store.tick_count());

    Outcome {
        status: Some(START_MESSAGE),
        render: true,
        start_ticking: true,
    }
}

fn opponent_position(store: &mut StateStore, msg: OpponentPosition) -> Outcome {
    match store.opponent_mut() {
        Some(opponent) => {
            opponent.y = msg.y;
            opponent.dy = msg.dy;
        }
        None => log::debug!("opponent_position before join, ignored"),
    }
    Outcome::default()
}

fn ball_position(store: &mut StateStore, msg: BallPosition, config: &ClientConfig) -> Outcome {
    if config.discard_stale_ball {
        if let Some(last) = store.last_ball_tick() {
            if msg.tick_count < last {
                log::debug!(
                    "Stale ball_position from tick {} (last {}), dropped",
                    msg.tick_count,
                    last
                );
                return Outcome::default();
            }
        }
    }

    let local_tick = store.tick_count();
    let ball = store.ball_mut();
    ball.pos = Vec2::new(msg.x, msg.y);
    if config.extrapolate_ball {
        // Server ahead of us means nothing to catch up on
        let behind = local_tick.saturating_sub(msg.tick_count);
        ball.pos += ball.vel * behind as f32;
    }
    store.set_last_ball_tick(msg.tick_count);
    Outcome::default()
}

fn position_correction(
    store: &mut StateStore,
    msg: PositionCorrection,
    config: &ClientConfig,
) -> Outcome {
    let pending = match store.local_player_mut() {
        Some(player) => apply_correction(player, msg.y, config.correction),
        None => {
            log::debug!("position_correction before join, ignored");
            return Outcome::default();
        }
    };
    store.set_pending_correction(pending);
    Outcome::default()
}
