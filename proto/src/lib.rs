//! Network protocol for Pong game
//!
//! Messages travel over a named-event channel: each message is an event name plus
//! a JSON payload. Field names follow the server's camelCase convention.

use serde::{Deserialize, Serialize};

// ============================================================================
// Event names
// ============================================================================

pub const JOINED_ROOM: &str = "joined_room";
pub const START: &str = "start";
pub const OPPONENT_POSITION: &str = "opponent_position";
pub const BALL_POSITION: &str = "ball_position";
pub const POSITION_CORRECTION: &str = "position_correction";
pub const POSITION: &str = "position";

/// Every event the client subscribes to
pub const INBOUND_EVENTS: [&str; 5] = [
    JOINED_ROOM,
    START,
    OPPONENT_POSITION,
    BALL_POSITION,
    POSITION_CORRECTION,
];

#[derive(Debug, thiserror::Error)]
pub enum ProtoError {
    #[error("unknown event `{0}`")]
    UnknownEvent(String),
    #[error("malformed `{event}` payload: {source}")]
    Malformed {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode `{event}` payload: {source}")]
    Encode {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

// ============================================================================
// Shared payload types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideP {
    Left,
    Right,
}

/// Player as sent by the server. Side may be omitted inside a `players` map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerP {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<SideP>,
    pub y: f32,
    #[serde(default)]
    pub dy: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayersP {
    pub left: PlayerP,
    pub right: PlayerP,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallP {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
}

/// Full game state snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateP {
    pub tick_count: u64,
    pub players: PlayersP,
    pub ball: BallP,
    #[serde(default)]
    pub started: bool,
}

// ============================================================================
// S2C Messages (Server to Client)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRoom {
    /// The player owned by this client
    pub player: PlayerP,
    pub state: GameStateP,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentPosition {
    pub y: f32,
    pub dy: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallPosition {
    pub x: f32,
    pub y: f32,
    /// Server tick at send time
    pub tick_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionCorrection {
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum S2C {
    JoinedRoom(JoinedRoom),
    /// Game start, state fields inlined
    Start(GameStateP),
    OpponentPosition(OpponentPosition),
    BallPosition(BallPosition),
    PositionCorrection(PositionCorrection),
}

// ============================================================================
// C2S Messages (Client to Server)
// ============================================================================

/// Local player state after a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub y: f32,
    pub dy: f32,
    pub tick_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum C2S {
    Position(Position),
}

// ============================================================================
// Serialization Helpers
// ============================================================================

fn parse<'a, T: Deserialize<'a>>(event: &'static str, payload: &'a str) -> Result<T, ProtoError> {
    serde_json::from_str(payload).map_err(|source| ProtoError::Malformed { event, source })
}

impl S2C {
    /// Decode a named event
    pub fn decode(event: &str, payload: &str) -> Result<Self, ProtoError> {
        let msg = match event {
            JOINED_ROOM => S2C::JoinedRoom(parse(JOINED_ROOM, payload)?),
            START => S2C::Start(parse(START, payload)?),
            OPPONENT_POSITION => S2C::OpponentPosition(parse(OPPONENT_POSITION, payload)?),
            BALL_POSITION => S2C::BallPosition(parse(BALL_POSITION, payload)?),
            POSITION_CORRECTION => S2C::PositionCorrection(parse(POSITION_CORRECTION, payload)?),
            other => return Err(ProtoError::UnknownEvent(other.to_string())),
        };
        Ok(msg)
    }

    pub fn event_name(&self) -> &'static str {
        match self {
            S2C::JoinedRoom(_) => JOINED_ROOM,
            S2C::Start(_) => START,
            S2C::OpponentPosition(_) => OPPONENT_POSITION,
            S2C::BallPosition(_) => BALL_POSITION,
            S2C::PositionCorrection(_) => POSITION_CORRECTION,
        }
    }

    /// Encode as (event, payload). Used by test harnesses and scripted feeds.
    pub fn encode(&self) -> Result<(&'static str, String), ProtoError> {
        let event = self.event_name();
        let payload = match self {
            S2C::JoinedRoom(m) => serde_json::to_string(m),
            S2C::Start(m) => serde_json::to_string(m),
            S2C::OpponentPosition(m) => serde_json::to_string(m),
            S2C::BallPosition(m) => serde_json::to_string(m),
            S2C::PositionCorrection(m) => serde_json::to_string(m),
        }
        .map_err(|source| ProtoError::Encode { event, source })?;
        Ok((event, payload))
    }
}

impl C2S {
    pub fn event_name(&self) -> &'static str {
        match self {
            C2S::Position(_) => POSITION,
        }
    }

    /// Encode as (event, payload)
    pub fn encode(&self) -> Result<(&'static str, String), ProtoError> {
        let event = self.event_name();
        let payload = match self {
            C2S::Position(m) => serde_json::to_string(m),
        }
        .map_err(|source| ProtoError::Encode { event, source })?;
        Ok((event, payload))
    }

    pub fn decode(event: &str, payload: &str) -> Result<Self, ProtoError> {
        match event {
            POSITION => Ok(C2S::Position(parse(POSITION, payload)?)),
            other => Err(ProtoError::UnknownEvent(other.to_string())),
        }
    }
}
