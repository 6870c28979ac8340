//! Client configuration
//!
//! Mirrors the host's `predictiveclient` config block (`fps`, `clientLatency`) and
//! adds the reconciliation knobs.

use crate::prediction::CorrectionPolicy;
use game_core::Params;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("fps {fps} gives a tick interval under one nanosecond")]
    TickRateTooHigh { fps: f64 },
    #[error("smooth correction needs at least one tick")]
    ZeroCorrectionTicks,
    #[error("invalid playfield: {0}")]
    Playfield(#[from] game_core::ConfigError),
    #[error("failed to parse client config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// What to do with an inbound payload that fails to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Return the error to the host
    Strict,
    /// Log and drop the message
    Lenient,
}

impl Default for MalformedPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            MalformedPolicy::Strict
        } else {
            MalformedPolicy::Lenient
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    /// Tick rate in frames per second
    pub fps: f64,
    /// Artificial delay before each outbound `position`, in milliseconds
    #[serde(rename = "clientLatency")]
    pub client_latency_ms: f64,
    pub malformed: MalformedPolicy,
    /// Advance snapped ball positions by the ticks elapsed since the server sent them
    pub extrapolate_ball: bool,
    /// Drop `ball_position` messages older than the last one applied
    pub discard_stale_ball: bool,
    pub correction: CorrectionPolicy,
    pub playfield: game_core::Config,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            fps: Params::FPS,
            client_latency_ms: Params::CLIENT_LATENCY_MS,
            malformed: MalformedPolicy::default(),
            extrapolate_ball: true,
            discard_stale_ball: false,
            correction: CorrectionPolicy::HardSnap,
            playfield: game_core::Config::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(fps: f64, client_latency_ms: f64) -> Result<Self, ConfigError> {
        let config = Self {
            fps,
            client_latency_ms,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON config block
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("fps", self.fps), ("clientLatency", self.client_latency_ms)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if self.tick_interval().is_zero() {
            return Err(ConfigError::TickRateTooHigh { fps: self.fps });
        }
        if let CorrectionPolicy::Smooth { ticks: 0 } = self.correction {
            return Err(ConfigError::ZeroCorrectionTicks);
        }
        self.playfield.validate()?;
        Ok(())
    }

    // Rounded to whole nanoseconds so millisecond settings land exactly
    pub fn tick_interval(&self) -> Duration {
        Duration::from_nanos((1e9 / self.fps).round() as u64)
    }

    pub fn latency(&self) -> Duration {
        Duration::from_nanos((self.client_latency_ms * 1e6).round() as u64)
    }
}
