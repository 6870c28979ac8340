use crate::{Params, Side};
use serde::Deserialize;

/// Invalid playfield configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must be a finite non-negative number, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("paddle height {paddle_height} does not fit in arena height {arena_height}")]
    PaddleTooTall {
        paddle_height: f32,
        arena_height: f32,
    },
    #[error("paddle inset {inset} places paddles outside arena width {arena_width}")]
    InsetOutOfRange { inset: f32, arena_width: f32 },
}

/// Playfield bounds and tuning. Missing fields take their [`Params`] defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub arena_width: f32,
    pub arena_height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_inset: f32,
    pub paddle_speed: f32,
    pub ball_radius: f32,
    /// Vertical speed given to the ball when it strikes a paddle edge.
    /// Scaled by hit offset from the paddle centre, 0 disables deflection.
    pub max_deflection: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            arena_width: Params::ARENA_WIDTH,
            arena_height: Params::ARENA_HEIGHT,
            paddle_width: Params::PADDLE_WIDTH,
            paddle_height: Params::PADDLE_HEIGHT,
            paddle_inset: Params::PADDLE_INSET,
            paddle_speed: Params::PADDLE_SPEED,
            ball_radius: Params::BALL_RADIUS,
            max_deflection: Params::MAX_DEFLECTION,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get X position of the paddle centre for a side
    pub fn paddle_x(&self, side: Side) -> f32 {
        match side {
            Side::Left => self.paddle_inset,
            Side::Right => self.arena_width - self.paddle_inset,
        }
    }

    /// Clamp paddle Y (top edge) to arena bounds
    pub fn clamp_paddle_y(&self, y: f32) -> f32 {
        y.clamp(0.0, self.arena_height - self.paddle_height)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("paddle_speed", self.paddle_speed),
            ("ball_radius", self.ball_radius),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        for (field, value) in [
            ("paddle_inset", self.paddle_inset),
            ("max_deflection", self.max_deflection),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if self.paddle_height > self.arena_height {
            return Err(ConfigError::PaddleTooTall {
                paddle_height: self.paddle_height,
                arena_height: self.arena_height,
            });
        }
        if self.paddle_inset * 2.0 >= self.arena_width {
            return Err(ConfigError::InsetOutOfRange {
                inset: self.paddle_inset,
                arena_width: self.arena_width,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_paddle_x() {
        let config = Config::new();
        assert_eq!(config.paddle_x(Side::Left), 3.0, "Left paddle X position");
        assert_eq!(config.paddle_x(Side::Right), 97.0, "Right paddle X position");
    }

    #[test]
    fn test_config_clamp_paddle_y() {
        let config = Config::new();
        assert_eq!(config.clamp_paddle_y(-5.0), 0.0);
        assert_eq!(
            config.clamp_paddle_y(1000.0),
            config.arena_height - config.paddle_height
        );
        assert_eq!(config.clamp_paddle_y(10.0), 10.0);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(Config::new().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            arena_height: f32::NAN,
            ..Config::new()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "arena_height",
                ..
            })
        ));

        let config = Config {
            paddle_height: 200.0,
            ..Config::new()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PaddleTooTall { .. })
        ));

        let config = Config {
            max_deflection: -1.0,
            ..Config::new()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Negative { .. })
        ));
    }
}
