//! Render sink boundary
//!
//! The core never draws. It hands a read-only snapshot plus the current status
//! line to whatever the host plugs in here.

use crate::input::KeysPressed;
use game_core::GameState;

pub const WAITING_MESSAGE: &str = "waiting for second player";
pub const STARTED_MESSAGE: &str = "START";
pub const START_MESSAGE: &str = "START!";

pub trait RenderSink {
    fn render(&mut self, state: &GameState, message: Option<&str>);

    /// Show which control keys are held
    fn show_keys(&mut self, _keys: KeysPressed) {}
}

/// Discards every frame. For headless sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl RenderSink for NullRenderer {
    fn render(&mut self, _state: &GameState, _message: Option<&str>) {}
}

impl<R: RenderSink + ?Sized> RenderSink for Box<R> {
    fn render(&mut self, state: &GameState, message: Option<&str>) {
        (**self).render(state, message)
    }

    fn show_keys(&mut self, keys: KeysPressed) {
        (**self).show_keys(keys)
    }
}
