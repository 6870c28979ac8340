//! Predictive Pong client core
//!
//! Runs the local simulation at a fixed tick rate, predicts the local paddle from
//! keyboard input and reconciles against server messages as they arrive. Drawing,
//! key capture and the transport are supplied by the host through [`RenderSink`],
//! the `keydown`/`keyup` calls and [`Channel`].

pub mod config;
pub mod error;
pub mod input;
pub mod network;
pub mod prediction;
pub mod reconcile;
pub mod render;
pub mod runtime;
pub mod scheduler;
pub mod state;

pub use config::{ClientConfig, ConfigError, MalformedPolicy};
pub use error::ClientError;
pub use input::{Key, KeysPressed};
pub use network::{Channel, ChannelError, INBOUND_EVENTS};
pub use prediction::CorrectionPolicy;
pub use render::{NullRenderer, RenderSink};
pub use scheduler::{DelayQueue, TickScheduler};
pub use state::StateStore;

use game_core::GameState;
use prediction::velocity_for;
use proto::{Position, S2C};
use std::time::Duration;

/// One client session.
///
/// All time values are offsets from the session start. The host (or
/// [`runtime::run`]) moves the clock forward with [`PredictiveClient::advance_to`]
/// and feeds inbound events through [`PredictiveClient::handle_event`].
pub struct PredictiveClient<C, R> {
    config: ClientConfig,
    store: StateStore,
    scheduler: TickScheduler,
    outbox: DelayQueue<Position>,
    channel: C,
    renderer: R,
    keys: KeysPressed,
    status: Option<&'static str>,
    now: Duration,
}

impl<C: Channel, R: RenderSink> PredictiveClient<C, R> {
    pub fn new(config: ClientConfig, channel: C, renderer: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            scheduler: TickScheduler::new(config.tick_interval()),
            config,
            store: StateStore::new(),
            outbox: DelayQueue::new(),
            channel,
            renderer,
            keys: KeysPressed::default(),
            status: None,
            now: Duration::ZERO,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        self.store.state()
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn status(&self) -> Option<&'static str> {
        self.status
    }

    pub fn keys(&self) -> KeysPressed {
        self.keys
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Delayed `position` emissions not yet sent
    pub fn pending_emissions(&self) -> usize {
        self.outbox.len()
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Decode and apply one named inbound event.
    ///
    /// Under [`MalformedPolicy::Strict`] a bad payload is returned as an error;
    /// under `Lenient` it is logged and dropped. Either way session state is untouched.
    pub fn handle_event(&mut self, event: &str, payload: &str) -> Result<(), ClientError> {
        if let Some(msg) = network::decode_inbound(event, payload, self.config.malformed)? {
            self.handle_message(msg);
        }
        Ok(())
    }

    /// Apply an already-decoded message
    pub fn handle_message(&mut self, msg: S2C) {
        log::trace!("Inbound {}", msg.event_name());
        let outcome = reconcile::apply(&mut self.store, msg, &self.config);

        if let Some(status) = outcome.status {
            self.status = Some(status);
        }
        if outcome.render {
            self.renderer.render(self.store.state(), self.status);
        }
        if outcome.start_ticking {
            self.start();
        }
    }

    /// Start the tick loop. No-op if already running.
    pub fn start(&mut self) {
        if self.scheduler.start(self.now) {
            log::info!(
                "Tick loop started at {} fps ({:?} per tick), {} ms send delay",
                self.config.fps,
                self.scheduler.interval(),
                self.config.client_latency_ms
            );
        }
    }

    /// Stop ticking. Emissions already scheduled still go out.
    pub fn stop(&mut self) {
        if self.scheduler.stop() {
            log::info!("Tick loop stopped at tick {}", self.store.tick_count());
        }
    }

    /// Stop ticking and cancel pending emissions
    pub fn shutdown(&mut self) {
        self.stop();
        let cancelled = self.outbox.clear();
        if cancelled > 0 {
            log::debug!("Cancelled {} pending position emissions", cancelled);
        }
    }

    pub fn keydown(&mut self, key: Key) {
        self.keys.press(key);
        let speed = self.config.playfield.paddle_speed;
        match self.store.local_player_mut() {
            Some(player) => player.dy = velocity_for(key, speed),
            None => log::debug!("keydown before join, ignored"),
        }
        self.renderer.show_keys(self.keys);
    }

    pub fn keyup(&mut self, key: Key) {
        self.keys.release(key);
        let speed = self.config.playfield.paddle_speed;
        let held = if self.keys.up {
            Some(Key::Up)
        } else if self.keys.down {
            Some(Key::Down)
        } else {
            None
        };
        if let Some(player) = self.store.local_player_mut() {
            player.dy = held.map_or(0.0, |key| velocity_for(key, speed));
        }
        self.renderer.show_keys(self.keys);
    }

    /// Run one tick: integrate, render, advance the tick count, then queue the
    /// local paddle state for delayed sending.
    pub fn tick(&mut self) {
        self.store.integrate(&self.config.playfield);
        self.renderer.render(self.store.state(), self.status);
        let tick_count = self.store.advance_tick();

        // Captured now; only the send waits
        if let Some(player) = self.store.local_player() {
            let position = Position {
                y: player.y,
                dy: player.dy,
                tick_count,
            };
            self.outbox.schedule(self.now + self.config.latency(), position);
        }
    }

    /// Earliest time something is due: a tick or a delayed emission
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.scheduler.next_deadline(), self.outbox.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Move the session clock to `now`, running every tick and emission that fell
    /// due on the way in time order. Returns the number of ticks run.
    pub fn advance_to(&mut self, now: Duration) -> u32 {
        let now = now.max(self.now);
        let mut ticks = 0;

        loop {
            let tick_at = self.scheduler.next_deadline().filter(|at| *at <= now);
            let emit_at = self.outbox.next_deadline().filter(|at| *at <= now);

            let emit_first = match (tick_at, emit_at) {
                (None, None) => break,
                (Some(tick), Some(emit)) => emit <= tick,
                (None, Some(_)) => true,
                (Some(_), None) => false,
            };

            if emit_first {
                if let Some((at, position)) = self.outbox.pop_due(now) {
                    self.now = self.now.max(at);
                    self.emit(position);
                }
            } else if let Some(at) = self.scheduler.poll(now) {
                self.now = self.now.max(at);
                self.tick();
                ticks += 1;
            }
        }

        self.now = now;
        ticks
    }

    fn emit(&mut self, position: Position) {
        if let Err(err) = network::emit_position(&mut self.channel, position) {
            log::warn!(
                "Failed to send position for tick {}: {}",
                position.tick_count,
                err
            );
        }
    }
}
