//! Headless predictive client session against a scripted server feed

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use client::runtime;
use client::{ClientConfig, Key, PredictiveClient, RenderSink};
use game_core::{Ball, GameState, Players, Side};
use glam::Vec2;
use proto::{
    BallP, BallPosition, GameStateP, JoinedRoom, OpponentPosition, PlayerP, PlayersP, Position,
    PositionCorrection, SideP, C2S, S2C,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SideArg {
    Left,
    Right,
}

#[derive(Parser)]
#[command(name = "demo")]
#[command(about = "Predictive Pong client against a scripted server")]
struct Args {
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    #[arg(long, default_value_t = 100.0, help = "Artificial send delay in ms")]
    latency_ms: f64,

    #[arg(long, default_value_t = 3)]
    seconds: u64,

    #[arg(long, value_enum, default_value_t = SideArg::Left)]
    side: SideArg,
}

/// Logs a summary line once per second of ticks
#[derive(Default)]
struct LogRenderer {
    frames: u64,
    fps: u64,
    last_message: Option<String>,
}

impl RenderSink for LogRenderer {
    fn render(&mut self, state: &GameState, message: Option<&str>) {
        self.frames += 1;
        if message != self.last_message.as_deref() {
            if let Some(message) = message {
                log::info!("[screen] {}", message);
            }
            self.last_message = message.map(str::to_string);
        }
        if self.fps > 0 && self.frames % self.fps == 0 {
            log::info!(
                "tick {:>5}  ball ({:6.2}, {:6.2})  left y {:6.2}  right y {:6.2}",
                state.tick_count,
                state.ball.pos.x,
                state.ball.pos.y,
                state.players[Side::Left].y,
                state.players[Side::Right].y,
            );
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = ClientConfig::new(args.fps, args.latency_ms)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(session(args, config))
}

async fn session(args: Args, config: ClientConfig) -> Result<()> {
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let (in_tx, in_rx) = mpsc::unbounded_channel();

    let renderer = LogRenderer {
        fps: args.fps.round() as u64,
        ..LogRenderer::default()
    };
    let tick_interval = config.tick_interval();
    let mut client = PredictiveClient::new(config, out_tx, renderer)?;

    let side = match args.side {
        SideArg::Left => SideP::Left,
        SideArg::Right => SideP::Right,
    };
    let initial = initial_state();
    let (event, payload) = S2C::JoinedRoom(JoinedRoom {
        player: PlayerP {
            side: Some(side),
            y: initial.players[Side::Left].y,
            dy: 0.0,
            local: Some(true),
        },
        state: wire_state(&initial),
    })
    .encode()?;
    client.handle_event(event, &payload)?;

    // Held for the whole session; the paddle parks at the wall until corrected
    client.keydown(Key::Down);

    let feed = tokio::spawn(scripted_feed(
        initial,
        tick_interval,
        Duration::from_secs(args.seconds),
        in_tx,
        out_rx,
    ));

    runtime::run(&mut client, in_rx, Instant::now(), |err| {
        log::error!("Session error: {}", err);
    })
    .await;

    let received = feed.await??;
    log::info!(
        "Session over at tick {}, server received {} positions",
        client.store().tick_count(),
        received
    );
    Ok(())
}

fn wire_state(state: &GameState) -> GameStateP {
    let player = |side| PlayerP {
        side: None,
        y: state.players[side].y,
        dy: state.players[side].dy,
        local: None,
    };
    GameStateP {
        tick_count: state.tick_count,
        players: PlayersP {
            left: player(Side::Left),
            right: player(Side::Right),
        },
        ball: BallP {
            x: state.ball.pos.x,
            y: state.ball.pos.y,
            dx: state.ball.vel.x,
            dy: state.ball.vel.y,
        },
        started: state.started,
    }
}

fn send(tx: &UnboundedSender<(String, String)>, msg: &S2C) -> Result<()> {
    let (event, payload) = msg.encode()?;
    tx.send((event.to_string(), payload))?;
    Ok(())
}

fn initial_state() -> GameState {
    GameState {
        tick_count: 0,
        players: Players::new(40.0, 40.0),
        ball: Ball::new(Vec2::new(50.0, 50.0), Vec2::new(0.8, 0.5)),
        started: false,
    }
}

/// Plays the server half after the join: start, then stream opponent and ball
/// state. Returns how many `position` messages arrived from the client.
async fn scripted_feed(
    mut state: GameState,
    tick_interval: Duration,
    duration: Duration,
    tx: UnboundedSender<(String, String)>,
    mut rx: UnboundedReceiver<(String, String)>,
) -> Result<usize> {
    let config = game_core::Config::new();

    tokio::time::sleep(Duration::from_millis(250)).await;
    state.started = true;
    send(&tx, &S2C::Start(wire_state(&state)))?;

    let started = Instant::now();
    let mut interval = tokio::time::interval(tick_interval);
    let mut received = 0;
    let mut last_position: Option<Position> = None;
    let mut corrected = false;

    while started.elapsed() < duration {
        interval.tick().await;
        game_core::step(&mut state, &config);
        state.tick_count += 1;

        while let Ok((event, payload)) = rx.try_recv() {
            match C2S::decode(&event, &payload)? {
                C2S::Position(position) => {
                    received += 1;
                    last_position = Some(position);
                }
            }
        }

        if state.tick_count % 6 == 0 {
            let phase = state.tick_count as f32 * 0.05;
            send(
                &tx,
                &S2C::OpponentPosition(OpponentPosition {
                    y: 40.0 + phase.sin() * 20.0,
                    dy: phase.cos(),
                }),
            )?;
            send(
                &tx,
                &S2C::BallPosition(BallPosition {
                    x: state.ball.pos.x,
                    y: state.ball.pos.y,
                    tick_count: state.tick_count,
                }),
            )?;
        }

        // Push the client back to where the server last saw it
        if !corrected && started.elapsed() >= duration / 2 {
            if let Some(position) = last_position {
                log::info!("[server] correcting client to y {:.2}", position.y);
                send(
                    &tx,
                    &S2C::PositionCorrection(PositionCorrection { y: position.y }),
                )?;
                corrected = true;
            }
        }
    }

    Ok(received)
}
