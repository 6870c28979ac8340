use client::*;
use game_core::{GameState, Side};
use glam::Vec2;
use proto::{Position, C2S};
use std::time::Duration;

const MS: Duration = Duration::from_millis(1);

#[derive(Default)]
struct MockChannel {
    sent: Vec<(String, String)>,
    fail: bool,
}

impl MockChannel {
    fn positions(&self) -> Vec<Position> {
        self.sent
            .iter()
            .map(|(event, payload)| match C2S::decode(event, payload) {
                Ok(C2S::Position(position)) => position,
                Err(err) => panic!("unexpected outbound {event}: {err}"),
            })
            .collect()
    }
}

impl Channel for MockChannel {
    fn emit(&mut self, event: &str, payload: String) -> Result<(), ChannelError> {
        if self.fail {
            return Err(ChannelError::Send("socket buffer full".to_string()));
        }
        self.sent.push((event.to_string(), payload));
        Ok(())
    }
}

#[derive(Default)]
struct MockRenderer {
    frames: Vec<(GameState, Option<String>)>,
    keys: Vec<KeysPressed>,
}

impl MockRenderer {
    fn last_message(&self) -> Option<&str> {
        self.frames.last().and_then(|(_, msg)| msg.as_deref())
    }
}

impl RenderSink for MockRenderer {
    fn render(&mut self, state: &GameState, message: Option<&str>) {
        self.frames.push((*state, message.map(str::to_string)));
    }

    fn show_keys(&mut self, keys: KeysPressed) {
        self.keys.push(keys);
    }
}

type TestClient = PredictiveClient<MockChannel, MockRenderer>;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 10 ms ticks, 25 ms send delay
fn new_client() -> TestClient {
    init_logger();
    let config = ClientConfig {
        fps: 100.0,
        client_latency_ms: 25.0,
        malformed: MalformedPolicy::Strict,
        ..ClientConfig::default()
    };
    PredictiveClient::new(config, MockChannel::default(), MockRenderer::default())
        .expect("valid config")
}

fn join(client: &mut TestClient, side: &str, started: bool) {
    let payload = format!(
        r#"{{
            "player": {{"side": "{side}", "y": 10}},
            "state": {{
                "tickCount": 0,
                "players": {{"left": {{"y": 10}}, "right": {{"y": 10}}}},
                "ball": {{"x": 50, "y": 50, "dx": 0, "dy": 0}},
                "started": {started}
            }}
        }}"#
    );
    client
        .handle_event("joined_room", &payload)
        .expect("joined_room applies");
}

fn start(client: &mut TestClient) {
    client
        .handle_event(
            "start",
            r#"{"players": {"left": {"y": 10}, "right": {"y": 10}},
                "ball": {"x": 50, "y": 50, "dx": 1, "dy": 1},
                "tickCount": 0}"#,
        )
        .expect("start applies");
}

#[test]
fn test_join_as_right_waits_without_ticking() {
    let mut client = new_client();
    join(&mut client, "right", false);

    assert_eq!(client.renderer().last_message(), Some("waiting for second player"));
    assert!(!client.is_running());

    assert_eq!(client.advance_to(500 * MS), 0);
    assert_eq!(client.state().tick_count, 0);
    assert!(client.channel().sent.is_empty());
}

#[test]
fn test_start_resets_and_integrates_ball() {
    let mut client = new_client();
    join(&mut client, "left", false);
    start(&mut client);

    assert!(client.is_running());
    assert_eq!(client.state().tick_count, 0);
    assert_eq!(client.renderer().last_message(), Some("START!"));

    assert_eq!(client.advance_to(30 * MS), 3);
    assert_eq!(client.state().tick_count, 3);
    assert_eq!(client.state().ball.pos, Vec2::new(53.0, 53.0));
}

#[test]
fn test_start_twice_keeps_one_loop() {
    let mut client = new_client();
    join(&mut client, "left", false);
    start(&mut client);
    client.advance_to(5 * MS);
    start(&mut client);

    // Second start does not reschedule the first tick at 15 ms
    assert_eq!(client.advance_to(10 * MS), 1);
}

#[test]
fn test_tick_count_advances_exactly_once_per_tick() {
    for n in [1u64, 7, 64] {
        let mut client = new_client();
        join(&mut client, "left", false);
        start(&mut client);
        let before = client.state().tick_count;
        let ran = client.advance_to(Duration::from_millis(10 * n));
        assert_eq!(u64::from(ran), n);
        assert_eq!(client.state().tick_count, before + n);
    }
}

#[test]
fn test_keydown_up_moves_local_paddle() {
    let mut client = new_client();
    join(&mut client, "left", false);
    start(&mut client);

    client.keydown(Key::Up);
    assert_eq!(client.state().players[Side::Left].dy, -1.0);

    client.advance_to(10 * MS);
    assert_eq!(client.state().players[Side::Left].y, 9.0);
    assert_eq!(client.state().players[Side::Right].y, 10.0);
    assert_eq!(
        client.renderer().keys.last(),
        Some(&KeysPressed {
            up: true,
            down: false
        })
    );
}

#[test]
fn test_keyup_stops_only_when_no_key_held() {
    let mut client = new_client();
    join(&mut client, "right", false);

    client.keydown(Key::Up);
    client.keydown(Key::Down);
    assert_eq!(client.state().players[Side::Right].dy, 1.0);

    client.keyup(Key::Down);
    assert_eq!(
        client.state().players[Side::Right].dy,
        -1.0,
        "held up key takes over"
    );

    client.keyup(Key::Up);
    assert_eq!(client.state().players[Side::Right].dy, 0.0);
}

#[test]
fn test_keys_before_join_are_ignored() {
    let mut client = new_client();
    client.keydown(Key::Down);
    assert_eq!(client.state().players[Side::Left].dy, 0.0);
    assert_eq!(client.state().players[Side::Right].dy, 0.0);
}

#[test]
fn test_emission_is_delayed_and_captured_at_tick_time() {
    let mut client = new_client();
    join(&mut client, "left", false);
    start(&mut client);
    client.keydown(Key::Down);

    // Tick at 10 ms captures y=11, sent at 35 ms
    client.advance_to(10 * MS);
    assert!(client.channel().sent.is_empty());
    assert_eq!(client.pending_emissions(), 1);

    // Later ticks and a key change must not leak into the queued payload
    client.advance_to(30 * MS);
    client.keyup(Key::Down);
    client.advance_to(34 * MS);
    assert!(client.channel().sent.is_empty());

    client.advance_to(35 * MS);
    assert_eq!(
        client.channel().positions(),
        vec![Position {
            y: 11.0,
            dy: 1.0,
            tick_count: 1
        }]
    );
}

#[test]
fn test_several_emissions_in_flight_keep_their_snapshots() {
    let mut client = new_client();
    join(&mut client, "left", false);
    start(&mut client);
    client.keydown(Key::Down);

    client.advance_to(60 * MS);
    let positions = client.channel().positions();
    // Ticks at 10..=60 ms, sends due at 35..=85 ms
    assert_eq!(positions.len(), 3);
    assert_eq!(client.pending_emissions(), 3);
    for (i, position) in positions.iter().enumerate() {
        let tick = i as u64 + 1;
        assert_eq!(position.tick_count, tick);
        assert_eq!(position.y, 10.0 + tick as f32);
    }
}

#[test]
fn test_no_emission_without_local_player() {
    let mut client = new_client();
    start(&mut client);

    assert_eq!(client.advance_to(100 * MS), 10);
    assert_eq!(client.pending_emissions(), 0);
    assert!(client.channel().sent.is_empty());
}

#[test]
fn test_failed_send_does_not_stop_ticks() {
    let mut client = new_client();
    join(&mut client, "left", false);
    start(&mut client);
    client.channel_mut().fail = true;

    assert_eq!(client.advance_to(100 * MS), 10);
    assert!(client.is_running());
    assert_eq!(client.state().tick_count, 10);
}

#[test]
fn test_stop_keeps_pending_emissions_and_shutdown_cancels() {
    let mut client = new_client();
    join(&mut client, "left", false);
    start(&mut client);
    client.advance_to(20 * MS);
    assert_eq!(client.pending_emissions(), 2);

    client.stop();
    assert!(!client.is_running());
    client.advance_to(45 * MS);
    assert_eq!(client.channel().sent.len(), 2, "stop lets queued sends finish");
    assert_eq!(client.state().tick_count, 2);

    start(&mut client);
    client.advance_to(60 * MS);
    assert!(client.pending_emissions() > 0);
    client.shutdown();
    assert_eq!(client.pending_emissions(), 0);
    client.advance_to(200 * MS);
    assert_eq!(client.channel().sent.len(), 2);
}

#[test]
fn test_opponent_updates_do_not_touch_local() {
    for (local, opponent) in [("left", Side::Right), ("right", Side::Left)] {
        let mut client = new_client();
        join(&mut client, local, false);
        start(&mut client);
        client.keydown(Key::Up);
        let local_before = client.state().players[opponent.opponent()];

        client
            .handle_event("opponent_position", r#"{"y": 42, "dy": 1}"#)
            .expect("valid payload");

        assert_eq!(client.state().players[opponent.opponent()], local_before);
        assert_eq!(client.state().players[opponent].y, 42.0);
        assert_eq!(client.state().players[opponent].dy, 1.0);
    }
}

#[test]
fn test_ball_position_extrapolated_before_next_render() {
    let mut client = new_client();
    join(&mut client, "left", false);
    start(&mut client);
    client.advance_to(30 * MS);
    assert_eq!(client.state().tick_count, 3);

    client
        .handle_event("ball_position", r#"{"x": 20, "y": 40, "tickCount": 1}"#)
        .expect("valid payload");
    // Two ticks behind at velocity (1, 1)
    assert_eq!(client.state().ball.pos, Vec2::new(22.0, 42.0));

    client.advance_to(40 * MS);
    let (frame, _) = client.renderer().frames.last().expect("tick rendered");
    assert_eq!(frame.ball.pos, Vec2::new(23.0, 43.0));
}

#[test]
fn test_position_correction_twice_same_as_once() {
    let mut client = new_client();
    join(&mut client, "right", false);
    start(&mut client);
    client.advance_to(20 * MS);

    client
        .handle_event("position_correction", r#"{"y": 5}"#)
        .expect("valid payload");
    let once = *client.state();
    client
        .handle_event("position_correction", r#"{"y": 5}"#)
        .expect("valid payload");

    assert_eq!(*client.state(), once);
    assert_eq!(client.state().players[Side::Right].y, 5.0);
}

#[test]
fn test_malformed_policy() {
    let mut client = new_client();
    join(&mut client, "left", false);
    let before = *client.state();

    let err = client.handle_event("opponent_position", r#"{"y": 1}"#);
    assert!(matches!(err, Err(ClientError::Proto(_))));
    assert_eq!(*client.state(), before);

    let config = ClientConfig {
        malformed: MalformedPolicy::Lenient,
        ..ClientConfig::default()
    };
    let mut lenient =
        PredictiveClient::new(config, MockChannel::default(), MockRenderer::default())
            .expect("valid config");
    assert!(lenient.handle_event("opponent_position", "{").is_ok());
    assert!(lenient.handle_event("chat", "{}").is_ok());
}

#[test]
fn test_started_never_reverts() {
    let mut client = new_client();
    join(&mut client, "left", false);
    start(&mut client);
    assert!(client.state().started);

    // A later full load that claims not-started keeps the flag
    join(&mut client, "left", false);
    assert!(client.state().started);
    assert_eq!(client.renderer().last_message(), Some("START"));
}

#[test]
fn test_invalid_config_rejected() {
    let config = ClientConfig {
        fps: 0.0,
        ..ClientConfig::default()
    };
    let result = PredictiveClient::new(config, MockChannel::default(), MockRenderer::default());
    assert!(matches!(result, Err(ConfigError::NotPositive { field: "fps", .. })));
}
