//! End-to-end session tests over the in-memory transport

use coin_bot_client::{
    AgentSettings, MemoryTransport, PlayerSpec, SessionContext, Transport, run_session,
};
use coin_bot_core::PolicyKind;
use coin_bot_core::policy::GRID_CENTER;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

const WAIT: Duration = Duration::from_secs(5);

fn settings(policy: PolicyKind, move_interval: Duration) -> AgentSettings {
    AgentSettings {
        policy,
        fallback: GRID_CENTER,
        move_interval,
        queue_depth: 8,
    }
}

async fn start(
    players: &[(&str, &str)],
    settings: AgentSettings,
) -> (Arc<MemoryTransport>, JoinHandle<coin_bot_core::Result<()>>) {
    let (transport, inbound) = MemoryTransport::new(32);
    let transport = Arc::new(transport);
    let context = SessionContext::new(
        "TestLobby",
        players
            .iter()
            .map(|(name, team)| PlayerSpec::new(*name, *team))
            .collect(),
    )
    .unwrap();

    let shared: Arc<dyn Transport> = transport.clone();
    let handle = tokio::spawn(run_session(
        context,
        shared,
        inbound,
        settings,
        Duration::ZERO,
    ));

    let started = transport.wait_for("games/TestLobby/start", 1, WAIT).await;
    assert_eq!(started, vec!["START"]);
    (transport, handle)
}

#[tokio::test]
async fn test_multi_player_session() {
    let (transport, handle) = start(
        &[("Player1", "ATeam"), ("Player2", "BTeam")],
        settings(PolicyKind::Greedy, Duration::ZERO),
    )
    .await;

    assert_eq!(transport.published_on("new_game").await.len(), 2);

    transport
        .deliver(
            "games/TestLobby/Player1/game_state",
            r#"{"currentPosition":[2,2],"coin1":[2,5],"coin2":null,"coin3":null,"walls":[]}"#,
        )
        .await
        .unwrap();
    transport
        .deliver(
            "games/TestLobby/Player2/game_state",
            r#"{"currentPosition":[2,2],"walls":[[3,2],[1,2],[2,3]]}"#,
        )
        .await
        .unwrap();
    transport
        .deliver("games/TestLobby/Player1/game_state", "{not json")
        .await
        .unwrap();
    transport
        .deliver(
            "games/TestLobby/Player3/game_state",
            r#"{"currentPosition":[0,0],"coin1":[0,3],"walls":[]}"#,
        )
        .await
        .unwrap();
    transport
        .deliver(
            "games/TestLobby/Player1/game_state",
            r#"{"currentPosition":[2,2],"coin1":[0,2],"walls":[]}"#,
        )
        .await
        .unwrap();
    transport
        .deliver("games/TestLobby/scores", r#"{"ATeam": 4, "BTeam": 2}"#)
        .await
        .unwrap();

    let p1 = transport
        .wait_for("games/TestLobby/Player1/move", 2, WAIT)
        .await;
    let p2 = transport
        .wait_for("games/TestLobby/Player2/move", 1, WAIT)
        .await;

    assert_eq!(p1, vec!["RIGHT", "UP"]);
    assert_eq!(p2, vec!["LEFT"]);
    assert!(
        transport
            .published_on("games/TestLobby/Player3/move")
            .await
            .is_empty()
    );

    handle.abort();
}

#[tokio::test]
async fn test_deadlocked_player_publishes_nothing() {
    let (transport, handle) = start(
        &[("Player1", "ATeam")],
        settings(PolicyKind::Greedy, Duration::ZERO),
    )
    .await;

    transport
        .deliver(
            "games/TestLobby/Player1/game_state",
            r#"{"currentPosition":[2,2],"walls":[[1,2],[3,2],[2,1],[2,3]]}"#,
        )
        .await
        .unwrap();
    // Follow-up state proves the agent is still alive after the deadlock
    transport
        .deliver(
            "games/TestLobby/Player1/game_state",
            r#"{"currentPosition":[2,2],"coin1":[2,5],"walls":[]}"#,
        )
        .await
        .unwrap();

    let moves = transport
        .wait_for("games/TestLobby/Player1/move", 1, WAIT)
        .await;
    assert_eq!(moves, vec!["RIGHT"]);

    handle.abort();
}

#[tokio::test]
async fn test_straight_line_session() {
    let (transport, handle) = start(
        &[("Player1", "ATeam")],
        settings(PolicyKind::StraightLine, Duration::ZERO),
    )
    .await;

    transport
        .deliver(
            "games/TestLobby/Player1/game_state",
            r#"{"currentPosition":[2,2],"coin1":[5,2],"walls":[[3,2]]}"#,
        )
        .await
        .unwrap();

    let moves = transport
        .wait_for("games/TestLobby/Player1/move", 1, WAIT)
        .await;
    assert_eq!(moves, vec!["DOWN"]);

    handle.abort();
}

#[tokio::test(start_paused = true)]
async fn test_moves_are_paced_per_player() {
    let (transport, handle) = start(
        &[("Player1", "ATeam"), ("Player2", "ATeam")],
        settings(PolicyKind::StraightLine, Duration::from_millis(500)),
    )
    .await;

    let begin = tokio::time::Instant::now();
    for _ in 0..3 {
        transport
            .deliver(
                "games/TestLobby/Player1/game_state",
                r#"{"currentPosition":[2,2],"coin1":[2,5],"walls":[]}"#,
            )
            .await
            .unwrap();
    }
    transport
        .deliver(
            "games/TestLobby/Player2/game_state",
            r#"{"currentPosition":[2,2],"coin1":[2,0],"walls":[]}"#,
        )
        .await
        .unwrap();

    let p2 = transport
        .wait_for("games/TestLobby/Player2/move", 1, WAIT)
        .await;
    assert_eq!(p2, vec!["LEFT"]);
    // Player1's backlog does not hold up Player2
    assert!(begin.elapsed() < Duration::from_millis(500));

    let p1 = transport
        .wait_for("games/TestLobby/Player1/move", 3, WAIT)
        .await;
    assert_eq!(p1, vec!["RIGHT", "RIGHT", "RIGHT"]);
    assert!(begin.elapsed() >= Duration::from_millis(1000));

    handle.abort();
}
