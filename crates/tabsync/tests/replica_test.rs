//! Tests for the async replica loop over the local bus.

use std::time::Duration;
use tabsync::{
    Cell, ChannelPresenter, GameEvent, GameState, LocalBus, Replica, ReplicaConfig, Symbol,
};
use tokio::sync::mpsc;

async fn wait_for_state(
    events: &mut mpsc::UnboundedReceiver<GameEvent>,
    done: impl Fn(&GameState) -> bool,
) -> GameState {
    let wait = async {
        loop {
            match events.recv().await {
                Some(GameEvent::StateChanged { state, .. }) if done(&state) => return state,
                Some(_) => continue,
                None => panic!("event stream closed"),
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(5), wait)
        .await
        .expect("timed out waiting for state")
}

async fn wait_for_status(events: &mut mpsc::UnboundedReceiver<GameEvent>, wanted: &str) {
    let wait = async {
        loop {
            match events.recv().await {
                Some(GameEvent::Status { text, .. }) if text == wanted => return,
                Some(_) => continue,
                None => panic!("event stream closed"),
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(5), wait)
        .await
        .expect("timed out waiting for status")
}

#[tokio::test]
async fn test_replicas_converge_over_bus() {
    let config = ReplicaConfig::default();
    let bus = LocalBus::new(config.channel().as_str(), *config.capacity());

    let (a_tx, mut a_events) = mpsc::unbounded_channel();
    let (b_tx, mut b_events) = mpsc::unbounded_channel();
    let (a, a_handle) = Replica::connect(&bus, &config, ChannelPresenter::new("a", a_tx));
    let (b, b_handle) = Replica::connect(&bus, &config, ChannelPresenter::new("b", b_tx));
    let a_task = tokio::spawn(a.run());
    let b_task = tokio::spawn(b.run());

    a_handle.join("X").unwrap();
    b_handle.join("O").unwrap();
    wait_for_state(&mut a_events, |s| s.roster().len() == 2).await;
    wait_for_state(&mut b_events, |s| s.roster().len() == 2).await;

    a_handle.attempt_move(4).unwrap();
    let seen = wait_for_state(&mut b_events, |s| !s.board().is_empty(4)).await;
    assert_eq!(seen.board().get(4), Some(Cell::Mark(Symbol::X)));
    assert_eq!(seen.turn(), Symbol::O);

    a_handle.shutdown().unwrap();
    b_handle.shutdown().unwrap();
    let a = a_task.await.unwrap();
    let b = b_task.await.unwrap();
    assert_eq!(a.state(), b.state());
    assert_eq!(a.local_symbol(), Some(Symbol::X));
    assert_eq!(b.local_symbol(), Some(Symbol::O));
}

#[tokio::test]
async fn test_rejection_reaches_presenter() {
    let config = ReplicaConfig::default();
    let bus = LocalBus::new(config.channel().as_str(), *config.capacity());
    let (tx, mut events) = mpsc::unbounded_channel();
    let (replica, handle) = Replica::connect(&bus, &config, ChannelPresenter::new("a", tx));
    let task = tokio::spawn(replica.run());

    handle.attempt_move(0).unwrap();
    wait_for_status(&mut events, "Join the game first!").await;

    handle.shutdown().unwrap();
    let engine = task.await.unwrap();
    assert_eq!(engine.state(), &GameState::new());
}

#[tokio::test]
async fn test_late_replica_syncs_on_request() {
    let config = ReplicaConfig::default();
    let bus = LocalBus::new(config.channel().as_str(), *config.capacity());

    let (a_tx, mut a_events) = mpsc::unbounded_channel();
    let (a, a_handle) = Replica::connect(&bus, &config, ChannelPresenter::new("a", a_tx));
    let a_task = tokio::spawn(a.run());
    a_handle.join("X").unwrap();
    a_handle.attempt_move(0).unwrap();
    wait_for_state(&mut a_events, |s| !s.board().is_empty(0)).await;

    let (late_tx, mut late_events) = mpsc::unbounded_channel();
    let (late, late_handle) =
        Replica::connect(&bus, &config, ChannelPresenter::new("late", late_tx));
    let late_task = tokio::spawn(late.run());

    a_handle.broadcast_snapshot().unwrap();
    let adopted = wait_for_state(&mut late_events, |s| !s.board().is_empty(0)).await;
    assert_eq!(adopted.turn(), Symbol::O);
    assert_eq!(adopted.roster().get(a_handle.identity().as_str()), Some(&Symbol::X));

    drop(a_handle);
    drop(late_handle);
    a_task.await.unwrap();
    late_task.await.unwrap();
}
