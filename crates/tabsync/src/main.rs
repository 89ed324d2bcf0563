//! tabsync - scripted and interactive replicas on a local channel.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command, PlayCommand};
use tabsync::{
    ChannelPresenter, GameEvent, GameState, LocalBus, PlayerId, Position, Presenter, Replica,
    ReplicaConfig, ReplicaHandle, Subscription, SyncEngine, TerminalPresenter, Transport,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = ReplicaConfig::load(&cli.config)?;
    initialize_tracing(&config);

    match cli.command {
        Command::Demo => run_demo(&config),
        Command::Play { replicas } => run_play(&config, usize::from(replicas)).await,
    }
}

fn initialize_tracing(config: &ReplicaConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();
}

enum Step {
    Join(&'static str),
    Move(usize),
}

/// Replica number (0-based) and what it does.
const SCRIPT: [(usize, Step); 9] = [
    (0, Step::Move(4)),
    (0, Step::Join("X")),
    (1, Step::Join("O")),
    (0, Step::Move(0)),
    (1, Step::Move(3)),
    (1, Step::Move(1)),
    (0, Step::Move(1)),
    (1, Step::Move(4)),
    (0, Step::Move(2)),
];

/// Run the scripted two-replica game.
#[instrument(skip(config), fields(channel = %config.channel()))]
fn run_demo(config: &ReplicaConfig) -> Result<()> {
    info!("Starting scripted demo");
    let bus = LocalBus::new(config.channel().as_str(), *config.capacity());

    let mut tabs: Vec<_> = ["tab1", "tab2"]
        .into_iter()
        .map(|label| {
            let (endpoint, subscription) = bus.connect();
            let engine = SyncEngine::new(
                PlayerId::generate(config.identity_prefix()),
                endpoint,
                TerminalPresenter::new(label),
            )
            .with_snapshot_on_join(*config.announce_snapshot_on_join());
            (engine, subscription)
        })
        .collect();

    for (tab, step) in SCRIPT {
        let (engine, _) = &mut tabs[tab];
        // Rejections are printed by the presenter.
        let _ = match step {
            Step::Join(symbol) => engine.join(symbol).map(|_| ()),
            Step::Move(index) => engine.attempt_move(index).map(|_| ()),
        };
        for (engine, subscription) in tabs.iter_mut() {
            deliver_pending(engine, subscription);
        }
    }

    // One more attempt after the game ended.
    let (engine, _) = &mut tabs[1];
    let _ = engine.attempt_move(8);

    for (n, (engine, _)) in tabs.iter().enumerate() {
        println!(
            "tab{} ({}): phase {}, outcome {:?}",
            n + 1,
            engine.identity(),
            engine.phase(),
            engine.state().outcome()
        );
    }
    Ok(())
}

fn deliver_pending<T: Transport, P: Presenter>(
    engine: &mut SyncEngine<T, P>,
    subscription: &mut Subscription,
) {
    while let Some(value) = subscription.try_recv() {
        engine.receive(value);
    }
}

/// Run replicas driven by stdin commands.
#[instrument(skip(config), fields(channel = %config.channel()))]
async fn run_play(config: &ReplicaConfig, replicas: usize) -> Result<()> {
    let bus = LocalBus::new(config.channel().as_str(), *config.capacity());
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let mut handles: Vec<ReplicaHandle> = Vec::with_capacity(replicas);
    let mut tasks = Vec::with_capacity(replicas);
    for n in 1..=replicas {
        let presenter = ChannelPresenter::new(format!("tab{}", n), event_tx.clone());
        let (replica, handle) = Replica::connect(&bus, config, presenter);
        println!("tab{} is {}", n, handle.identity());
        handles.push(handle);
        tasks.push(tokio::spawn(replica.run()));
    }
    drop(event_tx);

    let printer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                GameEvent::StateChanged { replica, state } => {
                    println!("[{}]\n{}", replica, state.board().display());
                    println!("{}\n", free_cells(&state));
                }
                GameEvent::Status { replica, text } => println!("[{}] {}", replica, text),
            }
        }
    });

    println!("{}", PlayCommand::USAGE);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match PlayCommand::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        let (replica, result) = match command {
            PlayCommand::Quit => break,
            PlayCommand::Join { replica, symbol } => {
                (replica, replica_handle(&handles, replica).map(|h| h.join(symbol)))
            }
            PlayCommand::Move { replica, index } => {
                (replica, replica_handle(&handles, replica).map(|h| h.attempt_move(index)))
            }
            PlayCommand::Sync { replica } => {
                (replica, replica_handle(&handles, replica).map(|h| h.broadcast_snapshot()))
            }
        };
        match result {
            None => println!("No replica {}, there are {}", replica, handles.len()),
            Some(Err(e)) => warn!(replica, error = %e, "Intent not delivered"),
            Some(Ok(())) => {}
        }
    }

    for handle in &handles {
        let _ = handle.shutdown();
    }
    drop(handles);

    for (n, task) in tasks.into_iter().enumerate() {
        let engine = task.await?;
        println!(
            "tab{} ({}): phase {}, outcome {:?}",
            n + 1,
            engine.identity(),
            engine.phase(),
            engine.state().outcome()
        );
    }
    printer.await?;
    Ok(())
}

fn free_cells(state: &GameState) -> String {
    if state.outcome().is_terminal() {
        return "No moves left".to_string();
    }
    let free: Vec<String> = Position::valid_moves(state.board())
        .into_iter()
        .map(|pos| format!("{} ({})", pos.to_index(), pos))
        .collect();
    format!("Free cells: {}", free.join(", "))
}

fn replica_handle(handles: &[ReplicaHandle], replica: usize) -> Option<&ReplicaHandle> {
    handles.get(replica.checked_sub(1)?)
}
