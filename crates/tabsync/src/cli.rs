//! Command-line interface for tabsync.

use clap::{Parser, Subcommand};
use tabsync::Position;

/// tabsync - tic-tac-toe replicas synchronized over a broadcast channel
#[derive(Parser, Debug)]
#[command(name = "tabsync")]
#[command(about = "Serverless tic-tac-toe between replicas on one channel", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file (defaults apply if missing)
    #[arg(short, long, default_value = "tabsync.toml")]
    pub config: std::path::PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a scripted game between two replicas and print every update
    Demo,

    /// Drive replicas interactively from stdin
    Play {
        /// Number of replicas on the channel
        #[arg(
            short,
            long,
            default_value = "2",
            value_parser = clap::value_parser!(u8).range(1..=9)
        )]
        replicas: u8,
    },
}

/// One line typed into `play`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayCommand {
    /// `<replica> join <symbol>`
    Join {
        /// Replica number, starting at 1.
        replica: usize,
        /// Symbol as typed.
        symbol: String,
    },
    /// `<replica> move <index|label>`
    Move {
        /// Replica number, starting at 1.
        replica: usize,
        /// Cell index; out-of-range numbers pass through for the engine to reject.
        index: usize,
    },
    /// `<replica> sync`
    Sync {
        /// Replica number, starting at 1.
        replica: usize,
    },
    /// `quit`
    Quit,
}

impl PlayCommand {
    /// Usage shown on bad input.
    pub const USAGE: &'static str =
        "commands: <n> join <X|O> | <n> move <0-8|label> | <n> sync | quit";

    /// Parses one input line.
    pub fn parse(line: &str) -> Result<Self, String> {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            ["quit"] | ["exit"] => Ok(PlayCommand::Quit),
            [replica, "join", symbol] => Ok(PlayCommand::Join {
                replica: parse_replica(replica)?,
                symbol: symbol.to_string(),
            }),
            [replica, "move", target @ ..] if !target.is_empty() => {
                let target = target.join(" ");
                let index = match target.parse::<usize>() {
                    Ok(index) => index,
                    Err(_) => Position::from_label_or_number(&target)
                        .map(Position::to_index)
                        .ok_or_else(|| format!("Unknown cell '{}'", target))?,
                };
                Ok(PlayCommand::Move {
                    replica: parse_replica(replica)?,
                    index,
                })
            }
            [replica, "sync"] => Ok(PlayCommand::Sync {
                replica: parse_replica(replica)?,
            }),
            _ => Err(Self::USAGE.to_string()),
        }
    }
}

fn parse_replica(word: &str) -> Result<usize, String> {
    match word.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("Replica must be a number from 1, got '{}'", word)),
    }
}
