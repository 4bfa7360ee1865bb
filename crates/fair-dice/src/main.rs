//! Fair Dice
//!
//! Terminal non-transitive dice game against the program. Every random choice
//! the program makes is committed with an HMAC before you answer, and the key
//! is revealed afterwards so you can check it.
//!
//! # Usage
//!
//! ```bash
//! # Play with three dice
//! fair-dice 2,2,4,4,9,9 1,1,6,6,8,8 3,3,5,5,7,7
//!
//! # Keep a JSON transcript of every commitment and reveal
//! fair-dice --transcript game.jsonl 2,2,4,4,9,9 1,1,6,6,8,8 3,3,5,5,7,7
//!
//! # Check a reveal by hand
//! fair-dice verify --key <HEX> --value 3 --hmac <HEX>
//! ```

mod console;
mod help;
mod transcript;
mod verify;

use clap::{Parser, Subcommand};
use console::Console;
use fair_dice_core::{DieSet, Game, SessionEnd};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use transcript::Transcript;

const USAGE_EXAMPLE: &str = "Example: fair-dice 2,2,4,4,9,9 6,8,1,1,8,6 7,5,3,7,5,3";

/// Non-transitive dice with provably fair random generation
#[derive(Parser, Debug)]
#[command(name = "fair-dice")]
#[command(about = "Non-transitive dice with provably fair random generation")]
#[command(version, args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Dice, one per argument, faces separated by commas
    #[arg(value_name = "DICE", allow_hyphen_values = true)]
    dice: Vec<String>,

    /// Append every commitment and reveal to this file as JSON lines
    #[arg(long, value_name = "PATH")]
    transcript: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a revealed key and number against a published HMAC
    Verify {
        /// Revealed key (hex)
        #[arg(long)]
        key: String,

        /// Revealed number
        #[arg(long)]
        value: u32,

        /// HMAC published before the number was revealed (hex)
        #[arg(long)]
        hmac: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match args.command {
        Some(Command::Verify { key, value, hmac }) => verify::run(&key, value, &hmac),
        None => play(&args.dice, args.transcript).await,
    }
}

/// Parse the dice arguments, or the message to print before exiting with status 1
fn load_dice(args: &[String]) -> Result<DieSet, String> {
    DieSet::parse(args).map_err(|err| format!("Error: {}\n{}", err, USAGE_EXAMPLE))
}

async fn play(dice: &[String], transcript: Option<PathBuf>) -> ExitCode {
    let dice = match load_dice(dice) {
        Ok(dice) => dice,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    let input = BufReader::new(tokio::io::stdin());
    let mut console = Console::new(dice.clone(), input, std::io::stdout());
    if let Some(path) = transcript {
        match Transcript::create(&path) {
            Ok(transcript) => {
                info!("Writing transcript to {}", path.display());
                console = console.with_transcript(transcript);
            }
            Err(err) => {
                eprintln!("Error: cannot open transcript {}: {}", path.display(), err);
                return ExitCode::FAILURE;
            }
        }
    }

    match Game::new(dice).play(&mut console).await {
        Ok(SessionEnd::Completed(outcome)) => {
            info!(result = %outcome.result, "game over");
            ExitCode::SUCCESS
        }
        Ok(SessionEnd::Abandoned) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "session failed");
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
