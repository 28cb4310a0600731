//! Fair Dice CLI
//!
//! Play non-transitive dice against the computer with every random value
//! settled by a published HMAC commitment.
//!
//! Commands:
//! - `play <SETS>...` - interactive game (`--auto` for a random opponent)
//! - `table <SETS>...` - print the win probability table
//! - `verify` - recheck a published key, value and HMAC

mod prompt;
mod table;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use fair_dice_core::{
    parse_dice_sets, verify, DiceGame, DiceSet, Digest, GameResult, GameSession,
    ProbabilityMatrix, RandomCounterparty, SecretKey,
};
use prompt::Prompt;
use std::io::{self, Write};
use tracing::info;
use tracing_subscriber::EnvFilter;

const EXAMPLE: &str = "Example: fair-dice play 2,2,4,4,9,9 1,1,6,6,8,8 3,3,5,5,7,7";

#[derive(Parser)]
#[command(name = "fair-dice", version, about = "Provably fair non-transitive dice game")]
struct Cli {
    /// Log filter, e.g. `info` or `fair_dice_core=debug`
    #[arg(long, env = "FAIR_DICE_LOG", default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one game against the computer
    Play {
        /// Dice sets as comma-separated faces, at least two
        #[arg(value_name = "FACES", allow_hyphen_values = true)]
        dice: Vec<String>,

        /// Let a random opponent answer instead of prompting
        #[arg(long)]
        auto: bool,

        /// Print the full session transcript as JSON when done
        #[arg(long)]
        json: bool,
    },

    /// Print the probability of each die beating each other die
    Table {
        #[arg(value_name = "FACES", allow_hyphen_values = true)]
        dice: Vec<String>,
    },

    /// Check a revealed key and value against a published HMAC
    Verify {
        #[arg(long, help = "Hex-encoded secret key")]
        key: String,

        #[arg(long, help = "Revealed value")]
        value: u32,

        #[arg(long, help = "Hex-encoded HMAC published before the reveal")]
        digest: String,
    },
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_dice(dice: &[String]) -> anyhow::Result<Vec<DiceSet>> {
    parse_dice_sets(dice).with_context(|| format!("invalid dice sets\n{}", EXAMPLE))
}

fn announce(session: &GameSession) -> String {
    let computer = session.computer_roll.face;
    let user = session.user_roll.face;
    match session.result {
        GameResult::UserWins => format!("You win ({} > {})!", user, computer),
        GameResult::ComputerWins => format!("I win ({} > {})!", computer, user),
        GameResult::Draw => format!("It's a tie ({} = {})!", user, computer),
    }
}

fn play(dice: &[String], auto: bool, json: bool) -> anyhow::Result<()> {
    let sets = load_dice(dice)?;
    let help = table::render(&ProbabilityMatrix::compute(&sets));
    let mut game = DiceGame::new(sets)?;

    let session = if auto {
        game.play(&mut RandomCounterparty::new(rand::thread_rng()))?
    } else {
        let stdin = io::stdin();
        let mut prompt = Prompt::new(stdin.lock(), io::stdout(), help.clone());
        game.play(&mut prompt)?
    };
    info!(game_id = %session.game_id, verified = session.verify(), "Session complete");

    report(&session, &help, json, &mut io::stdout().lock())
}

/// Write the outcome, or the whole transcript when `json` is set
fn report<W: Write>(
    session: &GameSession,
    help: &str,
    json: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(session)?)?;
        return Ok(());
    }
    writeln!(out, "{}", announce(session))?;
    writeln!(out)?;
    writeln!(out, "{}", table::TITLE)?;
    writeln!(out, "{}", help)?;
    Ok(())
}

fn print_table<W: Write>(dice: &[String], out: &mut W) -> anyhow::Result<()> {
    let sets = load_dice(dice)?;
    writeln!(out, "{}", table::TITLE)?;
    writeln!(out, "{}", table::render(&ProbabilityMatrix::compute(&sets)))?;
    Ok(())
}

fn check(key: &str, value: u32, digest: &str) -> anyhow::Result<()> {
    let key: SecretKey = key.parse().context("key must be 64 hex digits")?;
    let digest: Digest = digest.parse().context("digest must be 64 hex digits")?;

    if !verify(&key, value, &digest) {
        bail!("HMAC does not match key and value {}", value);
    }
    println!("OK: HMAC matches value {}", value);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Play { dice, auto, json } => play(&dice, auto, json),
        Commands::Table { dice } => print_table(&dice, &mut io::stdout().lock()),
        Commands::Verify { key, value, digest } => check(&key, value, &digest),
    }
}
